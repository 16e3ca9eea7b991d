// This is the infra layer - it feeds the core LocaleResolver from disk.
// One `<code>.json` file per language, each a flat JSON object mapping
// message key -> template string (dotted key names are literal keys).

use crate::core::locale::LanguagePack;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PackLoadError {
    #[error("failed to read language pack directory {path}: {source}")]
    DirUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Load every `<code>.json` language pack in `dir`.
///
/// The file stem is taken verbatim as the language code. A file that fails
/// to read or parse is skipped with one warning line and loading continues;
/// only an unreadable directory aborts startup. Runs once, before the
/// framework starts - there is no reload.
pub fn load_packs(dir: &Path) -> Result<Vec<LanguagePack>, PackLoadError> {
    let entries = std::fs::read_dir(dir).map_err(|source| PackLoadError::DirUnreadable {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut packs = Vec::new();
    for entry in entries {
        let path = match entry {
            Ok(entry) => entry.path(),
            Err(err) => {
                tracing::warn!("skipping unreadable directory entry in language packs: {err}");
                continue;
            }
        };

        if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
            continue;
        }
        let Some(code) = path.file_stem().and_then(|stem| stem.to_str()) else {
            continue;
        };

        let contents = match std::fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(err) => {
                tracing::warn!("skipping unreadable language pack {}: {err}", path.display());
                continue;
            }
        };

        match serde_json::from_str::<HashMap<String, String>>(&contents) {
            Ok(templates) => packs.push(LanguagePack::new(code, templates)),
            Err(err) => {
                tracing::warn!("skipping malformed language pack {}: {err}", path.display());
            }
        }
    }

    Ok(packs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::locale::LocaleResolver;
    use std::fs;

    #[test]
    fn loads_every_well_formed_pack() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("en.json"),
            r#"{"greet.hello": "Hello, {user}!"}"#,
        )
        .unwrap();
        fs::write(
            dir.path().join("ru.json"),
            r#"{"greet.hello": "Привет, {user}!"}"#,
        )
        .unwrap();

        let packs = load_packs(dir.path()).unwrap();
        let mut codes: Vec<&str> = packs.iter().map(|p| p.code()).collect();
        codes.sort_unstable();
        assert_eq!(codes, ["en", "ru"]);

        let resolver = LocaleResolver::new(packs);
        assert_eq!(
            resolver.resolve("greet.hello", "ru", &[("user", "Ann")]),
            "Привет, Ann!"
        );
    }

    #[test]
    fn malformed_pack_is_skipped_and_loading_continues() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("en.json"), r#"{"greet.plain": "Hi."}"#).unwrap();
        fs::write(dir.path().join("broken.json"), "{not json").unwrap();
        // Structurally valid JSON with the wrong shape is malformed too.
        fs::write(dir.path().join("nested.json"), r#"{"a": {"b": "c"}}"#).unwrap();

        let packs = load_packs(dir.path()).unwrap();
        assert_eq!(packs.len(), 1);
        assert_eq!(packs[0].code(), "en");
    }

    #[test]
    fn non_json_entries_are_ignored() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("notes.txt"), "not a pack").unwrap();

        let packs = load_packs(dir.path()).unwrap();
        assert!(packs.is_empty());
    }

    #[test]
    fn missing_directory_is_a_startup_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("no-such-dir");

        let err = load_packs(&missing).unwrap_err();
        assert!(err.to_string().contains("no-such-dir"));
    }

    #[test]
    fn loaded_packs_resolve_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("en.json"),
            r#"{"greet.hello": "Hello, {user}!"}"#,
        )
        .unwrap();

        let resolver = LocaleResolver::new(load_packs(dir.path()).unwrap());
        assert_eq!(
            resolver.resolve("greet.hello", "en", &[("user", "Ann")]),
            "Hello, Ann!"
        );
    }

    // Guards the packs shipped in the repo against drifting away from the
    // keys the handlers actually ask for.
    #[test]
    fn shipped_packs_contain_every_referenced_key() {
        const REFERENCED_KEYS: &[&str] = &[
            "error.missing_perms",
            "error.bot_missing_perms",
            "error.cooldown",
            "error.generic",
            "error.guild_only",
            "welcome.title",
            "welcome.message",
            "guild_join.title",
            "guild_join.message",
            "ui.confirm.yes",
            "ui.confirm.no",
            "moderation.clear.invalid_amount",
            "moderation.clear.success",
            "moderation.clear.error_permissions",
        ];

        let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("locales");
        let packs = load_packs(&dir).unwrap();
        assert!(!packs.is_empty(), "no language packs shipped in {dir:?}");

        let resolver = LocaleResolver::new(packs);
        let languages: Vec<String> = resolver.languages().map(str::to_string).collect();
        assert!(languages.iter().any(|code| code == "en"));

        for language in &languages {
            for key in REFERENCED_KEYS {
                let resolved = resolver.resolve(key, language, &[]);
                assert!(
                    !resolved.starts_with("[key "),
                    "pack '{language}' is missing '{key}'"
                );
            }
        }
    }
}
