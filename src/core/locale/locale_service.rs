// This is the locale module - it contains ALL the logic for resolving
// user-facing text. Notice how this module has NO Discord-specific code
// (no serenity, no poise imports). It works with plain strings so it could
// be reused by a web dashboard, a CLI, or any other frontend.

use std::collections::HashMap;

/// Language used whenever the requested one has no loaded pack.
pub const DEFAULT_LANGUAGE: &str = "en";

// ============================================================================
// DOMAIN MODELS
// ============================================================================

/// The full set of message-key -> template mappings for one language.
///
/// Packs are built once at startup (from `<code>.json` files) and never
/// mutated afterwards, so they can be shared freely across event handlers.
#[derive(Debug, Clone)]
pub struct LanguagePack {
    code: String,
    entries: HashMap<String, String>,
}

impl LanguagePack {
    pub fn new(code: impl Into<String>, entries: HashMap<String, String>) -> Self {
        Self {
            code: code.into(),
            entries,
        }
    }

    /// The language code this pack serves.
    #[allow(dead_code)] // Only tests read it; the resolver keys off the field
    pub fn code(&self) -> &str {
        &self.code
    }

    fn template(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }
}

// ============================================================================
// CORE SERVICE
// ============================================================================

/// Resolves a (message key, language code, parameter set) triple into a
/// display string.
///
/// **Fallback order:** the pack for the requested language, then the pack
/// for [`DEFAULT_LANGUAGE`], then an empty pack. The fallback is per *pack*,
/// not per key: a loaded pack that is missing a key reports the missing key
/// rather than borrowing the English text.
///
/// **Totality:** every lookup returns a string. Unknown keys and unbound
/// placeholders come back as bracketed diagnostic strings that are safe to
/// display, so callers never handle an error type. The resolver itself never
/// logs and never mutates - concurrent lookups need no locking.
pub struct LocaleResolver {
    packs: HashMap<String, LanguagePack>,
    default_language: String,
}

impl LocaleResolver {
    /// Build a resolver from loaded packs. When two packs carry the same
    /// code the last one wins; in practice pack files are uniquely named.
    pub fn new(packs: Vec<LanguagePack>) -> Self {
        let mut map = HashMap::with_capacity(packs.len());
        for pack in packs {
            map.insert(pack.code.clone(), pack);
        }
        Self {
            packs: map,
            default_language: DEFAULT_LANGUAGE.to_string(),
        }
    }

    pub fn default_language(&self) -> &str {
        &self.default_language
    }

    pub fn has_language(&self, code: &str) -> bool {
        self.packs.contains_key(code)
    }

    /// Language codes with a loaded pack, in no particular order.
    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.packs.keys().map(String::as_str)
    }

    /// Resolve `key` in `language`, substituting `{name}` placeholders from
    /// `params`.
    ///
    /// **Returns:**
    /// - the substituted template when the key exists and every placeholder
    ///   binds to a param;
    /// - `[key '<key>' not found for language '<language>']` when the key is
    ///   missing from the selected pack (the diagnostic always names the
    ///   *requested* language, even after falling back to the default pack);
    /// - `[error: invalid parameters for key '<key>']` when a placeholder
    ///   has no matching param.
    ///
    /// Params that the template never mentions are ignored. `{{` and `}}`
    /// escape literal braces. An empty `params` against a template without
    /// placeholders skips the substitution pass entirely and returns the
    /// template verbatim.
    pub fn resolve(&self, key: &str, language: &str, params: &[(&str, &str)]) -> String {
        let pack = self
            .packs
            .get(language)
            .or_else(|| self.packs.get(self.default_language.as_str()));

        let Some(template) = pack.and_then(|p| p.template(key)) else {
            return format!("[key '{key}' not found for language '{language}']");
        };

        if params.is_empty() {
            // No substitution pass: static templates come back untouched
            // (brace escapes included). Only a template that actually asks
            // for a parameter is a binding failure here.
            return match substitute(template, params) {
                Err(SubstituteError::UnboundPlaceholder) => invalid_params(key),
                _ => template.to_string(),
            };
        }

        match substitute(template, params) {
            Ok(text) => text,
            Err(_) => invalid_params(key),
        }
    }

    /// Map a guild's preferred-locale tag (e.g. `ru-RU`, `en-US`) to a
    /// loaded pack code: exact match first, then the primary subtag,
    /// otherwise the default language.
    pub fn match_tag(&self, tag: &str) -> &str {
        let tag = tag.to_ascii_lowercase();
        if let Some((code, _)) = self.packs.get_key_value(tag.as_str()) {
            return code;
        }
        let primary = tag.split(['-', '_']).next().unwrap_or(tag.as_str());
        if let Some((code, _)) = self.packs.get_key_value(primary) {
            return code;
        }
        &self.default_language
    }
}

fn invalid_params(key: &str) -> String {
    format!("[error: invalid parameters for key '{key}']")
}

// ============================================================================
// TEMPLATE SUBSTITUTION
// ============================================================================

enum SubstituteError {
    /// A `{name}` placeholder had no matching param.
    UnboundPlaceholder,
    /// A stray or unterminated brace. The original templates never contain
    /// these, but a hand-edited pack file must not be able to panic us.
    MalformedBraces,
}

/// Replace every `{name}` placeholder with its param value.
///
/// Placeholder names are opaque: any run of characters between `{` and `}`
/// is looked up verbatim, with no format-spec syntax.
fn substitute(template: &str, params: &[(&str, &str)]) -> Result<String, SubstituteError> {
    let mut out = String::with_capacity(template.len());
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '{' if chars.peek() == Some(&'{') => {
                chars.next();
                out.push('{');
            }
            '{' => {
                let mut name = String::new();
                let mut closed = false;
                for next in chars.by_ref() {
                    match next {
                        '}' => {
                            closed = true;
                            break;
                        }
                        '{' => return Err(SubstituteError::MalformedBraces),
                        other => name.push(other),
                    }
                }
                if !closed {
                    return Err(SubstituteError::MalformedBraces);
                }
                match lookup(params, &name) {
                    Some(value) => out.push_str(value),
                    None => return Err(SubstituteError::UnboundPlaceholder),
                }
            }
            '}' if chars.peek() == Some(&'}') => {
                chars.next();
                out.push('}');
            }
            '}' => return Err(SubstituteError::MalformedBraces),
            other => out.push(other),
        }
    }

    Ok(out)
}

fn lookup<'p>(params: &'p [(&str, &str)], name: &str) -> Option<&'p str> {
    params
        .iter()
        .find(|(param, _)| *param == name)
        .map(|(_, value)| *value)
}

// ============================================================================
// TESTS
// ============================================================================
// The resolver is the one component with a real contract, so every promise
// it makes is pinned here.

#[cfg(test)]
mod tests {
    use super::*;

    fn pack(code: &str, entries: &[(&str, &str)]) -> LanguagePack {
        LanguagePack::new(
            code,
            entries
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    fn resolver() -> LocaleResolver {
        LocaleResolver::new(vec![
            pack(
                "en",
                &[
                    ("greet.hello", "Hello, {user}!"),
                    ("greet.plain", "Hello there."),
                    ("braces.escaped", "use {{curly}} braces"),
                    ("braces.stray", "lonely { brace"),
                    ("count.two", "{count} of {max}"),
                ],
            ),
            pack("ru", &[("greet.hello", "Привет, {user}!")]),
        ])
    }

    #[test]
    fn substitutes_named_params() {
        let r = resolver();
        assert_eq!(
            r.resolve("greet.hello", "en", &[("user", "Ann")]),
            "Hello, Ann!"
        );
        assert_eq!(
            r.resolve("count.two", "en", &[("count", "3"), ("max", "100")]),
            "3 of 100"
        );
    }

    #[test]
    fn requested_language_wins_over_default() {
        let r = resolver();
        assert_eq!(
            r.resolve("greet.hello", "ru", &[("user", "Ann")]),
            "Привет, Ann!"
        );
    }

    #[test]
    fn unknown_language_falls_back_to_default_pack() {
        let r = resolver();
        assert_eq!(
            r.resolve("greet.hello", "fr", &[("user", "Ann")]),
            r.resolve("greet.hello", "en", &[("user", "Ann")]),
        );
    }

    #[test]
    fn pack_fallback_is_per_pack_not_per_key() {
        // The ru pack exists but lacks the key, so the lookup reports the
        // missing key instead of borrowing the English template.
        let r = resolver();
        assert_eq!(
            r.resolve("greet.plain", "ru", &[]),
            "[key 'greet.plain' not found for language 'ru']"
        );
    }

    #[test]
    fn missing_key_diagnostic_names_key_and_requested_language() {
        let r = resolver();
        let out = r.resolve("greet.bye", "de", &[]);
        assert_eq!(out, "[key 'greet.bye' not found for language 'de']");
        assert!(out.contains("greet.bye"));
        assert!(out.contains("'de'"));
    }

    #[test]
    fn unbound_placeholder_yields_parameter_diagnostic() {
        let r = resolver();
        assert_eq!(
            r.resolve("greet.hello", "en", &[]),
            "[error: invalid parameters for key 'greet.hello']"
        );
        assert_eq!(
            r.resolve("greet.hello", "en", &[("name", "Ann")]),
            "[error: invalid parameters for key 'greet.hello']"
        );
        // Partially bound templates fail the same way.
        assert_eq!(
            r.resolve("count.two", "en", &[("count", "3")]),
            "[error: invalid parameters for key 'count.two']"
        );
    }

    #[test]
    fn extra_params_are_ignored() {
        let r = resolver();
        assert_eq!(
            r.resolve("greet.hello", "en", &[("user", "Ann"), ("mood", "good")]),
            "Hello, Ann!"
        );
    }

    #[test]
    fn static_template_returned_unchanged_without_params() {
        let r = resolver();
        assert_eq!(r.resolve("greet.plain", "en", &[]), "Hello there.");
        // Without a substitution pass, brace escapes stay as written.
        assert_eq!(r.resolve("braces.escaped", "en", &[]), "use {{curly}} braces");
        assert_eq!(r.resolve("braces.stray", "en", &[]), "lonely { brace");
    }

    #[test]
    fn brace_escapes_collapse_during_substitution() {
        let r = resolver();
        assert_eq!(
            r.resolve("braces.escaped", "en", &[("unused", "x")]),
            "use {curly} braces"
        );
    }

    #[test]
    fn malformed_braces_never_panic() {
        let r = resolver();
        assert_eq!(
            r.resolve("braces.stray", "en", &[("user", "Ann")]),
            "[error: invalid parameters for key 'braces.stray']"
        );
    }

    #[test]
    fn empty_registry_still_resolves_to_diagnostics() {
        let r = LocaleResolver::new(Vec::new());
        assert_eq!(
            r.resolve("greet.hello", "en", &[("user", "Ann")]),
            "[key 'greet.hello' not found for language 'en']"
        );
    }

    #[test]
    fn resolve_is_idempotent() {
        let r = resolver();
        let params = [("user", "Ann")];
        let first = r.resolve("greet.hello", "en", &params);
        let second = r.resolve("greet.hello", "en", &params);
        assert_eq!(first, second);
    }

    #[test]
    fn last_pack_wins_on_duplicate_codes() {
        let r = LocaleResolver::new(vec![
            pack("en", &[("greet.plain", "first")]),
            pack("en", &[("greet.plain", "second")]),
        ]);
        assert_eq!(r.resolve("greet.plain", "en", &[]), "second");
    }

    #[test]
    fn match_tag_prefers_exact_then_primary_subtag() {
        let r = resolver();
        assert_eq!(r.match_tag("ru"), "ru");
        assert_eq!(r.match_tag("ru-RU"), "ru");
        assert_eq!(r.match_tag("RU_ru"), "ru");
        assert_eq!(r.match_tag("en-US"), "en");
        assert_eq!(r.match_tag("pt-BR"), "en");
        assert_eq!(r.match_tag(""), "en");
    }
}
