use crate::discord::commands::moderation::{Context, Error};
use poise::serenity_prelude as serenity;
use std::collections::HashMap;

// Category definitions with emojis and order
const CATEGORY_ORDER: &[&str] = &["Moderation", "General"];

fn get_category_emoji(category: &str) -> &'static str {
    match category {
        "Moderation" => "🛡️",
        "General" => "🧰",
        _ => "•",
    }
}

struct CommandMetadata {
    category: &'static str,
    priority: i32,
    note: Option<&'static str>,
}

fn get_command_metadata(name: &str) -> CommandMetadata {
    match name {
        "clear" => CommandMetadata {
            category: "Moderation",
            priority: 100,
            note: Some("Needs the Manage Messages permission."),
        },
        _ => CommandMetadata {
            category: "General",
            priority: 0,
            note: None,
        },
    }
}

/// Show a categorized list of commands
#[poise::command(slash_command, prefix_command)]
pub async fn help(ctx: Context<'_>) -> Result<(), Error> {
    let mut categories: HashMap<&str, Vec<(i32, String)>> = HashMap::new();

    for command in &ctx.framework().options().commands {
        if command.hide_in_help || command.name == "help" {
            continue;
        }

        let metadata = get_command_metadata(&command.name);

        let description = command
            .description
            .as_deref()
            .unwrap_or("No description provided.");

        let mut entry = format!("• **/{0}** — {1}", command.name, description);

        if let Some(note) = metadata.note {
            entry.push_str(&format!("\n  ↳ {}", note));
        }

        categories
            .entry(metadata.category)
            .or_default()
            .push((metadata.priority, entry));
    }

    let mut embed = serenity::CreateEmbed::new()
        .title("Command Guide")
        .description(
            "Every command works as a slash command; most also respond to the `?` prefix \
            (for example `?clear 10`).",
        )
        .color(serenity::Colour::from_rgb(88, 101, 242))
        .timestamp(serenity::Timestamp::now());

    if let Ok(user) = ctx.framework().bot_id.to_user(&ctx).await {
        embed = embed.thumbnail(user.face());
    }

    // Sort categories based on defined order, then alphabetically for others
    let mut sorted_categories: Vec<_> = categories.keys().cloned().collect();
    sorted_categories.sort_by(|a, b| {
        let pos_a = CATEGORY_ORDER.iter().position(|&x| x == *a).unwrap_or(999);
        let pos_b = CATEGORY_ORDER.iter().position(|&x| x == *b).unwrap_or(999);
        pos_a.cmp(&pos_b).then(a.cmp(b))
    });

    for category in sorted_categories {
        if let Some(entries) = categories.get_mut(category) {
            // Sort by priority (descending), then name (ascending)
            entries.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));

            let emoji = get_category_emoji(category);
            let body: Vec<&str> = entries.iter().map(|(_, entry)| entry.as_str()).collect();

            embed = embed.field(format!("{} {}", emoji, category), body.join("\n"), false);
        }
    }

    embed = embed.footer(serenity::CreateEmbedFooter::new(
        "Need a hand? Ping a moderator.",
    ));

    ctx.send(poise::CreateReply::default().embed(embed)).await?;

    Ok(())
}
