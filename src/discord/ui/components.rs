// Builders for the bot's response cards and interactive elements.
//
// Everything here constructs inert serenity display objects from
// already-localized strings - resolving text through the LocaleResolver is
// the caller's job, so these builders stay usable from any handler.

use poise::serenity_prelude::{
    self as serenity, ButtonStyle, ComponentInteractionCollector, CreateActionRow, CreateButton,
    CreateEmbed, CreateInputText, CreateInteractionResponse, CreateModal, CreateSelectMenu,
    CreateSelectMenuKind, CreateSelectMenuOption, InputTextStyle,
};
use std::time::Duration;

// Palette carried over from the bot's original look.
const SUCCESS_COLOR: u32 = 0x2ECC71; // green
const ERROR_COLOR: u32 = 0xE74C3C; // red
const INFO_COLOR: u32 = 0x3498DB; // blue

/// Custom IDs for the confirm button row.
pub const CONFIRM_YES_ID: &str = "confirm_yes";
#[allow(dead_code)]
pub const CONFIRM_NO_ID: &str = "confirm_no";

/// How long a confirm row stays answerable.
const CONFIRM_TIMEOUT: Duration = Duration::from_secs(30);

/// Green embed for completed actions. The description is prefixed with a
/// check mark; callers can still chain `.title(...)` onto the result.
pub fn success_embed(description: &str) -> CreateEmbed {
    CreateEmbed::new()
        .description(format!("✅ {description}"))
        .color(SUCCESS_COLOR)
}

/// Red embed for failures.
pub fn error_embed(description: &str) -> CreateEmbed {
    CreateEmbed::new()
        .description(format!("❌ {description}"))
        .color(ERROR_COLOR)
}

/// Blue informational embed.
pub fn info_embed(title: &str, description: &str) -> CreateEmbed {
    CreateEmbed::new()
        .title(title)
        .description(description)
        .color(INFO_COLOR)
}

/// Single-choice dropdown built from `(label, value)` pairs.
#[allow(dead_code)] // Wired up by features that prompt for a choice
pub fn select_menu(custom_id: &str, placeholder: &str, options: &[(&str, &str)]) -> CreateActionRow {
    let options = options
        .iter()
        .map(|(label, value)| CreateSelectMenuOption::new(*label, *value))
        .collect();

    CreateActionRow::SelectMenu(
        CreateSelectMenu::new(custom_id, CreateSelectMenuKind::String { options })
            .placeholder(placeholder)
            .min_values(1)
            .max_values(1),
    )
}

/// Yes/no button row. Labels come localized from the caller; the custom IDs
/// are fixed so [`await_confirmation`] can tell the answers apart.
#[allow(dead_code)]
pub fn confirm_buttons(yes_label: &str, no_label: &str) -> CreateActionRow {
    CreateActionRow::Buttons(vec![
        CreateButton::new(CONFIRM_YES_ID)
            .label(yes_label)
            .style(ButtonStyle::Success),
        CreateButton::new(CONFIRM_NO_ID)
            .label(no_label)
            .style(ButtonStyle::Danger),
    ])
}

/// Row with a single link-style button.
#[allow(dead_code)]
pub fn link_button(label: &str, url: &str) -> CreateActionRow {
    CreateActionRow::Buttons(vec![CreateButton::new_link(url).label(label)])
}

/// Modal with one required short text input.
#[allow(dead_code)]
pub fn text_input_modal(
    custom_id: &str,
    title: &str,
    label: &str,
    placeholder: &str,
) -> CreateModal {
    let input = CreateInputText::new(InputTextStyle::Short, label, custom_id)
        .placeholder(placeholder)
        .required(true);

    CreateModal::new(custom_id, title).components(vec![CreateActionRow::InputText(input)])
}

/// Wait for a press on a [`confirm_buttons`] row attached to `message`.
///
/// Returns `Some(true)` for yes, `Some(false)` for no, and `None` once the
/// timeout passes. The press is acknowledged here so the caller only has to
/// act on the answer.
#[allow(dead_code)]
pub async fn await_confirmation(
    ctx: &serenity::Context,
    message: &serenity::Message,
) -> Option<bool> {
    let press = ComponentInteractionCollector::new(ctx)
        .message_id(message.id)
        .timeout(CONFIRM_TIMEOUT)
        .await?;

    // Best effort: a lost acknowledgement only means Discord shows the
    // "interaction failed" notice to the presser.
    let _ = press
        .create_response(&ctx.http, CreateInteractionResponse::Acknowledge)
        .await;

    Some(press.data.custom_id == CONFIRM_YES_ID)
}

// ============================================================================
// TESTS
// ============================================================================
// serenity builders serialize to the exact payloads sent to Discord, so the
// assertions below pin the wire shape of each element.
