// Moderation commands.
//
// The command handler stays thin: validate input through the core service,
// perform the Discord calls, answer with a localized embed. All user-facing
// text goes through the locale resolver so the reply matches the guild's
// language.

use crate::core::locale::LocaleResolver;
use crate::core::moderation::{validate_purge_amount, DEFAULT_PURGE_AMOUNT, MAX_PURGE_AMOUNT};
use crate::discord::events;
use crate::discord::ui;
use poise::serenity_prelude as serenity;

/// Bulk-delete recent messages from this channel
#[poise::command(
    slash_command,
    prefix_command,
    guild_only,
    required_permissions = "MANAGE_MESSAGES",
    required_bot_permissions = "MANAGE_MESSAGES",
    on_error = "clear_error"
)]
pub async fn clear(
    ctx: Context<'_>,
    #[description = "How many messages to delete (1-100, default 5)"] amount: Option<i64>,
) -> Result<(), Error> {
    let locale = &ctx.data().locale;
    let language = events::guild_language(ctx.serenity_context(), locale, ctx.guild_id());

    let requested = amount.unwrap_or(i64::from(DEFAULT_PURGE_AMOUNT));
    let amount = match validate_purge_amount(requested) {
        Ok(amount) => amount,
        Err(_) => {
            let max = MAX_PURGE_AMOUNT.to_string();
            let text = locale.resolve(
                "moderation.clear.invalid_amount",
                &language,
                &[("max", &max)],
            );
            ctx.send(
                poise::CreateReply::default()
                    .embed(ui::error_embed(&text))
                    .ephemeral(true),
            )
            .await?;
            return Ok(());
        }
    };

    // A prefix invocation leaves the `?clear` message itself in the channel,
    // so fetch one extra and sweep it up along with the rest.
    let fetch = match ctx {
        poise::Context::Prefix(_) => (amount + 1).min(MAX_PURGE_AMOUNT),
        poise::Context::Application(_) => amount,
    };

    let messages = ctx
        .channel_id()
        .messages(ctx.http(), serenity::GetMessages::new().limit(fetch as u8))
        .await?;

    // The bulk endpoint rejects batches of fewer than two messages.
    match messages.as_slice() {
        [] => {}
        [only] => {
            ctx.channel_id().delete_message(ctx.http(), only.id).await?;
        }
        _ => {
            ctx.channel_id()
                .delete_messages(ctx.http(), messages.iter().map(|message| message.id))
                .await?;
        }
    }

    tracing::info!(
        channel_id = ctx.channel_id().get(),
        moderator = %ctx.author().name,
        deleted = messages.len(),
        "Cleared messages"
    );

    let count = amount.to_string();
    let text = locale.resolve("moderation.clear.success", &language, &[("count", &count)]);
    ctx.send(
        poise::CreateReply::default()
            .embed(ui::success_embed(&text))
            .ephemeral(true),
    )
    .await?;

    Ok(())
}

/// Command-specific error handler so a denied `/clear` answers with the
/// moderation wording instead of the generic permission text.
async fn clear_error(error: poise::FrameworkError<'_, Data, Error>) {
    match error {
        poise::FrameworkError::MissingUserPermissions { ctx, .. } => {
            let locale = &ctx.data().locale;
            let language =
                events::guild_language(ctx.serenity_context(), locale, ctx.guild_id());
            let text = locale.resolve("moderation.clear.error_permissions", &language, &[]);

            if let Err(e) = ctx
                .send(
                    poise::CreateReply::default()
                        .embed(ui::error_embed(&text))
                        .ephemeral(true),
                )
                .await
            {
                tracing::error!("Failed to send clear permission notice: {e}");
            }
        }
        other => events::on_error(other).await,
    }
}

/// Type alias for our bot's context.
/// This is what every command receives as its first parameter.
pub type Error = Box<dyn std::error::Error + Send + Sync>;
pub type Context<'a> = poise::Context<'a, Data, Error>;

/// Data that's shared across all commands.
/// This is where we store our services and configuration.
use std::sync::Arc;

pub struct Data {
    pub locale: Arc<LocaleResolver>,
}
