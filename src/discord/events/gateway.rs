// Gateway event handlers and the command error hook.
//
// Handlers that only observe (deletes, edits, voice moves, reactions) log and
// return. Handlers that talk back to Discord (welcome messages, owner DMs,
// error replies) resolve their text through the locale resolver first, using
// the guild's preferred locale when the cache knows it.

use crate::core::locale::LocaleResolver;
use crate::discord::ui;
use crate::discord::{Data, Error};
use anyhow::Result;
use poise::serenity_prelude::{self as serenity, Context, Mentionable};

/// Channel the welcome message goes to when a guild has one.
const WELCOME_CHANNEL: &str = "welcome";

/// Longest slice of user content that ends up in the logs.
const PREVIEW_CHARS: usize = 100;

/// Maps a guild to a language the resolver knows, falling back to the
/// default language for DMs and uncached guilds.
pub fn guild_language(
    ctx: &Context,
    locale: &LocaleResolver,
    guild_id: Option<serenity::GuildId>,
) -> String {
    let tag = guild_id.and_then(|id| {
        ctx.cache
            .guild(id)
            .map(|guild| guild.preferred_locale.clone())
    });

    match tag {
        Some(tag) => locale.match_tag(&tag).to_string(),
        None => locale.default_language().to_string(),
    }
}

pub fn handle_ready(ctx: &Context, ready: &serenity::Ready) {
    let guild_count = ready.guilds.len();
    tracing::info!(
        user = %ready.user.tag(),
        user_id = ready.user.id.get(),
        guilds = guild_count,
        "Bot is connected"
    );

    let activity = serenity::ActivityData::playing(format!("?help | {guild_count} servers"));
    ctx.set_presence(Some(activity), serenity::OnlineStatus::Online);
}

pub fn handle_message(new_message: &serenity::Message) {
    // Bot traffic (including our own replies) stays out of the logs.
    if new_message.author.bot {
        return;
    }

    tracing::debug!(
        author = %new_message.author.name,
        channel_id = new_message.channel_id.get(),
        "Message received"
    );
}

pub fn handle_message_delete(
    ctx: &Context,
    channel_id: serenity::ChannelId,
    message_id: serenity::MessageId,
    guild_id: Option<serenity::GuildId>,
) {
    if guild_id.is_none() {
        return;
    }

    // The cache may have already dropped the message; log what we still have.
    let snapshot = ctx
        .cache
        .message(channel_id, message_id)
        .map(|message| (message.author.name.clone(), message.author.bot, message.content.clone()));

    match snapshot {
        Some((_, true, _)) => {}
        Some((author, false, content)) => tracing::info!(
            channel_id = channel_id.get(),
            author = %author,
            content = %preview(&content),
            "Message deleted"
        ),
        None => tracing::debug!(
            channel_id = channel_id.get(),
            message_id = message_id.get(),
            "Message deleted (content not cached)"
        ),
    }
}

pub fn handle_message_update(
    old: Option<&serenity::Message>,
    event: &serenity::MessageUpdateEvent,
) {
    if event.guild_id.is_none() {
        return;
    }

    // Embed unfurls and pin changes arrive without a content field.
    let Some(new_content) = &event.content else {
        return;
    };

    if let Some(author) = &event.author {
        if author.bot {
            return;
        }
    }

    let Some(old_message) = old else {
        tracing::debug!(
            message_id = event.id.get(),
            channel_id = event.channel_id.get(),
            "Message edited (original not cached)"
        );
        return;
    };

    if old_message.author.bot || old_message.content == *new_content {
        return;
    }

    tracing::info!(
        channel_id = event.channel_id.get(),
        author = %old_message.author.name,
        before = %preview(&old_message.content),
        after = %preview(new_content),
        "Message edited"
    );
}

/// Greets a new member in the guild's welcome channel, in the guild's
/// language.
pub async fn handle_member_join(ctx: &Context, data: &Data, member: &serenity::Member) -> Result<()> {
    tracing::info!(
        guild_id = member.guild_id.get(),
        user = %member.user.name,
        "Member joined"
    );

    let Some(channel_id) = welcome_channel(ctx, member.guild_id).await else {
        return Ok(());
    };

    let language = guild_language(ctx, &data.locale, Some(member.guild_id));
    let mention = member.mention().to_string();
    let title = data.locale.resolve("welcome.title", &language, &[]);
    let text = data
        .locale
        .resolve("welcome.message", &language, &[("user", &mention)]);

    channel_id
        .send_message(
            &ctx.http,
            serenity::CreateMessage::new().embed(ui::info_embed(&title, &text)),
        )
        .await?;

    Ok(())
}

pub fn handle_member_removal(guild_id: serenity::GuildId, user: &serenity::User) {
    tracing::info!(guild_id = guild_id.get(), user = %user.name, "Member left");
}

/// Thanks the owner by DM when the bot is added to a guild. A closed DM is
/// normal and only worth a debug line.
pub async fn handle_guild_create(
    ctx: &Context,
    data: &Data,
    guild: &serenity::Guild,
    is_new: Option<bool>,
) -> Result<()> {
    if is_new != Some(true) {
        return Ok(());
    }

    tracing::info!(
        guild_id = guild.id.get(),
        name = %guild.name,
        members = guild.member_count,
        "Joined a new guild"
    );

    let language = data.locale.match_tag(&guild.preferred_locale).to_string();
    let title = data.locale.resolve("guild_join.title", &language, &[]);
    let text = data.locale.resolve("guild_join.message", &language, &[]);

    match guild.owner_id.create_dm_channel(&ctx.http).await {
        Ok(channel) => {
            if let Err(e) = channel
                .send_message(
                    &ctx.http,
                    serenity::CreateMessage::new().embed(ui::info_embed(&title, &text)),
                )
                .await
            {
                tracing::debug!("Could not DM the owner of {}: {e}", guild.id.get());
            }
        }
        Err(e) => tracing::debug!("Could not open a DM with the owner of {}: {e}", guild.id.get()),
    }

    Ok(())
}

pub fn handle_guild_delete(
    incomplete: &serenity::UnavailableGuild,
    full: Option<&serenity::Guild>,
) {
    // An outage marks the guild unavailable without removing the bot.
    if incomplete.unavailable {
        tracing::warn!(guild_id = incomplete.id.get(), "Guild became unavailable");
        return;
    }

    match full {
        Some(guild) => {
            tracing::info!(guild_id = guild.id.get(), name = %guild.name, "Removed from guild")
        }
        None => tracing::info!(guild_id = incomplete.id.get(), "Removed from guild"),
    }
}

pub fn handle_ban(guild_id: serenity::GuildId, user: &serenity::User) {
    tracing::info!(guild_id = guild_id.get(), user = %user.name, "Member banned");
}

pub fn handle_unban(guild_id: serenity::GuildId, user: &serenity::User) {
    tracing::info!(guild_id = guild_id.get(), user = %user.name, "Member unbanned");
}

pub fn handle_voice_state_update(
    old: Option<&serenity::VoiceState>,
    new: &serenity::VoiceState,
) {
    let old_channel = old.and_then(|state| state.channel_id);
    let new_channel = new.channel_id;
    if old_channel == new_channel {
        return;
    }

    let user_id = new.user_id.get();
    match (old_channel, new_channel) {
        (None, Some(joined)) => {
            tracing::debug!(user_id, channel_id = joined.get(), "User joined voice channel")
        }
        (Some(left), None) => {
            tracing::debug!(user_id, channel_id = left.get(), "User left voice channel")
        }
        (Some(from), Some(to)) => tracing::debug!(
            user_id,
            from = from.get(),
            to = to.get(),
            "User moved voice channels"
        ),
        (None, None) => {}
    }
}

pub fn handle_reaction_add(ctx: &Context, reaction: &serenity::Reaction) {
    if is_bot_reaction(ctx, reaction) {
        return;
    }

    tracing::debug!(
        message_id = reaction.message_id.get(),
        emoji = %reaction.emoji,
        "Reaction added"
    );
}

pub fn handle_reaction_remove(ctx: &Context, reaction: &serenity::Reaction) {
    if is_bot_reaction(ctx, reaction) {
        return;
    }

    tracing::debug!(
        message_id = reaction.message_id.get(),
        emoji = %reaction.emoji,
        "Reaction removed"
    );
}

fn is_bot_reaction(ctx: &Context, reaction: &serenity::Reaction) -> bool {
    reaction
        .user_id
        .and_then(|id| ctx.cache.user(id).map(|user| user.bot))
        .unwrap_or(false)
}

/// Central command error hook. Every user-visible path answers with a
/// localized embed; anything unexpected falls through to poise's handler.
pub async fn on_error(error: poise::FrameworkError<'_, Data, Error>) {
    match error {
        poise::FrameworkError::Command { error, ctx, .. } => {
            tracing::error!(
                command = %ctx.command().qualified_name,
                "Command failed: {error:?}"
            );
            let text = error.to_string();
            reply_error(ctx, "error.generic", &[("error", &text)]).await;
        }
        poise::FrameworkError::CooldownHit {
            remaining_cooldown,
            ctx,
            ..
        } => {
            // Whole seconds, rounded up, so we never promise "0s".
            let seconds = (remaining_cooldown.as_secs()
                + u64::from(remaining_cooldown.subsec_nanos() > 0))
            .max(1)
            .to_string();
            reply_error(ctx, "error.cooldown", &[("retry_after", &seconds)]).await;
        }
        poise::FrameworkError::MissingBotPermissions { ctx, .. } => {
            reply_error(ctx, "error.bot_missing_perms", &[]).await;
        }
        poise::FrameworkError::MissingUserPermissions { ctx, .. } => {
            reply_error(ctx, "error.missing_perms", &[]).await;
        }
        poise::FrameworkError::GuildOnly { ctx, .. } => {
            reply_error(ctx, "error.guild_only", &[]).await;
        }
        // Unrecognized prefix invocations are just chatter.
        poise::FrameworkError::UnknownCommand { .. } => {}
        other => {
            if let Err(e) = poise::builtins::on_error(other).await {
                tracing::error!("Error while handling error: {e}");
            }
        }
    }
}

async fn reply_error(ctx: poise::Context<'_, Data, Error>, key: &str, params: &[(&str, &str)]) {
    let locale = &ctx.data().locale;
    let language = guild_language(ctx.serenity_context(), locale, ctx.guild_id());
    let text = locale.resolve(key, &language, params);

    if let Err(e) = ctx
        .send(
            poise::CreateReply::default()
                .embed(ui::error_embed(&text))
                .ephemeral(true),
        )
        .await
    {
        tracing::error!("Failed to send error notice: {e}");
    }
}

/// The greeting goes to the text channel named [`WELCOME_CHANNEL`] and
/// nowhere else; a guild without one gets no greeting.
async fn welcome_channel(ctx: &Context, guild_id: serenity::GuildId) -> Option<serenity::ChannelId> {
    // Cache first. The guard must not cross an await, so copy the id out.
    if let Some(guild) = ctx.cache.guild(guild_id) {
        return pick_welcome_channel(
            guild
                .channels
                .values()
                .map(|channel| (channel.id, channel.kind, channel.name.as_str())),
        );
    }

    let channels = guild_id.channels(&ctx.http).await.ok()?;
    pick_welcome_channel(
        channels
            .values()
            .map(|channel| (channel.id, channel.kind, channel.name.as_str())),
    )
}

fn pick_welcome_channel<'a, I>(channels: I) -> Option<serenity::ChannelId>
where
    I: IntoIterator<Item = (serenity::ChannelId, serenity::ChannelType, &'a str)>,
{
    channels
        .into_iter()
        .find(|(_, kind, name)| *kind == serenity::ChannelType::Text && *name == WELCOME_CHANNEL)
        .map(|(id, _, _)| id)
}

/// Char-safe truncation so multi-byte content never splits mid-character.
fn preview(content: &str) -> String {
    if content.chars().count() <= PREVIEW_CHARS {
        return content.to_string();
    }

    let mut cut: String = content.chars().take(PREVIEW_CHARS).collect();
    cut.push_str("...");
    cut
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_content_passes_through_untruncated() {
        assert_eq!(preview("hello"), "hello");
    }

    #[test]
    fn long_content_is_cut_with_ellipsis() {
        let content = "x".repeat(250);
        let cut = preview(&content);
        assert_eq!(cut.chars().count(), PREVIEW_CHARS + 3);
        assert!(cut.ends_with("..."));
    }

    #[test]
    fn truncation_respects_multibyte_characters() {
        let content = "ж".repeat(150);
        let cut = preview(&content);
        assert_eq!(cut.chars().count(), PREVIEW_CHARS + 3);
        assert!(cut.starts_with('ж'));
    }

    #[test]
    fn greeting_targets_the_text_channel_named_welcome() {
        let channels = [
            (serenity::ChannelId::new(1), serenity::ChannelType::Voice, "welcome"),
            (serenity::ChannelId::new(2), serenity::ChannelType::Text, "general"),
            (serenity::ChannelId::new(3), serenity::ChannelType::Text, "welcome"),
        ];
        assert_eq!(
            pick_welcome_channel(channels),
            Some(serenity::ChannelId::new(3))
        );
    }

    #[test]
    fn guild_without_welcome_channel_gets_no_greeting_target() {
        let channels = [
            (serenity::ChannelId::new(1), serenity::ChannelType::Text, "general"),
            (serenity::ChannelId::new(2), serenity::ChannelType::Text, "announcements"),
        ];
        assert_eq!(pick_welcome_channel(channels), None);
    }
}
