// This is the entry point of the Discord bot.
//
// **Architecture Overview:**
// - `core/` = Business logic (platform-agnostic)
// - `infra/` = Implementations of core concerns (filesystem, APIs)
// - `discord/` = Discord-specific adapters (commands, events, UI)
//
// This file's job is to:
// 1. Load configuration
// 2. Initialize services (dependency injection)
// 3. Set up the Discord framework
// 4. Register commands and event handlers

// These attrs point each module declaration at a more descriptive root file
// so we don't end up with half a dozen mod.rs files that all look the same.
#[path = "core/core_layer.rs"]
mod core;
#[path = "discord/discord_layer.rs"]
mod discord;
#[path = "infra/infra_layer.rs"]
mod infra;

use crate::core::locale::{LocaleResolver, DEFAULT_LANGUAGE};
use crate::discord::commands::{help, moderation};
use crate::discord::events;
use crate::discord::{Data, Error};
use crate::infra::locale::load_packs;
use poise::serenity_prelude as serenity;

/// Where the language packs live unless LOCALE_DIR says otherwise.
const DEFAULT_LOCALE_DIR: &str = "locales";

/// Event handler for non-command Discord events.
/// Each arm stays one line of delegation so the full gateway surface is
/// readable at a glance.
async fn event_handler(
    ctx: &serenity::Context,
    event: &serenity::FullEvent,
    _framework: poise::FrameworkContext<'_, Data, Error>,
    data: &Data,
) -> Result<(), Error> {
    match event {
        serenity::FullEvent::Ready { data_about_bot } => {
            events::handle_ready(ctx, data_about_bot);
        }
        serenity::FullEvent::CacheReady { guilds } => {
            tracing::info!(
                guilds = guilds.len(),
                cached_users = ctx.cache.user_count(),
                "Cache ready"
            );
        }
        serenity::FullEvent::Resume { .. } => {
            tracing::info!("Gateway connection resumed");
        }
        serenity::FullEvent::Message { new_message } => {
            events::handle_message(new_message);
        }
        serenity::FullEvent::MessageDelete {
            channel_id,
            deleted_message_id,
            guild_id,
        } => {
            events::handle_message_delete(ctx, *channel_id, *deleted_message_id, *guild_id);
        }
        serenity::FullEvent::MessageUpdate {
            old_if_available,
            new: _,
            event,
        } => {
            events::handle_message_update(old_if_available.as_ref(), event);
        }
        serenity::FullEvent::GuildMemberAddition { new_member } => {
            if let Err(e) = events::handle_member_join(ctx, data, new_member).await {
                tracing::error!("Error handling member join: {}", e);
            }
        }
        serenity::FullEvent::GuildMemberRemoval { guild_id, user, .. } => {
            events::handle_member_removal(*guild_id, user);
        }
        serenity::FullEvent::GuildCreate { guild, is_new } => {
            if let Err(e) = events::handle_guild_create(ctx, data, guild, *is_new).await {
                tracing::error!("Error handling guild create: {}", e);
            }
        }
        serenity::FullEvent::GuildDelete { incomplete, full } => {
            events::handle_guild_delete(incomplete, full.as_ref());
        }
        serenity::FullEvent::GuildBanAddition {
            guild_id,
            banned_user,
        } => {
            events::handle_ban(*guild_id, banned_user);
        }
        serenity::FullEvent::GuildBanRemoval {
            guild_id,
            unbanned_user,
        } => {
            events::handle_unban(*guild_id, unbanned_user);
        }
        serenity::FullEvent::VoiceStateUpdate { old, new } => {
            events::handle_voice_state_update(old.as_ref(), new);
        }
        serenity::FullEvent::ReactionAdd { add_reaction } => {
            events::handle_reaction_add(ctx, add_reaction);
        }
        serenity::FullEvent::ReactionRemove { removed_reaction } => {
            events::handle_reaction_remove(ctx, removed_reaction);
        }
        _ => {}
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    // Initialize logging so we can see what's happening
    tracing_subscriber::fmt::init();

    // Load environment variables from .env file (if it exists)
    dotenv::dotenv().ok();

    // Get Discord bot token from environment
    let token = std::env::var("DISCORD_TOKEN").expect(
        "Missing DISCORD_TOKEN environment variable! Create a .env file with your bot token.",
    );

    // ========================================================================
    // DEPENDENCY INJECTION
    // ========================================================================
    // Load the language packs and wire the resolver into the shared Data.
    // This is the "composition root" where everything comes together.

    use std::sync::Arc;

    let locale_dir =
        std::env::var("LOCALE_DIR").unwrap_or_else(|_| DEFAULT_LOCALE_DIR.to_string());
    std::fs::create_dir_all(&locale_dir).expect("Failed to create the language pack directory");
    let packs = load_packs(std::path::Path::new(&locale_dir))
        .expect("Failed to read the language pack directory");

    let locale = LocaleResolver::new(packs);
    if !locale.has_language(DEFAULT_LANGUAGE) {
        tracing::warn!(
            "No '{DEFAULT_LANGUAGE}' language pack in {locale_dir}; \
             fallback answers will be key diagnostics"
        );
    }
    tracing::info!(
        languages = %locale.languages().collect::<Vec<_>>().join(", "),
        "Language packs loaded"
    );

    // Create the data structure that will be shared across all commands
    let data = Data {
        locale: Arc::new(locale),
    };

    // ========================================================================
    // DISCORD FRAMEWORK SETUP
    // ========================================================================
    // Configure the poise framework with our commands and settings.

    let intents = serenity::GatewayIntents::GUILDS
        | serenity::GatewayIntents::GUILD_MEMBERS
        | serenity::GatewayIntents::GUILD_MESSAGES
        | serenity::GatewayIntents::MESSAGE_CONTENT // Required to read message content
        | serenity::GatewayIntents::GUILD_MESSAGE_REACTIONS
        | serenity::GatewayIntents::GUILD_VOICE_STATES
        | serenity::GatewayIntents::GUILD_MODERATION;

    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            // Register all our commands here
            commands: vec![moderation::clear(), help::help()],
            prefix_options: poise::PrefixFrameworkOptions {
                prefix: Some("?".into()),
                case_insensitive_commands: true,
                ..Default::default()
            },
            // Event handler for messages and other events
            event_handler: |ctx, event, framework, data| {
                Box::pin(event_handler(ctx, event, framework, data))
            },
            // Every command error funnels through the localized hook
            on_error: |error| Box::pin(events::on_error(error)),
            ..Default::default()
        })
        .setup(|ctx, _ready, framework| {
            Box::pin(async move {
                // Register slash commands globally (can take up to an hour to
                // propagate; use register_in_guild for faster development)
                poise::builtins::register_globally(ctx, &framework.options().commands).await?;
                tracing::info!("Commands registered");

                Ok(data)
            })
        })
        .build();

    // Keep recent messages cached so delete/edit events still have content
    let mut settings = serenity::cache::Settings::default();
    settings.max_messages = 10000;

    let mut client = serenity::ClientBuilder::new(token, intents)
        .framework(framework)
        .cache_settings(settings)
        .await
        .expect("Error creating client");

    client.start().await.expect("Error running bot");
}
