// This is the entry point of the link guard bot.
//
// **Architecture Overview:**
// - `core/` = Business logic (platform-agnostic link detection and escalation)
// - `infra/` = Implementations of core traits (the in-memory violation store)
// - `discord/` = Discord-specific adapters (events, platform actions, commands)
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

mod config;

use crate::config::BotConfig;
use crate::core::moderation::LinkGuardService;
use crate::discord::commands::presence;
use crate::discord::moderation::{handle_message_for_links, DiscordModerationActions};
use crate::discord::{Data, Error};
use crate::infra::moderation::InMemoryViolationStore;
use anyhow::Context as _;
use poise::serenity_prelude as serenity;

/// Event handler for non-command Discord events.
async fn event_handler(
    ctx: &serenity::Context,
    event: &serenity::FullEvent,
    _framework: poise::FrameworkContext<'_, Data, Error>,
    data: &Data,
) -> Result<(), Error> {
    if let serenity::FullEvent::Message { new_message } = event {
        // A failure here shouldn't take the event loop down with it
        if let Err(e) = handle_message_for_links(ctx, new_message, data).await {
            tracing::error!(
                message_id = new_message.id.get(),
                "Error running link guard: {}",
                e
            );
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging so we can see what's happening
    tracing_subscriber::fmt::init();

    // Load environment variables from .env file (if it exists)
    dotenv::dotenv().ok();

    let config = BotConfig::from_env()?;
    tracing::info!(
        admins = config.moderation.admin_ids.len(),
        warn_limit = config.moderation.thresholds.warn_limit,
        mute_secs = config.moderation.thresholds.mute_duration_secs,
        "Configuration loaded"
    );

    // ========================================================================
    // DISCORD FRAMEWORK SETUP
    // ========================================================================

    let intents = serenity::GatewayIntents::GUILD_MESSAGES
        | serenity::GatewayIntents::DIRECT_MESSAGES
        | serenity::GatewayIntents::MESSAGE_CONTENT // Required to read message content
        | serenity::GatewayIntents::GUILDS;

    let moderation_config = config.moderation.clone();
    let delete_link_messages = config.delete_link_messages;

    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: vec![
                discord::commands::start::start(),
                discord::moderation::commands::linkguard(),
            ],
            event_handler: |ctx, event, framework, data| {
                Box::pin(event_handler(ctx, event, framework, data))
            },
            ..Default::default()
        })
        .setup(move |ctx, _ready, framework| {
            Box::pin(async move {
                tracing::info!("Bot is starting up...");

                // ============================================================
                // DEPENDENCY INJECTION
                // ============================================================
                // The platform actions need the HTTP client, which only exists
                // once the client is built, so the service is wired here.
                let actions = DiscordModerationActions::new(ctx.http.clone());
                let link_guard = LinkGuardService::new(
                    InMemoryViolationStore::new(),
                    actions,
                    moderation_config,
                )?;

                poise::builtins::register_globally(ctx, &framework.options().commands).await?;
                tracing::info!("Commands registered");

                presence::on_ready(ctx);
                tracing::info!("Bot is ready");

                Ok(Data {
                    link_guard,
                    delete_link_messages,
                })
            })
        })
        .build();

    let mut client = serenity::ClientBuilder::new(&config.discord_token, intents)
        .framework(framework)
        .await
        .context("Error creating client")?;

    client.start().await.context("Error running bot")?;

    Ok(())
}
