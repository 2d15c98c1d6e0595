// This is the entry point of the Discord bot.
//
// **Architecture Overview:**
// - `core/` = Business logic (platform-agnostic)
// - `infra/` = Implementations of core traits (databases, APIs)
// - `discord/` = Discord-specific adapters (commands, events)
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
use crate::core::fun::FactService;
use crate::core::humor::{HumorConfig, HumorService};
use crate::core::moderation::ModerationService;
use crate::discord::reaction_trigger;
use crate::discord::{Data, Error};
use crate::infra::fun::UselessFactsClient;
use crate::infra::humor::DeepSeekClient;
use crate::infra::moderation::SqliteModerationStore;
use dashmap::DashSet;
use poise::serenity_prelude as serenity;
use std::sync::Arc;
use std::time::Instant;

/// Event handler for non-command Discord events.
/// This is where the 🤡 reaction trigger lives.
async fn event_handler(
    ctx: &serenity::Context,
    event: &serenity::FullEvent,
    _framework: poise::FrameworkContext<'_, Data, Error>,
    data: &Data,
) -> Result<(), Error> {
    match event {
        serenity::FullEvent::Ready { data_about_bot } => {
            tracing::info!(
                user = %data_about_bot.user.name,
                guilds = data_about_bot.guilds.len(),
                "Connected to the gateway"
            );
        }
        serenity::FullEvent::ReactionAdd { add_reaction } => {
            if let Err(err) =
                reaction_trigger::handle_reaction_add(ctx, data, add_reaction).await
            {
                tracing::error!("Reaction-triggered analysis failed: {}", err);
            }
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

    let config = BotConfig::from_env().unwrap_or_else(|err| {
        eprintln!("Configuration error: {err}");
        std::process::exit(1);
    });
    let config = Arc::new(config);

    // Keep the runtime database in a dedicated folder so the repo root stays tidy.
    if let Some(parent) = std::path::Path::new(&config.database_path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).expect("Failed to create the database directory");
        }
    }

    // ========================================================================
    // DEPENDENCY INJECTION
    // ========================================================================
    // Create our services with their dependencies.
    // This is the "composition root" where we wire everything together.

    let moderation_store = SqliteModerationStore::new(&config.database_path)
        .await
        .expect("Failed to initialize the SQLite store");
    let moderation_service = Arc::new(ModerationService::new(moderation_store));

    if config.deepseek_api_key.is_none() {
        tracing::warn!("DEEPSEEK_API_KEY is not set - joke analysis will be unavailable");
    }
    let humor_client = DeepSeekClient::new(config.deepseek_api_key.clone());
    let humor_config = HumorConfig {
        model: config.deepseek_model.clone(),
        ..HumorConfig::default()
    };
    let humor_service = Arc::new(HumorService::new(humor_client, humor_config));

    let fact_service = Arc::new(FactService::new(UselessFactsClient::new()));

    // Create the data structure that will be shared across all commands
    let data = Data {
        config: Arc::clone(&config),
        humor: Arc::clone(&humor_service),
        moderation: Arc::clone(&moderation_service),
        facts: Arc::clone(&fact_service),
        analysis_in_flight: DashSet::new(),
        started_at: Instant::now(),
    };

    // ========================================================================
    // DISCORD FRAMEWORK SETUP
    // ========================================================================
    // Configure the poise framework with our commands and settings.

    let intents = serenity::GatewayIntents::GUILDS
        | serenity::GatewayIntents::GUILD_MESSAGES
        | serenity::GatewayIntents::GUILD_MESSAGE_REACTIONS
        | serenity::GatewayIntents::MESSAGE_CONTENT; // Required to read message content

    let setup_config = Arc::clone(&config);

    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            // Register all our commands here
            commands: vec![
                discord::commands::general::help(),
                discord::commands::general::ping(),
                discord::commands::general::botinfo(),
                discord::commands::general::serverinfo(),
                discord::commands::general::invite(),
                discord::commands::fun::coinflip(),
                discord::commands::fun::rps(),
                discord::commands::fun::randomfact(),
                discord::commands::humor::analyzejoke(),
                discord::commands::moderation::kick(),
                discord::commands::moderation::ban(),
                discord::commands::moderation::nick(),
                discord::commands::moderation::purge(),
                discord::commands::moderation::warning(),
                discord::commands::owner::say(),
                discord::commands::owner::embed(),
                discord::commands::owner::blacklist(),
                discord::commands::owner::register(),
                discord::commands::owner::shutdown(),
            ],
            prefix_options: poise::PrefixFrameworkOptions {
                prefix: Some(config.prefix.clone()),
                ..Default::default()
            },
            // Event handler for reactions and other events
            event_handler: |ctx, event, framework, data| {
                Box::pin(event_handler(ctx, event, framework, data))
            },
            // Blacklisted users are refused before any command runs.
            // Owners are exempt so they can always un-blacklist.
            command_check: Some(|ctx| {
                Box::pin(async move {
                    if ctx.framework().options().owners.contains(&ctx.author().id) {
                        return Ok(true);
                    }
                    match ctx
                        .data()
                        .moderation
                        .is_blacklisted(ctx.author().id.get())
                        .await
                    {
                        Ok(blacklisted) => Ok(!blacklisted),
                        Err(err) => {
                            // Fail open - a broken store shouldn't brick the bot
                            tracing::error!("Blacklist check failed: {}", err);
                            Ok(true)
                        }
                    }
                })
            }),
            pre_command: |ctx| {
                Box::pin(async move {
                    tracing::info!(
                        command = %ctx.command().qualified_name,
                        user = %ctx.author().name,
                        "Command invoked"
                    );
                })
            },
            post_command: |ctx| {
                Box::pin(async move {
                    tracing::debug!(
                        command = %ctx.command().qualified_name,
                        "Command completed"
                    );
                })
            },
            on_error: |error| {
                Box::pin(async move {
                    if let Err(err) = poise::builtins::on_error(error).await {
                        tracing::error!("Error while handling error: {}", err);
                    }
                })
            },
            ..Default::default()
        })
        .setup(move |ctx, _ready, framework| {
            Box::pin(async move {
                // Register slash commands. Global registration can take up to
                // an hour to propagate, so during development TEST_GUILD_ID
                // scopes them to one guild where updates land instantly.
                match setup_config.test_guild_id {
                    Some(guild_id) => {
                        poise::builtins::register_in_guild(
                            ctx,
                            &framework.options().commands,
                            serenity::GuildId::new(guild_id),
                        )
                        .await?;
                        tracing::info!(guild_id, "Commands registered in test guild");
                    }
                    None => {
                        poise::builtins::register_globally(ctx, &framework.options().commands)
                            .await?;
                        tracing::info!("Commands registered globally");
                    }
                }

                ctx.set_activity(Some(serenity::ActivityData::watching("for 🤡 reactions")));
                tracing::info!("Bot is ready");

                Ok(data)
            })
        })
        .build();

    // Create the client and start the bot
    let mut client = serenity::ClientBuilder::new(&config.discord_token, intents)
        .framework(framework)
        .await
        .expect("Error creating client");

    // Ctrl-C takes the gateway down cleanly instead of dropping the connection
    let shard_manager = client.shard_manager.clone();
    tokio::spawn(async move {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to listen for ctrl-c");
        tracing::info!("Shutting down");
        shard_manager.shutdown_all().await;
    });

    client.start().await.expect("Error running bot");
}
