// General-purpose commands: help, ping, botinfo, serverinfo, invite.
//
// This file also owns the shared framework types (`Data`, `Error`,
// `Context`) that every command receives.

use crate::config::BotConfig;
use crate::core::fun::FactService;
use crate::core::humor::HumorService;
use crate::core::moderation::ModerationService;
use crate::infra::fun::UselessFactsClient;
use crate::infra::humor::DeepSeekClient;
use crate::infra::moderation::SqliteModerationStore;
use dashmap::DashSet;
use poise::serenity_prelude as serenity;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

pub type Error = Box<dyn std::error::Error + Send + Sync>;
pub type Context<'a> = poise::Context<'a, Data, Error>;

/// Data that's shared across all commands.
/// This is where we store our services and configuration.
pub struct Data {
    pub config: Arc<BotConfig>,
    pub humor: Arc<HumorService<DeepSeekClient>>,
    pub moderation: Arc<ModerationService<SqliteModerationStore>>,
    pub facts: Arc<FactService<UselessFactsClient>>,
    /// Message ids currently being analyzed via the reaction trigger, so a
    /// pile-on of 🤡 reactions produces one reply instead of many.
    pub analysis_in_flight: DashSet<u64>,
    pub started_at: Instant,
}

const EMBED_COLOR: u32 = 0x5865F2; // Discord blurple

// Category definitions with display order
const CATEGORY_ORDER: &[&str] = &["Getting Started", "Fun & Games", "Moderation", "Owner"];

fn get_category_emoji(category: &str) -> &'static str {
    match category {
        "Getting Started" => "👋",
        "Fun & Games" => "🎲",
        "Moderation" => "🛡️",
        "Owner" => "🔑",
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
        "botinfo" => CommandMetadata {
            category: "Getting Started",
            priority: 90,
            note: None,
        },
        "serverinfo" => CommandMetadata {
            category: "Getting Started",
            priority: 80,
            note: None,
        },
        "ping" => CommandMetadata {
            category: "Getting Started",
            priority: 70,
            note: None,
        },
        "invite" => CommandMetadata {
            category: "Getting Started",
            priority: 60,
            note: None,
        },
        "analyzejoke" => CommandMetadata {
            category: "Fun & Games",
            priority: 90,
            note: Some("Also triggered by reacting to a message with 🤡."),
        },
        "randomfact" => CommandMetadata {
            category: "Fun & Games",
            priority: 70,
            note: None,
        },
        "coinflip" => CommandMetadata {
            category: "Fun & Games",
            priority: 60,
            note: None,
        },
        "rps" => CommandMetadata {
            category: "Fun & Games",
            priority: 50,
            note: None,
        },
        "warning" => CommandMetadata {
            category: "Moderation",
            priority: 80,
            note: Some("Subcommands: add, remove, list"),
        },
        "kick" => CommandMetadata {
            category: "Moderation",
            priority: 70,
            note: None,
        },
        "ban" => CommandMetadata {
            category: "Moderation",
            priority: 60,
            note: None,
        },
        "nick" => CommandMetadata {
            category: "Moderation",
            priority: 50,
            note: None,
        },
        "purge" => CommandMetadata {
            category: "Moderation",
            priority: 40,
            note: None,
        },
        "say" | "embed" | "blacklist" | "register" | "shutdown" => CommandMetadata {
            category: "Owner",
            priority: 0,
            note: Some("Owner only."),
        },
        _ => CommandMetadata {
            category: "Getting Started",
            priority: 0,
            note: None,
        },
    }
}

/// Show a categorized list of commands.
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

        let mut entry = format!("• **/{}** — {}", command.name, description);
        if let Some(note) = metadata.note {
            entry.push_str(&format!("\n  ⤷ {}", note));
        }

        categories
            .entry(metadata.category)
            .or_default()
            .push((metadata.priority, entry));
    }

    let mut embed = serenity::CreateEmbed::new()
        .title("Mortis Command Guide")
        .description(format!(
            "Use slash commands with `/`, or prefix them with `{}`.",
            ctx.data().config.prefix
        ))
        .color(EMBED_COLOR)
        .timestamp(serenity::Timestamp::now());

    if let Ok(user) = ctx.framework().bot_id.to_user(&ctx).await {
        embed = embed.thumbnail(user.face());
    }

    let mut sorted_categories: Vec<_> = categories.keys().cloned().collect();
    sorted_categories.sort_by_key(|c| CATEGORY_ORDER.iter().position(|&x| x == *c).unwrap_or(999));

    for category in sorted_categories {
        if let Some(entries) = categories.get_mut(category) {
            // Highest priority first, then name
            entries.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));

            let formatted: Vec<String> = entries.iter().map(|(_, s)| s.clone()).collect();
            let title = format!("{} {}", get_category_emoji(category), category);

            // Chunk entries to avoid hitting the 1024 char limit per field
            for (i, chunk) in chunk_entries(&formatted).iter().enumerate() {
                let field_name = if i == 0 {
                    title.clone()
                } else {
                    format!("{} (cont.)", title)
                };
                embed = embed.field(field_name, chunk.join("\n"), false);
            }
        }
    }

    ctx.send(poise::CreateReply::default().embed(embed)).await?;
    Ok(())
}

fn chunk_entries(entries: &[String]) -> Vec<Vec<String>> {
    let mut chunks = Vec::new();
    let mut current_chunk = Vec::new();
    let mut current_length = 0;

    for entry in entries {
        let entry_len = entry.len();
        // Discord field value limit is 1024. We leave a bit of buffer.
        if current_length + entry_len + 1 > 1000 && !current_chunk.is_empty() {
            chunks.push(current_chunk);
            current_chunk = Vec::new();
            current_length = 0;
        }

        current_chunk.push(entry.clone());
        current_length += entry_len + 1;
    }

    if !current_chunk.is_empty() {
        chunks.push(current_chunk);
    }

    chunks
}

/// Check the bot's gateway latency.
#[poise::command(slash_command, prefix_command)]
pub async fn ping(ctx: Context<'_>) -> Result<(), Error> {
    let gateway_latency = ctx.ping().await;

    let reply = if gateway_latency.is_zero() {
        // The first heartbeat hasn't been acknowledged yet
        "🏓 Pong! Gateway latency not measured yet, try again in a moment.".to_string()
    } else {
        format!("🏓 Pong! Gateway latency: **{}ms**", gateway_latency.as_millis())
    };

    ctx.say(reply).await?;
    Ok(())
}

/// Show information about the bot.
#[poise::command(slash_command, prefix_command)]
pub async fn botinfo(ctx: Context<'_>) -> Result<(), Error> {
    let guild_count = ctx.serenity_context().cache.guild_count();
    let uptime = format_uptime(ctx.data().started_at.elapsed());

    let mut embed = serenity::CreateEmbed::new()
        .title("About Mortis")
        .description("A Discord bot starter written in Rust on top of poise and serenity.")
        .color(EMBED_COLOR)
        .field("Version", env!("CARGO_PKG_VERSION"), true)
        .field("Servers", guild_count.to_string(), true)
        .field("Uptime", uptime, true)
        .field(
            "Library",
            "[poise](https://github.com/serenity-rs/poise) / [serenity](https://github.com/serenity-rs/serenity)",
            false,
        )
        .timestamp(serenity::Timestamp::now());

    if let Ok(user) = ctx.framework().bot_id.to_user(&ctx).await {
        embed = embed.thumbnail(user.face());
    }

    ctx.send(poise::CreateReply::default().embed(embed)).await?;
    Ok(())
}

/// Show information about this server.
#[poise::command(slash_command, prefix_command, guild_only)]
pub async fn serverinfo(ctx: Context<'_>) -> Result<(), Error> {
    // Pull everything we need out of the cache guard before awaiting
    let (name, member_count, owner_id, created_at, icon_url) = {
        let guild = ctx.guild().ok_or("This command only works in servers")?;
        (
            guild.name.clone(),
            guild.member_count,
            guild.owner_id,
            guild.id.created_at(),
            guild.icon_url(),
        )
    };

    let mut embed = serenity::CreateEmbed::new()
        .title(name)
        .color(EMBED_COLOR)
        .field("Members", member_count.to_string(), true)
        .field("Owner", format!("<@{}>", owner_id), true)
        .field(
            "Created",
            format!("<t:{}:F>", created_at.unix_timestamp()),
            false,
        )
        .timestamp(serenity::Timestamp::now());

    if let Some(icon_url) = icon_url {
        embed = embed.thumbnail(icon_url);
    }

    ctx.send(poise::CreateReply::default().embed(embed)).await?;
    Ok(())
}

/// Get an invite link to add the bot to your own server.
#[poise::command(slash_command, prefix_command)]
pub async fn invite(ctx: Context<'_>) -> Result<(), Error> {
    let url = format!(
        "https://discord.com/api/oauth2/authorize?client_id={}&permissions=8&scope=bot%20applications.commands",
        ctx.framework().bot_id
    );

    ctx.send(
        poise::CreateReply::default()
            .content(format!("Invite me with this link: <{}>", url))
            .ephemeral(true),
    )
    .await?;
    Ok(())
}

fn format_uptime(elapsed: std::time::Duration) -> String {
    let total_secs = elapsed.as_secs();
    let days = total_secs / 86_400;
    let hours = (total_secs % 86_400) / 3_600;
    let minutes = (total_secs % 3_600) / 60;
    let seconds = total_secs % 60;

    if days > 0 {
        format!("{}d {}h {}m", days, hours, minutes)
    } else if hours > 0 {
        format!("{}h {}m", hours, minutes)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, seconds)
    } else {
        format!("{}s", seconds)
    }
}
