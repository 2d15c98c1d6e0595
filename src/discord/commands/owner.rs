// Owner-only commands: speaking through the bot, the blacklist, command
// registration, shutdown.

use crate::discord::{Context, Error};
use poise::serenity_prelude as serenity;

/// Make the bot say something in this channel.
#[poise::command(slash_command, prefix_command, owners_only)]
pub async fn say(
    ctx: Context<'_>,
    #[description = "What to say"]
    #[rest]
    message: String,
) -> Result<(), Error> {
    ctx.channel_id().say(ctx.http(), message).await?;
    ctx.send(
        poise::CreateReply::default()
            .content("📣 Sent.")
            .ephemeral(true),
    )
    .await?;
    Ok(())
}

/// Make the bot say something in an embed.
#[poise::command(slash_command, prefix_command, owners_only)]
pub async fn embed(
    ctx: Context<'_>,
    #[description = "What to say"]
    #[rest]
    message: String,
) -> Result<(), Error> {
    let embed = serenity::CreateEmbed::new()
        .description(message)
        .color(0x5865F2);

    ctx.channel_id()
        .send_message(ctx.http(), serenity::CreateMessage::new().embed(embed))
        .await?;
    ctx.send(
        poise::CreateReply::default()
            .content("📣 Sent.")
            .ephemeral(true),
    )
    .await?;
    Ok(())
}

/// Manage which users are barred from using the bot.
#[poise::command(
    slash_command,
    prefix_command,
    owners_only,
    subcommands("show", "blacklist_add", "blacklist_remove"),
    subcommand_required
)]
pub async fn blacklist(_ctx: Context<'_>) -> Result<(), Error> {
    Ok(())
}

/// Show all blacklisted users.
#[poise::command(slash_command, prefix_command, owners_only, rename = "show")]
pub async fn show(ctx: Context<'_>) -> Result<(), Error> {
    let entries = ctx.data().moderation.blacklist().await?;

    if entries.is_empty() {
        ctx.say("The blacklist is empty.").await?;
        return Ok(());
    }

    let lines: Vec<String> = entries
        .iter()
        .map(|e| format!("• <@{}> — since <t:{}:R>", e.user_id, e.created_at.timestamp()))
        .collect();

    let embed = serenity::CreateEmbed::new()
        .title("🚫 Blacklisted users")
        .description(lines.join("\n"))
        .color(0x992D22);

    ctx.send(poise::CreateReply::default().embed(embed)).await?;
    Ok(())
}

/// Blacklist a user.
#[poise::command(slash_command, prefix_command, owners_only, rename = "add")]
pub async fn blacklist_add(
    ctx: Context<'_>,
    #[description = "User to blacklist"] user: serenity::User,
) -> Result<(), Error> {
    if user.id == ctx.framework().bot_id {
        ctx.say("❌ I refuse to blacklist myself.").await?;
        return Ok(());
    }

    if ctx.data().moderation.blacklist_add(user.id.get()).await? {
        tracing::info!(user_id = user.id.get(), "User blacklisted");
        ctx.say(format!("🚫 <@{}> can no longer use the bot.", user.id))
            .await?;
    } else {
        ctx.say(format!("<@{}> is already blacklisted.", user.id))
            .await?;
    }
    Ok(())
}

/// Remove a user from the blacklist.
#[poise::command(slash_command, prefix_command, owners_only, rename = "remove")]
pub async fn blacklist_remove(
    ctx: Context<'_>,
    #[description = "User to un-blacklist"] user: serenity::User,
) -> Result<(), Error> {
    if ctx.data().moderation.blacklist_remove(user.id.get()).await? {
        tracing::info!(user_id = user.id.get(), "User un-blacklisted");
        ctx.say(format!("✅ <@{}> can use the bot again.", user.id))
            .await?;
    } else {
        ctx.say(format!("<@{}> wasn't blacklisted.", user.id))
            .await?;
    }
    Ok(())
}

/// Register or unregister slash commands (guild or global).
#[poise::command(slash_command, prefix_command, owners_only)]
pub async fn register(ctx: Context<'_>) -> Result<(), Error> {
    poise::builtins::register_application_commands_buttons(ctx).await?;
    Ok(())
}

/// Shut the bot down cleanly.
#[poise::command(slash_command, prefix_command, owners_only)]
pub async fn shutdown(ctx: Context<'_>) -> Result<(), Error> {
    ctx.say("Shutting down. 👋").await?;
    tracing::info!(
        moderator_id = ctx.author().id.get(),
        "Shutdown requested via command"
    );

    ctx.framework().shard_manager().shutdown_all().await;
    Ok(())
}
