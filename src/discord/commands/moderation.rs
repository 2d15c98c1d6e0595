// Moderation commands: kick, ban, nick, purge, warnings.
//
// Gateway actions (kick/ban/nick/purge) go straight to Discord; only the
// warning ledger lives in our own store. This layer stays thin: extract
// ids, call the service or the HTTP API, report the outcome.

use crate::core::moderation::ModerationError;
use crate::discord::{Context, Error};
use poise::serenity_prelude as serenity;

const MOD_COLOR: u32 = 0xE02B2B;

/// Refuse actions against the invoker or the bot itself. Returns a notice
/// to show when the target is off limits.
fn target_notice(ctx: &Context<'_>, target: &serenity::User) -> Option<&'static str> {
    if target.id == ctx.author().id {
        return Some("❌ You can't use this on yourself.");
    }
    if target.id == ctx.framework().bot_id {
        return Some("❌ Nice try, but I'm not doing that to myself.");
    }
    None
}

/// Kick a member from the server.
#[poise::command(
    slash_command,
    prefix_command,
    guild_only,
    required_permissions = "KICK_MEMBERS",
    required_bot_permissions = "KICK_MEMBERS"
)]
pub async fn kick(
    ctx: Context<'_>,
    #[description = "Member to kick"] member: serenity::Member,
    #[description = "Reason for the kick"]
    #[rest]
    reason: Option<String>,
) -> Result<(), Error> {
    if let Some(notice) = target_notice(&ctx, &member.user) {
        ctx.say(notice).await?;
        return Ok(());
    }

    let reason = reason.unwrap_or_else(|| "No reason given".to_string());
    let guild_id = ctx.guild_id().ok_or("This command only works in servers")?;

    match guild_id
        .kick_with_reason(ctx.http(), member.user.id, &reason)
        .await
    {
        Ok(()) => {
            tracing::info!(
                user_id = member.user.id.get(),
                guild_id = guild_id.get(),
                moderator_id = ctx.author().id.get(),
                "Kicked member"
            );
            ctx.say(format!(
                "👢 Kicked **{}**. Reason: {}",
                member.user.name, reason
            ))
            .await?;
        }
        Err(err) => {
            // Usually a role hierarchy problem
            ctx.say(format!("❌ Could not kick that member: {}", err))
                .await?;
        }
    }

    Ok(())
}

/// Ban a user from the server. Works even if they already left.
#[poise::command(
    slash_command,
    prefix_command,
    guild_only,
    required_permissions = "BAN_MEMBERS",
    required_bot_permissions = "BAN_MEMBERS"
)]
pub async fn ban(
    ctx: Context<'_>,
    #[description = "User to ban"] user: serenity::User,
    #[description = "Days of messages to delete (0-7)"]
    #[min = 0]
    #[max = 7]
    delete_message_days: Option<u8>,
    #[description = "Reason for the ban"]
    #[rest]
    reason: Option<String>,
) -> Result<(), Error> {
    if let Some(notice) = target_notice(&ctx, &user) {
        ctx.say(notice).await?;
        return Ok(());
    }

    let reason = reason.unwrap_or_else(|| "No reason given".to_string());
    let delete_message_days = delete_message_days.unwrap_or(0).min(7);
    let guild_id = ctx.guild_id().ok_or("This command only works in servers")?;

    match guild_id
        .ban_with_reason(ctx.http(), user.id, delete_message_days, &reason)
        .await
    {
        Ok(()) => {
            tracing::info!(
                user_id = user.id.get(),
                guild_id = guild_id.get(),
                moderator_id = ctx.author().id.get(),
                "Banned user"
            );
            ctx.say(format!("🔨 Banned **{}**. Reason: {}", user.name, reason))
                .await?;
        }
        Err(err) => {
            ctx.say(format!("❌ Could not ban that user: {}", err))
                .await?;
        }
    }

    Ok(())
}

/// Change or clear a member's nickname.
#[poise::command(
    slash_command,
    prefix_command,
    guild_only,
    required_permissions = "MANAGE_NICKNAMES",
    required_bot_permissions = "MANAGE_NICKNAMES"
)]
pub async fn nick(
    ctx: Context<'_>,
    #[description = "Member to rename"] member: serenity::Member,
    #[description = "New nickname (leave empty to clear)"] nickname: Option<String>,
) -> Result<(), Error> {
    let guild_id = ctx.guild_id().ok_or("This command only works in servers")?;
    let new_nick = nickname.unwrap_or_default();

    let builder = serenity::EditMember::new().nickname(new_nick.clone());
    match guild_id
        .edit_member(ctx.http(), member.user.id, builder)
        .await
    {
        Ok(_) => {
            let reply = if new_nick.is_empty() {
                format!("✏️ Cleared the nickname of **{}**.", member.user.name)
            } else {
                format!(
                    "✏️ **{}** is now known as **{}**.",
                    member.user.name, new_nick
                )
            };
            ctx.say(reply).await?;
        }
        Err(err) => {
            ctx.say(format!("❌ Could not change that nickname: {}", err))
                .await?;
        }
    }

    Ok(())
}

/// Bulk-delete recent messages in this channel.
#[poise::command(
    slash_command,
    guild_only,
    required_permissions = "MANAGE_MESSAGES",
    required_bot_permissions = "MANAGE_MESSAGES"
)]
pub async fn purge(
    ctx: Context<'_>,
    #[description = "How many messages to delete (1-100)"]
    #[min = 1]
    #[max = 100]
    amount: u8,
) -> Result<(), Error> {
    let channel_id = ctx.channel_id();

    let messages = channel_id
        .messages(ctx.http(), serenity::GetMessages::new().limit(amount))
        .await?;

    if messages.is_empty() {
        ctx.send(
            poise::CreateReply::default()
                .content("Nothing to delete here.")
                .ephemeral(true),
        )
        .await?;
        return Ok(());
    }

    let deleted = messages.len();
    channel_id.delete_messages(ctx.http(), &messages).await?;

    ctx.send(
        poise::CreateReply::default()
            .content(format!("🧹 Deleted {} messages.", deleted))
            .ephemeral(true),
    )
    .await?;

    Ok(())
}

/// Manage warnings for a user.
#[poise::command(
    slash_command,
    prefix_command,
    guild_only,
    subcommands("add", "remove", "list"),
    subcommand_required,
    required_permissions = "MODERATE_MEMBERS"
)]
pub async fn warning(_ctx: Context<'_>) -> Result<(), Error> {
    Ok(())
}

/// Warn a user.
#[poise::command(slash_command, prefix_command, guild_only)]
pub async fn add(
    ctx: Context<'_>,
    #[description = "User to warn"] user: serenity::User,
    #[description = "Reason for the warning"]
    #[rest]
    reason: Option<String>,
) -> Result<(), Error> {
    if user.bot {
        ctx.say("❌ Bots can't be warned, they never listen anyway.")
            .await?;
        return Ok(());
    }
    if let Some(notice) = target_notice(&ctx, &user) {
        ctx.say(notice).await?;
        return Ok(());
    }

    let guild_id = ctx.guild_id().ok_or("This command only works in servers")?;
    let outcome = ctx
        .data()
        .moderation
        .warn(
            user.id.get(),
            guild_id.get(),
            ctx.author().id.get(),
            reason.as_deref().unwrap_or(""),
        )
        .await?;

    let embed = serenity::CreateEmbed::new()
        .title("⚠️ Warning issued")
        .description(format!(
            "<@{}> received warning **#{}** (their {} total).",
            user.id, outcome.warning.id, ordinal(outcome.total_warnings)
        ))
        .color(MOD_COLOR)
        .field("Reason", outcome.warning.reason.clone(), false)
        .field("Moderator", format!("<@{}>", ctx.author().id), true);

    ctx.send(poise::CreateReply::default().embed(embed)).await?;
    Ok(())
}

/// Remove a warning by its id.
#[poise::command(slash_command, prefix_command, guild_only)]
pub async fn remove(
    ctx: Context<'_>,
    #[description = "User the warning belongs to"] user: serenity::User,
    #[description = "Warning id (see /warning list)"] warning_id: i64,
) -> Result<(), Error> {
    let guild_id = ctx.guild_id().ok_or("This command only works in servers")?;

    match ctx
        .data()
        .moderation
        .remove_warning(warning_id, user.id.get(), guild_id.get())
        .await
    {
        Ok(()) => {
            ctx.say(format!(
                "✅ Removed warning **#{}** from <@{}>.",
                warning_id, user.id
            ))
            .await?;
        }
        Err(ModerationError::WarningNotFound { id }) => {
            ctx.say(format!(
                "❌ Warning **#{}** doesn't exist for that user in this server.",
                id
            ))
            .await?;
        }
        Err(err) => return Err(err.into()),
    }

    Ok(())
}

/// List a user's warnings.
#[poise::command(slash_command, prefix_command, guild_only)]
pub async fn list(
    ctx: Context<'_>,
    #[description = "User to look up"] user: serenity::User,
) -> Result<(), Error> {
    let guild_id = ctx.guild_id().ok_or("This command only works in servers")?;
    let warnings = ctx
        .data()
        .moderation
        .warnings_for(user.id.get(), guild_id.get())
        .await?;

    if warnings.is_empty() {
        ctx.say(format!("✅ <@{}> has a clean record here.", user.id))
            .await?;
        return Ok(());
    }

    // Cap the listing well below the 4096 char description limit
    const MAX_SHOWN: usize = 20;
    let shown = warnings.iter().take(MAX_SHOWN);

    let mut lines: Vec<String> = shown
        .map(|w| {
            format!(
                "**#{}** • <t:{}:R> by <@{}> — {}",
                w.id,
                w.created_at.timestamp(),
                w.moderator_id,
                w.reason
            )
        })
        .collect();

    if warnings.len() > MAX_SHOWN {
        lines.push(format!("…and {} more.", warnings.len() - MAX_SHOWN));
    }

    let embed = serenity::CreateEmbed::new()
        .title(format!("Warnings for {}", user.name))
        .description(lines.join("\n"))
        .color(MOD_COLOR)
        .thumbnail(user.face())
        .footer(serenity::CreateEmbedFooter::new(format!(
            "{} total",
            warnings.len()
        )));

    ctx.send(poise::CreateReply::default().embed(embed)).await?;
    Ok(())
}

/// 1 -> "1st", 2 -> "2nd", etc. for the warning tally.
fn ordinal(n: u32) -> String {
    let suffix = match (n % 10, n % 100) {
        (1, 11) | (2, 12) | (3, 13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{}{}", n, suffix)
}
