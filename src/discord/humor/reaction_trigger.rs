// Reaction-driven joke analysis.
//
// Reacting to any guild message with 🤡 asks the joke critic to analyze
// that message. The bot acknowledges with a 🔍 reaction while the provider
// call is in flight, replies with the report, then clears its 🔍.

use crate::core::humor::humor_service::MAX_JOKE_CHARS;
use crate::discord::commands::humor::{excerpt, notice_for, REPORT_COLOR};
use crate::discord::{Data, Error};
use poise::serenity_prelude as serenity;

pub const TRIGGER_EMOJI: &str = "🤡";
const WORKING_EMOJI: &str = "🔍";

/// Entry point called from the framework's event handler on every
/// `ReactionAdd` event.
pub async fn handle_reaction_add(
    ctx: &serenity::Context,
    data: &Data,
    reaction: &serenity::Reaction,
) -> Result<(), Error> {
    if !reaction.emoji.unicode_eq(TRIGGER_EMOJI) {
        return Ok(());
    }

    // Guild messages only; reaction events in DMs are ignored
    if reaction.guild_id.is_none() {
        return Ok(());
    }

    // Ignore our own reactions and those of other bots
    let Some(reactor_id) = reaction.user_id else {
        return Ok(());
    };
    if reactor_id == ctx.cache.current_user().id {
        return Ok(());
    }
    if let Some(member) = &reaction.member {
        if member.user.bot {
            return Ok(());
        }
    }

    let message = reaction.message(&ctx.http).await?;

    // Nothing to analyze in bot messages or attachment-only messages
    if message.author.bot || message.content.trim().is_empty() {
        return Ok(());
    }

    // One analysis per message at a time, however many 🤡 pile up
    if !data.analysis_in_flight.insert(message.id.get()) {
        return Ok(());
    }

    let result = analyze_and_reply(ctx, data, reactor_id, &message).await;
    data.analysis_in_flight.remove(&message.id.get());
    result
}

async fn analyze_and_reply(
    ctx: &serenity::Context,
    data: &Data,
    reactor_id: serenity::UserId,
    message: &serenity::Message,
) -> Result<(), Error> {
    if message.content.chars().count() > MAX_JOKE_CHARS {
        message
            .reply(
                &ctx.http,
                format!(
                    "❌ That message is too long to analyze! The limit is {} characters.",
                    MAX_JOKE_CHARS
                ),
            )
            .await?;
        return Ok(());
    }

    let working = serenity::ReactionType::Unicode(WORKING_EMOJI.to_string());
    if let Err(err) = message.react(&ctx.http, working.clone()).await {
        // Not fatal - we may lack ADD_REACTIONS in this channel
        tracing::warn!("Could not add working reaction: {}", err);
    }

    let analysis = data.humor.analyze(&message.content).await;

    match analysis {
        Ok(analysis) => {
            let requester = reactor_id.to_user(&ctx.http).await?;

            let embed = serenity::CreateEmbed::new()
                .title("🤖 Joke Analysis Report")
                .description(analysis)
                .color(REPORT_COLOR)
                .field(
                    "Original message",
                    format!("[Jump to message]({})", message.link()),
                    false,
                )
                .author(
                    serenity::CreateEmbedAuthor::new(format!(
                        "{} asked for an analysis",
                        requester.name
                    ))
                    .icon_url(requester.face()),
                );

            message
                .channel_id
                .send_message(
                    &ctx.http,
                    serenity::CreateMessage::new()
                        .embed(embed)
                        .reference_message(message),
                )
                .await?;

            tracing::info!(
                message_id = message.id.get(),
                requester_id = reactor_id.get(),
                preview = %excerpt(&message.content, 40),
                "Posted reaction-triggered joke analysis"
            );
        }
        Err(err) => {
            message.reply(&ctx.http, notice_for(&err)).await?;
        }
    }

    // Clear our 🔍 now that the verdict (or the apology) is out
    if let Err(err) = message
        .channel_id
        .delete_reaction(&ctx.http, message.id, None, working)
        .await
    {
        tracing::warn!("Could not remove working reaction: {}", err);
    }

    Ok(())
}
