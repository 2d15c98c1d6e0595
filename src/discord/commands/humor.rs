// The /analyzejoke command.
//
// The same analysis can be requested by reacting to a message with 🤡,
// handled in the reaction trigger module.

use crate::core::humor::humor_service::MAX_JOKE_CHARS;
use crate::core::humor::HumorError;
use crate::discord::{Context, Error};
use poise::serenity_prelude as serenity;

pub const REPORT_COLOR: u32 = 0x097969;
pub const REPORT_FOOTER: &str = "Analysis by Mortis";

/// Have the resident joke critic break down a joke.
#[poise::command(slash_command, prefix_command)]
pub async fn analyzejoke(
    ctx: Context<'_>,
    #[description = "The joke to analyze"]
    #[rest]
    joke: String,
) -> Result<(), Error> {
    if joke.chars().count() > MAX_JOKE_CHARS {
        ctx.say(format!(
            "❌ That joke is too long! Keep it under {} characters.",
            MAX_JOKE_CHARS
        ))
        .await?;
        return Ok(());
    }

    // The provider round trip can take a few seconds
    ctx.defer().await?;

    match ctx.data().humor.analyze(&joke).await {
        Ok(analysis) => {
            let embed = serenity::CreateEmbed::new()
                .title("🤖 Joke Analysis Report")
                .description(analysis)
                .color(REPORT_COLOR)
                .field(
                    "Original joke",
                    format!("```{}```", excerpt(&joke, 200)),
                    false,
                )
                .footer(serenity::CreateEmbedFooter::new(REPORT_FOOTER));

            ctx.send(poise::CreateReply::default().embed(embed)).await?;
        }
        Err(err) => {
            ctx.say(notice_for(&err)).await?;
        }
    }

    Ok(())
}

/// User-facing notice for an analysis failure.
pub fn notice_for(err: &HumorError) -> String {
    match err {
        HumorError::Empty => "❌ There's nothing to analyze.".to_string(),
        HumorError::TooLong { limit } => format!(
            "❌ That joke is too long! Keep it under {} characters.",
            limit
        ),
        HumorError::NotConfigured => {
            "❌ The DeepSeek API key is not configured, joke analysis is unavailable.".to_string()
        }
        HumorError::Provider(reason) => {
            tracing::error!("Joke analysis failed: {}", reason);
            "❌ Analysis failed, try again later.".to_string()
        }
    }
}

/// Character-safe excerpt with an ellipsis when truncated.
pub fn excerpt(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let truncated: String = text.chars().take(max_chars).collect();
    format!("{}…", truncated)
}
