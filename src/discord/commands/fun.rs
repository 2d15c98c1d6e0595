// Toy commands: coin flips, rock-paper-scissors, random facts.

use crate::core::fun::{flip_coin, judge, RpsChoice, RpsOutcome};
use crate::discord::{Context, Error};
use poise::serenity_prelude as serenity;

#[derive(Debug, Clone, Copy, poise::ChoiceParameter)]
pub enum RpsChoiceParameter {
    #[name = "Rock"]
    Rock,
    #[name = "Paper"]
    Paper,
    #[name = "Scissors"]
    Scissors,
}

impl From<RpsChoiceParameter> for RpsChoice {
    fn from(value: RpsChoiceParameter) -> Self {
        match value {
            RpsChoiceParameter::Rock => RpsChoice::Rock,
            RpsChoiceParameter::Paper => RpsChoice::Paper,
            RpsChoiceParameter::Scissors => RpsChoice::Scissors,
        }
    }
}

/// Flip a coin.
#[poise::command(slash_command, prefix_command)]
pub async fn coinflip(ctx: Context<'_>) -> Result<(), Error> {
    let side = flip_coin(&mut rand::thread_rng());
    ctx.say(format!("🪙 The coin landed on... **{}**!", side.label()))
        .await?;
    Ok(())
}

/// Play rock-paper-scissors against the bot.
#[poise::command(slash_command, prefix_command)]
pub async fn rps(
    ctx: Context<'_>,
    #[description = "Your hand"] choice: RpsChoiceParameter,
) -> Result<(), Error> {
    let player: RpsChoice = choice.into();
    let bot = RpsChoice::random(&mut rand::thread_rng());

    let verdict = match judge(player, bot) {
        RpsOutcome::Win => "You win! 🎉",
        RpsOutcome::Loss => "I win! 😎",
        RpsOutcome::Draw => "It's a draw. 🤝",
    };

    ctx.say(format!(
        "You chose {} {}, I chose {} {}. {}",
        player.emoji(),
        player.label(),
        bot.emoji(),
        bot.label(),
        verdict
    ))
    .await?;
    Ok(())
}

/// Learn a completely useless fact.
#[poise::command(slash_command, prefix_command)]
pub async fn randomfact(ctx: Context<'_>) -> Result<(), Error> {
    match ctx.data().facts.random_fact().await {
        Ok(fact) => {
            let mut embed = serenity::CreateEmbed::new()
                .title("🧠 Did you know?")
                .description(fact.text)
                .color(0xD75BF4);

            if let Some(source_url) = fact.source_url {
                embed = embed.field("Source", source_url, false);
            }

            ctx.send(poise::CreateReply::default().embed(embed)).await?;
        }
        Err(err) => {
            tracing::warn!("Random fact lookup failed: {}", err);
            ctx.say("❌ The fact well has run dry, try again later.")
                .await?;
        }
    }
    Ok(())
}
