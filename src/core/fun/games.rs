// Game logic for the toy commands. Pure functions so the outcomes are
// trivially testable; the Discord layer only does the dice rolling and
// formatting.

use rand::Rng;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RpsChoice {
    Rock,
    Paper,
    Scissors,
}

impl RpsChoice {
    pub fn emoji(&self) -> &'static str {
        match self {
            RpsChoice::Rock => "🪨",
            RpsChoice::Paper => "📄",
            RpsChoice::Scissors => "✂️",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RpsChoice::Rock => "rock",
            RpsChoice::Paper => "paper",
            RpsChoice::Scissors => "scissors",
        }
    }

    /// Uniformly random choice for the bot's hand.
    pub fn random(rng: &mut impl Rng) -> Self {
        match rng.gen_range(0..3) {
            0 => RpsChoice::Rock,
            1 => RpsChoice::Paper,
            _ => RpsChoice::Scissors,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RpsOutcome {
    Win,
    Loss,
    Draw,
}

/// Judge a round from the player's perspective.
pub fn judge(player: RpsChoice, bot: RpsChoice) -> RpsOutcome {
    use RpsChoice::*;

    if player == bot {
        return RpsOutcome::Draw;
    }

    match (player, bot) {
        (Rock, Scissors) | (Paper, Rock) | (Scissors, Paper) => RpsOutcome::Win,
        _ => RpsOutcome::Loss,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoinSide {
    Heads,
    Tails,
}

impl CoinSide {
    pub fn label(&self) -> &'static str {
        match self {
            CoinSide::Heads => "Heads",
            CoinSide::Tails => "Tails",
        }
    }
}

pub fn flip_coin(rng: &mut impl Rng) -> CoinSide {
    if rng.gen_bool(0.5) {
        CoinSide::Heads
    } else {
        CoinSide::Tails
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use RpsChoice::*;
    use RpsOutcome::*;

    #[test]
    fn judge_covers_every_matchup() {
        let cases = [
            (Rock, Rock, Draw),
            (Rock, Paper, Loss),
            (Rock, Scissors, Win),
            (Paper, Rock, Win),
            (Paper, Paper, Draw),
            (Paper, Scissors, Loss),
            (Scissors, Rock, Loss),
            (Scissors, Paper, Win),
            (Scissors, Scissors, Draw),
        ];

        for (player, bot, expected) in cases {
            assert_eq!(
                judge(player, bot),
                expected,
                "{:?} vs {:?}",
                player,
                bot
            );
        }
    }

    #[test]
    fn random_choice_hits_all_three_eventually() {
        let mut rng = rand::thread_rng();
        let mut seen = [false; 3];

        for _ in 0..200 {
            match RpsChoice::random(&mut rng) {
                Rock => seen[0] = true,
                Paper => seen[1] = true,
                Scissors => seen[2] = true,
            }
        }

        assert!(seen.iter().all(|&s| s));
    }
}
