// Core fun module - small games and random facts.

pub mod facts;
pub mod games;

pub use facts::{Fact, FactError, FactProvider, FactService};
pub use games::{flip_coin, judge, CoinSide, RpsChoice, RpsOutcome};
