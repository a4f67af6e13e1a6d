//! Market pricing core.
//!
//! Leaf-first: the volume [`RatioIndicator`] feeds the [`LiquidityParameter`]
//! provider, which sets `b` for the [`lmsr`] cost function. A [`Market`] owns
//! the state and executes trades through its [`PricingModel`]; a
//! [`MarketHandle`] shares one market between threads.

mod book;
mod handle;
mod history;
mod ids;
mod ledger;
mod market;
mod model;
mod outcome;

pub mod cpmm;
pub mod error;
pub mod fee;
pub mod indicator;
pub mod lmsr;
pub mod solver;

pub use book::{Book, BookEntry, EntryKind};
pub use error::MarketError;
pub use fee::{FeeParameters, FeeRegime, LiquidityParameter};
pub use handle::{create_market, MarketHandle};
pub use history::StateHistory;
pub use ids::{ActorId, MarketId, OutcomeId};
pub use indicator::{IndicatorConfig, IndicatorReading, RatioIndicator, VolumeSeries};
pub use ledger::{LiquidityLedger, LiquiditySplit};
pub use market::{Market, MarketSpec, MarketState, MarketSummary, TradePhase, DEFAULT_CREATOR};
pub use model::{Fill, ModelSpec, PricingModel};
pub use outcome::{OutcomeSet, MAX_OUTCOMES};
pub use solver::SolverConfig;
