//! Rikiddo - a dynamic-fee LMSR market maker for multi-outcome prediction markets.
//!
//! Prices follow the logarithmic market scoring rule. Its liquidity parameter
//! `b` is not fixed: it scales with outstanding shares and with a fee
//! coefficient driven by recent trading-volume momentum, so the market charges
//! more when activity picks up and never less than a configured floor.
//!
//! # Modules
//!
//! - [`domain`] - Pricing core: indicator, liquidity parameter, cost function,
//!   trade executor, liquidity ledger, state history
//! - [`config`] - Configuration loading from TOML files
//! - [`error`] - Error types for the crate
//! - [`cli`] - Command-line driver
//!
//! # Example
//!
//! ```
//! use rikiddo::domain::{create_market, ActorId};
//!
//! let market = create_market(
//!     vec!["Yes".into(), "No".into()],
//!     0.1,
//!     &[0.01, 6.0, 2.0],
//!     0.4,
//!     1.0,
//! )?;
//!
//! let trader = ActorId::from("alice");
//! let shares = market.buy(&trader, 0.1, 0)?;
//! let proceeds = market.sell(&trader, shares, 0)?;
//! assert!(proceeds < 0.1);
//! # Ok::<(), rikiddo::domain::MarketError>(())
//! ```

pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
