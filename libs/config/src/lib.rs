//! # DEX Pricing Configuration
//!
//! Configuration and logging setup shared by the pricing tools.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use dex_config::{init_tracing, load_config};
//!
//! let config = load_config(None)?;
//! init_tracing(&config.logging)?;
//! assert!(config.slippage.is_valid(config.slippage.default_pct));
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod logging;
pub mod settings;

pub use logging::init_tracing;
pub use settings::{
    load_config, DexConfig, LoggingSettings, PricingSettings, SlippageSettings, DEFAULT_FEE_BPS,
    FEE_DENOMINATOR,
};
