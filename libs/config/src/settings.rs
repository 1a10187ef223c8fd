//! Pricing Tool Configuration Module
//!
//! Layers built-in defaults, an optional TOML file and `DEX_`-prefixed
//! environment variables (nested keys separated by `__`, e.g.
//! `DEX_SLIPPAGE__MAX_PCT=20`).

use anyhow::{bail, Context, Result};
use config_crate::{Config, Environment, File};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

/// Basis-point denominator shared with the pool contract (10000 bps = 100%)
pub const FEE_DENOMINATOR: u32 = 10_000;

/// Fee charged by pools created with default settings (0.3%)
pub const DEFAULT_FEE_BPS: u32 = 30;

/// Main configuration structure
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
#[serde(default)]
pub struct DexConfig {
    pub pricing: PricingSettings,
    pub slippage: SlippageSettings,
    pub logging: LoggingSettings,
}

/// Pool pricing defaults
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct PricingSettings {
    /// Fee assumed for pools created without an explicit fee (30 = 0.3%)
    pub default_fee_bps: u32,
}

/// Slippage tolerances, all in percent
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct SlippageSettings {
    pub default_pct: Decimal,
    /// Presets offered to the user
    pub options_pct: Vec<Decimal>,
    pub max_pct: Decimal,
    /// Tolerances above this are accepted but logged
    pub warn_above_pct: Decimal,
}

/// Tracing subscriber settings
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct LoggingSettings {
    /// Filter directive used when RUST_LOG is unset
    pub level: String,
    pub json: bool,
}

impl Default for PricingSettings {
    fn default() -> Self {
        Self {
            default_fee_bps: DEFAULT_FEE_BPS,
        }
    }
}

impl Default for SlippageSettings {
    fn default() -> Self {
        Self {
            default_pct: dec!(0.5),
            options_pct: vec![dec!(0.1), dec!(0.5), dec!(1.0)],
            max_pct: dec!(50),
            warn_above_pct: dec!(5),
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl SlippageSettings {
    /// A tolerance is usable iff `0 < pct <= max_pct`
    pub fn is_valid(&self, pct: Decimal) -> bool {
        pct > Decimal::ZERO && pct <= self.max_pct
    }

    pub fn is_high(&self, pct: Decimal) -> bool {
        pct > self.warn_above_pct
    }
}

impl DexConfig {
    /// Load configuration from an optional file with environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_from(
            path,
            Environment::with_prefix("DEX")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
    }

    fn load_from(path: Option<&Path>, environment: Environment) -> Result<Self> {
        let mut builder = Config::builder().add_source(
            Config::try_from(&DexConfig::default()).context("Failed to encode default configuration")?,
        );

        if let Some(path) = path {
            info!("Loading configuration file: {:?}", path);
            builder = builder.add_source(File::from(path).required(true));
        } else {
            debug!("No configuration file given, using defaults");
        }

        let config = builder
            .add_source(environment)
            .build()
            .context("Failed to build configuration")?;

        let config: DexConfig = config
            .try_deserialize()
            .context("Failed to deserialize configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the pricing engine cannot honour
    pub fn validate(&self) -> Result<()> {
        if self.pricing.default_fee_bps >= FEE_DENOMINATOR {
            bail!(
                "default_fee_bps {} must be below {}",
                self.pricing.default_fee_bps,
                FEE_DENOMINATOR
            );
        }

        let slippage = &self.slippage;
        if slippage.max_pct <= Decimal::ZERO || slippage.max_pct >= Decimal::ONE_HUNDRED {
            bail!("slippage max_pct {} must be in (0, 100)", slippage.max_pct);
        }
        if !slippage.is_valid(slippage.default_pct) {
            bail!(
                "slippage default_pct {} must be in (0, {}]",
                slippage.default_pct,
                slippage.max_pct
            );
        }
        if let Some(bad) = slippage.options_pct.iter().find(|pct| !slippage.is_valid(**pct)) {
            bail!("slippage option {} must be in (0, {}]", bad, slippage.max_pct);
        }
        Ok(())
    }
}

/// Convenience function to load configuration with defaults
pub fn load_config(path: Option<&Path>) -> Result<DexConfig> {
    DexConfig::load(path)
}
