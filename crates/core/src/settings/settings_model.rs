use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_TERM_CURRENCY;
use crate::errors::{Error, Result};
use crate::portfolio::lots::CostMethod;

/// Solver parameters for the internal rate of return.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct IrrSettings {
    pub initial_guess: f64,
    pub tolerance: f64,
    pub max_iterations: u32,
    /// Lower end of the bisection bracket; must stay above -1.
    pub lower_bound: f64,
    pub upper_bound: f64,
    pub bisection_iterations: u32,
}

impl Default for IrrSettings {
    fn default() -> Self {
        IrrSettings {
            initial_guess: 0.1,
            tolerance: 1e-10,
            max_iterations: 100,
            lower_bound: -0.999999,
            upper_bound: 100.0,
            bisection_iterations: 200,
        }
    }
}

/// Options of a performance calculation run.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct CalculationSettings {
    /// Currency every figure is reported in.
    pub term_currency: String,
    /// Compute securities on the rayon pool.
    pub parallel: bool,
    /// Attach daily capital gains to records and the snapshot.
    pub include_daily: bool,
    pub daily_cost_method: CostMethod,
    pub irr: IrrSettings,
    /// Trailing window for the dividend yield on cost.
    pub dividend_yield_window_days: i64,
}

impl Default for CalculationSettings {
    fn default() -> Self {
        CalculationSettings {
            term_currency: DEFAULT_TERM_CURRENCY.to_string(),
            parallel: true,
            include_daily: false,
            daily_cost_method: CostMethod::Fifo,
            irr: IrrSettings::default(),
            dividend_yield_window_days: 365,
        }
    }
}

impl CalculationSettings {
    /// Parses settings from JSON, filling absent fields with defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let settings: CalculationSettings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        let code = &self.term_currency;
        if code.len() != 3 || !code.chars().all(|c| c.is_ascii_uppercase()) {
            return Err(Error::InvalidConfigValue(format!(
                "termCurrency must be a three-letter ISO code, got '{}'",
                code
            )));
        }
        if self.dividend_yield_window_days <= 0 {
            return Err(Error::InvalidConfigValue(format!(
                "dividendYieldWindowDays must be positive, got {}",
                self.dividend_yield_window_days
            )));
        }

        let irr = &self.irr;
        if irr.tolerance.is_nan() || irr.tolerance <= 0.0 {
            return Err(Error::InvalidConfigValue(format!(
                "irr.tolerance must be positive, got {}",
                irr.tolerance
            )));
        }
        if irr.lower_bound <= -1.0 {
            return Err(Error::InvalidConfigValue(format!(
                "irr.lowerBound must be greater than -1, got {}",
                irr.lower_bound
            )));
        }
        if irr.lower_bound >= irr.upper_bound {
            return Err(Error::InvalidConfigValue(format!(
                "irr.lowerBound {} must be below irr.upperBound {}",
                irr.lower_bound, irr.upper_bound
            )));
        }
        if !irr.initial_guess.is_finite() || irr.initial_guess <= -1.0 {
            return Err(Error::InvalidConfigValue(format!(
                "irr.initialGuess must be a finite rate above -1, got {}",
                irr.initial_guess
            )));
        }
        Ok(())
    }
}
