//! Query configuration that callers can serialize/deserialize.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Rounding applied when a numeric aggregate is brought to its result scale.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rounding {
    /// Away from zero on a tie.
    #[default]
    HalfUp,
    /// Toward zero on a tie.
    HalfDown,
    /// Banker's rounding.
    HalfEven,
    Up,
    Down,
    Ceiling,
    Floor,
}

impl FromStr for Rounding {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "half_up" => Ok(Rounding::HalfUp),
            "half_down" => Ok(Rounding::HalfDown),
            "half_even" => Ok(Rounding::HalfEven),
            "up" => Ok(Rounding::Up),
            "down" => Ok(Rounding::Down),
            "ceiling" => Ok(Rounding::Ceiling),
            "floor" => Ok(Rounding::Floor),
            other => Err(Error::invalid(format!("unknown rounding mode '{other}'"))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryConfig {
    /// Optional seed for deterministic shuffles.
    pub shuffle_seed: Option<u64>,

    /// Result scale for average/median when the caller passes none.
    /// `None` keeps the scale of the summed values.
    pub decimal_scale: Option<u32>,

    /// Rounding used by average/median.
    pub rounding: Rounding,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            shuffle_seed: None,
            decimal_scale: None,
            rounding: Rounding::HalfUp,
        }
    }
}

impl QueryConfig {
    /// Create a config from environment variables, falling back to defaults.
    ///
    /// Environment variables:
    /// - `LAZYQ_SHUFFLE_SEED`: shuffle seed
    /// - `LAZYQ_DECIMAL_SCALE`: default aggregate scale
    /// - `LAZYQ_ROUNDING`: rounding mode name, e.g. `half_even`
    pub fn from_env() -> Self {
        let mut cfg = Self::default();

        if let Ok(s) = std::env::var("LAZYQ_SHUFFLE_SEED") {
            if let Ok(v) = s.parse::<u64>() {
                cfg.shuffle_seed = Some(v);
            }
        }

        if let Ok(s) = std::env::var("LAZYQ_DECIMAL_SCALE") {
            if let Ok(v) = s.parse::<u32>() {
                cfg.decimal_scale = Some(v);
            }
        }

        if let Ok(s) = std::env::var("LAZYQ_ROUNDING") {
            if let Ok(v) = s.parse::<Rounding>() {
                cfg.rounding = v;
            }
        }

        cfg
    }

    pub fn with_shuffle_seed(mut self, seed: u64) -> Self {
        self.shuffle_seed = Some(seed);
        self
    }

    pub fn with_decimal_scale(mut self, scale: u32) -> Self {
        self.decimal_scale = Some(scale);
        self
    }

    pub fn with_rounding(mut self, rounding: Rounding) -> Self {
        self.rounding = rounding;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rounding_parse() {
        assert_eq!("half-even".parse::<Rounding>().unwrap(), Rounding::HalfEven);
        assert_eq!(" FLOOR ".parse::<Rounding>().unwrap(), Rounding::Floor);
        assert!(matches!(
            "sideways".parse::<Rounding>(),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_config_json_roundtrip() {
        let cfg = QueryConfig::default()
            .with_shuffle_seed(7)
            .with_rounding(Rounding::Down);
        let json = serde_json::to_string(&cfg).expect("serialize");
        assert!(json.contains("\"rounding\":\"down\""));
        let back: QueryConfig = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, cfg);
    }
}
