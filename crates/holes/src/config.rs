use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{
    algorithms::DEFAULT_THRESHOLD_MULTIPLIER,
    error::{HoleError, Result},
    types::Polarity,
};

/// Tunable settings of a hole count.
///
/// Connectivity is not part of this: the Euler scan is only defined for
/// four-connected parts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default, deny_unknown_fields)]
pub struct HoleCountConfig {
    /// Factor applied to the Otsu level before binarization
    #[schemars(range(min = 0.0, max = 10.0))]
    pub threshold_multiplier: f64,
    /// Which side of the threshold the part lies on
    pub part_polarity: Polarity,
}

impl Default for HoleCountConfig {
    fn default() -> Self {
        Self {
            threshold_multiplier: DEFAULT_THRESHOLD_MULTIPLIER,
            part_polarity: Polarity::PartIsLow,
        }
    }
}

impl HoleCountConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.threshold_multiplier.is_finite() || self.threshold_multiplier < 0.0 {
            return Err(HoleError::InvalidInput(format!(
                "threshold_multiplier must be a finite non-negative number, got {}",
                self.threshold_multiplier
            )));
        }
        Ok(())
    }

    /// Get the JSON schema of the configuration
    pub fn schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(HoleCountConfig)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = HoleCountConfig::default();
        assert_eq!(config.threshold_multiplier, 1.2);
        assert_eq!(config.part_polarity, Polarity::PartIsLow);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: HoleCountConfig =
            serde_json::from_str(r#"{ "threshold_multiplier": 1.5 }"#).expect("parse");
        assert_eq!(config.threshold_multiplier, 1.5);
        assert_eq!(config.part_polarity, Polarity::PartIsLow);
    }

    #[test]
    fn test_connectivity_is_not_configurable() {
        let parsed = serde_json::from_str::<HoleCountConfig>(r#"{ "connectivity": 8 }"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_rejects_negative_multiplier() {
        let config = HoleCountConfig {
            threshold_multiplier: -0.5,
            ..HoleCountConfig::default()
        };
        assert!(matches!(config.validate(), Err(HoleError::InvalidInput(_))));
    }

    #[test]
    fn test_schema_names_fields() {
        let schema = serde_json::to_value(HoleCountConfig::schema()).expect("schema");
        let properties = &schema["properties"];
        assert!(properties.get("threshold_multiplier").is_some());
        assert!(properties.get("part_polarity").is_some());
    }
}
