use holes::{HoleCountConfig, HoleError};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    SerdeError(#[from] serde_json::Error),
    #[error(transparent)]
    TomlDeError(#[from] toml::de::Error),
    #[error(transparent)]
    TomlSerError(#[from] toml::ser::Error),
    #[error(transparent)]
    IoError(#[from] std::io::Error),
    #[error(transparent)]
    HoleError(#[from] HoleError),
    #[error("Unsupported file format. Please use .toml or .json files")]
    UnsupportedFileFormat,
}

/// Inspection settings as stored in a configuration file
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(default)]
pub struct InspectionConfig {
    /// Image to inspect when none is given on the command line
    pub input: Option<String>,
    /// Where to write the binarized mask
    pub mask_output: Option<String>,
    /// Where to write the JSON hole report
    pub report_output: Option<String>,
    pub counting: HoleCountConfig,
}

impl InspectionConfig {
    /// Load InspectionConfig from a TOML file
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self, CliError> {
        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Load InspectionConfig from TOML string
    pub fn from_toml(content: &str) -> Result<Self, CliError> {
        let config: InspectionConfig = toml::from_str(content)?;
        config.counting.validate()?;
        Ok(config)
    }

    /// Load InspectionConfig from a JSON file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, CliError> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Load InspectionConfig from JSON string
    pub fn from_json(content: &str) -> Result<Self, CliError> {
        let config: InspectionConfig = serde_json::from_str(content)?;
        config.counting.validate()?;
        Ok(config)
    }

    /// Auto-detect file format and load configuration
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, CliError> {
        let path_ref = path.as_ref();
        match path_ref.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Self::from_toml_file(path),
            Some("json") => Self::from_json_file(path),
            _ => Err(CliError::UnsupportedFileFormat),
        }
    }

    /// Convert InspectionConfig to TOML string
    pub fn to_toml(&self) -> Result<String, CliError> {
        Ok(toml::to_string_pretty(&self)?)
    }

    /// Convert InspectionConfig to JSON string
    pub fn to_json(&self) -> Result<String, CliError> {
        Ok(serde_json::to_string_pretty(&self)?)
    }

    /// Get the JSON schema of the configuration file
    pub fn schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(InspectionConfig)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use holes::Polarity;

    #[test]
    fn test_from_toml() {
        let config = InspectionConfig::from_toml(
            r#"
            input = "part.png"
            mask_output = "mask.png"

            [counting]
            threshold_multiplier = 1.35
            part_polarity = "part_is_high"
            "#,
        )
        .expect("Should parse");

        assert_eq!(config.input.as_deref(), Some("part.png"));
        assert_eq!(config.mask_output.as_deref(), Some("mask.png"));
        assert_eq!(config.report_output, None);
        assert_eq!(config.counting.threshold_multiplier, 1.35);
        assert_eq!(config.counting.part_polarity, Polarity::PartIsHigh);
    }

    #[test]
    fn test_empty_toml_is_default() {
        let config = InspectionConfig::from_toml("").expect("Should parse");
        assert_eq!(config, InspectionConfig::default());
        assert_eq!(config.counting.threshold_multiplier, 1.2);
    }

    #[test]
    fn test_from_json_rejects_negative_multiplier() {
        let result = InspectionConfig::from_json(r#"{ "counting": { "threshold_multiplier": -1.0 } }"#);
        assert!(matches!(result, Err(CliError::HoleError(HoleError::InvalidInput(_)))));
    }

    #[test]
    fn test_connectivity_key_is_rejected() {
        let result = InspectionConfig::from_toml(
            r#"
            [counting]
            connectivity = 8
            "#,
        );
        assert!(matches!(result, Err(CliError::TomlDeError(_))));
    }

    #[test]
    fn test_toml_roundtrip() {
        let config = InspectionConfig {
            input: Some("a.bmp".to_string()),
            ..InspectionConfig::default()
        };
        let text = config.to_toml().expect("Should serialize");
        assert_eq!(InspectionConfig::from_toml(&text).expect("Should parse"), config);
    }

    #[test]
    fn test_unsupported_extension() {
        assert!(matches!(
            InspectionConfig::from_file("settings.yaml"),
            Err(CliError::UnsupportedFileFormat)
        ));
    }
}
