//! Configuration file handling.

use anyhow::{Context, Result};
use lib_types::interpolation::{InterpolationKind, SignalConfig, SplineBoundary};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration for `sigview`.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct CliConfig {
    /// Interpolation used when resampling uneven input.
    #[serde(default)]
    pub interpolation: InterpolationKind,

    /// Spacing of the regular grid uneven input is resampled onto.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resample_dt: Option<f64>,

    /// Transform wisdom file, loaded at startup and updated on exit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wisdom_file: Option<PathBuf>,

    /// Sample spacing of single-column input files, and the nominal
    /// spacing of two-column ones.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nominal_dt: Option<f64>,
}

impl CliConfig {
    pub fn signal_config(&self) -> SignalConfig {
        SignalConfig::from(self.interpolation)
    }
}

/// Load configuration from a `.json` or `.toml` file.
pub fn load_config(path: &Path) -> Result<CliConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: CliConfig = if path.extension().map_or(false, |e| e == "json") {
        serde_json::from_str(&content)
            .with_context(|| "Failed to parse config as JSON")?
    } else {
        toml::from_str(&content)
            .with_context(|| "Failed to parse config as TOML")?
    };

    validate_config(&config)?;

    Ok(config)
}

/// Validate configuration.
pub fn validate_config(config: &CliConfig) -> Result<()> {
    for (name, value) in [("resample_dt", config.resample_dt), ("nominal_dt", config.nominal_dt)] {
        if let Some(dt) = value {
            if !(dt > 0.0 && dt.is_finite()) {
                anyhow::bail!("{} must be positive and finite, got {}", name, dt);
            }
        }
    }

    if let InterpolationKind::Spline {
        boundary: SplineBoundary::Clamped { left, right },
        ..
    } = config.interpolation
    {
        if !left.is_finite() || !right.is_finite() {
            anyhow::bail!("Clamped spline slopes must be finite");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use lib_types::interpolation::SplineKind;

    #[test]
    fn test_toml_config() {
        let config: CliConfig = toml::from_str(
            r#"
            resample_dt = 0.25
            wisdom_file = "plans.json"

            [interpolation]
            type = "spline"
            kind = "cubic"
            "#,
        )
        .unwrap();

        assert_eq!(config.resample_dt, Some(0.25));
        assert_eq!(config.wisdom_file, Some(PathBuf::from("plans.json")));
        assert_eq!(
            config.interpolation,
            InterpolationKind::Spline {
                kind: SplineKind::Cubic,
                boundary: SplineBoundary::Natural,
            }
        );
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_empty_config_defaults() {
        let config: CliConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.interpolation, InterpolationKind::Linear);
        assert!(config.nominal_dt.is_none());
        assert_eq!(config.signal_config(), SignalConfig::default());
    }

    #[test]
    fn test_rejects_bad_spacing() {
        let config = CliConfig {
            resample_dt: Some(0.0),
            ..Default::default()
        };
        assert!(validate_config(&config).is_err());
    }
}
