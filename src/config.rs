use crate::error::{PaymentError, Result};
use serde::{Deserialize, Serialize};

pub const DEFAULT_MARK_LOCATOR: &str = "https://chek-status-qris.vercel.app/logo.png";
/// Largest share of the code's width the mark may cover and still stay within
/// the redundancy of HIGH error correction.
pub const MAX_MARK_WIDTH_RATIO: f32 = 0.25;
pub const MAX_MODULE_SCALE: u32 = 32;
pub const MAX_QUIET_ZONE: u32 = 16;

/// Redundancy level of the rendered matrix code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ErrorCorrection {
    Low,
    Medium,
    Quartile,
    #[default]
    High,
}

impl From<ErrorCorrection> for qrcode::EcLevel {
    fn from(level: ErrorCorrection) -> Self {
        match level {
            ErrorCorrection::Low => qrcode::EcLevel::L,
            ErrorCorrection::Medium => qrcode::EcLevel::M,
            ErrorCorrection::Quartile => qrcode::EcLevel::Q,
            ErrorCorrection::High => qrcode::EcLevel::H,
        }
    }
}

/// Image pipeline settings handed to the `PaymentEngine`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Address of the brand mark, either `http(s)://` or a filesystem path.
    pub mark_locator: String,
    /// Fraction of the code's width the mark is scaled to.
    pub mark_width_ratio: f32,
    pub error_correction: ErrorCorrection,
    /// Pixels per module.
    pub module_scale: u32,
    /// Quiet zone around the matrix, in modules.
    pub quiet_zone: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            mark_locator: DEFAULT_MARK_LOCATOR.to_string(),
            mark_width_ratio: MAX_MARK_WIDTH_RATIO,
            error_correction: ErrorCorrection::High,
            module_scale: 8,
            quiet_zone: 4,
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<()> {
        if self.mark_locator.trim().is_empty() {
            return Err(PaymentError::Config("mark locator is empty".to_string()));
        }
        if !(self.mark_width_ratio > 0.0 && self.mark_width_ratio <= MAX_MARK_WIDTH_RATIO) {
            return Err(PaymentError::Config(format!(
                "mark width ratio {} must be in (0, {MAX_MARK_WIDTH_RATIO}]",
                self.mark_width_ratio
            )));
        }
        // A composited mark occludes modules; only HIGH leaves enough redundancy.
        if self.error_correction != ErrorCorrection::High {
            return Err(PaymentError::Config(format!(
                "error correction {:?} cannot carry a brand mark, use High",
                self.error_correction
            )));
        }
        if self.module_scale == 0 || self.module_scale > MAX_MODULE_SCALE {
            return Err(PaymentError::Config(format!(
                "module scale {} must be in 1..={MAX_MODULE_SCALE}",
                self.module_scale
            )));
        }
        if self.quiet_zone == 0 || self.quiet_zone > MAX_QUIET_ZONE {
            return Err(PaymentError::Config(format!(
                "quiet zone {} must be in 1..={MAX_QUIET_ZONE}",
                self.quiet_zone
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(EngineConfig::default().validate().is_ok());
    }

    #[test]
    fn test_ratio_bounds() {
        for ratio in [0.0, -0.1, 0.26, 1.0, f32::NAN] {
            let config = EngineConfig {
                mark_width_ratio: ratio,
                ..EngineConfig::default()
            };
            assert!(
                matches!(config.validate(), Err(PaymentError::Config(_))),
                "ratio {ratio} should be rejected"
            );
        }
        let config = EngineConfig {
            mark_width_ratio: 0.1,
            ..EngineConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_lower_error_correction_rejected() {
        let config = EngineConfig {
            error_correction: ErrorCorrection::Medium,
            ..EngineConfig::default()
        };
        assert!(matches!(config.validate(), Err(PaymentError::Config(_))));
    }

    #[test]
    fn test_zero_scale_and_quiet_zone_rejected() {
        let config = EngineConfig {
            module_scale: 0,
            ..EngineConfig::default()
        };
        assert!(config.validate().is_err());

        let config = EngineConfig {
            quiet_zone: 0,
            ..EngineConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_oversized_scale_and_quiet_zone_rejected() {
        let config = EngineConfig {
            module_scale: MAX_MODULE_SCALE,
            quiet_zone: MAX_QUIET_ZONE,
            ..EngineConfig::default()
        };
        assert!(config.validate().is_ok());

        let config = EngineConfig {
            module_scale: 2_000_000,
            ..EngineConfig::default()
        };
        assert!(matches!(config.validate(), Err(PaymentError::Config(_))));

        let config = EngineConfig {
            quiet_zone: MAX_QUIET_ZONE + 1,
            ..EngineConfig::default()
        };
        assert!(matches!(config.validate(), Err(PaymentError::Config(_))));
    }

    #[test]
    fn test_error_correction_parses_lowercase() {
        let level: ErrorCorrection = serde_json::from_str("\"quartile\"").unwrap();
        assert_eq!(level, ErrorCorrection::Quartile);
    }
}
