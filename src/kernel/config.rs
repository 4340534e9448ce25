use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Construction-time configuration failures. The only errors this crate
/// surfaces to callers; every steady-state failure degrades to telemetry.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("max_buffer_size must be greater than zero")]
    InvalidBufferSize,

    #[error("{field} must be within 0.0..=1.0, got {value}")]
    OutOfRange { field: &'static str, value: f64 },

    #[error("tier thresholds must be monotonic: working {working} > long {long}")]
    NonMonotonicTiers { working: f64, long: f64 },
}

fn check_unit(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange { field, value })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryConfig {
    pub max_buffer_size: usize,
    #[serde(with = "duration_ms")]
    pub flush_interval: Duration,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            max_buffer_size: 100,
            flush_interval: Duration::from_millis(15_000),
        }
    }
}

impl TelemetryConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_buffer_size == 0 {
            return Err(ConfigError::InvalidBufferSize);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArbitrationConfig {
    pub min_confidence: f64,
    pub max_error_rate: f64,
}

impl Default for ArbitrationConfig {
    fn default() -> Self {
        Self {
            min_confidence: 0.35,
            max_error_rate: 0.30,
        }
    }
}

impl ArbitrationConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_unit("min_confidence", self.min_confidence)?;
        check_unit("max_error_rate", self.max_error_rate)?;
        Ok(())
    }
}

/// Importance cut points for tier assignment. `working <= long` so a higher
/// importance can never land in a lower tier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TierThresholds {
    pub working: f64,
    pub long: f64,
}

impl Default for TierThresholds {
    fn default() -> Self {
        Self {
            working: 0.40,
            long: 0.75,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryConfig {
    pub thresholds: TierThresholds,
    #[serde(with = "duration_ms")]
    pub persist_timeout: Duration,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            thresholds: TierThresholds::default(),
            persist_timeout: Duration::from_secs(2),
        }
    }
}

impl MemoryConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_unit("thresholds.working", self.thresholds.working)?;
        check_unit("thresholds.long", self.thresholds.long)?;
        if self.thresholds.working > self.thresholds.long {
            return Err(ConfigError::NonMonotonicTiers {
                working: self.thresholds.working,
                long: self.thresholds.long,
            });
        }
        Ok(())
    }
}

mod duration_ms {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        let ms = u64::deserialize(d)?;
        Ok(Duration::from_millis(ms))
    }
}
