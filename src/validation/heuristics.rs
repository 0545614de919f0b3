//! Verdict types and the pure decision rules behind Stage B.
//!
//! Nothing here touches the network. [`judge`] takes what the image source
//! reported and turns it into a [`ValidationResult`]:
//!
//! 1. shorter edge below `min_dimension_px` → `Placeholder` (too small)
//! 2. estimated size below `min_size_bytes` → `Placeholder` (file too small)
//! 3. otherwise `Valid`
//!
//! When size estimation fails the result is `Valid` on dimensions alone,
//! with a reason saying so.
//!
//! The thresholds are empirical. Small or heavily compressed legitimate
//! images can land below them, and full-resolution placeholders pass.

use super::source::{Dimensions, SourceError};
use serde::{Deserialize, Serialize};

pub const DEFAULT_MIN_DIMENSION_PX: u32 = 150;
pub const DEFAULT_MIN_SIZE_BYTES: u64 = 20 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thresholds {
    pub min_dimension_px: u32,
    pub min_size_bytes: u64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            min_dimension_px: DEFAULT_MIN_DIMENSION_PX,
            min_size_bytes: DEFAULT_MIN_SIZE_BYTES,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Valid,
    Placeholder,
    Unknown,
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Verdict::Valid => "valid",
            Verdict::Placeholder => "placeholder",
            Verdict::Unknown => "unknown",
        };
        f.write_str(label)
    }
}

/// Classification of one URL at one point in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub verdict: Verdict,
    pub reason: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<Dimensions>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approx_size_bytes: Option<u64>,
}

impl ValidationResult {
    pub fn placeholder(reason: impl Into<String>) -> Self {
        Self {
            verdict: Verdict::Placeholder,
            reason: reason.into(),
            dimensions: None,
            approx_size_bytes: None,
        }
    }

    pub fn unknown(reason: impl Into<String>) -> Self {
        Self {
            verdict: Verdict::Unknown,
            reason: reason.into(),
            dimensions: None,
            approx_size_bytes: None,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.verdict == Verdict::Placeholder
    }
}

/// Decide a verdict from decoded dimensions and the size estimate.
///
/// `size` is only consulted when the dimension rule passes, so callers may
/// compute it lazily.
pub fn judge(
    dimensions: Dimensions,
    size: impl FnOnce() -> Result<u64, SourceError>,
    thresholds: &Thresholds,
) -> ValidationResult {
    let Dimensions { width, height } = dimensions;

    if dimensions.shorter_edge() < thresholds.min_dimension_px {
        return ValidationResult {
            verdict: Verdict::Placeholder,
            reason: format!(
                "dimensions too small: {width}x{height} (minimum {}px)",
                thresholds.min_dimension_px
            ),
            dimensions: Some(dimensions),
            approx_size_bytes: None,
        };
    }

    match size() {
        Ok(bytes) if bytes < thresholds.min_size_bytes => ValidationResult {
            verdict: Verdict::Placeholder,
            reason: format!(
                "file too small: ~{bytes} bytes (minimum {})",
                thresholds.min_size_bytes
            ),
            dimensions: Some(dimensions),
            approx_size_bytes: Some(bytes),
        },
        Ok(bytes) => ValidationResult {
            verdict: Verdict::Valid,
            reason: format!("{width}x{height}, ~{bytes} bytes"),
            dimensions: Some(dimensions),
            approx_size_bytes: Some(bytes),
        },
        Err(e) => ValidationResult {
            verdict: Verdict::Valid,
            reason: format!("{width}x{height}; size not checked ({e})"),
            dimensions: Some(dimensions),
            approx_size_bytes: None,
        },
    }
}
