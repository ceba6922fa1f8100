// =============================================================================
// Technical Indicators Module
// =============================================================================
//
// Pure, side-effect-free implementations of the breakout and trend detectors
// the screener evaluates.  Every detector takes a `PriceHistory`, returns a
// typed outcome struct, and signals unusable input through `IndicatorError`
// rather than panicking.

pub mod darvas;
pub mod green_line;
pub mod ma;
pub mod momentum;
pub mod rwb;

pub use darvas::{detect_darvas_box, DarvasOutcome};
pub use green_line::{detect_green_line, GreenLineOutcome};
pub use momentum::{detect_momentum, MomentumOutcome};
pub use rwb::{detect_rwb_ribbon, RibbonOutcome};

use thiserror::Error;

/// Why a detector could not produce a verdict for the given input.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum IndicatorError {
    #[error("{indicator} requires at least {required} observations, got {actual}")]
    InsufficientData {
        indicator: &'static str,
        required: usize,
        actual: usize,
    },

    #[error("invalid parameter {name}: {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

/// Guard shared by every detector entry point.
pub(crate) fn ensure_min_observations(
    indicator: &'static str,
    required: usize,
    actual: usize,
) -> Result<(), IndicatorError> {
    if actual < required {
        return Err(IndicatorError::InsufficientData {
            indicator,
            required,
            actual,
        });
    }
    Ok(())
}
