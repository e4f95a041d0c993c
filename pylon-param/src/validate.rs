//! Range checks on a resolved parameter set.
//!
//! Two correction policies apply, and they are not interchangeable:
//!
//! - binning and frame rate are reset to a fixed value (the frame rate
//!   correction is also written back to the store),
//! - exposure, gain and brightness stop being "given", keeping the raw
//!   value that was read.
//!
//! NaN fails every check.

use std::ops::RangeInclusive;

use tracing::debug;

use crate::diagnostic::{Diagnostic, DiagnosticSink};
use crate::keys;
use crate::params::{
    CameraParameters, DEFAULT_BINNING, DEFAULT_FRAME_RATE, FREE_RUN_FRAME_RATE, Tunable,
};
use crate::store::ParameterStore;

pub const BINNING_RANGE: RangeInclusive<i64> = 1..=4;
/// Exposure in µs; zero is excluded.
pub const MAX_EXPOSURE: f64 = 1e7;
pub const GAIN_RANGE: RangeInclusive<f64> = 0.0..=1.0;
pub const BRIGHTNESS_RANGE: RangeInclusive<f64> = 0.0..=255.0;

/// Range-check `params` in place, correcting anything out of range.
pub fn validate<S: ParameterStore>(
    params: &mut CameraParameters,
    store: &S,
    sink: &dyn DiagnosticSink,
) {
    if !BINNING_RANGE.contains(&params.binning) {
        sink.emit(Diagnostic::BinningOutOfRange {
            binning: params.binning,
        });
        params.binning = DEFAULT_BINNING;
    }

    check_given(
        &mut params.exposure,
        is_valid_exposure,
        |exposure| Diagnostic::ExposureOutOfRange { exposure },
        sink,
    );

    check_given(
        &mut params.gain,
        |g| GAIN_RANGE.contains(&g),
        |gain| Diagnostic::GainOutOfRange { gain },
        sink,
    );

    check_given(
        &mut params.brightness,
        |b| BRIGHTNESS_RANGE.contains(&b),
        |brightness| Diagnostic::BrightnessOutOfRange { brightness },
        sink,
    );

    if !is_valid_frame_rate(params.frame_rate) {
        sink.emit(Diagnostic::FrameRateOutOfRange {
            frame_rate: params.frame_rate,
            reset_to: DEFAULT_FRAME_RATE,
        });
        params.frame_rate = DEFAULT_FRAME_RATE;
        debug!("[PARAMS] writing corrected frame rate back to the store");
        store.write(keys::FRAME_RATE, params.frame_rate);
    }
}

pub fn is_valid_exposure(exposure: f64) -> bool {
    exposure > 0.0 && exposure <= MAX_EXPOSURE
}

/// Non-negative, or exactly the free-run sentinel.
pub fn is_valid_frame_rate(frame_rate: f64) -> bool {
    frame_rate >= 0.0 || frame_rate == FREE_RUN_FRAME_RATE
}

/// Withdraw a given tunable whose value fails `is_valid`.
fn check_given(
    tunable: &mut Tunable<f64>,
    is_valid: impl Fn(f64) -> bool,
    diagnostic: impl Fn(f64) -> Diagnostic,
    sink: &dyn DiagnosticSink,
) {
    if tunable.is_given() && !is_valid(tunable.raw()) {
        sink.emit(diagnostic(tunable.raw()));
        tunable.clear();
    }
}
