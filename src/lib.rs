//! Hand gesture classification from per-frame hand landmark observations.
//!
//! `handsign` turns the 21-point hand skeletons produced by a MediaPipe-style hand landmark
//! detector into discrete gestures: a digit count (0 to 5 extended fingers), a pinch/click flag,
//! and an open-palm flag. Detection itself, video capture, and drawing are left to the caller.
//!
//! The entry points are [`hand::gesture::GestureClassifier`], which classifies a single
//! [`hand::landmark::LandmarkSet`], and [`frame::FrameEvaluator`], which classifies all hands
//! detected in a video frame and measures the frame rate.
//!
//! # Coordinates
//!
//! Landmarks use the detector's normalized image coordinates: X points to the right, Y points
//! *down*, and both are fractions of the frame size (typically in range 0.0 to 1.0, but values
//! slightly outside that range are emitted near the frame edges and are accepted as-is).
//!
//! Distance thresholds are specified in pixels, so every classification needs the [`Resolution`]
//! of the frame the landmarks were detected in.
//!
//! # Environment Variables
//!
//! The library itself does not read any environment variables. The `handsign` binary can be
//! configured with:
//!
//! * `HANDSIGN_PINCH_PX`: pinch distance threshold in pixels (default: 30).
//! * `HANDSIGN_OPEN_PX`: open-palm distance threshold in pixels (default: 100).
//! * `HANDSIGN_MIN_CONFIDENCE`: minimum detector confidence of a hand (default: 0.8).
//! * `HANDSIGN_MAX_HANDS`: maximum number of hands classified per frame (default: 2).
//! * `HANDSIGN_SMOOTHING`: number of consecutive frames a gesture has to be observed in before it
//!   is reported. Unset, `0` and `1` disable smoothing (the default).
//!
//! [`Resolution`]: resolution::Resolution

use log::LevelFilter;

pub mod error;
pub mod filter;
pub mod frame;
pub mod hand;
pub mod overlay;
pub mod resolution;
pub mod timer;


/// macro-use only, not part of public API.
#[doc(hidden)]
pub fn init_logger(calling_crate: &'static str) {
    let log_level = if cfg!(debug_assertions) {
        LevelFilter::Trace
    } else {
        LevelFilter::Debug
    };
    env_logger::Builder::new()
        .filter(Some(calling_crate), log_level)
        .filter(Some(env!("CARGO_CRATE_NAME")), log_level)
        .parse_default_env()
        .try_init()
        .ok();
}

/// Initializes logging to *stderr*.
///
/// If `cfg!(debug_assertions)` is enabled, the calling crate and `handsign` will log at *trace*
/// level. Otherwise, they will log at *debug* level. `RUST_LOG` can be used to override this.
///
/// If a global logger is already registered, this macro will do nothing.
#[macro_export]
macro_rules! init_logger {
    () => {
        $crate::init_logger(env!("CARGO_CRATE_NAME"))
    };
}
