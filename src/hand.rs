//! Hand landmarks and the gestures derived from them.

pub mod gesture;
pub mod landmark;
pub mod smoothing;
