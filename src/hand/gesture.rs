//! Gesture classification of a single hand.
//!
//! All predicates in this module are pure functions of a [`LandmarkSet`]. They are intentionally
//! simple 2D tests and do not try to account for camera roll or hands held sideways.

use nalgebra::distance;

use crate::resolution::Resolution;

use super::landmark::{Finger, Handedness, Landmark, LandmarkIdx, LandmarkSet};

/// Returns whether a non-thumb finger is extended.
///
/// The finger counts as extended if its tip lies strictly above (has a smaller `y` than) the
/// reference joint `pip`.
pub fn is_finger_extended(set: &LandmarkSet, tip: LandmarkIdx, pip: LandmarkIdx) -> bool {
    set.get(tip).y() < set.get(pip).y()
}

/// Returns whether the thumb is extended, given the hand it belongs to.
///
/// The thumb abducts sideways, so this compares the `x` coordinates of its tip and MCP joint. The
/// direction is mirrored between left and right hands: a right thumb is extended when its tip is
/// left of the MCP joint, a left thumb when its tip is right of it.
///
/// `handedness` is taken separately from the [`LandmarkSet`]'s own label so that callers can
/// evaluate the rule for either hand.
pub fn is_thumb_extended(set: &LandmarkSet, handedness: Handedness) -> bool {
    let tip = set.get(LandmarkIdx::ThumbTip).x();
    let mcp = set.get(LandmarkIdx::ThumbMcp).x();
    match handedness {
        Handedness::Right => tip < mcp,
        Handedness::Left => tip > mcp,
    }
}

/// Computes the distance between two landmarks in pixels of a frame with resolution `res`.
pub fn euclidean_distance(a: Landmark, b: Landmark, res: Resolution) -> f32 {
    distance(&a.to_pixels(res), &b.to_pixels(res))
}

/// Pixel distance thresholds for the pinch and open-palm gestures.
///
/// The defaults were tuned for a 640x480 camera image. Since the thresholds are in pixels, they
/// have to be adjusted for other resolutions, either manually or with [`Thresholds::scaled_to`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    pinch_px: f32,
    open_px: f32,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            pinch_px: Self::DEFAULT_PINCH_PX,
            open_px: Self::DEFAULT_OPEN_PX,
        }
    }
}

impl Thresholds {
    /// Thumb tip and index tip closer than this are a pinch.
    pub const DEFAULT_PINCH_PX: f32 = 30.0;

    /// Wrist and index tip farther apart than this are an open hand.
    pub const DEFAULT_OPEN_PX: f32 = 100.0;

    /// Resolution the default thresholds are meant for.
    pub const REFERENCE_RESOLUTION: Resolution = Resolution::RES_VGA;

    /// Sets the pinch distance threshold in pixels.
    pub fn pinch_distance(self, px: f32) -> Self {
        Self {
            pinch_px: px,
            ..self
        }
    }

    /// Sets the open-palm distance threshold in pixels.
    pub fn open_distance(self, px: f32) -> Self {
        Self {
            open_px: px,
            ..self
        }
    }

    pub fn pinch_px(&self) -> f32 {
        self.pinch_px
    }

    pub fn open_px(&self) -> f32 {
        self.open_px
    }

    /// Scales both thresholds from [`Thresholds::REFERENCE_RESOLUTION`] to `res`, proportionally
    /// to the frame diagonal.
    pub fn scaled_to(self, res: Resolution) -> Self {
        let factor = res.diagonal() / Self::REFERENCE_RESOLUTION.diagonal();
        Self {
            pinch_px: self.pinch_px * factor,
            open_px: self.open_px * factor,
        }
    }
}

/// The gestures recognized on a single hand in a single frame.
#[derive(Debug, Clone, PartialEq)]
pub struct GestureResult {
    fingers: [bool; 5],
    is_pinch: bool,
    is_open: bool,
    handedness: Handedness,
    wrist: Landmark,
    confidence: Option<f32>,
}

impl GestureResult {
    /// Returns the number of extended fingers, from 0 (closed fist) to 5.
    pub fn fingers_extended(&self) -> u8 {
        self.fingers.iter().filter(|&&ext| ext).count() as u8
    }

    /// Returns the per-finger extension flags, ordered like [`Finger::ALL`].
    pub fn fingers(&self) -> [bool; 5] {
        self.fingers
    }

    pub fn is_extended(&self, finger: Finger) -> bool {
        self.fingers[finger as usize]
    }

    /// Returns the number shown by the hand, if any.
    ///
    /// A closed fist does not show a number, so this returns [`None`] instead of `Some(0)`.
    pub fn number(&self) -> Option<u8> {
        match self.fingers_extended() {
            0 => None,
            n => Some(n),
        }
    }

    /// Whether thumb tip and index tip are pinched together ("click").
    pub fn is_pinch(&self) -> bool {
        self.is_pinch
    }

    /// Whether the hand is open (index tip far from the wrist).
    pub fn is_open(&self) -> bool {
        self.is_open
    }

    pub fn handedness(&self) -> Handedness {
        self.handedness
    }

    /// Returns the wrist landmark, for placing labels next to the hand.
    pub fn wrist(&self) -> Landmark {
        self.wrist
    }

    /// The detector's confidence for this hand, if it was supplied.
    pub fn confidence(&self) -> Option<f32> {
        self.confidence
    }

    pub(crate) fn with_confidence(self, confidence: f32) -> Self {
        Self {
            confidence: Some(confidence),
            ..self
        }
    }

    /// Replaces the gesture flags while keeping the hand's identity and position.
    pub(crate) fn with_gestures(self, fingers: [bool; 5], is_pinch: bool, is_open: bool) -> Self {
        Self {
            fingers,
            is_pinch,
            is_open,
            ..self
        }
    }
}

/// Classifies the gestures of a single hand.
///
/// Classification is a pure function of the [`LandmarkSet`] and frame [`Resolution`]; the
/// classifier holds nothing but its [`Thresholds`].
#[derive(Debug, Clone, Default)]
pub struct GestureClassifier {
    thresholds: Thresholds,
}

impl GestureClassifier {
    pub fn new(thresholds: Thresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    /// Classifies the hand described by `set`, detected in a frame of resolution `res`.
    pub fn classify(&self, set: &LandmarkSet, res: Resolution) -> GestureResult {
        let handedness = set.handedness();

        let mut fingers = [false; 5];
        for (ext, finger) in fingers.iter_mut().zip(Finger::ALL) {
            *ext = match finger {
                Finger::Thumb => is_thumb_extended(set, handedness),
                _ => is_finger_extended(set, finger.tip(), finger.reference_joint()),
            };
        }

        let thumb_tip = set.get(LandmarkIdx::ThumbTip);
        let index_tip = set.get(LandmarkIdx::IndexFingerTip);
        let wrist = set.get(LandmarkIdx::Wrist);

        let is_pinch = euclidean_distance(thumb_tip, index_tip, res) < self.thresholds.pinch_px;
        let is_open = euclidean_distance(wrist, index_tip, res) > self.thresholds.open_px;

        GestureResult {
            fingers,
            is_pinch,
            is_open,
            handedness,
            wrist,
            confidence: None,
        }
    }
}
