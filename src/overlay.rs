//! Text overlay layout for displaying a [`FrameReport`].
//!
//! Drawing is up to the caller. This module only decides *what* to show and provides a default
//! placement for it: the frame rate in the top left corner, a column of gesture labels below it,
//! and each hand's handedness next to its wrist.

use nalgebra::{Point2, Vector2};

use crate::{
    frame::FrameReport,
    hand::{gesture::GestureResult, landmark::LandmarkSet},
    resolution::Resolution,
};

const FPS_POS: [f32; 2] = [30.0, 50.0];
const PINCH_POS: [f32; 2] = [50.0, 100.0];
const OPEN_POS: [f32; 2] = [50.0, 150.0];
const NUMBER_POS: [f32; 2] = [50.0, 200.0];

/// Offset of the handedness label from the wrist.
const WRIST_LABEL_OFFSET: [f32; 2] = [-20.0, -20.0];

/// What a [`TextLabel`] describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelKind {
    FrameRate,
    Pinch,
    Open,
    Number,
    Handedness,
}

/// A line of text to draw at a pixel position.
#[derive(Debug, Clone, PartialEq)]
pub struct TextLabel {
    pub kind: LabelKind,
    pub text: String,
    /// Bottom-left corner of the text, in pixels.
    pub pos: Point2<f32>,
}

impl TextLabel {
    fn new(kind: LabelKind, text: String, [x, y]: [f32; 2]) -> Self {
        Self {
            kind,
            text,
            pos: Point2::new(x, y),
        }
    }
}

/// Returns the labels describing a single hand.
///
/// The number label is only produced for 1 to 5 extended fingers; a closed fist shows no number.
pub fn hand_labels(hand: &GestureResult, res: Resolution) -> Vec<TextLabel> {
    let mut labels = Vec::new();
    if hand.is_pinch() {
        labels.push(TextLabel::new(
            LabelKind::Pinch,
            "Click Detected".into(),
            PINCH_POS,
        ));
    }
    if hand.is_open() {
        labels.push(TextLabel::new(
            LabelKind::Open,
            "Open Detected".into(),
            OPEN_POS,
        ));
    }
    if let Some(n) = hand.number() {
        labels.push(TextLabel::new(
            LabelKind::Number,
            format!("Number: {n}"),
            NUMBER_POS,
        ));
    }

    let pos = hand.wrist().to_pixels(res) + Vector2::from(WRIST_LABEL_OFFSET);
    labels.push(TextLabel {
        kind: LabelKind::Handedness,
        text: hand.handedness().to_string(),
        pos,
    });
    labels
}

/// Returns all labels for a frame, starting with the frame rate.
pub fn labels(report: &FrameReport, res: Resolution) -> Vec<TextLabel> {
    let fps = TextLabel::new(
        LabelKind::FrameRate,
        // Truncated, not rounded.
        format!("FPS: {}", report.frame_rate() as u32),
        FPS_POS,
    );
    let mut labels = vec![fps];
    for hand in report.hands() {
        labels.extend(hand_labels(hand, res));
    }
    labels
}

/// Returns the bones of the hand skeleton as pixel-space line segments.
pub fn skeleton(set: &LandmarkSet, res: Resolution) -> Vec<(Point2<f32>, Point2<f32>)> {
    set.bones()
        .map(|(a, b)| (a.to_pixels(res), b.to_pixels(res)))
        .collect()
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use approx::assert_relative_eq;

    use crate::{
        frame::FrameEvaluator,
        hand::landmark::{Finger, Handedness, LandmarkIdx},
        test::HandBuilder,
    };

    use super::*;

    const RES: Resolution = Resolution::RES_VGA;

    fn texts(labels: &[TextLabel]) -> Vec<&str> {
        labels.iter().map(|l| l.text.as_str()).collect()
    }

    #[test]
    fn fist_has_no_number() {
        let mut eval = FrameEvaluator::default();
        let report = eval.evaluate(&[HandBuilder::fist(Handedness::Left).build()], RES);
        assert_eq!(texts(&labels(&report, RES)), ["FPS: 0", "Left"]);
    }

    #[test]
    fn open_hand_labels() {
        let set = HandBuilder::open(Handedness::Right)
            .at(LandmarkIdx::Wrist, 320.0, 440.0)
            .build();
        let mut eval = FrameEvaluator::default();
        let t0 = Instant::now();
        eval.evaluate_at(t0, &[], RES);
        let report = eval.evaluate_at(t0 + Duration::from_millis(32), &[set], RES);

        let labels = labels(&report, RES);
        assert_eq!(
            texts(&labels),
            ["FPS: 31", "Open Detected", "Number: 5", "Right"]
        );
        let wrist = &labels[3];
        assert_eq!(wrist.kind, LabelKind::Handedness);
        assert_relative_eq!(wrist.pos.x, 300.0, epsilon = 1e-3);
        assert_relative_eq!(wrist.pos.y, 420.0, epsilon = 1e-3);
    }

    #[test]
    fn pinch_label() {
        let set = HandBuilder::fist(Handedness::Right)
            .extend(Finger::Index)
            .at(LandmarkIdx::ThumbTip, 275.0, 215.0)
            .build();
        let mut eval = FrameEvaluator::default();
        let report = eval.evaluate(&[set], RES);
        let labels = hand_labels(&report.hands()[0], RES);
        assert_eq!(labels[0].kind, LabelKind::Pinch);
        assert_eq!(labels[0].text, "Click Detected");
    }

    #[test]
    fn skeleton_segments() {
        let set = HandBuilder::fist(Handedness::Left).build();
        let segments = skeleton(&set, RES);
        assert_eq!(segments.len(), 21);
        assert_relative_eq!(segments[0].0.x, 320.0, epsilon = 1e-3);
        assert_relative_eq!(segments[0].0.y, 400.0, epsilon = 1e-3);
    }
}
