//! Optional temporal smoothing of gesture results.
//!
//! [`FrameEvaluator`] classifies every frame independently, so a finger held right at the
//! extension threshold can make the reported number flicker between frames. [`ReportSmoother`]
//! can be applied to its reports to only publish a change once it has persisted for a number of
//! frames. Nothing in the classifier uses it implicitly.
//!
//! [`FrameEvaluator`]: crate::frame::FrameEvaluator

use std::collections::HashMap;

use crate::{
    filter::{Debounce, Filter},
    frame::FrameReport,
};

use super::landmark::Handedness;

#[derive(Debug)]
struct HandFilters {
    fingers: Debounce<[bool; 5]>,
    pinch: Debounce<bool>,
    open: Debounce<bool>,
}

impl HandFilters {
    fn new(frames: usize) -> Self {
        Self {
            fingers: Debounce::new(frames),
            pinch: Debounce::new(frames),
            open: Debounce::new(frames),
        }
    }
}

/// Debounces the gestures of consecutive [`FrameReport`]s.
///
/// Hands are not tracked across frames, so they are matched up by [`Handedness`]: the first hand
/// of each handedness in a report is smoothed against the previous hand with that handedness.
/// Further hands with the same handedness in the same frame are passed through unchanged. When no
/// hand of a handedness is present in a report, its history is discarded.
#[derive(Debug)]
pub struct ReportSmoother {
    frames: usize,
    hands: HashMap<Handedness, HandFilters>,
}

impl ReportSmoother {
    /// Creates a smoother that requires a gesture change to be observed in `frames` consecutive
    /// reports before publishing it.
    ///
    /// A `frames` value of 0 or 1 disables smoothing.
    pub fn new(frames: usize) -> Self {
        Self {
            frames,
            hands: HashMap::new(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.frames > 1
    }

    /// Smooths the gestures in `report`.
    pub fn smooth(&mut self, report: FrameReport) -> FrameReport {
        if !self.is_enabled() {
            return report;
        }

        let frame_rate = report.frame_rate();
        let hands = report.into_hands();

        self.hands
            .retain(|handedness, _| hands.iter().any(|h| h.handedness() == *handedness));

        let mut seen = Vec::with_capacity(2);
        let hands = hands
            .into_iter()
            .map(|hand| {
                let handedness = hand.handedness();
                if seen.contains(&handedness) {
                    log::trace!("multiple {handedness} hands in frame, not smoothing");
                    return hand;
                }
                seen.push(handedness);

                let frames = self.frames;
                let filters = self
                    .hands
                    .entry(handedness)
                    .or_insert_with(|| HandFilters::new(frames));
                let fingers = filters.fingers.push(hand.fingers());
                let pinch = filters.pinch.push(hand.is_pinch());
                let open = filters.open.push(hand.is_open());
                hand.with_gestures(fingers, pinch, open)
            })
            .collect();

        FrameReport::new(hands, frame_rate)
    }

    /// Discards the history of all hands.
    pub fn reset(&mut self) {
        self.hands.clear();
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use crate::{
        frame::FrameEvaluator,
        hand::landmark::{Finger, LandmarkSet},
        resolution::Resolution,
        test::HandBuilder,
    };

    use super::*;

    fn run(smoother: &mut ReportSmoother, frames: &[Vec<LandmarkSet>]) -> Vec<Vec<u8>> {
        let mut eval = FrameEvaluator::default();
        let t0 = Instant::now();
        frames
            .iter()
            .enumerate()
            .map(|(i, hands)| {
                let t = t0 + Duration::from_millis(33 * i as u64);
                let report = smoother.smooth(eval.evaluate_at(t, hands, Resolution::RES_VGA));
                report
                    .hands()
                    .iter()
                    .map(|h| h.fingers_extended())
                    .collect()
            })
            .collect()
    }

    fn two() -> LandmarkSet {
        HandBuilder::fist(Handedness::Right)
            .extend(Finger::Index)
            .extend(Finger::Middle)
            .build()
    }

    fn three() -> LandmarkSet {
        HandBuilder::fist(Handedness::Right)
            .extend(Finger::Index)
            .extend(Finger::Middle)
            .extend(Finger::Ring)
            .build()
    }

    #[test]
    fn disabled_is_passthrough() {
        let mut smoother = ReportSmoother::new(1);
        assert!(!smoother.is_enabled());
        let out = run(&mut smoother, &[vec![two()], vec![three()], vec![two()]]);
        assert_eq!(out, [vec![2u8], vec![3], vec![2]]);
    }

    #[test]
    fn suppresses_single_frame_flicker() {
        let mut smoother = ReportSmoother::new(2);
        let out = run(
            &mut smoother,
            &[
                vec![two()],
                vec![three()],
                vec![two()],
                vec![three()],
                vec![three()],
            ],
        );
        assert_eq!(out, [vec![2u8], vec![2], vec![2], vec![2], vec![3]]);
    }

    #[test]
    fn history_dropped_when_hand_disappears() {
        let mut smoother = ReportSmoother::new(3);
        let out = run(&mut smoother, &[vec![two()], vec![], vec![three()]]);
        assert_eq!(out, [vec![2u8], vec![], vec![3]]);
    }

    #[test]
    fn duplicate_handedness_passes_through() {
        let mut smoother = ReportSmoother::new(3);
        let out = run(
            &mut smoother,
            &[vec![two(), three()], vec![three(), three()]],
        );
        assert_eq!(out, [vec![2u8, 3], vec![2, 3]]);
    }
}
