//! Per-frame evaluation of all detected hands.

use std::time::Instant;

use crate::{
    hand::{
        gesture::{GestureClassifier, GestureResult},
        landmark::LandmarkSet,
    },
    resolution::Resolution,
    timer::Timer,
};

/// A hand as reported by the detector: its landmarks and the detector's confidence.
#[derive(Debug, Clone, PartialEq)]
pub struct HandDetection {
    landmarks: LandmarkSet,
    confidence: f32,
}

impl HandDetection {
    pub fn new(landmarks: LandmarkSet, confidence: f32) -> Self {
        Self {
            landmarks,
            confidence,
        }
    }

    pub fn landmarks(&self) -> &LandmarkSet {
        &self.landmarks
    }

    pub fn confidence(&self) -> f32 {
        self.confidence
    }
}

/// The gestures of all hands in one frame, plus the measured frame rate.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameReport {
    hands: Vec<GestureResult>,
    frame_rate: f32,
}

impl FrameReport {
    pub(crate) fn new(hands: Vec<GestureResult>, frame_rate: f32) -> Self {
        Self { hands, frame_rate }
    }

    /// Returns the classified hands, in the order the detector emitted them.
    pub fn hands(&self) -> &[GestureResult] {
        &self.hands
    }

    pub fn into_hands(self) -> Vec<GestureResult> {
        self.hands
    }

    /// Instantaneous frame rate in frames per second, for display.
    ///
    /// This is `0.0` for the first frame, and for frames that have the same timestamp as the
    /// previous frame.
    pub fn frame_rate(&self) -> f32 {
        self.frame_rate
    }
}

/// Classifies the hands of consecutive frames of a video stream.
///
/// Apart from the timestamp of the previous frame (for measuring the frame rate), no state is
/// carried between frames: every frame is classified from scratch, and a hand that disappears and
/// reappears is unrelated to its earlier appearance. Use one evaluator per video stream.
#[derive(Debug, Clone)]
pub struct FrameEvaluator {
    classifier: GestureClassifier,
    prev_timestamp: Option<Instant>,
    t_classify: Timer,
}

impl Default for FrameEvaluator {
    fn default() -> Self {
        Self::new(GestureClassifier::default())
    }
}

impl FrameEvaluator {
    pub fn new(classifier: GestureClassifier) -> Self {
        Self {
            classifier,
            prev_timestamp: None,
            t_classify: Timer::new("classify"),
        }
    }

    pub fn classifier(&self) -> &GestureClassifier {
        &self.classifier
    }

    /// Evaluates a frame that was just processed, timestamping it with the current time.
    pub fn evaluate(&mut self, hands: &[LandmarkSet], res: Resolution) -> FrameReport {
        self.evaluate_at(Instant::now(), hands, res)
    }

    /// Evaluates a frame with an explicit timestamp.
    pub fn evaluate_at(
        &mut self,
        timestamp: Instant,
        hands: &[LandmarkSet],
        res: Resolution,
    ) -> FrameReport {
        let results = self.t_classify.time(|| {
            hands
                .iter()
                .map(|set| self.classifier.classify(set, res))
                .collect::<Vec<_>>()
        });
        self.finish(timestamp, results)
    }

    /// Evaluates a frame of detector outputs, carrying each hand's confidence into its result.
    pub fn evaluate_detections(
        &mut self,
        timestamp: Instant,
        detections: &[HandDetection],
        res: Resolution,
    ) -> FrameReport {
        let results = self.t_classify.time(|| {
            detections
                .iter()
                .map(|det| {
                    self.classifier
                        .classify(det.landmarks(), res)
                        .with_confidence(det.confidence())
                })
                .collect::<Vec<_>>()
        });
        self.finish(timestamp, results)
    }

    /// Forgets the previous frame's timestamp, as if the evaluator was newly created.
    pub fn reset(&mut self) {
        self.prev_timestamp = None;
    }

    /// Returns profiling timers for use with [`FpsCounter::tick_with`].
    ///
    /// [`FpsCounter::tick_with`]: crate::timer::FpsCounter::tick_with
    pub fn timers(&self) -> impl IntoIterator<Item = &Timer> + '_ {
        [&self.t_classify]
    }

    fn finish(&mut self, timestamp: Instant, results: Vec<GestureResult>) -> FrameReport {
        for (i, res) in results.iter().enumerate() {
            log::trace!(
                "hand {i} ({}): {} fingers, pinch={}, open={}",
                res.handedness(),
                res.fingers_extended(),
                res.is_pinch(),
                res.is_open(),
            );
        }

        let frame_rate = self.frame_rate(timestamp);
        FrameReport::new(results, frame_rate)
    }

    fn frame_rate(&mut self, now: Instant) -> f32 {
        let prev = self.prev_timestamp.replace(now);
        let Some(prev) = prev else { return 0.0 };

        // `saturating_duration_since` maps timestamps earlier than `prev` to zero as well.
        let elapsed = now.saturating_duration_since(prev);
        if elapsed.is_zero() {
            log::debug!("frame timestamp did not advance, reporting 0 FPS");
            return 0.0;
        }
        1.0 / elapsed.as_secs_f32()
    }
}
