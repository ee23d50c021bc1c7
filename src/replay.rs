//! JSON-lines format of recorded detector output and of the produced reports.

use std::time::{Duration, Instant};

use anyhow::Context;
use handsign::{
    frame::{FrameReport, HandDetection},
    hand::landmark::{Landmark, LandmarkSet},
    overlay,
    resolution::Resolution,
};
use serde::{Deserialize, Serialize};

/// One frame of detector output.
#[derive(Debug, Deserialize)]
pub struct FrameInput {
    pub width: u32,
    pub height: u32,
    /// Capture time in seconds. Any origin is fine, only differences are used.
    #[serde(default)]
    pub timestamp: Option<f64>,
    #[serde(default)]
    pub hands: Vec<HandInput>,
}

#[derive(Debug, Deserialize)]
pub struct HandInput {
    pub handedness: String,
    #[serde(default = "full_confidence")]
    pub score: f32,
    pub landmarks: Vec<Point>,
}

fn full_confidence() -> f32 {
    1.0
}

/// A landmark as emitted by the detector. The depth coordinate is accepted and ignored.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(untagged)]
pub enum Point {
    Xy([f32; 2]),
    Xyz([f32; 3]),
}

impl From<Point> for Landmark {
    fn from(p: Point) -> Self {
        match p {
            Point::Xy([x, y]) | Point::Xyz([x, y, _]) => Landmark::new(x, y),
        }
    }
}

impl FrameInput {
    pub fn resolution(&self) -> Resolution {
        Resolution::new(self.width, self.height)
    }

    /// Converts the hands of this frame to [`HandDetection`]s.
    ///
    /// Malformed hands and hands below `min_confidence` are dropped with a log message. At most
    /// `max_hands` detections are returned, in input order.
    pub fn detections(&self, min_confidence: f32, max_hands: usize) -> Vec<HandDetection> {
        self.hands
            .iter()
            .enumerate()
            .filter_map(|(i, hand)| {
                if hand.score < min_confidence {
                    log::debug!(
                        "dropping hand {i}: confidence {} below {min_confidence}",
                        hand.score
                    );
                    return None;
                }
                let points = hand.landmarks.iter().copied();
                match LandmarkSet::from_labeled(points, &hand.handedness) {
                    Ok(set) => Some(HandDetection::new(set, hand.score)),
                    Err(e) => {
                        log::warn!("dropping hand {i}: {e}");
                        None
                    }
                }
            })
            .take(max_hands)
            .collect()
    }
}

/// Maps the timestamps of a recorded stream onto [`Instant`]s.
pub struct StreamClock {
    start: Instant,
    origin: Option<f64>,
}

impl Default for StreamClock {
    fn default() -> Self {
        Self {
            start: Instant::now(),
            origin: None,
        }
    }
}

impl StreamClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the [`Instant`] of a frame, falling back to the current time if the frame has no
    /// timestamp.
    ///
    /// Returns an error if the timestamp is too far from the first timestamp of the stream to be
    /// represented as an [`Instant`].
    pub fn instant(&mut self, timestamp: Option<f64>) -> anyhow::Result<Instant> {
        let Some(t) = timestamp.filter(|t| t.is_finite()) else {
            return Ok(Instant::now());
        };
        let origin = *self.origin.get_or_insert(t);
        let delta = t - origin;
        let offset = Duration::try_from_secs_f64(delta.abs())
            .with_context(|| format!("timestamp {t} is {delta}s away from stream start {origin}"))?;
        if delta >= 0.0 {
            self.start
                .checked_add(offset)
                .with_context(|| format!("timestamp {t} is too far after stream start {origin}"))
        } else {
            // Frames before the first one report a frame rate of 0, so clamping to `start` is fine.
            Ok(self.start.checked_sub(offset).unwrap_or(self.start))
        }
    }
}

#[derive(Debug, Serialize)]
pub struct FrameOutput {
    pub frame_rate: f32,
    pub hands: Vec<HandOutput>,
    pub labels: Vec<LabelOutput>,
}

#[derive(Debug, Serialize)]
pub struct HandOutput {
    pub handedness: &'static str,
    pub fingers_extended: u8,
    pub fingers: [bool; 5],
    pub pinch: bool,
    pub open: bool,
    pub wrist: [f32; 2],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f32>,
}

#[derive(Debug, Serialize)]
pub struct LabelOutput {
    pub text: String,
    pub x: f32,
    pub y: f32,
}

impl FrameOutput {
    pub fn new(report: &FrameReport, res: Resolution) -> Self {
        let hands = report
            .hands()
            .iter()
            .map(|hand| HandOutput {
                handedness: hand.handedness().label(),
                fingers_extended: hand.fingers_extended(),
                fingers: hand.fingers(),
                pinch: hand.is_pinch(),
                open: hand.is_open(),
                wrist: [hand.wrist().x(), hand.wrist().y()],
                confidence: hand.confidence(),
            })
            .collect();
        let labels = overlay::labels(report, res)
            .into_iter()
            .map(|label| LabelOutput {
                text: label.text,
                x: label.pos.x,
                y: label.pos.y,
            })
            .collect();

        Self {
            frame_rate: report.frame_rate(),
            hands,
            labels,
        }
    }
}

#[cfg(test)]
mod tests {
    use handsign::hand::landmark::Handedness;

    use super::*;

    fn frame_json(hands: &str) -> String {
        format!(r#"{{"width":640,"height":480,"timestamp":2.5,"hands":[{hands}]}}"#)
    }

    fn hand_json(label: &str, score: f32, count: usize) -> String {
        let points = (0..count)
            .map(|i| format!("[{}, 0.5, -0.01]", i as f32 / 40.0))
            .collect::<Vec<_>>()
            .join(",");
        format!(r#"{{"handedness":"{label}","score":{score},"landmarks":[{points}]}}"#)
    }

    #[test]
    fn parses_frame() {
        let json = frame_json(&hand_json("Left", 0.9, 21));
        let frame: FrameInput = serde_json::from_str(&json).unwrap();
        assert_eq!(frame.resolution(), Resolution::RES_VGA);
        assert_eq!(frame.timestamp, Some(2.5));

        let dets = frame.detections(0.8, 2);
        assert_eq!(dets.len(), 1);
        assert_eq!(dets[0].landmarks().handedness(), Handedness::Left);
        assert_eq!(dets[0].confidence(), 0.9);
    }

    #[test]
    fn accepts_2d_points_and_missing_fields() {
        let json = r#"{"width":10,"height":10,"hands":[{"handedness":"Right","landmarks":[
            [0,0],[0,0],[0,0],[0,0],[0,0],[0,0],[0,0],[0,0],[0,0],[0,0],[0,0],
            [0,0],[0,0],[0,0],[0,0],[0,0],[0,0],[0,0],[0,0],[0,0],[0,0]]}]}"#;
        let frame: FrameInput = serde_json::from_str(json).unwrap();
        assert_eq!(frame.timestamp, None);
        let dets = frame.detections(0.8, 2);
        assert_eq!(dets.len(), 1);
        assert_eq!(dets[0].confidence(), 1.0);
    }

    #[test]
    fn drops_rejected_hands() {
        let hands = [
            hand_json("Left", 0.5, 21),
            hand_json("Right", 0.9, 20),
            hand_json("Up", 0.9, 21),
            hand_json("Right", 0.95, 21),
            hand_json("Left", 0.99, 21),
            hand_json("Left", 0.99, 21),
        ]
        .join(",");
        let frame: FrameInput = serde_json::from_str(&frame_json(&hands)).unwrap();
        let dets = frame.detections(0.8, 2);
        let kept: Vec<_> = dets.iter().map(|d| d.confidence()).collect();
        assert_eq!(kept, [0.95f32, 0.99]);
    }

    #[test]
    fn stream_clock() {
        let mut clock = StreamClock::new();
        let a = clock.instant(Some(10.0)).unwrap();
        let b = clock.instant(Some(10.5)).unwrap();
        assert_eq!(b - a, Duration::from_millis(500));
        assert_eq!(clock.instant(Some(10.0)).unwrap(), a);
        assert!(clock.instant(None).is_ok());
        assert!(clock.instant(Some(f64::NAN)).is_ok());
    }

    #[test]
    fn stream_clock_rejects_unrepresentable_offsets() {
        let mut clock = StreamClock::default();
        clock.instant(Some(0.0)).unwrap();
        assert!(clock.instant(Some(1e20)).is_err());
        assert!(clock.instant(Some(f64::MAX)).is_err());
        assert!(clock.instant(Some(1e12)).is_ok());

        let mut clock = StreamClock::default();
        clock.instant(Some(f64::MAX)).unwrap();
        // The difference overflows to infinity.
        assert!(clock.instant(Some(-f64::MAX)).is_err());
    }

    #[test]
    fn output_shape() {
        let json = frame_json(&hand_json("Right", 0.9, 21));
        let frame: FrameInput = serde_json::from_str(&json).unwrap();
        let dets = frame.detections(0.0, 2);
        let mut eval = handsign::frame::FrameEvaluator::default();
        let report = eval.evaluate_detections(Instant::now(), &dets, frame.resolution());
        let out = serde_json::to_value(FrameOutput::new(&report, frame.resolution())).unwrap();
        assert_eq!(out["hands"][0]["handedness"], "Right");
        assert_eq!(out["hands"][0]["fingers"].as_array().unwrap().len(), 5);
        assert_eq!(out["labels"][0]["text"], "FPS: 0");
    }
}
