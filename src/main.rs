//! Replays recorded hand detector output through the gesture classifier.
//!
//! Reads one JSON frame per line from the file given as the first argument, or from stdin, and
//! writes one JSON report per line to stdout.

mod replay;

use std::{
    env::{self, VarError},
    fs::File,
    io::{self, BufRead, BufReader, BufWriter, Write},
    str::FromStr,
};

use anyhow::{ensure, Context};
use handsign::{
    frame::FrameEvaluator,
    hand::{
        gesture::{GestureClassifier, Thresholds},
        smoothing::ReportSmoother,
    },
    timer::FpsCounter,
};

use replay::{FrameInput, FrameOutput, StreamClock};

struct Config {
    thresholds: Thresholds,
    min_confidence: f32,
    max_hands: usize,
    smoothing: usize,
}

impl Config {
    const DEFAULT_MIN_CONFIDENCE: f32 = 0.8;
    const DEFAULT_MAX_HANDS: usize = 2;

    fn from_env() -> anyhow::Result<Self> {
        let defaults = Thresholds::default();
        let thresholds = defaults
            .pinch_distance(env_var("HANDSIGN_PINCH_PX", defaults.pinch_px())?)
            .open_distance(env_var("HANDSIGN_OPEN_PX", defaults.open_px())?);
        ensure!(
            thresholds.pinch_px() > 0.0 && thresholds.open_px() > 0.0,
            "distance thresholds must be positive, got {thresholds:?}"
        );

        let min_confidence = env_var("HANDSIGN_MIN_CONFIDENCE", Self::DEFAULT_MIN_CONFIDENCE)?;
        ensure!(
            (0.0..=1.0).contains(&min_confidence),
            "HANDSIGN_MIN_CONFIDENCE must be between 0 and 1, got {min_confidence}"
        );

        Ok(Self {
            thresholds,
            min_confidence,
            max_hands: env_var("HANDSIGN_MAX_HANDS", Self::DEFAULT_MAX_HANDS)?,
            smoothing: env_var("HANDSIGN_SMOOTHING", 0)?,
        })
    }
}

fn env_var<T>(name: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .with_context(|| format!("invalid value {value:?} for {name}")),
        Err(VarError::NotPresent) => Ok(default),
        Err(e) => Err(e).with_context(|| format!("failed to read {name}")),
    }
}

fn open_input() -> anyhow::Result<(Box<dyn BufRead>, String)> {
    let Some(path) = env::args_os().nth(1) else {
        return Ok((Box::new(io::stdin().lock()), "<stdin>".into()));
    };
    let name = path.to_string_lossy().into_owned();
    let file = File::open(&path).with_context(|| format!("failed to open {name}"))?;
    Ok((Box::new(BufReader::new(file)), name))
}

fn main() -> anyhow::Result<()> {
    handsign::init_logger!();

    let config = Config::from_env()?;
    let (input, input_name) = open_input()?;
    log::info!(
        "replaying {input_name} (pinch < {}px, open > {}px, smoothing {} frames)",
        config.thresholds.pinch_px(),
        config.thresholds.open_px(),
        config.smoothing,
    );

    let mut evaluator = FrameEvaluator::new(GestureClassifier::new(config.thresholds));
    let mut smoother = ReportSmoother::new(config.smoothing);
    let mut clock = StreamClock::new();
    let mut fps = FpsCounter::new("replay");
    let mut out = BufWriter::new(io::stdout().lock());

    for (i, line) in input.lines().enumerate() {
        let lineno = i + 1;
        let line = line.with_context(|| format!("failed to read line {lineno} of {input_name}"))?;
        if line.trim().is_empty() {
            continue;
        }

        let frame: FrameInput = serde_json::from_str(&line)
            .with_context(|| format!("invalid frame on line {lineno} of {input_name}"))?;
        let res = frame.resolution();
        ensure!(
            res.width() > 0 && res.height() > 0,
            "frame on line {lineno} has empty resolution {res}"
        );

        let detections = frame.detections(config.min_confidence, config.max_hands);
        let timestamp = clock
            .instant(frame.timestamp)
            .with_context(|| format!("invalid timestamp on line {lineno} of {input_name}"))?;
        let report = evaluator.evaluate_detections(timestamp, &detections, res);
        let report = smoother.smooth(report);

        serde_json::to_writer(&mut out, &FrameOutput::new(&report, res))?;
        out.write_all(b"\n")?;

        fps.tick_with(evaluator.timers());
    }

    out.flush()?;
    Ok(())
}
