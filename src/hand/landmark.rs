//! The 21-point hand skeleton emitted by the landmark detector.

use std::{fmt, str::FromStr};

use nalgebra::Point2;

use crate::{error::LandmarkError, resolution::Resolution};

/// Number of landmarks in a [`LandmarkSet`].
pub const NUM_LANDMARKS: usize = 21;

/// A single hand landmark in normalized image coordinates.
///
/// `x` grows to the right and `y` grows *downwards*, both as a fraction of the frame size.
#[derive(Debug, PartialEq, PartialOrd, Clone, Copy, Default)]
pub struct Landmark {
    x: f32,
    y: f32,
}

impl Landmark {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn x(&self) -> f32 {
        self.x
    }

    #[inline]
    pub fn y(&self) -> f32 {
        self.y
    }

    /// Converts this landmark to a pixel position in a frame of the given [`Resolution`].
    pub fn to_pixels(&self, res: Resolution) -> Point2<f32> {
        let [x, y] = res.to_pixels(self.x, self.y);
        Point2::new(x, y)
    }

    fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<[f32; 2]> for Landmark {
    fn from([x, y]: [f32; 2]) -> Self {
        Self::new(x, y)
    }
}

/// Which hand a [`LandmarkSet`] belongs to, as seen from the camera.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Handedness {
    Left,
    Right,
}

impl Handedness {
    /// Returns the opposite hand.
    pub fn flip(self) -> Self {
        match self {
            Handedness::Left => Handedness::Right,
            Handedness::Right => Handedness::Left,
        }
    }

    /// Returns the label the detector uses for this hand.
    pub fn label(self) -> &'static str {
        match self {
            Handedness::Left => "Left",
            Handedness::Right => "Right",
        }
    }
}

impl fmt::Display for Handedness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Parses the detector's `"Left"` / `"Right"` classification label.
impl FromStr for Handedness {
    type Err = LandmarkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Left" => Ok(Handedness::Left),
            "Right" => Ok(Handedness::Right),
            other => Err(LandmarkError::UnknownHandedness(other.to_string())),
        }
    }
}

/// Names for the hand pose landmarks.
///
/// # Terminology
///
/// - **CMC**: [Carpometacarpal joint], the lowest joint of the thumb, located near the wrist.
/// - **MCP**: [Metacarpophalangeal joint], the lower joint forming the knuckles near the palm of
///   the hand.
/// - **PIP**: Proximal Interphalangeal joint, the joint between the MCP and DIP.
/// - **DIP**: Distal Interphalangeal joint, the highest joint of a finger.
/// - **Tip**: This landmark is just placed on the tip of the finger, above the DIP.
///
/// The discriminants are the indices used by the detector and must not be reordered.
///
/// [Carpometacarpal joint]: https://en.wikipedia.org/wiki/Carpometacarpal_joint
/// [Metacarpophalangeal joint]: https://en.wikipedia.org/wiki/Metacarpophalangeal_joint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LandmarkIdx {
    Wrist = 0,
    ThumbCmc = 1,
    ThumbMcp = 2,
    ThumbIp = 3,
    ThumbTip = 4,
    IndexFingerMcp = 5,
    IndexFingerPip = 6,
    IndexFingerDip = 7,
    IndexFingerTip = 8,
    MiddleFingerMcp = 9,
    MiddleFingerPip = 10,
    MiddleFingerDip = 11,
    MiddleFingerTip = 12,
    RingFingerMcp = 13,
    RingFingerPip = 14,
    RingFingerDip = 15,
    RingFingerTip = 16,
    PinkyMcp = 17,
    PinkyPip = 18,
    PinkyDip = 19,
    PinkyTip = 20,
}

impl LandmarkIdx {
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }
}

/// The five fingers, in the order used by finger-extension vectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Finger {
    Thumb,
    Index,
    Middle,
    Ring,
    Pinky,
}

impl Finger {
    pub const ALL: [Finger; 5] = [
        Finger::Thumb,
        Finger::Index,
        Finger::Middle,
        Finger::Ring,
        Finger::Pinky,
    ];

    /// The four fingers whose extension is decided by the vertical tip/PIP ordering.
    pub const NON_THUMB: [Finger; 4] = [
        Finger::Index,
        Finger::Middle,
        Finger::Ring,
        Finger::Pinky,
    ];

    pub fn tip(self) -> LandmarkIdx {
        match self {
            Finger::Thumb => LandmarkIdx::ThumbTip,
            Finger::Index => LandmarkIdx::IndexFingerTip,
            Finger::Middle => LandmarkIdx::MiddleFingerTip,
            Finger::Ring => LandmarkIdx::RingFingerTip,
            Finger::Pinky => LandmarkIdx::PinkyTip,
        }
    }

    /// Returns the joint the fingertip is compared against to decide extension.
    ///
    /// For the thumb this is its MCP joint (the thumb has no PIP joint), for all other fingers it
    /// is the PIP joint.
    pub fn reference_joint(self) -> LandmarkIdx {
        match self {
            Finger::Thumb => LandmarkIdx::ThumbMcp,
            Finger::Index => LandmarkIdx::IndexFingerPip,
            Finger::Middle => LandmarkIdx::MiddleFingerPip,
            Finger::Ring => LandmarkIdx::RingFingerPip,
            Finger::Pinky => LandmarkIdx::PinkyPip,
        }
    }
}

/// The 21 landmarks of a single detected hand, plus its [`Handedness`].
///
/// A [`LandmarkSet`] always holds exactly [`NUM_LANDMARKS`] finite landmarks; this is checked on
/// construction so that classification can't fail.
#[derive(Debug, Clone, PartialEq)]
pub struct LandmarkSet {
    landmarks: [Landmark; NUM_LANDMARKS],
    handedness: Handedness,
}

impl LandmarkSet {
    /// Creates a [`LandmarkSet`] from the detector's landmarks, in detector index order.
    pub fn new<I>(landmarks: I, handedness: Handedness) -> Result<Self, LandmarkError>
    where
        I: IntoIterator,
        I::Item: Into<Landmark>,
    {
        let landmarks: Vec<Landmark> = landmarks.into_iter().map(Into::into).collect();
        let count = landmarks.len();
        let landmarks: [Landmark; NUM_LANDMARKS] = landmarks
            .try_into()
            .map_err(|_| LandmarkError::MalformedLandmarkSet { count })?;

        if let Some(index) = landmarks.iter().position(|lm| !lm.is_finite()) {
            return Err(LandmarkError::NonFiniteCoordinate { index });
        }

        Ok(Self {
            landmarks,
            handedness,
        })
    }

    /// Creates a [`LandmarkSet`] from landmarks and the detector's textual handedness label.
    pub fn from_labeled<I>(landmarks: I, label: &str) -> Result<Self, LandmarkError>
    where
        I: IntoIterator,
        I::Item: Into<Landmark>,
    {
        let handedness = label.parse()?;
        Self::new(landmarks, handedness)
    }

    #[inline]
    pub fn handedness(&self) -> Handedness {
        self.handedness
    }

    /// Returns a copy of `self` with the handedness label replaced.
    pub fn with_handedness(&self, handedness: Handedness) -> Self {
        Self {
            landmarks: self.landmarks,
            handedness,
        }
    }

    #[inline]
    pub fn get(&self, idx: LandmarkIdx) -> Landmark {
        self.landmarks[idx.index()]
    }

    pub fn landmarks(&self) -> &[Landmark; NUM_LANDMARKS] {
        &self.landmarks
    }

    /// Returns the pairs of landmarks connected by a bone of the hand skeleton.
    pub fn bones(&self) -> impl Iterator<Item = (Landmark, Landmark)> + '_ {
        CONNECTIVITY
            .iter()
            .map(|&(a, b)| (self.get(a), self.get(b)))
    }
}

const CONNECTIVITY: &[(LandmarkIdx, LandmarkIdx)] = {
    use LandmarkIdx::*;
    &[
        // Surround the palm:
        (Wrist, ThumbCmc),
        (ThumbCmc, IndexFingerMcp),
        (IndexFingerMcp, MiddleFingerMcp),
        (MiddleFingerMcp, RingFingerMcp),
        (RingFingerMcp, PinkyMcp),
        (PinkyMcp, Wrist),
        // Thumb:
        (ThumbCmc, ThumbMcp),
        (ThumbMcp, ThumbIp),
        (ThumbIp, ThumbTip),
        // Index:
        (IndexFingerMcp, IndexFingerPip),
        (IndexFingerPip, IndexFingerDip),
        (IndexFingerDip, IndexFingerTip),
        // Middle:
        (MiddleFingerMcp, MiddleFingerPip),
        (MiddleFingerPip, MiddleFingerDip),
        (MiddleFingerDip, MiddleFingerTip),
        // Ring:
        (RingFingerMcp, RingFingerPip),
        (RingFingerPip, RingFingerDip),
        (RingFingerDip, RingFingerTip),
        // Pinky:
        (PinkyMcp, PinkyPip),
        (PinkyPip, PinkyDip),
        (PinkyDip, PinkyTip),
    ]
};

#[cfg(test)]
mod tests {
    use super::*;

    fn points(n: usize) -> Vec<[f32; 2]> {
        (0..n).map(|i| [i as f32 / 20.0, 0.5]).collect()
    }

    #[test]
    fn indices_match_detector_convention() {
        assert_eq!(LandmarkIdx::Wrist.index(), 0);
        assert_eq!(LandmarkIdx::ThumbMcp.index(), 2);
        assert_eq!(LandmarkIdx::ThumbTip.index(), 4);
        assert_eq!(LandmarkIdx::IndexFingerPip.index(), 6);
        assert_eq!(LandmarkIdx::IndexFingerTip.index(), 8);
        assert_eq!(LandmarkIdx::MiddleFingerTip.index(), 12);
        assert_eq!(LandmarkIdx::RingFingerTip.index(), 16);
        assert_eq!(LandmarkIdx::PinkyPip.index(), 18);
        assert_eq!(LandmarkIdx::PinkyTip.index(), 20);

        let tips: Vec<_> = Finger::NON_THUMB.iter().map(|f| f.tip().index()).collect();
        let pips: Vec<_> = Finger::NON_THUMB
            .iter()
            .map(|f| f.reference_joint().index())
            .collect();
        assert_eq!(tips, [8, 12, 16, 20]);
        assert_eq!(pips, [6, 10, 14, 18]);
    }

    #[test]
    fn rejects_wrong_landmark_count() {
        for n in [0, 20, 22] {
            assert_eq!(
                LandmarkSet::new(points(n), Handedness::Left),
                Err(LandmarkError::MalformedLandmarkSet { count: n })
            );
        }
        assert!(LandmarkSet::new(points(21), Handedness::Left).is_ok());
    }

    #[test]
    fn rejects_non_finite_coordinates() {
        let mut pts = points(21);
        pts[7][1] = f32::NAN;
        assert_eq!(
            LandmarkSet::new(pts, Handedness::Right),
            Err(LandmarkError::NonFiniteCoordinate { index: 7 })
        );
    }

    #[test]
    fn accepts_out_of_frame_coordinates() {
        let mut pts = points(21);
        pts[0] = [-0.05, 1.02];
        let set = LandmarkSet::new(pts, Handedness::Right).unwrap();
        assert_eq!(set.get(LandmarkIdx::Wrist), Landmark::new(-0.05, 1.02));
    }

    #[test]
    fn parse_handedness() {
        assert_eq!("Left".parse(), Ok(Handedness::Left));
        assert_eq!(" Right\n".parse(), Ok(Handedness::Right));
        assert_eq!(
            "left".parse::<Handedness>(),
            Err(LandmarkError::UnknownHandedness("left".into()))
        );
        assert!(LandmarkSet::from_labeled(points(21), "Both").is_err());
        assert_eq!(Handedness::Left.flip(), Handedness::Right);
        assert_eq!(Handedness::Right.to_string(), "Right");
    }

    #[test]
    fn skeleton() {
        let set = LandmarkSet::new(points(21), Handedness::Left).unwrap();
        assert_eq!(set.bones().count(), 21);
        let (a, b) = set.bones().last().unwrap();
        assert_eq!(a, set.get(LandmarkIdx::PinkyDip));
        assert_eq!(b, set.get(LandmarkIdx::PinkyTip));
    }
}
