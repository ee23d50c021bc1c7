//! Debouncing of discrete values.

use super::Filter;

/// Holds on to a value until a different one has been pushed `frames` times in a row.
///
/// This suppresses short-lived flips of discrete values, such as a finger count oscillating
/// between two numbers while a finger is held right at the extension threshold. The first value
/// pushed after construction or [`Filter::reset`] is published immediately.
#[derive(Debug, Clone)]
pub struct Debounce<V> {
    frames: usize,
    stable: Option<V>,
    candidate: Option<(V, usize)>,
}

impl<V> Debounce<V> {
    /// Creates a debouncer that requires a new value to be seen in `frames` consecutive pushes.
    ///
    /// With `frames` set to 0 or 1, every value is published immediately.
    pub fn new(frames: usize) -> Self {
        Self {
            frames: frames.max(1),
            stable: None,
            candidate: None,
        }
    }
}

impl<V: PartialEq + Clone> Filter<V> for Debounce<V> {
    fn push(&mut self, value: V) -> V {
        let Some(stable) = self.stable.clone() else {
            self.stable = Some(value.clone());
            return value;
        };

        if stable == value {
            self.candidate = None;
            return value;
        }

        let seen = match self.candidate.take() {
            Some((candidate, count)) if candidate == value => count + 1,
            _ => 1,
        };

        if seen >= self.frames {
            self.stable = Some(value.clone());
            value
        } else {
            self.candidate = Some((value, seen));
            stable
        }
    }

    fn reset(&mut self) {
        self.stable = None;
        self.candidate = None;
    }
}
