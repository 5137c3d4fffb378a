use crate::Angles;
use std::collections::VecDeque;

/// Minimum interval between samples in milliseconds.
pub const RECORD_INTERVAL: f64 = 50.;
/// Rolling window of the history in milliseconds.
pub const RECORD_WINDOW: f64 = 30000.;

/// A recorded state.
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Sample {
    /// Elapsed time since the recorder started, in milliseconds
    pub time: f64,
    /// Middle link angle
    pub angle1: f64,
    /// Seat-pan interior angle
    pub angle2: f64,
    /// Backrest interior angle
    pub angle3: f64,
    /// Absolute seat-pan direction in (-180, 180]
    pub seat_pan: f64,
    /// Label of the held button
    pub label: Option<&'static str>,
}

/// Fixed-interval history of the angles with a rolling time window.
#[derive(Clone, Debug)]
pub struct Recorder {
    start: f64,
    last: Option<f64>,
    interval: f64,
    window: f64,
    samples: VecDeque<Sample>,
}

impl Default for Recorder {
    fn default() -> Self {
        Self::new(0.)
    }
}

impl Recorder {
    /// Create a recorder starting at `now` (milliseconds).
    pub fn new(now: f64) -> Self {
        Self::with_window(now, RECORD_INTERVAL, RECORD_WINDOW)
    }

    /// Create a recorder with a custom interval and window.
    pub fn with_window(now: f64, interval: f64, window: f64) -> Self {
        Self { start: now, last: None, interval, window, samples: VecDeque::new() }
    }

    /// Record the angles if the interval has passed since the last sample.
    /// Return true if a sample was taken.
    pub fn record_if_due(&mut self, now: f64, angles: &Angles, label: Option<&'static str>) -> bool {
        if self.last.is_some_and(|last| now - last < self.interval) {
            return false;
        }
        self.last = Some(now);
        let time = now - self.start;
        self.samples.push_back(Sample {
            time,
            angle1: angles.a1,
            angle2: angles.a2,
            angle3: angles.a3,
            seat_pan: angles.seat_pan(),
            label,
        });
        let expired = time - self.window;
        while self.samples.front().is_some_and(|s| s.time <= expired) {
            self.samples.pop_front();
        }
        true
    }

    /// Drop all samples and restart the clock at `now`.
    pub fn clear(&mut self, now: f64) {
        self.samples.clear();
        self.start = now;
        self.last = None;
    }

    /// Recorded samples, oldest first.
    pub fn samples(&self) -> impl ExactSizeIterator<Item = &Sample> + '_ {
        self.samples.iter()
    }

    /// The latest sample.
    pub fn latest(&self) -> Option<&Sample> {
        self.samples.back()
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Check if no sample is recorded.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}
