//! Tap recorder and rhythm-interval normalizer.
//!
//! # Responsibility
//! - Buffer raw tap timestamps between a start/stop capture bracket.
//! - Derive a tempo-scale-invariant interval fingerprint from the taps.
//!
//! # Invariants
//! - Taps are appended raw and in order; no de-duplication.
//! - Normalization divides every interval by the first interval, so the
//!   profile is anchored to the first gap. The anchor itself is
//!   un-normalized, which makes the whole profile sensitive to noise on
//!   exactly the first tap. Intentional, if fragile; see DESIGN.md.
//! - `stop_capture` does not clear the buffer: calling it again
//!   re-derives from the same stale taps, and an abandoned capture
//!   persists until the next `start_capture`. There is no timeout.

use crate::model::event::join_intervals;

/// Normalized interval profile derived from one tap capture.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RhythmProfile {
    /// Intervals divided by the first interval, rounded to 2 decimals.
    pub intervals: Vec<f64>,
    /// Intervals joined with `-`, e.g. `"1-0.5-2.5"`.
    pub fingerprint: String,
}

impl RhythmProfile {
    /// True when fewer than two taps were available.
    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }
}

/// Tap recorder producing [`RhythmProfile`] values.
#[derive(Debug, Default)]
pub struct RhythmProfiler {
    taps: Vec<f64>,
    base_time_ms: Option<f64>,
}

impl RhythmProfiler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears the tap buffer and records an optional reference time on
    /// the media clock.
    pub fn start_capture(&mut self, base_time_ms: Option<f64>) {
        self.taps.clear();
        self.base_time_ms = base_time_ms;
    }

    /// Appends one raw tap timestamp in milliseconds.
    pub fn tap(&mut self, at_ms: f64) {
        self.taps.push(at_ms);
    }

    /// Reference time recorded by the last `start_capture`, if any.
    pub fn base_time_ms(&self) -> Option<f64> {
        self.base_time_ms
    }

    /// Number of taps currently buffered.
    pub fn tap_count(&self) -> usize {
        self.taps.len()
    }

    /// Converts the buffered taps into a normalized profile.
    ///
    /// N taps yield N-1 intervals; fewer than two taps yield an empty
    /// profile. The buffer is left intact.
    pub fn stop_capture(&self) -> RhythmProfile {
        if self.taps.len() < 2 {
            return RhythmProfile::default();
        }

        let raw: Vec<f64> = self
            .taps
            .windows(2)
            .map(|pair| pair[1] - pair[0])
            .collect();

        let anchor = raw[0];
        let intervals: Vec<f64> = raw
            .iter()
            .map(|interval| round_two(interval / anchor))
            .collect();
        let fingerprint = join_intervals(&intervals);

        RhythmProfile {
            intervals,
            fingerprint,
        }
    }
}

fn round_two(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
