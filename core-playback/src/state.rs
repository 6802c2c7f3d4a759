//! Observable playback state shared by both backends.

use crate::error::{PlaybackError, Result};
use serde::{Deserialize, Serialize};
use std::cell::Cell;

/// Snapshot of a backend's playback state.
///
/// Times are in seconds. `position` never exceeds `duration` once the
/// duration is known, and `load_percent` only grows until the next load or
/// reset.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BackendState {
    pub volume: f32,
    pub duration: f64,
    pub position: f64,
    pub load_percent: u8,
    pub seekable: bool,
    pub playing: bool,
}

impl BackendState {
    /// Zero the per-track fields. Volume and the playing flag are kept.
    pub fn reset(&mut self) {
        self.duration = 0.0;
        self.position = 0.0;
        self.load_percent = 0;
        self.seekable = false;
    }

    /// Record a playhead update, clamping into `[0, duration]`.
    ///
    /// Unknown (`NaN`, infinite or negative) durations are stored as 0, in
    /// which case only the lower bound applies.
    pub fn record_time(&mut self, position: f64, duration: f64) {
        self.duration = sanitize_seconds(duration);
        let position = sanitize_seconds(position);
        self.position = if self.duration > 0.0 {
            position.min(self.duration)
        } else {
            position
        };
    }

    /// Apply a progress reading, never letting `load_percent` go backwards.
    /// Returns the stored value.
    pub fn advance_progress(&mut self, percent: u8) -> u8 {
        self.load_percent = self.load_percent.max(percent.min(100));
        self.load_percent
    }

    /// Whether the download has completed.
    pub fn fully_loaded(&self) -> bool {
        self.load_percent >= 100
    }
}

fn sanitize_seconds(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

/// Reject volumes outside `[0, 1]` and non-finite values.
pub fn validate_volume(volume: f32) -> Result<f32> {
    if volume.is_finite() && (0.0..=1.0).contains(&volume) {
        Ok(volume)
    } else {
        Err(PlaybackError::InvalidVolume(volume))
    }
}

/// Convert a buffered high-water mark into a whole download percentage.
///
/// Returns `None` while the duration is unknown.
pub fn buffered_percent(buffered_end: f64, duration: f64) -> Option<u8> {
    if !duration.is_finite() || duration <= 0.0 || !buffered_end.is_finite() {
        return None;
    }
    let percent = (buffered_end / duration * 100.0).floor().clamp(0.0, 100.0);
    Some(percent as u8)
}

/// Interior-mutable holder used by the backends.
///
/// Every accessor copies the state in or out, so no borrow is ever held
/// while events are dispatched.
#[derive(Debug, Default)]
pub(crate) struct StateCell(Cell<BackendState>);

impl StateCell {
    pub(crate) fn get(&self) -> BackendState {
        self.0.get()
    }

    pub(crate) fn update<R>(&self, f: impl FnOnce(&mut BackendState) -> R) -> R {
        let mut state = self.0.get();
        let result = f(&mut state);
        self.0.set(state);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reset_keeps_volume_and_playing() {
        let mut state = BackendState {
            volume: 0.4,
            duration: 12.0,
            position: 3.0,
            load_percent: 55,
            seekable: true,
            playing: true,
        };
        state.reset();
        assert_eq!(state.duration, 0.0);
        assert_eq!(state.position, 0.0);
        assert_eq!(state.load_percent, 0);
        assert!(!state.seekable);
        assert_eq!(state.volume, 0.4);
        assert!(state.playing);
    }

    #[test]
    fn test_record_time_clamps_position() {
        let mut state = BackendState::default();
        state.record_time(12.5, 10.0);
        assert_eq!(state.position, 10.0);
        assert_eq!(state.duration, 10.0);

        state.record_time(3.0, f64::NAN);
        assert_eq!(state.duration, 0.0);
        assert_eq!(state.position, 3.0);

        state.record_time(-1.0, 10.0);
        assert_eq!(state.position, 0.0);
    }

    #[test]
    fn test_progress_is_monotonic() {
        let mut state = BackendState::default();
        assert_eq!(state.advance_progress(40), 40);
        assert_eq!(state.advance_progress(20), 40);
        assert_eq!(state.advance_progress(250), 100);
        assert!(state.fully_loaded());

        state.reset();
        assert_eq!(state.advance_progress(5), 5);
    }

    #[test]
    fn test_validate_volume() {
        assert_eq!(validate_volume(0.0).unwrap(), 0.0);
        assert_eq!(validate_volume(1.0).unwrap(), 1.0);
        assert!(matches!(
            validate_volume(1.01),
            Err(PlaybackError::InvalidVolume(_))
        ));
        assert!(validate_volume(-0.1).is_err());
        assert!(validate_volume(f32::NAN).is_err());
        assert!(validate_volume(f32::INFINITY).is_err());
    }

    #[test]
    fn test_buffered_percent() {
        assert_eq!(buffered_percent(5.0, 10.0), Some(50));
        assert_eq!(buffered_percent(3.33, 10.0), Some(33));
        assert_eq!(buffered_percent(10.0, 10.0), Some(100));
        assert_eq!(buffered_percent(11.0, 10.0), Some(100));
        assert_eq!(buffered_percent(5.0, f64::NAN), None);
        assert_eq!(buffered_percent(5.0, 0.0), None);
    }

    #[test]
    fn test_state_cell_update() {
        let cell = StateCell::default();
        let percent = cell.update(|state| state.advance_progress(30));
        assert_eq!(percent, 30);
        assert_eq!(cell.get().load_percent, 30);
    }
}
