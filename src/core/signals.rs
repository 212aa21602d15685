// Per-frame signal buffers shared between the analyzer, the clock and every
// scene. Exactly one writer per snapshot, many readers, all on the render
// thread: audio is written first, then the clock, then scenes read both.
//
// Not thread-safe. Crossing threads would need a double-buffered snapshot
// swapped at the frame boundary.

use crate::constants::{BAND_COUNT, WAVEFORM_LEN};
use std::cell::RefCell;
use std::rc::Rc;

/// Named index into [`AudioSnapshot::bands`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Band {
    Bass = 0,
    LowMid = 1,
    Mid = 2,
    HighMid = 3,
    Treble = 4,
}

#[derive(Clone, Debug, PartialEq)]
pub struct AudioSnapshot {
    /// bass, lowMid, mid, highMid, treble in [0, 1], exponentially smoothed.
    pub bands: [f32; BAND_COUNT],
    /// Overall loudness in [0, 1].
    pub amplitude: f32,
    pub beat: bool,
    pub kick: bool,
    pub snare: bool,
    pub hihat: bool,
    /// Decimated time-domain trace in [-1, 1].
    pub waveform: [f32; WAVEFORM_LEN],
}

impl Default for AudioSnapshot {
    fn default() -> Self {
        Self {
            bands: [0.0; BAND_COUNT],
            amplitude: 0.0,
            beat: false,
            kick: false,
            snare: false,
            hihat: false,
            waveform: [0.0; WAVEFORM_LEN],
        }
    }
}

impl AudioSnapshot {
    #[inline]
    pub fn band(&self, band: Band) -> f32 {
        self.bands[band as usize]
    }

    #[inline]
    pub fn clear_onsets(&mut self) {
        self.beat = false;
        self.kick = false;
        self.snare = false;
        self.hihat = false;
    }
}

/// Musical time. `bar == beat / 4` and `phrase == beat / 32` always hold.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ClockSnapshot {
    pub elapsed: f64,
    pub delta: f32,
    pub beat: u64,
    pub bar: u64,
    pub phrase: u64,
    /// Fractional position inside the current beat, in [0, 1).
    pub beat_progress: f32,
}

#[derive(Clone, Debug, Default)]
pub struct Signals {
    pub audio: AudioSnapshot,
    pub clock: ClockSnapshot,
}

pub type SharedSignals = Rc<RefCell<Signals>>;

pub fn shared_signals() -> SharedSignals {
    Rc::new(RefCell::new(Signals::default()))
}
