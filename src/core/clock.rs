use super::signals::ClockSnapshot;
use crate::constants::{
    BEATS_PER_BAR, BEATS_PER_PHRASE, DEFAULT_BPM, MAX_BPM, MAX_FRAME_DELTA_SEC, MIN_BPM,
};

/// Musical clock driven by per-frame deltas.
///
/// Beats are integrated incrementally (`beats += dt * bpm / 60`) rather than
/// derived from `elapsed * bpm / 60`, so a tempo change only affects beats
/// from that point on and the beat phase stays continuous.
#[derive(Clone, Debug)]
pub struct Clock {
    bpm: f32,
    elapsed: f64,
    total_beats: f64,
}

impl Default for Clock {
    fn default() -> Self {
        Self::new(DEFAULT_BPM)
    }
}

impl Clock {
    pub fn new(bpm: f32) -> Self {
        Self {
            bpm: sanitize_bpm(bpm).unwrap_or(DEFAULT_BPM),
            elapsed: 0.0,
            total_beats: 0.0,
        }
    }

    pub fn bpm(&self) -> f32 {
        self.bpm
    }

    /// Non-finite tempos are ignored; others are clamped to the supported range.
    pub fn set_bpm(&mut self, bpm: f32) {
        if let Some(b) = sanitize_bpm(bpm) {
            self.bpm = b;
        }
    }

    /// Advance by `delta * speed` seconds and publish into `out`.
    pub fn update(&mut self, delta: f32, speed: f32, out: &mut ClockSnapshot) {
        let delta = if delta.is_finite() { delta.max(0.0) } else { 0.0 };
        let speed = if speed.is_finite() { speed.max(0.0) } else { 0.0 };
        let scaled = delta as f64 * speed as f64;
        self.elapsed += scaled;
        self.total_beats += scaled * self.bpm as f64 / 60.0;

        let beat = self.total_beats.floor() as u64;
        out.elapsed = self.elapsed;
        out.delta = delta;
        out.beat = beat;
        out.bar = beat / BEATS_PER_BAR;
        out.phrase = beat / BEATS_PER_PHRASE;
        // f64 -> f32 can round a fraction just below 1.0 up to 1.0
        out.beat_progress =
            ((self.total_beats - self.total_beats.floor()) as f32).min(1.0 - f32::EPSILON / 2.0);
    }

    pub fn reset(&mut self) {
        self.elapsed = 0.0;
        self.total_beats = 0.0;
    }
}

fn sanitize_bpm(bpm: f32) -> Option<f32> {
    bpm.is_finite().then(|| bpm.clamp(MIN_BPM, MAX_BPM))
}

/// Turns wall-clock frame gaps into the time everything else runs on.
///
/// Gaps are capped, so after a stall (hidden tab, debugger) the clock, the
/// analyzer and any running transition resume where they left off instead of
/// jumping ahead.
#[derive(Clone, Copy, Debug, Default)]
pub struct FrameTimer {
    timeline: f64,
}

impl FrameTimer {
    /// Advance by a raw wall-clock delta and return the capped delta.
    pub fn advance(&mut self, raw_dt: f32) -> f32 {
        let dt = if raw_dt.is_finite() {
            raw_dt.clamp(0.0, MAX_FRAME_DELTA_SEC)
        } else {
            0.0
        };
        self.timeline += dt as f64;
        dt
    }

    /// Sum of capped deltas so far, in seconds.
    pub fn timeline(&self) -> f64 {
        self.timeline
    }
}
