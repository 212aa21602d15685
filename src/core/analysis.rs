// Spectrum reduction, onset detection and the synthetic demo generator.
// Browser capture lives in `audio.rs`; this half only sees byte buffers.

use super::signals::{AudioSnapshot, Band};
use crate::constants::*;

/// What the capture side can currently deliver.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputStatus {
    /// No capture pipeline (never initialised, denied, or disposed).
    Uninitialized,
    /// Pipeline exists but the context is waiting for a user gesture.
    Suspended,
    Running,
}

impl InputStatus {
    /// Browsers only let a suspended context resume from a user gesture, so
    /// these inputs need a gesture hook as well as an immediate attempt.
    pub fn needs_resume(self) -> bool {
        self == InputStatus::Suspended
    }
}

/// Keeps at most one async capture request (permission prompt) in flight.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CaptureRequest {
    pending: bool,
}

impl CaptureRequest {
    /// Returns `false` when a request is already outstanding.
    pub fn try_begin(&mut self) -> bool {
        if self.pending {
            return false;
        }
        self.pending = true;
        true
    }

    pub fn finish(&mut self) {
        self.pending = false;
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }
}

/// One frame's input to [`SignalAnalyzer::analyze`].
#[derive(Clone, Copy, Debug)]
pub enum AnalysisSource<'a> {
    /// Byte magnitudes (0..=255) and byte time-domain samples (128 = silence).
    Live {
        frequency: &'a [u8],
        time_domain: &'a [u8],
    },
    Demo,
}

impl<'a> AnalysisSource<'a> {
    /// Anything short of a running context is served by the demo generator.
    pub fn for_status(status: InputStatus, frequency: &'a [u8], time_domain: &'a [u8]) -> Self {
        match status {
            InputStatus::Running if !frequency.is_empty() => AnalysisSource::Live {
                frequency,
                time_domain,
            },
            _ => AnalysisSource::Demo,
        }
    }
}

#[derive(Clone, Copy, Debug, Default)]
struct Cooldowns {
    beat: f32,
    kick: f32,
    snare: f32,
    hihat: f32,
}

impl Cooldowns {
    fn tick(&mut self, delta: f32) {
        self.beat = (self.beat - delta).max(0.0);
        self.kick = (self.kick - delta).max(0.0);
        self.snare = (self.snare - delta).max(0.0);
        self.hihat = (self.hihat - delta).max(0.0);
    }
}

/// Synthetic cycle counters so each demo pulse fires once per window entry.
#[derive(Clone, Copy, Debug, Default)]
struct DemoState {
    time: f64,
    last_beat_cycle: Option<u64>,
    last_kick_cycle: Option<u64>,
    last_hihat_cycle: Option<u64>,
}

#[derive(Clone, Debug)]
pub struct SignalAnalyzer {
    gain: f32,
    smoothing: f32,
    sensitivity: f32,
    smoothed: [f32; BAND_COUNT],
    prev_bass: f32,
    cooldowns: Cooldowns,
    demo: DemoState,
}

impl Default for SignalAnalyzer {
    fn default() -> Self {
        Self {
            gain: DEFAULT_GAIN,
            smoothing: DEFAULT_SMOOTHING,
            sensitivity: DEFAULT_BEAT_SENSITIVITY,
            smoothed: [0.0; BAND_COUNT],
            prev_bass: 0.0,
            cooldowns: Cooldowns::default(),
            demo: DemoState::default(),
        }
    }
}

impl SignalAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn gain(&self) -> f32 {
        self.gain
    }

    pub fn smoothing(&self) -> f32 {
        self.smoothing
    }

    pub fn beat_sensitivity(&self) -> f32 {
        self.sensitivity
    }

    pub fn set_gain(&mut self, gain: f32) {
        if gain.is_finite() {
            self.gain = gain.max(0.0);
        }
    }

    /// 0 = no smoothing, values near 1 respond slowly. Kept below 1 so bands still move.
    pub fn set_smoothing(&mut self, smoothing: f32) {
        if smoothing.is_finite() {
            self.smoothing = smoothing.clamp(0.0, 0.99);
        }
    }

    pub fn set_beat_sensitivity(&mut self, sensitivity: f32) {
        if sensitivity.is_finite() {
            self.sensitivity = sensitivity.max(0.0);
        }
    }

    /// Forget smoothing and onset history, e.g. when the input source changes.
    pub fn reset_live_state(&mut self) {
        self.smoothed = [0.0; BAND_COUNT];
        self.prev_bass = 0.0;
        self.cooldowns = Cooldowns::default();
    }

    /// Per-frame entry point. Overwrites `out` in place.
    pub fn analyze(&mut self, source: AnalysisSource<'_>, delta: f32, out: &mut AudioSnapshot) {
        let delta = if delta.is_finite() { delta.max(0.0) } else { 0.0 };
        match source {
            AnalysisSource::Live {
                frequency,
                time_domain,
            } if !frequency.is_empty() => self.analyze_live(frequency, time_domain, delta, out),
            _ => self.analyze_demo(delta, out),
        }
    }

    fn analyze_live(
        &mut self,
        frequency: &[u8],
        time_domain: &[u8],
        delta: f32,
        out: &mut AudioSnapshot,
    ) {
        let band_size = (frequency.len() / BAND_COUNT).max(1);
        for (b, smoothed) in self.smoothed.iter_mut().enumerate() {
            let start = (b * band_size).min(frequency.len());
            let end = (start + band_size).min(frequency.len());
            let raw = if end > start {
                let sum: u32 = frequency[start..end].iter().map(|&v| v as u32).sum();
                (sum as f32 / (end - start) as f32 / 255.0 * self.gain).clamp(0.0, 1.0)
            } else {
                0.0
            };
            *smoothed = (*smoothed * self.smoothing + raw * (1.0 - self.smoothing)).clamp(0.0, 1.0);
        }
        out.bands = self.smoothed;

        let total: u64 = frequency.iter().map(|&v| v as u64).sum();
        out.amplitude = (total as f32 / frequency.len() as f32 / 255.0 * self.gain).clamp(0.0, 1.0);

        decimate_waveform(time_domain, &mut out.waveform);
        self.detect_onsets(delta, out);
    }

    fn detect_onsets(&mut self, delta: f32, out: &mut AudioSnapshot) {
        self.cooldowns.tick(delta);
        out.clear_onsets();

        let s = self.sensitivity;
        let bass = self.smoothed[Band::Bass as usize];
        let rise = bass - self.prev_bass;

        if rise > s * BEAT_RISE_FACTOR && self.cooldowns.beat <= 0.0 && bass > s * BEAT_LEVEL_FACTOR {
            out.beat = true;
            self.cooldowns.beat = BEAT_COOLDOWN_SEC;
        }
        if rise > s * KICK_RISE_FACTOR && self.cooldowns.kick <= 0.0 && bass > s * KICK_LEVEL_FACTOR {
            out.kick = true;
            self.cooldowns.kick = KICK_COOLDOWN_SEC;
        }

        let mid = self.smoothed[Band::Mid as usize];
        if mid > s * SNARE_LEVEL_FACTOR && self.cooldowns.snare <= 0.0 {
            out.snare = true;
            self.cooldowns.snare = SNARE_COOLDOWN_SEC;
        }

        let treble = self.smoothed[Band::Treble as usize];
        if treble > s * HIHAT_LEVEL_FACTOR && self.cooldowns.hihat <= 0.0 {
            out.hihat = true;
            self.cooldowns.hihat = HIHAT_COOLDOWN_SEC;
        }

        self.prev_bass = bass;
    }

    // ~130 BPM four-on-the-floor kick with offbeat hats and a drifting mid.
    fn analyze_demo(&mut self, delta: f32, out: &mut AudioSnapshot) {
        self.demo.time += delta as f64;
        let t = self.demo.time;
        let bps = DEMO_BPM as f64 / 60.0;

        let beat_pos = t * bps;
        let hihat_pos = beat_pos + 0.5;
        let beat_phase = beat_pos.fract() as f32;
        let hihat_phase = hihat_pos.fract() as f32;
        let tf = t as f32;

        let kick = pulse(beat_phase, 4.0, 3);
        let hihat = pulse(hihat_phase, 8.0, 5);
        let mid = 0.3 + 0.2 * (tf * 0.7).sin() + 0.1 * (tf * 1.3).sin();

        out.bands = [
            kick * 0.8 + 0.1,
            mid * 0.6,
            mid * 0.4 + kick * 0.2,
            hihat * 0.3 + 0.1,
            hihat * 0.5,
        ];
        for b in out.bands.iter_mut() {
            *b = b.clamp(0.0, 1.0);
        }
        out.amplitude = (kick * 0.4 + mid * 0.3 + hihat * 0.1 + 0.1).clamp(0.0, 1.0);

        let beat_cycle = beat_pos.floor() as u64;
        let hihat_cycle = hihat_pos.floor() as u64;
        out.beat = fire_once(&mut self.demo.last_beat_cycle, beat_cycle, beat_phase < DEMO_BEAT_WINDOW);
        out.kick = fire_once(&mut self.demo.last_kick_cycle, beat_cycle, beat_phase < DEMO_KICK_WINDOW);
        out.snare = false;
        out.hihat = fire_once(
            &mut self.demo.last_hihat_cycle,
            hihat_cycle,
            hihat_phase < DEMO_HIHAT_WINDOW,
        );

        let tau = std::f32::consts::TAU;
        for (i, w) in out.waveform.iter_mut().enumerate() {
            let phase = i as f32 / WAVEFORM_LEN as f32;
            let v = (phase * tau * 4.0 + tf).sin() * kick * 0.5
                + (phase * tau * 16.0 + tf * 3.0).sin() * hihat * 0.3;
            *w = v.clamp(-1.0, 1.0);
        }
    }
}

/// Percussive envelope `max(0, 1 - phase*k)^n`.
#[inline]
pub fn pulse(phase: f32, k: f32, n: i32) -> f32 {
    (1.0 - phase * k).max(0.0).powi(n)
}

#[inline]
fn fire_once(last: &mut Option<u64>, cycle: u64, in_window: bool) -> bool {
    if in_window && *last != Some(cycle) {
        *last = Some(cycle);
        true
    } else {
        false
    }
}

/// Pick every Nth sample so exactly `out.len()` points span the buffer.
pub fn decimate_waveform(time_domain: &[u8], out: &mut [f32]) {
    if time_domain.is_empty() {
        out.iter_mut().for_each(|w| *w = 0.0);
        return;
    }
    let n = out.len();
    let step = time_domain.len() / n;
    for (i, w) in out.iter_mut().enumerate() {
        let idx = if step > 0 { i * step } else { i * time_domain.len() / n };
        *w = ((time_domain[idx] as f32 - 128.0) / 128.0).clamp(-1.0, 1.0);
    }
}
