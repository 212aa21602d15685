// Launch options read from the page URL, e.g.
// `?scene=membrane&bpm=128&transition=dissolve&duration=3&audio=demo`.

use super::controls::GlobalControls;
use super::transition::{TransitionState, TransitionType};
use crate::constants::{MAX_BPM, MIN_BPM};

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigError {
    #[error("'{key}' expects a number, got '{value}'")]
    NotANumber { key: String, value: String },
    #[error("'{key}'={value} is outside {min}..={max}")]
    OutOfRange {
        key: String,
        value: f32,
        min: f32,
        max: f32,
    },
    #[error(transparent)]
    Transition(#[from] super::transition::UnknownTransitionType),
    #[error("'audio' expects 'mic' or 'demo', got '{0}'")]
    AudioMode(String),
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AudioMode {
    /// Ask for the microphone on the first user gesture.
    #[default]
    Microphone,
    /// Never prompt; synthetic signals only.
    Demo,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct LaunchConfig {
    pub scene: Option<String>,
    pub bpm: Option<f32>,
    pub transition: Option<TransitionType>,
    pub duration: Option<f32>,
    pub gain: Option<f32>,
    pub smoothing: Option<f32>,
    pub sensitivity: Option<f32>,
    pub audio: AudioMode,
}

impl LaunchConfig {
    /// Parse a query string (with or without the leading `?`).
    ///
    /// Bad values are skipped and reported; the rest still apply.
    pub fn from_query(query: &str) -> (Self, Vec<ConfigError>) {
        let mut cfg = LaunchConfig::default();
        let mut errors = Vec::new();
        for pair in query.trim_start_matches('?').split('&') {
            let (key, value) = match pair.split_once('=') {
                Some((k, v)) => (k.trim(), v.trim()),
                None => continue,
            };
            let (key, value) = (decode_form(key), decode_form(value));
            if let Err(e) = cfg.apply(key.trim(), value.trim()) {
                errors.push(e);
            }
        }
        (cfg, errors)
    }

    fn apply(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        match key {
            "scene" if !value.is_empty() => self.scene = Some(value.to_string()),
            "bpm" => self.bpm = Some(ranged(key, value, MIN_BPM, MAX_BPM)?),
            "transition" => self.transition = Some(value.parse()?),
            "duration" => self.duration = Some(ranged(key, value, 0.0, 60.0)?),
            "gain" => self.gain = Some(ranged(key, value, 0.0, 10.0)?),
            "smoothing" => self.smoothing = Some(ranged(key, value, 0.0, 0.99)?),
            "sensitivity" => self.sensitivity = Some(ranged(key, value, 0.0, 2.0)?),
            "audio" => {
                self.audio = match value.to_ascii_lowercase().as_str() {
                    "mic" | "microphone" => AudioMode::Microphone,
                    "demo" | "none" => AudioMode::Demo,
                    _ => return Err(ConfigError::AudioMode(value.to_string())),
                }
            }
            _ => {}
        }
        Ok(())
    }

    pub fn apply_to_controls(&self, controls: &mut GlobalControls) {
        if let Some(b) = self.bpm {
            controls.bpm_override = Some(b);
        }
        if let Some(g) = self.gain {
            controls.audio_gain = g;
        }
        if let Some(s) = self.smoothing {
            controls.audio_smoothing = s;
        }
        if let Some(s) = self.sensitivity {
            controls.beat_sensitivity = s;
        }
    }

    pub fn apply_to_transitions(&self, state: &mut TransitionState) {
        if let Some(t) = self.transition {
            state.set_transition_type(t);
        }
        if let Some(d) = self.duration {
            state.set_transition_duration(d);
        }
    }
}

// Form encoding: `+` is a space and `%XX` a byte. Malformed escapes are kept
// literally so the value is still reported as given.
fn decode_form(raw: &str) -> String {
    let bytes = raw.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'+' => out.push(b' '),
            b'%' => {
                if let Some(b) = bytes.get(i + 1..i + 3).and_then(hex_byte) {
                    out.push(b);
                    i += 3;
                    continue;
                }
                out.push(b'%');
            }
            b => out.push(b),
        }
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

fn hex_byte(pair: &[u8]) -> Option<u8> {
    let digit = |c: u8| (c as char).to_digit(16);
    Some((digit(pair[0])? * 16 + digit(pair[1])?) as u8)
}

fn ranged(key: &str, value: &str, min: f32, max: f32) -> Result<f32, ConfigError> {
    let v: f32 = value.parse().map_err(|_| ConfigError::NotANumber {
        key: key.to_string(),
        value: value.to_string(),
    })?;
    if !v.is_finite() || v < min || v > max {
        return Err(ConfigError::OutOfRange {
            key: key.to_string(),
            value: v,
            min,
            max,
        });
    }
    Ok(v)
}
