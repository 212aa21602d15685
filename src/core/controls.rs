// Operator-facing controls and the keyboard map that drives them.

use crate::constants::*;

/// Live performance parameters edited from the keyboard.
#[derive(Clone, Debug, PartialEq)]
pub struct GlobalControls {
    pub master_intensity: f32,
    /// Hue rotation in [0, 1).
    pub master_hue: f32,
    /// Multiplier applied to clock time.
    pub master_speed: f32,
    /// `None` uses [`DEFAULT_BPM`].
    pub bpm_override: Option<f32>,
    pub audio_gain: f32,
    pub audio_smoothing: f32,
    pub beat_sensitivity: f32,
    pub show_hud: bool,
}

impl Default for GlobalControls {
    fn default() -> Self {
        Self {
            master_intensity: 1.0,
            master_hue: 0.0,
            master_speed: 1.0,
            bpm_override: None,
            audio_gain: DEFAULT_GAIN,
            audio_smoothing: DEFAULT_SMOOTHING,
            beat_sensitivity: DEFAULT_BEAT_SENSITIVITY,
            show_hud: true,
        }
    }
}

impl GlobalControls {
    pub fn bpm(&self) -> f32 {
        self.bpm_override.unwrap_or(DEFAULT_BPM)
    }

    pub fn adjust_intensity(&mut self, delta: f32) {
        self.master_intensity = (self.master_intensity + delta).clamp(0.0, INTENSITY_MAX);
    }

    pub fn shift_hue(&mut self, delta: f32) {
        self.master_hue = (self.master_hue + delta).rem_euclid(1.0);
        // rem_euclid can return exactly 1.0 for tiny negative inputs
        if self.master_hue >= 1.0 {
            self.master_hue = 0.0;
        }
    }

    pub fn adjust_speed(&mut self, delta: f32) {
        self.master_speed = (self.master_speed + delta).clamp(SPEED_MIN, SPEED_MAX);
    }

    pub fn adjust_bpm(&mut self, delta: f32) {
        self.bpm_override = Some((self.bpm() + delta).clamp(MIN_BPM, MAX_BPM));
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyCommand {
    /// Zero-based position in the scene registry.
    SelectScene(usize),
    RandomScene,
    CycleTransitionType,
    IntensityDown,
    IntensityUp,
    HueLeft,
    HueRight,
    SpeedUp,
    SpeedDown,
    BpmDown,
    BpmUp,
    EnableMicrophone,
    ToggleFullscreen,
    ToggleHud,
}

impl KeyCommand {
    /// Arrow keys would scroll the page.
    pub fn prevents_default(self) -> bool {
        matches!(self, KeyCommand::SpeedUp | KeyCommand::SpeedDown)
    }
}

/// Map a `KeyboardEvent.key` value to a command.
pub fn command_for_key(key: &str) -> Option<KeyCommand> {
    if let Some(c) = single_char(key) {
        if ('1'..='9').contains(&c) {
            return Some(KeyCommand::SelectScene(c as usize - '1' as usize));
        }
    }
    let cmd = match key.to_ascii_lowercase().as_str() {
        "r" => KeyCommand::RandomScene,
        "t" => KeyCommand::CycleTransitionType,
        "[" => KeyCommand::IntensityDown,
        "]" => KeyCommand::IntensityUp,
        "arrowleft" => KeyCommand::HueLeft,
        "arrowright" => KeyCommand::HueRight,
        "arrowup" => KeyCommand::SpeedUp,
        "arrowdown" => KeyCommand::SpeedDown,
        "-" | "_" => KeyCommand::BpmDown,
        "=" | "+" => KeyCommand::BpmUp,
        "m" => KeyCommand::EnableMicrophone,
        "f" => KeyCommand::ToggleFullscreen,
        "h" => KeyCommand::ToggleHud,
        _ => return None,
    };
    Some(cmd)
}

#[inline]
fn single_char(key: &str) -> Option<char> {
    let mut chars = key.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    }
}

/// Apply the commands that only touch [`GlobalControls`]. Returns `false`
/// for commands that need the conductor or the browser.
pub fn apply_to_controls(cmd: KeyCommand, controls: &mut GlobalControls) -> bool {
    match cmd {
        KeyCommand::IntensityDown => controls.adjust_intensity(-INTENSITY_STEP),
        KeyCommand::IntensityUp => controls.adjust_intensity(INTENSITY_STEP),
        KeyCommand::HueLeft => controls.shift_hue(-HUE_STEP),
        KeyCommand::HueRight => controls.shift_hue(HUE_STEP),
        KeyCommand::SpeedUp => controls.adjust_speed(SPEED_STEP),
        KeyCommand::SpeedDown => controls.adjust_speed(-SPEED_STEP),
        KeyCommand::BpmDown => controls.adjust_bpm(-BPM_STEP),
        KeyCommand::BpmUp => controls.adjust_bpm(BPM_STEP),
        KeyCommand::ToggleHud => controls.show_hud = !controls.show_hud,
        _ => return false,
    }
    true
}
