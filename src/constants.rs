// Analysis, timing and compositor tuning constants.
//
// These constants express intended behavior (cooldowns, thresholds, clamp
// limits) and keep magic numbers out of the analysis and render code.

// Spectrum partitioning
pub const BAND_COUNT: usize = 5;
pub const WAVEFORM_LEN: usize = 256;

// Analyser node configuration
pub const ANALYSER_FFT_SIZE: u32 = 2048;
pub const MIC_ANALYSER_SMOOTHING: f64 = 0.0; // smoothing is done per band in SignalAnalyzer
pub const FILE_ANALYSER_SMOOTHING: f64 = 0.6; // pre-rendered material needs less twitch

// Runtime-tunable defaults
pub const DEFAULT_GAIN: f32 = 1.0;
pub const DEFAULT_SMOOTHING: f32 = 0.8;
pub const DEFAULT_BEAT_SENSITIVITY: f32 = 0.6;

// Onset cooldowns (seconds)
pub const BEAT_COOLDOWN_SEC: f32 = 0.15;
pub const KICK_COOLDOWN_SEC: f32 = 0.12;
pub const SNARE_COOLDOWN_SEC: f32 = 0.10;
pub const HIHAT_COOLDOWN_SEC: f32 = 0.06;

// Onset thresholds, as multiples of beat sensitivity
pub const BEAT_RISE_FACTOR: f32 = 0.3;
pub const BEAT_LEVEL_FACTOR: f32 = 0.5;
pub const KICK_RISE_FACTOR: f32 = 0.4;
pub const KICK_LEVEL_FACTOR: f32 = 0.6;
pub const SNARE_LEVEL_FACTOR: f32 = 0.7;
pub const HIHAT_LEVEL_FACTOR: f32 = 0.5;

// Demo generator
pub const DEMO_BPM: f32 = 130.0;
pub const DEMO_BEAT_WINDOW: f32 = 0.05;
pub const DEMO_KICK_WINDOW: f32 = 0.03;
pub const DEMO_HIHAT_WINDOW: f32 = 0.02;

// Musical clock
pub const DEFAULT_BPM: f32 = 130.0;
pub const MIN_BPM: f32 = 40.0;
pub const MAX_BPM: f32 = 240.0;
pub const BEATS_PER_BAR: u64 = 4;
pub const BEATS_PER_PHRASE: u64 = 32;
// Longest frame gap fed to the clock, analyzer and transitions
pub const MAX_FRAME_DELTA_SEC: f32 = 0.25;

// Transitions
pub const DEFAULT_TRANSITION_DURATION_SEC: f32 = 2.0;
pub const DISSOLVE_EDGE: f32 = 0.05;
pub const GLITCH_ROWS: f32 = 30.0;
pub const GLITCH_MAX_OFFSET: f32 = 0.1;
pub const GLITCH_RGB_SPLIT: f32 = 0.01;
pub const GLITCH_SCANLINE_DENSITY: f32 = 200.0;
pub const GLITCH_SCANLINE_DEPTH: f32 = 0.1;
pub const ZOOM_BLUR_TAPS: usize = 8;
pub const ZOOM_BLUR_STRENGTH: f32 = 0.1;

// Offscreen slot targets (fixed resolution, no multisampling)
pub const SLOT_TARGET_WIDTH: u32 = 1920;
pub const SLOT_TARGET_HEIGHT: u32 = 1080;

// Camera
pub const CAMERA_FOV_DEGREES: f32 = 75.0;
pub const CAMERA_Z: f32 = 5.0;
pub const CAMERA_NEAR: f32 = 0.1;
pub const CAMERA_FAR: f32 = 1000.0;

// Scene state
pub const BEAT_FLASH_DECAY_PER_SEC: f32 = 6.0;

// Operator control ranges and steps
pub const INTENSITY_MAX: f32 = 3.0;
pub const INTENSITY_STEP: f32 = 0.1;
pub const HUE_STEP: f32 = 0.05;
pub const SPEED_MIN: f32 = 0.1;
pub const SPEED_MAX: f32 = 3.0;
pub const SPEED_STEP: f32 = 0.1;
pub const BPM_STEP: f32 = 1.0;
