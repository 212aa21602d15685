// Sanity checks on tuning constants.
// The main crate is wasm-only, so we include the pure-Rust module directly.

#![allow(dead_code)]
mod constants {
    include!("../src/constants.rs");
}

use constants::*;

#[test]
fn musical_grid_nests() {
    assert_eq!(BEATS_PER_PHRASE % BEATS_PER_BAR, 0);
    assert!((MIN_BPM..=MAX_BPM).contains(&DEFAULT_BPM));
    assert!((MIN_BPM..=MAX_BPM).contains(&DEMO_BPM));
}

#[test]
fn onset_cooldowns_shorten_with_pitch() {
    assert!(BEAT_COOLDOWN_SEC > KICK_COOLDOWN_SEC);
    assert!(KICK_COOLDOWN_SEC > SNARE_COOLDOWN_SEC);
    assert!(SNARE_COOLDOWN_SEC > HIHAT_COOLDOWN_SEC);
    assert!(HIHAT_COOLDOWN_SEC > 0.0);
}

#[test]
fn kick_is_stricter_than_beat() {
    assert!(KICK_RISE_FACTOR > BEAT_RISE_FACTOR);
    assert!(KICK_LEVEL_FACTOR > BEAT_LEVEL_FACTOR);
}

#[test]
fn demo_windows_fit_inside_a_beat() {
    let beat_sec = 60.0 / DEMO_BPM;
    for w in [DEMO_BEAT_WINDOW, DEMO_KICK_WINDOW, DEMO_HIHAT_WINDOW] {
        assert!(w > 0.0 && w < 1.0);
        assert!(w * beat_sec > 1.0 / 120.0, "window shorter than a frame");
    }
}

#[test]
fn analyser_sizes_cover_the_waveform() {
    assert!(ANALYSER_FFT_SIZE.is_power_of_two());
    assert!(ANALYSER_FFT_SIZE as usize / 2 >= WAVEFORM_LEN);
    // shader uniforms pack 64 waveform points
    assert_eq!(WAVEFORM_LEN % 64, 0);
    assert_eq!(BAND_COUNT, 5);
}

#[test]
fn control_ranges_are_ordered() {
    assert!(SPEED_MIN < 1.0 && 1.0 < SPEED_MAX);
    assert!(INTENSITY_MAX > 1.0);
    assert!((0.0..=1.0).contains(&DEFAULT_SMOOTHING));
    assert!(DEFAULT_TRANSITION_DURATION_SEC > 0.0);
    assert!(CAMERA_NEAR < CAMERA_FAR);
}
