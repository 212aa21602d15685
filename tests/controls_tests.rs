// Host-side tests for operator controls and the keyboard map.
// The main crate is wasm-only, so we include the pure-Rust modules directly.

#![allow(dead_code)]
mod constants {
    include!("../src/constants.rs");
}
mod controls {
    include!("../src/core/controls.rs");
}

use constants::*;
use controls::*;

#[test]
fn defaults() {
    let c = GlobalControls::default();
    assert_eq!(c.master_intensity, 1.0);
    assert_eq!(c.master_hue, 0.0);
    assert_eq!(c.master_speed, 1.0);
    assert_eq!(c.bpm(), DEFAULT_BPM);
    assert_eq!(c.audio_gain, 1.0);
    assert_eq!(c.audio_smoothing, 0.8);
    assert_eq!(c.beat_sensitivity, 0.6);
    assert!(c.show_hud);
}

#[test]
fn intensity_and_speed_are_clamped() {
    let mut c = GlobalControls::default();
    for _ in 0..100 {
        c.adjust_intensity(INTENSITY_STEP);
        c.adjust_speed(SPEED_STEP);
    }
    assert_eq!(c.master_intensity, INTENSITY_MAX);
    assert_eq!(c.master_speed, SPEED_MAX);
    for _ in 0..100 {
        c.adjust_intensity(-INTENSITY_STEP);
        c.adjust_speed(-SPEED_STEP);
    }
    assert_eq!(c.master_intensity, 0.0);
    assert_eq!(c.master_speed, SPEED_MIN);
}

#[test]
fn hue_wraps_in_both_directions() {
    let mut c = GlobalControls::default();
    c.shift_hue(-HUE_STEP);
    assert!((c.master_hue - 0.95).abs() < 1e-6);
    for _ in 0..1000 {
        c.shift_hue(HUE_STEP);
        assert!((0.0..1.0).contains(&c.master_hue));
    }
    for _ in 0..1000 {
        c.shift_hue(-HUE_STEP);
        assert!((0.0..1.0).contains(&c.master_hue));
    }
    c.master_hue = 0.0;
    c.shift_hue(-1e-9);
    assert!((0.0..1.0).contains(&c.master_hue));
}

#[test]
fn bpm_adjustment_sets_a_clamped_override() {
    let mut c = GlobalControls::default();
    c.adjust_bpm(BPM_STEP);
    assert_eq!(c.bpm_override, Some(DEFAULT_BPM + 1.0));
    for _ in 0..500 {
        c.adjust_bpm(-BPM_STEP);
    }
    assert_eq!(c.bpm(), MIN_BPM);
    for _ in 0..500 {
        c.adjust_bpm(BPM_STEP);
    }
    assert_eq!(c.bpm(), MAX_BPM);
}

#[test]
fn digit_keys_select_scenes_by_position() {
    assert_eq!(command_for_key("1"), Some(KeyCommand::SelectScene(0)));
    assert_eq!(command_for_key("4"), Some(KeyCommand::SelectScene(3)));
    assert_eq!(command_for_key("9"), Some(KeyCommand::SelectScene(8)));
    assert_eq!(command_for_key("0"), None);
    assert_eq!(command_for_key("10"), None);
}

#[test]
fn letter_keys_are_case_insensitive() {
    assert_eq!(command_for_key("t"), Some(KeyCommand::CycleTransitionType));
    assert_eq!(command_for_key("T"), Some(KeyCommand::CycleTransitionType));
    assert_eq!(command_for_key("R"), Some(KeyCommand::RandomScene));
    assert_eq!(command_for_key("m"), Some(KeyCommand::EnableMicrophone));
    assert_eq!(command_for_key("F"), Some(KeyCommand::ToggleFullscreen));
    assert_eq!(command_for_key("h"), Some(KeyCommand::ToggleHud));
    assert_eq!(command_for_key("q"), None);
    assert_eq!(command_for_key("Shift"), None);
}

#[test]
fn symbol_and_arrow_keys() {
    assert_eq!(command_for_key("["), Some(KeyCommand::IntensityDown));
    assert_eq!(command_for_key("]"), Some(KeyCommand::IntensityUp));
    assert_eq!(command_for_key("ArrowLeft"), Some(KeyCommand::HueLeft));
    assert_eq!(command_for_key("ArrowRight"), Some(KeyCommand::HueRight));
    assert_eq!(command_for_key("ArrowUp"), Some(KeyCommand::SpeedUp));
    assert_eq!(command_for_key("ArrowDown"), Some(KeyCommand::SpeedDown));
    assert_eq!(command_for_key("-"), Some(KeyCommand::BpmDown));
    assert_eq!(command_for_key("_"), Some(KeyCommand::BpmDown));
    assert_eq!(command_for_key("="), Some(KeyCommand::BpmUp));
    assert_eq!(command_for_key("+"), Some(KeyCommand::BpmUp));
}

#[test]
fn only_vertical_arrows_suppress_default() {
    assert!(KeyCommand::SpeedUp.prevents_default());
    assert!(KeyCommand::SpeedDown.prevents_default());
    assert!(!KeyCommand::HueLeft.prevents_default());
    assert!(!KeyCommand::SelectScene(0).prevents_default());
}

#[test]
fn control_commands_apply_and_others_pass_through() {
    let mut c = GlobalControls::default();
    assert!(apply_to_controls(KeyCommand::IntensityUp, &mut c));
    assert!((c.master_intensity - 1.1).abs() < 1e-6);
    assert!(apply_to_controls(KeyCommand::ToggleHud, &mut c));
    assert!(!c.show_hud);
    assert!(apply_to_controls(KeyCommand::BpmDown, &mut c));
    assert_eq!(c.bpm(), DEFAULT_BPM - 1.0);

    let before = c.clone();
    for cmd in [
        KeyCommand::SelectScene(2),
        KeyCommand::RandomScene,
        KeyCommand::CycleTransitionType,
        KeyCommand::EnableMicrophone,
        KeyCommand::ToggleFullscreen,
    ] {
        assert!(!apply_to_controls(cmd, &mut c));
    }
    assert_eq!(c, before);
}
