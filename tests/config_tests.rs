// Host-side tests for URL launch options.
// The main crate is wasm-only, so we include the pure-Rust modules directly.

#![allow(dead_code)]
mod constants {
    include!("../src/constants.rs");
}
mod vj {
    pub mod controls {
        include!("../src/core/controls.rs");
    }
    pub mod transition {
        include!("../src/core/transition.rs");
    }
    pub mod config {
        include!("../src/core/config.rs");
    }
}

use vj::config::*;
use vj::controls::GlobalControls;
use vj::transition::{TransitionState, TransitionType};

#[test]
fn full_query_parses() {
    let (cfg, errors) = LaunchConfig::from_query(
        "?scene=membrane&bpm=128&transition=dissolve&duration=3.5&gain=2&smoothing=0.5&sensitivity=1.2&audio=demo",
    );
    assert!(errors.is_empty(), "{:?}", errors);
    assert_eq!(cfg.scene.as_deref(), Some("membrane"));
    assert_eq!(cfg.bpm, Some(128.0));
    assert_eq!(cfg.transition, Some(TransitionType::Dissolve));
    assert_eq!(cfg.duration, Some(3.5));
    assert_eq!(cfg.gain, Some(2.0));
    assert_eq!(cfg.smoothing, Some(0.5));
    assert_eq!(cfg.sensitivity, Some(1.2));
    assert_eq!(cfg.audio, AudioMode::Demo);
}

#[test]
fn empty_query_is_default() {
    for q in ["", "?", "&&", "scene="] {
        let (cfg, errors) = LaunchConfig::from_query(q);
        assert_eq!(cfg, LaunchConfig::default(), "query {:?}", q);
        assert!(errors.is_empty());
    }
    assert_eq!(LaunchConfig::default().audio, AudioMode::Microphone);
}

#[test]
fn bad_values_are_reported_and_the_rest_applies() {
    let (cfg, errors) =
        LaunchConfig::from_query("bpm=fast&scene=glitch-matrix&duration=900&transition=wipe&audio=line-in&gain=0.5");
    assert_eq!(cfg.scene.as_deref(), Some("glitch-matrix"));
    assert_eq!(cfg.gain, Some(0.5));
    assert_eq!(cfg.bpm, None);
    assert_eq!(cfg.duration, None);
    assert_eq!(cfg.transition, None);
    assert_eq!(cfg.audio, AudioMode::Microphone);
    assert_eq!(errors.len(), 4);
    assert_eq!(
        errors[0],
        ConfigError::NotANumber {
            key: "bpm".into(),
            value: "fast".into()
        }
    );
    assert!(matches!(errors[1], ConfigError::OutOfRange { ref key, .. } if key == "duration"));
    assert_eq!(errors[2].to_string(), "unknown transition type 'wipe'");
    assert_eq!(errors[3], ConfigError::AudioMode("line-in".into()));
}

#[test]
fn non_finite_numbers_are_rejected() {
    let (cfg, errors) = LaunchConfig::from_query("bpm=NaN&gain=inf");
    assert_eq!(cfg.bpm, None);
    assert_eq!(cfg.gain, None);
    assert_eq!(errors.len(), 2);
}

#[test]
fn unknown_keys_and_bare_flags_are_ignored() {
    let (cfg, errors) = LaunchConfig::from_query("debug&theme=dark&audio=MIC");
    assert!(errors.is_empty());
    assert_eq!(cfg.audio, AudioMode::Microphone);
}

#[test]
fn plus_decodes_to_space_before_parsing() {
    let (cfg, errors) = LaunchConfig::from_query("transition=+zoom-blur+");
    assert!(errors.is_empty());
    assert_eq!(cfg.transition, Some(TransitionType::ZoomBlur));
}

#[test]
fn config_applies_to_controls_and_transitions() {
    let (cfg, _) = LaunchConfig::from_query("bpm=90&sensitivity=0.9&transition=glitch-cut&duration=0");
    let mut controls = GlobalControls::default();
    cfg.apply_to_controls(&mut controls);
    assert_eq!(controls.bpm(), 90.0);
    assert_eq!(controls.beat_sensitivity, 0.9);
    assert_eq!(controls.audio_gain, 1.0);

    let mut state = TransitionState::new("void-tunnel");
    cfg.apply_to_transitions(&mut state);
    assert_eq!(state.transition_type, TransitionType::GlitchCut);
    assert_eq!(state.transition_duration, 0.0);
    assert!(!state.is_transitioning);
}

#[test]
fn unset_options_leave_existing_values() {
    let cfg = LaunchConfig::default();
    let mut controls = GlobalControls::default();
    controls.audio_smoothing = 0.3;
    cfg.apply_to_controls(&mut controls);
    assert_eq!(controls.audio_smoothing, 0.3);
    assert_eq!(controls.bpm_override, None);

    let mut state = TransitionState::new("a");
    state.set_transition_duration(5.0);
    cfg.apply_to_transitions(&mut state);
    assert_eq!(state.transition_duration, 5.0);
    assert_eq!(state.transition_type, TransitionType::Crossfade);
}

#[test]
fn percent_escapes_are_decoded() {
    let (cfg, errors) =
        LaunchConfig::from_query("?transition=glitch%2Dcut&scene=sacred%2dgeometry&bpm=%31%32%38&aud%69o=demo");
    assert!(errors.is_empty(), "{:?}", errors);
    assert_eq!(cfg.transition, Some(TransitionType::GlitchCut));
    assert_eq!(cfg.scene.as_deref(), Some("sacred-geometry"));
    assert_eq!(cfg.bpm, Some(128.0));
    assert_eq!(cfg.audio, AudioMode::Demo);
}

#[test]
fn malformed_escapes_are_kept_literally() {
    let (cfg, errors) = LaunchConfig::from_query("scene=a%zzb%4&duration=%");
    assert_eq!(cfg.scene.as_deref(), Some("a%zzb%4"));
    assert_eq!(
        errors,
        vec![ConfigError::NotANumber {
            key: "duration".into(),
            value: "%".into()
        }]
    );
}
