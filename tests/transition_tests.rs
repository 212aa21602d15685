// Host-side tests for the transition state machine and slot scheduling.
// The main crate is wasm-only, so we include the pure-Rust modules directly.

#![allow(dead_code)]
mod constants {
    include!("../src/constants.rs");
}
mod vj {
    pub mod transition {
        include!("../src/core/transition.rs");
    }
}

use vj::transition::*;

const FPS: f64 = 60.0;

fn frame_time(k: u32) -> f64 {
    k as f64 / FPS
}

#[test]
fn transition_to_active_scene_is_a_no_op() {
    let mut state = TransitionState::new("a");
    assert!(!state.start_transition("a", Some(TransitionType::Dissolve), Some(5.0)));
    assert!(!state.is_transitioning);
    assert_eq!(state.next_preset_id, None);
    assert_eq!(state.transition_type, TransitionType::Crossfade);
    assert_eq!(state.transition_duration, 2.0);
}

#[test]
fn second_request_during_transition_is_ignored() {
    let mut state = TransitionState::new("a");
    assert!(state.start_transition("b", None, None));
    assert!(!state.start_transition("c", Some(TransitionType::Instant), Some(0.5)));
    assert_eq!(state.next_preset_id.as_deref(), Some("b"));
    assert_eq!(state.transition_type, TransitionType::Crossfade);
    assert_eq!(state.transition_duration, 2.0);
}

#[test]
fn next_is_set_exactly_while_transitioning() {
    let mut state = TransitionState::new("a");
    let mut sched = SlotScheduler::new("a");
    assert_eq!(state.next_preset_id.is_some(), state.is_transitioning);
    state.start_transition("b", None, Some(0.5));
    for k in 0..60 {
        sched.frame(&mut state, frame_time(k));
        assert_eq!(state.next_preset_id.is_some(), state.is_transitioning);
    }
    assert!(!state.is_transitioning);
}

#[test]
fn requested_type_and_duration_become_defaults() {
    let mut state = TransitionState::new("a");
    state.start_transition("b", Some(TransitionType::ZoomBlur), Some(4.0));
    state.complete_transition();
    state.start_transition("a", None, None);
    assert_eq!(state.transition_type, TransitionType::ZoomBlur);
    assert_eq!(state.transition_duration, 4.0);
}

#[test]
fn two_second_transition_takes_120_frames_at_60fps() {
    let mut state = TransitionState::new("a");
    let mut sched = SlotScheduler::new("a");
    // idle frames before the request do not count
    for k in 0..10 {
        let plan = sched.frame(&mut state, frame_time(k));
        assert!(!plan.render_inactive);
    }
    assert!(state.start_transition("b", None, Some(2.0)));

    let start = 10;
    let mut completions = 0;
    let mut completed_at = None;
    let mut last_progress = 0.0;
    for k in start..start + 200 {
        let plan = sched.frame(&mut state, frame_time(k));
        if plan.render_inactive {
            assert!(plan.progress >= last_progress, "progress went backwards");
            last_progress = plan.progress;
        }
        if plan.completed {
            completions += 1;
            completed_at.get_or_insert(k - start);
            assert_eq!(plan.progress, 1.0);
        }
    }
    assert_eq!(completions, 1);
    let frames = completed_at.unwrap_or(0);
    assert!((119..=121).contains(&frames), "completed after {} frames", frames);
    assert_eq!(state.active_preset_id, "b");
    assert!(!state.is_transitioning);
    assert_eq!(state.next_preset_id, None);
    assert_eq!(state.transition_progress, 0.0);
}

#[test]
fn start_time_is_captured_on_first_processed_frame() {
    let mut state = TransitionState::new("a");
    let mut sched = SlotScheduler::new("a");
    state.start_transition("b", None, Some(1.0));
    // a long gap between request and first render must not eat the fade
    let plan = sched.frame(&mut state, 100.0);
    assert_eq!(plan.progress, 0.0);
    assert!(state.is_transitioning);
    let plan = sched.frame(&mut state, 100.5);
    assert_eq!(plan.progress, 0.5);
    assert_eq!(state.transition_progress, 0.5);
}

#[test]
fn inactive_slot_gets_target_and_active_flips_on_completion() {
    let mut state = TransitionState::new("a");
    let mut sched = SlotScheduler::new("a");
    assert_eq!(sched.active(), Slot::A);
    assert_eq!(sched.content(Slot::A), Some("a"));
    assert_eq!(sched.content(Slot::B), None);

    state.start_transition("b", None, Some(1.0));
    let plan = sched.frame(&mut state, 0.0);
    assert_eq!(plan.from, Slot::A);
    assert_eq!(plan.to, Slot::B);
    assert!(plan.render_inactive);
    assert_eq!(sched.content(Slot::B), Some("b"));
    assert_eq!(sched.content(Slot::A), Some("a"));

    let plan = sched.frame(&mut state, 1.0);
    assert!(plan.completed);
    assert_eq!(sched.active(), Slot::B);

    // outgoing content stays mounted in its slot
    assert_eq!(sched.content(Slot::A), Some("a"));
    let idle = sched.frame(&mut state, 1.1);
    assert_eq!(idle.from, Slot::B);
    assert_eq!(idle.to, Slot::B);
    assert!(!idle.render_inactive);
}

#[test]
fn returning_to_a_slots_previous_content_keeps_its_identity() {
    let mut state = TransitionState::new("a");
    let mut sched = SlotScheduler::new("a");
    state.start_transition("b", None, Some(0.0));
    sched.frame(&mut state, 0.0);
    state.start_transition("a", None, None);
    sched.frame(&mut state, 0.1);
    assert_eq!(sched.active(), Slot::A);
    assert_eq!(sched.content(Slot::A), Some("a"));
    assert_eq!(sched.content(Slot::B), Some("b"));
}

#[test]
fn degenerate_duration_completes_on_first_frame() {
    for d in [0.0, -3.0, f32::NAN] {
        let mut state = TransitionState::new("a");
        let mut sched = SlotScheduler::new("a");
        assert!(state.start_transition("b", Some(TransitionType::Dissolve), Some(d)));
        assert_eq!(state.transition_duration, 0.0);
        let plan = sched.frame(&mut state, 5.0);
        assert!(plan.completed);
        assert_eq!(plan.progress, 1.0);
        assert_eq!(state.active_preset_id, "b");
    }
}

#[test]
fn progress_helper_clamps() {
    assert_eq!(transition_progress(-1.0, 2.0), 0.0);
    assert_eq!(transition_progress(1.0, 2.0), 0.5);
    assert_eq!(transition_progress(10.0, 2.0), 1.0);
    assert_eq!(transition_progress(0.0, 0.0), 1.0);
}

#[test]
fn complete_when_idle_changes_nothing() {
    let mut state = TransitionState::new("a");
    let before = state.clone();
    state.complete_transition();
    assert_eq!(state, before);
    state.update_progress(0.7);
    assert_eq!(state.transition_progress, 0.0);
}

#[test]
fn transition_types_parse_and_cycle() {
    assert_eq!("glitch-cut".parse::<TransitionType>(), Ok(TransitionType::GlitchCut));
    assert_eq!(" Zoom-Blur ".parse::<TransitionType>(), Ok(TransitionType::ZoomBlur));
    let err = "wipe".parse::<TransitionType>().unwrap_err();
    assert_eq!(err.to_string(), "unknown transition type 'wipe'");

    let mut t = TransitionType::Crossfade;
    let mut seen = Vec::new();
    for _ in 0..5 {
        seen.push(t);
        t = t.next();
    }
    assert_eq!(t, TransitionType::Crossfade);
    assert_eq!(seen, TransitionType::ALL.to_vec());
    for (i, t) in TransitionType::ALL.iter().enumerate() {
        assert_eq!(t.shader_index(), i as u32);
        assert_eq!(t.to_string(), t.label());
    }
}

#[test]
fn slot_other_and_index() {
    assert_eq!(Slot::A.other(), Slot::B);
    assert_eq!(Slot::B.other(), Slot::A);
    assert_eq!(Slot::A.index(), 0);
    assert_eq!(Slot::B.index(), 1);
}
