use crate::audio::{self, SharedAudioAnalyzer};
use crate::conductor::SharedTransitionState;
use crate::core::{apply_to_controls, command_for_key, GlobalControls, KeyCommand, SceneRegistry, TransitionType};
use crate::{dom, overlay};
use rand::seq::SliceRandom;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use web_sys as web;

/// Everything a keystroke can touch.
#[derive(Clone)]
pub struct KeyboardWiring {
    pub controls: Rc<RefCell<GlobalControls>>,
    pub transitions: SharedTransitionState,
    pub registry: Rc<SceneRegistry>,
    pub audio: SharedAudioAnalyzer,
    pub canvas: web::HtmlCanvasElement,
}

fn request_scene(w: &KeyboardWiring, id: &str, kind: Option<TransitionType>) {
    if !w.transitions.borrow_mut().start_transition(id, kind, None) {
        log::debug!("[keys] transition to {} ignored", id);
    }
}

fn random_scene(w: &KeyboardWiring) {
    let active = w.transitions.borrow().active_preset_id.clone();
    let candidates: Vec<&'static str> = w.registry.ids().filter(|id| *id != active).collect();
    let mut rng = rand::thread_rng();
    if let Some(id) = candidates.choose(&mut rng) {
        let kind = TransitionType::ALL.choose(&mut rng).copied();
        request_scene(w, id, kind);
    }
}

pub fn handle_global_keydown(ev: &web::KeyboardEvent, w: &KeyboardWiring) {
    if ev.ctrl_key() || ev.meta_key() || ev.alt_key() || dom::is_text_entry(ev.target()) {
        return;
    }
    let Some(cmd) = command_for_key(&ev.key()) else {
        return;
    };
    if cmd.prevents_default() {
        ev.prevent_default();
    }
    if apply_to_controls(cmd, &mut w.controls.borrow_mut()) {
        if cmd == KeyCommand::ToggleHud {
            if let Some(doc) = dom::window_document() {
                overlay::set_hud_visible(&doc, w.controls.borrow().show_hud);
            }
        }
        return;
    }
    match cmd {
        KeyCommand::SelectScene(i) => {
            if let Some(id) = w.registry.get_by_index(i).map(|d| d.id) {
                request_scene(w, id, None);
            }
        }
        KeyCommand::RandomScene => random_scene(w),
        KeyCommand::CycleTransitionType => {
            let mut state = w.transitions.borrow_mut();
            let next = state.transition_type.next();
            state.set_transition_type(next);
            log::info!("[keys] transition type {}", next);
        }
        KeyCommand::EnableMicrophone => audio::request_microphone(&w.audio),
        KeyCommand::ToggleFullscreen => dom::toggle_fullscreen(&w.canvas),
        _ => {}
    }
}

pub fn wire_global_keydown(w: KeyboardWiring) {
    if let Some(window) = web::window() {
        let closure =
            wasm_bindgen::closure::Closure::wrap(Box::new(move |ev: web::KeyboardEvent| {
                handle_global_keydown(&ev, &w);
            }) as Box<dyn FnMut(_)>);
        _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        closure.forget();
    }
}
