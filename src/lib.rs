#![cfg(target_arch = "wasm32")]
use crate::core::{
    shared_signals, AudioMode, Clock, FrameTimer, GlobalControls, LaunchConfig, SceneRegistry,
    TransitionType, DEFAULT_SCENE_ID,
};
use instant::Instant;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

mod audio;
mod camera;
mod conductor;
mod constants;
mod core;
mod dom;
mod events;
mod frame;
mod overlay;
mod render;

thread_local! {
    // Reachable from the exported functions below, which JS may call at any time
    static AUDIO: audio::SharedAudioAnalyzer = Rc::new(RefCell::new(audio::AudioAnalyzer::new()));
    static CONTROLS: Rc<RefCell<GlobalControls>> = Rc::new(RefCell::new(GlobalControls::default()));
    static TRANSITIONS: RefCell<Option<conductor::SharedTransitionState>> = const { RefCell::new(None) };
    static REGISTRY: Rc<SceneRegistry> = Rc::new(SceneRegistry::with_builtin_scenes());
}

fn shared_audio() -> audio::SharedAudioAnalyzer {
    AUDIO.with(|a| a.clone())
}

fn shared_controls() -> Rc<RefCell<GlobalControls>> {
    CONTROLS.with(|c| c.clone())
}

fn wire_canvas_resize(canvas: &web::HtmlCanvasElement) {
    dom::sync_canvas_backing_size(canvas);
    let canvas_resize = canvas.clone();
    let resize_closure = Closure::wrap(Box::new(move || {
        dom::sync_canvas_backing_size(&canvas_resize);
    }) as Box<dyn FnMut()>);
    if let Some(window) = web::window() {
        _ = window
            .add_event_listener_with_callback("resize", resize_closure.as_ref().unchecked_ref());
    }
    resize_closure.forget();
}

fn read_launch_config(window: &web::Window) -> LaunchConfig {
    let query = window.location().search().unwrap_or_default();
    let (cfg, errors) = LaunchConfig::from_query(&query);
    for e in errors {
        log::warn!("[config] ignoring {}", e);
    }
    cfg
}

fn resolve_initial_scene(cfg: &LaunchConfig, registry: &SceneRegistry) -> &'static str {
    match cfg.scene.as_deref().map(|id| registry.resolve(id)) {
        Some(Ok(d)) => d.id,
        Some(Err(e)) => {
            log::warn!("[config] {}, using {}", e, DEFAULT_SCENE_ID);
            DEFAULT_SCENE_ID
        }
        None => DEFAULT_SCENE_ID,
    }
}

// The overlay click is the user gesture browsers require before audio can start
fn wire_start_overlay(document: &web::Document, mode: AudioMode) {
    let audio = shared_audio();
    let doc = document.clone();
    dom::add_click_listener(document, "start-overlay", move || {
        overlay::hide(&doc);
        if mode == AudioMode::Microphone {
            audio::request_microphone(&audio);
        }
    });
}

/// Route playback of a page media element into the analyzer, replacing any
/// microphone input.
#[wasm_bindgen(js_name = initAudioElement)]
pub fn init_audio_element(element: web::HtmlMediaElement) -> Result<(), JsValue> {
    let input = audio::open_media_element(&element)
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    shared_audio().borrow_mut().attach(input);
    Ok(())
}

/// Release the capture graph; signals fall back to demo mode.
#[wasm_bindgen(js_name = disposeAudio)]
pub fn dispose_audio() {
    shared_audio().borrow_mut().dispose();
}

#[wasm_bindgen(js_name = setAudioGain)]
pub fn set_audio_gain(gain: f32) {
    if gain.is_finite() {
        shared_controls().borrow_mut().audio_gain = gain.max(0.0);
    }
}

#[wasm_bindgen(js_name = setAudioSmoothing)]
pub fn set_audio_smoothing(smoothing: f32) {
    if smoothing.is_finite() {
        shared_controls().borrow_mut().audio_smoothing = smoothing.clamp(0.0, 0.99);
    }
}

#[wasm_bindgen(js_name = setBeatSensitivity)]
pub fn set_beat_sensitivity(sensitivity: f32) {
    if sensitivity.is_finite() {
        shared_controls().borrow_mut().beat_sensitivity = sensitivity.max(0.0);
    }
}

/// Ask the compositor to move to `target`, which must be a registered scene.
/// `kind` and `duration` are optional and become the new defaults. Returns
/// whether the request was accepted.
#[wasm_bindgen(js_name = startTransition)]
pub fn start_transition(
    target: &str,
    kind: Option<String>,
    duration: Option<f32>,
) -> Result<bool, JsValue> {
    let target = REGISTRY
        .with(|r| r.resolve(target).map(|d| d.id))
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    let kind = kind
        .map(|k| k.parse::<TransitionType>())
        .transpose()
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    let accepted = TRANSITIONS.with(|t| {
        t.borrow()
            .as_ref()
            .is_some_and(|state| state.borrow_mut().start_transition(target, kind, duration))
    });
    Ok(accepted)
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("void-web starting");

    spawn_local(async move {
        if let Err(e) = init().await {
            log::error!("init error: {:?}", e);
        }
    });
    Ok(())
}

async fn init() -> anyhow::Result<()> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| anyhow::anyhow!("no document"))?;

    let canvas_el = document
        .get_element_by_id("app-canvas")
        .ok_or_else(|| anyhow::anyhow!("missing #app-canvas"))?;
    let canvas: web::HtmlCanvasElement = canvas_el
        .dyn_into::<web::HtmlCanvasElement>()
        .map_err(|e| anyhow::anyhow!(format!("{:?}", e)))?;
    wire_canvas_resize(&canvas);

    let cfg = read_launch_config(&window);
    let registry = REGISTRY.with(|r| r.clone());
    let initial = resolve_initial_scene(&cfg, &registry);

    let controls = shared_controls();
    cfg.apply_to_controls(&mut controls.borrow_mut());

    let mut conductor = conductor::Conductor::new(initial);
    cfg.apply_to_transitions(&mut conductor.shared_state().borrow_mut());
    TRANSITIONS.with(|t| *t.borrow_mut() = Some(conductor.shared_state()));

    let audio = shared_audio();
    audio.borrow_mut().apply_controls(&controls.borrow());
    wire_start_overlay(&document, cfg.audio);

    let gpu = frame::init_gpu(&canvas, &registry).await;
    if let Some(g) = &gpu {
        conductor.attach(g);
    }

    events::wire_global_keydown(events::KeyboardWiring {
        controls: controls.clone(),
        transitions: conductor.shared_state(),
        registry: registry.clone(),
        audio: audio.clone(),
        canvas: canvas.clone(),
    });
    overlay::set_hud_visible(&document, controls.borrow().show_hud);

    let bpm = controls.borrow().bpm();
    let now = Instant::now();
    let frame_ctx = Rc::new(RefCell::new(frame::FrameContext {
        signals: shared_signals(),
        audio,
        clock: Clock::new(bpm),
        controls,
        conductor,
        gpu,
        canvas,
        document,
        timer: FrameTimer::default(),
        last_instant: now,
        last_hud: None,
    }));
    frame::start_loop(frame_ctx);
    Ok(())
}
