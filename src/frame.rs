use crate::audio::SharedAudioAnalyzer;
use crate::conductor::Conductor;
use crate::core::{Clock, FrameTimer, GlobalControls, SharedSignals};
use crate::overlay;
use crate::render;
use instant::Instant;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

pub struct FrameContext<'a> {
    pub signals: SharedSignals,
    pub audio: SharedAudioAnalyzer,
    pub clock: Clock,
    pub controls: Rc<RefCell<GlobalControls>>,
    pub conductor: Conductor,
    pub gpu: Option<render::GpuState<'a>>,
    pub canvas: web::HtmlCanvasElement,
    pub document: web::Document,
    pub timer: FrameTimer,
    pub last_instant: Instant,
    pub last_hud: Option<overlay::HudInfo>,
}

impl<'a> FrameContext<'a> {
    /// One frame, in fixed order: audio, then clock, then the compositor.
    pub fn frame(&mut self) {
        let now = Instant::now();
        let dt_sec = self.timer.advance((now - self.last_instant).as_secs_f32());
        self.last_instant = now;
        let timeline = self.timer.timeline();

        let controls = self.controls.borrow().clone();
        {
            let mut signals = self.signals.borrow_mut();
            let mut audio = self.audio.borrow_mut();
            audio.apply_controls(&controls);
            audio.analyze(dt_sec, &mut signals);

            self.clock.set_bpm(controls.bpm());
            self.clock
                .update(dt_sec, controls.master_speed, &mut signals.clock);
        }

        if let Some(g) = &mut self.gpu {
            g.resize_if_needed(self.canvas.width(), self.canvas.height());
        }
        let signals = self.signals.borrow();
        self.conductor
            .render(self.gpu.as_mut(), &signals, &controls, timeline, dt_sec);
        drop(signals);

        if controls.show_hud {
            self.refresh_hud(&controls);
        }
    }

    fn refresh_hud(&mut self, controls: &GlobalControls) {
        let info = overlay::HudInfo::new(
            &self.conductor.state(),
            controls.bpm(),
            controls.master_speed,
            self.audio.borrow().mode_label(),
        );
        if self.last_hud.as_ref() != Some(&info) {
            overlay::update_hud(&self.document, &info);
            self.last_hud = Some(info);
        }
    }
}

pub async fn init_gpu(
    canvas: &web::HtmlCanvasElement,
    registry: &crate::core::SceneRegistry,
) -> Option<render::GpuState<'static>> {
    // leak a canvas clone to satisfy 'static lifetime for surface
    let leaked_canvas = Box::leak(Box::new(canvas.clone()));
    match render::GpuState::new(leaked_canvas, registry).await {
        Ok(g) => Some(g),
        Err(e) => {
            log::error!("WebGPU init error: {:?}", e);
            None
        }
    }
}

pub fn start_loop(frame_ctx: Rc<RefCell<FrameContext<'static>>>) {
    let tick: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let tick_clone = tick.clone();
    let frame_ctx_tick = frame_ctx.clone();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        frame_ctx_tick.borrow_mut().frame();
        request_frame(&tick_clone);
    }) as Box<dyn FnMut()>));
    request_frame(&tick);
}

fn request_frame(tick: &Rc<RefCell<Option<Closure<dyn FnMut()>>>>) {
    if let (Some(w), Some(cb)) = (web::window(), tick.borrow().as_ref()) {
        _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
    }
}
