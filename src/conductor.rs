use crate::camera::Camera;
use crate::core::{
    FramePlan, GlobalControls, Signals, Slot, SlotScheduler, TransitionState,
};
use crate::render::{GpuState, SceneFrame, SceneGraph};
use std::cell::RefCell;
use std::rc::Rc;

pub type SharedTransitionState = Rc<RefCell<TransitionState>>;

/// Dual-slot transition compositor.
///
/// The transition state is shared with the keyboard layer, which only ever
/// requests transitions; slot bookkeeping and GPU work stay in here.
pub struct Conductor {
    state: SharedTransitionState,
    scheduler: SlotScheduler,
    graphs: Option<[SceneGraph; 2]>,
    camera: Camera,
    time: f32,
}

impl Conductor {
    pub fn new(initial_scene: &str) -> Self {
        Self {
            state: Rc::new(RefCell::new(TransitionState::new(initial_scene))),
            scheduler: SlotScheduler::new(initial_scene),
            graphs: None,
            camera: Camera::default(),
            time: 0.0,
        }
    }

    pub fn shared_state(&self) -> SharedTransitionState {
        self.state.clone()
    }

    pub fn state(&self) -> TransitionState {
        self.state.borrow().clone()
    }

    /// Allocate both slot containers once the GPU is up. They live for the
    /// rest of the session.
    pub fn attach(&mut self, gpu: &GpuState) {
        if self.graphs.is_none() {
            self.graphs = Some([gpu.create_slot_graph("slot_a"), gpu.create_slot_graph("slot_b")]);
        }
    }

    /// Advance the transition and, when a GPU is present, draw the frame.
    ///
    /// Scheduling runs even without a GPU so requested transitions still
    /// complete and the shared state stays truthful.
    pub fn render(
        &mut self,
        gpu: Option<&mut GpuState>,
        signals: &Signals,
        controls: &GlobalControls,
        now: f64,
        dt: f32,
    ) -> FramePlan {
        self.time += dt.max(0.0);
        let plan = {
            let mut state = self.state.borrow_mut();
            self.scheduler.frame(&mut state, now)
        };
        if plan.completed {
            log::debug!("[conductor] active slot is now {:?}", self.scheduler.active());
        }

        let (Some(gpu), Some(graphs)) = (gpu, self.graphs.as_mut()) else {
            return plan;
        };
        for slot in [Slot::A, Slot::B] {
            graphs[slot.index()].assign(self.scheduler.content(slot));
        }
        let (w, h) = gpu.size();
        self.camera.sync_aspect(w, h);
        let frame = SceneFrame {
            signals,
            controls,
            camera: &self.camera,
            dt,
        };
        if let Err(e) = gpu.render_frame(graphs, &plan, &frame, self.time) {
            log::error!("render error: {:?}", e);
        }
        plan
    }
}
