use crate::constants::{ANALYSER_FFT_SIZE, FILE_ANALYSER_SMOOTHING, MIC_ANALYSER_SMOOTHING};
use crate::core::{
    AnalysisSource, CaptureRequest, GlobalControls, InputStatus, SignalAnalyzer, Signals,
};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys as web;

#[derive(Debug, thiserror::Error)]
pub enum AudioInitError {
    #[error("no window")]
    NoWindow,
    #[error("navigator.mediaDevices is unavailable")]
    NoMediaDevices,
    #[error("microphone access denied: {0}")]
    PermissionDenied(String),
    #[error("audio graph error: {0}")]
    Graph(String),
}

fn graph_err(what: &str, e: JsValue) -> AudioInitError {
    AudioInitError::Graph(format!("{}: {:?}", what, e))
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputKind {
    Microphone,
    MediaElement,
}

/// A live capture graph: context, source and the analyser tapping it.
pub struct AudioInput {
    ctx: web::AudioContext,
    analyser: web::AnalyserNode,
    source: web::AudioNode,
    stream: Option<web::MediaStream>,
    kind: InputKind,
}

impl AudioInput {
    fn status(&self) -> InputStatus {
        context_status(&self.ctx)
    }

    fn dispose(self) {
        if let Some(stream) = &self.stream {
            let tracks: js_sys::Array = stream.get_tracks();
            for track in tracks.iter() {
                if let Ok(t) = track.dyn_into::<web::MediaStreamTrack>() {
                    t.stop();
                }
            }
        }
        _ = self.source.disconnect();
        _ = self.analyser.disconnect();
        _ = self.ctx.close();
    }
}

fn context_status(ctx: &web::AudioContext) -> InputStatus {
    match ctx.state() {
        web::AudioContextState::Running => InputStatus::Running,
        web::AudioContextState::Suspended => InputStatus::Suspended,
        _ => InputStatus::Uninitialized,
    }
}

// Contexts created outside a gesture start suspended; try now, then again on
// the next interaction.
fn wake_context(ctx: &web::AudioContext) {
    if !context_status(ctx).needs_resume() {
        return;
    }
    _ = ctx.resume();
    log::info!("[audio] context suspended, will resume on next interaction");
    resume_on_gesture(ctx);
}

fn create_analyser(
    ctx: &web::AudioContext,
    smoothing: f64,
) -> Result<web::AnalyserNode, AudioInitError> {
    let analyser = ctx
        .create_analyser()
        .map_err(|e| graph_err("AnalyserNode", e))?;
    analyser.set_fft_size(ANALYSER_FFT_SIZE);
    // Band smoothing happens in SignalAnalyzer; the node's own is for file playback only
    analyser.set_smoothing_time_constant(smoothing);
    Ok(analyser)
}

/// Ask for the microphone and build a capture graph around it.
///
/// The permission prompt is raised before the context exists. The analyser
/// is not routed to the speakers.
pub async fn open_microphone() -> Result<AudioInput, AudioInitError> {
    let window = web::window().ok_or(AudioInitError::NoWindow)?;
    let devices = window
        .navigator()
        .media_devices()
        .map_err(|_| AudioInitError::NoMediaDevices)?;
    let constraints = web::MediaStreamConstraints::new();
    constraints.set_audio(&JsValue::TRUE);
    constraints.set_video(&JsValue::FALSE);
    let promise = devices
        .get_user_media_with_constraints(&constraints)
        .map_err(|e| AudioInitError::PermissionDenied(format!("{:?}", e)))?;
    let stream: web::MediaStream = JsFuture::from(promise)
        .await
        .map_err(|e| AudioInitError::PermissionDenied(format!("{:?}", e)))?
        .dyn_into()
        .map_err(|e| graph_err("MediaStream", e))?;

    let ctx = web::AudioContext::new().map_err(|e| graph_err("AudioContext", e))?;
    let analyser = create_analyser(&ctx, MIC_ANALYSER_SMOOTHING)?;
    let source = ctx
        .create_media_stream_source(&stream)
        .map_err(|e| graph_err("MediaStreamAudioSourceNode", e))?;
    source
        .connect_with_audio_node(&analyser)
        .map_err(|e| graph_err("connect", e))?;

    if context_status(&ctx).needs_resume() {
        if let Ok(p) = ctx.resume() {
            _ = JsFuture::from(p).await;
        }
    }
    wake_context(&ctx);

    Ok(AudioInput {
        ctx,
        analyser,
        source: source.into(),
        stream: Some(stream),
        kind: InputKind::Microphone,
    })
}

/// Route a page `<audio>`/`<video>` element through an analyser to the speakers.
pub fn open_media_element(element: &web::HtmlMediaElement) -> Result<AudioInput, AudioInitError> {
    let ctx = web::AudioContext::new().map_err(|e| graph_err("AudioContext", e))?;
    let analyser = create_analyser(&ctx, FILE_ANALYSER_SMOOTHING)?;
    let source = ctx
        .create_media_element_source(element)
        .map_err(|e| graph_err("MediaElementAudioSourceNode", e))?;
    source
        .connect_with_audio_node(&analyser)
        .map_err(|e| graph_err("connect", e))?;
    analyser
        .connect_with_audio_node(&ctx.destination())
        .map_err(|e| graph_err("connect", e))?;
    wake_context(&ctx);
    Ok(AudioInput {
        ctx,
        analyser,
        source: source.into(),
        stream: None,
        kind: InputKind::MediaElement,
    })
}

fn resume_on_gesture(ctx: &web::AudioContext) {
    let Some(window) = web::window() else {
        return;
    };
    let opts = web::AddEventListenerOptions::new();
    opts.set_once(true);
    for event in ["click", "keydown", "touchstart"] {
        let ctx = ctx.clone();
        let closure = Closure::wrap(Box::new(move || {
            if ctx.state() == web::AudioContextState::Suspended {
                _ = ctx.resume();
            }
        }) as Box<dyn FnMut()>);
        _ = window.add_event_listener_with_callback_and_add_event_listener_options(
            event,
            closure.as_ref().unchecked_ref(),
            &opts,
        );
        closure.forget();
    }
}

/// Browser side of the analyzer: owns the optional capture graph and the
/// byte buffers it is read into, and hands them to [`SignalAnalyzer`].
pub struct AudioAnalyzer {
    input: Option<AudioInput>,
    mic_request: CaptureRequest,
    core: SignalAnalyzer,
    frequency: Vec<u8>,
    time_domain: Vec<u8>,
}

impl AudioAnalyzer {
    pub fn new() -> Self {
        Self {
            input: None,
            mic_request: CaptureRequest::default(),
            core: SignalAnalyzer::new(),
            frequency: Vec::new(),
            time_domain: Vec::new(),
        }
    }

    /// Replace the current input, releasing the previous graph.
    pub fn attach(&mut self, input: AudioInput) {
        if let Some(old) = self.input.take() {
            old.dispose();
        }
        let bins = input.analyser.frequency_bin_count() as usize;
        self.frequency.resize(bins, 0);
        self.time_domain.resize(bins, 128);
        self.core.reset_live_state();
        log::info!("[audio] {:?} input attached, {} bins", input.kind, bins);
        self.input = Some(input);
    }

    pub fn dispose(&mut self) {
        if let Some(old) = self.input.take() {
            old.dispose();
        }
    }

    pub fn status(&self) -> InputStatus {
        self.input
            .as_ref()
            .map_or(InputStatus::Uninitialized, AudioInput::status)
    }

    pub fn has_microphone(&self) -> bool {
        self.input
            .as_ref()
            .is_some_and(|i| i.kind == InputKind::Microphone)
    }

    /// "mic", "file" or "demo", whichever is actually feeding the signals.
    pub fn mode_label(&self) -> &'static str {
        match (&self.input, self.status()) {
            (Some(i), InputStatus::Running) => match i.kind {
                InputKind::Microphone => "mic",
                InputKind::MediaElement => "file",
            },
            _ => "demo",
        }
    }

    pub fn apply_controls(&mut self, controls: &GlobalControls) {
        self.core.set_gain(controls.audio_gain);
        self.core.set_smoothing(controls.audio_smoothing);
        self.core.set_beat_sensitivity(controls.beat_sensitivity);
    }

    /// Fill `signals.audio` for this frame.
    pub fn analyze(&mut self, delta: f32, signals: &mut Signals) {
        let status = self.status();
        if status == InputStatus::Running {
            if let Some(input) = &self.input {
                input.analyser.get_byte_frequency_data(&mut self.frequency);
                input
                    .analyser
                    .get_byte_time_domain_data(&mut self.time_domain);
            }
        }
        let source = AnalysisSource::for_status(status, &self.frequency, &self.time_domain);
        self.core.analyze(source, delta, &mut signals.audio);
    }
}

pub type SharedAudioAnalyzer = std::rc::Rc<std::cell::RefCell<AudioAnalyzer>>;

/// Start microphone capture in the background. On failure the analyzer keeps
/// serving demo signals.
pub fn request_microphone(analyzer: &SharedAudioAnalyzer) {
    {
        let mut a = analyzer.borrow_mut();
        if a.has_microphone() || !a.mic_request.try_begin() {
            return;
        }
    }
    let analyzer = analyzer.clone();
    wasm_bindgen_futures::spawn_local(async move {
        let result = open_microphone().await;
        let mut a = analyzer.borrow_mut();
        a.mic_request.finish();
        match result {
            Ok(input) => a.attach(input),
            Err(e) => log::info!("[audio] {}; running in demo mode", e),
        }
    });
}
