use crate::core::TransitionState;
use web_sys as web;

const START_OVERLAY_ID: &str = "start-overlay";
const HUD_ID: &str = "hud-overlay";

#[inline]
pub fn hide(document: &web::Document) {
    if let Some(el) = document.get_element_by_id(START_OVERLAY_ID) {
        _ = el.class_list().add_1("hidden");
        // fallback for pages without the CSS class
        _ = el.set_attribute("style", "display:none");
    }
}

pub fn set_hud_visible(document: &web::Document, visible: bool) {
    if let Some(el) = document.get_element_by_id(HUD_ID) {
        let style = if visible { "" } else { "display:none" };
        _ = el.set_attribute("style", style);
    }
}

/// What the HUD shows; compared frame to frame so the DOM is only touched on change.
#[derive(Clone, Debug, PartialEq)]
pub struct HudInfo {
    pub active: String,
    pub next: Option<String>,
    pub progress_pct: u32,
    pub transition: String,
    pub duration: f32,
    pub bpm: f32,
    pub speed: f32,
    pub audio_mode: &'static str,
}

impl HudInfo {
    pub fn new(state: &TransitionState, bpm: f32, speed: f32, audio_mode: &'static str) -> Self {
        Self {
            active: state.active_preset_id.clone(),
            next: state.next_preset_id.clone(),
            progress_pct: (state.transition_progress * 100.0).round() as u32,
            transition: state.transition_type.to_string(),
            duration: state.transition_duration,
            bpm,
            speed,
            audio_mode,
        }
    }
}

const HUD_PANEL_STYLE: &str = "color: #cfe7ff; font: 12px ui-monospace, monospace; background: rgba(6, 6, 12, 0.75); padding: 8px 12px; border-radius: 6px; border: 1px solid rgba(120, 80, 200, 0.35);";

impl HudInfo {
    pub fn text(&self) -> String {
        let scene_text = match &self.next {
            Some(next) => format!("{} → {} ({}%)", self.active, next, self.progress_pct),
            None => self.active.clone(),
        };
        format!(
            "{} • {} {:.1}s • BPM {:.0} • speed {:.1}x • audio: {}",
            scene_text, self.transition, self.duration, self.bpm, self.speed, self.audio_mode
        )
    }
}

// Scene ids can come from JS, so the HUD is written as text, never markup
pub fn update_hud(document: &web::Document, info: &HudInfo) {
    let Some(el) = document.get_element_by_id(HUD_ID) else {
        return;
    };
    let panel = match el.first_element_child() {
        Some(p) => p,
        None => {
            let Ok(p) = document.create_element("div") else {
                return;
            };
            _ = p.set_attribute("style", HUD_PANEL_STYLE);
            _ = el.append_child(&p);
            p
        }
    };
    panel.set_text_content(Some(&info.text()));
}
