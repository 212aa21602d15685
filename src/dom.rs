use wasm_bindgen::JsCast;
use web_sys as web;

#[inline]
pub fn window_document() -> Option<web::Document> {
    web::window().and_then(|w| w.document())
}

#[inline]
pub fn add_click_listener(
    document: &web::Document,
    element_id: &str,
    mut handler: impl FnMut() + 'static,
) {
    if let Some(el) = document.get_element_by_id(element_id) {
        let closure =
            wasm_bindgen::closure::Closure::wrap(Box::new(move || handler()) as Box<dyn FnMut()>);
        _ = el.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }
}

/// Match the canvas backing store to its CSS box times devicePixelRatio.
pub fn sync_canvas_backing_size(canvas: &web::HtmlCanvasElement) {
    if let Some(w) = web::window() {
        let dpr = w.device_pixel_ratio();
        let rect = canvas.get_bounding_client_rect();
        let w_px = (rect.width() * dpr) as u32;
        let h_px = (rect.height() * dpr) as u32;
        canvas.set_width(w_px.max(1));
        canvas.set_height(h_px.max(1));
    }
}

/// True when keystrokes are going into a form field.
pub fn is_text_entry(target: Option<web::EventTarget>) -> bool {
    match target {
        Some(t) => t.is_instance_of::<web::HtmlInputElement>()
            || t.is_instance_of::<web::HtmlTextAreaElement>()
            || t
                .dyn_ref::<web::HtmlElement>()
                .is_some_and(|el| el.is_content_editable()),
        None => false,
    }
}

pub fn toggle_fullscreen(canvas: &web::HtmlCanvasElement) {
    if let Some(doc) = window_document() {
        if doc.fullscreen_element().is_some() {
            _ = doc.exit_fullscreen();
        } else {
            _ = canvas.request_fullscreen();
        }
    }
}
