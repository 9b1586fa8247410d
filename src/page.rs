//! The page around the renderer.
//!
//! In the browser the room reports errors and clicked parts through DOM
//! elements and adds a "Reset View" button. Natively there is no page, so the
//! window title and the log stand in for it.

/// Shown when the wood texture (or any other colour map) can't be fetched.
pub const TEXTURE_ERROR_TEXT: &str =
    "A texture failed to load. Please check your internet connection or asset URL.";

/// Text shown for an error that stopped the room from starting.
pub fn startup_error_text(err: &anyhow::Error) -> String {
    format!("Error: {err}")
}

/// The page holds no canvas with the configured id.
pub fn canvas_missing() -> anyhow::Error {
    anyhow::anyhow!("Canvas element not found!")
}

/// Log a startup failure and put it into the page's error element.
pub fn report_startup_error(err: &anyhow::Error, page: &mut dyn HostPage) {
    log::error!("App initialization failed: {err:#}");
    page.show_error(&startup_error_text(err));
}

/// Unwrap the outcome of startup, reporting a failure on `page`.
pub fn report_startup<T>(result: anyhow::Result<T>, page: &mut dyn HostPage) -> Option<T> {
    result.inspect_err(|err| report_startup_error(err, page)).ok()
}

/// Output surface of the room besides the canvas.
pub trait HostPage {
    /// Make the error element visible with `message` as its text.
    fn show_error(&mut self, message: &str);
    fn show_info(&mut self, text: &str);
    fn hide_info(&mut self);
}

/// Page stand-in for native windows.
#[cfg(not(target_arch = "wasm32"))]
pub struct WindowPage {
    window: std::sync::Arc<winit::window::Window>,
    title: String,
}

#[cfg(not(target_arch = "wasm32"))]
impl WindowPage {
    pub fn new(window: std::sync::Arc<winit::window::Window>) -> Self {
        let title = window.title();
        Self { window, title }
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl HostPage for WindowPage {
    fn show_error(&mut self, message: &str) {
        log::error!("{message}");
        self.window.set_title(&format!("{} - {message}", self.title));
    }

    fn show_info(&mut self, text: &str) {
        self.window.set_title(&format!("{} | {text}", self.title));
    }

    fn hide_info(&mut self) {
        self.window.set_title(&self.title);
    }
}

#[cfg(target_arch = "wasm32")]
pub use dom::DomPage;

#[cfg(target_arch = "wasm32")]
mod dom {
    use anyhow::anyhow;
    use wasm_bindgen::{JsCast, closure::Closure};
    use winit::event_loop::EventLoopProxy;

    use super::HostPage;
    use crate::{config::RoomConfig, flow::FlowEvent};

    /// The DOM elements of the hosting page, looked up by id on every use.
    pub struct DomPage {
        document: web_sys::Document,
        error_id: String,
        info_id: String,
    }

    impl DomPage {
        pub fn new(config: &RoomConfig) -> anyhow::Result<Self> {
            let document = web_sys::window()
                .and_then(|window| window.document())
                .ok_or_else(|| anyhow!("no document to attach to"))?;
            Ok(Self {
                document,
                error_id: config.error_element_id.clone(),
                info_id: config.info_panel_id.clone(),
            })
        }

        fn element(&self, id: &str) -> Option<web_sys::HtmlElement> {
            self.document
                .get_element_by_id(id)
                .and_then(|el| el.dyn_into::<web_sys::HtmlElement>().ok())
        }

        fn set_display(el: &web_sys::HtmlElement, display: &str) {
            if let Err(err) = el.style().set_property("display", display) {
                log::warn!("could not set display of #{}: {err:?}", el.id());
            }
        }

        /**
         * Add the fixed "Reset View" button to the body. Clicking it sends
         * [`FlowEvent::ResetView`] through `proxy`, the listener lives as long
         * as the page.
         */
        pub fn inject_reset_button(
            &self,
            button_id: &str,
            proxy: EventLoopProxy<FlowEvent>,
        ) -> anyhow::Result<()> {
            let body = self
                .document
                .body()
                .ok_or_else(|| anyhow!("page has no body"))?;
            let html = format!(
                "<button id=\"{button_id}\" style=\"position:fixed;top:20px;right:20px;z-index:10;\
                 padding:10px 18px;font-size:1rem;border-radius:6px;border:none;background:#4169e1;\
                 color:white;box-shadow:0 2px 8px rgba(0,0,0,0.15);cursor:pointer;\">Reset View</button>"
            );
            body.insert_adjacent_html("beforeend", &html)
                .map_err(|err| anyhow!("could not add reset button: {err:?}"))?;
            let button = self
                .document
                .get_element_by_id(button_id)
                .ok_or_else(|| anyhow!("reset button #{button_id} missing after insert"))?;

            let on_click = Closure::<dyn FnMut()>::new(move || {
                if proxy.send_event(FlowEvent::ResetView).is_err() {
                    log::warn!("event loop closed, reset ignored");
                }
            });
            button
                .add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref())
                .map_err(|err| anyhow!("could not listen to reset button: {err:?}"))?;
            on_click.forget();
            Ok(())
        }
    }

    impl HostPage for DomPage {
        fn show_error(&mut self, message: &str) {
            log::error!("{message}");
            let Some(el) = self.element(&self.error_id) else {
                return;
            };
            Self::set_display(&el, "block");
            el.set_text_content(Some(message));
        }

        fn show_info(&mut self, text: &str) {
            let Some(el) = self.element(&self.info_id) else {
                log::info!("{text}");
                return;
            };
            el.set_inner_text(text);
            Self::set_display(&el, "block");
        }

        fn hide_info(&mut self) {
            if let Some(el) = self.element(&self.info_id) {
                Self::set_display(&el, "none");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn startup_error_shows_the_outer_message() {
        let err = anyhow::anyhow!("adapter lost").context("no suitable graphics adapter");
        assert_eq!(startup_error_text(&err), "Error: no suitable graphics adapter");
        assert_eq!(
            startup_error_text(&canvas_missing()),
            "Error: Canvas element not found!"
        );
    }
}
