#![cfg_attr(target_arch = "wasm32", allow(dead_code))]

//! Interactive generative canvas: pointer input seeds colored marks that are
//! animated and faded into the frame. Halo mode draws fading grid-cross
//! lines; drift mode spawns soft clouds that wander on a noise field and
//! dodge detected body keypoints.
//!
//! The simulation core below is target-independent; browser glue lives in
//! the wasm-only module at the bottom.

pub mod app;
pub mod cloud;
pub mod color;
pub mod config;
pub mod halo;
pub mod image;
pub mod input;
pub mod noise_field;
pub mod pose;
pub mod stamp;
pub mod surface;

// Only compile wasm-specific code when targeting wasm32.

#[cfg(target_arch = "wasm32")]
mod wasm {
    use wasm_bindgen::prelude::*;
    use wasm_bindgen::JsCast;

    mod render;

    #[wasm_bindgen(start)]
    pub fn main() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).ok();

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;
        let canvas = document
            .get_element_by_id("c")
            .ok_or("canvas not found")?
            .dyn_into::<web_sys::HtmlCanvasElement>()?;

        render::start(canvas)?;
        Ok(())
    }
}

// When compiling for non-wasm targets (e.g., `cargo test` on host),
// provide an empty stub so the crate still builds.
#[cfg(not(target_arch = "wasm32"))]
pub fn main() {}
