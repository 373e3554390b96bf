//! Browser glue: binds the simulation core to a 2-D canvas context, drives
//! the requestAnimationFrame loop, and wires pointer/keyboard/resize events
//! plus the asynchronous pose-detection intake.

use std::cell::RefCell;
use std::rc::Rc;

use glam::DVec2;
use wasm_bindgen::prelude::*;
use wasm_bindgen::{Clamped, JsCast};
use web_sys::{
    window, CanvasRenderingContext2d, Document, HtmlCanvasElement, HtmlImageElement,
    ImageData, KeyboardEvent, PointerEvent,
};

use crate::app::{App, Mode};
use crate::color::{Rgb, Rgba};
use crate::image::RefImage;
use crate::pose::{Keypoint, Pose, PoseSnapshot};
use crate::stamp::AlphaMask;
use crate::surface::Surface;

thread_local! {
    // Handle for the exported intake functions below; the rest of the state
    // is owned by the event closures created in `start`.
    static APP: RefCell<Option<Rc<RefCell<App>>>> = RefCell::new(None);
}

/// `Surface` backed by a canvas 2-D context. Tinted mask blits go through a
/// scratch canvas so they composite "over" like any other drawImage.
struct Canvas2d {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    scratch: HtmlCanvasElement,
    scratch_ctx: CanvasRenderingContext2d,
}

impl Canvas2d {
    fn new(canvas: HtmlCanvasElement, document: &Document) -> Result<Self, JsValue> {
        let ctx = context_2d(&canvas)?;
        let scratch = document
            .create_element("canvas")?
            .dyn_into::<HtmlCanvasElement>()?;
        let scratch_ctx = context_2d(&scratch)?;
        Ok(Self {
            canvas,
            ctx,
            scratch,
            scratch_ctx,
        })
    }

    fn fill_background(&self) {
        self.ctx.set_fill_style_str("#ffffff");
        self.ctx.fill_rect(0.0, 0.0, self.width(), self.height());
    }

    fn draw_layer_under(&self, layer: &Canvas2d) {
        let _ = self
            .ctx
            .draw_image_with_html_canvas_element(&layer.canvas, 0.0, 0.0);
    }

    fn resize(&self, width: u32, height: u32) {
        self.canvas.set_width(width);
        self.canvas.set_height(height);
    }
}

fn context_2d(canvas: &HtmlCanvasElement) -> Result<CanvasRenderingContext2d, JsValue> {
    canvas
        .get_context("2d")?
        .ok_or("2d context not supported")?
        .dyn_into::<CanvasRenderingContext2d>()
        .map_err(Into::into)
}

fn css_color(color: Rgba) -> String {
    format!(
        "rgba({},{},{},{:.4})",
        color.rgb.r,
        color.rgb.g,
        color.rgb.b,
        color.alpha / 255.0
    )
}

impl Surface for Canvas2d {
    fn width(&self) -> f64 {
        self.canvas.width() as f64
    }

    fn height(&self) -> f64 {
        self.canvas.height() as f64
    }

    fn line(&mut self, from: DVec2, to: DVec2, color: Rgba, weight: f64) {
        self.ctx.set_stroke_style_str(&css_color(color));
        self.ctx.set_line_width(weight);
        self.ctx.begin_path();
        self.ctx.move_to(from.x, from.y);
        self.ctx.line_to(to.x, to.y);
        self.ctx.stroke();
    }

    fn fill_circle(&mut self, center: DVec2, diameter: f64, color: Rgba) {
        self.ctx.set_fill_style_str(&css_color(color));
        self.ctx.begin_path();
        let _ = self
            .ctx
            .arc(center.x, center.y, diameter / 2.0, 0.0, std::f64::consts::TAU);
        self.ctx.fill();
    }

    fn blit_mask(&mut self, mask: &AlphaMask, center: DVec2, tint: Rgb, alpha: f64) {
        let size = mask.size() as u32;
        if size == 0 {
            return;
        }
        if self.scratch.width() != size || self.scratch.height() != size {
            self.scratch.set_width(size);
            self.scratch.set_height(size);
        }

        let mut rgba = vec![0u8; (size * size * 4) as usize];
        for (i, &m) in mask.data().iter().enumerate() {
            let o = i * 4;
            rgba[o] = tint.r;
            rgba[o + 1] = tint.g;
            rgba[o + 2] = tint.b;
            rgba[o + 3] = (m as f64 * alpha).clamp(0.0, 255.0) as u8;
        }

        match ImageData::new_with_u8_clamped_array_and_sh(Clamped(rgba.as_slice()), size, size) {
            Ok(data) => {
                let _ = self.scratch_ctx.put_image_data(&data, 0.0, 0.0);
                let _ = self.ctx.draw_image_with_html_canvas_element(
                    &self.scratch,
                    center.x - size as f64 / 2.0,
                    center.y - size as f64 / 2.0,
                );
            }
            Err(err) => log::warn!("mask blit failed: {err:?}"),
        }
    }

    fn clear(&mut self) {
        self.ctx.clear_rect(0.0, 0.0, self.width(), self.height());
    }
}

fn window_size() -> (u32, u32) {
    let win = window().expect("no window");
    let w = win
        .inner_width()
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(800.0);
    let h = win
        .inner_height()
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(600.0);
    (w as u32, h as u32)
}

/// Sets up surfaces, event listeners and the animation loop.
pub fn start(canvas: HtmlCanvasElement) -> Result<(), JsValue> {
    let win = window().ok_or("no window")?;
    let document = win.document().ok_or("no document")?;

    let (w, h) = window_size();
    canvas.set_width(w);
    canvas.set_height(h);

    let app = Rc::new(RefCell::new(App::new(w as f64, h as f64, Mode::Halo)));
    APP.with(|slot| *slot.borrow_mut() = Some(app.clone()));

    let main_surface = Rc::new(RefCell::new(Canvas2d::new(canvas.clone(), &document)?));

    // Offscreen layer accumulating baked clouds; cleared on 'c' and resize.
    let layer_canvas = document
        .create_element("canvas")?
        .dyn_into::<HtmlCanvasElement>()?;
    layer_canvas.set_width(w);
    layer_canvas.set_height(h);
    let layer_surface = Rc::new(RefCell::new(Canvas2d::new(layer_canvas, &document)?));

    // Pointer events
    {
        let app = app.clone();
        let closure = Closure::wrap(Box::new(move |ev: PointerEvent| {
            app.borrow_mut()
                .pointer_pressed(ev.offset_x() as f64, ev.offset_y() as f64);
        }) as Box<dyn FnMut(PointerEvent)>);
        canvas.add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    {
        let app = app.clone();
        let closure = Closure::wrap(Box::new(move |ev: PointerEvent| {
            app.borrow_mut()
                .pointer_dragged(ev.offset_x() as f64, ev.offset_y() as f64);
        }) as Box<dyn FnMut(PointerEvent)>);
        canvas.add_event_listener_with_callback("pointermove", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    {
        let app = app.clone();
        let closure = Closure::wrap(Box::new(move |_ev: PointerEvent| {
            app.borrow_mut().pointer_released();
        }) as Box<dyn FnMut(PointerEvent)>);
        canvas.add_event_listener_with_callback("pointerup", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    // Keyboard: 'c' clears, 'm' toggles mode
    {
        let app = app.clone();
        let layer = layer_surface.clone();
        let closure = Closure::wrap(Box::new(move |ev: KeyboardEvent| {
            match ev.key().as_str() {
                "c" | "C" => app.borrow_mut().clear(&mut *layer.borrow_mut()),
                "m" | "M" => app.borrow_mut().toggle_mode(),
                _ => {}
            }
        }) as Box<dyn FnMut(KeyboardEvent)>);
        win.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    // Resize canvas (and the bake layer, which restarts empty) to fit window
    {
        let app = app.clone();
        let main = main_surface.clone();
        let layer = layer_surface.clone();
        let closure = Closure::wrap(Box::new(move || {
            let (w, h) = window_size();
            main.borrow().resize(w, h);
            layer.borrow().resize(w, h);
            app.borrow_mut().resize(w as f64, h as f64);
        }) as Box<dyn FnMut()>);
        win.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    // Animation loop
    // `f` holds the animation-frame closure so that we can keep calling
    // `request_animation_frame` recursively. Storing it inside an `Option`
    // allows us to create the `Closure` first and then obtain a reference to
    // it from within itself.
    let f: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let g = f.clone();
    *g.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        {
            let mut main = main_surface.borrow_mut();
            let mut layer = layer_surface.borrow_mut();
            main.fill_background();
            main.draw_layer_under(&layer);
            app.borrow_mut().frame(&mut *main, &mut *layer);
        }

        // schedule next
        window()
            .unwrap()
            .request_animation_frame(f.borrow().as_ref().unwrap().as_ref().unchecked_ref())
            .unwrap();
    }) as Box<dyn FnMut()>));

    win.request_animation_frame(g.borrow().as_ref().unwrap().as_ref().unchecked_ref())?;

    Ok(())
}

/// Intake for the external pose-detection stream. Results replace the
/// previous snapshot; the frame loop reads whatever is latest.
#[wasm_bindgen]
pub fn on_pose_update(results: JsValue) {
    let snapshot = parse_poses(&results);
    APP.with(|slot| {
        if let Some(app) = slot.borrow().as_ref() {
            app.borrow_mut().on_pose_update(snapshot);
        }
    });
}

/// Installs the reference image used for seed-point color sampling. The
/// image is decoded through a temporary canvas once, up front.
#[wasm_bindgen]
pub fn set_reference_image(image: HtmlImageElement) -> Result<(), JsValue> {
    let document = window()
        .ok_or("no window")?
        .document()
        .ok_or("no document")?;
    let (w, h) = (image.natural_width(), image.natural_height());
    if w == 0 || h == 0 {
        log::warn!("reference image not ready; keeping fallback color");
        return Ok(());
    }

    let canvas = document
        .create_element("canvas")?
        .dyn_into::<HtmlCanvasElement>()?;
    canvas.set_width(w);
    canvas.set_height(h);
    let ctx = context_2d(&canvas)?;
    ctx.draw_image_with_html_image_element(&image, 0.0, 0.0)?;
    let data = ctx.get_image_data(0.0, 0.0, w as f64, h as f64)?;

    match RefImage::new(w, h, data.data().to_vec()) {
        Some(reference) => {
            APP.with(|slot| {
                if let Some(app) = slot.borrow().as_ref() {
                    app.borrow_mut().set_reference_image(reference);
                }
            });
            Ok(())
        }
        None => {
            log::warn!("reference image buffer mismatch; keeping fallback color");
            Ok(())
        }
    }
}

/// Parses detector results (an array of poses, each with a `keypoints`
/// array). Anything malformed degrades to an empty keypoint list.
fn parse_poses(results: &JsValue) -> PoseSnapshot {
    if !js_sys::Array::is_array(results) {
        return PoseSnapshot::default();
    }
    let poses = js_sys::Array::from(results)
        .iter()
        .map(|pose| Pose {
            keypoints: js_sys::Reflect::get(&pose, &"keypoints".into())
                .ok()
                .filter(js_sys::Array::is_array)
                .map(|arr| {
                    js_sys::Array::from(&arr)
                        .iter()
                        .filter_map(|kp| parse_keypoint(&kp))
                        .collect()
                })
                .unwrap_or_default(),
        })
        .collect();
    PoseSnapshot { poses }
}

fn parse_keypoint(value: &JsValue) -> Option<Keypoint> {
    let field = |name: &str| {
        js_sys::Reflect::get(value, &name.into())
            .ok()
            .and_then(|v| v.as_f64())
    };
    Some(Keypoint {
        x: field("x")?,
        y: field("y")?,
        confidence: field("confidence").unwrap_or(0.0),
    })
}
