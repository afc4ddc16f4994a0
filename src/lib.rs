//! # Spotlit Scene Library
//!
//! This library renders a small lit 3D scene with `wgpu`. The scene has a ground plane, a cube, a
//! sphere and a single red spotlight that casts shadows. It runs natively in a `winit` window and
//! in the browser (WebGL2 or WebGPU) from the same code.
//!
//! Two variants are available (see [`Variant`]):
//!
//! - **Static**: the scene is built and drawn once; nothing moves.
//! - **Animated**: every frame the cube spins and the sphere bounces along a rectified sine path.
//!   An FPS overlay and a control panel with two speed sliders are drawn on top with `egui`.
//!
//! ## Modules
//!
//! - [`app`]: the `winit` application handler: bootstrap, resize, redraw and input.
//! - [`state`]: explicit application state: scene, camera, controls and bounce phase.
//! - [`scene`]: the scene container, meshes, materials and colours.
//! - [`camera`]: perspective camera.
//! - [`light`]: spotlight, its shadow camera, and the wireframe helper.
//! - [`geometry`]: plane, box and sphere tessellation.
//! - [`animation`]: per-frame motion of the cube and sphere.
//! - [`controls`]: the slider-backed speed parameters.
//! - [`frame_loop`]: start/stop ownership of the animation loop.
//! - [`stats`]: FPS / frame-time counters.
//! - [`gui`]: the `egui` overlay and control panel.
//! - [`frame_data`]: per-frame snapshot handed to the renderer.
//! - [`renderer`]: shadow pass, lit pass, helper lines and GUI drawing.
//! - [`gpu`]: device, queue and surface management.
//! - [`vertex`], [`uniform_buffer`], [`uniform_binding`]: GPU data layouts and bindings.
//! - [`error`]: fatal initialization errors.
//!
//! ## Usage
//!
//! ```no_run
//! fn main() -> Result<(), spotlit_scene::Error> {
//!     spotlit_scene::run(spotlit_scene::Variant::Animated)
//! }
//! ```
//!
//! On the web, call the exported `start_animated` or `start_static` function after loading the
//! module; the page must contain a `<canvas id="WebGL-output">`.
//!
//! ## Dependencies
//!
//! - `wgpu`: GPU access, pipelines and surface presentation.
//! - `winit`: window and event management.
//! - `egui`, `egui-wgpu`, `egui-winit`: the overlay and control panel.
//! - `nalgebra-glm`: matrix and vector math.
//! - `log`, with `env_logger` (desktop) or `console_log` (web): logging.
//! - `thiserror`: the [`Error`] type.

pub mod animation;
pub mod app;
pub mod camera;
pub mod controls;
pub mod error;
pub mod frame_data;
pub mod frame_loop;
pub mod geometry;
pub mod gpu;
pub mod gui;
pub mod light;
pub mod renderer;
pub mod scene;
pub mod state;
pub mod stats;
pub mod uniform_binding;
pub mod uniform_buffer;
pub mod variant;
pub mod vertex;

pub use crate::app::{App, AppEvent};
pub use crate::controls::Controls;
pub use crate::error::{Error, Result};
pub use crate::frame_loop::FrameLoop;
pub use crate::renderer::Renderer;
pub use crate::scene::Scene;
pub use crate::state::SceneState;
pub use crate::variant::Variant;

use winit::event_loop::{ControlFlow, EventLoop};

/// Creates the event loop and runs the scene until the window is closed.
///
/// On desktop this blocks and returns the first fatal error, if any. On the web the loop is
/// handed to the browser and this returns immediately; fatal errors are logged to the console.
///
/// # Errors
///
/// Any [`Error`] raised while creating the window, the surface or the GPU device, or by the event
/// loop itself.
pub fn run(variant: Variant) -> Result<()> {
    // The browser build hands its asynchronously created renderer back as a user event.
    let event_loop = EventLoop::<AppEvent>::with_user_event().build()?;
    // Redraws are requested explicitly by the frame loop, so the event loop can sleep otherwise.
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = App::new(variant, &event_loop);

    #[cfg(not(target_arch = "wasm32"))]
    {
        event_loop.run_app(&mut app)?;
        match app.take_error() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    #[cfg(target_arch = "wasm32")]
    {
        use winit::platform::web::EventLoopExtWebSys;
        event_loop.spawn_app(app);
        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
fn start_web(variant: Variant) {
    std::panic::set_hook(Box::new(console_error_panic_hook::hook));
    // A logger may already be installed if the page starts the scene twice.
    let _ = console_log::init_with_level(log::Level::Info);
    if let Err(error) = run(variant) {
        log::error!("{error}");
    }
}

/// Browser entry point for the animated variant.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn start_animated() {
    start_web(Variant::Animated);
}

/// Browser entry point for the static variant.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn start_static() {
    start_web(Variant::Static);
}
