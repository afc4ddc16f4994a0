//! # Application Core (`app.rs`)
//!
//! The [`App`] struct is the `winit` application handler. It owns the window, the renderer, the
//! `egui` integration and the [`SceneState`], and routes window events to them:
//!
//! - **`resumed`** runs the scene bootstrapper: it creates the window (or attaches to the page's
//!   canvas), builds the scene, and initializes the renderer.
//! - **`Resized`** runs the resize handler: camera aspect and surface size follow the window.
//! - **`RedrawRequested`** runs the frame updater (animated variant only), draws the GUI and
//!   renders the frame. While the [`FrameLoop`] is running it asks for the next redraw, which
//!   keeps the animation going; stopping the loop cancels that request.
//!
//! ## Platform-Specific Notes
//!
//! - **Desktop**:
//!   - The renderer is created synchronously with `pollster`.
//!   - Initialization errors stop the event loop and are returned from [`crate::run`].
//!
//! - **WebAssembly**:
//!   - The window attaches to the `<canvas id="WebGL-output">` element of the page.
//!   - The renderer is created asynchronously and delivered as an [`AppEvent::RendererReady`]
//!     user event, which wakes the event loop even when no window event is pending.
//!   - A redraw that arrives before the renderer is dropped, and is requested again once the
//!     renderer is installed (see [`RendererSlot`]).
//!   - Initialization errors are logged to the browser console.
//!
//! ## Keyboard
//!
//! - `Space` pauses or resumes the animation loop (animated variant).
//! - `Escape` exits.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

use std::sync::Arc;

use web_time::Instant;

use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::{ElementState, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Theme, Window},
};

use crate::error::Error;
use crate::frame_loop::FrameLoop;
use crate::gui;
use crate::renderer::Renderer;
use crate::state::SceneState;
use crate::stats::FrameStats;
use crate::variant::Variant;

/// Id of the canvas element the scene is rendered into on the web.
#[cfg(target_arch = "wasm32")]
pub const CANVAS_ID: &str = "WebGL-output";

/// Events the application sends to its own event loop.
pub enum AppEvent {
    /// The asynchronous renderer setup has finished, successfully or not.
    RendererReady(Box<crate::Result<Renderer>>),
}

/// Holds the renderer while it may still be under construction.
///
/// Redraws requested before the renderer exists cannot be served. The slot remembers that one was
/// missed so the first frame is requested again as soon as the renderer is installed; otherwise
/// the static variant, which draws exactly once, would stay blank.
#[derive(Debug)]
pub enum RendererSlot<R> {
    Pending { missed_frame: bool },
    Ready(R),
}

impl<R> Default for RendererSlot<R> {
    fn default() -> Self {
        RendererSlot::Pending {
            missed_frame: false,
        }
    }
}

impl<R> RendererSlot<R> {
    pub fn get_mut(&mut self) -> Option<&mut R> {
        match self {
            RendererSlot::Ready(renderer) => Some(renderer),
            RendererSlot::Pending { .. } => None,
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, RendererSlot::Ready(_))
    }

    /// Records a redraw that arrived before the renderer.
    pub fn miss_frame(&mut self) {
        if let RendererSlot::Pending { missed_frame } = self {
            *missed_frame = true;
        }
    }

    /// Installs the renderer. Returns `true` when a redraw was missed and must be requested again.
    pub fn install(&mut self, renderer: R) -> bool {
        let missed = matches!(self, RendererSlot::Pending { missed_frame: true });
        *self = RendererSlot::Ready(renderer);
        missed
    }
}

/// Main application structure.
///
/// # Fields
///
/// - `variant`: static or animated scene, fixed for the lifetime of the app.
/// - `window`: the window (or canvas) the scene is presented in.
/// - `renderer`: the GPU renderer; pending until initialization finishes.
/// - `gui_state`: the `egui`/`winit` bridge used for the stats overlay and control panel.
/// - `state`: the scene, camera, controls and bounce phase.
/// - `frame_loop`: owner of the animation loop's scheduling.
/// - `stats`: frame counters shown in the overlay.
/// - `proxy`: _(WebAssembly only)_ sends the async renderer back to the event loop.
/// - `last_size`: last known surface size in physical pixels.
/// - `error`: the fatal error that stopped the app, if any.
#[derive(Default)]
pub struct App {
    variant: Variant,

    /// The main application window.
    ///
    /// On desktop the window is created by `winit`; on WebAssembly it wraps the existing HTML
    /// canvas element.
    window: Option<Arc<Window>>,

    /// The renderer, available once GPU initialization has completed.
    ///
    /// - **Desktop:** created synchronously in `resumed`.
    /// - **WebAssembly:** installed later from [`AppEvent::RendererReady`].
    renderer: RendererSlot<Renderer>,

    /// Integration of `egui` with the `winit` window: input translation, scale factor and
    /// platform output (cursor, clipboard).
    gui_state: Option<egui_winit::State>,

    /// Explicit application state created by the bootstrapper.
    state: Option<SceneState>,

    frame_loop: FrameLoop,

    stats: FrameStats,

    /// Delivers the asynchronously created renderer on WebAssembly.
    #[cfg(target_arch = "wasm32")]
    proxy: Option<winit::event_loop::EventLoopProxy<AppEvent>>,

    /// Dimensions of the surface during the last update, in physical pixels.
    last_size: (u32, u32),

    /// First fatal error encountered; the event loop exits as soon as it is set.
    error: Option<Error>,
}

impl App {
    pub fn new(variant: Variant, event_loop: &EventLoop<AppEvent>) -> Self {
        #[cfg(not(target_arch = "wasm32"))]
        let _ = event_loop;

        Self {
            variant,
            #[cfg(target_arch = "wasm32")]
            proxy: Some(event_loop.create_proxy()),
            ..Default::default()
        }
    }

    /// The fatal error that stopped the app, if any.
    pub fn take_error(&mut self) -> Option<Error> {
        self.error.take()
    }

    /// Records a fatal error and leaves the event loop.
    fn fail(&mut self, event_loop: &ActiveEventLoop, error: Error) {
        log::error!("Fatal: {error}");
        if self.error.is_none() {
            self.error = Some(error);
        }
        event_loop.exit();
    }

    /// Runs the scene bootstrapper for a freshly created window.
    fn bootstrap(&mut self, event_loop: &ActiveEventLoop, window: Arc<Window>) {
        let (width, height) = self.last_size;
        let state = SceneState::bootstrap(self.variant, width, height);

        let gui_context = egui::Context::default();

        #[cfg(target_arch = "wasm32")]
        {
            gui_context.set_pixels_per_point(window.scale_factor() as f32);
        }

        let viewport_id = gui_context.viewport_id();
        let gui_state = egui_winit::State::new(
            gui_context,
            viewport_id,
            &window,
            Some(window.scale_factor() as _),
            Some(Theme::Dark),
            None,
        );

        #[cfg(not(target_arch = "wasm32"))]
        {
            let scene = &state.scene;
            match pollster::block_on(Renderer::new(window.clone(), width, height, scene)) {
                Ok(renderer) => {
                    self.renderer.install(renderer);
                }
                Err(error) => {
                    self.fail(event_loop, error);
                    return;
                }
            }
        }

        #[cfg(target_arch = "wasm32")]
        {
            let _ = event_loop;
            let proxy = self.proxy.clone();
            let scene = state.scene.clone();
            let surface_window = window.clone();
            wasm_bindgen_futures::spawn_local(async move {
                let renderer = Renderer::new(surface_window, width, height, &scene).await;
                let sent = proxy.is_some_and(|proxy| {
                    proxy
                        .send_event(AppEvent::RendererReady(Box::new(renderer)))
                        .is_ok()
                });
                if !sent {
                    log::error!("Event loop closed before the renderer was ready");
                }
            });
        }

        if self.variant.is_animated() {
            self.frame_loop.start();
        }

        self.gui_state = Some(gui_state);
        self.state = Some(state);
        window.request_redraw();
    }
}

impl ApplicationHandler<AppEvent> for App {
    /// Creates the window and bootstraps the scene the first time the app is resumed.
    ///
    /// ### Desktop:
    /// - Creates a window titled after the variant, sized by the platform.
    /// - Initializes the renderer synchronously.
    ///
    /// ### WebAssembly:
    /// - Looks up the `WebGL-output` canvas; a missing or non-canvas element is a fatal error.
    /// - Initializes the renderer asynchronously.
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let mut attributes = Window::default_attributes();

        #[cfg(not(target_arch = "wasm32"))]
        {
            attributes = attributes.with_title(self.variant.title());
        }

        #[cfg(target_arch = "wasm32")]
        {
            use winit::platform::web::WindowAttributesExtWebSys;

            let Some(canvas) = wgpu::web_sys::window()
                .and_then(|window| window.document())
                .and_then(|document| document.get_element_by_id(CANVAS_ID))
                .and_then(|element| element.dyn_into::<wgpu::web_sys::HtmlCanvasElement>().ok())
            else {
                self.fail(event_loop, Error::MountPoint(CANVAS_ID));
                return;
            };
            self.last_size = (canvas.width(), canvas.height());
            log::info!("Canvas dimensions: ({} x {})", canvas.width(), canvas.height());
            attributes = attributes.with_canvas(Some(canvas));
        }

        let window = match event_loop.create_window(attributes) {
            Ok(window) => Arc::new(window),
            Err(error) => {
                self.fail(event_loop, error.into());
                return;
            }
        };

        #[cfg(not(target_arch = "wasm32"))]
        {
            let inner_size = window.inner_size();
            self.last_size = (inner_size.width, inner_size.height);
        }

        self.window = Some(window.clone());
        self.bootstrap(event_loop, window);
    }

    /// Installs the renderer built asynchronously on WebAssembly and draws the first frame.
    fn user_event(&mut self, event_loop: &ActiveEventLoop, event: AppEvent) {
        match event {
            AppEvent::RendererReady(result) => match *result {
                Ok(renderer) => {
                    log::info!("Renderer ready");
                    if self.renderer.install(renderer) {
                        if let Some(window) = self.window.as_ref() {
                            window.request_redraw();
                        }
                    }
                }
                Err(error) => self.fail(event_loop, error),
            },
        }
    }

    /// Handles window events.
    ///
    /// Events are first offered to the GUI; if it consumes one (for example a slider drag) the
    /// scene does not see it. Otherwise:
    ///
    /// - `KeyboardInput`: `Escape` exits, `Space` toggles the animation loop.
    /// - `Resized`: runs the resize handler.
    /// - `CloseRequested`: exits.
    /// - `RedrawRequested`: runs the frame updater and renders.
    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        if matches!(event, WindowEvent::RedrawRequested) && !self.renderer.is_ready() {
            log::debug!("Renderer not ready yet, deferring the first frame");
            self.renderer.miss_frame();
            return;
        }

        let (Some(gui_state), Some(renderer), Some(window), Some(state)) = (
            self.gui_state.as_mut(),
            self.renderer.get_mut(),
            self.window.as_ref(),
            self.state.as_mut(),
        ) else {
            return;
        };

        let response = gui_state.on_window_event(window, &event);
        if response.repaint {
            window.request_redraw();
        }
        if response.consumed {
            return;
        }

        match event {
            WindowEvent::KeyboardInput {
                event:
                    winit::event::KeyEvent {
                        physical_key: PhysicalKey::Code(key_code),
                        state: ElementState::Pressed,
                        repeat: false,
                        ..
                    },
                ..
            } => match key_code {
                KeyCode::Escape => event_loop.exit(),
                KeyCode::Space if self.variant.is_animated() => {
                    self.frame_loop.toggle();
                    window.request_redraw();
                }
                _ => (),
            },
            WindowEvent::Resized(PhysicalSize { width, height }) => {
                if state.resize(width, height) {
                    log::info!("Resizing renderer surface to: ({width}, {height})");
                    renderer.resize(width, height);
                    self.last_size = (width, height);
                    log::debug!("Surface aspect ratio is now {}", renderer.aspect_ratio());
                    window.request_redraw();
                }
            }
            WindowEvent::CloseRequested => {
                log::info!("Close requested. Exiting...");
                event_loop.exit();
            }
            WindowEvent::RedrawRequested => {
                if self.frame_loop.tick() {
                    self.stats.update(Instant::now());
                    state.advance_frame();
                }

                let gui_input = gui_state.take_egui_input(window);
                gui_state.egui_ctx().begin_pass(gui_input);

                if self.variant.is_animated() {
                    gui::show_stats(gui_state.egui_ctx(), &mut self.stats);
                    gui::show_controls(
                        gui_state.egui_ctx(),
                        &mut state.controls,
                        self.frame_loop.is_running(),
                    );
                }

                let egui_winit::egui::FullOutput {
                    textures_delta,
                    shapes,
                    pixels_per_point,
                    platform_output,
                    ..
                } = gui_state.egui_ctx().end_pass();

                gui_state.handle_platform_output(window, platform_output);

                let paint_jobs = gui_state.egui_ctx().tessellate(shapes, pixels_per_point);

                let screen_descriptor = {
                    let (width, height) = self.last_size;
                    egui_wgpu::ScreenDescriptor {
                        size_in_pixels: [width, height],
                        pixels_per_point: window.scale_factor() as f32,
                    }
                };

                renderer.render_frame(
                    &state.frame_data(),
                    screen_descriptor,
                    paint_jobs,
                    textures_delta,
                );

                if self.frame_loop.is_running() {
                    window.request_redraw();
                }
            }
            _ => (),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redraw_missed_while_pending_is_requested_again() {
        let mut slot = RendererSlot::<&str>::default();
        assert!(slot.get_mut().is_none());
        slot.miss_frame();
        assert!(slot.install("renderer"));
        assert!(slot.is_ready());
        assert_eq!(slot.get_mut(), Some(&mut "renderer"));
    }

    #[test]
    fn install_without_missed_frame_needs_no_extra_redraw() {
        let mut slot = RendererSlot::<u32>::default();
        assert!(!slot.is_ready());
        assert!(!slot.install(7));
    }

    #[test]
    fn ready_slot_ignores_missed_frames() {
        let mut slot = RendererSlot::Ready(1_u32);
        slot.miss_frame();
        assert!(!slot.install(2));
        assert_eq!(slot.get_mut(), Some(&mut 2));
    }
}
