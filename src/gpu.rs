//! # GPU Module (`gpu.rs`)
//!
//! Owns the core `wgpu` objects: the surface the scene is presented to, the logical device, its
//! command queue and the surface configuration. Everything else in the renderer borrows these.
//!
//! ## Initialization
//!
//! [`Gpu::new_async`] walks the usual chain: instance → surface → adapter → device/queue → surface
//! configuration. Each step that can fail maps to a variant of [`crate::Error`], so a machine (or
//! browser) without a usable graphics context fails loudly at start-up instead of rendering
//! nothing.
//!
//! ## Platform Notes
//!
//! - **Desktop**: default limits, scaled to the adapter's supported resolution.
//! - **WebGPU**: same as desktop.
//! - **WebGL**: WebGL2 downlevel limits, which is why the shadow map stays small.
//!
//! The surface format is chosen to be non-sRGB because `egui` expects to write gamma-space colours
//! directly.

use wgpu::InstanceDescriptor;

use crate::error::{Error, Result};

/// Core GPU handles shared by the renderer.
pub struct Gpu {
    /// The presentation surface backed by the window or canvas.
    pub surface: wgpu::Surface<'static>,

    /// Logical device used to create every GPU resource.
    pub device: wgpu::Device,

    /// Queue used to submit command buffers and buffer writes.
    pub queue: wgpu::Queue,

    /// Current surface configuration; width and height follow the window.
    pub surface_config: wgpu::SurfaceConfiguration,

    /// Texture format of the surface, also used as the colour target of every pipeline.
    pub surface_format: wgpu::TextureFormat,
}

impl Gpu {
    /// Width divided by height of the current surface.
    pub fn aspect_ratio(&self) -> f32 {
        self.surface_config.width as f32 / self.surface_config.height.max(1) as f32
    }

    /// Reconfigures the surface for a new size. Zero-sized requests are ignored, since a surface
    /// cannot be configured with an empty extent.
    pub fn resize(&mut self, width: u32, height: u32) -> bool {
        if width == 0 || height == 0 {
            return false;
        }
        self.surface_config.width = width;
        self.surface_config.height = height;
        self.reconfigure();
        true
    }

    /// Re-applies the current configuration, e.g. after the surface was lost.
    pub fn reconfigure(&self) {
        self.surface.configure(&self.device, &self.surface_config);
    }

    /// Creates a depth texture view of the given size, usable both as an attachment and for
    /// sampling.
    pub fn create_depth_texture(&self, label: &str, width: u32, height: u32) -> wgpu::TextureView {
        let texture = self.device.create_texture(
            &(wgpu::TextureDescriptor {
                label: Some(label),
                size: wgpu::Extent3d {
                    width,
                    height,
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: crate::renderer::Renderer::DEPTH_FORMAT,
                usage: wgpu::TextureUsages::RENDER_ATTACHMENT
                    | wgpu::TextureUsages::TEXTURE_BINDING,
                view_formats: &[],
            }),
        );

        texture.create_view(&wgpu::TextureViewDescriptor {
            label: Some(label),
            format: Some(crate::renderer::Renderer::DEPTH_FORMAT),
            dimension: Some(wgpu::TextureViewDimension::D2),
            aspect: wgpu::TextureAspect::All,
            base_mip_level: 0,
            base_array_layer: 0,
            array_layer_count: None,
            mip_level_count: None,
            usage: None,
        })
    }

    /// Picks the surface configuration from what the adapter supports.
    ///
    /// A non-sRGB format is preferred because `egui` writes gamma-space colours directly.
    ///
    /// # Errors
    ///
    /// [`Error::UnsupportedSurface`] if the surface lists no formats, present modes or alpha modes.
    pub fn surface_config(
        capabilities: &wgpu::SurfaceCapabilities,
        width: u32,
        height: u32,
    ) -> Result<wgpu::SurfaceConfiguration> {
        let format = capabilities
            .formats
            .iter()
            .copied()
            .find(|format| !format.is_srgb())
            .or_else(|| capabilities.formats.first().copied())
            .ok_or(Error::UnsupportedSurface("texture formats"))?;
        let present_mode = capabilities
            .present_modes
            .first()
            .copied()
            .ok_or(Error::UnsupportedSurface("present modes"))?;
        let alpha_mode = capabilities
            .alpha_modes
            .first()
            .copied()
            .ok_or(Error::UnsupportedSurface("alpha modes"))?;

        Ok(wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            present_mode,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        })
    }

    /// Initializes the GPU for the given window or canvas.
    ///
    /// # Errors
    ///
    /// - [`Error::Surface`] if the window cannot provide a graphics context.
    /// - [`Error::NoAdapter`] if no adapter can present to the surface.
    /// - [`Error::Device`] if the adapter refuses to open a device.
    /// - [`Error::UnsupportedSurface`] if the surface offers no usable configuration.
    pub async fn new_async(
        window: impl Into<wgpu::SurfaceTarget<'static>>,
        width: u32,
        height: u32,
    ) -> Result<Self> {
        let instance = wgpu::Instance::new(&InstanceDescriptor::default());
        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or(Error::NoAdapter)?;

        log::info!("WGPU Adapter: {:?}", adapter.get_info());
        log::debug!("WGPU Adapter Features: {:#?}", adapter.features());

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("WGPU Device"),
                    memory_hints: wgpu::MemoryHints::default(),
                    required_features: wgpu::Features::default(),
                    #[cfg(not(target_arch = "wasm32"))]
                    required_limits: wgpu::Limits::default().using_resolution(adapter.limits()),
                    #[cfg(all(target_arch = "wasm32", not(feature = "webgl")))]
                    required_limits: wgpu::Limits::default().using_resolution(adapter.limits()),
                    #[cfg(all(target_arch = "wasm32", feature = "webgl"))]
                    required_limits: wgpu::Limits::downlevel_webgl2_defaults()
                        .using_resolution(adapter.limits()),
                },
                None,
            )
            .await?;

        let surface_capabilities = surface.get_capabilities(&adapter);
        let surface_config = Self::surface_config(&surface_capabilities, width, height)?;
        let surface_format = surface_config.format;

        surface.configure(&device, &surface_config);

        Ok(Self {
            surface,
            device,
            queue,
            surface_config,
            surface_format,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn capabilities(formats: Vec<wgpu::TextureFormat>) -> wgpu::SurfaceCapabilities {
        wgpu::SurfaceCapabilities {
            formats,
            present_modes: vec![wgpu::PresentMode::Fifo],
            alpha_modes: vec![wgpu::CompositeAlphaMode::Opaque],
            usages: wgpu::TextureUsages::RENDER_ATTACHMENT,
        }
    }

    #[test]
    fn prefers_non_srgb_format() {
        let caps = capabilities(vec![
            wgpu::TextureFormat::Bgra8UnormSrgb,
            wgpu::TextureFormat::Bgra8Unorm,
        ]);
        let config = Gpu::surface_config(&caps, 800, 600).unwrap();
        assert_eq!(config.format, wgpu::TextureFormat::Bgra8Unorm);
        assert_eq!(config.present_mode, wgpu::PresentMode::Fifo);
        assert_eq!((config.width, config.height), (800, 600));
    }

    #[test]
    fn falls_back_to_first_format() {
        let caps = capabilities(vec![wgpu::TextureFormat::Rgba8UnormSrgb]);
        let config = Gpu::surface_config(&caps, 0, 0).unwrap();
        assert_eq!(config.format, wgpu::TextureFormat::Rgba8UnormSrgb);
        assert_eq!((config.width, config.height), (1, 1));
    }

    #[test]
    fn empty_capabilities_are_an_error() {
        let no_formats = capabilities(Vec::new());
        assert!(matches!(
            Gpu::surface_config(&no_formats, 800, 600),
            Err(Error::UnsupportedSurface("texture formats"))
        ));

        let mut no_present_modes = capabilities(vec![wgpu::TextureFormat::Bgra8Unorm]);
        no_present_modes.present_modes.clear();
        assert!(matches!(
            Gpu::surface_config(&no_present_modes, 800, 600),
            Err(Error::UnsupportedSurface("present modes"))
        ));

        assert!(matches!(
            Gpu::surface_config(&wgpu::SurfaceCapabilities::default(), 800, 600),
            Err(Error::UnsupportedSurface(_))
        ));
    }
}
