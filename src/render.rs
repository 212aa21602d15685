use crate::core::{FramePlan, SceneRegistry};
use web_sys as web;

mod composite;
mod helpers;
mod scenes;
mod targets;

use composite::CompositeResources;
pub(crate) use scenes::{SceneFrame, SceneGraph};
use scenes::SceneLibrary;
use targets::SlotTargets;

pub struct GpuState<'a> {
    surface: wgpu::Surface<'a>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    // Two fixed-size offscreen slots plus the pass that blends them
    targets: SlotTargets,
    library: SceneLibrary,
    composite: CompositeResources,
    width: u32,
    height: u32,
}

impl<'a> GpuState<'a> {
    pub async fn new(
        canvas: &'a web::HtmlCanvasElement,
        registry: &SceneRegistry,
    ) -> anyhow::Result<Self> {
        let width = canvas.width().max(1);
        let height = canvas.height().max(1);

        let instance = wgpu::Instance::default();
        let surface = instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow::anyhow!("No WebGPU adapter"))?;
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::Performance,
                    label: None,
                },
                None,
            )
            .await
            .map_err(|e| anyhow::anyhow!(format!("request_device error: {:?}", e)))?;
        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| {
                matches!(
                    f,
                    wgpu::TextureFormat::Bgra8UnormSrgb | wgpu::TextureFormat::Rgba8UnormSrgb
                )
            })
            .or_else(|| caps.formats.first().copied())
            .ok_or_else(|| anyhow::anyhow!("surface reports no formats"))?;
        let alpha_mode = caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let targets = SlotTargets::new(&device);
        let sampler = helpers::create_linear_sampler(&device);
        let library = SceneLibrary::new(&device, registry);
        let composite = CompositeResources::new(&device, &targets, &sampler, format);
        log::info!(
            "[gpu] surface {}x{} format={:?}, {} scene pipelines",
            width,
            height,
            format,
            registry.len()
        );

        Ok(Self {
            surface,
            device,
            queue,
            config,
            targets,
            library,
            composite,
            width,
            height,
        })
    }

    pub(crate) fn create_slot_graph(&self, label: &'static str) -> SceneGraph {
        SceneGraph::new(&self.device, &self.library, label)
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn resize_if_needed(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        if width != self.width || height != self.height {
            self.width = width;
            self.height = height;
            self.config.width = width;
            self.config.height = height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    /// Render the slots named by `plan` and composite them to the canvas.
    ///
    /// The `from` slot always renders; the `to` slot only while a transition
    /// is in flight. Idle frames composite the active slot against itself.
    pub(crate) fn render_frame(
        &mut self,
        graphs: &mut [SceneGraph; 2],
        plan: &FramePlan,
        frame: &SceneFrame<'_>,
        time: f32,
    ) -> Result<(), wgpu::SurfaceError> {
        let output = match self.surface.get_current_texture() {
            Ok(t) => t,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.surface.configure(&self.device, &self.config);
                return Ok(());
            }
            Err(e) => return Err(e),
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("encoder"),
            });

        graphs[plan.from.index()].render(
            &self.queue,
            &mut encoder,
            &self.library,
            self.targets.view(plan.from),
            frame,
        );
        if plan.render_inactive {
            graphs[plan.to.index()].render(
                &self.queue,
                &mut encoder,
                &self.library,
                self.targets.view(plan.to),
                frame,
            );
        }
        self.composite.draw(
            &self.queue,
            &mut encoder,
            &view,
            plan.from,
            plan.to,
            plan.progress,
            plan.kind,
            time,
        );

        self.queue.submit(Some(encoder.finish()));
        output.present();
        Ok(())
    }
}
