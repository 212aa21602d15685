use super::helpers;
use super::targets::SLOT_FORMAT;
use crate::camera::Camera;
use crate::constants::{BEAT_FLASH_DECAY_PER_SEC, WAVEFORM_LEN};
use crate::core::{Band, GlobalControls, SceneRegistry, Signals};
use fnv::FnvHashMap;

const SHADER_WAVE_POINTS: usize = 64;

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub(crate) struct SceneUniforms {
    inv_view_proj: [[f32; 4]; 4],
    bands: [f32; 4],
    treble: f32,
    amplitude: f32,
    time: f32,
    beat_progress: f32,
    flash: f32,
    intensity: f32,
    hue: f32,
    aspect: f32,
    waveform: [[f32; 4]; SHADER_WAVE_POINTS / 4],
}

/// One pipeline per registered scene, all sharing a bind group layout.
pub(crate) struct SceneLibrary {
    bgl: wgpu::BindGroupLayout,
    pipelines: FnvHashMap<&'static str, wgpu::RenderPipeline>,
}

impl SceneLibrary {
    pub(crate) fn new(device: &wgpu::Device, registry: &SceneRegistry) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("scenes_shader"),
            source: wgpu::ShaderSource::Wgsl(crate::core::SCENES_WGSL.into()),
        });
        let bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("scene_bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });
        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("scene_pl"),
            bind_group_layouts: &[&bgl],
            push_constant_ranges: &[],
        });
        let pipelines = registry
            .iter()
            .map(|d| {
                let p = helpers::make_fullscreen_pipeline(
                    device,
                    d.id,
                    &layout,
                    &shader,
                    d.entry_point,
                    SLOT_FORMAT,
                    None,
                );
                (d.id, p)
            })
            .collect();
        Self { bgl, pipelines }
    }

    fn pipeline(&self, scene_id: &str) -> Option<&wgpu::RenderPipeline> {
        self.pipelines.get(scene_id)
    }
}

/// Persistent per-slot scene container.
///
/// Holds the slot's content identity plus the state that scene accumulates
/// (local time, beat flash). Reassigning the same scene keeps that state.
pub(crate) struct SceneGraph {
    label: &'static str,
    scene_id: Option<String>,
    local_time: f32,
    flash: f32,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

impl SceneGraph {
    pub(crate) fn new(device: &wgpu::Device, library: &SceneLibrary, label: &'static str) -> Self {
        let uniform_buffer = helpers::create_uniform_buffer(
            device,
            label,
            std::mem::size_of::<SceneUniforms>(),
        );
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(label),
            layout: &library.bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });
        Self {
            label,
            scene_id: None,
            local_time: 0.0,
            flash: 0.0,
            uniform_buffer,
            bind_group,
        }
    }

    pub(crate) fn assign(&mut self, scene_id: Option<&str>) {
        if self.scene_id.as_deref() == scene_id {
            return;
        }
        self.scene_id = scene_id.map(str::to_string);
        self.local_time = 0.0;
        self.flash = 0.0;
    }

    /// Advance this slot's state, upload uniforms and draw into `target`.
    pub(crate) fn render(
        &mut self,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        library: &SceneLibrary,
        target: &wgpu::TextureView,
        frame: &SceneFrame<'_>,
    ) {
        let audio = &frame.signals.audio;
        self.local_time += frame.dt * frame.controls.master_speed;
        self.flash *= (-frame.dt * BEAT_FLASH_DECAY_PER_SEC).exp();
        if audio.beat {
            self.flash = 1.0;
        }

        let mut waveform = [[0.0_f32; 4]; SHADER_WAVE_POINTS / 4];
        let stride = WAVEFORM_LEN / SHADER_WAVE_POINTS;
        for (i, w) in audio.waveform.iter().step_by(stride).take(SHADER_WAVE_POINTS).enumerate() {
            waveform[i / 4][i % 4] = *w;
        }
        let u = SceneUniforms {
            inv_view_proj: frame.camera.inverse_view_projection().to_cols_array_2d(),
            bands: [
                audio.band(Band::Bass),
                audio.band(Band::LowMid),
                audio.band(Band::Mid),
                audio.band(Band::HighMid),
            ],
            treble: audio.band(Band::Treble),
            amplitude: audio.amplitude,
            time: self.local_time,
            beat_progress: frame.signals.clock.beat_progress,
            flash: self.flash,
            intensity: frame.controls.master_intensity,
            hue: frame.controls.master_hue,
            aspect: frame.camera.aspect,
            waveform,
        };
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(&u));

        let pipeline = self.scene_id.as_deref().and_then(|id| library.pipeline(id));
        helpers::blit(encoder, self.label, target, wgpu::Color::BLACK, pipeline, &self.bind_group);
    }
}

/// Read-only inputs every slot sees in a frame.
pub(crate) struct SceneFrame<'a> {
    pub(crate) signals: &'a Signals,
    pub(crate) controls: &'a GlobalControls,
    pub(crate) camera: &'a Camera,
    pub(crate) dt: f32,
}
