use super::helpers;
use super::targets::SlotTargets;
use crate::core::{Slot, TransitionType};

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub(crate) struct TransitionUniforms {
    progress: f32,
    kind: u32,
    time: f32,
    _pad: f32,
}

/// Full-screen transition pass from the slot targets to the surface.
///
/// Bind groups are prebuilt for every (from, to) slot pair, including the
/// idle pairs where both sides sample the active slot.
pub(crate) struct CompositeResources {
    pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    bind_groups: [[wgpu::BindGroup; 2]; 2],
}

impl CompositeResources {
    pub(crate) fn new(
        device: &wgpu::Device,
        targets: &SlotTargets,
        sampler: &wgpu::Sampler,
        surface_format: wgpu::TextureFormat,
    ) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("transition_shader"),
            source: wgpu::ShaderSource::Wgsl(crate::core::TRANSITION_WGSL.into()),
        });
        let texture_entry = |binding: u32| wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Texture {
                multisampled: false,
                view_dimension: wgpu::TextureViewDimension::D2,
                sample_type: wgpu::TextureSampleType::Float { filterable: true },
            },
            count: None,
        };
        let bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("transition_bgl"),
            entries: &[
                texture_entry(0),
                texture_entry(1),
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 3,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
            ],
        });
        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("transition_pl"),
            bind_group_layouts: &[&bgl],
            push_constant_ranges: &[],
        });
        let pipeline = helpers::make_fullscreen_pipeline(
            device,
            "transition_pipeline",
            &layout,
            &shader,
            "fs_transition",
            surface_format,
            Some(wgpu::BlendState::REPLACE),
        );
        let uniform_buffer = helpers::create_uniform_buffer(
            device,
            "transition_uniforms",
            std::mem::size_of::<TransitionUniforms>(),
        );
        let pair = |from: Slot, to: Slot| {
            device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("transition_bg"),
                layout: &bgl,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: wgpu::BindingResource::TextureView(targets.view(from)),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: wgpu::BindingResource::TextureView(targets.view(to)),
                    },
                    wgpu::BindGroupEntry {
                        binding: 2,
                        resource: wgpu::BindingResource::Sampler(sampler),
                    },
                    wgpu::BindGroupEntry {
                        binding: 3,
                        resource: uniform_buffer.as_entire_binding(),
                    },
                ],
            })
        };
        let bind_groups = [
            [pair(Slot::A, Slot::A), pair(Slot::A, Slot::B)],
            [pair(Slot::B, Slot::A), pair(Slot::B, Slot::B)],
        ];
        Self {
            pipeline,
            uniform_buffer,
            bind_groups,
        }
    }

    pub(crate) fn draw(
        &self,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        target: &wgpu::TextureView,
        from: Slot,
        to: Slot,
        progress: f32,
        kind: TransitionType,
        time: f32,
    ) {
        let u = TransitionUniforms {
            progress: progress.clamp(0.0, 1.0),
            kind: kind.shader_index(),
            time,
            _pad: 0.0,
        };
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(&u));
        helpers::blit(
            encoder,
            "composite",
            target,
            wgpu::Color::BLACK,
            Some(&self.pipeline),
            &self.bind_groups[from.index()][to.index()],
        );
    }
}
