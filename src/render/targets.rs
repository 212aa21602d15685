use super::helpers;
use crate::constants::{SLOT_TARGET_HEIGHT, SLOT_TARGET_WIDTH};
use crate::core::Slot;

pub(crate) const SLOT_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

/// The two persistent offscreen targets, one per compositor slot.
///
/// Fixed resolution and single-sampled; never recreated on canvas resize, the
/// composite pass scales them to the surface.
pub(crate) struct SlotTargets {
    _textures: [wgpu::Texture; 2],
    views: [wgpu::TextureView; 2],
}

impl SlotTargets {
    pub(crate) fn new(device: &wgpu::Device) -> Self {
        let usage = wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING;
        let (tex_a, view_a) = helpers::create_color_texture(
            device,
            "slot_a",
            SLOT_TARGET_WIDTH,
            SLOT_TARGET_HEIGHT,
            SLOT_FORMAT,
            usage,
        );
        let (tex_b, view_b) = helpers::create_color_texture(
            device,
            "slot_b",
            SLOT_TARGET_WIDTH,
            SLOT_TARGET_HEIGHT,
            SLOT_FORMAT,
            usage,
        );
        Self {
            _textures: [tex_a, tex_b],
            views: [view_a, view_b],
        }
    }

    #[inline]
    pub(crate) fn view(&self, slot: Slot) -> &wgpu::TextureView {
        &self.views[slot.index()]
    }
}
