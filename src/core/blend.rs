// Host-side mirror of `shaders/transition.wgsl`.
//
// Every function here has a WGSL twin with the same name and arithmetic, so
// the GPU path can be checked against it without a device.

use super::transition::TransitionType;
use crate::constants::*;
use glam::{Vec2, Vec4};
use std::f32::consts::PI;

/// Anything that can be sampled at a UV coordinate (a render target on the GPU).
pub trait TextureSource {
    fn sample(&self, uv: Vec2) -> Vec4;
}

impl<F> TextureSource for F
where
    F: Fn(Vec2) -> Vec4,
{
    fn sample(&self, uv: Vec2) -> Vec4 {
        self(uv)
    }
}

/// GLSL/WGSL `mix`, written so `t == 1` yields `b` exactly.
#[inline]
pub fn mix(a: Vec4, b: Vec4, t: f32) -> Vec4 {
    a * (1.0 - t) + b * t
}

#[inline]
pub fn smoothstep(e0: f32, e1: f32, x: f32) -> f32 {
    let t = ((x - e0) / (e1 - e0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

#[inline]
pub fn hash(p: Vec2) -> f32 {
    let v = (p.dot(Vec2::new(127.1, 311.7))).sin() * 43758.547;
    v - v.floor()
}

/// `sin(progress * PI)`, pinned to exactly 0 at and beyond both endpoints.
#[inline]
pub fn sin_pi(progress: f32) -> f32 {
    if progress <= 0.0 || progress >= 1.0 {
        0.0
    } else {
        (progress * PI).sin()
    }
}

pub fn crossfade(from: &impl TextureSource, to: &impl TextureSource, uv: Vec2, progress: f32) -> Vec4 {
    mix(from.sample(uv), to.sample(uv), progress)
}

/// Noise threshold sweeps from below 0 to above 1 so both endpoints are pure.
pub fn dissolve(
    from: &impl TextureSource,
    to: &impl TextureSource,
    uv: Vec2,
    progress: f32,
    time: f32,
) -> Vec4 {
    let noise = hash(uv * 100.0 + Vec2::splat(time));
    let threshold = -DISSOLVE_EDGE + (1.0 + 2.0 * DISSOLVE_EDGE) * progress;
    let edge = smoothstep(threshold - DISSOLVE_EDGE, threshold + DISSOLVE_EDGE, noise);
    mix(to.sample(uv), from.sample(uv), edge)
}

pub fn glitch_cut(
    from: &impl TextureSource,
    to: &impl TextureSource,
    uv: Vec2,
    progress: f32,
    time: f32,
) -> Vec4 {
    let envelope = sin_pi(progress);
    let row = (uv.y * GLITCH_ROWS).floor();
    let jitter = hash(Vec2::new(row, time)) * 2.0 - 1.0;
    let offset = Vec2::new(
        jitter * GLITCH_MAX_OFFSET * (1.0 - (progress - 0.5).abs() * 2.0).max(0.0),
        0.0,
    );
    let split = Vec2::new(GLITCH_RGB_SPLIT * envelope, 0.0);

    let mut g_from = from.sample(uv + offset);
    g_from.x = from.sample(uv + offset + split).x;
    g_from.z = from.sample(uv + offset - split).z;
    let mut g_to = to.sample(uv - offset);
    g_to.x = to.sample(uv - offset + split).x;
    g_to.z = to.sample(uv - offset - split).z;

    let mut out = mix(g_from, g_to, smoothstep(0.3, 0.7, progress));
    let scan = (uv.y * GLITCH_SCANLINE_DENSITY + time * 10.0).fract();
    let scanline = if scan >= 0.5 { 1.0 } else { 0.0 };
    let attenuation = 1.0 - GLITCH_SCANLINE_DEPTH * envelope * (1.0 - scanline);
    out.x *= attenuation;
    out.y *= attenuation;
    out.z *= attenuation;
    out
}

pub fn zoom_blur(from: &impl TextureSource, to: &impl TextureSource, uv: Vec2, progress: f32) -> Vec4 {
    let envelope = sin_pi(progress);
    // averaging taps rounds, so the endpoints take the unblurred path
    if envelope == 0.0 {
        return mix(from.sample(uv), to.sample(uv), progress);
    }
    let dir = uv - Vec2::splat(0.5);
    let strength = envelope * ZOOM_BLUR_STRENGTH;
    let weight = 1.0 / ZOOM_BLUR_TAPS as f32;
    let mut acc = Vec4::ZERO;
    for i in 0..ZOOM_BLUR_TAPS {
        let t = i as f32 * weight;
        let p = uv - dir * strength * t;
        acc += mix(from.sample(p), to.sample(p), progress) * weight;
    }
    acc
}

pub fn instant(from: &impl TextureSource, to: &impl TextureSource, uv: Vec2, progress: f32) -> Vec4 {
    if progress > 0.5 {
        to.sample(uv)
    } else {
        from.sample(uv)
    }
}

/// Dispatch on the transition type, as the compositor shader does on `kind`.
pub fn composite(
    kind: TransitionType,
    from: &impl TextureSource,
    to: &impl TextureSource,
    uv: Vec2,
    progress: f32,
    time: f32,
) -> Vec4 {
    let progress = progress.clamp(0.0, 1.0);
    match kind {
        TransitionType::Crossfade => crossfade(from, to, uv, progress),
        TransitionType::Dissolve => dissolve(from, to, uv, progress, time),
        TransitionType::GlitchCut => glitch_cut(from, to, uv, progress, time),
        TransitionType::ZoomBlur => zoom_blur(from, to, uv, progress),
        TransitionType::Instant => instant(from, to, uv, progress),
    }
}
