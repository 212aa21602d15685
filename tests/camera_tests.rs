// Host-side tests for the shared slot camera.
// The main crate is wasm-only, so we include the pure-Rust modules directly.

#![allow(dead_code)]
mod constants {
    include!("../src/constants.rs");
}
mod camera {
    include!("../src/camera.rs");
}

use camera::Camera;
use glam::{Mat4, Vec3, Vec4};

#[test]
fn sync_aspect_reports_changes_once() {
    let mut cam = Camera::default();
    assert!(cam.sync_aspect(800, 600));
    assert!((cam.aspect - 4.0 / 3.0).abs() < 1e-6);
    assert!(!cam.sync_aspect(800, 600));
    assert!(!cam.sync_aspect(1600, 1200));
}

#[test]
fn zero_sized_canvas_is_ignored() {
    let mut cam = Camera::default();
    let before = cam.aspect;
    assert!(!cam.sync_aspect(0, 600));
    assert!(!cam.sync_aspect(800, 0));
    assert_eq!(cam.aspect, before);
}

#[test]
fn inverse_view_projection_undoes_view_projection() {
    let mut cam = Camera::default();
    cam.sync_aspect(1280, 720);
    let vp = cam.projection_matrix() * cam.view_matrix();
    let id = cam.inverse_view_projection() * vp;
    assert!(id.abs_diff_eq(Mat4::IDENTITY, 1e-4));
}

#[test]
fn centre_of_screen_looks_down_negative_z() {
    let cam = Camera::default();
    let inv = cam.inverse_view_projection();
    let unproject = |z: f32| {
        let p = inv * Vec4::new(0.0, 0.0, z, 1.0);
        p.truncate() / p.w
    };
    let dir = (unproject(1.0) - unproject(0.0)).normalize();
    assert!(dir.abs_diff_eq(Vec3::NEG_Z, 1e-4), "{:?}", dir);
}
