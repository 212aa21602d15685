// Host-side tests for the scene registry.
// The main crate is wasm-only, so we include the pure-Rust module directly.

#![allow(dead_code)]
mod scene {
    include!("../src/core/scene.rs");
}

use scene::*;

const SCENES_WGSL: &str = include_str!("../shaders/scenes.wgsl");

#[test]
fn builtins_register_in_order() {
    let r = SceneRegistry::with_builtin_scenes();
    assert_eq!(r.len(), 4);
    let ids: Vec<_> = r.ids().collect();
    assert_eq!(ids, vec!["void-tunnel", "membrane", "sacred-geometry", "glitch-matrix"]);
    assert_eq!(r.get_by_index(0).map(|d| d.id), Some(DEFAULT_SCENE_ID));
    assert_eq!(r.index_of("glitch-matrix"), Some(3));
    assert!(r.get("nope").is_none());
    assert!(r.get_by_index(9).is_none());
}

#[test]
fn every_builtin_has_a_shader_entry_point() {
    for d in SceneRegistry::with_builtin_scenes().iter() {
        let sig = format!("fn {}(", d.entry_point);
        assert!(SCENES_WGSL.contains(&sig), "scenes.wgsl has no {}", d.entry_point);
    }
}

#[test]
fn reregistering_overwrites_in_place() {
    let mut r = SceneRegistry::with_builtin_scenes();
    r.register(SceneDescriptor {
        id: "membrane",
        name: "Membrane II",
        entry_point: "fs_membrane",
        tags: &[],
    });
    assert_eq!(r.len(), 4);
    assert_eq!(r.index_of("membrane"), Some(1));
    assert_eq!(r.get("membrane").map(|d| d.name), Some("Membrane II"));
}

#[test]
fn new_scenes_append() {
    let mut r = SceneRegistry::new();
    assert!(r.is_empty());
    r.register(SceneDescriptor {
        id: "strobe",
        name: "Strobe",
        entry_point: "fs_tunnel",
        tags: &["test"],
    });
    r.register(BUILTIN_SCENES[2].clone());
    assert_eq!(r.len(), 2);
    assert_eq!(r.index_of("sacred-geometry"), Some(1));
    assert_eq!(r.get("strobe").map(|d| d.tags), Some(&["test"][..]));
}

#[test]
fn resolve_reports_unregistered_ids() {
    let r = SceneRegistry::with_builtin_scenes();
    assert_eq!(r.resolve("membrane").map(|d| d.id), Ok("membrane"));
    let err = r.resolve("<img src=x onerror=alert(1)>").unwrap_err();
    assert_eq!(err, UnknownScene("<img src=x onerror=alert(1)>".into()));
    assert_eq!(err.to_string(), "unknown scene '<img src=x onerror=alert(1)>'");
    assert!(r.resolve("").is_err());
    assert!(r.resolve("Membrane").is_err());
}
