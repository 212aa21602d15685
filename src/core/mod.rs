pub mod analysis;
// CPU mirror of transition.wgsl, checked by the host tests
#[allow(dead_code)]
pub mod blend;
pub mod clock;
pub mod config;
pub mod controls;
pub mod scene;
pub mod signals;
pub mod transition;

pub use analysis::*;
pub use clock::*;
pub use config::*;
pub use controls::*;
pub use scene::*;
pub use signals::*;
pub use transition::*;

// Shaders bundled as string constants
pub static SCENES_WGSL: &str = include_str!("../../shaders/scenes.wgsl");
pub static TRANSITION_WGSL: &str = include_str!("../../shaders/transition.wgsl");
