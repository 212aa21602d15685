use fnv::FnvHashMap;
use smallvec::SmallVec;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("unknown scene '{0}'")]
pub struct UnknownScene(pub String);

/// A renderable scene the compositor can load into a slot.
#[derive(Clone, Debug, PartialEq)]
pub struct SceneDescriptor {
    pub id: &'static str,
    pub name: &'static str,
    /// Fragment entry point in `scenes.wgsl`.
    pub entry_point: &'static str,
    pub tags: &'static [&'static str],
}

/// Ordered registry; keyboard digits and the HUD follow registration order.
#[derive(Clone, Debug, Default)]
pub struct SceneRegistry {
    scenes: SmallVec<[SceneDescriptor; 8]>,
    index: FnvHashMap<&'static str, usize>,
}

impl SceneRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_builtin_scenes() -> Self {
        let mut r = Self::new();
        for d in BUILTIN_SCENES {
            r.register(d.clone());
        }
        r
    }

    /// Re-registering an id replaces the descriptor but keeps its position.
    pub fn register(&mut self, descriptor: SceneDescriptor) {
        match self.index.get(descriptor.id) {
            Some(&i) => {
                log::warn!("scene '{}' already registered, overwriting", descriptor.id);
                self.scenes[i] = descriptor;
            }
            None => {
                self.index.insert(descriptor.id, self.scenes.len());
                self.scenes.push(descriptor);
            }
        }
    }

    pub fn get(&self, id: &str) -> Option<&SceneDescriptor> {
        self.index.get(id).map(|&i| &self.scenes[i])
    }

    /// Like [`get`](Self::get), for callers that hand ids in from outside
    /// (JS, the URL) and need to report bad ones.
    pub fn resolve(&self, id: &str) -> Result<&SceneDescriptor, UnknownScene> {
        self.get(id).ok_or_else(|| UnknownScene(id.to_string()))
    }

    pub fn get_by_index(&self, index: usize) -> Option<&SceneDescriptor> {
        self.scenes.get(index)
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    pub fn ids(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.scenes.iter().map(|d| d.id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SceneDescriptor> {
        self.scenes.iter()
    }

    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }
}

pub const BUILTIN_SCENES: &[SceneDescriptor] = &[
    SceneDescriptor {
        id: "void-tunnel",
        name: "Void Tunnel",
        entry_point: "fs_tunnel",
        tags: &["tunnel", "bass"],
    },
    SceneDescriptor {
        id: "membrane",
        name: "Membrane",
        entry_point: "fs_membrane",
        tags: &["organic", "waveform"],
    },
    SceneDescriptor {
        id: "sacred-geometry",
        name: "Sacred Geometry",
        entry_point: "fs_geometry",
        tags: &["geometric", "beat"],
    },
    SceneDescriptor {
        id: "glitch-matrix",
        name: "Glitch Matrix",
        entry_point: "fs_matrix",
        tags: &["digital", "hihat"],
    },
];

pub const DEFAULT_SCENE_ID: &str = "void-tunnel";
