//! Module-level registration. The host owns one [`ModuleRegistry`] for the
//! lifetime of the plugin; nothing here is global.

use std::path::{Path, PathBuf};

/// Effect program shipped in the module data directory.
pub const EFFECT_FILE: &str = "uvfx.wgsl";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IconType {
    Default,
    Image,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OutputFlags {
    pub video: bool,
    /// The source understands colour spaces beyond plain sRGB.
    pub srgb: bool,
}

/// Static description of a video filter type the module provides.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceInfo {
    pub id: &'static str,
    pub output_flags: OutputFlags,
    pub icon: IconType,
}

pub const OVERLAY_SOURCE: SourceInfo = SourceInfo {
    id: "uvfx_source",
    output_flags: OutputFlags {
        video: true,
        srgb: true,
    },
    icon: IconType::Image,
};

#[derive(Debug)]
pub struct ModuleRegistry {
    data_dir: PathBuf,
    sources: Vec<SourceInfo>,
}

impl ModuleRegistry {
    /// Initialises the module and registers the overlay filter.
    pub fn load(data_dir: impl Into<PathBuf>) -> Self {
        let mut registry = Self {
            data_dir: data_dir.into(),
            sources: Vec::new(),
        };
        registry.register(OVERLAY_SOURCE);
        tracing::info!(
            version = env!("CARGO_PKG_VERSION"),
            data_dir = %registry.data_dir.display(),
            "UVFX loaded successfully"
        );
        registry
    }

    /// Adds `info`, replacing any entry with the same id.
    pub fn register(&mut self, info: SourceInfo) {
        self.sources.retain(|existing| existing.id != info.id);
        self.sources.push(info);
    }

    pub fn sources(&self) -> &[SourceInfo] {
        &self.sources
    }

    pub fn find(&self, id: &str) -> Option<&SourceInfo> {
        self.sources.iter().find(|info| info.id == id)
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Path of `name` inside the data directory, if the file exists.
    pub fn module_file(&self, name: &str) -> Option<PathBuf> {
        let path = self.data_dir.join(name);
        path.is_file().then_some(path)
    }

    pub fn unload(self) {
        tracing::info!(sources = self.sources.len(), "UVFX unloaded");
    }
}
