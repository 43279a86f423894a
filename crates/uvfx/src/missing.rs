use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingFileKind {
    Source,
}

/// A configured file that no longer exists, with a way to point the instance
/// at a replacement.
pub struct MissingFile {
    pub path: String,
    pub kind: MissingFileKind,
    repair: Box<dyn FnOnce(&str) + Send>,
}

impl MissingFile {
    pub fn new(path: String, kind: MissingFileKind, repair: impl FnOnce(&str) + Send + 'static) -> Self {
        Self {
            path,
            kind,
            repair: Box::new(repair),
        }
    }

    /// Applies `new_path` to the owning instance.
    pub fn repair(self, new_path: &str) {
        (self.repair)(new_path);
    }
}

impl fmt::Debug for MissingFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MissingFile")
            .field("path", &self.path)
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}
