//! Filesystem source loading.

use std::path::Path;

use less_eval::{import_failed, LessResult, SourceLoader};

/// Reads sources from the filesystem. I/O errors become import failures.
#[derive(Clone, Copy, Debug, Default)]
pub struct FilesystemLoader;

impl SourceLoader for FilesystemLoader {
    fn load(&self, path: &Path) -> LessResult<String> {
        tracing::trace!(path = %path.display(), "reading source");
        std::fs::read_to_string(path).map_err(|err| import_failed(path, err))
    }
}
