//! Utility functions.

use crate::error::{Error, Result};
use std::{ffi, fs, path};

/// Reads a text file in full.
pub fn load_text_file<P: AsRef<path::Path>>(path: P) -> Result<String> {
    let path = path.as_ref();
    fs::read_to_string(path).map_err(|source| {
        error!("failed to open file: \"{}\"", path.display());
        Error::File {
            path: path.to_owned(),
            source,
        }
    })
}

/// Converts a uniform name into a C string, `None` if it holds a NUL byte.
pub(crate) fn cstring(name: &str) -> Option<ffi::CString> {
    ffi::CString::new(name).ok()
}

/// Resolves asset paths against a root directory.
///
/// Shaders live under `shader/` and images under `image/`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Assets {
    root: path::PathBuf,
}

impl Assets {
    /// Constructor.
    pub fn new<P: Into<path::PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    /// Returns the asset root.
    pub fn root(&self) -> &path::Path {
        &self.root
    }

    /// Joins a relative path onto the root.
    pub fn path<P: AsRef<path::Path>>(&self, relative: P) -> path::PathBuf {
        self.root.join(relative)
    }

    /// Path of a file in the `shader/` directory.
    pub fn shader(&self, name: &str) -> path::PathBuf {
        self.path("shader").join(name)
    }

    /// Path of a file in the `image/` directory.
    pub fn image(&self, name: &str) -> path::PathBuf {
        self.path("image").join(name)
    }
}

impl Default for Assets {
    fn default() -> Self {
        Self::new(".")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_text_file_reports_the_path() {
        match load_text_file("no/such/shader.vs") {
            Err(Error::File { path, .. }) => assert!(path.ends_with("shader.vs")),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn asset_directories() {
        let assets = Assets::new("/data");
        assert_eq!(assets.root(), path::Path::new("/data"));
        assert_eq!(assets.path("shader"), path::Path::new("/data/shader"));
        assert_eq!(assets.shader("simple.vs"), path::Path::new("/data/shader/simple.vs"));
        assert_eq!(assets.image("container.png"), path::Path::new("/data/image/container.png"));
    }

    #[test]
    fn interior_nul_is_rejected() {
        assert!(cstring("light\0position").is_none());
        assert!(cstring("transform").is_some());
    }
}
