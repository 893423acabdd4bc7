//! Filesystem-backed line sources and result writing (native targets only).

use crate::batch::LineSource;
use crate::error::SourceError;
use encoding_rs::WINDOWS_1251;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Reads a text file as UTF-8, falling back to Windows-1251 for legacy files.
#[derive(Clone, Debug)]
pub struct FileSource {
    path: PathBuf,
    name: String,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> FileSource {
        let path = path.into();
        let name = path.display().to_string();
        FileSource { path, name }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LineSource for FileSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn read_lines(&self) -> Result<Vec<String>, SourceError> {
        let bytes = fs::read(&self.path).map_err(|source| match source.kind() {
            ErrorKind::NotFound => SourceError::NotFound(self.path.clone()),
            _ => SourceError::Read {
                path: self.path.clone(),
                source,
            },
        })?;

        let text = match String::from_utf8(bytes) {
            Ok(text) => text,
            Err(err) => {
                warn!(path = %self.path.display(), "not valid UTF-8, decoding as windows-1251");
                let (text, _, _) = WINDOWS_1251.decode(err.as_bytes());
                text.into_owned()
            }
        };
        Ok(text.lines().map(str::to_string).collect())
    }
}

/// Write a companion result file.
pub fn write_result(path: &Path, contents: &str) -> Result<(), SourceError> {
    fs::write(path, contents).map_err(|source| SourceError::Write {
        path: path.to_path_buf(),
        source,
    })
}
