use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// What the session page can show for a deck entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageStatus {
    Available { path: PathBuf, bytes: u64 },
    Missing { path: PathBuf },
    Unreadable { path: PathBuf, reason: String },
}

impl ImageStatus {
    pub fn is_available(&self) -> bool {
        matches!(self, ImageStatus::Available { .. })
    }
}

/// Resolves image identifiers to displayable resources.
pub trait ImageSource {
    fn resolve(&self, id: &str) -> ImageStatus;
}

/// Looks identifiers up as files below a directory.
#[derive(Debug, Clone)]
pub struct DirImageSource {
    root: PathBuf,
}

impl DirImageSource {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl Default for DirImageSource {
    fn default() -> Self {
        Self::new(".")
    }
}

impl ImageSource for DirImageSource {
    fn resolve(&self, id: &str) -> ImageStatus {
        let path = self.root.join(id);
        match fs::metadata(&path) {
            Ok(meta) if meta.is_file() => ImageStatus::Available {
                bytes: meta.len(),
                path,
            },
            Ok(_) => ImageStatus::Unreadable {
                path,
                reason: "not a regular file".to_string(),
            },
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::warn!("image {} not found", path.display());
                ImageStatus::Missing { path }
            }
            Err(e) => {
                log::warn!("image {} unreadable: {}", path.display(), e);
                ImageStatus::Unreadable {
                    path,
                    reason: e.to_string(),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use tempfile::tempdir;

    #[test]
    fn present_file_is_available() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("pt1.jpg"), [0u8; 42]).unwrap();
        let source = DirImageSource::new(dir.path());
        assert_matches!(source.resolve("pt1.jpg"), ImageStatus::Available { bytes: 42, .. });
    }

    #[test]
    fn absent_file_is_missing() {
        let dir = tempdir().unwrap();
        let source = DirImageSource::new(dir.path());
        let status = source.resolve("nt2.jpg");
        assert_matches!(&status, ImageStatus::Missing { path } if path.ends_with("nt2.jpg"));
        assert!(!status.is_available());
    }

    #[test]
    fn directory_is_unreadable() {
        let dir = tempdir().unwrap();
        std::fs::create_dir(dir.path().join("scan.jpg")).unwrap();
        let source = DirImageSource::new(dir.path());
        assert_matches!(source.resolve("scan.jpg"), ImageStatus::Unreadable { .. });
    }
}
