//! Working directory of uploaded CVs.

use std::path::{Path, PathBuf};

use crate::config::WorkDirs;
use crate::recruit::extract::DocumentKind;
use crate::recruit::StoreError;

#[derive(Debug, Clone)]
pub struct Workspace {
    dirs: WorkDirs,
}

impl Workspace {
    pub fn new(dirs: WorkDirs) -> Self {
        Self { dirs }
    }

    pub fn dirs(&self) -> &WorkDirs {
        &self.dirs
    }

    /// Writes an upload under its own name, replacing any file of that name.
    pub async fn save(&self, file_name: &str, bytes: &[u8]) -> Result<PathBuf, StoreError> {
        let path = self.dirs.working.join(file_name);
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|source| StoreError::Io {
                path: path.clone(),
                source,
            })?;
        Ok(path)
    }

    /// Raw bytes of a stored CV, or `None` if no such file exists.
    pub async fn read(&self, file_name: &str) -> Result<Option<Vec<u8>>, StoreError> {
        let path = self.dirs.working.join(file_name);
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StoreError::Io { path, source }),
        }
    }

    /// Supported CVs in the working directory, sorted by name.
    pub async fn list_cvs(&self) -> Result<Vec<(String, DocumentKind)>, StoreError> {
        let io_err = |source| StoreError::Io {
            path: self.dirs.working.clone(),
            source,
        };
        let mut entries = tokio::fs::read_dir(&self.dirs.working)
            .await
            .map_err(io_err)?;
        let mut cvs = Vec::new();
        while let Some(entry) = entries.next_entry().await.map_err(io_err)? {
            let Ok(name) = entry.file_name().into_string() else {
                continue;
            };
            if let Some(kind) = DocumentKind::from_file_name(&name) {
                cvs.push((name, kind));
            }
        }
        cvs.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(cvs)
    }
}

/// Reduces a client-supplied name to its final path component.
/// Returns `None` for names that cannot be stored.
pub fn sanitize_file_name(raw: &str) -> Option<String> {
    let last = raw.rsplit(['/', '\\']).next().unwrap_or(raw).trim();
    let name = Path::new(last).file_name()?.to_str()?;
    (!name.is_empty() && name != "." && name != "..").then(|| name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_keeps_final_component() {
        assert_eq!(sanitize_file_name("jane.pdf").as_deref(), Some("jane.pdf"));
        assert_eq!(
            sanitize_file_name("../../etc/jane.pdf").as_deref(),
            Some("jane.pdf")
        );
        assert_eq!(
            sanitize_file_name("C:\\Users\\hr\\cv.docx").as_deref(),
            Some("cv.docx")
        );
        assert_eq!(sanitize_file_name(".."), None);
        assert_eq!(sanitize_file_name("dir/"), None);
    }

    #[tokio::test]
    async fn test_list_skips_unsupported_files_and_sorts() {
        let root = tempfile::tempdir().unwrap();
        let dirs = WorkDirs::under(root.path());
        dirs.ensure().unwrap();
        let ws = Workspace::new(dirs);
        ws.save("b.docx", b"x").await.unwrap();
        ws.save("notes.txt", b"x").await.unwrap();
        ws.save("a.pdf", b"x").await.unwrap();

        let names: Vec<String> = ws
            .list_cvs()
            .await
            .unwrap()
            .into_iter()
            .map(|(n, _)| n)
            .collect();
        assert_eq!(names, vec!["a.pdf", "b.docx"]);
    }

    #[tokio::test]
    async fn test_read_missing_file_is_none() {
        let root = tempfile::tempdir().unwrap();
        let dirs = WorkDirs::under(root.path());
        dirs.ensure().unwrap();
        let ws = Workspace::new(dirs);
        assert!(ws.read("ghost.pdf").await.unwrap().is_none());
        ws.save("jane.pdf", b"%PDF").await.unwrap();
        assert_eq!(ws.read("jane.pdf").await.unwrap().unwrap(), b"%PDF");
    }
}
