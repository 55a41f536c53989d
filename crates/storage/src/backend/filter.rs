//! Extension-filtered storage backend decorator.
//!
//! Wraps another backend and restricts all operations to files whose name
//! ends in one of a configured set of extensions, so stray files in the
//! record directory (READMEs, editor swap files) are never handed to the
//! record parser.

use crate::backend::FileInfoStream;
use crate::error::ErrorKind;
use crate::{BackendHandle, StorageBackend, error::Result};
use async_trait::async_trait;
use futures::StreamExt;
use std::path::Path;

/// Extension-filtered storage backend.
///
/// Extensions are matched case-insensitively against the end of the file
/// name and may span several dots (`json.gz`). A leading dot in the
/// configured extension is optional. Filtered paths return
/// [`ErrorKind::FilteredPath`].
#[derive(Clone)]
pub struct ExtensionFilterBackend {
    inner: BackendHandle,
    suffixes: Vec<String>,
}
impl ExtensionFilterBackend {
    pub fn new(inner: BackendHandle, extensions: impl IntoIterator<Item = impl AsRef<str>>) -> Self {
        let suffixes = extensions
            .into_iter()
            .map(|ext| format!(".{}", ext.as_ref().trim_start_matches('.').to_ascii_lowercase()))
            .collect();
        Self { inner, suffixes }
    }

    fn accepts(&self, path: impl AsRef<Path>) -> bool {
        let Some(name) = path.as_ref().file_name().and_then(|name| name.to_str()) else {
            return false;
        };
        let name = name.to_ascii_lowercase();
        // A bare ".json" is a hidden file, not a record.
        self.suffixes.iter().any(|suffix| name.len() > suffix.len() && name.ends_with(suffix.as_str()))
    }

    fn guard(&self, path: &Path) -> Result<()> {
        if !self.accepts(path) {
            exn::bail!(ErrorKind::FilteredPath(path.to_path_buf()));
        }
        Ok(())
    }
}

#[async_trait]
impl StorageBackend for ExtensionFilterBackend {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn list_stream(&self) -> FileInfoStream<'_> {
        Box::pin(self.inner.list_stream().filter(|item| {
            std::future::ready(match item {
                Ok(info) => {
                    let accepted = self.accepts(&info.path);
                    if !accepted {
                        tracing::trace!(backend = self.name(), path = %info.path.display(), "Ignoring file with unrecognised extension");
                    }
                    accepted
                },
                Err(_) => true, // propagate errors
            })
        }))
    }

    async fn read(&self, path: &Path) -> Result<Vec<u8>> {
        self.guard(path)?;
        self.inner.read(path).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MockBackend;
    use rstest::rstest;
    use std::path::PathBuf;
    use std::sync::Arc;

    fn filtered(files: &[&str]) -> ExtensionFilterBackend {
        let inner = MockBackend::with_files(files.iter().map(|name| (*name, Vec::from(*b"{}"))));
        ExtensionFilterBackend::new(Arc::new(inner), ["json", ".json.gz"])
    }

    #[rstest]
    #[case("go-basics.json", true)]
    #[case("GO-BASICS.JSON", true)]
    #[case("web.json.gz", true)]
    #[case("web.gz", false)]
    #[case("README.md", false)]
    #[case(".json", false)]
    #[case("notes.jsonl", false)]
    fn test_accepts(#[case] name: &str, #[case] expected: bool) {
        assert_eq!(filtered(&[]).accepts(name), expected);
    }

    #[tokio::test]
    async fn test_list_filters() {
        let backend = filtered(&["go-basics.json", "web.json.gz", "README.md", ".json.swp"]);
        let mut names: Vec<_> = backend.list().await.unwrap().into_iter().map(|f| f.path).collect();
        names.sort();
        assert_eq!(names, vec![PathBuf::from("go-basics.json"), PathBuf::from("web.json.gz")]);
    }

    #[tokio::test]
    async fn test_read_filtered() {
        let backend = filtered(&["README.md"]);
        let err = backend.read(Path::new("README.md")).await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::FilteredPath(_)));
    }

    #[tokio::test]
    async fn test_read_passthrough() {
        let backend = filtered(&["go-basics.json"]);
        assert_eq!(backend.read(Path::new("go-basics.json")).await.unwrap(), b"{}");
        assert_eq!(backend.name(), "mock");
    }
}
