//! Filesystem-backed corpus: every `*.md` file below a root directory.

use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::{CorpusProvider, Document};
use crate::error::CorpusError;

/// Markdown vault on disk.
///
/// Dot-prefixed files and folders are skipped. Symlinked notes are followed;
/// symlinked folders are not descended into, so link cycles cannot occur.
/// Only an unlistable root fails enumeration: unreadable subfolders and
/// files are logged and left out.
#[derive(Debug, Clone)]
pub struct FsCorpus {
    root: PathBuf,
}

impl FsCorpus {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute location of a corpus-relative path.
    pub fn resolve(&self, path: &str) -> PathBuf {
        path.split('/').fold(self.root.clone(), |acc, part| acc.join(part))
    }
}

/// One entry of a directory listing.
#[derive(Debug)]
enum Listed {
    Dir(PathBuf),
    File {
        path: PathBuf,
        modified: io::Result<SystemTime>,
    },
    Unreadable {
        path: PathBuf,
        error: io::Error,
    },
}

impl Listed {
    fn path(&self) -> &Path {
        match self {
            Listed::Dir(path) | Listed::File { path, .. } | Listed::Unreadable { path, .. } => path,
        }
    }
}

/// Lists one directory for the vault walk.
#[async_trait]
trait DirSource: Send + Sync {
    async fn list(&self, dir: &Path) -> io::Result<Vec<Listed>>;
}

struct TokioDirs;

#[async_trait]
impl DirSource for TokioDirs {
    async fn list(&self, dir: &Path) -> io::Result<Vec<Listed>> {
        let mut entries = tokio::fs::read_dir(dir).await?;
        let mut listed = Vec::new();

        loop {
            let entry = match entries.next_entry().await {
                Ok(Some(entry)) => entry,
                Ok(None) => break,
                Err(e) => {
                    tracing::warn!(dir = %dir.display(), error = %e, "directory listing cut short");
                    break;
                }
            };
            let path = entry.path();

            let file_type = match entry.file_type().await {
                Ok(file_type) => file_type,
                Err(error) => {
                    listed.push(Listed::Unreadable { path, error });
                    continue;
                }
            };
            if file_type.is_dir() {
                listed.push(Listed::Dir(path));
                continue;
            }

            // Follows symlinks.
            match tokio::fs::metadata(&path).await {
                Ok(metadata) if metadata.is_file() => listed.push(Listed::File {
                    modified: metadata.modified(),
                    path,
                }),
                Ok(_) => {}
                Err(error) => listed.push(Listed::Unreadable { path, error }),
            }
        }
        Ok(listed)
    }
}

fn is_markdown(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("md"))
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .is_some_and(|name| name.to_string_lossy().starts_with('.'))
}

fn relative_path(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    let parts: Vec<_> = rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    Some(parts.join("/"))
}

async fn walk(root: &Path, source: &dyn DirSource) -> Result<Vec<Document>, CorpusError> {
    let mut pending = vec![root.to_path_buf()];
    let mut documents = Vec::new();

    while let Some(dir) = pending.pop() {
        let listed = match source.list(&dir).await {
            Ok(listed) => listed,
            Err(e) if dir == root => {
                return Err(CorpusError::Unavailable {
                    root: root.to_path_buf(),
                    message: e.to_string(),
                })
            }
            Err(e) => {
                tracing::warn!(dir = %dir.display(), error = %e, "skipping unreadable folder");
                continue;
            }
        };

        for entry in listed {
            if is_hidden(entry.path()) {
                continue;
            }
            match entry {
                Listed::Dir(path) => pending.push(path),
                Listed::File { path, modified } if is_markdown(&path) => {
                    let modified = match modified {
                        Ok(modified) => modified,
                        Err(e) => {
                            tracing::warn!(path = %path.display(), error = %e, "skipping note without modification time");
                            continue;
                        }
                    };
                    if let Some(rel) = relative_path(root, &path) {
                        documents.push(Document::new(rel, DateTime::<Utc>::from(modified)));
                    }
                }
                Listed::File { .. } => {}
                Listed::Unreadable { path, error } => {
                    tracing::warn!(path = %path.display(), error = %error, "skipping unreadable entry");
                }
            }
        }
    }

    documents.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(documents)
}

#[async_trait]
impl CorpusProvider for FsCorpus {
    async fn documents(&self) -> Result<Vec<Document>, CorpusError> {
        walk(&self.root, &TokioDirs).await
    }

    async fn read(&self, document: &Document) -> Result<String, CorpusError> {
        tokio::fs::read_to_string(self.resolve(&document.path))
            .await
            .map_err(|source| CorpusError::ReadFailed {
                path: document.path.clone(),
                source,
            })
    }

    async fn exists(&self, path: &str) -> bool {
        tokio::fs::metadata(self.resolve(path))
            .await
            .map(|m| m.is_file())
            .unwrap_or(false)
    }
}
