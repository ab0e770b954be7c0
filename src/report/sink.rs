// src/report/sink.rs
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use tracing::{info, warn};

/// One fully encoded output file, e.g. `edges_teams_48h_vs_7d.csv`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

#[async_trait::async_trait]
pub trait ReportSink: Send + Sync {
    /// Persist every file, overwriting any previous file of the same name.
    /// Returns where each file ended up.
    async fn store(&self, files: Vec<OutputFile>) -> Result<Vec<String>>;
}

/// Writes files into a directory, creating it when missing.
///
/// Each store call is all-or-nothing at the file level: every file is first
/// written to a hidden `.<name>.tmp` next to its target, and targets are only
/// replaced once all temporaries are on disk. On failure the temporaries are
/// removed and existing outputs stay as they were.
#[derive(Debug, Clone)]
pub struct DirSink {
    dir: PathBuf,
}

impl DirSink {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn temp_path(&self, name: &str) -> PathBuf {
        self.dir.join(format!(".{name}.tmp"))
    }

    /// Write every temporary and make sure each target can be replaced.
    async fn stage(&self, files: &[OutputFile], staged: &mut Vec<PathBuf>) -> Result<()> {
        for f in files {
            let tmp = self.temp_path(&f.name);
            staged.push(tmp.clone());
            tokio::fs::write(&tmp, &f.bytes)
                .await
                .with_context(|| format!("writing {}", tmp.display()))?;
        }
        for f in files {
            let target = self.dir.join(&f.name);
            if let Ok(meta) = tokio::fs::metadata(&target).await {
                if meta.is_dir() {
                    bail!("cannot replace {}: is a directory", target.display());
                }
            }
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl ReportSink for DirSink {
    async fn store(&self, files: Vec<OutputFile>) -> Result<Vec<String>> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .with_context(|| format!("creating output dir {}", self.dir.display()))?;

        let mut staged = Vec::with_capacity(files.len());
        if let Err(e) = self.stage(&files, &mut staged).await {
            for tmp in &staged {
                let _ = tokio::fs::remove_file(tmp).await;
            }
            warn!(dir = %self.dir.display(), error = %e, "outputs left unchanged");
            return Err(e);
        }

        let mut written = Vec::with_capacity(files.len());
        for (f, tmp) in files.iter().zip(&staged) {
            let path = self.dir.join(&f.name);
            tokio::fs::rename(tmp, &path)
                .await
                .with_context(|| format!("moving {} into place", path.display()))?;
            info!(path = %path.display(), bytes = f.bytes.len(), "saved");
            written.push(path.display().to_string());
        }
        Ok(written)
    }
}

// --- Test helper ---
pub struct MemorySink {
    pub calls: std::sync::Mutex<Vec<Vec<OutputFile>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self {
            calls: std::sync::Mutex::new(vec![]),
        }
    }

    /// Files from the most recent `store` call.
    pub fn last(&self) -> Vec<OutputFile> {
        self.calls
            .lock()
            .map(|c| c.last().cloned().unwrap_or_default())
            .unwrap_or_default()
    }
}

impl Default for MemorySink {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl ReportSink for MemorySink {
    async fn store(&self, files: Vec<OutputFile>) -> Result<Vec<String>> {
        let names = files.iter().map(|f| f.name.clone()).collect();
        self.calls
            .lock()
            .map_err(|_| anyhow::anyhow!("memory sink poisoned"))?
            .push(files);
        Ok(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn dir_sink_creates_dir_and_overwrites() {
        let tmp = tempfile::tempdir().unwrap();
        let out = tmp.path().join("analytics");
        let sink = DirSink::new(&out);

        let first = vec![OutputFile {
            name: "a.csv".into(),
            bytes: b"old,longer content\n".to_vec(),
        }];
        sink.store(first).await.unwrap();

        let second = vec![OutputFile {
            name: "a.csv".into(),
            bytes: b"new\n".to_vec(),
        }];
        let written = sink.store(second).await.unwrap();

        assert_eq!(written.len(), 1);
        assert_eq!(std::fs::read(out.join("a.csv")).unwrap(), b"new\n");
    }

    #[tokio::test]
    async fn dir_sink_failure_keeps_previous_outputs() {
        let tmp = tempfile::tempdir().unwrap();
        let out = tmp.path().to_path_buf();
        std::fs::write(out.join("a.csv"), b"OLD").unwrap();
        std::fs::create_dir(out.join("b.csv")).unwrap();

        let sink = DirSink::new(&out);
        let res = sink
            .store(vec![
                OutputFile {
                    name: "a.csv".into(),
                    bytes: b"NEW".to_vec(),
                },
                OutputFile {
                    name: "b.csv".into(),
                    bytes: b"NEW".to_vec(),
                },
            ])
            .await;

        assert!(res.is_err());
        assert_eq!(std::fs::read(out.join("a.csv")).unwrap(), b"OLD");
        assert!(out.join("b.csv").is_dir());
        let leftovers: Vec<_> = std::fs::read_dir(&out)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .filter(|n| n.ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty(), "temporaries left: {leftovers:?}");
    }

    #[tokio::test]
    async fn memory_sink_records_calls() {
        let sink = MemorySink::new();
        sink.store(vec![OutputFile {
            name: "x.json".into(),
            bytes: b"[]".to_vec(),
        }])
        .await
        .unwrap();
        assert_eq!(sink.last().len(), 1);
        assert_eq!(sink.last()[0].name, "x.json");
    }
}
