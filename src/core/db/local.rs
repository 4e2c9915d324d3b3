use std::fs::{self, File};
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde_json::Value;
use tar::{Archive, Builder};
use tempdir::TempDir;
use zstd::stream::{read::Decoder as ZstdDecoder, write::Encoder as ZstdEncoder};

use crate::core::error::StoreError;

/// Filename prefix that namespaces every entry this store owns. Foreign
/// files in the same directory are never read, cleared, or backed up.
const KEY_PREFIX: &str = "scoutdesk.";
const KEY_SUFFIX: &str = ".json";

/// Namespaced, JSON-serializing key-value store over a data directory.
///
/// One entry per key, stored verbatim as `<dir>/scoutdesk.<key>.json`.
/// Read-side failures (missing file, unreadable file, broken JSON) are
/// logged and swallowed; the only write failure surfaced to the user is
/// storage exhaustion. Nothing here is atomic across keys: backup and
/// restore are best-effort snapshots, not transactions.
pub struct LocalStore {
    dir: PathBuf,
}

impl std::fmt::Debug for LocalStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalStore").field("dir", &self.dir).finish()
    }
}

impl LocalStore {
    pub fn open<P: AsRef<Path>>(dir: P) -> anyhow::Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create data directory {dir:?}"))?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{KEY_PREFIX}{key}{KEY_SUFFIX}"))
    }

    fn key_of(file_name: &str) -> Option<&str> {
        file_name
            .strip_prefix(KEY_PREFIX)
            .and_then(|rest| rest.strip_suffix(KEY_SUFFIX))
    }

    /// Parsed JSON for the key, or `None` when the entry is absent or
    /// unreadable. Parse and read errors are logged, never propagated.
    pub fn get(&self, key: &str) -> Option<Value> {
        let path = self.entry_path(key);
        let raw = match fs::read(&path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return None,
            Err(err) => {
                tracing::warn!(key, %err, "failed to read local entry");
                return None;
            }
        };
        match serde_json::from_slice(&raw) {
            Ok(value) => Some(value),
            Err(err) => {
                tracing::warn!(key, %err, "local entry holds invalid JSON, ignoring");
                None
            }
        }
    }

    /// Serializes and writes the value under the namespaced key. Disk
    /// exhaustion maps to [`StoreError::QuotaExceeded`].
    pub fn set(&self, key: &str, value: &Value) -> Result<(), StoreError> {
        let raw = serde_json::to_vec(value)?;
        fs::write(self.entry_path(key), raw).map_err(StoreError::from_write_error)
    }

    /// Removes the entry if present. Failures are logged and swallowed.
    pub fn remove(&self, key: &str) {
        if let Err(err) = fs::remove_file(self.entry_path(key)) {
            if err.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!(key, %err, "failed to remove local entry");
            }
        }
    }

    pub fn exists(&self, key: &str) -> bool {
        self.entry_path(key).is_file()
    }

    /// Every namespaced key, prefix stripped. An unreadable directory
    /// yields an empty list.
    pub fn all_keys(&self) -> Vec<String> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(err) => {
                tracing::warn!(%err, "failed to enumerate data directory");
                return Vec::new();
            }
        };
        let mut keys: Vec<String> = entries
            .filter_map(|e| e.ok())
            .filter_map(|e| {
                let name = e.file_name();
                Self::key_of(name.to_str()?).map(str::to_string)
            })
            .collect();
        keys.sort();
        keys
    }

    /// Removes every namespaced entry; files outside the namespace are
    /// left untouched.
    pub fn clear(&self) {
        for key in self.all_keys() {
            self.remove(&key);
        }
    }

    /// Approximate size of the namespaced data in kilobytes.
    pub fn size_kb(&self) -> f64 {
        let mut bytes = 0u64;
        for key in self.all_keys() {
            if let Ok(meta) = fs::metadata(self.entry_path(&key)) {
                bytes += meta.len();
            }
        }
        (bytes as f64) / 1024.0
    }

    /// Packs every namespaced entry into one `tar.zst` archive.
    pub fn backup<P: AsRef<Path>>(&self, dest: P) -> anyhow::Result<()> {
        let dest = dest.as_ref();
        if let Some(parent) = dest.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let out = File::create(dest)
            .with_context(|| format!("Failed to create backup archive {dest:?}"))?;
        let encoder = ZstdEncoder::new(out, 3)
            .with_context(|| format!("Failed to create zstd encoder for {dest:?}"))?;
        let mut tar = Builder::new(encoder);

        for key in self.all_keys() {
            let path = self.entry_path(&key);
            let name = format!("{KEY_PREFIX}{key}{KEY_SUFFIX}");
            tar.append_path_with_name(&path, &name)
                .with_context(|| format!("Failed to add {path:?} to backup"))?;
        }

        let encoder = tar
            .into_inner()
            .with_context(|| format!("Failed to finalize tar for {dest:?}"))?;
        encoder
            .finish()
            .with_context(|| format!("Failed to finalize zstd stream for {dest:?}"))?;
        Ok(())
    }

    /// Writes all archived entries back verbatim. Entries outside the
    /// namespace are skipped. Existing entries with the same key are
    /// overwritten; this is a snapshot replay, not a merge.
    pub fn restore<P: AsRef<Path>>(&self, src: P) -> anyhow::Result<()> {
        let src = src.as_ref();
        let staging = TempDir::new("scoutdesk_restore")?;
        {
            let f = File::open(src)
                .with_context(|| format!("Failed to open backup archive {src:?}"))?;
            let decoder = ZstdDecoder::new(f)
                .with_context(|| format!("Invalid zstd stream in {src:?}"))?;
            let mut archive = Archive::new(decoder);
            archive
                .unpack(staging.path())
                .with_context(|| format!("Failed to extract archive {src:?}"))?;
        }

        for entry in fs::read_dir(staging.path())? {
            let entry = entry?;
            let name = entry.file_name();
            let Some(name) = name.to_str() else { continue };
            if Self::key_of(name).is_none() {
                tracing::warn!(file = name, "skipping non-namespaced entry in backup");
                continue;
            }
            fs::copy(entry.path(), self.dir.join(name))
                .with_context(|| format!("Failed to restore entry {name}"))?;
        }
        Ok(())
    }
}
