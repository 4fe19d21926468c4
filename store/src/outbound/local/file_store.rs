//! Durable key/value store: one `<key>.json` file per key in a directory.
//!
//! Keys are percent-encoded into file names, so any identifier can be
//! stored and foreign characters such as `/` or `:` never reach the
//! filesystem.
//!
//! Writes go to a hidden temporary file that is renamed over the target, so
//! a crash never leaves a half-written record. Filesystem access is confined
//! to the store directory through `cap-std`.

use std::io::{self, Write};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs::{Dir, OpenOptions};
use tracing::debug;

use crate::domain::ports::{KeyValueStore, KeyValueStoreError, StorageKey};

const RECORD_EXTENSION: &str = "json";

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Key/value store persisted under a directory.
#[derive(Debug, Clone)]
pub struct FileKeyValueStore {
    root: Utf8PathBuf,
    dir: Arc<Dir>,
}

impl FileKeyValueStore {
    /// Open the store rooted at `root`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns [`KeyValueStoreError::Backend`] when the directory cannot be
    /// created or opened.
    pub fn open(root: impl AsRef<Utf8Path>) -> Result<Self, KeyValueStoreError> {
        let root = root.as_ref().to_path_buf();
        Dir::create_ambient_dir_all(&root, ambient_authority())
            .map_err(|err| io_error(&root, &err))?;
        let dir = Dir::open_ambient_dir(&root, ambient_authority())
            .map_err(|err| io_error(&root, &err))?;
        Ok(Self {
            root,
            dir: Arc::new(dir),
        })
    }

    async fn blocking<T, F>(&self, task: F) -> Result<T, KeyValueStoreError>
    where
        T: Send + 'static,
        F: FnOnce(&Dir) -> io::Result<T> + Send + 'static,
    {
        let dir = Arc::clone(&self.dir);
        let root = self.root.clone();
        tokio::task::spawn_blocking(move || task(&dir))
            .await
            .map_err(|err| KeyValueStoreError::backend(format!("store task failed: {err}")))?
            .map_err(|err| io_error(&root, &err))
    }
}

#[async_trait]
impl KeyValueStore for FileKeyValueStore {
    async fn get(&self, key: &StorageKey) -> Result<Option<String>, KeyValueStoreError> {
        let file_name = record_file_name(key);
        self.blocking(move |dir| match dir.read_to_string(&file_name) {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err),
        })
        .await
    }

    async fn set(&self, key: &StorageKey, value: &str) -> Result<(), KeyValueStoreError> {
        let file_name = record_file_name(key);
        let contents = value.to_owned();
        self.blocking(move |dir| write_atomic(dir, &file_name, &contents))
            .await?;
        debug!(key = %key, root = %self.root, "wrote local record");
        Ok(())
    }

    async fn remove(&self, key: &StorageKey) -> Result<bool, KeyValueStoreError> {
        let file_name = record_file_name(key);
        self.blocking(move |dir| match dir.remove_file(&file_name) {
            Ok(()) => Ok(true),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(err) => Err(err),
        })
        .await
    }

    async fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<StorageKey>, KeyValueStoreError> {
        let prefix = prefix.to_owned();
        self.blocking(move |dir| {
            let mut keys = Vec::new();
            for entry in dir.entries()? {
                let name = entry?.file_name();
                let Some(name) = name.to_str() else {
                    continue;
                };
                if let Some(key) = key_from_file_name(name)
                    .filter(|key| key.as_str().starts_with(prefix.as_str()))
                {
                    keys.push(key);
                }
            }
            keys.sort();
            Ok(keys)
        })
        .await
    }
}

fn record_file_name(key: &StorageKey) -> Utf8PathBuf {
    let encoded = urlencoding::encode(key.as_str());
    // Dot-prefixed names are reserved for temporary files.
    let stem = encoded
        .strip_prefix('.')
        .map_or_else(|| encoded.to_string(), |rest| format!("%2E{rest}"));
    // Keys may contain dots, so append rather than `with_extension`.
    Utf8PathBuf::from(format!("{stem}.{RECORD_EXTENSION}"))
}

/// Key stored in `name`, skipping temporary files and foreign entries.
fn key_from_file_name(name: &str) -> Option<StorageKey> {
    if name.starts_with('.') {
        return None;
    }
    let path = Utf8Path::new(name);
    if path.extension() != Some(RECORD_EXTENSION) {
        return None;
    }
    let decoded = urlencoding::decode(path.file_stem()?).ok()?;
    StorageKey::new(decoded.into_owned()).ok()
}

fn io_error(root: &Utf8Path, err: &io::Error) -> KeyValueStoreError {
    KeyValueStoreError::backend(format!("{root}: {err}"))
}

fn write_atomic(dir: &Dir, file_name: &Utf8Path, contents: &str) -> io::Result<()> {
    let counter = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_nanos());
    let tmp_name = format!(".{file_name}.tmp.{}.{nanos}.{counter}", std::process::id());

    write_temp_file(dir, &tmp_name, contents)?;
    if let Err(err) = replace_target(dir, &tmp_name, file_name) {
        drop(dir.remove_file(&tmp_name));
        return Err(err);
    }
    sync_directory(dir);
    Ok(())
}

fn write_temp_file(dir: &Dir, tmp_name: &str, contents: &str) -> io::Result<()> {
    let mut options = OpenOptions::new();
    options.write(true).create_new(true);
    let mut file = dir.open_with(tmp_name, &options)?;

    let written = file
        .write_all(contents.as_bytes())
        .and_then(|()| file.sync_all());
    if let Err(err) = written {
        drop(file);
        drop(dir.remove_file(tmp_name));
        return Err(err);
    }
    Ok(())
}

#[cfg(windows)]
fn replace_target(dir: &Dir, tmp_name: &str, target: &Utf8Path) -> io::Result<()> {
    // Windows rename fails if the target exists.
    match dir.remove_file(target) {
        Ok(()) => {}
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(err) => return Err(err),
    }
    dir.rename(tmp_name, dir, target)
}

#[cfg(not(windows))]
fn replace_target(dir: &Dir, tmp_name: &str, target: &Utf8Path) -> io::Result<()> {
    dir.rename(tmp_name, dir, target)
}

fn sync_directory(dir: &Dir) {
    // Directory fsync is advisory here.
    drop(dir.open(".").and_then(|handle| handle.sync_all()));
}
