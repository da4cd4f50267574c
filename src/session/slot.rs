// Durable client-side slot holding the bearer token

use crate::models::SessionToken;
use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, warn};

/// Key the token is stored under
pub const TOKEN_KEY: &str = "authToken";

#[derive(Debug)]
pub enum SlotError {
    Io(std::io::Error),
    Serialization(String),
    /// A previous writer panicked while holding the slot
    Unavailable,
}

impl std::fmt::Display for SlotError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SlotError::Io(e) => write!(f, "IO error: {}", e),
            SlotError::Serialization(msg) => write!(f, "Serialization error: {}", msg),
            SlotError::Unavailable => write!(f, "Token slot unavailable"),
        }
    }
}

impl std::error::Error for SlotError {}

impl From<std::io::Error> for SlotError {
    fn from(err: std::io::Error) -> Self {
        SlotError::Io(err)
    }
}

/// Key-value slot that survives a reload
pub trait TokenSlot: Send + Sync {
    fn load(&self) -> Result<Option<SessionToken>, SlotError>;

    /// Overwrite the stored token
    fn store(&self, token: &SessionToken) -> Result<(), SlotError>;

    /// Remove the stored token; clearing an empty slot succeeds
    fn clear(&self) -> Result<(), SlotError>;
}

/// Slot that lives as long as the process
#[derive(Default)]
pub struct MemoryTokenSlot {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryTokenSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: &SessionToken) -> Self {
        let slot = Self::new();
        if let Ok(mut entries) = slot.entries.lock() {
            entries.insert(TOKEN_KEY.to_string(), token.as_str().to_string());
        }
        slot
    }
}

impl TokenSlot for MemoryTokenSlot {
    fn load(&self) -> Result<Option<SessionToken>, SlotError> {
        let entries = self.entries.lock().map_err(|_| SlotError::Unavailable)?;
        Ok(entries
            .get(TOKEN_KEY)
            .map(SessionToken::new)
            .filter(|t| !t.is_empty()))
    }

    fn store(&self, token: &SessionToken) -> Result<(), SlotError> {
        let mut entries = self.entries.lock().map_err(|_| SlotError::Unavailable)?;
        entries.insert(TOKEN_KEY.to_string(), token.as_str().to_string());
        Ok(())
    }

    fn clear(&self) -> Result<(), SlotError> {
        let mut entries = self.entries.lock().map_err(|_| SlotError::Unavailable)?;
        entries.remove(TOKEN_KEY);
        Ok(())
    }
}

/// Slot backed by a JSON object file. Keys other than the token are left
/// untouched.
pub struct FileTokenSlot {
    path: PathBuf,
    // Serializes read-modify-write cycles within this process
    guard: Mutex<()>,
}

impl FileTokenSlot {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            guard: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(&self) -> Result<HashMap<String, String>, SlotError> {
        if !self.path.exists() {
            return Ok(HashMap::new());
        }

        let contents = fs::read_to_string(&self.path)?;
        if contents.trim().is_empty() {
            return Ok(HashMap::new());
        }

        serde_json::from_str(&contents).map_err(|e| {
            SlotError::Serialization(format!(
                "Failed to parse token slot '{}': {}",
                self.path.display(),
                e
            ))
        })
    }

    /// Entries to rewrite, and whether the file must be replaced regardless.
    /// A file that no longer parses is dropped so the slot stays writable.
    fn entries_for_update(&self) -> Result<(HashMap<String, String>, bool), SlotError> {
        match self.read_entries() {
            Ok(entries) => Ok((entries, false)),
            Err(SlotError::Serialization(msg)) => {
                warn!("Replacing unreadable token slot: {}", msg);
                Ok((HashMap::new(), true))
            }
            Err(e) => Err(e),
        }
    }

    fn write_entries(&self, entries: &HashMap<String, String>) -> Result<(), SlotError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let contents = serde_json::to_string_pretty(entries)
            .map_err(|e| SlotError::Serialization(e.to_string()))?;

        // Write then rename so a crash never leaves a half-written file
        let tmp = self.path.with_extension("tmp");
        let mut file = open_private(&tmp)?;
        file.write_all(contents.as_bytes())?;
        file.sync_all()?;
        drop(file);
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

/// Open `path` for writing, readable by the owner only
#[cfg(unix)]
fn open_private(path: &Path) -> std::io::Result<fs::File> {
    use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};

    let file = fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)?;
    // `mode` only applies on creation; a leftover temp file keeps its own
    file.set_permissions(fs::Permissions::from_mode(0o600))?;
    Ok(file)
}

#[cfg(not(unix))]
fn open_private(path: &Path) -> std::io::Result<fs::File> {
    fs::File::create(path)
}

impl TokenSlot for FileTokenSlot {
    fn load(&self) -> Result<Option<SessionToken>, SlotError> {
        let _guard = self.guard.lock().map_err(|_| SlotError::Unavailable)?;
        let entries = self.read_entries()?;
        Ok(entries
            .get(TOKEN_KEY)
            .map(SessionToken::new)
            .filter(|t| !t.is_empty()))
    }

    fn store(&self, token: &SessionToken) -> Result<(), SlotError> {
        let _guard = self.guard.lock().map_err(|_| SlotError::Unavailable)?;
        let (mut entries, _) = self.entries_for_update()?;
        entries.insert(TOKEN_KEY.to_string(), token.as_str().to_string());
        self.write_entries(&entries)?;
        debug!("Stored token in {}", self.path.display());
        Ok(())
    }

    fn clear(&self) -> Result<(), SlotError> {
        let _guard = self.guard.lock().map_err(|_| SlotError::Unavailable)?;
        let (mut entries, replace) = self.entries_for_update()?;
        if entries.remove(TOKEN_KEY).is_some() || replace {
            self.write_entries(&entries)?;
            debug!("Cleared token from {}", self.path.display());
        }
        Ok(())
    }
}
