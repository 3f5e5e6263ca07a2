//! EQ profile storage
//!
//! KEF speakers expose their EQ configuration as an opaque
//! `kefEqProfileV2` document. This module saves those documents as
//! JSON files with a little metadata so a tuning can be named,
//! restored, and moved between speakers. Plain local CRUD; nothing
//! here talks to the device or touches the polling core.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// The key a device EQ document must carry to be saveable
const EQ_PROFILE_KEY: &str = "kefEqProfileV2";

#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("profile '{0}' not found")]
    NotFound(String),

    #[error("profile '{0}' already exists")]
    AlreadyExists(String),

    #[error("profile name must contain at least one usable character")]
    InvalidName,

    #[error("profile data must contain '{EQ_PROFILE_KEY}'")]
    MissingEqData,

    #[error("no home directory available to store profiles in")]
    NoHomeDir,

    #[error("profile file corrupted: {0}")]
    Corrupt(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// The on-disk document, one file per profile
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ProfileFile {
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    speaker_model: String,
    created_at: String,
    modified_at: String,
    profile_data: Value,
}

/// Profile metadata without the EQ payload
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileInfo {
    pub name: String,
    pub description: String,
    pub speaker_model: String,
    pub created_at: String,
    pub modified_at: String,
}

impl From<&ProfileFile> for ProfileInfo {
    fn from(file: &ProfileFile) -> Self {
        Self {
            name: file.name.clone(),
            description: file.description.clone(),
            speaker_model: file.speaker_model.clone(),
            created_at: file.created_at.clone(),
            modified_at: file.modified_at.clone(),
        }
    }
}

/// File-backed store for named EQ profiles
#[derive(Debug, Clone)]
pub struct ProfileStore {
    dir: PathBuf,
}

impl ProfileStore {
    /// Open the default store at `~/.kef_profiles`, creating it if needed
    pub fn new() -> Result<Self, ProfileError> {
        let home = dirs::home_dir().ok_or(ProfileError::NoHomeDir)?;
        Self::with_dir(home.join(".kef_profiles"))
    }

    /// Open a store at an explicit directory, creating it if needed
    pub fn with_dir(dir: impl Into<PathBuf>) -> Result<Self, ProfileError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Save an EQ profile, overwriting an existing one of the same name
    ///
    /// `profile_data` must carry the device's `kefEqProfileV2` key.
    /// Re-saving keeps the original creation stamp.
    pub fn save(
        &self,
        name: &str,
        profile_data: &Value,
        description: &str,
        speaker_model: &str,
    ) -> Result<PathBuf, ProfileError> {
        if profile_data.get(EQ_PROFILE_KEY).is_none() {
            return Err(ProfileError::MissingEqData);
        }

        let path = self.profile_path(name)?;
        let now = chrono::Utc::now().to_rfc3339();

        // Preserve the creation stamp when overwriting.
        let created_at = read_profile(&path)
            .ok()
            .map(|existing| existing.created_at)
            .unwrap_or_else(|| now.clone());

        let file = ProfileFile {
            name: name.to_string(),
            description: description.to_string(),
            speaker_model: speaker_model.to_string(),
            created_at,
            modified_at: now,
            profile_data: profile_data.clone(),
        };

        write_profile(&path, &file)?;
        tracing::debug!(name, path = %path.display(), "saved EQ profile");
        Ok(path)
    }

    /// Load a profile's EQ payload, ready to write back to a device
    pub fn load(&self, name: &str) -> Result<Value, ProfileError> {
        let path = self.profile_path(name)?;
        if !path.exists() {
            return Err(ProfileError::NotFound(name.to_string()));
        }
        Ok(read_profile(&path)?.profile_data)
    }

    /// Profile metadata without loading the payload into the caller
    pub fn info(&self, name: &str) -> Result<ProfileInfo, ProfileError> {
        let path = self.profile_path(name)?;
        if !path.exists() {
            return Err(ProfileError::NotFound(name.to_string()));
        }
        Ok(ProfileInfo::from(&read_profile(&path)?))
    }

    /// All saved profiles, newest modification first
    ///
    /// Files that fail to parse are skipped; `load` on them still
    /// reports the corruption loudly.
    pub fn list(&self) -> Result<Vec<ProfileInfo>, ProfileError> {
        let mut profiles = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            match read_profile(&path) {
                Ok(file) => profiles.push(ProfileInfo::from(&file)),
                Err(err) => tracing::warn!(path = %path.display(), %err, "skipping unreadable profile"),
            }
        }
        // RFC 3339 stamps in UTC sort lexicographically.
        profiles.sort_by(|a, b| b.modified_at.cmp(&a.modified_at));
        Ok(profiles)
    }

    /// Delete a profile; `Ok(false)` if it did not exist
    pub fn delete(&self, name: &str) -> Result<bool, ProfileError> {
        let path = self.profile_path(name)?;
        if !path.exists() {
            return Ok(false);
        }
        fs::remove_file(path)?;
        Ok(true)
    }

    /// Rename a profile, keeping its payload and creation stamp
    pub fn rename(&self, old_name: &str, new_name: &str) -> Result<(), ProfileError> {
        let old_path = self.profile_path(old_name)?;
        let new_path = self.profile_path(new_name)?;

        if !old_path.exists() {
            return Err(ProfileError::NotFound(old_name.to_string()));
        }
        if new_path.exists() {
            return Err(ProfileError::AlreadyExists(new_name.to_string()));
        }

        let mut file = read_profile(&old_path)?;
        file.name = new_name.to_string();
        file.modified_at = chrono::Utc::now().to_rfc3339();

        write_profile(&new_path, &file)?;
        fs::remove_file(old_path)?;
        Ok(())
    }

    pub fn exists(&self, name: &str) -> bool {
        self.profile_path(name)
            .map(|path| path.exists())
            .unwrap_or(false)
    }

    /// Number of saved profiles
    pub fn count(&self) -> Result<usize, ProfileError> {
        let mut count = 0;
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) == Some("json") {
                count += 1;
            }
        }
        Ok(count)
    }

    fn profile_path(&self, name: &str) -> Result<PathBuf, ProfileError> {
        let safe: String = name
            .chars()
            .filter(|c| c.is_alphanumeric() || matches!(c, ' ' | '-' | '_'))
            .collect();
        let safe = safe.trim().replace(' ', "_");
        if safe.is_empty() {
            return Err(ProfileError::InvalidName);
        }
        Ok(self.dir.join(format!("{safe}.json")))
    }
}

fn read_profile(path: &Path) -> Result<ProfileFile, ProfileError> {
    let raw = fs::read_to_string(path)?;
    serde_json::from_str(&raw).map_err(|err| ProfileError::Corrupt(err.to_string()))
}

fn write_profile(path: &Path, file: &ProfileFile) -> Result<(), ProfileError> {
    let raw = serde_json::to_string_pretty(file)
        .map_err(|err| ProfileError::Corrupt(err.to_string()))?;
    fs::write(path, raw)?;
    Ok(())
}
