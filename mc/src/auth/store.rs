//! Saved login record
//!
//! A single serialized user stored under a fixed application key, read once
//! at startup and removed on logout.

use std::fs;
use std::path::{Path, PathBuf};

use eyre::{Context, Result};
use tracing::{debug, info, warn};

use crate::domain::User;

/// Fixed key the login record is stored under
pub const APP_KEY: &str = "edumindcare_user";

pub struct LoginStore {
    path: PathBuf,
}

impl LoginStore {
    /// Store the record as `<dir>/edumindcare_user.json`
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(format!("{}.json", APP_KEY)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the saved user, if any
    ///
    /// An unreadable record is treated as logged out.
    pub fn load(&self) -> Result<Option<User>> {
        debug!(path = %self.path.display(), "LoginStore::load: called");
        if !self.path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&self.path).context("Failed to read login record")?;
        match serde_json::from_str(&content) {
            Ok(user) => Ok(Some(user)),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Ignoring corrupt login record");
                Ok(None)
            }
        }
    }

    pub fn save(&self, user: &User) -> Result<()> {
        debug!(user_id = %user.id, "LoginStore::save: called");
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).context("Failed to create login store directory")?;
        }
        let content = serde_json::to_string_pretty(user)?;
        fs::write(&self.path, content).context("Failed to write login record")?;
        info!(user_id = %user.id, "Login saved");
        Ok(())
    }

    pub fn clear(&self) -> Result<()> {
        debug!("LoginStore::clear: called");
        if self.path.exists() {
            fs::remove_file(&self.path).context("Failed to remove login record")?;
            info!("Login cleared");
        }
        Ok(())
    }
}
