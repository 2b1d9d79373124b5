mod file;
mod memory;

pub use file::FileSessionStore;
pub use memory::MemorySessionStore;

use crate::config::ClientConfig;
use log::info;
use serde::{ Deserialize, Serialize };
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;

/// Key the role is persisted under.
pub const SESSION_KEY: &str = "userRole";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Citizen,
    Hospital,
}

#[derive(Debug, PartialEq, Eq)]
pub struct ParseRoleError {
    message: String,
}

impl fmt::Display for ParseRoleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ParseRoleError {}

impl FromStr for Role {
    type Err = ParseRoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "citizen" => Ok(Role::Citizen),
            "hospital" => Ok(Role::Hospital),
            _ =>
                Err(ParseRoleError {
                    message: format!("Invalid role: '{}'", s),
                }),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Citizen => write!(f, "citizen"),
            Role::Hospital => write!(f, "hospital"),
        }
    }
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session file IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("session file JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// The single persisted marker of who is logged in. Pages read it when they
/// mount and never watch it afterwards.
pub trait SessionStore: Send + Sync {
    fn read(&self) -> Option<Role>;

    fn write(&self, role: Role) -> Result<(), SessionError>;

    fn clear(&self) -> Result<(), SessionError>;
}

pub fn create_session_store(config: &ClientConfig) -> Arc<dyn SessionStore> {
    match &config.session_path {
        Some(path) => {
            info!("Session role will be persisted in: {}", path.display());
            Arc::new(FileSessionStore::new(path.clone()))
        }
        None => {
            info!("Session role is kept in memory only");
            Arc::new(MemorySessionStore::default())
        }
    }
}
