use super::{ Role, SessionError, SessionStore, SESSION_KEY };
use log::{ debug, warn };
use serde_json::{ Map, Value as JsonValue };
use std::fs;
use std::path::PathBuf;

/// Key/value JSON file standing in for browser local storage. Other keys in
/// the file are left untouched.
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    fn load(&self) -> Result<Map<String, JsonValue>, SessionError> {
        if !self.path.exists() {
            return Ok(Map::new());
        }
        let text = fs::read_to_string(&self.path)?;
        if text.trim().is_empty() {
            return Ok(Map::new());
        }
        match serde_json::from_str::<JsonValue>(&text)? {
            JsonValue::Object(map) => Ok(map),
            _ => Ok(Map::new()),
        }
    }

    fn save(&self, map: &Map<String, JsonValue>) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.path, serde_json::to_string_pretty(map)?)?;
        Ok(())
    }
}

impl SessionStore for FileSessionStore {
    fn read(&self) -> Option<Role> {
        let map = match self.load() {
            Ok(map) => map,
            Err(e) => {
                warn!("Could not read session file {}: {}", self.path.display(), e);
                return None;
            }
        };
        let raw = map.get(SESSION_KEY)?.as_str()?;
        match raw.parse::<Role>() {
            Ok(role) => Some(role),
            Err(e) => {
                debug!("Ignoring stored session value: {}", e);
                None
            }
        }
    }

    fn write(&self, role: Role) -> Result<(), SessionError> {
        let mut map = self.load().unwrap_or_default();
        map.insert(SESSION_KEY.to_string(), JsonValue::String(role.to_string()));
        self.save(&map)
    }

    fn clear(&self) -> Result<(), SessionError> {
        let mut map = self.load().unwrap_or_default();
        if map.remove(SESSION_KEY).is_some() {
            self.save(&map)?;
        }
        Ok(())
    }
}
