use super::{ Role, SessionError, SessionStore };
use std::sync::Mutex;

#[derive(Default)]
pub struct MemorySessionStore {
    role: Mutex<Option<Role>>,
}

impl MemorySessionStore {
    pub fn with_role(role: Role) -> Self {
        Self { role: Mutex::new(Some(role)) }
    }
}

impl SessionStore for MemorySessionStore {
    fn read(&self) -> Option<Role> {
        self.role.lock().ok().and_then(|guard| *guard)
    }

    fn write(&self, role: Role) -> Result<(), SessionError> {
        if let Ok(mut guard) = self.role.lock() {
            *guard = Some(role);
        }
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        if let Ok(mut guard) = self.role.lock() {
            *guard = None;
        }
        Ok(())
    }
}
