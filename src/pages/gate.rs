//! Client-side access gate. Advisory only: the backend is expected to enforce
//! authorization on every data endpoint on its own.

use crate::router::Route;
use crate::session::{ Role, SessionStore };
use log::{ error, info };

/// The session's role if it matches `required`, otherwise the login route.
pub fn require_role(session: &dyn SessionStore, required: Role) -> Result<Role, Route> {
    match session.read() {
        Some(role) if role == required => Ok(role),
        other => {
            info!(
                "Session {:?} may not open {}, redirecting to {}",
                other,
                Route::dashboard_for(required),
                Route::Login
            );
            Err(Route::Login)
        }
    }
}

pub fn logout(session: &dyn SessionStore) -> Route {
    if let Err(e) = session.clear() {
        error!("Failed to clear session: {}", e);
    }
    Route::Login
}
