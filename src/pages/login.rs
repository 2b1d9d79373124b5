use crate::context::AppContext;
use crate::error::ErrorKind;
use crate::models::api::LoginRequest;
use crate::router::Route;
use crate::session::Role;
use log::{ error, info, warn };

#[derive(Debug, Default)]
pub struct LoginPage {
    message: Option<String>,
}

impl LoginPage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// One attempt per call. Returns the dashboard to navigate to when the
    /// backend accepted the credentials and named a known role; on anything
    /// else the session is left alone.
    pub async fn submit(&mut self, ctx: &AppContext, email: &str, password: &str) -> Option<Route> {
        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };

        let reply = match ctx.backend.login(&request).await {
            Ok(reply) => reply,
            Err(e) => {
                let kind = match e.kind() {
                    ErrorKind::BackendRejected => ErrorKind::InvalidCredentials,
                    _ => ErrorKind::LoginFailed,
                };
                if kind == ErrorKind::LoginFailed {
                    error!("Login error: {}", e);
                } else {
                    info!("Login refused: {}", e);
                }
                self.message = Some(kind.user_message().to_string());
                return None;
            }
        };

        let role = match reply.role.as_deref().map(str::parse::<Role>) {
            Some(Ok(role)) => role,
            other => {
                warn!("Login succeeded without a usable role: {:?}", other);
                self.message = Some(ErrorKind::LoginFailed.user_message().to_string());
                return None;
            }
        };

        if let Err(e) = ctx.session.write(role) {
            error!("Failed to persist session: {}", e);
            self.message = Some(ErrorKind::LoginFailed.user_message().to_string());
            return None;
        }

        info!("Logged in as {}", role);
        self.message = Some(
            reply.message.unwrap_or_else(|| format!("Successfully logged in as {}", role))
        );
        Some(Route::dashboard_for(role))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::fake::{ login_reply, FakeBackend, Scripted };
    use crate::testing::context_with;
    use std::sync::Arc;

    #[tokio::test]
    async fn citizen_login_persists_role_and_routes_to_dashboard() {
        let backend = Arc::new(FakeBackend::default());
        backend.set_login(Scripted::Ok(login_reply("citizen"))).await;
        let ctx = context_with(backend.clone(), None);

        let mut page = LoginPage::new();
        let next = page.submit(&ctx, "citizen@manuals", "1234").await;

        assert_eq!(next, Some(Route::Citizen));
        assert_eq!(ctx.session.read(), Some(Role::Citizen));
        assert_eq!(page.message(), Some("Successfully logged in as citizen"));
        assert_eq!(backend.logins.lock().await[0].email, "citizen@manuals");
    }

    #[tokio::test]
    async fn hospital_login_routes_to_hospital() {
        let backend = Arc::new(FakeBackend::default());
        backend.set_login(Scripted::Ok(login_reply("hospital"))).await;
        let ctx = context_with(backend, None);
        let next = LoginPage::new().submit(&ctx, "hospital@manuals", "9999").await;
        assert_eq!(next, Some(Route::Hospital));
        assert_eq!(ctx.session.read(), Some(Role::Hospital));
    }

    #[tokio::test]
    async fn rejected_login_changes_nothing() {
        let backend = Arc::new(FakeBackend::default());
        backend.set_login(Scripted::Rejected("Invalid email or password".into())).await;
        let ctx = context_with(backend, None);

        let mut page = LoginPage::new();
        assert_eq!(page.submit(&ctx, "who@where", "nope").await, None);
        assert_eq!(page.message(), Some("Invalid credentials"));
        assert_eq!(ctx.session.read(), None);
    }

    #[tokio::test]
    async fn transport_failure_and_unknown_role_are_generic_failures() {
        let backend = Arc::new(FakeBackend::default());
        backend.set_login(Scripted::Unreachable).await;
        let ctx = context_with(backend.clone(), None);
        let mut page = LoginPage::new();
        assert_eq!(page.submit(&ctx, "a", "b").await, None);
        assert_eq!(page.message(), Some("Something went wrong"));

        backend.set_login(Scripted::Ok(login_reply("admin"))).await;
        assert_eq!(page.submit(&ctx, "a", "b").await, None);
        assert_eq!(ctx.session.read(), None);
    }
}
