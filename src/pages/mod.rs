pub mod citizen;
pub mod gate;
pub mod hospital;
pub mod landing;
pub mod login;

use crate::chat::ChatWidget;
use crate::context::AppContext;
use crate::router::Route;
use citizen::CitizenDashboard;
use hospital::HospitalDashboard;
use landing::LandingPage;
use login::LoginPage;

pub enum Page {
    Landing(LandingPage),
    Login(LoginPage),
    Citizen(CitizenDashboard),
    Hospital(HospitalDashboard),
}

/// Result of opening a route: either the page, or where the access gate sent
/// the user instead.
pub enum Opened {
    Page(Page),
    Redirect(Route),
}

/// Builds the page for `route`. Dashboards check the session here, before
/// anything is fetched.
pub fn open(route: Route, ctx: &AppContext) -> Opened {
    match route {
        Route::Landing => Opened::Page(Page::Landing(LandingPage::new(ctx))),
        Route::Login => Opened::Page(Page::Login(LoginPage::new())),
        Route::Citizen =>
            match CitizenDashboard::open(ctx) {
                Ok(page) => Opened::Page(Page::Citizen(page)),
                Err(redirect) => Opened::Redirect(redirect),
            }
        Route::Hospital =>
            match HospitalDashboard::open(ctx) {
                Ok(page) => Opened::Page(Page::Hospital(page)),
                Err(redirect) => Opened::Redirect(redirect),
            }
    }
}

impl Page {
    pub fn route(&self) -> Route {
        match self {
            Page::Landing(_) => Route::Landing,
            Page::Login(_) => Route::Login,
            Page::Citizen(_) => Route::Citizen,
            Page::Hospital(_) => Route::Hospital,
        }
    }

    /// Runs the page's one-time fetches.
    pub async fn load(&mut self, ctx: &AppContext) {
        match self {
            Page::Citizen(page) => page.load(ctx).await,
            Page::Hospital(page) => page.load().await,
            Page::Landing(_) | Page::Login(_) => {}
        }
    }

    /// The assistant a question on this page goes to. Asking on the landing
    /// page opens its bubble first.
    pub fn chat_for_input(&mut self) -> Option<ChatWidget> {
        match self {
            Page::Landing(page) => {
                page.open_chat();
                Some(page.chat().clone())
            }
            Page::Citizen(page) => Some(page.chat().clone()),
            Page::Login(_) | Page::Hospital(_) => None,
        }
    }

    pub fn unmount(&self) {
        match self {
            Page::Landing(page) => page.unmount(),
            Page::Citizen(page) => page.unmount(),
            Page::Hospital(page) => page.unmount(),
            Page::Login(_) => {}
        }
    }
}
