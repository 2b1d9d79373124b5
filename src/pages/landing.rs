use crate::chat::{ ChatWidget, SendOutcome };
use crate::context::AppContext;
use crate::router::Route;

pub const TITLE: &str = "SurgeSense";
pub const TAGLINE: &str =
    "Your intelligent health companion providing instant medical guidance and location-based healthcare services";
pub const SERVICES: [(&str, &str); 3] = [
    ("AI Health Assistant", "Get instant wellness tips and health guidance"),
    ("Nearby Facilities", "Locate nearby hospitals, clinics, and pharmacies"),
    ("Weather-Aware Advice", "Health advice tailored to current weather conditions"),
];
pub const CALL_TO_ACTION: &str =
    "Try our quick wellness chatbot or login for comprehensive health guidance";
pub const FOOTER: &str =
    "SurgeSense provides AI-powered health guidance, location-based medical facility search, and weather-aware wellness recommendations.";

/// Public front page with the floating wellness chat.
pub struct LandingPage {
    chat: ChatWidget,
    chat_open: bool,
}

impl LandingPage {
    pub fn new(ctx: &AppContext) -> Self {
        Self {
            chat: ChatWidget::landing(
                ctx.backend.clone(),
                ctx.geolocator.clone(),
                ctx.config.landing_location_timeout
            ),
            chat_open: false,
        }
    }

    pub fn chat(&self) -> &ChatWidget {
        &self.chat
    }

    pub fn is_chat_open(&self) -> bool {
        self.chat_open
    }

    /// Opens or closes the bubble. History survives closing; only leaving the
    /// page drops it.
    pub fn toggle_chat(&mut self) -> bool {
        self.chat_open = !self.chat_open;
        self.chat_open
    }

    pub fn open_chat(&mut self) {
        self.chat_open = true;
    }

    pub async fn ask(&mut self, text: &str) -> SendOutcome {
        self.open_chat();
        self.chat.send_message(text).await
    }

    pub fn get_started(&self) -> Route {
        Route::Login
    }

    pub fn unmount(&self) {
        self.chat.unmount();
    }
}
