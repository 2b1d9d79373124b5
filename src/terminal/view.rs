//! Page renderers. Each returns the lines to print; nothing here talks to the
//! network.

use crate::chat::ChatWidget;
use crate::map::{ legend, FacilityMap, MapState, MarkerKind, ATTRIBUTION };
use crate::markdown::render_markdown;
use crate::pages::citizen::{ CitizenDashboard, LocationCard };
use crate::pages::hospital::HospitalDashboard;
use crate::pages::landing::{ self, LandingPage };
use crate::pages::login::LoginPage;
use crate::pages::Page;

const RESET: &str = "\x1b[0m";

pub fn render_page(page: &Page, ansi: bool) -> Vec<String> {
    match page {
        Page::Landing(page) => render_landing(page, ansi),
        Page::Login(page) => render_login(page),
        Page::Citizen(page) => render_citizen(page, ansi),
        Page::Hospital(page) => render_hospital(page, ansi),
    }
}

fn heading(title: &str) -> Vec<String> {
    vec![String::new(), title.to_string(), "=".repeat(title.chars().count())]
}

pub fn render_landing(page: &LandingPage, ansi: bool) -> Vec<String> {
    let mut lines = heading(landing::TITLE);
    lines.push(landing::TAGLINE.to_string());
    lines.push(String::new());
    for (title, description) in landing::SERVICES {
        lines.push(format!("  * {}: {}", title, description));
    }
    lines.push(String::new());
    lines.push(format!("{} (go /login to get started)", landing::CALL_TO_ACTION));
    lines.push(landing::FOOTER.to_string());
    lines.push(String::new());
    if page.is_chat_open() {
        lines.push("-- Quick Wellness Tips --".to_string());
        lines.extend(render_chat(page.chat(), ansi));
    } else {
        lines.push("[chat] Type 'chat' or 'ask <question>' for quick wellness tips.".to_string());
    }
    lines
}

pub fn render_login(page: &LoginPage) -> Vec<String> {
    let mut lines = heading("Login");
    lines.push("login <email> <password>".to_string());
    if let Some(message) = page.message() {
        lines.push(message.to_string());
    }
    lines
}

pub fn render_citizen(page: &CitizenDashboard, ansi: bool) -> Vec<String> {
    let mut lines = heading("Citizen Dashboard");
    lines.push("Your comprehensive health companion".to_string());
    lines.push(String::new());

    lines.push("Your Live Location".to_string());
    match page.location() {
        LocationCard::Locating => lines.push("  Getting your location...".to_string()),
        LocationCard::Known { coords, locality } => {
            lines.push(format!("  City: {}", locality));
            lines.push(format!("  Coordinates: {}", coords));
        }
        LocationCard::Failed(kind) => lines.push(format!("  {}", kind)),
    }

    lines.push(String::new());
    lines.push("Current Weather".to_string());
    match page.weather() {
        Some(weather) => lines.push(format!("  {}", weather)),
        None => lines.push("  Weather not available".to_string()),
    }

    lines.push(String::new());
    lines.push("Nearby Medical Facilities".to_string());
    lines.extend(render_map(page.map(), ansi));

    lines.push(String::new());
    lines.push("Ask Your Health Assistant".to_string());
    lines.extend(render_chat(page.chat(), ansi));
    lines
}

pub fn render_hospital(page: &HospitalDashboard, ansi: bool) -> Vec<String> {
    let mut lines = heading("Hospital Dashboard");
    lines.push("Nearby Medical Facilities".to_string());
    lines.extend(render_map(page.map(), ansi));
    lines
}

pub fn render_map(map: &FacilityMap, ansi: bool) -> Vec<String> {
    let view = match map.state() {
        MapState::Loading => {
            return vec!["  Loading map and nearby medical facilities...".to_string()];
        }
        MapState::Error(kind) => {
            return vec![format!("  {}", kind)];
        }
        MapState::Ready(view) => view,
    };

    let mut lines = vec![
        format!("  Centered on {} at zoom {}", view.center(), view.zoom()),
        format!("  Tile: {}", view.center_tile_url())
    ];
    for marker in view.markers() {
        let dot = if ansi {
            format!("{}●{}", marker.color.ansi(), RESET)
        } else {
            format!("({})", marker.color.hex())
        };
        match &marker.kind {
            MarkerKind::User => lines.push(format!("  {} {} [{}]", dot, marker.title, marker.position)),
            MarkerKind::Facility(_) =>
                lines.push(format!("  {} {} [{}]", dot, marker.popup.join(" | "), marker.position)),
        }
    }
    if view.places().is_empty() {
        lines.push("  No medical facilities found nearby".to_string());
    }
    let legend: Vec<String> = legend()
        .iter()
        .map(|(color, label)| format!("{} {}", color.hex(), label))
        .collect();
    lines.push(format!("  Legend: {}", legend.join(", ")));
    lines.push(format!("  {}", ATTRIBUTION));
    lines
}

pub fn render_chat(chat: &ChatWidget, ansi: bool) -> Vec<String> {
    let variant = chat.variant();
    let mut lines = Vec::new();

    if let Some(notice) = chat.location_notice_text() {
        lines.push(format!("  ! {}", notice));
    } else if chat.location().is_some() {
        lines.push("  Location-aware health guidance enabled".to_string());
    }

    let history = chat.history();
    if history.is_empty() {
        lines.push(format!("  {}", variant.greeting()));
    }
    for message in &history {
        if message.is_user() {
            lines.push(format!("  You: {}", message.content));
        } else if variant.renders_markdown() {
            lines.push("  Assistant:".to_string());
            lines.extend(
                render_markdown(&message.content, ansi)
                    .into_iter()
                    .map(|line| format!("    {}", line))
            );
        } else {
            lines.push(format!("  Assistant: {}", message.content));
        }
    }
    if chat.is_pending() {
        lines.push(format!("  {}", variant.thinking_text()));
    }
    if let Some(disclaimer) = variant.disclaimer() {
        lines.push(format!("  {}", disclaimer));
    }
    lines
}
