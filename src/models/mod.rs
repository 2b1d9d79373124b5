pub mod api;
pub mod chat;
pub mod place;
pub mod weather;
