// Presentation layer - HTTP endpoints exposing sensor state
pub mod app_state;
pub mod handlers;
