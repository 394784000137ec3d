// Infrastructure layer - External dependencies and adapters
pub mod canvas_client;
pub mod config;
