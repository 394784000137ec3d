// Application layer - Use cases on top of the Canvas API
pub mod canvas_api;
pub mod coordinator;
pub mod sensor_service;
pub mod setup_flow;

#[cfg(test)]
pub mod fake_api;
