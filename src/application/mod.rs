// Application layer - Use cases and ports
pub mod chart_service;
pub mod reach_source;
