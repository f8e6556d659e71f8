// Infrastructure layer - External dependencies and adapters
pub mod chart_mapper;
pub mod config;
pub mod http_log_repository;
pub mod http_response;
