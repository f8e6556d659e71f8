// Application layer - Use cases over the log repository
pub mod batch_fetch;
pub mod chart_panel;
#[cfg(test)]
pub mod fake_repository;
pub mod log_repository;
pub mod mp_service;
pub mod port_diagnostics_service;
pub mod switch_tool_service;
