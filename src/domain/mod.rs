// Domain layer - Log records, aggregation and chart models
pub mod aggregation;
pub mod chart;
pub mod dashboard;
pub mod logs;
pub mod mp_task;
pub mod palette;
pub mod port_diagnostics;
pub mod series;
pub mod time_range;
pub mod week;
