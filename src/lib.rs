//! Machine report: collects host metrics and renders them as a fixed-width
//! box-drawing table.

pub mod cli;
pub mod config;
pub mod debug_log;
pub mod error;
pub mod render;
pub mod report;
pub mod status;

pub use error::{ConfigError, RenderError};
pub use render::{bar_graph, render, Entry, LayoutConfig, MetricRow, ReportBody, UsageRatio};
pub use report::{build_report, render_report, ReportBuilder};
