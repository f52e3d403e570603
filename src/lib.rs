// src/lib.rs
pub mod aggregate;
pub mod classify;
pub mod error;
pub mod render;

pub use aggregate::{aggregate_lines, process_file, ConnectionSeries, FileAggregate, ProcessingStats};
pub use classify::{classify, LogEvent, Schema, DEFAULT_CONNECTION_KEY};
pub use error::{ProcessingError, RenderError};
pub use render::{ChartRenderer, CharmingRenderer, ChartSpec, Curve, CWND_CHART};
