//! Per-metric pipelines and the coordinator that feeds them.
//!
//! Each tick the [`Monitor`] polls a [`SensorProvider`](telemon_core::SensorProvider),
//! reads every bound sensor role, and hands one optional value to each
//! [`MetricPipeline`], which records it and redraws its chart.

pub mod extract;
pub mod metric;
pub mod monitor;
pub mod notify;
pub mod pipeline;

pub use extract::{extract, memory_percentage};
pub use metric::MetricId;
pub use monitor::{Monitor, TickReport, NOTIFY_SUMMARY};
pub use notify::{LogNotifier, Notifier};
pub use pipeline::{ChartSettings, MetricPipeline, Outcome, SharedTitle, TitleLabel};
