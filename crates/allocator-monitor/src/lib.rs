//! Logging setup and text reports.

mod logging;
mod report;

pub use logging::setup_logging;
pub use report::ReportView;
