//! Converts a test runner's result tree into a CTRF (Common Test Report Format)
//! JSON report.
//!
//! - [`tree`]: the suite/test forest a runner hands over at session end
//! - [`status`]: total mapping from runner state tokens to normalized statuses
//! - [`aggregator`]: depth-first walk that builds the summary and the flat test list
//! - [`report`]: summary counters, JSON writer, console summary
//! - [`reporter`]: lifecycle adapter (`on_init` / `on_finished`) for host runners
//!
//! # Quick Start
//!
//! ```no_run
//! use ctrf_core::{Aggregator, ReporterOptions, ReportWriter, TaskNode};
//! use ctrf_core::tree::{SuiteTask, TestTask};
//!
//! let options = ReporterOptions::default();
//! let mut agg = Aggregator::new(&options);
//! agg.begin();
//! agg.ingest(&[TaskNode::from(SuiteTask::new(
//!     "math",
//!     vec![TestTask::new("adds").with_state("pass").with_duration(5.0).into()],
//! ))]);
//! agg.finish();
//!
//! let report = agg.into_report();
//! ReportWriter::from_options(&options).persist(&report);
//! ```

pub mod aggregator;
pub mod config;
pub mod errors;
pub mod failure;
pub mod model;
pub mod report;
pub mod reporter;
pub mod status;
pub mod tree;

pub use aggregator::Aggregator;
pub use config::ReporterOptions;
pub use errors::CtrfError;
pub use model::{CtrfReport, CtrfTest, Environment};
pub use report::{ReportWriter, Summary};
pub use reporter::{CtrfReporter, Reporter};
pub use status::{map_status, TestState};
pub use tree::{RunnerOutput, TaskNode};
