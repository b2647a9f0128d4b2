//! Context packing: collect a project tree into one aggregate file, or
//! replay a curated path list into a filtered aggregate.
//!
//! Both pipelines are single-threaded and deterministic. They take an
//! immutable [`Config`](ctxpack_config::Config), send every decision to a
//! [`ReportSink`](ctxpack_utils::report::ReportSink) and return a
//! [`RunSummary`]. Only precondition and output failures abort a run.

mod collect;
mod replay;
mod summary;
mod writer;

pub use collect::collect;
pub use replay::replay;
pub use summary::{RunMode, RunSummary};
pub use writer::{AggregateWriter, PathListWriter, RECORD_DELIMITER, format_record};
