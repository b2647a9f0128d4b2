//! Foundation utilities for ctxpack: errors, exit codes, logging, decoding,
//! path helpers and the report sink.

pub mod decode;
pub mod error;
pub mod exit_codes;
pub mod logging;
pub mod paths;
pub mod report;
