//! File output for reports.

pub mod export;
