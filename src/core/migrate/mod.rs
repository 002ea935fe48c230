//! Jenkinsfile migration: insights-pipeline-lib v2 → v3.
//!
//! Streams a file through an ordered replacement table and atomically
//! swaps the result in place of the original.

mod rewriter;
mod table;

pub use rewriter::{migrate_file, rewrite_stream, LineChange, MigrateOptions, MigrateResult};
pub use table::{Replacement, ReplacementTable};
