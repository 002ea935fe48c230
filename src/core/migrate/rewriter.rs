//! Rewriter: stream a file through the replacement table, then swap it in.
//!
//! 1. Read the target line by line, terminators included
//! 2. Apply the table to each line, recording every line that changed
//! 3. Write the result to `<path>-new` and flush it
//! 4. Rename `<path>-new` over the target
//!
//! Any failure aborts before step 4, so the target is never partially written.

use crate::error::{Error, Result};
use crate::utils::io;
use serde::Serialize;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use super::table::ReplacementTable;

// ============================================================================
// Types
// ============================================================================

/// A line that the table rewrote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineChange {
    /// Line number (0-indexed).
    pub line: usize,
    /// Original content, without its line terminator.
    pub old: String,
    /// Rewritten content, without its line terminator.
    pub new: String,
}

#[derive(Debug, Clone, Default)]
pub struct MigrateOptions {
    /// Report changes without touching the file.
    pub dry_run: bool,
}

/// The full result of migrating one file.
#[derive(Debug, Clone, Serialize)]
pub struct MigrateResult {
    /// Absolute path of the migrated file.
    pub file: PathBuf,
    /// Every changed line, in file order.
    pub changes: Vec<LineChange>,
    /// Whether the file on disk was replaced.
    pub applied: bool,
}

impl MigrateResult {
    pub fn total_changes(&self) -> usize {
        self.changes.len()
    }
}

// ============================================================================
// Streaming rewrite
// ============================================================================

fn strip_terminator(line: &str) -> &str {
    line.trim_end_matches(['\n', '\r'])
}

/// Run every line of `reader` through `table`, writing the result to `writer`.
///
/// Lines are copied byte for byte, terminators included, unless a key
/// matches. `on_change` sees each changed line as soon as it is rewritten,
/// before the line is written. `source` only labels errors.
pub fn rewrite_stream<R, W, F>(
    table: &ReplacementTable,
    mut reader: R,
    mut writer: W,
    source: &Path,
    mut on_change: F,
) -> Result<Vec<LineChange>>
where
    R: BufRead,
    W: Write,
    F: FnMut(&LineChange) -> Result<()>,
{
    let mut changes = Vec::new();
    let mut buf = String::new();
    let mut lineno = 0;

    loop {
        buf.clear();
        let read = reader.read_line(&mut buf).map_err(|e| {
            Error::internal_io(
                e.to_string(),
                Some(format!("read {} line {}", source.display(), lineno)),
            )
        })?;
        if read == 0 {
            break;
        }

        let rewritten = table.apply(&buf);
        if let Some(new) = &rewritten {
            let change = LineChange {
                line: lineno,
                old: strip_terminator(&buf).to_string(),
                new: strip_terminator(new).to_string(),
            };
            on_change(&change)?;
            changes.push(change);
        }

        let out = rewritten.as_deref().unwrap_or(buf.as_str());
        writer.write_all(out.as_bytes()).map_err(|e| {
            Error::internal_io(
                e.to_string(),
                Some(format!("write rewritten {}", source.display())),
            )
        })?;

        lineno += 1;
    }

    Ok(changes)
}

// ============================================================================
// File migration
// ============================================================================

/// Migrate `path` in place with `table`.
///
/// The rewrite goes to `<path>-new`, which is renamed over `path` only
/// after every line has been written and flushed. On failure the scratch
/// file is left where it is and `path` is untouched. Lines reported to
/// `on_change` before a failure stay reported.
pub fn migrate_file<F>(
    path: &Path,
    table: &ReplacementTable,
    options: &MigrateOptions,
    on_change: F,
) -> Result<MigrateResult>
where
    F: FnMut(&LineChange) -> Result<()>,
{
    let file = io::absolute_path(path)?;

    if file.is_dir() {
        return Err(Error::validation_invalid_argument(
            "file",
            format!("{} is a directory", file.display()),
        )
        .with_hint("Pass the path to a single Jenkinsfile"));
    }

    crate::log_status!("migrate", "Rewriting {}", file.display());

    let reader = BufReader::new(io::open_file(&file, &format!("open {}", file.display()))?);

    if options.dry_run {
        let changes = rewrite_stream(table, reader, std::io::sink(), &file, on_change)?;
        crate::log_status!("migrate", "Dry run, leaving {} untouched", file.display());
        return Ok(MigrateResult {
            file,
            changes,
            applied: false,
        });
    }

    let tmp_path = io::temp_sibling_path(&file)?;
    let changes = {
        let out = io::create_file(&tmp_path, &format!("create {}", tmp_path.display()))?;
        let mut writer = BufWriter::new(out);
        let changes = rewrite_stream(table, reader, &mut writer, &file, on_change)?;
        writer.flush().map_err(|e| {
            Error::internal_io(e.to_string(), Some(format!("flush {}", tmp_path.display())))
        })?;
        changes
    };

    io::replace_atomic(&tmp_path, &file)?;

    crate::log_status!("migrate", "{} line(s) changed", changes.len());

    Ok(MigrateResult {
        file,
        changes,
        applied: true,
    })
}

// ============================================================================
// Tests
// ============================================================================
