use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

use pipeline_migrate::migrate::{self, LineChange, MigrateOptions, Replacement, ReplacementTable};
use pipeline_migrate::Error;

use crate::commands::CmdResult;

#[derive(Args, Debug, Default)]
pub struct MigrateArgs {
    /// Jenkinsfile to migrate in place
    #[arg(value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Report changes without writing the file
    #[arg(long)]
    pub dry_run: bool,

    /// Print the replacement table and exit (takes no FILE)
    #[arg(long)]
    pub list: bool,
}

#[derive(Serialize)]
#[serde(tag = "command")]
pub enum MigrateOutput {
    #[serde(rename = "migrate")]
    Migrate {
        file: String,
        dry_run: bool,
        applied: bool,
        total_changes: usize,
        changes: Vec<LineChange>,
    },
    #[serde(rename = "migrate.list")]
    List { replacements: Vec<Replacement> },
}

/// Run the migration. `on_change` is called for each changed line as the
/// file is scanned, ahead of the final output.
pub fn run<F>(args: &MigrateArgs, on_change: F) -> CmdResult<MigrateOutput>
where
    F: FnMut(&LineChange) -> pipeline_migrate::Result<()>,
{
    let table = ReplacementTable::v3();

    if args.list {
        if let Some(file) = &args.file {
            return Err(Error::validation_invalid_argument(
                "list",
                format!("--list takes no FILE, got {}", file.display()),
            )
            .with_hint("Run --list on its own to print the replacement table"));
        }
        return Ok((
            MigrateOutput::List {
                replacements: table.entries().to_vec(),
            },
            0,
        ));
    }

    let file = args
        .file
        .as_deref()
        .ok_or_else(|| Error::validation_missing_argument(vec!["file".to_string()]))?;

    let options = MigrateOptions {
        dry_run: args.dry_run,
    };
    let result = migrate::migrate_file(file, &table, &options, on_change)?;
    let total_changes = result.total_changes();

    Ok((
        MigrateOutput::Migrate {
            file: result.file.display().to_string(),
            dry_run: args.dry_run,
            applied: result.applied,
            total_changes,
            changes: result.changes,
        },
        0,
    ))
}
