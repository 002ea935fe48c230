use clap::Parser;

mod commands;
mod output;

use commands::migrate::{self, MigrateArgs};

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Migrate a Jenkinsfile from insights-pipeline-lib v2 to v3, in place.
///
/// The file is overwritten. Take a backup or make sure it is under
/// version control first.
#[derive(Parser)]
#[command(name = "pipeline-migrate")]
#[command(version = VERSION)]
struct Cli {
    #[command(flatten)]
    args: MigrateArgs,

    /// Print a JSON envelope instead of the text log
    #[arg(long)]
    json: bool,
}

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();

    let exit_code = if cli.json {
        let result = migrate::run(&cli.args, |_| Ok(()));
        let (json_result, exit_code) = output::map_cmd_result_to_json(result);
        match output::print_json_result(json_result) {
            Ok(()) => exit_code,
            Err(err) => {
                eprintln!("Error: {}", err);
                1
            }
        }
    } else {
        let result = migrate::run(&cli.args, output::print_change);
        output::print_text_result(result)
    };

    std::process::ExitCode::from(exit_code_to_u8(exit_code))
}

fn exit_code_to_u8(code: i32) -> u8 {
    if code <= 0 {
        0
    } else if code >= 255 {
        255
    } else {
        code as u8
    }
}
