use clap::Parser;
use std::io::Write;
use std::process::ExitCode;

use projtools::commands::{tidy, GlobalArgs};
use projtools::output;

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[command(name = "tidy-proj")]
#[command(version = VERSION)]
#[command(about = "Sort a project file into canonical order and annotate build orders")]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(flatten)]
    args: tidy::TidyArgs,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let raw = cli.args.writes_to_stdout();

    match tidy::run(cli.args, &cli.global) {
        Ok((result, exit_code)) if raw => {
            let mut stdout = std::io::stdout().lock();
            let _ = stdout.write_all(&result.content);
            let _ = stdout.flush();
            ExitCode::from(output::exit_code_to_u8(exit_code))
        }
        result => {
            let (json_result, exit_code) = output::map_cmd_result_to_json(result);
            output::print_json_result(json_result);
            ExitCode::from(output::exit_code_to_u8(exit_code))
        }
    }
}
