use clap::Parser;
use std::process::ExitCode;

use projtools::commands::{stamp, GlobalArgs};
use projtools::output;

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[command(name = "stamp-version")]
#[command(version = VERSION)]
#[command(about = "Stamp a version number and copyright year into Delphi/C++Builder project files")]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(flatten)]
    args: stamp::StampArgs,
}

fn main() -> ExitCode {
    // Usage errors are printed by clap, which exits with status 2.
    let cli = Cli::parse();

    let result = stamp::run(cli.args, &cli.global);
    let (json_result, exit_code) = output::map_cmd_result_to_json(result);
    output::print_json_result(json_result);

    ExitCode::from(output::exit_code_to_u8(exit_code))
}
