use clap::Args;
use std::path::PathBuf;

use crate::stamp::{self, StampResult};

use super::{CmdResult, GlobalArgs};

#[derive(Args, Debug)]
pub struct StampArgs {
    /// New version in major.minor.release form (e.g. 2.4.1)
    pub version: String,

    /// Project files (.dproj, .cbproj) or group files (.groupproj) to update
    #[arg(required = true, num_args = 1.., value_name = "PROJECT_FILE")]
    pub project_files: Vec<PathBuf>,
}

pub fn run(args: StampArgs, global: &GlobalArgs) -> CmdResult<StampResult> {
    let defaults = global.load_defaults()?;
    let result = stamp::stamp_version(&args.version, &args.project_files, &defaults)?;

    crate::log_status!(
        "stamp",
        "Stamped {} into {} file(s)",
        result.version,
        result.files.len()
    );

    Ok((result, 0))
}
