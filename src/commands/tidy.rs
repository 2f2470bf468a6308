use clap::Args;
use std::path::PathBuf;

use crate::tidy::{self, TidyResult};

use super::{CmdResult, GlobalArgs};

#[derive(Args, Debug)]
pub struct TidyArgs {
    /// Project file to tidy
    pub input: PathBuf,

    /// Where to write the result (default: standard output)
    pub output: Option<PathBuf>,
}

impl TidyArgs {
    /// Raw XML goes to stdout when no output file is named.
    pub fn writes_to_stdout(&self) -> bool {
        self.output.is_none()
    }
}

pub fn run(args: TidyArgs, global: &GlobalArgs) -> CmdResult<TidyResult> {
    let defaults = global.load_defaults()?;
    let result = tidy::tidy_file(&args.input, args.output.as_deref(), &defaults)?;
    Ok((result, 0))
}
