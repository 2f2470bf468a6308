use clap::Args;
use std::path::PathBuf;

use crate::defaults::{self, Defaults};

pub mod stamp;
pub mod tidy;

pub use crate::output::CmdResult;

/// Arguments shared by both binaries.
#[derive(Args, Debug, Default, Clone)]
pub struct GlobalArgs {
    /// JSON file overriding the built-in field and tag tables
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

impl GlobalArgs {
    pub fn load_defaults(&self) -> crate::Result<Defaults> {
        defaults::load_defaults(self.config.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_config_uses_built_in_tables() {
        let defaults = GlobalArgs::default().load_defaults().unwrap();
        assert_eq!(defaults.stamp.copyright_key, "LegalCopyright");
    }

    #[test]
    fn unreadable_config_is_reported() {
        let global = GlobalArgs {
            config: Some(PathBuf::from("/nonexistent/projtools.json")),
        };
        let err = global.load_defaults().unwrap_err();
        assert_eq!(err.code.as_str(), "file.access_failed");
    }
}
