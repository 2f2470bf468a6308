use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Error, Result};
use crate::utils::{io, validation};

/// Root configuration structure for an optional `--config` JSON file.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ToolConfig {
    #[serde(default)]
    pub defaults: Defaults,
}

/// Lookup tables driving both tools. Every table can be overridden via config.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Defaults {
    #[serde(default = "default_stamp")]
    pub stamp: StampConfig,

    #[serde(default = "default_tidy")]
    pub tidy: TidyConfig,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            stamp: default_stamp(),
            tidy: default_tidy(),
        }
    }
}

/// Field and tag names recognized by the version stamper
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StampConfig {
    /// Keys holding the full dotted version (`FileVersion=1.2.3.0`).
    #[serde(default = "default_composite_keys")]
    pub composite_keys: Vec<String>,

    #[serde(default = "default_copyright_key")]
    pub copyright_key: String,

    /// Element whose body may carry `VerInfo_*` fields.
    #[serde(default = "default_block_tag")]
    pub block_tag: String,

    /// Element that references a member project from a group file.
    #[serde(default = "default_group_include_tag")]
    pub group_include_tag: String,
}

/// Configuration for project file tidying
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TidyConfig {
    /// ItemGroup child ordering; unknown kinds sort last.
    #[serde(default = "default_item_order")]
    pub item_order: Vec<String>,

    #[serde(default = "default_build_order_tag")]
    pub build_order_tag: String,
}

// =============================================================================
// Default value functions
// =============================================================================

fn default_stamp() -> StampConfig {
    StampConfig {
        composite_keys: default_composite_keys(),
        copyright_key: default_copyright_key(),
        block_tag: default_block_tag(),
        group_include_tag: default_group_include_tag(),
    }
}

fn default_composite_keys() -> Vec<String> {
    vec!["FileVersion".to_string(), "ProductVersion".to_string()]
}

fn default_copyright_key() -> String {
    "LegalCopyright".to_string()
}

fn default_block_tag() -> String {
    "PropertyGroup".to_string()
}

fn default_group_include_tag() -> String {
    "Projects".to_string()
}

fn default_tidy() -> TidyConfig {
    TidyConfig {
        item_order: default_item_order(),
        build_order_tag: default_build_order_tag(),
    }
}

fn default_item_order() -> Vec<String> {
    [
        "None",
        "ResFiles",
        "LibFiles",
        "CppCompile",
        "DelphiCompile",
        "ResourceCompile",
        "FormResources",
        "BuildConfiguration",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_build_order_tag() -> String {
    "BuildOrder".to_string()
}

/// Load defaults, merging an optional JSON config file over the built-in tables.
pub fn load_defaults(config_path: Option<&Path>) -> Result<Defaults> {
    let Some(path) = config_path else {
        return Ok(Defaults::default());
    };

    let content = io::read_file(path, "read config")?;
    let config: ToolConfig = serde_json::from_str(&content)
        .map_err(|e| Error::config_invalid_json(path.display().to_string(), e))?;

    config.defaults.validate()?;
    Ok(config.defaults)
}

impl Defaults {
    /// Reject tables that would produce patterns matching nothing useful.
    pub fn validate(&self) -> Result<()> {
        let stamp = &self.stamp;
        validation::require_non_empty(
            &stamp.copyright_key,
            "stamp.copyright_key",
            "Copyright key cannot be empty",
        )?;
        validation::require_non_empty(
            &stamp.block_tag,
            "stamp.block_tag",
            "Block tag cannot be empty",
        )?;
        validation::require_non_empty(
            &stamp.group_include_tag,
            "stamp.group_include_tag",
            "Group include tag cannot be empty",
        )?;
        for key in &stamp.composite_keys {
            validation::require_non_empty(
                key,
                "stamp.composite_keys",
                "Composite keys cannot be empty",
            )?;
        }
        validation::require_non_empty(
            &self.tidy.build_order_tag,
            "tidy.build_order_tag",
            "Build order tag cannot be empty",
        )?;
        Ok(())
    }
}
