//! Project file tidying: canonical child order plus build-order annotations.

pub mod build_order;
pub mod dom;
pub mod sort;

use crate::defaults::{Defaults, TidyConfig};
use crate::error::Result;
use crate::utils::io;
use serde::Serialize;
use std::path::Path;

pub use dom::{Document, Element, Node};

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TidyStats {
    pub property_groups: usize,
    pub item_groups: usize,
    pub deployments: usize,
    pub build_order_comments: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TidyResult {
    pub input: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    pub changed: bool,
    #[serde(flatten)]
    pub stats: TidyStats,
    /// Tidied bytes, kept for callers that print instead of writing.
    #[serde(skip)]
    pub content: Vec<u8>,
}

/// Apply every tidy rule to a parsed document.
pub fn tidy_document(document: &mut Document, config: &TidyConfig) -> TidyStats {
    let item_key = sort::item_key(&config.item_order);

    TidyStats {
        property_groups: sort::sort_child_nodes(document, "PropertyGroup", &sort::property_key),
        item_groups: sort::sort_child_nodes(document, "ItemGroup", &item_key),
        deployments: sort::sort_child_nodes(document, "Deployment", &sort::deployment_key),
        build_order_comments: build_order::add_build_orders(document, &config.build_order_tag),
    }
}

/// Tidy raw project bytes. `source` names the input in parse errors.
pub fn tidy_bytes(
    input: &[u8],
    source: &str,
    config: &TidyConfig,
) -> Result<(Vec<u8>, TidyStats)> {
    let mut document = dom::parse(input, source)?;
    let stats = tidy_document(&mut document, config);
    Ok((dom::serialize(&document)?, stats))
}

/// Tidy `input`, writing to `output` when given. Without an output path the
/// result is returned in [`TidyResult::content`] and nothing is written.
pub fn tidy_file(input: &Path, output: Option<&Path>, defaults: &Defaults) -> Result<TidyResult> {
    let source = input.display().to_string();
    let original = io::read_bytes(input, "read")?;
    let (content, stats) = tidy_bytes(&original, &source, &defaults.tidy)?;
    let changed = content != original;

    if let Some(output) = output {
        io::write_file_atomic(output, &content, "write")?;
        crate::log_status!("tidy", "Wrote {}", output.display());
    }

    Ok(TidyResult {
        input: source,
        output: output.map(|p| p.display().to_string()),
        changed,
        stats,
        content,
    })
}
