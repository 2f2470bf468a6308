//! In-place version stamping for project files.
//!
//! Project files are rewritten line by line as raw bytes rather than parsed
//! as XML, so everything outside the recognized fields survives untouched:
//! encoding, line endings, attribute quoting, whitespace.

use crate::defaults::{Defaults, StampConfig};
use crate::error::{Error, Result};
use crate::utils::{io, parser, validation};
use crate::version::{Version, VersionPart};
use chrono::Datelike;
use regex::bytes::{Captures, NoExpand, Regex, Replacer};
use serde::Serialize;
use std::collections::BTreeSet;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

/// Trailing year (or year range) of a copyright value. Anything after the
/// year must be digit-free, e.g. `Copyright 2019-2022 Acme Inc.`.
static COPYRIGHT_YEAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s-u)^((?:.*?\D)?)(\d{4})(?:-(\d+))?(\D*)$").unwrap());

const DEFAULT_EOL: &[u8] = b"\r\n";

/// Per-file outcome of a stamp run
#[derive(Debug, Clone, Default, Serialize)]
pub struct StampedFile {
    pub path: String,
    pub fields_updated: usize,
    pub fields_inserted: usize,
    pub copyrights_updated: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sub_projects: Vec<String>,
}

/// Result of stamping a set of root project files
#[derive(Debug, Clone, Serialize)]
pub struct StampResult {
    pub version: String,
    pub year: i32,
    /// Files in the order they were committed; sub-projects precede their group.
    pub files: Vec<StampedFile>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<String>,
}

/// A field pattern with a fixed literal replacement.
struct FieldRule {
    pattern: Regex,
    replacement: Vec<u8>,
}

struct PartRule {
    part: VersionPart,
    presence: Regex,
    rewrites: Vec<FieldRule>,
}

#[derive(Default)]
struct Block {
    seen: BTreeSet<VersionPart>,
}

#[derive(Default)]
struct FileState {
    block: Option<Block>,
    eol: Option<Vec<u8>>,
    stats: StampedFile,
}

/// Counts produced by rewriting a single line.
#[derive(Debug, Default, PartialEq, Eq)]
struct LineChanges {
    fields: usize,
    copyrights: usize,
    parts_seen: Vec<VersionPart>,
}

pub struct Stamper {
    version: Version,
    year: i32,
    group_ref: Regex,
    block_open: Regex,
    block_close: Regex,
    composite_rules: Vec<FieldRule>,
    part_rules: Vec<PartRule>,
    copyright_rules: Vec<Regex>,
    in_progress: Vec<PathBuf>,
    files: Vec<StampedFile>,
    skipped: Vec<String>,
}

fn compile(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|e| {
        Error::internal_unexpected(format!("Invalid stamp pattern '{}': {}", pattern, e))
    })
}

fn replace_counting<R: Replacer>(pattern: &Regex, line: &mut Vec<u8>, replacer: R) -> usize {
    let hits = pattern.find_iter(line.as_slice()).count();
    if hits > 0 {
        *line = pattern.replace_all(line.as_slice(), replacer).into_owned();
    }
    hits
}

/// Advance the trailing copyright year to `year`.
///
/// `... 2019` becomes `... 2019-<year>` and `... 2019-2022` becomes
/// `... 2019-<year>`. Returns `None` when the value carries no trailing year
/// or is already current.
pub fn rewrite_copyright(value: &[u8], year: i32) -> Option<Vec<u8>> {
    let caps = COPYRIGHT_YEAR.captures(value)?;

    let mut out = Vec::with_capacity(value.len() + 5);
    out.extend_from_slice(&caps[1]);
    out.extend_from_slice(&caps[2]);
    out.push(b'-');
    out.extend_from_slice(year.to_string().as_bytes());
    out.extend_from_slice(&caps[4]);

    (out != value).then_some(out)
}

impl Stamper {
    pub fn new(version: Version, year: i32, config: &StampConfig) -> Result<Self> {
        let block_tag = regex::escape(&config.block_tag);
        let rendered = version.to_string();

        let mut composite_rules = Vec::new();
        for key in &config.composite_keys {
            let key = regex::escape(key);
            composite_rules.push(FieldRule {
                pattern: compile(&format!(
                    r#"(?-u)<VersionInfoKeys Name="{}">[0-9.]+</VersionInfoKeys>"#,
                    key
                ))?,
                replacement: format!(
                    r#"<VersionInfoKeys Name="{}">{}</VersionInfoKeys>"#,
                    key, rendered
                )
                .into_bytes(),
            });
            composite_rules.push(FieldRule {
                pattern: compile(&format!(r"(?-u)\b{}=[0-9.]+", key))?,
                replacement: format!("{}={}", key, rendered).into_bytes(),
            });
        }

        let mut part_rules = Vec::new();
        for part in VersionPart::ALL {
            let name = part.field_name();
            let value = version.part(part);
            part_rules.push(PartRule {
                part,
                presence: compile(&format!(
                    r#"(?-u)<VersionInfo Name="{name}">|<VerInfo_{name}>"#
                ))?,
                rewrites: vec![
                    FieldRule {
                        pattern: compile(&format!(
                            r#"(?-u)<VersionInfo Name="{name}">\d+</VersionInfo>"#
                        ))?,
                        replacement: format!(r#"<VersionInfo Name="{name}">{value}</VersionInfo>"#)
                            .into_bytes(),
                    },
                    FieldRule {
                        pattern: compile(&format!(r"(?-u)<VerInfo_{name}>\d+</VerInfo_{name}>"))?,
                        replacement: format!("<VerInfo_{name}>{value}</VerInfo_{name}>")
                            .into_bytes(),
                    },
                ],
            });
        }

        let copyright_key = regex::escape(&config.copyright_key);
        let copyright_rules = vec![
            compile(&format!(
                r#"(?-u)(<VersionInfoKeys Name="{}">)([^<]*)(</VersionInfoKeys>)"#,
                copyright_key
            ))?,
            compile(&format!(r"(?-u)(\b{}=)([^;<\r\n]*)()", copyright_key))?,
        ];

        Ok(Self {
            version,
            year,
            group_ref: compile(&format!(
                r#"(?-u)<{}\s+Include="([^"]+)""#,
                regex::escape(&config.group_include_tag)
            ))?,
            // The opening tag may wrap; `>` is only looked for on this line.
            block_open: compile(&format!(r"(?-u)<{}\b[^>]*>?", block_tag))?,
            block_close: compile(&format!(r"(?-u)</{}\s*>", block_tag))?,
            composite_rules,
            part_rules,
            copyright_rules,
            in_progress: Vec::new(),
            files: Vec::new(),
            skipped: Vec::new(),
        })
    }

    /// Stamp each root in order, following group references. Stops at the
    /// first failure.
    pub fn stamp_all(mut self, roots: &[PathBuf]) -> Result<StampResult> {
        for root in roots {
            self.stamp_path(root)?;
        }

        Ok(StampResult {
            version: self.version.to_string(),
            year: self.year,
            files: self.files,
            skipped: self.skipped,
        })
    }

    fn stamp_path(&mut self, path: &Path) -> Result<()> {
        let path = parser::normalize_path(path);

        if self.in_progress.contains(&path) {
            crate::log_status!(
                "stamp",
                "Skipping {} (already being updated higher in the group chain)",
                path.display()
            );
            self.skipped.push(path.display().to_string());
            return Ok(());
        }

        crate::log_progress!("stamp", "Updating {}...", path.display());

        self.in_progress.push(path.clone());
        let result = self.stamp_file(&path);
        self.in_progress.pop();

        let stats = result?;
        self.files.push(stats);
        Ok(())
    }

    fn stamp_file(&mut self, path: &Path) -> Result<StampedFile> {
        let tmp_path = io::temp_path_for(path)?;
        let mut state = FileState {
            stats: StampedFile {
                path: path.display().to_string(),
                ..StampedFile::default()
            },
            ..FileState::default()
        };

        {
            let mut reader = io::open_reader(path)?;
            let mut writer = io::create_writer(&tmp_path)?;
            let mut line = Vec::new();

            loop {
                line.clear();
                let read = reader
                    .read_until(b'\n', &mut line)
                    .map_err(|e| Error::file_access(path.display().to_string(), "read", e))?;
                if read == 0 {
                    break;
                }

                let output = self.process_line(path, &mut state, std::mem::take(&mut line))?;
                writer
                    .write_all(&output)
                    .map_err(|e| Error::file_access(tmp_path.display().to_string(), "write", e))?;
            }

            writer
                .flush()
                .map_err(|e| Error::file_access(tmp_path.display().to_string(), "write", e))?;
        }

        io::replace_with_temp(path, &tmp_path)?;
        Ok(state.stats)
    }

    /// Transform one line, returning the bytes to emit (possibly preceded by
    /// back-filled field lines).
    fn process_line(
        &mut self,
        path: &Path,
        state: &mut FileState,
        line: Vec<u8>,
    ) -> Result<Vec<u8>> {
        let (content, terminator) = parser::split_terminator(&line);
        if state.eol.is_none() && !terminator.is_empty() {
            state.eol = Some(terminator.to_vec());
        }

        if let Some(caps) = self.group_ref.captures(content) {
            let reference = String::from_utf8_lossy(&caps[1]).into_owned();
            let sub_project = parser::resolve_reference(path, &reference);
            self.stamp_path(&sub_project)?;
            state
                .stats
                .sub_projects
                .push(sub_project.display().to_string());
        }

        let mut prefix = Vec::new();

        let opens_block = self
            .block_open
            .find(content)
            .is_some_and(|m| !m.as_bytes().ends_with(b"/>"));
        if opens_block {
            state.block = Some(Block::default());
        }

        let closes_block = self.block_close.is_match(content);
        let (mut rewritten, changes) = self.rewrite_fields(&line);

        if let Some(block) = state.block.as_mut() {
            block.seen.extend(changes.parts_seen.iter().copied());
        }

        if closes_block {
            if let Some(block) = state.block.take() {
                let eol = state.eol.as_deref().unwrap_or(DEFAULT_EOL);
                let inserted = self.back_fill(&block, content, eol, &mut prefix);
                state.stats.fields_inserted += inserted;
            }
        }

        state.stats.fields_updated += changes.fields;
        state.stats.copyrights_updated += changes.copyrights;

        if prefix.is_empty() {
            Ok(rewritten)
        } else {
            prefix.append(&mut rewritten);
            Ok(prefix)
        }
    }

    /// Emit `<VerInfo_X>` lines for non-zero parts the block never mentioned.
    /// Blocks without any version field are not version blocks and get nothing.
    ///
    /// Inserted lines are indented one tab deeper than the closing tag.
    fn back_fill(
        &self,
        block: &Block,
        closing_line: &[u8],
        eol: &[u8],
        out: &mut Vec<u8>,
    ) -> usize {
        if block.seen.is_empty() {
            return 0;
        }

        let mut indent = parser::leading_whitespace(closing_line).to_vec();
        indent.push(b'\t');

        let mut inserted = 0;
        for part in VersionPart::ALL {
            if self.version.is_zero(part) || block.seen.contains(&part) {
                continue;
            }

            let name = part.field_name();
            let value = self.version.part(part);
            out.extend_from_slice(&indent);
            out.extend_from_slice(format!("<VerInfo_{name}>{value}</VerInfo_{name}>").as_bytes());
            out.extend_from_slice(eol);
            inserted += 1;
        }

        inserted
    }

    fn rewrite_fields(&self, line: &[u8]) -> (Vec<u8>, LineChanges) {
        let mut out = line.to_vec();
        let mut changes = LineChanges::default();

        for rule in &self.composite_rules {
            changes.fields +=
                replace_counting(&rule.pattern, &mut out, NoExpand(&rule.replacement));
        }

        for rule in &self.part_rules {
            if rule.presence.is_match(&out) {
                changes.parts_seen.push(rule.part);
            }
            for rewrite in &rule.rewrites {
                changes.fields +=
                    replace_counting(&rewrite.pattern, &mut out, NoExpand(&rewrite.replacement));
            }
        }

        let year = self.year;
        for pattern in &self.copyright_rules {
            let mut updated = 0;
            replace_counting(pattern, &mut out, |caps: &Captures| {
                let mut field = caps[1].to_vec();
                match rewrite_copyright(&caps[2], year) {
                    Some(value) => {
                        updated += 1;
                        field.extend_from_slice(&value);
                    }
                    None => field.extend_from_slice(&caps[2]),
                }
                field.extend_from_slice(&caps[3]);
                field
            });
            changes.copyrights += updated;
        }

        (out, changes)
    }
}

/// Stamp `version` into every root project file and, transitively, every
/// project referenced from a group file.
///
/// The version string is validated before any file is opened.
pub fn stamp_version(version: &str, roots: &[PathBuf], defaults: &Defaults) -> Result<StampResult> {
    let version = Version::parse(version)?;
    validation::require_non_empty_vec(roots, "projectFiles")?;

    let year = chrono::Local::now().year();
    Stamper::new(version, year, &defaults.stamp)?.stamp_all(roots)
}
