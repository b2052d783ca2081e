//! Output formatting for CLI commands
//!
//! Renders resolutions and the extraction table as JSON or a plain table.

use anyhow::{Context, Result};
use serde::Serialize;
use std::str::FromStr;

use crate::mapping::{CanonicalSlot, CredentialTypeMapper, Diagnostic};
use crate::resolver::Resolution;

/// Placeholder printed instead of a secret slot value
pub const MASK: &str = "********";

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Json,
    Table,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "table" => Ok(OutputFormat::Table),
            _ => anyhow::bail!("Unsupported output format: '{}'. Use 'json' or 'table'.", s),
        }
    }
}

/// Resolution as printed by `resolve`
#[derive(Debug, Serialize)]
pub struct ResolutionView {
    pub user: String,
    pub pswd: String,
    pub pkey: String,
    pub passphrase: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<Diagnostic>,
}

impl ResolutionView {
    /// Build the printable view. Non-empty secret slots are masked unless
    /// `show_secrets` is set.
    pub fn new(resolution: &Resolution, show_secrets: bool) -> Self {
        let render = |slot: CanonicalSlot| {
            let value = resolution.credential.get(slot);
            if slot.is_secret() && !show_secrets && !value.is_empty() {
                MASK.to_string()
            } else {
                value.to_string()
            }
        };

        Self {
            user: render(CanonicalSlot::User),
            pswd: render(CanonicalSlot::Pswd),
            pkey: render(CanonicalSlot::Pkey),
            passphrase: render(CanonicalSlot::Passphrase),
            diagnostics: resolution.diagnostics.clone(),
        }
    }

    fn rows(&self) -> [(&'static str, &str); 4] {
        [
            (CanonicalSlot::User.key(), &self.user),
            (CanonicalSlot::Pswd.key(), &self.pswd),
            (CanonicalSlot::Pkey.key(), &self.pkey),
            (CanonicalSlot::Passphrase.key(), &self.passphrase),
        ]
    }
}

/// Print data as JSON
pub fn print_json<T: Serialize>(data: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(data).context("Failed to serialize to JSON")?;
    println!("{}", json);
    Ok(())
}

pub fn print_resolution(view: &ResolutionView, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => print_json(view),
        OutputFormat::Table => {
            print_table_header(&[("Slot", 12), ("Value", 60)]);
            for (slot, value) in view.rows() {
                println!("{:<12} {}", slot, truncate(&single_line(value), 60));
            }
            for diagnostic in &view.diagnostics {
                println!();
                println!("warning: {}", diagnostic);
            }
            Ok(())
        }
    }
}

/// Extraction table entry as printed by `types`
#[derive(Debug, Serialize)]
pub struct ProfileView {
    pub credential_type: String,
    pub rules: Vec<String>,
}

pub fn profile_views(mapper: &CredentialTypeMapper) -> Vec<ProfileView> {
    mapper
        .supported_types()
        .into_iter()
        .map(|credential_type| ProfileView {
            credential_type: credential_type.to_string(),
            rules: mapper
                .profile(credential_type.as_str())
                .map(|profile| profile.rules().iter().map(ToString::to_string).collect())
                .unwrap_or_default(),
        })
        .collect()
}

pub fn print_profiles(views: &[ProfileView], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => print_json(&views),
        OutputFormat::Table => {
            print_table_header(&[("Type", 34), ("Rules", 70)]);
            for view in views {
                println!("{:<34} {}", view.credential_type, view.rules.join(", "));
            }
            Ok(())
        }
    }
}

/// Truncate string to maximum length with ellipsis
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

fn single_line(s: &str) -> String {
    s.replace(['\r', '\n'], " ")
}

/// Print a table header
pub fn print_table_header(columns: &[(&str, usize)]) {
    let header: Vec<String> =
        columns.iter().map(|(name, width)| format!("{:<width$}", name, width = *width)).collect();
    let width: usize = columns.iter().map(|(_, w)| w + 1).sum();
    println!("{}", header.join(" ").trim_end());
    println!("{}", "-".repeat(width));
}
