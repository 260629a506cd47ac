//! Report data structure and text/JSON rendering
//!
//! Both outputs are generated from the same `AuditReport`, so the console,
//! the `.txt` file, and the `.json` file cannot disagree.

use crate::audit::executor::STATUS_DELETE_CANDIDATE;
use crate::audit::{CandidateOutcome, Classification};
use crate::config::{AuditConfig, ExecutionMode};
use anyhow::{Context, Result};
use serde::Serialize;
use std::fs::{self, File};
use std::io::Write;
use std::path::PathBuf;

/// The full audit result, serialized as-is into the JSON report
#[derive(Debug, Serialize)]
pub struct AuditReport {
    pub metadata: Metadata,
    pub report_summary: Summary,
    pub dangling_groups: Vec<DanglingRecord>,
    #[serde(skip)]
    mode: ExecutionMode,
}

#[derive(Debug, Serialize)]
pub struct Metadata {
    pub timestamp: String,
    pub region: String,
    pub execution_mode: String,
    pub total_sgs_found: usize,
}

#[derive(Debug, Serialize)]
pub struct Summary {
    pub protected_sgs: usize,
    pub dangling_candidates: usize,
}

#[derive(Debug, Serialize)]
pub struct DanglingRecord {
    pub sg_id: String,
    pub sg_name: String,
    pub is_self_referenced: bool,
    pub status: String,
    pub action: String,
}

impl AuditReport {
    pub fn new(
        config: &AuditConfig,
        classification: &Classification,
        outcomes: Vec<CandidateOutcome>,
    ) -> Self {
        let dangling_groups: Vec<DanglingRecord> = outcomes
            .into_iter()
            .map(|outcome| DanglingRecord {
                sg_id: outcome.group.group_id,
                sg_name: outcome.group.group_name,
                is_self_referenced: outcome.group.self_referenced,
                status: STATUS_DELETE_CANDIDATE.to_string(),
                action: outcome.action,
            })
            .collect();

        Self {
            metadata: Metadata {
                timestamp: chrono::Utc::now().to_rfc3339(),
                region: config.region.clone(),
                execution_mode: config.mode.label().to_string(),
                total_sgs_found: classification.total_groups,
            },
            report_summary: Summary {
                protected_sgs: classification.protected_count(),
                dangling_candidates: dangling_groups.len(),
            },
            dangling_groups,
            mode: config.mode,
        }
    }

    /// Render the human-readable report through `writer`.
    pub fn render_text(&self, writer: &mut ReportWriter) -> Result<()> {
        let rule = "-".repeat(60);

        writer.emit(&rule)?;
        writer.emit(&format!(
            "--- SG AUDIT REPORT | Region: {} | Mode: {} ---",
            self.metadata.region, self.metadata.execution_mode
        ))?;
        writer.emit(&rule)?;
        writer.emit(&format!(
            "Total SGs found: {}",
            self.metadata.total_sgs_found
        ))?;
        writer.emit(&format!(
            "Protected SGs (In Use or System): {}",
            self.report_summary.protected_sgs
        ))?;
        writer.emit(&format!(
            "Dangling Candidates (Deletable): {}",
            self.report_summary.dangling_candidates
        ))?;
        writer.emit(&rule)?;

        if self.dangling_groups.is_empty() {
            writer.emit("No deletable dangling security groups found. Account is tidy!")?;
        } else {
            for item in &self.dangling_groups {
                let ref_flag = if item.is_self_referenced {
                    " (Self-Ref)"
                } else {
                    ""
                };
                writer.emit(&format!(
                    "[{}{}] {} ({})",
                    item.status, ref_flag, item.sg_id, item.sg_name
                ))?;
                if self.mode.is_dry_run() {
                    writer.emit(&format!("   -> CLI Command: {}", item.action))?;
                } else {
                    writer.emit(&format!("   -> Result: {}", item.action))?;
                }
            }
        }

        writer.emit(&rule)?;
        Ok(())
    }
}

/// Writes report lines to stdout and, when an output base is set, mirrors
/// them into `<base>.txt`; `finish` writes `<base>.json` in one shot.
pub struct ReportWriter {
    txt_path: Option<PathBuf>,
    json_path: Option<PathBuf>,
    txt_file: Option<File>,
}

impl ReportWriter {
    /// Prepare the report targets, removing stale files from a prior run.
    pub fn new(output_base: Option<&str>) -> Result<Self> {
        let Some(base) = output_base else {
            return Ok(Self {
                txt_path: None,
                json_path: None,
                txt_file: None,
            });
        };

        let txt_path = PathBuf::from(format!("{base}.txt"));
        let json_path = PathBuf::from(format!("{base}.json"));

        for path in [&txt_path, &json_path] {
            if path.exists() {
                fs::remove_file(path).with_context(|| {
                    format!("Failed to remove stale report file {}", path.display())
                })?;
            }
        }

        let txt_file = File::create(&txt_path)
            .with_context(|| format!("Failed to create text report {}", txt_path.display()))?;

        Ok(Self {
            txt_path: Some(txt_path),
            json_path: Some(json_path),
            txt_file: Some(txt_file),
        })
    }

    /// Print a line to stdout, mirroring it into the text report.
    pub fn emit(&mut self, line: &str) -> Result<()> {
        println!("{line}");
        if let Some(file) = &mut self.txt_file {
            writeln!(file, "{line}").context("Failed to append to text report")?;
        }
        Ok(())
    }

    /// Write the JSON document and note both file locations on stdout.
    pub fn finish(mut self, report: &AuditReport) -> Result<()> {
        let (Some(txt_path), Some(json_path)) = (self.txt_path.take(), self.json_path.take())
        else {
            return Ok(());
        };

        if let Some(file) = &mut self.txt_file {
            file.flush().context("Failed to flush text report")?;
        }
        println!("Full text report saved to: {}", txt_path.display());

        let json =
            serde_json::to_string_pretty(report).context("Failed to serialize JSON report")?;
        fs::write(&json_path, json)
            .with_context(|| format!("Failed to write JSON report {}", json_path.display()))?;
        println!("Structured JSON report saved to: {}", json_path.display());

        Ok(())
    }
}
