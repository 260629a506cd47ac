//! The audit run: fetch, classify, act, report

pub mod classifier;
pub mod executor;

pub use classifier::{classify, Classification, DanglingGroup};
pub use executor::{resolve_actions, CandidateOutcome};

use crate::aws::{AwsContext, Ec2Client};
use crate::config::AuditConfig;
use crate::report::{AuditReport, ReportWriter};
use anyhow::{Context, Result};
use tracing::info;

/// Run a full audit: fetch both collections, classify, resolve actions,
/// and emit the text/JSON report.
///
/// A failed fetch aborts the run with no partial report; per-candidate
/// delete failures do not.
pub async fn run(ctx: &AwsContext, config: &AuditConfig) -> Result<()> {
    let ec2 = Ec2Client::from_context(ctx);

    let groups = ec2
        .describe_security_groups()
        .await
        .with_context(|| format!("Error connecting to region {}", config.region))?;
    let interfaces = ec2
        .describe_network_interfaces()
        .await
        .with_context(|| format!("Error connecting to region {}", config.region))?;

    let classification = classifier::classify(&groups, &interfaces);
    info!(
        total = classification.total_groups,
        protected = classification.protected_ids.len(),
        dangling = classification.dangling.len(),
        "Classified security groups"
    );

    let outcomes = executor::resolve_actions(&ec2, config, &classification.dangling).await;
    let report = AuditReport::new(config, &classification, outcomes);

    let mut writer =
        ReportWriter::new(config.output_base.as_deref()).context("Failed to prepare report files")?;
    report.render_text(&mut writer)?;
    writer.finish(&report)?;

    Ok(())
}
