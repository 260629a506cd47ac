//! Per-candidate action resolution
//!
//! In dry-run mode every candidate gets the equivalent AWS CLI command; in
//! live-delete mode the delete is issued and its outcome recorded. A failed
//! delete never aborts the remaining candidates.

use crate::audit::classifier::DanglingGroup;
use crate::aws::Ec2Client;
use crate::config::{AuditConfig, ExecutionMode};
use tracing::{info, warn};

/// Status string carried by every delete candidate
pub const STATUS_DELETE_CANDIDATE: &str = "DELETE CANDIDATE";

/// Action string recorded for a successful live delete
pub const ACTION_DELETED: &str = "SUCCESSFULLY DELETED";

/// A dangling group with its resolved action
#[derive(Debug, Clone)]
pub struct CandidateOutcome {
    pub group: DanglingGroup,
    pub action: String,
}

/// The AWS CLI equivalent of deleting `group_id`, shown in dry-run mode
pub fn delete_command(group_id: &str, region: &str) -> String {
    format!("aws ec2 delete-security-group --group-id {group_id} --region {region}")
}

/// Resolve the action for every candidate, deleting when in live mode.
///
/// Candidates are processed sequentially in their sorted order.
pub async fn resolve_actions(
    ec2: &Ec2Client,
    config: &AuditConfig,
    dangling: &[DanglingGroup],
) -> Vec<CandidateOutcome> {
    let mut outcomes = Vec::with_capacity(dangling.len());

    for group in dangling {
        let action = match config.mode {
            ExecutionMode::DryRun => delete_command(&group.group_id, &config.region),
            ExecutionMode::LiveDelete => delete_candidate(ec2, group).await,
        };

        outcomes.push(CandidateOutcome {
            group: group.clone(),
            action,
        });
    }

    outcomes
}

async fn delete_candidate(ec2: &Ec2Client, group: &DanglingGroup) -> String {
    match ec2.delete_security_group(&group.group_id).await {
        Ok(()) => {
            info!(sg_id = %group.group_id, "Deleted security group");
            ACTION_DELETED.to_string()
        }
        Err(e) => {
            warn!(
                sg_id = %group.group_id,
                error = %e,
                suggestion = e.suggestion(),
                "Failed to delete security group"
            );
            format!("DELETE FAILED: {e}")
        }
    }
}
