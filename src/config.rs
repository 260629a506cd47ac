//! Run configuration for the audit

use clap::ValueEnum;

/// How the audit treats delete candidates
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExecutionMode {
    /// Print the equivalent delete command for each candidate
    DryRun,
    /// Delete each candidate group
    LiveDelete,
}

impl ExecutionMode {
    pub fn is_dry_run(self) -> bool {
        matches!(self, ExecutionMode::DryRun)
    }

    /// Mode label used in the report header and JSON metadata
    pub fn label(self) -> &'static str {
        match self {
            ExecutionMode::DryRun => "DRY RUN",
            ExecutionMode::LiveDelete => "LIVE DELETE",
        }
    }
}

/// Configuration for a single audit run
#[derive(Debug, Clone)]
pub struct AuditConfig {
    /// AWS region to audit
    pub region: String,

    /// Execution mode
    pub mode: ExecutionMode,

    /// Base name for report files (`<base>.txt` and `<base>.json`)
    pub output_base: Option<String>,

    /// AWS profile override (falls back to `AWS_PROFILE`)
    pub aws_profile: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_labels() {
        assert_eq!(ExecutionMode::DryRun.label(), "DRY RUN");
        assert_eq!(ExecutionMode::LiveDelete.label(), "LIVE DELETE");
    }

    #[test]
    fn test_is_dry_run() {
        assert!(ExecutionMode::DryRun.is_dry_run());
        assert!(!ExecutionMode::LiveDelete.is_dry_run());
    }

    #[test]
    fn test_mode_value_names() {
        // CLI argument spellings for the optional positional mode
        let dry = ExecutionMode::DryRun.to_possible_value().unwrap();
        let live = ExecutionMode::LiveDelete.to_possible_value().unwrap();
        assert_eq!(dry.get_name(), "dry-run");
        assert_eq!(live.get_name(), "live-delete");
    }
}
