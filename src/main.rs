//! sg-audit: find and optionally delete dangling AWS security groups

use anyhow::Result;
use clap::Parser;
use sg_audit::audit;
use sg_audit::aws::AwsContext;
use sg_audit::config::{AuditConfig, ExecutionMode};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "sg-audit")]
#[command(about = "Audit AWS security groups to find and optionally delete dangling ones")]
#[command(version)]
struct Args {
    /// The AWS region to audit (e.g. us-west-2)
    region: String,

    /// Execution mode: print delete commands (dry-run) or delete the
    /// identified groups (live-delete, use with caution)
    #[arg(value_enum, default_value = "dry-run")]
    mode: ExecutionMode,

    /// Base file name for the reports (creates <OUTPUT>.txt and <OUTPUT>.json)
    #[arg(short, long)]
    output: Option<String>,

    /// AWS profile to use (overrides AWS_PROFILE env var)
    #[arg(long)]
    aws_profile: Option<String>,
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        print_error(&e);
        std::process::exit(1);
    }
}

/// Print the error and its causes in a user-friendly way
fn print_error(e: &anyhow::Error) {
    use std::io::Write;

    let mut stderr = std::io::stderr();

    let _ = writeln!(stderr, "\n\x1b[1;31mError:\x1b[0m {e}");

    let mut source = e.source();
    while let Some(cause) = source {
        let _ = writeln!(stderr, "  \x1b[33mCaused by:\x1b[0m {cause}");
        source = cause.source();
    }
}

async fn run() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();

    if let Some(profile) = &args.aws_profile {
        info!(profile = %profile, "Using AWS profile");
    }

    info!(
        region = %args.region,
        mode = args.mode.label(),
        "Starting security group audit"
    );

    let config = AuditConfig {
        region: args.region,
        mode: args.mode,
        output_base: args.output,
        aws_profile: args.aws_profile,
    };

    let ctx = AwsContext::with_profile(&config.region, config.aws_profile.as_deref()).await;
    audit::run(&ctx, &config).await
}
