//! AWS client modules for the audit
//!
//! This module provides:
//! - context: shared SDK configuration, loaded once and passed explicitly
//! - ec2: security group and network interface access
//! - error: typed AWS error classification for per-item failure reporting

pub mod context;
pub mod ec2;
pub mod error;

pub use context::AwsContext;
pub use ec2::{Ec2Client, NetworkInterfaceInfo, SecurityGroupInfo};
pub use error::{classify_aws_error, AwsError};
