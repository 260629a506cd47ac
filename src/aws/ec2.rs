//! EC2 security group and network interface access
//!
//! Wraps the SDK client behind the three operations the audit needs and
//! reduces SDK responses to plain domain types so the classifier never
//! touches AWS types.

use crate::aws::context::AwsContext;
use crate::aws::error::{classify_sdk_error, AwsError};
use anyhow::{Context, Result};
use aws_sdk_ec2::types::{IpPermission, NetworkInterface, SecurityGroup};
use aws_sdk_ec2::Client;
use tracing::debug;

/// A security group reduced to what the audit needs
#[derive(Debug, Clone)]
pub struct SecurityGroupInfo {
    pub group_id: String,
    pub group_name: String,
    /// Group ids referenced by ingress rules (one entry per rule reference)
    pub ingress_refs: Vec<String>,
    /// Group ids referenced by egress rules
    pub egress_refs: Vec<String>,
}

/// A network interface reduced to its security group attachments
#[derive(Debug, Clone)]
pub struct NetworkInterfaceInfo {
    pub interface_id: String,
    pub group_ids: Vec<String>,
}

/// EC2 client for the audited region
pub struct Ec2Client {
    client: Client,
}

impl Ec2Client {
    /// Create a new EC2 client (loads AWS config from the environment)
    pub async fn new(region: &str) -> Result<Self> {
        let ctx = AwsContext::new(region).await;
        Ok(Self::from_context(&ctx))
    }

    /// Create an EC2 client from a pre-loaded AWS context
    pub fn from_context(ctx: &AwsContext) -> Self {
        Self {
            client: ctx.ec2_client(),
        }
    }

    /// Create an EC2 client directly from an already-built SDK config
    pub fn from_sdk_config(config: &aws_config::SdkConfig) -> Self {
        Self {
            client: Client::new(config),
        }
    }

    /// Fetch every security group in the region.
    ///
    /// Pages through results; a failure on any page aborts the fetch.
    pub async fn describe_security_groups(&self) -> Result<Vec<SecurityGroupInfo>> {
        let mut groups = Vec::new();
        let mut next_token: Option<String> = None;

        loop {
            let mut request = self.client.describe_security_groups();
            if let Some(token) = &next_token {
                request = request.next_token(token);
            }

            let response = request
                .send()
                .await
                .context("Failed to describe security groups")?;

            groups.extend(
                response
                    .security_groups()
                    .iter()
                    .filter_map(security_group_info),
            );

            next_token = response.next_token().map(|s| s.to_string());
            if next_token.is_none() {
                break;
            }
        }

        debug!(count = groups.len(), "Fetched security groups");
        Ok(groups)
    }

    /// Fetch every network interface in the region.
    pub async fn describe_network_interfaces(&self) -> Result<Vec<NetworkInterfaceInfo>> {
        let mut interfaces = Vec::new();
        let mut next_token: Option<String> = None;

        loop {
            let mut request = self.client.describe_network_interfaces();
            if let Some(token) = &next_token {
                request = request.next_token(token);
            }

            let response = request
                .send()
                .await
                .context("Failed to describe network interfaces")?;

            interfaces.extend(
                response
                    .network_interfaces()
                    .iter()
                    .filter_map(network_interface_info),
            );

            next_token = response.next_token().map(|s| s.to_string());
            if next_token.is_none() {
                break;
            }
        }

        debug!(count = interfaces.len(), "Fetched network interfaces");
        Ok(interfaces)
    }

    /// Delete a security group.
    ///
    /// A single attempt, no retry; the classified error is returned so a
    /// per-group failure can be recorded without aborting the run.
    pub async fn delete_security_group(&self, group_id: &str) -> Result<(), AwsError> {
        self.client
            .delete_security_group()
            .group_id(group_id)
            .send()
            .await
            .map_err(|e| classify_sdk_error(&e))?;

        Ok(())
    }
}

/// Reduce an SDK security group to the fields the classifier consumes.
///
/// Groups without an id cannot be classified or deleted and are skipped.
fn security_group_info(sg: &SecurityGroup) -> Option<SecurityGroupInfo> {
    let group_id = sg.group_id()?.to_string();

    Some(SecurityGroupInfo {
        group_id,
        group_name: sg.group_name().unwrap_or_default().to_string(),
        ingress_refs: rule_group_refs(sg.ip_permissions()),
        egress_refs: rule_group_refs(sg.ip_permissions_egress()),
    })
}

/// Collect the group ids named in a rule set's user-id/group pairs.
fn rule_group_refs(permissions: &[IpPermission]) -> Vec<String> {
    permissions
        .iter()
        .flat_map(|perm| perm.user_id_group_pairs())
        .filter_map(|pair| pair.group_id())
        .map(|id| id.to_string())
        .collect()
}

fn network_interface_info(eni: &NetworkInterface) -> Option<NetworkInterfaceInfo> {
    let interface_id = eni.network_interface_id()?.to_string();

    Some(NetworkInterfaceInfo {
        interface_id,
        group_ids: eni
            .groups()
            .iter()
            .filter_map(|g| g.group_id())
            .map(|id| id.to_string())
            .collect(),
    })
}
