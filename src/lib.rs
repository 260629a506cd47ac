//! sg-audit - find and optionally delete dangling AWS security groups
//!
//! A security group is "dangling" when it is not attached to any network
//! interface and no other group's rules reference it. The audit fetches
//! every group and interface in one region, classifies each group, and
//! emits a text/JSON report; in live-delete mode the candidates are
//! deleted one by one.

pub mod audit;
pub mod aws;
pub mod config;
pub mod report;
