//! Dangling security group classification
//!
//! Pure set arithmetic over the fetched collections; no AWS access, so the
//! whole policy is unit-testable.

use crate::aws::{NetworkInterfaceInfo, SecurityGroupInfo};
use std::collections::{BTreeSet, HashMap, HashSet};

/// Name of the VPC default group, which is never a delete candidate
const DEFAULT_GROUP_NAME: &str = "default";

/// Result of classifying one region's security groups
#[derive(Debug, Clone)]
pub struct Classification {
    /// Total number of groups examined
    pub total_groups: usize,
    /// Groups attached to an interface or referenced by another group
    pub protected_ids: BTreeSet<String>,
    /// Groups whose own rules name themselves (informational only)
    pub self_referenced_ids: BTreeSet<String>,
    /// Delete candidates, sorted by group id
    pub dangling: Vec<DanglingGroup>,
}

/// A non-default group that is neither attached nor referenced by others
#[derive(Debug, Clone)]
pub struct DanglingGroup {
    pub group_id: String,
    pub group_name: String,
    pub self_referenced: bool,
}

impl Classification {
    /// Count reported as "protected" in the summary: everything that is not
    /// a delete candidate, default groups included.
    pub fn protected_count(&self) -> usize {
        self.total_groups - self.dangling.len()
    }
}

/// Classify every group in the region as protected or dangling.
///
/// A group referencing itself does not protect itself; only an attachment
/// or a reference from another group does. Self-references are still
/// recorded so the report can flag them.
pub fn classify(
    groups: &[SecurityGroupInfo],
    interfaces: &[NetworkInterfaceInfo],
) -> Classification {
    // Index names by id for the candidate records
    let names: HashMap<&str, &str> = groups
        .iter()
        .map(|g| (g.group_id.as_str(), g.group_name.as_str()))
        .collect();

    // Set A: groups attached to any network interface
    let attached: HashSet<&str> = interfaces
        .iter()
        .flat_map(|eni| eni.group_ids.iter())
        .map(String::as_str)
        .collect();

    // Sets B and C: referenced by another group / referencing themselves
    let mut referenced_by_other: HashSet<&str> = HashSet::new();
    let mut self_referenced_ids: BTreeSet<String> = BTreeSet::new();

    for group in groups {
        for reference in group.ingress_refs.iter().chain(group.egress_refs.iter()) {
            if *reference == group.group_id {
                self_referenced_ids.insert(group.group_id.clone());
            } else {
                referenced_by_other.insert(reference.as_str());
            }
        }
    }

    let protected_ids: BTreeSet<String> = attached
        .iter()
        .chain(referenced_by_other.iter())
        .map(|id| (*id).to_string())
        .collect();

    // Dangling = non-default groups minus protected ones. BTreeSet
    // iteration keeps the candidate list sorted by id.
    let non_default: BTreeSet<&str> = groups
        .iter()
        .filter(|g| g.group_name != DEFAULT_GROUP_NAME)
        .map(|g| g.group_id.as_str())
        .collect();

    let dangling: Vec<DanglingGroup> = non_default
        .iter()
        .filter(|id| !protected_ids.contains(**id))
        .map(|id| DanglingGroup {
            group_id: (*id).to_string(),
            group_name: names.get(*id).copied().unwrap_or_default().to_string(),
            self_referenced: self_referenced_ids.contains(*id),
        })
        .collect();

    Classification {
        total_groups: groups.len(),
        protected_ids,
        self_referenced_ids,
        dangling,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sg(id: &str, name: &str, ingress_refs: &[&str], egress_refs: &[&str]) -> SecurityGroupInfo {
        SecurityGroupInfo {
            group_id: id.to_string(),
            group_name: name.to_string(),
            ingress_refs: ingress_refs.iter().map(|s| s.to_string()).collect(),
            egress_refs: egress_refs.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn eni(id: &str, group_ids: &[&str]) -> NetworkInterfaceInfo {
        NetworkInterfaceInfo {
            interface_id: id.to_string(),
            group_ids: group_ids.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn dangling_ids(c: &Classification) -> Vec<&str> {
        c.dangling.iter().map(|d| d.group_id.as_str()).collect()
    }

    #[test]
    fn test_dangling_and_protected_are_disjoint() {
        let groups = vec![
            sg("sg-a", "default", &[], &[]),
            sg("sg-b", "orphan", &[], &[]),
            sg("sg-c", "app", &["sg-d"], &[]),
            sg("sg-d", "db", &[], &[]),
            sg("sg-e", "attached", &[], &[]),
        ];
        let interfaces = vec![eni("eni-1", &["sg-e"])];

        let c = classify(&groups, &interfaces);
        for d in &c.dangling {
            assert!(
                !c.protected_ids.contains(&d.group_id),
                "{} is both dangling and protected",
                d.group_id
            );
        }
    }

    #[test]
    fn test_default_group_never_dangling() {
        // Unattached, unreferenced, and still excluded by name
        let groups = vec![sg("sg-def", "default", &[], &[])];
        let c = classify(&groups, &[]);
        assert!(c.dangling.is_empty());
        assert_eq!(c.protected_count(), 1);
    }

    #[test]
    fn test_self_reference_does_not_protect() {
        // A group that only references itself is still dangling
        let groups = vec![sg("sg-loop", "lonely", &["sg-loop"], &[])];
        let c = classify(&groups, &[]);

        assert_eq!(dangling_ids(&c), vec!["sg-loop"]);
        assert!(c.dangling[0].self_referenced);
        assert!(c.self_referenced_ids.contains("sg-loop"));
        assert!(c.protected_ids.is_empty());
    }

    #[test]
    fn test_external_reference_protects_unattached_group() {
        let groups = vec![
            sg("sg-b", "backend", &[], &[]),
            sg("sg-c", "caller", &["sg-b"], &[]),
        ];
        let c = classify(&groups, &[]);

        assert!(c.protected_ids.contains("sg-b"));
        // sg-c itself is unreferenced and unattached, so it dangles
        assert_eq!(dangling_ids(&c), vec!["sg-c"]);
    }

    #[test]
    fn test_egress_reference_protects_too() {
        let groups = vec![
            sg("sg-b", "backend", &[], &[]),
            sg("sg-c", "caller", &[], &["sg-b"]),
        ];
        let c = classify(&groups, &[]);
        assert!(c.protected_ids.contains("sg-b"));
    }

    #[test]
    fn test_reference_removal_exposes_group() {
        // A(default), B(unattached, no refs), C(references B), D(attached)
        let with_ref = vec![
            sg("sg-a", "default", &[], &[]),
            sg("sg-b", "b", &[], &[]),
            sg("sg-c", "c", &["sg-b"], &[]),
            sg("sg-d", "d", &[], &[]),
        ];
        let interfaces = vec![eni("eni-1", &["sg-d"]), eni("eni-2", &["sg-c"])];

        let c = classify(&with_ref, &interfaces);
        assert!(c.dangling.is_empty(), "B is protected via C's reference");

        // Remove C's rule: B becomes the only candidate
        let without_ref = vec![
            sg("sg-a", "default", &[], &[]),
            sg("sg-b", "b", &[], &[]),
            sg("sg-c", "c", &[], &[]),
            sg("sg-d", "d", &[], &[]),
        ];
        let c = classify(&without_ref, &interfaces);
        assert_eq!(dangling_ids(&c), vec!["sg-b"]);
    }

    #[test]
    fn test_candidates_sorted_by_id() {
        let groups = vec![
            sg("sg-zz", "z", &[], &[]),
            sg("sg-aa", "a", &[], &[]),
            sg("sg-mm", "m", &[], &[]),
        ];
        let c = classify(&groups, &[]);
        assert_eq!(dangling_ids(&c), vec!["sg-aa", "sg-mm", "sg-zz"]);
    }

    #[test]
    fn test_classification_is_deterministic() {
        let groups = vec![
            sg("sg-3", "three", &["sg-3"], &[]),
            sg("sg-1", "one", &[], &[]),
            sg("sg-2", "two", &["sg-1"], &[]),
        ];
        let interfaces = vec![eni("eni-1", &["sg-2"])];

        let first = classify(&groups, &interfaces);
        let second = classify(&groups, &interfaces);

        assert_eq!(dangling_ids(&first), dangling_ids(&second));
        assert_eq!(first.protected_ids, second.protected_ids);
        assert_eq!(first.self_referenced_ids, second.self_referenced_ids);
    }

    #[test]
    fn test_protected_count_includes_default_groups() {
        let groups = vec![
            sg("sg-a", "default", &[], &[]),
            sg("sg-b", "orphan", &[], &[]),
            sg("sg-c", "attached", &[], &[]),
        ];
        let interfaces = vec![eni("eni-1", &["sg-c"])];

        let c = classify(&groups, &interfaces);
        assert_eq!(c.total_groups, 3);
        assert_eq!(dangling_ids(&c), vec!["sg-b"]);
        // total minus candidates, so the default group counts as protected
        assert_eq!(c.protected_count(), 2);
    }

    #[test]
    fn test_reference_to_unknown_group_is_harmless() {
        // Rules can reference groups outside the fetched set (peered VPCs)
        let groups = vec![sg("sg-a", "app", &["sg-external"], &[])];
        let c = classify(&groups, &[]);

        assert!(c.protected_ids.contains("sg-external"));
        assert_eq!(dangling_ids(&c), vec!["sg-a"]);
    }

    #[test]
    fn test_empty_inputs() {
        let c = classify(&[], &[]);
        assert_eq!(c.total_groups, 0);
        assert!(c.dangling.is_empty());
        assert_eq!(c.protected_count(), 0);
    }
}
