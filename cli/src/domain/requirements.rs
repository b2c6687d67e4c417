//! Requirement check outcome.

use serde::Serialize;

/// Result of probing every port an app declares in `requiredPorts`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RequirementReport {
    pub app_id: String,
    /// Ports declared by the manifest, in declared order.
    pub required_ports: Vec<u16>,
    /// Subset of `required_ports` currently bound on the host.
    pub busy_ports: Vec<u16>,
}

impl RequirementReport {
    /// `true` when no required port is busy (including when none are declared).
    #[must_use]
    pub fn is_satisfied(&self) -> bool {
        self.busy_ports.is_empty()
    }
}
