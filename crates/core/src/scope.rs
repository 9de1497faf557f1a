//! Resource lifecycle scoping.

use serde::{Deserialize, Serialize};

use crate::id::{ActionId, ExecutionId, OrganizationId, ProjectId, WorkflowId};

/// The level at which a resource, credential, or configuration value applies.
///
/// Scopes nest from [`ScopeLevel::Global`] down to [`ScopeLevel::Action`];
/// a lookup at a narrower scope falls back to the next-broader one when
/// nothing is defined there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "level", rename_all = "snake_case")]
pub enum ScopeLevel {
    /// Applies everywhere; no narrower scope overrides it unless one exists.
    Global,
    Organization(OrganizationId),
    Project(ProjectId),
    Workflow(WorkflowId),
    Execution(ExecutionId),
    Action(ActionId),
}

impl ScopeLevel {
    /// A short name for the scope kind, ignoring any carried identifier.
    pub fn kind(&self) -> &'static str {
        match self {
            ScopeLevel::Global => "global",
            ScopeLevel::Organization(_) => "organization",
            ScopeLevel::Project(_) => "project",
            ScopeLevel::Workflow(_) => "workflow",
            ScopeLevel::Execution(_) => "execution",
            ScopeLevel::Action(_) => "action",
        }
    }

    pub fn is_global(&self) -> bool {
        matches!(self, ScopeLevel::Global)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn global_scope_reports_global_kind() {
        assert_eq!(ScopeLevel::Global.kind(), "global");
        assert!(ScopeLevel::Global.is_global());
    }

    #[test]
    fn execution_scope_carries_its_id() {
        let id = ExecutionId::v4();
        let scope = ScopeLevel::Execution(id);
        assert_eq!(scope.kind(), "execution");
        assert!(!scope.is_global());
        assert_eq!(scope, ScopeLevel::Execution(id));
    }

    #[test]
    fn distinct_scope_kinds_are_not_equal() {
        assert_ne!(ScopeLevel::Global, ScopeLevel::Workflow(WorkflowId::nil()));
    }

    #[test]
    fn scope_level_serde_roundtrip() {
        let scope = ScopeLevel::Project(ProjectId::v4());
        let json = serde_json::to_string(&scope).unwrap();
        let back: ScopeLevel = serde_json::from_str(&json).unwrap();
        assert_eq!(scope, back);
    }
}
