//! Common value types shared across Nebula crates.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Semantic version of a workflow, action, or artifact.
///
/// Thin wrapper around [`semver::Version`] so the rest of the workspace can
/// depend on a stable Nebula type rather than reaching for `semver` directly.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Version(semver::Version);

impl Version {
    /// Builds a version from its major/minor/patch components.
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self(semver::Version::new(major, minor, patch))
    }

    /// Parses a version from its `major.minor.patch` string form.
    pub fn parse(input: &str) -> Result<Self, semver::Error> {
        semver::Version::parse(input).map(Self)
    }

    pub fn major(&self) -> u64 {
        self.0.major
    }

    pub fn minor(&self) -> u64 {
        self.0.minor
    }

    pub fn patch(&self) -> u64 {
        self.0.patch
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Default for Version {
    fn default() -> Self {
        Self::new(0, 1, 0)
    }
}

/// Compatibility-checked interface version for actions and plugins.
///
/// Unlike [`Version`], this only tracks major/minor — patch releases never
/// affect wire or parameter compatibility. Two interfaces are compatible when
/// they share a major version and `self`'s minor is no newer than `other`'s,
/// i.e. code written against `self` can run against `other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct InterfaceVersion {
    major: u32,
    minor: u32,
}

impl InterfaceVersion {
    pub fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }

    pub fn major(&self) -> u32 {
        self.major
    }

    pub fn minor(&self) -> u32 {
        self.minor
    }

    /// Whether code built against `self` can run against `other`.
    pub fn is_compatible_with(&self, other: &Self) -> bool {
        self.major == other.major && self.minor <= other.minor
    }
}

impl fmt::Display for InterfaceVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

impl Default for InterfaceVersion {
    fn default() -> Self {
        Self::new(1, 0)
    }
}

/// The kind of project a [`crate::id::ProjectId`] points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectType {
    /// Ordinary workflow project.
    Standard,
    /// Read-only project used as a shared template source.
    Template,
    /// System-owned project not exposed to end users.
    System,
}

/// The access level a role grants within its scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleScope {
    /// Can view resources but not modify them.
    Viewer,
    /// Can create and edit resources.
    Editor,
    /// Full control, including membership and deletion.
    Admin,
    /// Owner of the enclosing organization or project.
    Owner,
}

impl RoleScope {
    /// Whether this role scope grants at least the access of `other`.
    pub fn includes(&self, other: RoleScope) -> bool {
        *self >= other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_new_roundtrips_components() {
        let v = Version::new(1, 2, 3);
        assert_eq!(v.major(), 1);
        assert_eq!(v.minor(), 2);
        assert_eq!(v.patch(), 3);
    }

    #[test]
    fn version_display_is_semver_format() {
        let v = Version::new(0, 1, 0);
        assert_eq!(v.to_string(), "0.1.0");
    }

    #[test]
    fn version_parse_roundtrips_display() {
        let v = Version::parse("2.4.1").unwrap();
        assert_eq!(v.to_string(), "2.4.1");
    }

    #[test]
    fn version_serde_roundtrip() {
        let v = Version::new(1, 0, 0);
        let json = serde_json::to_string(&v).unwrap();
        let back: Version = serde_json::from_str(&json).unwrap();
        assert_eq!(v, back);
    }

    #[test]
    fn interface_version_display_is_major_dot_minor() {
        let v = InterfaceVersion::new(1, 2);
        assert_eq!(v.to_string(), "1.2");
    }

    #[test]
    fn interface_version_same_minor_is_compatible() {
        let v = InterfaceVersion::new(1, 0);
        assert!(v.is_compatible_with(&InterfaceVersion::new(1, 0)));
    }

    #[test]
    fn interface_version_older_minor_is_compatible_with_newer() {
        let v1_0 = InterfaceVersion::new(1, 0);
        let v1_2 = InterfaceVersion::new(1, 2);
        assert!(v1_0.is_compatible_with(&v1_2));
        assert!(!v1_2.is_compatible_with(&v1_0));
    }

    #[test]
    fn interface_version_different_major_is_incompatible() {
        let v1_0 = InterfaceVersion::new(1, 0);
        let v2_0 = InterfaceVersion::new(2, 0);
        assert!(!v1_0.is_compatible_with(&v2_0));
        assert!(!v2_0.is_compatible_with(&v1_0));
    }

    #[test]
    fn role_scope_ordering_reflects_access_level() {
        assert!(RoleScope::Owner > RoleScope::Admin);
        assert!(RoleScope::Admin > RoleScope::Editor);
        assert!(RoleScope::Editor > RoleScope::Viewer);
    }

    #[test]
    fn role_scope_includes_is_reflexive_and_transitive() {
        assert!(RoleScope::Admin.includes(RoleScope::Admin));
        assert!(RoleScope::Admin.includes(RoleScope::Viewer));
        assert!(!RoleScope::Viewer.includes(RoleScope::Admin));
    }

    #[test]
    fn project_type_serde_roundtrip() {
        let json = serde_json::to_string(&ProjectType::Template).unwrap();
        assert_eq!(json, "\"template\"");
    }
}
