//! Report records produced by the walker.

use crate::ordering::{MemberKey, TypeKey};

/// One member line of a report, with its attribute lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberDefinition {
    member_name: String,
    attributes: Vec<String>,
    key: MemberKey,
}

impl MemberDefinition {
    /// Creates a member record.
    pub fn new(member_name: impl Into<String>, attributes: Vec<String>, key: MemberKey) -> Self {
        Self {
            member_name: member_name.into(),
            attributes,
            key,
        }
    }

    /// Canonical member text.
    #[must_use]
    pub fn member_name(&self) -> &str {
        &self.member_name
    }

    /// Rendered attribute lines.
    #[must_use]
    pub fn attributes(&self) -> &[String] {
        &self.attributes
    }

    /// Ordering key.
    #[must_use]
    pub const fn key(&self) -> &MemberKey {
        &self.key
    }
}

/// One type block of a report. Members are already sorted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDefinition {
    type_name: String,
    declaration: String,
    attributes: Vec<String>,
    members: Vec<MemberDefinition>,
    key: TypeKey,
}

impl TypeDefinition {
    /// Creates a type record.
    #[must_use]
    pub fn new(
        declaration: String,
        attributes: Vec<String>,
        members: Vec<MemberDefinition>,
        key: TypeKey,
    ) -> Self {
        Self {
            type_name: key.full_name.clone(),
            declaration,
            attributes,
            members,
            key,
        }
    }

    /// Full type name.
    #[must_use]
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Canonical declaration line, without the opening brace.
    #[must_use]
    pub fn declaration(&self) -> &str {
        &self.declaration
    }

    /// Rendered attribute lines.
    #[must_use]
    pub fn attributes(&self) -> &[String] {
        &self.attributes
    }

    /// Sorted members.
    #[must_use]
    pub fn members(&self) -> &[MemberDefinition] {
        &self.members
    }

    /// Ordering key.
    #[must_use]
    pub const fn key(&self) -> &TypeKey {
        &self.key
    }
}
