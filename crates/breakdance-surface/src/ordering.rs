//! Total ordering of members and types.
//!
//! Metadata order is not stable across compilers, so reports order
//! everything by explicit keys. Two distinct items must never compare equal;
//! when they do, sorting fails instead of picking an arbitrary order.

use std::cmp::Ordering;
use std::fmt;

use crate::canonical::MemberRef;
use crate::definition::{MemberDefinition, TypeDefinition};
use crate::error::{SurfaceError, SurfaceResult};
use crate::model::{TypeInfo, TypeKind, TypeRef};

/// Member kinds in report order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemberKind {
    /// Fields and constants.
    Field,
    /// Constructors.
    Constructor,
    /// Properties.
    Property,
    /// Events.
    Event,
    /// Methods, including synthesized accessors.
    Method,
    /// Nested types.
    NestedType,
    /// Type-level entries.
    TypeInfo,
    /// Anything else.
    Custom,
}

impl MemberKind {
    /// Rank in the report; lower ranks come first.
    #[must_use]
    pub const fn rank(self) -> u8 {
        match self {
            Self::Field => 1,
            Self::Constructor => 2,
            Self::Property => 3,
            Self::Event => 4,
            Self::Method => 5,
            Self::NestedType => 6,
            Self::TypeInfo => 7,
            Self::Custom => 8,
        }
    }
}

/// Ordering key of a single member.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MemberKey {
    /// Member kind.
    pub kind: MemberKind,
    /// Inheritance distance from the reported type; zero when declared on it.
    pub depth: usize,
    /// Metadata name.
    pub name: String,
    /// Parameter type names, full name where available.
    pub parameter_types: Vec<String>,
    /// Generic arity; only meaningful for methods.
    pub generic_arity: usize,
    /// Return type name of a method; empty for everything else. Conversion
    /// operators may overload on it alone.
    pub return_type: String,
}

impl MemberKey {
    /// Key of `member` found `depth` levels up the inheritance chain.
    #[must_use]
    pub fn of(member: &MemberRef<'_>, depth: usize) -> Self {
        Self {
            kind: member.kind(),
            depth,
            name: member.name().into_owned(),
            parameter_types: member
                .parameters()
                .iter()
                .map(|parameter| parameter.parameter_type.sort_name())
                .collect(),
            generic_arity: member.generic_arity(),
            return_type: member
                .return_type()
                .map(TypeRef::sort_name)
                .unwrap_or_default(),
        }
    }

    /// The key a derived member hides a base member by: depth and return
    /// type cleared.
    #[must_use]
    pub fn hiding_signature(&self) -> Self {
        Self {
            depth: 0,
            return_type: String::new(),
            ..self.clone()
        }
    }
}

impl fmt::Display for MemberKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if self.generic_arity > 0 {
            write!(f, "`{}", self.generic_arity)?;
        }
        write!(f, "({})", self.parameter_types.join(", "))
    }
}

/// Compares member keys.
#[derive(Debug, Clone, Copy, Default)]
pub struct MemberComparer;

impl MemberComparer {
    /// Kind rank, then depth (most derived first), then ordinal name, then
    /// parameter count, then parameter types pairwise, then generic arity,
    /// then return type.
    #[must_use]
    pub fn compare(a: &MemberKey, b: &MemberKey) -> Ordering {
        a.kind
            .rank()
            .cmp(&b.kind.rank())
            .then_with(|| a.depth.cmp(&b.depth))
            .then_with(|| a.name.as_bytes().cmp(b.name.as_bytes()))
            .then_with(|| a.parameter_types.len().cmp(&b.parameter_types.len()))
            .then_with(|| {
                a.parameter_types
                    .iter()
                    .zip(&b.parameter_types)
                    .map(|(x, y)| x.as_bytes().cmp(y.as_bytes()))
                    .find(|ordering| ordering.is_ne())
                    .unwrap_or(Ordering::Equal)
            })
            .then_with(|| {
                if a.kind == MemberKind::Method && b.kind == MemberKind::Method {
                    a.generic_arity.cmp(&b.generic_arity)
                } else {
                    Ordering::Equal
                }
            })
            .then_with(|| a.return_type.as_bytes().cmp(b.return_type.as_bytes()))
    }
}

/// Sorts members of `type_name`.
///
/// # Errors
///
/// Returns `SurfaceError::AmbiguousMemberOrder` if two members compare equal.
pub fn sort_members(
    type_name: &str,
    mut members: Vec<MemberDefinition>,
) -> SurfaceResult<Vec<MemberDefinition>> {
    members.sort_by(|a, b| MemberComparer::compare(a.key(), b.key()));

    if let Some(pair) = members
        .windows(2)
        .find(|pair| MemberComparer::compare(pair[0].key(), pair[1].key()).is_eq())
    {
        return Err(SurfaceError::AmbiguousMemberOrder {
            type_name: type_name.to_string(),
            member: pair[1].key().to_string(),
        });
    }

    Ok(members)
}

/// Category of a type within its namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TypeCategory {
    /// Enums.
    Enum,
    /// Structs.
    ValueType,
    /// Interfaces.
    Interface,
    /// Abstract and static classes.
    Abstract,
    /// Other classes.
    Default,
    /// Sealed classes and delegates.
    Sealed,
}

impl TypeCategory {
    /// Category of a type.
    #[must_use]
    pub const fn of(ty: &TypeInfo) -> Self {
        match ty.kind {
            TypeKind::Enum => Self::Enum,
            TypeKind::Struct => Self::ValueType,
            TypeKind::Interface => Self::Interface,
            TypeKind::Delegate => Self::Sealed,
            TypeKind::Class if ty.is_static || ty.is_abstract => Self::Abstract,
            TypeKind::Class if ty.is_sealed => Self::Sealed,
            TypeKind::Class => Self::Default,
        }
    }
}

/// Ordering key of a type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeKey {
    /// Full name including `+` nesting.
    pub full_name: String,
    /// Namespace, empty for the global namespace.
    pub namespace: String,
    /// Category.
    pub category: TypeCategory,
    /// Argument names of a closed generic type; empty otherwise.
    pub generic_arguments: Vec<String>,
}

impl TypeKey {
    /// Creates a key.
    pub fn new(full_name: impl Into<String>, namespace: impl Into<String>, category: TypeCategory) -> Self {
        Self {
            full_name: full_name.into(),
            namespace: namespace.into(),
            category,
            generic_arguments: Vec::new(),
        }
    }

    /// Sets the arguments that tell closed instances of one generic
    /// definition apart.
    #[must_use]
    pub fn with_generic_arguments(mut self, arguments: &[TypeRef]) -> Self {
        self.generic_arguments = arguments.iter().map(TypeRef::sort_name).collect();
        self
    }

    /// Number of `.` separators in the full name.
    #[must_use]
    pub fn namespace_depth(&self) -> usize {
        self.full_name.matches('.').count()
    }
}

/// Compares type keys.
#[derive(Debug, Clone, Copy)]
pub struct TypeComparer {
    group_by_category: bool,
}

impl Default for TypeComparer {
    fn default() -> Self {
        Self::new(true)
    }
}

impl TypeComparer {
    /// Creates a comparer.
    #[must_use]
    pub const fn new(group_by_category: bool) -> Self {
        Self { group_by_category }
    }

    /// Namespace depth, then category within a shared namespace, then
    /// ordinal full name, then generic arguments.
    #[must_use]
    pub fn compare(&self, a: &TypeKey, b: &TypeKey) -> Ordering {
        a.namespace_depth()
            .cmp(&b.namespace_depth())
            .then_with(|| {
                if self.group_by_category && a.namespace == b.namespace {
                    a.category.cmp(&b.category)
                } else {
                    Ordering::Equal
                }
            })
            .then_with(|| a.full_name.as_bytes().cmp(b.full_name.as_bytes()))
            .then_with(|| {
                a.generic_arguments
                    .iter()
                    .map(String::as_bytes)
                    .cmp(b.generic_arguments.iter().map(String::as_bytes))
            })
    }
}

/// Sorts type definitions.
///
/// # Errors
///
/// Returns `SurfaceError::AmbiguousTypeOrder` if two types share a full name.
pub fn sort_types(
    comparer: &TypeComparer,
    mut types: Vec<TypeDefinition>,
) -> SurfaceResult<Vec<TypeDefinition>> {
    types.sort_by(|a, b| comparer.compare(a.key(), b.key()));

    if let Some(pair) = types
        .windows(2)
        .find(|pair| comparer.compare(pair[0].key(), pair[1].key()).is_eq())
    {
        return Err(SurfaceError::AmbiguousTypeOrder {
            type_name: pair[1].type_name().to_string(),
        });
    }

    Ok(types)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn key(kind: MemberKind, name: &str, params: &[&str]) -> MemberKey {
        MemberKey {
            kind,
            depth: 0,
            name: name.to_string(),
            parameter_types: params.iter().map(|p| (*p).to_string()).collect(),
            generic_arity: 0,
            return_type: String::new(),
        }
    }

    #[test]
    fn test_kind_ranks() {
        assert_eq!(MemberKind::Field.rank(), 1);
        assert_eq!(MemberKind::Method.rank(), 5);
        assert_eq!(MemberKind::Custom.rank(), 8);
    }

    #[test]
    fn test_kind_before_name() {
        let field = key(MemberKind::Field, "Zeta", &[]);
        let method = key(MemberKind::Method, "Alpha", &[]);
        assert_eq!(MemberComparer::compare(&field, &method), Ordering::Less);
    }

    #[test]
    fn test_overloads_by_parameter_count() {
        let none = key(MemberKind::Method, "Filter", &[]);
        let one = key(MemberKind::Method, "Filter", &["System.Int32"]);
        assert_eq!(MemberComparer::compare(&none, &one), Ordering::Less);
    }

    #[test]
    fn test_overloads_by_parameter_type() {
        let int = key(MemberKind::Method, "Parse", &["System.Int32"]);
        let string = key(MemberKind::Method, "Parse", &["System.String"]);
        assert_eq!(MemberComparer::compare(&int, &string), Ordering::Less);
    }

    #[test]
    fn test_ordinal_name_comparison() {
        let upper = key(MemberKind::Method, "Zoom", &[]);
        let lower = key(MemberKind::Method, "apply", &[]);
        assert_eq!(MemberComparer::compare(&upper, &lower), Ordering::Less);
    }

    #[test]
    fn test_derived_members_first() {
        let own = key(MemberKind::Method, "Zoom", &[]);
        let inherited = MemberKey {
            depth: 1,
            ..key(MemberKind::Method, "Apply", &[])
        };
        assert_eq!(MemberComparer::compare(&own, &inherited), Ordering::Less);
    }

    #[test]
    fn test_generic_arity_breaks_method_ties() {
        let plain = key(MemberKind::Method, "Convert", &["System.Object"]);
        let generic = MemberKey {
            generic_arity: 1,
            ..plain.clone()
        };
        assert_eq!(MemberComparer::compare(&plain, &generic), Ordering::Less);
    }

    #[test]
    fn test_return_type_breaks_conversion_ties() {
        let to_int = MemberKey {
            return_type: "System.Int32".to_string(),
            ..key(MemberKind::Method, "op_Implicit", &["Sample.Money"])
        };
        let to_long = MemberKey {
            return_type: "System.Int64".to_string(),
            ..to_int.clone()
        };
        assert_eq!(MemberComparer::compare(&to_int, &to_long), Ordering::Less);
        assert_eq!(to_int.hiding_signature(), to_long.hiding_signature());
    }

    #[test]
    fn test_closed_generics_ordered_by_arguments() {
        let comparer = TypeComparer::default();
        let of_string = TypeKey::new("Sample.Box`1", "Sample", TypeCategory::Default)
            .with_generic_arguments(&[TypeRef::string()]);
        let of_int = TypeKey::new("Sample.Box`1", "Sample", TypeCategory::Default)
            .with_generic_arguments(&[TypeRef::int32()]);
        assert_eq!(comparer.compare(&of_int, &of_string), Ordering::Less);
        assert_eq!(of_int.generic_arguments, vec!["System.Int32".to_string()]);
    }

    #[test]
    fn test_duplicate_members_are_rejected() {
        let members = vec![
            MemberDefinition::new("public void Run()", Vec::new(), key(MemberKind::Method, "Run", &[])),
            MemberDefinition::new("public void Run()", Vec::new(), key(MemberKind::Method, "Run", &[])),
        ];
        let err = sort_members("Sample.Runner", members).unwrap_err();
        assert!(matches!(err, SurfaceError::AmbiguousMemberOrder { .. }));
    }

    #[test]
    fn test_type_categories() {
        let comparer = TypeComparer::default();
        let enum_key = TypeKey::new("Sample.Zebra", "Sample", TypeCategory::Enum);
        let class_key = TypeKey::new("Sample.Alpha", "Sample", TypeCategory::Default);
        assert_eq!(comparer.compare(&enum_key, &class_key), Ordering::Less);

        let flat = TypeComparer::new(false);
        assert_eq!(flat.compare(&enum_key, &class_key), Ordering::Greater);
    }

    #[test]
    fn test_namespace_depth_first() {
        let comparer = TypeComparer::default();
        let shallow = TypeKey::new("Sample.Zebra", "Sample", TypeCategory::Sealed);
        let deep = TypeKey::new("Sample.Models.Alpha", "Sample.Models", TypeCategory::Enum);
        assert_eq!(comparer.compare(&shallow, &deep), Ordering::Less);
    }

    #[test]
    fn test_categories_ignored_across_namespaces() {
        let comparer = TypeComparer::default();
        let a = TypeKey::new("Alpha.Widget", "Alpha", TypeCategory::Sealed);
        let b = TypeKey::new("Beta.Color", "Beta", TypeCategory::Enum);
        assert_eq!(comparer.compare(&a, &b), Ordering::Less);
    }

    fn member_key_strategy() -> impl Strategy<Value = MemberKey> {
        (
            0u8..8,
            0usize..3,
            "[A-Ca-c]{1,3}",
            proptest::collection::vec("[A-C]", 0..3),
            0usize..2,
            "[A-B]{0,1}",
        )
            .prop_map(|(kind, depth, name, parameter_types, arity, return_type)| {
                let kind = [
                    MemberKind::Field,
                    MemberKind::Constructor,
                    MemberKind::Property,
                    MemberKind::Event,
                    MemberKind::Method,
                    MemberKind::NestedType,
                    MemberKind::TypeInfo,
                    MemberKind::Custom,
                ][usize::from(kind)];
                MemberKey {
                    kind,
                    depth,
                    name,
                    parameter_types,
                    generic_arity: if kind == MemberKind::Method { arity } else { 0 },
                    return_type,
                }
            })
    }

    proptest! {
        #[test]
        fn prop_member_order_is_total(a in member_key_strategy(), b in member_key_strategy()) {
            let forward = MemberComparer::compare(&a, &b);
            let backward = MemberComparer::compare(&b, &a);
            prop_assert_eq!(forward, backward.reverse());
            prop_assert_eq!(forward.is_eq(), a == b);
        }

        #[test]
        fn prop_member_order_is_transitive(
            a in member_key_strategy(),
            b in member_key_strategy(),
            c in member_key_strategy(),
        ) {
            if MemberComparer::compare(&a, &b).is_le() && MemberComparer::compare(&b, &c).is_le() {
                prop_assert!(MemberComparer::compare(&a, &c).is_le());
            }
        }
    }
}
