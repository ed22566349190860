//! Symbol table describing a compiled assembly.
//!
//! The table is the input to every report: types, their members, and the
//! type references those members mention. It is usually read from a
//! `*.surface.json` metadata file, but the [`builder`](crate::builder)
//! module can also construct it in code.

use serde::{Deserialize, Serialize};

/// Declared accessibility of a type or member.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Accessibility {
    /// `public`
    #[default]
    Public,
    /// `protected`
    Protected,
    /// `protected internal`
    ProtectedInternal,
    /// `internal`
    Internal,
    /// `private protected`
    PrivateProtected,
    /// `private`
    Private,
}

/// Accessibility levels that make a member part of the public surface.
pub const VISIBILITY_MASK: [Accessibility; 3] = [
    Accessibility::Public,
    Accessibility::Protected,
    Accessibility::ProtectedInternal,
];

impl Accessibility {
    /// Source keyword for this accessibility.
    #[must_use]
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Protected => "protected",
            Self::ProtectedInternal => "protected internal",
            Self::Internal => "internal",
            Self::PrivateProtected => "private protected",
            Self::Private => "private",
        }
    }

    /// Returns true if this level is inside the [`VISIBILITY_MASK`].
    #[must_use]
    pub const fn is_visible(self) -> bool {
        matches!(
            self,
            Self::Public | Self::Protected | Self::ProtectedInternal
        )
    }
}

/// Kind of a type declaration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeKind {
    /// Reference type.
    #[default]
    Class,
    /// Value type.
    Struct,
    /// Enumeration.
    Enum,
    /// Interface.
    Interface,
    /// Delegate.
    Delegate,
}

impl TypeKind {
    /// Source keyword for this kind.
    #[must_use]
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Class => "class",
            Self::Struct => "struct",
            Self::Enum => "enum",
            Self::Interface => "interface",
            Self::Delegate => "delegate",
        }
    }
}

/// Reference to a type from a signature.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeRef {
    /// Namespace, absent for generic parameters and global types.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,

    /// Simple name without generic arity.
    pub name: String,

    /// Arguments of a constructed generic type.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub generic_arguments: Vec<TypeRef>,

    /// True when this refers to an open generic parameter such as `T`.
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_generic_parameter: bool,

    /// Array rank; zero for non-array types.
    #[serde(default, skip_serializing_if = "is_zero")]
    pub array_rank: u8,
}

#[allow(clippy::trivially_copy_pass_by_ref)]
const fn is_false(value: &bool) -> bool {
    !*value
}

#[allow(clippy::trivially_copy_pass_by_ref)]
const fn is_zero(value: &u8) -> bool {
    *value == 0
}

impl TypeRef {
    /// Creates a reference to a non-generic type.
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: Some(namespace.into()),
            name: name.into(),
            generic_arguments: Vec::new(),
            is_generic_parameter: false,
            array_rank: 0,
        }
    }

    /// Creates a constructed generic type reference.
    pub fn generic(
        namespace: impl Into<String>,
        name: impl Into<String>,
        arguments: Vec<Self>,
    ) -> Self {
        Self {
            generic_arguments: arguments,
            ..Self::new(namespace, name)
        }
    }

    /// Creates a reference to an open generic parameter.
    pub fn parameter(name: impl Into<String>) -> Self {
        Self {
            namespace: None,
            name: name.into(),
            generic_arguments: Vec::new(),
            is_generic_parameter: true,
            array_rank: 0,
        }
    }

    /// Wraps this reference in a one-dimensional array.
    #[must_use]
    pub fn array(mut self) -> Self {
        self.array_rank = 1;
        self
    }

    /// `System.String`
    #[must_use]
    pub fn string() -> Self {
        Self::new("System", "String")
    }

    /// `System.Int32`
    #[must_use]
    pub fn int32() -> Self {
        Self::new("System", "Int32")
    }

    /// `System.Boolean`
    #[must_use]
    pub fn boolean() -> Self {
        Self::new("System", "Boolean")
    }

    /// `System.Double`
    #[must_use]
    pub fn double() -> Self {
        Self::new("System", "Double")
    }

    /// `System.Object`
    #[must_use]
    pub fn object() -> Self {
        Self::new("System", "Object")
    }

    /// `System.Void`
    #[must_use]
    pub fn void() -> Self {
        Self::new("System", "Void")
    }

    /// Returns true for a constructed generic type.
    #[must_use]
    pub fn is_generic(&self) -> bool {
        !self.generic_arguments.is_empty()
    }

    /// Simple name with a `` `arity `` suffix for generic types.
    #[must_use]
    pub fn arity_name(&self) -> String {
        if self.is_generic() {
            format!("{}`{}", self.name, self.generic_arguments.len())
        } else {
            self.name.clone()
        }
    }

    /// `Namespace.Name` plus arity, without arguments or array suffix.
    #[must_use]
    pub fn definition_name(&self) -> String {
        match &self.namespace {
            Some(namespace) if !namespace.is_empty() => {
                format!("{namespace}.{}", self.arity_name())
            }
            _ => self.arity_name(),
        }
    }

    /// Full name, always available: generic parameters render bare.
    #[must_use]
    pub fn qualified_name(&self) -> String {
        let mut name = if self.is_generic_parameter {
            self.name.clone()
        } else {
            self.definition_name()
        };
        if self.is_generic() {
            let arguments: Vec<String> =
                self.generic_arguments.iter().map(Self::qualified_name).collect();
            name.push('<');
            name.push_str(&arguments.join(", "));
            name.push('>');
        }
        name.push_str(&array_suffix(self.array_rank));
        name
    }

    /// Full name, or `None` when the reference is or contains an open
    /// generic parameter.
    #[must_use]
    pub fn full_name(&self) -> Option<String> {
        if self.mentions_generic_parameter() {
            None
        } else {
            Some(self.qualified_name())
        }
    }

    /// Name used in ordering keys: the full name, else the simple name.
    #[must_use]
    pub fn sort_name(&self) -> String {
        self.full_name()
            .unwrap_or_else(|| format!("{}{}", self.arity_name(), array_suffix(self.array_rank)))
    }

    fn mentions_generic_parameter(&self) -> bool {
        self.is_generic_parameter
            || self
                .generic_arguments
                .iter()
                .any(Self::mentions_generic_parameter)
    }
}

/// `[]` for rank one, `[,]` for rank two, and so on.
#[must_use]
pub fn array_suffix(rank: u8) -> String {
    match rank {
        0 => String::new(),
        rank => format!("[{}]", ",".repeat(usize::from(rank) - 1)),
    }
}

/// Compile-time constant value of a field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Literal {
    /// `null`
    Null,
    /// Boolean constant.
    Bool(bool),
    /// Character constant.
    Char(char),
    /// String constant.
    String(String),
    /// Signed integral constant.
    Int(i64),
    /// Unsigned integral constant.
    UInt(u64),
    /// Floating point constant.
    Float(f64),
}

/// Method, constructor or indexer parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    /// Parameter name.
    pub name: String,
    /// Parameter type.
    #[serde(rename = "type")]
    pub parameter_type: TypeRef,
}

impl Parameter {
    /// Creates a parameter.
    pub fn new(name: impl Into<String>, parameter_type: TypeRef) -> Self {
        Self {
            name: name.into(),
            parameter_type,
        }
    }
}

/// Virtual dispatch modifier of a method, property or event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dispatch {
    /// Non-virtual.
    #[default]
    None,
    /// `virtual`
    Virtual,
    /// `abstract`
    Abstract,
    /// `override`
    Override,
    /// `sealed override`
    SealedOverride,
}

impl Dispatch {
    /// Source keyword, if any.
    #[must_use]
    pub const fn keyword(self) -> Option<&'static str> {
        match self {
            Self::None => None,
            Self::Virtual => Some("virtual"),
            Self::Abstract => Some("abstract"),
            Self::Override => Some("override"),
            Self::SealedOverride => Some("sealed override"),
        }
    }
}

/// Field declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldInfo {
    /// Field name.
    pub name: String,
    /// Field type.
    #[serde(rename = "type")]
    pub field_type: TypeRef,
    /// Declared accessibility.
    #[serde(default)]
    pub accessibility: Accessibility,
    /// `static`
    #[serde(default)]
    pub is_static: bool,
    /// `readonly`
    #[serde(default)]
    pub is_readonly: bool,
    /// Constant value; present only for `const` fields and enum values.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub literal: Option<Literal>,
    /// Attribute full type names.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<String>,
}

/// Instance or static constructor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstructorInfo {
    /// Declared accessibility.
    #[serde(default)]
    pub accessibility: Accessibility,
    /// True for a type initializer.
    #[serde(default)]
    pub is_static: bool,
    /// Constructor parameters.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<Parameter>,
    /// Attribute full type names.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<String>,
}

/// A property or event accessor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccessorInfo {
    /// Declared accessibility.
    #[serde(default)]
    pub accessibility: Accessibility,
}

impl AccessorInfo {
    /// Accessor with the given accessibility.
    #[must_use]
    pub const fn new(accessibility: Accessibility) -> Self {
        Self { accessibility }
    }
}

/// Property or indexer declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyInfo {
    /// Property name (`Item` for indexers).
    pub name: String,
    /// Property type.
    #[serde(rename = "type")]
    pub property_type: TypeRef,
    /// `static`
    #[serde(default)]
    pub is_static: bool,
    /// Virtual dispatch modifier.
    #[serde(default)]
    pub dispatch: Dispatch,
    /// Getter, when declared.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub getter: Option<AccessorInfo>,
    /// Setter, when declared.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub setter: Option<AccessorInfo>,
    /// Indexer parameters.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub index_parameters: Vec<Parameter>,
    /// Attribute full type names.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<String>,
}

impl PropertyInfo {
    /// The `get_Name` method backing the getter, if there is one.
    #[must_use]
    pub fn getter_method(&self) -> Option<MethodInfo> {
        self.getter.map(|getter| MethodInfo {
            name: format!("get_{}", self.name),
            return_type: self.property_type.clone(),
            accessibility: getter.accessibility,
            is_static: self.is_static,
            dispatch: self.dispatch,
            generic_parameters: Vec::new(),
            parameters: self.index_parameters.clone(),
            attributes: Vec::new(),
        })
    }

    /// The `set_Name` method backing the setter, if there is one.
    #[must_use]
    pub fn setter_method(&self) -> Option<MethodInfo> {
        self.setter.map(|setter| {
            let mut parameters = self.index_parameters.clone();
            parameters.push(Parameter::new("value", self.property_type.clone()));
            MethodInfo {
                name: format!("set_{}", self.name),
                return_type: TypeRef::void(),
                accessibility: setter.accessibility,
                is_static: self.is_static,
                dispatch: self.dispatch,
                generic_parameters: Vec::new(),
                parameters,
                attributes: Vec::new(),
            }
        })
    }

    /// Returns true if any accessor is in the visibility mask.
    #[must_use]
    pub fn has_visible_accessor(&self) -> bool {
        self.getter
            .iter()
            .chain(self.setter.iter())
            .any(|accessor| accessor.accessibility.is_visible())
    }
}

/// Event declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventInfo {
    /// Event name.
    pub name: String,
    /// Delegate type of the handler.
    pub handler_type: TypeRef,
    /// `static`
    #[serde(default)]
    pub is_static: bool,
    /// Virtual dispatch modifier.
    #[serde(default)]
    pub dispatch: Dispatch,
    /// `add` accessor.
    #[serde(default)]
    pub add: AccessorInfo,
    /// `remove` accessor.
    #[serde(default)]
    pub remove: AccessorInfo,
    /// Attribute full type names.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<String>,
}

/// Method declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodInfo {
    /// Method name.
    pub name: String,
    /// Return type.
    pub return_type: TypeRef,
    /// Declared accessibility.
    #[serde(default)]
    pub accessibility: Accessibility,
    /// `static`
    #[serde(default)]
    pub is_static: bool,
    /// Virtual dispatch modifier.
    #[serde(default)]
    pub dispatch: Dispatch,
    /// Generic parameter names of a generic method.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub generic_parameters: Vec<String>,
    /// Method parameters.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<Parameter>,
    /// Attribute full type names.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<String>,
}

/// A member declared directly on a type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MemberInfo {
    /// Field or constant.
    Field(FieldInfo),
    /// Constructor.
    Constructor(ConstructorInfo),
    /// Property or indexer.
    Property(PropertyInfo),
    /// Event.
    Event(EventInfo),
    /// Method.
    Method(MethodInfo),
    /// A member kind this version does not understand.
    #[serde(other)]
    Unknown,
}

impl MemberInfo {
    /// Returns true for static members. Type initializers count as static.
    #[must_use]
    pub const fn is_static(&self) -> bool {
        match self {
            Self::Field(field) => field.is_static || field.literal.is_some(),
            Self::Constructor(ctor) => ctor.is_static,
            Self::Property(property) => property.is_static,
            Self::Event(event) => event.is_static,
            Self::Method(method) => method.is_static,
            Self::Unknown => false,
        }
    }

    /// Returns the member as a constructor.
    #[must_use]
    pub const fn as_constructor(&self) -> Option<&ConstructorInfo> {
        match self {
            Self::Constructor(ctor) => Some(ctor),
            _ => None,
        }
    }
}

/// Type declaration, including its members and nested types.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeInfo {
    /// Namespace; nested types inherit their parent's.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    /// Simple name without generic arity.
    pub name: String,
    /// Declaration kind.
    #[serde(default)]
    pub kind: TypeKind,
    /// Declared accessibility.
    #[serde(default)]
    pub accessibility: Accessibility,
    /// `abstract`
    #[serde(default)]
    pub is_abstract: bool,
    /// `sealed`
    #[serde(default)]
    pub is_sealed: bool,
    /// `static`
    #[serde(default)]
    pub is_static: bool,
    /// Generic parameter names of a generic definition.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub generic_parameters: Vec<String>,
    /// Arguments when the metadata describes a closed generic type.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub generic_arguments: Vec<TypeRef>,
    /// Base class.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_type: Option<TypeRef>,
    /// Implemented interfaces.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub interfaces: Vec<TypeRef>,
    /// Underlying integral type of an enum.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub underlying_type: Option<TypeRef>,
    /// Attribute full type names.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<String>,
    /// Declared members.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub members: Vec<MemberInfo>,
    /// Nested type declarations.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub nested_types: Vec<TypeInfo>,
}

impl TypeInfo {
    /// Generic arity: number of parameters or arguments.
    #[must_use]
    pub fn arity(&self) -> usize {
        self.generic_parameters
            .len()
            .max(self.generic_arguments.len())
    }

    /// Simple name with a `` `arity `` suffix for generic types.
    #[must_use]
    pub fn arity_name(&self) -> String {
        match self.arity() {
            0 => self.name.clone(),
            arity => format!("{}`{arity}", self.name),
        }
    }

    /// Full name of a top-level type: `Namespace.Name`arity`.
    #[must_use]
    pub fn full_name(&self) -> String {
        match &self.namespace {
            Some(namespace) if !namespace.is_empty() => {
                format!("{namespace}.{}", self.arity_name())
            }
            _ => self.arity_name(),
        }
    }

    /// Full name of this type nested inside `parent_full_name`.
    #[must_use]
    pub fn nested_full_name(&self, parent_full_name: &str) -> String {
        format!("{parent_full_name}+{}", self.arity_name())
    }

    /// Iterates over declared constructors.
    pub fn constructors(&self) -> impl Iterator<Item = &ConstructorInfo> {
        self.members.iter().filter_map(MemberInfo::as_constructor)
    }

    /// Returns true if the type behaves like a static class: it is declared
    /// static, or it is sealed, declares only static non-constructor members
    /// (at least one), and exposes no visible constructor taking parameters.
    #[must_use]
    pub fn is_static_like(&self) -> bool {
        if self.is_static {
            return true;
        }
        if !self.is_sealed {
            return false;
        }

        let has_parameterized_ctor = self
            .constructors()
            .any(|ctor| ctor.accessibility.is_visible() && !ctor.parameters.is_empty());
        if has_parameterized_ctor {
            return false;
        }

        let mut others = self
            .members
            .iter()
            .filter(|member| !matches!(member, MemberInfo::Constructor(_) | MemberInfo::Unknown))
            .peekable();
        others.peek().is_some() && others.all(MemberInfo::is_static)
    }
}

/// A compiled assembly's symbol table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assembly {
    /// Assembly simple name.
    pub name: String,
    /// Assembly version, if recorded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Top-level types.
    #[serde(default)]
    pub types: Vec<TypeInfo>,
}

impl Assembly {
    /// Creates an empty assembly.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: None,
            types: Vec::new(),
        }
    }

    /// Finds a type by full name, following `+` into nested types.
    #[must_use]
    pub fn find_type(&self, full_name: &str) -> Option<&TypeInfo> {
        let mut parts = full_name.split('+');
        let outer = parts.next()?;
        let mut current = self.types.iter().find(|ty| ty.full_name() == outer)?;
        for part in parts {
            current = current
                .nested_types
                .iter()
                .find(|nested| nested.arity_name() == part)?;
        }
        Some(current)
    }

    /// Parses an assembly from its JSON metadata.
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error for malformed metadata.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serializes the assembly as pretty JSON metadata.
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
