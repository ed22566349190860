//! Canonical text for members and type declarations.
//!
//! Every line of a surface report comes from here. The output must be
//! identical across runs and machines, so nothing in this module depends on
//! metadata ordering, hash iteration or the host platform.

use std::borrow::Cow;

use breakdance_config::{PropertyRendering, SurfaceConfig};

use crate::model::{
    array_suffix, Accessibility, ConstructorInfo, Dispatch, EventInfo, FieldInfo, Literal,
    MemberInfo, MethodInfo, Parameter, PropertyInfo, TypeInfo, TypeKind, TypeRef,
};
use crate::ordering::MemberKind;

/// C# keyword aliases for built-in types.
const BUILTIN_ALIASES: &[(&str, &str)] = &[
    ("System.Boolean", "bool"),
    ("System.Byte", "byte"),
    ("System.SByte", "sbyte"),
    ("System.Char", "char"),
    ("System.Decimal", "decimal"),
    ("System.Double", "double"),
    ("System.Single", "float"),
    ("System.Int16", "short"),
    ("System.UInt16", "ushort"),
    ("System.Int32", "int"),
    ("System.UInt32", "uint"),
    ("System.Int64", "long"),
    ("System.UInt64", "ulong"),
    ("System.IntPtr", "nint"),
    ("System.UIntPtr", "nuint"),
    ("System.Object", "object"),
    ("System.String", "string"),
    ("System.Void", "void"),
];

/// A borrowed view of something that can appear as a report member.
///
/// Synthesized property accessors are owned, everything else borrows from
/// the symbol table.
#[derive(Debug, Clone)]
pub enum MemberRef<'a> {
    /// Field or constant.
    Field(&'a FieldInfo),
    /// Constructor.
    Constructor(&'a ConstructorInfo),
    /// Property.
    Property(&'a PropertyInfo),
    /// Event.
    Event(&'a EventInfo),
    /// Method, declared or synthesized.
    Method(Cow<'a, MethodInfo>),
    /// Nested type listed as a member of its parent.
    NestedType(&'a TypeInfo),
    /// Unrecognized member kind.
    Unknown,
}

impl<'a> From<&'a MemberInfo> for MemberRef<'a> {
    fn from(member: &'a MemberInfo) -> Self {
        match member {
            MemberInfo::Field(field) => Self::Field(field),
            MemberInfo::Constructor(ctor) => Self::Constructor(ctor),
            MemberInfo::Property(property) => Self::Property(property),
            MemberInfo::Event(event) => Self::Event(event),
            MemberInfo::Method(method) => Self::Method(Cow::Borrowed(method)),
            MemberInfo::Unknown => Self::Unknown,
        }
    }
}

impl MemberRef<'_> {
    /// Kind used for ordering.
    #[must_use]
    pub const fn kind(&self) -> MemberKind {
        match self {
            Self::Field(_) => MemberKind::Field,
            Self::Constructor(_) => MemberKind::Constructor,
            Self::Property(_) => MemberKind::Property,
            Self::Event(_) => MemberKind::Event,
            Self::Method(_) => MemberKind::Method,
            Self::NestedType(_) => MemberKind::NestedType,
            Self::Unknown => MemberKind::Custom,
        }
    }

    /// Metadata name: `.ctor` for constructors, arity name for nested types.
    #[must_use]
    pub fn name(&self) -> Cow<'_, str> {
        match self {
            Self::Field(field) => Cow::Borrowed(field.name.as_str()),
            Self::Constructor(_) => Cow::Borrowed(".ctor"),
            Self::Property(property) => Cow::Borrowed(property.name.as_str()),
            Self::Event(event) => Cow::Borrowed(event.name.as_str()),
            Self::Method(method) => Cow::Borrowed(method.name.as_str()),
            Self::NestedType(ty) => Cow::Owned(ty.arity_name()),
            Self::Unknown => Cow::Borrowed(""),
        }
    }

    /// Parameters that take part in the signature.
    #[must_use]
    pub fn parameters(&self) -> &[Parameter] {
        match self {
            Self::Constructor(ctor) => &ctor.parameters,
            Self::Property(property) => &property.index_parameters,
            Self::Method(method) => &method.parameters,
            _ => &[],
        }
    }

    /// Generic arity of a method; zero for everything else.
    #[must_use]
    pub fn generic_arity(&self) -> usize {
        match self {
            Self::Method(method) => method.generic_parameters.len(),
            _ => 0,
        }
    }

    /// Return type of a method.
    #[must_use]
    pub fn return_type(&self) -> Option<&TypeRef> {
        match self {
            Self::Method(method) => Some(&method.return_type),
            _ => None,
        }
    }

    /// Attribute full type names.
    #[must_use]
    pub fn attributes(&self) -> &[String] {
        match self {
            Self::Field(field) => &field.attributes,
            Self::Constructor(ctor) => &ctor.attributes,
            Self::Property(property) => &property.attributes,
            Self::Event(event) => &event.attributes,
            Self::Method(method) => &method.attributes,
            Self::NestedType(ty) => &ty.attributes,
            Self::Unknown => &[],
        }
    }

    /// Returns true for static members.
    #[must_use]
    pub fn is_static(&self) -> bool {
        match self {
            Self::Field(field) => field.is_static || field.literal.is_some(),
            Self::Constructor(ctor) => ctor.is_static,
            Self::Property(property) => property.is_static,
            Self::Event(event) => event.is_static,
            Self::Method(method) => method.is_static,
            Self::NestedType(_) | Self::Unknown => false,
        }
    }

    /// Returns true if the member has an accessibility inside the mask.
    ///
    /// Properties and events have no accessibility of their own; they are
    /// visible through any visible accessor.
    #[must_use]
    pub fn is_visible(&self) -> bool {
        match self {
            Self::Field(field) => field.accessibility.is_visible(),
            Self::Constructor(ctor) => ctor.accessibility.is_visible(),
            Self::Property(property) => property.has_visible_accessor(),
            Self::Event(event) => {
                event.add.accessibility.is_visible() || event.remove.accessibility.is_visible()
            }
            Self::Method(method) => method.accessibility.is_visible(),
            Self::NestedType(ty) => ty.accessibility.is_visible(),
            Self::Unknown => false,
        }
    }
}

/// Renders members and type declarations as canonical strings.
#[derive(Debug, Clone)]
pub struct SignatureCanonicalizer {
    property_rendering: PropertyRendering,
    exclusion_attributes: Vec<String>,
}

impl Default for SignatureCanonicalizer {
    fn default() -> Self {
        Self::from_config(&SurfaceConfig::default())
    }
}

impl SignatureCanonicalizer {
    /// Creates a canonicalizer.
    #[must_use]
    pub const fn new(property_rendering: PropertyRendering, exclusion_attributes: Vec<String>) -> Self {
        Self {
            property_rendering,
            exclusion_attributes,
        }
    }

    /// Creates a canonicalizer from the surface configuration section.
    #[must_use]
    pub fn from_config(config: &SurfaceConfig) -> Self {
        Self::new(config.property_rendering, config.exclusion_attributes.clone())
    }

    /// Configured property rendering.
    #[must_use]
    pub const fn property_rendering(&self) -> PropertyRendering {
        self.property_rendering
    }

    /// Returns true if any attribute is on the exclusion list.
    #[must_use]
    pub fn is_excluded(&self, attributes: &[String]) -> bool {
        attributes
            .iter()
            .any(|attribute| self.exclusion_attributes.iter().any(|excluded| excluded == attribute))
    }

    /// Canonical text for `member` declared on `declaring`.
    ///
    /// An empty string means the member is not part of the surface.
    #[must_use]
    pub fn render_member(&self, member: &MemberRef<'_>, declaring: &TypeInfo) -> String {
        if !member.is_visible() || self.is_excluded(member.attributes()) {
            return String::new();
        }

        match member {
            MemberRef::Field(field) => render_field(field),
            MemberRef::Constructor(ctor) => render_constructor(ctor, declaring),
            MemberRef::Property(property) => self.render_property(property),
            MemberRef::Event(event) => render_event(event),
            MemberRef::Method(method) => render_method(method),
            MemberRef::NestedType(ty) => {
                format!("{} {} {}", type_modifiers(ty), ty.kind.keyword(), ty.arity_name())
            }
            MemberRef::Unknown => String::new(),
        }
    }

    fn render_property(&self, property: &PropertyInfo) -> String {
        if self.property_rendering == PropertyRendering::Accessors {
            return String::new();
        }

        let mut accessors = Vec::new();
        for (keyword, accessor) in [("get", property.getter), ("set", property.setter)] {
            if let Some(accessor) = accessor.filter(|a| a.accessibility.is_visible()) {
                let modifiers =
                    member_modifiers(accessor.accessibility, property.is_static, property.dispatch);
                accessors.push(format!("{modifiers} {keyword};"));
            }
        }

        let name = if property.index_parameters.is_empty() {
            property.name.clone()
        } else {
            format!("{}[{}]", property.name, parameter_list(&property.index_parameters))
        };

        format!(
            "{} {name} {{ {} }}",
            type_display_name(&property.property_type),
            accessors.join(" ")
        )
    }

    /// Canonical declaration line of a type, without the opening brace.
    ///
    /// `full_name` is the type's full name including any `+` nesting.
    #[must_use]
    pub fn render_type_declaration(&self, ty: &TypeInfo, full_name: &str) -> String {
        let mut line = format!(
            "{} {} {full_name}{}",
            type_modifiers(ty),
            ty.kind.keyword(),
            generic_suffix(ty)
        );

        let bases = base_list(ty);
        if !bases.is_empty() {
            line.push_str(" : ");
            line.push_str(&bases.join(", "));
        }
        line
    }
}

fn render_field(field: &FieldInfo) -> String {
    if field.name.starts_with('<') || field.name.contains("k__BackingField") {
        return String::new();
    }

    let mut modifiers = vec![field.accessibility.keyword()];
    if field.is_static || field.literal.is_some() {
        modifiers.push("static");
    }
    if field.is_readonly && field.literal.is_none() {
        modifiers.push("readonly");
    }

    let mut line = format!(
        "{} {} {}",
        modifiers.join(" "),
        type_display_name(&field.field_type),
        field.name
    );
    if let Some(literal) = &field.literal {
        line.push_str(" = ");
        line.push_str(&render_literal(literal));
    }
    line.push(';');
    line
}

fn render_constructor(ctor: &ConstructorInfo, declaring: &TypeInfo) -> String {
    if ctor.is_static || (ctor.parameters.is_empty() && declaring.is_static_like()) {
        return String::new();
    }

    format!(
        "{} {}({})",
        ctor.accessibility.keyword(),
        declaring.arity_name(),
        parameter_list(&ctor.parameters)
    )
}

fn render_event(event: &EventInfo) -> String {
    let mut accessors = Vec::new();
    for (keyword, accessor) in [("add", event.add), ("remove", event.remove)] {
        if accessor.accessibility.is_visible() {
            let modifiers = member_modifiers(accessor.accessibility, event.is_static, event.dispatch);
            accessors.push(format!("{modifiers} {keyword};"));
        }
    }

    format!(
        "{} {} {{ {} }}",
        event.handler_type.qualified_name(),
        event.name,
        accessors.join(" ")
    )
}

fn render_method(method: &MethodInfo) -> String {
    let generics = if method.generic_parameters.is_empty() {
        String::new()
    } else {
        format!("<{}>", method.generic_parameters.join(", "))
    };

    format!(
        "{} {} {}{generics}({})",
        member_modifiers(method.accessibility, method.is_static, method.dispatch),
        type_display_name(&method.return_type),
        method.name,
        parameter_list(&method.parameters)
    )
}

fn member_modifiers(accessibility: Accessibility, is_static: bool, dispatch: Dispatch) -> String {
    let mut modifiers = vec![accessibility.keyword()];
    if is_static {
        modifiers.push("static");
    }
    if let Some(keyword) = dispatch.keyword() {
        modifiers.push(keyword);
    }
    modifiers.join(" ")
}

fn type_modifiers(ty: &TypeInfo) -> String {
    let mut modifiers = vec![ty.accessibility.keyword()];
    if ty.kind == TypeKind::Class {
        if ty.is_static {
            modifiers.push("static");
        } else if ty.is_abstract {
            modifiers.push("abstract");
        } else if ty.is_sealed {
            modifiers.push("sealed");
        }
    }
    modifiers.join(" ")
}

fn generic_suffix(ty: &TypeInfo) -> String {
    if !ty.generic_arguments.is_empty() {
        let arguments: Vec<String> = ty.generic_arguments.iter().map(TypeRef::qualified_name).collect();
        format!("<{}>", arguments.join(", "))
    } else if !ty.generic_parameters.is_empty() {
        format!("<{}>", ty.generic_parameters.join(", "))
    } else {
        String::new()
    }
}

fn base_list(ty: &TypeInfo) -> Vec<String> {
    let mut bases = Vec::new();
    match ty.kind {
        TypeKind::Class => {
            if let Some(base) = ty
                .base_type
                .as_ref()
                .filter(|base| base.definition_name() != "System.Object")
            {
                bases.push(base.qualified_name());
            }
        }
        TypeKind::Enum => {
            if let Some(underlying) = &ty.underlying_type {
                bases.push(type_display_name(underlying));
            }
            return bases;
        }
        TypeKind::Delegate => return bases,
        TypeKind::Struct | TypeKind::Interface => {}
    }

    let mut interfaces: Vec<String> = ty.interfaces.iter().map(TypeRef::qualified_name).collect();
    interfaces.sort();
    interfaces.dedup();
    bases.extend(interfaces);
    bases
}

fn parameter_list(parameters: &[Parameter]) -> String {
    parameters
        .iter()
        .map(|parameter| type_display_name(&parameter.parameter_type))
        .collect::<Vec<_>>()
        .join(", ")
}

fn render_literal(literal: &Literal) -> String {
    match literal {
        Literal::Null => "null".to_string(),
        Literal::Bool(value) => value.to_string(),
        Literal::Char(value) => format!("'{}'", escape(&value.to_string(), '\'')),
        Literal::String(value) => format!("\"{}\"", escape(value, '"')),
        Literal::Int(value) => value.to_string(),
        Literal::UInt(value) => value.to_string(),
        Literal::Float(value) => value.to_string(),
    }
}

fn escape(value: &str, quote: char) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '\\' => escaped.push_str("\\\\"),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            '\0' => escaped.push_str("\\0"),
            ch if ch == quote => {
                escaped.push('\\');
                escaped.push(ch);
            }
            ch => escaped.push(ch),
        }
    }
    escaped
}

/// Display name of a type reference inside a signature.
///
/// Generic types expand to `` Namespace.Name`arity<Args> ``, built-in scalars
/// use their keyword, other types their bare name. Arrays append `[]`.
#[must_use]
pub fn type_display_name(reference: &TypeRef) -> String {
    if reference.is_generic_parameter {
        return format!("{}{}", reference.name, array_suffix(reference.array_rank));
    }
    if reference.is_generic() {
        return reference.qualified_name();
    }

    let definition = reference.definition_name();
    let base = BUILTIN_ALIASES
        .iter()
        .find(|(full, _)| *full == definition)
        .map_or_else(|| reference.name.clone(), |(_, alias)| (*alias).to_string());
    format!("{base}{}", array_suffix(reference.array_rank))
}

/// Renders attribute full names as sorted `[Name]` lines.
#[must_use]
pub fn render_attributes(attributes: &[String]) -> Vec<String> {
    let mut rendered: Vec<String> = attributes.iter().map(|name| format!("[{name}]")).collect();
    rendered.sort();
    rendered.dedup();
    rendered
}
