//! Fluent construction of symbol tables in code.
//!
//! # Example
//!
//! ```
//! use breakdance_surface::builder::{MethodBuilder, TypeBuilder};
//! use breakdance_surface::model::TypeRef;
//!
//! let widget = TypeBuilder::class("Sample", "Widget")
//!     .method(MethodBuilder::new("Render", TypeRef::void()).build())
//!     .build();
//! assert_eq!(widget.full_name(), "Sample.Widget");
//! ```

use crate::model::{
    AccessorInfo, Accessibility, Assembly, ConstructorInfo, Dispatch, EventInfo, FieldInfo,
    Literal, MemberInfo, MethodInfo, Parameter, PropertyInfo, TypeInfo, TypeKind, TypeRef,
};

/// Builder for [`TypeInfo`].
#[derive(Debug, Clone)]
#[must_use]
pub struct TypeBuilder {
    ty: TypeInfo,
}

impl TypeBuilder {
    /// Starts a type of the given kind.
    pub fn new(kind: TypeKind, namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            ty: TypeInfo {
                namespace: Some(namespace.into()),
                name: name.into(),
                kind,
                accessibility: Accessibility::Public,
                is_abstract: false,
                is_sealed: false,
                is_static: false,
                generic_parameters: Vec::new(),
                generic_arguments: Vec::new(),
                base_type: None,
                interfaces: Vec::new(),
                underlying_type: None,
                attributes: Vec::new(),
                members: Vec::new(),
                nested_types: Vec::new(),
            },
        }
    }

    /// Starts a class deriving from `System.Object`.
    pub fn class(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(TypeKind::Class, namespace, name).base(TypeRef::object())
    }

    /// Starts a struct. Structs are implicitly sealed.
    pub fn structure(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        let mut builder = Self::new(TypeKind::Struct, namespace, name);
        builder.ty.is_sealed = true;
        builder
    }

    /// Starts an interface. Interfaces are implicitly abstract.
    pub fn interface(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        let mut builder = Self::new(TypeKind::Interface, namespace, name);
        builder.ty.is_abstract = true;
        builder
    }

    /// Starts an enum over `System.Int32`.
    pub fn enumeration(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        let mut builder = Self::new(TypeKind::Enum, namespace, name);
        builder.ty.is_sealed = true;
        builder.ty.underlying_type = Some(TypeRef::int32());
        builder
    }

    /// Sets the accessibility.
    pub fn accessibility(mut self, accessibility: Accessibility) -> Self {
        self.ty.accessibility = accessibility;
        self
    }

    /// Marks the type `abstract`.
    pub fn abstract_(mut self) -> Self {
        self.ty.is_abstract = true;
        self
    }

    /// Marks the type `sealed`.
    pub fn sealed(mut self) -> Self {
        self.ty.is_sealed = true;
        self
    }

    /// Marks the type `static` (abstract and sealed at the metadata level).
    pub fn static_(mut self) -> Self {
        self.ty.is_static = true;
        self.ty.is_abstract = true;
        self.ty.is_sealed = true;
        self
    }

    /// Adds a generic parameter.
    pub fn generic_parameter(mut self, name: impl Into<String>) -> Self {
        self.ty.generic_parameters.push(name.into());
        self
    }

    /// Adds a generic argument of a closed generic type.
    pub fn generic_argument(mut self, argument: TypeRef) -> Self {
        self.ty.generic_arguments.push(argument);
        self
    }

    /// Sets the base class.
    pub fn base(mut self, base: TypeRef) -> Self {
        self.ty.base_type = Some(base);
        self
    }

    /// Adds an implemented interface.
    pub fn interface_impl(mut self, interface: TypeRef) -> Self {
        self.ty.interfaces.push(interface);
        self
    }

    /// Adds an attribute by full type name.
    pub fn attribute(mut self, name: impl Into<String>) -> Self {
        self.ty.attributes.push(name.into());
        self
    }

    /// Adds any member.
    pub fn member(mut self, member: MemberInfo) -> Self {
        self.ty.members.push(member);
        self
    }

    /// Adds a field.
    pub fn field(self, field: FieldInfo) -> Self {
        self.member(MemberInfo::Field(field))
    }

    /// Adds a constructor.
    pub fn constructor(self, ctor: ConstructorInfo) -> Self {
        self.member(MemberInfo::Constructor(ctor))
    }

    /// Adds a public parameterless constructor.
    pub fn default_constructor(self) -> Self {
        self.constructor(ConstructorInfo::default())
    }

    /// Adds a property.
    pub fn property(self, property: PropertyInfo) -> Self {
        self.member(MemberInfo::Property(property))
    }

    /// Adds an event.
    pub fn event(self, event: EventInfo) -> Self {
        self.member(MemberInfo::Event(event))
    }

    /// Adds a method.
    pub fn method(self, method: MethodInfo) -> Self {
        self.member(MemberInfo::Method(method))
    }

    /// Adds an enum value as a public constant of the enum's own type.
    pub fn enum_value(self, name: impl Into<String>, value: i64) -> Self {
        let own_type = TypeRef::new(self.ty.namespace.clone().unwrap_or_default(), self.ty.name.clone());
        self.field(FieldInfo::constant(name, own_type, Literal::Int(value)))
    }

    /// Adds a nested type.
    pub fn nested(mut self, nested: TypeInfo) -> Self {
        self.ty.nested_types.push(nested);
        self
    }

    /// Finishes the type.
    #[must_use]
    pub fn build(self) -> TypeInfo {
        self.ty
    }
}

impl FieldInfo {
    /// Public instance field.
    pub fn new(name: impl Into<String>, field_type: TypeRef) -> Self {
        Self {
            name: name.into(),
            field_type,
            accessibility: Accessibility::Public,
            is_static: false,
            is_readonly: false,
            literal: None,
            attributes: Vec::new(),
        }
    }

    /// Public constant.
    pub fn constant(name: impl Into<String>, field_type: TypeRef, literal: Literal) -> Self {
        Self {
            is_static: true,
            literal: Some(literal),
            ..Self::new(name, field_type)
        }
    }

    /// Sets the accessibility.
    #[must_use]
    pub fn with_accessibility(mut self, accessibility: Accessibility) -> Self {
        self.accessibility = accessibility;
        self
    }

    /// Marks the field `static`.
    #[must_use]
    pub fn static_(mut self) -> Self {
        self.is_static = true;
        self
    }

    /// Marks the field `readonly`.
    #[must_use]
    pub fn readonly(mut self) -> Self {
        self.is_readonly = true;
        self
    }

    /// Adds an attribute.
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>) -> Self {
        self.attributes.push(name.into());
        self
    }
}

impl ConstructorInfo {
    /// Public constructor with the given parameters.
    #[must_use]
    pub fn with_parameters(parameters: Vec<Parameter>) -> Self {
        Self {
            parameters,
            ..Self::default()
        }
    }

    /// Sets the accessibility.
    #[must_use]
    pub fn with_accessibility(mut self, accessibility: Accessibility) -> Self {
        self.accessibility = accessibility;
        self
    }

    /// Static type initializer.
    #[must_use]
    pub fn type_initializer() -> Self {
        Self {
            accessibility: Accessibility::Private,
            is_static: true,
            ..Self::default()
        }
    }
}

impl PropertyInfo {
    /// Public read/write property.
    pub fn new(name: impl Into<String>, property_type: TypeRef) -> Self {
        Self {
            name: name.into(),
            property_type,
            is_static: false,
            dispatch: Dispatch::None,
            getter: Some(AccessorInfo::new(Accessibility::Public)),
            setter: Some(AccessorInfo::new(Accessibility::Public)),
            index_parameters: Vec::new(),
            attributes: Vec::new(),
        }
    }

    /// Public read-only property.
    pub fn read_only(name: impl Into<String>, property_type: TypeRef) -> Self {
        Self {
            setter: None,
            ..Self::new(name, property_type)
        }
    }

    /// Sets the setter, `None` removing it.
    #[must_use]
    pub fn with_setter(mut self, setter: Option<AccessorInfo>) -> Self {
        self.setter = setter;
        self
    }

    /// Sets the getter, `None` removing it.
    #[must_use]
    pub fn with_getter(mut self, getter: Option<AccessorInfo>) -> Self {
        self.getter = getter;
        self
    }

    /// Marks the property `static`.
    #[must_use]
    pub fn static_(mut self) -> Self {
        self.is_static = true;
        self
    }

    /// Sets the dispatch modifier.
    #[must_use]
    pub fn with_dispatch(mut self, dispatch: Dispatch) -> Self {
        self.dispatch = dispatch;
        self
    }

    /// Adds an indexer parameter.
    #[must_use]
    pub fn index_parameter(mut self, name: impl Into<String>, parameter_type: TypeRef) -> Self {
        self.index_parameters.push(Parameter::new(name, parameter_type));
        self
    }

    /// Adds an attribute.
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>) -> Self {
        self.attributes.push(name.into());
        self
    }
}

impl EventInfo {
    /// Public event with public accessors.
    pub fn new(name: impl Into<String>, handler_type: TypeRef) -> Self {
        Self {
            name: name.into(),
            handler_type,
            is_static: false,
            dispatch: Dispatch::None,
            add: AccessorInfo::default(),
            remove: AccessorInfo::default(),
            attributes: Vec::new(),
        }
    }

    /// Marks the event `static`.
    #[must_use]
    pub fn static_(mut self) -> Self {
        self.is_static = true;
        self
    }
}

/// Builder for [`MethodInfo`].
#[derive(Debug, Clone)]
#[must_use]
pub struct MethodBuilder {
    method: MethodInfo,
}

impl MethodBuilder {
    /// Starts a public, non-virtual instance method.
    pub fn new(name: impl Into<String>, return_type: TypeRef) -> Self {
        Self {
            method: MethodInfo {
                name: name.into(),
                return_type,
                accessibility: Accessibility::Public,
                is_static: false,
                dispatch: Dispatch::None,
                generic_parameters: Vec::new(),
                parameters: Vec::new(),
                attributes: Vec::new(),
            },
        }
    }

    /// Sets the accessibility.
    pub fn accessibility(mut self, accessibility: Accessibility) -> Self {
        self.method.accessibility = accessibility;
        self
    }

    /// Marks the method `static`.
    pub fn static_(mut self) -> Self {
        self.method.is_static = true;
        self
    }

    /// Sets the dispatch modifier.
    pub fn dispatch(mut self, dispatch: Dispatch) -> Self {
        self.method.dispatch = dispatch;
        self
    }

    /// Adds a generic parameter.
    pub fn generic_parameter(mut self, name: impl Into<String>) -> Self {
        self.method.generic_parameters.push(name.into());
        self
    }

    /// Adds a parameter.
    pub fn parameter(mut self, name: impl Into<String>, parameter_type: TypeRef) -> Self {
        self.method.parameters.push(Parameter::new(name, parameter_type));
        self
    }

    /// Adds an attribute.
    pub fn attribute(mut self, name: impl Into<String>) -> Self {
        self.method.attributes.push(name.into());
        self
    }

    /// Finishes the method.
    #[must_use]
    pub fn build(self) -> MethodInfo {
        self.method
    }
}

/// Builder for [`Assembly`].
#[derive(Debug, Clone)]
#[must_use]
pub struct AssemblyBuilder {
    assembly: Assembly,
}

impl AssemblyBuilder {
    /// Starts an empty assembly.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            assembly: Assembly::new(name),
        }
    }

    /// Sets the version.
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.assembly.version = Some(version.into());
        self
    }

    /// Adds a top-level type.
    pub fn ty(mut self, ty: TypeInfo) -> Self {
        self.assembly.types.push(ty);
        self
    }

    /// Finishes the assembly.
    #[must_use]
    pub fn build(self) -> Assembly {
        self.assembly
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_defaults() {
        let ty = TypeBuilder::class("Sample", "Widget").build();
        assert_eq!(ty.kind, TypeKind::Class);
        assert_eq!(ty.accessibility, Accessibility::Public);
        assert_eq!(ty.base_type, Some(TypeRef::object()));
        assert!(ty.members.is_empty());
    }

    #[test]
    fn test_static_marks_abstract_and_sealed() {
        let ty = TypeBuilder::class("Sample", "Helpers").static_().build();
        assert!(ty.is_static && ty.is_abstract && ty.is_sealed);
        assert!(ty.is_static_like());
    }

    #[test]
    fn test_enum_values() {
        let ty = TypeBuilder::enumeration("Sample", "Color")
            .enum_value("Red", 0)
            .build();
        match &ty.members[0] {
            MemberInfo::Field(field) => {
                assert_eq!(field.field_type.name, "Color");
                assert_eq!(field.literal, Some(Literal::Int(0)));
            }
            other => panic!("unexpected member {other:?}"),
        }
    }

    #[test]
    fn test_sealed_with_instance_member_is_not_static_like() {
        let ty = TypeBuilder::class("Sample", "Token")
            .sealed()
            .default_constructor()
            .method(MethodBuilder::new("Refresh", TypeRef::void()).build())
            .build();
        assert!(!ty.is_static_like());
    }

    #[test]
    fn test_sealed_with_only_static_members_is_static_like() {
        let ty = TypeBuilder::class("Sample", "Constants")
            .sealed()
            .default_constructor()
            .field(FieldInfo::constant("Answer", TypeRef::int32(), Literal::Int(42)))
            .build();
        assert!(ty.is_static_like());
    }

    #[test]
    fn test_sealed_with_parameterized_ctor_is_not_static_like() {
        let ty = TypeBuilder::class("Sample", "Factory")
            .sealed()
            .constructor(ConstructorInfo::with_parameters(vec![Parameter::new(
                "seed",
                TypeRef::int32(),
            )]))
            .method(MethodBuilder::new("Create", TypeRef::object()).static_().build())
            .build();
        assert!(!ty.is_static_like());
    }
}
