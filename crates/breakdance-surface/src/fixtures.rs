//! Sample symbol tables for tests and documentation.
//!
//! # Example
//!
//! ```
//! use breakdance_surface::fixtures;
//!
//! let assembly = fixtures::sample_assembly();
//! assert!(assembly.find_type("Breakdance.Samples.SomeStaticClass").is_some());
//! ```

use crate::builder::{AssemblyBuilder, MethodBuilder, TypeBuilder};
use crate::model::{
    Accessibility, Assembly, ConstructorInfo, Dispatch, EventInfo, FieldInfo, Literal, Parameter,
    PropertyInfo, TypeInfo, TypeRef,
};

/// Namespace of every sample type.
pub const SAMPLE_NAMESPACE: &str = "Breakdance.Samples";

const EXTENSION_ATTRIBUTE: &str = "System.Runtime.CompilerServices.ExtensionAttribute";

fn sample(name: &str) -> TypeRef {
    TypeRef::new(SAMPLE_NAMESPACE, name)
}

/// Assembly exercising every rendering rule.
///
/// Contains a static class, a closed generic class with a constant, an
/// overloaded method, an enum, a struct, an interface, an abstract base
/// with a sealed subclass and a nested type, an internal type, and an
/// extension class in a deeper namespace.
#[must_use]
pub fn sample_assembly() -> Assembly {
    AssemblyBuilder::new("Breakdance.Samples")
        .version("1.0.0")
        .ty(some_static_class())
        .ty(some_generic_class())
        .ty(filters())
        .ty(color())
        .ty(point())
        .ty(shape_interface())
        .ty(shape_base())
        .ty(circle())
        .ty(internal_helper())
        .ty(shape_extensions())
        .build()
}

/// Static class with a static property and a static event.
#[must_use]
pub fn some_static_class() -> TypeInfo {
    TypeBuilder::class(SAMPLE_NAMESPACE, "SomeStaticClass")
        .static_()
        .default_constructor()
        .property(PropertyInfo::new("Name", TypeRef::string()).static_())
        .event(EventInfo::new("Changed", TypeRef::new("System", "EventHandler")).static_())
        .build()
}

/// `SomeGenericClass<string>` with a string constant.
#[must_use]
pub fn some_generic_class() -> TypeInfo {
    TypeBuilder::class(SAMPLE_NAMESPACE, "SomeGenericClass")
        .generic_argument(TypeRef::string())
        .default_constructor()
        .field(FieldInfo::constant(
            "YoMama",
            TypeRef::string(),
            Literal::String("Yo Mama!".to_string()),
        ))
        .build()
}

/// Class with two `Filter` overloads.
#[must_use]
pub fn filters() -> TypeInfo {
    TypeBuilder::class(SAMPLE_NAMESPACE, "Filters")
        .default_constructor()
        .method(
            MethodBuilder::new("Filter", TypeRef::void())
                .parameter("level", TypeRef::int32())
                .build(),
        )
        .method(MethodBuilder::new("Filter", TypeRef::void()).build())
        .build()
}

fn color() -> TypeInfo {
    TypeBuilder::enumeration(SAMPLE_NAMESPACE, "Color")
        .enum_value("Red", 0)
        .enum_value("Green", 1)
        .enum_value("Blue", 2)
        .build()
}

fn point() -> TypeInfo {
    TypeBuilder::structure(SAMPLE_NAMESPACE, "Point")
        .field(FieldInfo::new("Y", TypeRef::int32()))
        .field(FieldInfo::new("X", TypeRef::int32()))
        .constructor(ConstructorInfo::with_parameters(vec![
            Parameter::new("x", TypeRef::int32()),
            Parameter::new("y", TypeRef::int32()),
        ]))
        .method(
            MethodBuilder::new("ToString", TypeRef::string())
                .dispatch(Dispatch::Override)
                .build(),
        )
        .build()
}

fn shape_interface() -> TypeInfo {
    TypeBuilder::interface(SAMPLE_NAMESPACE, "IShape")
        .property(PropertyInfo::read_only("Name", TypeRef::string()).with_dispatch(Dispatch::Abstract))
        .method(
            MethodBuilder::new("Area", TypeRef::double())
                .dispatch(Dispatch::Abstract)
                .build(),
        )
        .build()
}

fn shape_base() -> TypeInfo {
    TypeBuilder::class(SAMPLE_NAMESPACE, "ShapeBase")
        .abstract_()
        .interface_impl(sample("IShape"))
        .field(
            FieldInfo::new("<Name>k__BackingField", TypeRef::string())
                .with_accessibility(Accessibility::Private)
                .with_attribute("System.Runtime.CompilerServices.CompilerGeneratedAttribute"),
        )
        .constructor(ConstructorInfo::default().with_accessibility(Accessibility::Protected))
        .property(PropertyInfo::read_only("Name", TypeRef::string()).with_dispatch(Dispatch::Virtual))
        .method(
            MethodBuilder::new("Area", TypeRef::double())
                .dispatch(Dispatch::Abstract)
                .build(),
        )
        .method(
            MethodBuilder::new("Describe", TypeRef::string())
                .dispatch(Dispatch::Virtual)
                .build(),
        )
        .method(
            MethodBuilder::new("Validate", TypeRef::boolean())
                .accessibility(Accessibility::Internal)
                .build(),
        )
        .build()
}

fn circle() -> TypeInfo {
    TypeBuilder::class(SAMPLE_NAMESPACE, "Circle")
        .sealed()
        .base(sample("ShapeBase"))
        .constructor(ConstructorInfo::with_parameters(vec![Parameter::new(
            "radius",
            TypeRef::double(),
        )]))
        .property(PropertyInfo::read_only("Radius", TypeRef::double()))
        .method(
            MethodBuilder::new("Area", TypeRef::double())
                .dispatch(Dispatch::Override)
                .build(),
        )
        .method(
            MethodBuilder::new("Convert", TypeRef::parameter("T"))
                .generic_parameter("T")
                .parameter("value", TypeRef::parameter("T"))
                .build(),
        )
        .nested(
            TypeBuilder::class(SAMPLE_NAMESPACE, "Builder")
                .sealed()
                .default_constructor()
                .method(
                    MethodBuilder::new("Build", sample("Circle"))
                        .parameter("radius", TypeRef::double())
                        .build(),
                )
                .build(),
        )
        .build()
}

fn internal_helper() -> TypeInfo {
    TypeBuilder::class(SAMPLE_NAMESPACE, "Helper")
        .accessibility(Accessibility::Internal)
        .static_()
        .method(MethodBuilder::new("Assist", TypeRef::void()).static_().build())
        .build()
}

fn shape_extensions() -> TypeInfo {
    TypeBuilder::class("Breakdance.Samples.Extensions", "ShapeExtensions")
        .static_()
        .attribute(EXTENSION_ATTRIBUTE)
        .method(
            MethodBuilder::new("Scale", sample("ShapeBase"))
                .static_()
                .parameter("shape", sample("ShapeBase"))
                .parameter("factor", TypeRef::double())
                .attribute(EXTENSION_ATTRIBUTE)
                .build(),
        )
        .build()
}

/// Expected report of [`sample_assembly`] with default settings.
pub const SAMPLE_REPORT: &str = "\
public enum Breakdance.Samples.Color : int {
\tpublic static Color Blue = 2;
\tpublic static Color Green = 1;
\tpublic static Color Red = 0;
}

public struct Breakdance.Samples.Point {
\tpublic int X;
\tpublic int Y;
\tpublic Point(int, int)
\tpublic override string ToString()
}

public interface Breakdance.Samples.IShape {
\tpublic abstract double Area()
\tpublic abstract string get_Name()
}

public abstract class Breakdance.Samples.ShapeBase : Breakdance.Samples.IShape {
\tprotected ShapeBase()
\tpublic abstract double Area()
\tpublic virtual string Describe()
\tpublic virtual string get_Name()
}

public static class Breakdance.Samples.SomeStaticClass {
\tSystem.EventHandler Changed { public static add; public static remove; }
\tpublic static string get_Name()
\tpublic static void set_Name(string)
}

public class Breakdance.Samples.Filters {
\tpublic Filters()
\tpublic void Filter()
\tpublic void Filter(int)
}

public class Breakdance.Samples.SomeGenericClass`1<System.String> {
\tpublic static string YoMama = \"Yo Mama!\";
\tpublic SomeGenericClass`1()
}

public sealed class Breakdance.Samples.Circle : Breakdance.Samples.ShapeBase {
\tpublic Circle(double)
\tpublic override double Area()
\tpublic T Convert<T>(T)
\tpublic double get_Radius()
\tpublic sealed class Builder
}

public sealed class Breakdance.Samples.Circle+Builder {
\tpublic Builder()
\tpublic Circle Build(double)
}

[System.Runtime.CompilerServices.ExtensionAttribute]
public static class Breakdance.Samples.Extensions.ShapeExtensions {
\t[System.Runtime.CompilerServices.ExtensionAttribute]
\tpublic static ShapeBase Scale(ShapeBase, double)
}

";
