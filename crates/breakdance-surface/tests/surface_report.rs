//! End-to-end surface report tests over the sample assembly.

use std::sync::Arc;

use breakdance_config::{PropertyRendering, SurfaceConfig};
use breakdance_surface::fixtures::{self, SAMPLE_REPORT};
use breakdance_surface::model::{Accessibility, Assembly};
use breakdance_surface::{AssemblyLoader, Baseline, PublicApi, SurfaceError};
use tempfile::TempDir;

fn type_block<'a>(report: &'a str, declaration: &str) -> &'a str {
    let start = report
        .find(declaration)
        .unwrap_or_else(|| panic!("missing block {declaration}"));
    let rest = &report[start..];
    let end = rest.find("\n}\n").map_or(rest.len(), |index| index + 3);
    &rest[..end]
}

#[test]
fn sample_report_matches_expected_text() {
    let report = PublicApi::new()
        .generate_report(&fixtures::sample_assembly())
        .unwrap();
    assert_eq!(report, SAMPLE_REPORT);
}

#[test]
fn static_class_has_no_constructor_line() {
    let report = PublicApi::new()
        .generate_type_report(&fixtures::some_static_class())
        .unwrap();
    assert_eq!(
        report,
        "public static class Breakdance.Samples.SomeStaticClass {\n\
         \tSystem.EventHandler Changed { public static add; public static remove; }\n\
         \tpublic static string get_Name()\n\
         \tpublic static void set_Name(string)\n\
         }\n\n"
    );
    assert!(!report.contains("SomeStaticClass()"));
}

#[test]
fn generic_class_renders_constant_and_constructor() {
    let report = PublicApi::new()
        .generate_type_report(&fixtures::some_generic_class())
        .unwrap();
    assert!(report.starts_with("public class Breakdance.Samples.SomeGenericClass`1<System.String> {\n"));
    assert!(report.contains("\tpublic static string YoMama = \"Yo Mama!\";\n"));
    assert!(report.contains("\tpublic SomeGenericClass`1()\n"));
}

#[test]
fn overloads_are_ordered_by_parameter_count() {
    let report = PublicApi::new()
        .generate_type_report(&fixtures::filters())
        .unwrap();
    let first = report.find("public void Filter()").unwrap();
    let second = report.find("public void Filter(int)").unwrap();
    assert!(first < second);
}

#[test]
fn declaration_rendering_lists_properties() {
    let config = SurfaceConfig {
        property_rendering: PropertyRendering::Declaration,
        ..SurfaceConfig::default()
    };
    let report = PublicApi::from_config(&config)
        .generate_type_report(&fixtures::some_static_class())
        .unwrap();
    assert!(report.contains("\tstring Name { public static get; public static set; }\n"));
    assert!(!report.contains("get_Name"));
}

#[test]
fn member_order_does_not_depend_on_metadata_order() {
    let assembly = fixtures::sample_assembly();
    let mut shuffled = assembly.clone();
    shuffled.types.reverse();
    for ty in &mut shuffled.types {
        ty.members.reverse();
    }

    let api = PublicApi::new();
    assert_eq!(
        api.generate_report(&assembly).unwrap(),
        api.generate_report(&shuffled).unwrap()
    );
}

#[test]
fn metadata_round_trip_keeps_report() {
    let assembly = fixtures::sample_assembly();
    let restored = Assembly::from_json(&assembly.to_json().unwrap()).unwrap();
    assert_eq!(restored, assembly);
}

#[test]
fn inherited_members_are_opt_in() {
    let assembly = fixtures::sample_assembly();
    let config = SurfaceConfig {
        include_inherited: true,
        ..SurfaceConfig::default()
    };

    let plain = PublicApi::new().generate_report(&assembly).unwrap();
    let inherited = PublicApi::from_config(&config)
        .generate_report(&assembly)
        .unwrap();

    let circle = "public sealed class Breakdance.Samples.Circle :";
    assert!(!type_block(&plain, circle).contains("Describe()"));
    let block = type_block(&inherited, circle);
    assert!(block.contains("\tpublic virtual string Describe()\n"));
    assert!(block.contains("\tpublic virtual string get_Name()\n"));
    // Circle's own override hides the abstract declaration.
    assert!(!block.contains("public abstract double Area()"));
}

#[test]
fn internal_types_are_not_reported() {
    let mut assembly = fixtures::sample_assembly();
    let report = PublicApi::new().generate_report(&assembly).unwrap();
    assert!(!report.contains("Helper"));

    for ty in &mut assembly.types {
        ty.accessibility = Accessibility::Internal;
    }
    assert_eq!(PublicApi::new().generate_report(&assembly).unwrap(), "");
}

#[test]
fn duplicate_types_are_rejected() {
    let mut assembly = fixtures::sample_assembly();
    assembly.types.push(fixtures::filters());
    let err = PublicApi::new().generate_report(&assembly).unwrap_err();
    assert!(matches!(err, SurfaceError::AmbiguousTypeOrder { .. }));
}

#[test]
fn report_from_disk_and_baseline_comparison() {
    let dir = TempDir::new().unwrap();
    let metadata = dir.path().join("Breakdance.Samples.surface.json");
    std::fs::write(&metadata, fixtures::sample_assembly().to_json().unwrap()).unwrap();

    let api = PublicApi::new().with_loader(Arc::new(AssemblyLoader::new()));
    let report = api.report_for_path(&metadata).unwrap();

    let baseline = Baseline::new(SAMPLE_REPORT.replace('\n', "\r\n"));
    assert!(baseline.compare(&report).is_match());
}

#[test]
fn unresolvable_path_is_a_clean_negative() {
    let dir = TempDir::new().unwrap();
    let api = PublicApi::new().with_loader(Arc::new(AssemblyLoader::new()));
    assert!(api
        .try_report_for_path(dir.path().join("Nope.surface.json"))
        .is_none());
}
