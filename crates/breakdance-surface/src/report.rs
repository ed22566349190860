//! Plain text rendering of type definitions.
//!
//! The layout is fixed: attribute lines, the declaration with an opening
//! brace, tab-indented members, a closing brace and one blank line. Lines
//! are always separated by `\n`.

use std::fmt::Write as _;

use crate::definition::TypeDefinition;

/// Renders sorted type definitions into a report.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReportRenderer;

impl ReportRenderer {
    /// Renders all definitions in the given order.
    #[must_use]
    pub fn render(definitions: &[TypeDefinition]) -> String {
        let mut report = String::new();
        for definition in definitions {
            Self::render_type(definition, &mut report);
        }
        report
    }

    /// Appends one type block to `out`.
    pub fn render_type(definition: &TypeDefinition, out: &mut String) {
        for attribute in definition.attributes() {
            let _ = writeln!(out, "{attribute}");
        }
        let _ = writeln!(out, "{} {{", definition.declaration());

        for member in definition.members() {
            for attribute in member.attributes() {
                let _ = writeln!(out, "\t{attribute}");
            }
            let _ = writeln!(out, "\t{}", member.member_name());
        }

        out.push_str("}\n\n");
    }
}
