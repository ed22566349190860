//! Walks a symbol table and produces sorted report records.

use std::borrow::Cow;
use std::collections::{HashMap, HashSet};

use breakdance_config::{PropertyRendering, SurfaceConfig};
use tracing::{debug, trace};

use crate::canonical::{render_attributes, MemberRef, SignatureCanonicalizer};
use crate::definition::{MemberDefinition, TypeDefinition};
use crate::error::SurfaceResult;
use crate::model::{Accessibility, Assembly, MemberInfo, TypeInfo};
use crate::ordering::{sort_members, sort_types, MemberKey, TypeCategory, TypeComparer, TypeKey};

/// Turns types into [`TypeDefinition`]s.
#[derive(Debug, Clone, Default)]
pub struct SurfaceWalker {
    canonicalizer: SignatureCanonicalizer,
    comparer: TypeComparer,
    include_inherited: bool,
}

/// Top-level types of one assembly by full name, for base type lookup.
type TypeIndex<'a> = HashMap<String, &'a TypeInfo>;

impl SurfaceWalker {
    /// Creates a walker.
    #[must_use]
    pub const fn new(canonicalizer: SignatureCanonicalizer, comparer: TypeComparer) -> Self {
        Self {
            canonicalizer,
            comparer,
            include_inherited: false,
        }
    }

    /// Creates a walker from the surface configuration section.
    #[must_use]
    pub fn from_config(config: &SurfaceConfig) -> Self {
        Self::new(
            SignatureCanonicalizer::from_config(config),
            TypeComparer::new(config.group_by_category),
        )
        .with_inherited(config.include_inherited)
    }

    /// Also report members inherited from base types in the same assembly.
    #[must_use]
    pub fn with_inherited(mut self, include_inherited: bool) -> Self {
        self.include_inherited = include_inherited;
        self
    }

    /// The canonicalizer in use.
    #[must_use]
    pub const fn canonicalizer(&self) -> &SignatureCanonicalizer {
        &self.canonicalizer
    }

    /// Every public type of the assembly, sorted.
    ///
    /// # Errors
    ///
    /// Returns an ordering error if two members or types are indistinguishable.
    pub fn walk_assembly(&self, assembly: &Assembly) -> SurfaceResult<Vec<TypeDefinition>> {
        let index = build_index(assembly);
        let mut definitions = Vec::new();

        for ty in assembly
            .types
            .iter()
            .filter(|ty| ty.accessibility == Accessibility::Public)
        {
            self.visit(ty, ty.full_name(), namespace_of(ty), Some(&index), &mut definitions)?;
        }

        debug!(
            assembly = %assembly.name,
            types = definitions.len(),
            "Walked assembly"
        );
        sort_types(&self.comparer, definitions)
    }

    /// A single type and its visible nested types, sorted.
    ///
    /// Inherited members are not available here since base types cannot be
    /// resolved without the declaring assembly.
    ///
    /// # Errors
    ///
    /// Returns an ordering error if two members or types are indistinguishable.
    pub fn walk_type(&self, ty: &TypeInfo) -> SurfaceResult<Vec<TypeDefinition>> {
        let mut definitions = Vec::new();
        self.visit(ty, ty.full_name(), namespace_of(ty), None, &mut definitions)?;
        sort_types(&self.comparer, definitions)
    }

    fn visit(
        &self,
        ty: &TypeInfo,
        full_name: String,
        namespace: String,
        index: Option<&TypeIndex<'_>>,
        out: &mut Vec<TypeDefinition>,
    ) -> SurfaceResult<()> {
        trace!(type_name = %full_name, "Visiting type");

        let members = self.collect_members(ty, &full_name, index)?;
        let declaration = self.canonicalizer.render_type_declaration(ty, &full_name);
        let key = TypeKey::new(full_name.clone(), namespace.clone(), TypeCategory::of(ty))
            .with_generic_arguments(&ty.generic_arguments);
        out.push(TypeDefinition::new(
            declaration,
            render_attributes(&ty.attributes),
            members,
            key,
        ));

        for nested in ty
            .nested_types
            .iter()
            .filter(|nested| nested.accessibility.is_visible())
        {
            self.visit(
                nested,
                nested.nested_full_name(&full_name),
                namespace.clone(),
                index,
                out,
            )?;
        }
        Ok(())
    }

    fn collect_members(
        &self,
        ty: &TypeInfo,
        full_name: &str,
        index: Option<&TypeIndex<'_>>,
    ) -> SurfaceResult<Vec<MemberDefinition>> {
        let mut definitions = Vec::new();
        let mut seen = HashSet::new();

        let mut own = self.member_refs(&ty.members);
        own.extend(ty.nested_types.iter().map(MemberRef::NestedType));
        for member in &own {
            if let Some(definition) = self.define(member, ty, 0) {
                seen.insert(definition.key().hiding_signature());
                definitions.push(definition);
            }
        }

        if let Some(index) = index.filter(|_| self.include_inherited) {
            let mut visited = HashSet::from([ty.full_name()]);
            let mut current = ty;
            let mut depth = 1;

            while let Some(base) = current
                .base_type
                .as_ref()
                .and_then(|base| index.get(&base.definition_name()).copied())
            {
                if !visited.insert(base.full_name()) {
                    break;
                }
                for member in self
                    .member_refs(&base.members)
                    .iter()
                    .filter(|member| is_inheritable(member))
                {
                    if let Some(definition) = self.define(member, base, depth) {
                        if seen.insert(definition.key().hiding_signature()) {
                            definitions.push(definition);
                        }
                    }
                }
                current = base;
                depth += 1;
            }
        }

        sort_members(full_name, definitions)
    }

    /// Members as report entries, with synthesized property accessors when
    /// properties render through their accessor methods.
    fn member_refs<'a>(&self, members: &'a [MemberInfo]) -> Vec<MemberRef<'a>> {
        let mut refs = Vec::with_capacity(members.len());
        for member in members {
            if let MemberInfo::Property(property) = member {
                if self.canonicalizer.property_rendering() == PropertyRendering::Accessors
                    && !self.canonicalizer.is_excluded(&property.attributes)
                {
                    refs.extend(
                        property
                            .getter_method()
                            .into_iter()
                            .chain(property.setter_method())
                            .map(|method| MemberRef::Method(Cow::Owned(method))),
                    );
                    continue;
                }
            }
            refs.push(MemberRef::from(member));
        }
        refs
    }

    fn define(&self, member: &MemberRef<'_>, declaring: &TypeInfo, depth: usize) -> Option<MemberDefinition> {
        let line = self.canonicalizer.render_member(member, declaring);
        if line.is_empty() {
            return None;
        }
        Some(MemberDefinition::new(
            line,
            render_attributes(member.attributes()),
            MemberKey::of(member, depth),
        ))
    }
}

fn is_inheritable(member: &MemberRef<'_>) -> bool {
    !member.is_static()
        && !matches!(
            member,
            MemberRef::Constructor(_) | MemberRef::NestedType(_) | MemberRef::Unknown
        )
}

fn namespace_of(ty: &TypeInfo) -> String {
    ty.namespace.clone().unwrap_or_default()
}

fn build_index(assembly: &Assembly) -> TypeIndex<'_> {
    assembly
        .types
        .iter()
        .map(|ty| (ty.full_name(), ty))
        .collect()
}
