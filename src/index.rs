//! C4 — layout index (§2).
//!
//! A read-only partition of entities by role, built once after duplication
//! and consumed by the grid and router stages. Grounded on the
//! `BoxHierarchy` index `regviz_app::graph::layout::BoxHierarchy` builds over
//! bounding boxes before layout: a small owned lookup table, never mutated
//! after construction.

use indexmap::IndexMap;

use crate::model::{CompartmentId, Entity, EntityId, RoleType};

/// Read-only partition of one reaction's entities by role.
///
/// An entity with more than one role appears in more than one partition (the
/// grid stage places the *role*, not the entity, so a bi-role entity is
/// placed once per role it carries but renders only once — see §4.3
/// "bi-role" handling in the catalyst/input case).
#[derive(Debug, Clone, Default)]
pub struct LayoutIndex {
    inputs: Vec<EntityId>,
    outputs: Vec<EntityId>,
    catalysts: Vec<EntityId>,
    positive_regulators: Vec<EntityId>,
    negative_regulators: Vec<EntityId>,
    by_compartment: IndexMap<CompartmentId, Vec<EntityId>>,
}

impl LayoutIndex {
    /// Builds the index from the (already duplicated) entity collection.
    #[must_use]
    pub fn build(entities: &[Entity]) -> Self {
        let mut index = LayoutIndex::default();
        for entity in entities {
            for role in &entity.roles {
                let bucket = match role.role_type {
                    RoleType::Input => &mut index.inputs,
                    RoleType::Output => &mut index.outputs,
                    RoleType::Catalyst => &mut index.catalysts,
                    RoleType::PositiveRegulator => &mut index.positive_regulators,
                    RoleType::NegativeRegulator => &mut index.negative_regulators,
                };
                bucket.push(entity.id.clone());
            }
            index
                .by_compartment
                .entry(entity.compartment.clone())
                .or_default()
                .push(entity.id.clone());
        }
        index
    }

    #[must_use]
    pub fn inputs(&self) -> &[EntityId] {
        &self.inputs
    }

    #[must_use]
    pub fn outputs(&self) -> &[EntityId] {
        &self.outputs
    }

    #[must_use]
    pub fn catalysts(&self) -> &[EntityId] {
        &self.catalysts
    }

    #[must_use]
    pub fn positive_regulators(&self) -> &[EntityId] {
        &self.positive_regulators
    }

    #[must_use]
    pub fn negative_regulators(&self) -> &[EntityId] {
        &self.negative_regulators
    }

    #[must_use]
    pub fn regulators(&self) -> impl Iterator<Item = &EntityId> {
        self.positive_regulators
            .iter()
            .chain(self.negative_regulators.iter())
    }

    #[must_use]
    pub fn entities_in(&self, compartment: &str) -> &[EntityId] {
        self.by_compartment
            .get(compartment)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty()
            && self.outputs.is_empty()
            && self.catalysts.is_empty()
            && self.positive_regulators.is_empty()
            && self.negative_regulators.is_empty()
    }
}
