//! C8 — the `Layout` aggregate and its `compute` entry point (§5).
//!
//! `compute` sequences every other stage in the order §5 fixes: duplicate,
//! build the compartment tree, index, place the grid, route connectors, size
//! compartments, and translate to the origin. Grounded on
//! `regviz_core::core::BuildArtifacts`, the teacher's own small struct that
//! aggregates the outputs of its own multi-stage pipeline (lexer -> parser ->
//! NFA -> DFA) behind one type.

use indexmap::IndexSet;
use tracing::instrument;

use crate::config::LayoutConfig;
use crate::duplicate::duplicate_all;
use crate::error::LayoutError;
use crate::geometry::Position;
use crate::grid;
use crate::index::LayoutIndex;
use crate::model::{CompartmentDescriptor, CompartmentMap, Entity, Reaction};
use crate::router;
use crate::sizing;
use crate::text::TextMetrics;
use crate::tree::{self, CompartmentOntology};

/// A fully laid-out reaction diagram: every [`Entity`] and the [`Reaction`]
/// carry their final [`crate::geometry::Position`]; every entity's
/// [`crate::model::Connector`] is routed; every [`crate::model::Compartment`]
/// in `compartments` is sized and positioned.
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub reaction: Reaction,
    pub entities: Vec<Entity>,
    pub compartments: CompartmentMap,
    /// Bounds of the whole diagram, always starting at `(0, 0)` (§4.5).
    pub bounds: Position,
}

impl Layout {
    /// Runs the full pipeline (§5):
    ///
    /// 1. validate the two fatal preconditions (a reaction, and at least one participant),
    /// 2. [`duplicate_all`] to split conflicting role sets,
    /// 3. build the compartment tree via `ontology`,
    /// 4. build the [`LayoutIndex`],
    /// 5. [`grid::place`] every glyph,
    /// 6. [`router::route`] every connector,
    /// 7. [`sizing::finalize`] compartments and translate to the origin.
    ///
    /// Mutates nothing on failure: invalid stoichiometry is checked before any
    /// other stage runs.
    #[instrument(skip_all, fields(reaction_id = %reaction.id, entity_count = entities.len()))]
    pub fn compute(
        mut reaction: Reaction,
        mut entities: Vec<Entity>,
        compartment_descriptors: &[CompartmentDescriptor],
        ontology: &impl CompartmentOntology,
        metrics: &dyn TextMetrics,
        config: &LayoutConfig,
    ) -> Result<Layout, LayoutError> {
        if reaction.id.is_empty() {
            return Err(LayoutError::MissingReaction);
        }
        if entities.is_empty() {
            return Err(LayoutError::NoParticipants);
        }
        for entity in &entities {
            for role in &entity.roles {
                if role.stoichiometry < 1 {
                    return Err(LayoutError::InvalidStoichiometry {
                        entity_id: entity.id.clone(),
                        role_type: role.role_type,
                        value: role.stoichiometry,
                    });
                }
            }
        }

        tracing::debug!("duplicating entities with conflicting role sets");
        duplicate_all(&mut entities);

        let mut accessions: IndexSet<String> = tree::accession_set(compartment_descriptors);
        accessions.extend(entities.iter().map(|e| e.compartment.clone()));
        accessions.insert(reaction.compartment.clone());

        tracing::debug!(compartment_count = accessions.len(), "building compartment tree");
        let mut compartments = ontology.tree_with_intermediate_nodes(&accessions);
        attach_contents(&mut compartments, &entities, &reaction);

        let index = LayoutIndex::build(&entities);

        tracing::debug!("placing grid");
        grid::place(&mut entities, &mut reaction, &compartments, &index, metrics, config);

        tracing::debug!("routing connectors");
        router::route(&mut entities, &reaction, config);

        tracing::debug!("sizing compartments");
        let bounds = sizing::finalize(&mut compartments, &mut entities, &mut reaction, metrics, config);

        Ok(Layout {
            reaction,
            entities,
            compartments,
            bounds,
        })
    }
}

/// Populates each compartment's `contents` with the entities placed inside it
/// and marks whichever compartment holds the reaction (§3, §4.1). If the
/// reaction's own compartment accession didn't survive tree-building (e.g.
/// the ontology never recognized it), the reaction is recovered onto the
/// tree's root compartment instead (§7 "Missing compartment for reaction").
fn attach_contents(compartments: &mut CompartmentMap, entities: &[Entity], reaction: &Reaction) {
    for entity in entities {
        if let Some(compartment) = compartments.get_mut(&entity.compartment) {
            compartment.contents.insert(entity.id.clone());
        }
    }
    let owner = if compartments.contains_key(&reaction.compartment) {
        reaction.compartment.clone()
    } else {
        root_compartment(compartments)
    };
    if let Some(compartment) = compartments.get_mut(&owner) {
        compartment.holds_reaction = true;
    }
}

/// The tree's root compartment: the one with no parent. Falls back to the
/// extracellular sentinel itself if no other compartment was built.
fn root_compartment(compartments: &CompartmentMap) -> String {
    compartments
        .values()
        .find(|c| c.parent.is_none())
        .map(|c| c.accession.clone())
        .unwrap_or_else(|| tree::EXTRACELLULAR_SENTINEL.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ReactionShape, RenderableClass, Role, RoleType};
    use crate::text::FixedWidthMetrics;
    use crate::tree::StaticOntology;

    fn ontology() -> StaticOntology {
        let mut o = StaticOntology::new();
        o.add("cytoplasm", "cytoplasm", Vec::new());
        o
    }

    #[test]
    fn compute_rejects_empty_participant_list() {
        let reaction = Reaction::new("R", "R", "cytoplasm", ReactionShape::Transition);
        let result = Layout::compute(
            reaction,
            Vec::new(),
            &[],
            &ontology(),
            &FixedWidthMetrics,
            &LayoutConfig::default(),
        );
        assert_eq!(result, Err(LayoutError::NoParticipants));
    }

    #[test]
    fn compute_rejects_invalid_stoichiometry() {
        let reaction = Reaction::new("R", "R", "cytoplasm", ReactionShape::Transition);
        let entities = vec![Entity::new(
            "A",
            "A",
            RenderableClass::Protein,
            vec![Role::new(RoleType::Input, 0)],
            "cytoplasm",
        )];
        let result = Layout::compute(
            reaction,
            entities,
            &[],
            &ontology(),
            &FixedWidthMetrics,
            &LayoutConfig::default(),
        );
        assert!(matches!(result, Err(LayoutError::InvalidStoichiometry { .. })));
    }

    #[test]
    fn compute_produces_positioned_entities_and_bounds_at_origin() {
        let reaction = Reaction::new("R", "R", "cytoplasm", ReactionShape::Transition);
        let entities = vec![
            Entity::new(
                "A",
                "A",
                RenderableClass::Protein,
                vec![Role::new(RoleType::Input, 1)],
                "cytoplasm",
            ),
            Entity::new(
                "B",
                "B",
                RenderableClass::Protein,
                vec![Role::new(RoleType::Output, 1)],
                "cytoplasm",
            ),
        ];
        let layout = Layout::compute(
            reaction,
            entities,
            &[],
            &ontology(),
            &FixedWidthMetrics,
            &LayoutConfig::default(),
        )
        .expect("layout should succeed");

        assert_eq!(layout.bounds.x, 0.0);
        assert_eq!(layout.bounds.y, 0.0);
        assert_eq!(layout.entities.len(), 2);
        assert!(!layout.compartments.contains_key(tree::EXTRACELLULAR_SENTINEL));
    }
}
