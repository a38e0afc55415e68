//! C7 — compartment sizing and diagram finalization (§4.5).
//!
//! Runs after the grid and router stages have placed every glyph and routed
//! every connector: walks the compartment tree bottom-up so a parent's
//! bounds always see its children's finished bounds first, then unions in
//! the reaction and every connector segment to get the whole-diagram extent,
//! and finally translates everything so the diagram's top-left corner sits
//! at the origin.
//!
//! Grounded on `regviz_app::graph::layout::{layout_boxes, compute_extent,
//! normalize_layout}`: the teacher's post-order bounding-box pass over a box
//! hierarchy, followed by a single normalizing translate, is the same shape
//! this module gives compartments.

use crate::config::LayoutConfig;
use crate::geometry::Position;
use crate::model::{CompartmentMap, Entity, Reaction};
use crate::text::TextMetrics;
use crate::tree::EXTRACELLULAR_SENTINEL;

/// Computes every compartment's bounds bottom-up, unions in the reaction and
/// routed connectors for the overall extent, then translates the whole
/// diagram so its bounds start at `(0, 0)`. Mutates `compartments`, `entities`
/// and `reaction` in place and returns the final whole-diagram bounds.
pub fn finalize(
    compartments: &mut CompartmentMap,
    entities: &mut [Entity],
    reaction: &mut Reaction,
    metrics: &dyn TextMetrics,
    config: &LayoutConfig,
) -> Position {
    size_compartments(compartments, entities, reaction, metrics, config);

    let mut overall = reaction.position;
    for entity in entities.iter() {
        overall = overall.union(&entity.position);
        if let Some(bounds) = entity.connector.bounds() {
            overall = overall.union(&bounds);
        }
        if let Some(badge) = entity.connector.badge {
            overall = overall.union(&badge.shape);
        }
    }
    for segment in &reaction.backbone {
        overall = overall.union(&segment.bounds());
    }
    for compartment in compartments.values() {
        if compartment.accession == EXTRACELLULAR_SENTINEL {
            continue;
        }
        overall = overall.union(&compartment.position);
    }

    let dx = -overall.x;
    let dy = -overall.y;
    translate_all(compartments, entities, reaction, dx, dy);
    compartments.shift_remove(EXTRACELLULAR_SENTINEL);

    Position::new(0.0, 0.0, overall.w, overall.h)
}

/// Post-order traversal: every compartment's bounds are the union of its own
/// entities/reaction plus its already-sized children, padded uniformly and
/// expanded to fit its own label (§4.5).
fn size_compartments(
    compartments: &mut CompartmentMap,
    entities: &[Entity],
    reaction: &Reaction,
    metrics: &dyn TextMetrics,
    config: &LayoutConfig,
) {
    let roots: Vec<String> = compartments
        .values()
        .filter(|c| c.parent.is_none())
        .map(|c| c.accession.clone())
        .collect();
    for root in roots {
        size_subtree(&root, compartments, entities, reaction, metrics, config);
    }
}

fn size_subtree(
    accession: &str,
    compartments: &mut CompartmentMap,
    entities: &[Entity],
    reaction: &Reaction,
    metrics: &dyn TextMetrics,
    config: &LayoutConfig,
) -> Option<Position> {
    let children = compartments.get(accession)?.children.clone();
    let mut bounds: Option<Position> = None;

    for child in &children {
        if let Some(child_bounds) = size_subtree(child, compartments, entities, reaction, metrics, config) {
            bounds = Some(match bounds {
                Some(b) => b.union(&child_bounds),
                None => child_bounds,
            });
        }
    }

    let holds_reaction = compartments.get(accession)?.holds_reaction;
    if holds_reaction {
        let reaction_bounds = reaction.position.pad_xy(config.reaction_padding.0, config.reaction_padding.1);
        bounds = Some(match bounds {
            Some(b) => b.union(&reaction_bounds),
            None => reaction_bounds,
        });
    }

    let mut has_catalyst_input = false;
    for id in &compartments.get(accession)?.contents {
        if let Some(entity) = entities.iter().find(|e| &e.id == id) {
            bounds = Some(match bounds {
                Some(b) => b.union(&entity.position),
                None => entity.position,
            });
            if entity.has_role(crate::model::RoleType::Input)
                && entity.has_role(crate::model::RoleType::Catalyst)
            {
                has_catalyst_input = true;
            }
        }
    }

    let Some(mut bounds) = bounds else {
        let comp = compartments.get_mut(accession)?;
        comp.position = Position::zero();
        comp.label_position = comp.position.center();
        return None;
    };

    if has_catalyst_input {
        let extra = config.catalyst_hook_padding;
        bounds = Position::new(bounds.x, bounds.y - extra, bounds.w, bounds.h + extra);
    }

    bounds = bounds.pad(config.compartment_padding);

    let name = &compartments.get(accession)?.name;
    let min_width = metrics.text_width(name) + config.compartment_padding * 2.0;
    if bounds.w < min_width {
        let grow = (min_width - bounds.w) / 2.0;
        bounds = Position::new(bounds.x - grow, bounds.y, min_width, bounds.h);
    }

    let comp = compartments.get_mut(accession)?;
    comp.position = bounds;
    // Bottom-right, inside the padding (§4.5).
    comp.label_position = crate::geometry::Coordinate::new(
        bounds.right() - metrics.text_width(name) - 15.0,
        bounds.bottom() + metrics.text_height() / 2.0 - 20.0,
    );

    Some(bounds)
}

/// Shifts every glyph, the reaction, and every compartment by `(dx, dy)`
/// (§4.5 "translate to origin").
fn translate_all(
    compartments: &mut CompartmentMap,
    entities: &mut [Entity],
    reaction: &mut Reaction,
    dx: f64,
    dy: f64,
) {
    for entity in entities.iter_mut() {
        entity.position = entity.position.translate(dx, dy);
        for segment in &mut entity.connector.segments {
            *segment = segment.translate(dx, dy);
        }
        if let Some(badge) = &mut entity.connector.badge {
            badge.shape = badge.shape.translate(dx, dy);
        }
        for attachment in &mut entity.attachments {
            attachment.position = attachment.position.translate(dx, dy);
        }
    }
    reaction.position = reaction.position.translate(dx, dy);
    for segment in &mut reaction.backbone {
        *segment = segment.translate(dx, dy);
    }
    for compartment in compartments.values_mut() {
        compartment.position = compartment.position.translate(dx, dy);
        compartment.label_position = compartment.label_position.translate(dx, dy);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Compartment, ReactionShape, RenderableClass, Role, RoleType};
    use crate::text::FixedWidthMetrics;

    #[test]
    fn diagram_translates_so_bounds_start_at_origin() {
        let mut compartments = CompartmentMap::new();
        let mut root = Compartment::new("cytoplasm", "cytoplasm");
        root.holds_reaction = true;
        root.contents.insert("A".to_string());
        compartments.insert("cytoplasm".to_string(), root);

        let mut entities = vec![Entity::new(
            "A",
            "A",
            RenderableClass::Protein,
            vec![Role::new(RoleType::Input, 1)],
            "cytoplasm",
        )];
        entities[0].position = Position::new(-40.0, -20.0, 60.0, 30.0);
        let mut reaction = Reaction::new("R", "R", "cytoplasm", ReactionShape::Transition);
        reaction.position = Position::new(50.0, 50.0, 40.0, 20.0);

        let metrics = FixedWidthMetrics;
        let config = LayoutConfig::default();
        let bounds = finalize(&mut compartments, &mut entities, &mut reaction, &metrics, &config);

        assert_eq!(bounds.x, 0.0);
        assert_eq!(bounds.y, 0.0);
        assert!(entities[0].position.x >= 0.0);
        assert!(compartments["cytoplasm"].position.x >= -0.001);
    }

    #[test]
    fn sentinel_compartment_is_not_emitted() {
        let mut compartments = CompartmentMap::new();
        let mut sentinel = Compartment::new(EXTRACELLULAR_SENTINEL, "extracellular region");
        sentinel.children.push("cytoplasm".to_string());
        compartments.insert(EXTRACELLULAR_SENTINEL.to_string(), sentinel);
        let mut child = Compartment::new("cytoplasm", "cytoplasm");
        child.parent = Some(EXTRACELLULAR_SENTINEL.to_string());
        child.holds_reaction = true;
        compartments.insert("cytoplasm".to_string(), child);

        let mut entities: Vec<Entity> = Vec::new();
        let mut reaction = Reaction::new("R", "R", "cytoplasm", ReactionShape::Transition);
        reaction.position = Position::new(0.0, 0.0, 40.0, 20.0);

        let metrics = FixedWidthMetrics;
        let config = LayoutConfig::default();
        finalize(&mut compartments, &mut entities, &mut reaction, &metrics, &config);

        assert!(!compartments.contains_key(EXTRACELLULAR_SENTINEL));
    }
}
