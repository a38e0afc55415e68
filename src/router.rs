//! C6 — connector routing (§4.4). Runs after the grid stage has given every
//! entity and the reaction a final [`Position`]; computes the orthogonal (or,
//! for regulators, semicircular) polyline connecting each entity to the
//! reaction, plus its pointer glyph and stoichiometry badge.
//!
//! Grounded on `regviz_app::graph::edge::{GraphEdge, compute_label_anchor}`:
//! the teacher computes a curve and a label anchor from two box positions and
//! a handful of spacing constants the same way this module turns a glyph
//! position and the reaction's ports into a segment list.

use crate::config::LayoutConfig;
use crate::geometry::{Coordinate, Position, Segment};
use crate::model::{Badge, Connector, Entity, PointerType, Reaction, RenderableClass, RoleType};

/// Routes every entity's connector to `reaction`, writing into
/// [`Entity::connector`] in place. Entities without a role that the router
/// recognizes (there are none in a well-formed model) are left with an empty
/// connector.
pub fn route(entities: &mut [Entity], reaction: &Reaction, config: &LayoutConfig) {
    let regulator_rows = group_regulator_rows(entities);

    for entity in entities.iter_mut() {
        let mut connector = Connector::default();

        if entity.has_role(RoleType::Input) {
            let mut segments = route_input(entity, reaction, config);
            if entity.has_role(RoleType::Catalyst) {
                segments.splice(0..0, route_catalyst_hook(entity, reaction, config));
            }
            connector.segments = segments;
            connector.pointer = Some(PointerType::Input);
        } else if entity.has_role(RoleType::Output) {
            connector.segments = route_output(entity, reaction, config);
            connector.pointer = Some(PointerType::Output);
        } else if entity.has_role(RoleType::Catalyst) {
            connector.segments = route_catalyst(entity, reaction, config);
            connector.pointer = Some(PointerType::Catalyst);
        } else if let Some(role) = entity
            .role(RoleType::PositiveRegulator)
            .or_else(|| entity.role(RoleType::NegativeRegulator))
        {
            let pointer = if role.role_type == RoleType::PositiveRegulator {
                PointerType::Activator
            } else {
                PointerType::Inhibitor
            };
            let (index, total) = regulator_rows
                .iter()
                .find(|(y, _)| (*y - entity.position.center_y()).abs() < 0.5)
                .map(|(_, ids)| {
                    let idx = ids.iter().position(|id| id == &entity.id).unwrap_or(0);
                    (idx, ids.len())
                })
                .unwrap_or((0, 1));
            connector.segments = route_regulator(entity, reaction, index, total, config);
            connector.pointer = Some(pointer);
        }

        if let Some(role) = entity.roles.first() {
            if role.stoichiometry > 1 {
                connector.badge = Some(badge_for(entity, role.stoichiometry, config));
            }
        }

        entity.connector = connector;
    }
}

/// Entities sharing a regulator row, grouped by their (rounded) center-y, in
/// left-to-right order — the order the grid stage laid them out in.
fn group_regulator_rows(entities: &[Entity]) -> Vec<(f64, Vec<crate::model::EntityId>)> {
    let mut rows: Vec<(f64, Vec<crate::model::EntityId>)> = Vec::new();
    for entity in entities {
        if !entity.has_role(RoleType::PositiveRegulator) && !entity.has_role(RoleType::NegativeRegulator) {
            continue;
        }
        let y = entity.position.center_y();
        match rows.iter_mut().find(|(ry, _)| (*ry - y).abs() < 0.5) {
            Some((_, ids)) => ids.push(entity.id.clone()),
            None => rows.push((y, vec![entity.id.clone()])),
        }
    }
    rows
}

/// Input connector: horizontal leg from the glyph to a shared vertical rule,
/// then vertical to the reaction's row, then horizontal into the left port.
fn route_input(entity: &Entity, reaction: &Reaction, config: &LayoutConfig) -> Vec<Segment> {
    let start = Coordinate::new(entity.position.right(), entity.position.center_y());
    let rule_x = reaction.position.x - config.rule_offset;
    let port = reaction.left_port();
    vec![
        Segment::new(start, Coordinate::new(rule_x, start.y)),
        Segment::new(Coordinate::new(rule_x, start.y), Coordinate::new(rule_x, port.y)),
        Segment::new(Coordinate::new(rule_x, port.y), port),
    ]
}

/// Output connector: mirror of [`route_input`] on the right side. A gene
/// glyph gets an extra short jog so its arrowhead clears the gene's own
/// rectangular notch (§4.4 "gene arrow-head jog").
fn route_output(entity: &Entity, reaction: &Reaction, config: &LayoutConfig) -> Vec<Segment> {
    let port = reaction.right_port();
    let rule_x = reaction.position.right() + config.rule_offset;
    let end = Coordinate::new(entity.position.x, entity.position.center_y());
    let mut segments = vec![
        Segment::new(port, Coordinate::new(rule_x, port.y)),
        Segment::new(Coordinate::new(rule_x, port.y), Coordinate::new(rule_x, end.y)),
        Segment::new(Coordinate::new(rule_x, end.y), end),
    ];
    if entity.renderable_class == RenderableClass::Gene {
        let jog_start = Coordinate::new(end.x - config.arrow_size, end.y);
        segments.push(Segment::new(jog_start, end));
    }
    segments
}

/// Catalyst connector: vertical leg from the glyph down to a shared
/// horizontal rule above the reaction, then into its top port.
fn route_catalyst(entity: &Entity, reaction: &Reaction, config: &LayoutConfig) -> Vec<Segment> {
    let start = Coordinate::new(entity.position.center_x(), entity.position.bottom());
    let rule_y = reaction.position.y - config.hrule_offset;
    let port = Coordinate::new(reaction.position.center_x(), reaction.position.y);
    vec![
        Segment::new(start, Coordinate::new(start.x, rule_y)),
        Segment::new(Coordinate::new(start.x, rule_y), Coordinate::new(port.x, rule_y)),
        Segment::new(Coordinate::new(port.x, rule_y), port),
    ]
}

/// Three extra segments hooking a bi-role {INPUT, CATALYST} entity's
/// connector up over its input tile's top padding before it joins the
/// ordinary catalyst rule (§4.4 "bi-role catalyst hook").
fn route_catalyst_hook(entity: &Entity, reaction: &Reaction, config: &LayoutConfig) -> Vec<Segment> {
    let glyph_top = Coordinate::new(entity.position.center_x(), entity.position.y);
    let hook_top = Coordinate::new(glyph_top.x, glyph_top.y - config.catalyst_hook_padding / 2.0);
    let rule_y = reaction.position.y - config.hrule_offset;
    let merge = Coordinate::new(reaction.position.center_x(), rule_y);
    vec![
        Segment::new(glyph_top, hook_top),
        Segment::new(hook_top, Coordinate::new(merge.x, hook_top.y)),
        Segment::new(Coordinate::new(merge.x, hook_top.y), merge),
    ]
}

/// Regulator connector: a two-segment polyline bent through a point on a
/// semicircle, so that `total` siblings fan out without crossing
/// (§4.4 "regulator connectors with semicircle trigonometry"):
/// `angle = pi * i / (n + 1)`, `radius = reaction.height / 2 + 6 * (n + 1) / pi`.
fn route_regulator(
    entity: &Entity,
    reaction: &Reaction,
    index: usize,
    total: usize,
    _config: &LayoutConfig,
) -> Vec<Segment> {
    let n = total as f64;
    let i = (index + 1) as f64;
    let angle = std::f64::consts::PI * i / (n + 1.0);
    let radius = reaction.position.h / 2.0 + 6.0 * (n + 1.0) / std::f64::consts::PI;

    let port = Coordinate::new(reaction.position.center_x(), reaction.position.center_y());
    let elbow = Coordinate::new(port.x - radius * angle.cos(), port.y + radius * angle.sin());
    let start = Coordinate::new(entity.position.center_x(), entity.position.y);
    vec![Segment::new(start, elbow), Segment::new(elbow, port)]
}

/// A `badge_size`-square stoichiometry badge, placed just past the glyph's
/// outer edge along the connector's exit direction (§4.4 "Stoichiometry badge").
fn badge_for(entity: &Entity, count: u32, config: &LayoutConfig) -> Badge {
    let half = config.badge_size / 2.0;
    let anchor = if entity.has_role(RoleType::Output) {
        Coordinate::new(entity.position.x - half, entity.position.center_y() - half)
    } else {
        Coordinate::new(entity.position.right() - half, entity.position.center_y() - half)
    };
    Badge {
        shape: Position::new(anchor.x, anchor.y, config.badge_size, config.badge_size),
        count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ReactionShape, RenderableClass, Role};

    fn reaction_at(x: f64, y: f64) -> Reaction {
        let mut r = Reaction::new("R", "R", "cytoplasm", ReactionShape::Transition);
        r.position = Position::new(x, y, 40.0, 20.0);
        r
    }

    #[test]
    fn input_connector_ends_at_left_port() {
        let mut entities = vec![Entity::new(
            "A",
            "A",
            RenderableClass::Protein,
            vec![Role::new(RoleType::Input, 1)],
            "cytoplasm",
        )];
        entities[0].position = Position::new(0.0, 0.0, 60.0, 30.0);
        let reaction = reaction_at(200.0, 100.0);
        let config = LayoutConfig::default();

        route(&mut entities, &reaction, &config);

        let segments = &entities[0].connector.segments;
        assert_eq!(segments.last().unwrap().to, reaction.left_port());
        assert_eq!(entities[0].connector.pointer, Some(PointerType::Input));
    }

    #[test]
    fn stoichiometry_above_one_gets_a_badge() {
        let mut entities = vec![Entity::new(
            "A",
            "A",
            RenderableClass::Protein,
            vec![Role::new(RoleType::Input, 3)],
            "cytoplasm",
        )];
        entities[0].position = Position::new(0.0, 0.0, 60.0, 30.0);
        let reaction = reaction_at(200.0, 100.0);
        let config = LayoutConfig::default();

        route(&mut entities, &reaction, &config);

        let badge = entities[0].connector.badge.expect("badge expected");
        assert_eq!(badge.count, 3);
    }

    #[test]
    fn regulators_fan_out_without_colliding_elbows() {
        let mut entities: Vec<Entity> = (0..3)
            .map(|i| {
                let mut e = Entity::new(
                    format!("N{i}"),
                    format!("N{i}"),
                    RenderableClass::Protein,
                    vec![Role::new(RoleType::NegativeRegulator, 1)],
                    "cytoplasm",
                );
                e.position = Position::new(i as f64 * 80.0, 300.0, 60.0, 30.0);
                e
            })
            .collect();
        let reaction = reaction_at(80.0, 100.0);
        let config = LayoutConfig::default();

        route(&mut entities, &reaction, &config);

        let elbows: Vec<Coordinate> = entities
            .iter()
            .map(|e| e.connector.segments[0].to)
            .collect();
        assert_ne!(elbows[0], elbows[1]);
        assert_ne!(elbows[1], elbows[2]);
    }
}
