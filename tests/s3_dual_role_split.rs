//! S3: an entity carrying both INPUT and OUTPUT (a catalytic-cycle
//! substrate/product conflict the grid cannot place on one glyph) is split
//! into two single-role copies by C3, idempotently.

mod support;

use reaction_layout::config::LayoutConfig;
use reaction_layout::model::{Role, RoleType};
use reaction_layout::Layout;
use support::{entity, flat_ontology, StubTextMetrics};

#[test]
fn input_output_conflict_is_split_into_two_glyphs() {
    let (ontology, descriptors) = flat_ontology(&["cytoplasm"]);
    let reaction = reaction_layout::model::Reaction::new(
        "R1",
        "transition",
        "cytoplasm",
        reaction_layout::model::ReactionShape::Transition,
    );
    let shuttled = entity(
        "S",
        reaction_layout::model::RenderableClass::Chemical,
        vec![Role::new(RoleType::Input, 1), Role::new(RoleType::Output, 1)],
        "cytoplasm",
    );
    let entities = vec![shuttled];

    let layout = Layout::compute(
        reaction,
        entities,
        &descriptors,
        &ontology,
        &StubTextMetrics,
        &LayoutConfig::default(),
    )
    .expect("input/output conflict must still lay out");

    let copies: Vec<_> = layout.entities.iter().filter(|e| e.source_id == "S").collect();
    assert_eq!(copies.len(), 2);
    assert!(copies.iter().any(|e| e.roles == vec![Role::new(RoleType::Input, 1)]));
    assert!(copies.iter().any(|e| e.roles == vec![Role::new(RoleType::Output, 1)]));

    let input_copy = copies.iter().find(|e| e.has_role(RoleType::Input)).unwrap();
    let output_copy = copies.iter().find(|e| e.has_role(RoleType::Output)).unwrap();
    assert!(input_copy.position.center_x() < layout.reaction.position.center_x());
    assert!(output_copy.position.center_x() > layout.reaction.position.center_x());
}
