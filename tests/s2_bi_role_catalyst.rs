//! S2: an entity that is simultaneously an INPUT and a CATALYST is neither
//! duplicated nor dropped — it renders once, as an input glyph, with an extra
//! hooked connector leg feeding the catalyst rule above the reaction.

mod support;

use reaction_layout::config::LayoutConfig;
use reaction_layout::model::{Role, RoleType};
use reaction_layout::Layout;
use support::{entity, flat_ontology, protein, StubTextMetrics};

#[test]
fn bi_role_entity_renders_once_with_hooked_connector() {
    let (ontology, descriptors) = flat_ontology(&["cytoplasm"]);
    let reaction = reaction_layout::model::Reaction::new(
        "R1",
        "transition",
        "cytoplasm",
        reaction_layout::model::ReactionShape::Transition,
    );
    let mut enzyme = entity(
        "E",
        reaction_layout::model::RenderableClass::Protein,
        vec![Role::new(RoleType::Input, 1), Role::new(RoleType::Catalyst, 1)],
        "cytoplasm",
    );
    enzyme.name = "enzyme".into();
    let entities = vec![enzyme, protein("P", RoleType::Output, "cytoplasm")];

    let layout = Layout::compute(
        reaction,
        entities,
        &descriptors,
        &ontology,
        &StubTextMetrics,
        &LayoutConfig::default(),
    )
    .expect("bi-role input/catalyst must lay out");

    let glyphs: Vec<_> = layout.entities.iter().filter(|e| e.id == "E").collect();
    assert_eq!(glyphs.len(), 1, "the entity must render exactly once");

    let enzyme = glyphs[0];
    assert_eq!(enzyme.roles.len(), 2);
    // route_catalyst_hook prepends 3 segments ahead of the ordinary 3-segment
    // input path.
    assert_eq!(enzyme.connector.segments.len(), 6);
}
