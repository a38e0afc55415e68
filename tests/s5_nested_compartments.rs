//! S5: participants spread across a nested nucleus-in-cytoplasm compartment
//! pair each get a compartment box that encloses their contents, with the
//! outer compartment's box enclosing the inner one's.

mod support;

use reaction_layout::config::LayoutConfig;
use reaction_layout::model::RoleType;
use reaction_layout::Layout;
use support::{nested_ontology, protein, StubTextMetrics};

#[test]
fn outer_compartment_encloses_inner_compartment() {
    let (ontology, descriptors) = nested_ontology();
    let reaction = reaction_layout::model::Reaction::new(
        "R1",
        "transition",
        "cytoplasm",
        reaction_layout::model::ReactionShape::Transition,
    );
    let entities = vec![
        protein("A", RoleType::Input, "cytoplasm"),
        protein("B", RoleType::Output, "nucleus"),
    ];

    let layout = Layout::compute(
        reaction,
        entities,
        &descriptors,
        &ontology,
        &StubTextMetrics,
        &LayoutConfig::default(),
    )
    .expect("nested compartments must still lay out");

    let cytoplasm = &layout.compartments["cytoplasm"];
    let nucleus = &layout.compartments["nucleus"];

    assert!(cytoplasm.position.contains(&nucleus.position));

    let b = layout.entities.iter().find(|e| e.id == "B").unwrap();
    assert!(nucleus.position.contains(&b.position));
}
