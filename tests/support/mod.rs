//! Shared integration-test doubles: a deterministic text-metrics oracle and a
//! couple of small builders so each scenario file can stay focused on the
//! behavior it's checking.

use reaction_layout::model::{CompartmentDescriptor, Entity, RenderableClass, Role, RoleType};
use reaction_layout::text::TextMetrics;
use reaction_layout::tree::StaticOntology;

/// Same fixed-width formula as [`reaction_layout::text::FixedWidthMetrics`],
/// redefined here so the test suite exercises the public `TextMetrics` seam
/// independently of the crate's own convenience implementation.
#[derive(Debug, Clone, Copy, Default)]
pub struct StubTextMetrics;

impl TextMetrics for StubTextMetrics {
    fn text_width(&self, text: &str) -> f64 {
        6.0 * text.chars().count() as f64
    }

    fn text_height(&self) -> f64 {
        12.0
    }
}

#[allow(dead_code)]
pub fn entity(id: &str, class: RenderableClass, roles: Vec<Role>, compartment: &str) -> Entity {
    Entity::new(id, id, class, roles, compartment)
}

#[allow(dead_code)]
pub fn protein(id: &str, role: RoleType, compartment: &str) -> Entity {
    entity(id, RenderableClass::Protein, vec![Role::new(role, 1)], compartment)
}

#[allow(dead_code)]
pub fn flat_ontology(compartments: &[&str]) -> (StaticOntology, Vec<CompartmentDescriptor>) {
    let mut ontology = StaticOntology::new();
    let mut descriptors = Vec::new();
    for &accession in compartments {
        ontology.add(accession, accession, Vec::new());
        descriptors.push(CompartmentDescriptor {
            accession: accession.to_string(),
            display_name: accession.to_string(),
        });
    }
    (ontology, descriptors)
}

#[allow(dead_code)]
pub fn nested_ontology() -> (StaticOntology, Vec<CompartmentDescriptor>) {
    let mut ontology = StaticOntology::new();
    ontology.add("cytoplasm", "cytoplasm", vec!["cell".into()]);
    ontology.add("nucleus", "nucleus", vec!["cytoplasm".into()]);
    ontology.add("cell", "cell", Vec::new());
    let descriptors = vec![
        CompartmentDescriptor {
            accession: "cytoplasm".into(),
            display_name: "cytoplasm".into(),
        },
        CompartmentDescriptor {
            accession: "nucleus".into(),
            display_name: "nucleus".into(),
        },
    ];
    (ontology, descriptors)
}
