//! Demo binary: lays out one synthetic reaction and prints the result.
//! Grounded on `regviz_core::main`'s build-then-print CLI shape, with the
//! lex/parse/build stages replaced by this crate's own pipeline stages.

use reaction_layout::config::LayoutConfig;
use reaction_layout::model::{CompartmentDescriptor, Entity, Reaction, ReactionShape, RenderableClass, Role, RoleType};
use reaction_layout::text::FixedWidthMetrics;
use reaction_layout::tree::StaticOntology;
use reaction_layout::Layout;

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// A small phosphorylation-style reaction: a kinase catalyzes ATP + substrate
/// -> ADP + phospho-substrate, with one negative regulator, spread across a
/// nucleus nested inside a cytoplasm.
fn sample_reaction() -> (Reaction, Vec<Entity>, Vec<CompartmentDescriptor>, StaticOntology) {
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

    let reaction = Reaction::new("R1", "phosphorylation", "cytoplasm", ReactionShape::Transition);

    let entities = vec![
        Entity::new(
            "ATP",
            "ATP",
            RenderableClass::Chemical,
            vec![Role::new(RoleType::Input, 1)],
            "cytoplasm",
        ),
        Entity::new(
            "substrate",
            "substrate",
            RenderableClass::Protein,
            vec![Role::new(RoleType::Input, 1)],
            "nucleus",
        ),
        Entity::new(
            "ADP",
            "ADP",
            RenderableClass::Chemical,
            vec![Role::new(RoleType::Output, 1)],
            "cytoplasm",
        ),
        Entity::new(
            "phospho-substrate",
            "substrate-P",
            RenderableClass::Protein,
            vec![Role::new(RoleType::Output, 1)],
            "nucleus",
        ),
        Entity::new(
            "kinase",
            "kinase",
            RenderableClass::Protein,
            vec![Role::new(RoleType::Catalyst, 1)],
            "cytoplasm",
        ),
        Entity::new(
            "phosphatase",
            "phosphatase",
            RenderableClass::Protein,
            vec![Role::new(RoleType::NegativeRegulator, 1)],
            "cytoplasm",
        ),
    ];

    (reaction, entities, descriptors, ontology)
}

fn main() {
    init_tracing();

    let (reaction, entities, descriptors, ontology) = sample_reaction();
    let metrics = FixedWidthMetrics;
    let config = LayoutConfig::default();

    match Layout::compute(reaction, entities, &descriptors, &ontology, &metrics, &config) {
        Ok(layout) => {
            println!(
                "Diagram bounds: {:.0}x{:.0}",
                layout.bounds.w, layout.bounds.h
            );
            println!(
                "Reaction {:?} at ({:.0}, {:.0})",
                layout.reaction.name, layout.reaction.position.x, layout.reaction.position.y
            );
            for entity in &layout.entities {
                println!(
                    "  {:<20} {:<10} at ({:.0}, {:.0}) size {:.0}x{:.0}, {} connector segment(s)",
                    entity.name,
                    format!("{:?}", entity.roles.first().map(|r| r.role_type)),
                    entity.position.x,
                    entity.position.y,
                    entity.position.w,
                    entity.position.h,
                    entity.connector.segments.len(),
                );
            }
            for compartment in layout.compartments.values() {
                println!(
                    "  compartment {:<12} at ({:.0}, {:.0}) size {:.0}x{:.0}",
                    compartment.name,
                    compartment.position.x,
                    compartment.position.y,
                    compartment.position.w,
                    compartment.position.h,
                );
            }
        }
        Err(err) => eprintln!("layout failed: {err}"),
    }
}
