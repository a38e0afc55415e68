//! A deterministic, pure-geometry layout engine for biochemical reaction
//! diagrams: given a reaction, its participating entities, and the
//! compartments they live in, [`layout::Layout::compute`] assigns every
//! glyph a final position, routes every connector, and sizes every
//! compartment — with no rendering, no I/O, and no randomness.
//!
//! Callers bring their own [`text::TextMetrics`] (to measure label text) and
//! [`tree::CompartmentOntology`] (to resolve the `surrounded_by` relation
//! between compartments); everything downstream of those two seams is pure
//! computation over the types in [`model`].

pub mod config;
pub mod duplicate;
pub mod error;
pub mod geometry;
pub mod grid;
pub mod index;
pub mod layout;
pub mod model;
pub mod router;
pub mod sizing;
pub mod text;
pub mod tree;

pub use config::LayoutConfig;
pub use error::LayoutError;
pub use layout::Layout;
pub use model::{
    Compartment, CompartmentDescriptor, CompartmentId, Connector, Entity, EntityId, Reaction,
    ReactionId, ReactionShape, RenderableClass, Role, RoleType,
};
pub use text::TextMetrics;
pub use tree::CompartmentOntology;
