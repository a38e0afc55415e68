//! The data model §3 describes: reactions, entities, roles, compartments and
//! connectors. Types here are plain data; the algorithms in the other modules
//! own the state transitions between them.

use indexmap::{IndexMap, IndexSet};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::geometry::{Coordinate, Position, Segment};
use crate::text::TextMetrics;

/// Stable identifier for an [`Entity`]. Distinct from the identifier of the
/// physical-entity record it was duplicated from (see [`Entity::source_id`]).
pub type EntityId = String;

/// Stable identifier for a [`Compartment`].
pub type CompartmentId = String;

/// Stable identifier for the [`Reaction`].
pub type ReactionId = String;

/// The shape class drawn for the reaction glyph (§3 "Reaction").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ReactionShape {
    Transition,
    Binding,
    Dissociation,
    Omitted,
    Uncertain,
}

/// Renderable class of an [`Entity`] glyph (§3, §4.3 sort preference order).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum RenderableClass {
    Protein,
    Complex,
    Chemical,
    EntitySet,
    Gene,
    GenericEntity,
    Rna,
    ProcessNode,
    EncapsulatedNode,
    Attachment,
}

impl RenderableClass {
    /// Fixed preference order used to sort glyphs within a tile (§4.3):
    /// process-node, encapsulated-node, complex, entity-set, protein, RNA,
    /// chemical, gene, entity. Lower rank sorts first.
    #[must_use]
    pub fn sort_rank(self) -> u8 {
        match self {
            RenderableClass::ProcessNode => 0,
            RenderableClass::EncapsulatedNode => 1,
            RenderableClass::Complex => 2,
            RenderableClass::EntitySet => 3,
            RenderableClass::Protein => 4,
            RenderableClass::Rna => 5,
            RenderableClass::Chemical => 6,
            RenderableClass::Gene => 7,
            RenderableClass::GenericEntity => 8,
            RenderableClass::Attachment => 9,
        }
    }
}

/// A role type paired with stoichiometry (§3 "Role").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum RoleType {
    Input,
    Output,
    Catalyst,
    PositiveRegulator,
    NegativeRegulator,
}

impl RoleType {
    #[must_use]
    pub fn is_regulator(self) -> bool {
        matches!(
            self,
            RoleType::PositiveRegulator | RoleType::NegativeRegulator
        )
    }
}

/// `(type, stoichiometry)` pair. Stoichiometry is always `>= 1`; a role with
/// `stoichiometry == 0` is rejected at ingestion (§7).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Role {
    pub role_type: RoleType,
    pub stoichiometry: u32,
}

impl Role {
    #[must_use]
    pub fn new(role_type: RoleType, stoichiometry: u32) -> Self {
        Self {
            role_type,
            stoichiometry,
        }
    }
}

/// Flags carried by an entity glyph (§3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EntityFlags {
    pub trivial: bool,
    pub crossed: bool,
    pub dashed: bool,
    pub drug: bool,
    pub disease: bool,
}

/// A translational modification attached to an entity (§3 "attachments").
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Attachment {
    pub id: EntityId,
    pub name: String,
    pub position: Position,
}

/// Pointer glyph drawn at the reaction-end of a connector (§3 "Connector").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PointerType {
    Input,
    Output,
    Catalyst,
    Activator,
    Inhibitor,
}

/// A 12x12 stoichiometry badge (§4.4 "Stoichiometry badge").
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Badge {
    pub shape: Position,
    pub count: u32,
}

/// Computed routing for a single entity: segments, pointer type, optional badge.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Connector {
    pub segments: Vec<Segment>,
    pub pointer: Option<PointerType>,
    pub badge: Option<Badge>,
}

impl Connector {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Union of every segment's bounding rectangle, or `None` if routed yet.
    #[must_use]
    pub fn bounds(&self) -> Option<Position> {
        Position::union_all(self.segments.iter().map(Segment::bounds))
    }
}

/// A physical-entity glyph (§3 "Entity").
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Entity {
    pub id: EntityId,
    /// Identifier of the participant this glyph was duplicated from; equal to
    /// `id` unless C3 split it off a shared original.
    pub source_id: EntityId,
    pub name: String,
    pub renderable_class: RenderableClass,
    pub roles: Vec<Role>,
    pub flags: EntityFlags,
    pub attachments: Vec<Attachment>,
    pub compartment: CompartmentId,
    pub position: Position,
    pub connector: Connector,
}

impl Entity {
    #[must_use]
    pub fn new(
        id: impl Into<EntityId>,
        name: impl Into<String>,
        renderable_class: RenderableClass,
        roles: Vec<Role>,
        compartment: impl Into<CompartmentId>,
    ) -> Self {
        let id = id.into();
        Self {
            source_id: id.clone(),
            id,
            name: name.into(),
            renderable_class,
            roles,
            flags: EntityFlags::default(),
            attachments: Vec::new(),
            compartment: compartment.into(),
            position: Position::zero(),
            connector: Connector::default(),
        }
    }

    #[must_use]
    pub fn role_types(&self) -> IndexSet<RoleType> {
        self.roles.iter().map(|r| r.role_type).collect()
    }

    #[must_use]
    pub fn has_role(&self, role_type: RoleType) -> bool {
        self.roles.iter().any(|r| r.role_type == role_type)
    }

    #[must_use]
    pub fn role(&self, role_type: RoleType) -> Option<&Role> {
        self.roles.iter().find(|r| r.role_type == role_type)
    }

    /// Size of the glyph before it is placed in a cell, derived from its
    /// renderable class (a minimum footprint per shape) and its display text
    /// (§3 "Entity size is derived from renderable class and text
    /// dimensions.").
    #[must_use]
    pub fn natural_size(&self, metrics: &dyn TextMetrics) -> (f64, f64) {
        let (min_w, min_h) = self.renderable_class.minimum_size();
        let text_w = metrics.text_width(&self.name) + TEXT_INSET * 2.0;
        let text_h = metrics.text_height() + TEXT_INSET * 2.0;
        (min_w.max(text_w), min_h.max(text_h))
    }
}

/// Horizontal and vertical inset between a glyph's border and its label.
const TEXT_INSET: f64 = 6.0;

impl RenderableClass {
    /// Minimum (width, height) footprint for the shape itself, independent of
    /// the text it must fit (§3 "Entity size is derived from renderable class
    /// and text dimensions.").
    #[must_use]
    pub fn minimum_size(self) -> (f64, f64) {
        match self {
            RenderableClass::Protein | RenderableClass::GenericEntity | RenderableClass::Rna => {
                (60.0, 30.0)
            }
            RenderableClass::Complex | RenderableClass::EntitySet => (80.0, 40.0),
            RenderableClass::Chemical => (50.0, 30.0),
            RenderableClass::Gene => (80.0, 24.0),
            RenderableClass::ProcessNode | RenderableClass::EncapsulatedNode => (100.0, 60.0),
            RenderableClass::Attachment => (20.0, 20.0),
        }
    }
}

/// A compartment node (§3 "Compartment"). Contained glyph ids reference
/// [`Entity::id`] (and, for the root, the reaction itself via
/// [`Compartment::holds_reaction`]); parent/child links form the tree built by
/// [`crate::tree`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Compartment {
    pub accession: CompartmentId,
    pub name: String,
    pub contents: IndexSet<EntityId>,
    pub holds_reaction: bool,
    pub children: Vec<CompartmentId>,
    pub parent: Option<CompartmentId>,
    pub position: Position,
    pub label_position: Coordinate,
}

impl Compartment {
    #[must_use]
    pub fn new(accession: impl Into<CompartmentId>, name: impl Into<String>) -> Self {
        Self {
            accession: accession.into(),
            name: name.into(),
            contents: IndexSet::new(),
            holds_reaction: false,
            children: Vec::new(),
            parent: None,
            position: Position::zero(),
            label_position: Coordinate::new(0.0, 0.0),
        }
    }
}

/// The reaction glyph (§3 "Reaction").
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Reaction {
    pub id: ReactionId,
    pub name: String,
    pub compartment: CompartmentId,
    pub shape: ReactionShape,
    pub position: Position,
    /// Two horizontal segments flanking the shape (§3 "Backbone").
    pub backbone: Vec<Segment>,
}

impl Reaction {
    #[must_use]
    pub fn new(
        id: impl Into<ReactionId>,
        name: impl Into<String>,
        compartment: impl Into<CompartmentId>,
        shape: ReactionShape,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            compartment: compartment.into(),
            shape,
            position: Position::zero(),
            backbone: Vec::new(),
        }
    }

    #[must_use]
    pub fn left_port(&self) -> Coordinate {
        Coordinate::new(self.position.x - 20.0, self.position.center_y())
    }

    #[must_use]
    pub fn right_port(&self) -> Coordinate {
        Coordinate::new(self.position.right() + 20.0, self.position.center_y())
    }
}

/// A bare compartment descriptor as consumed from the inbound model (§6).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CompartmentDescriptor {
    pub accession: CompartmentId,
    pub display_name: String,
}

/// Ordered map of compartments, keyed by accession, preserving insertion
/// order so downstream iteration (and therefore geometry) is deterministic.
pub type CompartmentMap = IndexMap<CompartmentId, Compartment>;
