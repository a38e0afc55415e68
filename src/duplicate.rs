//! C3 — entity-duplication pass (§4.2).
//!
//! Splits entities whose role-type set mixes directions the grid algorithm
//! cannot place on a single glyph. Grounded on the recursive fragment-copying
//! style `regviz_app::graph::layout::merge_positions` uses to fork a child
//! layout into a freshly offset copy, here forking role sets instead of
//! coordinates.

use crate::model::{Entity, Role, RoleType};

/// Splits `entity` in place if its role-type set is one of the three
/// conflicting combinations named in §4.2, returning the newly created copy.
/// Entities that pass through unchanged return `None`.
///
/// Idempotent: running this twice on the same entity is a no-op the second
/// time, because after the first split neither copy carries a conflicting set.
fn duplicate_one(entity: &mut Entity, next_copy_id: &mut dyn FnMut(&str) -> String) -> Option<Entity> {
    let types: Vec<RoleType> = entity.roles.iter().map(|r| r.role_type).collect();
    let has = |t: RoleType| types.contains(&t);

    let peel = if has(RoleType::Input) && has(RoleType::Output) && types.len() == 2 {
        Some(RoleType::Output)
    } else if has(RoleType::Catalyst)
        && has(RoleType::PositiveRegulator)
        && !has(RoleType::NegativeRegulator)
        && types.len() == 2
    {
        Some(RoleType::PositiveRegulator)
    } else if has(RoleType::Catalyst)
        && has(RoleType::NegativeRegulator)
        && !has(RoleType::PositiveRegulator)
        && types.len() == 2
    {
        Some(RoleType::NegativeRegulator)
    } else if has(RoleType::Catalyst)
        && has(RoleType::PositiveRegulator)
        && has(RoleType::NegativeRegulator)
        && types.len() == 3
    {
        // Three-way case: the CATALYST role is the one peeled off (§4.2).
        Some(RoleType::Catalyst)
    } else {
        None
    };

    let peeled_type = peel?;
    let peeled_role: Role = *entity
        .roles
        .iter()
        .find(|r| r.role_type == peeled_type)
        .expect("peel target role type was observed above");

    entity.roles.retain(|r| r.role_type != peeled_type);

    let mut copy = entity.clone();
    copy.id = next_copy_id(&entity.id);
    copy.roles = vec![peeled_role];
    copy.connector = crate::model::Connector::default();
    Some(copy)
}

/// Runs the duplication pass over every entity in `entities`, appending
/// copies to the same vector (and, implicitly, the same compartment — the
/// copy inherits `compartment` unchanged).
pub fn duplicate_all(entities: &mut Vec<Entity>) {
    let mut counters: std::collections::HashMap<String, u32> = std::collections::HashMap::new();
    let mut next_copy_id = |source: &str| -> String {
        let counter = counters.entry(source.to_string()).or_insert(0);
        *counter += 1;
        format!("{source}#dup{counter}")
    };

    let mut copies = Vec::new();
    for entity in entities.iter_mut() {
        if let Some(copy) = duplicate_one(entity, &mut next_copy_id) {
            copies.push(copy);
        }
    }
    entities.extend(copies);
}
