//! C2 — compartment-tree builder (§4.1).
//!
//! Reduces a master `surrounded_by` DAG down to the minimal tree spanning the
//! compartments actually present in one reaction, grounded on the
//! BFS/path-enumeration style `regviz_core::core::dfa::determinize` uses for
//! subset construction over a graph of states.

use std::collections::HashSet;

use indexmap::{IndexMap, IndexSet};

use crate::model::{Compartment, CompartmentDescriptor, CompartmentId, CompartmentMap};

/// Sentinel accession for the outermost synthetic compartment (§3, §4.1, §4.5).
pub const EXTRACELLULAR_SENTINEL: &str = "extracellular_region";

/// The `surrounded_by` relation consumed from the ontology source (§6).
///
/// `getTreeWithIntermediateNodes` in spec.md is modeled as this trait: given a
/// set of accessions, return the minimal surrounding tree rooted at the
/// extracellular sentinel. Implementors own the master DAG; this crate only
/// consumes the trait's output.
pub trait CompartmentOntology {
    /// Returns the display name for an accession, if the ontology knows it.
    fn display_name(&self, accession: &str) -> Option<String>;

    /// Returns the accessions immediately surrounding `accession` (its
    /// `surrounded_by` parents in the master DAG), outer-to-inner order not
    /// significant — the builder explores all of them.
    fn surrounding(&self, accession: &str) -> Vec<CompartmentId>;

    /// Builds the minimal tree spanning `accessions`, rooted at the
    /// extracellular sentinel. Default implementation runs the §4.1 algorithm
    /// against `surrounding`/`display_name`; ontology backends needing a
    /// different traversal strategy (e.g. a precomputed index) may override.
    fn tree_with_intermediate_nodes(&self, accessions: &IndexSet<CompartmentId>) -> CompartmentMap
    where
        Self: Sized,
    {
        build_compartment_tree(self, accessions)
    }
}

/// A small in-memory ontology used by tests and the demo binary: a fixed
/// `surrounded_by` adjacency map plus accession -> display name table.
#[derive(Debug, Clone, Default)]
pub struct StaticOntology {
    surrounded_by: IndexMap<CompartmentId, Vec<CompartmentId>>,
    names: IndexMap<CompartmentId, String>,
}

impl StaticOntology {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `accession` with a display name and its immediate
    /// surrounding compartments (outer neighbors in the DAG).
    pub fn add(
        &mut self,
        accession: impl Into<CompartmentId>,
        name: impl Into<String>,
        surrounded_by: Vec<CompartmentId>,
    ) -> &mut Self {
        let accession = accession.into();
        self.names.insert(accession.clone(), name.into());
        self.surrounded_by.insert(accession, surrounded_by);
        self
    }
}

impl CompartmentOntology for StaticOntology {
    fn display_name(&self, accession: &str) -> Option<String> {
        self.names.get(accession).cloned()
    }

    fn surrounding(&self, accession: &str) -> Vec<CompartmentId> {
        self.surrounded_by
            .get(accession)
            .cloned()
            .unwrap_or_default()
    }
}

/// Enumerates every path from `start` to a root of the `surrounded_by` DAG
/// (a node with no further surrounding compartments).
fn enumerate_paths(
    ontology: &impl CompartmentOntology,
    start: &str,
    visiting: &mut HashSet<CompartmentId>,
) -> Vec<Vec<CompartmentId>> {
    if !visiting.insert(start.to_string()) {
        // A cycle in supposedly-DAG input; treat this branch as a dead end
        // rather than looping forever. The builder stays total (§4.1).
        return Vec::new();
    }

    let parents = ontology.surrounding(start);
    let paths = if parents.is_empty() {
        vec![vec![start.to_string()]]
    } else {
        parents
            .iter()
            .flat_map(|parent| enumerate_paths(ontology, parent, visiting))
            .map(|mut path| {
                path.push(start.to_string());
                path
            })
            .collect()
    };

    visiting.remove(start);
    paths
}

/// Picks, among every root-to-`start` path, the one maximizing the count of
/// other members of `accessions` it passes through, breaking ties by shorter
/// path length (§4.1 step 1).
fn best_path(
    ontology: &impl CompartmentOntology,
    start: &str,
    accessions: &IndexSet<CompartmentId>,
) -> Vec<CompartmentId> {
    let mut visiting = HashSet::new();
    let candidates = enumerate_paths(ontology, start, &mut visiting);

    candidates
        .into_iter()
        .max_by_key(|path| {
            let hits = path
                .iter()
                .filter(|node| accessions.contains(node.as_str()) && node.as_str() != start)
                .count();
            // Negate length so "fewer nodes" wins ties under max_by_key.
            (hits, std::cmp::Reverse(path.len()))
        })
        .unwrap_or_else(|| vec![start.to_string()])
}

/// Builds the minimal tree spanning `accessions`, attaches the extracellular
/// sentinel as the structural outer root, and strips single-child upper
/// compartments not themselves in `accessions` (§4.1).
///
/// Total: an empty `accessions` set yields a tree containing only the
/// sentinel; an accession missing from the ontology is silently dropped.
pub fn build_compartment_tree(
    ontology: &impl CompartmentOntology,
    accessions: &IndexSet<CompartmentId>,
) -> CompartmentMap {
    let mut map: CompartmentMap = IndexMap::new();
    map.insert(
        EXTRACELLULAR_SENTINEL.to_string(),
        Compartment::new(EXTRACELLULAR_SENTINEL, "extracellular region"),
    );

    let known: IndexSet<CompartmentId> = accessions
        .iter()
        .filter(|a| ontology.display_name(a).is_some())
        .cloned()
        .collect();

    for accession in &known {
        let path = best_path(ontology, accession, &known);
        merge_path(&mut map, ontology, &path);
    }

    if known.is_empty() {
        return map;
    }

    attach_roots_to_sentinel(&mut map);
    strip_single_child_upper_nodes(&mut map, &known);
    map
}

fn merge_path(map: &mut CompartmentMap, ontology: &impl CompartmentOntology, path: &[CompartmentId]) {
    for accession in path {
        map.entry(accession.clone()).or_insert_with(|| {
            let name = ontology
                .display_name(accession)
                .unwrap_or_else(|| accession.clone());
            Compartment::new(accession.clone(), name)
        });
    }

    // `path` runs outer (DAG root) -> inner (the queried accession), so the
    // later element of each adjacent pair is the child of the earlier one.
    for pair in path.windows(2) {
        let (child, parent) = (&pair[1], &pair[0]);
        if map[parent].children.iter().all(|c| c != child) {
            map[parent].children.push(child.clone());
        }
        if map[child].parent.is_none() {
            map[child].parent = Some(parent.clone());
        }
    }
}

/// Any merged node without a parent becomes a direct child of the sentinel.
fn attach_roots_to_sentinel(map: &mut CompartmentMap) {
    let dangling: Vec<CompartmentId> = map
        .iter()
        .filter(|(id, c)| id.as_str() != EXTRACELLULAR_SENTINEL && c.parent.is_none())
        .map(|(id, _)| id.clone())
        .collect();

    for id in dangling {
        map[EXTRACELLULAR_SENTINEL].children.push(id.clone());
        map[&id].parent = Some(EXTRACELLULAR_SENTINEL.to_string());
    }
}

/// Starting from the sentinel, descend while the current node itself has
/// exactly one child and is not itself a requested accession, dropping each
/// such node from the tree (§4.1 "Remove 'upper' compartments"). A node with
/// more than one child is a branching point and becomes the new root instead
/// of being stripped, even if the sentinel currently has only that one node
/// attached.
fn strip_single_child_upper_nodes(map: &mut CompartmentMap, accessions: &IndexSet<CompartmentId>) {
    loop {
        let root_children = map[EXTRACELLULAR_SENTINEL].children.clone();
        if root_children.len() != 1 {
            return;
        }
        let current = root_children[0].clone();
        if accessions.contains(current.as_str()) {
            return;
        }

        let current_children = map[&current].children.clone();
        if current_children.len() != 1 {
            return;
        }

        map[EXTRACELLULAR_SENTINEL].children = current_children.clone();
        for grandchild in &current_children {
            map[grandchild].parent = Some(EXTRACELLULAR_SENTINEL.to_string());
        }
        map.shift_remove(&current);
    }
}

/// Builds a lookup of accessions from the inbound descriptor list, dropping
/// any whose accession the ontology does not recognize (§4.1 "Failure").
#[must_use]
pub fn accession_set(descriptors: &[CompartmentDescriptor]) -> IndexSet<CompartmentId> {
    descriptors.iter().map(|d| d.accession.clone()).collect()
}
