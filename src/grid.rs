//! C5 — grid/box placement (§4.3). The core geometric step: partitions
//! participants into a dense grid keyed by `(compartment, role)`, sizes rows
//! and columns, compacts, and assigns every glyph its final center.
//!
//! Grounded on `regviz_app::graph::layout::compute_box_layout` /
//! `BoxLayoutResult` (recursive fragment sizing that reports a width/height
//! and a set of local positions a parent can place without extra math) and on
//! the `BoundsTracker` accumulator pattern from the same file.

use indexmap::IndexMap;

use crate::config::LayoutConfig;
use crate::geometry::{Coordinate, Position};
use crate::index::LayoutIndex;
use crate::model::{CompartmentId, CompartmentMap, Entity, EntityId, Reaction, RoleType};
use crate::text::TextMetrics;

/// One `(compartment, role)` cell: an ordered set of entities plus their
/// pre-computed local layout, before the cell is placed on the grid.
struct Tile {
    compartment: CompartmentId,
    width: f64,
    height: f64,
    /// Entity id -> top-left offset within the tile's own (0,0)-origin frame.
    local: Vec<(EntityId, Coordinate, f64, f64)>,
}

/// A lightweight dense grid, as Design Notes C5 calls for: row/column
/// insertion and removal are used by [`compact`].
struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<Option<Tile>>,
}

impl Grid {
    fn new(rows: usize, cols: usize) -> Self {
        let mut cells = Vec::with_capacity(rows * cols);
        cells.resize_with(rows * cols, || None);
        Self { rows, cols, cells }
    }

    fn idx(&self, row: usize, col: usize) -> usize {
        row * self.cols + col
    }

    fn set(&mut self, row: usize, col: usize, tile: Tile) {
        let i = self.idx(row, col);
        self.cells[i] = Some(tile);
    }

    fn get(&self, row: usize, col: usize) -> Option<&Tile> {
        self.cells[self.idx(row, col)].as_ref()
    }

    fn row_is_empty(&self, row: usize) -> bool {
        (0..self.cols).all(|c| self.get(row, c).is_none())
    }

    fn col_is_empty(&self, col: usize) -> bool {
        (0..self.rows).all(|r| self.get(r, col).is_none())
    }

    /// Removes every entirely empty row, shifting later rows up (§4.3 "Compaction").
    fn remove_empty_rows(&mut self) {
        let keep: Vec<usize> = (0..self.rows).filter(|&r| !self.row_is_empty(r)).collect();
        self.rebuild_rows(keep);
    }

    /// Removes every entirely empty column, shifting later columns left.
    fn remove_empty_cols(&mut self) {
        let keep: Vec<usize> = (0..self.cols).filter(|&c| !self.col_is_empty(c)).collect();
        self.rebuild_cols(keep);
    }

    fn rebuild_rows(&mut self, keep_rows: Vec<usize>) {
        let mut new_cells = Vec::with_capacity(keep_rows.len() * self.cols);
        for &r in &keep_rows {
            for c in 0..self.cols {
                new_cells.push(self.cells[self.idx(r, c)].take());
            }
        }
        self.rows = keep_rows.len();
        self.cells = new_cells;
    }

    fn rebuild_cols(&mut self, keep_cols: Vec<usize>) {
        let mut new_cells = Vec::with_capacity(self.rows * keep_cols.len());
        for r in 0..self.rows {
            for &c in &keep_cols {
                new_cells.push(self.cells[self.idx(r, c)].take());
            }
        }
        self.cols = keep_cols.len();
        self.cells = new_cells;
    }
}

/// Depth of `accession` in the compartment tree (root sentinel is depth 0),
/// used to order catalyst/regulator rows and input/output columns
/// outer-first / inner-first (§4.3).
fn depth_of(map: &CompartmentMap, accession: &str) -> usize {
    let mut depth = 0;
    let mut current = accession;
    while let Some(parent) = map.get(current).and_then(|c| c.parent.as_deref()) {
        depth += 1;
        current = parent;
        if depth > map.len() {
            break; // defensive: never loop on malformed parent chains
        }
    }
    depth
}

/// Compartments that contain at least one entity carrying `role`, in
/// ascending or descending tree-depth order (ties broken by accession for
/// determinism).
fn bearing_compartments(
    entities: &[Entity],
    role: RoleType,
    map: &CompartmentMap,
    outer_first: bool,
) -> Vec<CompartmentId> {
    let mut seen = IndexMap::new();
    for entity in entities {
        if entity.has_role(role) {
            seen.entry(entity.compartment.clone()).or_insert(());
        }
    }
    let mut compartments: Vec<CompartmentId> = seen.into_keys().collect();
    compartments.sort_by(|a, b| {
        let depth_cmp = depth_of(map, a).cmp(&depth_of(map, b));
        let depth_cmp = if outer_first { depth_cmp } else { depth_cmp.reverse() };
        depth_cmp.then_with(|| a.cmp(b))
    });
    compartments
}

/// Sort key for glyphs within one tile (§4.3 "Within each cell"): multi-role
/// first, non-trivial before trivial, then the fixed renderable-class order.
fn tile_sort_key(entity: &Entity) -> (std::cmp::Reverse<usize>, bool, u8) {
    (
        std::cmp::Reverse(entity.roles.len()),
        entity.flags.trivial,
        entity.renderable_class.sort_rank(),
    )
}

fn entities_for(entities: &[Entity], compartment: &str, role: RoleType) -> Vec<usize> {
    let mut idxs: Vec<usize> = entities
        .iter()
        .enumerate()
        .filter(|(_, e)| e.compartment == compartment && e.has_role(role))
        .map(|(i, _)| i)
        .collect();
    idxs.sort_by_key(|&i| tile_sort_key(&entities[i]));
    idxs
}

/// Catalysts in `compartment`, excluding the one bi-role combination C3 never
/// splits ({INPUT, CATALYST}, §4.2): that entity renders once, as an input
/// glyph, with an extra hooked connector leg (§4.4) rather than as a separate
/// catalyst-row glyph.
fn catalyst_only_entities_for(entities: &[Entity], compartment: &str) -> Vec<usize> {
    let mut idxs: Vec<usize> = entities
        .iter()
        .enumerate()
        .filter(|(_, e)| {
            e.compartment == compartment && e.has_role(RoleType::Catalyst) && !e.has_role(RoleType::Input)
        })
        .map(|(i, _)| i)
        .collect();
    idxs.sort_by_key(|&i| tile_sort_key(&entities[i]));
    idxs
}

/// Builds a vertical tile (§4.3): one glyph per internal row, switching to
/// two columns past `config.vertical_tile_wrap_threshold` glyphs.
fn build_vertical_tile(
    entities: &[Entity],
    idxs: &[usize],
    metrics: &dyn TextMetrics,
    config: &LayoutConfig,
    top_inset: f64,
) -> Tile {
    let sizes: Vec<(f64, f64)> = idxs
        .iter()
        .map(|&i| entities[i].natural_size(metrics))
        .collect();

    let mut local = Vec::with_capacity(idxs.len());
    let (width, content_height) = if idxs.len() <= config.vertical_tile_wrap_threshold {
        let col_width = sizes.iter().map(|(w, _)| *w).fold(0.0, f64::max);
        let mut y = top_inset;
        for (&i, &(w, h)) in idxs.iter().zip(sizes.iter()) {
            let x = (col_width - w) / 2.0;
            local.push((entities[i].id.clone(), Coordinate::new(x, y), w, h));
            y += h + config.row_padding;
        }
        let height = (y - config.row_padding).max(top_inset);
        (col_width, height)
    } else {
        let mid = idxs.len().div_ceil(2);
        let (left, right) = idxs.split_at(mid);
        let (left_sizes, right_sizes) = sizes.split_at(mid);
        let left_width = left_sizes.iter().map(|(w, _)| *w).fold(0.0, f64::max);
        let right_width = right_sizes.iter().map(|(w, _)| *w).fold(0.0, f64::max);

        let mut y = top_inset;
        for (&i, &(w, h)) in left.iter().zip(left_sizes.iter()) {
            let x = (left_width - w) / 2.0;
            local.push((entities[i].id.clone(), Coordinate::new(x, y), w, h));
            y += h + config.row_padding;
        }
        let left_height = (y - config.row_padding).max(top_inset);

        let mut y = top_inset;
        let right_x_base = left_width + config.tile_column_padding;
        for (&i, &(w, h)) in right.iter().zip(right_sizes.iter()) {
            let x = right_x_base + (right_width - w) / 2.0;
            local.push((entities[i].id.clone(), Coordinate::new(x, y), w, h));
            y += h + config.row_padding;
        }
        let right_height = (y - config.row_padding).max(top_inset);

        (
            left_width + config.tile_column_padding + right_width,
            left_height.max(right_height),
        )
    };

    Tile {
        compartment: String::new(),
        width,
        height: content_height,
        local,
    }
}

/// Builds a horizontal tile (§4.3): glyphs placed side-by-side, used for
/// catalysts and regulators. `gap` differs between the two (§4.3 regulator
/// compaction uses a 16-unit gap; catalysts use the ordinary column padding).
fn build_horizontal_tile(
    entities: &[Entity],
    idxs: &[usize],
    metrics: &dyn TextMetrics,
    gap: f64,
) -> Tile {
    let sizes: Vec<(f64, f64)> = idxs
        .iter()
        .map(|&i| entities[i].natural_size(metrics))
        .collect();

    let height = sizes.iter().map(|(_, h)| *h).fold(0.0, f64::max);
    let mut local = Vec::with_capacity(idxs.len());
    let mut x = 0.0;
    for (&i, &(w, h)) in idxs.iter().zip(sizes.iter()) {
        let y = (height - h) / 2.0;
        local.push((entities[i].id.clone(), Coordinate::new(x, y), w, h));
        x += w + gap;
    }
    let width = (x - gap).max(0.0);

    Tile {
        compartment: String::new(),
        width,
        height,
        local,
    }
}

fn reaction_tile_size(reaction: &Reaction) -> (f64, f64) {
    match reaction.shape {
        crate::model::ReactionShape::Transition => (40.0, 20.0),
        crate::model::ReactionShape::Binding => (30.0, 20.0),
        crate::model::ReactionShape::Dissociation => (30.0, 20.0),
        crate::model::ReactionShape::Omitted => (30.0, 20.0),
        crate::model::ReactionShape::Uncertain => (30.0, 20.0),
    }
}

/// Entity ids carrying both INPUT and CATALYST roles in `compartment`
/// (§4.3 "extra 50 units of top padding").
fn has_bi_role_catalyst_input(entities: &[Entity], compartment: &str) -> bool {
    entities.iter().any(|e| {
        e.compartment == compartment
            && e.has_role(RoleType::Input)
            && e.has_role(RoleType::Catalyst)
    })
}

/// Places every entity and the reaction itself, writing final [`Position`]s
/// directly onto `entities`/`reaction` (§5: the algorithm mutates positions
/// in place; running it twice is undefined).
pub fn place(
    entities: &mut [Entity],
    reaction: &mut Reaction,
    compartments: &CompartmentMap,
    index: &LayoutIndex,
    metrics: &dyn TextMetrics,
    config: &LayoutConfig,
) {
    if index.is_empty() {
        place_reaction_alone(reaction);
        return;
    }

    let catalyst_compartments: Vec<CompartmentId> =
        bearing_compartments(entities, RoleType::Catalyst, compartments, true)
            .into_iter()
            .filter(|c| !catalyst_only_entities_for(entities, c).is_empty())
            .collect();
    let regulator_compartments = {
        let mut positive = bearing_compartments(
            entities,
            RoleType::PositiveRegulator,
            compartments,
            false,
        );
        let negative = bearing_compartments(
            entities,
            RoleType::NegativeRegulator,
            compartments,
            false,
        );
        for c in negative {
            if !positive.contains(&c) {
                positive.push(c);
            }
        }
        positive.sort_by(|a, b| {
            depth_of(compartments, b)
                .cmp(&depth_of(compartments, a))
                .then_with(|| a.cmp(b))
        });
        positive
    };
    let input_compartments = bearing_compartments(entities, RoleType::Input, compartments, true);
    let output_compartments = bearing_compartments(entities, RoleType::Output, compartments, false);

    let rows = catalyst_compartments.len() + 1 + regulator_compartments.len();
    let cols = input_compartments.len() + 1 + output_compartments.len();
    let reaction_row = catalyst_compartments.len();
    let reaction_col = input_compartments.len();

    let mut grid = Grid::new(rows, cols);

    for (r, compartment) in catalyst_compartments.iter().enumerate() {
        let idxs = catalyst_only_entities_for(entities, compartment);
        let mut tile = build_horizontal_tile(entities, &idxs, metrics, config.column_padding);
        tile.compartment = compartment.clone();
        grid.set(r, reaction_col, tile);
    }

    for (offset, compartment) in regulator_compartments.iter().enumerate() {
        let r = reaction_row + 1 + offset;
        let mut idxs = entities_for(entities, compartment, RoleType::PositiveRegulator);
        idxs.extend(entities_for(entities, compartment, RoleType::NegativeRegulator));
        idxs.sort_by_key(|&i| tile_sort_key(&entities[i]));
        let mut tile = build_horizontal_tile(entities, &idxs, metrics, config.regulator_gap);
        tile.compartment = compartment.clone();
        grid.set(r, reaction_col, tile);
    }

    for (c, compartment) in input_compartments.iter().enumerate() {
        let idxs = entities_for(entities, compartment, RoleType::Input);
        let top_inset = if has_bi_role_catalyst_input(entities, compartment) {
            config.catalyst_hook_padding
        } else {
            0.0
        };
        let mut tile = build_vertical_tile(entities, &idxs, metrics, config, top_inset);
        tile.compartment = compartment.clone();
        grid.set(reaction_row, c, tile);
    }

    for (offset, compartment) in output_compartments.iter().enumerate() {
        let c = reaction_col + 1 + offset;
        let idxs = entities_for(entities, compartment, RoleType::Output);
        let mut tile = build_vertical_tile(entities, &idxs, metrics, config, 0.0);
        tile.compartment = compartment.clone();
        grid.set(reaction_row, c, tile);
    }

    {
        let (w, h) = reaction_tile_size(reaction);
        grid.set(
            reaction_row,
            reaction_col,
            Tile {
                compartment: reaction.compartment.clone(),
                width: w,
                height: h,
                local: Vec::new(),
            },
        );
    }

    grid.remove_empty_rows();
    grid.remove_empty_cols();

    finalize(&grid, entities, reaction, compartments, config);
}

fn place_reaction_alone(reaction: &mut Reaction) {
    let (w, h) = reaction_tile_size(reaction);
    reaction.position = Position::new(0.0, 0.0, w, h);
}

/// Computes row heights / column widths (applying compartment min-width
/// scaling), running centers, and writes every entity's and the reaction's
/// final [`Position`] (§4.3 "Finalization").
fn finalize(
    grid: &Grid,
    entities: &mut [Entity],
    reaction: &mut Reaction,
    compartments: &CompartmentMap,
    config: &LayoutConfig,
) {
    let mut row_heights = vec![0.0f64; grid.rows];
    let mut col_widths = vec![0.0f64; grid.cols];

    for r in 0..grid.rows {
        for c in 0..grid.cols {
            if let Some(tile) = grid.get(r, c) {
                row_heights[r] = row_heights[r].max(tile.height);
                col_widths[c] = col_widths[c].max(tile.width);
            }
        }
    }
    for h in row_heights.iter_mut() {
        *h += 2.0 * config.row_padding;
    }
    for w in col_widths.iter_mut() {
        *w += 2.0 * config.column_padding;
    }

    // A compartment's minimum width (driven by its own label text) only
    // constrains the columns it spans — the label is rendered horizontally,
    // so it never drives a row's height. Each column in this grid is spanned
    // by at most one bearing compartment, matching §4.3's common case.
    for c in 0..grid.cols {
        if let Some(tile) = (0..grid.rows).find_map(|r| grid.get(r, c)) {
            apply_compartment_padding(&tile.compartment, compartments, config, &mut col_widths[c]);
        }
    }

    let mut row_centers = vec![0.0f64; grid.rows];
    let mut y = 0.0;
    for r in 0..grid.rows {
        row_centers[r] = y + row_heights[r] / 2.0;
        y += row_heights[r];
    }

    let mut col_centers = vec![0.0f64; grid.cols];
    let mut x = 0.0;
    for c in 0..grid.cols {
        col_centers[c] = x + col_widths[c] / 2.0;
        x += col_widths[c];
    }

    let mut positions: IndexMap<EntityId, Position> = IndexMap::new();
    let mut reaction_center = Coordinate::new(0.0, 0.0);

    for r in 0..grid.rows {
        for c in 0..grid.cols {
            if let Some(tile) = grid.get(r, c) {
                let cell_center = Coordinate::new(col_centers[c], row_centers[r]);
                let tile_top_left = Coordinate::new(
                    cell_center.x - tile.width / 2.0,
                    cell_center.y - tile.height / 2.0,
                );
                if tile.local.is_empty() {
                    reaction_center = cell_center;
                }
                for (id, offset, w, h) in &tile.local {
                    let pos = Position::new(tile_top_left.x + offset.x, tile_top_left.y + offset.y, *w, *h);
                    positions.insert(id.clone(), pos);
                }
            }
        }
    }

    for entity in entities.iter_mut() {
        if let Some(pos) = positions.get(&entity.id) {
            entity.position = *pos;
        }
    }

    let (rw, rh) = reaction_tile_size(reaction);
    reaction.position = Position::new(
        reaction_center.x - rw / 2.0,
        reaction_center.y - rh / 2.0,
        rw,
        rh,
    );
    let backbone_len = 30.0;
    reaction.backbone = vec![
        crate::geometry::Segment::new(
            Coordinate::new(reaction.position.x - backbone_len, reaction.position.center_y()),
            Coordinate::new(reaction.position.x, reaction.position.center_y()),
        ),
        crate::geometry::Segment::new(
            Coordinate::new(reaction.position.right(), reaction.position.center_y()),
            Coordinate::new(reaction.position.right() + backbone_len, reaction.position.center_y()),
        ),
    ];
}

fn apply_compartment_padding(
    compartment: &str,
    compartments: &CompartmentMap,
    config: &LayoutConfig,
    dimension: &mut f64,
) {
    if compartment.is_empty() {
        return;
    }
    let Some(comp) = compartments.get(compartment) else {
        return;
    };
    let text_width = 6.0 * comp.name.chars().count() as f64; // conservative estimate; real text
    // metrics are applied again, precisely, during compartment sizing (C7).
    let min_width = 2.0 * config.compartment_padding + text_width;
    if *dimension < min_width {
        *dimension = min_width;
    } else {
        *dimension += 2.0 * config.compartment_padding;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Compartment, Entity, ReactionShape, RenderableClass, Role};
    use crate::text::FixedWidthMetrics;

    fn compartments_with(name: &str) -> CompartmentMap {
        let mut map = CompartmentMap::new();
        map.insert(name.to_string(), Compartment::new(name, name));
        map
    }

    #[test]
    fn simple_transition_places_input_left_output_right() {
        let mut compartments = compartments_with("cytoplasm");
        compartments
            .get_mut("cytoplasm")
            .unwrap()
            .contents
            .extend(["A".to_string(), "B".to_string()]);

        let mut entities = vec![
            Entity::new(
                "A",
                "A",
                RenderableClass::Protein,
                vec![Role::new(RoleType::Input, 1)],
                "cytoplasm",
            ),
            Entity::new(
                "B",
                "B",
                RenderableClass::Protein,
                vec![Role::new(RoleType::Output, 1)],
                "cytoplasm",
            ),
        ];
        let mut reaction = Reaction::new("R", "R", "cytoplasm", ReactionShape::Transition);
        let index = LayoutIndex::build(&entities);
        let config = LayoutConfig::default();
        let metrics = FixedWidthMetrics;

        place(&mut entities, &mut reaction, &compartments, &index, &metrics, &config);

        let a = entities.iter().find(|e| e.id == "A").unwrap();
        let b = entities.iter().find(|e| e.id == "B").unwrap();
        assert!(a.position.center_x() < reaction.position.center_x());
        assert!(b.position.center_x() > reaction.position.center_x());
        assert_eq!(reaction.backbone.len(), 2);
    }

    #[test]
    fn many_regulators_share_a_single_row() {
        let compartments = compartments_with("cytoplasm");
        let mut entities: Vec<Entity> = (0..7)
            .map(|i| {
                Entity::new(
                    format!("N{i}"),
                    format!("N{i}"),
                    RenderableClass::Protein,
                    vec![Role::new(RoleType::NegativeRegulator, 1)],
                    "cytoplasm",
                )
            })
            .collect();
        let mut reaction = Reaction::new("R", "R", "cytoplasm", ReactionShape::Transition);
        let index = LayoutIndex::build(&entities);
        let config = LayoutConfig::default();
        let metrics = FixedWidthMetrics;

        place(&mut entities, &mut reaction, &compartments, &index, &metrics, &config);

        let ys: std::collections::HashSet<i64> = entities
            .iter()
            .map(|e| e.position.center_y().round() as i64)
            .collect();
        assert_eq!(ys.len(), 1, "all regulators should land on one row");
    }

    #[test]
    fn bi_role_catalyst_input_gets_top_padding() {
        let compartments = compartments_with("cytoplasm");
        let mut entities = vec![Entity::new(
            "C",
            "C",
            RenderableClass::Protein,
            vec![
                Role::new(RoleType::Input, 1),
                Role::new(RoleType::Catalyst, 1),
            ],
            "cytoplasm",
        )];
        let mut reaction = Reaction::new("R", "R", "cytoplasm", ReactionShape::Transition);
        let index = LayoutIndex::build(&entities);
        let config = LayoutConfig::default();
        let metrics = FixedWidthMetrics;

        place(&mut entities, &mut reaction, &compartments, &index, &metrics, &config);
        // The tile's content was inset 50 units from the row top; since this
        // is the only row, the entity should sit comfortably below y=0.
        assert!(entities[0].position.y >= config.catalyst_hook_padding - 1.0);
    }
}
