//! Named constants collected from across §4, gathered into one value type
//! instead of being inlined at each call site (mirrors how
//! `regviz_app::graph::layout` pulls its own spacing numbers into module-level
//! `const`s). [`LayoutConfig::default`] reproduces the literal values spec.md
//! gives; callers who need different spacing construct their own.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LayoutConfig {
    /// Uniform padding enclosing a compartment's descendants (§3 invariants, §4.5).
    pub compartment_padding: f64,
    /// Vertical padding added to row heights (§4.3 "Cell-size assignment").
    pub row_padding: f64,
    /// Horizontal padding added to column widths (§4.3 "Cell-size assignment").
    pub column_padding: f64,
    /// Column padding used when a vertical tile overflows into two columns (§4.3).
    pub tile_column_padding: f64,
    /// Glyph-count threshold above which a vertical tile switches to two columns (§4.3).
    pub vertical_tile_wrap_threshold: usize,
    /// Extra top padding for a compartment containing an {INPUT, CATALYST} entity (§4.3, §4.5).
    pub catalyst_hook_padding: f64,
    /// Distance the input/output vertical rule sits beyond the outermost glyph (§4.4).
    pub rule_offset: f64,
    /// Length of the arrow head on input/output connectors (§4.4 "Output connectors").
    pub arrow_size: f64,
    /// Distance the catalyst/regulator horizontal rule sits beyond the outermost glyph (§4.4).
    pub hrule_offset: f64,
    /// Gap enforced between adjacent regulators during local compaction (§4.3 "Finalization").
    pub regulator_gap: f64,
    /// Side length of the stoichiometry badge box (§4.4 "Stoichiometry badge").
    pub badge_size: f64,
    /// Padding applied around the reaction glyph before it unions into its compartment (§4.5).
    pub reaction_padding: (f64, f64),
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            compartment_padding: 20.0,
            row_padding: 12.0,
            column_padding: 12.0,
            tile_column_padding: 20.0,
            vertical_tile_wrap_threshold: 6,
            catalyst_hook_padding: 50.0,
            rule_offset: 35.0,
            arrow_size: 8.0,
            hrule_offset: 35.0,
            regulator_gap: 16.0,
            badge_size: 12.0,
            reaction_padding: (80.0, 40.0),
        }
    }
}
