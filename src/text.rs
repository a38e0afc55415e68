//! The font-metrics oracle (§6 "Inbound model", §9 "Text-width oracle").
//!
//! The layout engine never measures glyphs itself; it asks a `TextMetrics`
//! implementation, kept behind a trait exactly the way
//! `regviz_app::graph::Graph` keeps the data backend behind a trait so the
//! layout code stays agnostic to where the numbers come from. Implementations
//! are assumed pure and cheap (§5); this crate may call them repeatedly
//! without caching.

/// Queries used by the grid and compartment-sizing stages to size glyphs and
/// compartment labels from their display text.
pub trait TextMetrics {
    /// Width in pixels of `text` when rendered, e.g. an entity's display name.
    fn text_width(&self, text: &str) -> f64;

    /// Height in pixels of a single line of text, independent of content.
    fn text_height(&self) -> f64;
}

/// A fixed-width metrics oracle: `6` pixels per character, `12` pixel line
/// height (§9). Useful for demos and offline experimentation where no real
/// font backend is wired in; production embeddings should supply their own
/// `TextMetrics` backed by actual font data.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedWidthMetrics;

impl TextMetrics for FixedWidthMetrics {
    fn text_width(&self, text: &str) -> f64 {
        6.0 * text.chars().count() as f64
    }

    fn text_height(&self) -> f64 {
        12.0
    }
}
