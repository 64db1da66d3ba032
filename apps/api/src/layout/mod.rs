// Deterministic layout core: one shared configuration, one validator, one
// measurement path, one paginator. Every export adapter consumes this module
// instead of carrying its own copy of the layout math.

pub mod blocks;
pub mod config;
pub mod contact;
pub mod font_metrics;
pub mod paginate;
pub mod sections;

// Re-export the public API consumed by the export adapters and handlers.
pub use config::{resolve, LayoutConfig, StyleOptions};
pub use contact::validate_for_render;
pub use font_metrics::FontFamily;
pub use paginate::{layout_document, Document};
