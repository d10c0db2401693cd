//! Structural extractors. Each one is a pure function of the normalized
//! source and a [`Registry`].

pub mod answers;
pub mod evaluators;
pub mod macros;
pub mod pgml;
pub mod registry;
pub mod widgets;

pub use answers::extract_answers;
pub use evaluators::{classify_expr, extract_evaluators, extract_vars, normalize_ws};
pub use macros::extract_macros;
pub use pgml::{extract_pgml_blocks, pgml_info, pgml_regions};
pub use registry::Registry;
pub use widgets::extract_widgets;
