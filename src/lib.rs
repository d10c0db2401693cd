// Export modules for library usage
pub mod aggregate;
pub mod analysis;
pub mod classify;
pub mod cli;
pub mod commands;
pub mod config;
pub mod discipline;
pub mod errors;
pub mod extract;
pub mod io;
pub mod model;
pub mod progress;
pub mod scan;
pub mod wiring;

// Re-export commonly used types
pub use crate::model::{
    ClassificationLabels, Evaluator, EvaluatorKind, PgmlBlock, ProblemType, Reason, Record,
    ReviewBucket, StructuralReport, Widget, WidgetKind,
};

pub use crate::aggregate::{Aggregator, ReviewSample};
pub use crate::analysis::{analyze_text, Analyzer, FileAnalysis};
pub use crate::classify::{classify, Classifier};
pub use crate::discipline::Discipline;
pub use crate::errors::{Error, Result};
pub use crate::extract::Registry;
pub use crate::scan::SourceText;
pub use crate::wiring::{wire, Wiring};
