//! Reference extraction from keyed values and templated strings

pub mod extractor;
pub mod shape;
pub mod template;

pub use extractor::{extract, Extraction};
pub use template::{scan, TemplateRef};
