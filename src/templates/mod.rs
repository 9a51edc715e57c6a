//! Pipeline template catalog, repository analysis and rendering

mod analyzer;
mod builtin;
mod catalog;
pub mod detection;
mod render;

pub use analyzer::{LocalTemplates, TemplateAnalyzer, TemplateRenderer};
pub use catalog::{TemplateCatalog, CATALOG_FILE};
pub use detection::{detect_languages, LanguageDetection, ScanConfig};
pub use render::render_placeholders;
