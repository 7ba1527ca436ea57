pub mod builder;
pub mod document;
pub mod simplify;

pub use builder::CorpusBuilder;
pub use document::{TripleLine, parse_line, render_document};
pub use simplify::simplify_uri;
