pub mod matcher;
pub mod xml;

pub use matcher::{
    ExtractionResult, FALLBACK_MARKER, extract_matches, find_instances, resolve_target_class,
};
pub use xml::parse_xml;
