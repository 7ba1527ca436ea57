pub mod triples;

pub use triples::{Object, Triple, format_triple, parse_rdf_xml};

use anyhow::Result;

/// Parse an RDF/XML document and render every triple as one text line.
pub fn extract_to_lines(rdf_xml: &str) -> Result<String> {
    let triples = parse_rdf_xml(rdf_xml)?;

    let mut output = String::new();
    for triple in &triples {
        output.push_str(&format_triple(triple));
        output.push('\n');
    }

    Ok(output)
}
