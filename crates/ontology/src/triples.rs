use anyhow::{Context, Result};
use oxigraph::io::GraphFormat;
use oxigraph::model::{GraphNameRef, Subject, Term};
use oxigraph::store::Store;
use serde::{Deserialize, Serialize};

/// Base IRI used to resolve relative references in the schema file.
const BASE_IRI: &str = "http://example.org";

/// Object position of a triple. Subjects and predicates are always URIs;
/// the object's kind is tagged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Object {
    Uri(String),
    Literal(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Triple {
    pub subject: String,
    pub predicate: String,
    pub object: Object,
}

/// Parse an RDF/XML document into triples.
///
/// A malformed document propagates the parser error; the whole run aborts.
pub fn parse_rdf_xml(rdf_xml: &str) -> Result<Vec<Triple>> {
    let store = Store::new().context("Failed to create RDF store")?;

    store
        .load_graph(
            rdf_xml.as_bytes(),
            GraphFormat::RdfXml,
            GraphNameRef::DefaultGraph,
            Some(BASE_IRI),
        )
        .context("Failed to parse RDF/XML document")?;

    let mut triples = Vec::new();

    for quad in store.iter() {
        let quad = quad.context("Failed to read triple from RDF store")?;

        let subject = match quad.subject {
            Subject::NamedNode(n) => n.into_string(),
            Subject::BlankNode(b) => b.into_string(),
            // RDF-star subjects do not occur in CIM schema files
            _ => continue,
        };

        let predicate = quad.predicate.into_string();

        let object = match quad.object {
            Term::NamedNode(n) => Object::Uri(n.into_string()),
            Term::BlankNode(b) => Object::Uri(b.into_string()),
            Term::Literal(l) => Object::Literal(l.value().to_string()),
            _ => continue,
        };

        triples.push(Triple {
            subject,
            predicate,
            object,
        });
    }

    Ok(triples)
}

/// Render a triple as one text line: `<subject> <predicate> object .`
///
/// Literal objects are JSON-escaped quoted strings, never bracketed URIs.
pub fn format_triple(triple: &Triple) -> String {
    let object = match &triple.object {
        Object::Uri(uri) => format!("<{}>", uri),
        Object::Literal(value) => {
            serde_json::to_string(value).unwrap_or_else(|_| format!("{:?}", value))
        }
    };

    format!("<{}> <{}> {} .", triple.subject, triple.predicate, object)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_objects_are_quoted() {
        let triple = Triple {
            subject: "http://iec.ch/TC57/2013/CIM-schema-cim16#BaseVoltage".to_string(),
            predicate: "http://www.w3.org/2000/01/rdf-schema#label".to_string(),
            object: Object::Literal("BaseVoltage".to_string()),
        };

        let line = format_triple(&triple);
        assert_eq!(
            line,
            "<http://iec.ch/TC57/2013/CIM-schema-cim16#BaseVoltage> <http://www.w3.org/2000/01/rdf-schema#label> \"BaseVoltage\" ."
        );
    }

    #[test]
    fn literal_quotes_are_escaped() {
        let triple = Triple {
            subject: "http://example.org/s".to_string(),
            predicate: "http://example.org/p".to_string(),
            object: Object::Literal("a \"quoted\" value".to_string()),
        };

        let line = format_triple(&triple);
        assert!(line.contains(r#""a \"quoted\" value""#));
    }

    #[test]
    fn uri_objects_are_bracketed() {
        let triple = Triple {
            subject: "http://example.org/s".to_string(),
            predicate: "http://www.w3.org/1999/02/22-rdf-syntax-ns#type".to_string(),
            object: Object::Uri("http://www.w3.org/2000/01/rdf-schema#Class".to_string()),
        };

        let line = format_triple(&triple);
        assert!(line.ends_with("<http://www.w3.org/2000/01/rdf-schema#Class> ."));
        assert!(!line.contains('"'));
    }

    #[test]
    fn parses_a_small_schema() {
        let rdf = r#"<?xml version="1.0"?>
<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#"
         xmlns:rdfs="http://www.w3.org/2000/01/rdf-schema#">
  <rdfs:Class rdf:about="http://iec.ch/TC57/2013/CIM-schema-cim16#BaseVoltage">
    <rdfs:label>BaseVoltage</rdfs:label>
  </rdfs:Class>
</rdf:RDF>"#;

        let triples = parse_rdf_xml(rdf).unwrap();
        assert_eq!(triples.len(), 2);

        let label = triples
            .iter()
            .find(|t| t.predicate.ends_with("label"))
            .unwrap();
        assert_eq!(label.object, Object::Literal("BaseVoltage".to_string()));
    }

    #[test]
    fn malformed_rdf_is_fatal() {
        assert!(parse_rdf_xml("<rdf:RDF truncated").is_err());
    }
}
