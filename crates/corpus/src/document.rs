use regex::Regex;
use std::sync::OnceLock;

use crate::simplify::simplify_uri;

/// One parsed line of the triple file, with simplified components.
#[derive(Debug, Clone, PartialEq)]
pub struct TripleLine {
    pub subject: String,
    pub predicate: String,
    pub object: String,
}

fn triple_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(<.+?>)\s+(<.+?>)\s+(.+?)\s*\.$").unwrap())
}

/// Parse a serialized triple line.
///
/// Returns `None` for lines that do not match the triple pattern; callers
/// drop those silently.
pub fn parse_line(line: &str) -> Option<TripleLine> {
    let caps = triple_regex().captures(line)?;

    let subject = simplify_uri(&caps[1]);
    let predicate = simplify_uri(&caps[2]);

    let raw_object = &caps[3];
    let object = if raw_object.starts_with('<') {
        simplify_uri(raw_object)
    } else {
        raw_object.replace('"', "")
    };

    Some(TripleLine {
        subject,
        predicate,
        object,
    })
}

/// Render a triple as the lower-cased document text that gets embedded:
/// a compact one-line form followed by the expanded template.
pub fn render_document(triple: &TripleLine) -> String {
    let text = format!(
        "{s} — {p} — {o}\n\
         ENTITY: {s}\n\
         PROPERTY: {p}\n\
         VALUE: {o}\n\n\
         Meaning: {s} has property '{p}' with value '{o}'.",
        s = triple.subject,
        p = triple.predicate,
        o = triple.object,
    );

    text.to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_uri_object_line() {
        let line = "<http://iec.ch/TC57/2013/CIM-schema-cim16#BaseVoltage> <http://www.w3.org/1999/02/22-rdf-syntax-ns#type> <http://www.w3.org/2000/01/rdf-schema#Class> .";

        let triple = parse_line(line).unwrap();
        assert_eq!(triple.subject, "BaseVoltage");
        assert_eq!(triple.predicate, "rdf:type");
        assert_eq!(triple.object, "rdfs:Class");
    }

    #[test]
    fn parses_a_literal_object_line() {
        let line = "<http://iec.ch/TC57/2013/CIM-schema-cim16#BaseVoltage> <http://www.w3.org/2000/01/rdf-schema#label> \"BaseVoltage\" .";

        let triple = parse_line(line).unwrap();
        assert_eq!(triple.object, "BaseVoltage");
        assert!(!triple.object.contains('"'));
    }

    #[test]
    fn malformed_lines_are_dropped() {
        assert!(parse_line("not a triple").is_none());
        assert!(parse_line("<only-subject> .").is_none());
        assert!(parse_line("").is_none());
    }

    #[test]
    fn document_text_is_lower_cased() {
        let triple = TripleLine {
            subject: "BaseVoltage".to_string(),
            predicate: "rdfs:label".to_string(),
            object: "BaseVoltage".to_string(),
        };

        let doc = render_document(&triple);
        assert!(doc.contains("basevoltage — rdfs:label — basevoltage"));
        assert!(doc.contains("entity: basevoltage"));
        assert!(doc.contains("meaning: basevoltage has property 'rdfs:label'"));
        assert_eq!(doc, doc.to_lowercase());
    }
}
