/// Replace the known ontology namespace prefixes with short aliases.
///
/// The CIM core namespace is emptied entirely; the remaining known
/// namespaces map to conventional prefixes. Unrecognized namespaces pass
/// through unchanged with the angle brackets stripped.
pub fn simplify_uri(uri: &str) -> String {
    uri.replace(['<', '>'], "")
        .replace("http://iec.ch/TC57/2013/CIM-schema-cim16#", "")
        .replace(
            "http://iec.ch/TC57/1999/rdf-schema-extensions-19990926#",
            "cims:",
        )
        .replace("http://www.w3.org/2000/01/rdf-schema#", "rdfs:")
        .replace("http://www.w3.org/1999/02/22-rdf-syntax-ns#", "rdf:")
        .replace("http://iec.ch/TC57/NonStandard/UML#", "uml:")
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cim_core_namespace_is_emptied() {
        assert_eq!(
            simplify_uri("<http://iec.ch/TC57/2013/CIM-schema-cim16#BaseVoltage>"),
            "BaseVoltage"
        );
    }

    #[test]
    fn known_namespaces_get_short_prefixes() {
        assert_eq!(
            simplify_uri("<http://www.w3.org/2000/01/rdf-schema#label>"),
            "rdfs:label"
        );
        assert_eq!(
            simplify_uri("<http://www.w3.org/1999/02/22-rdf-syntax-ns#type>"),
            "rdf:type"
        );
        assert_eq!(
            simplify_uri("<http://iec.ch/TC57/1999/rdf-schema-extensions-19990926#stereotype>"),
            "cims:stereotype"
        );
        assert_eq!(
            simplify_uri("<http://iec.ch/TC57/NonStandard/UML#attribute>"),
            "uml:attribute"
        );
    }

    #[test]
    fn unknown_namespaces_pass_through_without_brackets() {
        assert_eq!(
            simplify_uri("<http://example.org/other#Thing>"),
            "http://example.org/other#Thing"
        );
    }

    #[test]
    fn simplification_is_idempotent() {
        let inputs = [
            "<http://iec.ch/TC57/2013/CIM-schema-cim16#BaseVoltage.nominalVoltage>",
            "<http://www.w3.org/2000/01/rdf-schema#label>",
            "<http://example.org/other#Thing>",
        ];

        for input in inputs {
            let once = simplify_uri(input);
            let twice = simplify_uri(&once);
            assert_eq!(once, twice);
        }
    }
}
