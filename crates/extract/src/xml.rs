use anyhow::{Context, Result, bail};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use serde_json::{Map, Value};

/// Parse an XML document into a generic attributed tree.
///
/// The shape mirrors a generic object-tree XML parser: elements become
/// objects keyed by child tag name, repeated sibling tags collapse into
/// arrays, attributes become `@_`-prefixed keys, and mixed text lands under
/// `#text`. An element with neither attributes nor children is its own text
/// content (numeric text coerced to a number).
pub fn parse_xml(xml: &str) -> Result<Value> {
    let mut reader = Reader::from_str(xml);

    // Stack bottom is a virtual document element collecting root-level keys.
    let mut stack: Vec<Element> = vec![Element::document()];

    loop {
        match reader.read_event() {
            Ok(Event::Start(start)) => {
                stack.push(Element::open(&start)?);
            }
            Ok(Event::Empty(start)) => {
                let (name, value) = Element::open(&start)?.close();
                let parent = stack.last_mut().context("XML element stack underflow")?;
                insert_child(&mut parent.map, name, value);
            }
            Ok(Event::End(_)) => {
                if stack.len() < 2 {
                    bail!("Unexpected closing tag");
                }
                if let Some(element) = stack.pop() {
                    let (name, value) = element.close();
                    let parent = stack.last_mut().context("XML element stack underflow")?;
                    insert_child(&mut parent.map, name, value);
                }
            }
            Ok(Event::Text(text)) => {
                let text = text.unescape().context("Invalid text content")?;
                if let Some(element) = stack.last_mut() {
                    element.text.push_str(&text);
                }
            }
            Ok(Event::CData(cdata)) => {
                let text = String::from_utf8_lossy(&cdata.into_inner()).to_string();
                if let Some(element) = stack.last_mut() {
                    element.text.push_str(&text);
                }
            }
            Ok(Event::Eof) => break,
            // Declarations, comments, doctypes and processing instructions
            // carry no element content
            Ok(_) => {}
            Err(e) => return Err(e).context("Failed to parse XML"),
        }
    }

    if stack.len() != 1 {
        bail!("Unclosed element in XML document");
    }

    let document = stack.pop().context("XML element stack underflow")?;
    Ok(Value::Object(document.map))
}

struct Element {
    name: String,
    map: Map<String, Value>,
    text: String,
}

impl Element {
    fn document() -> Self {
        Self {
            name: String::new(),
            map: Map::new(),
            text: String::new(),
        }
    }

    fn open(start: &BytesStart) -> Result<Self> {
        let name = String::from_utf8_lossy(start.name().as_ref()).to_string();

        let mut map = Map::new();
        for attribute in start.attributes() {
            let attribute = attribute.context("Invalid attribute")?;
            let key = format!("@_{}", String::from_utf8_lossy(attribute.key.as_ref()));
            let value = attribute
                .unescape_value()
                .context("Invalid attribute value")?
                .to_string();
            map.insert(key, Value::String(value));
        }

        Ok(Self {
            name,
            map,
            text: String::new(),
        })
    }

    fn close(self) -> (String, Value) {
        let text = self.text.trim();

        let value = if self.map.is_empty() {
            if text.is_empty() {
                Value::String(String::new())
            } else {
                parse_text_value(text)
            }
        } else {
            let mut map = self.map;
            if !text.is_empty() {
                map.insert("#text".to_string(), parse_text_value(text));
            }
            Value::Object(map)
        };

        (self.name, value)
    }
}

/// Insert a child value, collapsing repeated sibling tags into an array.
fn insert_child(map: &mut Map<String, Value>, key: String, value: Value) {
    match map.get_mut(&key) {
        Some(Value::Array(items)) => items.push(value),
        Some(existing) => {
            let first = existing.take();
            *existing = Value::Array(vec![first, value]);
        }
        None => {
            map.insert(key, value);
        }
    }
}

fn parse_text_value(text: &str) -> Value {
    if let Ok(n) = text.parse::<i64>() {
        return Value::from(n);
    }
    if let Ok(f) = text.parse::<f64>() {
        if f.is_finite() {
            return Value::from(f);
        }
    }
    Value::String(text.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn single_elements_stay_scalar() {
        let tree = parse_xml("<root><name>hello</name></root>").unwrap();
        assert_eq!(tree, json!({"root": {"name": "hello"}}));
    }

    #[test]
    fn repeated_siblings_become_arrays() {
        let tree = parse_xml("<root><item>1</item><item>2</item><item>3</item></root>").unwrap();
        assert_eq!(tree, json!({"root": {"item": [1, 2, 3]}}));
    }

    #[test]
    fn attributes_get_the_at_prefix() {
        let tree = parse_xml(r#"<cim:BaseVoltage rdf:ID="BV1"/>"#).unwrap();
        assert_eq!(tree, json!({"cim:BaseVoltage": {"@_rdf:ID": "BV1"}}));
    }

    #[test]
    fn attributes_and_text_share_the_object() {
        let tree = parse_xml(r#"<v unit="kV">110</v>"#).unwrap();
        assert_eq!(tree, json!({"v": {"@_unit": "kV", "#text": 110}}));
    }

    #[test]
    fn numeric_text_is_coerced() {
        let tree = parse_xml("<root><i>42</i><f>10.5</f><s>abc</s></root>").unwrap();
        assert_eq!(tree, json!({"root": {"i": 42, "f": 10.5, "s": "abc"}}));
    }

    #[test]
    fn empty_elements_become_empty_strings() {
        let tree = parse_xml("<root><empty/></root>").unwrap();
        assert_eq!(tree, json!({"root": {"empty": ""}}));
    }

    #[test]
    fn empty_input_yields_an_empty_tree() {
        assert_eq!(parse_xml("").unwrap(), json!({}));
    }

    #[test]
    fn mismatched_tags_are_an_error() {
        assert!(parse_xml("<a><b></a>").is_err());
    }

    #[test]
    fn unclosed_elements_are_an_error() {
        assert!(parse_xml("<a><b>").is_err());
    }
}
