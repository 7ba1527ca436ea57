use regex::Regex;
use std::sync::OnceLock;

/// Exact sentence the generator must emit when no query is possible.
pub const FALLBACK_SENTENCE: &str = "SPARQL cannot be generated from available CIM context.";

pub fn generate_system_prompt() -> String {
    format!(
        r#"You are a CIM/CGMES SPARQL generator.

RULES:
1. Use ONLY classes and properties that appear in the CIM CONTEXT.
2. Use the EXACT names as found in the CIM context (e.g. BaseVoltage, BaseVoltage.nominalVoltage, rdfs:label, rdf:type).
3. Output ONLY SPARQL (no explanations).

If a SPARQL query cannot be generated from the available CIM context,
output EXACTLY:
{}"#,
        FALLBACK_SENTENCE
    )
}

pub fn generate_user_prompt(question: &str, context: &str) -> String {
    format!(
        r#"CIM CONTEXT:
{}

QUESTION:
{}

Task:
- Construct a valid SPARQL query using class/property names from the CIM context.

Output only SPARQL."#,
        context, question
    )
}

pub fn explain_system_prompt() -> String {
    r#"Explain the SPARQL query in 3-6 clear sentences.
Use the CIM context as reference.
Do not add extra information."#
        .to_string()
}

pub fn explain_user_prompt(sparql: &str, context: &str) -> String {
    format!(
        r#"SPARQL:
{}

CIM CONTEXT (informative):
{}

Explain the SPARQL query clearly in 3-6 sentences."#,
        sparql, context
    )
}

/// Strip surrounding Markdown code-fence markup from a model response.
pub fn strip_code_fences(response: &str) -> String {
    static OPEN: OnceLock<Regex> = OnceLock::new();
    static CLOSE: OnceLock<Regex> = OnceLock::new();

    let open = OPEN.get_or_init(|| Regex::new(r"(?i)^```(sparql)?").unwrap());
    let close = CLOSE.get_or_init(|| Regex::new(r"```$").unwrap());

    let trimmed = response.trim();
    let without_open = open.replace(trimmed, "");
    let without_close = close.replace(&without_open, "");
    without_close.trim().to_string()
}
