use anyhow::Result;
use serde::Serialize;

use extract::{ExtractionResult, extract_matches};

use crate::config::RagConfig;
use crate::llm::{ChatClient, ChatMessage};
use crate::prompt;

/// Mutable record threaded through the pipeline stages. Created per
/// request, dropped after the response.
pub struct PipelineState {
    /// Conversation history, append-only.
    pub messages: Vec<ChatMessage>,
    pub question: String,
    pub context: String,
    pub xml_document: String,
    pub sparql_query: Option<String>,
    pub explanation: Option<String>,
    pub extraction: Option<ExtractionResult>,
}

impl PipelineState {
    pub fn new(question: String, context: String, xml_document: String) -> Self {
        Self {
            messages: Vec::new(),
            question,
            context,
            xml_document,
            sparql_query: None,
            explanation: None,
            extraction: None,
        }
    }
}

/// Final answer envelope returned to callers.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineAnswer {
    pub sparql: String,
    pub explanation: String,
    pub extraction: ExtractionResult,
}

/// The fixed 3-stage query pipeline: GenerateQuery -> Explain -> Extract.
/// Strictly linear, no branching, no retry; each stage sees the
/// conversation history accumulated by the stages before it.
pub struct QueryPipeline {
    generate_model: ChatClient,
    explain_model: ChatClient,
}

impl QueryPipeline {
    pub fn new(config: &RagConfig) -> Self {
        let generate_model = ChatClient::new(
            config.ollama_url.clone(),
            config.chat_model.clone(),
            config.generate_temperature,
        );
        let explain_model = ChatClient::new(
            config.ollama_url.clone(),
            config.chat_model.clone(),
            config.explain_temperature,
        );

        Self {
            generate_model,
            explain_model,
        }
    }

    pub async fn run(
        &self,
        question: String,
        context: String,
        xml_document: String,
    ) -> Result<PipelineAnswer> {
        let mut state = PipelineState::new(question, context, xml_document);

        self.generate_query(&mut state).await?;
        self.explain_query(&mut state).await?;
        let extraction = self.extract(&mut state);

        Ok(PipelineAnswer {
            sparql: state.sparql_query.unwrap_or_default(),
            explanation: state.explanation.unwrap_or_default(),
            extraction,
        })
    }

    /// Stage 1: generate a SPARQL query from the context and question.
    async fn generate_query(&self, state: &mut PipelineState) -> Result<()> {
        let user = ChatMessage::user(prompt::generate_user_prompt(
            &state.question,
            &state.context,
        ));

        let mut messages = vec![ChatMessage::system(prompt::generate_system_prompt())];
        messages.extend(state.messages.iter().cloned());
        messages.push(user.clone());

        let response = self.generate_model.chat(messages).await?;
        let sparql = prompt::strip_code_fences(&response);

        state.messages.push(user);
        state.messages.push(ChatMessage::assistant(response));
        state.sparql_query = Some(sparql);

        Ok(())
    }

    /// Stage 2: explain the generated query against the context.
    async fn explain_query(&self, state: &mut PipelineState) -> Result<()> {
        let sparql = state.sparql_query.clone().unwrap_or_default();
        let user = ChatMessage::user(prompt::explain_user_prompt(&sparql, &state.context));

        let mut messages = vec![ChatMessage::system(prompt::explain_system_prompt())];
        messages.extend(state.messages.iter().cloned());
        messages.push(user.clone());

        let response = self.explain_model.chat(messages).await?;

        state.messages.push(user);
        state.messages.push(ChatMessage::assistant(response.clone()));
        state.explanation = Some(response);

        Ok(())
    }

    /// Stage 3: extract matching elements from the XML instance document.
    /// Local computation only; failures land in the result record.
    fn extract(&self, state: &mut PipelineState) -> ExtractionResult {
        let result = extract_matches(
            state.sparql_query.as_deref(),
            &state.question,
            &state.xml_document,
        );
        state.extraction = Some(result.clone());
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_starts_with_an_empty_history() {
        let state = PipelineState::new(
            "List all BaseVoltage in the model.".to_string(),
            String::new(),
            String::new(),
        );

        assert!(state.messages.is_empty());
        assert!(state.sparql_query.is_none());
        assert!(state.extraction.is_none());
    }

    #[test]
    fn extract_stage_runs_without_a_model() {
        let pipeline = QueryPipeline::new(&RagConfig::default());

        let mut state = PipelineState::new(
            "List all BaseVoltage in the model.".to_string(),
            String::new(),
            "<rdf:RDF><cim:BaseVoltage rdf:ID=\"BV1\"/></rdf:RDF>".to_string(),
        );
        state.sparql_query =
            Some("SELECT ?BaseVoltage WHERE { ?BaseVoltage rdf:type cim:BaseVoltage . }".to_string());

        pipeline.extract(&mut state);

        match state.extraction.unwrap() {
            ExtractionResult::Matches { count, .. } => assert_eq!(count, 1),
            ExtractionResult::Failure { error } => panic!("unexpected failure: {}", error),
        }
    }
}
