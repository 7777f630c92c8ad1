//! Free-form Responder: general questions go straight to the hosted model.

use crate::llm_client::prompts::ASSISTANT_PREAMBLE;
use crate::llm_client::{CompletionRequest, LanguageModel, LlmError};
use crate::market::prompts::{GENERAL_MAX_TOKENS, MARKET_TEMPERATURE};

/// Wraps the query with optional context and returns the model's reply verbatim.
pub async fn answer(
    llm: &dyn LanguageModel,
    query: &str,
    context: Option<&str>,
) -> Result<String, LlmError> {
    let prompt = general_prompt(query, context);
    llm.complete(&CompletionRequest {
        system: None,
        prompt: &prompt,
        max_tokens: Some(GENERAL_MAX_TOKENS),
        temperature: MARKET_TEMPERATURE,
    })
    .await
}

fn general_prompt(query: &str, context: Option<&str>) -> String {
    match context {
        Some(context) => format!(
            "{ASSISTANT_PREAMBLE} Below is some context:\n{context}\n\nAnswer the following query:\n{query}\n"
        ),
        None => format!("{ASSISTANT_PREAMBLE}\n\nAnswer the following query:\n{query}\n"),
    }
}
