//! Query Classifier: asks the hosted model to label a query, then hands the
//! reply to an `IntentParser`.

use tracing::debug;

use crate::llm_client::{CompletionRequest, LanguageModel, LlmError};
use crate::market::intent::{parse_or_general, Intent, IntentParser};
use crate::market::prompts::{classify_prompt, CLASSIFY_MAX_TOKENS, MARKET_TEMPERATURE};

pub async fn classify(
    llm: &dyn LanguageModel,
    parser: &dyn IntentParser,
    query: &str,
) -> Result<Intent, LlmError> {
    let prompt = classify_prompt(query);
    let reply = llm
        .complete(&CompletionRequest {
            system: None,
            prompt: &prompt,
            max_tokens: Some(CLASSIFY_MAX_TOKENS),
            temperature: MARKET_TEMPERATURE,
        })
        .await?;
    debug!("LLM Response: {reply}");

    let intent = parse_or_general(parser, &reply);
    debug!("Analysis: {intent:?}");
    Ok(intent)
}
