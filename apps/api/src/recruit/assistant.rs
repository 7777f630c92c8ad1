//! Summarizer and Follow-up Responder: one-CV prompts sent to the hosted model.

use crate::llm_client::{CompletionRequest, LanguageModel, LlmError};
use crate::recruit::prompts::{
    follow_up_prompt, summary_prompt, CV_TEMPERATURE, RESPONDER_SYSTEM, SUMMARIZER_SYSTEM,
};

/// Prose summary of education, experience, employer and skills.
/// No structure is enforced on the reply.
pub async fn summarize(llm: &dyn LanguageModel, cv_text: &str) -> Result<String, LlmError> {
    let prompt = summary_prompt(cv_text);
    llm.complete(&CompletionRequest {
        system: Some(SUMMARIZER_SYSTEM),
        prompt: &prompt,
        max_tokens: None,
        temperature: CV_TEMPERATURE,
    })
    .await
}

pub async fn ask(llm: &dyn LanguageModel, cv_text: &str, query: &str) -> Result<String, LlmError> {
    let prompt = follow_up_prompt(cv_text, query);
    llm.complete(&CompletionRequest {
        system: Some(RESPONDER_SYSTEM),
        prompt: &prompt,
        max_tokens: None,
        temperature: CV_TEMPERATURE,
    })
    .await
}
