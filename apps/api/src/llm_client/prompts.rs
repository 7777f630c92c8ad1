// Shared prompt fragments.
// Each pipeline that needs LLM calls defines its own prompts.rs alongside it.

/// Opening line shared by every assistant-style prompt.
pub const ASSISTANT_PREAMBLE: &str = "You are an AI assistant.";
