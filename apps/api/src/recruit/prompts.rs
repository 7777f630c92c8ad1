// Recruiting assistant LLM prompt templates.

use crate::llm_client::prompts::ASSISTANT_PREAMBLE;

pub const SUMMARIZER_SYSTEM: &str = "You are a helpful assistant that summarizes CV content.";

pub const RESPONDER_SYSTEM: &str =
    "You are a helpful assistant that answers queries based on CV content.";

pub const CV_TEMPERATURE: f32 = 0.2;

/// Summary prompt. Replace `{context}` before sending.
const SUMMARY_PROMPT_TEMPLATE: &str = "Below is the content of a CV:
{context}
Summarize this CV in a few lines capturing the following:
- Highest education
- Number of years of experience
- Current working company
- Key technical skills
";

/// Follow-up prompt. Replace `{context}` and `{query}` before sending.
const FOLLOW_UP_PROMPT_TEMPLATE: &str = "Below is the content of a CV:
{context}
Based on this CV content, answer the following query:
\"{query}\"
";

pub fn summary_prompt(cv_text: &str) -> String {
    format!(
        "{ASSISTANT_PREAMBLE} {}",
        SUMMARY_PROMPT_TEMPLATE.replace("{context}", cv_text)
    )
}

pub fn follow_up_prompt(cv_text: &str, query: &str) -> String {
    // Query first, so CV text containing "{query}" is left untouched.
    let body = FOLLOW_UP_PROMPT_TEMPLATE
        .replace("{query}", query)
        .replacen("{context}", cv_text, 1);
    format!("{ASSISTANT_PREAMBLE} {body}")
}

/// Subject offered when an email address is found in a CV.
pub const SHORTLIST_SUBJECT: &str = "Your CV is shortlisted for [Position Name]";

pub const SHORTLIST_BODY: &str = "Hi,\n\nGreetings from ABC.\n\n\
We would like to inform you that your CV is shortlisted for [Position Name].\n\
We would like to schedule a first round of interview with you. Please suggest a suitable date and time.\n\n\
Regards,\n[Your Name/Company Name]";
