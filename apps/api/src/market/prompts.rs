// Market assistant LLM prompt templates.

/// Classification prompt. Replace `{query}` before sending.
pub const CLASSIFY_PROMPT_TEMPLATE: &str = r#"Classify the following user query into one of three categories:
1. "Stock Price" if the query is about retrieving the stock price of a company.
2. "Stock Chart" if the query is about retrieving daily, weekly, or monthly stock charts.
3. "General Query" if the query is a general knowledge question or unrelated to stock prices or charts.

If the query is about stock prices or charts, also extract the company name and chart interval if applicable.

Examples:
1. "What is the latest stock price of Apple?" -> Category: Stock Price, Company: Apple
2. "Provide me the daily chart of Tesla." -> Category: Stock Chart, Company: Tesla, Interval: Daily
3. "Show me the monthly chart for Google." -> Category: Stock Chart, Company: Google, Interval: Monthly
4. "Tell me about the history of the stock market." -> Category: General Query
5. "What is the capital of France?" -> Category: General Query

Query: "{query}"
"#;

pub const CLASSIFY_MAX_TOKENS: u32 = 150;
pub const GENERAL_MAX_TOKENS: u32 = 200;
pub const MARKET_TEMPERATURE: f32 = 0.7;

pub fn classify_prompt(query: &str) -> String {
    CLASSIFY_PROMPT_TEMPLATE.replace("{query}", query)
}
