pub mod provider;
pub mod openai;
pub mod prompts;
pub mod parser;
pub mod retry;

pub use provider::CompletionProvider;
pub use openai::OpenAiProvider;
pub use prompts::{CompletionRequest, format_transcript, load_prompt_template};
pub use parser::{parse_classified_response, validate_json_structure, ValidationError};
pub use retry::{Backoff, RetryPolicy};
