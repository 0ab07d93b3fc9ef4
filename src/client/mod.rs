mod adapter;
mod openai;
mod types;

pub use adapter::{CALL_NAME, ModelAdapter};
pub use openai::OpenAiClient;
pub use types::{GenerationMode, ModelCallError, ModelClient};
