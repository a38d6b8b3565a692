// Resume / cover-letter generation.
// The orchestrator is the only caller of the gateway; the gateway is the only caller of llm_client.

pub mod gateway;
pub mod handlers;
pub mod merge;
pub mod orchestrator;
pub mod prompts;
pub mod request;
