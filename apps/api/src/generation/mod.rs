// Prompt assembly for resume generation.
// Pure and deterministic: the same FormState always yields the same prompt.
// The network call itself lives in llm_client.

pub mod assembler;
pub mod prompts;
