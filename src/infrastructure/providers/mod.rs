//! Remote API providers

pub mod openai;
pub mod perplexity;
