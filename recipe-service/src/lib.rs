//! Recipe relay service.
//!
//! Forwards user-supplied cooking prompts to the OpenAI chat-completions API
//! and returns the generated recipe text as JSON.

pub mod config;
pub mod dtos;
pub mod handlers;
pub mod services;
pub mod startup;
