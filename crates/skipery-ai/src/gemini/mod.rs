//! Google Gemini API client.
//!
//! Implements the `ModelGateway` trait for Gemini models via the
//! Generative Language API, including function calling.

mod api;
mod client;
mod config;

pub use client::GeminiClient;
pub use config::GeminiConfig;
