//! # Research Agent
//!
//! A minimal HTTP research assistant backed by an LLM with web search.
//!
//! This library provides:
//! - An HTTP API for submitting research queries
//! - A tool-based agent loop that lets the model search the web mid-answer
//! - Strict parsing of the model's final output into a structured record
//!
//! ## Architecture
//!
//! The agent follows the "tools in a loop" pattern:
//! 1. Receive a query via the API
//! 2. Build context with system prompt and available tools
//! 3. Call LLM, parse response, execute any tool calls
//! 4. Feed results back to LLM, repeat until it produces a final answer
//! 5. Validate the final answer against the research schema
//!
//! ## Example
//!
//! ```rust,ignore
//! use research_agent::{agent::Agent, config::Config};
//!
//! let config = Config::from_env()?;
//! let agent = Agent::new(config);
//! let report = agent.run_query("rust async runtimes", None).await?;
//! ```

pub mod api;
pub mod agent;
pub mod config;
pub mod llm;
pub mod tools;

pub use config::Config;
