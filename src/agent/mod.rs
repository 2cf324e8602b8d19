//! Agent module - the core research agent logic.
//!
//! The agent follows a "tools in a loop" pattern:
//! 1. Build context with system prompt and user query
//! 2. Call LLM with available tools
//! 3. If LLM requests tool call, execute it and feed result back
//! 4. Repeat until LLM produces a final answer or max iterations reached
//! 5. Parse the final answer into the research schema

mod agent_loop;
mod parser;
mod prompt;

pub use agent_loop::Agent;
pub use parser::{parse_research_response, ParseError};
pub use prompt::build_system_prompt;
