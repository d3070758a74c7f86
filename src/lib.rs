//! # ARK
//!
//! A local assistant that answers questions about this machine and the
//! projects on it.
//!
//! This library provides:
//! - A hand-rolled ReAct agent loop over system-introspection tools
//! - A RAG pipeline (Ollama embeddings + Chroma) for stored knowledge
//! - Acquisition and ingestion commands that populate the knowledge base
//!
//! ## Architecture
//!
//! The agent follows the classic Thought/Action/Observation pattern:
//! 1. Build a prompt from tool descriptions, history, and the question
//! 2. Call the completion service, parse the semi-structured reply
//! 3. Either finish with a final answer, or dispatch a tool
//! 4. Append the observation to history and repeat, up to an iteration cap
//!
//! ## Example
//!
//! ```rust,ignore
//! use ark_agent::{config::Config, context::AppContext, agent::Agent};
//!
//! let config = Config::from_env()?;
//! let ctx = AppContext::new(config);
//! let agent = Agent::new(&ctx);
//! let outcome = agent.answer("how full is my disk?").await?;
//! ```

pub mod acquire;
pub mod agent;
pub mod cli;
pub mod config;
pub mod context;
pub mod ingest;
pub mod llm;
pub mod paths;
pub mod rag;
pub mod repl;
pub mod store;
pub mod tools;

pub use config::Config;
pub use context::AppContext;
