//! Browsy Tools - Agent-framework bindings for browsy
//!
//! This crate connects one browsing session to LLM tool-calling conventions:
//! - Session: shared default session with construct-once semantics
//! - Operations: the six boundary operations plus `back`
//! - Command: free-text command grammar
//! - Bindings: openai, langchain, crewai, smolagents and autogen surfaces

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod bindings;
pub mod command;
pub mod error;
pub mod format;
pub mod input;
pub mod operation;
pub mod registry;
pub mod session;

pub use bindings::Framework;
pub use command::{parse_command, run_command, tokenize, CommandError};
pub use error::{Error, Result};
pub use format::{format_page, format_page_info, format_search_results};
pub use operation::{call_tool, Operation, ToolName};
pub use registry::{Tool, ToolDefinition, ToolRegistry};
pub use session::{Session, SessionProvider, SessionRegistry};
