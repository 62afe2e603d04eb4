//! Browsy Engine - Page model and browsing engine
//!
//! This crate provides the browser side of browsy:
//! - Engine: the stateful contract every browsing backend implements
//! - Page: element index, classification and suggested actions
//! - HtmlEngine: HTTP fetch with static HTML analysis

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod classify;
pub mod compact;
pub mod config;
pub mod engine;
pub mod error;
pub mod html_engine;
pub mod page;
pub mod parse;
pub mod search;

pub use config::EngineConfig;
pub use engine::Engine;
pub use error::{Error, Result};
pub use html_engine::HtmlEngine;
pub use page::{Element, ElementId, Page, PageType, PageView, SearchResult, SuggestedAction, Table};
