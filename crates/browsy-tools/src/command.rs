//! Text-command grammar
//!
//! One free-text line becomes one [`Operation`]:
//!
//! ```text
//! browse <url>          click <id>          type <id> <text>
//! search <query...>     login <user> <pass> info      back
//! ```
//!
//! A line splits into at most three tokens; the third keeps its inner
//! whitespace, so `type 7 hello world` types `hello world`. Verbs are
//! case-insensitive. A known verb with too few tokens is reported as an
//! unknown command, the same as an unsupported verb.

use crate::error::Result;
use crate::operation::Operation;
use crate::session::SessionProvider;
use browsy_engine::ElementId;
use thiserror::Error;
use tracing::warn;

/// Verbs accepted by the grammar, in help order
pub const VERBS: [&str; 7] = ["browse", "click", "type", "search", "login", "info", "back"];

/// Command help shared by the free-text tools
pub const COMMAND_HELP: &str = "Commands:\n\
    \x20 browse <url> -- Navigate to a URL\n\
    \x20 click <id> -- Click an element\n\
    \x20 type <id> <text> -- Type text into an input\n\
    \x20 search <query> -- Search the web\n\
    \x20 login <username> <password> -- Log in using detected form\n\
    \x20 info -- Get page type and suggested actions\n\
    \x20 back -- Go back to previous page\n";

/// A line the grammar rejects; its message is the reply
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    /// Blank input
    #[error("Error: empty command. Use 'browse <url>', 'click <id>', etc.")]
    Empty,

    /// Element id token is not a non-negative integer
    #[error("Error: invalid element ID '{0}'")]
    InvalidElementId(String),

    /// Unsupported verb, or a verb missing its arguments
    #[error("Unknown command '{0}'. Available: browse, click, type, search, login, info, back")]
    Unknown(String),
}

/// Split a line into at most three tokens
#[must_use]
pub fn tokenize(line: &str) -> Vec<&str> {
    let mut tokens = Vec::with_capacity(3);
    let mut rest = line.trim();

    while !rest.is_empty() && tokens.len() < 2 {
        match rest.find(char::is_whitespace) {
            Some(end) => {
                tokens.push(&rest[..end]);
                rest = rest[end..].trim_start();
            }
            None => {
                tokens.push(rest);
                rest = "";
            }
        }
    }
    if !rest.is_empty() {
        tokens.push(rest);
    }
    tokens
}

/// Parse a line into an operation
pub fn parse_command(line: &str) -> std::result::Result<Operation, CommandError> {
    let tokens = tokenize(line);
    let Some(first) = tokens.first() else {
        return Err(CommandError::Empty);
    };
    let verb = first.to_lowercase();

    let operation = match (verb.as_str(), tokens.as_slice()) {
        ("browse", [_, url, ..]) => Operation::Navigate {
            url: (*url).to_string(),
        },
        ("click", [_, id, ..]) => Operation::Click {
            element_id: parse_element_id(id)?,
        },
        ("type", [_, id, text]) => Operation::TypeText {
            element_id: parse_element_id(id)?,
            text: (*text).to_string(),
        },
        ("search", [_, query @ ..]) if !query.is_empty() => Operation::Search {
            query: query.join(" "),
        },
        ("login", [_, username, password]) => Operation::Login {
            username: (*username).to_string(),
            password: (*password).to_string(),
        },
        ("info", _) => Operation::PageInfo,
        ("back", _) => Operation::Back,
        _ => return Err(CommandError::Unknown(verb)),
    };
    Ok(operation)
}

fn parse_element_id(token: &str) -> std::result::Result<ElementId, CommandError> {
    token
        .parse()
        .map_err(|_| CommandError::InvalidElementId(token.to_string()))
}

/// Parse and run one line
///
/// Grammar errors are returned as `Ok` replies and never reach the engine;
/// engine errors propagate.
pub async fn run_command(provider: &SessionProvider, line: &str) -> Result<String> {
    match parse_command(line) {
        Ok(operation) => {
            let session = provider.resolve()?;
            operation.execute(&session).await
        }
        Err(e) => {
            warn!(error = %e, "Rejected command");
            Ok(e.to_string())
        }
    }
}
