//! CLI module for Browsy
//!
//! Provides commands:
//! - `run`: execute one text command
//! - `repl`: read text commands from stdin
//! - `tools`: print the tool definitions a framework sees
//! - `call`: dispatch one structured function call
//! - `load`: load a local HTML file and print the page

use crate::config::{load_config, AppConfig};
use anyhow::Result;
use browsy_engine::{Engine, HtmlEngine};
use browsy_tools::{Framework, SessionProvider, SessionRegistry};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::debug;

pub mod load;
pub mod run;
pub mod tools;

/// Browsy CLI
#[derive(Parser, Debug)]
#[command(name = "browsy")]
#[command(about = "Headless web browsing tools for LLM agents")]
#[command(version)]
pub struct Cli {
    /// Extra configuration file layered over the defaults
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run one text command, e.g. `browsy run browse https://example.com`
    Run {
        /// Command words
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        command: Vec<String>,
    },
    /// Read text commands from stdin until `exit`
    Repl,
    /// Print tool definitions as JSON
    Tools {
        /// openai, langchain, crewai, smolagents or autogen
        #[arg(long, short)]
        framework: Option<Framework>,
    },
    /// Dispatch one function call, e.g. `browsy call browsy_browse '{"url":"..."}'`
    Call {
        /// Function name
        name: String,
        /// JSON arguments
        arguments: Option<String>,
    },
    /// Load a local HTML file and print the formatted page
    Load {
        /// HTML file
        file: PathBuf,
        /// Base URL for resolving links
        #[arg(long)]
        url: Option<String>,
    },
}

/// Install the process-wide session registry from configuration
fn install_registry(config: &AppConfig) -> SessionProvider {
    let engine_config = config.engine.clone();
    let registry = SessionRegistry::new(move || {
        Ok(Box::new(HtmlEngine::with_config(engine_config.clone())?) as Box<dyn Engine>)
    });
    if SessionRegistry::install_global(registry).is_err() {
        debug!("Session registry already installed");
    }
    SessionProvider::shared()
}

/// Run the CLI command
pub async fn run(cli: Cli) -> Result<()> {
    let Some(command) = cli.command else {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        cmd.print_help()?;
        println!();
        return Ok(());
    };

    let config = load_config(cli.config.as_deref())?;
    let provider = install_registry(&config);

    match command {
        Commands::Run { command } => {
            println!("{}", run::run_line(&provider, &command.join(" ")).await?);
        }
        Commands::Repl => {
            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            run::repl(&provider, stdin, std::io::stdout()).await?;
        }
        Commands::Tools { framework } => {
            let framework = match framework {
                Some(framework) => framework,
                None => config.tools.default_framework.parse()?,
            };
            println!("{}", tools::definitions(framework, &provider)?);
        }
        Commands::Call { name, arguments } => {
            println!("{}", tools::call(&provider, &name, arguments.as_deref()).await?);
        }
        Commands::Load { file, url } => {
            println!("{}", load::run(&provider, &file, url.as_deref()).await?);
        }
    }
    Ok(())
}
