//! Text commands: `run` and `repl`

use anyhow::{Context, Result};
use browsy_tools::{run_command, SessionProvider};
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{info, warn};

/// Run one line through the text grammar
pub async fn run_line(provider: &SessionProvider, line: &str) -> Result<String> {
    Ok(run_command(provider, line).await?)
}

/// Read commands line by line against one session
///
/// Engine errors are reported and the loop continues. Returns the number of
/// commands run.
pub async fn repl<R, W>(provider: &SessionProvider, reader: R, mut out: W) -> Result<usize>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    info!("Interactive session started; type 'exit' to quit");
    let mut lines = reader.lines();
    let mut count = 0;

    loop {
        eprint!("browsy> ");
        let Some(line) = lines.next_line().await.context("Failed to read stdin")? else {
            break;
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line.eq_ignore_ascii_case("exit") || line.eq_ignore_ascii_case("quit") {
            break;
        }

        count += 1;
        match run_command(provider, line).await {
            Ok(reply) => writeln!(out, "{reply}")?,
            Err(e) => {
                warn!(error = %e, "Command failed");
                writeln!(out, "Error: {e}")?;
            }
        }
    }

    Ok(count)
}
