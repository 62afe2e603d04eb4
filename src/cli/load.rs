//! `load`: offline page inspection

use anyhow::{Context, Result};
use browsy_tools::{format_page, SessionProvider};
use std::path::Path;
use tracing::info;

/// Base URL used when none is given
pub const DEFAULT_BASE_URL: &str = "about:blank";

/// Load an HTML file into the session and format the page
pub async fn run(provider: &SessionProvider, file: &Path, url: Option<&str>) -> Result<String> {
    let html = tokio::fs::read_to_string(file)
        .await
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let base_url = url.unwrap_or(DEFAULT_BASE_URL);
    info!(file = %file.display(), base_url = %base_url, "Loading local document");

    let session = provider.resolve()?;
    let page = session.lock().await.load(&html, base_url)?;
    Ok(format_page(&page))
}

#[cfg(test)]
mod tests {
    use super::*;
    use browsy_tools::SessionRegistry;
    use std::io::Write;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_load_file_and_print_page() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            "<html><head><title>Local</title></head><body><a href=\"/next\">Next</a></body></html>"
        )
        .unwrap();

        let provider = SessionProvider::from_registry(Arc::new(SessionRegistry::html()));
        let out = run(&provider, file.path(), Some("https://example.com/"))
            .await
            .unwrap();

        assert!(out.starts_with("title: Local\nurl: https://example.com/\npage_type: Other\n---\n"));
        assert!(out.contains("->https://example.com/next"));
    }

    #[tokio::test]
    async fn test_missing_file_is_an_error() {
        let provider = SessionProvider::from_registry(Arc::new(SessionRegistry::html()));
        let err = run(&provider, Path::new("/nonexistent/page.html"), None)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Failed to read"));
    }
}
