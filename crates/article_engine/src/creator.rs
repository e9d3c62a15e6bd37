use std::time::Duration;

use article_logging::article_info;
use thiserror::Error;

/// Errors that end a run. Handled per-article rejections are not errors;
/// they are reported as `Ok(false)` by [`ArticleCreator::create_article`].
#[derive(Debug, Error)]
pub enum CreateError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("unexpected http status {0}")]
    Status(u16),
    #[error("wiki api error {code}: {info}")]
    Api { code: String, info: String },
    #[error("login failed: {0}")]
    Login(String),
    #[error("malformed api response: {0}")]
    MalformedResponse(String),
    #[error("create_article timed out after {0:?}")]
    Timeout(Duration),
    /// Failure reported by a creator implemented outside this crate.
    #[error("{0}")]
    Other(String),
}

#[async_trait::async_trait]
pub trait ArticleCreator: Send + Sync {
    /// Creates one article. `Ok(true)` on success, `Ok(false)` when the wiki
    /// rejected this article but later ones may still succeed.
    async fn create_article(&self, title: &str, content: &str) -> Result<bool, CreateError>;
}

/// Creator that touches no network and reports every article as created.
#[derive(Debug, Default, Clone, Copy)]
pub struct DryRunCreator;

#[async_trait::async_trait]
impl ArticleCreator for DryRunCreator {
    async fn create_article(&self, title: &str, content: &str) -> Result<bool, CreateError> {
        article_info!(
            "dry run: would create title={:?} content_len={}",
            title,
            content.len()
        );
        Ok(true)
    }
}
