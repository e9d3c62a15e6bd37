use std::time::Duration;

use article_logging::{article_debug, article_info, article_warn};
use serde_json::Value;
use tokio::sync::Mutex;
use url::Url;

use crate::{ArticleCreator, CreateError};

/// API error codes that reject a single article without making the next one
/// pointless.
const REJECTION_CODES: &[&str] = &[
    "articleexists",
    "invalidtitle",
    "protectedtitle",
    "titleblacklist-forbidden",
    "spamblacklist",
    "abusefilter-disallowed",
    "abusefilter-warning",
    "editconflict",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct CreatorSettings {
    pub api_url: Url,
    pub credentials: Option<Credentials>,
    pub summary: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl CreatorSettings {
    pub fn new(api_url: Url) -> Self {
        Self {
            api_url,
            credentials: None,
            summary: "Created by article batch creator".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
        }
    }

    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.credentials = Some(Credentials {
            username: username.into(),
            password: password.into(),
        });
        self
    }
}

/// Maps a wiki address to its Action API endpoint, e.g.
/// `https://example.fandom.com` to `https://example.fandom.com/api.php`.
pub fn api_endpoint(wiki_url: &str) -> Result<Url, url::ParseError> {
    let mut url = Url::parse(wiki_url.trim())?;
    if url.path().ends_with("/api.php") {
        return Ok(url);
    }
    let path = format!("{}/api.php", url.path().trim_end_matches('/'));
    url.set_path(&path);
    url.set_query(None);
    url.set_fragment(None);
    Ok(url)
}

/// Creates pages through the MediaWiki Action API.
///
/// Logs in lazily on the first article and caches the edit token for the
/// rest of the run.
pub struct MediaWikiCreator {
    client: reqwest::Client,
    settings: CreatorSettings,
    edit_token: Mutex<Option<String>>,
}

impl MediaWikiCreator {
    pub fn new(settings: CreatorSettings) -> Result<Self, CreateError> {
        let client = reqwest::Client::builder()
            .cookie_store(true)
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .user_agent(concat!("article-creator/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            settings,
            edit_token: Mutex::new(None),
        })
    }

    async fn edit_token(&self) -> Result<String, CreateError> {
        let mut cached = self.edit_token.lock().await;
        if let Some(token) = cached.as_ref() {
            return Ok(token.clone());
        }
        if let Some(credentials) = &self.settings.credentials {
            self.login(credentials).await?;
        }
        let token = self.fetch_token("csrf").await?;
        *cached = Some(token.clone());
        Ok(token)
    }

    async fn forget_edit_token(&self) {
        *self.edit_token.lock().await = None;
    }

    async fn login(&self, credentials: &Credentials) -> Result<(), CreateError> {
        let login_token = self.fetch_token("login").await?;
        let body = self
            .post_json(&[
                ("action", "login"),
                ("lgname", credentials.username.as_str()),
                ("lgpassword", credentials.password.as_str()),
                ("lgtoken", login_token.as_str()),
                ("format", "json"),
            ])
            .await?;

        match body.pointer("/login/result").and_then(Value::as_str) {
            Some("Success") => {
                article_info!("logged in as {}", credentials.username);
                Ok(())
            }
            Some(result) => {
                let reason = body
                    .pointer("/login/reason")
                    .and_then(Value::as_str)
                    .unwrap_or(result);
                Err(CreateError::Login(reason.to_string()))
            }
            None => Err(api_error(&body)
                .unwrap_or_else(|| CreateError::MalformedResponse("missing login result".into()))),
        }
    }

    async fn fetch_token(&self, kind: &str) -> Result<String, CreateError> {
        let body = self
            .get_json(&[
                ("action", "query"),
                ("meta", "tokens"),
                ("type", kind),
                ("format", "json"),
            ])
            .await?;
        let field = format!("/query/tokens/{kind}token");
        body.pointer(&field)
            .and_then(Value::as_str)
            .map(str::to_owned)
            .ok_or_else(|| CreateError::MalformedResponse(format!("missing {kind} token")))
    }

    async fn submit_edit(
        &self,
        title: &str,
        content: &str,
        token: &str,
    ) -> Result<Value, CreateError> {
        self.post_json(&[
            ("action", "edit"),
            ("title", title),
            ("text", content),
            ("summary", self.settings.summary.as_str()),
            ("createonly", "1"),
            ("token", token),
            ("format", "json"),
        ])
        .await
    }

    async fn get_json(&self, params: &[(&str, &str)]) -> Result<Value, CreateError> {
        let response = self
            .client
            .get(self.settings.api_url.clone())
            .query(params)
            .send()
            .await?;
        read_json(response).await
    }

    async fn post_json(&self, params: &[(&str, &str)]) -> Result<Value, CreateError> {
        let response = self
            .client
            .post(self.settings.api_url.clone())
            .form(params)
            .send()
            .await?;
        read_json(response).await
    }
}

#[async_trait::async_trait]
impl ArticleCreator for MediaWikiCreator {
    async fn create_article(&self, title: &str, content: &str) -> Result<bool, CreateError> {
        let token = self.edit_token().await?;
        let mut body = self.submit_edit(title, content, &token).await?;

        // Sessions can expire mid-run; refresh the token once.
        if error_code(&body) == Some("badtoken") {
            article_debug!("edit token expired, fetching a new one");
            self.forget_edit_token().await;
            let token = self.edit_token().await?;
            body = self.submit_edit(title, content, &token).await?;
        }

        classify_edit(&body)
    }
}

async fn read_json(response: reqwest::Response) -> Result<Value, CreateError> {
    let status = response.status();
    if !status.is_success() {
        return Err(CreateError::Status(status.as_u16()));
    }
    let text = response.text().await?;
    serde_json::from_str(&text).map_err(|err| CreateError::MalformedResponse(err.to_string()))
}

fn error_code(body: &Value) -> Option<&str> {
    body.pointer("/error/code").and_then(Value::as_str)
}

fn api_error(body: &Value) -> Option<CreateError> {
    let code = error_code(body)?;
    let info = body
        .pointer("/error/info")
        .and_then(Value::as_str)
        .unwrap_or_default();
    Some(CreateError::Api {
        code: code.to_string(),
        info: info.to_string(),
    })
}

fn classify_edit(body: &Value) -> Result<bool, CreateError> {
    if let Some(code) = error_code(body) {
        if REJECTION_CODES.contains(&code) {
            article_warn!("wiki rejected article: {}", code);
            return Ok(false);
        }
        return Err(api_error(body).unwrap_or_else(|| CreateError::MalformedResponse(code.into())));
    }

    match body.pointer("/edit/result").and_then(Value::as_str) {
        Some("Success") => Ok(true),
        Some(result) => {
            article_warn!("edit finished with result {}", result);
            Ok(false)
        }
        None => Err(CreateError::MalformedResponse("missing edit result".into())),
    }
}
