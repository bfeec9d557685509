//! Google sign-in from a terminal.
//!
//! There is no popup to host the consent screen, so the provider prints the
//! authorization URL and waits for the user to paste back either the URL
//! Google redirected to or just the `code` value from it.

use std::io::{BufRead, Write};
use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Url;
use snacksy_core::auth::{AuthorizationRequest, IdentityProvider, ProviderError};

/// Where the consent URL is shown and the reply is read from.
pub trait CodePrompt: Send + Sync {
    /// Shows the consent URL.
    fn show(&self, authorization_url: &str);

    /// Reads the user's reply. `None` means the input was closed.
    fn read_reply(&self) -> std::io::Result<Option<String>>;
}

/// [`CodePrompt`] on stdout/stdin.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdioPrompt;

impl CodePrompt for StdioPrompt {
    fn show(&self, authorization_url: &str) {
        println!("Open this URL in your browser and approve access:");
        println!();
        println!("  {}", authorization_url);
        println!();
        print!("Paste the redirected URL (or the code), empty to cancel: ");
        let _ = std::io::stdout().flush();
    }

    fn read_reply(&self) -> std::io::Result<Option<String>> {
        let mut line = String::new();
        let read = std::io::stdin().lock().read_line(&mut line)?;
        if read == 0 {
            return Ok(None);
        }
        Ok(Some(line))
    }
}

/// [`IdentityProvider`] that runs the consent flow through a [`CodePrompt`].
#[derive(Clone)]
pub struct ConsoleIdentityProvider {
    prompt: Arc<dyn CodePrompt>,
}

impl ConsoleIdentityProvider {
    pub fn new(prompt: Arc<dyn CodePrompt>) -> Self {
        Self { prompt }
    }

    pub fn stdio() -> Self {
        Self::new(Arc::new(StdioPrompt))
    }
}

#[async_trait]
impl IdentityProvider for ConsoleIdentityProvider {
    async fn request_code(&self, request: &AuthorizationRequest) -> Result<String, ProviderError> {
        let prompt = self.prompt.clone();
        let url = request.authorization_url();

        let reply = tokio::task::spawn_blocking(move || {
            prompt.show(&url);
            prompt.read_reply()
        })
        .await
        .map_err(|e| ProviderError::failed("prompt_failed", Some(e.to_string())))?
        .map_err(|e| ProviderError::failed("prompt_failed", Some(e.to_string())))?;

        match reply {
            Some(input) => parse_reply(&input, &request.state),
            None => Err(ProviderError::PopupClosed),
        }
    }

    fn logout(&self) {
        // Nothing is cached locally; the browser session at Google is the
        // user's own.
        tracing::debug!("[ConsoleIdentity] Provider session cleared");
    }
}

/// Interprets what the user pasted.
///
/// - blank or `cancel`: the consent window was closed
/// - a URL with `error=`: provider failure with its description
/// - a URL with `code=`: the code, after checking `state`
/// - anything else: taken as the bare code
pub fn parse_reply(input: &str, expected_state: &str) -> Result<String, ProviderError> {
    let input = input.trim();
    if input.is_empty() || input.eq_ignore_ascii_case("cancel") {
        return Err(ProviderError::PopupClosed);
    }

    let Ok(url) = Url::parse(input) else {
        return Ok(input.to_string());
    };

    let mut code = None;
    let mut state = None;
    let mut error = None;
    let mut description = None;
    for (key, value) in url.query_pairs() {
        match key.as_ref() {
            "code" => code = Some(value.into_owned()),
            "state" => state = Some(value.into_owned()),
            "error" => error = Some(value.into_owned()),
            "error_description" => description = Some(value.into_owned()),
            _ => {}
        }
    }

    if let Some(error) = error {
        return Err(ProviderError::Failed {
            error: Some(error),
            description,
        });
    }

    let code = code.filter(|c| !c.is_empty()).ok_or_else(|| {
        ProviderError::failed(
            "invalid_request",
            Some("The pasted URL does not contain an authorization code.".to_string()),
        )
    })?;

    if let Some(state) = state {
        if state != expected_state {
            return Err(ProviderError::failed(
                "state_mismatch",
                Some("The sign-in response does not belong to this request.".to_string()),
            ));
        }
    }

    Ok(code)
}
