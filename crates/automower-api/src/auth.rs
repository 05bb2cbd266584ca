// AMC authentication
//
// Token login against the IAM service. The token and its provider are
// attached to every subsequent AMC request as
// `Authorization: Bearer <token>` plus `Authorization-Provider`.

use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use tracing::debug;
use url::Url;

use crate::client::AmcClient;
use crate::error::Error;
use crate::models::TokenResponse;

pub const DEFAULT_AUTH_URL: &str = "https://iam-api.dss.husqvarnagroup.net/api/v3";
pub const DEFAULT_API_URL: &str = "https://amc-api.dss.husqvarnagroup.net/v1";

/// Base URLs of the two vendor services.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    /// IAM service (token login/logout).
    pub auth_url: Url,
    /// AMC service (mowers, status, control).
    pub api_url: Url,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            auth_url: Url::parse(DEFAULT_AUTH_URL).expect("valid default auth URL"),
            api_url: Url::parse(DEFAULT_API_URL).expect("valid default API URL"),
        }
    }
}

impl Endpoints {
    /// Point both services at the same base URL (mock servers, proxies).
    pub fn single(base: &Url) -> Self {
        Self {
            auth_url: base.clone(),
            api_url: base.clone(),
        }
    }
}

/// An authenticated session: the bearer token and its provider.
///
/// Immutable once issued. Per-robot clients receive their own copy.
#[derive(Debug, Clone)]
pub struct Session {
    token: SecretString,
    provider: String,
}

impl Session {
    pub fn new(token: SecretString, provider: impl Into<String>) -> Self {
        Self {
            token,
            provider: provider.into(),
        }
    }

    /// Attach the session headers to a request.
    pub(crate) fn authorize(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        builder
            .bearer_auth(self.token.expose_secret())
            .header("Authorization-Provider", &self.provider)
    }

    pub(crate) fn token(&self) -> &str {
        self.token.expose_secret()
    }
}

/// Join a relative path onto a base URL, keeping the base's own path.
pub(crate) fn join(base: &Url, path: &str) -> Result<Url, Error> {
    let base = base.as_str().trim_end_matches('/');
    Url::parse(&format!("{base}/{path}")).map_err(Error::InvalidUrl)
}

impl AmcClient {
    /// Authenticate with username/password.
    ///
    /// `POST {auth_url}/token`. On success the session is stored on the
    /// client and used for every later call, including the per-robot
    /// clients handed out by [`select_robot`](Self::select_robot).
    pub async fn login(&mut self, username: &str, password: &SecretString) -> Result<(), Error> {
        let url = join(&self.endpoints().auth_url, "token")?;
        debug!("logging in at {}", url);

        let body = json!({
            "data": {
                "type": "token",
                "attributes": {
                    "username": username,
                    "password": password.expose_secret(),
                },
            },
        });

        let resp = self
            .http()
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.transport().send_error(e))?;

        // Credential rejections only. Anything else goes through the
        // shared status check.
        let status = resp.status();
        if matches!(
            status,
            StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN
        ) {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Authentication {
                message: format!("login failed (HTTP {status}): {}", preview(&body)),
            });
        }

        let token: TokenResponse = crate::client::decode(resp).await?;
        self.set_session(Session::new(
            SecretString::from(token.data.id),
            token.data.attributes.provider,
        ));

        debug!("login successful");
        Ok(())
    }

    /// Revoke the current token.
    ///
    /// `DELETE {auth_url}/token/{token}`. The session is dropped locally
    /// even if the server call fails.
    pub async fn logout(&mut self) -> Result<(), Error> {
        let Some(session) = self.take_session() else {
            return Ok(());
        };

        let url = join(
            &self.endpoints().auth_url,
            &format!("token/{}", session.token()),
        )?;
        debug!("logging out");

        let resp = session
            .authorize(self.http().delete(url))
            .send()
            .await
            .map_err(|e| self.transport().send_error(e))?;

        if !resp.status().is_success() {
            return Err(Error::Api {
                status: resp.status().as_u16(),
                message: "logout rejected".into(),
            });
        }

        debug!("logout complete");
        Ok(())
    }
}

pub(crate) fn preview(body: &str) -> &str {
    let end = body
        .char_indices()
        .nth(200)
        .map_or(body.len(), |(idx, _)| idx);
    &body[..end]
}
