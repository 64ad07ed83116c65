use std::{
    cell::RefCell,
    time::{Duration, Instant},
};

use serde::Deserialize;
use tracing::debug;
use url::Url;

use super::{
    error::{ApiError, ApiResult},
    transport::{HttpRequest, Transport},
};

pub const TOKEN_URL: &str = "https://accounts.google.com/o/oauth2/token";
pub const AUTHORIZE_URL: &str = "https://accounts.google.com/o/oauth2/auth";
pub const SCOPE: &str = "https://gdata.youtube.com";
pub const OOB_REDIRECT: &str = "urn:ietf:wg:oauth:2.0:oob";

/// Tokens this close to expiry are refreshed before use.
const EXPIRY_MARGIN: Duration = Duration::from_secs(10);

pub trait AccessTokens {
    fn access_token(&self) -> ApiResult<String>;
}

#[derive(Debug, Clone)]
pub struct OAuthClient {
    pub client_id: String,
    pub client_secret: String,
}

#[derive(Debug, Deserialize)]
pub struct TokenGrant {
    pub access_token: String,
    pub expires_in: u64,
    #[serde(default)]
    pub refresh_token: Option<String>,
}

struct CachedToken {
    value: String,
    expires_at: Instant,
}

/// Access tokens from a long lived refresh token, cached until shortly
/// before they expire.
pub struct RefreshTokenProvider<T: Transport> {
    transport: T,
    client: OAuthClient,
    refresh_token: String,
    token_url: String,
    cached: RefCell<Option<CachedToken>>,
}

impl<T: Transport> RefreshTokenProvider<T> {
    pub fn new(transport: T, client: OAuthClient, refresh_token: &str) -> Self {
        RefreshTokenProvider {
            transport,
            client,
            refresh_token: refresh_token.to_string(),
            token_url: TOKEN_URL.to_string(),
            cached: RefCell::new(None),
        }
    }

    fn refresh(&self) -> ApiResult<CachedToken> {
        debug!("refreshing access token");

        let grant = request_grant(
            &self.transport,
            &self.token_url,
            &[
                ("client_id", self.client.client_id.as_str()),
                ("client_secret", self.client.client_secret.as_str()),
                ("grant_type", "refresh_token"),
                ("refresh_token", self.refresh_token.as_str()),
            ],
        )?;

        Ok(CachedToken {
            value: grant.access_token,
            expires_at: Instant::now() + Duration::from_secs(grant.expires_in),
        })
    }
}

impl<T: Transport> AccessTokens for RefreshTokenProvider<T> {
    fn access_token(&self) -> ApiResult<String> {
        let mut cached = self.cached.borrow_mut();

        let fresh = cached
            .as_ref()
            .map(|t| t.expires_at.saturating_duration_since(Instant::now()) >= EXPIRY_MARGIN)
            .unwrap_or(false);

        if !fresh {
            *cached = Some(self.refresh()?);
        }

        cached
            .as_ref()
            .map(|t| t.value.clone())
            .ok_or_else(|| ApiError::Auth("no access token".to_string()))
    }
}

/// URL the operator opens to grant the tool access to the channel.
pub fn authorize_url(client: &OAuthClient) -> ApiResult<Url> {
    Url::parse_with_params(
        AUTHORIZE_URL,
        &[
            ("client_id", client.client_id.as_str()),
            ("redirect_uri", OOB_REDIRECT),
            ("scope", SCOPE),
            ("response_type", "code"),
            ("access_type", "offline"),
        ],
    )
    .map_err(|e| ApiError::Auth(e.to_string()))
}

/// Trades the code shown after consent for tokens, including the refresh
/// token to keep in the configuration.
pub fn exchange_code<T: Transport>(
    transport: &T,
    client: &OAuthClient,
    code: &str,
) -> ApiResult<TokenGrant> {
    request_grant(
        transport,
        TOKEN_URL,
        &[
            ("client_id", client.client_id.as_str()),
            ("client_secret", client.client_secret.as_str()),
            ("grant_type", "authorization_code"),
            ("code", code.trim()),
            ("redirect_uri", OOB_REDIRECT),
        ],
    )
}

fn request_grant<T: Transport>(
    transport: &T,
    url: &str,
    params: &[(&str, &str)],
) -> ApiResult<TokenGrant> {
    let response = transport
        .execute(HttpRequest::form(url, params))?
        .error_for_status()
        .map_err(|e| ApiError::Auth(e.to_string()))?;

    serde_json::from_str(&response.body).map_err(|e| ApiError::Decode(e.to_string()))
}

#[cfg(test)]
pub struct StaticToken(pub String);

#[cfg(test)]
impl AccessTokens for StaticToken {
    fn access_token(&self) -> ApiResult<String> {
        Ok(self.0.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::{authorize_url, exchange_code, AccessTokens, OAuthClient, RefreshTokenProvider};
    use crate::youtube::{error::ApiError, transport::fake::ScriptedTransport};

    fn client() -> OAuthClient {
        OAuthClient {
            client_id: "id".to_string(),
            client_secret: "secret".to_string(),
        }
    }

    #[test]
    fn it_reuses_fresh_token() {
        let transport = ScriptedTransport::new()
            .respond(200, r#"{"access_token": "first", "expires_in": 3600}"#);
        let provider = RefreshTokenProvider::new(&transport, client(), "refresh");

        assert_eq!(provider.access_token().unwrap(), "first");
        assert_eq!(provider.access_token().unwrap(), "first");
        assert_eq!(transport.request_count(), 1);

        let body = transport.request(0).body.unwrap();
        assert!(body.contains("grant_type=refresh_token"));
        assert!(body.contains("refresh_token=refresh"));
    }

    #[test]
    fn it_refreshes_token_close_to_expiry() {
        let transport = ScriptedTransport::new()
            .respond(200, r#"{"access_token": "first", "expires_in": 5}"#)
            .respond(200, r#"{"access_token": "second", "expires_in": 3600}"#);
        let provider = RefreshTokenProvider::new(&transport, client(), "refresh");

        assert_eq!(provider.access_token().unwrap(), "first");
        assert_eq!(provider.access_token().unwrap(), "second");
        assert_eq!(transport.request_count(), 2);
    }

    #[test]
    fn it_reports_rejected_refresh_as_auth_error() {
        let transport = ScriptedTransport::new().respond(400, r#"{"error": "invalid_grant"}"#);
        let provider = RefreshTokenProvider::new(&transport, client(), "refresh");

        assert!(matches!(provider.access_token(), Err(ApiError::Auth(_))));
    }

    #[test]
    fn it_builds_consent_url() {
        let url = authorize_url(&client()).unwrap();
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();

        assert_eq!(url.host_str(), Some("accounts.google.com"));
        assert!(pairs.contains(&("client_id".to_string(), "id".to_string())));
        assert!(pairs.contains(&("scope".to_string(), "https://gdata.youtube.com".to_string())));
    }

    #[test]
    fn it_exchanges_code_for_refresh_token() {
        let transport = ScriptedTransport::new().respond(
            200,
            r#"{"access_token": "a", "expires_in": 3600, "refresh_token": "r"}"#,
        );

        let grant = exchange_code(&transport, &client(), " code \n").unwrap();

        assert_eq!(grant.refresh_token.as_deref(), Some("r"));
        assert!(transport
            .request(0)
            .body
            .unwrap()
            .contains("grant_type=authorization_code&code=code&"));
    }
}
