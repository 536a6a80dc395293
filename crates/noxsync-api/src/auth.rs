use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};

use crate::error::Error;

/// Credentials for one of the two remote systems.
///
/// Each variant carries the secret material needed for its auth flow.
#[derive(Debug, Clone)]
pub enum Credentials {
    /// NetBox API token, sent as `Authorization: Token <token>`.
    Token(SecretString),

    /// HTTP basic auth (Oxidized web frontend).
    Basic {
        username: String,
        password: SecretString,
    },
}

impl Credentials {
    /// Headers injected on every request by the underlying client.
    ///
    /// Token auth is static, so it lives in the client's default headers.
    /// Basic auth is applied per request by [`Credentials::authorize`].
    pub(crate) fn default_headers(&self) -> Result<HeaderMap, Error> {
        let mut headers = HeaderMap::new();
        if let Self::Token(token) = self {
            let mut value = HeaderValue::from_str(&format!("Token {}", token.expose_secret()))
                .map_err(|e| Error::Authentication {
                    message: format!("invalid API token header value: {e}"),
                })?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }
        Ok(headers)
    }

    /// Attach per-request credentials to a request builder.
    pub(crate) fn authorize(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self {
            Self::Token(_) => builder,
            Self::Basic { username, password } => {
                builder.basic_auth(username, Some(password.expose_secret()))
            }
        }
    }
}
