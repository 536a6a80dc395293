// Oxidized HTTP client
//
// Basic-auth wrapper over the two oxidized-web endpoints the sync needs:
// the node list and raw-text config retrieval.

use secrecy::SecretString;
use tracing::debug;
use url::Url;

use super::models::Node;
use crate::auth::Credentials;
use crate::error::Error;
use crate::transport::TransportConfig;

/// Async client for the oxidized-web REST frontend.
pub struct OxidizedClient {
    http: reqwest::Client,
    base_url: Url,
    credentials: Credentials,
}

impl OxidizedClient {
    /// Build from basic-auth credentials and transport config.
    pub fn new(
        base_url: &str,
        username: &str,
        password: &SecretString,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        Self::with_client(transport.build_client()?, base_url, username, password)
    }

    /// Wrap an existing `reqwest::Client`.
    pub fn with_client(
        http: reqwest::Client,
        base_url: &str,
        username: &str,
        password: &SecretString,
    ) -> Result<Self, Error> {
        let mut base_url = Url::parse(base_url)?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(Self {
            http,
            base_url,
            credentials: Credentials::Basic {
                username: username.to_owned(),
                password: password.clone(),
            },
        })
    }

    async fn get(&self, path: &str) -> Result<reqwest::Response, Error> {
        let url = self.base_url.join(path)?;
        debug!("GET {url}");
        let resp = self
            .credentials
            .authorize(self.http.get(url))
            .send()
            .await?;

        if resp.status().is_success() {
            Ok(resp)
        } else {
            Err(Error::from_response(resp).await)
        }
    }

    /// All nodes known to Oxidized.
    pub async fn list_nodes(&self) -> Result<Vec<Node>, Error> {
        let body = self.get("nodes?format=json").await?.text().await?;
        serde_json::from_str(&body).map_err(|e| Error::deserialization(&e, body))
    }

    /// The latest backed-up configuration of a node, as raw text.
    ///
    /// `full_name` is the node's `group/name` (see [`Node::fetch_name`]).
    pub async fn fetch_config(&self, full_name: &str) -> Result<String, Error> {
        let path = format!("node/fetch/{full_name}?format=text");
        Ok(self.get(&path).await?.text().await?)
    }
}
