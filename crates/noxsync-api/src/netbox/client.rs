// NetBox HTTP client
//
// Wraps `reqwest::Client` with token auth, base-URL joining, `next`-link
// pagination, and status/JSON error mapping. Endpoint methods are thin:
// one HTTP call (or one paginated walk) each.

use secrecy::SecretString;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, trace};
use url::Url;

use super::models::{
    Device, Interface, InterfacePatch, Page, Tag, Vlan, WritableInterface, WritableTag,
    WritableVlan,
};
use crate::auth::Credentials;
use crate::error::Error;
use crate::transport::TransportConfig;

/// Async client for the NetBox REST API.
///
/// Every list method walks the full `next` chain and returns the
/// concatenated `results`; callers never see pagination.
pub struct NetboxClient {
    http: reqwest::Client,
    base_url: Url,
    /// Device role slugs; each becomes a `role=` query parameter.
    roles: Vec<String>,
}

impl NetboxClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build from an API token and transport config.
    ///
    /// Injects `Authorization: Token …` as a default header on every request.
    pub fn new(
        base_url: &str,
        token: &SecretString,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let headers = Credentials::Token(token.clone()).default_headers()?;
        let http = transport.build_client_with_headers(headers)?;
        Ok(Self {
            http,
            base_url: normalize_base_url(base_url)?,
            roles: Vec::new(),
        })
    }

    /// Wrap an existing `reqwest::Client` (caller manages auth headers).
    pub fn with_client(http: reqwest::Client, base_url: &str) -> Result<Self, Error> {
        Ok(Self {
            http,
            base_url: normalize_base_url(base_url)?,
            roles: Vec::new(),
        })
    }

    /// Restrict [`list_devices`](Self::list_devices) to the given role slugs.
    pub fn with_roles(mut self, roles: Vec<String>) -> Self {
        self.roles = roles;
        self
    }

    /// The NetBox base URL (always ends with `/`).
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── Request helpers ──────────────────────────────────────────────

    fn url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(path)?)
    }

    async fn get_page<T: DeserializeOwned>(&self, url: Url) -> Result<Page<T>, Error> {
        debug!("GET {url}");
        let resp = self.http.get(url).send().await?;
        handle_response(resp).await
    }

    /// Follow `next` links from `path?params` until exhausted.
    async fn paginate<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<Vec<T>, Error> {
        let mut url = self.url(path)?;
        if !params.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(params.iter().map(|(k, v)| (*k, v.as_str())));
        }

        let mut all = Vec::new();
        loop {
            let page: Page<T> = self.get_page(url.clone()).await?;
            trace!(count = page.count, received = page.results.len(), "page");
            all.extend(page.results);

            match page.next {
                Some(next) if next != url.as_str() => url = Url::parse(&next)?,
                _ => break,
            }
        }

        Ok(all)
    }

    async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("POST {url}");
        let resp = self.http.post(url).json(body).send().await?;
        handle_response(resp).await
    }

    async fn patch<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("PATCH {url}");
        let resp = self.http.patch(url).json(body).send().await?;
        handle_response(resp).await
    }

    // ━━ Public API ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    // ── Devices ──────────────────────────────────────────────────────

    pub async fn list_devices(&self) -> Result<Vec<Device>, Error> {
        let params: Vec<(&str, String)> = self.roles.iter().map(|r| ("role", r.clone())).collect();
        self.paginate("api/dcim/devices/", &params).await
    }

    // ── Interfaces ───────────────────────────────────────────────────

    pub async fn list_interfaces(&self, device_id: u64) -> Result<Vec<Interface>, Error> {
        self.paginate(
            "api/dcim/interfaces/",
            &[("device_id", device_id.to_string())],
        )
        .await
    }

    pub async fn create_interface(&self, body: &WritableInterface) -> Result<Interface, Error> {
        self.post("api/dcim/interfaces/", body).await
    }

    pub async fn update_interface(
        &self,
        interface_id: u64,
        body: &InterfacePatch,
    ) -> Result<Interface, Error> {
        self.patch(&format!("api/dcim/interfaces/{interface_id}/"), body)
            .await
    }

    // ── VLANs ────────────────────────────────────────────────────────

    pub async fn list_vlans(&self, site_id: u64) -> Result<Vec<Vlan>, Error> {
        self.paginate("api/ipam/vlans/", &[("site_id", site_id.to_string())])
            .await
    }

    pub async fn create_vlan(&self, body: &WritableVlan) -> Result<Vlan, Error> {
        self.post("api/ipam/vlans/", body).await
    }

    // ── Tags ─────────────────────────────────────────────────────────

    /// Look a tag up by exact name.
    pub async fn find_tag(&self, name: &str) -> Result<Option<Tag>, Error> {
        let existing: Vec<Tag> = self
            .paginate("api/extras/tags/", &[("name", name.to_owned())])
            .await?;
        Ok(existing.into_iter().find(|t| t.name == name))
    }

    /// Look a tag up by exact name, creating it when absent.
    pub async fn get_or_create_tag(&self, name: &str) -> Result<Tag, Error> {
        if let Some(tag) = self.find_tag(name).await? {
            return Ok(tag);
        }

        debug!(tag = name, "tag missing, creating");
        self.post("api/extras/tags/", &WritableTag::named(name))
            .await
    }
}

/// Ensure the base URL ends with `/` so relative `api/...` paths join under it.
fn normalize_base_url(raw: &str) -> Result<Url, Error> {
    let mut url = Url::parse(raw)?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

async fn handle_response<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
    if !resp.status().is_success() {
        return Err(Error::from_response(resp).await);
    }
    let body = resp.text().await?;
    serde_json::from_str(&body).map_err(|e| Error::deserialization(&e, body))
}
