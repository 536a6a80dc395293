// NetBox REST response and request types
//
// Read models mirror NetBox's nested serializers. Fields use
// `#[serde(default)]` where NetBox omits or nulls them across versions
// (e.g. `role` vs. the pre-4.0 `device_role`). Write models serialize only
// populated fields so a PATCH never clears what it does not mention.

use serde::{Deserialize, Serialize};

// ── Pagination envelope ──────────────────────────────────────────────

/// Standard NetBox list envelope.
///
/// ```json
/// { "count": 42, "next": "https://…?offset=50", "previous": null, "results": [...] }
/// ```
#[derive(Debug, Deserialize)]
pub struct Page<T> {
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub previous: Option<String>,
    pub results: Vec<T>,
}

// ── Nested references ────────────────────────────────────────────────

/// Brief representation of a related object (site, tenant, role, device).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NestedRef {
    pub id: u64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub slug: Option<String>,
}

/// Brief interface reference, as used by `parent`, `lag` and `bridge`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NestedInterface {
    pub id: u64,
    pub name: String,
}

/// Brief VLAN reference, as used by `untagged_vlan`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NestedVlan {
    pub id: u64,
    pub vid: u16,
    #[serde(default)]
    pub name: String,
}

/// A `{ value, label }` choice field (`type`, `mode`, `status`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    pub value: String,
    #[serde(default)]
    pub label: Option<String>,
}

// ── DCIM ─────────────────────────────────────────────────────────────

/// Device from `GET /api/dcim/devices/`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Device {
    pub id: u64,
    #[serde(default)]
    pub name: Option<String>,
    pub site: NestedRef,
    #[serde(default)]
    pub tenant: Option<NestedRef>,
    #[serde(default, alias = "device_role")]
    pub role: Option<NestedRef>,
    #[serde(default)]
    pub platform: Option<NestedRef>,
}

/// Interface from `GET /api/dcim/interfaces/`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Interface {
    pub id: u64,
    pub device: NestedRef,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: Choice,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub parent: Option<NestedInterface>,
    #[serde(default)]
    pub lag: Option<NestedInterface>,
    #[serde(default)]
    pub bridge: Option<NestedInterface>,
    #[serde(default)]
    pub mode: Option<Choice>,
    #[serde(default)]
    pub untagged_vlan: Option<NestedVlan>,
    #[serde(default)]
    pub tags: Vec<Tag>,
}

fn default_enabled() -> bool {
    true
}

/// Request body for `POST /api/dcim/interfaces/`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WritableInterface {
    pub device: u64,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lag: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bridge: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub untagged_vlan: Option<u64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<u64>,
}

/// Request body for `PATCH /api/dcim/interfaces/{id}/`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InterfacePatch {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lag: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bridge: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub untagged_vlan: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<u64>>,
}

// ── IPAM ─────────────────────────────────────────────────────────────

/// VLAN from `GET /api/ipam/vlans/`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vlan {
    pub id: u64,
    pub vid: u16,
    pub name: String,
    #[serde(default)]
    pub site: Option<NestedRef>,
    #[serde(default)]
    pub tenant: Option<NestedRef>,
    #[serde(default)]
    pub status: Option<Choice>,
}

/// Request body for `POST /api/ipam/vlans/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WritableVlan {
    pub site: u64,
    pub vid: u16,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tenant: Option<u64>,
    pub status: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<u64>,
}

// ── Extras ───────────────────────────────────────────────────────────

/// Tag from `GET /api/extras/tags/` (also the nested shape on interfaces).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub slug: String,
}

/// Request body for `POST /api/extras/tags/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WritableTag {
    pub name: String,
    pub slug: String,
}

impl WritableTag {
    /// Build a tag body, deriving the slug from the name.
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            slug: slugify(name),
        }
    }
}

/// Lowercase, with every run of non-alphanumerics collapsed to one `-`.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for c in name.chars() {
        if c.is_ascii_alphanumeric() || c == '_' {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.ends_with('-') {
            slug.push('-');
        }
    }
    slug.trim_matches('-').to_owned()
}
