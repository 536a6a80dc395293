//! Async HTTP clients for the two systems `noxsync` reconciles between.
//!
//! - **[`NetboxClient`]**: the inventory API. Token auth, `next`-link
//!   pagination, and the handful of DCIM/IPAM/extras endpoints the
//!   reconciler reads from and writes to.
//! - **[`OxidizedClient`]**: the config archive. Basic auth, node listing,
//!   and raw-text configuration retrieval.
//!
//! Both clients are thin request/response wrappers: they never interpret the
//! data they move. Interpretation lives in `noxsync-core`.

pub mod auth;
pub mod error;
pub mod netbox;
pub mod oxidized;
pub mod transport;

pub use auth::Credentials;
pub use error::Error;
pub use netbox::NetboxClient;
pub use oxidized::OxidizedClient;
pub use transport::{TlsMode, TransportConfig};
