// NetBox inventory API
//
// `client` carries transport mechanics and the endpoint methods; `models`
// holds the wire types for both reads (nested, read-only shapes) and writes
// (flat, id-based bodies).

pub mod client;
pub mod models;

pub use client::NetboxClient;
