// Oxidized config archive API

pub mod client;
pub mod models;

pub use client::OxidizedClient;
