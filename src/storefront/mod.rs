//! Client for the unofficial PlayStation Store catalog and cart API.

mod client;
mod error;
mod psprices;
mod region;
mod request;
mod response;
mod transport;

pub use client::StorefrontClient;
pub use error::StorefrontError;
pub use region::{region_table, Region};
pub use request::ProductRequest;
