pub mod client;
pub mod error;

pub use client::{create_http_client, parse_rows, StoreClient};
pub use error::StoreError;
