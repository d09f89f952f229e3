//! HTTP infrastructure - backend REST client

mod client;
mod url;

pub use client::{HttpClient, HttpClientExt, HttpClientTrait};
pub use url::resolve_image_url;

#[cfg(test)]
pub use client::MockHttpClientTrait;
