//! Provider Adapters - ContentProviderPort 的具体实现

mod fake_provider_client;
mod http_provider_client;

pub use fake_provider_client::{FakeProviderClient, FakeProviderConfig};
pub use http_provider_client::{HttpProviderClient, HttpProviderConfig};
