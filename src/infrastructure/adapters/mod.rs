//! Infrastructure Adapters - 外部服务适配器

pub mod provider;

pub use provider::{FakeProviderClient, FakeProviderConfig, HttpProviderClient, HttpProviderConfig};
