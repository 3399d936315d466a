use crate::core::errors::Result;

/// A single-shot retrieval of raw key material from a resolved URL.
///
/// The orchestrator only needs this one capability, so tests can swap in
/// a stub without any network.
pub trait KeyFetcher {
    fn fetch(&self, url: &str) -> Result<String>;
}
