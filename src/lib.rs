pub mod browser;
pub mod catalog;
pub mod config;
pub mod credentials;
pub mod fetch;
pub mod output;
pub mod scoring;
pub mod stderr_buffer;
pub mod store;
pub mod tui;

/// Install the ring crypto provider for rustls. Must run before the first
/// reqwest client is built; repeated calls are no-ops.
pub fn install_crypto_provider() {
    let _ = rustls::crypto::ring::default_provider().install_default();
}
