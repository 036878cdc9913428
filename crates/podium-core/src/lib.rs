pub mod analysis;
pub mod archive;
pub mod cluster;
pub mod error;
pub mod http;
pub mod market;
pub mod score;
pub mod stats;
pub mod transcript;
pub mod types;
pub mod validate;

pub use error::*;
pub use score::Scorer;
pub use types::*;

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_is_set() {
        assert!(!version().is_empty());
    }
}
