//! # Pool Configuration
//!
//! Block geometry for chunk pools and node pools, loadable from TOML.
//!
//! ```toml
//! chunk_size = 48
//! chunks_per_block = 256
//! ```

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Geometry of a chunk [`Pool`](crate::Pool): chunk size and block length.
///
/// Both fields are strictly positive once validated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PoolConfig {
    /// Requested chunk size in bytes (rounded up to a pointer width by the pool).
    pub chunk_size: usize,
    /// Number of chunks carved out of every reserved block.
    pub chunks_per_block: usize,
}

impl PoolConfig {
    /// Creates a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if either argument is zero.
    pub fn new(chunk_size: usize, chunks_per_block: usize) -> Result<Self, ConfigError> {
        let config = Self {
            chunk_size,
            chunks_per_block,
        };
        config.validate()?;
        Ok(config)
    }

    /// Configuration whose chunks hold exactly one `T`.
    ///
    /// # Errors
    ///
    /// Returns an error if `chunks_per_block` is zero or `T` is zero-sized.
    pub fn for_type<T>(chunks_per_block: usize) -> Result<Self, ConfigError> {
        Self::new(std::mem::size_of::<T>(), chunks_per_block)
    }

    /// Parses and validates a configuration from TOML source.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed TOML and the zero-field
    /// errors for invalid values.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that both fields are strictly positive.
    ///
    /// # Errors
    ///
    /// Returns the error naming the first zero field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.chunk_size == 0 {
            return Err(ConfigError::ZeroChunkSize);
        }
        if self.chunks_per_block == 0 {
            return Err(ConfigError::ZeroChunksPerBlock);
        }
        Ok(())
    }
}

/// Block length for a typed node pool.
///
/// Tree containers created with a node pool reserve `nodes_per_block` node
/// slots per reservation; without one they grow a node at a time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodePoolConfig {
    /// Number of node slots reserved together.
    pub nodes_per_block: usize,
}

impl NodePoolConfig {
    /// Default block length used by [`NodePoolConfig::default`].
    pub const DEFAULT_NODES_PER_BLOCK: usize = 128;

    /// Creates a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroChunksPerBlock`] if `nodes_per_block` is zero.
    pub fn new(nodes_per_block: usize) -> Result<Self, ConfigError> {
        if nodes_per_block == 0 {
            return Err(ConfigError::ZeroChunksPerBlock);
        }
        Ok(Self { nodes_per_block })
    }

    /// Parses and validates a configuration from TOML source.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed TOML and
    /// [`ConfigError::ZeroChunksPerBlock`] for a zero block length.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source).map_err(|e| ConfigError::Parse(e.to_string()))?;
        Self::new(config.nodes_per_block)
    }
}

impl Default for NodePoolConfig {
    fn default() -> Self {
        Self {
            nodes_per_block: Self::DEFAULT_NODES_PER_BLOCK,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_rejects_zero() {
        assert_eq!(PoolConfig::new(0, 4), Err(ConfigError::ZeroChunkSize));
        assert_eq!(PoolConfig::new(16, 0), Err(ConfigError::ZeroChunksPerBlock));
        assert_eq!(NodePoolConfig::new(0), Err(ConfigError::ZeroChunksPerBlock));
    }

    #[test]
    fn test_config_from_toml() {
        let config = PoolConfig::from_toml_str("chunk_size = 16\nchunks_per_block = 4\n").unwrap();
        assert_eq!(config, PoolConfig::new(16, 4).unwrap());

        let nodes = NodePoolConfig::from_toml_str("nodes_per_block = 64").unwrap();
        assert_eq!(nodes.nodes_per_block, 64);
    }

    #[test]
    fn test_config_from_toml_invalid() {
        assert!(matches!(
            PoolConfig::from_toml_str("chunk_size = \"big\""),
            Err(ConfigError::Parse(_))
        ));
        assert_eq!(
            PoolConfig::from_toml_str("chunk_size = 8\nchunks_per_block = 0"),
            Err(ConfigError::ZeroChunksPerBlock)
        );
    }

    #[test]
    fn test_config_for_type() {
        let config = PoolConfig::for_type::<[u64; 3]>(10).unwrap();
        assert_eq!(config.chunk_size, 24);
        assert_eq!(PoolConfig::for_type::<()>(10), Err(ConfigError::ZeroChunkSize));
    }
}
