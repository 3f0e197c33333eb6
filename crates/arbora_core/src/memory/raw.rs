//! # Raw Allocation
//!
//! Single zero-filled allocations outside any pool, e.g. for the first
//! object created before a pool exists.

use crate::error::{MemoryError, MemoryResult};

/// Allocates `size` zero-filled bytes.
///
/// # Errors
///
/// Returns [`MemoryError::OutOfMemory`] if the reservation fails.
///
/// # Example
///
/// ```rust
/// let block = arbora_core::calloc(64)?;
/// assert!(block.iter().all(|&b| b == 0));
/// # Ok::<(), arbora_core::MemoryError>(())
/// ```
pub fn calloc(size: usize) -> MemoryResult<Box<[u8]>> {
    let mut bytes: Vec<u8> = Vec::new();
    if bytes.try_reserve_exact(size).is_err() {
        tracing::warn!(bytes = size, "raw allocation failed");
        return Err(MemoryError::OutOfMemory { bytes: size });
    }
    bytes.resize(size, 0);
    Ok(bytes.into_boxed_slice())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calloc_zeroed() {
        let block = calloc(100).unwrap();
        assert_eq!(block.len(), 100);
        assert!(block.iter().all(|&b| b == 0));
    }

    #[test]
    fn test_calloc_empty() {
        assert!(calloc(0).unwrap().is_empty());
    }

    #[test]
    fn test_calloc_refused() {
        assert_eq!(
            calloc(usize::MAX),
            Err(MemoryError::OutOfMemory { bytes: usize::MAX })
        );
    }
}
