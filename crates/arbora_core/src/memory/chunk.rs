//! # Chunk Pool
//!
//! Block allocator handing out fixed-size byte chunks.
//!
//! Memory is reserved a block at a time (`chunks_per_block` chunks per
//! block). Fresh chunks are bump-allocated from the newest block; freed
//! chunks go onto a free list and are handed out again, zero-filled,
//! before any new block is touched. Blocks are only returned to the
//! system by [`Pool::release`].
//!
//! The free list is a list of chunk indices kept beside the blocks. Chunk
//! bytes are never reinterpreted as links.

use std::sync::atomic::{AtomicU32, Ordering};

use bytemuck::Pod;

use crate::config::PoolConfig;
use crate::error::{MemoryError, MemoryResult};

/// Block storage word. Chunks start on offsets that are multiples of the
/// chunk size inside word-aligned blocks.
type Word = u64;

const WORD_BYTES: usize = std::mem::size_of::<Word>();

/// Source of pool identity tags used by the debug ownership checks.
static NEXT_POOL_ID: AtomicU32 = AtomicU32::new(1);

fn next_pool_id() -> u32 {
    NEXT_POOL_ID.fetch_add(1, Ordering::Relaxed)
}

/// Handle to a chunk issued by a [`Pool`].
///
/// Valid until the chunk is freed or the pool is released.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Chunk {
    /// Identity tag of the issuing pool.
    pool: u32,
    /// Global chunk index (block * `chunks_per_block` + slot).
    index: usize,
}

impl Chunk {
    /// Global index of the chunk inside its pool.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.index
    }
}

/// A pool of fixed-size byte chunks.
///
/// No internal locking: one pool per thread, or serialize access.
///
/// # Example
///
/// ```rust
/// use arbora_core::Pool;
///
/// let mut pool = Pool::new(16, 4);
/// let chunk = pool.alloc()?;
/// pool.chunk_mut(chunk)[0] = 7;
/// pool.free(chunk);
///
/// // Recycled chunks come back zero-filled.
/// let again = pool.alloc()?;
/// assert_eq!(again, chunk);
/// assert_eq!(pool.chunk(again)[0], 0);
/// # Ok::<(), arbora_core::MemoryError>(())
/// ```
pub struct Pool {
    /// Identity tag; renewed on release so stale handles are caught.
    id: u32,
    /// Effective chunk size in bytes.
    chunk_size: usize,
    /// Chunks carved out of every block.
    chunks_per_block: usize,
    /// Reserved blocks, oldest first.
    blocks: Vec<Box<[Word]>>,
    /// Next unused slot in the newest block.
    cursor: usize,
    /// Head of the recycled chunk list.
    free_head: Option<usize>,
    /// Free-list links, one per issued chunk index.
    free_links: Vec<Option<usize>>,
    /// Chunks currently handed out.
    allocated_count: usize,
    /// Chunks sitting on the free list.
    free_count: usize,
    /// Liveness bitmap for double-free and foreign-chunk checks.
    #[cfg(debug_assertions)]
    live: Vec<bool>,
}

impl Pool {
    /// Creates an empty pool. No memory is reserved until the first
    /// [`alloc`](Self::alloc).
    ///
    /// The effective chunk size is `max(chunk_size, size_of::<usize>())`.
    ///
    /// # Panics
    ///
    /// Panics if either argument is zero.
    #[must_use]
    pub fn new(chunk_size: usize, chunks_per_block: usize) -> Self {
        assert!(
            chunk_size > 0 && chunks_per_block > 0,
            "A zero argument passed to Pool::new"
        );

        Self {
            id: next_pool_id(),
            chunk_size: chunk_size.max(std::mem::size_of::<usize>()),
            chunks_per_block,
            blocks: Vec::new(),
            cursor: chunks_per_block,
            free_head: None,
            free_links: Vec::new(),
            allocated_count: 0,
            free_count: 0,
            #[cfg(debug_assertions)]
            live: Vec::new(),
        }
    }

    /// Creates an empty pool from a validated configuration.
    #[must_use]
    pub fn from_config(config: PoolConfig) -> Self {
        Self::new(config.chunk_size, config.chunks_per_block)
    }

    /// Effective chunk size in bytes.
    #[inline]
    #[must_use]
    pub const fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Chunks per reserved block.
    #[inline]
    #[must_use]
    pub const fn chunks_per_block(&self) -> usize {
        self.chunks_per_block
    }

    /// Number of reserved blocks.
    #[inline]
    #[must_use]
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Number of chunks currently handed out.
    #[inline]
    #[must_use]
    pub const fn allocated_count(&self) -> usize {
        self.allocated_count
    }

    /// Number of recycled chunks waiting on the free list.
    #[inline]
    #[must_use]
    pub const fn free_count(&self) -> usize {
        self.free_count
    }

    /// Total bytes reserved across all blocks.
    ///
    /// Recycled chunks still count: this is reservation, not usage.
    #[must_use]
    pub fn size(&self) -> usize {
        self.blocks.len() * self.block_bytes()
    }

    /// Allocates a chunk.
    ///
    /// Recycled chunks are preferred and come back zero-filled. Otherwise a
    /// fresh chunk is bump-allocated, reserving a new block when the
    /// current one is exhausted.
    ///
    /// # Errors
    ///
    /// Returns [`MemoryError::OutOfMemory`] if a new block cannot be reserved.
    pub fn alloc(&mut self) -> MemoryResult<Chunk> {
        if let Some(index) = self.free_head {
            self.free_head = self.free_links[index].take();
            self.free_count -= 1;
            self.bytes_mut(index).fill(0);
            return Ok(self.issue(index));
        }

        if self.cursor == self.chunks_per_block {
            self.reserve_block()?;
        }

        let index = (self.blocks.len() - 1) * self.chunks_per_block + self.cursor;
        self.cursor += 1;
        Ok(self.issue(index))
    }

    /// Returns a chunk to the free list.
    ///
    /// The chunk must have been issued by this pool and not freed since.
    /// Both conditions are checked in debug builds only; violating them in
    /// a release build corrupts the free list.
    pub fn free(&mut self, chunk: Chunk) {
        debug_assert!(chunk.pool == self.id, "Deletion from invalid memory pool");
        #[cfg(debug_assertions)]
        {
            debug_assert!(
                self.live.get(chunk.index).copied().unwrap_or(false),
                "Chunk {} freed twice or never allocated",
                chunk.index
            );
            self.live[chunk.index] = false;
        }

        self.free_links[chunk.index] = self.free_head;
        self.free_head = Some(chunk.index);
        self.allocated_count -= 1;
        self.free_count += 1;
    }

    /// Returns every block to the system and resets the pool to its
    /// just-created state. All previously issued chunks become invalid.
    pub fn release(&mut self) {
        tracing::debug!(
            blocks = self.blocks.len(),
            bytes = self.size(),
            "released chunk pool"
        );

        self.id = next_pool_id();
        self.blocks = Vec::new();
        self.cursor = self.chunks_per_block;
        self.free_head = None;
        self.free_links = Vec::new();
        self.allocated_count = 0;
        self.free_count = 0;
        #[cfg(debug_assertions)]
        {
            self.live = Vec::new();
        }
    }

    /// Bytes of a live chunk.
    ///
    /// # Panics
    ///
    /// Panics if the chunk index lies outside the reserved blocks.
    #[must_use]
    pub fn chunk(&self, chunk: Chunk) -> &[u8] {
        self.check_live(chunk);
        self.bytes(chunk.index)
    }

    /// Mutable bytes of a live chunk.
    ///
    /// # Panics
    ///
    /// Panics if the chunk index lies outside the reserved blocks.
    pub fn chunk_mut(&mut self, chunk: Chunk) -> &mut [u8] {
        self.check_live(chunk);
        self.bytes_mut(chunk.index)
    }

    /// Typed view of a live chunk.
    ///
    /// # Errors
    ///
    /// Returns [`MemoryError::ChunkLayoutMismatch`] if `T` is larger than
    /// the chunk or the chunk is not aligned for `T`.
    pub fn view<T: Pod>(&self, chunk: Chunk) -> MemoryResult<&T> {
        let size = std::mem::size_of::<T>();
        self.chunk(chunk)
            .get(..size)
            .and_then(|bytes| bytemuck::try_from_bytes(bytes).ok())
            .ok_or_else(|| self.layout_error::<T>())
    }

    /// Mutable typed view of a live chunk.
    ///
    /// # Errors
    ///
    /// Returns [`MemoryError::ChunkLayoutMismatch`] if `T` is larger than
    /// the chunk or the chunk is not aligned for `T`.
    pub fn view_mut<T: Pod>(&mut self, chunk: Chunk) -> MemoryResult<&mut T> {
        let size = std::mem::size_of::<T>();
        let error = self.layout_error::<T>();
        self.chunk_mut(chunk)
            .get_mut(..size)
            .and_then(|bytes| bytemuck::try_from_bytes_mut(bytes).ok())
            .ok_or(error)
    }

    /// Bytes reserved by one block.
    #[inline]
    fn block_bytes(&self) -> usize {
        self.chunk_size * self.chunks_per_block
    }

    fn reserve_block(&mut self) -> MemoryResult<()> {
        let bytes = self
            .chunk_size
            .checked_mul(self.chunks_per_block)
            .ok_or(MemoryError::OutOfMemory { bytes: usize::MAX })?;
        let words = bytes.div_ceil(WORD_BYTES);

        let mut block: Vec<Word> = Vec::new();
        let reserved = block
            .try_reserve_exact(words)
            .and_then(|()| self.blocks.try_reserve(1))
            .and_then(|()| self.free_links.try_reserve(self.chunks_per_block));
        if reserved.is_err() {
            tracing::warn!(bytes, "chunk pool block reservation failed");
            return Err(MemoryError::OutOfMemory { bytes });
        }
        block.resize(words, 0);

        tracing::debug!(block = self.blocks.len(), bytes, "reserved chunk pool block");

        self.blocks.push(block.into_boxed_slice());
        self.free_links
            .resize(self.blocks.len() * self.chunks_per_block, None);
        #[cfg(debug_assertions)]
        self.live.resize(self.blocks.len() * self.chunks_per_block, false);
        self.cursor = 0;
        Ok(())
    }

    fn issue(&mut self, index: usize) -> Chunk {
        #[cfg(debug_assertions)]
        {
            self.live[index] = true;
        }
        self.allocated_count += 1;
        Chunk {
            pool: self.id,
            index,
        }
    }

    #[inline]
    fn check_live(&self, chunk: Chunk) {
        debug_assert!(chunk.pool == self.id, "Chunk from a different pool");
        #[cfg(debug_assertions)]
        debug_assert!(
            self.live.get(chunk.index).copied().unwrap_or(false),
            "Access to freed chunk {}",
            chunk.index
        );
    }

    fn bytes(&self, index: usize) -> &[u8] {
        let (block, offset) = self.locate(index);
        let bytes: &[u8] = bytemuck::cast_slice(&self.blocks[block]);
        &bytes[offset..offset + self.chunk_size]
    }

    fn bytes_mut(&mut self, index: usize) -> &mut [u8] {
        let (block, offset) = self.locate(index);
        let chunk_size = self.chunk_size;
        let bytes: &mut [u8] = bytemuck::cast_slice_mut(&mut self.blocks[block]);
        &mut bytes[offset..offset + chunk_size]
    }

    #[inline]
    fn locate(&self, index: usize) -> (usize, usize) {
        (
            index / self.chunks_per_block,
            (index % self.chunks_per_block) * self.chunk_size,
        )
    }

    fn layout_error<T>(&self) -> MemoryError {
        MemoryError::ChunkLayoutMismatch {
            chunk_size: self.chunk_size,
            type_size: std::mem::size_of::<T>(),
            type_align: std::mem::align_of::<T>(),
        }
    }
}

impl std::fmt::Debug for Pool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pool")
            .field("chunk_size", &self.chunk_size)
            .field("chunks_per_block", &self.chunks_per_block)
            .field("blocks", &self.blocks.len())
            .field("allocated", &self.allocated_count)
            .field("free", &self.free_count)
            .finish()
    }
}
