//! # Pool Allocator
//!
//! Typed slot allocator for objects that are frequently allocated and freed,
//! such as tree nodes.
//!
//! Handles carry the generation of their slot. Vacating a slot bumps its
//! generation, so a handle kept past a free never reaches the slot's next
//! occupant.

use std::ops::{Index, IndexMut};

use crate::config::NodePoolConfig;
use crate::error::{MemoryError, MemoryResult};

/// A storage slot: either a live value or a link in the free list.
enum Slot<T> {
    Occupied { generation: u32, value: T },
    Vacant { generation: u32, next: Option<u32> },
}

/// Slot storage for values of one type, addressed by [`PoolHandle`].
///
/// Freed slots are threaded into an index free list and reused, most
/// recent first, before the pool grows.
///
/// Growth happens either a block of `nodes_per_block` slots at a time
/// (pooled) or through ordinary amortized vector growth (unpooled).
///
/// Single-threaded: share it behind a lock if you must.
///
/// # Example
///
/// ```rust
/// use arbora_core::PoolAllocator;
///
/// let mut pool: PoolAllocator<(f32, f32)> = PoolAllocator::new();
///
/// let handle = pool.allocate((0.0, 1.0))?;
/// assert_eq!(pool[handle], (0.0, 1.0));
///
/// assert_eq!(pool.free(handle), Some((0.0, 1.0)));
/// # Ok::<(), arbora_core::MemoryError>(())
/// ```
pub struct PoolAllocator<T> {
    /// Slots in handle order.
    slots: Vec<Slot<T>>,
    /// Head of the free list.
    free_head: Option<u32>,
    /// Occupied slots.
    allocated_count: usize,
    /// Slots reserved per growth step; `None` for amortized growth.
    block_len: Option<usize>,
}

/// Index of an occupied slot in a [`PoolAllocator`], tagged with the
/// slot's generation at the time it was filled.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PoolHandle {
    /// Slot position.
    index: u32,
    /// Occupancy the handle was issued for.
    generation: u32,
}

impl PoolHandle {
    /// A handle that no pool ever issues.
    pub const DANGLING: Self = Self {
        index: u32::MAX,
        generation: 0,
    };

    /// Slot index of the handle.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.index as usize
    }

    /// Generation of the slot when the handle was issued.
    #[inline]
    #[must_use]
    pub const fn generation(self) -> u32 {
        self.generation
    }
}

impl<T> PoolAllocator<T> {
    /// Creates an unpooled allocator that grows like an ordinary vector.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            slots: Vec::new(),
            free_head: None,
            allocated_count: 0,
            block_len: None,
        }
    }

    /// Creates a pooled allocator that reserves `nodes_per_block` slots at
    /// a time. Nothing is reserved until the first allocation.
    #[must_use]
    pub const fn with_config(config: NodePoolConfig) -> Self {
        Self {
            slots: Vec::new(),
            free_head: None,
            allocated_count: 0,
            block_len: Some(config.nodes_per_block),
        }
    }

    /// Occupied slots.
    #[inline]
    #[must_use]
    pub const fn allocated_count(&self) -> usize {
        self.allocated_count
    }

    /// Returns the number of slots that can be filled without reserving.
    #[inline]
    #[must_use]
    pub fn free_count(&self) -> usize {
        self.slots.capacity() - self.allocated_count
    }

    /// Returns the block length, or `None` for an unpooled allocator.
    #[inline]
    #[must_use]
    pub const fn block_len(&self) -> Option<usize> {
        self.block_len
    }

    /// Total bytes reserved for slots, live or not.
    #[must_use]
    pub fn reserved_bytes(&self) -> usize {
        self.slots.capacity() * std::mem::size_of::<Slot<T>>()
    }

    /// Stores `value` in a free slot, growing the pool if none is left.
    ///
    /// Recycled slots are reused first, most recently freed first.
    ///
    /// # Errors
    ///
    /// Returns [`MemoryError::OutOfMemory`] if the pool has to grow and the
    /// reservation fails.
    pub fn allocate(&mut self, value: T) -> MemoryResult<PoolHandle> {
        if let Some(index) = self.free_head {
            let slot = &mut self.slots[index as usize];
            let Slot::Vacant { generation, next } = *slot else {
                unreachable!("free list points at a live slot");
            };
            *slot = Slot::Occupied { generation, value };
            self.free_head = next;
            self.allocated_count += 1;
            return Ok(PoolHandle { index, generation });
        }

        let index = u32::try_from(self.slots.len())
            .ok()
            .filter(|&index| index != PoolHandle::DANGLING.index)
            .ok_or(MemoryError::OutOfMemory {
                bytes: std::mem::size_of::<Slot<T>>(),
            })?;

        if self.slots.len() == self.slots.capacity() {
            self.grow()?;
        }

        self.slots.push(Slot::Occupied {
            generation: 0,
            value,
        });
        self.allocated_count += 1;
        Ok(PoolHandle {
            index,
            generation: 0,
        })
    }

    /// Vacates a slot and hands back its value; `None` if the handle is
    /// stale, the slot already vacant, or the handle never issued.
    pub fn free(&mut self, handle: PoolHandle) -> Option<T> {
        let slot = self.slots.get_mut(handle.index())?;
        match &*slot {
            Slot::Occupied { generation, .. } if *generation == handle.generation => {}
            _ => return None,
        }

        let vacant = Slot::Vacant {
            generation: handle.generation.wrapping_add(1),
            next: self.free_head,
        };
        let Slot::Occupied { value, .. } = std::mem::replace(slot, vacant) else {
            return None;
        };
        self.free_head = Some(handle.index);
        self.allocated_count -= 1;

        Some(value)
    }

    /// Value in an occupied slot; `None` for a stale handle.
    #[inline]
    #[must_use]
    pub fn get(&self, handle: PoolHandle) -> Option<&T> {
        match self.slots.get(handle.index())? {
            Slot::Occupied { generation, value } if *generation == handle.generation => {
                Some(value)
            }
            _ => None,
        }
    }

    /// Mutable value in an occupied slot; `None` for a stale handle.
    #[inline]
    pub fn get_mut(&mut self, handle: PoolHandle) -> Option<&mut T> {
        match self.slots.get_mut(handle.index())? {
            Slot::Occupied { generation, value } if *generation == handle.generation => {
                Some(value)
            }
            _ => None,
        }
    }

    /// Drops every object and resets the free list.
    ///
    /// Reserved memory is kept for reuse. Generations restart, so handles
    /// issued before the clear must be discarded.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.free_head = None;
        self.allocated_count = 0;
    }

    /// Drops every object and returns all reserved memory to the system.
    pub fn release(&mut self) {
        tracing::debug!(bytes = self.reserved_bytes(), "released node pool");
        self.slots = Vec::new();
        self.free_head = None;
        self.allocated_count = 0;
    }

    /// Iterates over all allocated objects in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (PoolHandle, &T)> {
        self.slots.iter().zip(0u32..).filter_map(|(slot, index)| match slot {
            Slot::Occupied { generation, value } => Some((
                PoolHandle {
                    index,
                    generation: *generation,
                },
                value,
            )),
            Slot::Vacant { .. } => None,
        })
    }

    fn grow(&mut self) -> MemoryResult<()> {
        let additional = self.block_len.unwrap_or(1);
        let reserved = match self.block_len {
            Some(len) => self.slots.try_reserve_exact(len),
            None => self.slots.try_reserve(1),
        };

        let bytes = additional.saturating_mul(std::mem::size_of::<Slot<T>>());
        if reserved.is_err() {
            tracing::warn!(bytes, "node pool reservation failed");
            return Err(MemoryError::OutOfMemory { bytes });
        }
        if self.block_len.is_some() {
            tracing::debug!(
                slots = self.slots.capacity(),
                bytes,
                "reserved node pool block"
            );
        }
        Ok(())
    }
}

impl<T> Default for PoolAllocator<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Index<PoolHandle> for PoolAllocator<T> {
    type Output = T;

    /// # Panics
    ///
    /// Panics if the handle is stale or refers to a vacant or never-issued
    /// slot.
    fn index(&self, handle: PoolHandle) -> &T {
        match self.get(handle) {
            Some(value) => value,
            None => panic!("access to stale or vacant pool slot {}", handle.index),
        }
    }
}

impl<T> IndexMut<PoolHandle> for PoolAllocator<T> {
    fn index_mut(&mut self, handle: PoolHandle) -> &mut T {
        match self.get_mut(handle) {
            Some(value) => value,
            None => panic!("access to stale or vacant pool slot {}", handle.index),
        }
    }
}
