//! Fixed-capacity block queue.

use heapless::Deque;

use crate::motion::Block;

use super::collab::BlockQueue;

/// FIFO of planner blocks backed by a `heapless::Deque`.
///
/// Implements [`BlockQueue`] so a host or a test can feed the dispatch loop
/// without a planner.
#[derive(Debug)]
pub struct BlockBuffer<const N: usize> {
    blocks: Deque<Block, N>,
    position_updates: u32,
    resets: u32,
}

impl<const N: usize> Default for BlockBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> BlockBuffer<N> {
    /// Create an empty buffer.
    pub const fn new() -> Self {
        Self {
            blocks: Deque::new(),
            position_updates: 0,
            resets: 0,
        }
    }

    /// Append a block. Hands the block back if the buffer is full.
    pub fn push(&mut self, block: Block) -> Result<(), Block> {
        self.blocks.push_back(block)
    }

    /// Number of queued blocks.
    #[inline]
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Whether no block is queued.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Whether another block would be rejected.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.blocks.is_full()
    }

    /// How often a position update was requested.
    pub fn position_updates(&self) -> u32 {
        self.position_updates
    }

    /// How often the buffer was reset.
    pub fn resets(&self) -> u32 {
        self.resets
    }
}

impl<const N: usize> BlockQueue for BlockBuffer<N> {
    fn current_block(&mut self) -> Option<Block> {
        self.blocks.front().copied()
    }

    fn discard_current_block(&mut self) {
        self.blocks.pop_front();
    }

    fn reset(&mut self) {
        self.blocks.clear();
        self.resets += 1;
    }

    fn request_position_update(&mut self) {
        self.position_updates += 1;
    }
}
