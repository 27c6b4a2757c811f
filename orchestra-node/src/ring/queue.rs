//! Lock-free single-producer single-consumer byte queue.
//!
//! Sits between a UART interrupt and the control task: the interrupt pushes
//! received bytes, the control tick drains them. Also used as the wire in
//! the in-memory ring simulation.
//!
//! # Contract
//!
//! - Only ONE context may call [`push()`](ByteQueue::push) (the producer).
//! - Only ONE context may call [`pop()`](ByteQueue::pop) (the consumer).

use core::sync::atomic::{AtomicU8, AtomicUsize, Ordering};

use super::link::ByteLink;

/// Transmit failures of a [`QueueLink`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum LinkError {
    /// The outgoing queue is full; the byte was dropped.
    #[error("transmit queue full, dropped byte {0:#04x}")]
    TxFull(u8),
}

/// Bounded byte queue with usable capacity `N - 1`.
///
/// One slot stays empty to tell full from empty (Lamport queue).
pub struct ByteQueue<const N: usize> {
    slots: [AtomicU8; N],
    /// Write position (only modified by the producer).
    head: AtomicUsize,
    /// Read position (only modified by the consumer).
    tail: AtomicUsize,
}

impl<const N: usize> ByteQueue<N> {
    /// Create an empty queue. `N` must be at least 2.
    #[allow(clippy::declare_interior_mut_const)]
    pub const fn new() -> Self {
        assert!(N >= 2, "byte queue needs at least 2 slots (1 usable)");
        const EMPTY: AtomicU8 = AtomicU8::new(0);
        ByteQueue {
            slots: [EMPTY; N],
            head: AtomicUsize::new(0),
            tail: AtomicUsize::new(0),
        }
    }

    /// Producer side. Hands the byte back if the queue is full.
    pub fn push(&self, byte: u8) -> Result<(), u8> {
        let head = self.head.load(Ordering::Relaxed);
        let next_head = (head + 1) % N;

        if next_head == self.tail.load(Ordering::Acquire) {
            return Err(byte);
        }

        self.slots[head].store(byte, Ordering::Relaxed);
        // Publishes the slot write before the consumer can see the new head.
        self.head.store(next_head, Ordering::Release);
        Ok(())
    }

    /// Consumer side. `None` when empty.
    pub fn pop(&self) -> Option<u8> {
        let tail = self.tail.load(Ordering::Relaxed);

        if tail == self.head.load(Ordering::Acquire) {
            return None;
        }

        let byte = self.slots[tail].load(Ordering::Relaxed);
        self.tail.store((tail + 1) % N, Ordering::Release);
        Some(byte)
    }

    pub fn is_empty(&self) -> bool {
        self.tail.load(Ordering::Acquire) == self.head.load(Ordering::Acquire)
    }

    pub fn is_full(&self) -> bool {
        let head = self.head.load(Ordering::Acquire);
        let tail = self.tail.load(Ordering::Acquire);
        (head + 1) % N == tail
    }

    pub fn len(&self) -> usize {
        let head = self.head.load(Ordering::Acquire);
        let tail = self.tail.load(Ordering::Acquire);
        (head + N - tail) % N
    }
}

impl<const N: usize> Default for ByteQueue<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// A [`ByteLink`] made of two queues: bytes arrive on `rx`, leave on `tx`.
///
/// In a ring, node `k`'s `tx` is node `k + 1`'s `rx`.
pub struct QueueLink<'a, const N: usize> {
    rx: &'a ByteQueue<N>,
    tx: &'a ByteQueue<N>,
}

impl<'a, const N: usize> QueueLink<'a, N> {
    pub fn new(rx: &'a ByteQueue<N>, tx: &'a ByteQueue<N>) -> Self {
        QueueLink { rx, tx }
    }
}

impl<const N: usize> ByteLink for QueueLink<'_, N> {
    type Error = LinkError;

    fn read(&mut self) -> Option<u8> {
        self.rx.pop()
    }

    fn write(&mut self, byte: u8) -> Result<(), LinkError> {
        self.tx.push(byte).map_err(LinkError::TxFull)
    }
}
