use bridge_core::RequestId;
use rand_core::{OsRng, RngCore};
use std::sync::atomic::{AtomicU64, Ordering};

/// Source of fresh request ids, unique among currently pending
/// requests. Injected so hosts and tests control id generation instead
/// of relying on an ambient generator.
pub trait IdGenerator: Send + Sync {
    fn next_id(&self) -> RequestId;
}

/// Default generator: 16 random bytes, hex encoded.
#[derive(Debug, Default)]
pub struct RandomIdGenerator;

impl IdGenerator for RandomIdGenerator {
    fn next_id(&self) -> RequestId {
        let mut bytes = [0u8; 16];
        OsRng.fill_bytes(&mut bytes);
        RequestId(hex::encode(bytes))
    }
}

/// Monotonic counter generator for deterministic tests.
#[derive(Debug)]
pub struct SequentialIdGenerator {
    next: AtomicU64,
}

impl SequentialIdGenerator {
    pub fn new() -> Self {
        Self { next: AtomicU64::new(1) }
    }
}

impl Default for SequentialIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn next_id(&self) -> RequestId {
        RequestId(self.next.fetch_add(1, Ordering::Relaxed).to_string())
    }
}
