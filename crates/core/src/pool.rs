//! Reusable String Buffer Pool
//!
//! Stacktrace capture formats into a scratch buffer. Rather than allocate a
//! fresh one per capture, buffers are checked out of a shared pool and
//! returned when the [`PooledBuffer`] guard drops, on every exit path,
//! panics included.
//!
//! # Design
//!
//! ```text
//! ┌──────────────────────────────────────────┐
//! │            BufferPool (shared)           │
//! ├──────────────────────────────────────────┤
//! │ free: Mutex<Vec<String>>  (≤ retain)     │
//! │ outstanding: AtomicU64   (checked out)   │
//! │ allocations: AtomicU64   (pool misses)   │
//! └──────────────────────────────────────────┘
//!        get() ──► PooledBuffer ──drop──► free
//! ```
//!
//! A process-wide instance is available through [`BufferPool::global`],
//! configured once from the environment. Callers that own their logging
//! state can construct a private pool and pass it explicitly.

use std::ops::{Deref, DerefMut};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, OnceLock};
use tracing::trace;

/// Default starting capacity for a fresh buffer
pub const DEFAULT_BUFFER_CAPACITY: usize = 1024;

/// Default number of idle buffers kept for reuse
pub const DEFAULT_MAX_RETAINED: usize = 16;

/// Buffers that grew beyond this are dropped instead of returned, so one
/// pathological stack does not pin a large allocation forever.
const MAX_RETURNED_CAPACITY: usize = 64 * 1024;

/// Pool sizing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolConfig {
    /// Capacity of buffers allocated on a pool miss
    pub buffer_capacity: usize,
    /// Maximum idle buffers held by the pool
    pub max_retained: usize,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            buffer_capacity: DEFAULT_BUFFER_CAPACITY,
            max_retained: DEFAULT_MAX_RETAINED,
        }
    }
}

impl PoolConfig {
    /// Read sizing from `LOGFIELD_STACK_BUFFER` and `LOGFIELD_POOL_RETAIN`
    ///
    /// Unset variables keep their defaults; unparseable ones are ignored
    /// with a warning.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(n) = env_usize("LOGFIELD_STACK_BUFFER") {
            config.buffer_capacity = n;
        }
        if let Some(n) = env_usize("LOGFIELD_POOL_RETAIN") {
            config.max_retained = n;
        }
        config
    }
}

fn env_usize(name: &str) -> Option<usize> {
    let val = std::env::var(name).ok()?;
    match val.trim().parse() {
        Ok(n) => Some(n),
        Err(_) => {
            tracing::warn!("{}='{}' is not a valid size, ignoring", name, val);
            None
        }
    }
}

/// Thread-safe pool of reusable `String` buffers
#[derive(Debug)]
pub struct BufferPool {
    config: PoolConfig,
    free: Mutex<Vec<String>>,
    outstanding: AtomicU64,
    allocations: AtomicU64,
}

impl Default for BufferPool {
    fn default() -> Self {
        Self::new(PoolConfig::default())
    }
}

impl BufferPool {
    /// Create an empty pool
    pub fn new(config: PoolConfig) -> Self {
        Self {
            config,
            free: Mutex::new(Vec::with_capacity(config.max_retained)),
            outstanding: AtomicU64::new(0),
            allocations: AtomicU64::new(0),
        }
    }

    /// The process-wide pool, sized by [`PoolConfig::from_env`] on first use
    pub fn global() -> &'static BufferPool {
        static GLOBAL_POOL: OnceLock<BufferPool> = OnceLock::new();
        GLOBAL_POOL.get_or_init(|| BufferPool::new(PoolConfig::from_env()))
    }

    pub fn config(&self) -> PoolConfig {
        self.config
    }

    /// Check out an empty buffer
    pub fn get(&self) -> PooledBuffer<'_> {
        let reused = self.lock_free().pop();
        let buf = match reused {
            Some(buf) => buf,
            None => {
                self.allocations.fetch_add(1, Ordering::Relaxed);
                trace!(
                    capacity = self.config.buffer_capacity,
                    "buffer pool miss, allocating"
                );
                String::with_capacity(self.config.buffer_capacity)
            }
        };
        self.outstanding.fetch_add(1, Ordering::AcqRel);
        PooledBuffer { pool: self, buf }
    }

    /// Buffers currently checked out
    pub fn outstanding(&self) -> u64 {
        self.outstanding.load(Ordering::Acquire)
    }

    /// Lifetime count of buffers allocated because the pool was empty
    pub fn allocations(&self) -> u64 {
        self.allocations.load(Ordering::Relaxed)
    }

    /// Idle buffers waiting for reuse
    pub fn retained(&self) -> usize {
        self.lock_free().len()
    }

    fn put(&self, mut buf: String) {
        self.outstanding.fetch_sub(1, Ordering::AcqRel);
        if buf.capacity() > MAX_RETURNED_CAPACITY {
            trace!(capacity = buf.capacity(), "dropping oversized buffer");
            return;
        }
        buf.clear();
        let mut free = self.lock_free();
        if free.len() < self.config.max_retained {
            free.push(buf);
        } else {
            trace!("buffer pool full, dropping buffer");
        }
    }

    // A panic while a buffer was checked out must not disable the pool.
    fn lock_free(&self) -> MutexGuard<'_, Vec<String>> {
        self.free
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Scoped buffer checked out of a [`BufferPool`]
///
/// Dereferences to `String`. Dropping the guard clears the buffer and hands
/// it back to the pool.
#[derive(Debug)]
pub struct PooledBuffer<'a> {
    pool: &'a BufferPool,
    buf: String,
}

impl Deref for PooledBuffer<'_> {
    type Target = String;

    fn deref(&self) -> &String {
        &self.buf
    }
}

impl DerefMut for PooledBuffer<'_> {
    fn deref_mut(&mut self) -> &mut String {
        &mut self.buf
    }
}

impl Drop for PooledBuffer<'_> {
    fn drop(&mut self) {
        self.pool.put(std::mem::take(&mut self.buf));
    }
}
