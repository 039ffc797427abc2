//! Test utilities: instrumented hash backends.

use std::{cell::Cell, rc::Rc};

use crate::{Digest, HashBackend, HashBackendError};

/// Decorator counting how many digests were taken from the inner backend.
///
/// The counter is shared, so it stays readable after the backend has been
/// moved into a tree.
#[derive(Debug, Clone)]
pub(crate) struct CountingHasher<H> {
    inner: H,
    sums: Rc<Cell<u64>>,
}

impl<H: HashBackend> CountingHasher<H> {
    pub fn new(inner: H) -> (Self, Rc<Cell<u64>>) {
        let sums = Rc::new(Cell::new(0));
        (
            Self {
                inner,
                sums: Rc::clone(&sums),
            },
            sums,
        )
    }
}

impl<H: HashBackend> HashBackend for CountingHasher<H> {
    fn write(&mut self, bytes: &[u8]) -> Result<(), HashBackendError> {
        self.inner.write(bytes)
    }

    fn sum(&self) -> Digest {
        self.sums.set(self.sums.get() + 1);
        self.inner.sum()
    }

    fn reset(&mut self) {
        self.inner.reset();
    }
}

/// Blake3 backend whose `write` starts failing after a fixed number of
/// successful writes.
#[derive(Debug, Clone)]
pub(crate) struct FailingHasher {
    inner: blake3::Hasher,
    writes_left: usize,
    written: usize,
}

impl FailingHasher {
    pub fn new(successful_writes: usize) -> Self {
        Self {
            inner: blake3::Hasher::new(),
            writes_left: successful_writes,
            written: 0,
        }
    }

    /// Bytes accumulated since the last reset.
    pub fn written(&self) -> usize {
        self.written
    }
}

impl HashBackend for FailingHasher {
    fn write(&mut self, bytes: &[u8]) -> Result<(), HashBackendError> {
        if self.writes_left == 0 {
            return Err(HashBackendError("injected write failure".into()));
        }
        self.writes_left -= 1;
        self.written += bytes.len();
        self.inner.update(bytes);
        Ok(())
    }

    fn sum(&self) -> Digest {
        Digest::from(*self.inner.finalize().as_bytes())
    }

    fn reset(&mut self) {
        self.written = 0;
        self.inner.reset();
    }
}

/// Leaves `b"leaf-0"`, `b"leaf-1"`, ...
pub(crate) fn make_leaves(count: usize) -> Vec<Vec<u8>> {
    (0..count)
        .map(|i| format!("leaf-{}", i).into_bytes())
        .collect()
}
