/* src/io/pending.rs */

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Condvar, Mutex, PoisonError};

/// Count of writes accepted but not yet applied.
///
/// The count is atomic so it can be read without locking. Waiters park on a
/// condition variable that is signaled when the count drops to zero.
#[derive(Debug, Default)]
pub(crate) struct Pending {
	count: AtomicUsize,
	lock: Mutex<()>,
	drained: Condvar,
}

impl Pending {
	pub(crate) fn begin(&self) {
		self.count.fetch_add(1, Ordering::SeqCst);
	}

	pub(crate) fn finish(&self) {
		if self.count.fetch_sub(1, Ordering::SeqCst) == 1 {
			// Taking the lock orders this notify after a waiter's check.
			let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
			self.drained.notify_all();
		}
	}

	pub(crate) fn get(&self) -> usize {
		self.count.load(Ordering::SeqCst)
	}

	/// Blocks until the count is zero.
	pub(crate) fn wait(&self) {
		let mut guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
		while self.get() != 0 {
			guard = self
				.drained
				.wait(guard)
				.unwrap_or_else(PoisonError::into_inner);
		}
	}
}
