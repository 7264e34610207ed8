/*!
# Cuerip: Thread Runner

A generic single-shot worker lifecycle: `start` spawns a scoped-style thread
running a caller-supplied closure to completion, `cancel` flips a shared
[`KillSwitch`](crate::abort::KillSwitch) the closure is expected to poll,
`wait_done` blocks until the closure returns, and `join` consumes the runner
to retrieve its result. Grounded on the teacher's own
`std::thread::scope`-based parallel verification step, generalized from a
fixed two-closure shape into a single reusable worker.
*/

use crate::abort::KillSwitch;
use std::{
	sync::{Arc, Condvar, Mutex},
	thread::JoinHandle,
};

/// # Thread Runner.
///
/// `T` is the value produced by the worker closure on completion.
pub struct ThreadRunner<T> {
	kill: KillSwitch,
	done: Arc<(Mutex<bool>, Condvar)>,
	handle: Option<JoinHandle<T>>,
}

impl<T: Send + 'static> ThreadRunner<T> {
	#[must_use]
	/// # Start.
	///
	/// Spawns `work` on a new thread, passing it a clone of the runner's
	/// [`KillSwitch`] so it can poll for cancellation. The closure's return
	/// value is retrieved via [`join`](Self::join).
	pub fn start<F>(work: F) -> Self
	where F: FnOnce(KillSwitch) -> T + Send + 'static {
		let kill = KillSwitch::new();
		let done = Arc::new((Mutex::new(false), Condvar::new()));

		let kill2 = kill.clone();
		let done2 = Arc::clone(&done);
		let handle = std::thread::spawn(move || {
			let out = work(kill2);
			let (lock, cvar) = &*done2;
			*lock.lock().unwrap_or_else(std::sync::PoisonError::into_inner) = true;
			cvar.notify_all();
			out
		});

		Self { kill, done, handle: Some(handle) }
	}

	/// # Cancel.
	///
	/// Requests cooperative cancellation; has no effect on a worker that has
	/// already finished.
	pub fn cancel(&self) { self.kill.cancel(); }

	#[must_use]
	/// # Killed.
	///
	/// Returns `true` once [`cancel`](Self::cancel) has been called.
	pub fn killed(&self) -> bool { self.kill.killed() }

	/// # Wait Until Done.
	///
	/// Blocks the caller until the worker thread has returned, without
	/// consuming the runner.
	pub fn wait_done(&self) {
		let (lock, cvar) = &*self.done;
		let mut guard = lock.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
		while ! *guard {
			guard = cvar.wait(guard).unwrap_or_else(std::sync::PoisonError::into_inner);
		}
	}

	#[must_use]
	/// # Stop.
	///
	/// Cancels the worker and blocks until it has finished.
	pub fn stop(&self) -> bool {
		self.cancel();
		self.wait_done();
		true
	}

	/// # Join.
	///
	/// Consumes the runner, blocking until the worker thread returns its
	/// value. Returns `None` only if the worker thread panicked.
	pub fn join(mut self) -> Option<T> {
		self.handle.take().and_then(|h| h.join().ok())
	}
}



#[cfg(test)]
mod tests {
	use super::*;
	use std::sync::atomic::{AtomicU32, Ordering};
	use std::time::Duration;

	#[test]
	fn t_completes_normally() {
		let runner = ThreadRunner::start(|_kill| 2 + 2);
		runner.wait_done();
		assert_eq!(runner.join(), Some(4));
	}

	#[test]
	fn t_cancel_observed() {
		let counter = Arc::new(AtomicU32::new(0));
		let counter2 = Arc::clone(&counter);
		let runner = ThreadRunner::start(move |kill| {
			while ! kill.killed() {
				counter2.fetch_add(1, Ordering::Relaxed);
				std::thread::sleep(Duration::from_millis(1));
			}
			counter2.load(Ordering::Relaxed)
		});

		std::thread::sleep(Duration::from_millis(5));
		assert!(runner.stop());
		assert!(runner.join().unwrap() > 0);
	}
}
