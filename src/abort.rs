/*!
# Cuerip: Kill Switch
*/

use std::sync::{
	Arc,
	atomic::{
		AtomicBool,
		Ordering::{Acquire, Release},
	},
};



#[derive(Debug, Clone, Default)]
/// # Kill Switch.
///
/// A short-circuit shared between a worker (`RipEngine`, `Aggregator`) and
/// whichever thread decides to cancel it. Cloning shares the same underlying
/// flag; `cancel()` from any clone is observed by every other clone.
pub struct KillSwitch(Arc<AtomicBool>);

impl KillSwitch {
	#[must_use]
	/// # New.
	pub fn new() -> Self { Self(Arc::new(AtomicBool::new(false))) }

	#[must_use]
	/// # Killed?
	pub fn killed(&self) -> bool { self.0.load(Acquire) }

	/// # Cancel.
	///
	/// Sets the flag. Idempotent.
	pub fn cancel(&self) { self.0.store(true, Release); }

	#[must_use]
	/// # Inner Clone.
	///
	/// Exposes the raw `Arc` for call sites that need to hand the flag to
	/// APIs expecting that type directly rather than a `KillSwitch`.
	pub fn inner(&self) -> Arc<AtomicBool> { Arc::clone(&self.0) }
}



#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn t_cancel() {
		let a = KillSwitch::new();
		let b = a.clone();
		assert!(! a.killed());
		assert!(! b.killed());

		b.cancel();
		assert!(a.killed());
		assert!(b.killed());
	}
}
