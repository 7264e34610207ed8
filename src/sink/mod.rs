/*!
# Cuerip: Sink

A Sink owns exactly one output file and enforces the preamble → frame×k →
postamble life-cycle behind an opaque ownership token (the lock-sign),
mirroring the "lock-by-thread-identity" anti-pattern's replacement called for
in the design notes: callers supply their own token rather than the sink
inferring identity from the calling thread.
*/

pub(crate) mod packed;
pub(crate) mod wav;

pub use packed::PackedSink;
pub use wav::WavSink;

use crate::{CueError, model::CueSheet};
use std::{
	num::NonZeroU64,
	sync::{Condvar, Mutex},
};

/// # Lock Sign.
///
/// An opaque, non-zero, caller-chosen token proving exclusive access to a
/// [`Sink`] for the duration of one session.
pub type LockSign = NonZeroU64;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
/// # Sink Phase.
///
/// The state machine each session must walk through in order, starting and
/// ending at fully unlocked (`phase: None` in [`LockState`]).
enum Phase {
	Locked,
	Preamble,
	Streaming,
	Postamble,
}

#[derive(Debug, Default)]
/// # Lock State.
struct LockState {
	sign: Option<LockSign>,
	phase: Option<Phase>,
}

/// # Sink Lock.
///
/// Shared state backing the `is_locked`/`lock`/`try_lock`/`unlock`/
/// `wait_till_unlock` surface every Sink variant implements atop.
#[derive(Debug, Default)]
pub(crate) struct SinkLock {
	state: Mutex<LockState>,
	cond: Condvar,
}

impl SinkLock {
	/// # Is Locked?
	pub(crate) fn is_locked(&self) -> bool {
		self.state.lock().unwrap_or_else(std::sync::PoisonError::into_inner).sign.is_some()
	}

	/// # Try Lock.
	///
	/// Non-blocking. Succeeds if unlocked, or if already held by `sign`.
	pub(crate) fn try_lock(&self, sign: LockSign) -> bool {
		let mut guard = self.state.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
		match guard.sign {
			None => {
				guard.sign = Some(sign);
				guard.phase = Some(Phase::Locked);
				true
			},
			Some(cur) => cur == sign,
		}
	}

	/// # Lock.
	///
	/// Blocks until the sink is unlocked or already held by `sign`.
	pub(crate) fn lock(&self, sign: LockSign) {
		let mut guard = self.state.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
		while guard.sign.is_some() && guard.sign != Some(sign) {
			guard = self.cond.wait(guard).unwrap_or_else(std::sync::PoisonError::into_inner);
		}
		if guard.sign.is_none() {
			guard.sign = Some(sign);
			guard.phase = Some(Phase::Locked);
		}
	}

	/// # Unlock.
	///
	/// Succeeds iff the current lock-sign equals `sign`.
	pub(crate) fn unlock(&self, sign: LockSign) -> bool {
		let mut guard = self.state.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
		if guard.sign == Some(sign) {
			guard.sign = None;
			guard.phase = None;
			drop(guard);
			self.cond.notify_all();
			true
		}
		else { false }
	}

	/// # Wait Till Unlock.
	pub(crate) fn wait_till_unlock(&self) {
		let mut guard = self.state.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
		while guard.sign.is_some() {
			guard = self.cond.wait(guard).unwrap_or_else(std::sync::PoisonError::into_inner);
		}
	}

	/// # Assert Phase and Advance.
	///
	/// # Errors
	/// Returns [`CueError::NotOwner`] if `sign` doesn't match the current
	/// holder, or [`CueError::ProtocolViolation`] if `from` doesn't match
	/// the current phase.
	pub(crate) fn advance(&self, sign: LockSign, from: &[Phase], to: Phase) -> Result<(), CueError> {
		let mut guard = self.state.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
		if guard.sign != Some(sign) { return Err(CueError::NotOwner); }
		match guard.phase {
			Some(p) if from.contains(&p) => { guard.phase = Some(to); Ok(()) },
			_ => Err(CueError::ProtocolViolation),
		}
	}
}



/// # Sink.
///
/// Contract shared by every output-file writer variant (`WavSink`,
/// `PackedSink`).
pub trait Sink {
	/// # Is Locked?
	fn is_locked(&self) -> bool;

	/// # Lock (Blocking).
	fn lock(&self, sign: LockSign);

	/// # Try Lock (Non-blocking).
	fn try_lock(&self, sign: LockSign) -> bool;

	/// # Unlock.
	fn unlock(&self, sign: LockSign) -> bool;

	/// # Wait Till Unlock.
	fn wait_till_unlock(&self);

	/// # Write Preamble.
	///
	/// # Errors
	/// Returns [`CueError::NotOwner`] or [`CueError::ProtocolViolation`].
	fn write_preamble(&self, sign: LockSign) -> Result<(), CueError>;

	/// # Write One Frame.
	///
	/// Returns the number of samples actually written.
	///
	/// # Errors
	/// Returns [`CueError::NotOwner`] or [`CueError::ProtocolViolation`].
	fn write_frame(&self, samples: &[u8], n_samples: usize, sign: LockSign) -> Result<usize, CueError>;

	/// # Write Postamble.
	///
	/// # Errors
	/// Returns [`CueError::NotOwner`] or [`CueError::ProtocolViolation`].
	fn write_postamble(&self, sign: LockSign) -> Result<(), CueError>;

	/// # Can Embed a Cue Sheet?
	fn cuesheet_embeddable(&self) -> bool;

	/// # Set Cue Sheet.
	///
	/// # Errors
	/// Returns [`CueError::Unsupported`] if this variant can't embed one.
	fn set_cuesheet(&self, cs: &CueSheet) -> Result<(), CueError>;
}



#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn t_try_lock_exclusivity() {
		let lock = SinkLock::default();
		let a = LockSign::new(1).unwrap();
		let b = LockSign::new(2).unwrap();

		assert!(lock.try_lock(a));
		assert!(! lock.try_lock(b));
		assert!(lock.try_lock(a)); // Same sign re-acquires.
		assert!(lock.unlock(a));
		assert!(! lock.is_locked());
		assert!(! lock.unlock(a)); // Already unlocked.
	}

	#[test]
	fn t_phase_order() {
		let lock = SinkLock::default();
		let a = LockSign::new(1).unwrap();
		assert!(lock.try_lock(a));

		// Can't stream before preamble.
		assert!(lock.advance(a, &[Phase::Locked], Phase::Streaming).is_err());

		lock.advance(a, &[Phase::Locked], Phase::Preamble).unwrap();
		lock.advance(a, &[Phase::Preamble, Phase::Streaming], Phase::Streaming).unwrap();
		lock.advance(a, &[Phase::Streaming], Phase::Postamble).unwrap();

		let b = LockSign::new(2).unwrap();
		assert_eq!(lock.advance(b, &[Phase::Postamble], Phase::Locked), Err(CueError::NotOwner));
	}
}
