/*!
# Cuerip: Rip Engine

Drives the producer loop described in spec.md §4.3: derive a lock-sign, lock
every sink, walk the preamble → frame×k → postamble life-cycle on all of
them together, then unlock. Shaped after the teacher's `rip/mod.rs::Ripper`
loop (read, check `killed`, drive every sink in order) but stripped of the
re-read/AccurateRip-confidence machinery that belongs to a different,
out-of-scope feature set.
*/

use crate::{
	CueError,
	abort::KillSwitch,
	sink::{LockSign, Sink},
	source::Source,
};
use std::{
	num::NonZeroU64,
	sync::atomic::{AtomicU64, Ordering},
};

/// # Lock-sign Source.
///
/// Each engine instance gets a unique, never-reused, non-zero sign so sinks
/// can tell one session's writer from another's.
static NEXT_SIGN: AtomicU64 = AtomicU64::new(1);

fn next_sign() -> LockSign {
	let raw = NEXT_SIGN.fetch_add(1, Ordering::Relaxed);
	NonZeroU64::new(raw).unwrap_or_else(|| NonZeroU64::new(u64::MAX).unwrap_or(LockSign::MIN))
}



/// # Rip Engine.
///
/// Orchestrates a single rip session against one [`Source`] and a fixed,
/// ordered list of [`Sink`] trait objects.
pub struct RipEngine<'a> {
	sign: LockSign,
	sinks: Vec<&'a dyn Sink>,
	kill: KillSwitch,
	canceled: bool,
}

impl<'a> RipEngine<'a> {
	#[must_use]
	/// # New.
	pub fn new(sinks: Vec<&'a dyn Sink>) -> Self {
		Self { sign: next_sign(), sinks, kill: KillSwitch::new(), canceled: false }
	}

	#[must_use]
	/// # Kill Switch Handle.
	///
	/// Clone this out before calling [`run`](Self::run) from another
	/// thread so a caller elsewhere can cancel it.
	pub fn kill_switch(&self) -> KillSwitch { self.kill.clone() }

	#[must_use]
	/// # Canceled?
	///
	/// Valid only after [`run`](Self::run) has returned.
	pub fn canceled(&self) -> bool { self.canceled }

	/// # Run.
	///
	/// Locks every sink in list order, writes the preamble to each, then
	/// streams sectors from `source` to every sink until end-of-disc or
	/// cancellation, then writes the postamble and unlocks every sink —
	/// even on cancel or mid-stream error, so partial output stays
	/// well-formed.
	///
	/// # Errors
	/// Propagates the first sink error encountered, after still unlocking
	/// every sink this call had locked.
	pub fn run(&mut self, source: &mut dyn Source) -> Result<(), CueError> {
		tracing::info!(sign = self.sign.get(), sinks = self.sinks.len(), "rip session starting");

		for sink in &self.sinks { sink.lock(self.sign); }

		let result = self.run_inner(source);

		for sink in &self.sinks { sink.unlock(self.sign); }

		match &result {
			Ok(()) => tracing::info!(canceled = self.canceled, "rip session complete"),
			Err(err) => tracing::error!(%err, "rip session aborted"),
		}

		result
	}

	fn run_inner(&mut self, source: &mut dyn Source) -> Result<(), CueError> {
		for sink in &self.sinks { sink.write_preamble(self.sign)?; }

		loop {
			if self.kill.killed() {
				self.canceled = true;
				tracing::warn!("rip session canceled mid-stream");
				break;
			}

			let Some(sector) = source.read_sector()? else { break; };
			let n = usize::from(source.samples_per_sector());
			for sink in &self.sinks { sink.write_frame(sector, n, self.sign)?; }
		}

		for sink in &self.sinks { sink.write_postamble(self.sign)?; }
		Ok(())
	}
}



#[cfg(test)]
mod tests {
	use super::*;
	use crate::sink::WavSink;
	use crate::source::{MockSource, mock::MockTrackSpec};

	fn sectors(n: usize) -> Vec<[u8; 2352]> { vec![[0_u8; 2352]; n] }

	#[test]
	fn t_full_rip() {
		let dir = tempfile::tempdir().expect("tempdir failed");
		let sink = WavSink::new(dir.path().join("out.wav"));
		let mut source = MockSource::new(
			sectors(25).into_iter().map(|s| {
				let mut out = [0_u8; 588 * 4];
				out.copy_from_slice(&s[..588 * 4]);
				out
			}).collect(),
			vec![
				MockTrackSpec { length_sectors: 10, isrc: None, pregap_sectors: 0 },
				MockTrackSpec { length_sectors: 15, isrc: None, pregap_sectors: 0 },
			],
		);

		let sinks: Vec<&dyn Sink> = vec![&sink];
		let mut engine = RipEngine::new(sinks);
		engine.run(&mut source).unwrap();

		assert!(! engine.canceled());
		assert!(! sink.is_locked());

		let data = std::fs::read(dir.path().join("out.wav")).unwrap();
		assert_eq!(data.len(), 44 + 25 * 588 * 4);
	}

	#[test]
	fn t_cancel_mid_stream() {
		let dir = tempfile::tempdir().expect("tempdir failed");
		let sink = WavSink::new(dir.path().join("out.wav"));
		let mut source = MockSource::new(vec![[0_u8; 588 * 4]; 100], vec![]);

		let sinks: Vec<&dyn Sink> = vec![&sink];
		let mut engine = RipEngine::new(sinks);
		let kill = engine.kill_switch();
		kill.cancel();

		engine.run(&mut source).unwrap();
		assert!(engine.canceled());
		assert!(! sink.is_locked());
	}
}
