/*!
# Cuerip: WAVE Sink
*/

use crate::{
	CueError,
	model::CueSheet,
	sink::{LockSign, Sink, SinkLock, Phase},
};
use hound::{SampleFormat, WavSpec, WavWriter};
use std::{
	fs::File,
	io::BufWriter,
	path::{Path, PathBuf},
	sync::Mutex,
};

/// # WAVE Spec (2ch/44.1kHz/16-bit).
fn spec() -> WavSpec {
	WavSpec {
		channels: 2,
		sample_rate: 44_100,
		bits_per_sample: 16,
		sample_format: SampleFormat::Int,
	}
}



/// # WAVE Sink.
///
/// Writes a standard two-channel, 44.1kHz, 16-bit WAVE file. Header
/// placeholder/rewrite is delegated to [`hound::WavWriter`], which already
/// implements exactly the "write placeholder, seek back and patch the RIFF
/// and data-chunk sizes on finalize" life-cycle this variant requires.
pub struct WavSink {
	path: PathBuf,
	lock: SinkLock,
	writer: Mutex<Option<WavWriter<BufWriter<File>>>>,
}

impl WavSink {
	#[must_use]
	/// # New.
	pub fn new<P: AsRef<Path>>(path: P) -> Self {
		Self {
			path: path.as_ref().to_path_buf(),
			lock: SinkLock::default(),
			writer: Mutex::new(None),
		}
	}
}

impl Sink for WavSink {
	fn is_locked(&self) -> bool { self.lock.is_locked() }

	fn lock(&self, sign: LockSign) { self.lock.lock(sign); }

	fn try_lock(&self, sign: LockSign) -> bool { self.lock.try_lock(sign) }

	fn unlock(&self, sign: LockSign) -> bool { self.lock.unlock(sign) }

	fn wait_till_unlock(&self) { self.lock.wait_till_unlock(); }

	fn write_preamble(&self, sign: LockSign) -> Result<(), CueError> {
		self.lock.advance(sign, &[Phase::Locked], Phase::Preamble)?;

		let file = File::create(&self.path).map_err(|_| CueError::Device(crate::error::DeviceErrorKind::OpenFailed))?;
		let writer = WavWriter::new(BufWriter::new(file), spec())
			.map_err(|_| CueError::Bug("hound writer init failed"))?;
		*self.writer.lock().unwrap_or_else(std::sync::PoisonError::into_inner) = Some(writer);
		Ok(())
	}

	fn write_frame(&self, samples: &[u8], n_samples: usize, sign: LockSign) -> Result<usize, CueError> {
		self.lock.advance(sign, &[Phase::Preamble, Phase::Streaming], Phase::Streaming)?;

		let mut guard = self.writer.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
		let writer = guard.as_mut().ok_or(CueError::ProtocolViolation)?;

		let mut written = 0_usize;
		for chunk in samples.chunks_exact(4).take(n_samples) {
			let l = i16::from_le_bytes([chunk[0], chunk[1]]);
			let r = i16::from_le_bytes([chunk[2], chunk[3]]);
			writer.write_sample(l).map_err(|_| CueError::Bug("wav sample write failed"))?;
			writer.write_sample(r).map_err(|_| CueError::Bug("wav sample write failed"))?;
			written += 1;
		}
		Ok(written)
	}

	fn write_postamble(&self, sign: LockSign) -> Result<(), CueError> {
		self.lock.advance(sign, &[Phase::Streaming, Phase::Preamble], Phase::Postamble)?;

		let mut guard = self.writer.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
		if let Some(writer) = guard.take() {
			writer.finalize().map_err(|_| CueError::Bug("wav finalize failed"))?;
		}
		Ok(())
	}

	fn cuesheet_embeddable(&self) -> bool { false }

	fn set_cuesheet(&self, _cs: &CueSheet) -> Result<(), CueError> { Err(CueError::Unsupported) }
}



#[cfg(test)]
mod tests {
	use super::*;
	use tempfile::tempdir;

	#[test]
	fn t_wav_lifecycle() {
		let dir = tempdir().expect("tempdir failed");
		let path = dir.path().join("out.wav");
		let sink = WavSink::new(&path);
		let sign = LockSign::new(1).unwrap();

		sink.lock(sign);
		sink.write_preamble(sign).unwrap();

		// 2 sectors worth: 588 stereo samples each, zeroed.
		let sector = vec![0_u8; 588 * 4];
		for _ in 0..2 {
			let n = sink.write_frame(&sector, 588, sign).unwrap();
			assert_eq!(n, 588);
		}

		sink.write_postamble(sign).unwrap();
		assert!(sink.unlock(sign));
		assert!(! sink.is_locked());

		let data = std::fs::read(&path).expect("read failed");
		assert_eq!(data.len(), 44 + 2 * 588 * 4);

		let total = (data.len() - 8) as u32;
		assert_eq!(u32::from_le_bytes([data[4], data[5], data[6], data[7]]), total);
		let data_sz = (data.len() - 44) as u32;
		assert_eq!(u32::from_le_bytes([data[40], data[41], data[42], data[43]]), data_sz);
	}

	#[test]
	fn t_wav_wrong_sign() {
		let dir = tempdir().expect("tempdir failed");
		let sink = WavSink::new(dir.path().join("out.wav"));
		let a = LockSign::new(1).unwrap();
		let b = LockSign::new(2).unwrap();

		sink.lock(a);
		assert_eq!(sink.write_preamble(b), Err(CueError::NotOwner));
	}
}
