/*!
# Cuerip: Lossless-packed Sink

A hand-rolled, zstd-backed container (no claim to reproduce any real codec's
on-disk format — file-format specifics are explicitly out of scope). Layout:

```text
offset  size  meaning
0       4     magic "CRPK"
4       1     version (1)
5       8     total sample count (LE u64, placeholder until postamble)
13      4     cue-sheet tag length in bytes (LE u32, 0 if none)
17      N     cue-sheet tag UTF-8 bytes
17+N    ..    zstd-compressed raw PCM payload
```
*/

use crate::{
	CueError,
	model::CueSheet,
	sink::{LockSign, Sink, SinkLock, Phase},
};
use std::{
	fs::File,
	io::{Read, Seek, SeekFrom, Write},
	path::{Path, PathBuf},
	sync::Mutex,
};

/// # Container Magic.
const MAGIC: &[u8; 4] = b"CRPK";

/// # Container Version.
const VERSION: u8 = 1;

/// # Header Length (Fixed Part).
const HEADER_LEN: u64 = 4 + 1 + 8 + 4;

#[derive(Default)]
/// # Mutable Sink State.
struct State {
	file: Option<File>,
	raw: Vec<u8>,
	samples: u64,
	tag: Option<String>,
}



/// # Lossless-packed Sink.
pub struct PackedSink {
	path: PathBuf,
	lock: SinkLock,
	state: Mutex<State>,
}

impl PackedSink {
	#[must_use]
	/// # New.
	pub fn new<P: AsRef<Path>>(path: P) -> Self {
		Self {
			path: path.as_ref().to_path_buf(),
			lock: SinkLock::default(),
			state: Mutex::new(State::default()),
		}
	}
}

impl Sink for PackedSink {
	fn is_locked(&self) -> bool { self.lock.is_locked() }

	fn lock(&self, sign: LockSign) { self.lock.lock(sign); }

	fn try_lock(&self, sign: LockSign) -> bool { self.lock.try_lock(sign) }

	fn unlock(&self, sign: LockSign) -> bool { self.lock.unlock(sign) }

	fn wait_till_unlock(&self) { self.lock.wait_till_unlock(); }

	fn write_preamble(&self, sign: LockSign) -> Result<(), CueError> {
		self.lock.advance(sign, &[Phase::Locked], Phase::Preamble)?;

		let mut file = File::create(&self.path)
			.map_err(|_| CueError::Device(crate::error::DeviceErrorKind::OpenFailed))?;

		// Placeholder header: magic, version, zeroed sample count, zeroed tag length.
		file.write_all(MAGIC).map_err(|_| CueError::Bug("header write failed"))?;
		file.write_all(&[VERSION]).map_err(|_| CueError::Bug("header write failed"))?;
		file.write_all(&0_u64.to_le_bytes()).map_err(|_| CueError::Bug("header write failed"))?;
		file.write_all(&0_u32.to_le_bytes()).map_err(|_| CueError::Bug("header write failed"))?;

		let mut guard = self.state.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
		guard.file = Some(file);
		guard.raw.clear();
		guard.samples = 0;
		Ok(())
	}

	fn write_frame(&self, samples: &[u8], n_samples: usize, sign: LockSign) -> Result<usize, CueError> {
		self.lock.advance(sign, &[Phase::Preamble, Phase::Streaming], Phase::Streaming)?;

		let mut guard = self.state.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
		if guard.file.is_none() { return Err(CueError::ProtocolViolation); }

		let want = n_samples * 4;
		let want = want.min(samples.len());
		guard.raw.extend_from_slice(&samples[..want]);
		let written = want / 4;
		guard.samples += written as u64;
		Ok(written)
	}

	fn write_postamble(&self, sign: LockSign) -> Result<(), CueError> {
		self.lock.advance(sign, &[Phase::Streaming, Phase::Preamble], Phase::Postamble)?;

		let mut guard = self.state.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
		let mut file = guard.file.take().ok_or(CueError::ProtocolViolation)?;

		let tag_bytes = guard.tag.as_deref().unwrap_or("").as_bytes().to_vec();
		let compressed = {
			let mut encoder = zstd::stream::Encoder::new(
				Vec::with_capacity(guard.raw.len() / 2),
				zstd::DEFAULT_COMPRESSION_LEVEL,
			).map_err(|_| CueError::Bug("zstd init failed"))?;
			encoder.write_all(&guard.raw).map_err(|_| CueError::Bug("zstd write failed"))?;
			encoder.finish().map_err(|_| CueError::Bug("zstd finish failed"))?
		};

		file.write_all(&tag_bytes).map_err(|_| CueError::Bug("tag write failed"))?;
		file.write_all(&compressed).map_err(|_| CueError::Bug("payload write failed"))?;

		// Rewrite the placeholder sample count and tag length.
		file.seek(SeekFrom::Start(5)).map_err(|_| CueError::Bug("seek failed"))?;
		file.write_all(&guard.samples.to_le_bytes()).map_err(|_| CueError::Bug("header rewrite failed"))?;
		file.write_all(&(tag_bytes.len() as u32).to_le_bytes()).map_err(|_| CueError::Bug("header rewrite failed"))?;

		guard.raw.clear();
		Ok(())
	}

	fn cuesheet_embeddable(&self) -> bool { true }

	fn set_cuesheet(&self, cs: &CueSheet) -> Result<(), CueError> {
		let text = crate::cue_text::render(cs);
		let mut guard = self.state.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
		guard.tag = Some(text);
		Ok(())
	}
}

/// # Read Back a Packed Container (Test/Diagnostic Helper).
#[cfg(test)]
fn read_back(path: &Path) -> (u64, String, Vec<u8>) {
	let mut file = File::open(path).expect("open failed");
	let mut magic = [0_u8; 4];
	file.read_exact(&mut magic).unwrap();
	assert_eq!(&magic, MAGIC);
	let mut version = [0_u8; 1];
	file.read_exact(&mut version).unwrap();
	let mut samples_buf = [0_u8; 8];
	file.read_exact(&mut samples_buf).unwrap();
	let samples = u64::from_le_bytes(samples_buf);
	let mut tag_len_buf = [0_u8; 4];
	file.read_exact(&mut tag_len_buf).unwrap();
	let tag_len = u32::from_le_bytes(tag_len_buf) as usize;
	let mut tag_buf = vec![0_u8; tag_len];
	file.read_exact(&mut tag_buf).unwrap();
	let tag = String::from_utf8(tag_buf).unwrap();
	let mut rest = Vec::new();
	file.read_to_end(&mut rest).unwrap();
	let mut decoder = zstd::stream::Decoder::new(rest.as_slice()).expect("decoder failed");
	let mut raw = Vec::new();
	decoder.read_to_end(&mut raw).unwrap();
	(samples, tag, raw)
}



#[cfg(test)]
mod tests {
	use super::*;
	use tempfile::tempdir;

	#[test]
	fn t_packed_lifecycle() {
		let dir = tempdir().expect("tempdir failed");
		let path = dir.path().join("out.crpk");
		let sink = PackedSink::new(&path);
		let sign = LockSign::new(1).unwrap();

		sink.lock(sign);
		sink.write_preamble(sign).unwrap();

		let sector = vec![7_u8; 588 * 4];
		let n = sink.write_frame(&sector, 588, sign).unwrap();
		assert_eq!(n, 588);

		sink.write_postamble(sign).unwrap();
		sink.unlock(sign);

		let (samples, tag, raw) = read_back(&path);
		assert_eq!(samples, 588);
		assert!(tag.is_empty());
		assert_eq!(raw.len(), 588 * 4);
	}

	#[test]
	fn t_packed_cuesheet_tag() {
		let dir = tempdir().expect("tempdir failed");
		let path = dir.path().join("out.crpk");
		let sink = PackedSink::new(&path);
		let sign = LockSign::new(1).unwrap();

		sink.lock(sign);
		sink.write_preamble(sign).unwrap();
		assert!(sink.cuesheet_embeddable());
		sink.set_cuesheet(&CueSheet::default()).unwrap();
		sink.write_postamble(sign).unwrap();
		sink.unlock(sign);

		let (_, tag, _) = read_back(&path);
		assert!(! tag.is_empty());
	}
}
