/*!
# Cuerip: Mock Source

An in-memory [`Source`] used by the test suite (and any caller without a
real drive). No hardware dependency, so it's always available regardless of
the `cdio` feature.
*/

use crate::{
	CueError,
	Catalog,
	model::{CueSheet, Index, Track, TrackKind},
	source::{LengthUnit, Source},
};

/// # Bytes Per Sector (16-bit stereo, 588 samples).
const BYTES_PER_SECTOR: usize = 588 * 4;

#[derive(Debug, Clone, Default)]
/// # One Simulated Track.
pub struct MockTrackSpec {
	/// # Length in Sectors.
	pub length_sectors: u32,
	/// # ISRC, if any (may be malformed; silently dropped if so).
	pub isrc: Option<String>,
	/// # Pregap in Sectors (only meaningful for track 1).
	pub pregap_sectors: u32,
}

/// # Mock Source.
///
/// Holds a flat byte buffer of sectors plus a simulated TOC.
pub struct MockSource {
	sectors: Vec<[u8; BYTES_PER_SECTOR]>,
	pos: usize,
	tracks: Vec<MockTrackSpec>,
	catalog: Option<String>,
}

impl MockSource {
	#[must_use]
	/// # New.
	pub fn new(sectors: Vec<[u8; BYTES_PER_SECTOR]>, tracks: Vec<MockTrackSpec>) -> Self {
		Self { sectors, pos: 0, tracks, catalog: None }
	}

	#[must_use]
	/// # With Catalog.
	pub fn with_catalog<S: Into<String>>(mut self, catalog: S) -> Self {
		self.catalog = Some(catalog.into());
		self
	}

	#[must_use]
	/// # Sector Byte Size.
	pub const fn sector_size() -> usize { BYTES_PER_SECTOR }
}

impl Source for MockSource {
	fn device_path(&self) -> &str { "/dev/mock" }

	fn samples_per_sector(&self) -> u16 { 588 }

	fn read_sector(&mut self) -> Result<Option<&[u8]>, CueError> {
		if self.pos >= self.sectors.len() { return Ok(None); }
		let out = &self.sectors[self.pos][..];
		self.pos += 1;
		Ok(Some(out))
	}

	fn rewind(&mut self) { self.pos = 0; }

	fn length(&self, unit: LengthUnit) -> u64 {
		let sectors = self.sectors.len() as u64;
		match unit {
			LengthUnit::Sectors => sectors,
			LengthUnit::Seconds => sectors / 75,
			LengthUnit::HalfWords => sectors * 588 * 2,
			LengthUnit::Bytes => sectors * BYTES_PER_SECTOR as u64,
		}
	}

	fn build_cuesheet(&self) -> Result<CueSheet, CueError> {
		let mut cs = CueSheet::default();

		if let Some(cat) = &self.catalog {
			// Non-well-formed catalog numbers are dropped silently.
			let _ = Catalog::try_from(cat.as_str()).map(|c| cs.set_catalog(c.as_str()));
		}

		let mut number = 0_u32;
		let mut time = 0_u32;
		for spec in &self.tracks {
			number += 1;
			let mut track = Track::new(number as u8, TrackKind::Audio)
				.ok_or(CueError::Device(crate::error::DeviceErrorKind::IdFailed))?;

			if number == 1 && spec.pregap_sectors > 0 {
				track.push_index(Index::new(0, time).ok_or(CueError::Bug("bad index"))?)?;
				track.set_pregap(spec.pregap_sectors);
				time += spec.pregap_sectors;
			}

			track.push_index(Index::new(1, time).ok_or(CueError::Bug("bad index"))?)?;
			time += spec.length_sectors;

			if let Some(isrc) = &spec.isrc {
				// Non-well-formed ISRCs are dropped silently.
				let _ = track.set_isrc(isrc);
			}

			cs.push_track(track)?;
		}

		Ok(cs)
	}
}



#[cfg(test)]
mod tests {
	use super::*;

	fn sectors(n: usize) -> Vec<[u8; BYTES_PER_SECTOR]> {
		vec![[0_u8; BYTES_PER_SECTOR]; n]
	}

	#[test]
	fn t_read_to_end() {
		let mut src = MockSource::new(sectors(3), vec![]);
		assert!(src.read_sector().unwrap().is_some());
		assert!(src.read_sector().unwrap().is_some());
		assert!(src.read_sector().unwrap().is_some());
		assert!(src.read_sector().unwrap().is_none());

		src.rewind();
		assert!(src.read_sector().unwrap().is_some());
	}

	#[test]
	fn t_build_cuesheet() {
		let src = MockSource::new(
			sectors(25),
			vec![
				MockTrackSpec { length_sectors: 10, isrc: None, pregap_sectors: 0 },
				MockTrackSpec { length_sectors: 15, isrc: Some("USRC17607839".into()), pregap_sectors: 0 },
			],
		).with_catalog("9332727016318");

		let cs = src.build_cuesheet().unwrap();
		assert_eq!(cs.len(), 2);
		assert!(cs.catalog().is_some());
		assert!(cs.track(2).unwrap().isrc().is_some());
		assert!(cs.track(1).unwrap().has_index_one());
	}

	#[test]
	fn t_build_cuesheet_drops_bad_isrc() {
		let src = MockSource::new(
			sectors(10),
			vec![MockTrackSpec { length_sectors: 10, isrc: Some("not-an-isrc".into()), pregap_sectors: 0 }],
		);
		let cs = src.build_cuesheet().unwrap();
		assert!(cs.track(1).unwrap().isrc().is_none());
	}
}
