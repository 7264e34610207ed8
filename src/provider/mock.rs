/*!
# Cuerip: Mock Provider

An in-memory [`Provider`] the test suite configures directly with canned
[`MatchRecord`]s, standing in for a real network-backed catalogue.
*/

use crate::{
	CueError,
	model::CueSheet,
	provider::{CapabilitySet, ImageSize, MatchRecord, Provider, ProviderId, track_lengths_from_cuesheet},
};
use std::{cell::Cell, sync::Mutex};

/// # Mock Provider.
pub struct MockProvider {
	id: ProviderId,
	caps: CapabilitySet,
	canned: Vec<MatchRecord>,
	matches: Mutex<Vec<MatchRecord>>,
	preferred_size: Cell<ImageSize>,
	n_disc_calls: Cell<usize>,
	n_linked_calls: Cell<usize>,
	n_upc_calls: Cell<usize>,
}

impl MockProvider {
	#[must_use]
	/// # New.
	pub fn new(id: ProviderId, canned: Vec<MatchRecord>) -> Self {
		Self {
			id,
			caps: id.default_capabilities(),
			canned,
			matches: Mutex::new(Vec::new()),
			preferred_size: Cell::new(ImageSize::Medium),
			n_disc_calls: Cell::new(0),
			n_linked_calls: Cell::new(0),
			n_upc_calls: Cell::new(0),
		}
	}

	#[must_use]
	/// # With Explicit Capabilities (Overrides the Id Default).
	pub fn with_capabilities(mut self, caps: CapabilitySet) -> Self {
		self.caps = caps;
		self
	}

	#[must_use]
	/// # Times `query_by_disc` Was Called With This Capability Present.
	pub fn n_disc_calls(&self) -> usize { self.n_disc_calls.get() }

	#[must_use]
	/// # Times `query_linked` Was Called With This Capability Present.
	pub fn n_linked_calls(&self) -> usize { self.n_linked_calls.get() }

	#[must_use]
	/// # Times `search_by_upc` Was Called With This Capability Present.
	pub fn n_upc_calls(&self) -> usize { self.n_upc_calls.get() }
}

impl Provider for MockProvider {
	fn capabilities(&self) -> CapabilitySet { self.caps }

	fn kind(&self) -> ProviderId { self.id }

	fn clear(&self) {
		self.matches.lock().unwrap_or_else(std::sync::PoisonError::into_inner).clear();
	}

	fn query_by_disc(&self, cuesheet: &CueSheet, length_sectors: u32, _upc: Option<&str>) -> Result<usize, CueError> {
		if ! self.caps.contains(CapabilitySet::DISC) { self.clear(); return Ok(0); }
		self.n_disc_calls.set(self.n_disc_calls.get() + 1);

		let cd_lengths = track_lengths_from_cuesheet(cuesheet, length_sectors);
		let aligned: Vec<MatchRecord> = self.canned.iter().cloned()
			.filter_map(|rec| if rec.total_discs > 1 { rec.align_multi_disc(&cd_lengths) } else { Some(rec) })
			.collect();
		let n = aligned.len();
		*self.matches.lock().unwrap_or_else(std::sync::PoisonError::into_inner) = aligned;
		Ok(n)
	}

	fn query_linked(&self, _primary: &dyn Provider, _upc: Option<&str>) -> Result<usize, CueError> {
		if ! self.caps.contains(CapabilitySet::LINKED) { self.clear(); return Ok(0); }
		self.n_linked_calls.set(self.n_linked_calls.get() + 1);
		let n = self.canned.len();
		*self.matches.lock().unwrap_or_else(std::sync::PoisonError::into_inner) = self.canned.clone();
		Ok(n)
	}

	fn search_by_upc(&self, _upc: &str, _narrowdown: Option<&str>) -> Result<usize, CueError> {
		if ! self.caps.contains(CapabilitySet::UPC_SEARCH) { return Ok(0); }
		self.n_upc_calls.set(self.n_upc_calls.get() + 1);
		let n = self.canned.len();
		*self.matches.lock().unwrap_or_else(std::sync::PoisonError::into_inner) = self.canned.clone();
		Ok(n)
	}

	fn search_by_artist_title(&self, _title: &str, _artist: &str, _narrowdown: Option<&str>) -> Result<usize, CueError> {
		if ! self.caps.contains(CapabilitySet::ARTIST_TITLE_SEARCH) { return Ok(0); }
		let n = self.canned.len();
		*self.matches.lock().unwrap_or_else(std::sync::PoisonError::into_inner) = self.canned.clone();
		Ok(n)
	}

	fn n_matches(&self) -> usize {
		self.matches.lock().unwrap_or_else(std::sync::PoisonError::into_inner).len()
	}

	fn get(&self, i: usize) -> Result<MatchRecord, CueError> {
		self.matches.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
			.get(i).cloned().ok_or(CueError::IndexOutOfRange)
	}

	fn set_preferred_width(&self, px: u32) { self.preferred_size.set(ImageSize::from_px(px)); }

	fn set_preferred_height(&self, px: u32) { self.preferred_size.set(ImageSize::from_px(px)); }
}



#[cfg(test)]
mod tests {
	use super::*;

	fn rec(upc: &str) -> MatchRecord {
		MatchRecord { album_upc: upc.to_owned(), ..MatchRecord::default() }
	}

	#[test]
	fn t_capability_gating() {
		let p = MockProvider::new(ProviderId::Amazon, vec![rec("123")]);
		assert_eq!(p.query_by_disc(&CueSheet::default(), 100, None).unwrap(), 0);
		assert_eq!(p.n_disc_calls(), 0);
	}

	#[test]
	fn t_canned_matches() {
		let p = MockProvider::new(ProviderId::MusicBrainz, vec![rec("999")]);
		assert_eq!(p.query_by_disc(&CueSheet::default(), 100, None).unwrap(), 1);
		assert_eq!(p.get(0).unwrap().album_upc, "999");
		assert!(matches!(p.get(1), Err(CueError::IndexOutOfRange)));
	}
}
