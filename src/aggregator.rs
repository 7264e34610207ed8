/*!
# Cuerip: Aggregator (Cue-sheet Builder)

Walks a prioritized list of [`Provider`]s in six ordered phases (spec.md
§4.5), merging each provider's chosen match into one [`CueSheet`] under a
configurable [`MergePolicy`]. Shaped after the teacher's single-worker,
checked-between-steps loop idiom (`rip/mod.rs`), generalised from a fixed
two-database check into an open-ended provider walk.
*/

use crate::{
	CueError,
	abort::KillSwitch,
	model::{CueSheet, RemFieldKind},
	provider::{CapabilitySet, MatchRecord, Provider},
};

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
/// # Merge Policy.
pub enum MergePolicy {
	/// # Stop After the First Successful Provider Merge.
	PickOne,
	/// # Merge Every Provider With at Least One Match.
	CombineAny,
	/// # Merge Only Providers Whose Chosen Record Matches the Resolved UPC.
	CombineUpcBound,
}

/// # Aggregator.
///
/// Inputs are fixed at construction time; any later attempt to change them
/// (not offered by this type — there is no setter once [`run`](Self::run)
/// has been called) would be a programming error caught by the one-shot
/// API shape rather than a runtime check against a `started` flag, since
/// the whole configuration is consumed by `run` in one call.
pub struct Aggregator {
	rem_wishlist: Vec<RemFieldKind>,
	merge_policy: MergePolicy,
	require_upc_match: bool,
	continue_on_error: bool,
	kill: KillSwitch,
}

/// # Aggregation Outcome.
pub struct AggregateResult {
	cuesheet: CueSheet,
	found_release: bool,
	front_cover: Option<Vec<u8>>,
	back_cover: Option<Vec<u8>>,
	canceled: bool,
}

impl AggregateResult {
	#[must_use]
	/// # Found a Release?
	pub const fn found_release(&self) -> bool { self.found_release }

	#[must_use]
	/// # Merged Cue Sheet.
	pub const fn get_cuesheet(&self) -> &CueSheet { &self.cuesheet }

	#[must_use]
	/// # Found Front Cover?
	pub const fn found_front_cover(&self) -> bool { self.front_cover.is_some() }

	#[must_use]
	/// # Front Cover Bytes.
	pub fn get_front_cover(&self) -> Option<&[u8]> { self.front_cover.as_deref() }

	#[must_use]
	/// # Found Back Cover?
	pub const fn found_back_cover(&self) -> bool { self.back_cover.is_some() }

	#[must_use]
	/// # Back Cover Bytes.
	pub fn get_back_cover(&self) -> Option<&[u8]> { self.back_cover.as_deref() }

	#[must_use]
	/// # Canceled?
	pub const fn canceled(&self) -> bool { self.canceled }
}

impl Aggregator {
	#[must_use]
	/// # New.
	pub fn new(rem_wishlist: Vec<RemFieldKind>, merge_policy: MergePolicy, require_upc_match: bool) -> Self {
		Self {
			rem_wishlist,
			merge_policy,
			require_upc_match,
			continue_on_error: false,
			kill: KillSwitch::new(),
		}
	}

	#[must_use]
	/// # Continue on Per-provider Error.
	pub const fn with_continue_on_error(mut self, v: bool) -> Self {
		self.continue_on_error = v;
		self
	}

	#[must_use]
	/// # Kill Switch Handle.
	pub fn kill_switch(&self) -> KillSwitch { self.kill.clone() }

	/// # Run.
	///
	/// Consumes the preliminary cue sheet, disc length, optional UPC, and
	/// an ordered provider list, walking all six phases.
	///
	/// # Errors
	/// Returns the first provider error encountered, unless
	/// [`with_continue_on_error`](Self::with_continue_on_error) was set, in
	/// which case the offending provider's state is cleared and the walk
	/// proceeds.
	pub fn run(
		&self,
		preliminary: CueSheet,
		length_sectors: u32,
		upc: Option<&str>,
		providers: &[&dyn Provider],
	) -> Result<AggregateResult, CueError> {
		let mut cuesheet = preliminary;
		let mut upc = upc.map(str::to_owned);
		let upc_given = upc.is_some();
		let mut chosen: Vec<i64> = vec![-1; providers.len()];
		let mut canceled = false;
		let mut front_cover = None;
		let mut back_cover = None;

		// Phase 1: disc-direct query.
		let mut primary_idx = None;
		for (idx, p) in providers.iter().enumerate() {
			if self.kill.killed() { canceled = true; break; }
			if p.capabilities().contains(CapabilitySet::PRIMARY) { primary_idx = Some(idx); }

			if p.capabilities().contains(CapabilitySet::DISC) {
				tracing::debug!(provider = ?p.kind(), "aggregator phase 1: disc query");
				self.call_provider(*p, self.continue_on_error, || p.query_by_disc(&cuesheet, length_sectors, upc.as_deref()))?;
			}
			else { p.clear(); }
		}

		// Phase 2: link via primary.
		if ! canceled {
			if let Some(pi) = primary_idx {
				let primary = providers[pi];
				for (idx, p) in providers.iter().enumerate() {
					if idx == pi { continue; }
					if self.kill.killed() { canceled = true; break; }
					if p.n_matches() == 0 && p.capabilities().contains(CapabilitySet::LINKED) {
						tracing::debug!(provider = ?p.kind(), "aggregator phase 2: link via primary");
						self.call_provider(*p, self.continue_on_error, || p.query_linked(primary, upc.as_deref()))?;
					}
				}
			}
		}

		// Phase 3: UPC resolution.
		if ! canceled {
			if upc.is_none() && ! self.require_upc_match {
				'outer: for p in providers {
					for i in 0..p.n_matches() {
						let rec = p.get(i)?;
						if ! rec.album_upc.is_empty() {
							upc = Some(rec.album_upc);
							break 'outer;
						}
					}
				}
			}

			if let Some(upc_val) = upc.clone() {
				for (idx, p) in providers.iter().enumerate() {
					if self.kill.killed() { canceled = true; break; }

					let mut found = -1_i64;
					for i in 0..p.n_matches() {
						let rec = p.get(i)?;
						if rec.album_upc == upc_val { found = i as i64; break; }
					}
					if found < 0 && p.capabilities().contains(CapabilitySet::UPC_SEARCH) {
						let n = self.call_provider(*p, self.continue_on_error, || p.search_by_upc(&upc_val, None))?;
						if n > 0 { found = 0; }
					}
					chosen[idx] = found;
				}
			}
		}

		// Phase 4: REM field slot reservation.
		for _ in &self.rem_wishlist { cuesheet.push_rem(String::new()); }

		// Phase 5: merge.
		let mut matched = false;
		let any_recid = upc.is_none() || self.merge_policy != MergePolicy::CombineUpcBound;

		if ! canceled && upc.is_some() {
			for (idx, p) in providers.iter().enumerate() {
				if matched && self.merge_policy == MergePolicy::PickOne { break; }
				if self.kill.killed() { canceled = true; break; }
				if chosen[idx] >= 0 {
					let rec = p.get(chosen[idx] as usize)?;
					self.merge_record(&mut cuesheet, &rec, *p, &mut front_cover, &mut back_cover);
					matched = true;
				}
			}
		}

		if ! canceled && (! self.require_upc_match || upc.is_none()) {
			for (idx, p) in providers.iter().enumerate() {
				if matched && self.merge_policy == MergePolicy::PickOne { break; }
				if self.kill.killed() { canceled = true; break; }
				if p.n_matches() == 0 { continue; }

				let recid = if chosen[idx] >= 0 { chosen[idx] as usize }
					else if any_recid { 0 }
					else { continue };

				let rec = p.get(recid)?;
				self.merge_record(&mut cuesheet, &rec, *p, &mut front_cover, &mut back_cover);
				matched = true;
			}
		}

		// Phase 6: compact REM.
		cuesheet.compact_rems();

		tracing::info!(found_release = matched, canceled, "aggregator run complete");

		Ok(AggregateResult { cuesheet, found_release: matched, front_cover, back_cover, canceled })
	}

	fn call_provider<F>(&self, p: &dyn Provider, continue_on_error: bool, f: F) -> Result<usize, CueError>
	where F: FnOnce() -> Result<usize, CueError> {
		match f() {
			Ok(n) => Ok(n),
			Err(err) if continue_on_error => {
				tracing::warn!(provider = ?p.kind(), %err, "provider query failed, continuing");
				p.clear();
				Ok(0)
			},
			Err(err) => Err(err),
		}
	}

	fn merge_record(
		&self,
		cuesheet: &mut CueSheet,
		rec: &MatchRecord,
		provider: &dyn Provider,
		front_cover: &mut Option<Vec<u8>>,
		back_cover: &mut Option<Vec<u8>>,
	) {
		cuesheet.fill_performer_songwriter(&rec.album_artist, &rec.album_composer);
		cuesheet.fill_title(&rec.album_title);

		for (i, trk) in rec.tracks.iter().enumerate() {
			let number = i as u8 + 1;
			if let Some(track) = cuesheet.track_mut(number) {
				track.fill_title(&trk.effective_title());
				track.fill_performer_songwriter(&trk.artist, &trk.composer);
				if track.isrc().is_none() && ! trk.isrc.is_empty() {
					let _ = track.set_isrc(&trk.isrc);
				}
			}
		}

		for (i, kind) in self.rem_wishlist.iter().enumerate() {
			let Some(slot) = cuesheet.rem_mut(i) else { continue; };
			if ! slot.is_empty() { continue; }
			if let Some(value) = rem_value(rec, *kind) {
				*slot = format!("{} {value}", kind.tag());
			}
		}

		if provider.capabilities().contains(CapabilitySet::IMAGE) {
			if front_cover.is_none() {
				if let Some(bytes) = &rec.front_bytes { *front_cover = Some(bytes.clone()); }
			}
			if back_cover.is_none() {
				if let Some(bytes) = &rec.back_bytes { *back_cover = Some(bytes.clone()); }
			}
		}
	}
}

/// # REM-field Value Extraction.
///
/// `DISC`/`DISCS` are only materialised for multi-disc releases, per
/// spec.md §4.5's merge rule.
fn rem_value(rec: &MatchRecord, kind: RemFieldKind) -> Option<String> {
	match kind {
		RemFieldKind::Dbinfo if ! rec.release_id.is_empty() => Some(rec.release_id.clone()),
		RemFieldKind::Genre if ! rec.genre.is_empty() => Some(rec.genre.clone()),
		RemFieldKind::Date if ! rec.date.is_empty() => Some(rec.date.clone()),
		RemFieldKind::Country if ! rec.country.is_empty() => Some(rec.country.clone()),
		RemFieldKind::Upc if ! rec.album_upc.is_empty() => Some(rec.album_upc.clone()),
		RemFieldKind::Label if ! rec.album_label.is_empty() => Some(rec.album_label.clone()),
		RemFieldKind::Catno if ! rec.album_catno.is_empty() => Some(rec.album_catno.clone()),
		RemFieldKind::Disc if rec.total_discs > 1 && rec.disc_number > 0 => Some(rec.disc_number.to_string()),
		RemFieldKind::Discs if rec.total_discs > 1 => Some(rec.total_discs.to_string()),
		RemFieldKind::Asin if ! rec.album_asin.is_empty() => Some(rec.album_asin.clone()),
		_ => None,
	}
}



#[cfg(test)]
mod tests {
	use super::*;
	use crate::{
		model::TrackKind,
		provider::{MockProvider, ProviderId, TrackRecord},
	};

	fn base_cuesheet() -> CueSheet {
		let mut cs = CueSheet::default();
		cs.push_track(crate::model::Track::new(1, TrackKind::Audio).unwrap()).unwrap();
		cs.push_track(crate::model::Track::new(2, TrackKind::Audio).unwrap()).unwrap();
		cs
	}

	fn record(upc: &str, title: &str) -> MatchRecord {
		MatchRecord {
			release_id: "r1".into(),
			album_title: title.into(),
			album_upc: upc.into(),
			total_discs: 1,
			tracks: vec![
				TrackRecord { title: "T1".into(), ..TrackRecord::default() },
				TrackRecord { title: "T2".into(), ..TrackRecord::default() },
			],
			..MatchRecord::default()
		}
	}

	#[test]
	fn t_pick_one_merges_single_provider() {
		let mb = MockProvider::new(ProviderId::MusicBrainz, vec![record("111", "Album One")]);
		let providers: Vec<&dyn Provider> = vec![&mb];

		let agg = Aggregator::new(vec![RemFieldKind::Upc], MergePolicy::PickOne, false);
		let out = agg.run(base_cuesheet(), 100, None, &providers).unwrap();

		assert!(out.found_release());
		assert_eq!(out.get_cuesheet().title(), "Album One");
		assert_eq!(out.get_cuesheet().track(1).unwrap().title(), "T1");
		assert!(out.get_cuesheet().rems().iter().any(|r| r.starts_with("UPC")));
	}

	#[test]
	fn t_combine_upc_bound_no_match() {
		let discogs = MockProvider::new(ProviderId::Discogs, vec![]);
		let providers: Vec<&dyn Provider> = vec![&discogs];

		let agg = Aggregator::new(vec![], MergePolicy::CombineUpcBound, true);
		let out = agg.run(base_cuesheet(), 100, Some("999"), &providers).unwrap();

		assert!(! out.found_release());
		assert!(out.get_cuesheet().title().is_empty());
	}

	#[test]
	fn t_rem_compaction_drops_empty() {
		let providers: Vec<&dyn Provider> = vec![];
		let agg = Aggregator::new(vec![RemFieldKind::Genre, RemFieldKind::Date], MergePolicy::CombineAny, false);
		let out = agg.run(base_cuesheet(), 100, None, &providers).unwrap();
		assert!(out.get_cuesheet().rems().is_empty());
	}
}
