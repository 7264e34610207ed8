/*!
# Cuerip: Generic REST Provider

Because the wire vocabulary of any specific third-party catalogue is
explicitly out of scope (spec.md §1), this is one generic, capability-
configured HTTP+JSON backend, instantiated once per [`ProviderId`] variant
rather than one bespoke client per catalogue (spec.md §9's redesign). Each
instance is handed a base URL and its capability set at construction; the
JSON shape it expects from that URL is this module's own minimal match-list
convention (a `matches` array of uniform record objects), not any particular
catalogue's real response format.
*/

use crate::{
	CueError,
	error::DecodeErrorKind,
	model::CueSheet,
	provider::{
		CapabilitySet, ImageSize, MatchRecord, Provider, ProviderId, TrackRecord,
		track_lengths_from_cuesheet,
		transport::Transport,
	},
};
use std::{
	cell::Cell,
	sync::Mutex,
};

/// # Generic REST-backed Provider.
pub struct RestProvider {
	id: ProviderId,
	caps: CapabilitySet,
	base_url: String,
	transport: Transport,
	matches: Mutex<Vec<MatchRecord>>,
	preferred_size: Cell<ImageSize>,
}

impl RestProvider {
	#[must_use]
	/// # New.
	pub fn new(id: ProviderId, base_url: impl Into<String>) -> Self {
		Self {
			id,
			caps: id.default_capabilities(),
			base_url: base_url.into(),
			transport: Transport::new(),
			matches: Mutex::new(Vec::new()),
			preferred_size: Cell::new(ImageSize::Medium),
		}
	}

	fn parse_matches(&self, body: &serde_json::Value) -> Result<Vec<MatchRecord>, CueError> {
		let arr = body.get("matches").and_then(serde_json::Value::as_array)
			.ok_or(CueError::Decode(DecodeErrorKind::SchemaMismatch))?;

		let mut out = Vec::with_capacity(arr.len());
		for item in arr {
			let s = |key: &str| item.get(key).and_then(serde_json::Value::as_str).unwrap_or("").to_owned();
			let n = |key: &str| item.get(key).and_then(serde_json::Value::as_u64).unwrap_or(0);

			let tracks = item.get("tracks").and_then(serde_json::Value::as_array)
				.map(|tracks| tracks.iter().map(|t| {
					let ts = |key: &str| t.get(key).and_then(serde_json::Value::as_str).unwrap_or("").to_owned();
					let parent_title = t.get("parent_title").and_then(serde_json::Value::as_str).map(str::to_owned);
					let sub_track_position = t.get("sub_track_index").and_then(serde_json::Value::as_u64)
						.zip(t.get("sub_track_count").and_then(serde_json::Value::as_u64))
						.map(|(i, n)| (i as u32, n as u32));
					TrackRecord {
						title: ts("title"),
						artist: ts("artist"),
						composer: ts("composer"),
						isrc: ts("isrc"),
						length_secs: t.get("length_secs").and_then(serde_json::Value::as_u64).map(|v| v as u32),
						parent_title,
						sub_track_position,
					}
				}).collect())
				.unwrap_or_default();

			let disc_track_counts = item.get("disc_track_counts").and_then(serde_json::Value::as_array)
				.map(|arr| arr.iter().filter_map(serde_json::Value::as_u64).map(|v| v as u32).collect())
				.unwrap_or_default();

			let relations = item.get("relations").and_then(serde_json::Value::as_object)
				.map(|rels| rels.iter()
					.filter_map(|(k, v)| v.as_str().map(|v| (k.clone(), v.to_owned())))
					.collect())
				.unwrap_or_default();

			out.push(MatchRecord {
				release_id: s("release_id"),
				album_title: s("album_title"),
				album_artist: s("album_artist"),
				album_composer: s("album_composer"),
				album_upc: s("album_upc"),
				album_label: s("album_label"),
				album_catno: s("album_catno"),
				album_asin: s("album_asin"),
				genre: s("genre"),
				date: s("date"),
				country: s("country"),
				disc_number: n("disc_number") as u8,
				total_discs: n("total_discs") as u8,
				tracks,
				disc_track_counts,
				relations,
				front_url: item.get("front_url").and_then(serde_json::Value::as_str).map(str::to_owned),
				back_url: item.get("back_url").and_then(serde_json::Value::as_str).map(str::to_owned),
				front_bytes: None,
				back_bytes: None,
			});
		}
		Ok(out)
	}

	fn run_query(&self, url: &str) -> Result<usize, CueError> {
		tracing::debug!(provider = ?self.id, url, "provider query");
		let body = self.transport.get_json(url)?;
		let mut matches = self.parse_matches(&body)?;

		if self.caps.contains(CapabilitySet::IMAGE) {
			for rec in &mut matches {
				if let Some(u) = rec.front_url.clone() {
					rec.front_bytes = self.transport.get_bytes(&u).ok();
				}
				if let Some(u) = rec.back_url.clone() {
					rec.back_bytes = self.transport.get_bytes(&u).ok();
				}
			}
		}

		let n = matches.len();
		*self.matches.lock().unwrap_or_else(std::sync::PoisonError::into_inner) = matches;
		tracing::info!(provider = ?self.id, n_matches = n, "provider query complete");
		Ok(n)
	}
}

impl Provider for RestProvider {
	fn capabilities(&self) -> CapabilitySet { self.caps }

	fn kind(&self) -> ProviderId { self.id }

	fn clear(&self) {
		self.matches.lock().unwrap_or_else(std::sync::PoisonError::into_inner).clear();
	}

	fn query_by_disc(&self, cuesheet: &CueSheet, length_sectors: u32, upc: Option<&str>) -> Result<usize, CueError> {
		if ! self.caps.contains(CapabilitySet::DISC) { self.clear(); return Ok(0); }

		let audio_lbas: Vec<i32> = cuesheet.tracks().iter()
			.filter_map(|t| t.indexes().iter().find(|i| i.number() == 1).map(|i| i.time() as i32))
			.collect();
		let discid = cdtoc::Toc::from_parts(audio_lbas, None, length_sectors as i32)
			.map_or_else(|_| "unknown".to_owned(), |toc| toc.cddb_id());

		let url = format!(
			"{}/disc/{discid}{}",
			self.base_url,
			upc.map_or_else(String::new, |u| format!("?upc={u}")),
		);
		if self.run_query(&url)? == 0 { return Ok(0); }

		let cd_lengths = track_lengths_from_cuesheet(cuesheet, length_sectors);
		let mut guard = self.matches.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
		let aligned: Vec<MatchRecord> = std::mem::take(&mut *guard).into_iter()
			.filter_map(|rec| if rec.total_discs > 1 { rec.align_multi_disc(&cd_lengths) } else { Some(rec) })
			.collect();
		let n_aligned = aligned.len();
		*guard = aligned;
		Ok(n_aligned)
	}

	fn query_linked(&self, primary: &dyn Provider, upc: Option<&str>) -> Result<usize, CueError> {
		if ! self.caps.contains(CapabilitySet::LINKED) { self.clear(); return Ok(0); }

		let Some(rel) = primary.relation_url(0, self.id_tag())? else {
			self.clear();
			return Ok(0);
		};

		let url = format!("{rel}{}", upc.map_or_else(String::new, |u| format!("?upc={u}")));
		self.run_query(&url)
	}

	fn search_by_upc(&self, upc: &str, narrowdown: Option<&str>) -> Result<usize, CueError> {
		if ! self.caps.contains(CapabilitySet::UPC_SEARCH) { return Ok(0); }
		let url = format!(
			"{}/search?upc={upc}{}",
			self.base_url,
			narrowdown.map_or_else(String::new, |n| format!("&q={n}")),
		);
		self.run_query(&url)
	}

	fn search_by_artist_title(&self, title: &str, artist: &str, narrowdown: Option<&str>) -> Result<usize, CueError> {
		if ! self.caps.contains(CapabilitySet::ARTIST_TITLE_SEARCH) { return Ok(0); }
		let url = format!(
			"{}/search?title={title}&artist={artist}{}",
			self.base_url,
			narrowdown.map_or_else(String::new, |n| format!("&q={n}")),
		);
		self.run_query(&url)
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

impl RestProvider {
	/// # Relation-type Tag Used to Look This Provider Up on the Primary.
	fn id_tag(&self) -> &'static str {
		match self.id {
			ProviderId::MusicBrainz => "musicbrainz",
			ProviderId::Discogs => "discogs",
			ProviderId::Amazon => "amazon",
			ProviderId::LastFm => "lastfm",
		}
	}
}



#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn t_parse_matches() {
		let provider = RestProvider::new(ProviderId::Discogs, "https://example.invalid");
		let body = serde_json::json!({
			"matches": [{
				"release_id": "r1",
				"album_title": "Test Album",
				"album_upc": "0123456789012",
				"total_discs": 1,
				"tracks": [{"title": "One", "isrc": "USRC17607839"}],
			}],
		});
		let parsed = provider.parse_matches(&body).unwrap();
		assert_eq!(parsed.len(), 1);
		assert_eq!(parsed[0].album_title, "Test Album");
		assert_eq!(parsed[0].tracks[0].isrc, "USRC17607839");
	}

	#[test]
	fn t_capability_gated_noop() {
		let provider = RestProvider::new(ProviderId::Amazon, "https://example.invalid");
		// Amazon has no DISC capability; query_by_disc must no-op.
		assert_eq!(provider.query_by_disc(&CueSheet::default(), 100, None).unwrap(), 0);
	}
}
