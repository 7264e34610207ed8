/*!
# Cuerip: Provider

Providers are capability-typed black boxes (spec.md §9's "deep virtual
inheritance replaced by one trait + capability bits" redesign). A single
[`Provider`] trait covers every variant; which query shapes and accessors
are meaningful is declared by [`CapabilitySet`] rather than by a subclass
hierarchy.
*/

pub(crate) mod mock;
pub(crate) mod rest;
pub(crate) mod transport;

pub use mock::MockProvider;
pub use rest::RestProvider;

use crate::CueError;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
/// # Provider Capability Bitset.
///
/// Mirrors the teacher's `const FLAG_*: u8` + builder idiom (`rip/opts.rs`),
/// generalised to a named, typed bitset so variants declare query-shape
/// support without a subclass hierarchy.
pub struct CapabilitySet(u16);

impl CapabilitySet {
	/// # Supports `query_by_disc`.
	pub const DISC: Self = Self(0b0000_0001);
	/// # Supports `query_linked` (reachable from the primary's relations).
	pub const LINKED: Self = Self(0b0000_0010);
	/// # Supports `search_by_upc`.
	pub const UPC_SEARCH: Self = Self(0b0000_0100);
	/// # Supports `search_by_artist_title`.
	pub const ARTIST_TITLE_SEARCH: Self = Self(0b0000_1000);
	/// # Acts as the linkage hub other providers are reached through.
	pub const PRIMARY: Self = Self(0b0001_0000);
	/// # Exposes cover-art accessors.
	pub const IMAGE: Self = Self(0b0010_0000);

	#[must_use]
	/// # Empty Set.
	pub const fn empty() -> Self { Self(0) }

	#[must_use]
	/// # Raw Bits.
	pub const fn bits(self) -> u16 { self.0 }

	#[must_use]
	/// # From Raw Bits.
	pub const fn from_bits_truncate(bits: u16) -> Self { Self(bits) }

	#[must_use]
	/// # Contains?
	pub const fn contains(self, other: Self) -> bool { (self.0 & other.0) == other.0 }
}

impl std::ops::BitOr for CapabilitySet {
	type Output = Self;
	fn bitor(self, rhs: Self) -> Self { Self(self.0 | rhs.0) }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
/// # Provider Identity.
pub enum ProviderId {
	/// # MusicBrainz (direct-by-disc, primary/linkage hub).
	MusicBrainz,
	/// # Discogs (linked-via-primary, search-by-barcode).
	Discogs,
	/// # Amazon (image-only).
	Amazon,
	/// # Last.fm (search-by-artist/title, supplemental genre/date).
	LastFm,
}

impl ProviderId {
	#[must_use]
	/// # Default Capabilities.
	pub const fn default_capabilities(self) -> CapabilitySet {
		match self {
			Self::MusicBrainz => CapabilitySet::from_bits_truncate(
				CapabilitySet::DISC.bits() | CapabilitySet::PRIMARY.bits() | CapabilitySet::IMAGE.bits()
			),
			Self::Discogs => CapabilitySet::from_bits_truncate(
				CapabilitySet::LINKED.bits() | CapabilitySet::UPC_SEARCH.bits()
			),
			Self::Amazon => CapabilitySet::from_bits_truncate(
				CapabilitySet::UPC_SEARCH.bits() | CapabilitySet::IMAGE.bits()
			),
			Self::LastFm => CapabilitySet::ARTIST_TITLE_SEARCH,
		}
	}
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd)]
/// # Cover-art Size Bucket.
///
/// Requested pixel dimensions are quantised into one of these before being
/// handed to a provider, per spec.md §4.4.
pub enum ImageSize {
	/// # ≤ 75px.
	Small,
	/// # ≤ 160px.
	Medium,
	/// # ≤ 252px.
	Large,
	/// # Full-size / unconstrained.
	Mega,
}

impl ImageSize {
	#[must_use]
	/// # Bucket From Pixel Size.
	pub const fn from_px(px: u32) -> Self {
		if px <= 75 { Self::Small }
		else if px <= 160 { Self::Medium }
		else if px <= 252 { Self::Large }
		else { Self::Mega }
	}
}

#[derive(Debug, Clone, Default)]
/// # One Track Within a Matched Release.
pub struct TrackRecord {
	/// # Track Title.
	pub title: String,
	/// # Track Artist.
	pub artist: String,
	/// # Track Composer.
	pub composer: String,
	/// # Track ISRC.
	pub isrc: String,
	/// # Track Length (Seconds), if Known.
	pub length_secs: Option<u32>,
	/// # Parent (Index) Track Title, if This Track Is a Sub-track.
	pub parent_title: Option<String>,
	/// # This Sub-track's (1-based Position, Sibling Count) Under Its Parent.
	pub sub_track_position: Option<(u32, u32)>,
}

impl TrackRecord {
	#[must_use]
	/// # Effective Title.
	///
	/// Applies the "parent-title: `[n]`. sub-title" rule (spec.md §4.4) when
	/// this track has a [`parent_title`](Self::parent_title): the index
	/// number is dropped when there's only one sibling, or when the
	/// sub-title already spells it out (as an Arabic or Roman numeral).
	pub fn effective_title(&self) -> String {
		let Some(parent) = self.parent_title.as_deref().filter(|p| ! p.is_empty()) else {
			return self.title.clone();
		};
		let Some((index, siblings)) = self.sub_track_position else { return self.title.clone(); };

		if siblings <= 1 {
			if self.title.is_empty() { parent.to_owned() } else { format!("{parent}: {}", self.title) }
		}
		else if title_spells_out_index(&self.title, index) {
			format!("{parent}: {}", self.title)
		}
		else {
			format!("{parent}: [{index}]. {}", self.title)
		}
	}
}

/// # Does a Sub-track Title Already Spell Out Its Index Number?
///
/// Checked as a whole word, either Arabic (`"2"`) or Roman (`"II"`).
fn title_spells_out_index(title: &str, index: u32) -> bool {
	let arabic = index.to_string();
	let roman = to_roman_numeral(index);
	title.split(|c: char| ! c.is_alphanumeric())
		.any(|word| word == arabic || word.eq_ignore_ascii_case(&roman))
}

/// # Roman Numeral.
fn to_roman_numeral(mut n: u32) -> String {
	const VALUES: [(u32, &str); 13] = [
		(1000, "M"), (900, "CM"), (500, "D"), (400, "CD"),
		(100, "C"), (90, "XC"), (50, "L"), (40, "XL"),
		(10, "X"), (9, "IX"), (5, "V"), (4, "IV"), (1, "I"),
	];
	let mut out = String::new();
	for (value, symbol) in VALUES {
		while n >= value {
			out.push_str(symbol);
			n -= value;
		}
	}
	out
}

#[derive(Debug, Clone, Default)]
/// # One Matched Release Record.
pub struct MatchRecord {
	/// # Provider-native Release Id.
	pub release_id: String,
	/// # Album Title.
	pub album_title: String,
	/// # Album Artist.
	pub album_artist: String,
	/// # Album Composer.
	pub album_composer: String,
	/// # Album UPC/Catalog.
	pub album_upc: String,
	/// # Record Label.
	pub album_label: String,
	/// # Catalog Number.
	pub album_catno: String,
	/// # Amazon ASIN.
	pub album_asin: String,
	/// # Genre.
	pub genre: String,
	/// # Release Date.
	pub date: String,
	/// # Country.
	pub country: String,
	/// # Disc Number Within a Multi-disc Release.
	pub disc_number: u8,
	/// # Total Discs in the Release.
	pub total_discs: u8,
	/// # Tracks (1-indexed by position, matching `track_title` etc.).
	///
	/// For a multi-disc release matched via the primary before the offset
	/// search has run, this is the flat concatenation of every disc's
	/// tracks, in disc order; [`disc_track_counts`](Self::disc_track_counts)
	/// gives each disc's share of it.
	pub tracks: Vec<TrackRecord>,
	/// # Track Count Per Disc (Multi-disc Releases Only).
	///
	/// Parallel to the discs folded into [`tracks`](Self::tracks); empty for
	/// a single-disc release or a record that's already been narrowed by
	/// [`align_multi_disc`](Self::align_multi_disc).
	pub disc_track_counts: Vec<u32>,
	/// # Relation URLs, Keyed by Relation Type (Primary Provider Only).
	pub relations: Vec<(String, String)>,
	/// # Front Cover URL, if Known.
	pub front_url: Option<String>,
	/// # Back Cover URL, if Known.
	pub back_url: Option<String>,
	/// # Front Cover Bytes, if Fetched.
	pub front_bytes: Option<Vec<u8>>,
	/// # Back Cover Bytes, if Fetched.
	pub back_bytes: Option<Vec<u8>>,
}

impl MatchRecord {
	#[must_use]
	/// # Track Length Sequence (Seconds).
	///
	/// Used by the multi-disc alignment search (spec.md §4.4).
	pub fn track_lengths(&self) -> Vec<u32> {
		self.tracks.iter().map(|t| t.length_secs.unwrap_or(0)).collect()
	}

	#[must_use]
	/// # Resolve the Multi-disc Track Offset.
	///
	/// For a release with more than one disc, finds the leftmost disc
	/// whose track-length sequence minimises the sum of squared differences
	/// to `cd_track_lengths`, and returns a copy of this record narrowed to
	/// that disc's tracks (with `disc_number` set accordingly). Returns
	/// `None` — the match is discarded — if no disc has the same track
	/// count as the CD in the drive (spec.md §4.4).
	///
	/// Single-disc records (or records with no per-disc breakdown) are
	/// returned unchanged.
	pub fn align_multi_disc(&self, cd_track_lengths: &[u32]) -> Option<Self> {
		if self.total_discs <= 1 || self.disc_track_counts.is_empty() {
			return Some(self.clone());
		}

		let n = cd_track_lengths.len();
		let lengths = self.track_lengths();
		let mut offset = 0_usize;
		let mut best: Option<(usize, usize, u64)> = None;

		for (disc_idx, &count) in self.disc_track_counts.iter().enumerate() {
			let count = count as usize;
			if count == n && offset + count <= lengths.len() {
				let score: u64 = lengths[offset..offset + count].iter().zip(cd_track_lengths)
					.map(|(&have, &want)| {
						let diff = i64::from(have) - i64::from(want);
						(diff * diff) as u64
					})
					.sum();
				if best.map_or(true, |(_, _, b)| score < b) {
					best = Some((disc_idx, offset, score));
				}
			}
			offset += count;
		}

		let (disc_idx, track_offset, _) = best?;
		let mut out = self.clone();
		out.disc_number = disc_idx as u8 + 1;
		out.tracks = self.tracks[track_offset..track_offset + n].to_vec();
		out.disc_track_counts = Vec::new();
		Some(out)
	}
}

/// # Per-track Lengths (Seconds) Implied by a Cue Sheet's `INDEX 01` Positions.
///
/// The final track's length is derived from the disc's total sector count.
/// Used to feed [`MatchRecord::align_multi_disc`] the CD's own track-length
/// sequence (spec.md §4.4).
pub(crate) fn track_lengths_from_cuesheet(cuesheet: &crate::model::CueSheet, length_sectors: u32) -> Vec<u32> {
	let mut starts: Vec<u32> = cuesheet.tracks().iter()
		.filter_map(|t| t.indexes().iter().find(|i| i.number() == 1).map(|i| i.time()))
		.collect();
	starts.push(length_sectors);
	starts.windows(2).map(|w| w[1].saturating_sub(w[0]) / crate::FRAMES_PER_SEC).collect()
}

/// # Provider.
///
/// Contract shared by every metadata source variant. Methods for a
/// capability the provider doesn't declare are no-ops (queries return `0`
/// matches; the caller is expected to check [`capabilities`](Self::capabilities)
/// itself for most callers, though the Aggregator tolerates blind calls).
pub trait Provider {
	/// # Capabilities.
	fn capabilities(&self) -> CapabilitySet;

	/// # Provider Identity.
	fn kind(&self) -> ProviderId;

	/// # Clear.
	///
	/// Resets internal match state to empty.
	fn clear(&self);

	/// # Query By Disc.
	///
	/// # Errors
	/// Returns [`CueError::Transport`]/[`CueError::Decode`] on network or
	/// parse failure.
	fn query_by_disc(&self, cuesheet: &crate::model::CueSheet, length_sectors: u32, upc: Option<&str>) -> Result<usize, CueError>;

	/// # Query Linked (Reached via the Primary's Relations).
	///
	/// # Errors
	/// Returns [`CueError::Transport`]/[`CueError::Decode`] on network or
	/// parse failure.
	fn query_linked(&self, primary: &dyn Provider, upc: Option<&str>) -> Result<usize, CueError>;

	/// # Search By UPC.
	///
	/// # Errors
	/// Returns [`CueError::Transport`]/[`CueError::Decode`] on network or
	/// parse failure.
	fn search_by_upc(&self, upc: &str, narrowdown: Option<&str>) -> Result<usize, CueError>;

	/// # Search By Artist/Title.
	///
	/// # Errors
	/// Returns [`CueError::Transport`]/[`CueError::Decode`] on network or
	/// parse failure.
	fn search_by_artist_title(&self, title: &str, artist: &str, narrowdown: Option<&str>) -> Result<usize, CueError>;

	/// # Number of Current Matches.
	fn n_matches(&self) -> usize;

	/// # Match Accessor.
	///
	/// # Errors
	/// Returns [`CueError::IndexOutOfRange`] if `i` is out of bounds.
	fn get(&self, i: usize) -> Result<MatchRecord, CueError>;

	/// # Relation URL (Primary Provider Only).
	///
	/// # Errors
	/// Returns [`CueError::IndexOutOfRange`] or [`CueError::Unsupported`].
	fn relation_url(&self, i: usize, rel_type: &str) -> Result<Option<String>, CueError> {
		let rec = self.get(i)?;
		Ok(rec.relations.iter().find(|(k, _)| k == rel_type).map(|(_, v)| v.clone()))
	}

	/// # Set Preferred Cover-art Width.
	fn set_preferred_width(&self, px: u32);

	/// # Set Preferred Cover-art Height.
	fn set_preferred_height(&self, px: u32);
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn t_capabilities() {
		let caps = ProviderId::MusicBrainz.default_capabilities();
		assert!(caps.contains(CapabilitySet::DISC));
		assert!(caps.contains(CapabilitySet::PRIMARY));
		assert!(! caps.contains(CapabilitySet::UPC_SEARCH));
	}

	#[test]
	fn t_image_size() {
		assert_eq!(ImageSize::from_px(50), ImageSize::Small);
		assert_eq!(ImageSize::from_px(160), ImageSize::Medium);
		assert_eq!(ImageSize::from_px(252), ImageSize::Large);
		assert_eq!(ImageSize::from_px(1000), ImageSize::Mega);
	}

	fn disc_of(lengths: &[u32]) -> Vec<TrackRecord> {
		lengths.iter().map(|&s| TrackRecord { length_secs: Some(s), ..TrackRecord::default() }).collect()
	}

	#[test]
	fn t_align_multi_disc_leftmost_minimiser() {
		// A 3-CD release; the drive holds disc 2 (12 tracks).
		let cd_lengths: Vec<u32> = vec![242, 201, 195, 210, 180, 220, 199, 205, 230, 190, 215, 225];

		let disc1 = disc_of(&[300, 250, 260, 240, 230, 210, 220, 215, 280, 240, 250, 260]);
		let disc2 = disc_of(&cd_lengths);
		let disc3 = disc_of(&[241, 200, 196, 209, 181, 219, 198, 206, 229, 191, 214, 226]);

		let mut tracks = disc1.clone();
		tracks.extend(disc2.clone());
		tracks.extend(disc3.clone());

		let rec = MatchRecord {
			total_discs: 3,
			disc_track_counts: vec![12, 12, 12],
			tracks,
			..MatchRecord::default()
		};

		let aligned = rec.align_multi_disc(&cd_lengths).expect("disc 2 should align");
		assert_eq!(aligned.disc_number, 2);
		assert_eq!(aligned.tracks.len(), 12);
		assert_eq!(aligned.track_lengths(), cd_lengths);
	}

	#[test]
	fn t_align_multi_disc_no_matching_length_discarded() {
		let cd_lengths: Vec<u32> = vec![100, 200];
		let rec = MatchRecord {
			total_discs: 2,
			disc_track_counts: vec![3, 4],
			tracks: disc_of(&[1, 2, 3, 4, 5, 6, 7]),
			..MatchRecord::default()
		};
		assert!(rec.align_multi_disc(&cd_lengths).is_none());
	}

	#[test]
	fn t_effective_title_single_sibling_omits_index() {
		let trk = TrackRecord {
			title: "Allegro".into(),
			parent_title: Some("Symphony No. 5".into()),
			sub_track_position: Some((1, 1)),
			..TrackRecord::default()
		};
		assert_eq!(trk.effective_title(), "Symphony No. 5: Allegro");
	}

	#[test]
	fn t_effective_title_multiple_siblings_adds_index() {
		let trk = TrackRecord {
			title: "Allegro".into(),
			parent_title: Some("Symphony No. 5".into()),
			sub_track_position: Some((2, 4)),
			..TrackRecord::default()
		};
		assert_eq!(trk.effective_title(), "Symphony No. 5: [2]. Allegro");
	}

	#[test]
	fn t_effective_title_already_spelled_out_index() {
		let trk = TrackRecord {
			title: "II. Allegro".into(),
			parent_title: Some("Symphony No. 5".into()),
			sub_track_position: Some((2, 4)),
			..TrackRecord::default()
		};
		assert_eq!(trk.effective_title(), "Symphony No. 5: II. Allegro");
	}

	#[test]
	fn t_effective_title_no_parent_is_unchanged() {
		let trk = TrackRecord { title: "Standalone".into(), ..TrackRecord::default() };
		assert_eq!(trk.effective_title(), "Standalone");
	}
}
