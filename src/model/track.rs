/*!
# Cuerip: Track
*/

use crate::{
	CueError,
	Isrc,
	model::Index,
};



/// # FLAG: Digital Copy Permitted.
const FLAG_DCP: u8 =  0b0000_0001;

/// # FLAG: Four-channel audio.
const FLAG_4CH: u8 =  0b0000_0010;

/// # FLAG: Pre-emphasis applied.
const FLAG_PRE: u8 =  0b0000_0100;

/// # FLAG: Serial Copy Management System.
const FLAG_SCMS: u8 = 0b0000_1000;

/// # FLAG: Data (non-audio) track.
const FLAG_DATA: u8 = 0b0001_0000;



#[derive(Debug, Clone, Copy, Eq, PartialEq)]
/// # Track Type.
pub enum TrackKind {
	/// # Audio.
	Audio,
	/// # CD+G.
	Cdg,
	/// # Mode 1, 2048-byte sectors.
	Mode1_2048,
	/// # Mode 1, 2352-byte sectors.
	Mode1_2352,
	/// # Mode 2, 2336-byte sectors.
	Mode2_2336,
	/// # Mode 2, 2352-byte sectors.
	Mode2_2352,
	/// # CD-i, 2336-byte sectors.
	Cdi2336,
	/// # CD-i, 2352-byte sectors.
	Cdi2352,
}

impl TrackKind {
	#[must_use]
	/// # CDRWIN Track-type Keyword.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Audio => "AUDIO",
			Self::Cdg => "CDG",
			Self::Mode1_2048 => "MODE1/2048",
			Self::Mode1_2352 => "MODE1/2352",
			Self::Mode2_2336 => "MODE2/2336",
			Self::Mode2_2352 => "MODE2/2352",
			Self::Cdi2336 => "CDI/2336",
			Self::Cdi2352 => "CDI/2352",
		}
	}
}



#[derive(Debug, Clone)]
/// # Track.
///
/// Ordered record keyed by `number` (`[1, 99]`); owns its own indexes, REMs,
/// and credited-artist fields, all of which may be filled in later by the
/// Aggregator's merge pass.
pub struct Track {
	number: u8,
	kind: TrackKind,
	flags: u8,
	title: String,
	performer: String,
	songwriter: String,
	isrc: Option<Isrc>,
	pregap: u32,
	postgap: u32,
	indexes: Vec<Index>,
	rems: Vec<String>,
}

impl Track {
	#[must_use]
	/// # New.
	///
	/// Returns `None` if `number` is outside `[1, 99]`.
	pub fn new(number: u8, kind: TrackKind) -> Option<Self> {
		if number == 0 || number > 99 { return None; }
		Some(Self {
			number,
			kind,
			flags: 0,
			title: String::new(),
			performer: String::new(),
			songwriter: String::new(),
			isrc: None,
			pregap: 0,
			postgap: 0,
			indexes: Vec::new(),
			rems: Vec::new(),
		})
	}

	#[must_use]
	/// # Number.
	pub const fn number(&self) -> u8 { self.number }

	#[must_use]
	/// # Kind.
	pub const fn kind(&self) -> TrackKind { self.kind }

	#[must_use]
	/// # Title.
	pub fn title(&self) -> &str { &self.title }

	/// # Set Title (If Empty).
	///
	/// No-op if a title is already present; this is the "fill if empty, keep
	/// otherwise" merge rule used throughout the Aggregator.
	pub fn fill_title(&mut self, title: &str) {
		if self.title.is_empty() && ! title.is_empty() { self.title = title.to_owned(); }
	}

	/// # Set Title (Unconditional).
	pub fn set_title<S: Into<String>>(&mut self, title: S) { self.title = title.into(); }

	#[must_use]
	/// # Performer.
	pub fn performer(&self) -> &str { &self.performer }

	#[must_use]
	/// # Songwriter.
	pub fn songwriter(&self) -> &str { &self.songwriter }

	/// # Fill Performer/Songwriter Pair.
	///
	/// Both fields are written atomically, only when *both* are currently
	/// empty.
	pub fn fill_performer_songwriter(&mut self, performer: &str, songwriter: &str) {
		if self.performer.is_empty() && self.songwriter.is_empty() {
			if ! performer.is_empty() { self.performer = performer.to_owned(); }
			if ! songwriter.is_empty() { self.songwriter = songwriter.to_owned(); }
		}
	}

	/// # Set Performer (Unconditional).
	pub fn set_performer<S: Into<String>>(&mut self, performer: S) { self.performer = performer.into(); }

	/// # Set Songwriter (Unconditional).
	pub fn set_songwriter<S: Into<String>>(&mut self, songwriter: S) { self.songwriter = songwriter.into(); }

	#[must_use]
	/// # ISRC.
	pub const fn isrc(&self) -> Option<Isrc> { self.isrc }

	/// # Set ISRC.
	///
	/// # Errors
	/// Returns an error if `isrc` fails to validate.
	pub fn set_isrc(&mut self, isrc: &str) -> Result<(), CueError> {
		self.isrc = Some(Isrc::try_from(isrc)?);
		Ok(())
	}

	#[must_use]
	/// # Pregap (Sectors).
	pub const fn pregap(&self) -> u32 { self.pregap }

	/// # Set Pregap.
	pub fn set_pregap(&mut self, sectors: u32) { self.pregap = sectors; }

	#[must_use]
	/// # Postgap (Sectors).
	pub const fn postgap(&self) -> u32 { self.postgap }

	/// # Set Postgap.
	pub fn set_postgap(&mut self, sectors: u32) { self.postgap = sectors; }

	#[must_use]
	/// # Indexes.
	pub fn indexes(&self) -> &[Index] { &self.indexes }

	/// # Push Index.
	///
	/// # Errors
	/// Returns [`CueError::Bug`] if the new index's number isn't strictly
	/// greater than the last one already present, violating the Track
	/// invariant that indexes are strictly monotone by number.
	pub fn push_index(&mut self, idx: Index) -> Result<(), CueError> {
		if let Some(last) = self.indexes.last() {
			if idx.number() <= last.number() {
				return Err(CueError::Bug("track indexes must be strictly increasing"));
			}
		}
		self.indexes.push(idx);
		Ok(())
	}

	#[must_use]
	/// # Has Index One?
	pub fn has_index_one(&self) -> bool { self.indexes.iter().any(|i| i.number() == 1) }

	#[must_use]
	/// # Rems.
	pub fn rems(&self) -> &[String] { &self.rems }

	/// # Push Rem Line.
	pub fn push_rem<S: Into<String>>(&mut self, line: S) { self.rems.push(line.into()); }

	/// # Retain Non-empty Rems.
	pub fn compact_rems(&mut self) { self.rems.retain(|r| ! r.is_empty()); }
}

impl Track {
	#[must_use]
	/// # Flag: Digital Copy Permitted?
	pub const fn flag_dcp(&self) -> bool { self.flags & FLAG_DCP != 0 }

	/// # Set Flag: Digital Copy Permitted.
	pub fn set_flag_dcp(&mut self, v: bool) { self.set_flag(FLAG_DCP, v); }

	#[must_use]
	/// # Flag: Four-channel Audio?
	pub const fn flag_4ch(&self) -> bool { self.flags & FLAG_4CH != 0 }

	/// # Set Flag: Four-channel Audio.
	pub fn set_flag_4ch(&mut self, v: bool) { self.set_flag(FLAG_4CH, v); }

	#[must_use]
	/// # Flag: Pre-emphasis?
	pub const fn flag_pre(&self) -> bool { self.flags & FLAG_PRE != 0 }

	/// # Set Flag: Pre-emphasis.
	pub fn set_flag_pre(&mut self, v: bool) { self.set_flag(FLAG_PRE, v); }

	#[must_use]
	/// # Flag: SCMS?
	pub const fn flag_scms(&self) -> bool { self.flags & FLAG_SCMS != 0 }

	/// # Set Flag: SCMS.
	pub fn set_flag_scms(&mut self, v: bool) { self.set_flag(FLAG_SCMS, v); }

	#[must_use]
	/// # Flag: Data Track?
	pub const fn flag_data(&self) -> bool { self.flags & FLAG_DATA != 0 }

	/// # Set Flag: Data Track.
	pub fn set_flag_data(&mut self, v: bool) { self.set_flag(FLAG_DATA, v); }

	fn set_flag(&mut self, bit: u8, v: bool) {
		self.flags = if v { self.flags | bit } else { self.flags & ! bit };
	}

	#[must_use]
	/// # Flags As CDRWIN Text.
	///
	/// Space-separated subset of `DCP 4CH PRE SCMS DATA`, in that order.
	pub fn flags_text(&self) -> String {
		let mut parts = Vec::new();
		if self.flag_dcp() { parts.push("DCP"); }
		if self.flag_4ch() { parts.push("4CH"); }
		if self.flag_pre() { parts.push("PRE"); }
		if self.flag_scms() { parts.push("SCMS"); }
		if self.flag_data() { parts.push("DATA"); }
		parts.join(" ")
	}
}



#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn t_new_bounds() {
		assert!(Track::new(0, TrackKind::Audio).is_none());
		assert!(Track::new(100, TrackKind::Audio).is_none());
		assert!(Track::new(1, TrackKind::Audio).is_some());
	}

	#[test]
	fn t_fill_rules() {
		let mut t = Track::new(1, TrackKind::Audio).unwrap();
		t.fill_title("First");
		t.fill_title("Second");
		assert_eq!(t.title(), "First");

		t.fill_performer_songwriter("P", "S");
		t.fill_performer_songwriter("P2", "S2");
		assert_eq!(t.performer(), "P");
		assert_eq!(t.songwriter(), "S");
	}

	#[test]
	fn t_indexes_monotone() {
		let mut t = Track::new(1, TrackKind::Audio).unwrap();
		t.push_index(Index::new(0, 0).unwrap()).unwrap();
		t.push_index(Index::new(1, 150).unwrap()).unwrap();
		assert!(t.push_index(Index::new(1, 200).unwrap()).is_err());
		assert!(t.has_index_one());
	}

	#[test]
	fn t_flags() {
		let mut t = Track::new(1, TrackKind::Audio).unwrap();
		t.set_flag_dcp(true);
		t.set_flag_pre(true);
		assert_eq!(t.flags_text(), "DCP PRE");
	}
}
