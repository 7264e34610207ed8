/*!
# Cuerip: CueSheet
*/

use crate::{
	Catalog,
	CueError,
	model::Track,
};



#[derive(Debug, Clone, Copy, Eq, PartialEq)]
/// # Output File Type.
pub enum FileType {
	/// # Raw little-endian PCM.
	BinaryLe,
	/// # Raw big-endian PCM.
	BinaryBe,
	/// # AIFF container.
	Aiff,
	/// # WAVE container.
	Wave,
	/// # MP3.
	Mp3,
}

impl FileType {
	#[must_use]
	/// # CDRWIN `FILE` Keyword.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::BinaryLe => "BINARY",
			Self::BinaryBe => "MOTOROLA",
			Self::Aiff => "AIFF",
			Self::Wave => "WAVE",
			Self::Mp3 => "MP3",
		}
	}
}



#[derive(Debug, Clone)]
/// # CueSheet.
///
/// The canonical in-memory record. Created by the Aggregator from a
/// Source's preliminary cue sheet, mutated only by the Aggregator until
/// merge completes, then treated as read-only by every Sink.
pub struct CueSheet {
	catalog: Option<Catalog>,
	cd_text_path: String,
	file_name: String,
	file_type: FileType,
	performer: String,
	songwriter: String,
	title: String,
	rems: Vec<String>,
	tracks: Vec<Track>,
}

impl Default for CueSheet {
	fn default() -> Self {
		Self {
			catalog: None,
			cd_text_path: String::new(),
			file_name: String::new(),
			file_type: FileType::Wave,
			performer: String::new(),
			songwriter: String::new(),
			title: String::new(),
			rems: Vec::new(),
			tracks: Vec::new(),
		}
	}
}

impl CueSheet {
	#[must_use]
	/// # Catalog.
	pub const fn catalog(&self) -> Option<Catalog> { self.catalog }

	/// # Set Catalog.
	///
	/// # Errors
	/// Returns an error if `catalog` fails to validate.
	pub fn set_catalog(&mut self, catalog: &str) -> Result<(), CueError> {
		self.catalog = Some(Catalog::try_from(catalog)?);
		Ok(())
	}

	#[must_use]
	/// # CD-TEXT Path.
	pub fn cd_text_path(&self) -> &str { &self.cd_text_path }

	/// # Set CD-TEXT Path.
	pub fn set_cd_text_path<S: Into<String>>(&mut self, path: S) { self.cd_text_path = path.into(); }

	#[must_use]
	/// # File Name.
	pub fn file_name(&self) -> &str { &self.file_name }

	/// # Set File Name.
	pub fn set_file_name<S: Into<String>>(&mut self, name: S) { self.file_name = name.into(); }

	#[must_use]
	/// # File Type.
	pub const fn file_type(&self) -> FileType { self.file_type }

	/// # Set File Type.
	pub fn set_file_type(&mut self, kind: FileType) { self.file_type = kind; }

	#[must_use]
	/// # Performer.
	pub fn performer(&self) -> &str { &self.performer }

	#[must_use]
	/// # Songwriter.
	pub fn songwriter(&self) -> &str { &self.songwriter }

	/// # Fill Performer/Songwriter Pair.
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
	/// # Title.
	pub fn title(&self) -> &str { &self.title }

	/// # Fill Title (If Empty).
	pub fn fill_title(&mut self, title: &str) {
		if self.title.is_empty() && ! title.is_empty() { self.title = title.to_owned(); }
	}

	/// # Set Title (Unconditional).
	pub fn set_title<S: Into<String>>(&mut self, title: S) { self.title = title.into(); }

	#[must_use]
	/// # Rems.
	pub fn rems(&self) -> &[String] { &self.rems }

	/// # Push Rem Line (If Not Already Present By Tag).
	pub fn push_rem<S: Into<String>>(&mut self, line: S) { self.rems.push(line.into()); }

	/// # Rem Slot By Index (Mutable).
	///
	/// Used by the Aggregator to materialise a reserved REM-field wish-list
	/// slot (see [`push_rem`](Self::push_rem)) once a merge pass supplies a
	/// value for it.
	pub fn rem_mut(&mut self, idx: usize) -> Option<&mut String> { self.rems.get_mut(idx) }

	/// # Retain Non-empty Rems.
	pub fn compact_rems(&mut self) { self.rems.retain(|r| ! r.is_empty()); }

	#[must_use]
	/// # Tracks.
	pub fn tracks(&self) -> &[Track] { &self.tracks }

	#[must_use]
	/// # Tracks (Mutable).
	pub fn tracks_mut(&mut self) -> &mut [Track] { &mut self.tracks }

	#[must_use]
	/// # Track By Number.
	pub fn track(&self, number: u8) -> Option<&Track> {
		self.tracks.iter().find(|t| t.number() == number)
	}

	#[must_use]
	/// # Track By Number (Mutable).
	pub fn track_mut(&mut self, number: u8) -> Option<&mut Track> {
		self.tracks.iter_mut().find(|t| t.number() == number)
	}

	/// # Push Track.
	///
	/// # Errors
	/// Returns [`CueError::Bug`] if the new track's number doesn't continue
	/// the strictly-increasing `1..N` sequence, or `N` would exceed 99.
	pub fn push_track(&mut self, track: Track) -> Result<(), CueError> {
		let expected = self.tracks.len() as u8 + 1;
		if track.number() != expected || expected > 99 {
			return Err(CueError::Bug("track numbers must form 1..N"));
		}
		self.tracks.push(track);
		Ok(())
	}

	#[must_use]
	/// # Track Count.
	pub fn len(&self) -> usize { self.tracks.len() }

	#[must_use]
	/// # Is Empty?
	pub fn is_empty(&self) -> bool { self.tracks.is_empty() }
}



#[cfg(test)]
mod tests {
	use super::*;
	use crate::model::track::TrackKind;

	#[test]
	fn t_push_track_sequence() {
		let mut cs = CueSheet::default();
		cs.push_track(Track::new(1, TrackKind::Audio).unwrap()).unwrap();
		cs.push_track(Track::new(2, TrackKind::Audio).unwrap()).unwrap();
		assert_eq!(cs.len(), 2);

		// Out-of-order push is rejected.
		assert!(cs.push_track(Track::new(4, TrackKind::Audio).unwrap()).is_err());
	}

	#[test]
	fn t_fill_title() {
		let mut cs = CueSheet::default();
		cs.fill_title("A");
		cs.fill_title("B");
		assert_eq!(cs.title(), "A");
	}

	#[test]
	fn t_catalog() {
		let mut cs = CueSheet::default();
		assert!(cs.catalog().is_none());
		cs.set_catalog("9332727016318").unwrap();
		assert!(cs.catalog().is_some());
		assert!(cs.set_catalog("not-a-catalog").is_err());
	}
}
