/*!
# Cuerip: Config Store

A validated key/value surface over the settings spec.md §6 names
(`General.*`, `Rems.*`). Loading these values out of a TOML/INI file on
disk is explicitly out of scope; `ConfigStore` only validates and clamps
already-decoded values, the same division of labour the teacher's
[`RipOptions`](https://docs.rs/riprip_core)-style builder keeps between
itself and its (out-of-scope) CLI argument parser.
*/

use crate::{
	model::RemFieldKind,
	provider::{ImageSize, ProviderId},
};



#[derive(Debug, Clone, Copy, Eq, PartialEq, Default)]
/// # Output Container Format.
///
/// `General.FileFormat` currently enumerates exactly one value; kept as its
/// own type (rather than reusing [`crate::FileType`], which names the
/// CDRWIN `FILE` keyword) so a future format doesn't require re-plumbing
/// every caller.
pub enum OutputFormat {
	#[default]
	/// # Lossless-packed Container (see [`crate::PackedSink`]).
	LosslessPacked,
}



/// # FLAG: Skip Track-one Pre-gap.
const FLAG_SKIP_PREGAP: u16 =     0b0000_0000_0001;
/// # FLAG: Fetch Cover Art.
const FLAG_COVER_ART: u16 =       0b0000_0000_0010;
/// # FLAG: Show Desktop Notification.
const FLAG_NOTIFICATION: u16 =    0b0000_0000_0100;
/// # FLAG: Abort on Unknown Disc.
const FLAG_SKIP_UNKNOWN: u16 =    0b0000_0000_1000;
/// # FLAG: `Rems.DBINFO`.
const FLAG_REM_DBINFO: u16 =      0b0000_0001_0000;
/// # FLAG: `Rems.DATE`.
const FLAG_REM_DATE: u16 =        0b0000_0010_0000;
/// # FLAG: `Rems.LABEL`.
const FLAG_REM_LABEL: u16 =       0b0000_0100_0000;
/// # FLAG: `Rems.COUNTRY`.
const FLAG_REM_COUNTRY: u16 =     0b0000_1000_0000;
/// # FLAG: `Rems.UPC`.
const FLAG_REM_UPC: u16 =         0b0001_0000_0000;
/// # FLAG: `Rems.ASIN`.
const FLAG_REM_ASIN: u16 =        0b0010_0000_0000;

/// # FLAG: Default.
const FLAG_DEFAULT: u16 =
	FLAG_SKIP_PREGAP | FLAG_COVER_ART | FLAG_NOTIFICATION | FLAG_SKIP_UNKNOWN |
	FLAG_REM_DBINFO | FLAG_REM_DATE | FLAG_REM_LABEL | FLAG_REM_COUNTRY |
	FLAG_REM_UPC | FLAG_REM_ASIN;



#[derive(Debug, Clone)]
/// # Config Store.
///
/// Holds the validated settings spec.md §6 enumerates. Built and mutated
/// with builder-style `with_*` methods, mirroring the teacher's
/// `RipOptions` pattern of clamping rather than rejecting out-of-range
/// input.
///
/// ```
/// use cuerip_core::ConfigStore;
///
/// let cfg = ConfigStore::default()
///     .with_cover_art_preferred_size(0)
///     .with_skip_unknown_disc(false);
///
/// assert_eq!(cfg.cover_art_preferred_size(), None);
/// assert!(! cfg.skip_unknown_disc());
/// ```
pub struct ConfigStore {
	file_format: OutputFormat,
	flags: u16,
	cover_art_px: u32,
	database_preference_list: Vec<ProviderId>,
}

impl Default for ConfigStore {
	fn default() -> Self {
		Self {
			file_format: OutputFormat::LosslessPacked,
			flags: FLAG_DEFAULT,
			cover_art_px: 300,
			database_preference_list: vec![
				ProviderId::MusicBrainz,
				ProviderId::Discogs,
				ProviderId::LastFm,
				ProviderId::Amazon,
			],
		}
	}
}

impl ConfigStore {
	#[must_use]
	/// # With File Format.
	///
	/// `General.FileFormat`.
	pub const fn with_file_format(self, file_format: OutputFormat) -> Self {
		Self { file_format, ..self }
	}

	#[must_use]
	/// # With Skip Track-one Pre-gap.
	///
	/// `General.SkipTrackOnePreGap`; default `true`.
	pub const fn with_skip_track_one_pregap(self, v: bool) -> Self {
		Self { flags: set_flag(self.flags, FLAG_SKIP_PREGAP, v), ..self }
	}

	#[must_use]
	/// # With Database Preference List.
	///
	/// `General.DatabasePreferenceList`; the order providers are consulted
	/// in. Default `{MusicBrainz, Discogs, LastFm, Amazon}`.
	pub fn with_database_preference_list(mut self, list: Vec<ProviderId>) -> Self {
		self.database_preference_list = list;
		self
	}

	#[must_use]
	/// # With Cover Art Enabled.
	///
	/// `General.CoverArt`; default `true`.
	pub const fn with_cover_art(self, v: bool) -> Self {
		Self { flags: set_flag(self.flags, FLAG_COVER_ART, v), ..self }
	}

	#[must_use]
	/// # With Cover Art Preferred Size.
	///
	/// `General.CoverArtPreferredSize`, in pixels; a value of `0` means
	/// "largest available" (per spec.md §6, "≤0 means largest available").
	/// Default `300`.
	pub const fn with_cover_art_preferred_size(self, px: u32) -> Self {
		Self { cover_art_px: px, ..self }
	}

	#[must_use]
	/// # With Show Notification.
	///
	/// `General.ShowNotification`; default `true`.
	pub const fn with_show_notification(self, v: bool) -> Self {
		Self { flags: set_flag(self.flags, FLAG_NOTIFICATION, v), ..self }
	}

	#[must_use]
	/// # With Skip Unknown Disc.
	///
	/// `General.SkipUnknownDisc`; default `true`. If set and the Aggregator
	/// finishes with `found_release() == false`, the session must be
	/// aborted before the RipEngine starts.
	pub const fn with_skip_unknown_disc(self, v: bool) -> Self {
		Self { flags: set_flag(self.flags, FLAG_SKIP_UNKNOWN, v), ..self }
	}

	#[must_use]
	/// # With Rem Field Enabled.
	///
	/// Toggles one of the `Rems.{DBINFO,DATE,LABEL,COUNTRY,UPC,ASIN}` keys.
	/// Every other [`RemFieldKind`] (`GENRE`, `CATNO`, `DISC`, `DISCS`) is
	/// not user-configurable and is always included in the wish list.
	pub const fn with_rem_field(self, kind: RemFieldKind, v: bool) -> Self {
		let flag = match kind {
			RemFieldKind::Dbinfo => FLAG_REM_DBINFO,
			RemFieldKind::Date => FLAG_REM_DATE,
			RemFieldKind::Label => FLAG_REM_LABEL,
			RemFieldKind::Country => FLAG_REM_COUNTRY,
			RemFieldKind::Upc => FLAG_REM_UPC,
			RemFieldKind::Asin => FLAG_REM_ASIN,
			RemFieldKind::Genre | RemFieldKind::Catno | RemFieldKind::Disc | RemFieldKind::Discs => return self,
		};
		Self { flags: set_flag(self.flags, flag, v), ..self }
	}
}

impl ConfigStore {
	#[must_use]
	/// # File Format.
	pub const fn file_format(&self) -> OutputFormat { self.file_format }

	#[must_use]
	/// # Skip Track-one Pre-gap?
	pub const fn skip_track_one_pregap(&self) -> bool { has_flag(self.flags, FLAG_SKIP_PREGAP) }

	#[must_use]
	/// # Database Preference List.
	pub fn database_preference_list(&self) -> &[ProviderId] { &self.database_preference_list }

	#[must_use]
	/// # Cover Art Enabled?
	pub const fn cover_art(&self) -> bool { has_flag(self.flags, FLAG_COVER_ART) }

	#[must_use]
	/// # Cover Art Preferred Size.
	///
	/// `None` means "largest available" (a configured value of `0`).
	pub const fn cover_art_preferred_size(&self) -> Option<u32> {
		if self.cover_art_px == 0 { None } else { Some(self.cover_art_px) }
	}

	#[must_use]
	/// # Cover Art Preferred Bucket.
	pub const fn cover_art_preferred_bucket(&self) -> ImageSize {
		match self.cover_art_preferred_size() {
			Some(px) => ImageSize::from_px(px),
			None => ImageSize::Mega,
		}
	}

	#[must_use]
	/// # Show Notification?
	pub const fn show_notification(&self) -> bool { has_flag(self.flags, FLAG_NOTIFICATION) }

	#[must_use]
	/// # Skip Unknown Disc?
	pub const fn skip_unknown_disc(&self) -> bool { has_flag(self.flags, FLAG_SKIP_UNKNOWN) }

	#[must_use]
	/// # Rem Field Enabled?
	///
	/// Non-configurable kinds (`GENRE`, `CATNO`, `DISC`, `DISCS`) always
	/// return `true`.
	pub const fn rem_field(&self, kind: RemFieldKind) -> bool {
		match kind {
			RemFieldKind::Dbinfo => has_flag(self.flags, FLAG_REM_DBINFO),
			RemFieldKind::Date => has_flag(self.flags, FLAG_REM_DATE),
			RemFieldKind::Label => has_flag(self.flags, FLAG_REM_LABEL),
			RemFieldKind::Country => has_flag(self.flags, FLAG_REM_COUNTRY),
			RemFieldKind::Upc => has_flag(self.flags, FLAG_REM_UPC),
			RemFieldKind::Asin => has_flag(self.flags, FLAG_REM_ASIN),
			RemFieldKind::Genre | RemFieldKind::Catno | RemFieldKind::Disc | RemFieldKind::Discs => true,
		}
	}

	#[must_use]
	/// # Rem Wish List.
	///
	/// The list to hand to [`crate::Aggregator::new`], in a stable order:
	/// the user-configurable kinds (those enabled) followed by the
	/// always-on structural kinds.
	pub fn rem_wishlist(&self) -> Vec<RemFieldKind> {
		[
			RemFieldKind::Dbinfo, RemFieldKind::Date, RemFieldKind::Label,
			RemFieldKind::Country, RemFieldKind::Upc, RemFieldKind::Asin,
		]
			.into_iter()
			.filter(|k| self.rem_field(*k))
			.chain([RemFieldKind::Genre, RemFieldKind::Catno, RemFieldKind::Disc, RemFieldKind::Discs])
			.collect()
	}
}

const fn set_flag(flags: u16, flag: u16, v: bool) -> u16 {
	if v { flags | flag } else { flags & ! flag }
}

const fn has_flag(flags: u16, flag: u16) -> bool { flag == flags & flag }



#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn t_defaults() {
		let cfg = ConfigStore::default();
		assert_eq!(cfg.file_format(), OutputFormat::LosslessPacked);
		assert!(cfg.skip_track_one_pregap());
		assert!(cfg.cover_art());
		assert!(cfg.show_notification());
		assert!(cfg.skip_unknown_disc());
		assert_eq!(cfg.cover_art_preferred_size(), Some(300));
		assert_eq!(cfg.database_preference_list().len(), 4);
	}

	#[test]
	fn t_cover_art_zero_means_largest() {
		let cfg = ConfigStore::default().with_cover_art_preferred_size(0);
		assert_eq!(cfg.cover_art_preferred_size(), None);
		assert_eq!(cfg.cover_art_preferred_bucket(), ImageSize::Mega);
	}

	#[test]
	fn t_rem_field_toggles() {
		let cfg = ConfigStore::default().with_rem_field(RemFieldKind::Upc, false);
		assert!(! cfg.rem_field(RemFieldKind::Upc));
		// Non-configurable kinds can't be turned off.
		let cfg = cfg.with_rem_field(RemFieldKind::Genre, false);
		assert!(cfg.rem_field(RemFieldKind::Genre));
	}

	#[test]
	fn t_rem_wishlist_order() {
		let cfg = ConfigStore::default().with_rem_field(RemFieldKind::Date, false);
		let list = cfg.rem_wishlist();
		assert!(! list.contains(&RemFieldKind::Date));
		assert!(list.contains(&RemFieldKind::Genre));
	}
}
