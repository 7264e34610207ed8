/*!
# Cuerip: REM Fields
*/

use std::fmt;



#[derive(Debug, Clone, Copy, Eq, Ord, PartialEq, PartialOrd, Hash)]
/// # REM Field Kind.
///
/// A typed "wish list" entry; materialised into a `REM <TAG> <value>` cue
/// sheet line only when the merged record has a non-empty value for it.
pub enum RemFieldKind {
	/// # Release/database info free text.
	Dbinfo,
	/// # Genre.
	Genre,
	/// # Release date.
	Date,
	/// # Country of release.
	Country,
	/// # UPC/EAN catalog number.
	Upc,
	/// # Record label.
	Label,
	/// # Catalog/reference number.
	Catno,
	/// # Disc number within a multi-disc release.
	Disc,
	/// # Total discs within a multi-disc release.
	Discs,
	/// # Amazon Standard Identification Number.
	Asin,
}

impl fmt::Display for RemFieldKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.tag()) }
}

impl RemFieldKind {
	#[must_use]
	/// # CDRWIN Tag Text.
	///
	/// The uppercase word that follows `REM` in the rendered cue sheet.
	pub const fn tag(self) -> &'static str {
		match self {
			Self::Dbinfo => "DBINFO",
			Self::Genre => "GENRE",
			Self::Date => "DATE",
			Self::Country => "COUNTRY",
			Self::Upc => "UPC",
			Self::Label => "LABEL",
			Self::Catno => "CATNO",
			Self::Disc => "DISC",
			Self::Discs => "DISCS",
			Self::Asin => "ASIN",
		}
	}

	#[must_use]
	/// # From Tag Text.
	pub fn from_tag(tag: &str) -> Option<Self> {
		Some(match tag {
			"DBINFO" => Self::Dbinfo,
			"GENRE" => Self::Genre,
			"DATE" => Self::Date,
			"COUNTRY" => Self::Country,
			"UPC" => Self::Upc,
			"LABEL" => Self::Label,
			"CATNO" => Self::Catno,
			"DISC" => Self::Disc,
			"DISCS" => Self::Discs,
			"ASIN" => Self::Asin,
			_ => return None,
		})
	}
}



#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn t_roundtrip() {
		for kind in [
			RemFieldKind::Dbinfo, RemFieldKind::Genre, RemFieldKind::Date,
			RemFieldKind::Country, RemFieldKind::Upc, RemFieldKind::Label,
			RemFieldKind::Catno, RemFieldKind::Disc, RemFieldKind::Discs,
			RemFieldKind::Asin,
		] {
			assert_eq!(RemFieldKind::from_tag(kind.tag()), Some(kind));
		}
		assert_eq!(RemFieldKind::from_tag("NOPE"), None);
	}
}
