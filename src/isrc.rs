/*!
# Cuerip: ISRCs
*/

use crate::CueError;
use std::fmt;
use trimothy::TrimSliceMatches;



#[derive(Debug, Clone, Copy, Eq, Ord, PartialEq, PartialOrd)]
/// # ISRC.
///
/// A validated International Standard Recording Code: two letters (country),
/// three alphanumerics (registrant), seven digits (year + designation).
pub struct Isrc([u8; 12]);

impl fmt::Display for Isrc {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let s = std::str::from_utf8(&self.0).unwrap_or("");
		f.write_str(s)
	}
}

impl TryFrom<&[u8]> for Isrc {
	type Error = CueError;
	fn try_from(mut src: &[u8]) -> Result<Self, Self::Error> {
		src = src.trim_matches(u8::is_ascii_whitespace);
		if src.len() != 12 { return Err(CueError::Isrc); }

		let mut buf = [0_u8; 12];
		for (b, v) in buf.iter_mut().zip(src.iter().copied()) {
			*b = v.to_ascii_uppercase();
		}

		if is_isrc(&buf) { Ok(Self(buf)) }
		else { Err(CueError::Isrc) }
	}
}

impl TryFrom<&str> for Isrc {
	type Error = CueError;

	#[inline]
	fn try_from(src: &str) -> Result<Self, Self::Error> { Self::try_from(src.as_bytes()) }
}

impl Isrc {
	#[must_use]
	/// # As Str.
	pub fn as_str(&self) -> &str { std::str::from_utf8(&self.0).unwrap_or("") }
}



/// # Matches `[A-Z]{2}[A-Za-z0-9]{3}[0-9]{7}`?
///
/// Input is assumed already upper-cased by the caller.
fn is_isrc(src: &[u8; 12]) -> bool {
	src[..2].iter().all(u8::is_ascii_alphabetic) &&
	src[2..5].iter().all(u8::is_ascii_alphanumeric) &&
	src[5..].iter().all(u8::is_ascii_digit)
}



#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn t_isrc() {
		assert!(Isrc::try_from("USRC17607839").is_ok());
		assert!(Isrc::try_from("gbum71505078").is_ok());
		assert_eq!(Isrc::try_from("gbum71505078").unwrap().to_string(), "GBUM71505078");

		assert!(Isrc::try_from("USRC1760783").is_err()); // Too short.
		assert!(Isrc::try_from("12RC17607839").is_err()); // Leading digits.
		assert!(Isrc::try_from("USRCA760783X").is_err()); // Trailing non-digit.
	}
}
