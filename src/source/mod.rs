/*!
# Cuerip: Source

Yields raw CDDA sectors and a preliminary cue sheet built from the disc's
table of contents.
*/

pub(crate) mod mock;

#[cfg(feature = "cdio")]
pub(crate) mod cdio;

pub use mock::MockSource;

#[cfg(feature = "cdio")]
pub use cdio::CdioSource;

use crate::{CueError, model::CueSheet};

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
/// # Disc Length Unit.
pub enum LengthUnit {
	/// # Seconds.
	Seconds,
	/// # CD Sectors (1/75 s).
	Sectors,
	/// # 16-bit Half-words (Samples × 2 Channels).
	HalfWords,
	/// # Raw Bytes.
	Bytes,
}

/// # Source.
///
/// Exposes the physical (or simulated) optical device as a sector stream
/// plus the TOC-derived preliminary metadata the Aggregator starts from.
pub trait Source {
	/// # Device Path.
	fn device_path(&self) -> &str;

	/// # Samples Per Sector.
	fn samples_per_sector(&self) -> u16;

	/// # Read Next Sector.
	///
	/// Returns a borrowed slice valid until the next call, or `None` at
	/// end-of-disc.
	///
	/// # Errors
	/// Returns [`CueError::Device`] on a fatal read failure.
	fn read_sector(&mut self) -> Result<Option<&[u8]>, CueError>;

	/// # Rewind.
	fn rewind(&mut self);

	/// # Disc Length.
	fn length(&self, unit: LengthUnit) -> u64;

	/// # Build Preliminary Cue Sheet.
	///
	/// One track per TOC entry, catalog/ISRC populated where well-formed
	/// (non-well-formed values are dropped silently), and an index 0 when a
	/// pregap is reported for track 1.
	///
	/// # Errors
	/// Returns [`CueError::Device`] if the TOC itself can't be read.
	fn build_cuesheet(&self) -> Result<CueSheet, CueError>;
}
