/*!
# Cuerip: Shared Data Model

The value types and invariants every other module builds on: [`CueSheet`],
[`Track`], [`Index`], [`Artist`], and [`RemFieldKind`].
*/

pub(crate) mod artist;
pub(crate) mod cuesheet;
pub(crate) mod index;
pub(crate) mod rem;
pub(crate) mod track;

pub use artist::{Artist, ArtistKind};
pub use cuesheet::{CueSheet, FileType};
pub use index::Index;
pub use rem::RemFieldKind;
pub use track::{Track, TrackKind};
