/*!
# Cuerip Core: Library
*/

#![deny(
	clippy::allow_attributes_without_reason,
	clippy::correctness,
	unreachable_pub,
	unsafe_code,
)]

#![warn(
	clippy::complexity,
	clippy::nursery,
	clippy::pedantic,
	clippy::perf,
	clippy::style,

	clippy::allow_attributes,
	clippy::clone_on_ref_ptr,
	clippy::create_dir,
	clippy::filetype_is_file,
	clippy::format_push_string,
	clippy::get_unwrap,
	clippy::impl_trait_in_params,
	clippy::lossy_float_literal,
	clippy::missing_assert_message,
	clippy::missing_docs_in_private_items,
	clippy::needless_raw_strings,
	clippy::panic_in_result_fn,
	clippy::pub_without_shorthand,
	clippy::rest_pat_in_fully_bound_structs,
	clippy::semicolon_inside_block,
	clippy::str_to_string,
	clippy::string_to_string,
	clippy::todo,
	clippy::undocumented_unsafe_blocks,
	clippy::unneeded_field_pattern,
	clippy::unseparated_literal_suffix,
	clippy::unwrap_in_result,

	macro_use_extern_crate,
	missing_copy_implementations,
	missing_docs,
	non_ascii_idents,
	trivial_casts,
	trivial_numeric_casts,
	unused_extern_crates,
	unused_import_braces,
)]

#![expect(clippy::redundant_pub_crate, reason = "Unresolvable.")]

mod abort;
mod aggregator;
mod catalog;
mod config;
mod cue_text;
mod error;
mod filename;
mod isrc;
mod model;
mod provider;
mod rip_engine;
mod runner;
mod sink;
mod source;

pub use abort::KillSwitch;
pub use aggregator::{Aggregator, AggregateResult, MergePolicy};
pub use catalog::Catalog;
pub use config::{ConfigStore, OutputFormat};
pub use error::{
	CueError,
	DecodeErrorKind,
	DeviceErrorKind,
	TemplateErrorKind,
	TransportErrorKind,
};
pub use isrc::Isrc;
pub use model::{Artist, ArtistKind, CueSheet, FileType, Index, RemFieldKind, Track, TrackKind};
pub use provider::{
	CapabilitySet,
	ImageSize,
	MatchRecord,
	MockProvider,
	Provider,
	ProviderId,
	RestProvider,
	TrackRecord,
};
pub use rip_engine::RipEngine;
pub use runner::ThreadRunner;
pub use sink::{LockSign, PackedSink, Sink, WavSink};
pub use source::{LengthUnit, MockSource, Source};

#[cfg(feature = "cdio")]
pub use source::CdioSource;

/// # Render a Cue Sheet to CDRWIN Text.
pub use cue_text::render as render_cuesheet;

/// # Parse a CDRWIN Text Cue Sheet.
///
/// # Errors
/// Returns [`CueError`] if the text isn't well-formed CDRWIN.
pub use cue_text::parse as parse_cuesheet;

/// # Render a Filename Template.
///
/// # Errors
/// Returns [`CueError::Template`] if the template is malformed.
pub use filename::render as render_filename;

/// # CD Frame Rate (Frames/Sector per Second).
pub const FRAMES_PER_SEC: u32 = 75;

/// # Samples Per CDDA Sector (588 Stereo Samples).
pub const SAMPLES_PER_SECTOR: u16 = 588;

/// # Bytes Per CDDA Sector.
pub const BYTES_PER_SECTOR: u16 = 2352;

/// # Lead-in Sectors.
pub const CD_LEADIN: u32 = 150;
