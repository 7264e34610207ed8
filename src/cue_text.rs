/*!
# Cuerip: CDRWIN Cue Sheet Text

Renders a [`CueSheet`] to the CDRWIN text dialect described by the external
interface, and parses that same dialect back. Hand-rolled, like every other
domain format in this crate — there's no 1:1 mapping between the strict
subset of CDRWIN this crate needs and any general-purpose cue-parsing
crate's data model.
*/

use crate::{
	CueError,
	model::{CueSheet, FileType, Index, Track, TrackKind},
};
use std::fmt::Write as _;

/// # CD Frame Rate (Frames/Sector per Second).
const FRAMES_PER_SEC: u32 = 75;

/// # Render Timestamp (mm:ss:ff).
fn render_time(sectors: u32) -> String {
	let ff = sectors % FRAMES_PER_SEC;
	let total_sec = sectors / FRAMES_PER_SEC;
	let ss = total_sec % 60;
	let mm = total_sec / 60;
	format!("{mm:02}:{ss:02}:{ff:02}")
}

/// # Parse Timestamp (mm:ss:ff).
fn parse_time(s: &str) -> Option<u32> {
	let mut parts = s.splitn(3, ':');
	let mm: u32 = parts.next()?.parse().ok()?;
	let ss: u32 = parts.next()?.parse().ok()?;
	let ff: u32 = parts.next()?.parse().ok()?;
	if parts.next().is_some() || ss >= 60 || ff >= FRAMES_PER_SEC { return None; }
	Some(mm * 60 * FRAMES_PER_SEC + ss * FRAMES_PER_SEC + ff)
}

/// # Quote File Name If Needed.
fn quoted(name: &str) -> String {
	if name.contains(' ') { format!("\"{name}\"") }
	else { name.to_owned() }
}

fn track_kind_from_str(s: &str) -> Option<TrackKind> {
	Some(match s {
		"AUDIO" => TrackKind::Audio,
		"CDG" => TrackKind::Cdg,
		"MODE1/2048" => TrackKind::Mode1_2048,
		"MODE1/2352" => TrackKind::Mode1_2352,
		"MODE2/2336" => TrackKind::Mode2_2336,
		"MODE2/2352" => TrackKind::Mode2_2352,
		"CDI/2336" => TrackKind::Cdi2336,
		"CDI/2352" => TrackKind::Cdi2352,
		_ => return None,
	})
}

fn file_type_from_str(s: &str) -> Option<FileType> {
	Some(match s {
		"BINARY" => FileType::BinaryLe,
		"MOTOROLA" => FileType::BinaryBe,
		"AIFF" => FileType::Aiff,
		"WAVE" => FileType::Wave,
		"MP3" => FileType::Mp3,
		_ => return None,
	})
}

/// # Render a CueSheet to CDRWIN Text.
#[must_use]
pub fn render(cs: &CueSheet) -> String {
	let mut out = String::with_capacity(512);

	if let Some(catalog) = cs.catalog() {
		let _ = writeln!(out, "CATALOG {}", catalog.as_str());
	}
	if ! cs.file_name().is_empty() {
		let _ = writeln!(out, "FILE {} {}", quoted(cs.file_name()), cs.file_type().as_str());
	}
	if ! cs.cd_text_path().is_empty() {
		let _ = writeln!(out, "CDTEXTFILE {}", quoted(cs.cd_text_path()));
	}
	if ! cs.title().is_empty() { let _ = writeln!(out, "TITLE {}", cs.title()); }
	if ! cs.performer().is_empty() { let _ = writeln!(out, "PERFORMER {}", cs.performer()); }
	if ! cs.songwriter().is_empty() { let _ = writeln!(out, "SONGWRITER {}", cs.songwriter()); }
	for rem in cs.rems() {
		let _ = writeln!(out, "REM {rem}");
	}

	for track in cs.tracks() {
		let _ = writeln!(out, "TRACK {:02} {}", track.number(), track.kind().as_str());
		let flags = track.flags_text();
		if ! flags.is_empty() { let _ = writeln!(out, "  FLAGS {flags}"); }
		if ! track.title().is_empty() { let _ = writeln!(out, "  TITLE {}", track.title()); }
		if ! track.performer().is_empty() { let _ = writeln!(out, "  PERFORMER {}", track.performer()); }
		if ! track.songwriter().is_empty() { let _ = writeln!(out, "  SONGWRITER {}", track.songwriter()); }
		if let Some(isrc) = track.isrc() { let _ = writeln!(out, "  ISRC {isrc}"); }
		for rem in track.rems() {
			let _ = writeln!(out, "  REM {rem}");
		}
		if track.pregap() > 0 { let _ = writeln!(out, "  PREGAP {}", render_time(track.pregap())); }
		for idx in track.indexes() {
			let _ = writeln!(out, "  INDEX {:02} {}", idx.number(), render_time(idx.time()));
		}
		if track.postgap() > 0 { let _ = writeln!(out, "  POSTGAP {}", render_time(track.postgap())); }
	}

	out
}

/// # Parse a CDRWIN Cue Sheet.
///
/// # Errors
/// Returns [`CueError::Bug`] on malformed input (this is the crate's own
/// renderer output round-tripping, not a tolerant third-party parser).
pub fn parse(text: &str) -> Result<CueSheet, CueError> {
	let mut cs = CueSheet::default();
	let mut cur_track: Option<Track> = None;

	macro_rules! flush_track {
		() => {
			if let Some(t) = cur_track.take() {
				cs.push_track(t)?;
			}
		};
	}

	for raw_line in text.lines() {
		let line = raw_line.trim();
		if line.is_empty() { continue; }

		let (keyword, rest) = line.split_once(' ').unwrap_or((line, ""));
		let rest = rest.trim();

		match keyword {
			"CATALOG" => cs.set_catalog(rest)?,
			"FILE" => {
				let (name, kind) = split_file_line(rest)
					.ok_or(CueError::Bug("malformed FILE line"))?;
				cs.set_file_name(name);
				cs.set_file_type(file_type_from_str(kind).ok_or(CueError::Bug("unknown file type"))?);
			},
			"CDTEXTFILE" => cs.set_cd_text_path(unquote(rest)),
			"TITLE" => match &mut cur_track {
				Some(t) => t.set_title(rest),
				None => cs.set_title(rest),
			},
			"PERFORMER" => match &mut cur_track {
				Some(t) => t.set_performer(rest),
				None => cs.set_performer(rest),
			},
			"SONGWRITER" => match &mut cur_track {
				Some(t) => t.set_songwriter(rest),
				None => cs.set_songwriter(rest),
			},
			"REM" => match &mut cur_track {
				Some(t) => t.push_rem(rest),
				None => cs.push_rem(rest),
			},
			"TRACK" => {
				flush_track!();
				let (num_s, kind_s) = rest.split_once(' ').ok_or(CueError::Bug("malformed TRACK line"))?;
				let number: u8 = num_s.parse().map_err(|_| CueError::Bug("bad track number"))?;
				let kind = track_kind_from_str(kind_s).ok_or(CueError::Bug("unknown track type"))?;
				cur_track = Some(Track::new(number, kind).ok_or(CueError::Bug("track number out of range"))?);
			},
			"FLAGS" => if let Some(t) = &mut cur_track {
				for flag in rest.split_whitespace() {
					match flag {
						"DCP" => t.set_flag_dcp(true),
						"4CH" => t.set_flag_4ch(true),
						"PRE" => t.set_flag_pre(true),
						"SCMS" => t.set_flag_scms(true),
						"DATA" => t.set_flag_data(true),
						_ => return Err(CueError::Bug("unknown flag")),
					}
				}
			},
			"ISRC" => if let Some(t) = &mut cur_track { t.set_isrc(rest)?; },
			"PREGAP" => if let Some(t) = &mut cur_track {
				t.set_pregap(parse_time(rest).ok_or(CueError::Bug("bad PREGAP timestamp"))?);
			},
			"POSTGAP" => if let Some(t) = &mut cur_track {
				t.set_postgap(parse_time(rest).ok_or(CueError::Bug("bad POSTGAP timestamp"))?);
			},
			"INDEX" => if let Some(t) = &mut cur_track {
				let (num_s, time_s) = rest.split_once(' ').ok_or(CueError::Bug("malformed INDEX line"))?;
				let number: u8 = num_s.parse().map_err(|_| CueError::Bug("bad index number"))?;
				let time = parse_time(time_s).ok_or(CueError::Bug("bad INDEX timestamp"))?;
				let idx = Index::new(number, time).ok_or(CueError::Bug("index number out of range"))?;
				t.push_index(idx)?;
			},
			_ => return Err(CueError::Bug("unknown cue sheet keyword")),
		}
	}

	flush_track!();
	Ok(cs)
}

/// # Split a `FILE "name" KIND` Tail.
fn split_file_line(rest: &str) -> Option<(&str, &str)> {
	if let Some(stripped) = rest.strip_prefix('"') {
		let end = stripped.find('"')?;
		let name = &stripped[..end];
		let kind = stripped[end + 1..].trim();
		Some((name, kind))
	}
	else {
		rest.rsplit_once(' ')
	}
}

/// # Strip Surrounding Quotes.
fn unquote(s: &str) -> &str {
	s.strip_prefix('"').and_then(|s| s.strip_suffix('"')).unwrap_or(s)
}



#[cfg(test)]
mod tests {
	use super::*;
	use crate::model::TrackKind;

	fn sample() -> CueSheet {
		let mut cs = CueSheet::default();
		cs.set_catalog("9332727016318").unwrap();
		cs.set_file_name("Album.wav");
		cs.set_file_type(FileType::Wave);
		cs.set_title("Album Title");
		let mut t1 = Track::new(1, TrackKind::Audio).unwrap();
		t1.set_title("Track One");
		t1.set_flag_dcp(true);
		t1.push_index(Index::new(1, 0).unwrap()).unwrap();
		cs.push_track(t1).unwrap();
		let mut t2 = Track::new(2, TrackKind::Audio).unwrap();
		t2.set_title("Track Two");
		t2.push_index(Index::new(1, 1000).unwrap()).unwrap();
		cs.push_track(t2).unwrap();
		cs
	}

	#[test]
	fn t_roundtrip() {
		let cs = sample();
		let text = render(&cs);
		let parsed = parse(&text).expect("parse failed");

		assert_eq!(parsed.catalog().unwrap().as_str(), cs.catalog().unwrap().as_str());
		assert_eq!(parsed.title(), cs.title());
		assert_eq!(parsed.len(), cs.len());
		assert_eq!(parsed.track(1).unwrap().title(), "Track One");
		assert!(parsed.track(1).unwrap().flag_dcp());
		assert_eq!(parsed.track(2).unwrap().indexes()[0].time(), 1000);
	}

	#[test]
	fn t_time() {
		assert_eq!(render_time(0), "00:00:00");
		assert_eq!(render_time(75), "00:01:00");
		assert_eq!(parse_time("00:01:00"), Some(75));
		assert_eq!(parse_time("bad"), None);
	}
}
