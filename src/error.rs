/*!
# Cuerip: Errors
*/

use cdtoc::TocError;
use std::{
	error::Error,
	fmt,
};



#[derive(Debug, Clone, Eq, PartialEq)]
/// # Device Error Kind.
pub enum DeviceErrorKind {
	/// # No drive could be located.
	NoDrive,
	/// # The disc/device could not be opened.
	OpenFailed,
	/// # A sector read failed.
	ReadFailed,
	/// # A preliminary disc identifier could not be computed.
	IdFailed,
}

impl fmt::Display for DeviceErrorKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			Self::NoDrive => "no drive",
			Self::OpenFailed => "open failed",
			Self::ReadFailed => "read failed",
			Self::IdFailed => "id failed",
		})
	}
}

#[derive(Debug, Clone, Eq, PartialEq)]
/// # Transport Error Kind.
pub enum TransportErrorKind {
	/// # The call exceeded its configured timeout.
	Timeout,
	/// # The remote server returned a malformed or unexpected response.
	Protocol,
	/// # The remote server reported no such record.
	NotFound,
	/// # The remote server is rate-limiting this client.
	RateLimited,
}

impl fmt::Display for TransportErrorKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			Self::Timeout => "timeout",
			Self::Protocol => "protocol",
			Self::NotFound => "not found",
			Self::RateLimited => "rate limited",
		})
	}
}

#[derive(Debug, Clone, Eq, PartialEq)]
/// # Decode Error Kind.
pub enum DecodeErrorKind {
	/// # The response body could not be parsed at all.
	Malformed,
	/// # The response parsed but didn't match the expected schema.
	SchemaMismatch,
}

impl fmt::Display for DecodeErrorKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			Self::Malformed => "malformed",
			Self::SchemaMismatch => "schema mismatch",
		})
	}
}

#[derive(Debug, Clone, Eq, PartialEq)]
/// # Filename Template Error Kind.
pub enum TemplateErrorKind {
	/// # A `'` quoted segment was never closed.
	UnterminatedQuote,
	/// # A `%var%` segment was never closed.
	UnterminatedVariable,
	/// # A `[…]` conditional group was never closed.
	UnterminatedConditional,
	/// # A `]` appeared with no matching `[`.
	UnmatchedConditionalClose,
	/// # A `$fn(…)` call was malformed.
	BadFunctionCall,
	/// # An unknown function name was invoked.
	UnknownFunction(String),
}

impl fmt::Display for TemplateErrorKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::UnterminatedQuote => f.write_str("unterminated quote"),
			Self::UnterminatedVariable => f.write_str("unterminated variable"),
			Self::UnterminatedConditional => f.write_str("unterminated conditional"),
			Self::UnmatchedConditionalClose => f.write_str("unmatched ]"),
			Self::BadFunctionCall => f.write_str("malformed function call"),
			Self::UnknownFunction(s) => write!(f, "unknown function {s}"),
		}
	}
}



#[derive(Debug, Clone, Eq, PartialEq)]
/// # Errors.
///
/// One flat error type for the whole crate, following the taxonomy every
/// caller needs to branch on. Provider- and decode-scoped variants are
/// non-fatal to an aggregation session; device and protocol variants are not.
pub enum CueError {
	/// # Bug!
	Bug(&'static str),

	/// # `cdtoc` passthrough.
	Cdtoc(TocError),

	/// # Fatal drive/disc failure.
	Device(DeviceErrorKind),

	/// # Provider-scoped network failure.
	Transport(TransportErrorKind),

	/// # Provider-scoped response-parsing failure.
	Decode(DecodeErrorKind),

	/// # A match index or track number was out of range.
	IndexOutOfRange,

	/// # A sink call arrived out of life-cycle order.
	ProtocolViolation,

	/// # A sink call presented the wrong lock-sign.
	NotOwner,

	/// # The operation isn't offered by this variant.
	Unsupported,

	/// # A filename template failed to parse.
	Template {
		/// # Byte offset into the template.
		offset: usize,
		/// # What went wrong.
		kind: TemplateErrorKind,
	},

	/// # An input was mutated after the worker had already started.
	AlreadyRunning,

	/// # An invalid catalog/MCN number.
	Catalog,

	/// # An invalid ISRC.
	Isrc,
}

impl Error for CueError {}

impl From<TocError> for CueError {
	#[inline]
	fn from(err: TocError) -> Self { Self::Cdtoc(err) }
}

impl fmt::Display for CueError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Bug(s) => write!(f, "Bug: {s}."),
			Self::Cdtoc(s) => write!(f, "{s}"),
			Self::Device(k) => write!(f, "Device error: {k}."),
			Self::Transport(k) => write!(f, "Transport error: {k}."),
			Self::Decode(k) => write!(f, "Decode error: {k}."),
			Self::IndexOutOfRange => f.write_str("Index out of range."),
			Self::ProtocolViolation => f.write_str("Sink method called out of order."),
			Self::NotOwner => f.write_str("Lock-sign mismatch."),
			Self::Unsupported => f.write_str("Not supported by this variant."),
			Self::Template { offset, kind } => write!(f, "Invalid filename template at byte {offset}: {kind}."),
			Self::AlreadyRunning => f.write_str("Inputs cannot be changed once started."),
			Self::Catalog => f.write_str("Invalid catalog/MCN number."),
			Self::Isrc => f.write_str("Invalid ISRC."),
		}
	}
}



#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn t_display() {
		assert_eq!(CueError::NotOwner.to_string(), "Lock-sign mismatch.");
		assert_eq!(
			CueError::Template { offset: 4, kind: TemplateErrorKind::UnterminatedQuote }.to_string(),
			"Invalid filename template at byte 4: unterminated quote.",
		);
	}
}
