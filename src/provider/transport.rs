/*!
# Cuerip: Provider Transport

A process-singleton HTTP transport, grounded directly on the teacher's
`chk.rs` (`AGENT`/`AgentBuilder`/`download()`): one shared [`ureq::Agent`]
behind a [`OnceLock`], an explicit timeout, and a custom user-agent string.
Generalised per spec.md §5's "process-singleton transport sub-system with
explicit init/shutdown" design note — providers borrow this handle rather
than reaching for a global.
*/

use crate::error::{CueError, TransportErrorKind, DecodeErrorKind};
use std::{sync::OnceLock, time::Duration};
use ureq::{Agent, AgentBuilder};

/// # Connection Agent.
static AGENT: OnceLock<Agent> = OnceLock::new();

fn agent() -> &'static Agent {
	AGENT.get_or_init(||
		AgentBuilder::new()
			.timeout(Duration::from_secs(15))
			.user_agent(concat!(
				"Cuerip/",
				env!("CARGO_PKG_VERSION"),
				" ( https://example.invalid/cuerip )",
			))
			.max_idle_connections(4)
			.build()
	)
}

/// # Transport.
///
/// Thin handle over the shared agent; providers hold one of these rather
/// than calling `ureq` directly, so the query-issuing code stays mockable.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct Transport;

impl Transport {
	#[must_use]
	/// # New.
	pub(crate) const fn new() -> Self { Self }

	/// # Get JSON.
	///
	/// Issues a GET request and parses the body as JSON.
	///
	/// # Errors
	/// Returns [`CueError::Transport`] on a network-level failure and
	/// [`CueError::Decode`] if the body isn't valid JSON.
	pub(crate) fn get_json(&self, url: &str) -> Result<serde_json::Value, CueError> {
		let res = agent().get(url).call().map_err(|err| match err {
			ureq::Error::Status(404, _) => CueError::Transport(TransportErrorKind::NotFound),
			ureq::Error::Status(429, _) => CueError::Transport(TransportErrorKind::RateLimited),
			ureq::Error::Status(_, _) => CueError::Transport(TransportErrorKind::Protocol),
			ureq::Error::Transport(_) => CueError::Transport(TransportErrorKind::Timeout),
		})?;

		res.into_json::<serde_json::Value>()
			.map_err(|_| CueError::Decode(DecodeErrorKind::Malformed))
	}

	/// # Get Bytes.
	///
	/// Issues a GET request and returns the raw response body (used for
	/// cover-art fetches).
	///
	/// # Errors
	/// Returns [`CueError::Transport`] on a network-level failure.
	pub(crate) fn get_bytes(&self, url: &str) -> Result<Vec<u8>, CueError> {
		use std::io::Read;

		let res = agent().get(url).call().map_err(|_| CueError::Transport(TransportErrorKind::Protocol))?;
		let mut out = Vec::new();
		res.into_reader().read_to_end(&mut out)
			.map_err(|_| CueError::Transport(TransportErrorKind::Protocol))?;
		Ok(out)
	}
}
