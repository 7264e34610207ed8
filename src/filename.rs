/*!
# Cuerip: Filename Formatter

Renders a filename from a foobar2000/CUETools-style templating grammar
(spec.md §4.6) over a populated [`CueSheet`]'s fields. Grammar and field
vocabulary grounded on `original_source/src/CFileNameGenerator.h`'s scheme
documentation; the implementation itself is a hand-rolled recursive-descent
parser (no external template-engine crate — the grammar is small and
domain-specific, in the same spirit as the teacher's other hand-rolled
formats).
*/

use crate::{
	CueError,
	error::TemplateErrorKind,
	model::{CueSheet, RemFieldKind},
};

#[derive(Debug, Clone)]
enum Node {
	Literal(String),
	Var(String),
	Cond(Vec<Node>),
	Call(String, Vec<Vec<Node>>),
}

struct Parser<'a> {
	bytes: &'a [u8],
	pos: usize,
}

impl<'a> Parser<'a> {
	fn new(template: &'a str) -> Self { Self { bytes: template.as_bytes(), pos: 0 } }

	fn peek(&self) -> Option<u8> { self.bytes.get(self.pos).copied() }

	fn err(&self, kind: TemplateErrorKind) -> CueError { CueError::Template { offset: self.pos, kind } }

	/// # Parse a Sequence Until EOF or an Unescaped `]`/`)`/`,`.
	fn parse_seq(&mut self, stop: &[u8]) -> Result<Vec<Node>, CueError> {
		let mut nodes = Vec::new();
		let mut literal = String::new();

		macro_rules! flush {
			() => {
				if ! literal.is_empty() { nodes.push(Node::Literal(std::mem::take(&mut literal))); }
			};
		}

		while let Some(b) = self.peek() {
			if stop.contains(&b) { break; }

			match b {
				b'\'' => {
					self.pos += 1;
					let start = self.pos;
					loop {
						match self.peek() {
							None => return Err(self.err(TemplateErrorKind::UnterminatedQuote)),
							Some(b'\'') => {
								self.pos += 1;
								if self.peek() == Some(b'\'') {
									literal.push('\'');
									self.pos += 1;
								}
								else { break; }
							},
							Some(_) => {
								let ch_len = utf8_len(self.bytes[self.pos]);
								literal.push_str(std::str::from_utf8(&self.bytes[self.pos..self.pos + ch_len]).unwrap_or(""));
								self.pos += ch_len;
							},
						}
					}
					let _ = start;
				},
				b'%' => {
					flush!();
					self.pos += 1;
					let start = self.pos;
					while let Some(c) = self.peek() {
						if c == b'%' { break; }
						self.pos += 1;
					}
					if self.peek() != Some(b'%') { return Err(self.err(TemplateErrorKind::UnterminatedVariable)); }
					let name = std::str::from_utf8(&self.bytes[start..self.pos]).unwrap_or("").to_owned();
					self.pos += 1;
					nodes.push(Node::Var(name));
				},
				b'[' => {
					flush!();
					self.pos += 1;
					let inner = self.parse_seq(&[b']'])?;
					if self.peek() != Some(b']') { return Err(self.err(TemplateErrorKind::UnterminatedConditional)); }
					self.pos += 1;
					nodes.push(Node::Cond(inner));
				},
				b']' => return Err(self.err(TemplateErrorKind::UnmatchedConditionalClose)),
				b'$' => {
					flush!();
					self.pos += 1;
					let start = self.pos;
					while let Some(c) = self.peek() {
						if c == b'(' || c.is_ascii_whitespace() { break; }
						self.pos += 1;
					}
					let name = std::str::from_utf8(&self.bytes[start..self.pos]).unwrap_or("").to_owned();
					if self.peek() != Some(b'(') { return Err(self.err(TemplateErrorKind::BadFunctionCall)); }
					self.pos += 1;

					let mut args = Vec::new();
					loop {
						let arg = self.parse_seq(&[b',', b')'])?;
						args.push(arg);
						match self.peek() {
							Some(b',') => { self.pos += 1; },
							Some(b')') => { self.pos += 1; break; },
							_ => return Err(self.err(TemplateErrorKind::BadFunctionCall)),
						}
					}
					nodes.push(Node::Call(name, args));
				},
				_ => {
					let ch_len = utf8_len(b);
					literal.push_str(std::str::from_utf8(&self.bytes[self.pos..self.pos + ch_len]).unwrap_or(""));
					self.pos += ch_len;
				},
			}
		}

		flush!();
		Ok(nodes)
	}
}

const fn utf8_len(b: u8) -> usize {
	if b & 0b1111_1000 == 0b1111_0000 { 4 }
	else if b & 0b1111_0000 == 0b1110_0000 { 3 }
	else if b & 0b1110_0000 == 0b1100_0000 { 2 }
	else { 1 }
}



/// # Evaluation Context.
///
/// Resolves a named field against a populated cue sheet.
struct Ctx<'a> {
	cs: &'a CueSheet,
	disc: Option<(u8, u8)>,
}

impl Ctx<'_> {
	fn lookup(&self, name: &str) -> String {
		match name {
			"artist" => {
				let p = self.cs.performer();
				if ! p.is_empty() { p.to_owned() } else { self.cs.songwriter().to_owned() }
			},
			"performer" => self.cs.performer().to_owned(),
			"songwriter" => self.cs.songwriter().to_owned(),
			"album artist" => self.lookup("artist"),
			"artist first" | "performer first" | "songwriter first" => {
				let base = self.lookup(name.trim_end_matches(" first"));
				first_name(&base)
			},
			"artist lastname" | "performer lastname" | "songwriter lastname" => {
				let base = self.lookup(name.trim_end_matches(" lastname"));
				last_name(&first_name(&base))
			},
			"album" => self.cs.title().to_owned(),
			"disc" | "discnumber" => self.disc.map(|(d, _)| d.to_string()).unwrap_or_default(),
			"discs" | "totaldiscs" => self.disc.map(|(_, t)| t.to_string()).unwrap_or_default(),
			_ => {
				let Some(kind) = RemFieldKind::from_tag(&name.to_uppercase()) else { return String::new(); };
				self.cs.rems().iter()
					.find_map(|r| r.strip_prefix(kind.tag()).map(|v| v.trim_start().to_owned()))
					.unwrap_or_default()
			},
		}
	}
}

fn first_name(full: &str) -> String {
	full.split(&[',', '&', '/'][..]).next().unwrap_or(full).trim().to_owned()
}

fn last_name(first: &str) -> String {
	first.split_whitespace().next_back().unwrap_or(first).to_owned()
}



fn eval_seq(nodes: &[Node], ctx: &Ctx, offset_base: usize) -> Result<String, CueError> {
	let mut out = String::new();
	for node in nodes {
		match node {
			Node::Literal(s) => out.push_str(s),
			Node::Var(name) => out.push_str(&ctx.lookup(name)),
			Node::Cond(inner) => {
				let mut any_empty = false;
				let mut text = String::new();
				for n in inner {
					match n {
						Node::Var(name) => {
							let v = ctx.lookup(name);
							if v.is_empty() { any_empty = true; }
							text.push_str(&v);
						},
						Node::Literal(s) => text.push_str(s),
						other => text.push_str(&eval_seq(std::slice::from_ref(other), ctx, offset_base)?),
					}
				}
				if ! any_empty { out.push_str(&text); }
			},
			Node::Call(name, args) => {
				let mut rendered = Vec::with_capacity(args.len());
				for a in args { rendered.push(eval_seq(a, ctx, offset_base)?); }
				out.push_str(&call_fn(name, &rendered, offset_base)?);
			},
		}
	}
	Ok(out)
}

fn call_fn(name: &str, args: &[String], offset: usize) -> Result<String, CueError> {
	let first = args.first().map(String::as_str).unwrap_or("");
	match name {
		"lower" => Ok(first.to_lowercase()),
		"caps" | "upper" => Ok(first.to_uppercase()),
		"trim" => Ok(first.trim().to_owned()),
		"abbreviate" => Ok(first.split_whitespace().filter_map(|w| w.chars().next()).collect::<String>().to_uppercase()),
		"cut" => {
			let n: usize = args.get(1).and_then(|s| s.parse().ok())
				.ok_or_else(|| CueError::Template { offset, kind: TemplateErrorKind::BadFunctionCall })?;
			Ok(first.chars().take(n).collect())
		},
		"replace" => {
			let from = args.get(1).map(String::as_str).unwrap_or("");
			let to = args.get(2).map(String::as_str).unwrap_or("");
			Ok(first.replace(from, to))
		},
		"swapprefix" => {
			for prefix in &args[1..] {
				if let Some(rest) = first.strip_prefix(prefix.as_str()) {
					return Ok(format!("{}, {prefix}", rest.trim_start()));
				}
			}
			Ok(first.to_owned())
		},
		_ => Err(CueError::Template { offset, kind: TemplateErrorKind::UnknownFunction(name.to_owned()) }),
	}
}



/// # Render a Filename From a Template.
///
/// `disc` is an optional `(disc_number, total_discs)` pair, since
/// [`CueSheet`] itself carries disc-scope information only via `REM DISC`/
/// `REM DISCS` lines when materialised by the Aggregator.
///
/// # Errors
/// Returns [`CueError::Template`] if the template is malformed.
pub fn render(template: &str, cs: &CueSheet, disc: Option<(u8, u8)>) -> Result<String, CueError> {
	let mut parser = Parser::new(template);
	let nodes = parser.parse_seq(&[])?;
	if parser.peek().is_some() { return Err(parser.err(TemplateErrorKind::UnmatchedConditionalClose)); }
	eval_seq(&nodes, &Ctx { cs, disc }, 0)
}



#[cfg(test)]
mod tests {
	use super::*;

	fn sample_cs() -> CueSheet {
		let mut cs = CueSheet::default();
		cs.set_performer("The Beatles");
		cs.set_title("Abbey Road");
		cs
	}

	#[test]
	fn t_basic_vars() {
		let cs = sample_cs();
		assert_eq!(render("%artist% - %album%", &cs, None).unwrap(), "The Beatles - Abbey Road");
	}

	#[test]
	fn t_quoted_literal() {
		let cs = sample_cs();
		assert_eq!(render("'100% mine'", &cs, None).unwrap(), "100% mine");
	}

	#[test]
	fn t_conditional_suppressed() {
		let cs = CueSheet::default();
		assert_eq!(render("[%album% - ]untitled", &cs, None).unwrap(), "untitled");
	}

	#[test]
	fn t_conditional_kept() {
		let cs = sample_cs();
		assert_eq!(render("[%album% - ]untitled", &cs, None).unwrap(), "Abbey Road - untitled");
	}

	#[test]
	fn t_function_calls() {
		let cs = sample_cs();
		assert_eq!(render("$lower(%album%)", &cs, None).unwrap(), "abbey road");
		assert_eq!(render("$cut(%album%,5)", &cs, None).unwrap(), "Abbey");
		assert_eq!(render("$swapprefix(%artist%,The)", &cs, None).unwrap(), "Beatles, The");
	}

	#[test]
	fn t_unterminated_quote_errors() {
		let cs = sample_cs();
		let err = render("'oops", &cs, None).unwrap_err();
		assert!(matches!(err, CueError::Template { kind: TemplateErrorKind::UnterminatedQuote, .. }));
	}

	#[test]
	fn t_unknown_function_errors() {
		let cs = sample_cs();
		let err = render("$bogus(%album%)", &cs, None).unwrap_err();
		assert!(matches!(err, CueError::Template { kind: TemplateErrorKind::UnknownFunction(_), .. }));
	}

	#[test]
	fn t_album_artist_variable() {
		let mut cs = CueSheet::default();
		cs.set_performer("Evans");
		cs.set_title("Moonbeams");
		let tpl = "[%album artist% - ]%album%['['%disc%']']";
		assert_eq!(render(tpl, &cs, None).unwrap(), "Evans - Moonbeams");
	}
}
