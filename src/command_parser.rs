//! Line-oriented command parser (C5): script text to a sequence of command
//! objects (spec.md §4.5).
//!
//! This is a second, much smaller grammar than the expression language in
//! `parser.rs`. Each command occupies exactly one line; a line comment begins
//! with an unquoted `#`, and blank lines are dropped. Rather than tokenising
//! up front, each line is scanned directly with a small hand-rolled cursor —
//! most of a line's content (plot expressions, assignment right-hand sides,
//! function bodies) is captured as raw text and handed to [`crate::parser`]
//! lazily, the same way user-defined function bodies are stored unparsed in
//! [`crate::context::UserFunction`].

use std::fmt;

use crate::ast::Node;
use crate::command_ast::{
	Bound, Command, Dgrid3dMode, Dgrid3dOption, HorizontalAnchor, KeyToken, PlotSource, PlotSpec,
	PlotSpecStyle, PlotStyle, PlotStyle3D, Range, SetOption, SpannedCommand, UnsetOption,
	VerticalAnchor,
};
use crate::diagnostics::Diagnostic;
use crate::location::SourceLocation;

#[derive(Debug)]
pub struct Error {
	pub diagnostics: Vec<Diagnostic>,
}

impl fmt::Display for Error {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{} command error(s):", self.diagnostics.len())?;
		for diagnostic in &self.diagnostics {
			write!(f, "\n  {}", diagnostic.message)?;
		}
		Ok(())
	}
}

impl std::error::Error for Error {}

/// Parses an entire script into its command sequence. Every line is parsed
/// independently, so one bad line does not prevent the rest from reporting
/// their own errors (spec.md §4.1's aggregation behaviour, reused here).
pub fn parse_script(source: &str) -> Result<Vec<SpannedCommand>, Error> {
	let mut commands = Vec::new();
	let mut diagnostics = Vec::new();
	let mut offset = 0usize;
	for (line_index, raw_line) in source.split('\n').enumerate() {
		let line_no = line_index + 1;
		let line_start = offset;
		offset += raw_line.len() + 1;
		let line = raw_line.strip_suffix('\r').unwrap_or(raw_line);
		let line = strip_comment(line);
		if line.trim().is_empty() {
			continue;
		}
		let mut scanner = LineScanner { line, line_no, line_start, pos: 0 };
		match scanner.parse_command() {
			Ok(command) => {
				let location = SourceLocation::new(line_no, 1, line_start, line_start + line.len());
				commands.push(SpannedCommand { command, location });
			}
			Err(diagnostic) => diagnostics.push(diagnostic),
		}
	}
	if diagnostics.is_empty() {
		Ok(commands)
	} else {
		Err(Error { diagnostics })
	}
}

/// Cuts `line` at the first `#` that is not inside a quoted string.
fn strip_comment(line: &str) -> &str {
	let mut in_quote: Option<char> = None;
	for (idx, ch) in line.char_indices() {
		match in_quote {
			Some(q) if ch == q => in_quote = None,
			Some(_) => {}
			None if ch == '\'' || ch == '"' => in_quote = Some(ch),
			None if ch == '#' => return &line[..idx],
			None => {}
		}
	}
	line
}

struct LineScanner<'a> {
	line: &'a str,
	line_no: usize,
	line_start: usize,
	pos: usize,
}

impl<'a> LineScanner<'a> {
	fn rest(&self) -> &'a str {
		&self.line[self.pos..]
	}

	fn at_eol(&self) -> bool {
		self.pos >= self.line.len()
	}

	fn peek_char(&self) -> Option<char> {
		self.rest().chars().next()
	}

	fn skip_ws(&mut self) {
		while let Some(ch) = self.peek_char() {
			if ch.is_whitespace() {
				self.pos += ch.len_utf8();
			} else {
				break;
			}
		}
	}

	fn location(&self, start: usize) -> SourceLocation {
		SourceLocation::new(self.line_no, start + 1, self.line_start + start, self.line_start + self.pos)
	}

	fn error(&self, start: usize, message: impl Into<String>) -> Diagnostic {
		Diagnostic::new(self.location(start), message.into())
	}

	fn error_with_suggestion(
		&self,
		start: usize,
		message: impl Into<String>,
		suggestion: impl Into<String>,
	) -> Diagnostic {
		Diagnostic::new(self.location(start), message.into()).with_suggestion(suggestion)
	}

	/// Reads a maximal `[A-Za-z_][A-Za-z0-9_]*` run without consuming it.
	fn peek_word(&self) -> Option<&'a str> {
		let rest = self.rest();
		let mut chars = rest.char_indices();
		match chars.next() {
			Some((_, c)) if c.is_alphabetic() || c == '_' => {}
			_ => return None,
		}
		let mut end = rest.len();
		for (idx, c) in chars {
			if !(c.is_alphanumeric() || c == '_') {
				end = idx;
				break;
			}
		}
		Some(&rest[..end])
	}

	fn consume_word(&mut self) -> Option<&'a str> {
		let word = self.peek_word()?;
		self.pos += word.len();
		Some(word)
	}

	fn starts_with_word(&self, word: &str) -> bool {
		self.peek_word().map(|w| w.eq_ignore_ascii_case(word)).unwrap_or(false)
	}

	fn expect_eol(&mut self) -> Result<(), Diagnostic> {
		self.skip_ws();
		if self.at_eol() {
			Ok(())
		} else {
			Err(self.error(self.pos, format!("unexpected trailing text: '{}'", self.rest())))
		}
	}

	fn read_number(&mut self) -> Result<f64, Diagnostic> {
		self.skip_ws();
		let start = self.pos;
		let rest = self.rest();
		let mut end = 0usize;
		let mut chars = rest.char_indices().peekable();
		if let Some((_, c)) = chars.peek() {
			if *c == '+' || *c == '-' {
				chars.next();
			}
		}
		let mut seen_digit = false;
		let mut seen_dot = false;
		let mut seen_exp = false;
		while let Some(&(idx, c)) = chars.peek() {
			if c.is_ascii_digit() {
				seen_digit = true;
				end = idx + c.len_utf8();
				chars.next();
			} else if c == '.' && !seen_dot && !seen_exp {
				seen_dot = true;
				end = idx + c.len_utf8();
				chars.next();
			} else if (c == 'e' || c == 'E') && seen_digit && !seen_exp {
				seen_exp = true;
				end = idx + c.len_utf8();
				chars.next();
				if let Some(&(sign_idx, sign)) = chars.peek() {
					if sign == '+' || sign == '-' {
						end = sign_idx + sign.len_utf8();
						chars.next();
					}
				}
			} else {
				break;
			}
		}
		if !seen_digit {
			return Err(self.error(start, "expected a number"));
		}
		let text = &rest[..end];
		self.pos += end;
		text.parse::<f64>().map_err(|_| self.error(start, format!("malformed number '{text}'")))
	}

	fn read_expr_node(&mut self, text: &str, start: usize) -> Result<Node, Diagnostic> {
		crate::parser::parse(text).map_err(|e| {
			self.error_with_suggestion(start, format!("malformed expression '{text}': {e}"), "check the range bound's syntax")
		})
	}

	/// Parses a `'...'` or `"..."` quoted string, no escape sequences.
	fn parse_quoted_string(&mut self) -> Result<String, Diagnostic> {
		self.skip_ws();
		let start = self.pos;
		let quote = match self.peek_char() {
			Some(c) if c == '\'' || c == '"' => c,
			_ => return Err(self.error(start, "expected a quoted string")),
		};
		self.pos += quote.len_utf8();
		let body_start = self.pos;
		loop {
			match self.peek_char() {
				Some(c) if c == quote => {
					let text = self.line[body_start..self.pos].to_string();
					self.pos += c.len_utf8();
					return Ok(text);
				}
				Some(c) => self.pos += c.len_utf8(),
				None => return Err(self.error(start, "unterminated quoted string")),
			}
		}
	}

	/// Parses `[min:max]`, where either bound may be `*` for autoscale.
	fn parse_range(&mut self) -> Result<Range, Diagnostic> {
		let start = self.pos;
		self.pos += 1; // '['
		let close = self.rest().find(']').ok_or_else(|| self.error(start, "unterminated range: missing ']'"))?;
		let inner = &self.line[self.pos..self.pos + close];
		let colon = inner.find(':').ok_or_else(|| self.error(start, "range must be '[min:max]'"))?;
		let (min_text, max_text) = (inner[..colon].trim(), inner[colon + 1..].trim());
		let min = self.parse_bound(min_text, self.pos)?;
		let max = self.parse_bound(max_text, self.pos + colon + 1)?;
		self.pos += close + 1;
		Ok(Range { min, max })
	}

	fn parse_bound(&mut self, text: &str, start: usize) -> Result<Bound, Diagnostic> {
		if text == "*" || text.is_empty() {
			Ok(Bound::Auto)
		} else {
			Ok(Bound::Expr(self.read_expr_node(text, start)?))
		}
	}

	fn parse_command(&mut self) -> Result<Command, Diagnostic> {
		self.skip_ws();
		let keyword = self.peek_word().map(|w| w.to_ascii_lowercase());
		match keyword.as_deref() {
			Some("set") => {
				self.consume_word();
				self.parse_set()
			}
			Some("unset") => {
				self.consume_word();
				self.parse_unset()
			}
			Some("plot") => {
				self.consume_word();
				self.parse_plot(false)
			}
			Some("splot") => {
				self.consume_word();
				self.parse_plot(true)
			}
			Some("pause") => {
				self.consume_word();
				self.parse_pause()
			}
			Some("reset") => {
				self.consume_word();
				self.expect_eol()?;
				Ok(Command::Reset)
			}
			_ => self.parse_assignment_or_definition(),
		}
	}

	fn parse_set(&mut self) -> Result<Command, Diagnostic> {
		self.skip_ws();
		let start = self.pos;
		let option = self.consume_word().ok_or_else(|| self.error(start, "expected an option name after 'set'"))?;
		let option = option.to_ascii_lowercase();
		let set_option = match option.as_str() {
			"title" => SetOption::Title(self.parse_quoted_string()?),
			"xlabel" => SetOption::XLabel(self.parse_quoted_string()?),
			"ylabel" => SetOption::YLabel(self.parse_quoted_string()?),
			"samples" => {
				let n = self.read_number()?;
				if n < 2.0 {
					return Err(self.error(start, "samples must be at least 2"));
				}
				SetOption::Samples(n.round() as usize)
			}
			"grid" => SetOption::Grid,
			"border" => SetOption::Border,
			"output" => SetOption::Output(self.parse_quoted_string()?),
			"key" => SetOption::Key(self.parse_key_tokens()?),
			"style" => {
				self.skip_ws();
				let kw_start = self.pos;
				let kind = self
					.consume_word()
					.ok_or_else(|| self.error(kw_start, "expected 'data' after 'set style'"))?;
				if !kind.eq_ignore_ascii_case("data") {
					return Err(self.error(kw_start, format!("unsupported 'set style {kind}'")));
				}
				SetOption::StyleData(self.parse_2d_style_word()?)
			}
			"dgrid3d" => SetOption::Dgrid3d(self.parse_dgrid3d()?),
			other => {
				// Unknown options are silently ignored by design (spec.md
				// §4.5); consume the rest of the line rather than failing.
				self.pos = self.line.len();
				SetOption::Unknown(other.to_string())
			}
		};
		self.expect_eol()?;
		Ok(Command::Set(set_option))
	}

	fn parse_unset(&mut self) -> Result<Command, Diagnostic> {
		self.skip_ws();
		let start = self.pos;
		let option = self.consume_word().ok_or_else(|| self.error(start, "expected an option name after 'unset'"))?;
		let unset = match option.to_ascii_lowercase().as_str() {
			"grid" => UnsetOption::Grid,
			"border" => UnsetOption::Border,
			"title" => UnsetOption::Title,
			"xlabel" => UnsetOption::XLabel,
			"ylabel" => UnsetOption::YLabel,
			"dgrid3d" => UnsetOption::Dgrid3d,
			"key" => UnsetOption::Key,
			other => return Err(self.error(start, format!("unknown 'unset' option: '{other}'"))),
		};
		self.expect_eol()?;
		Ok(Command::Unset(unset))
	}

	/// `set key` carries zero or more tokens, each updating one independent
	/// field of the executor's key state (spec.md §4.6).
	fn parse_key_tokens(&mut self) -> Result<Vec<KeyToken>, Diagnostic> {
		let mut tokens = Vec::new();
		let mut has_vertical = false;
		loop {
			self.skip_ws();
			if self.at_eol() {
				break;
			}
			let start = self.pos;
			let word = self.consume_word().ok_or_else(|| self.error(start, "expected a 'set key' keyword"))?;
			let token = match word.to_ascii_lowercase().as_str() {
				"top" => KeyToken::Vertical(VerticalAnchor::Top),
				"bottom" => KeyToken::Vertical(VerticalAnchor::Bottom),
				"tmargin" => KeyToken::Vertical(VerticalAnchor::TMargin),
				"bmargin" => KeyToken::Vertical(VerticalAnchor::BMargin),
				"left" => KeyToken::Horizontal(HorizontalAnchor::Left),
				"right" => KeyToken::Horizontal(HorizontalAnchor::Right),
				"center" => {
					if !has_vertical {
						KeyToken::Vertical(VerticalAnchor::Center)
					} else {
						KeyToken::Horizontal(HorizontalAnchor::Center)
					}
				}
				"box" => KeyToken::Border(true),
				"nobox" => KeyToken::Border(false),
				"horizontal" => KeyToken::LayoutHorizontal(true),
				"vertical" => KeyToken::LayoutHorizontal(false),
				other => return Err(self.error(start, format!("unknown 'set key' token: '{other}'"))),
			};
			if matches!(token, KeyToken::Vertical(_)) {
				has_vertical = true;
			}
			tokens.push(token);
		}
		Ok(tokens)
	}

	fn parse_2d_style_word(&mut self) -> Result<PlotStyle, Diagnostic> {
		let start = self.pos;
		let word = self.consume_word().ok_or_else(|| self.error(start, "expected a plot style"))?;
		match word.to_ascii_lowercase().as_str() {
			"lines" => Ok(PlotStyle::Lines),
			"points" => Ok(PlotStyle::Points),
			"linespoints" => Ok(PlotStyle::LinesPoints),
			"impulses" => Ok(PlotStyle::Impulses),
			other => Err(self.error(start, format!("unknown plot style: '{other}'"))),
		}
	}

	fn parse_3d_style_word(&mut self) -> Result<PlotStyle3D, Diagnostic> {
		let start = self.pos;
		let word = self.consume_word().ok_or_else(|| self.error(start, "expected a 3D plot style"))?;
		match word.to_ascii_lowercase().as_str() {
			"points" => Ok(PlotStyle3D::Points),
			"lines" => Ok(PlotStyle3D::Lines),
			"surface" => Ok(PlotStyle3D::Surface),
			"dots" => Ok(PlotStyle3D::Dots),
			other => Err(self.error(start, format!("unknown 3D plot style: '{other}'"))),
		}
	}

	/// `dgrid3d <rows>,<cols>[,<norm>] [qnorm|gauss|cauchy|exp|box]`. Row and
	/// column counts come first; the scattered-to-grid interpolation mode and
	/// its norm parameter are optional and default to `qnorm` with norm 1.
	fn parse_dgrid3d(&mut self) -> Result<Dgrid3dOption, Diagnostic> {
		self.skip_ws();
		let rows = self.read_number()?.max(1.0).round() as usize;
		self.skip_ws();
		self.eat_char(',');
		let cols = self.read_number()?.max(1.0).round() as usize;
		self.skip_ws();
		let mut mode = Dgrid3dMode::QNorm;
		if let Some(word) = self.peek_word() {
			let lowered = word.to_ascii_lowercase();
			if let Some(parsed) = match lowered.as_str() {
				"qnorm" => Some(Dgrid3dMode::QNorm),
				"gauss" => Some(Dgrid3dMode::Gauss),
				"cauchy" => Some(Dgrid3dMode::Cauchy),
				"exp" => Some(Dgrid3dMode::Exp),
				"box" => Some(Dgrid3dMode::Box),
				_ => None,
			} {
				self.consume_word();
				mode = parsed;
			}
		}
		self.skip_ws();
		self.eat_char(',');
		self.skip_ws();
		let norm = if self.peek_char().map(|c| c.is_ascii_digit() || c == '.').unwrap_or(false) {
			self.read_number()?
		} else {
			1.0
		};
		Ok(Dgrid3dOption { rows, cols, mode, norm })
	}

	fn eat_char(&mut self, ch: char) -> bool {
		if self.peek_char() == Some(ch) {
			self.pos += ch.len_utf8();
			true
		} else {
			false
		}
	}

	fn parse_pause(&mut self) -> Result<Command, Diagnostic> {
		let seconds = self.read_number()?;
		self.skip_ws();
		let message = if self.at_eol() {
			None
		} else if matches!(self.peek_char(), Some('\'') | Some('"')) {
			Some(self.parse_quoted_string()?)
		} else {
			Some(self.rest().trim().to_string())
		};
		if message.is_some() {
			self.pos = self.line.len();
		}
		self.expect_eol()?;
		Ok(Command::Pause { seconds, message })
	}

	/// `plot`/`splot` share a grammar: zero or more leading `[range]` tokens,
	/// then a comma-separated list of plot specs.
	fn parse_plot(&mut self, is_3d: bool) -> Result<Command, Diagnostic> {
		let max_ranges = if is_3d { 3 } else { 2 };
		let mut ranges = Vec::new();
		loop {
			self.skip_ws();
			if ranges.len() >= max_ranges || self.peek_char() != Some('[') {
				break;
			}
			ranges.push(self.parse_range()?);
		}
		let mut specs = Vec::new();
		loop {
			specs.push(self.parse_plot_spec(is_3d)?);
			self.skip_ws();
			if self.eat_char(',') {
				continue;
			}
			break;
		}
		self.expect_eol()?;
		if is_3d {
			let mut it = ranges.into_iter();
			Ok(Command::Splot {
				range_x: it.next(),
				range_y: it.next(),
				range_z: it.next(),
				specs,
			})
		} else {
			let mut it = ranges.into_iter();
			Ok(Command::Plot { range_x: it.next(), range_y: it.next(), specs })
		}
	}

	fn parse_plot_spec(&mut self, is_3d: bool) -> Result<PlotSpec, Diagnostic> {
		self.skip_ws();
		let start = self.pos;
		let source = if matches!(self.peek_char(), Some('\'') | Some('"')) {
			PlotSource::DataFile(self.parse_quoted_string()?)
		} else {
			let text = self.scan_plot_expression();
			if text.trim().is_empty() {
				return Err(self.error(start, "expected an expression or a quoted filename"));
			}
			PlotSource::Expression(text.trim().to_string())
		};
		self.skip_ws();
		let range = if self.peek_char() == Some('[') { Some(self.parse_range()?) } else { None };
		self.skip_ws();
		let title = if self.starts_with_word("title") {
			self.consume_word();
			Some(self.parse_quoted_string()?)
		} else {
			None
		};
		self.skip_ws();
		let style = if self.starts_with_word("with") {
			self.consume_word();
			self.skip_ws();
			Some(if is_3d {
				PlotSpecStyle::ThreeD(self.parse_3d_style_word()?)
			} else {
				PlotSpecStyle::TwoD(self.parse_2d_style_word()?)
			})
		} else {
			None
		};
		let end = self.pos;
		Ok(PlotSpec { source, range, title, style, location: self.location(start).merge(self.location(end)) })
	}

	/// Scans a plot expression up to the next top-level (paren-depth 0)
	/// comma, `[`, `title`, or `with`, or end of line. Square brackets never
	/// appear inside expressions, so a bare `[` unambiguously starts a range.
	fn scan_plot_expression(&mut self) -> &'a str {
		let start = self.pos;
		let mut depth = 0i32;
		loop {
			if self.at_eol() {
				break;
			}
			if depth == 0 {
				if self.peek_char() == Some(',') || self.peek_char() == Some('[') {
					break;
				}
				if self.starts_with_word("title") || self.starts_with_word("with") {
					break;
				}
			}
			match self.peek_char() {
				Some('(') => depth += 1,
				Some(')') => depth -= 1,
				_ => {}
			}
			self.pos += self.peek_char().map(|c| c.len_utf8()).unwrap_or(1);
		}
		&self.line[start..self.pos]
	}

	fn parse_assignment_or_definition(&mut self) -> Result<Command, Diagnostic> {
		let start = self.pos;
		let name = self
			.consume_word()
			.ok_or_else(|| self.error(start, "expected a command, assignment, or function definition"))?
			.to_string();
		self.skip_ws();
		if self.eat_char('(') {
			let mut params = Vec::new();
			self.skip_ws();
			if self.peek_char() != Some(')') {
				loop {
					self.skip_ws();
					let param_start = self.pos;
					let param = self
						.consume_word()
						.ok_or_else(|| self.error(param_start, "expected a parameter name"))?;
					params.push(param.to_string());
					self.skip_ws();
					if self.eat_char(',') {
						continue;
					}
					break;
				}
			}
			self.skip_ws();
			if !self.eat_char(')') {
				return Err(self.error(self.pos, "expected ')' to close parameter list"));
			}
			self.skip_ws();
			if !self.eat_char('=') {
				return Err(self.error(self.pos, format!("expected '=' after '{name}(...)'")));
			}
			let body_text = self.rest().trim().to_string();
			if body_text.is_empty() {
				return Err(self.error(self.pos, "expected a function body after '='"));
			}
			self.pos = self.line.len();
			return Ok(Command::DefineFn { name, params, body_text });
		}
		if self.eat_char('=') {
			let expr_text = self.rest().trim().to_string();
			if expr_text.is_empty() {
				return Err(self.error(self.pos, "expected an expression after '='"));
			}
			self.pos = self.line.len();
			return Ok(Command::Assign { name, expr_text });
		}
		Err(self.error(start, format!("unrecognised command starting with '{name}'")))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn parse_ok(src: &str) -> Vec<SpannedCommand> {
		parse_script(src).unwrap_or_else(|e| panic!("expected parse of {src:?} to succeed: {e}"))
	}

	#[test]
	fn blank_lines_and_comments_are_dropped() {
		let commands = parse_ok("# a comment\n\n   \nreset\n");
		assert_eq!(commands.len(), 1);
		assert_eq!(commands[0].command, Command::Reset);
	}

	#[test]
	fn set_title_parses_quoted_string() {
		let commands = parse_ok("set title \"hello world\"");
		assert_eq!(commands[0].command, Command::Set(SetOption::Title("hello world".to_string())));
	}

	#[test]
	fn set_samples_parses_integer() {
		let commands = parse_ok("set samples 250");
		assert_eq!(commands[0].command, Command::Set(SetOption::Samples(250)));
	}

	#[test]
	fn set_key_carries_independent_tokens() {
		let commands = parse_ok("set key top right box");
		match &commands[0].command {
			Command::Set(SetOption::Key(tokens)) => {
				assert_eq!(
					tokens,
					&vec![
						KeyToken::Vertical(VerticalAnchor::Top),
						KeyToken::Horizontal(HorizontalAnchor::Right),
						KeyToken::Border(true),
					]
				);
			}
			other => panic!("expected set key, got {other:?}"),
		}
	}

	#[test]
	fn unset_maps_known_options() {
		let commands = parse_ok("unset grid");
		assert_eq!(commands[0].command, Command::Unset(UnsetOption::Grid));
	}

	#[test]
	fn plot_with_ranges_and_multiple_specs() {
		let commands = parse_ok("plot [0:10] [*:*] sin(x) title 'sine' with points, cos(x)");
		match &commands[0].command {
			Command::Plot { range_x, range_y, specs } => {
				assert!(range_x.is_some());
				assert!(range_y.is_some());
				assert_eq!(specs.len(), 2);
				assert_eq!(specs[0].title.as_deref(), Some("sine"));
				assert_eq!(specs[0].style, Some(PlotSpecStyle::TwoD(PlotStyle::Points)));
				assert!(matches!(&specs[1].source, PlotSource::Expression(e) if e == "cos(x)"));
			}
			other => panic!("expected plot command, got {other:?}"),
		}
	}

	#[test]
	fn plot_data_file_spec_is_quoted() {
		let commands = parse_ok("plot 'data.dat' with lines");
		match &commands[0].command {
			Command::Plot { specs, .. } => {
				assert!(matches!(&specs[0].source, PlotSource::DataFile(f) if f == "data.dat"));
			}
			other => panic!("expected plot command, got {other:?}"),
		}
	}

	#[test]
	fn assignment_captures_raw_expression_text() {
		let commands = parse_ok("a = 2 * pi");
		match &commands[0].command {
			Command::Assign { name, expr_text } => {
				assert_eq!(name, "a");
				assert_eq!(expr_text, "2 * pi");
			}
			other => panic!("expected assignment, got {other:?}"),
		}
	}

	#[test]
	fn function_definition_captures_params_and_body() {
		let commands = parse_ok("f(x, y) = x*x + y*y");
		match &commands[0].command {
			Command::DefineFn { name, params, body_text } => {
				assert_eq!(name, "f");
				assert_eq!(params, &vec!["x".to_string(), "y".to_string()]);
				assert_eq!(body_text, "x*x + y*y");
			}
			other => panic!("expected function definition, got {other:?}"),
		}
	}

	#[test]
	fn pause_with_message() {
		let commands = parse_ok("pause 2 \"press enter\"");
		assert_eq!(
			commands[0].command,
			Command::Pause { seconds: 2.0, message: Some("press enter".to_string()) }
		);
	}

	#[test]
	fn unknown_set_option_is_not_a_parse_error() {
		// spec.md §4.5: unknown options are silently ignored by design; §7
		// classifies this as a non-fatal execution warning, not a syntax error.
		let commands = parse_ok("set frobnicate 1");
		assert_eq!(commands[0].command, Command::Set(SetOption::Unknown("frobnicate".to_string())));
	}

	#[test]
	fn dgrid3d_parses_rows_cols_and_mode() {
		let commands = parse_ok("set dgrid3d 10,10 gauss 2");
		assert_eq!(
			commands[0].command,
			Command::Set(SetOption::Dgrid3d(Dgrid3dOption {
				rows: 10,
				cols: 10,
				mode: Dgrid3dMode::Gauss,
				norm: 2.0,
			}))
		);
	}
}
