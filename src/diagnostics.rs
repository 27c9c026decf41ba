//! Shared rendering of `(line, column, message)` diagnostics.
//!
//! The expression parser, the command parser, and the evaluator all produce
//! location-annotated errors (spec'd error kinds 1 and 2). Rather than each
//! hand-rolling the `^` pointer line, they format through this module.

use annotate_snippets::{Level, Renderer, Snippet};

use crate::location::SourceLocation;

/// One error or warning tied to a byte span in some source text.
#[derive(Debug, Clone)]
pub struct Diagnostic {
	pub location: SourceLocation,
	pub message: String,
	pub suggestion: Option<String>,
}

impl Diagnostic {
	pub fn new(location: SourceLocation, message: impl Into<String>) -> Self {
		Self { location, message: message.into(), suggestion: None }
	}

	pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
		self.suggestion = Some(suggestion.into());
		self
	}

	/// Renders this diagnostic against `source` as a human-facing string with
	/// a `^` pointer line under the offending column, per spec.md §7.
	pub fn render(&self, source: &str, origin: &str) -> String {
		let span = self.location.start_index.min(source.len())..self.location.end_index.min(source.len()).max(self.location.start_index.min(source.len()));
		let mut title = self.message.clone();
		if let Some(suggestion) = &self.suggestion {
			title.push_str(" (");
			title.push_str(suggestion);
			title.push(')');
		}
		let snippet = Snippet::source(source)
			.line_start(1)
			.origin(origin)
			.fold(true)
			.annotation(Level::Error.span(span).label(self.message.as_str()));
		let message = Level::Error.title(&title).snippet(snippet);
		format!("{}", Renderer::plain().render(message))
	}
}

/// Aggregates every diagnostic a parse pass collected; the parser reports
/// failure (no partial AST) as soon as this is non-empty, but keeps
/// collecting until its current synchronisation point (spec.md §4.1).
#[derive(Debug, Clone, Default)]
pub struct DiagnosticBag {
	diagnostics: Vec<Diagnostic>,
}

impl DiagnosticBag {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn push(&mut self, diagnostic: Diagnostic) {
		self.diagnostics.push(diagnostic);
	}

	pub fn is_empty(&self) -> bool {
		self.diagnostics.is_empty()
	}

	pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
		self.diagnostics.iter()
	}

	pub fn into_vec(self) -> Vec<Diagnostic> {
		self.diagnostics
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn render_includes_message_and_origin() {
		let loc = SourceLocation::new(1, 1, 0, 1);
		let diag = Diagnostic::new(loc, "undefined variable 'x'");
		let rendered = diag.render("x + 1", "<expr>");
		assert!(rendered.contains("undefined variable"));
	}
}
