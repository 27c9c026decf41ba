//! Recursive-descent parser for the expression language (C1).
//!
//! Implements the 14 precedence levels from spec.md §4.1, lowest to
//! highest: comma, assignment, ternary, logical-or, logical-and, bitwise-or,
//! bitwise-xor, bitwise-and, equality, relational, additive, multiplicative,
//! power, unary prefix, with function-call/parenthesis/literal/identifier as
//! the base case.

use std::fmt;

use crate::ast::{BinaryOp, Node, NodeKind, UnaryOp};
use crate::diagnostics::Diagnostic;
use crate::lexer::{self, Token, TokenKind};
use crate::location::SourceLocation;

#[derive(Debug)]
pub struct Error {
	pub diagnostics: Vec<Diagnostic>,
}

impl fmt::Display for Error {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{} syntax error(s):", self.diagnostics.len())?;
		for diagnostic in &self.diagnostics {
			write!(f, "\n  {}", diagnostic.message)?;
		}
		Ok(())
	}
}

impl std::error::Error for Error {}

/// Parses `source` into an expression AST, or a structured list of syntax
/// errors. Empty/blank input fails before tokenisation (spec.md §4.1).
pub fn parse(source: &str) -> Result<Node, Error> {
	let tokens = lexer::tokenize(source).map_err(|e| Error {
		diagnostics: vec![Diagnostic::new(SourceLocation::start(), e.to_string())],
	})?;
	let mut parser = Parser { tokens, pos: 0, diagnostics: Vec::new() };
	let node = parser.parse_comma();
	parser.expect_eof();
	if parser.diagnostics.is_empty() {
		Ok(node)
	} else {
		Err(Error { diagnostics: parser.diagnostics })
	}
}

struct Parser {
	tokens: Vec<Token>,
	pos: usize,
	diagnostics: Vec<Diagnostic>,
}

impl Parser {
	fn peek(&self) -> &Token {
		&self.tokens[self.pos.min(self.tokens.len() - 1)]
	}

	fn peek_at(&self, offset: usize) -> &Token {
		let idx = (self.pos + offset).min(self.tokens.len() - 1);
		&self.tokens[idx]
	}

	fn advance(&mut self) -> Token {
		let tok = self.peek().clone();
		if self.pos < self.tokens.len() - 1 {
			self.pos += 1;
		}
		tok
	}

	fn check(&self, kind: &TokenKind) -> bool {
		&self.peek().kind == kind
	}

	fn eat(&mut self, kind: &TokenKind) -> bool {
		if self.check(kind) {
			self.advance();
			true
		} else {
			false
		}
	}

	fn error(&mut self, location: SourceLocation, message: impl Into<String>) {
		self.diagnostics.push(Diagnostic::new(location, message.into()));
	}

	fn error_with_suggestion(
		&mut self,
		location: SourceLocation,
		message: impl Into<String>,
		suggestion: impl Into<String>,
	) {
		self.diagnostics.push(Diagnostic::new(location, message.into()).with_suggestion(suggestion));
	}

	/// Skips to the next synchronisation point (`,`, `;`, `)`, or end of
	/// input) after a parse error, so later errors can still be reported.
	fn synchronize(&mut self) {
		while !matches!(
			self.peek().kind,
			TokenKind::Comma | TokenKind::Semicolon | TokenKind::RParen | TokenKind::Eof
		) {
			self.advance();
		}
	}

	fn expect_eof(&mut self) {
		if !self.check(&TokenKind::Eof) {
			let loc = self.peek().location;
			self.error_with_suggestion(
				loc,
				format!("unexpected token after end of expression: {:?}", self.peek().kind),
				"check for a missing operator between adjacent terms",
			);
		}
	}

	// comma -> assignment (',' assignment)*
	fn parse_comma(&mut self) -> Node {
		let mut left = self.parse_assignment();
		while self.check(&TokenKind::Comma) {
			let loc = self.advance().location;
			let right = self.parse_assignment();
			let span = left.location.merge(right.location).merge(loc);
			left = Node::new(NodeKind::Sequence(Box::new(left), Box::new(right)), span);
		}
		left
	}

	// assignment -> IDENT '=' assignment | ternary
	fn parse_assignment(&mut self) -> Node {
		if let TokenKind::Ident(name) = self.peek().kind.clone() {
			if self.peek_at(1).kind == TokenKind::Eq {
				let ident_loc = self.advance().location;
				self.advance(); // '='
				let value = self.parse_assignment();
				let span = ident_loc.merge(value.location);
				return Node::new(NodeKind::Assignment(name, Box::new(value)), span);
			}
		}
		self.parse_ternary()
	}

	// ternary -> logical_or ('?' assignment ':' ternary)?
	fn parse_ternary(&mut self) -> Node {
		let cond = self.parse_logical_or();
		if self.check(&TokenKind::Question) {
			self.advance();
			let then_branch = self.parse_assignment();
			if !self.eat(&TokenKind::Colon) {
				let loc = self.peek().location;
				self.error(loc, "expected ':' in ternary expression");
			}
			let else_branch = self.parse_ternary();
			let span = cond.location.merge(else_branch.location);
			return Node::new(
				NodeKind::Ternary(Box::new(cond), Box::new(then_branch), Box::new(else_branch)),
				span,
			);
		}
		cond
	}

	fn parse_left_assoc_binary(
		&mut self,
		next: fn(&mut Self) -> Node,
		ops: &[(TokenKind, BinaryOp)],
	) -> Node {
		let mut left = next(self);
		'outer: loop {
			for (tok, op) in ops {
				if self.check(tok) {
					self.advance();
					let right = next(self);
					let span = left.location.merge(right.location);
					left = Node::new(NodeKind::BinaryOp(*op, Box::new(left), Box::new(right)), span);
					continue 'outer;
				}
			}
			break;
		}
		left
	}

	fn parse_logical_or(&mut self) -> Node {
		self.parse_left_assoc_binary(Self::parse_logical_and, &[(TokenKind::OrOr, BinaryOp::Or)])
	}

	fn parse_logical_and(&mut self) -> Node {
		self.parse_left_assoc_binary(Self::parse_bitwise_or, &[(TokenKind::AndAnd, BinaryOp::And)])
	}

	fn parse_bitwise_or(&mut self) -> Node {
		self.parse_left_assoc_binary(Self::parse_bitwise_xor, &[(TokenKind::Pipe, BinaryOp::BitOr)])
	}

	fn parse_bitwise_xor(&mut self) -> Node {
		self.parse_left_assoc_binary(Self::parse_bitwise_and, &[(TokenKind::Caret, BinaryOp::BitXor)])
	}

	fn parse_bitwise_and(&mut self) -> Node {
		self.parse_left_assoc_binary(Self::parse_equality, &[(TokenKind::Amp, BinaryOp::BitAnd)])
	}

	fn parse_equality(&mut self) -> Node {
		self.parse_left_assoc_binary(
			Self::parse_relational,
			&[(TokenKind::EqEq, BinaryOp::Eq), (TokenKind::Ne, BinaryOp::Ne)],
		)
	}

	fn parse_relational(&mut self) -> Node {
		self.parse_left_assoc_binary(
			Self::parse_additive,
			&[
				(TokenKind::Le, BinaryOp::Le),
				(TokenKind::Ge, BinaryOp::Ge),
				(TokenKind::Lt, BinaryOp::Lt),
				(TokenKind::Gt, BinaryOp::Gt),
			],
		)
	}

	fn parse_additive(&mut self) -> Node {
		self.parse_left_assoc_binary(
			Self::parse_multiplicative,
			&[(TokenKind::Plus, BinaryOp::Add), (TokenKind::Minus, BinaryOp::Sub)],
		)
	}

	fn parse_multiplicative(&mut self) -> Node {
		self.parse_left_assoc_binary(
			Self::parse_power,
			&[
				(TokenKind::Star, BinaryOp::Mul),
				(TokenKind::Slash, BinaryOp::Div),
				(TokenKind::Percent, BinaryOp::Mod),
			],
		)
	}

	// power -> unary ('**' power)?   (right-associative)
	fn parse_power(&mut self) -> Node {
		let left = self.parse_unary();
		if self.check(&TokenKind::Pow) {
			self.advance();
			let right = self.parse_power();
			let span = left.location.merge(right.location);
			return Node::new(NodeKind::BinaryOp(BinaryOp::Pow, Box::new(left), Box::new(right)), span);
		}
		left
	}

	// unary -> ('-' | '+' | '!' | '~') unary | postfix
	fn parse_unary(&mut self) -> Node {
		let (op, token_loc) = match self.peek().kind {
			TokenKind::Minus => (Some(UnaryOp::Neg), self.peek().location),
			TokenKind::Plus => (Some(UnaryOp::Plus), self.peek().location),
			TokenKind::Bang => (Some(UnaryOp::Not), self.peek().location),
			TokenKind::Tilde => (Some(UnaryOp::BitNot), self.peek().location),
			_ => (None, SourceLocation::default()),
		};
		if let Some(op) = op {
			self.advance();
			let child = self.parse_unary();
			let span = token_loc.merge(child.location);
			return Node::new(NodeKind::UnaryOp(op, Box::new(child)), span);
		}
		self.parse_postfix()
	}

	// postfix -> NUMBER | IDENT ['(' (assignment (',' assignment)*)? ')'] | '(' comma ')'
	fn parse_postfix(&mut self) -> Node {
		let tok = self.peek().clone();
		match tok.kind {
			TokenKind::Number(value) => {
				self.advance();
				Node::new(NodeKind::NumberLiteral(value), tok.location)
			}
			TokenKind::Ident(name) => {
				self.advance();
				if self.check(&TokenKind::LParen) {
					self.advance();
					let mut args = Vec::new();
					if !self.check(&TokenKind::RParen) {
						args.push(self.parse_assignment());
						while self.eat(&TokenKind::Comma) {
							args.push(self.parse_assignment());
						}
					}
					let end_loc = self.peek().location;
					if !self.eat(&TokenKind::RParen) {
						self.error_with_suggestion(
							end_loc,
							format!("expected ')' to close call to '{name}'"),
							"check for a missing closing parenthesis",
						);
						self.synchronize();
					}
					let span = tok.location.merge(end_loc);
					Node::new(NodeKind::FunctionCall(name, args), span)
				} else {
					Node::new(NodeKind::Variable(name), tok.location)
				}
			}
			TokenKind::LParen => {
				self.advance();
				let inner = self.parse_comma();
				let end_loc = self.peek().location;
				if !self.eat(&TokenKind::RParen) {
					self.error_with_suggestion(
						end_loc,
						"expected ')' to close parenthesised expression",
						"check for an unmatched '('",
					);
					self.synchronize();
				}
				inner
			}
			TokenKind::Eof => {
				self.error_with_suggestion(
					tok.location,
					"unexpected end of input",
					"the expression is incomplete",
				);
				Node::new(NodeKind::NumberLiteral(f64::NAN), tok.location)
			}
			other => {
				self.error(tok.location, format!("unexpected token: {:?}", other));
				self.advance();
				self.synchronize();
				Node::new(NodeKind::NumberLiteral(f64::NAN), tok.location)
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn parse_ok(src: &str) -> Node {
		parse(src).unwrap_or_else(|e| panic!("expected parse of {src:?} to succeed: {e}"))
	}

	#[test]
	fn precedence_of_arithmetic() {
		// 2 + 3 * 4 should parse as 2 + (3 * 4)
		let node = parse_ok("2 + 3 * 4");
		match node.kind {
			NodeKind::BinaryOp(BinaryOp::Add, left, right) => {
				assert!(matches!(left.kind, NodeKind::NumberLiteral(v) if v == 2.0));
				assert!(matches!(right.kind, NodeKind::BinaryOp(BinaryOp::Mul, _, _)));
			}
			_ => panic!("expected top-level Add"),
		}
	}

	#[test]
	fn power_is_right_associative() {
		// 2 ** 3 ** 2 == 2 ** (3 ** 2)
		let node = parse_ok("2 ** 3 ** 2");
		match node.kind {
			NodeKind::BinaryOp(BinaryOp::Pow, left, right) => {
				assert!(matches!(left.kind, NodeKind::NumberLiteral(v) if v == 2.0));
				assert!(matches!(right.kind, NodeKind::BinaryOp(BinaryOp::Pow, _, _)));
			}
			_ => panic!("expected top-level Pow"),
		}
	}

	#[test]
	fn parenthesised_expression_overrides_precedence() {
		let node = parse_ok("(2 + 3) * 4");
		assert!(matches!(node.kind, NodeKind::BinaryOp(BinaryOp::Mul, _, _)));
	}

	#[test]
	fn function_call_with_args() {
		let node = parse_ok("atan2(1, 2)");
		match node.kind {
			NodeKind::FunctionCall(name, args) => {
				assert_eq!(name, "atan2");
				assert_eq!(args.len(), 2);
			}
			_ => panic!("expected function call"),
		}
	}

	#[test]
	fn ternary_is_right_associative_in_branches() {
		let node = parse_ok("a ? 1 : b ? 2 : 3");
		match node.kind {
			NodeKind::Ternary(_, _, else_branch) => {
				assert!(matches!(else_branch.kind, NodeKind::Ternary(..)));
			}
			_ => panic!("expected top-level ternary"),
		}
	}

	#[test]
	fn reports_unmatched_parenthesis() {
		let err = parse("(1 + 2").unwrap_err();
		assert!(!err.diagnostics.is_empty());
		assert!(err.diagnostics[0].suggestion.is_some());
	}

	#[test]
	fn reports_missing_operator_between_adjacent_terms() {
		let err = parse("2 3").unwrap_err();
		assert!(!err.diagnostics.is_empty());
	}

	#[test]
	fn empty_input_fails_before_tokenising() {
		let err = parse("").unwrap_err();
		assert_eq!(err.diagnostics.len(), 1);
	}

	#[test]
	fn assignment_is_right_associative() {
		let node = parse_ok("a = b = 1");
		match node.kind {
			NodeKind::Assignment(name, value) => {
				assert_eq!(name, "a");
				assert!(matches!(value.kind, NodeKind::Assignment(..)));
			}
			_ => panic!("expected assignment"),
		}
	}

	#[test]
	fn comma_sequences_two_expressions() {
		let node = parse_ok("1, 2");
		assert!(matches!(node.kind, NodeKind::Sequence(..)));
	}
}
