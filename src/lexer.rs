//! Tokeniser for the expression language (C1).

use crate::location::SourceLocation;

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
	Number(f64),
	Ident(String),
	Plus,
	Minus,
	Star,
	Slash,
	Percent,
	Caret,
	Pow, // **
	Lt,
	Le,
	Gt,
	Ge,
	EqEq,
	Ne,
	AndAnd,
	OrOr,
	Amp,
	Pipe,
	Shl,
	Shr,
	Bang,
	Tilde,
	Eq,
	Question,
	Colon,
	Comma,
	Semicolon,
	LParen,
	RParen,
	Eof,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
	pub kind: TokenKind,
	pub location: SourceLocation,
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("empty expression")]
	EmptyInput,
	#[error("unexpected character '{0}' at line {1}, column {2}")]
	UnexpectedChar(char, usize, usize),
	#[error("malformed number literal '{0}' at line {1}, column {2}")]
	MalformedNumber(String, usize, usize),
}

/// Tokenises `source` into a flat list of tokens, terminated by `Eof`.
///
/// Whitespace and `#`-prefixed line comments are skipped. Fails fast on the
/// first unexpected character or malformed number literal; the empty/blank
/// input case is rejected before any character is inspected (spec.md §4.1).
pub fn tokenize(source: &str) -> Result<Vec<Token>, Error> {
	if source.trim().is_empty() {
		return Err(Error::EmptyInput);
	}

	let chars: Vec<char> = source.chars().collect();
	let mut tokens = Vec::new();
	let mut i = 0usize;
	let mut line = 1usize;
	let mut col = 1usize;

	let advance = |i: &mut usize, line: &mut usize, col: &mut usize, chars: &[char]| {
		if chars[*i] == '\n' {
			*line += 1;
			*col = 1;
		} else {
			*col += 1;
		}
		*i += 1;
	};

	while i < chars.len() {
		let c = chars[i];

		if c == '#' {
			while i < chars.len() && chars[i] != '\n' {
				advance(&mut i, &mut line, &mut col, &chars);
			}
			continue;
		}
		if c.is_whitespace() {
			advance(&mut i, &mut line, &mut col, &chars);
			continue;
		}

		let start_index = i;
		let start_line = line;
		let start_col = col;

		macro_rules! single {
			($kind:expr) => {{
				advance(&mut i, &mut line, &mut col, &chars);
				$kind
			}};
		}

		let kind = if c.is_ascii_digit() || (c == '.' && chars.get(i + 1).is_some_and(|n| n.is_ascii_digit())) {
			let mut text = String::new();
			while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '.') {
				text.push(chars[i]);
				advance(&mut i, &mut line, &mut col, &chars);
			}
			if i < chars.len() && (chars[i] == 'e' || chars[i] == 'E') {
				let mark = i;
				let mark_line = line;
				let mark_col = col;
				let mut exp_text = String::new();
				exp_text.push(chars[i]);
				advance(&mut i, &mut line, &mut col, &chars);
				if i < chars.len() && (chars[i] == '+' || chars[i] == '-') {
					exp_text.push(chars[i]);
					advance(&mut i, &mut line, &mut col, &chars);
				}
				if i < chars.len() && chars[i].is_ascii_digit() {
					while i < chars.len() && chars[i].is_ascii_digit() {
						exp_text.push(chars[i]);
						advance(&mut i, &mut line, &mut col, &chars);
					}
					text.push_str(&exp_text);
				} else {
					// not actually an exponent; rewind
					i = mark;
					line = mark_line;
					col = mark_col;
				}
			}
			match text.parse::<f64>() {
				Ok(value) => TokenKind::Number(value),
				Err(_) => return Err(Error::MalformedNumber(text, start_line, start_col)),
			}
		} else if c.is_alphabetic() || c == '_' {
			let mut text = String::new();
			while i < chars.len() && (chars[i].is_alphanumeric() || chars[i] == '_') {
				text.push(chars[i]);
				advance(&mut i, &mut line, &mut col, &chars);
			}
			TokenKind::Ident(text)
		} else {
			match c {
				'*' if chars.get(i + 1) == Some(&'*') => {
					advance(&mut i, &mut line, &mut col, &chars);
					single!(TokenKind::Pow)
				}
				'<' if chars.get(i + 1) == Some(&'=') => {
					advance(&mut i, &mut line, &mut col, &chars);
					single!(TokenKind::Le)
				}
				'<' if chars.get(i + 1) == Some(&'<') => {
					advance(&mut i, &mut line, &mut col, &chars);
					single!(TokenKind::Shl)
				}
				'>' if chars.get(i + 1) == Some(&'=') => {
					advance(&mut i, &mut line, &mut col, &chars);
					single!(TokenKind::Ge)
				}
				'>' if chars.get(i + 1) == Some(&'>') => {
					advance(&mut i, &mut line, &mut col, &chars);
					single!(TokenKind::Shr)
				}
				'=' if chars.get(i + 1) == Some(&'=') => {
					advance(&mut i, &mut line, &mut col, &chars);
					single!(TokenKind::EqEq)
				}
				'!' if chars.get(i + 1) == Some(&'=') => {
					advance(&mut i, &mut line, &mut col, &chars);
					single!(TokenKind::Ne)
				}
				'&' if chars.get(i + 1) == Some(&'&') => {
					advance(&mut i, &mut line, &mut col, &chars);
					single!(TokenKind::AndAnd)
				}
				'|' if chars.get(i + 1) == Some(&'|') => {
					advance(&mut i, &mut line, &mut col, &chars);
					single!(TokenKind::OrOr)
				}
				'+' => single!(TokenKind::Plus),
				'-' => single!(TokenKind::Minus),
				'*' => single!(TokenKind::Star),
				'/' => single!(TokenKind::Slash),
				'%' => single!(TokenKind::Percent),
				'^' => single!(TokenKind::Caret),
				'<' => single!(TokenKind::Lt),
				'>' => single!(TokenKind::Gt),
				'&' => single!(TokenKind::Amp),
				'|' => single!(TokenKind::Pipe),
				'!' => single!(TokenKind::Bang),
				'~' => single!(TokenKind::Tilde),
				'=' => single!(TokenKind::Eq),
				'?' => single!(TokenKind::Question),
				':' => single!(TokenKind::Colon),
				',' => single!(TokenKind::Comma),
				';' => single!(TokenKind::Semicolon),
				'(' => single!(TokenKind::LParen),
				')' => single!(TokenKind::RParen),
				other => return Err(Error::UnexpectedChar(other, start_line, start_col)),
			}
		};

		let end_index = i;
		tokens.push(Token {
			kind,
			location: SourceLocation::new(start_line, start_col, start_index, end_index),
		});
	}

	tokens.push(Token {
		kind: TokenKind::Eof,
		location: SourceLocation::new(line, col, chars.len(), chars.len()),
	});
	Ok(tokens)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn rejects_empty_input() {
		assert!(matches!(tokenize(""), Err(Error::EmptyInput)));
		assert!(matches!(tokenize("   \n\t"), Err(Error::EmptyInput)));
	}

	#[test]
	fn tokenizes_longest_match_operators() {
		let tokens = tokenize("a**b<=c").unwrap();
		let kinds: Vec<_> = tokens.iter().map(|t| t.kind.clone()).collect();
		assert_eq!(
			kinds,
			vec![
				TokenKind::Ident("a".into()),
				TokenKind::Pow,
				TokenKind::Ident("b".into()),
				TokenKind::Le,
				TokenKind::Ident("c".into()),
				TokenKind::Eof,
			]
		);
	}

	#[test]
	fn tokenizes_scientific_notation() {
		let tokens = tokenize("1.5e-3").unwrap();
		assert_eq!(tokens[0].kind, TokenKind::Number(1.5e-3));
	}

	#[test]
	fn skips_comments() {
		let tokens = tokenize("1 + 1 # trailing comment\n").unwrap();
		assert_eq!(tokens.len(), 4); // 1, +, 1, Eof
	}

	#[test]
	fn reports_location_for_unexpected_char() {
		let err = tokenize("1 + @").unwrap_err();
		match err {
			Error::UnexpectedChar(c, line, col) => {
				assert_eq!(c, '@');
				assert_eq!(line, 1);
				assert_eq!(col, 5);
			}
			_ => panic!("wrong error kind"),
		}
	}
}
