//! Tree-walking evaluator (C3).

use crate::ast::{BinaryOp, Node, NodeKind, UnaryOp};
use crate::context::EvaluationContext;
use crate::location::SourceLocation;
use crate::value::Value;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("undefined variable '{name}' at line {line}, column {column}")]
	UndefinedVariable { name: String, line: usize, column: usize },

	#[error("undefined function '{name}' at line {line}, column {column}")]
	UndefinedFunction { name: String, line: usize, column: usize },

	#[error(
		"function '{name}' expects {expected} argument(s), got {actual} at line {line}, column {column}"
	)]
	ArityMismatch { name: String, expected: usize, actual: usize, line: usize, column: usize },

	#[error("domain error: modulo by zero at line {line}, column {column}")]
	ModuloByZero { line: usize, column: usize },

	#[error("domain error in '{name}': {message} at line {line}, column {column}")]
	FunctionDomain { name: String, message: String, line: usize, column: usize },

	#[error("error parsing body of user function '{name}': {message}")]
	UserFunctionBody { name: String, message: String },
}

impl Error {
	pub fn location(&self) -> Option<SourceLocation> {
		match self {
			Error::UndefinedVariable { line, column, .. }
			| Error::UndefinedFunction { line, column, .. }
			| Error::ArityMismatch { line, column, .. }
			| Error::ModuloByZero { line, column, .. }
			| Error::FunctionDomain { line, column, .. } => {
				Some(SourceLocation::new(*line, *column, 0, 0))
			}
			Error::UserFunctionBody { .. } => None,
		}
	}
}

/// Walks an expression AST, evaluating against a mutable [`EvaluationContext`].
pub struct Evaluator<'a> {
	pub context: &'a mut EvaluationContext,
}

impl<'a> Evaluator<'a> {
	pub fn new(context: &'a mut EvaluationContext) -> Self {
		Self { context }
	}

	/// Evaluates `node`, returning the full complex result.
	pub fn evaluate(&mut self, node: &Node) -> Result<Value, Error> {
		match &node.kind {
			NodeKind::NumberLiteral(value) => Ok(Value::real(*value)),

			NodeKind::Variable(name) => {
				self.context.get_variable(name).map(Value::real).ok_or_else(|| Error::UndefinedVariable {
					name: name.clone(),
					line: node.location.line,
					column: node.location.column,
				})
			}

			NodeKind::BinaryOp(op, left, right) => self.evaluate_binary(*op, left, right, node.location),

			NodeKind::UnaryOp(op, child) => self.evaluate_unary(*op, child),

			NodeKind::FunctionCall(name, args) => self.evaluate_call(name, args, node.location),

			NodeKind::Ternary(cond, then_branch, else_branch) => {
				if self.evaluate(cond)?.is_truthy() {
					self.evaluate(then_branch)
				} else {
					self.evaluate(else_branch)
				}
			}

			NodeKind::Assignment(name, value) => {
				let result = self.evaluate(value)?;
				self.context.set_variable(name.clone(), result.re);
				Ok(result)
			}

			NodeKind::Sequence(left, right) => {
				self.evaluate(left)?;
				self.evaluate(right)
			}
		}
	}

	/// Evaluates `node` and extracts the real part, without checking for a
	/// stray imaginary component — this matches the reference's observed
	/// behaviour (spec.md §4.3).
	pub fn evaluate_real(&mut self, node: &Node) -> Result<f64, Error> {
		Ok(self.evaluate(node)?.re)
	}

	fn evaluate_binary(
		&mut self,
		op: BinaryOp,
		left: &Node,
		right: &Node,
		location: SourceLocation,
	) -> Result<Value, Error> {
		match op {
			BinaryOp::Add => Ok(self.evaluate(left)?.add(self.evaluate(right)?)),
			BinaryOp::Sub => Ok(self.evaluate(left)?.sub(self.evaluate(right)?)),
			BinaryOp::Mul => Ok(self.evaluate(left)?.mul(self.evaluate(right)?)),
			BinaryOp::Div => Ok(self.evaluate(left)?.div(self.evaluate(right)?)),
			BinaryOp::Pow => Ok(self.evaluate(left)?.powc(self.evaluate(right)?)),

			BinaryOp::Mod => {
				let l = self.evaluate_real(left)?;
				let r = self.evaluate_real(right)?;
				if r == 0.0 {
					return Err(Error::ModuloByZero { line: location.line, column: location.column });
				}
				Ok(Value::real(l % r))
			}

			BinaryOp::Lt => Ok(Value::from_bool(self.evaluate_real(left)? < self.evaluate_real(right)?)),
			BinaryOp::Le => Ok(Value::from_bool(self.evaluate_real(left)? <= self.evaluate_real(right)?)),
			BinaryOp::Gt => Ok(Value::from_bool(self.evaluate_real(left)? > self.evaluate_real(right)?)),
			BinaryOp::Ge => Ok(Value::from_bool(self.evaluate_real(left)? >= self.evaluate_real(right)?)),
			BinaryOp::Eq => Ok(Value::from_bool(self.evaluate_real(left)? == self.evaluate_real(right)?)),
			BinaryOp::Ne => Ok(Value::from_bool(self.evaluate_real(left)? != self.evaluate_real(right)?)),

			BinaryOp::And => {
				Ok(Value::from_bool(self.evaluate(left)?.is_truthy() && self.evaluate(right)?.is_truthy()))
			}
			BinaryOp::Or => {
				Ok(Value::from_bool(self.evaluate(left)?.is_truthy() || self.evaluate(right)?.is_truthy()))
			}

			BinaryOp::BitAnd => self.evaluate_bitwise(left, right, |a, b| a & b),
			BinaryOp::BitOr => self.evaluate_bitwise(left, right, |a, b| a | b),
			BinaryOp::BitXor => self.evaluate_bitwise(left, right, |a, b| a ^ b),
		}
	}

	fn evaluate_bitwise(
		&mut self,
		left: &Node,
		right: &Node,
		op: impl Fn(i64, i64) -> i64,
	) -> Result<Value, Error> {
		let l = self.evaluate_real(left)? as i64;
		let r = self.evaluate_real(right)? as i64;
		Ok(Value::real(op(l, r) as f64))
	}

	fn evaluate_unary(&mut self, op: UnaryOp, child: &Node) -> Result<Value, Error> {
		match op {
			UnaryOp::Neg => Ok(self.evaluate(child)?.neg()),
			UnaryOp::Plus => self.evaluate(child),
			UnaryOp::Not => Ok(Value::from_bool(!self.evaluate(child)?.is_truthy())),
			UnaryOp::BitNot => {
				let v = self.evaluate_real(child)? as i64;
				Ok(Value::real(!v as f64))
			}
		}
	}

	fn evaluate_call(&mut self, name: &str, args: &[Node], location: SourceLocation) -> Result<Value, Error> {
		if self.context.user_function(name).is_some() {
			return self.call_user_function(name, args, location);
		}

		if let Some(complex_fn) = self.context.complex_function(name) {
			let arity = complex_fn.arity;
			if args.len() != arity {
				return Err(Error::ArityMismatch {
					name: name.to_string(),
					expected: arity,
					actual: args.len(),
					line: location.line,
					column: location.column,
				});
			}
			let mut values = Vec::with_capacity(args.len());
			for arg in args {
				values.push(self.evaluate(arg)?);
			}
			let complex_fn = self.context.complex_function(name).expect("checked above");
			return complex_fn.call(&values).map_err(|message| Error::FunctionDomain {
				name: name.to_string(),
				message,
				line: location.line,
				column: location.column,
			});
		}

		if let Some(real_fn) = self.context.real_function(name) {
			let arity = real_fn.arity;
			if args.len() != arity {
				return Err(Error::ArityMismatch {
					name: name.to_string(),
					expected: arity,
					actual: args.len(),
					line: location.line,
					column: location.column,
				});
			}
			let mut values = Vec::with_capacity(args.len());
			for arg in args {
				values.push(self.evaluate_real(arg)?);
			}
			let real_fn = self.context.real_function(name).expect("checked above");
			return real_fn.call(&values).map(Value::real).map_err(|message| Error::FunctionDomain {
				name: name.to_string(),
				message,
				line: location.line,
				column: location.column,
			});
		}

		Err(Error::UndefinedFunction {
			name: name.to_string(),
			line: location.line,
			column: location.column,
		})
	}

	/// Calls a user-defined function: saves the current values of its
	/// parameter names, binds arguments, re-parses the body text fresh,
	/// evaluates, and restores prior parameter values on every exit path
	/// (spec.md §4.3 "User-defined function evaluation").
	fn call_user_function(&mut self, name: &str, args: &[Node], location: SourceLocation) -> Result<Value, Error> {
		let user_fn = self.context.user_function(name).expect("checked by caller").clone();

		if args.len() != user_fn.params.len() {
			return Err(Error::ArityMismatch {
				name: name.to_string(),
				expected: user_fn.params.len(),
				actual: args.len(),
				line: location.line,
				column: location.column,
			});
		}

		let mut arg_values = Vec::with_capacity(args.len());
		for arg in args {
			arg_values.push(self.evaluate_real(arg)?);
		}

		let saved: Vec<(String, Option<f64>)> = user_fn
			.params
			.iter()
			.map(|p| (p.clone(), self.context.get_variable(p)))
			.collect();

		for (param, value) in user_fn.params.iter().zip(arg_values.iter()) {
			self.context.set_variable(param.clone(), *value);
		}

		let body = self.parse_body(name, &user_fn.body_text);
		let result = body.and_then(|node| self.evaluate(&node));

		for (param, previous) in saved {
			match previous {
				Some(value) => self.context.set_variable(param, value),
				None => self.context.remove_variable(&param),
			}
		}

		result
	}

	fn parse_body(&mut self, name: &str, body_text: &str) -> Result<Node, Error> {
		if let Some(cached) = self.context.parse_cache.get(body_text) {
			return Ok(cached.clone());
		}
		let node = crate::parser::parse(body_text).map_err(|e| Error::UserFunctionBody {
			name: name.to_string(),
			message: e.to_string(),
		})?;
		self.context.parse_cache.insert(body_text.to_string(), node.clone());
		Ok(node)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::parser;

	fn eval(source: &str, ctx: &mut EvaluationContext) -> Result<Value, Error> {
		let node = parser::parse(source).expect("fixture expressions parse");
		Evaluator::new(ctx).evaluate(&node)
	}

	#[test]
	fn basic_arithmetic_precedence() {
		let mut ctx = EvaluationContext::with_defaults();
		assert_eq!(eval("2 + 3 * 4", &mut ctx).unwrap().re, 14.0);
		assert_eq!(eval("(2 + 3) * 4", &mut ctx).unwrap().re, 20.0);
	}

	#[test]
	fn trig_matches_expected_values() {
		let mut ctx = EvaluationContext::with_defaults();
		let sin_half_pi = eval("sin(pi/2)", &mut ctx).unwrap().re;
		assert!((sin_half_pi - 1.0).abs() < 1e-12);
		let cos_pi = eval("cos(pi)", &mut ctx).unwrap().re;
		assert!((cos_pi - (-1.0)).abs() < 1e-12);
	}

	#[test]
	fn division_by_zero_yields_nan_not_error() {
		let mut ctx = EvaluationContext::with_defaults();
		let v = eval("1/0", &mut ctx).unwrap();
		assert!(v.re.is_nan());
	}

	#[test]
	fn modulo_by_zero_is_a_domain_error() {
		let mut ctx = EvaluationContext::with_defaults();
		let err = eval("5 % 0", &mut ctx).unwrap_err();
		assert!(matches!(err, Error::ModuloByZero { .. }));
	}

	#[test]
	fn undefined_variable_cites_location() {
		let mut ctx = EvaluationContext::with_defaults();
		let err = eval("x + 1", &mut ctx).unwrap_err();
		match err {
			Error::UndefinedVariable { name, column, .. } => {
				assert_eq!(name, "x");
				assert_eq!(column, 1);
			}
			_ => panic!("expected undefined variable error"),
		}
	}

	#[test]
	fn determinism_across_repeated_evaluation() {
		let mut ctx = EvaluationContext::with_defaults();
		ctx.set_variable("x", 3.0);
		let a = eval("sin(x) * x^2 - cos(x)", &mut ctx).unwrap();
		let b = eval("sin(x) * x^2 - cos(x)", &mut ctx).unwrap();
		assert_eq!(a.re, b.re);
	}

	#[test]
	fn user_function_params_are_restored_after_call() {
		let mut ctx = EvaluationContext::with_defaults();
		ctx.set_variable("x", 99.0);
		ctx.define_user_function("f", vec!["x".to_string()], "x * 2".to_string());
		let result = eval("f(5)", &mut ctx).unwrap();
		assert_eq!(result.re, 10.0);
		assert_eq!(ctx.get_variable("x"), Some(99.0));
	}

	#[test]
	fn complex_overload_handles_asin_outside_real_domain() {
		let mut ctx = EvaluationContext::with_defaults();
		let v = eval("asin(2)", &mut ctx).unwrap();
		assert!(v.im.abs() > 1e-9);
	}

	#[test]
	fn arity_mismatch_reports_expected_and_actual() {
		let mut ctx = EvaluationContext::with_defaults();
		let err = eval("atan2(1)", &mut ctx).unwrap_err();
		match err {
			Error::ArityMismatch { expected, actual, .. } => {
				assert_eq!(expected, 2);
				assert_eq!(actual, 1);
			}
			_ => panic!("expected arity mismatch"),
		}
	}
}
