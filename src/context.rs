//! Evaluation context (C3 data model): variables, built-ins, user functions.

use std::collections::HashMap;

use crate::value::Value;

pub struct RealFunction {
	pub arity: usize,
	call: Box<dyn Fn(&[f64]) -> Result<f64, String>>,
}

impl RealFunction {
	pub fn call(&self, args: &[f64]) -> Result<f64, String> {
		(self.call)(args)
	}
}

pub struct ComplexFunction {
	pub arity: usize,
	call: Box<dyn Fn(&[Value]) -> Result<Value, String>>,
}

impl ComplexFunction {
	pub fn call(&self, args: &[Value]) -> Result<Value, String> {
		(self.call)(args)
	}
}

/// A user-defined function, stored as unparsed body text. The body is
/// re-parsed at every call (spec.md §9 "User-defined functions store body
/// text") rather than cached as an AST, which sidesteps ambiguity about
/// closing over variables; the context below still memoises the parse by
/// body text, which is semantically transparent but avoids re-tokenising
/// unchanged bodies on every sample.
#[derive(Debug, Clone)]
pub struct UserFunction {
	pub params: Vec<String>,
	pub body_text: String,
}

/// Owns every piece of evaluator state: variables, the two built-in
/// registries, and user-defined functions. One context per executor
/// instance (spec.md §3 "Lifetime").
#[derive(Default)]
pub struct EvaluationContext {
	variables: HashMap<String, f64>,
	real_functions: HashMap<String, RealFunction>,
	complex_functions: HashMap<String, ComplexFunction>,
	user_functions: HashMap<String, UserFunction>,
	pub(crate) parse_cache: HashMap<String, crate::ast::Node>,
}

impl EvaluationContext {
	pub fn new() -> Self {
		Self::default()
	}

	/// A context with the default function library and constants bound in
	/// (spec.md §4.4); the usual way to obtain a context for a fresh
	/// executor.
	pub fn with_defaults() -> Self {
		let mut ctx = Self::new();
		crate::functions::install(&mut ctx);
		ctx
	}

	pub fn set_variable(&mut self, name: impl Into<String>, value: f64) {
		self.variables.insert(name.into(), value);
	}

	pub fn get_variable(&self, name: &str) -> Option<f64> {
		self.variables.get(name).copied()
	}

	pub fn remove_variable(&mut self, name: &str) {
		self.variables.remove(name);
	}

	pub fn register_function(
		&mut self,
		name: impl Into<String>,
		arity: usize,
		callable: impl Fn(&[f64]) -> Result<f64, String> + 'static,
	) {
		self.real_functions.insert(name.into(), RealFunction { arity, call: Box::new(callable) });
	}

	pub fn register_complex_function(
		&mut self,
		name: impl Into<String>,
		arity: usize,
		callable: impl Fn(&[Value]) -> Result<Value, String> + 'static,
	) {
		self.complex_functions.insert(name.into(), ComplexFunction { arity, call: Box::new(callable) });
	}

	pub fn define_user_function(
		&mut self,
		name: impl Into<String>,
		params: Vec<String>,
		body_text: impl Into<String>,
	) {
		self.user_functions.insert(name.into(), UserFunction { params, body_text: body_text.into() });
	}

	pub fn user_function(&self, name: &str) -> Option<&UserFunction> {
		self.user_functions.get(name)
	}

	pub fn real_function(&self, name: &str) -> Option<&RealFunction> {
		self.real_functions.get(name)
	}

	pub fn complex_function(&self, name: &str) -> Option<&ComplexFunction> {
		self.complex_functions.get(name)
	}

	/// Clears variables and user functions, keeping the built-in registries.
	/// Used by `reset` (spec.md §4.6), which does *not* clear user-defined
	/// functions per the spec's explicit note — callers that want that
	/// should call [`EvaluationContext::clear_variables`] only.
	pub fn clear_variables(&mut self) {
		self.variables.clear();
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn register_and_call_real_function() {
		let mut ctx = EvaluationContext::new();
		ctx.register_function("double", 1, |a| Ok(a[0] * 2.0));
		let f = ctx.real_function("double").unwrap();
		assert_eq!(f.call(&[21.0]).unwrap(), 42.0);
	}

	#[test]
	fn variables_round_trip() {
		let mut ctx = EvaluationContext::new();
		ctx.set_variable("x", 3.5);
		assert_eq!(ctx.get_variable("x"), Some(3.5));
		ctx.clear_variables();
		assert_eq!(ctx.get_variable("x"), None);
	}
}
