//! Error handling for the plotting core.
//!
//! Defines the crate-wide `Error` type, wraps lower-level subsystem errors,
//! and ensures consistent reporting back to embedders.

use std::io;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("expression parse error: {0}")]
	ExpressionParse(#[from] crate::parser::Error),

	#[error("command parse error: {0}")]
	CommandParse(#[from] crate::command_parser::Error),

	#[error("evaluation error: {0}")]
	Evaluation(#[from] crate::evaluator::Error),

	#[error("execution error: {0}")]
	Execution(#[from] crate::executor::Error),

	#[error("sampling error: {0}")]
	Sampling(#[from] crate::sampler::Error),

	#[error("SVG emission error: {0}")]
	Svg(#[from] crate::svg::Error),

	#[error("I/O error: path '{0}': {1}")]
	IoError(String, io::Error),
}
