#![doc = include_str!("../README.md")]

pub mod ast;
pub mod command_ast;
pub mod command_parser;
pub mod context;
pub mod diagnostics;
pub mod error;
pub mod evaluator;
pub mod executor;
pub mod format;
pub mod functions;
pub mod lexer;
pub mod location;
pub mod logging;
pub mod parser;
pub mod prelude;
pub mod sampler;
pub mod scene;
pub mod svg;
pub mod ticks;
pub mod value;

pub use error::Error;
