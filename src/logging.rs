//! Diagnostic-stream setup (spec.md §6 "Diagnostic stream").
//!
//! The executor and its subsystems never print directly; they emit
//! `tracing` events at per-module targets. This module is an optional
//! convenience for embedders that want a ready-made subscriber; libraries
//! that already install their own are free to skip calling it.

use tracing_subscriber::{EnvFilter, fmt};

/// Tracing target for cross-crate verbose diagnostics (execution warnings).
pub const APPV: &str = "appverbose";

#[cfg(test)]
pub(crate) fn init_tracing_test() {
	use std::sync::Once;
	static INIT: Once = Once::new();
	INIT.call_once(|| {
		init_tracing(false, 0);
	});
}

/// Installs a global `tracing` subscriber tuned by `verbosity`.
///
/// Does nothing if a subscriber is already installed (embedders that manage
/// their own `tracing` setup can call `execute` without ever calling this).
pub fn init_tracing(quiet: bool, verbosity: u8) {
	use tracing_subscriber::prelude::*;

	if let Ok(rust_log_env) = std::env::var("RUST_LOG") {
		let filter = EnvFilter::new(rust_log_env);
		let subscriber =
			tracing_subscriber::registry().with(fmt::layer().with_target(true)).with(filter);
		let _ = tracing::subscriber::set_global_default(subscriber);
		return;
	}

	let level = match (quiet, verbosity) {
		(true, _) => None,
		(false, 0) => Some("info"),
		(false, 1) => Some("debug"),
		(false, _) => Some("trace"),
	};

	let env_filter = if let Some(level) = level {
		EnvFilter::new(format!("warn,{}={level}", APPV))
	} else {
		EnvFilter::new("warn")
	};

	let fmt_layer = fmt::layer().without_time().with_target(false).with_level(true);
	let subscriber = tracing_subscriber::registry().with(fmt_layer).with(env_filter);
	let _ = tracing::subscriber::set_global_default(subscriber);
}
