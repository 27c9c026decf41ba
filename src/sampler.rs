//! Sampler and data reader (C7): turns a plot spec into a point sequence.
//!
//! Grounded in the teacher's `align_ranges.rs` file-reading idiom (candidate
//! directory search, `tracing::warn!` on malformed input, never aborting the
//! whole read over one bad line) retargeted from CSV time ranges to
//! whitespace-separated `(x, y[, z])` samples.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::ast::Node;
use crate::command_ast::{Dgrid3dMode, Dgrid3dOption};
use crate::context::EvaluationContext;
use crate::evaluator::Evaluator;
use crate::scene::{Point2D, Point3D};

const LOG_TARGET: &str = "sampler";

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("I/O error: path '{path}': {source}")]
	Io { path: PathBuf, source: std::io::Error },

	#[error("data file '{0}' was not found in any candidate directory")]
	NotFound(String),
}

/// Samples `node` at `count` evenly spaced points across `[x0, x1]`
/// (spec.md §4.7). A per-sample evaluation failure yields `(x_i, NaN)`
/// rather than aborting the whole sweep. Mutates `context`'s `x` variable in
/// place and does not restore it afterward, matching the reference.
pub fn sample_function(
	node: &Node,
	context: &mut EvaluationContext,
	x0: f64,
	x1: f64,
	count: usize,
) -> Vec<Point2D> {
	let count = count.max(2);
	let mut points = Vec::with_capacity(count);
	for i in 0..count {
		let x = x0 + i as f64 * (x1 - x0) / (count - 1) as f64;
		context.set_variable("x", x);
		let y = Evaluator::new(context).evaluate(node).map(|v| v.re).unwrap_or(f64::NAN);
		points.push(Point2D { x, y });
	}
	points
}

/// Resolves `reference` against a sequence of candidate directories (current
/// directory, then each of `search_path` in order), returning the first path
/// that exists.
pub fn resolve_data_file(reference: &str, search_path: &[PathBuf]) -> Result<PathBuf, Error> {
	let direct = Path::new(reference);
	if direct.is_file() {
		return Ok(direct.to_path_buf());
	}
	for dir in search_path {
		let candidate = dir.join(reference);
		if candidate.is_file() {
			return Ok(candidate);
		}
	}
	Err(Error::NotFound(reference.to_string()))
}

/// Reads whitespace-separated `(x, y)` samples from `path`. `#`-prefixed and
/// blank lines are skipped; a line whose first two fields don't both parse
/// as numbers is logged and skipped rather than aborting the read.
pub fn read_2d_data_file(path: &Path) -> Result<Vec<Point2D>, Error> {
	let contents = fs::read_to_string(path).map_err(|source| Error::Io { path: path.to_path_buf(), source })?;
	let mut points = Vec::new();
	for (line_no, line) in contents.lines().enumerate() {
		let trimmed = line.trim();
		if trimmed.is_empty() || trimmed.starts_with('#') {
			continue;
		}
		let mut fields = trimmed.split_whitespace();
		match (fields.next().and_then(|f| f.parse::<f64>().ok()), fields.next().and_then(|f| f.parse::<f64>().ok()))
		{
			(Some(x), Some(y)) => points.push(Point2D { x, y }),
			_ => warn!(
				target: LOG_TARGET,
				path = %path.display(),
				line = line_no + 1,
				"skipping malformed data line"
			),
		}
	}
	Ok(points)
}

/// Reads whitespace-separated `(x, y, z)` samples from `path`, for `splot`.
pub fn read_3d_data_file(path: &Path) -> Result<Vec<Point3D>, Error> {
	let contents = fs::read_to_string(path).map_err(|source| Error::Io { path: path.to_path_buf(), source })?;
	let mut points = Vec::new();
	for (line_no, line) in contents.lines().enumerate() {
		let trimmed = line.trim();
		if trimmed.is_empty() || trimmed.starts_with('#') {
			continue;
		}
		let mut fields = trimmed.split_whitespace();
		let parsed = (
			fields.next().and_then(|f| f.parse::<f64>().ok()),
			fields.next().and_then(|f| f.parse::<f64>().ok()),
			fields.next().and_then(|f| f.parse::<f64>().ok()),
		);
		match parsed {
			(Some(x), Some(y), Some(z)) => points.push(Point3D { x, y, z }),
			_ => warn!(
				target: LOG_TARGET,
				path = %path.display(),
				line = line_no + 1,
				"skipping malformed data line"
			),
		}
	}
	Ok(points)
}

fn dgrid3d_weight(mode: Dgrid3dMode, d: f64, norm: f64) -> f64 {
	match mode {
		Dgrid3dMode::QNorm => 1.0 / d.powf(norm),
		Dgrid3dMode::Gauss => (-d * d).exp(),
		Dgrid3dMode::Cauchy => 1.0 / (1.0 + d * d),
		Dgrid3dMode::Exp => (-d).exp(),
		Dgrid3dMode::Box => {
			if d < 1.0 {
				1.0
			} else {
				0.0
			}
		}
	}
}

/// Fits scattered 3D points onto a regular `rows x cols` grid spanning the
/// data's XY bounds (spec.md §4.7 "3D grid interpolation"). Each grid cell's
/// `z` is the weighted average over every scattered point, by the selected
/// mode; a point within `1e-10` of the cell (in the XY plane) short-circuits
/// to that point's `z` directly, avoiding a division by zero.
pub fn dgrid3d_interpolate(points: &[Point3D], options: Dgrid3dOption) -> Vec<Point3D> {
	if points.is_empty() || options.rows < 2 || options.cols < 2 {
		return Vec::new();
	}

	let (mut x_min, mut x_max) = (f64::INFINITY, f64::NEG_INFINITY);
	let (mut y_min, mut y_max) = (f64::INFINITY, f64::NEG_INFINITY);
	for p in points {
		x_min = x_min.min(p.x);
		x_max = x_max.max(p.x);
		y_min = y_min.min(p.y);
		y_max = y_max.max(p.y);
	}

	let mut grid = Vec::with_capacity(options.rows * options.cols);
	for row in 0..options.rows {
		let gy = if options.rows == 1 {
			y_min
		} else {
			y_min + row as f64 * (y_max - y_min) / (options.rows - 1) as f64
		};
		for col in 0..options.cols {
			let gx = if options.cols == 1 {
				x_min
			} else {
				x_min + col as f64 * (x_max - x_min) / (options.cols - 1) as f64
			};
			grid.push(interpolate_cell(points, gx, gy, options));
		}
	}
	grid
}

fn interpolate_cell(points: &[Point3D], gx: f64, gy: f64, options: Dgrid3dOption) -> Point3D {
	for p in points {
		let d = ((p.x - gx).powi(2) + (p.y - gy).powi(2)).sqrt();
		if d < 1e-10 {
			return Point3D { x: gx, y: gy, z: p.z };
		}
	}

	let mut weighted_sum = 0.0;
	let mut weight_total = 0.0;
	for p in points {
		let d = ((p.x - gx).powi(2) + (p.y - gy).powi(2)).sqrt();
		let w = dgrid3d_weight(options.mode, d, options.norm);
		weighted_sum += w * p.z;
		weight_total += w;
	}
	let z = if weight_total != 0.0 { weighted_sum / weight_total } else { f64::NAN };
	Point3D { x: gx, y: gy, z }
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::parser;

	#[test]
	fn sample_function_covers_endpoints_exactly() {
		let mut ctx = EvaluationContext::with_defaults();
		let node = parser::parse("x").unwrap();
		let points = sample_function(&node, &mut ctx, 0.0, 10.0, 5);
		assert_eq!(points.len(), 5);
		assert_eq!(points.first().unwrap().x, 0.0);
		assert_eq!(points.last().unwrap().x, 10.0);
	}

	#[test]
	fn sample_function_yields_nan_on_evaluation_failure() {
		let mut ctx = EvaluationContext::new();
		let node = parser::parse("undefined_var").unwrap();
		let points = sample_function(&node, &mut ctx, 0.0, 1.0, 2);
		assert!(points.iter().all(|p| p.y.is_nan()));
	}

	#[test]
	fn read_2d_data_file_skips_comments_and_malformed_lines() {
		let path = std::env::temp_dir().join("sampler_test_read_2d.dat");
		fs::write(&path, "1 2\n# comment\n\nbad line here\n3 4\n").unwrap();
		let points = read_2d_data_file(&path).unwrap();
		assert_eq!(points, vec![Point2D { x: 1.0, y: 2.0 }, Point2D { x: 3.0, y: 4.0 }]);
		fs::remove_file(&path).ok();
	}

	#[test]
	fn resolve_data_file_checks_search_path() {
		let dir = std::env::temp_dir();
		let unique = dir.join("sampler_test_resolve.dat");
		fs::write(&unique, "1 2\n").unwrap();
		let found = resolve_data_file(unique.file_name().unwrap().to_str().unwrap(), &[dir.clone()]).unwrap();
		assert_eq!(found, unique);
		fs::remove_file(&unique).ok();
	}

	#[test]
	fn dgrid3d_qnorm_weights_closer_points_more() {
		let points = vec![
			Point3D { x: 0.0, y: 0.0, z: 10.0 },
			Point3D { x: 10.0, y: 10.0, z: 0.0 },
		];
		let options = Dgrid3dOption { rows: 2, cols: 2, mode: Dgrid3dMode::QNorm, norm: 2.0 };
		let grid = dgrid3d_interpolate(&points, options);
		assert_eq!(grid.len(), 4);
		let near_origin = grid.iter().find(|p| p.x == 0.0 && p.y == 0.0).unwrap();
		assert_eq!(near_origin.z, 10.0);
	}

	#[test]
	fn dgrid3d_exact_match_takes_point_z_directly() {
		let points = vec![Point3D { x: 0.0, y: 0.0, z: 5.0 }, Point3D { x: 1.0, y: 1.0, z: 9.0 }];
		let options = Dgrid3dOption { rows: 2, cols: 2, mode: Dgrid3dMode::Gauss, norm: 1.0 };
		let grid = dgrid3d_interpolate(&points, options);
		let exact = grid.iter().find(|p| (p.x - 0.0).abs() < 1e-12 && (p.y - 0.0).abs() < 1e-12).unwrap();
		assert_eq!(exact.z, 5.0);
	}

}
