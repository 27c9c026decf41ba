//! Scene graph and viewport (C9): the format-agnostic intermediate
//! representation the executor builds and the SVG emitter consumes.
//!
//! Grounded in the same axis/key/curve split `ploteria`'s renderer uses,
//! reworked from "emit gnuplot `set` commands" to "hold format-agnostic scene
//! nodes". Colour cycling follows the teacher's `gnuplot.rs` pattern of
//! walking a `strum`-derived enum with `IntoEnumIterator`.

use std::collections::BTreeMap;

use strum::IntoEnumIterator;

use crate::command_ast::{HorizontalAnchor, PlotStyle, PlotStyle3D, VerticalAnchor};
use crate::ticks::{self, Tick};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point2D {
	pub x: f64,
	pub y: f64,
}

impl Point2D {
	pub fn is_finite(&self) -> bool {
		self.x.is_finite() && self.y.is_finite()
	}
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point3D {
	pub x: f64,
	pub y: f64,
	pub z: f64,
}

impl Point3D {
	pub fn is_finite(&self) -> bool {
		self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisKind {
	X,
	Y,
	Z,
	X2,
	Y2,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisScale {
	Linear,
	Log,
	Time,
}

#[derive(Debug, Clone)]
pub struct Axis {
	pub id: String,
	pub kind: AxisKind,
	pub range: (f64, f64),
	pub scale: AxisScale,
	pub show_ticks: bool,
	pub show_grid: bool,
	pub label: Option<String>,
}

impl Axis {
	/// Computes this axis's ticks lazily from its range and scale, rather
	/// than storing them (spec.md §4.9 "ticks computed lazily ... at
	/// emission time").
	pub fn ticks(&self, guide: usize) -> Vec<Tick> {
		match self.scale {
			AxisScale::Linear | AxisScale::Time => {
				ticks::quantize_normal_tics(self.range.0, self.range.1, guide).1
			}
			AxisScale::Log => ticks::generate_log_ticks(self.range.0, self.range.1, 10.0),
		}
	}
}

/// How a plotted line is dashed. `Solid` is the default and omits the SVG
/// `stroke-dasharray` attribute entirely (spec.md §4.10).
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::EnumIter)]
pub enum LineStyle {
	Solid,
	Dashed,
	Dotted,
	DashDot,
}

impl LineStyle {
	pub fn dasharray(&self) -> Option<&'static str> {
		match self {
			LineStyle::Solid => None,
			LineStyle::Dashed => Some("6,4"),
			LineStyle::Dotted => Some("2,3"),
			LineStyle::DashDot => Some("8,3,2,3"),
		}
	}
}

/// The 8-entry default colour palette (spec.md §4.10), colour-blind-safe
/// (Okabe-Ito derived). Cycled the way the teacher cycles `Color`/
/// `MarkerType` combinations in `gnuplot.rs`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::EnumIter)]
pub enum PaletteColor {
	Violet,
	Teal,
	SkyBlue,
	Orange,
	Yellow,
	Blue,
	Vermillion,
	RosePink,
}

impl PaletteColor {
	pub fn hex(&self) -> &'static str {
		match self {
			PaletteColor::Violet => "#9400D3",
			PaletteColor::Teal => "#009E73",
			PaletteColor::SkyBlue => "#56B4E9",
			PaletteColor::Orange => "#E69F00",
			PaletteColor::Yellow => "#F0E442",
			PaletteColor::Blue => "#0072B2",
			PaletteColor::Vermillion => "#D55E00",
			PaletteColor::RosePink => "#CC79A7",
		}
	}
}

/// An endless cycle over the default palette's hex codes, one entry per spec
/// plotted within a single `plot`/`splot` command (spec.md §4.6).
pub fn default_palette_cycle() -> impl Iterator<Item = &'static str> {
	PaletteColor::iter().map(|c| c.hex()).collect::<Vec<_>>().into_iter().cycle()
}

#[derive(Debug, Clone)]
pub struct LinePlot {
	pub id: String,
	pub points: Vec<Point2D>,
	pub colour: &'static str,
	pub style: PlotStyle,
	pub line_style: LineStyle,
	pub line_width: f64,
	pub label: Option<String>,
}

#[derive(Debug, Clone)]
pub struct SurfacePlot3D {
	pub id: String,
	pub points: Vec<Point3D>,
	pub plot_style_3d: PlotStyle3D,
	pub colour: &'static str,
	pub label: Option<String>,
}

#[derive(Debug, Clone)]
pub struct LegendEntry {
	pub label: String,
	pub colour: &'static str,
	pub line_style: LineStyle,
}

/// A legend position is the composition of an independently-tracked vertical
/// and horizontal anchor (spec.md §4.6's key invariant): 5 vertical anchors x
/// 3 horizontal anchors covers the spec's "9 anchored + 6 margin positions".
#[derive(Debug, Clone)]
pub struct Legend {
	pub id: String,
	pub position: (VerticalAnchor, HorizontalAnchor),
	pub show_border: bool,
	pub columns: usize,
	pub entries: Vec<LegendEntry>,
}

/// Renders a legend position as the `vertical_horizontal` slug the test
/// oracle checks for (spec.md §8: `set key bmargin center; set key left` ->
/// `bmargin_left`).
pub fn legend_position_slug(vertical: VerticalAnchor, horizontal: HorizontalAnchor) -> String {
	let v = match vertical {
		VerticalAnchor::Top => "top",
		VerticalAnchor::Bottom => "bottom",
		VerticalAnchor::Center => "center",
		VerticalAnchor::TMargin => "tmargin",
		VerticalAnchor::BMargin => "bmargin",
	};
	let h = match horizontal {
		HorizontalAnchor::Left => "left",
		HorizontalAnchor::Right => "right",
		HorizontalAnchor::Center => "center",
	};
	format!("{v}_{h}")
}

#[derive(Debug, Clone)]
pub enum SceneElement {
	Axis(Axis),
	LinePlot(LinePlot),
	SurfacePlot3D(SurfacePlot3D),
	Legend(Legend),
}

#[derive(Debug, Clone)]
pub struct Viewport {
	pub x_min: f64,
	pub x_max: f64,
	pub y_min: f64,
	pub y_max: f64,
	pub z_min: Option<f64>,
	pub z_max: Option<f64>,
	pub x_tic_step: Option<f64>,
	pub y_tic_step: Option<f64>,
	pub z_tic_step: Option<f64>,
}

impl Viewport {
	pub fn new_2d(x_min: f64, x_max: f64, y_min: f64, y_max: f64) -> Self {
		debug_assert!(x_min < x_max && y_min < y_max, "viewport bounds must be ordered");
		Self {
			x_min,
			x_max,
			y_min,
			y_max,
			z_min: None,
			z_max: None,
			x_tic_step: None,
			y_tic_step: None,
			z_tic_step: None,
		}
	}

	pub fn new_3d(x_min: f64, x_max: f64, y_min: f64, y_max: f64, z_min: f64, z_max: f64) -> Self {
		debug_assert!(
			x_min < x_max && y_min < y_max && z_min < z_max,
			"viewport bounds must be ordered"
		);
		Self {
			x_min,
			x_max,
			y_min,
			y_max,
			z_min: Some(z_min),
			z_max: Some(z_max),
			x_tic_step: None,
			y_tic_step: None,
			z_tic_step: None,
		}
	}
}

#[derive(Debug, Clone)]
pub struct Scene {
	pub width: f64,
	pub height: f64,
	pub title: Option<String>,
	pub viewport: Viewport,
	pub elements: Vec<SceneElement>,
	pub show_border: bool,
	/// Extensibility slot for renderer-specific hints; a `BTreeMap` rather
	/// than a hash map so iteration order never affects emitted output
	/// (spec.md §9 "Deterministic output").
	pub hints: BTreeMap<String, String>,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn palette_cycles_past_eight_entries() {
		let colours: Vec<&str> = default_palette_cycle().take(10).collect();
		assert_eq!(colours[0], colours[8]);
		assert_eq!(colours[1], colours[9]);
		assert_eq!(colours.len(), 10);
	}

	#[test]
	fn legend_slug_matches_key_composition_example() {
		let slug = legend_position_slug(VerticalAnchor::BMargin, HorizontalAnchor::Left);
		assert_eq!(slug, "bmargin_left");
	}

	#[test]
	fn solid_line_style_has_no_dasharray() {
		assert_eq!(LineStyle::Solid.dasharray(), None);
	}
}
