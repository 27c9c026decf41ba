//! SVG emitter (C10): visits the scene graph and writes a deterministic SVG
//! document, mapping data coordinates to pixels and escaping label text.
//!
//! Grounded in the teacher's `gnuplot.rs` (`to_gnuplot()`-per-enum-variant
//! dispatch over `Color`/`DashStyle`/`PlotStyle`, a `LOG_TARGET` constant, and
//! writing through a small `Write`-taking helper) retargeted from emitting
//! gnuplot script text to emitting SVG XML.

use std::io;

use crate::command_ast::{HorizontalAnchor, PlotStyle, PlotStyle3D, VerticalAnchor};
use crate::format::format_number;
use crate::scene::{Axis, AxisKind, LegendEntry, LinePlot, Point3D, Scene, SceneElement, SurfacePlot3D};
use crate::ticks::DEFAULT_GUIDE;

const LOG_TARGET: &str = "svg";

const MARGIN_LEFT: f64 = 70.0;
const MARGIN_RIGHT: f64 = 30.0;
const MARGIN_TOP: f64 = 40.0;
const MARGIN_BOTTOM: f64 = 60.0;
const LEGEND_WIDTH: f64 = 150.0;
const LEGEND_ROW_HEIGHT: f64 = 18.0;
const LEGEND_SWATCH_LEN: f64 = 16.0;
const TICK_LENGTH: f64 = 5.0;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("I/O error writing SVG: {0}")]
	Io(#[from] io::Error),
}

/// Renders `scene` to a complete, self-contained SVG document.
pub fn render(scene: &Scene) -> String {
	let mut out = String::new();
	write_scene(scene, &mut out);
	out
}

/// Writes `scene`'s SVG to any byte sink, for embedders that want to stream
/// output rather than hold the whole document in memory.
pub fn render_to_writer(scene: &Scene, writer: &mut impl io::Write) -> Result<(), Error> {
	writer.write_all(render(scene).as_bytes())?;
	Ok(())
}

/// XML-escapes `< > & "` (spec.md §4.10 "Text"). Gnuplot-style apostrophes in
/// titles do not need escaping inside a double-quoted XML attribute or a text
/// node.
fn escape_xml(text: &str) -> String {
	let mut escaped = String::with_capacity(text.len());
	for ch in text.chars() {
		match ch {
			'<' => escaped.push_str("&lt;"),
			'>' => escaped.push_str("&gt;"),
			'&' => escaped.push_str("&amp;"),
			'"' => escaped.push_str("&quot;"),
			other => escaped.push(other),
		}
	}
	escaped
}

fn fmt(value: f64) -> String {
	format_number(value, 2)
}

/// The pixel rectangle data coordinates map into, plus the data-space bounds
/// being mapped. `map` implements spec.md §4.10's coordinate mapping exactly:
/// y is inverted because SVG y grows downward.
struct PlotArea {
	left: f64,
	right: f64,
	top: f64,
	bottom: f64,
	x_min: f64,
	x_max: f64,
	y_min: f64,
	y_max: f64,
}

impl PlotArea {
	fn map(&self, x: f64, y: f64) -> (f64, f64) {
		let px = self.left + (x - self.x_min) * (self.right - self.left) / (self.x_max - self.x_min);
		let py = self.bottom - (y - self.y_min) * (self.bottom - self.top) / (self.y_max - self.y_min);
		(px, py)
	}
}

fn plot_style_dasharray(style: crate::scene::LineStyle) -> Option<&'static str> {
	style.dasharray()
}

fn write_scene(scene: &Scene, out: &mut String) {
	let has_legend = scene.elements.iter().any(|e| matches!(e, SceneElement::Legend(_)));
	let right_margin = if has_legend { MARGIN_RIGHT + LEGEND_WIDTH } else { MARGIN_RIGHT };
	let top_margin = if scene.title.as_deref().is_some_and(|t| !t.is_empty()) { MARGIN_TOP + 10.0 } else { MARGIN_TOP };

	let x_axis = find_axis(scene, AxisKind::X);
	let y_axis = find_axis(scene, AxisKind::Y);
	let z_axis = find_axis(scene, AxisKind::Z);

	let (x_min, x_max) = x_axis.map(|a| a.range).unwrap_or((scene.viewport.x_min, scene.viewport.x_max));
	let (y_min, y_max) = y_axis.map(|a| a.range).unwrap_or((scene.viewport.y_min, scene.viewport.y_max));

	let area = PlotArea {
		left: MARGIN_LEFT,
		right: scene.width - right_margin,
		top: top_margin,
		bottom: scene.height - MARGIN_BOTTOM,
		x_min,
		x_max,
		y_min,
		y_max,
	};

	out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
	out.push_str(&format!(
		"<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">\n",
		w = fmt(scene.width),
		h = fmt(scene.height)
	));
	out.push_str(&format!(
		"  <clipPath id=\"plotClip\"><rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\"/></clipPath>\n",
		fmt(area.left),
		fmt(area.top),
		fmt(area.right - area.left),
		fmt(area.bottom - area.top)
	));
	out.push_str(&format!(
		"  <rect x=\"0\" y=\"0\" width=\"{}\" height=\"{}\" fill=\"white\"/>\n",
		fmt(scene.width),
		fmt(scene.height)
	));

	if let Some(title) = scene.title.as_deref().filter(|t| !t.is_empty()) {
		out.push_str(&format!(
			"  <text x=\"{}\" y=\"{}\" text-anchor=\"middle\" font-size=\"16\" font-family=\"sans-serif\">{}</text>\n",
			fmt((area.left + area.right) / 2.0),
			fmt(top_margin / 2.0),
			escape_xml(title)
		));
	}

	for element in &scene.elements {
		if let SceneElement::Axis(axis) = element {
			write_axis(axis, &area, out);
		}
	}
	if let Some(z) = z_axis {
		write_z_axis_label(z, &area, out);
	}

	out.push_str("  <g clip-path=\"url(#plotClip)\">\n");
	for element in &scene.elements {
		match element {
			SceneElement::LinePlot(plot) => write_line_plot(plot, &area, out),
			SceneElement::SurfacePlot3D(surface) => write_surface(surface, scene, &area, out),
			_ => {}
		}
	}
	out.push_str("  </g>\n");

	if scene.show_border {
		out.push_str(&format!(
			"  <path d=\"M {l} {t} L {r} {t} L {r} {b} L {l} {b} Z\" fill=\"none\" stroke=\"black\" stroke-width=\"1\"/>\n",
			l = fmt(area.left),
			t = fmt(area.top),
			r = fmt(area.right),
			b = fmt(area.bottom)
		));
	}

	for element in &scene.elements {
		if let SceneElement::Legend(legend) = element {
			write_legend(legend, &area, scene, out);
		}
	}

	out.push_str("</svg>\n");
}

fn find_axis(scene: &Scene, kind: AxisKind) -> Option<&Axis> {
	scene.elements.iter().find_map(|e| match e {
		SceneElement::Axis(a) if a.kind == kind => Some(a),
		_ => None,
	})
}

/// Draws one axis: its baseline, tick marks, tick labels, an optional axis
/// label, and (if `show_grid`) a full-height/width grid line per major tick.
fn write_axis(axis: &Axis, area: &PlotArea, out: &mut String) {
	let ticks = axis.ticks(DEFAULT_GUIDE);
	match axis.kind {
		AxisKind::X => {
			out.push_str(&format!(
				"  <line x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\" stroke=\"black\" stroke-width=\"1\"/>\n",
				fmt(area.left),
				fmt(area.bottom),
				fmt(area.right),
				fmt(area.bottom)
			));
			for tick in &ticks {
				let (px, _) = area.map(tick.position, axis.range.0);
				if tick.kind == crate::ticks::TickKind::Major {
					out.push_str(&format!(
						"  <line x1=\"{x}\" y1=\"{y1}\" x2=\"{x}\" y2=\"{y2}\" stroke=\"black\" stroke-width=\"1\"/>\n",
						x = fmt(px),
						y1 = fmt(area.bottom),
						y2 = fmt(area.bottom + TICK_LENGTH)
					));
					out.push_str(&format!(
						"  <text x=\"{x}\" y=\"{y}\" text-anchor=\"middle\" font-size=\"11\" font-family=\"sans-serif\">{label}</text>\n",
						x = fmt(px),
						y = fmt(area.bottom + TICK_LENGTH + 12.0),
						label = escape_xml(&tick.label)
					));
					if axis.show_grid {
						out.push_str(&format!(
							"  <line x1=\"{x}\" y1=\"{top}\" x2=\"{x}\" y2=\"{bottom}\" stroke=\"#cccccc\" stroke-width=\"0.5\"/>\n",
							x = fmt(px),
							top = fmt(area.top),
							bottom = fmt(area.bottom)
						));
					}
				}
			}
			if let Some(label) = axis.label.as_deref().filter(|l| !l.is_empty()) {
				out.push_str(&format!(
					"  <text x=\"{}\" y=\"{}\" text-anchor=\"middle\" font-size=\"13\" font-family=\"sans-serif\">{}</text>\n",
					fmt((area.left + area.right) / 2.0),
					fmt(area.bottom + 38.0),
					escape_xml(label)
				));
			}
		}
		AxisKind::Y => {
			out.push_str(&format!(
				"  <line x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\" stroke=\"black\" stroke-width=\"1\"/>\n",
				fmt(area.left),
				fmt(area.top),
				fmt(area.left),
				fmt(area.bottom)
			));
			for tick in &ticks {
				let (_, py) = area.map(axis.range.0, tick.position);
				if tick.kind == crate::ticks::TickKind::Major {
					out.push_str(&format!(
						"  <line x1=\"{x1}\" y1=\"{y}\" x2=\"{x2}\" y2=\"{y}\" stroke=\"black\" stroke-width=\"1\"/>\n",
						x1 = fmt(area.left - TICK_LENGTH),
						x2 = fmt(area.left),
						y = fmt(py)
					));
					out.push_str(&format!(
						"  <text x=\"{x}\" y=\"{y}\" text-anchor=\"end\" dominant-baseline=\"middle\" font-size=\"11\" font-family=\"sans-serif\">{label}</text>\n",
						x = fmt(area.left - TICK_LENGTH - 4.0),
						y = fmt(py),
						label = escape_xml(&tick.label)
					));
					if axis.show_grid {
						out.push_str(&format!(
							"  <line x1=\"{left}\" y1=\"{y}\" x2=\"{right}\" y2=\"{y}\" stroke=\"#cccccc\" stroke-width=\"0.5\"/>\n",
							left = fmt(area.left),
							right = fmt(area.right),
							y = fmt(py)
						));
					}
				}
			}
			if let Some(label) = axis.label.as_deref().filter(|l| !l.is_empty()) {
				out.push_str(&format!(
					"  <text x=\"{}\" y=\"{}\" text-anchor=\"middle\" font-size=\"13\" font-family=\"sans-serif\" transform=\"rotate(-90 {x} {y})\">{label}</text>\n",
					fmt(16.0),
					fmt((area.top + area.bottom) / 2.0),
					x = fmt(16.0),
					y = fmt((area.top + area.bottom) / 2.0),
					label = escape_xml(label)
				));
			}
		}
		// Z has no 2D baseline of its own; its extent only informs the 3D
		// projection bounds computed in `write_surface`.
		AxisKind::Z | AxisKind::X2 | AxisKind::Y2 => {}
	}
}

fn write_z_axis_label(_axis: &Axis, _area: &PlotArea, _out: &mut String) {
	// Z has no dedicated screen axis in this projection; its range only feeds
	// the isometric bounds in `write_surface`.
}

fn write_line_plot(plot: &LinePlot, area: &PlotArea, out: &mut String) {
	let dasharray = plot_style_dasharray(plot.line_style);
	let dash_attr = dasharray.map(|d| format!(" stroke-dasharray=\"{d}\"")).unwrap_or_default();

	let draws_line = matches!(plot.style, PlotStyle::Lines | PlotStyle::LinesPoints);
	let draws_points = matches!(plot.style, PlotStyle::Points | PlotStyle::LinesPoints);

	if draws_line {
		let mut segment: Vec<(f64, f64)> = Vec::new();
		for point in &plot.points {
			if point.is_finite() {
				segment.push(area.map(point.x, point.y));
			} else if !segment.is_empty() {
				write_polyline(&segment, plot.colour, plot.line_width, &dash_attr, out);
				segment.clear();
			}
		}
		if !segment.is_empty() {
			write_polyline(&segment, plot.colour, plot.line_width, &dash_attr, out);
		}
	}

	if matches!(plot.style, PlotStyle::Impulses) {
		let (_, baseline_py) = area.map(area.x_min, 0.0_f64.clamp(area.y_min, area.y_max));
		for point in &plot.points {
			if !point.is_finite() {
				continue;
			}
			let (px, py) = area.map(point.x, point.y);
			out.push_str(&format!(
				"    <line x1=\"{x}\" y1=\"{base}\" x2=\"{x}\" y2=\"{y}\" stroke=\"{colour}\" stroke-width=\"{w}\"/>\n",
				x = fmt(px),
				base = fmt(baseline_py),
				y = fmt(py),
				colour = plot.colour,
				w = fmt(plot.line_width)
			));
		}
	}

	if draws_points {
		for point in &plot.points {
			if !point.is_finite() {
				continue;
			}
			let (px, py) = area.map(point.x, point.y);
			out.push_str(&format!(
				"    <circle cx=\"{x}\" cy=\"{y}\" r=\"2.5\" fill=\"{colour}\"/>\n",
				x = fmt(px),
				y = fmt(py),
				colour = plot.colour
			));
		}
	}
}

fn write_polyline(points: &[(f64, f64)], colour: &str, width: f64, dash_attr: &str, out: &mut String) {
	if points.len() < 2 {
		return;
	}
	let pairs: Vec<String> = points.iter().map(|(x, y)| format!("{},{}", fmt(*x), fmt(*y))).collect();
	out.push_str(&format!(
		"    <polyline points=\"{points}\" fill=\"none\" stroke=\"{colour}\" stroke-width=\"{width}\"{dash} clip-path=\"url(#plotClip)\"/>\n",
		points = pairs.join(" "),
		colour = colour,
		width = fmt(width),
		dash = dash_attr
	));
}

/// Projects a 3D point to 2D with a fixed isometric transform (30 degrees),
/// since the scene records only world-space bounds and leaves the 3D-to-2D
/// projection to the renderer (spec.md §4.9 "3D Scene-assembly rules").
fn project_isometric(p: Point3D) -> (f64, f64) {
	let angle = 30.0_f64.to_radians();
	let sx = (p.x - p.z) * angle.cos();
	let sy = (p.x + p.z) * angle.sin() - p.y;
	(sx, sy)
}

fn write_surface(surface: &SurfacePlot3D, scene: &Scene, area: &PlotArea, out: &mut String) {
	let x_range = find_axis(scene, AxisKind::X).map(|a| a.range).unwrap_or((-1.0, 1.0));
	let y_range = find_axis(scene, AxisKind::Y).map(|a| a.range).unwrap_or((-1.0, 1.0));
	let z_range = find_axis(scene, AxisKind::Z).map(|a| a.range).unwrap_or((-1.0, 1.0));

	let corners = [
		Point3D { x: x_range.0, y: y_range.0, z: z_range.0 },
		Point3D { x: x_range.0, y: y_range.0, z: z_range.1 },
		Point3D { x: x_range.0, y: y_range.1, z: z_range.0 },
		Point3D { x: x_range.0, y: y_range.1, z: z_range.1 },
		Point3D { x: x_range.1, y: y_range.0, z: z_range.0 },
		Point3D { x: x_range.1, y: y_range.0, z: z_range.1 },
		Point3D { x: x_range.1, y: y_range.1, z: z_range.0 },
		Point3D { x: x_range.1, y: y_range.1, z: z_range.1 },
	];
	let (mut sx_min, mut sx_max, mut sy_min, mut sy_max) = (f64::INFINITY, f64::NEG_INFINITY, f64::INFINITY, f64::NEG_INFINITY);
	for corner in corners {
		let (sx, sy) = project_isometric(corner);
		sx_min = sx_min.min(sx);
		sx_max = sx_max.max(sx);
		sy_min = sy_min.min(sy);
		sy_max = sy_max.max(sy);
	}
	if sx_min == sx_max {
		sx_min -= 1.0;
		sx_max += 1.0;
	}
	if sy_min == sy_max {
		sy_min -= 1.0;
		sy_max += 1.0;
	}

	let projected_area = PlotArea {
		left: area.left,
		right: area.right,
		top: area.top,
		bottom: area.bottom,
		x_min: sx_min,
		x_max: sx_max,
		y_min: sy_min,
		y_max: sy_max,
	};

	let draw_lines = matches!(surface.plot_style_3d, PlotStyle3D::Lines | PlotStyle3D::Surface);
	let draw_points = matches!(surface.plot_style_3d, PlotStyle3D::Points | PlotStyle3D::Dots);

	if draw_lines {
		let mut segment = Vec::new();
		for point in &surface.points {
			if point.is_finite() {
				let (sx, sy) = project_isometric(*point);
				segment.push(projected_area.map(sx, sy));
			} else if !segment.is_empty() {
				write_polyline(&segment, surface.colour, 1.0, "", out);
				segment.clear();
			}
		}
		if !segment.is_empty() {
			write_polyline(&segment, surface.colour, 1.0, "", out);
		}
	}

	if draw_points {
		let radius = if matches!(surface.plot_style_3d, PlotStyle3D::Dots) { 1.0 } else { 2.0 };
		for point in &surface.points {
			if !point.is_finite() {
				continue;
			}
			let (sx, sy) = project_isometric(*point);
			let (px, py) = projected_area.map(sx, sy);
			out.push_str(&format!(
				"    <circle cx=\"{x}\" cy=\"{y}\" r=\"{r}\" fill=\"{colour}\"/>\n",
				x = fmt(px),
				y = fmt(py),
				r = radius,
				colour = surface.colour
			));
		}
	}
}

/// Resolves a legend's anchor pair to a top-left pixel position within (for
/// `top`/`bottom`/`center`) or outside (for `tmargin`/`bmargin`) the plot
/// rectangle.
fn legend_origin(legend: &crate::scene::Legend, area: &PlotArea, scene: &Scene) -> (f64, f64) {
	let rows = legend.entries.len().div_ceil(legend.columns.max(1));
	let height = rows as f64 * LEGEND_ROW_HEIGHT + 10.0;
	let x = match legend.position.1 {
		HorizontalAnchor::Left => area.left + 10.0,
		HorizontalAnchor::Right => area.right - LEGEND_WIDTH + 20.0,
		HorizontalAnchor::Center => (area.left + area.right) / 2.0 - LEGEND_WIDTH / 2.0 + 10.0,
	};
	let y = match legend.position.0 {
		VerticalAnchor::Top => area.top + 14.0,
		VerticalAnchor::Bottom => area.bottom - height,
		VerticalAnchor::Center => (area.top + area.bottom) / 2.0 - height / 2.0,
		VerticalAnchor::TMargin => 14.0,
		VerticalAnchor::BMargin => scene.height - 14.0 - height,
	};
	(x, y)
}

fn write_legend(legend: &crate::scene::Legend, area: &PlotArea, scene: &Scene, out: &mut String) {
	if legend.entries.is_empty() {
		return;
	}
	let (ox, oy) = legend_origin(legend, area, scene);
	let rows = legend.entries.len().div_ceil(legend.columns.max(1));
	let height = rows as f64 * LEGEND_ROW_HEIGHT + 10.0;

	if legend.show_border {
		out.push_str(&format!(
			"  <rect x=\"{x}\" y=\"{y}\" width=\"{w}\" height=\"{h}\" fill=\"white\" stroke=\"black\" stroke-width=\"1\"/>\n",
			x = fmt(ox),
			y = fmt(oy),
			w = fmt(LEGEND_WIDTH - 20.0),
			h = fmt(height)
		));
	}

	for (index, entry) in legend.entries.iter().enumerate() {
		let row = index / legend.columns.max(1);
		let col = index % legend.columns.max(1);
		let row_y = oy + 10.0 + row as f64 * LEGEND_ROW_HEIGHT;
		let col_x = ox + 8.0 + col as f64 * (LEGEND_SWATCH_LEN + 70.0);
		write_legend_entry(entry, col_x, row_y, out);
	}
}

fn write_legend_entry(entry: &LegendEntry, x: f64, y: f64, out: &mut String) {
	let dash = plot_style_dasharray(entry.line_style).map(|d| format!(" stroke-dasharray=\"{d}\"")).unwrap_or_default();
	out.push_str(&format!(
		"    <line x1=\"{x1}\" y1=\"{y}\" x2=\"{x2}\" y2=\"{y}\" stroke=\"{colour}\" stroke-width=\"2\"{dash}/>\n",
		x1 = fmt(x),
		x2 = fmt(x + LEGEND_SWATCH_LEN),
		y = fmt(y),
		colour = entry.colour
	));
	out.push_str(&format!(
		"    <text x=\"{x}\" y=\"{y}\" dominant-baseline=\"middle\" font-size=\"11\" font-family=\"sans-serif\">{label}</text>\n",
		x = fmt(x + LEGEND_SWATCH_LEN + 6.0),
		y = fmt(y),
		label = escape_xml(&entry.label)
	));
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::command_ast::PlotStyle;
	use crate::scene::{Axis, AxisKind, AxisScale, LineStyle, LinePlot, Point2D, Viewport};
	use std::collections::BTreeMap;

	fn sample_scene() -> Scene {
		let points = vec![Point2D { x: 0.0, y: 0.0 }, Point2D { x: 5.0, y: 0.5 }, Point2D { x: 10.0, y: f64::NAN }];
		Scene {
			width: 800.0,
			height: 600.0,
			title: Some("T".to_string()),
			viewport: Viewport::new_2d(0.0, 10.0, 0.0, 1.0),
			elements: vec![
				SceneElement::Axis(Axis {
					id: "x".to_string(),
					kind: AxisKind::X,
					range: (0.0, 10.0),
					scale: AxisScale::Linear,
					show_ticks: true,
					show_grid: false,
					label: None,
				}),
				SceneElement::Axis(Axis {
					id: "y".to_string(),
					kind: AxisKind::Y,
					range: (0.0, 1.0),
					scale: AxisScale::Linear,
					show_ticks: true,
					show_grid: false,
					label: None,
				}),
				SceneElement::LinePlot(LinePlot {
					id: "plot-0".to_string(),
					points,
					colour: "#9400D3",
					style: PlotStyle::Lines,
					line_style: LineStyle::Solid,
					line_width: 1.0,
					label: None,
				}),
			],
			show_border: true,
			hints: BTreeMap::new(),
		}
	}

	#[test]
	fn renders_svg_root_and_escaped_title() {
		let svg = render(&sample_scene());
		assert!(svg.contains("<svg"));
		assert!(svg.contains(">T<"));
	}

	#[test]
	fn exactly_one_polyline_with_clip_path() {
		let svg = render(&sample_scene());
		let count = svg.matches("<polyline").count();
		assert_eq!(count, 1);
		assert!(svg.contains("clip-path=\"url(#plotClip)\""));
	}

	#[test]
	fn both_axis_lines_are_present() {
		let svg = render(&sample_scene());
		assert_eq!(svg.matches("stroke=\"black\" stroke-width=\"1\"/>\n").count() >= 2, true);
	}

	#[test]
	fn escapes_xml_special_characters() {
		assert_eq!(escape_xml("a < b & c > \"d\""), "a &lt; b &amp; c &gt; &quot;d&quot;");
	}

	#[test]
	fn nan_sample_breaks_the_polyline_into_segments() {
		let mut scene = sample_scene();
		if let SceneElement::LinePlot(plot) = &mut scene.elements[2] {
			plot.points = vec![
				Point2D { x: 0.0, y: 0.0 },
				Point2D { x: 1.0, y: f64::NAN },
				Point2D { x: 2.0, y: 1.0 },
				Point2D { x: 3.0, y: 1.0 },
			];
		}
		let svg = render(&scene);
		// the lone point before the NaN sample is too short to draw; the two
		// points after it form their own polyline rather than joining across
		// the gap into one 4-point line
		assert_eq!(svg.matches("<polyline").count(), 1);
	}

	#[test]
	fn border_emits_closed_rect_path() {
		let svg = render(&sample_scene());
		assert!(svg.contains("<path d=\"M"));
	}
}
