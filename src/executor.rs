//! Script executor (C6): folds a parsed command list into accumulated
//! scenes, then flushes them to SVG.
//!
//! Grounded in the teacher's `resolved_graph_config.rs` resolution-pass shape
//! (a mutable state struct visited field-by-field by incoming directives)
//! retargeted from "resolve a TOML graph config" to "fold a script's commands
//! into scene state".

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::PathBuf;

use tracing::warn;

use crate::ast::Node;
use crate::command_ast::{
	Bound, Command, Dgrid3dOption, HorizontalAnchor, KeyToken, PlotSource, PlotSpec, PlotSpecStyle, PlotStyle,
	Range, SetOption, SpannedCommand, UnsetOption, VerticalAnchor,
};
use crate::command_parser;
use crate::context::EvaluationContext;
use crate::evaluator::Evaluator;
use crate::sampler;
use crate::scene::{
	Axis, AxisKind, AxisScale, LegendEntry, LinePlot, Point2D, Point3D, Scene, SceneElement, SurfacePlot3D, Viewport,
};
use crate::ticks;

const LOG_TARGET: &str = "executor";

const DEFAULT_SAMPLES: usize = 100;
const DEFAULT_WIDTH: f64 = 800.0;
const DEFAULT_HEIGHT: f64 = 600.0;

/// The x-domain a function spec samples over absent any explicit range,
/// matching the reference's own default (spec.md is silent on the exact
/// value; this is recorded as an open-question decision in DESIGN.md).
const DEFAULT_X_DOMAIN: (f64, f64) = (-10.0, 10.0);

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("command parse error: {0}")]
	CommandParse(#[from] command_parser::Error),

	#[error("sampling error: {0}")]
	Sampling(#[from] sampler::Error),

	#[error("I/O error writing '{path}': {source}")]
	Io { path: PathBuf, source: io::Error },

	#[error("expression parse error in function body of '{0}': {1}")]
	FunctionBody(String, crate::parser::Error),
}

/// Configuration for one [`Executor`] run (spec.md §6 "External interfaces").
pub struct ExecutorOptions {
	/// Base name (no directory, no extension) used to derive the default
	/// output filename when `set output` is never invoked.
	pub script_name: String,
	/// Candidate directories searched, after the current directory, when
	/// resolving a quoted data-file reference (spec.md §4.7).
	pub search_path: Vec<PathBuf>,
	/// Directory completed SVG files are written into.
	pub output_dir: PathBuf,
	/// A pre-seeded evaluation context; `None` uses [`EvaluationContext::with_defaults`].
	pub context: Option<EvaluationContext>,
}

impl ExecutorOptions {
	pub fn new(script_name: impl Into<String>) -> Self {
		Self {
			script_name: script_name.into(),
			search_path: Vec::new(),
			output_dir: PathBuf::from("."),
			context: None,
		}
	}
}

/// The vertical/horizontal anchors and border/layout flags making up `set
/// key` state. Each field is mutated independently (spec.md §4.6 key
/// composition invariant); only [`KeyState::position`] combines them, and
/// only at scene-assembly time.
#[derive(Debug, Clone)]
struct KeyState {
	vertical: VerticalAnchor,
	horizontal: HorizontalAnchor,
	show_border: bool,
	layout_horizontal: bool,
}

impl Default for KeyState {
	fn default() -> Self {
		Self {
			vertical: VerticalAnchor::Top,
			horizontal: HorizontalAnchor::Right,
			show_border: true,
			layout_horizontal: false,
		}
	}
}

impl KeyState {
	fn apply(&mut self, token: KeyToken) {
		match token {
			KeyToken::Vertical(v) => self.vertical = v,
			KeyToken::Horizontal(h) => self.horizontal = h,
			KeyToken::Border(b) => self.show_border = b,
			KeyToken::LayoutHorizontal(b) => self.layout_horizontal = b,
		}
	}
}

/// Mutable state folded over a command list; owns the evaluation context and
/// every `set`-able option, plus the growing list of completed scenes.
pub struct Executor {
	options: ExecutorOptions,
	context: EvaluationContext,

	title: Option<String>,
	xlabel: Option<String>,
	ylabel: Option<String>,
	samples: usize,
	grid: bool,
	show_border: bool,
	style_data: PlotStyle,
	key: KeyState,
	dgrid3d: Option<Dgrid3dOption>,
	output: Option<String>,

	/// The x-domain used for function sampling when a `plot`/`splot` gives no
	/// explicit x range; persists across commands, updated whenever an
	/// explicit x range is given (spec.md §4.6 "X-range is the executor's
	/// current x-range verbatim").
	current_x_range: (f64, f64),

	scenes: Vec<(String, Scene)>,
	next_scene_index: usize,
}

impl Executor {
	pub fn new(mut options: ExecutorOptions) -> Self {
		let context = options.context.take().unwrap_or_else(EvaluationContext::with_defaults);
		Self {
			options,
			context,
			title: None,
			xlabel: None,
			ylabel: None,
			samples: DEFAULT_SAMPLES,
			grid: false,
			show_border: true,
			style_data: PlotStyle::Lines,
			key: KeyState::default(),
			dgrid3d: None,
			output: None,
			current_x_range: DEFAULT_X_DOMAIN,
			scenes: Vec::new(),
			next_scene_index: 1,
		}
	}

	/// Parses and runs `script` to completion, then flushes every
	/// accumulated scene to SVG under `options.output_dir` (spec.md §4.6
	/// "After the full list is processed, calls the scene emitter").
	pub fn execute(&mut self, script: &str) -> Result<Vec<PathBuf>, Error> {
		let commands = command_parser::parse_script(script)?;
		for spanned in &commands {
			self.execute_command(spanned)?;
		}
		self.flush()
	}

	pub fn context(&mut self) -> &mut EvaluationContext {
		&mut self.context
	}

	pub fn scenes(&self) -> &[(String, Scene)] {
		&self.scenes
	}

	fn execute_command(&mut self, spanned: &SpannedCommand) -> Result<(), Error> {
		match &spanned.command {
			Command::Set(option) => self.apply_set(option.clone()),
			Command::Unset(option) => self.apply_unset(*option),
			Command::Reset => self.apply_reset(),
			Command::Assign { name, expr_text } => self.apply_assign(name, expr_text)?,
			Command::DefineFn { name, params, body_text } => {
				self.context.define_user_function(name.clone(), params.clone(), body_text.clone());
			}
			Command::Pause { .. } => {
				// The core is non-interactive; `pause` is accepted and ignored.
			}
			Command::Plot { range_x, range_y, specs } => self.execute_plot(range_x, range_y, specs)?,
			Command::Splot { range_x, range_y, range_z, specs } => {
				self.execute_splot(range_x, range_y, range_z, specs)?
			}
		}
		Ok(())
	}

	fn apply_set(&mut self, option: SetOption) {
		match option {
			SetOption::Title(text) => self.title = Some(text),
			SetOption::XLabel(text) => self.xlabel = Some(text),
			SetOption::YLabel(text) => self.ylabel = Some(text),
			SetOption::Samples(n) => self.samples = n.max(2),
			SetOption::Grid => self.grid = true,
			SetOption::Border => self.show_border = true,
			SetOption::Output(name) => self.output = Some(name),
			SetOption::Key(tokens) => {
				for token in tokens {
					self.key.apply(token);
				}
			}
			SetOption::StyleData(style) => self.style_data = style,
			SetOption::Dgrid3d(options) => self.dgrid3d = Some(options),
			SetOption::Unknown(name) => {
				warn!(target: LOG_TARGET, option = %name, "ignoring unknown 'set' option");
			}
		}
	}

	fn apply_unset(&mut self, option: UnsetOption) {
		match option {
			UnsetOption::Grid => self.grid = false,
			UnsetOption::Border => self.show_border = false,
			UnsetOption::Title => self.title = None,
			UnsetOption::XLabel => self.xlabel = None,
			UnsetOption::YLabel => self.ylabel = None,
			UnsetOption::Dgrid3d => self.dgrid3d = None,
			UnsetOption::Key => self.key = KeyState::default(),
		}
	}

	/// `reset` (spec.md §4.6): clears title/labels, resets `samples` to 100,
	/// turns grid off, empties variables. Completed scenes and user-defined
	/// functions survive.
	fn apply_reset(&mut self) {
		self.title = None;
		self.xlabel = None;
		self.ylabel = None;
		self.samples = DEFAULT_SAMPLES;
		self.grid = false;
		self.context.clear_variables();
	}

	fn apply_assign(&mut self, name: &str, expr_text: &str) -> Result<(), Error> {
		let node = crate::parser::parse(expr_text).map_err(|e| Error::FunctionBody(name.to_string(), e))?;
		let value = Evaluator::new(&mut self.context).evaluate_real(&node).unwrap_or(f64::NAN);
		self.context.set_variable(name.to_string(), value);
		Ok(())
	}

	fn resolve_bound(&mut self, bound: &Bound, fallback: f64) -> f64 {
		match bound {
			Bound::Auto => fallback,
			Bound::Expr(node) => Evaluator::new(&mut self.context).evaluate_real(node).unwrap_or(fallback),
		}
	}

	/// Resolves the three-level style fallback (spec.md §4.6): explicit
	/// `with` wins, then `style data` for file specs, then `lines` for
	/// function specs.
	fn resolve_2d_style(&self, spec: &PlotSpec) -> PlotStyle {
		if let Some(PlotSpecStyle::TwoD(style)) = spec.style {
			return style;
		}
		match spec.source {
			PlotSource::DataFile(_) => self.style_data,
			PlotSource::Expression(_) => PlotStyle::Lines,
		}
	}

	fn execute_plot(&mut self, range_x: &Option<Range>, range_y: &Option<Range>, specs: &[PlotSpec]) -> Result<(), Error> {
		let x_explicit = range_x
			.as_ref()
			.is_some_and(|r| !matches!(r.min, Bound::Auto) && !matches!(r.max, Bound::Auto));
		if let Some(Range { min, max }) = range_x {
			let lo = self.resolve_bound(min, self.current_x_range.0);
			let hi = self.resolve_bound(max, self.current_x_range.1);
			self.current_x_range = (lo, hi);
		}
		let (x_lo_fallback, x_hi_fallback) = self.current_x_range;

		let mut line_plots = Vec::new();
		let mut palette = crate::scene::default_palette_cycle();
		let mut all_y = Vec::new();
		let mut data_x_lo = f64::INFINITY;
		let mut data_x_hi = f64::NEG_INFINITY;
		let mut saw_data_file = false;

		for (index, spec) in specs.iter().enumerate() {
			let colour = palette.next().expect("palette cycle is infinite");
			let style = self.resolve_2d_style(spec);

			let (spec_x_lo, spec_x_hi) = match &spec.range {
				Some(range) => {
					let lo = self.resolve_bound(&range.min, x_lo_fallback);
					let hi = self.resolve_bound(&range.max, x_hi_fallback);
					(lo, hi)
				}
				None => (x_lo_fallback, x_hi_fallback),
			};

			let points = match &spec.source {
				PlotSource::Expression(text) => {
					let node = crate::parser::parse(text)
						.map_err(|e| Error::FunctionBody(format!("spec #{index}"), e))?;
					sampler::sample_function(&node, &mut self.context, spec_x_lo, spec_x_hi, self.samples)
				}
				PlotSource::DataFile(reference) => {
					saw_data_file = true;
					let path = sampler::resolve_data_file(reference, &self.options.search_path)?;
					sampler::read_2d_data_file(&path)?
				}
			};

			if let PlotSource::DataFile(_) = &spec.source {
				for p in &points {
					if p.x.is_finite() {
						data_x_lo = data_x_lo.min(p.x);
						data_x_hi = data_x_hi.max(p.x);
					}
				}
			}
			all_y.extend(points.iter().filter(|p| p.is_finite()).map(|p| p.y));

			line_plots.push(LinePlot {
				id: format!("plot-{index}"),
				points,
				colour,
				style,
				line_style: crate::scene::LineStyle::Solid,
				line_width: 1.0,
				label: spec.title.clone(),
			});
		}

		// Data-backed specs autoscale the x axis from their own values unless
		// the caller pinned an explicit range; function-only specs use the
		// executor's current x-range verbatim (spec.md §4.6).
		let (x_axis_lo, x_axis_hi, x_step) = if x_explicit {
			(x_lo_fallback, x_hi_fallback, None)
		} else if saw_data_file && data_x_lo.is_finite() {
			extend_axis(data_x_lo, data_x_hi)
		} else {
			(x_lo_fallback, x_hi_fallback, None)
		};

		let y_explicit = range_y
			.as_ref()
			.is_some_and(|r| !matches!(r.min, Bound::Auto) && !matches!(r.max, Bound::Auto));
		let (y_axis_lo, y_axis_hi, y_step) = if y_explicit {
			let Range { min, max } = range_y.as_ref().expect("checked by y_explicit");
			let lo = self.resolve_bound(min, 0.0);
			let hi = self.resolve_bound(max, 1.0);
			(lo, hi, None)
		} else {
			let (lo, hi) = autoscale_axis(&all_y);
			extend_axis(lo, hi)
		};

		let mut elements = Vec::new();
		elements.push(SceneElement::Axis(Axis {
			id: "x".to_string(),
			kind: AxisKind::X,
			range: (x_axis_lo, x_axis_hi),
			scale: AxisScale::Linear,
			show_ticks: true,
			show_grid: self.grid,
			label: self.xlabel.clone(),
		}));
		elements.push(SceneElement::Axis(Axis {
			id: "y".to_string(),
			kind: AxisKind::Y,
			range: (y_axis_lo, y_axis_hi),
			scale: AxisScale::Linear,
			show_ticks: true,
			show_grid: self.grid,
			label: self.ylabel.clone(),
		}));

		let legend_entries: Vec<LegendEntry> = line_plots
			.iter()
			.filter_map(|p| {
				p.label.clone().map(|label| LegendEntry { label, colour: p.colour, line_style: p.line_style })
			})
			.collect();

		for plot in line_plots {
			elements.push(SceneElement::LinePlot(plot));
		}

		if !legend_entries.is_empty() {
			elements.push(SceneElement::Legend(crate::scene::Legend {
				id: "legend".to_string(),
				position: (self.key.vertical, self.key.horizontal),
				show_border: self.key.show_border,
				columns: if self.key.layout_horizontal { legend_entries.len().max(1) } else { 1 },
				entries: legend_entries,
			}));
		}

		let mut viewport = Viewport::new_2d(x_axis_lo, x_axis_hi, y_axis_lo, y_axis_hi);
		viewport.x_tic_step = x_step;
		viewport.y_tic_step = y_step;

		let scene = Scene {
			width: DEFAULT_WIDTH,
			height: DEFAULT_HEIGHT,
			title: self.title.clone(),
			viewport,
			elements,
			show_border: self.show_border,
			hints: BTreeMap::new(),
		};
		self.scenes.push((self.next_output_name(), scene));
		Ok(())
	}

	fn execute_splot(
		&mut self,
		range_x: &Option<Range>,
		range_y: &Option<Range>,
		range_z: &Option<Range>,
		specs: &[PlotSpec],
	) -> Result<(), Error> {
		let mut palette = crate::scene::default_palette_cycle();
		let mut surfaces = Vec::new();
		let mut all_points: Vec<Point3D> = Vec::new();

		for (index, spec) in specs.iter().enumerate() {
			let colour = palette.next().expect("palette cycle is infinite");
			let plot_style_3d = match spec.style {
				Some(PlotSpecStyle::ThreeD(style)) => style,
				_ => crate::command_ast::PlotStyle3D::Points,
			};

			let mut points = match &spec.source {
				PlotSource::Expression(text) => {
					warn!(
						target: LOG_TARGET,
						expression = %text,
						"splot of a function samples a fixed [-1,1]^2 grid; prefer data-file splots for precise bounds"
					);
					let node = crate::parser::parse(text)
						.map_err(|e| Error::FunctionBody(format!("spec #{index}"), e))?;
					sample_surface(&node, &mut self.context, self.samples)
				}
				PlotSource::DataFile(reference) => {
					let path = sampler::resolve_data_file(reference, &self.options.search_path)?;
					sampler::read_3d_data_file(&path)?
				}
			};

			if let Some(options) = self.dgrid3d {
				points = sampler::dgrid3d_interpolate(&points, options);
			}

			all_points.extend(points.iter().filter(|p| p.is_finite()).copied());

			surfaces.push(SurfacePlot3D {
				id: format!("surface-{index}"),
				points,
				plot_style_3d,
				colour,
				label: spec.title.clone(),
			});
		}

		let (x_lo, x_hi) = axis_bounds_3d(&all_points, |p| p.x, range_x, &mut self.context);
		let (y_lo, y_hi) = axis_bounds_3d(&all_points, |p| p.y, range_y, &mut self.context);
		let (z_lo, z_hi) = axis_bounds_3d(&all_points, |p| p.z, range_z, &mut self.context);

		let mut elements = vec![
			SceneElement::Axis(Axis {
				id: "x".to_string(),
				kind: AxisKind::X,
				range: (x_lo, x_hi),
				scale: AxisScale::Linear,
				show_ticks: true,
				show_grid: self.grid,
				label: self.xlabel.clone(),
			}),
			SceneElement::Axis(Axis {
				id: "y".to_string(),
				kind: AxisKind::Y,
				range: (y_lo, y_hi),
				scale: AxisScale::Linear,
				show_ticks: true,
				show_grid: self.grid,
				label: self.ylabel.clone(),
			}),
			SceneElement::Axis(Axis {
				id: "z".to_string(),
				kind: AxisKind::Z,
				range: (z_lo, z_hi),
				scale: AxisScale::Linear,
				show_ticks: true,
				show_grid: self.grid,
				label: None,
			}),
		];
		for surface in surfaces {
			elements.push(SceneElement::SurfacePlot3D(surface));
		}

		let scene = Scene {
			width: DEFAULT_WIDTH,
			height: DEFAULT_HEIGHT,
			title: self.title.clone(),
			viewport: Viewport::new_3d(x_lo, x_hi, y_lo, y_hi, z_lo, z_hi),
			elements,
			show_border: self.show_border,
			hints: BTreeMap::new(),
		};
		self.scenes.push((self.next_output_name(), scene));
		Ok(())
	}

	/// Derives this run's next output filename (spec.md §4.6 "Default output
	/// naming"): the explicit `set output` name for the first scene, else the
	/// script's base name with a `.svg` extension; subsequent scenes in the
	/// same run get `_002`, `_003`, … suffixes.
	fn next_output_name(&mut self) -> String {
		let base = self
			.output
			.clone()
			.unwrap_or_else(|| format!("{}.svg", self.options.script_name));
		let name = if self.next_scene_index == 1 {
			base
		} else {
			let (stem, ext) = split_extension(&base);
			format!("{stem}_{:03}{ext}", self.next_scene_index)
		};
		self.next_scene_index += 1;
		name
	}

	/// Flushes every accumulated scene to an SVG file under `output_dir`.
	fn flush(&mut self) -> Result<Vec<PathBuf>, Error> {
		let mut written = Vec::new();
		for (name, scene) in &self.scenes {
			let path = self.options.output_dir.join(name);
			let svg = crate::svg::render(scene);
			fs::write(&path, svg).map_err(|source| Error::Io { path: path.clone(), source })?;
			written.push(path);
		}
		Ok(written)
	}
}

fn split_extension(name: &str) -> (&str, &str) {
	match name.rfind('.') {
		Some(idx) => (&name[..idx], &name[idx..]),
		None => (name, ""),
	}
}

fn autoscale_axis(values: &[f64]) -> (f64, f64) {
	if values.is_empty() {
		return ticks::widen_empty_range(0.0);
	}
	let mut lo = f64::INFINITY;
	let mut hi = f64::NEG_INFINITY;
	for &v in values {
		lo = lo.min(v);
		hi = hi.max(v);
	}
	if lo == hi { ticks::widen_empty_range(lo) } else { (lo, hi) }
}

/// Extends an autoscaled `(lo, hi)` outward to tick-step multiples (spec.md
/// §4.8 "Range extension"), returning the chosen step for the viewport hint.
fn extend_axis(lo: f64, hi: f64) -> (f64, f64, Option<f64>) {
	let (lo, hi) = if lo == hi { ticks::widen_empty_range(lo) } else { (lo, hi) };
	let step = ticks::quantize_step(lo, hi, ticks::DEFAULT_GUIDE);
	let (ext_lo, ext_hi) = ticks::extend_range_to_step(lo, hi, step);
	(ext_lo, ext_hi, Some(step))
}

fn axis_bounds_3d(
	points: &[Point3D],
	component: impl Fn(&Point3D) -> f64,
	explicit_range: &Option<Range>,
	context: &mut EvaluationContext,
) -> (f64, f64) {
	if let Some(Range { min, max }) = explicit_range {
		if !matches!(min, Bound::Auto) && !matches!(max, Bound::Auto) {
			let lo = resolve_bound_standalone(min, context, -1.0);
			let hi = resolve_bound_standalone(max, context, 1.0);
			return (lo, hi);
		}
	}
	if points.is_empty() {
		return (-1.0, 1.0);
	}
	let mut lo = f64::INFINITY;
	let mut hi = f64::NEG_INFINITY;
	for p in points {
		let v = component(p);
		lo = lo.min(v);
		hi = hi.max(v);
	}
	if lo == hi { ticks::widen_empty_range(lo) } else { (lo, hi) }
}

fn resolve_bound_standalone(bound: &Bound, context: &mut EvaluationContext, fallback: f64) -> f64 {
	match bound {
		Bound::Auto => fallback,
		Bound::Expr(node) => Evaluator::new(context).evaluate_real(node).unwrap_or(fallback),
	}
}

/// Samples a 2-argument `f(x, y)`-style expression over a `samples x
/// samples` grid spanning `[-1, 1]^2`, used when an `splot` function spec has
/// no backing data (spec.md is silent on function-driven `splot`; absent an
/// explicit range this is the only sensible default grid).
fn sample_surface(node: &Node, context: &mut EvaluationContext, samples: usize) -> Vec<Point3D> {
	let n = samples.max(2);
	let mut points = Vec::with_capacity(n * n);
	for i in 0..n {
		let x = -1.0 + i as f64 * 2.0 / (n - 1) as f64;
		for j in 0..n {
			let y = -1.0 + j as f64 * 2.0 / (n - 1) as f64;
			context.set_variable("x", x);
			context.set_variable("y", y);
			let z = Evaluator::new(context).evaluate_real(node).unwrap_or(f64::NAN);
			points.push(Point3D { x, y, z });
		}
	}
	points
}

#[cfg(test)]
mod tests {
	use super::*;

	fn new_executor() -> Executor {
		Executor::new(ExecutorOptions::new("script"))
	}

	#[test]
	fn plot_function_produces_one_scene_with_expected_samples() {
		let mut executor = new_executor();
		executor.execute_command(&SpannedCommand {
			command: Command::Plot {
				range_x: Some(Range {
					min: Bound::Expr(crate::parser::parse("0").unwrap()),
					max: Bound::Expr(crate::parser::parse("10").unwrap()),
				}),
				range_y: None,
				specs: vec![PlotSpec {
					source: PlotSource::Expression("x".to_string()),
					range: None,
					title: None,
					style: None,
					location: crate::location::SourceLocation::start(),
				}],
			},
			location: crate::location::SourceLocation::start(),
		})
		.unwrap();
		assert_eq!(executor.scenes.len(), 1);
		let (_, scene) = &executor.scenes[0];
		let line_plot_count =
			scene.elements.iter().filter(|e| matches!(e, SceneElement::LinePlot(_))).count();
		assert_eq!(line_plot_count, 1);
	}

	#[test]
	fn key_composition_is_independent_per_anchor() {
		let mut executor = new_executor();
		executor.apply_set(SetOption::Key(vec![KeyToken::Vertical(VerticalAnchor::BMargin), KeyToken::Horizontal(HorizontalAnchor::Center)]));
		executor.apply_set(SetOption::Key(vec![KeyToken::Horizontal(HorizontalAnchor::Left)]));
		assert_eq!(crate::scene::legend_position_slug(executor.key.vertical, executor.key.horizontal), "bmargin_left");
	}

	#[test]
	fn reset_clears_title_and_variables_but_not_scenes() {
		let mut executor = new_executor();
		executor.context.set_variable("n", 5.0);
		executor.apply_set(SetOption::Title("hello".to_string()));
		executor.apply_set(SetOption::Grid);
		executor.scenes.push((
			"existing.svg".to_string(),
			Scene {
				width: 1.0,
				height: 1.0,
				title: None,
				viewport: Viewport::new_2d(0.0, 1.0, 0.0, 1.0),
				elements: Vec::new(),
				show_border: true,
				hints: BTreeMap::new(),
			},
		));
		executor.apply_reset();
		assert!(executor.title.is_none());
		assert!(!executor.grid);
		assert_eq!(executor.context.get_variable("n"), None);
		assert_eq!(executor.scenes.len(), 1);
	}

	#[test]
	fn default_output_naming_increments_suffix() {
		let mut executor = new_executor();
		assert_eq!(executor.next_output_name(), "script.svg");
		assert_eq!(executor.next_output_name(), "script_002.svg");
		assert_eq!(executor.next_output_name(), "script_003.svg");
	}

	#[test]
	fn explicit_output_name_is_used_once_then_suffixed() {
		let mut executor = new_executor();
		executor.output = Some("chart.svg".to_string());
		assert_eq!(executor.next_output_name(), "chart.svg");
		assert_eq!(executor.next_output_name(), "chart_002.svg");
	}

	#[test]
	fn style_fallback_prefers_explicit_over_style_data_over_lines() {
		let mut executor = new_executor();
		executor.style_data = PlotStyle::Points;
		let explicit = PlotSpec {
			source: PlotSource::DataFile("d.dat".to_string()),
			range: None,
			title: None,
			style: Some(PlotSpecStyle::TwoD(PlotStyle::Impulses)),
			location: crate::location::SourceLocation::start(),
		};
		assert_eq!(executor.resolve_2d_style(&explicit), PlotStyle::Impulses);

		let from_style_data = PlotSpec { style: None, ..explicit.clone() };
		assert_eq!(executor.resolve_2d_style(&from_style_data), PlotStyle::Points);

		let function_default = PlotSpec {
			source: PlotSource::Expression("x".to_string()),
			style: None,
			..explicit
		};
		assert_eq!(executor.resolve_2d_style(&function_default), PlotStyle::Lines);
	}
}
