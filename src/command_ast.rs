//! Command data model (C5): the tagged variants a parsed script lowers to.

use crate::ast::Node;
use crate::location::SourceLocation;

/// A range bound is either `*` (autoscale that side) or an expression,
/// evaluated against the executor's context at scene-assembly time so that
/// bounds like `[0:2*pi]` or `[0:n]` (referencing a script variable) work.
#[derive(Debug, Clone, PartialEq)]
pub enum Bound {
	Auto,
	Expr(Node),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Range {
	pub min: Bound,
	pub max: Bound,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlotStyle {
	Lines,
	Points,
	LinesPoints,
	Impulses,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlotStyle3D {
	Points,
	Lines,
	Surface,
	Dots,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PlotSource {
	Expression(String),
	DataFile(String),
}

/// A single `with <style>` argument, either the 2D or the 3D style vocabulary
/// depending on whether the owning command is `plot` or `splot`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlotSpecStyle {
	TwoD(PlotStyle),
	ThreeD(PlotStyle3D),
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlotSpec {
	pub source: PlotSource,
	pub range: Option<Range>,
	pub title: Option<String>,
	pub style: Option<PlotSpecStyle>,
	pub location: SourceLocation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerticalAnchor {
	Top,
	Bottom,
	Center,
	TMargin,
	BMargin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HorizontalAnchor {
	Left,
	Right,
	Center,
}

/// One token from a `set key ...` command. Tokens update independent fields
/// of the executor's key state (spec.md §4.6 invariant): a command carrying
/// several tokens applies each of them, leaving unmentioned fields alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyToken {
	Vertical(VerticalAnchor),
	Horizontal(HorizontalAnchor),
	Border(bool),
	LayoutHorizontal(bool),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dgrid3dMode {
	QNorm,
	Gauss,
	Cauchy,
	Exp,
	Box,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dgrid3dOption {
	pub rows: usize,
	pub cols: usize,
	pub mode: Dgrid3dMode,
	pub norm: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SetOption {
	Title(String),
	XLabel(String),
	YLabel(String),
	Samples(usize),
	Grid,
	Border,
	Output(String),
	Key(Vec<KeyToken>),
	StyleData(PlotStyle),
	Dgrid3d(Dgrid3dOption),
	/// An option name `set` does not recognise. Carried through rather than
	/// rejected at parse time: spec.md §4.5 says unknown options are silently
	/// ignored "by design", and §7 classifies this as a non-fatal execution
	/// warning, not a parse error — the executor logs and ignores it.
	Unknown(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnsetOption {
	Grid,
	Border,
	Title,
	XLabel,
	YLabel,
	Dgrid3d,
	Key,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
	Set(SetOption),
	Unset(UnsetOption),
	Plot { range_x: Option<Range>, range_y: Option<Range>, specs: Vec<PlotSpec> },
	Splot { range_x: Option<Range>, range_y: Option<Range>, range_z: Option<Range>, specs: Vec<PlotSpec> },
	Pause { seconds: f64, message: Option<String> },
	Reset,
	Assign { name: String, expr_text: String },
	DefineFn { name: String, params: Vec<String>, body_text: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpannedCommand {
	pub command: Command,
	pub location: SourceLocation,
}
