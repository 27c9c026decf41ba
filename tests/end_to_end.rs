//! End-to-end tests driving the public `Executor` API from a raw script
//! string through to the SVG files written on disk.

use std::fs;

use gnuplot_core::executor::{Executor, ExecutorOptions};

fn run(script: &str, script_name: &str) -> (Vec<std::path::PathBuf>, tempfile::TempDir) {
	let dir = tempfile::tempdir().expect("a temp dir. qed");
	let mut options = ExecutorOptions::new(script_name);
	options.output_dir = dir.path().to_path_buf();
	let mut executor = Executor::new(options);
	let written = executor.execute(script).expect("script executes");
	(written, dir)
}

#[test]
fn plot_sin_produces_one_svg_with_title_axes_and_one_polyline() {
	let script = "set title \"T\"\nset samples 50\nplot sin(x)\n";
	let (written, _dir) = run(script, "sine");

	assert_eq!(written.len(), 1);
	let svg = fs::read_to_string(&written[0]).expect("SVG file readable");

	assert!(svg.contains("<svg"));
	assert!(svg.contains(">T<"), "escaped title should appear as text content: {svg}");
	assert_eq!(svg.matches("<polyline").count(), 1);
	assert!(svg.contains(r#"clip-path="url(#plotClip)""#));

	// both axis baselines present: one vertical (x constant), one horizontal (y constant)
	let line_count = svg.matches("<line").count();
	assert!(line_count >= 2, "expected at least the two axis baselines: {svg}");
}

#[test]
fn three_plots_without_set_output_get_incrementing_suffixes() {
	let script = "plot sin(x)\nplot cos(x)\nplot tan(x)\n";
	let (written, _dir) = run(script, "threeplots");

	assert_eq!(written.len(), 3);
	let names: Vec<_> = written.iter().map(|p| p.file_name().unwrap().to_str().unwrap().to_string()).collect();
	assert_eq!(names, vec!["threeplots.svg", "threeplots_002.svg", "threeplots_003.svg"]);
	for path in &written {
		assert!(path.exists());
	}
}

#[test]
fn set_output_overrides_the_default_basename() {
	let script = "set output \"custom.svg\"\nplot sin(x)\nplot cos(x)\n";
	let (written, _dir) = run(script, "ignored");

	let names: Vec<_> = written.iter().map(|p| p.file_name().unwrap().to_str().unwrap().to_string()).collect();
	assert_eq!(names, vec!["custom.svg", "custom_002.svg"]);
}

#[test]
fn reset_clears_labels_but_keeps_accumulated_scenes() {
	let script = "set title \"first\"\nplot sin(x)\nreset\nplot cos(x)\n";
	let (written, _dir) = run(script, "resetrun");

	assert_eq!(written.len(), 2);
	let first = fs::read_to_string(&written[0]).unwrap();
	let second = fs::read_to_string(&written[1]).unwrap();
	assert!(first.contains(">first<"));
	// reset drops the title for subsequent scenes, not the ones already recorded
	assert!(!second.contains(">first<"));
}

#[test]
fn assignment_and_user_function_feed_into_the_plotted_expression() {
	let script = "a = 2\nf(x) = a * x\nplot f(x)\n";
	let (written, _dir) = run(script, "userfunc");

	assert_eq!(written.len(), 1);
	let svg = fs::read_to_string(&written[0]).unwrap();
	assert_eq!(svg.matches("<polyline").count(), 1);
}

#[test]
fn reading_a_two_column_data_file_plots_a_single_series() {
	let dir = tempfile::tempdir().expect("a temp dir. qed");
	let data_path = dir.path().join("points.dat");
	fs::write(&data_path, "0 0\n1 1\n2 4\n3 9\n").unwrap();

	let script = format!("plot \"{}\"\n", data_path.display());
	let mut options = ExecutorOptions::new("datarun");
	options.output_dir = dir.path().to_path_buf();
	let mut executor = Executor::new(options);
	let written = executor.execute(&script).expect("script executes");

	assert_eq!(written.len(), 1);
	let svg = fs::read_to_string(&written[0]).unwrap();
	assert_eq!(svg.matches("<polyline").count(), 1);
}

#[test]
fn unknown_set_option_is_ignored_not_fatal() {
	// spec.md §4.5: unknown `set` options are silently ignored by design;
	// §7 classifies this as a non-fatal execution warning.
	let (written, _dir) = run("set bogus 1\nplot sin(x)\n", "badopt");
	assert_eq!(written.len(), 1);
}
