//! Tick generator and axis quantisation (C8).
//!
//! `quantize_normal_tics` is specified exactly (spec.md §4.8); this module is
//! a direct transcription plus the range-extension and empty-range-widening
//! rules the executor needs when assembling an autoscaled axis.

use crate::format::format_number;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickKind {
	Major,
	Minor,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Tick {
	pub position: f64,
	pub label: String,
	pub kind: TickKind,
}

/// Target number of major ticks an axis aims for, absent other guidance.
pub const DEFAULT_GUIDE: usize = 20;

/// Chooses a "nice" step size for `[min, max]` given a target tick count
/// `guide`, following the table in spec.md §4.8 verbatim.
pub fn quantize_step(min: f64, max: f64, guide: usize) -> f64 {
	let range = (max - min).abs();
	let p = 10f64.powf(range.log10().floor());
	let x = range / p;
	let posns = guide as f64 / x;
	let multiplier = if posns >= 40.0 {
		0.05
	} else if posns >= 20.0 {
		0.1
	} else if posns >= 10.0 {
		0.2
	} else if posns >= 4.0 {
		0.5
	} else if posns >= 2.0 {
		1.0
	} else if posns >= 0.5 {
		2.0
	} else {
		x.ceil()
	};
	multiplier * p
}

/// How many fractional digits a label needs for a given `step`: integer
/// formatting once `step >= 1`, else `ceil(-log10(step))` decimal places.
fn decimals_for_step(step: f64) -> usize {
	if step >= 1.0 {
		0
	} else {
		(-step.log10()).ceil().max(0.0) as usize
	}
}

/// Generates major ticks across `[min, max]` with the given `step`, clamped
/// to the range to absorb floating-point drift from repeated addition.
pub fn generate_ticks(min: f64, max: f64, step: f64) -> Vec<Tick> {
	let decimals = decimals_for_step(step);
	let epsilon = step * 1e-9;
	let mut ticks = Vec::new();
	let mut position = (min / step).floor() * step;
	while position <= max + epsilon {
		let clamped = position.clamp(min, max);
		ticks.push(Tick { position: clamped, label: format_number(clamped, decimals), kind: TickKind::Major });
		position += step;
	}
	ticks
}

/// Full pipeline for a linear axis: chooses the step, then generates ticks.
pub fn quantize_normal_tics(min: f64, max: f64, guide: usize) -> (f64, Vec<Tick>) {
	let step = quantize_step(min, max, guide);
	(step, generate_ticks(min, max, step))
}

/// Rounds an autoscaled `(min, max)` outward to the nearest multiple of
/// `step`, reproducing the reference's `round_outward` (spec.md §4.8). An
/// explicit user-supplied range must *not* go through this.
pub fn extend_range_to_step(min: f64, max: f64, step: f64) -> (f64, f64) {
	let extended_min = (min / step).floor() * step;
	let extended_max = (max / step).ceil() * step;
	(extended_min, extended_max)
}

/// Widens a degenerate `(value, value)` range by 1% of the value, or by 1.0
/// when the value itself is zero (spec.md §4.8).
pub fn widen_empty_range(value: f64) -> (f64, f64) {
	let delta = if value == 0.0 { 1.0 } else { value.abs() * 0.01 };
	(value - delta, value + delta)
}

/// Major ticks at integer powers of `base`, with minor ticks at the integer
/// multiples `2..base` within each decade (spec.md §4.8 "Log-scale ticks").
pub fn generate_log_ticks(min: f64, max: f64, base: f64) -> Vec<Tick> {
	if min <= 0.0 || max <= 0.0 || min >= max {
		return Vec::new();
	}
	let mut ticks = Vec::new();
	let start_power = min.log(base).floor() as i32;
	let end_power = max.log(base).ceil() as i32;
	for power in start_power..=end_power {
		let major = base.powi(power);
		if major >= min && major <= max {
			ticks.push(Tick { position: major, label: format_number(major, 0), kind: TickKind::Major });
		}
		for multiple in 2..(base as i32) {
			let minor = major * multiple as f64;
			if minor >= min && minor <= max {
				ticks.push(Tick { position: minor, label: String::new(), kind: TickKind::Minor });
			}
		}
	}
	ticks.sort_by(|a, b| a.position.partial_cmp(&b.position).unwrap());
	ticks
}

#[cfg(test)]
mod tests {
	use super::*;

	fn approx_eq(a: f64, b: f64, eps: f64) -> bool {
		(a - b).abs() <= eps
	}

	#[test]
	fn range_zero_to_ten_steps_by_one() {
		let (step, ticks) = quantize_normal_tics(0.0, 10.0, 20);
		assert!(approx_eq(step, 1.0, 1e-12));
		let positions: Vec<f64> = ticks.iter().map(|t| t.position).collect();
		assert_eq!(positions, vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0]);
	}

	#[test]
	fn range_zero_to_one_steps_by_tenth() {
		let (step, ticks) = quantize_normal_tics(0.0, 1.0, 20);
		assert!(approx_eq(step, 0.1, 1e-12));
		assert_eq!(ticks.len(), 11);
		assert_eq!(ticks[0].label, "0.0");
		assert_eq!(ticks.last().unwrap().label, "1.0");
	}

	#[test]
	fn consecutive_ticks_differ_by_step() {
		// A range whose bounds already land on step multiples, so clamping at
		// the ends does not distort the interior spacing being checked.
		let (step, ticks) = quantize_normal_tics(-10.0, 50.0, 20);
		for pair in ticks.windows(2) {
			let diff = pair[1].position - pair[0].position;
			assert!(approx_eq(diff, step, step * 1e-6));
		}
	}

	#[test]
	fn ticks_lie_within_clamped_range() {
		let (_, ticks) = quantize_normal_tics(0.3, 9.8, 20);
		for tick in &ticks {
			assert!(tick.position >= 0.3 - 1e-9 && tick.position <= 9.8 + 1e-9);
		}
	}

	#[test]
	fn extend_range_rounds_outward() {
		let (lo, hi) = extend_range_to_step(0.3, 9.8, 1.0);
		assert_eq!(lo, 0.0);
		assert_eq!(hi, 10.0);
	}

	#[test]
	fn empty_range_widens_by_one_percent() {
		let (lo, hi) = widen_empty_range(50.0);
		assert!(approx_eq(lo, 49.5, 1e-9));
		assert!(approx_eq(hi, 50.5, 1e-9));
	}

	#[test]
	fn empty_range_at_zero_widens_by_one() {
		let (lo, hi) = widen_empty_range(0.0);
		assert_eq!(lo, -1.0);
		assert_eq!(hi, 1.0);
	}

	#[test]
	fn log_ticks_land_on_powers_of_ten() {
		let ticks = generate_log_ticks(1.0, 1000.0, 10.0);
		let majors: Vec<f64> = ticks
			.iter()
			.filter(|t| t.kind == TickKind::Major)
			.map(|t| t.position)
			.collect();
		assert_eq!(majors, vec![1.0, 10.0, 100.0, 1000.0]);
	}
}
