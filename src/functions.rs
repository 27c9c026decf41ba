//! Built-in mathematical function library (C4).
//!
//! Binds the ~40 functions spec.md §4.4 requires into a fresh
//! [`crate::context::EvaluationContext`]. Trig and a handful of other
//! functions that have a natural complex extension are registered in both
//! the real and the complex-aware registries; per spec.md's dispatch order
//! (§4.3) the complex-aware entry wins, which is transparent for real-valued
//! calls (complex arithmetic with `im == 0` reduces to the real result) and
//! gives functions like `asin(2)` a defined complex answer instead of NaN,
//! resolving spec.md §9's "Open Question" about complex trig overloads.

use statrs::distribution::{ContinuousCDF, Normal};
use statrs::function::{beta as sbeta, erf as serf, gamma as sgamma};

use crate::context::EvaluationContext;
use crate::value::Value;

/// Installs every built-in constant and function into `context`.
pub fn install(context: &mut EvaluationContext) {
	context.set_variable("pi", std::f64::consts::PI);
	context.set_variable("e", std::f64::consts::E);

	install_complex_aware(context);
	install_real_only(context);
}

fn install_complex_aware(context: &mut EvaluationContext) {
	context.register_complex_function("sqrt", 1, |args| Ok(complex_sqrt(args[0])));
	context.register_complex_function("exp", 1, |args| Ok(complex_exp(args[0])));
	context.register_complex_function("log", 1, |args| Ok(complex_log(args[0])));
	context.register_complex_function("pow", 2, |args| Ok(args[0].powc(args[1])));
	context.register_complex_function("sin", 1, |args| Ok(complex_sin(args[0])));
	context.register_complex_function("cos", 1, |args| Ok(complex_cos(args[0])));
	context.register_complex_function("tan", 1, |args| {
		let s = complex_sin(args[0]);
		let c = complex_cos(args[0]);
		Ok(s.div(c))
	});
	context.register_complex_function("asin", 1, |args| Ok(complex_asin(args[0])));
	context.register_complex_function("acos", 1, |args| Ok(complex_acos(args[0])));
	context.register_complex_function("atan", 1, |args| Ok(complex_atan(args[0])));
}

fn install_real_only(context: &mut EvaluationContext) {
	context.register_function("abs", 1, |a| Ok(a[0].abs()));
	context.register_function("ceil", 1, |a| Ok(a[0].ceil()));
	context.register_function("floor", 1, |a| Ok(a[0].floor()));
	context.register_function("round", 1, |a| Ok(a[0].round()));
	context.register_function("int", 1, |a| Ok(a[0].trunc()));
	context.register_function("sgn", 1, |a| Ok(a[0].signum() * if a[0] == 0.0 { 0.0 } else { 1.0 }));
	context.register_function("min", 2, |a| Ok(a[0].min(a[1])));
	context.register_function("max", 2, |a| Ok(a[0].max(a[1])));

	context.register_function("sinh", 1, |a| Ok(a[0].sinh()));
	context.register_function("cosh", 1, |a| Ok(a[0].cosh()));
	context.register_function("tanh", 1, |a| Ok(a[0].tanh()));

	context.register_function("log10", 1, |a| Ok(a[0].log10()));
	context.register_function("cbrt", 1, |a| Ok(a[0].cbrt()));
	context.register_function("atan2", 2, |a| Ok(a[0].atan2(a[1])));

	context.register_function("gamma", 1, |a| Ok(sgamma::gamma(a[0])));
	context.register_function("lgamma", 1, |a| Ok(sgamma::ln_gamma(a[0])));
	context.register_function("beta", 2, |a| Ok(sbeta::beta(a[0], a[1])));
	context.register_function("ibeta", 3, |a| Ok(sbeta::beta_reg(a[0], a[1], a[2])));
	context.register_function("igamma", 2, |a| Ok(sgamma::gamma_li(a[0], a[1])));

	context.register_function("besj0", 1, |a| Ok(bessel_j0(a[0])));
	context.register_function("besj1", 1, |a| Ok(bessel_j1(a[0])));
	context.register_function("besjn", 2, |a| Ok(bessel_jn(a[0].round() as i32, a[1])));

	context.register_function("erf", 1, |a| Ok(serf::erf(a[0])));
	context.register_function("erfc", 1, |a| Ok(serf::erfc(a[0])));
	context.register_function("inverf", 1, |a| Ok(serf::erf_inv(a[0])));
	context.register_function("inverfc", 1, |a| Ok(serf::erfc_inv(a[0])));

	context.register_function("norm", 1, |a| Ok(standard_normal().cdf(a[0])));
	context.register_function("invnorm", 1, |a| Ok(standard_normal().inverse_cdf(a[0])));
}

fn standard_normal() -> Normal {
	Normal::new(0.0, 1.0).expect("standard normal parameters are always valid")
}

fn complex_exp(z: Value) -> Value {
	let r = z.re.exp();
	Value::complex(r * z.im.cos(), r * z.im.sin())
}

fn complex_log(z: Value) -> Value {
	Value::complex(z.abs().ln(), z.arg())
}

fn complex_sqrt(z: Value) -> Value {
	let r = z.abs().sqrt();
	let half_theta = z.arg() / 2.0;
	Value::complex(r * half_theta.cos(), r * half_theta.sin())
}

fn complex_sin(z: Value) -> Value {
	Value::complex(z.re.sin() * z.im.cosh(), z.re.cos() * z.im.sinh())
}

fn complex_cos(z: Value) -> Value {
	Value::complex(z.re.cos() * z.im.cosh(), -z.re.sin() * z.im.sinh())
}

fn complex_asin(z: Value) -> Value {
	// asin(z) = -i * ln(iz + sqrt(1 - z^2))
	let iz = Value::complex(-z.im, z.re);
	let one_minus_z2 = Value::ONE.sub(z.mul(z));
	let root = complex_sqrt(one_minus_z2);
	let ln_term = complex_log(iz.add(root));
	Value::complex(ln_term.im, -ln_term.re)
}

fn complex_acos(z: Value) -> Value {
	// acos(z) = -i * ln(z + i*sqrt(1 - z^2))
	let one_minus_z2 = Value::ONE.sub(z.mul(z));
	let root = complex_sqrt(one_minus_z2);
	let i_root = Value::complex(-root.im, root.re);
	let ln_term = complex_log(z.add(i_root));
	Value::complex(ln_term.im, -ln_term.re)
}

fn complex_atan(z: Value) -> Value {
	// atan(z) = (i/2) * ln((1 - iz) / (1 + iz))
	let iz = Value::complex(-z.im, z.re);
	let numerator = Value::ONE.sub(iz);
	let denominator = Value::ONE.add(iz);
	let ln_term = complex_log(numerator.div(denominator));
	Value::complex(-ln_term.im / 2.0, ln_term.re / 2.0)
}

/// Bessel function of the first kind, order 0. Rational-approximation form
/// (the same shape as the classic Numerical Recipes `bessj0`), split into a
/// polynomial branch for `|x| < 8` and an asymptotic branch beyond.
fn bessel_j0(x: f64) -> f64 {
	let ax = x.abs();
	if ax < 8.0 {
		let y = x * x;
		let p1 = 57568490574.0
			+ y * (-13362590354.0
				+ y * (651619640.7 + y * (-11214424.18 + y * (77392.330_17 + y * (-184.905_245_6)))));
		let p2 = 57568490411.0
			+ y * (1029532985.0 + y * (9494680.718 + y * (59272.649_55 + y * (267.853_701_53 + y))));
		p1 / p2
	} else {
		let z = 8.0 / ax;
		let y = z * z;
		let xx = ax - 0.785_398_163_4;
		let p0 = 1.0 + y * (-0.109_862_713_7e-2 + y * (0.245_751_791_4e-4 + y * (-0.240_724_685_7e-5)));
		let q0 = -0.061_698_363_9e-1
			+ y * (0.187_191_929_7e-2 + y * (-0.651_474_592_5e-4 + y * 0.740_578_296_2e-5));
		let amp = (0.636_619_772_4 / ax).sqrt();
		amp * (xx.cos() * p0 - z * xx.sin() * q0)
	}
}

/// Bessel function of the first kind, order 1.
fn bessel_j1(x: f64) -> f64 {
	let ax = x.abs();
	let result = if ax < 8.0 {
		let y = x * x;
		let p1 = x
			* (72362614232.0
				+ y * (-7895059235.0
					+ y * (242396853.1 + y * (-2972611.439 + y * (15704.482_60 + y * (-30.160_366_06))))));
		let p2 = 144725228442.0
			+ y * (2300535178.0
				+ y * (18583304.74 + y * (99447.433_94 + y * (376.999_193_3 + y))));
		p1 / p2
	} else {
		let z = 8.0 / ax;
		let y = z * z;
		let xx = ax - 2.356_194_490_2;
		let p0 = 1.0 + y * (0.183_105e-2 + y * (-0.351_639_649_3e-4 + y * 0.245_752_170_2e-5));
		let q0 = 0.041_666_397_5
			+ y * (-0.139_358_502_1e-2 + y * (0.314_311_367_3e-4 + y * (-0.242_408_134_8e-5)));
		let amp = (0.636_619_772_4 / ax).sqrt();
		let value = amp * (xx.cos() * p0 - z * xx.sin() * q0);
		if x < 0.0 { -value } else { value }
	};
	result
}

/// Bessel function of the first kind, arbitrary integer order, using the
/// forward-recurrence relation from `j0`/`j1`. Negative orders are handled
/// by parity: `J(-n, x) = (-1)^n * J(n, x)` (spec.md §4.4).
fn bessel_jn(n: i32, x: f64) -> f64 {
	if n == 0 {
		return bessel_j0(x);
	}
	if n == 1 {
		return bessel_j1(x);
	}
	if n < 0 {
		let sign = if n % 2 == 0 { 1.0 } else { -1.0 };
		return sign * bessel_jn(-n, x);
	}
	if x == 0.0 {
		return 0.0;
	}
	let mut j_prev = bessel_j0(x);
	let mut j_curr = bessel_j1(x);
	for k in 1..n {
		let j_next = (2.0 * k as f64 / x) * j_curr - j_prev;
		j_prev = j_curr;
		j_curr = j_next;
	}
	j_curr
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::context::EvaluationContext;

	fn approx_eq(a: f64, b: f64, eps: f64) -> bool {
		(a - b).abs() <= eps
	}

	#[test]
	fn bessel_j0_at_zero_is_one() {
		assert!(approx_eq(bessel_j0(0.0), 1.0, 1e-12));
	}

	#[test]
	fn bessel_jn_matches_j0_j1_for_small_orders() {
		assert!(approx_eq(bessel_jn(0, 1.5), bessel_j0(1.5), 1e-12));
		assert!(approx_eq(bessel_jn(1, 1.5), bessel_j1(1.5), 1e-12));
	}

	#[test]
	fn bessel_negative_order_parity() {
		let j2 = bessel_jn(2, 3.0);
		let j_neg2 = bessel_jn(-2, 3.0);
		assert!(approx_eq(j2, j_neg2, 1e-9));
		let j3 = bessel_jn(3, 3.0);
		let j_neg3 = bessel_jn(-3, 3.0);
		assert!(approx_eq(j3, -j_neg3, 1e-9));
	}

	#[test]
	fn complex_sqrt_of_negative_real_is_purely_imaginary() {
		let v = complex_sqrt(Value::real(-4.0));
		assert!(approx_eq(v.re, 0.0, 1e-9));
		assert!(approx_eq(v.im, 2.0, 1e-9));
	}

	#[test]
	fn installed_context_resolves_pi_and_e() {
		let mut ctx = EvaluationContext::new();
		install(&mut ctx);
		assert!(approx_eq(ctx.get_variable("pi").unwrap(), std::f64::consts::PI, 1e-15));
		assert!(approx_eq(ctx.get_variable("e").unwrap(), std::f64::consts::E, 1e-15));
	}
}
