//! Framing the settled graph: bounds-to-transform and the animated zoom.

use super::state::ViewTransform;

/// Fraction of the viewport the fitted graph may fill.
const FIT_MARGIN: f64 = 0.9;
const MIN_FIT_ZOOM: f64 = 0.1;
const MAX_FIT_ZOOM: f64 = 2.0;

/// Length of the zoom-to-fit animation, in seconds.
pub const FIT_DURATION: f64 = 0.8;

/// Axis-aligned box in graph coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
	pub min_x: f64,
	pub min_y: f64,
	pub max_x: f64,
	pub max_y: f64,
}

impl Bounds {
	/// Box around circles `(x, y, r)`; `None` when there are none.
	pub fn around(circles: impl IntoIterator<Item = (f64, f64, f64)>) -> Option<Self> {
		circles.into_iter().fold(None, |acc, (x, y, r)| {
			let b = Bounds {
				min_x: x - r,
				min_y: y - r,
				max_x: x + r,
				max_y: y + r,
			};
			Some(match acc {
				None => b,
				Some(a) => Bounds {
					min_x: a.min_x.min(b.min_x),
					min_y: a.min_y.min(b.min_y),
					max_x: a.max_x.max(b.max_x),
					max_y: a.max_y.max(b.max_y),
				},
			})
		})
	}

	/// Transform that centres this box in a `width × height` viewport.
	pub fn fit(&self, width: f64, height: f64) -> ViewTransform {
		let (bw, bh) = ((self.max_x - self.min_x).max(1.0), (self.max_y - self.min_y).max(1.0));
		let k = (FIT_MARGIN * (width / bw).min(height / bh)).clamp(MIN_FIT_ZOOM, MAX_FIT_ZOOM);
		let (cx, cy) = ((self.min_x + self.max_x) / 2.0, (self.min_y + self.max_y) / 2.0);
		ViewTransform {
			x: width / 2.0 - cx * k,
			y: height / 2.0 - cy * k,
			k,
		}
	}
}

pub fn ease_in_out(t: f64) -> f64 {
	let t = t.clamp(0.0, 1.0);
	if t < 0.5 {
		2.0 * t * t
	} else {
		1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
	}
}

/// Eased interpolation between two view transforms.
#[derive(Clone, Debug)]
pub struct FitAnimation {
	from: ViewTransform,
	to: ViewTransform,
	elapsed: f64,
	duration: f64,
}

impl FitAnimation {
	pub fn new(from: ViewTransform, to: ViewTransform, duration: f64) -> Self {
		Self {
			from,
			to,
			elapsed: 0.0,
			duration: duration.max(f64::EPSILON),
		}
	}

	/// Advances by `dt` seconds; returns the transform to show and whether
	/// the animation has finished.
	pub fn advance(&mut self, dt: f64) -> (ViewTransform, bool) {
		self.elapsed = (self.elapsed + dt).min(self.duration);
		let t = ease_in_out(self.elapsed / self.duration);
		let lerp = |a: f64, b: f64| a + (b - a) * t;
		let current = ViewTransform {
			x: lerp(self.from.x, self.to.x),
			y: lerp(self.from.y, self.to.y),
			k: lerp(self.from.k, self.to.k),
		};
		(current, self.elapsed >= self.duration)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn easing_is_symmetric_and_bounded() {
		assert_eq!(ease_in_out(0.0), 0.0);
		assert_eq!(ease_in_out(0.5), 0.5);
		assert_eq!(ease_in_out(1.0), 1.0);
		assert!((ease_in_out(0.25) + ease_in_out(0.75) - 1.0).abs() < 1e-9);
		assert!(ease_in_out(0.1) < 0.1);
		assert_eq!(ease_in_out(3.0), 1.0);
	}

	#[test]
	fn fitted_bounds_land_inside_viewport() {
		let circles = [(-300.0, 10.0, 5.0), (500.0, -40.0, 5.0), (20.0, 250.0, 12.0)];
		let bounds = Bounds::around(circles).unwrap();
		let t = bounds.fit(800.0, 600.0);
		for (x, y) in [(bounds.min_x, bounds.min_y), (bounds.max_x, bounds.max_y)] {
			let (sx, sy) = (x * t.k + t.x, y * t.k + t.y);
			assert!((0.0..=800.0).contains(&sx), "x {sx}");
			assert!((0.0..=600.0).contains(&sy), "y {sy}");
		}
	}

	#[test]
	fn single_point_zooms_to_cap_and_centres() {
		let t = Bounds::around([(100.0, 100.0, 0.0)]).unwrap().fit(400.0, 300.0);
		assert_eq!(t.k, MAX_FIT_ZOOM);
		assert_eq!((100.0 * t.k + t.x, 100.0 * t.k + t.y), (200.0, 150.0));
	}

	#[test]
	fn no_circles_no_bounds() {
		assert_eq!(Bounds::around(std::iter::empty()), None);
	}

	#[test]
	fn animation_reaches_target() {
		let from = ViewTransform { x: 0.0, y: 0.0, k: 1.0 };
		let to = ViewTransform { x: 100.0, y: -50.0, k: 2.0 };
		let mut anim = FitAnimation::new(from, to.clone(), 1.0);

		let (mid, done) = anim.advance(0.5);
		assert!(!done);
		assert_eq!(mid.x, 50.0);
		assert_eq!(mid.k, 1.5);

		let (end, done) = anim.advance(0.6);
		assert!(done);
		assert_eq!(end, to);
	}
}
