//! Gesture capture: raw timestamped touch points in, a normalised and
//! feature-tagged sample sequence out.
//!
//! The session is a two-state machine (idle / capturing) driven by explicit
//! `begin` / `update` / `end` / `cancel` events. Debouncing is purely
//! timing- and distance-based; between events the session holds no thread.

use crate::keyboard::euclidean_dist;
use crate::types::Point;

/// Nominal touch sampling interval (60 Hz).
pub const SAMPLE_INTERVAL: f64 = 1.0 / 60.0;

/// Minimum normalised travel between two recorded samples.
pub const MIN_SAMPLE_DISTANCE: f32 = 0.005;

/// A sample is accepted once at least this fraction of the sampling
/// interval has elapsed.
const DEBOUNCE_FACTOR: f64 = 0.8;

/// The keyboard bounding rectangle in absolute device coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    /// Map an absolute point into [0,1]², clamping to the unit square.
    pub fn normalize(&self, x: f32, y: f32) -> Point {
        let nx = if self.width > 0.0 { (x - self.x) / self.width } else { 0.0 };
        let ny = if self.height > 0.0 { (y - self.y) / self.height } else { 0.0 };
        Point::new(nx.clamp(0.0, 1.0), ny.clamp(0.0, 1.0))
    }
}

/// One captured sample with its derived features. The features are
/// informational for downstream ranking experiments; the baseline decoder
/// reads only `pos`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GesturePoint {
    pub pos: Point,
    /// Timestamp in seconds.
    pub t: f64,
    /// Normalised units per second.
    pub velocity: f32,
    /// Radians in (-pi, pi].
    pub direction: f32,
    /// Radians per unit arc length; 0 at the endpoints.
    pub curvature: f32,
}

/// A completed single-stroke gesture, ordered by non-decreasing timestamp.
#[derive(Debug, Clone, PartialEq)]
pub struct Gesture {
    pub points: Vec<GesturePoint>,
}

impl Gesture {
    /// Build a synthetic gesture from an already-normalised path with a
    /// uniform sampling interval. Used to replay recorded or ideal strokes.
    pub fn from_path(points: &[Point], interval: f64) -> Self {
        let samples: Vec<(Point, f64)> = points
            .iter()
            .enumerate()
            .map(|(i, &p)| (p, i as f64 * interval))
            .collect();
        Self {
            points: compute_features(&samples),
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// The bare position sequence.
    pub fn path(&self) -> Vec<Point> {
        self.points.iter().map(|p| p.pos).collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Idle,
    Capturing,
}

/// A single-stroke capture session. Discarding the session (or calling
/// [`CaptureSession::cancel`]) releases everything; no resources outlive it.
#[derive(Debug)]
pub struct CaptureSession {
    state: State,
    rect: Rect,
    samples: Vec<(Point, f64)>,
    last_t: f64,
}

impl CaptureSession {
    pub fn new(rect: Rect) -> Self {
        Self {
            state: State::Idle,
            rect,
            samples: Vec::new(),
            last_t: 0.0,
        }
    }

    pub fn is_capturing(&self) -> bool {
        self.state == State::Capturing
    }

    /// Start a stroke. Valid from any state; an in-flight buffer is cleared.
    pub fn begin(&mut self, x: f32, y: f32, t: f64) {
        self.samples.clear();
        self.samples.push((self.rect.normalize(x, y), t));
        self.last_t = t;
        self.state = State::Capturing;
    }

    /// Offer a movement sample. Returns whether it was recorded; samples
    /// arriving too soon, too close to the previous one, or out of
    /// timestamp order are dropped.
    pub fn update(&mut self, x: f32, y: f32, t: f64) -> bool {
        if self.state != State::Capturing {
            return false;
        }
        if t < self.last_t {
            return false;
        }
        if t - self.last_t < DEBOUNCE_FACTOR * SAMPLE_INTERVAL {
            return false;
        }
        let pos = self.rect.normalize(x, y);
        let prev = self.samples.last().expect("capturing implies a sample").0;
        if euclidean_dist(&prev, &pos) < MIN_SAMPLE_DISTANCE {
            return false;
        }
        self.samples.push((pos, t));
        self.last_t = t;
        true
    }

    /// Finish the stroke: the final point is appended unconditionally, the
    /// per-point features are computed and ownership of the buffer moves to
    /// the returned gesture.
    pub fn end(&mut self, x: f32, y: f32, t: f64) -> Gesture {
        if self.state != State::Capturing {
            return Gesture { points: Vec::new() };
        }
        self.samples.push((self.rect.normalize(x, y), t.max(self.last_t)));
        self.state = State::Idle;
        let samples = std::mem::take(&mut self.samples);
        Gesture {
            points: compute_features(&samples),
        }
    }

    /// Discard the stroke in flight.
    pub fn cancel(&mut self) {
        self.samples.clear();
        self.state = State::Idle;
    }
}

/// Wrap an angle into (-pi, pi].
fn wrap_angle(a: f32) -> f32 {
    let mut a = a;
    while a > std::f32::consts::PI {
        a -= 2.0 * std::f32::consts::PI;
    }
    while a <= -std::f32::consts::PI {
        a += 2.0 * std::f32::consts::PI;
    }
    a
}

fn compute_features(samples: &[(Point, f64)]) -> Vec<GesturePoint> {
    let n = samples.len();
    let mut out = Vec::with_capacity(n);

    for i in 0..n {
        let prev = if i > 0 { i - 1 } else { i };
        let next = if i + 1 < n { i + 1 } else { i };
        let (p_prev, t_prev) = samples[prev];
        let (p_next, t_next) = samples[next];

        let dx = p_next.x - p_prev.x;
        let dy = p_next.y - p_prev.y;
        let dt = t_next - t_prev;
        let velocity = if dt > 0.0 {
            ((dx * dx + dy * dy).sqrt() as f64 / dt) as f32
        } else {
            0.0
        };
        let direction = wrap_angle(dy.atan2(dx));

        let curvature = if i > 0 && i + 1 < n {
            let (p, _) = samples[i];
            let before = (p.x - p_prev.x, p.y - p_prev.y);
            let after = (p_next.x - p.x, p_next.y - p.y);
            let turn = wrap_angle(after.1.atan2(after.0) - before.1.atan2(before.0));
            let arc = euclidean_dist(&p_prev, &p) + euclidean_dist(&p, &p_next);
            if arc > 1e-6 {
                turn / arc
            } else {
                0.0
            }
        } else {
            0.0
        };

        out.push(GesturePoint {
            pos: samples[i].0,
            t: samples[i].1,
            velocity,
            direction,
            curvature,
        });
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f64 = SAMPLE_INTERVAL;

    fn unit_session() -> CaptureSession {
        CaptureSession::new(Rect::new(0.0, 0.0, 1.0, 1.0))
    }

    #[test]
    fn normalize_clamps_to_unit_square() {
        let rect = Rect::new(100.0, 200.0, 400.0, 200.0);
        let inside = rect.normalize(300.0, 300.0);
        assert!((inside.x - 0.5).abs() < 1e-6 && (inside.y - 0.5).abs() < 1e-6);
        let outside = rect.normalize(0.0, 1000.0);
        assert_eq!((outside.x, outside.y), (0.0, 1.0));
    }

    #[test]
    fn debounce_drops_fast_samples() {
        let mut s = unit_session();
        s.begin(0.0, 0.0, 0.0);
        assert!(!s.update(0.5, 0.5, 0.2 * DT), "too soon");
        assert!(s.update(0.5, 0.5, DT));
    }

    #[test]
    fn near_duplicate_positions_are_dropped() {
        let mut s = unit_session();
        s.begin(0.5, 0.5, 0.0);
        assert!(!s.update(0.501, 0.5, DT), "below travel floor");
        assert!(s.update(0.6, 0.5, 2.0 * DT));
    }

    #[test]
    fn out_of_order_timestamps_are_dropped() {
        let mut s = unit_session();
        s.begin(0.1, 0.1, 1.0);
        assert!(!s.update(0.5, 0.5, 0.5));
        assert!(s.update(0.5, 0.5, 1.0 + DT));
    }

    #[test]
    fn end_appends_final_point_unconditionally() {
        let mut s = unit_session();
        s.begin(0.1, 0.1, 0.0);
        // Ends immediately: final point is closer than the travel floor and
        // earlier than the debounce window, recorded anyway.
        let g = s.end(0.1001, 0.1, 1e-4);
        assert_eq!(g.len(), 2);
        assert!(!s.is_capturing());
    }

    #[test]
    fn begin_restarts_a_session() {
        let mut s = unit_session();
        s.begin(0.1, 0.1, 0.0);
        s.update(0.5, 0.5, DT);
        s.begin(0.9, 0.9, 2.0);
        let g = s.end(0.8, 0.8, 2.0 + DT);
        assert_eq!(g.len(), 2);
        assert!((g.points[0].pos.x - 0.9).abs() < 1e-6);
    }

    #[test]
    fn cancel_discards_everything() {
        let mut s = unit_session();
        s.begin(0.1, 0.1, 0.0);
        s.cancel();
        assert!(!s.is_capturing());
        assert!(s.end(0.2, 0.2, 1.0).is_empty());
        assert!(!s.update(0.3, 0.3, 2.0));
    }

    #[test]
    fn straight_line_features() {
        // Four points moving right at 0.1 units per frame.
        let path: Vec<Point> = (0..4).map(|i| Point::new(0.1 * i as f32, 0.5)).collect();
        let g = Gesture::from_path(&path, DT);
        for p in &g.points {
            assert!((p.direction - 0.0).abs() < 1e-6);
            assert!(p.curvature.abs() < 1e-6);
        }
        // Interior velocity: 0.2 units over 2 frames.
        let expected = 0.2 / (2.0 * DT as f32);
        assert!((g.points[1].velocity - expected).abs() < 1e-3);
        // Endpoint velocity uses the one-sided neighbour.
        let edge = 0.1 / DT as f32;
        assert!((g.points[0].velocity - edge).abs() < 1e-3);
    }

    #[test]
    fn right_angle_turn_has_curvature() {
        let path = [
            Point::new(0.0, 0.0),
            Point::new(0.2, 0.0),
            Point::new(0.2, 0.2),
        ];
        let g = Gesture::from_path(&path, DT);
        let mid = &g.points[1];
        // Quarter turn over 0.4 arc units.
        let expected = std::f32::consts::FRAC_PI_2 / 0.4;
        assert!((mid.curvature - expected).abs() < 1e-3);
        assert_eq!(g.points[0].curvature, 0.0);
        assert_eq!(g.points[2].curvature, 0.0);
    }

    #[test]
    fn zero_time_delta_velocity_is_zero() {
        let g = Gesture::from_path(&[Point::new(0.0, 0.0), Point::new(0.5, 0.0)], 0.0);
        assert_eq!(g.points[0].velocity, 0.0);
    }
}
