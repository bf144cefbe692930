/// Quadratic interpolating spline over scattered (x, y) points.
///
/// The spline breaks at the midpoints between interior knots, so every
/// piece is a parabola through one data point and the curve is continuous
/// with a continuous slope everywhere. Values outside the sampled range are
/// extrapolated from the end pieces. With two knots the curve is a line,
/// with one it is a constant.
#[derive(Debug, Clone, PartialEq)]
pub struct QuadraticInterpolant {
    xs: Vec<f64>,
    ys: Vec<f64>,
    breakpoints: Vec<f64>,
    breakpoint_values: Vec<f64>,
}

impl QuadraticInterpolant {
    /// Builds the interpolant, sorting knots and averaging duplicate abscissae.
    ///
    /// Returns `None` when no finite knot is supplied.
    pub fn new(points: impl IntoIterator<Item = (f64, f64)>) -> Option<Self> {
        let mut points: Vec<(f64, f64)> = points
            .into_iter()
            .filter(|(x, y)| x.is_finite() && y.is_finite())
            .collect();
        points.sort_by(|a, b| a.0.total_cmp(&b.0));

        let mut xs: Vec<f64> = Vec::with_capacity(points.len());
        let mut ys: Vec<f64> = Vec::with_capacity(points.len());
        let mut run = 1.0;
        for (x, y) in points {
            match xs.last() {
                Some(&last) if last == x => {
                    // Running mean of the duplicates.
                    run += 1.0;
                    if let Some(mean) = ys.last_mut() {
                        *mean += (y - *mean) / run;
                    }
                }
                _ => {
                    run = 1.0;
                    xs.push(x);
                    ys.push(y);
                }
            }
        }

        if xs.is_empty() {
            return None;
        }

        let (breakpoints, breakpoint_values) = if xs.len() >= 3 {
            solve_breakpoints(&xs, &ys)
        } else {
            (Vec::new(), Vec::new())
        };
        Some(QuadraticInterpolant {
            xs,
            ys,
            breakpoints,
            breakpoint_values,
        })
    }

    pub fn evaluate(&self, x: f64) -> f64 {
        match self.xs.len() {
            1 => self.ys[0],
            2 => {
                let slope = (self.ys[1] - self.ys[0]) / (self.xs[1] - self.xs[0]);
                self.ys[0] + slope * (x - self.xs[0])
            }
            _ => {
                let piece = self.piece_index(x);
                lagrange3(
                    [self.breakpoints[piece], self.xs[piece + 1], self.breakpoints[piece + 1]],
                    [
                        self.breakpoint_values[piece],
                        self.ys[piece + 1],
                        self.breakpoint_values[piece + 1],
                    ],
                    x,
                )
            }
        }
    }

    /// Piece `j` spans `breakpoints[j]..breakpoints[j + 1]` and passes
    /// through knot `j + 1`.
    fn piece_index(&self, x: f64) -> usize {
        let interior = &self.breakpoints[1..self.breakpoints.len() - 1];
        interior.partition_point(|&breakpoint| breakpoint <= x)
    }
}

/// Breakpoints and spline values there for `n >= 3` sorted distinct knots.
///
/// The outer breakpoints are the end knots. The interior values follow from
/// slope continuity at each interior breakpoint, a diagonally dominant
/// tridiagonal system.
fn solve_breakpoints(xs: &[f64], ys: &[f64]) -> (Vec<f64>, Vec<f64>) {
    let n = xs.len();
    let mut breakpoints = Vec::with_capacity(n - 1);
    breakpoints.push(xs[0]);
    breakpoints.extend(xs[1..n - 1].windows(2).map(|pair| 0.5 * (pair[0] + pair[1])));
    breakpoints.push(xs[n - 1]);

    let mut values = vec![0.0; n - 1];
    values[0] = ys[0];
    values[n - 2] = ys[n - 1];

    let unknowns = n - 3;
    let mut sub = vec![0.0; unknowns];
    let mut diag = vec![0.0; unknowns];
    let mut sup = vec![0.0; unknowns];
    let mut rhs = vec![0.0; unknowns];
    for row in 0..unknowns {
        let q = row + 1;
        let (_, left) = end_slopes(breakpoints[q - 1], xs[q], breakpoints[q]);
        let (right, _) = end_slopes(breakpoints[q], xs[q + 1], breakpoints[q + 1]);

        diag[row] = left[2] - right[0];
        rhs[row] = right[1] * ys[q + 1] - left[1] * ys[q];
        if q == 1 {
            rhs[row] -= left[0] * values[0];
        } else {
            sub[row] = left[0];
        }
        if q + 1 == n - 2 {
            rhs[row] += right[2] * values[n - 2];
        } else {
            sup[row] = -right[2];
        }
    }

    let solution = solve_tridiagonal(&sub, &diag, &sup, &rhs);
    values[1..n - 2].copy_from_slice(&solution);
    (breakpoints, values)
}

/// Slopes at `a` and at `b` of the parabola through `(a, za)`, `(c, yc)`,
/// `(b, zb)`, as weights on `[za, yc, zb]`.
fn end_slopes(a: f64, c: f64, b: f64) -> ([f64; 3], [f64; 3]) {
    let at_a = [
        1.0 / (a - c) + 1.0 / (a - b),
        (a - b) / ((c - a) * (c - b)),
        (a - c) / ((b - a) * (b - c)),
    ];
    let at_b = [
        (b - c) / ((a - c) * (a - b)),
        (b - a) / ((c - a) * (c - b)),
        1.0 / (b - a) + 1.0 / (b - c),
    ];
    (at_a, at_b)
}

/// Thomas algorithm; `sub[0]` and the last `sup` entry are ignored.
fn solve_tridiagonal(sub: &[f64], diag: &[f64], sup: &[f64], rhs: &[f64]) -> Vec<f64> {
    let m = diag.len();
    let mut upper = vec![0.0; m];
    let mut solution = vec![0.0; m];
    for i in 0..m {
        let (carried_upper, carried_rhs) = if i > 0 {
            (sub[i] * upper[i - 1], sub[i] * solution[i - 1])
        } else {
            (0.0, 0.0)
        };
        let pivot = diag[i] - carried_upper;
        upper[i] = sup[i] / pivot;
        solution[i] = (rhs[i] - carried_rhs) / pivot;
    }
    for i in (0..m.saturating_sub(1)).rev() {
        solution[i] -= upper[i] * solution[i + 1];
    }
    solution
}

fn lagrange3(xs: [f64; 3], ys: [f64; 3], x: f64) -> f64 {
    let [x0, x1, x2] = xs;
    let l0 = (x - x1) * (x - x2) / ((x0 - x1) * (x0 - x2));
    let l1 = (x - x0) * (x - x2) / ((x1 - x0) * (x1 - x2));
    let l2 = (x - x0) * (x - x1) / ((x2 - x0) * (x2 - x1));
    ys[0] * l0 + ys[1] * l1 + ys[2] * l2
}
