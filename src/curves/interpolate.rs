//! Piecewise linear interpolation with linear extrapolation.

/// Piecewise linear function through sorted sample points.
///
/// Outside the sampled range the first or last segment is extended.
///
/// # Examples
///
/// ```
/// use aprender_topn::curves::LinearInterpolator;
///
/// let f = LinearInterpolator::new(vec![0.0, 1.0, 2.0], vec![0.0, 10.0, 30.0]).unwrap();
/// assert_eq!(f.eval(0.5), 5.0);
/// assert_eq!(f.eval(3.0), 50.0);
/// assert_eq!(f.eval(-1.0), -10.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct LinearInterpolator {
    xs: Vec<f64>,
    ys: Vec<f64>,
}

impl LinearInterpolator {
    /// Builds the interpolant from `(xs[i], ys[i])` pairs.
    ///
    /// Pairs are sorted by x; repeated x values keep their first y.
    /// Returns `None` if the inputs differ in length or fewer than two
    /// distinct finite x values remain.
    #[must_use]
    pub fn new(xs: Vec<f64>, ys: Vec<f64>) -> Option<Self> {
        if xs.len() != ys.len() {
            return None;
        }
        let mut pairs: Vec<(f64, f64)> = xs
            .into_iter()
            .zip(ys)
            .filter(|(x, _)| x.is_finite())
            .collect();
        pairs.sort_by(|a, b| a.0.total_cmp(&b.0));
        pairs.dedup_by(|next, kept| next.0 == kept.0);
        if pairs.len() < 2 {
            return None;
        }
        let (xs, ys) = pairs.into_iter().unzip();
        Some(Self { xs, ys })
    }

    /// Sample abscissae, ascending.
    #[must_use]
    pub fn xs(&self) -> &[f64] {
        &self.xs
    }

    /// Evaluates the interpolant at `x`.
    #[must_use]
    pub fn eval(&self, x: f64) -> f64 {
        let n = self.xs.len();
        let p = self.xs.partition_point(|&v| v <= x);
        if p > 0 && self.xs[p - 1] == x {
            return self.ys[p - 1];
        }
        // Index of the segment [xs[i], xs[i+1]] used for x.
        let i = match p {
            0 => 0,
            p if p >= n => n - 2,
            p => p - 1,
        };
        let (x0, x1) = (self.xs[i], self.xs[i + 1]);
        let (y0, y1) = (self.ys[i], self.ys[i + 1]);
        y0 + (y1 - y0) * (x - x0) / (x1 - x0)
    }
}
