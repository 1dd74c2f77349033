/// Gaussian fade applied across each image row.
///
/// For intra-row offset `k` in a row of `len` samples, `u = k / (len − 1) × 2 − 1`
/// spans [-1, 1] and the gain is `exp(−u² × variance)`. Rows are faded in and
/// out so consecutive rows blend without the ghost frequencies a hard cut
/// produces.
///
/// Coefficients are precomputed once per configuration.
///
/// # Example
/// ```
/// use pw_synth::window::GaussianWindow;
/// let w = GaussianWindow::new(5, 4.0);
/// assert_eq!(w.factor(2), 1.0);
/// assert!((w.factor(0) - (-4.0f64).exp()).abs() < 1e-12);
/// assert_eq!(w.factor(0), w.factor(4));
/// ```
#[derive(Clone, Debug)]
pub struct GaussianWindow {
    coefficients: Vec<f64>,
}

impl GaussianWindow {
    /// Precompute a window of `len` coefficients.
    ///
    /// A window shorter than 2 samples has no edges to fade and is all ones.
    #[must_use]
    pub fn new(len: usize, variance: f64) -> Self {
        if len < 2 {
            return Self {
                coefficients: vec![1.0; len],
            };
        }
        let last = (len - 1) as f64;
        let coefficients = (0..len)
            .map(|k| {
                let u = k as f64 / last * 2.0 - 1.0;
                (-u * u * variance).exp()
            })
            .collect();
        Self { coefficients }
    }

    /// Gain at intra-row offset `k`.
    ///
    /// # Panics
    /// Panics if `k >= self.len()`.
    #[inline(always)]
    #[must_use]
    pub fn factor(&self, k: usize) -> f64 {
        self.coefficients[k]
    }

    /// Number of coefficients.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.coefficients.len()
    }

    /// `true` for a zero-length window.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.coefficients.is_empty()
    }

    /// All coefficients in order.
    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.coefficients
    }
}
