/// Convert a normalized signal value to a signed 16-bit sample.
///
/// Computes `x × 32767 − 0.5`, clamps it to the `i16` range and truncates
/// toward zero. The `−0.5` bias and the truncation are kept bit-exact.
/// NaN yields 0.
///
/// # Example
/// ```
/// use pw_synth::quantize::quantize;
/// assert_eq!(quantize(0.0), 0);
/// assert_eq!(quantize(1.0), 32766);
/// assert_eq!(quantize(-1.0), -32767);
/// assert_eq!(quantize(4.0), i16::MAX);
/// assert_eq!(quantize(-4.0), i16::MIN);
/// ```
#[inline(always)]
#[must_use]
pub fn quantize(x: f64) -> i16 {
    let scaled = x * f64::from(i16::MAX) - 0.5;
    // `as` truncates toward zero, saturates, and maps NaN to 0.
    scaled.clamp(f64::from(i16::MIN), f64::from(i16::MAX)) as i16
}
