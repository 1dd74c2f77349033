use crate::error::CoreError;

/// Decoded image, RGBA8, row-major.
///
/// # Example
/// ```
/// use pw_core::frame::FrameBuffer;
/// let fb = FrameBuffer::new(3, 2);
/// assert_eq!(fb.data.len(), 3 * 2 * 4);
/// assert_eq!(fb.row_bytes(1).len(), 12);
/// ```
#[derive(Clone, Debug)]
pub struct FrameBuffer {
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// Octets par pixel (RGBA).
const CHANNELS: usize = 4;

impl FrameBuffer {
    /// Buffer noir, alpha nul.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            data: vec![0u8; width as usize * height as usize * CHANNELS],
            width,
            height,
        }
    }

    /// Wrap an existing RGBA buffer.
    ///
    /// # Errors
    /// Returns [`CoreError::InvalidDimensions`] if `data` is not exactly
    /// `width * height * 4` bytes long.
    ///
    /// # Example
    /// ```
    /// use pw_core::frame::FrameBuffer;
    /// let fb = FrameBuffer::from_rgba(2, 1, vec![255, 0, 0, 255, 0, 0, 0, 255]).unwrap();
    /// assert_eq!(fb.red(0, 0), 255);
    /// assert!(FrameBuffer::from_rgba(2, 2, vec![0; 3]).is_err());
    /// ```
    pub fn from_rgba(width: u32, height: u32, data: Vec<u8>) -> Result<Self, CoreError> {
        let expected = width as usize * height as usize * CHANNELS;
        if data.len() != expected {
            return Err(CoreError::InvalidDimensions {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Red channel of pixel (x, y).
    ///
    /// # Panics
    /// Panics if (x, y) lies outside the frame.
    #[inline(always)]
    #[must_use]
    pub fn red(&self, x: u32, y: u32) -> u8 {
        self.row_bytes(y)[x as usize * CHANNELS]
    }

    /// Row `y` as RGBA bytes.
    #[inline]
    #[must_use]
    pub fn row_bytes(&self, y: u32) -> &[u8] {
        let stride = self.width as usize * CHANNELS;
        let start = y as usize * stride;
        &self.data[start..start + stride]
    }

    /// Red channel of row `y`, left to right.
    pub fn reds(&self, y: u32) -> impl Iterator<Item = u8> + '_ {
        self.row_bytes(y).iter().step_by(CHANNELS).copied()
    }
}
