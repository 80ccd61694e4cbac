//! # Textures
//!
//! Bitmap checks run before anything is handed to the texture uploader.
//! Decoding is not done here: a [`Bitmap`] is already raw pixels.

use thiserror::Error;

/// Decoded 32-bit pixels.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Bitmap {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Row-major BGRA pixels, `width * height` long.
    pub pixels: Vec<u32>,
}

impl Bitmap {
    /// Creates a bitmap filled with one colour.
    #[must_use]
    pub fn filled(width: u32, height: u32, colour: u32) -> Self {
        let len = usize::try_from(u64::from(width) * u64::from(height)).unwrap_or(0);
        Self {
            width,
            height,
            pixels: vec![colour; len],
        }
    }
}

/// Handle to an uploaded texture.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureId(pub u32);

/// Why a bitmap cannot be used as a texture.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BitmapError {
    /// A side is zero or not a power of two.
    #[error("{width}x{height} is not a power of two size")]
    NotPowerOfTwo {
        /// Width in pixels.
        width: u32,
        /// Height in pixels.
        height: u32,
    },

    /// A side exceeds what the uploader supports.
    #[error("{width}x{height} exceeds the maximum texture size of {max}x{max}")]
    TooLarge {
        /// Width in pixels.
        width: u32,
        /// Height in pixels.
        height: u32,
        /// Largest supported side.
        max: u32,
    },
}

/// Checks that a bitmap can be uploaded.
///
/// # Errors
///
/// Returns [`BitmapError`] for non power-of-two sides or sides above
/// `max_size`.
pub fn validate_bitmap(bitmap: &Bitmap, max_size: u32) -> Result<(), BitmapError> {
    let (width, height) = (bitmap.width, bitmap.height);
    if !width.is_power_of_two() || !height.is_power_of_two() {
        return Err(BitmapError::NotPowerOfTwo { width, height });
    }
    if width > max_size || height > max_size {
        return Err(BitmapError::TooLarge {
            width,
            height,
            max: max_size,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_power_of_two_required() {
        assert!(validate_bitmap(&Bitmap::filled(64, 32, 0), 1024).is_ok());
        assert_eq!(
            validate_bitmap(&Bitmap::filled(48, 32, 0), 1024),
            Err(BitmapError::NotPowerOfTwo { width: 48, height: 32 })
        );
        assert!(validate_bitmap(&Bitmap::filled(0, 16, 0), 1024).is_err());
    }

    #[test]
    fn test_max_size() {
        let err = validate_bitmap(&Bitmap::filled(2048, 16, 0), 1024).unwrap_err();
        assert!(matches!(err, BitmapError::TooLarge { max: 1024, .. }));
        assert!(validate_bitmap(&Bitmap::filled(1024, 1024, 0), 1024).is_ok());
    }

    #[test]
    fn test_filled_len() {
        assert_eq!(Bitmap::filled(4, 2, 7).pixels, vec![7; 8]);
    }
}
