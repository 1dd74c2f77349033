use thiserror::Error;

/// Errors originating from the core module.
#[derive(Error, Debug, PartialEq)]
pub enum CoreError {
    /// Invalid configuration value or structure.
    #[error("Configuration invalide : {0}")]
    Config(String),

    /// The image is not `required`×`required` pixels.
    #[error(
        "Seules les images {required}×{required} en niveaux de gris sont supportées (reçu {width}×{height})"
    )]
    UnsupportedResolution {
        /// Width of the rejected image.
        width: u32,
        /// Height of the rejected image.
        height: u32,
        /// Resolution the configuration expects on both axes.
        required: u32,
    },

    /// Buffer length does not match the declared dimensions.
    #[error("Dimensions invalides : {expected} valeurs attendues, {actual} reçues")]
    InvalidDimensions {
        /// Number of values the dimensions imply.
        expected: usize,
        /// Number of values actually provided.
        actual: usize,
    },
}
