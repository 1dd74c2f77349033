use thiserror::Error;

/// Errors originating from the synthesis module.
#[derive(Error, Debug, PartialEq)]
pub enum SynthError {
    /// Grid or energy do not have the configured number of rows/columns.
    #[error("Grille {actual}×{actual} ({energy_rows} sommes) incompatible avec la résolution {expected}")]
    ShapeMismatch {
        /// Resolution from the configuration.
        expected: usize,
        /// Resolution of the grid.
        actual: usize,
        /// Length of the row energy.
        energy_rows: usize,
    },

    /// A row has zero energy and the policy forbids silencing it.
    #[error("Ligne {row} entièrement noire : normalisation impossible")]
    DegenerateRow {
        /// Index of the first black row.
        row: usize,
    },

    /// Invalid configuration.
    #[error(transparent)]
    Config(#[from] pw_core::CoreError),
}
