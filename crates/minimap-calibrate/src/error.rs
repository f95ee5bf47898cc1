/// Invalid calibration input. Numeric degeneracies are not errors.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CalibrationError {
    #[error("calibration needs at least one sample")]
    NoSamples,
    #[error("sample {index}: click ({x}, {y}) is outside the {width}x{height} frame")]
    ClickOutOfBounds {
        index: usize,
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    },
    #[error(
        "sample {index}: frame is {found_width}x{found_height}, expected {expected_width}x{expected_height}"
    )]
    FrameSizeMismatch {
        index: usize,
        expected_width: usize,
        expected_height: usize,
        found_width: usize,
        found_height: usize,
    },
}
