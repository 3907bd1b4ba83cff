use thiserror::Error;

/// Errors raised by the grid, the driver and frame persistence
#[derive(Debug, Error)]
pub enum DlaError {
    /// Grid needs at least one interior cell on each axis
    #[error("invalid grid dimensions {width}x{height} (each side must be 3 to 65535)")]
    InvalidDimensions { width: usize, height: usize },

    #[error("({x}, {y}) is outside the interior domain")]
    OutOfDomain { x: i32, y: i32 },

    #[error("cell ({x}, {y}) is already occupied")]
    AlreadyOccupied { x: i32, y: i32 },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to encode frame: {0}")]
    Image(#[from] image::ImageError),

    #[error("failed to encode animation: {0}")]
    Gif(#[from] gif::EncodingError),

    /// GIF frames are limited to 65535 pixels per side
    #[error("{width}x{height} is too large for a GIF animation")]
    AnimationTooLarge { width: u32, height: u32 },

    #[error("config error: {0}")]
    Config(#[from] serde_json::Error),
}
