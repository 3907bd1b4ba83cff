use crate::error::DlaError;
use gif::{Encoder, Frame, Repeat};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use tracing::info;

/// Delay between animation frames, in hundredths of a second
const FRAME_DELAY: u16 = 10;

/// Encode RGBA frames of identical size as a looping GIF
pub fn write_gif<W: Write>(
    writer: W,
    width: u16,
    height: u16,
    frames: &[Vec<u8>],
) -> Result<(), DlaError> {
    let mut encoder = Encoder::new(writer, width, height, &[])?;
    encoder.set_repeat(Repeat::Infinite)?;

    for rgba in frames {
        let mut pixels = rgba.clone();
        let mut frame = Frame::from_rgba_speed(width, height, &mut pixels, 10);
        frame.delay = FRAME_DELAY;
        encoder.write_frame(&frame)?;
    }
    Ok(())
}

/// Write the captured frames to `path`. Nothing is written when there are no frames.
pub fn save_gif(path: &Path, width: u32, height: u32, frames: &[Vec<u8>]) -> Result<bool, DlaError> {
    if frames.is_empty() {
        return Ok(false);
    }
    let (w, h) = match (u16::try_from(width), u16::try_from(height)) {
        (Ok(w), Ok(h)) => (w, h),
        _ => return Err(DlaError::AnimationTooLarge { width, height }),
    };
    let file = File::create(path)?;
    write_gif(file, w, h, frames)?;
    info!(path = %path.display(), frames = frames.len(), "wrote animation");
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::{BACKGROUND_COLOR, GROWTH_MARKER};
    use tempfile::tempdir;

    fn solid(width: usize, height: usize, color: [u8; 4]) -> Vec<u8> {
        color.repeat(width * height)
    }

    #[test]
    fn test_gif_contains_every_frame() {
        let frames = vec![
            solid(8, 6, BACKGROUND_COLOR),
            solid(8, 6, GROWTH_MARKER),
            solid(8, 6, BACKGROUND_COLOR),
        ];
        let mut bytes = Vec::new();
        write_gif(&mut bytes, 8, 6, &frames).unwrap();
        assert!(bytes.starts_with(b"GIF89a"));

        let mut decoder = gif::DecodeOptions::new().read_info(bytes.as_slice()).unwrap();
        assert_eq!((decoder.width(), decoder.height()), (8, 6));
        let mut count = 0;
        while decoder.read_next_frame().unwrap().is_some() {
            count += 1;
        }
        assert_eq!(count, 3);
    }

    #[test]
    fn test_no_frames_writes_nothing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("empty.gif");
        assert!(!save_gif(&path, 4, 4, &[]).unwrap());
        assert!(!path.exists());
    }

    #[test]
    fn test_oversized_animation_is_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("big.gif");
        let frames = vec![Vec::new()];
        assert!(matches!(
            save_gif(&path, 70_000, 10, &frames),
            Err(DlaError::AnimationTooLarge { .. })
        ));
    }

    #[test]
    fn test_save_gif_to_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("growth.gif");
        let frames = vec![solid(5, 5, GROWTH_MARKER)];
        assert!(save_gif(&path, 5, 5, &frames).unwrap());
        assert!(std::fs::metadata(&path).unwrap().len() > 0);
    }
}
