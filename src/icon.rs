use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

pub const ICON_FILE: &str = "tray.png";
pub const ICON_SIZE: u32 = 32;

const BLACK: [u8; 4] = [0, 0, 0, 255];
const CHECKBOX_X: u32 = 6;
const CHECKBOX_SIZE: u32 = 3;
const CHECKBOX_YS: [u32; 3] = [8, 14, 20];
const LINE_X: u32 = 12;
const LINE_LENGTH: u32 = 15;

#[derive(Debug)]
pub enum IconError {
    Io(std::io::Error),
    Encode(png::EncodingError),
    Decode(png::DecodingError),
    /// The cached file decoded, but not into something usable as a tray icon.
    Format(String),
}

impl std::fmt::Display for IconError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IconError::Io(err) => write!(f, "io error: {err}"),
            IconError::Encode(err) => write!(f, "png encode error: {err}"),
            IconError::Decode(err) => write!(f, "png decode error: {err}"),
            IconError::Format(message) => write!(f, "unsupported icon: {message}"),
        }
    }
}

impl std::error::Error for IconError {}

impl From<std::io::Error> for IconError {
    fn from(value: std::io::Error) -> Self {
        IconError::Io(value)
    }
}

impl From<png::EncodingError> for IconError {
    fn from(value: png::EncodingError) -> Self {
        IconError::Encode(value)
    }
}

impl From<png::DecodingError> for IconError {
    fn from(value: png::DecodingError) -> Self {
        IconError::Decode(value)
    }
}

/// Straight (non-premultiplied) RGBA8 pixels, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RgbaIcon {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl RgbaIcon {
    fn transparent(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            rgba: vec![0; (width * height * 4) as usize],
        }
    }

    fn set(&mut self, x: u32, y: u32, color: [u8; 4]) {
        if x >= self.width || y >= self.height {
            return;
        }
        let offset = ((y * self.width + x) * 4) as usize;
        self.rgba[offset..offset + 4].copy_from_slice(&color);
    }
}

/// Draws the tray glyph: three hollow checkboxes, each followed by a text line.
pub fn generate_icon() -> RgbaIcon {
    let mut icon = RgbaIcon::transparent(ICON_SIZE, ICON_SIZE);
    let last = CHECKBOX_SIZE - 1;
    for y in CHECKBOX_YS {
        for d in 0..CHECKBOX_SIZE {
            icon.set(CHECKBOX_X + d, y, BLACK);
            icon.set(CHECKBOX_X + d, y + last, BLACK);
            icon.set(CHECKBOX_X, y + d, BLACK);
            icon.set(CHECKBOX_X + last, y + d, BLACK);
        }
        let line_y = y + CHECKBOX_SIZE / 2;
        for dx in 0..LINE_LENGTH {
            icon.set(LINE_X + dx, line_y, BLACK);
        }
    }
    icon
}

pub fn encode_png(icon: &RgbaIcon) -> Result<Vec<u8>, IconError> {
    let mut out = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut out, icon.width, icon.height);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header()?;
        writer.write_image_data(&icon.rgba)?;
        writer.finish()?;
    }
    Ok(out)
}

pub fn decode_png(bytes: &[u8]) -> Result<RgbaIcon, IconError> {
    let decoder = png::Decoder::new(std::io::Cursor::new(bytes));
    let mut reader = decoder.read_info()?;
    let mut buf = vec![0; reader.output_buffer_size()];
    let info = reader.next_frame(&mut buf)?;
    if info.bit_depth != png::BitDepth::Eight {
        return Err(IconError::Format(format!("bit depth {:?}", info.bit_depth)));
    }
    let pixels = &buf[..info.buffer_size()];
    let rgba = match info.color_type {
        png::ColorType::Rgba => pixels.to_vec(),
        png::ColorType::Rgb => pixels
            .chunks_exact(3)
            .flat_map(|px| [px[0], px[1], px[2], 255])
            .collect(),
        other => return Err(IconError::Format(format!("color type {other:?}"))),
    };
    Ok(RgbaIcon {
        width: info.width,
        height: info.height,
        rgba,
    })
}

/// Returns the cached icon path, drawing and writing it first if it is not there yet.
///
/// The PNG goes to a temp file that is renamed into place, so an interrupted first run
/// never leaves a truncated `tray.png` behind to be reused.
pub fn ensure_icon_file(dir: &Path) -> Result<PathBuf, IconError> {
    let path = dir.join(ICON_FILE);
    if path.is_file() {
        log::debug!("icon: reusing cached path={}", path.display());
        return Ok(path);
    }

    let bytes = encode_png(&generate_icon())?;
    let temp_path = path.with_extension("tmp");
    {
        let mut file = File::create(&temp_path)?;
        file.write_all(&bytes)?;
        file.sync_all()?;
    }
    fs::rename(&temp_path, &path)?;
    log::info!("icon: generated path={}", path.display());
    Ok(path)
}

pub fn load_icon(path: &Path) -> Result<RgbaIcon, IconError> {
    let bytes = fs::read(path)?;
    decode_png(&bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pixel(icon: &RgbaIcon, x: u32, y: u32) -> [u8; 4] {
        let offset = ((y * icon.width + x) * 4) as usize;
        let mut out = [0; 4];
        out.copy_from_slice(&icon.rgba[offset..offset + 4]);
        out
    }

    fn drawn_pixels(icon: &RgbaIcon) -> Vec<(u32, u32)> {
        let mut out = Vec::new();
        for y in 0..icon.height {
            for x in 0..icon.width {
                if pixel(icon, x, y) == BLACK {
                    out.push((x, y));
                }
            }
        }
        out
    }

    #[test]
    fn generate_icon_is_deterministic() {
        assert_eq!(generate_icon(), generate_icon());
        assert_eq!(
            encode_png(&generate_icon()).unwrap(),
            encode_png(&generate_icon()).unwrap()
        );
    }

    #[test]
    fn icon_layout_matches_checkbox_glyph() {
        let icon = generate_icon();
        assert_eq!((icon.width, icon.height), (32, 32));
        assert_eq!(icon.rgba.len(), 32 * 32 * 4);

        let mut expected = Vec::new();
        for top in [8u32, 14, 20] {
            for y in top..top + 3 {
                for x in 6..9 {
                    // Hollow square: the center pixel stays transparent.
                    if (x, y) != (7, top + 1) {
                        expected.push((x, y));
                    }
                }
            }
            for x in 12..27 {
                expected.push((x, top + 1));
            }
        }
        expected.sort_by_key(|&(x, y)| (y, x));

        assert_eq!(drawn_pixels(&icon), expected);
        assert_eq!(pixel(&icon, 7, 9), [0, 0, 0, 0]);
        assert_eq!(pixel(&icon, 0, 0), [0, 0, 0, 0]);
        assert_eq!(pixel(&icon, 27, 9), [0, 0, 0, 0]);

        // Every pixel is either fully transparent or opaque black.
        assert!(icon
            .rgba
            .chunks_exact(4)
            .all(|px| px == [0, 0, 0, 0] || px == BLACK));
    }

    #[test]
    fn png_encoding_preserves_pixels() {
        let icon = generate_icon();
        let bytes = encode_png(&icon).unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
        assert_eq!(decode_png(&bytes).unwrap(), icon);
    }

    #[test]
    fn ensure_icon_file_generates_once_then_reuses_cache() {
        let dir = tempfile::tempdir().unwrap();
        let path = ensure_icon_file(dir.path()).unwrap();
        assert_eq!(path, dir.path().join(ICON_FILE));
        assert_eq!(load_icon(&path).unwrap(), generate_icon());

        // An existing file wins over regeneration, even if its content differs.
        fs::write(&path, b"cached").unwrap();
        let again = ensure_icon_file(dir.path()).unwrap();
        assert_eq!(again, path);
        assert_eq!(fs::read(&path).unwrap(), b"cached");
        assert!(matches!(load_icon(&path), Err(IconError::Decode(_))));
    }

    #[test]
    fn ensure_icon_file_replaces_leftover_temp_file_atomically() {
        let dir = tempfile::tempdir().unwrap();
        // A half-written temp file from an interrupted run must not end up as the icon.
        fs::write(dir.path().join("tray.tmp"), b"\x89PNG trunc").unwrap();

        let path = ensure_icon_file(dir.path()).unwrap();
        assert_eq!(load_icon(&path).unwrap(), generate_icon());
        assert!(!dir.path().join("tray.tmp").exists());
    }

    #[test]
    fn ensure_icon_file_reports_io_errors() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing");
        assert!(matches!(
            ensure_icon_file(&missing),
            Err(IconError::Io(_))
        ));
    }
}
