use image::{ImageBuffer, Rgba, RgbaImage};

/// Black/white checkerboard; the cell at the origin is white.
pub fn checkerboard_rgba(width: u32, height: u32, cell: u32) -> RgbaImage {
    assert!(width > 0 && height > 0, "image dimensions must be positive");
    assert!(cell > 0, "cell size must be positive");

    RgbaImage::from_fn(width, height, |x, y| {
        let v = if ((x / cell) + (y / cell)) % 2 == 0 { 255 } else { 0 };
        Rgba([v, v, v, 255])
    })
}

/// Solid background with one filled square.
pub fn square_on_background(
    size: u32,
    background: [u8; 3],
    square: [u8; 3],
    origin: (u32, u32),
    side: u32,
) -> RgbaImage {
    let (sx, sy) = origin;
    RgbaImage::from_fn(size, size, |x, y| {
        let inside = x >= sx && x < sx + side && y >= sy && y < sy + side;
        let [r, g, b] = if inside { square } else { background };
        Rgba([r, g, b, 255])
    })
}

/// Widen an 8-bit image to 16 bits without changing the quantised values.
pub fn widen(img: &RgbaImage) -> ImageBuffer<Rgba<u16>, Vec<u16>> {
    ImageBuffer::from_fn(img.width(), img.height(), |x, y| {
        let [r, g, b, a] = img.get_pixel(x, y).0;
        Rgba([r as u16 * 257, g as u16 * 257, b as u16 * 257, a as u16 * 257])
    })
}
