/// Binary PPM (P6) output for rendered frames
use std::io::Write;

use meshview_core::raster::ColorBuffer;

/// Writes the whole color buffer as a P6 image, top row first.
pub fn write_ppm<W: Write>(buffer: &ColorBuffer, mut w: W) -> std::io::Result<()> {
    write!(w, "P6\n{} {}\n255\n", buffer.width(), buffer.height())?;
    let mut bytes = Vec::with_capacity(buffer.pixels().len() * 3);
    for color in buffer.pixels() {
        bytes.extend_from_slice(&color.to_bytes());
    }
    w.write_all(&bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use meshview_core::Color;

    #[test]
    fn test_header_and_payload() {
        let mut buffer = ColorBuffer::new(2, 1, Color::BLACK);
        buffer.set(1, 0, Color::new(1, 2, 3));
        let mut out = Vec::new();
        write_ppm(&buffer, &mut out).unwrap();
        let header = b"P6\n2 1\n255\n";
        assert_eq!(&out[..header.len()], header);
        assert_eq!(&out[header.len()..], &[0, 0, 0, 1, 2, 3]);
    }
}
