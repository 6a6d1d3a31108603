/// Basic example: convert a synthetic test image to ASCII art
///
/// Draws a bright disc on a dark gradient and prints it once per tone curve,
/// so the effect of each curve on the same pixels can be compared.
use asciify::{Asciifier, GlyphRamp, ToneCurve};
use image::{DynamicImage, Rgb, RgbImage};

fn main() -> asciify::Result<()> {
    println!("asciify - Basic Example");
    println!("=======================\n");

    let width = 60;
    let height = 30;
    let mut img = RgbImage::new(width, height);

    let center_x = width as f32 / 2.0;
    let center_y = height as f32 / 2.0;
    let radius = 11.0;

    for y in 0..height {
        for x in 0..width {
            // Horizontal gradient background
            let background = (x * 120 / width) as u8;
            let dx = x as f32 - center_x;
            let dy = (y as f32 - center_y) * 2.0;
            let dist = (dx * dx + dy * dy).sqrt();

            let value = if dist < radius {
                // Disc fades from white at the centre
                (255.0 - dist * 6.0) as u8
            } else {
                background
            };
            img.put_pixel(x, y, Rgb([value, value, value]));
        }
    }

    let img = DynamicImage::ImageRgb8(img);
    println!("Created test image: {}x{}\n", width, height);

    for curve in ToneCurve::presets() {
        let asciifier = Asciifier::new(GlyphRamp::default(), curve)?;
        let frame = asciifier.convert_image(&img, Some(0.5))?;

        println!("curve: {}", asciifier.curve());
        println!("{frame}\n");
    }

    Ok(())
}
