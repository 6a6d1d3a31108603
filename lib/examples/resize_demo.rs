use asciify::{Asciifier, GlyphRamp, ToneCurve};
use image::{DynamicImage, Rgb, RgbImage};

fn main() -> asciify::Result<()> {
    println!("asciify - Resize Demo");
    println!("=====================\n");

    // Same source, different resize ratios
    let test_cases = vec![
        (400, 200, 0.05, "5% of 400x200"),
        (400, 200, 0.1, "10% of 400x200"),
        (123, 77, 0.2, "20% of 123x77 (dimensions truncate)"),
        (10, 10, 0.01, "1% of 10x10 (clamped to one pixel)"),
    ];

    let asciifier = Asciifier::new(GlyphRamp::compact(), ToneCurve::ContrastMedium)?;

    for (width, height, ratio, description) in test_cases {
        println!("Testing: {}", description);

        // Diagonal gradient
        let mut img = RgbImage::new(width, height);
        for y in 0..height {
            for x in 0..width {
                let gray = ((x + y) * 255 / (width + height)) as u8;
                img.put_pixel(x, y, Rgb([gray, gray, gray]));
            }
        }

        let frame = asciifier.convert_image(&DynamicImage::ImageRgb8(img), Some(ratio))?;

        println!("  Input:  {}x{}", width, height);
        println!("  Output: {} rows of {} glyphs", frame.height(), frame.width() * 2);
        println!("{frame}\n");
    }

    println!("Each pixel becomes two glyphs to compensate for tall terminal cells.");
    Ok(())
}
