mod cli;

use anyhow::{Context, Result};
use asciify::lut::{ThresholdTable, sample_points};
use asciify::{
    AsciiConfig, Asciifier, ConsoleSink, FileSink, RenderSink, StopSignal, ToneCurve,
    run_camera_preview,
};
use clap::Parser;
use cli::{Cli, Command};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Configure logging
    env_logger::Builder::new()
        .filter_level(cli.log_level)
        .init();

    let config = cli.resolve_config()?;

    match &cli.command {
        Command::Image {
            path,
            output,
            quiet,
            ..
        } => {
            let asciifier = Asciifier::from_config(&config)?;
            let frame = asciifier
                .convert_path(path, config.resize)
                .with_context(|| format!("converting {}", path.display()))?;

            if let Some(output) = output {
                FileSink::new(output)
                    .render(&frame)
                    .with_context(|| format!("writing {}", output.display()))?;
            }
            if !quiet {
                ConsoleSink::stdout().render(&frame)?;
            }
        }
        Command::Camera { frames, .. } => run_camera(&config, *frames)?,
        Command::Curves { .. } => print_curves(&config)?,
    }

    Ok(())
}

fn run_camera(config: &AsciiConfig, max_frames: Option<u64>) -> Result<()> {
    let asciifier = Asciifier::from_config(config)?;

    let stop = StopSignal::new();
    let handler_stop = stop.clone();
    ctrlc::set_handler(move || handler_stop.stop()).context("installing Ctrl-C handler")?;

    let mut sink = ConsoleSink::live();
    let stats = run_camera_preview(config, &asciifier, &mut sink, max_frames, &stop)?;
    log::info!(
        "{} frames in {:.1}s ({:.1} fps)",
        stats.frames,
        stats.elapsed.as_secs_f64(),
        stats.average_fps()
    );
    Ok(())
}

fn print_curves(config: &AsciiConfig) -> Result<()> {
    let ramp = config.glyph_ramp()?;
    let points: Vec<f64> = sample_points(ramp.len())?
        .into_iter()
        .map(f64::from)
        .collect();

    let mut curves = ToneCurve::presets();
    if !curves.contains(&config.curve) {
        curves.insert(0, config.curve.clone());
    }

    println!("ramp ({} glyphs): {:?}", ramp.len(), ramp.glyphs().concat());
    println!("sample points: {points:?}\n");

    for curve in curves {
        let table = match ThresholdTable::build(&ramp, &curve) {
            Ok(table) => table,
            Err(e) => {
                println!("{curve}: {e}\n");
                continue;
            }
        };
        let monotonic = if curve.is_monotonic_over(&points) {
            "monotonic"
        } else {
            "non-monotonic, first match decides"
        };
        println!("{curve} ({monotonic})");
        for entry in table.entries() {
            println!(
                "  {:>10.3}  {:?}",
                entry.threshold,
                ramp.glyphs()[entry.glyph]
            );
        }
        println!();
    }
    Ok(())
}
