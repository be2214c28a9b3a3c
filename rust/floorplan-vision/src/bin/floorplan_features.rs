// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! CLI tool: extract wall segments and room polygons from a floor plan image
//!
//! Writes the JSON feature response to stdout (or `--output`). Logs go to
//! stderr and are controlled with `RUST_LOG`.
//!
//! Usage:
//!   floorplan-features <image_path> [options]

use anyhow::{bail, Context};
use floorplan_vision::{
    extract_features, load_image, preprocess, DetectionConfig, ErrorResponse, ExtractionResult,
    FeatureResponse,
};
use image::{GrayImage, Rgb, RgbImage};
use imageproc::drawing::draw_line_segment_mut;
use std::env;
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Parsed command line
#[derive(Debug, Default)]
struct Options {
    image_path: PathBuf,
    config_path: Option<PathBuf>,
    output_path: Option<PathBuf>,
    binary_out: Option<PathBuf>,
    debug_out: Option<PathBuf>,
    pretty: bool,
    sequential: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    if args.is_empty() || args[0] == "--help" || args[0] == "-h" {
        print_usage();
        return;
    }

    let options = match parse_args(&args) {
        Ok(options) => options,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            print_usage();
            std::process::exit(2);
        }
    };

    if let Err(e) = run(&options) {
        tracing::error!(error = %format!("{:#}", e), "feature extraction failed");
        let body = match e.downcast_ref::<floorplan_vision::Error>() {
            Some(err) => ErrorResponse::from(err),
            None => ErrorResponse {
                success: false,
                error: format!("{:#}", e),
                code: "INTERNAL_ERROR".into(),
            },
        };
        if let Ok(json) = serde_json::to_string(&body) {
            println!("{}", json);
        }
        std::process::exit(1);
    }
}

fn parse_args(args: &[String]) -> anyhow::Result<Options> {
    let mut options = Options {
        image_path: PathBuf::from(&args[0]),
        ..Default::default()
    };

    let mut rest = args[1..].iter();
    while let Some(arg) = rest.next() {
        let mut value = |flag: &str| {
            rest.next()
                .map(PathBuf::from)
                .with_context(|| format!("{} expects a path", flag))
        };
        match arg.as_str() {
            "--config" => options.config_path = Some(value("--config")?),
            "--output" => options.output_path = Some(value("--output")?),
            "--binary-out" => options.binary_out = Some(value("--binary-out")?),
            "--debug-out" => options.debug_out = Some(value("--debug-out")?),
            "--pretty" => options.pretty = true,
            "--sequential" => options.sequential = true,
            other => bail!("unknown option: {}", other),
        }
    }

    Ok(options)
}

fn run(options: &Options) -> anyhow::Result<()> {
    let mut config = match &options.config_path {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("cannot read config {}", path.display()))?;
            serde_json::from_str::<DetectionConfig>(&text)
                .with_context(|| format!("cannot parse config {}", path.display()))?
        }
        None => DetectionConfig::default(),
    };
    if options.sequential {
        config.parallel = false;
    }

    let grayscale = load_image(&options.image_path)?;
    tracing::info!(
        path = %options.image_path.display(),
        width = grayscale.width(),
        height = grayscale.height(),
        "image loaded"
    );

    let result = extract_features(&grayscale, &config)?;
    tracing::info!(
        walls = result.walls.len(),
        rooms = result.rooms.len(),
        "features extracted"
    );

    if let Some(path) = &options.binary_out {
        preprocess(&grayscale, &config)
            .as_gray()
            .save(path)
            .with_context(|| format!("cannot save binary image {}", path.display()))?;
        tracing::info!(path = %path.display(), "binary image saved");
    }

    if let Some(path) = &options.debug_out {
        render_overlay(&grayscale, &result)
            .save(path)
            .with_context(|| format!("cannot save debug image {}", path.display()))?;
        tracing::info!(path = %path.display(), "debug image saved");
    }

    let response = FeatureResponse::from(&result);
    let json = if options.pretty {
        response.to_json_pretty()?
    } else {
        response.to_json()?
    };

    match &options.output_path {
        Some(path) => {
            fs::write(path, json).with_context(|| format!("cannot write {}", path.display()))?
        }
        None => println!("{}", json),
    }

    Ok(())
}

/// Draw walls (red) and room outlines (green) over the input image
fn render_overlay(grayscale: &GrayImage, result: &ExtractionResult) -> RgbImage {
    let mut overlay = RgbImage::new(grayscale.width(), grayscale.height());
    for (x, y, pixel) in grayscale.enumerate_pixels() {
        let v = pixel.0[0];
        overlay.put_pixel(x, y, Rgb([v, v, v]));
    }

    for wall in &result.walls {
        draw_line_segment_mut(
            &mut overlay,
            (wall.x1() as f32, wall.y1() as f32),
            (wall.x2() as f32, wall.y2() as f32),
            Rgb([220, 0, 0]),
        );
    }

    for room in &result.rooms {
        let n = room.points.len();
        for i in 0..n {
            let a = room.points[i];
            let b = room.points[(i + 1) % n];
            draw_line_segment_mut(
                &mut overlay,
                (a.x as f32, a.y as f32),
                (b.x as f32, b.y as f32),
                Rgb([0, 180, 0]),
            );
        }
    }

    overlay
}

fn print_usage() {
    eprintln!("Usage: floorplan-features <image_path> [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --config <file.json>     Override detection parameters");
    eprintln!("  --output <file.json>     Write JSON here instead of stdout");
    eprintln!("  --binary-out <file.png>  Save the thresholded binary image");
    eprintln!("  --debug-out <file.png>   Save walls and rooms drawn over the input");
    eprintln!("  --pretty                 Pretty-print the JSON");
    eprintln!("  --sequential             Extract walls and rooms on one thread");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  RUST_LOG                 Log filter (default: info)");
}
