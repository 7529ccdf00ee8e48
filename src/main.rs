// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

mod args;

use args::Args;
use clap::Parser;
use micr_sdk::{
    config::Config,
    image::{decode_jpeg, ImageType, PackedImage},
    Engine, EngineResult,
};
use std::{error::Error, fs, path::Path, process, time::Instant};
use tracing::{error, info, Level};
use tracing_subscriber::{filter::LevelFilter, layer::SubscriberExt, Layer};

/// Frame loaded from disk, owned so that the engine can borrow it.
struct Frame {
    data: Vec<u8>,
    image_type: ImageType,
    width: usize,
    height: usize,
    stride: usize,
}

fn init_logging(level: Level, args: &Args) -> Result<(), Box<dyn Error>> {
    let stdout_log = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_filter(LevelFilter::from_level(level));

    let journald = if args.journald {
        match tracing_journald::layer() {
            Ok(layer) => Some(layer.with_filter(LevelFilter::from_level(level))),
            Err(e) => {
                eprintln!("journald unavailable: {e}");
                None
            }
        }
    } else {
        None
    };

    let tracy = if args.tracy {
        tracy_client::Client::start();
        Some(tracing_tracy::TracyLayer::default())
    } else {
        None
    };

    let subscriber = tracing_subscriber::registry()
        .with(stdout_log)
        .with(journald)
        .with(tracy);
    tracing::subscriber::set_global_default(subscriber)?;
    tracing_log::LogTracer::init()?;
    Ok(())
}

fn is_jpeg(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("jpg") || ext.eq_ignore_ascii_case("jpeg"))
}

fn load_frame(path: &Path, args: &Args) -> Result<Frame, Box<dyn Error>> {
    let data = fs::read(path)?;

    if is_jpeg(path) {
        let (data, width, height, stride) = decode_jpeg(&data)?;
        return Ok(Frame {
            data,
            image_type: ImageType::Rgb24,
            width,
            height,
            stride,
        });
    }

    let [width, height] = args.size[..] else {
        return Err(Box::from(format!(
            "{} is not a JPEG file, raw frames need --size WIDTH HEIGHT",
            path.display()
        )));
    };
    Ok(Frame {
        data,
        image_type: args.image_type.into(),
        width,
        height,
        stride: args.stride,
    })
}

fn run(engine: &mut Engine, args: &Args) -> Result<EngineResult, Box<dyn Error>> {
    if args.license_key {
        return Ok(engine.request_runtime_license_key(args.raw_key));
    }

    let path = args.image.as_deref().ok_or("no image given")?;
    let frame = load_frame(path, args)?;

    let res = engine.warm_up(frame.image_type);
    if !res.is_ok() {
        return Ok(res);
    }

    let image = PackedImage::new(frame.image_type, &frame.data, frame.width, frame.height)
        .with_stride(frame.stride)
        .with_orientation(args.orientation);

    let now = Instant::now();
    let res = engine.process(&image);
    info!(
        "{} {}x{} {}: {} zones in {:?}",
        path.display(),
        frame.width,
        frame.height,
        frame.image_type,
        res.num_zones(),
        now.elapsed()
    );
    Ok(res)
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    let config = args.config_json()?;

    let level = match Config::from_json(Some(&config)) {
        Ok(c) => c.debug_level.as_tracing(),
        Err(_) => Level::INFO,
    };
    init_logging(level, &args)?;

    let (engine, res) = Engine::init_result(Some(&config));
    let Some(mut engine) = engine else {
        error!("init failed: {res}");
        process::exit(1);
    };

    let res = run(&mut engine, &args)?;
    let deinit = engine.deinit();
    if !deinit.is_ok() {
        error!("deinit failed: {deinit}");
    }

    if !res.is_ok() {
        error!("{res}");
        process::exit(1);
    }
    if res.json().is_empty() {
        println!("{}", res.phrase());
    } else {
        println!("{}", res.json());
    }
    Ok(())
}
