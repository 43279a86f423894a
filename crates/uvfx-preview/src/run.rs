use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use renderer::{GpuContext, WgpuGraphics};
use tracing_subscriber::EnvFilter;
use uvfx::{FilterSource, ModuleRegistry, OverlayFilter, Settings};

use crate::cli::Cli;
use crate::host::PreviewHost;

/// Frame the overlay is composited over.
const BACKGROUND: [f64; 4] = [0.18, 0.18, 0.18, 1.0];

pub fn initialise_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

/// Reads the optional TOML settings file and applies command-line overrides.
pub fn resolve_settings(args: &Cli) -> Result<Settings> {
    let mut settings = match &args.settings {
        Some(path) => load_settings_file(path)?,
        None => uvfx::default_settings(),
    };
    if let Some(image) = &args.image {
        settings.file = image.to_string_lossy().into_owned();
    }
    settings.unload |= args.unload;
    settings.linear_alpha |= args.linear_alpha;
    Ok(settings)
}

fn load_settings_file(path: &Path) -> Result<Settings> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read settings file {}", path.display()))?;
    toml::from_str(&text)
        .with_context(|| format!("failed to parse settings file {}", path.display()))
}

fn frame_interval_ns(fps: f32) -> u64 {
    (1_000_000_000.0 / f64::from(fps)).round().max(1.0) as u64
}

pub fn run(args: Cli) -> Result<()> {
    let settings = resolve_settings(&args)?;
    if settings.file.is_empty() {
        tracing::warn!("no image configured; rendering the background only");
    }

    let data_dir = args
        .data_dir
        .clone()
        .unwrap_or_else(|| PathBuf::from(renderer::DATA_DIR));
    let registry = ModuleRegistry::load(data_dir);

    let context = Arc::new(GpuContext::new_headless(args.gpu_power)?);
    tracing::info!(
        adapter = %context.adapter_profile.name,
        backend = ?context.adapter_profile.backend,
        "using GPU adapter"
    );
    let (width, height) = args.size;
    let graphics = WgpuGraphics::new(context, width, height, args.working_space);
    let host = Arc::new(PreviewHost::new(
        args.size,
        args.target_space,
        args.white_level,
    ));

    let filter = OverlayFilter::create(&registry, settings, Arc::clone(&host), graphics)
        .context("failed to create overlay filter")?;
    filter.show();
    filter.activate();

    let interval = frame_interval_ns(args.fps);
    let seconds = interval as f32 / 1_000_000_000.0;
    for frame in 0..args.frames {
        if args.hide_after == Some(frame) {
            tracing::info!(frame, "hiding source");
            host.set_showing(false);
            filter.hide();
        }

        let clock = host.advance(interval);
        filter.tick(seconds);
        filter.graphics().clear(BACKGROUND);
        filter.render();
        tracing::debug!(
            frame,
            clock,
            texture_ready = filter.is_texture_ready(),
            image_frame = ?filter.current_frame(),
            image_loop = ?filter.current_loop(),
            "rendered frame"
        );
    }

    tracing::info!(
        width = filter.width(),
        height = filter.height(),
        memory = filter.memory_usage(),
        color_space = %filter.preferred_color_space(),
        texture_ready = filter.is_texture_ready(),
        "preview finished"
    );

    for missing in filter.missing_files() {
        tracing::warn!(path = %missing.path, "overlay image is missing");
    }

    if let Some(path) = &args.export {
        let image = filter.graphics().read_canvas()?;
        image
            .save(path)
            .with_context(|| format!("failed to write {}", path.display()))?;
        tracing::info!(path = %path.display(), "exported composited frame");
    }

    filter.destroy();
    registry.unload();
    Ok(())
}
