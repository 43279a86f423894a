use std::path::{Path, PathBuf};

use clap::Parser;
use renderer::GpuPowerPreference;
use uvfx::ColorSpace;

#[derive(Parser, Debug)]
#[command(
    name = "uvfx-preview",
    author,
    version,
    about = "Run the UVFX overlay filter offscreen"
)]
pub struct Cli {
    /// Image or animated GIF to overlay. Overrides `file` from `--settings`.
    #[arg(value_name = "IMAGE")]
    pub image: Option<PathBuf>,

    /// Filter settings as TOML (`file`, `unload`, `linear_alpha`).
    #[arg(long, value_name = "FILE")]
    pub settings: Option<PathBuf>,

    /// Size of the filtered source (e.g. `1280x720`).
    #[arg(long, value_name = "WIDTHxHEIGHT", value_parser = parse_size, default_value = "1280x720")]
    pub size: (u32, u32),

    /// Number of frames to tick and render.
    #[arg(long, value_name = "COUNT", default_value_t = 60)]
    pub frames: u32,

    /// Frame rate of the simulated host clock.
    #[arg(long, value_name = "FPS", value_parser = parse_fps, default_value_t = 30.0)]
    pub fps: f32,

    /// SDR white level in nits reported by the host.
    #[arg(long, value_name = "NITS", default_value_t = 300.0)]
    pub white_level: f32,

    /// Colour space of the filtered source: `srgb`, `srgb16f`, `709-extended`, or `709-scrgb`.
    #[arg(long, value_name = "SPACE", default_value = "srgb")]
    pub target_space: ColorSpace,

    /// Colour space of the canvas the filter draws into.
    #[arg(long, value_name = "SPACE", default_value = "srgb")]
    pub working_space: ColorSpace,

    /// Hide the source after this many frames.
    #[arg(long, value_name = "FRAME")]
    pub hide_after: Option<u32>,

    /// Drop the image while the source is hidden.
    #[arg(long)]
    pub unload: bool,

    /// Premultiply alpha in linear light.
    #[arg(long)]
    pub linear_alpha: bool,

    /// Write the last composited frame to this PNG path.
    #[arg(long, value_name = "PATH", value_parser = parse_export_path)]
    pub export: Option<PathBuf>,

    /// Directory holding the effect source. Defaults to the bundled data.
    #[arg(long, value_name = "DIR", env = "UVFX_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// GPU adapter preference: `low` or `high`.
    #[arg(long, value_name = "POWER", value_parser = parse_power, default_value = "low")]
    pub gpu_power: GpuPowerPreference,
}

pub fn parse() -> Cli {
    Cli::parse()
}

pub fn parse_size(value: &str) -> Result<(u32, u32), String> {
    let (w, h) = value
        .trim()
        .split_once(['x', 'X'])
        .ok_or_else(|| "expected WIDTHxHEIGHT".to_string())?;
    let width = w
        .trim()
        .parse::<u32>()
        .map_err(|_| format!("invalid width '{}'", w.trim()))?;
    let height = h
        .trim()
        .parse::<u32>()
        .map_err(|_| format!("invalid height '{}'", h.trim()))?;
    if width == 0 || height == 0 {
        return Err("size must be greater than zero".into());
    }
    Ok((width, height))
}

pub fn parse_fps(value: &str) -> Result<f32, String> {
    let fps = value
        .trim()
        .parse::<f32>()
        .map_err(|_| format!("invalid frame rate '{value}'"))?;
    if !fps.is_finite() || fps <= 0.0 {
        return Err("frame rate must be positive".into());
    }
    Ok(fps)
}

pub fn parse_power(value: &str) -> Result<GpuPowerPreference, String> {
    match value.trim().to_ascii_lowercase().as_str() {
        "low" | "low-power" => Ok(GpuPowerPreference::Low),
        "high" | "high-performance" => Ok(GpuPowerPreference::High),
        other => Err(format!("unknown GPU power preference '{other}'; expected low or high")),
    }
}

pub fn parse_export_path(value: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(value);
    match extension(&path).as_deref() {
        Some("png") => Ok(path),
        None => Err("export path has no extension; expected .png".to_string()),
        Some(other) => Err(format!("unsupported export format '.{other}'; expected .png")),
    }
}

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
}
