use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Luminance reference of scRGB: a channel value of 1.0 maps to 80 nits.
pub const SCRGB_REFERENCE_WHITE_NITS: f32 = 80.0;

/// Colour spaces the filter target is asked to render in, in order of preference.
pub const PREFERRED_TARGET_SPACES: [ColorSpace; 3] = [
    ColorSpace::Srgb,
    ColorSpace::Srgb16F,
    ColorSpace::Rec709Extended,
];

/// Working colour spaces a render target or texture can be tagged with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorSpace {
    /// 8-bit sRGB, standard dynamic range.
    #[default]
    Srgb,
    /// sRGB primaries and transfer stored in half floats.
    Srgb16F,
    /// Rec.709 primaries, linear, values above 1.0 allowed.
    Rec709Extended,
    /// Rec.709 primaries, linear, 1.0 = 80 nits.
    Rec709Scrgb,
}

impl ColorSpace {
    pub const ALL: [ColorSpace; 4] = [
        ColorSpace::Srgb,
        ColorSpace::Srgb16F,
        ColorSpace::Rec709Extended,
        ColorSpace::Rec709Scrgb,
    ];

    /// Returns true for the standard dynamic range spaces.
    pub fn is_sdr(self) -> bool {
        matches!(self, ColorSpace::Srgb | ColorSpace::Srgb16F)
    }

    /// Pixel format a render target in this space is allocated with.
    pub fn format(self) -> ColorFormat {
        match self {
            ColorSpace::Srgb => ColorFormat::Rgba8,
            ColorSpace::Srgb16F | ColorSpace::Rec709Extended | ColorSpace::Rec709Scrgb => {
                ColorFormat::Rgba16Float
            }
        }
    }

    pub(crate) fn to_tag(self) -> u8 {
        match self {
            ColorSpace::Srgb => 0,
            ColorSpace::Srgb16F => 1,
            ColorSpace::Rec709Extended => 2,
            ColorSpace::Rec709Scrgb => 3,
        }
    }

    pub(crate) fn from_tag(tag: u8) -> Self {
        match tag {
            1 => ColorSpace::Srgb16F,
            2 => ColorSpace::Rec709Extended,
            3 => ColorSpace::Rec709Scrgb,
            _ => ColorSpace::Srgb,
        }
    }
}

impl fmt::Display for ColorSpace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColorSpace::Srgb => f.write_str("srgb"),
            ColorSpace::Srgb16F => f.write_str("srgb16f"),
            ColorSpace::Rec709Extended => f.write_str("709-extended"),
            ColorSpace::Rec709Scrgb => f.write_str("709-scrgb"),
        }
    }
}

impl FromStr for ColorSpace {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "srgb" => Ok(ColorSpace::Srgb),
            "srgb16f" | "srgb-16f" | "srgb_16f" => Ok(ColorSpace::Srgb16F),
            "709-extended" | "709_extended" | "extended" => Ok(ColorSpace::Rec709Extended),
            "709-scrgb" | "709_scrgb" | "scrgb" => Ok(ColorSpace::Rec709Scrgb),
            other => Err(format!(
                "unknown colour space '{other}' (expected srgb, srgb16f, 709-extended, or 709-scrgb)"
            )),
        }
    }
}

/// Storage format of a colour target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorFormat {
    Rgba8,
    Rgba16Float,
}

/// Shader technique variants exposed by the overlay effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Technique {
    Draw,
    DrawMultiply,
    DrawTonemap,
    DrawMultiplyTonemap,
}

impl Technique {
    pub const ALL: [Technique; 4] = [
        Technique::Draw,
        Technique::DrawMultiply,
        Technique::DrawTonemap,
        Technique::DrawMultiplyTonemap,
    ];

    /// Technique name as declared in the effect file.
    pub fn name(self) -> &'static str {
        match self {
            Technique::Draw => "Draw",
            Technique::DrawMultiply => "DrawMultiply",
            Technique::DrawTonemap => "DrawTonemap",
            Technique::DrawMultiplyTonemap => "DrawMultiplyTonemap",
        }
    }
}

impl fmt::Display for Technique {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Technique plus the brightness multiplier fed to its `multiplier` parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TechniqueChoice {
    pub technique: Technique,
    pub multiplier: f32,
}

impl TechniqueChoice {
    const PLAIN: Self = Self {
        technique: Technique::Draw,
        multiplier: 1.0,
    };
}

/// Picks the technique used to composite content in `source` space into a
/// render target working in `current` space.
///
/// `sdr_white_level` is the host's reference white in nits. Moving SDR or
/// extended content into scRGB scales up by `white / 80`; moving scRGB content
/// anywhere else scales down by `80 / white`.
pub fn select_technique(
    source: ColorSpace,
    current: ColorSpace,
    sdr_white_level: f32,
) -> TechniqueChoice {
    let into_scrgb = sdr_white_level / SCRGB_REFERENCE_WHITE_NITS;
    let out_of_scrgb = SCRGB_REFERENCE_WHITE_NITS / sdr_white_level;

    match (source, current) {
        (ColorSpace::Srgb | ColorSpace::Srgb16F, ColorSpace::Rec709Scrgb) => TechniqueChoice {
            technique: Technique::DrawMultiply,
            multiplier: into_scrgb,
        },
        (ColorSpace::Srgb | ColorSpace::Srgb16F, _) => TechniqueChoice::PLAIN,
        (ColorSpace::Rec709Extended, ColorSpace::Srgb | ColorSpace::Srgb16F) => TechniqueChoice {
            technique: Technique::DrawTonemap,
            multiplier: 1.0,
        },
        (ColorSpace::Rec709Extended, ColorSpace::Rec709Scrgb) => TechniqueChoice {
            technique: Technique::DrawMultiply,
            multiplier: into_scrgb,
        },
        (ColorSpace::Rec709Extended, ColorSpace::Rec709Extended) => TechniqueChoice::PLAIN,
        (ColorSpace::Rec709Scrgb, ColorSpace::Srgb | ColorSpace::Srgb16F) => TechniqueChoice {
            technique: Technique::DrawMultiplyTonemap,
            multiplier: out_of_scrgb,
        },
        (ColorSpace::Rec709Scrgb, ColorSpace::Rec709Extended) => TechniqueChoice {
            technique: Technique::DrawMultiply,
            multiplier: out_of_scrgb,
        },
        (ColorSpace::Rec709Scrgb, ColorSpace::Rec709Scrgb) => TechniqueChoice::PLAIN,
    }
}
