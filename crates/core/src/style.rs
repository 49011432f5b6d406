use std::str::FromStr;

use palette::{Srgb, Srgba};
use serde::Deserialize;

/// Circle marker appearance, in screen space.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(try_from = "MarkerStyleSpec")]
pub struct MarkerStyle {
    pub radius_px: f32,
    pub fill: Srgba<f32>,
    pub stroke: Srgba<f32>,
    pub stroke_width_px: f32,
}

impl MarkerStyle {
    /// Default marker for every station
    pub fn station() -> Self {
        Self::solid(hex(0x33, 0x88, 0xff), 0.8, 4.0).with_stroke(1.0, hex(0x33, 0x88, 0xff))
    }

    /// Marker for a station shown on its own after a search
    pub fn highlighted() -> Self {
        Self::solid(hex(0xe5, 0x3e, 0x3e), 0.9, 8.0).with_stroke(2.0, hex(0xff, 0xff, 0xff))
    }

    pub fn solid(color: Srgb<f32>, opacity: f32, radius_px: f32) -> Self {
        Self {
            radius_px,
            fill: Srgba::new(color.red, color.green, color.blue, opacity),
            stroke: Srgba::new(0.0, 0.0, 0.0, 0.0),
            stroke_width_px: 0.0,
        }
    }

    pub fn with_stroke(mut self, width_px: f32, color: Srgb<f32>) -> Self {
        self.stroke = Srgba::new(color.red, color.green, color.blue, 1.0);
        self.stroke_width_px = width_px;
        self
    }
}

fn hex(r: u8, g: u8, b: u8) -> Srgb<f32> {
    Srgb::new(r, g, b).into_format()
}

#[derive(Deserialize)]
struct MarkerStyleSpec {
    radius_px: f32,
    fill: String,
    #[serde(default = "opaque")]
    fill_opacity: f32,
    #[serde(default)]
    stroke: Option<String>,
    #[serde(default)]
    stroke_width_px: f32,
}

fn opaque() -> f32 {
    1.0
}

impl TryFrom<MarkerStyleSpec> for MarkerStyle {
    type Error = palette::rgb::FromHexError;

    fn try_from(spec: MarkerStyleSpec) -> Result<Self, Self::Error> {
        let fill = Srgb::<u8>::from_str(&spec.fill)?.into_format();
        let style = Self::solid(fill, spec.fill_opacity.clamp(0.0, 1.0), spec.radius_px.max(0.0));
        Ok(match spec.stroke {
            Some(stroke) => {
                style.with_stroke(spec.stroke_width_px, Srgb::<u8>::from_str(&stroke)?.into_format())
            }
            None => style,
        })
    }
}
