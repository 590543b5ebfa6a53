#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use strum::{Display, EnumCount, EnumIter};

/// The hardware generation of an attached display, this decides how its calibration is read.
#[derive(Debug, Default, Copy, Clone, Display, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum DeviceVariant {
    #[default]
    None,
    FirstGen,
    Portrait,
}

/// Each of the values stored in a display's calibration document.
#[derive(Debug, Copy, Clone, Display, EnumIter, EnumCount, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum CalibrationKey {
    Pitch,
    Slope,
    Center,
    ViewCone,
    InvView,
    VerticalAngle,
    Dpi,
    ScreenWidth,
    ScreenHeight,
    FlipImageX,
    FlipImageY,
    FlipSubpixel,
}

impl CalibrationKey {
    // The name this value is stored under in visual.json
    pub fn json_key(&self) -> &'static str {
        match self {
            CalibrationKey::Pitch => "pitch",
            CalibrationKey::Slope => "slope",
            CalibrationKey::Center => "center",
            CalibrationKey::ViewCone => "viewCone",
            CalibrationKey::InvView => "invView",
            CalibrationKey::VerticalAngle => "verticalAngle",
            CalibrationKey::Dpi => "DPI",
            CalibrationKey::ScreenWidth => "screenW",
            CalibrationKey::ScreenHeight => "screenH",
            CalibrationKey::FlipImageX => "flipImageX",
            CalibrationKey::FlipImageY => "flipImageY",
            CalibrationKey::FlipSubpixel => "flipSubp",
        }
    }
}

/// Optical calibration of a display.
///
/// A value of this type is either fully read from a device, or is the all-zero default, there's
/// no state in between.
#[derive(Debug, Default, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Calibration {
    pub pitch: f32,
    pub slope: f32,
    pub center: f32,
    pub view_cone: f32,
    pub inv_view: f32,
    pub vertical_angle: f32,
    pub dpi: f32,
    pub screen_width: f32,
    pub screen_height: f32,
    pub flip_image_x: f32,
    pub flip_image_y: f32,
    pub flip_subpixel: f32,
}

impl Calibration {
    pub fn set(&mut self, key: CalibrationKey, value: f32) {
        let field = match key {
            CalibrationKey::Pitch => &mut self.pitch,
            CalibrationKey::Slope => &mut self.slope,
            CalibrationKey::Center => &mut self.center,
            CalibrationKey::ViewCone => &mut self.view_cone,
            CalibrationKey::InvView => &mut self.inv_view,
            CalibrationKey::VerticalAngle => &mut self.vertical_angle,
            CalibrationKey::Dpi => &mut self.dpi,
            CalibrationKey::ScreenWidth => &mut self.screen_width,
            CalibrationKey::ScreenHeight => &mut self.screen_height,
            CalibrationKey::FlipImageX => &mut self.flip_image_x,
            CalibrationKey::FlipImageY => &mut self.flip_image_y,
            CalibrationKey::FlipSubpixel => &mut self.flip_subpixel,
        };
        *field = value;
    }

    /// True if this is the fallback calibration, rather than one read from a device.
    pub fn is_default(&self) -> bool {
        *self == Calibration::default()
    }
}
