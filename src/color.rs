use eframe::egui::{Color32, Rgba};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use crate::error::SpinError;

/// Amount the rim of a segment is darkened relative to its center.
pub const RIM_SHADE: i16 = -30;

pub const PALETTE: [ItemColor; 8] = [
    ItemColor::new(0xef, 0x44, 0x44), // red
    ItemColor::new(0xf5, 0x9e, 0x0b), // amber
    ItemColor::new(0x10, 0xb9, 0x81), // emerald
    ItemColor::new(0x3b, 0x82, 0xf6), // blue
    ItemColor::new(0x8b, 0x5c, 0xf6), // violet
    ItemColor::new(0xec, 0x48, 0x99), // pink
    ItemColor::new(0x06, 0xb6, 0xd4), // cyan
    ItemColor::new(0xf9, 0x73, 0x16), // orange
];

/// Display color attached to an item. The wheel core never looks inside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ItemColor {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl ItemColor {
    pub const fn new(red: u8, green: u8, blue: u8) -> ItemColor {
        ItemColor { red, green, blue }
    }

    pub fn palette(index: usize) -> ItemColor {
        PALETTE[index % PALETTE.len()]
    }

    /// Adds `amount` to every channel, saturating at 0 and 255.
    pub fn shade(&self, amount: i16) -> ItemColor {
        let adjust = |channel: u8| (channel as i16 + amount).clamp(0, 255) as u8;
        ItemColor {
            red: adjust(self.red),
            green: adjust(self.green),
            blue: adjust(self.blue),
        }
    }

    pub fn iter(&self) -> std::array::IntoIter<u8, 3> {
        [self.red, self.green, self.blue].into_iter()
    }
}

impl FromStr for ItemColor {
    type Err = SpinError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(SpinError::InvalidColor(s.to_string()));
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16).map_err(|_| SpinError::InvalidColor(s.to_string()))
        };
        Ok(ItemColor {
            red: channel(0..2)?,
            green: channel(2..4)?,
            blue: channel(4..6)?,
        })
    }
}

impl Display for ItemColor {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.red, self.green, self.blue)
    }
}

impl TryFrom<String> for ItemColor {
    type Error = SpinError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ItemColor> for String {
    fn from(color: ItemColor) -> Self {
        color.to_string()
    }
}

impl From<ItemColor> for Color32 {
    fn from(color: ItemColor) -> Color32 {
        Color32::from_rgb(color.red, color.green, color.blue)
    }
}

impl From<Color32> for ItemColor {
    fn from(color: Color32) -> ItemColor {
        ItemColor::new(color.r(), color.g(), color.b())
    }
}

pub fn contrast_color(color: impl Into<Rgba>) -> Color32 {
    if color.into().intensity() < 0.5 {
        Color32::WHITE
    } else {
        Color32::BLACK
    }
}
