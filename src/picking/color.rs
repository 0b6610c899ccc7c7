use std::{fmt, str::FromStr};

use bytemuck::{Pod, Zeroable};
use shrinkwraprs::Shrinkwrap;

use super::PickingError;

/// Identity of a pickable object: the RGB triple it is drawn with in the picking target.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Shrinkwrap)]
pub struct ColorKey(pub [u8; 3]);

impl ColorKey {
    /// Reserved for "no object".
    pub const NONE: ColorKey = ColorKey([0, 0, 0]);

    /// Largest index a key can encode.
    pub const MAX_INDEX: u32 = 0x00ff_ffff;

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self([r, g, b])
    }

    #[inline(always)]
    pub fn is_none(&self) -> bool {
        *self == Self::NONE
    }

    /// Packs `index` as `0xRRGGBB`. Index zero is the reserved key.
    pub fn from_index(index: u32) -> Option<Self> {
        if index > Self::MAX_INDEX {
            return None;
        }
        let [_, r, g, b] = index.to_be_bytes();
        Some(Self([r, g, b]))
    }

    pub fn index(&self) -> u32 {
        let [r, g, b] = self.0;
        u32::from_be_bytes([0, r, g, b])
    }
}

impl fmt::Display for ColorKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b] = self.0;
        write!(f, "{r}_{g}_{b}")
    }
}

impl FromStr for ColorKey {
    type Err = PickingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || PickingError::InvalidKey(s.to_owned());

        let mut channels = s.split('_').map(|c| c.parse::<u8>().map_err(|_| invalid()));
        let key = [
            channels.next().ok_or_else(invalid)??,
            channels.next().ok_or_else(invalid)??,
            channels.next().ok_or_else(invalid)??,
        ];
        if channels.next().is_some() {
            return Err(invalid());
        }

        Ok(Self(key))
    }
}

/// One RGBA8 texel of the picking target, laid out for direct readback.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Pod, Zeroable)]
pub struct PickingColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl PickingColor {
    /// Alpha is ignored when decoding.
    pub fn key(&self) -> ColorKey {
        ColorKey([self.r, self.g, self.b])
    }
}

impl From<ColorKey> for PickingColor {
    fn from(ColorKey([r, g, b]): ColorKey) -> Self {
        Self { r, g, b, a: 255 }
    }
}
