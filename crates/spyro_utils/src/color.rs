use crate::{bits, packed::PackedData, place_bits};
use std::io::{self, Read, Write};

/// A PlayStation style color with an extra intensity channel in place of alpha.
///
/// Stored as a little endian `u32`, with `r` in the lowest byte and the intensity in the
/// highest.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rgbi8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub i: u8,
}

impl Rgbi8 {
    pub const fn new(r: u8, g: u8, b: u8, i: u8) -> Self {
        Self { r, g, b, i }
    }

    #[inline]
    pub const fn from_bits(value: u32) -> Self {
        Self {
            r: bits(value, 0, 8) as u8,
            g: bits(value, 8, 8) as u8,
            b: bits(value, 16, 8) as u8,
            i: bits(value, 24, 8) as u8,
        }
    }

    #[inline]
    pub const fn to_bits(self) -> u32 {
        place_bits(self.r as u32, 0, 8)
            | place_bits(self.g as u32, 8, 8)
            | place_bits(self.b as u32, 16, 8)
            | place_bits(self.i as u32, 24, 8)
    }
}

impl From<u32> for Rgbi8 {
    fn from(value: u32) -> Self {
        Self::from_bits(value)
    }
}

impl From<Rgbi8> for u32 {
    fn from(value: Rgbi8) -> Self {
        value.to_bits()
    }
}

impl PackedData for Rgbi8 {
    fn read_packed<R: Read>(r: &mut R) -> io::Result<Self> {
        Ok(Self::from_bits(u32::read_packed(r)?))
    }

    fn write_packed<W: Write>(&self, w: &mut W) -> io::Result<()> {
        self.to_bits().write_packed(w)
    }
}
