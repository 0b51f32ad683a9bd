//! Packed sky records
//!
//! Every record is a little endian machine word with its fields laid out by explicit shifts.
//! Bit 0 is the least significant bit of the word.

use spyro_utils::{bits, packed::PackedData, place_bits};
use std::io::{self, Read, Write};

/// Sky vertex, packed into a `u32`: `z` in bits 0-9, `y` in bits 10-20, `x` in bits 21-31.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SkyVertex {
    /// 11 bits
    pub x: u16,
    /// 11 bits
    pub y: u16,
    /// 10 bits
    pub z: u16,
}

impl SkyVertex {
    pub const fn new(x: u16, y: u16, z: u16) -> Self {
        Self { x, y, z }
    }

    pub const fn from_bits(value: u32) -> Self {
        Self {
            z: bits(value, 0, 10) as u16,
            y: bits(value, 10, 11) as u16,
            x: bits(value, 21, 11) as u16,
        }
    }

    /// Packs the vertex. Out of range components are truncated to their field width.
    pub const fn to_bits(self) -> u32 {
        place_bits(self.z as u32, 0, 10)
            | place_bits(self.y as u32, 10, 11)
            | place_bits(self.x as u32, 21, 11)
    }
}

/// Three 10-bit indices packed into a `u32`. Bits 0-1 are unused, followed by the first,
/// second and third index.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IndexTriple {
    pub first: u16,
    pub second: u16,
    pub third: u16,
}

impl IndexTriple {
    pub const fn new(first: u16, second: u16, third: u16) -> Self {
        Self {
            first,
            second,
            third,
        }
    }

    pub const fn from_bits(value: u32) -> Self {
        Self {
            first: bits(value, 2, 10) as u16,
            second: bits(value, 12, 10) as u16,
            third: bits(value, 22, 10) as u16,
        }
    }

    /// Packs the indices, leaving the two unused bits cleared.
    pub const fn to_bits(self) -> u32 {
        place_bits(self.first as u32, 2, 10)
            | place_bits(self.second as u32, 12, 10)
            | place_bits(self.third as u32, 22, 10)
    }

    pub const fn to_array(self) -> [u16; 3] {
        [self.first, self.second, self.third]
    }
}

/// Spyro 1 sky triangle, 8 bytes. Indexes into its sector's vertex and color arrays.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Spyro1Polygon {
    pub vertices: IndexTriple,
    pub colors: IndexTriple,
}

/// Head of a Spyro 2/3 sky polygon, packed into a `u32`.
///
/// Bits 0-2 hold the amount of [`Spyro23MiscEntry`] values in the polygon's misc record,
/// followed by three 7-bit color indices and the 8-bit index of the first vertex.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Spyro23Polygon {
    /// 3 bits
    pub misc_count: u8,
    /// 7 bits each
    pub colors: [u8; 3],
    pub first_vertex: u8,
}

impl Spyro23Polygon {
    pub const SIZE: usize = 4;

    pub const fn from_bits(value: u32) -> Self {
        Self {
            misc_count: bits(value, 0, 3) as u8,
            colors: [
                bits(value, 3, 7) as u8,
                bits(value, 10, 7) as u8,
                bits(value, 17, 7) as u8,
            ],
            first_vertex: bits(value, 24, 8) as u8,
        }
    }

    pub const fn to_bits(self) -> u32 {
        place_bits(self.misc_count as u32, 0, 3)
            | place_bits(self.colors[0] as u32, 3, 7)
            | place_bits(self.colors[1] as u32, 10, 7)
            | place_bits(self.colors[2] as u32, 17, 7)
            | place_bits(self.first_vertex as u32, 24, 8)
    }
}

/// One extra vertex of a Spyro 2/3 polygon, packed into a `u16`: vertex index in bits 0-7,
/// color index in bits 8-14, and the "middle vertex" flag in bit 15.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Spyro23MiscEntry {
    pub vertex: u8,
    /// 7 bits
    pub color: u8,
    pub vertex_middle: bool,
}

impl Spyro23MiscEntry {
    pub const SIZE: usize = 2;

    pub const fn from_bits(value: u16) -> Self {
        let value = value as u32;
        Self {
            vertex: bits(value, 0, 8) as u8,
            color: bits(value, 8, 7) as u8,
            vertex_middle: bits(value, 15, 1) != 0,
        }
    }

    pub const fn to_bits(self) -> u16 {
        (place_bits(self.vertex as u32, 0, 8)
            | place_bits(self.color as u32, 8, 7)
            | place_bits(self.vertex_middle as u32, 15, 1)) as u16
    }
}

macro_rules! impl_packed_word {
    ($type:ty, $word:ty) => {
        impl PackedData for $type {
            fn read_packed<R: Read>(r: &mut R) -> io::Result<Self> {
                Ok(Self::from_bits(<$word>::read_packed(r)?))
            }

            fn write_packed<W: Write>(&self, w: &mut W) -> io::Result<()> {
                self.to_bits().write_packed(w)
            }
        }
    };
}

impl_packed_word!(SkyVertex, u32);
impl_packed_word!(IndexTriple, u32);
impl_packed_word!(Spyro23Polygon, u32);
impl_packed_word!(Spyro23MiscEntry, u16);

impl PackedData for Spyro1Polygon {
    fn read_packed<R: Read>(r: &mut R) -> io::Result<Self> {
        Ok(Self {
            vertices: IndexTriple::read_packed(r)?,
            colors: IndexTriple::read_packed(r)?,
        })
    }

    fn write_packed<W: Write>(&self, w: &mut W) -> io::Result<()> {
        self.vertices.write_packed(w)?;
        self.colors.write_packed(w)
    }
}
