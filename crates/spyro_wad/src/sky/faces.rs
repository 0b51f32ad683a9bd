use super::{Spyro23MiscEntry, Spyro23Polygon};
use byteorder::{ByteOrder, LE};

/// Size of the fixed part of a misc record, preceding its entries.
const MISC_HEAD_SIZE: usize = 2;

/// A Spyro 2/3 polygon, joined with its misc record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Spyro23Face<'a> {
    pub polygon: Spyro23Polygon,
    pub second_vertex: u8,
    pub third_vertex: u8,
    entries: &'a [u8],
}

impl<'a> Spyro23Face<'a> {
    pub fn vertex_indices(&self) -> [u8; 3] {
        [
            self.polygon.first_vertex,
            self.second_vertex,
            self.third_vertex,
        ]
    }

    /// Additional vertices of the polygon, `polygon.misc_count` of them.
    pub fn misc_entries(&self) -> impl Iterator<Item = Spyro23MiscEntry> + 'a {
        self.entries
            .chunks_exact(Spyro23MiscEntry::SIZE)
            .map(|chunk| Spyro23MiscEntry::from_bits(LE::read_u16(chunk)))
    }
}

/// Iterator over the faces of a Spyro 2/3 sector.
///
/// Polygon heads are read from the polygon span 4 bytes at a time. Each one owns a misc
/// record in the misc span: second and third vertex index, followed by `misc_count` entries.
///
/// Iteration ends once either span runs out. Leftovers that don't form a complete record
/// are left in place and can be inspected through [`Self::trailing_polygon_bytes`] and
/// [`Self::trailing_misc_bytes`].
#[derive(Debug, Clone)]
pub struct Spyro23Faces<'a> {
    polygons: &'a [u8],
    misc: &'a [u8],
}

impl<'a> Spyro23Faces<'a> {
    pub fn new(polygons: &'a [u8], misc: &'a [u8]) -> Self {
        Self { polygons, misc }
    }

    pub fn trailing_polygon_bytes(&self) -> usize {
        self.polygons.len()
    }

    pub fn trailing_misc_bytes(&self) -> usize {
        self.misc.len()
    }
}

impl<'a> Iterator for Spyro23Faces<'a> {
    type Item = Spyro23Face<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.polygons.len() < Spyro23Polygon::SIZE {
            return None;
        }

        let polygon = Spyro23Polygon::from_bits(LE::read_u32(self.polygons));
        let misc_size = MISC_HEAD_SIZE + polygon.misc_count as usize * Spyro23MiscEntry::SIZE;
        if self.misc.len() < misc_size {
            return None;
        }

        let (record, misc) = self.misc.split_at(misc_size);
        self.polygons = &self.polygons[Spyro23Polygon::SIZE..];
        self.misc = misc;

        Some(Spyro23Face {
            polygon,
            second_vertex: record[0],
            third_vertex: record[1],
            entries: &record[MISC_HEAD_SIZE..],
        })
    }
}
