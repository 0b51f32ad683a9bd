//! In-memory representation of a level's sky
//!
//! A sky is split into sectors. Every sector carries its own vertices, colors and polygons,
//! whose shape depends on the [`SkyFormat`] of the whole record.

use crate::game::SkyFormat;
use anyhow::ensure;
use spyro_utils::{color::Rgbi8, ok, AnyResult};

mod faces;
mod read;
mod records;
mod write;

pub use faces::*;
pub use read::*;
pub use records::*;
pub use write::*;

/// Opaque 8 bytes at the start of every sector header. Possibly visibility/rotation data,
/// kept verbatim.
pub type SectorUnknownData = [u8; 8];

/// Aggregate element counts, either of a single sector or of the whole sky.
///
/// For [`SkyFormat::Spyro23`], `polygon` and `polygon_misc` count bytes rather than records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SkyCounts {
    pub vertex: u64,
    pub color: u64,
    pub polygon: u64,
    pub polygon_misc: u64,
}

impl std::ops::AddAssign for SkyCounts {
    fn add_assign(&mut self, rhs: Self) {
        self.vertex += rhs.vertex;
        self.color += rhs.color;
        self.polygon += rhs.polygon;
        self.polygon_misc += rhs.polygon_misc;
    }
}

/// Position of a sector. On disk, `y` and `z` precede `x`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SkyCoord {
    pub x: i16,
    pub y: i16,
    pub z: i16,
}

/// A raw span of variable width records.
///
/// The span isn't guaranteed to be evenly divided into records. It has to be walked record
/// by record, using the lengths embedded in the records themselves (see [`Spyro23Faces`]).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RawRecordBytes(pub Vec<u8>);

impl RawRecordBytes {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<u8>> for RawRecordBytes {
    fn from(value: Vec<u8>) -> Self {
        Self(value)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Spyro1Geometry {
    pub vertices: Vec<SkyVertex>,
    pub colors: Vec<Rgbi8>,
    pub polygons: Vec<Spyro1Polygon>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Spyro23Geometry {
    pub vertices: Vec<SkyVertex>,
    pub colors: Vec<Rgbi8>,
    /// Packed [`Spyro23Polygon`] heads
    pub polygons: RawRecordBytes,
    /// Misc records, one per polygon, sized by the polygon's `misc_count`
    pub polygons_misc: RawRecordBytes,
}

impl Spyro23Geometry {
    /// Walks the polygons together with their misc records.
    pub fn faces(&self) -> Spyro23Faces<'_> {
        Spyro23Faces::new(self.polygons.as_bytes(), self.polygons_misc.as_bytes())
    }
}

/// Per-sector geometry, shaped by the record's [`SkyFormat`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SectorGeometry {
    Spyro1(Spyro1Geometry),
    Spyro23(Spyro23Geometry),
}

impl SectorGeometry {
    pub fn format(&self) -> SkyFormat {
        match self {
            SectorGeometry::Spyro1(_) => SkyFormat::Spyro1,
            SectorGeometry::Spyro23(_) => SkyFormat::Spyro23,
        }
    }

    pub fn vertices(&self) -> &[SkyVertex] {
        match self {
            SectorGeometry::Spyro1(g) => &g.vertices,
            SectorGeometry::Spyro23(g) => &g.vertices,
        }
    }

    pub fn colors(&self) -> &[Rgbi8] {
        match self {
            SectorGeometry::Spyro1(g) => &g.colors,
            SectorGeometry::Spyro23(g) => &g.colors,
        }
    }

    /// Misc polygon span. Always `Some` for Spyro 2/3 sectors (possibly empty), `None` for
    /// Spyro 1.
    pub fn polygons_misc(&self) -> Option<&RawRecordBytes> {
        match self {
            SectorGeometry::Spyro1(_) => None,
            SectorGeometry::Spyro23(g) => Some(&g.polygons_misc),
        }
    }

    /// Counts as they'd be stored in the sector header.
    pub fn counts(&self) -> SkyCounts {
        match self {
            SectorGeometry::Spyro1(g) => SkyCounts {
                vertex: g.vertices.len() as u64,
                color: g.colors.len() as u64,
                polygon: g.polygons.len() as u64,
                polygon_misc: 0,
            },
            SectorGeometry::Spyro23(g) => SkyCounts {
                vertex: g.vertices.len() as u64,
                color: g.colors.len() as u64,
                polygon: g.polygons.len() as u64,
                polygon_misc: g.polygons_misc.len() as u64,
            },
        }
    }

    /// Verifies that every count fits the header field it's stored in.
    fn check_header_widths(&self) -> AnyResult {
        let counts = self.counts();
        let (vertex_max, color_max) = match self {
            SectorGeometry::Spyro1(_) => (u64::from(u16::MAX), u64::from(u16::MAX)),
            SectorGeometry::Spyro23(_) => (u64::from(u8::MAX), u64::from(u8::MAX)),
        };

        ensure!(counts.vertex <= vertex_max, "too many vertices in a sector");
        ensure!(counts.color <= color_max, "too many colors in a sector");
        ensure!(counts.polygon <= u64::from(u16::MAX), "too many polygons in a sector");
        ensure!(
            counts.polygon_misc <= u64::from(u16::MAX),
            "misc polygon data of a sector too large"
        );
        ok()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SkySector {
    pub unknown: SectorUnknownData,
    pub coordinate: SkyCoord,
    pub geometry: SectorGeometry,
}

/// A fully decoded sky.
///
/// Sectors are kept in their on-disk order, and the totals always match the sum of every
/// sector's counts.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "SkyRecordRepr")
)]
pub struct SkyRecord {
    format: SkyFormat,
    background: Rgbi8,
    totals: SkyCounts,
    sectors: Vec<SkySector>,
}

/// Deserialized form of a [`SkyRecord`]. Totals are recomputed and every sector is checked
/// while the record is rebuilt.
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct SkyRecordRepr {
    format: SkyFormat,
    background: Rgbi8,
    sectors: Vec<SkySector>,
}

#[cfg(feature = "serde")]
impl TryFrom<SkyRecordRepr> for SkyRecord {
    type Error = anyhow::Error;

    fn try_from(repr: SkyRecordRepr) -> AnyResult<Self> {
        let mut sky = SkyRecord::new(repr.format, repr.background);
        for sector in repr.sectors {
            sky.push_sector(sector)?;
        }
        Ok(sky)
    }
}

impl SkyRecord {
    /// Creates a sky without any sectors.
    pub fn new(format: SkyFormat, background: Rgbi8) -> Self {
        Self {
            format,
            background,
            totals: SkyCounts::default(),
            sectors: Vec::new(),
        }
    }

    pub fn format(&self) -> SkyFormat {
        self.format
    }

    pub fn background(&self) -> Rgbi8 {
        self.background
    }

    pub fn totals(&self) -> SkyCounts {
        self.totals
    }

    pub fn sector_count(&self) -> u32 {
        self.sectors.len() as u32
    }

    pub fn sectors(&self) -> &[SkySector] {
        &self.sectors
    }

    pub fn is_empty(&self) -> bool {
        self.sectors.is_empty()
    }

    /// Appends a sector. Fails if its geometry doesn't match the sky's format, or if any of
    /// its arrays is too large to be stored.
    pub fn push_sector(&mut self, sector: SkySector) -> AnyResult {
        ensure!(
            sector.geometry.format() == self.format,
            "{:?} sector pushed into a {:?} sky",
            sector.geometry.format(),
            self.format
        );
        ensure!(self.sectors.len() < u32::MAX as usize, "too many sectors");
        sector.geometry.check_header_widths()?;

        self.push_sector_unchecked(sector);
        ok()
    }

    pub(crate) fn push_sector_unchecked(&mut self, sector: SkySector) {
        debug_assert_eq!(sector.geometry.format(), self.format);
        self.totals += sector.geometry.counts();
        self.sectors.push(sector);
    }

    pub(crate) fn reserve_sectors(
        &mut self,
        count: usize,
    ) -> Result<(), std::collections::TryReserveError> {
        self.sectors.try_reserve_exact(count)
    }

    /// Frees every sector along with their arrays, and resets the background and totals.
    /// The format is left as is.
    ///
    /// Calling this on an already released (or empty) sky does nothing.
    pub fn release(&mut self) {
        self.sectors = Vec::new();
        self.totals = SkyCounts::default();
        self.background = Rgbi8::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spyro1_sector(vertices: usize, colors: usize, polygons: usize) -> SkySector {
        SkySector {
            unknown: [0; 8],
            coordinate: SkyCoord::default(),
            geometry: SectorGeometry::Spyro1(Spyro1Geometry {
                vertices: vec![SkyVertex::default(); vertices],
                colors: vec![Rgbi8::default(); colors],
                polygons: vec![Spyro1Polygon::default(); polygons],
            }),
        }
    }

    #[test]
    fn totals_follow_pushed_sectors() {
        let mut sky = SkyRecord::new(SkyFormat::Spyro1, Rgbi8::new(1, 2, 3, 4));
        sky.push_sector(spyro1_sector(3, 2, 1)).unwrap();
        sky.push_sector(spyro1_sector(4, 5, 6)).unwrap();

        assert_eq!(sky.sector_count(), 2);
        assert_eq!(
            sky.totals(),
            SkyCounts {
                vertex: 7,
                color: 7,
                polygon: 7,
                polygon_misc: 0
            }
        );
    }

    #[test]
    fn mismatched_geometry_is_rejected() {
        let mut sky = SkyRecord::new(SkyFormat::Spyro23, Rgbi8::default());
        assert!(sky.push_sector(spyro1_sector(1, 1, 1)).is_err());
        assert!(sky.is_empty());
    }

    #[test]
    fn oversized_spyro23_counts_are_rejected() {
        let mut sky = SkyRecord::new(SkyFormat::Spyro23, Rgbi8::default());
        let sector = SkySector {
            unknown: [0; 8],
            coordinate: SkyCoord::default(),
            geometry: SectorGeometry::Spyro23(Spyro23Geometry {
                vertices: vec![SkyVertex::default(); 256],
                ..Default::default()
            }),
        };
        assert!(sky.push_sector(sector).is_err());
        assert_eq!(sky.totals(), SkyCounts::default());
    }

    #[test]
    fn release_is_idempotent() {
        let mut sky = SkyRecord::new(SkyFormat::Spyro1, Rgbi8::new(1, 2, 3, 4));
        sky.push_sector(spyro1_sector(3, 2, 1)).unwrap();

        sky.release();
        assert_eq!(sky.sector_count(), 0);
        assert_eq!(sky.totals(), SkyCounts::default());
        assert_eq!(sky.background(), Rgbi8::default());
        assert_eq!(sky.sectors.capacity(), 0);

        sky.release();
        assert!(sky.is_empty());
        assert_eq!(sky.format(), SkyFormat::Spyro1);
    }

    #[test]
    fn misc_polygons_only_exist_for_spyro23() {
        let spyro1 = spyro1_sector(0, 0, 0);
        assert!(spyro1.geometry.polygons_misc().is_none());

        let spyro23 = SectorGeometry::Spyro23(Spyro23Geometry::default());
        assert_eq!(spyro23.polygons_misc().map(|m| m.len()), Some(0));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn deserialized_skies_are_rebuilt() {
        let mut sky = SkyRecord::new(SkyFormat::Spyro1, Rgbi8::new(1, 2, 3, 4));
        sky.push_sector(spyro1_sector(3, 2, 1)).unwrap();

        let mut value = serde_json::to_value(&sky).unwrap();
        value["totals"]["vertex"] = 999.into();
        let decoded: SkyRecord = serde_json::from_value(value.clone()).unwrap();
        assert_eq!(decoded, sky);

        value["format"] = "Spyro23".into();
        assert!(serde_json::from_value::<SkyRecord>(value).is_err());
    }
}
