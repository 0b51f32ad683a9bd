use super::{SectorGeometry, SkyRecord, SkySector};
use crate::game::SkyFormat;
use anyhow::ensure;
use spyro_utils::{ok, packed::PackedWriteExt, AnyResult};
use std::io::{Seek, SeekFrom, Write};

/// Writes a sky record, in the layout expected by [`read_sky`](super::read_sky).
///
/// The header is followed by the jump table, and then by every sector payload in order.
/// The leading size field covers everything after itself. The writer ends up at the end of
/// the record.
pub fn write_sky<W: Write + Seek>(w: &mut W, sky: &SkyRecord) -> AnyResult {
    let base = w.stream_position()?;

    // Size gets filled in once everything else is written
    w.write_packed(&0u32)?;
    w.write_packed(&sky.background())?;
    w.write_packed(&sky.sector_count())?;

    let table_start = w.stream_position()?;
    for _ in sky.sectors() {
        w.write_packed(&0u32)?;
    }

    for (index, sector) in sky.sectors().iter().enumerate() {
        let payload_start = w.stream_position()?;
        let offset = u32::try_from(payload_start - base)?;

        w.seek(SeekFrom::Start(table_start + index as u64 * 4))?;
        w.write_packed(&offset)?;
        w.seek(SeekFrom::Start(payload_start))?;

        write_sector(w, sky.format(), sector)?;
    }

    let end = w.stream_position()?;
    let size = end - base - 4;
    ensure!(size <= u64::from(u32::MAX), "sky record too large");

    w.seek(SeekFrom::Start(base))?;
    w.write_packed(&(size as u32))?;
    w.seek(SeekFrom::Start(end))?;

    ok()
}

fn write_sector<W: Write>(w: &mut W, format: SkyFormat, sector: &SkySector) -> AnyResult {
    let SkySector {
        unknown,
        coordinate,
        geometry,
    } = sector;
    ensure!(
        geometry.format() == format,
        "{:?} sector found in a {:?} sky",
        geometry.format(),
        format
    );

    w.write_packed(unknown)?;
    w.write_packed(&coordinate.y)?;
    w.write_packed(&coordinate.z)?;

    match geometry {
        SectorGeometry::Spyro1(g) => {
            w.write_packed(&u16::try_from(g.vertices.len())?)?;
            w.write_packed(&coordinate.x)?;
            w.write_packed(&u16::try_from(g.polygons.len())?)?;
            w.write_packed(&u16::try_from(g.colors.len())?)?;
            w.write_packed(&super::SPYRO1_SECTOR_MARKER)?;

            for vertex in &g.vertices {
                w.write_packed(vertex)?;
            }
            for color in &g.colors {
                w.write_packed(color)?;
            }
            for polygon in &g.polygons {
                w.write_packed(polygon)?;
            }
        }
        SectorGeometry::Spyro23(g) => {
            w.write_packed(&u8::try_from(g.vertices.len())?)?;
            w.write_packed(&u8::try_from(g.colors.len())?)?;
            w.write_packed(&coordinate.x)?;
            w.write_packed(&u16::try_from(g.polygons.len())?)?;
            w.write_packed(&u16::try_from(g.polygons_misc.len())?)?;

            for vertex in &g.vertices {
                w.write_packed(vertex)?;
            }
            for color in &g.colors {
                w.write_packed(color)?;
            }
            w.write_all(g.polygons.as_bytes())?;
            w.write_all(g.polygons_misc.as_bytes())?;
        }
    }

    ok()
}
