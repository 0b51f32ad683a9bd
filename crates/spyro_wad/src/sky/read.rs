use super::{
    RawRecordBytes, SectorGeometry, SectorUnknownData, SkyCoord, SkyRecord, SkySector,
    Spyro1Geometry, Spyro23Geometry,
};
use crate::game::{SkyFormat, UnknownGameFlags};
use log::{debug, trace};
use spyro_utils::{
    color::Rgbi8,
    packed::{PackedData, PackedReadExt},
};
use std::{
    collections::TryReserveError,
    io::{self, Read, Seek, SeekFrom},
};
use thiserror::Error;

/// Marker following every Spyro 1 sector header. Anything else means the sector table
/// points at garbage.
pub const SPYRO1_SECTOR_MARKER: u32 = 0xFFFF_FFFF;

/// Size of a jump table slot.
const JUMP_SLOT_SIZE: u64 = 4;

#[derive(Debug, Error)]
pub enum SkyReadError {
    #[error("invalid argument: {0}")]
    InvalidArgument(#[from] SkyArgumentError),
    #[error("an I/O error occurred while reading the sky: {0}")]
    IoFailure(#[from] io::Error),
    #[error("couldn't allocate sky data: {0}")]
    AllocationFailure(#[from] TryReserveError),
    #[error("sector {sector} is misaligned (expected marker 0xffffffff, found {found:#010x})")]
    IntegrityFault { sector: u32, found: u32 },
}

/// Why a read was refused before any sky data was touched.
#[derive(Debug, Error)]
pub enum SkyArgumentError {
    #[error(transparent)]
    UnknownGame(#[from] UnknownGameFlags),
    #[error("couldn't determine the stream position: {0}")]
    Unpositioned(#[source] io::Error),
}

impl From<UnknownGameFlags> for SkyReadError {
    fn from(value: UnknownGameFlags) -> Self {
        Self::InvalidArgument(value.into())
    }
}

/// Reads a sky record. The reader must be placed at the first byte of the record.
///
/// Every sector is reached through the jump table following the record header, with offsets
/// relative to the start of the record. Once done, the reader is left right after the jump
/// table slot of the last sector, not after its payload.
///
/// On failure, nothing read so far is returned and the final seek position is unspecified.
pub fn read_sky<R>(r: &mut R, format: SkyFormat) -> Result<SkyRecord, SkyReadError>
where
    R: Read + Seek,
{
    let base = r.stream_position().map_err(|e| {
        debug!("Refusing to read a {format:?} sky: {e}");
        SkyArgumentError::Unpositioned(e)
    })?;

    let (background, sector_count) = read_sky_header(r).map_err(|e| {
        debug!("Failed to read a {format:?} sky header at {base:#x}: {e}");
        e
    })?;
    debug!("Reading a {format:?} sky at {base:#x} with {sector_count} sectors");

    let mut sky = SkyRecord::new(format, background);
    if let Err(e) = read_sectors(r, &mut sky, base, sector_count) {
        debug!(
            "Failed to read a {format:?} sky, releasing {} of {sector_count} sectors: {e}",
            sky.sector_count()
        );
        return Err(e);
    }

    Ok(sky)
}

/// Same as [`read_sky`], except the format is picked from a raw [`GameFlags`](crate::GameFlags)
/// value. An unrecognized selection fails before the reader is touched.
pub fn read_sky_for_game<R>(r: &mut R, game_flags: u32) -> Result<SkyRecord, SkyReadError>
where
    R: Read + Seek,
{
    let format = SkyFormat::try_from(game_flags).map_err(|e| {
        debug!("Refusing to read a sky: {e}");
        e
    })?;
    read_sky(r, format)
}

fn read_sky_header<R>(r: &mut R) -> Result<(Rgbi8, u32), SkyReadError>
where
    R: Read + Seek,
{
    // Total record size, nothing here needs it
    r.seek(SeekFrom::Current(4))?;
    let background = r.read_packed()?;
    let sector_count = r.read_packed()?;
    Ok((background, sector_count))
}

fn read_sectors<R>(
    r: &mut R,
    sky: &mut SkyRecord,
    base: u64,
    sector_count: u32,
) -> Result<(), SkyReadError>
where
    R: Read + Seek,
{
    let format = sky.format();
    sky.reserve_sectors(sector_count as usize)?;

    for index in 0..sector_count {
        let slot = r.stream_position()?;
        let offset: u32 = r.read_packed()?;
        r.seek(SeekFrom::Start(base + offset as u64))?;

        let sector = read_sector(r, format, index)?;
        trace!(
            "Read sky sector {} of {sector_count} ({:?})",
            index + 1,
            sector.geometry.counts()
        );
        sky.push_sector_unchecked(sector);

        r.seek(SeekFrom::Start(slot + JUMP_SLOT_SIZE))?;
    }

    Ok(())
}

fn read_sector<R: Read>(
    r: &mut R,
    format: SkyFormat,
    index: u32,
) -> Result<SkySector, SkyReadError> {
    let unknown: SectorUnknownData = r.read_packed()?;
    let y: i16 = r.read_packed()?;
    let z: i16 = r.read_packed()?;

    let (x, geometry) = match format {
        SkyFormat::Spyro1 => {
            let vertex_count: u16 = r.read_packed()?;
            let x: i16 = r.read_packed()?;
            let polygon_count: u16 = r.read_packed()?;
            let color_count: u16 = r.read_packed()?;

            let marker: u32 = r.read_packed()?;
            if marker != SPYRO1_SECTOR_MARKER {
                return Err(SkyReadError::IntegrityFault {
                    sector: index,
                    found: marker,
                });
            }

            let geometry = Spyro1Geometry {
                vertices: read_array(r, vertex_count.into())?,
                colors: read_array(r, color_count.into())?,
                polygons: read_array(r, polygon_count.into())?,
            };
            (x, SectorGeometry::Spyro1(geometry))
        }
        SkyFormat::Spyro23 => {
            let vertex_count: u8 = r.read_packed()?;
            let color_count: u8 = r.read_packed()?;
            let x: i16 = r.read_packed()?;
            let polygon_size: u16 = r.read_packed()?;
            let polygon_misc_size: u16 = r.read_packed()?;

            let geometry = Spyro23Geometry {
                vertices: read_array(r, vertex_count.into())?,
                colors: read_array(r, color_count.into())?,
                polygons: read_raw_records(r, polygon_size.into())?,
                polygons_misc: read_raw_records(r, polygon_misc_size.into())?,
            };
            (x, SectorGeometry::Spyro23(geometry))
        }
    };

    Ok(SkySector {
        unknown,
        coordinate: SkyCoord { x, y, z },
        geometry,
    })
}

fn read_array<T, R>(r: &mut R, count: usize) -> Result<Vec<T>, SkyReadError>
where
    T: PackedData,
    R: Read,
{
    let mut result = Vec::new();
    result.try_reserve_exact(count)?;
    for _ in 0..count {
        result.push(T::read_packed(r)?);
    }
    Ok(result)
}

fn read_raw_records<R: Read>(r: &mut R, size: usize) -> Result<RawRecordBytes, SkyReadError> {
    let mut result = Vec::new();
    result.try_reserve_exact(size)?;
    result.resize(size, 0);
    r.read_exact(&mut result)?;
    Ok(RawRecordBytes(result))
}
