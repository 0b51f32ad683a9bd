//! Various utilities shared by the Spyro WAD crates

pub mod color;
pub mod packed;

pub type AnyResult<T = (), E = anyhow::Error> = anyhow::Result<T, E>;

/// Shorthand for `Ok(())`, cause it looks ugly
pub const fn ok<E>() -> Result<(), E> {
    Ok(())
}

/// Extracts `width` bits of `value`, starting at bit `shift` (bit 0 being the least significant).
///
/// ```
/// use spyro_utils::bits;
/// assert_eq!(bits(0b1011_0000, 4, 3), 0b011);
/// ```
#[inline]
pub const fn bits(value: u32, shift: u32, width: u32) -> u32 {
    (value >> shift) & ((1 << width) - 1)
}

/// Inverse of [`bits`]. Any bits of `field` above `width` are discarded.
///
/// ```
/// use spyro_utils::place_bits;
/// assert_eq!(place_bits(0b1111, 4, 3), 0b111_0000);
/// ```
#[inline]
pub const fn place_bits(field: u32, shift: u32, width: u32) -> u32 {
    (field & ((1 << width) - 1)) << shift
}
