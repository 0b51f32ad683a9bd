//! Game and sky format selection

use bitflags::bitflags;
use thiserror::Error;

bitflags! {
    /// Bit-set of game releases, as carried around by older tooling. A valid selection names
    /// either Spyro 1 alone, or any combination of Spyro 2 and 3.
    pub struct GameFlags: u32 {
        const S1_FULL = 1 << 0;
        const S2_FULL = 1 << 1;
        const S3_FULL = 1 << 2;
    }
}

/// Returned when a raw game selector doesn't name exactly one sky format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("unrecognized game selection {0:#x}")]
pub struct UnknownGameFlags(pub u32);

/// The game a WAD was taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GameTitle {
    Spyro1,
    Spyro2,
    Spyro3,
}

impl GameTitle {
    /// Sky record layout used by this game. Spyro 2 and 3 share one.
    pub const fn format(self) -> SkyFormat {
        match self {
            GameTitle::Spyro1 => SkyFormat::Spyro1,
            GameTitle::Spyro2 | GameTitle::Spyro3 => SkyFormat::Spyro23,
        }
    }

    pub const fn flag(self) -> GameFlags {
        match self {
            GameTitle::Spyro1 => GameFlags::S1_FULL,
            GameTitle::Spyro2 => GameFlags::S2_FULL,
            GameTitle::Spyro3 => GameFlags::S3_FULL,
        }
    }
}

/// Layout family of a sky record.
///
/// The two families differ in the sector header (count widths, the Spyro 1 alignment marker)
/// and in how polygons are stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SkyFormat {
    /// Spyro the Dragon. Fixed size, 8 byte polygons.
    Spyro1,
    /// Ripto's Rage and Year of the Dragon. Polygons are stored as raw, self-describing
    /// byte spans.
    Spyro23,
}

impl SkyFormat {
    /// Resolves a legacy game bit-set. Returns `None` for an empty set, and for a set mixing
    /// Spyro 1 with the later games.
    pub fn from_game_flags(flags: GameFlags) -> Option<Self> {
        let later = GameFlags::S2_FULL | GameFlags::S3_FULL;
        if flags == GameFlags::S1_FULL {
            Some(SkyFormat::Spyro1)
        } else if !flags.is_empty() && later.contains(flags) {
            Some(SkyFormat::Spyro23)
        } else {
            None
        }
    }
}

impl From<GameTitle> for SkyFormat {
    fn from(value: GameTitle) -> Self {
        value.format()
    }
}

impl TryFrom<u32> for SkyFormat {
    type Error = UnknownGameFlags;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        GameFlags::from_bits(value)
            .and_then(SkyFormat::from_game_flags)
            .ok_or(UnknownGameFlags(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn titles_map_to_formats() {
        assert_eq!(GameTitle::Spyro1.format(), SkyFormat::Spyro1);
        assert_eq!(GameTitle::Spyro2.format(), SkyFormat::Spyro23);
        assert_eq!(GameTitle::Spyro3.format(), SkyFormat::Spyro23);

        for title in [GameTitle::Spyro1, GameTitle::Spyro2, GameTitle::Spyro3] {
            assert_eq!(SkyFormat::try_from(title.flag().bits()), Ok(title.format()));
        }
    }

    #[test]
    fn raw_selectors() {
        assert_eq!(SkyFormat::try_from(0b110u32), Ok(SkyFormat::Spyro23));
        assert_eq!(SkyFormat::try_from(0u32), Err(UnknownGameFlags(0)));
        assert_eq!(SkyFormat::try_from(0b011u32), Err(UnknownGameFlags(0b011)));
        assert_eq!(SkyFormat::try_from(0b1000u32), Err(UnknownGameFlags(0b1000)));
        assert_eq!(SkyFormat::try_from(u32::MAX), Err(UnknownGameFlags(u32::MAX)));
    }
}
