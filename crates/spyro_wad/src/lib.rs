//! Reading and writing of the sky records stored in Spyro the Dragon level WADs.
//!
//! The crate doesn't know how to navigate a WAD by itself. The caller positions a
//! [`Read`](std::io::Read) + [`Seek`](std::io::Seek) stream at the first byte of a sky record
//! and picks the [`SkyFormat`] matching the game the WAD comes from.
//!
//! ```
//! use spyro_wad::{read_sky, write_sky, SkyFormat, SkyRecord};
//! use spyro_utils::color::Rgbi8;
//! use std::io::Cursor;
//!
//! let sky = SkyRecord::new(SkyFormat::Spyro1, Rgbi8::new(10, 20, 30, 0));
//! let mut cursor = Cursor::new(Vec::new());
//! write_sky(&mut cursor, &sky).unwrap();
//!
//! cursor.set_position(0);
//! let decoded = read_sky(&mut cursor, SkyFormat::Spyro1).unwrap();
//! assert_eq!(decoded, sky);
//! ```

pub mod game;
pub mod sky;

pub use game::{GameFlags, GameTitle, SkyFormat};
pub use sky::*;
