use byteorder::{ReadBytesExt, WriteBytesExt, LE};
use std::io::{self, Read, Write};

/// Special trait for reading packed data, always assumed to be little endian.
///
/// Failures are plain [`io::Error`]s, which lets decoders tell stream faults apart from
/// their own data validation errors.
pub trait PackedData: Sized + Clone {
    fn read_packed<R: Read>(r: &mut R) -> io::Result<Self>;
    fn write_packed<W: Write>(&self, w: &mut W) -> io::Result<()>;
}

impl<const N: usize> PackedData for [u8; N] {
    fn read_packed<R: Read>(r: &mut R) -> io::Result<Self> {
        let mut result = [0; N];
        r.read_exact(&mut result)?;
        Ok(result)
    }

    fn write_packed<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_all(self)
    }
}

macro_rules! impl_data {
    ($type:ty, $r:ident, $reader:expr, $w:ident, $self:ident, $writer:expr) => {
        impl PackedData for $type {
            fn read_packed<R: Read>($r: &mut R) -> io::Result<Self> {
                Ok($reader)
            }

            fn write_packed<W: Write>(&self, $w: &mut W) -> io::Result<()> {
                let $self = self;
                $writer;
                Ok(())
            }
        }
    };
}

impl_data!(u8, r, r.read_u8()?, w, value, w.write_u8(*value)?);
impl_data!(i8, r, r.read_i8()?, w, value, w.write_i8(*value)?);
impl_data!(
    u16,
    r,
    r.read_u16::<LE>()?,
    w,
    value,
    w.write_u16::<LE>(*value)?
);
impl_data!(
    i16,
    r,
    r.read_i16::<LE>()?,
    w,
    value,
    w.write_i16::<LE>(*value)?
);
impl_data!(
    u32,
    r,
    r.read_u32::<LE>()?,
    w,
    value,
    w.write_u32::<LE>(*value)?
);
impl_data!(
    i32,
    r,
    r.read_i32::<LE>()?,
    w,
    value,
    w.write_i32::<LE>(*value)?
);

/// Trait with a `write_packed` wrapper method for any [`Write`] type, purely for clarity.
pub trait PackedWriteExt {
    /// Writes the specified [`PackedData`] object into this stream.
    fn write_packed(&mut self, t: &impl PackedData) -> io::Result<()>;
}

impl<T: Write> PackedWriteExt for T {
    fn write_packed(&mut self, t: &impl PackedData) -> io::Result<()> {
        t.write_packed(self)
    }
}

/// Trait with a `read_packed` wrapper method for any [`Read`] type, purely for clarity.
pub trait PackedReadExt {
    /// Reads the specified [`PackedData`] type from this stream.
    fn read_packed<T: PackedData>(&mut self) -> io::Result<T>;
}

impl<T: Read> PackedReadExt for T {
    fn read_packed<R: PackedData>(&mut self) -> io::Result<R> {
        R::read_packed(self)
    }
}
