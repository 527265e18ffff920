use bytes::{Buf, Bytes};

/// A read ran past the end of the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("unexpected end of buffer: needed {needed} bytes but only {remaining} remain")]
pub struct ShortRead {
    pub needed: usize,
    pub remaining: usize,
}

/// Bounds-checked reads over any [`Buf`].
///
/// The `get_*` methods on [`Buf`] panic when the buffer is too short. Every read of
/// data that came off the wire goes through these instead.
pub trait BufExt: Buf {
    fn ensure(&self, needed: usize) -> Result<(), ShortRead> {
        let remaining = self.remaining();

        if remaining < needed {
            return Err(ShortRead { needed, remaining });
        }

        Ok(())
    }

    fn checked_u8(&mut self) -> Result<u8, ShortRead> {
        self.ensure(1)?;
        Ok(self.get_u8())
    }

    fn checked_u16_le(&mut self) -> Result<u16, ShortRead> {
        self.ensure(2)?;
        Ok(self.get_u16_le())
    }

    fn checked_u32_le(&mut self) -> Result<u32, ShortRead> {
        self.ensure(4)?;
        Ok(self.get_u32_le())
    }

    fn checked_u32(&mut self, little_endian: bool) -> Result<u32, ShortRead> {
        self.ensure(4)?;

        Ok(if little_endian {
            self.get_u32_le()
        } else {
            self.get_u32()
        })
    }

    fn checked_f64(&mut self, little_endian: bool) -> Result<f64, ShortRead> {
        self.ensure(8)?;

        Ok(if little_endian {
            self.get_f64_le()
        } else {
            self.get_f64()
        })
    }

    // Read an unsigned little-endian integer of `nbytes` (at most 8) bytes.
    fn checked_uint_le(&mut self, nbytes: usize) -> Result<u64, ShortRead> {
        self.ensure(nbytes)?;
        Ok(self.get_uint_le(nbytes))
    }

    // Read a sign-extended little-endian integer of `nbytes` (at most 8) bytes.
    fn checked_int_le(&mut self, nbytes: usize) -> Result<i64, ShortRead> {
        self.ensure(nbytes)?;
        Ok(self.get_int_le(nbytes))
    }

    fn checked_bytes(&mut self, len: usize) -> Result<Bytes, ShortRead> {
        self.ensure(len)?;
        Ok(self.copy_to_bytes(len))
    }
}

impl<B: Buf + ?Sized> BufExt for B {}
