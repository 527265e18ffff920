use bytes::Buf;
use colcodec_core::io::{BufExt, ShortRead};

pub trait MySqlBufExt<'a>: Buf {
    // Read a length-encoded integer.
    // NOTE: 0xfb or NULL is only returned for binary value encoding to indicate NULL.
    // NOTE: 0xff is only returned during a result set to indicate ERR.
    // <https://dev.mysql.com/doc/internals/en/integer.html#packet-Protocol::LengthEncodedInteger>
    fn get_uint_lenenc(&mut self) -> Result<u64, ShortRead>;

    // Read a length-encoded byte sequence, borrowed from the underlying buffer.
    fn get_bytes_lenenc(&mut self) -> Result<&'a [u8], ShortRead>;
}

impl<'a> MySqlBufExt<'a> for &'a [u8] {
    fn get_uint_lenenc(&mut self) -> Result<u64, ShortRead> {
        Ok(match self.checked_u8()? {
            0xfc => u64::from(self.checked_u16_le()?),
            0xfd => self.checked_uint_le(3)?,
            0xfe => self.checked_uint_le(8)?,

            v => u64::from(v),
        })
    }

    fn get_bytes_lenenc(&mut self) -> Result<&'a [u8], ShortRead> {
        let size = self.get_uint_lenenc()?;
        let remaining = self.len();

        let size = usize::try_from(size)
            .ok()
            .filter(|size| *size <= remaining)
            .ok_or(ShortRead {
                needed: usize::MAX,
                remaining,
            })?;

        let data = *self;
        let (head, tail) = data.split_at(size);
        *self = tail;

        Ok(head)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_reads_lenenc_bytes() {
        let mut buf: &[u8] = &[0x03, b'a', b'b', b'c', 0xff];

        assert_eq!(buf.get_bytes_lenenc().unwrap(), b"abc");
        assert_eq!(buf, [0xff]);
    }

    #[test]
    fn it_borrows_lenenc_bytes_from_the_buffer() {
        let data = vec![0x02, b'h', b'i', 0x01, b'!'];

        let (first, second) = {
            let mut buf = &data[..];
            (buf.get_bytes_lenenc().unwrap(), buf.get_bytes_lenenc().unwrap())
        };

        assert_eq!(first, b"hi");
        assert_eq!(second, b"!");
    }

    #[test]
    fn it_reads_wide_lenenc_ints() {
        let mut buf: &[u8] = &[0xfc, 0x00, 0x01];
        assert_eq!(buf.get_uint_lenenc(), Ok(256));

        let mut buf: &[u8] = &[0xfd, 0x01, 0x00, 0x01];
        assert_eq!(buf.get_uint_lenenc(), Ok(0x01_00_01));
    }

    #[test]
    fn it_rejects_lengths_past_the_end() {
        let mut buf: &[u8] = &[0x05, b'a'];
        assert!(buf.get_bytes_lenenc().is_err());
    }
}
