pub trait MySqlBufMutExt {
    fn put_uint_lenenc(&mut self, v: u64);

    fn put_str_lenenc(&mut self, v: &str);

    fn put_bytes_lenenc(&mut self, v: &[u8]);
}

impl MySqlBufMutExt for Vec<u8> {
    #[allow(clippy::cast_possible_truncation)]
    fn put_uint_lenenc(&mut self, v: u64) {
        // https://dev.mysql.com/doc/internals/en/integer.html
        // https://mariadb.com/kb/en/library/protocol-data-types/#length-encoded-integers

        if v < 251 {
            self.push(v as u8);
        } else if v < 0x1_00_00 {
            self.push(0xfc);
            self.extend_from_slice(&(v as u16).to_le_bytes());
        } else if v < 0x1_00_00_00 {
            self.push(0xfd);
            self.extend_from_slice(&(v as u32).to_le_bytes()[..3]);
        } else {
            self.push(0xfe);
            self.extend_from_slice(&v.to_le_bytes());
        }
    }

    fn put_str_lenenc(&mut self, v: &str) {
        self.put_bytes_lenenc(v.as_bytes());
    }

    fn put_bytes_lenenc(&mut self, v: &[u8]) {
        self.put_uint_lenenc(v.len() as u64);
        self.extend_from_slice(v);
    }
}
