use std::io::{self, Read, Seek, SeekFrom};

pub struct LittleEndianReader<R> {
    inner: R,
}

impl<R: Read + Seek> LittleEndianReader<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    pub fn read_u8(&mut self) -> io::Result<u8> {
        let mut buf = [0u8; 1];
        self.inner.read_exact(&mut buf)?;
        Ok(buf[0])
    }

    pub fn read_u16(&mut self) -> io::Result<u16> {
        let mut buf = [0u8; 2];
        self.inner.read_exact(&mut buf)?;
        Ok(u16::from_le_bytes(buf))
    }

    pub fn read_i32(&mut self) -> io::Result<i32> {
        let mut buf = [0u8; 4];
        self.inner.read_exact(&mut buf)?;
        Ok(i32::from_le_bytes(buf))
    }

    pub fn read_u32(&mut self) -> io::Result<u32> {
        let mut buf = [0u8; 4];
        self.inner.read_exact(&mut buf)?;
        Ok(u32::from_le_bytes(buf))
    }

    pub fn read_f32(&mut self) -> io::Result<f32> {
        let mut buf = [0u8; 4];
        self.inner.read_exact(&mut buf)?;
        Ok(f32::from_le_bytes(buf))
    }

    pub fn read_i32_array<const N: usize>(&mut self) -> io::Result<[i32; N]> {
        let mut result = [0i32; N];
        for item in &mut result {
            *item = self.read_i32()?;
        }
        Ok(result)
    }

    pub fn read_bytes(&mut self, n: usize) -> io::Result<Vec<u8>> {
        let mut buf = vec![0u8; n];
        self.inner.read_exact(&mut buf)?;
        Ok(buf)
    }

    /// Read a fixed-capacity UTF-16LE string of `units` code units.
    /// Decoding stops at the first null unit; the full capacity is
    /// always consumed from the stream.
    pub fn read_utf16_string(&mut self, units: usize) -> io::Result<String> {
        let mut raw = Vec::with_capacity(units);
        for _ in 0..units {
            raw.push(self.read_u16()?);
        }
        let end = raw.iter().position(|&u| u == 0).unwrap_or(units);
        String::from_utf16(&raw[..end])
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    pub fn skip(&mut self, n: u64) -> io::Result<()> {
        self.inner.seek(SeekFrom::Current(n as i64))?;
        Ok(())
    }

    pub fn position(&mut self) -> io::Result<u64> {
        self.inner.stream_position()
    }

    pub fn seek_to(&mut self, pos: u64) -> io::Result<()> {
        self.inner.seek(SeekFrom::Start(pos))?;
        Ok(())
    }

    pub fn len(&mut self) -> io::Result<u64> {
        let cur = self.position()?;
        let end = self.inner.seek(SeekFrom::End(0))?;
        self.inner.seek(SeekFrom::Start(cur))?;
        Ok(end)
    }

    pub fn is_empty(&mut self) -> io::Result<bool> {
        Ok(self.len()? == 0)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::LittleEndianReader;

    #[test]
    fn reads_little_endian_widths() {
        let bytes = [0x01, 0x00, 0x02, 0x01, 0xFF, 0xFF, 0xFF, 0xFF];
        let mut r = LittleEndianReader::new(Cursor::new(bytes));
        assert_eq!(r.read_u16().unwrap(), 1);
        assert_eq!(r.read_u16().unwrap(), 0x0102);
        assert_eq!(r.read_i32().unwrap(), -1);
    }

    #[test]
    fn utf16_string_stops_at_null_but_consumes_capacity() {
        let mut bytes = Vec::new();
        for u in [0x0056u16, 0x0069, 0x0000, 0x0041] {
            bytes.extend_from_slice(&u.to_le_bytes());
        }
        bytes.extend_from_slice(&0xABCDu16.to_le_bytes());

        let mut r = LittleEndianReader::new(Cursor::new(bytes));
        assert_eq!(r.read_utf16_string(4).unwrap(), "Vi");
        // The unit after the capacity window must still be readable.
        assert_eq!(r.read_u16().unwrap(), 0xABCD);
    }
}
