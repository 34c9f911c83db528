use std::io::{self, Read, Seek};

use log::warn;

use crate::reader::LittleEndianReader;

pub const MAGIC_RIFF: [u8; 4] = *b"RIFF";
pub const MAGIC_WIZ8: [u8; 4] = *b"WIZ8";

/// Magic (4) + flags (4) + payload size (4) + chunk count (4).
pub const PROLOGUE_SIZE: usize = 16;
/// Tag (4) + reserved (2) + payload size (4).
pub const CHUNK_HEADER_SIZE: usize = 10;

pub const TAG_PARTY_STATE: &str = "GSTA";
pub const TAG_LEVELS: &str = "LVLS";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MagicVariant {
    Riff,
    Wiz8,
}

impl MagicVariant {
    pub fn bytes(&self) -> [u8; 4] {
        match self {
            Self::Riff => MAGIC_RIFF,
            Self::Wiz8 => MAGIC_WIZ8,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Riff => "RIFF",
            Self::Wiz8 => "WIZ8",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    tag: [u8; 4],
    reserved: [u8; 2],
    payload: Vec<u8>,
}

impl Chunk {
    pub fn new(tag: &str, payload: Vec<u8>) -> io::Result<Self> {
        let tag = validate_tag(tag.as_bytes())?;
        Ok(Self {
            tag,
            reserved: [0u8; 2],
            payload,
        })
    }

    pub fn tag(&self) -> &str {
        // Tags are validated as printable ASCII on construction.
        std::str::from_utf8(&self.tag).unwrap_or("????")
    }

    pub fn tag_bytes(&self) -> [u8; 4] {
        self.tag
    }

    pub fn reserved(&self) -> [u8; 2] {
        self.reserved
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    pub fn payload_len(&self) -> usize {
        self.payload.len()
    }

    pub fn set_payload(&mut self, payload: Vec<u8>) {
        self.payload = payload;
    }

    /// Parse this chunk's payload as a nested mini-directory: a
    /// little-endian chunk count followed by that many sub-chunks in the
    /// same tag/reserved/size/payload shape. Used by the `LVLS` chunk.
    pub fn sub_chunks(&self) -> io::Result<Vec<Chunk>> {
        let mut r = LittleEndianReader::new(io::Cursor::new(self.payload.as_slice()));
        let count = r.read_u32()? as usize;
        let mut subs = Vec::with_capacity(count.min(1024));
        for index in 0..count {
            let sub = parse_chunk(&mut r, self.payload.len() as u64).map_err(|e| {
                io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("bad sub-chunk {index} inside {:?}: {e}", self.tag()),
                )
            })?;
            subs.push(sub);
        }

        let consumed = r.position()? as usize;
        if consumed != self.payload.len() {
            warn!(
                "chunk {:?} mini-directory left {} undeclared trailing bytes",
                self.tag(),
                self.payload.len() - consumed
            );
        }

        Ok(subs)
    }

    fn emit_to(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.tag);
        out.extend_from_slice(&self.reserved);
        out.extend_from_slice(&(self.payload.len() as u32).to_le_bytes());
        out.extend_from_slice(&self.payload);
    }
}

/// Build a `LVLS`-style mini-directory payload from sub-chunks.
pub fn build_sub_directory(subs: &[Chunk]) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(&(subs.len() as u32).to_le_bytes());
    for sub in subs {
        sub.emit_to(&mut out);
    }
    out
}

pub fn find_sub_chunk<'a>(subs: &'a [Chunk], tag: &str) -> Option<&'a Chunk> {
    subs.iter().find(|sub| sub.tag() == tag)
}

#[derive(Debug, Clone)]
pub struct RiffFile {
    magic: MagicVariant,
    flags: u32,
    chunks: Vec<Chunk>,
    tail: Vec<u8>,
}

impl RiffFile {
    pub fn parse<R: Read + Seek>(reader: R) -> io::Result<Self> {
        let mut r = LittleEndianReader::new(reader);
        let file_len = r.len()?;

        let magic_bytes = r.read_bytes(4).map_err(|_| {
            io::Error::new(io::ErrorKind::InvalidData, "file too short for magic")
        })?;
        let magic = match [magic_bytes[0], magic_bytes[1], magic_bytes[2], magic_bytes[3]] {
            MAGIC_RIFF => MagicVariant::Riff,
            MAGIC_WIZ8 => MagicVariant::Wiz8,
            other => {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("unrecognized save magic {:02X?}", other),
                ));
            }
        };

        let flags = r.read_u32()?;
        let declared_size = r.read_u32()? as u64;
        let chunk_count = r.read_u32()? as usize;

        if declared_size != file_len - PROLOGUE_SIZE as u64 {
            warn!(
                "prologue declares {} payload bytes, file holds {}",
                declared_size,
                file_len - PROLOGUE_SIZE as u64
            );
        }

        let mut chunks = Vec::with_capacity(chunk_count.min(1024));
        for index in 0..chunk_count {
            let chunk = parse_chunk(&mut r, file_len).map_err(|e| {
                io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("bad chunk {index} of {chunk_count}: {e}"),
                )
            })?;
            chunks.push(chunk);
        }

        // Anything past the declared directory is preserved verbatim.
        let pos = r.position()?;
        let tail = r.read_bytes((file_len - pos) as usize)?;

        Ok(Self {
            magic,
            flags,
            chunks,
            tail,
        })
    }

    pub fn magic(&self) -> MagicVariant {
        self.magic
    }

    pub fn flags(&self) -> u32 {
        self.flags
    }

    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    /// Look a chunk up by tag. Duplicate tags resolve to the first
    /// occurrence.
    pub fn chunk(&self, tag: &str) -> Option<&Chunk> {
        self.chunks.iter().find(|c| c.tag() == tag)
    }

    pub fn chunk_mut(&mut self, tag: &str) -> Option<&mut Chunk> {
        self.chunks.iter_mut().find(|c| c.tag() == tag)
    }

    pub fn chunk_at(&self, index: usize) -> Option<&Chunk> {
        self.chunks.get(index)
    }

    pub fn chunk_index(&self, tag: &str) -> Option<usize> {
        self.chunks.iter().position(|c| c.tag() == tag)
    }

    pub fn to_bytes(&self) -> io::Result<Vec<u8>> {
        let mut body = Vec::new();
        for chunk in &self.chunks {
            if chunk.payload.len() > u32::MAX as usize {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("chunk {:?} payload exceeds u32 size field", chunk.tag()),
                ));
            }
            chunk.emit_to(&mut body);
        }
        body.extend_from_slice(&self.tail);

        let mut out = Vec::with_capacity(PROLOGUE_SIZE + body.len());
        out.extend_from_slice(&self.magic.bytes());
        out.extend_from_slice(&self.flags.to_le_bytes());
        out.extend_from_slice(&(body.len() as u32).to_le_bytes());
        out.extend_from_slice(&(self.chunks.len() as u32).to_le_bytes());
        out.extend_from_slice(&body);
        Ok(out)
    }
}

fn parse_chunk<R: Read + Seek>(
    r: &mut LittleEndianReader<R>,
    source_len: u64,
) -> io::Result<Chunk> {
    let tag_bytes = r.read_bytes(4)?;
    let tag = validate_tag(&tag_bytes)?;

    let reserved_bytes = r.read_bytes(2)?;
    let reserved = [reserved_bytes[0], reserved_bytes[1]];

    let size = r.read_u32()? as u64;
    let pos = r.position()?;
    if pos + size > source_len {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!(
                "chunk {:?} declares {size} payload bytes but only {} remain",
                String::from_utf8_lossy(&tag),
                source_len - pos
            ),
        ));
    }

    let payload = r.read_bytes(size as usize)?;
    Ok(Chunk {
        tag,
        reserved,
        payload,
    })
}

fn validate_tag(bytes: &[u8]) -> io::Result<[u8; 4]> {
    let tag: [u8; 4] = bytes.try_into().map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidData,
            format!("chunk tag must be 4 bytes, got {}", bytes.len()),
        )
    })?;

    if !tag.iter().all(|b| b.is_ascii_uppercase() || b.is_ascii_digit()) {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("chunk tag {:02X?} is not ASCII alphanumeric", tag),
        ));
    }

    Ok(tag)
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::{Chunk, MagicVariant, RiffFile, build_sub_directory};

    fn sample_file() -> Vec<u8> {
        let chunks = [
            Chunk::new("GVER", vec![1, 0, 0, 0]).unwrap(),
            Chunk::new("GSTA", vec![0xAA; 12]).unwrap(),
        ];
        let mut body = Vec::new();
        for c in &chunks {
            body.extend_from_slice(&c.tag_bytes());
            body.extend_from_slice(&c.reserved());
            body.extend_from_slice(&(c.payload_len() as u32).to_le_bytes());
            body.extend_from_slice(c.payload());
        }

        let mut out = Vec::new();
        out.extend_from_slice(b"RIFF");
        out.extend_from_slice(&0u32.to_le_bytes());
        out.extend_from_slice(&(body.len() as u32).to_le_bytes());
        out.extend_from_slice(&2u32.to_le_bytes());
        out.extend_from_slice(&body);
        out
    }

    #[test]
    fn parses_and_roundtrips_container() {
        let bytes = sample_file();
        let file = RiffFile::parse(Cursor::new(bytes.clone())).unwrap();

        assert_eq!(file.magic(), MagicVariant::Riff);
        assert_eq!(file.chunks().len(), 2);
        assert_eq!(file.chunk("GSTA").unwrap().payload_len(), 12);
        assert_eq!(file.chunk_index("GVER"), Some(0));
        assert!(file.chunk("XXXX").is_none());

        assert_eq!(file.to_bytes().unwrap(), bytes);
    }

    #[test]
    fn rejects_unknown_magic() {
        let mut bytes = sample_file();
        bytes[..4].copy_from_slice(b"JUNK");
        let err = RiffFile::parse(Cursor::new(bytes)).unwrap_err();
        assert!(err.to_string().contains("magic"));
    }

    #[test]
    fn rejects_chunk_overrunning_file() {
        let mut bytes = sample_file();
        let len = bytes.len();
        // Corrupt the second chunk's size field (tag GSTA at body offset 14).
        bytes[len - 16..len - 12].copy_from_slice(&0xFFFFu32.to_le_bytes());
        let err = RiffFile::parse(Cursor::new(bytes)).unwrap_err();
        assert!(err.to_string().contains("remain"));
    }

    #[test]
    fn nested_directory_roundtrip() {
        let subs = vec![
            Chunk::new("LVL1", vec![1, 2, 3]).unwrap(),
            Chunk::new("LVL2", vec![]).unwrap(),
        ];
        let parent = Chunk::new("LVLS", build_sub_directory(&subs)).unwrap();

        let parsed = parent.sub_chunks().unwrap();
        assert_eq!(parsed, subs);
        assert_eq!(super::find_sub_chunk(&parsed, "LVL2").unwrap().payload_len(), 0);
    }
}
