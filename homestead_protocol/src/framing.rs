// Length-delimited frame format for view payloads.
//
// A frame is a 4-byte big-endian length prefix followed by the payload
// bytes. The payload is opaque here — callers pair this with `view.rs`
// (byte codec) or serde_json as they see fit.
//
// `MAX_MESSAGE_SIZE` protects against unbounded allocation from malformed
// or malicious length prefixes. A full-colony citizen snapshot is the
// largest expected frame; 4 MB is generous headroom.

use std::io::{self, Read, Write};

/// Maximum allowed frame payload size (4 MB).
pub const MAX_MESSAGE_SIZE: u32 = 4 * 1024 * 1024;

/// Write a frame: 4-byte big-endian length, then payload.
pub fn write_frame<W: Write>(writer: &mut W, payload: &[u8]) -> io::Result<()> {
    let len = payload.len();
    if len > MAX_MESSAGE_SIZE as usize {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("frame too large: {len} bytes (max {MAX_MESSAGE_SIZE})"),
        ));
    }
    writer.write_all(&(len as u32).to_be_bytes())?;
    writer.write_all(payload)?;
    writer.flush()
}

/// Read a frame written by [`write_frame`].
///
/// Returns `UnexpectedEof` if the stream closes before or during a frame,
/// and `InvalidData` if the prefix exceeds `MAX_MESSAGE_SIZE`.
pub fn read_frame<R: Read>(reader: &mut R) -> io::Result<Vec<u8>> {
    let mut len_buf = [0u8; 4];
    reader.read_exact(&mut len_buf)?;
    let len = u32::from_be_bytes(len_buf);
    if len > MAX_MESSAGE_SIZE {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("frame too large: {len} bytes (max {MAX_MESSAGE_SIZE})"),
        ));
    }
    let mut buf = vec![0u8; len as usize];
    reader.read_exact(&mut buf)?;
    Ok(buf)
}
