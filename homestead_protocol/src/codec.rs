// Primitive big-endian codec helpers.
//
// Every multi-byte value on the wire is big-endian. Strings are a `u32`
// byte-length prefix followed by UTF-8 bytes; booleans are a single byte
// (0 or 1, anything else is `InvalidData`). `MAX_STRING_LEN` bounds string
// allocation against malformed prefixes.

use std::io::{self, Read, Write};

/// Maximum accepted string length in bytes. View strings are names and job
/// identifiers; 64 KB is far beyond anything legitimate.
pub const MAX_STRING_LEN: u32 = 64 * 1024;

pub fn write_bool<W: Write>(w: &mut W, v: bool) -> io::Result<()> {
    w.write_all(&[u8::from(v)])
}

pub fn read_bool<R: Read>(r: &mut R) -> io::Result<bool> {
    let mut buf = [0u8; 1];
    r.read_exact(&mut buf)?;
    match buf[0] {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("invalid bool byte: {other}"),
        )),
    }
}

pub fn write_i32<W: Write>(w: &mut W, v: i32) -> io::Result<()> {
    w.write_all(&v.to_be_bytes())
}

pub fn read_i32<R: Read>(r: &mut R) -> io::Result<i32> {
    let mut buf = [0u8; 4];
    r.read_exact(&mut buf)?;
    Ok(i32::from_be_bytes(buf))
}

pub fn write_u32<W: Write>(w: &mut W, v: u32) -> io::Result<()> {
    w.write_all(&v.to_be_bytes())
}

pub fn read_u32<R: Read>(r: &mut R) -> io::Result<u32> {
    let mut buf = [0u8; 4];
    r.read_exact(&mut buf)?;
    Ok(u32::from_be_bytes(buf))
}

pub fn write_f32<W: Write>(w: &mut W, v: f32) -> io::Result<()> {
    w.write_all(&v.to_be_bytes())
}

pub fn read_f32<R: Read>(r: &mut R) -> io::Result<f32> {
    let mut buf = [0u8; 4];
    r.read_exact(&mut buf)?;
    Ok(f32::from_be_bytes(buf))
}

pub fn write_f64<W: Write>(w: &mut W, v: f64) -> io::Result<()> {
    w.write_all(&v.to_be_bytes())
}

pub fn read_f64<R: Read>(r: &mut R) -> io::Result<f64> {
    let mut buf = [0u8; 8];
    r.read_exact(&mut buf)?;
    Ok(f64::from_be_bytes(buf))
}

/// Write a string as a `u32` byte-length prefix plus UTF-8 bytes.
pub fn write_str<W: Write>(w: &mut W, s: &str) -> io::Result<()> {
    let bytes = s.as_bytes();
    if bytes.len() > MAX_STRING_LEN as usize {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("string too long: {} bytes (max {MAX_STRING_LEN})", bytes.len()),
        ));
    }
    write_u32(w, bytes.len() as u32)?;
    w.write_all(bytes)
}

/// Read a length-prefixed UTF-8 string. Rejects oversized prefixes and
/// invalid UTF-8 with `InvalidData`.
pub fn read_str<R: Read>(r: &mut R) -> io::Result<String> {
    let len = read_u32(r)?;
    if len > MAX_STRING_LEN {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("string too long: {len} bytes (max {MAX_STRING_LEN})"),
        ));
    }
    let mut buf = vec![0u8; len as usize];
    r.read_exact(&mut buf)?;
    String::from_utf8(buf)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, format!("invalid UTF-8: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn roundtrip_primitives() {
        let mut buf = Vec::new();
        write_bool(&mut buf, true).unwrap();
        write_i32(&mut buf, -42).unwrap();
        write_f32(&mut buf, 19.5).unwrap();
        write_f64(&mut buf, 123.25).unwrap();
        write_str(&mut buf, "Ada B. Miller").unwrap();

        let mut cursor = Cursor::new(&buf);
        assert!(read_bool(&mut cursor).unwrap());
        assert_eq!(read_i32(&mut cursor).unwrap(), -42);
        assert_eq!(read_f32(&mut cursor).unwrap(), 19.5);
        assert_eq!(read_f64(&mut cursor).unwrap(), 123.25);
        assert_eq!(read_str(&mut cursor).unwrap(), "Ada B. Miller");
    }

    #[test]
    fn bool_rejects_garbage_byte() {
        let mut cursor = Cursor::new(vec![7u8]);
        let err = read_bool(&mut cursor).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn string_rejects_oversized_prefix() {
        let mut buf = Vec::new();
        write_u32(&mut buf, MAX_STRING_LEN + 1).unwrap();
        let mut cursor = Cursor::new(&buf);
        let err = read_str(&mut cursor).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn string_rejects_invalid_utf8() {
        let mut buf = Vec::new();
        write_u32(&mut buf, 2).unwrap();
        buf.extend_from_slice(&[0xFF, 0xFE]);
        let mut cursor = Cursor::new(&buf);
        let err = read_str(&mut cursor).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn truncated_read_is_eof() {
        let mut cursor = Cursor::new(vec![0u8, 0]);
        let err = read_i32(&mut cursor).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }
}
