//! Minimal reader for the one-dimensional integer `.npy` arrays that hold
//! recipe ids next to the flat index.

use crate::errors::retrieval_error::RetrievalError;

const MAGIC: &[u8] = b"\x93NUMPY";

/// Decode a 1-D little-endian `int64` or `int32` array.
pub fn read_i64_array(bytes: &[u8]) -> Result<Vec<i64>, RetrievalError> {
    if bytes.len() < 10 || &bytes[..6] != MAGIC {
        return Err(bad("missing NPY magic"));
    }
    let major = bytes[6];
    let (header_len, header_start) = match major {
        1 => (u16::from_le_bytes([bytes[8], bytes[9]]) as usize, 10),
        2 | 3 => {
            if bytes.len() < 12 {
                return Err(bad("truncated NPY preamble"));
            }
            (
                u32::from_le_bytes([bytes[8], bytes[9], bytes[10], bytes[11]]) as usize,
                12,
            )
        }
        v => return Err(bad(&format!("unsupported NPY version {v}"))),
    };
    let data_start = header_start + header_len;
    let header = bytes
        .get(header_start..data_start)
        .and_then(|h| std::str::from_utf8(h).ok())
        .ok_or_else(|| bad("unreadable NPY header"))?;

    let descr = dict_value(header, "descr").ok_or_else(|| bad("NPY header without descr"))?;
    if dict_value(header, "fortran_order").is_some_and(|v| v.starts_with("True")) {
        return Err(bad("fortran-ordered arrays are not supported"));
    }
    let len = shape_len(header)?;

    let width = match descr.trim_matches(|c| c == '\'' || c == '"') {
        "<i8" => 8,
        "<i4" => 4,
        other => return Err(bad(&format!("unsupported NPY dtype {other}"))),
    };
    let needed = len
        .checked_mul(width)
        .ok_or_else(|| bad("NPY shape overflows"))?;
    let data = &bytes[data_start.min(bytes.len())..];
    if data.len() < needed {
        return Err(bad("NPY data shorter than its shape"));
    }

    let ids = data
        .chunks_exact(width)
        .take(len)
        .map(|c| match width {
            8 => i64::from_le_bytes([c[0], c[1], c[2], c[3], c[4], c[5], c[6], c[7]]),
            _ => i32::from_le_bytes([c[0], c[1], c[2], c[3]]) as i64,
        })
        .collect();
    Ok(ids)
}

/// Raw text following `'key':` up to the next top-level comma.
fn dict_value<'a>(header: &'a str, key: &str) -> Option<&'a str> {
    let pat = format!("'{key}':");
    let rest = header[header.find(&pat)? + pat.len()..].trim_start();
    let end = rest.find(',').unwrap_or(rest.len());
    Some(rest[..end].trim())
}

fn shape_len(header: &str) -> Result<usize, RetrievalError> {
    let start = header
        .find("'shape':")
        .and_then(|i| header[i..].find('(').map(|j| i + j + 1))
        .ok_or_else(|| bad("NPY header without shape"))?;
    let end = header[start..]
        .find(')')
        .map(|j| start + j)
        .ok_or_else(|| bad("unterminated NPY shape"))?;
    let dims: Vec<&str> = header[start..end]
        .split(',')
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .collect();
    match dims.as_slice() {
        [n] => n.parse().map_err(|_| bad("non-numeric NPY shape")),
        [n, "1"] | ["1", n] => n.parse().map_err(|_| bad("non-numeric NPY shape")),
        _ => Err(bad("id array must be one-dimensional")),
    }
}

fn bad(msg: &str) -> RetrievalError {
    RetrievalError::IndexUnavailable(format!("recipe_ids.npy: {msg}"))
}

/// Encode ids as a version 1.0 `<i8` array.
#[cfg(test)]
pub(crate) fn write_i64_array(ids: &[i64]) -> Vec<u8> {
    let mut header = format!(
        "{{'descr': '<i8', 'fortran_order': False, 'shape': ({},), }}",
        ids.len()
    );
    // Preamble plus header is padded to a multiple of 64 and ends in '\n'.
    while (10 + header.len() + 1) % 64 != 0 {
        header.push(' ');
    }
    header.push('\n');

    let mut out = Vec::new();
    out.extend_from_slice(MAGIC);
    out.extend_from_slice(&[1, 0]);
    out.extend_from_slice(&(header.len() as u16).to_le_bytes());
    out.extend_from_slice(header.as_bytes());
    for id in ids {
        out.extend_from_slice(&id.to_le_bytes());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_int64_ids() {
        let bytes = write_i64_array(&[10, 42, -7, 99_000_000_000]);
        assert_eq!(read_i64_array(&bytes).unwrap(), vec![10, 42, -7, 99_000_000_000]);
    }

    #[test]
    fn reads_int32_ids() {
        let header = "{'descr': '<i4', 'fortran_order': False, 'shape': (3,), }\n";
        let mut bytes = Vec::new();
        bytes.extend_from_slice(MAGIC);
        bytes.extend_from_slice(&[1, 0]);
        bytes.extend_from_slice(&(header.len() as u16).to_le_bytes());
        bytes.extend_from_slice(header.as_bytes());
        for id in [1i32, 2, 3] {
            bytes.extend_from_slice(&id.to_le_bytes());
        }
        assert_eq!(read_i64_array(&bytes).unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn rejects_garbage_and_floats() {
        assert!(read_i64_array(b"not an npy file").is_err());
        let mut bytes = write_i64_array(&[1]);
        let at = bytes.windows(3).position(|w| w == b"<i8").unwrap();
        bytes[at + 1] = b'f';
        assert!(read_i64_array(&bytes).is_err());
    }

    #[test]
    fn huge_shape_is_rejected_not_overflowed() {
        let header = format!(
            "{{'descr': '<i8', 'fortran_order': False, 'shape': ({},), }}\n",
            usize::MAX / 2
        );
        let mut bytes = Vec::new();
        bytes.extend_from_slice(MAGIC);
        bytes.extend_from_slice(&[1, 0]);
        bytes.extend_from_slice(&(header.len() as u16).to_le_bytes());
        bytes.extend_from_slice(header.as_bytes());
        bytes.extend_from_slice(&1i64.to_le_bytes());

        let err = read_i64_array(&bytes).unwrap_err();
        assert!(err.to_string().contains("overflows"), "{err}");
    }
}
