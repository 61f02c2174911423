//! Gap-encoded postings lists and the `len:payload` block framing shared by
//! the two decimal headers and every term's postings block in the
//! `.postings` file (§3, §4.4, §6).

use std::collections::BTreeSet;
use std::io::{self, Read, Seek, SeekFrom, Write};

/// Gap-encode a sorted id set as `d1,d2-d1,d3-d2,...` with no trailing comma.
#[must_use]
pub fn encode_gaps(ids: &BTreeSet<u32>) -> String {
    let mut out = String::new();
    let mut prev: Option<u32> = None;
    for &id in ids {
        if !out.is_empty() {
            out.push(',');
        }
        match prev {
            None => out.push_str(&id.to_string()),
            Some(p) => out.push_str(&(id - p).to_string()),
        }
        prev = Some(id);
    }
    out
}

/// Gap-decode a CSV payload back into absolute, strictly-ascending ids.
/// An empty payload decodes to an empty list.
#[must_use]
pub fn decode_gaps(csv: &str) -> Vec<u32> {
    if csv.is_empty() {
        return Vec::new();
    }
    let mut ids = Vec::new();
    let mut running: u32 = 0;
    for (i, part) in csv.split(',').enumerate() {
        let gap: u32 = part.parse().unwrap_or(0);
        running = if i == 0 { gap } else { running + gap };
        ids.push(running);
    }
    ids
}

/// Write `len(payload):payload` to `writer`, returning the number of bytes
/// written (used by the caller to keep a running file-offset count).
pub fn write_block<W: Write>(writer: &mut W, payload: &str) -> io::Result<u64> {
    let header = format!("{}:", payload.len());
    writer.write_all(header.as_bytes())?;
    writer.write_all(payload.as_bytes())?;
    Ok((header.len() + payload.len()) as u64)
}

/// Read one `len:payload` block from the current reader position.
pub fn read_block<R: Read>(reader: &mut R) -> io::Result<String> {
    let mut len_digits = Vec::new();
    let mut byte = [0u8; 1];
    loop {
        reader.read_exact(&mut byte)?;
        if byte[0] == b':' {
            break;
        }
        len_digits.push(byte[0]);
    }
    let len: usize = std::str::from_utf8(&len_digits)
        .ok()
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidData, "malformed block length"))?;
    let mut payload = vec![0u8; len];
    reader.read_exact(&mut payload)?;
    String::from_utf8(payload)
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidData, "postings payload is not UTF-8"))
}

/// Seek to `offset` and read one `len:payload` block.
pub fn read_block_at<R: Read + Seek>(reader: &mut R, offset: u64) -> io::Result<String> {
    reader.seek(SeekFrom::Start(offset))?;
    read_block(reader)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scenario_s6_gap_encoding() {
        let ids: BTreeSet<u32> = [1u32, 2, 5, 9].into_iter().collect();
        let csv = encode_gaps(&ids);
        assert_eq!(csv, "1,1,3,4");
        assert_eq!(csv.len(), 7);
    }

    #[test]
    fn gap_round_trip() {
        let ids: BTreeSet<u32> = [3u32, 4, 10, 11, 200].into_iter().collect();
        let csv = encode_gaps(&ids);
        let decoded = decode_gaps(&csv);
        assert_eq!(decoded, ids.into_iter().collect::<Vec<_>>());
    }

    #[test]
    fn empty_set_round_trips() {
        let ids: BTreeSet<u32> = BTreeSet::new();
        assert_eq!(encode_gaps(&ids), "");
        assert!(decode_gaps("").is_empty());
    }

    #[test]
    fn block_round_trip_through_a_cursor() {
        let mut buf = Vec::new();
        write_block(&mut buf, "1,1,3,4").unwrap();
        let mut cursor = io::Cursor::new(buf);
        let payload = read_block(&mut cursor).unwrap();
        assert_eq!(payload, "1,1,3,4");
    }

    #[test]
    fn block_at_offset_skips_a_preceding_block() {
        let mut buf = Vec::new();
        write_block(&mut buf, "hello").unwrap();
        let second_offset = buf.len() as u64;
        write_block(&mut buf, "world").unwrap();
        let mut cursor = io::Cursor::new(buf);
        let payload = read_block_at(&mut cursor, second_offset).unwrap();
        assert_eq!(payload, "world");
    }

    proptest::proptest! {
        #[test]
        fn gap_round_trip_on_arbitrary_sorted_sets(mut raw: Vec<u32>) {
            raw.sort_unstable();
            raw.dedup();
            let ids: BTreeSet<u32> = raw.into_iter().collect();
            let csv = encode_gaps(&ids);
            let decoded = decode_gaps(&csv);
            proptest::prop_assert_eq!(decoded, ids.into_iter().collect::<Vec<_>>());
        }
    }
}
