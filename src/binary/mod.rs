// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! IndexSerializer: the final scored index as a self-delimiting binary
//! record stream plus a term -> byte-offset seek map (§4.8).
//!
//! Each record is independently decodable: length-prefixed term bytes, a
//! varint posting count, then per posting a varint doc_id, varint frequency,
//! importance/tf_idf as raw `f64` bits, and a delta-varint-encoded position
//! list. Postings within a record are sorted by doc_id so the delta encoding
//! is monotonic.

pub mod encoding;
pub mod header;

use crate::types::{DocId, Posting};
use encoding::{decode_varint, encode_varint};
use header::{IndexHeader, VERSION};
use std::collections::HashMap;
use std::io::{self, Read, Seek, SeekFrom, Write};

/// Serialize `(term, postings)` entries, in the order given, into one binary
/// stream. Returns the stream bytes and the term -> byte-offset seek map.
///
/// Callers are responsible for choosing a deterministic entry order (the
/// build pipeline iterates shards in alphabet-bucket order, terms sorted
/// within each shard).
pub fn encode_index<'a>(
    entries: impl Iterator<Item = (&'a str, &'a [Posting])>,
) -> io::Result<(Vec<u8>, HashMap<String, u64>)> {
    let mut buf = Vec::new();
    IndexHeader { version: VERSION }.write(&mut buf)?;

    let mut seek_map = HashMap::new();
    for (term, postings) in entries {
        let offset = buf.len() as u64;
        seek_map.insert(term.to_string(), offset);
        encode_record(term, postings, &mut buf);
    }
    Ok((buf, seek_map))
}

fn encode_record(term: &str, postings: &[Posting], buf: &mut Vec<u8>) {
    let term_bytes = term.as_bytes();
    encode_varint(term_bytes.len() as u64, buf);
    buf.extend_from_slice(term_bytes);

    let mut sorted: Vec<&Posting> = postings.iter().collect();
    sorted.sort_by_key(|p| p.doc_id);

    encode_varint(sorted.len() as u64, buf);
    let mut prev_doc_id: u64 = 0;
    for p in sorted {
        let doc_id = p.doc_id as u64;
        encode_varint(doc_id - prev_doc_id, buf);
        prev_doc_id = doc_id;

        encode_varint(p.frequency as u64, buf);
        buf.extend_from_slice(&p.importance.to_bits().to_le_bytes());
        buf.extend_from_slice(&p.tf_idf.to_bits().to_le_bytes());

        encode_varint(p.positions.len() as u64, buf);
        let mut prev_pos: u64 = 0;
        for &pos in &p.positions {
            encode_varint(pos as u64 - prev_pos, buf);
            prev_pos = pos as u64;
        }
    }
}

/// Decode one record starting at the beginning of `bytes`. Returns the term,
/// its posting list, and the number of bytes consumed.
pub fn decode_record(bytes: &[u8]) -> io::Result<(String, Vec<Posting>, usize)> {
    let mut cursor = 0usize;

    let (term_len, n) = decode_varint(&bytes[cursor..])?;
    cursor += n;
    let term_end = cursor + term_len as usize;
    let term = String::from_utf8(bytes[cursor..term_end].to_vec())
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    cursor = term_end;

    let (posting_count, n) = decode_varint(&bytes[cursor..])?;
    cursor += n;

    let mut postings = Vec::with_capacity(posting_count as usize);
    let mut prev_doc_id: u64 = 0;
    for _ in 0..posting_count {
        let (delta, n) = decode_varint(&bytes[cursor..])?;
        cursor += n;
        prev_doc_id += delta;
        let doc_id = prev_doc_id as DocId;

        let (frequency, n) = decode_varint(&bytes[cursor..])?;
        cursor += n;

        let importance = f64::from_bits(u64::from_le_bytes(
            bytes[cursor..cursor + 8]
                .try_into()
                .map_err(|_| io::Error::new(io::ErrorKind::UnexpectedEof, "truncated importance"))?,
        ));
        cursor += 8;

        let tf_idf = f64::from_bits(u64::from_le_bytes(
            bytes[cursor..cursor + 8]
                .try_into()
                .map_err(|_| io::Error::new(io::ErrorKind::UnexpectedEof, "truncated tf_idf"))?,
        ));
        cursor += 8;

        let (position_count, n) = decode_varint(&bytes[cursor..])?;
        cursor += n;
        let mut positions = Vec::with_capacity(position_count as usize);
        let mut prev_pos: u64 = 0;
        for _ in 0..position_count {
            let (delta, n) = decode_varint(&bytes[cursor..])?;
            cursor += n;
            prev_pos += delta;
            positions.push(prev_pos as u32);
        }

        postings.push(Posting {
            doc_id,
            frequency: frequency as u32,
            importance,
            tf_idf,
            positions,
        });
    }

    Ok((term, postings, cursor))
}

/// Validate the header and return the format version, without decoding any records.
pub fn read_header<R: Read>(r: &mut R) -> io::Result<u8> {
    Ok(IndexHeader::read(r)?.version)
}

/// Seek to `offset` in an open index file and decode exactly one record.
pub fn read_record_at<R: Read + Seek>(reader: &mut R, offset: u64) -> io::Result<(String, Vec<Posting>)> {
    reader.seek(SeekFrom::Start(offset))?;
    let mut rest = Vec::new();
    reader.read_to_end(&mut rest)?;
    let (term, postings, _consumed) = decode_record(&rest)?;
    Ok((term, postings))
}

/// Write the seek map as the `index_map_position.json` artifact (§6).
pub fn write_seek_map<W: Write>(w: W, seek_map: &HashMap<String, u64>) -> io::Result<()> {
    serde_json::to_writer(w, seek_map).map_err(|e| io::Error::new(io::ErrorKind::Other, e))
}

pub fn read_seek_map<R: Read>(r: R) -> io::Result<HashMap<String, u64>> {
    serde_json::from_reader(r).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn posting(doc_id: DocId, freq: u32, importance: f64, tf_idf: f64, positions: &[u32]) -> Posting {
        Posting {
            doc_id,
            frequency: freq,
            importance,
            tf_idf,
            positions: positions.to_vec(),
        }
    }

    #[test]
    fn record_round_trips() {
        let postings = vec![
            posting(2, 3, 1.5, 0.42, &[0, 4, 9]),
            posting(0, 1, 0.0, 0.1, &[7]),
        ];
        let mut buf = Vec::new();
        encode_record("rust", &postings, &mut buf);
        let (term, decoded, consumed) = decode_record(&buf).unwrap();
        assert_eq!(term, "rust");
        assert_eq!(consumed, buf.len());
        assert_eq!(decoded.len(), 2);
        assert_eq!(decoded[0].doc_id, 0); // sorted by doc_id during encode
        assert_eq!(decoded[1].doc_id, 2);
        assert_eq!(decoded[1].positions, vec![0, 4, 9]);
        assert!((decoded[1].tf_idf - 0.42).abs() < 1e-12);
    }

    #[test]
    fn seek_map_covers_every_term_and_offsets_decode_correctly() {
        let a = vec![posting(0, 1, 0.0, 0.0, &[0])];
        let b = vec![posting(1, 2, 1.0, 0.3, &[0, 1])];
        let entries: Vec<(&str, &[Posting])> = vec![("alpha", &a), ("beta", &b)];
        let (bytes, seek_map) = encode_index(entries.into_iter()).unwrap();

        assert_eq!(seek_map.len(), 2);
        for (term, &offset) in &seek_map {
            let mut cursor = io::Cursor::new(&bytes);
            let (decoded_term, _postings) = read_record_at(&mut cursor, offset).unwrap();
            assert_eq!(&decoded_term, term);
        }
    }

    #[test]
    fn header_is_validated_before_any_record_is_read() {
        let entries: Vec<(&str, &[Posting])> = vec![];
        let (bytes, _) = encode_index(entries.into_iter()).unwrap();
        let version = read_header(&mut io::Cursor::new(&bytes)).unwrap();
        assert_eq!(version, VERSION);
    }
}
