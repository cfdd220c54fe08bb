//! GRF container version 2, uncompressed.
//!
//! Layout: signature, `u32` offset of the graphics section, `u8` compression,
//! the data section (`u32 size, u8 info, payload` until a zero size), then the
//! graphics section (`u32 id, u32 size, body` until a zero id). The graphics
//! offset counts from the byte right after the offset field.
//!
//! Graphics are always written in [`graphics_order`]. Files whose graphics
//! section is in a different order still decode, but re-encode reordered.

use std::collections::HashSet;
use std::iter;

use yagl_types::SpriteId;

use crate::record::Record;
use crate::sprite_map::{SpriteChild, SpriteZoomMap};
use crate::stream::{ReadError, Reader, Writer};

pub const SIGNATURE: [u8; 10] = [0x00, 0x00, 0x47, 0x52, 0x46, 0x82, 0x0D, 0x0A, 0x1A, 0x0A];

const COMPRESSION_NONE: u8 = 0;
const DATA_END: u32 = 0;
const GRAPHICS_END: SpriteId = 0;

pub fn read_grf(data: &[u8]) -> Result<(Vec<Record>, SpriteZoomMap), ReadError> {
    let mut r = Reader::new(data);

    if r.remaining() < SIGNATURE.len() || r.read_bytes(SIGNATURE.len())? != SIGNATURE {
        return Err(ReadError::BadSignature);
    }
    let graphics_offset = r.read_u32()?;
    let offset_base = r.pos();
    let compression = r.read_u8()?;
    if compression != COMPRESSION_NONE {
        return Err(ReadError::UnsupportedCompression { value: compression });
    }

    let mut records = Vec::new();
    loop {
        let size = r.read_u32()?;
        if size == DATA_END {
            break;
        }
        let info_offset = r.pos();
        let info = r.read_u8()?;
        let mut payload = r.take(size as usize)?;
        records.push(Record::read(info, info_offset, &mut payload)?);
    }

    let graphics_start = r.pos();
    if graphics_start - offset_base != graphics_offset as usize {
        return Err(ReadError::InvalidValue {
            field: "graphics offset",
            value: graphics_offset,
            offset: SIGNATURE.len(),
        });
    }
    log::debug!("{} data records, graphics at offset {graphics_start}", records.len());

    let mut sprites = SpriteZoomMap::new();
    let mut arrival = Vec::new();
    loop {
        let id = r.read_u32()?;
        if id == GRAPHICS_END {
            break;
        }
        let size = r.read_u32()?;
        let mut body = r.take(size as usize)?;
        let child = SpriteChild::read(&mut body)?;
        body.finish()?;
        sprites.push(id, child);
        arrival.push(id);
    }
    r.finish()?;

    let written: Vec<SpriteId> = graphics_order(&records, &sprites)
        .into_iter()
        .flat_map(|id| iter::repeat_n(id, sprites.get(id).len()))
        .collect();
    if written != arrival {
        log::warn!("graphics section is not in sprite index order and will be rewritten in index order");
    }

    Ok((records, sprites))
}

/// Ids with graphics, in write order: ids reached through sprite index
/// records first, by their first index, then ids no index refers to in the
/// order the map received them.
pub fn graphics_order(records: &[Record], sprites: &SpriteZoomMap) -> Vec<SpriteId> {
    let indexed = records.iter().filter_map(|record| match record {
        Record::SpriteIndex(index) => Some(index.sprite_id),
        _ => None,
    });
    let mut seen = HashSet::new();
    indexed
        .chain(sprites.iter().map(|(id, _)| id))
        .filter(|&id| sprites.contains(id) && seen.insert(id))
        .collect()
}

pub fn write_grf(records: &[Record], sprites: &SpriteZoomMap) -> Vec<u8> {
    let mut w = Writer::new();
    w.write_bytes(&SIGNATURE);
    let offset_at = w.len();
    w.write_u32(0);
    let offset_base = w.len();
    w.write_u8(COMPRESSION_NONE);

    for record in records {
        let size_at = w.len();
        w.write_u32(0);
        w.write_u8(record.info_byte());
        let start = w.len();
        record.write(&mut w);
        let size = w.len() - start;
        w.patch_u32(size_at, size as u32);
    }
    w.write_u32(DATA_END);

    let graphics_offset = w.len() - offset_base;
    w.patch_u32(offset_at, graphics_offset as u32);

    for id in graphics_order(records, sprites) {
        for child in sprites.get(id) {
            w.write_u32(id);
            let size_at = w.len();
            w.write_u32(0);
            let start = w.len();
            child.write(&mut w);
            let size = w.len() - start;
            w.patch_u32(size_at, size as u32);
        }
    }
    w.write_u32(GRAPHICS_END);

    w.into_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action_ff::ActionFFRecord;
    use crate::sprite_index::SpriteIndexRecord;

    fn header(graphics_offset: u32) -> Vec<u8> {
        let mut bytes = SIGNATURE.to_vec();
        bytes.extend_from_slice(&graphics_offset.to_le_bytes());
        bytes.push(0);
        bytes
    }

    #[test]
    fn empty_file() {
        let mut bytes = header(5);
        bytes.extend_from_slice(&[0, 0, 0, 0, 0, 0, 0, 0]);
        let (records, sprites) = read_grf(&bytes).expect("read");
        assert!(records.is_empty());
        assert!(sprites.is_empty());
        assert_eq!(write_grf(&records, &sprites), bytes);
    }

    #[test]
    fn index_and_sound() {
        let mut bytes = header(14);
        bytes.extend_from_slice(&[4, 0, 0, 0, 0xFD, 9, 0, 0, 0]);
        bytes.extend_from_slice(&[0, 0, 0, 0]);
        bytes.extend_from_slice(&[9, 0, 0, 0, 4, 0, 0, 0, 0xFF, 1, b'z', 0x77]);
        bytes.extend_from_slice(&[0, 0, 0, 0]);

        let (records, sprites) = read_grf(&bytes).expect("read");
        assert_eq!(
            records,
            vec![Record::SpriteIndex(SpriteIndexRecord { sprite_id: 9 })]
        );
        assert_eq!(
            sprites.get(9),
            &[SpriteChild::Sound(ActionFFRecord {
                name: b"z".to_vec(),
                data: vec![0x77],
            })]
        );
        assert_eq!(write_grf(&records, &sprites), bytes);
    }

    #[test]
    fn graphics_follow_index_order() {
        let one = [0xFF, 0x01, b'a'];
        let two = [0xFF, 0x01, b'b'];
        let index = |id: u32| {
            let mut entry = vec![4, 0, 0, 0, 0xFD];
            entry.extend_from_slice(&id.to_le_bytes());
            entry
        };
        let graphics = |id: u32, body: &[u8]| {
            let mut entry = id.to_le_bytes().to_vec();
            entry.extend_from_slice(&(body.len() as u32).to_le_bytes());
            entry.extend_from_slice(body);
            entry
        };
        let file = |first: Vec<u8>, second: Vec<u8>| {
            let mut bytes = header(23);
            bytes.extend(index(2));
            bytes.extend(index(1));
            bytes.extend_from_slice(&[0, 0, 0, 0]);
            bytes.extend(first);
            bytes.extend(second);
            bytes.extend_from_slice(&[0, 0, 0, 0]);
            bytes
        };

        let in_order = file(graphics(2, &two), graphics(1, &one));
        let (records, sprites) = read_grf(&in_order).expect("read");
        assert_eq!(graphics_order(&records, &sprites), vec![2, 1]);
        assert_eq!(write_grf(&records, &sprites), in_order);

        let out_of_order = file(graphics(1, &one), graphics(2, &two));
        let (records, sprites) = read_grf(&out_of_order).expect("read");
        assert_eq!(graphics_order(&records, &sprites), vec![2, 1]);
        assert_eq!(write_grf(&records, &sprites), in_order);
    }

    #[test]
    fn unindexed_graphics_come_last() {
        let mut sprites = SpriteZoomMap::new();
        let sound = |name: &[u8]| {
            SpriteChild::Sound(ActionFFRecord {
                name: name.to_vec(),
                data: Vec::new(),
            })
        };
        sprites.push(8, sound(b"x"));
        sprites.push(3, sound(b"y"));
        sprites.push(5, sound(b"z"));
        let records = vec![
            Record::SpriteIndex(SpriteIndexRecord { sprite_id: 5 }),
            Record::SpriteIndex(SpriteIndexRecord { sprite_id: 6 }),
            Record::SpriteIndex(SpriteIndexRecord { sprite_id: 5 }),
        ];
        assert_eq!(graphics_order(&records, &sprites), vec![5, 8, 3]);
    }

    #[test]
    fn bad_signature() {
        assert!(matches!(read_grf(b"GRF"), Err(ReadError::BadSignature)));
        let mut bytes = header(5);
        bytes[2] = b'X';
        assert!(matches!(read_grf(&bytes), Err(ReadError::BadSignature)));
    }

    #[test]
    fn compressed_files_are_unsupported() {
        let mut bytes = header(5);
        bytes[14] = 1;
        assert!(matches!(
            read_grf(&bytes),
            Err(ReadError::UnsupportedCompression { value: 1 })
        ));
    }

    #[test]
    fn graphics_offset_must_match() {
        let mut bytes = header(6);
        bytes.extend_from_slice(&[0; 8]);
        assert!(matches!(
            read_grf(&bytes),
            Err(ReadError::InvalidValue { field: "graphics offset", value: 6, .. })
        ));
    }

    #[test]
    fn truncated_entry() {
        let mut bytes = header(5);
        bytes.extend_from_slice(&[8, 0, 0, 0, 0xFF, 0x0D]);
        assert!(matches!(read_grf(&bytes), Err(ReadError::UnexpectedEof { .. })));
    }
}
