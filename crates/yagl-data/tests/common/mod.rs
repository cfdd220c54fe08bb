//! Builders for small GRF files.

#![allow(dead_code)]

use yagl_data::container::SIGNATURE;

pub const INFO_ACTION: u8 = 0xFF;
pub const INFO_SPRITE_INDEX: u8 = 0xFD;

/// Container bytes for the given data entries and graphics entries.
pub fn grf(data: &[(u8, &[u8])], graphics: &[(u32, &[u8])]) -> Vec<u8> {
    let mut section = Vec::new();
    for (info, payload) in data {
        section.extend_from_slice(&(payload.len() as u32).to_le_bytes());
        section.push(*info);
        section.extend_from_slice(payload);
    }
    section.extend_from_slice(&0u32.to_le_bytes());

    let mut bytes = SIGNATURE.to_vec();
    // The offset counts the compression byte as well.
    bytes.extend_from_slice(&(section.len() as u32 + 1).to_le_bytes());
    bytes.push(0);
    bytes.extend_from_slice(&section);
    for (id, body) in graphics {
        bytes.extend_from_slice(&id.to_le_bytes());
        bytes.extend_from_slice(&(body.len() as u32).to_le_bytes());
        bytes.extend_from_slice(body);
    }
    bytes.extend_from_slice(&0u32.to_le_bytes());
    bytes
}

/// A real sprite body: colour RGB, zoom Normal, `width` x 1 pixels.
pub fn image(width: u16, x_offset: i16, pixels: &[u8]) -> Vec<u8> {
    let mut body = vec![0x01, 0x00];
    body.extend_from_slice(&1u16.to_le_bytes());
    body.extend_from_slice(&width.to_le_bytes());
    body.extend_from_slice(&x_offset.to_le_bytes());
    body.extend_from_slice(&0i16.to_le_bytes());
    body.extend_from_slice(pixels);
    body
}
