use crate::error::FormatError;

/// Size of a block header in bytes — fixed regardless of payload size.
///
/// ```text
/// ┌────────┬─────────┬─────────────────────────────────────┐
/// │ Offset │ Size    │ Description                         │
/// ├────────┼─────────┼─────────────────────────────────────┤
/// │ 0x00   │ 2 bytes │ CR LF                                │
/// │ 0x02   │ 8 bytes │ payload_size, ASCII hex              │
/// │ 0x0A   │ 1 byte  │ space                                │
/// │ 0x0B   │ 8 bytes │ block_size, ASCII hex                │
/// │ 0x13   │ 1 byte  │ space                                │
/// │ 0x14   │ 8 bytes │ next_raw, ASCII hex                  │
/// │ 0x1C   │ 1 byte  │ space                                │
/// │ 0x1D   │ 2 bytes │ CR LF                                │
/// └────────┴─────────┴─────────────────────────────────────┘
/// ```
pub const HEADER_SIZE: usize = 31;

/// Sentinel value for `next_raw` meaning "this is the last block in the
/// chain" rather than a raw byte offset.
pub const NO_NEXT: u32 = 0x7FFF_FFFF;

/// Absolute bound on the total bytes `read_entity_full` will concatenate,
/// so a pathological (or hostile) container can't exhaust memory.
const MAX_ENTITY_BYTES: usize = 1 << 30;

/// A parsed block header plus the offset its payload starts at.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlockHeader {
    pub payload_size: u32,
    pub block_size: u32,
    /// `None` once `next_raw` was the terminator sentinel.
    pub next_raw: Option<u32>,
    /// Offset into the source buffer where this block's payload begins.
    pub data_start: usize,
}

fn parse_hex_field(field: &[u8], offset: u64) -> Result<u32, FormatError> {
    let text = std::str::from_utf8(field).map_err(|_| FormatError::Malformed {
        offset,
        reason: "hex field is not ASCII".to_owned(),
    })?;
    u32::from_str_radix(text, 16).map_err(|_| FormatError::Malformed {
        offset,
        reason: format!("could not parse hex field {text:?}"),
    })
}

/// Parse the 31-byte header at `raw_offset` within `buf`.
///
/// # Errors
///
/// Returns [`FormatError::Malformed`] if the CRLF/space framing doesn't
/// match, a hex field doesn't parse, `payload_size` exceeds what
/// `block_size` leaves room for, or the payload itself runs past the end
/// of `buf`.
pub fn read_block(buf: &[u8], raw_offset: u64) -> Result<BlockHeader, FormatError> {
    let start = usize::try_from(raw_offset).map_err(|_| FormatError::Malformed {
        offset: raw_offset,
        reason: "offset does not fit in usize".to_owned(),
    })?;
    let header_end = start
        .checked_add(HEADER_SIZE)
        .ok_or_else(|| FormatError::Malformed {
            offset: raw_offset,
            reason: "header offset overflowed".to_owned(),
        })?;
    let header = buf
        .get(start..header_end)
        .ok_or_else(|| FormatError::Malformed {
            offset: raw_offset,
            reason: "buffer too short for block header".to_owned(),
        })?;

    if &header[0..2] != b"\r\n" || &header[29..31] != b"\r\n" {
        return Err(FormatError::Malformed {
            offset: raw_offset,
            reason: "missing CRLF framing".to_owned(),
        });
    }
    if header[10] != b' ' || header[19] != b' ' || header[28] != b' ' {
        return Err(FormatError::Malformed {
            offset: raw_offset,
            reason: "missing field separator".to_owned(),
        });
    }

    let payload_size = parse_hex_field(&header[2..10], raw_offset)?;
    let block_size = parse_hex_field(&header[11..19], raw_offset)?;
    let next_field = parse_hex_field(&header[20..28], raw_offset)?;

    let max_payload = block_size
        .checked_sub(HEADER_SIZE as u32)
        .ok_or_else(|| FormatError::Malformed {
            offset: raw_offset,
            reason: format!("block_size {block_size} smaller than header"),
        })?;
    if payload_size > max_payload {
        return Err(FormatError::Malformed {
            offset: raw_offset,
            reason: format!("payload_size {payload_size} exceeds block_size {block_size}"),
        });
    }

    let data_start = header_end;
    let payload_end = data_start
        .checked_add(payload_size as usize)
        .ok_or_else(|| FormatError::Malformed {
            offset: raw_offset,
            reason: "payload end overflowed".to_owned(),
        })?;
    if payload_end > buf.len() {
        return Err(FormatError::Malformed {
            offset: raw_offset,
            reason: "payload runs past end of buffer".to_owned(),
        });
    }

    let next_raw = (next_field != NO_NEXT).then_some(next_field);

    Ok(BlockHeader {
        payload_size,
        block_size,
        next_raw,
        data_start,
    })
}

/// Walk the `next_raw` chain starting at `raw_offset`, concatenating each
/// block's `payload_size` bytes into one owned buffer.
///
/// # Errors
///
/// Returns [`FormatError::Malformed`] if any visited header is unparseable,
/// [`FormatError::Cycle`] if the chain revisits an offset (every hop must
/// strictly increase), and [`FormatError::EntityTooLarge`] if the
/// concatenated output would exceed 1 GiB.
pub fn read_entity_full(buf: &[u8], raw_offset: u64) -> Result<Vec<u8>, FormatError> {
    let mut out = Vec::new();
    let mut offset = raw_offset;
    let mut previous: Option<u64> = None;

    loop {
        if let Some(prev) = previous {
            if offset <= prev {
                return Err(FormatError::Cycle { offset });
            }
        }
        previous = Some(offset);

        let header = read_block(buf, offset)?;
        let payload = &buf[header.data_start..header.data_start + header.payload_size as usize];

        if out.len() + payload.len() > MAX_ENTITY_BYTES {
            return Err(FormatError::EntityTooLarge);
        }
        out.extend_from_slice(payload);

        match header.next_raw {
            Some(next) => offset = u64::from(next),
            None => break,
        }
    }

    Ok(out)
}
