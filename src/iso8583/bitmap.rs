use byteorder::ByteOrder;
use serde::Serialize;

use crate::iso8583::IsoError;

/// Number of hex characters in one bitmap block on the wire
pub const BITMAP_HEX_LEN: usize = 16;

/// Number of positions covered by a single bitmap block
pub const BITMAP_BITS: u32 = 64;

/// A single 64 bit block of the bitmap chain. Position 1 of every block is the
/// continuation flag and is never reported as a field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Bitmap {
    hexadecimal: String,
    binary: String,
    fields: Vec<u32>,
    #[serde(skip)]
    value: u64,
}

impl Bitmap {
    /// Decodes the block at `index` (0 = primary) from its 16 character hex text
    pub fn decode(hex_text: &str, index: usize) -> Result<Bitmap, IsoError> {
        if hex_text.chars().count() != BITMAP_HEX_LEN {
            return Err(IsoError::BitmapTooShort);
        }
        if !hex_text.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(IsoError::BitmapNotHex);
        }

        let data = hex::decode(hex_text).map_err(|_| IsoError::BitmapNotHex)?;
        let value = byteorder::BigEndian::read_u64(data.as_slice());

        let base = BITMAP_BITS * index as u32;
        let mut bmp = Bitmap {
            hexadecimal: hex_text.to_string(),
            binary: format!("{:064b}", value),
            fields: Vec::new(),
            value,
        };
        let fields = (2..=BITMAP_BITS)
            .filter(|pos| bmp.is_on(*pos))
            .map(|pos| base + pos)
            .collect();
        bmp.fields = fields;

        trace!("bitmap[{}] := {} {:?}", index, bmp.hexadecimal, bmp.fields);
        Ok(bmp)
    }

    /// Returns true if position `pos` (1..=64, relative to this block) is set
    pub fn is_on(&self, pos: u32) -> bool {
        if pos == 0 || pos > BITMAP_BITS {
            return false;
        }
        self.value >> (BITMAP_BITS - pos) as u64 & 0x01 == 0x01
    }

    /// Returns true if another bitmap follows this one
    pub fn has_next(&self) -> bool {
        self.is_on(1)
    }

    pub fn value(&self) -> u64 {
        self.value
    }

    /// The hex text as received on the message
    pub fn hexadecimal(&self) -> &str {
        &self.hexadecimal
    }

    /// The 64 character binary expansion of the block
    pub fn binary(&self) -> &str {
        &self.binary
    }

    /// Field numbers present in this block, offset by 64 per preceding block
    pub fn fields(&self) -> &[u32] {
        &self.fields
    }
}

/// Decodes the bitmap chain that starts `offset` characters into `raw`. Blocks are
/// read for as long as the last decoded one has its continuation bit set.
///
/// `max_bitmaps` optionally bounds the length of the chain.
pub fn decode_chain(
    raw: &str,
    offset: usize,
    max_bitmaps: Option<usize>,
) -> Result<Vec<Bitmap>, IsoError> {
    let mut rest = raw.chars().skip(offset);
    let mut bitmaps: Vec<Bitmap> = Vec::new();

    loop {
        if let Some(max) = max_bitmaps {
            if bitmaps.len() >= max {
                return Err(IsoError::BitmapChainTooLong { max });
            }
        }

        // block k spans [offset + 16k, offset + 16k + 16)
        let hex_text: String = rest.by_ref().take(BITMAP_HEX_LEN).collect();
        let bmp = Bitmap::decode(&hex_text, bitmaps.len())?;
        let has_next = bmp.has_next();
        bitmaps.push(bmp);

        if !has_next {
            break;
        }
    }

    debug!("decoded {} bitmap(s)", bitmaps.len());
    Ok(bitmaps)
}

#[test]
fn test_bmp() {
    let bmp = Bitmap::decode("823A000020000000", 0).unwrap();

    assert!(bmp.has_next());
    assert_eq!(0x823A000020000000, bmp.value());
    assert_eq!(
        "1000001000111010000000000000000000100000000000000000000000000000",
        bmp.binary()
    );
    assert_eq!(&[7, 11, 12, 13, 15, 35], bmp.fields());

    for i in 1..65 {
        let expected = i == 1 || bmp.fields().contains(&i);
        assert_eq!(expected, bmp.is_on(i), "position {}", i);
    }
    assert!(!bmp.is_on(0));
    assert!(!bmp.is_on(65));
}

#[test]
fn test_bmp_offsets_by_block() {
    let bmp = Bitmap::decode("8400000000000000", 1).unwrap();
    assert_eq!(&[70], bmp.fields());

    // continuation flag of a later block is never a field either
    let bmp = Bitmap::decode("C000000000000001", 2).unwrap();
    assert_eq!(&[130, 192], bmp.fields());
}

#[test]
fn test_bmp_mixed_case_hex() {
    let lower = Bitmap::decode("f23a400108418202", 0).unwrap();
    let upper = Bitmap::decode("F23A400108418202", 0).unwrap();
    assert_eq!(lower.fields(), upper.fields());
    assert_eq!(lower.binary(), upper.binary());
    assert_eq!("f23a400108418202", lower.hexadecimal());
}

#[test]
fn test_bmp_binary_is_64_chars() {
    for hex_text in &["0000000000000000", "FFFFFFFFFFFFFFFF", "0123456789abcdef"] {
        let bmp = Bitmap::decode(hex_text, 0).unwrap();
        assert_eq!(64, bmp.binary().len());
        assert!(bmp.binary().chars().all(|c| c == '0' || c == '1'));
    }
}

#[test]
fn test_bmp_rejects() {
    assert_eq!(Err(IsoError::BitmapTooShort), Bitmap::decode("823A", 0));
    assert_eq!(Err(IsoError::BitmapNotHex), Bitmap::decode("823A00002000000G", 0));
    assert_eq!(Err(IsoError::BitmapNotHex), Bitmap::decode("823A0000 0000000", 0));
    assert_eq!(Err(IsoError::BitmapNotHex), Bitmap::decode("823A00002000000É", 0));
}

#[test]
fn test_decode_chain() {
    let raw = "0800823A000020000000840000000000000004200906139000010906130420042003ÉÉÉ001";
    let bitmaps = decode_chain(raw, 4, None).unwrap();

    assert_eq!(3, bitmaps.len());
    assert_eq!("823A000020000000", bitmaps[0].hexadecimal());
    assert_eq!("8400000000000000", bitmaps[1].hexadecimal());
    assert_eq!("0420090613900001", bitmaps[2].hexadecimal());
    assert_eq!(
        &[134, 139, 149, 152, 158, 159, 164, 167, 168, 169, 172, 192],
        bitmaps[2].fields()
    );
}

#[test]
fn test_decode_chain_single() {
    let bitmaps = decode_chain("0800223A000020000000", 4, None).unwrap();
    assert_eq!(1, bitmaps.len());
    assert_eq!(&[3, 7, 11, 12, 13, 15, 35], bitmaps[0].fields());
}

#[test]
fn test_decode_chain_short_continuation() {
    // primary says a secondary follows, but only 10 characters remain
    assert_eq!(
        Err(IsoError::BitmapTooShort),
        decode_chain("0800823A0000200000008400000000", 4, None)
    );
}

#[test]
fn test_decode_chain_cap() {
    let raw = "0800823A000020000000840000000000000004200906139000010906130420042003";
    assert_eq!(3, decode_chain(raw, 4, Some(3)).unwrap().len());
    assert_eq!(
        Err(IsoError::BitmapChainTooLong { max: 2 }),
        decode_chain(raw, 4, Some(2))
    );
}
