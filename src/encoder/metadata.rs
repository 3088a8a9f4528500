// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
/*! The colors-and-flags texture.

Each object gets eight RGBA8UI texels (32 bytes) in one row, 512 objects per row:

| Column | Bytes   | Contents                                               |
|--------|---------|--------------------------------------------------------|
| 0      | 0..4    | color                                                  |
| 1      | 4..8    | pick color                                             |
| 2      | 8..12   | flags (zero at creation)                               |
| 3      | 12..16  | flags2 (zero at creation)                              |
| 4      | 16..20  | vertex base, most significant byte first               |
| 5      | 20..24  | triangle index base offset, most significant byte first |
| 6      | 24..28  | edge index base offset, most significant byte first    |
| 7      | 28..32  | solid flag in byte 0, then three zero bytes             |

The buffer is zero-filled before any object is written, and flags/flags2 are never written here.
They belong to whoever tracks visibility state and are filled in later through the same
texture.
*/

use super::{DataTexture, TextureLayoutEncoder, check_len};
use crate::Error;
use crate::bittricks::{u8s_to_u32, u32_to_u8s};
use crate::layout::{Category, TextureLayout};
use crate::packed::PackedBuffer;
use crate::pixel_formats::ComponentFormat;
use crate::sink::TextureSink;
use crate::stats::RamAccountant;

/// Bytes per object in the colors-and-flags texture.
pub const COLORS_AND_FLAGS_RECORD_BYTES: usize = 32;

const COLOR: usize = 0;
const PICK_COLOR: usize = 4;
const FLAGS: usize = 8;
const FLAGS2: usize = 12;
const VERTEX_BASE: usize = 16;
const INDEX_BASE_OFFSET: usize = 20;
const EDGE_INDEX_BASE_OFFSET: usize = 24;
const SOLID: usize = 28;

/// What the encoder writes for one object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ObjectRecord {
    pub color: [u8; 4],
    pub pick_color: [u8; 4],
    /// First vertex of the object in the positions texture.
    pub vertex_base: u32,
    /// Offset between `vertex_index / 3` and where the object's triangles start in the
    /// indices texture.
    pub index_base_offset: u32,
    /// Offset between `vertex_index / 2` and where the object's edges start in the edge
    /// indices texture.
    pub edge_index_base_offset: u32,
    pub solid: bool,
}

impl ObjectRecord {
    /// The 32 bytes this object occupies.  Flags columns are zero.
    pub fn encode(&self) -> [u8; COLORS_AND_FLAGS_RECORD_BYTES] {
        let mut out = [0; COLORS_AND_FLAGS_RECORD_BYTES];
        out[COLOR..COLOR + 4].copy_from_slice(&self.color);
        out[PICK_COLOR..PICK_COLOR + 4].copy_from_slice(&self.pick_color);
        out[VERTEX_BASE..VERTEX_BASE + 4].copy_from_slice(&u32_to_u8s(self.vertex_base));
        out[INDEX_BASE_OFFSET..INDEX_BASE_OFFSET + 4]
            .copy_from_slice(&u32_to_u8s(self.index_base_offset));
        out[EDGE_INDEX_BASE_OFFSET..EDGE_INDEX_BASE_OFFSET + 4]
            .copy_from_slice(&u32_to_u8s(self.edge_index_base_offset));
        out[SOLID] = u8::from(self.solid);
        out
    }
}

/// One object's block as read back from the texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ObjectMetadata {
    pub record: ObjectRecord,
    pub flags: [u8; 4],
    pub flags2: [u8; 4],
}

impl ObjectMetadata {
    /// Decodes a 32-byte block written by [`ObjectRecord::encode`].
    pub fn decode(block: &[u8; COLORS_AND_FLAGS_RECORD_BYTES]) -> Self {
        let column = |offset: usize| -> [u8; 4] {
            [
                block[offset],
                block[offset + 1],
                block[offset + 2],
                block[offset + 3],
            ]
        };
        ObjectMetadata {
            record: ObjectRecord {
                color: column(COLOR),
                pick_color: column(PICK_COLOR),
                vertex_base: u8s_to_u32(column(VERTEX_BASE)),
                index_base_offset: u8s_to_u32(column(INDEX_BASE_OFFSET)),
                edge_index_base_offset: u8s_to_u32(column(EDGE_INDEX_BASE_OFFSET)),
                solid: block[SOLID] != 0,
            },
            flags: column(FLAGS),
            flags2: column(FLAGS2),
        }
    }
}

/// The colors-and-flags texture, with its buffer kept for CPU-side picking read-back.
#[derive(Debug)]
pub struct ColorsAndFlagsTexture<H> {
    texture: DataTexture<H>,
    buffer: PackedBuffer<u8>,
    objects: usize,
}

impl<H> ColorsAndFlagsTexture<H> {
    pub fn texture(&self) -> &DataTexture<H> {
        &self.texture
    }

    pub fn buffer(&self) -> &PackedBuffer<u8> {
        &self.buffer
    }

    /// Number of objects packed.
    pub fn len(&self) -> usize {
        self.objects
    }

    pub fn is_empty(&self) -> bool {
        self.objects == 0
    }

    /// Reads object `index` back out of the buffer.
    pub fn object(&self, index: usize) -> Result<ObjectMetadata, Error> {
        if index >= self.objects {
            return Err(Error::OutOfBounds {
                index,
                count: self.objects,
            });
        }
        let offset = self.buffer.layout().record_offset(index);
        let mut block = [0; COLORS_AND_FLAGS_RECORD_BYTES];
        block.copy_from_slice(self.buffer.read(offset, COLORS_AND_FLAGS_RECORD_BYTES));
        Ok(ObjectMetadata::decode(&block))
    }

    /// The object whose pick color is `pick_color`, if any.
    pub fn find_pick_color(&self, pick_color: [u8; 4]) -> Option<usize> {
        (0..self.objects).find(|&i| {
            let offset = self.buffer.layout().record_offset(i) + PICK_COLOR;
            self.buffer.read(offset, 4) == pick_color
        })
    }
}

impl<S: TextureSink, A: RamAccountant> TextureLayoutEncoder<S, A> {
    /// Packs one 32-byte block per object.  Fails when `objects` is empty.
    pub fn colors_and_flags_texture(
        &mut self,
        objects: &[ObjectRecord],
    ) -> Result<ColorsAndFlagsTexture<S::Handle>, Error> {
        let layout = TextureLayout::for_records(
            Category::ColorsAndFlags,
            ComponentFormat::RGBA8UI,
            objects.len(),
        )?;
        let mut buffer = PackedBuffer::zeroed(layout);
        for (i, object) in objects.iter().enumerate() {
            buffer.write(layout.record_offset(i), &object.encode());
        }
        let texture = self.upload(&buffer);
        Ok(ColorsAndFlagsTexture {
            texture,
            buffer,
            objects: objects.len(),
        })
    }

    /// Like [`colors_and_flags_texture`](Self::colors_and_flags_texture), from one array per
    /// column.  All arrays must have the length of `colors`.
    #[allow(clippy::too_many_arguments)]
    pub fn colors_and_flags_texture_from_columns(
        &mut self,
        colors: &[[u8; 4]],
        pick_colors: &[[u8; 4]],
        vertex_bases: &[u32],
        index_base_offsets: &[u32],
        edge_index_base_offsets: &[u32],
        solid: &[bool],
    ) -> Result<ColorsAndFlagsTexture<S::Handle>, Error> {
        let category = Category::ColorsAndFlags;
        let n = colors.len();
        check_len(category, n, pick_colors.len())?;
        check_len(category, n, vertex_bases.len())?;
        check_len(category, n, index_base_offsets.len())?;
        check_len(category, n, edge_index_base_offsets.len())?;
        check_len(category, n, solid.len())?;
        let objects: Vec<ObjectRecord> = (0..n)
            .map(|i| ObjectRecord {
                color: colors[i],
                pick_color: pick_colors[i],
                vertex_base: vertex_bases[i],
                index_base_offset: index_base_offsets[i],
                edge_index_base_offset: edge_index_base_offsets[i],
                solid: solid[i],
            })
            .collect();
        self.colors_and_flags_texture(&objects)
    }
}
