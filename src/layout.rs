// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
/*! Texture dimensions for each record kind.

Every data texture has a fixed width chosen per category, and a height just large enough to hold
all of its records:

```text
height = ceil(record_count / records_per_row)
records_per_row = width / texels_per_record
```

Widths are picked so that `texels_per_record` divides `width` exactly.  As a result a record
never straddles a row boundary, and the component offset of record `i` is `i * texels_per_record *
components_per_texel` no matter how many rows the texture has.  Consumers recover record `i` with
nothing but the width:

```text
x = (i % records_per_row) * texels_per_record
y = i / records_per_row
```
*/

use crate::error::Error;
use crate::pixel_formats::ComponentFormat;
use std::fmt::Display;

/// The kinds of record this crate knows how to lay out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// View, view-normal and projection matrix of the camera.
    Camera,
    /// World and world-normal matrix of a model.
    Model,
    /// Eight RGBA8 columns per object.
    ColorsAndFlags,
    /// One XYZ float offset per object.
    ObjectOffsets,
    /// One 4×4 float matrix per object.
    PositionsDecodeMatrices,
    /// One triangle (three vertex indices) per texel.
    Indices,
    /// One edge (two vertex indices) per texel.
    EdgeIndices,
    /// One quantized XYZ position per texel.
    Positions,
    /// One owning-portion id per vertex.
    PortionIds,
}

impl Category {
    pub const ALL: [Category; 9] = [
        Category::Camera,
        Category::Model,
        Category::ColorsAndFlags,
        Category::ObjectOffsets,
        Category::PositionsDecodeMatrices,
        Category::Indices,
        Category::EdgeIndices,
        Category::Positions,
        Category::PortionIds,
    ];

    /// Fixed texture width, in texels.
    pub const fn width(self) -> u32 {
        match self {
            Category::Camera | Category::Model => 4,
            Category::ColorsAndFlags => 512 * 8,
            Category::ObjectOffsets => 512,
            Category::PositionsDecodeMatrices => 512 * 4,
            Category::Indices
            | Category::EdgeIndices
            | Category::Positions
            | Category::PortionIds => 4096,
        }
    }

    /// Texels one record occupies within its row.
    pub const fn texels_per_record(self) -> u32 {
        match self {
            Category::Camera | Category::Model | Category::PositionsDecodeMatrices => 4,
            Category::ColorsAndFlags => 8,
            Category::ObjectOffsets
            | Category::Indices
            | Category::EdgeIndices
            | Category::Positions
            | Category::PortionIds => 1,
        }
    }

    pub const fn records_per_row(self) -> u32 {
        self.width() / self.texels_per_record()
    }

    /// Components in each texel.
    pub const fn components_per_texel(self) -> u8 {
        match self {
            Category::Camera
            | Category::Model
            | Category::ColorsAndFlags
            | Category::PositionsDecodeMatrices => 4,
            Category::ObjectOffsets | Category::Indices | Category::Positions => 3,
            Category::EdgeIndices => 2,
            Category::PortionIds => 1,
        }
    }

    /// Components in each record.
    pub const fn components_per_record(self) -> usize {
        self.texels_per_record() as usize * self.components_per_texel() as usize
    }

    /// Whether an empty input means "no texture" rather than a configuration error.
    pub const fn absent_when_empty(self) -> bool {
        matches!(
            self,
            Category::Indices | Category::EdgeIndices | Category::PortionIds
        )
    }

    /// Whether textures of this category are reported to the RAM accountant.
    pub const fn is_ram_tracked(self) -> bool {
        !matches!(self, Category::Camera | Category::Model)
    }

    pub const fn label(self) -> &'static str {
        match self {
            Category::Camera => "camera",
            Category::Model => "model",
            Category::ColorsAndFlags => "colors_and_flags",
            Category::ObjectOffsets => "object_offsets",
            Category::PositionsDecodeMatrices => "positions_decode_matrices",
            Category::Indices => "indices",
            Category::EdgeIndices => "edge_indices",
            Category::Positions => "positions",
            Category::PortionIds => "portion_ids",
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Integer ceiling division of `records` over `records_per_row`.
pub const fn height_for(records: usize, records_per_row: u32) -> usize {
    records.div_ceil(records_per_row as usize)
}

/// Integer texture coordinates.  Origin is the top-left texel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Texel {
    pub x: u32,
    pub y: u32,
}

/// The dimensions and format of one data texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureLayout {
    category: Category,
    width: u32,
    height: u32,
    format: ComponentFormat,
}

impl TextureLayout {
    /// Lays out `records` records of `category` in `format`.
    ///
    /// Fails with [`Error::ZeroHeight`] when there are no records.  Categories where empty input
    /// is legal check for it before getting here.
    pub fn for_records(
        category: Category,
        format: ComponentFormat,
        records: usize,
    ) -> Result<Self, Error> {
        debug_assert_eq!(format.components(), category.components_per_texel());
        let height = height_for(records, category.records_per_row());
        if height == 0 {
            return Err(Error::ZeroHeight { category });
        }
        let height = u32::try_from(height).map_err(|_| Error::TooLarge { category, height })?;
        Ok(TextureLayout {
            category,
            width: category.width(),
            height,
            format,
        })
    }

    /// A layout with a height known up front, for the fixed-size matrix textures.
    pub(crate) const fn fixed(category: Category, format: ComponentFormat, height: u32) -> Self {
        TextureLayout {
            category,
            width: category.width(),
            height,
            format,
        }
    }

    pub const fn category(&self) -> Category {
        self.category
    }

    pub const fn width(&self) -> u32 {
        self.width
    }

    pub const fn height(&self) -> u32 {
        self.height
    }

    pub const fn format(&self) -> ComponentFormat {
        self.format
    }

    pub const fn texel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Records the texture has room for, including unused trailing slots.
    pub const fn record_capacity(&self) -> usize {
        self.height as usize * self.category.records_per_row() as usize
    }

    pub const fn component_count(&self) -> usize {
        self.texel_count() * self.format.components() as usize
    }

    pub const fn byte_len(&self) -> usize {
        self.texel_count() * self.format.bytes_per_texel()
    }

    /// Bytes in one unpadded row.
    pub const fn row_pitch(&self) -> usize {
        self.width as usize * self.format.bytes_per_texel()
    }

    /// First texel of record `index`.
    pub const fn record_texel(&self, index: usize) -> Texel {
        let per_row = self.category.records_per_row() as usize;
        Texel {
            x: ((index % per_row) as u32) * self.category.texels_per_record(),
            y: (index / per_row) as u32,
        }
    }

    /// Offset, in components, of the first component of record `index`.
    ///
    /// Depends only on the category, never on the height.
    pub const fn record_offset(&self, index: usize) -> usize {
        index * self.category.components_per_record()
    }

    /// Offset, in components, of the first component of `texel`.
    pub const fn texel_offset(&self, texel: Texel) -> usize {
        (texel.y as usize * self.width as usize + texel.x as usize)
            * self.format.components() as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn widths_hold_whole_records() {
        for category in Category::ALL {
            assert_eq!(
                category.width() % category.texels_per_record(),
                0,
                "{category}"
            );
        }
        assert_eq!(Category::ColorsAndFlags.records_per_row(), 512);
        assert_eq!(Category::PositionsDecodeMatrices.records_per_row(), 512);
        assert_eq!(Category::ObjectOffsets.records_per_row(), 512);
        assert_eq!(Category::Indices.records_per_row(), 4096);
    }

    #[test]
    fn height_is_ceiling() {
        for per_row in [1_u32, 4, 512, 4096] {
            for records in 1..=(3 * per_row as usize + 1) {
                let height = height_for(records, per_row);
                assert!(height * per_row as usize >= records);
                assert!((height - 1) * (per_row as usize) < records);
            }
        }
        assert_eq!(height_for(0, 512), 0);
        assert_eq!(height_for(512, 512), 1);
        assert_eq!(height_for(513, 512), 2);
    }

    #[test]
    fn zero_records_is_zero_height() {
        let err = TextureLayout::for_records(Category::ObjectOffsets, ComponentFormat::RGB32F, 0)
            .unwrap_err();
        assert_eq!(
            err,
            Error::ZeroHeight {
                category: Category::ObjectOffsets
            }
        );
    }

    #[test]
    fn record_addressing_ignores_height() {
        let small =
            TextureLayout::for_records(Category::ColorsAndFlags, ComponentFormat::RGBA8UI, 10)
                .unwrap();
        let big =
            TextureLayout::for_records(Category::ColorsAndFlags, ComponentFormat::RGBA8UI, 5000)
                .unwrap();
        assert_eq!(small.height(), 1);
        assert_eq!(big.height(), 10);
        for i in [0, 1, 9] {
            assert_eq!(small.record_offset(i), big.record_offset(i));
            assert_eq!(small.record_offset(i), i * 32);
        }
        // record 513 starts in the second row, one record in
        let texel = big.record_texel(513);
        assert_eq!(texel, Texel { x: 8, y: 1 });
        assert_eq!(big.texel_offset(texel), big.record_offset(513));
    }

    #[test]
    fn sizes() {
        let layout =
            TextureLayout::for_records(Category::Positions, ComponentFormat::RGB16UI, 4097)
                .unwrap();
        assert_eq!(layout.width(), 4096);
        assert_eq!(layout.height(), 2);
        assert_eq!(layout.component_count(), 4096 * 2 * 3);
        assert_eq!(layout.byte_len(), 4096 * 2 * 6);
        assert_eq!(layout.row_pitch(), 4096 * 6);
        assert_eq!(layout.record_capacity(), 8192);
    }
}
