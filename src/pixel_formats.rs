// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
//! Component formats for data textures.
//!
//! A data texture is never filtered or displayed, so the only things a format has to encode are:
//!
//! - the scalar type of each component (8/16/32-bit unsigned integer or 32-bit float)
//! - the number of components per texel (R, RG, RGB, RGBA)
//!
//! Together these fix the byte size of a texel, and with the texture width, the row pitch.
//!
//! # Available Formats
//!
//! | Scalar | 1         | 2          | 3           | 4           |
//! |--------|-----------|------------|-------------|-------------|
//! | `u8`   | [`R8UI`]  | [`RG8UI`]  | [`RGB8UI`]  | [`RGBA8UI`] |
//! | `u16`  | [`R16UI`] | [`RG16UI`] | [`RGB16UI`] |             |
//! | `u32`  | [`R32UI`] | [`RG32UI`] | [`RGB32UI`] |             |
//! | `f32`  | [`R32F`]  | [`RG32F`]  | [`RGB32F`]  | [`RGBA32F`] |
//!
//! [`R8UI`]: ComponentFormat::R8UI
//! [`RG8UI`]: ComponentFormat::RG8UI
//! [`RGB8UI`]: ComponentFormat::RGB8UI
//! [`RGBA8UI`]: ComponentFormat::RGBA8UI
//! [`R16UI`]: ComponentFormat::R16UI
//! [`RG16UI`]: ComponentFormat::RG16UI
//! [`RGB16UI`]: ComponentFormat::RGB16UI
//! [`R32UI`]: ComponentFormat::R32UI
//! [`RG32UI`]: ComponentFormat::RG32UI
//! [`RGB32UI`]: ComponentFormat::RGB32UI
//! [`R32F`]: ComponentFormat::R32F
//! [`RG32F`]: ComponentFormat::RG32F
//! [`RGB32F`]: ComponentFormat::RGB32F
//! [`RGBA32F`]: ComponentFormat::RGBA32F

/*
Quick note on type design.  Pixel formats in a texture library are usually zero-sized types so that
`write(x, y, value)` can be typechecked.  Here the format is picked at runtime (the caller chooses
an index width per layer), so the format itself is a value, and only the scalar type is lifted into
the type system through the sealed `Component` trait.  That still gives us typed packed buffers
(`PackedBuffer<u16>` can't be handed a `u32` slice) without a type per format.
 */

use crate::pixel_formats::sealed::Component;
use std::fmt::{Debug, Display};

/// Sealed traits for component type safety.
///
/// Only the four scalar types a GPU data texture can hold implement these.
pub(crate) mod sealed {
    /// A scalar that can be stored in a data texture component.
    pub trait Component:
        bytemuck::Pod + std::fmt::Debug + PartialEq + Send + Sync + 'static
    {
        /// The runtime tag for this scalar.
        const TYPE: super::ComponentType;
        /// The value unused texels are filled with.
        const ZERO: Self;
    }
}

/// A scalar that can be stored in a data texture component.
///
/// This trait is sealed: it is implemented for `u8`, `u16`, `u32` and `f32` only.
pub trait TexelComponent: Component {}
impl<T: Component> TexelComponent for T {}

/// The scalar type of one texel component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentType {
    U8,
    U16,
    U32,
    F32,
}

impl ComponentType {
    /// Bytes occupied by a single component.
    pub const fn byte_size(self) -> usize {
        match self {
            ComponentType::U8 => 1,
            ComponentType::U16 => 2,
            ComponentType::U32 | ComponentType::F32 => 4,
        }
    }

    pub const fn is_integer(self) -> bool {
        !matches!(self, ComponentType::F32)
    }
}

impl Component for u8 {
    const TYPE: ComponentType = ComponentType::U8;
    const ZERO: Self = 0;
}
impl Component for u16 {
    const TYPE: ComponentType = ComponentType::U16;
    const ZERO: Self = 0;
}
impl Component for u32 {
    const TYPE: ComponentType = ComponentType::U32;
    const ZERO: Self = 0;
}
impl Component for f32 {
    const TYPE: ComponentType = ComponentType::F32;
    const ZERO: Self = 0.0;
}

/// The per-texel layout of a data texture: a scalar type and a component count.
///
/// Only the combinations listed in the module documentation can be constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ComponentFormat {
    component_type: ComponentType,
    components: u8,
}

impl ComponentFormat {
    pub const R8UI: Self = Self::raw(ComponentType::U8, 1);
    pub const RG8UI: Self = Self::raw(ComponentType::U8, 2);
    pub const RGB8UI: Self = Self::raw(ComponentType::U8, 3);
    pub const RGBA8UI: Self = Self::raw(ComponentType::U8, 4);
    pub const R16UI: Self = Self::raw(ComponentType::U16, 1);
    pub const RG16UI: Self = Self::raw(ComponentType::U16, 2);
    pub const RGB16UI: Self = Self::raw(ComponentType::U16, 3);
    pub const R32UI: Self = Self::raw(ComponentType::U32, 1);
    pub const RG32UI: Self = Self::raw(ComponentType::U32, 2);
    pub const RGB32UI: Self = Self::raw(ComponentType::U32, 3);
    pub const R32F: Self = Self::raw(ComponentType::F32, 1);
    pub const RG32F: Self = Self::raw(ComponentType::F32, 2);
    pub const RGB32F: Self = Self::raw(ComponentType::F32, 3);
    pub const RGBA32F: Self = Self::raw(ComponentType::F32, 4);

    const fn raw(component_type: ComponentType, components: u8) -> Self {
        ComponentFormat {
            component_type,
            components,
        }
    }

    /// Looks up the format for a scalar type and component count.
    ///
    /// Returns `None` for combinations no data texture uses (e.g. four 16-bit components).
    pub const fn new(component_type: ComponentType, components: u8) -> Option<Self> {
        let max = match component_type {
            ComponentType::U8 | ComponentType::F32 => 4,
            ComponentType::U16 | ComponentType::U32 => 3,
        };
        if components == 0 || components > max {
            None
        } else {
            Some(Self::raw(component_type, components))
        }
    }

    /// The format whose scalar is `C` with the given component count.
    pub const fn of<C: TexelComponent>(components: u8) -> Option<Self> {
        Self::new(C::TYPE, components)
    }

    pub const fn component_type(&self) -> ComponentType {
        self.component_type
    }

    pub const fn components(&self) -> u8 {
        self.components
    }

    pub const fn bytes_per_texel(&self) -> usize {
        self.components as usize * self.component_type.byte_size()
    }
}

impl Display for ComponentFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let channels = match self.components {
            1 => "R",
            2 => "RG",
            3 => "RGB",
            _ => "RGBA",
        };
        let suffix = match self.component_type {
            ComponentType::U8 => "8UI",
            ComponentType::U16 => "16UI",
            ComponentType::U32 => "32UI",
            ComponentType::F32 => "32F",
        };
        write!(f, "{channels}{suffix}")
    }
}

/// Reinterprets a slice of components as raw bytes, in native byte order.
pub(crate) fn components_as_bytes<C: TexelComponent>(components: &[C]) -> &[u8] {
    bytemuck::cast_slice(components)
}

/// Integer types usable as triangle or edge vertex indices.
pub trait IndexComponent: TexelComponent + Copy + Into<u32> {
    /// One triangle per texel.
    const TRIANGLE_FORMAT: ComponentFormat;
    /// One edge per texel.
    const EDGE_FORMAT: ComponentFormat;
}

impl IndexComponent for u8 {
    const TRIANGLE_FORMAT: ComponentFormat = ComponentFormat::RGB8UI;
    const EDGE_FORMAT: ComponentFormat = ComponentFormat::RG8UI;
}

impl IndexComponent for u16 {
    const TRIANGLE_FORMAT: ComponentFormat = ComponentFormat::RGB16UI;
    const EDGE_FORMAT: ComponentFormat = ComponentFormat::RG16UI;
}

impl IndexComponent for u32 {
    const TRIANGLE_FORMAT: ComponentFormat = ComponentFormat::RGB32UI;
    const EDGE_FORMAT: ComponentFormat = ComponentFormat::RG32UI;
}

/// Integer width of an index texture.
///
/// The encoder never picks this itself; the layer that batches geometry does, from the largest
/// index it is about to store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum IndexWidth {
    U8,
    U16,
    U32,
}

impl IndexWidth {
    /// The narrowest width able to hold `max_index`.
    pub const fn for_max_index(max_index: u32) -> Self {
        if max_index <= u8::MAX as u32 {
            IndexWidth::U8
        } else if max_index <= u16::MAX as u32 {
            IndexWidth::U16
        } else {
            IndexWidth::U32
        }
    }

    pub const fn component_type(self) -> ComponentType {
        match self {
            IndexWidth::U8 => ComponentType::U8,
            IndexWidth::U16 => ComponentType::U16,
            IndexWidth::U32 => ComponentType::U32,
        }
    }
}
