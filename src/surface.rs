//! Functions for working with surfaces stored in a combined buffer for all array layers and mipmaps.
//!
//! The linear layout is tightly packed.
//! Each mipmap of the swizzled layout uses the padded size for the platform's layout.
//! Array layers and mipmaps are ordered by layer and then mipmap for both layouts.
use alloc::vec::Vec;
use core::cmp::max;

use crate::{
    layout::{Layout, MipGeometry},
    GobsHeight, SwizzleError,
};

/// Calculates the number of mipmaps in a full mipmap chain for a surface of size `width` x `height`.
/// Returns `1` if `has_mips` is `false`.
/// # Examples
/**
```rust
use console_swizzler::mip_count;

assert_eq!(9, mip_count(256, 256, true));
assert_eq!(8, mip_count(200, 100, true));
assert_eq!(1, mip_count(256, 256, false));
```
*/
pub fn mip_count(width: usize, height: usize, has_mips: bool) -> usize {
    if !has_mips {
        return 1;
    }

    // log2(0) is treated as 0.
    let max_dimension = max(width, height);
    if max_dimension == 0 {
        1
    } else {
        (usize::BITS - 1 - max_dimension.leading_zeros()) as usize + 1
    }
}

/// The dimension of mipmap `level` with a minimum of `1` for non empty surfaces.
pub(crate) fn mip_dimension(dimension: usize, level: usize) -> usize {
    if dimension == 0 {
        0
    } else {
        max(dimension >> level, 1)
    }
}

/// A fully validated surface description.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub(crate) struct TextureShape {
    pub width: usize,
    pub height: usize,
    pub block_width: usize,
    pub block_height: usize,
    pub block_data_size: usize,
    pub has_mips: bool,
    pub array_size: usize,
    pub gobs_height: GobsHeight,
}

impl TextureShape {
    pub fn mip_count(&self) -> usize {
        mip_count(self.width, self.height, self.has_mips)
    }

    /// The unpadded geometry for mipmap `level`.
    pub fn mip_geometry(&self, level: usize) -> MipGeometry {
        MipGeometry {
            width: mip_dimension(self.width, level),
            height: mip_dimension(self.height, level),
            block_width: self.block_width,
            block_height: self.block_height,
            block_data_size: self.block_data_size,
            gobs_per_block: 1,
        }
    }

    /// The size in bytes of all array layers and mipmaps using `layout`.
    /// Use [Layout::Identity] for the size of the linear data.
    pub fn surface_size(&self, layout: Layout) -> Result<usize, SwizzleError> {
        let mut layer_size = 0usize;
        for level in 0..self.mip_count() {
            let mip = layout.swizzled_geometry(self.mip_geometry(level), self.gobs_height);
            layer_size = mip
                .size()
                .and_then(|size| layer_size.checked_add(size))
                .ok_or(SwizzleError::MemoryAlloc)?;
        }

        layer_size
            .checked_mul(self.array_size)
            .ok_or(SwizzleError::MemoryAlloc)
    }
}

/// Allocates a zeroed buffer and reports allocation failures instead of aborting.
pub(crate) fn try_alloc_zeroed(size: usize) -> Result<Vec<u8>, SwizzleError> {
    let mut data = Vec::new();
    data.try_reserve_exact(size)
        .map_err(|_| SwizzleError::MemoryAlloc)?;
    data.resize(size, 0);
    Ok(data)
}

/// Swizzles or unswizzles every array layer and mipmap from `source` into `destination`.
///
/// If `DESWIZZLE` is `false`, `source` holds linear data and `destination` receives swizzled data.
/// The buffers must hold at least the surface sizes for their layouts.
pub(crate) fn transform_surface<const DESWIZZLE: bool>(
    shape: &TextureShape,
    layout: Layout,
    source: &[u8],
    destination: &mut [u8],
) -> Result<(), SwizzleError> {
    // Padding bytes in the staging buffer stay zeroed.
    let mut staging = try_alloc_zeroed(shape.surface_size(layout)?)?;

    let mut linear_offset = 0;
    let mut swizzled_offset = 0;
    for layer in 0..shape.array_size {
        for level in 0..shape.mip_count() {
            let linear = shape.mip_geometry(level);
            let swizzled = layout.swizzled_geometry(linear, shape.gobs_height);

            let linear_size = linear.size().ok_or(SwizzleError::MemoryAlloc)?;
            let swizzled_size = swizzled.size().ok_or(SwizzleError::MemoryAlloc)?;

            tracing::trace!(
                layer,
                level,
                width = linear.width,
                height = linear.height,
                linear_size,
                swizzled_size,
                "transform mipmap"
            );

            let staging_mip = &mut staging[swizzled_offset..swizzled_offset + swizzled_size];
            let linear_pitch = linear.pitch().ok_or(SwizzleError::MemoryAlloc)?;
            let padded_pitch = swizzled.pitch().ok_or(SwizzleError::MemoryAlloc)?;
            let rows = linear.block_count_y();

            if DESWIZZLE {
                layout.permute::<true>(
                    &source[swizzled_offset..swizzled_offset + swizzled_size],
                    staging_mip,
                    &swizzled,
                );
                copy_rows(
                    staging_mip,
                    padded_pitch,
                    &mut destination[linear_offset..linear_offset + linear_size],
                    linear_pitch,
                    rows,
                );
            } else {
                copy_rows(
                    &source[linear_offset..linear_offset + linear_size],
                    linear_pitch,
                    staging_mip,
                    padded_pitch,
                    rows,
                );
                layout.permute::<false>(
                    staging_mip,
                    &mut destination[swizzled_offset..swizzled_offset + swizzled_size],
                    &swizzled,
                );
            }

            linear_offset += linear_size;
            swizzled_offset += swizzled_size;
        }
    }

    Ok(())
}

/// Copies the first `rows` rows of blocks between buffers with different pitches.
/// Only the bytes of the smaller pitch are copied for each row.
fn copy_rows(
    source: &[u8],
    source_pitch: usize,
    destination: &mut [u8],
    destination_pitch: usize,
    rows: usize,
) {
    let row_size = source_pitch.min(destination_pitch);
    if row_size == 0 {
        return;
    }

    for (source_row, destination_row) in source
        .chunks(source_pitch)
        .zip(destination.chunks_mut(destination_pitch))
        .take(rows)
    {
        destination_row[..row_size].copy_from_slice(&source_row[..row_size]);
    }
}
