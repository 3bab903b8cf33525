//! The Switch (Tegra X1) block linear layout.
//!
//! Blocks are first widened so each block holds 16 bytes.
//! A GOB is 4 blocks wide and 8 blocks tall for a total of 512 bytes.
//! GOBs are stacked vertically into GOB blocks of `gobs_per_block` GOBs.
//! Each row of GOB blocks is stored starting from the last column.
//! GOBs within a GOB block are stored in index order.
use core::cmp::{max, min};

use crate::{
    div_round_up,
    layout::{copy_block, MipGeometry},
    round_up, GobsHeight,
};

pub(crate) const GOB_WIDTH_IN_BLOCKS: usize = 4;
pub(crate) const GOB_HEIGHT_IN_BLOCKS: usize = 8;
const GOB_CELL_SIZE: usize = 16;

// The largest number of GOBs in a block for compressed formats.
const MAX_GOBS_PER_BLOCK: usize = 8;

// Each entry t is the index y * 4 + x within the GOB for the t-th stored cell.
const TRANSPOSED_MORTON4X8: [usize; GOB_WIDTH_IN_BLOCKS * GOB_HEIGHT_IN_BLOCKS] = [
    0, 4, 1, 5, 8, 12, 9, 13, 16, 20, 17, 21, 24, 28, 25, 29, 2, 6, 3, 7, 10, 14, 11, 15, 18, 22,
    19, 23, 26, 30, 27, 31,
];

/// Widens blocks smaller than a GOB cell to exactly 16 bytes.
/// An RGBA8 pixel format with 4 byte blocks is treated as 4x1 pixel blocks of 16 bytes.
pub(crate) fn expand_block(mip: MipGeometry) -> MipGeometry {
    if mip.block_data_size > 0 && mip.block_data_size < GOB_CELL_SIZE {
        let factor = GOB_CELL_SIZE / mip.block_data_size;
        MipGeometry {
            block_width: mip.block_width * factor,
            block_data_size: mip.block_data_size * factor,
            ..mip
        }
    } else {
        mip
    }
}

/// Calculates the number of GOBs in a GOB block.
/// Uncompressed formats use `gobs_height` directly.
/// Compressed formats use fewer GOBs for smaller surfaces.
pub(crate) fn gobs_per_block(
    block_count_y: usize,
    block_height: usize,
    gobs_height: GobsHeight,
) -> usize {
    let gobs_height = gobs_height as usize;
    if block_height == 1 {
        gobs_height
    } else {
        let gob_count_y = div_round_up(block_count_y, GOB_HEIGHT_IN_BLOCKS);
        max(min(min(gob_count_y, MAX_GOBS_PER_BLOCK), gobs_height), 1)
    }
}

/// Pads the block grid to a whole number of GOB blocks.
pub(crate) fn padded_geometry(mip: MipGeometry, gobs_height: GobsHeight) -> MipGeometry {
    let block_count_x = mip.block_count_x();
    let block_count_y = mip.block_count_y();
    let gobs_per_block = gobs_per_block(block_count_y, mip.block_height, gobs_height);

    MipGeometry {
        width: round_up(block_count_x, GOB_WIDTH_IN_BLOCKS) * mip.block_width,
        height: round_up(block_count_y, GOB_HEIGHT_IN_BLOCKS * gobs_per_block) * mip.block_height,
        gobs_per_block,
        ..mip
    }
}

/// Moves blocks between the padded linear layout and the block linear layout.
/// `mip` should already be expanded and padded.
pub(crate) fn permute<const DESWIZZLE: bool>(
    source: &[u8],
    destination: &mut [u8],
    mip: &MipGeometry,
) {
    let block_count_x = mip.block_count_x();
    let block_count_y = mip.block_count_y();
    let block_data_size = mip.block_data_size;
    let gobs_per_block = mip.gobs_per_block;

    // Padded rows always hold whole GOBs, so no block crosses the row edge.
    let pitch = block_count_x * block_data_size;
    let gob_count_x = block_count_x / GOB_WIDTH_IN_BLOCKS;
    let gob_block_rows = block_count_y / (GOB_HEIGHT_IN_BLOCKS * gobs_per_block);

    let mut swizzled_offset = 0;
    for gob_block_y in 0..gob_block_rows {
        for gob_x in (0..gob_count_x).rev() {
            for gob_in_block in 0..gobs_per_block {
                let gob_y = gob_block_y * gobs_per_block + gob_in_block;

                for index in TRANSPOSED_MORTON4X8.iter() {
                    let x = gob_x * GOB_WIDTH_IN_BLOCKS + index % GOB_WIDTH_IN_BLOCKS;
                    let y = gob_y * GOB_HEIGHT_IN_BLOCKS + index / GOB_WIDTH_IN_BLOCKS;

                    copy_block::<DESWIZZLE>(
                        source,
                        destination,
                        y * pitch + x * block_data_size,
                        swizzled_offset,
                        block_data_size,
                    );
                    swizzled_offset += block_data_size;
                }
            }
        }
    }
}
