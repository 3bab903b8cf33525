//! The PS4 tiled layout.
//!
//! Blocks are grouped into 8x8 tiles visited in row-major order.
//! Each tile stores its blocks in Morton order with the x coordinate in the low bit.
//! Positions of a partial tile past the right or bottom edge are skipped,
//! so the swizzled data has the same size as the linear data.
use crate::layout::{copy_block, MipGeometry};

const TILE_SIZE: usize = 8;

// Each entry t is the index y * 8 + x within the tile for the t-th stored block.
const MORTON8X8: [usize; TILE_SIZE * TILE_SIZE] = [
    0, 1, 8, 9, 2, 3, 10, 11, 16, 17, 24, 25, 18, 19, 26, 27, 4, 5, 12, 13, 6, 7, 14, 15, 20, 21,
    28, 29, 22, 23, 30, 31, 32, 33, 40, 41, 34, 35, 42, 43, 48, 49, 56, 57, 50, 51, 58, 59, 36, 37,
    44, 45, 38, 39, 46, 47, 52, 53, 60, 61, 54, 55, 62, 63,
];

pub(crate) fn permute<const DESWIZZLE: bool>(
    source: &[u8],
    destination: &mut [u8],
    mip: &MipGeometry,
) {
    let block_count_x = mip.block_count_x();
    let block_count_y = mip.block_count_y();
    let block_data_size = mip.block_data_size;

    let mut swizzled_offset = 0;
    for tile_y in (0..block_count_y).step_by(TILE_SIZE) {
        for tile_x in (0..block_count_x).step_by(TILE_SIZE) {
            for index in MORTON8X8.iter() {
                let x = tile_x + index % TILE_SIZE;
                let y = tile_y + index / TILE_SIZE;

                // Skipped positions don't take up space in the swizzled data.
                if x < block_count_x && y < block_count_y {
                    let linear_offset = (y * block_count_x + x) * block_data_size;
                    copy_block::<DESWIZZLE>(
                        source,
                        destination,
                        linear_offset,
                        swizzled_offset,
                        block_data_size,
                    );
                    swizzled_offset += block_data_size;
                }
            }
        }
    }
}
