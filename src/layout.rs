use crate::{div_round_up, ps4, switch, GobsHeight, Platform};

/// The dimensions and block format of a single mipmap.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub(crate) struct MipGeometry {
    pub width: usize,
    pub height: usize,
    pub block_width: usize,
    pub block_height: usize,
    pub block_data_size: usize,
    /// The number of GOBs stacked in a single GOB block for the Switch layout.
    pub gobs_per_block: usize,
}

impl MipGeometry {
    pub fn block_count_x(&self) -> usize {
        div_round_up(self.width, self.block_width)
    }

    pub fn block_count_y(&self) -> usize {
        div_round_up(self.height, self.block_height)
    }

    /// The size in bytes of a single row of blocks.
    pub fn pitch(&self) -> Option<usize> {
        self.block_count_x().checked_mul(self.block_data_size)
    }

    pub fn size(&self) -> Option<usize> {
        self.pitch()?.checked_mul(self.block_count_y())
    }
}

/// The block permutation applied to each mipmap.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub(crate) enum Layout {
    /// Linear row-major data with no padding.
    Identity,
    Ps4,
    Switch,
}

impl Layout {
    pub fn from_platform(platform: Platform) -> Self {
        match platform {
            Platform::Unknown => Layout::Identity,
            Platform::Ps4 => Layout::Ps4,
            Platform::Switch => Layout::Switch,
        }
    }

    /// Converts the linear geometry of a mipmap to the geometry of its swizzled storage.
    /// The swizzled geometry may use larger blocks and include padding.
    pub fn swizzled_geometry(&self, linear: MipGeometry, gobs_height: GobsHeight) -> MipGeometry {
        match self {
            Layout::Identity | Layout::Ps4 => linear,
            Layout::Switch => {
                let expanded = switch::expand_block(linear);
                switch::padded_geometry(expanded, gobs_height)
            }
        }
    }

    /// Moves every block of a mipmap between the padded linear layout and the swizzled layout.
    ///
    /// If `DESWIZZLE` is `false`, `source` is linear and `destination` is swizzled.
    /// If `DESWIZZLE` is `true`, `source` is swizzled and `destination` is linear.
    /// Both buffers must hold at least `mip.size()` bytes.
    pub fn permute<const DESWIZZLE: bool>(
        &self,
        source: &[u8],
        destination: &mut [u8],
        mip: &MipGeometry,
    ) {
        match self {
            Layout::Identity => {
                let size = source.len().min(destination.len());
                destination[..size].copy_from_slice(&source[..size]);
            }
            Layout::Ps4 => ps4::permute::<DESWIZZLE>(source, destination, mip),
            Layout::Switch => switch::permute::<DESWIZZLE>(source, destination, mip),
        }
    }
}

/// Copies `len` bytes of a single block between its linear and swizzled locations.
#[inline]
pub(crate) fn copy_block<const DESWIZZLE: bool>(
    source: &[u8],
    destination: &mut [u8],
    linear_offset: usize,
    swizzled_offset: usize,
    len: usize,
) {
    let (source_offset, destination_offset) = if DESWIZZLE {
        (swizzled_offset, linear_offset)
    } else {
        (linear_offset, swizzled_offset)
    };

    debug_assert!(
        source_offset + len <= source.len() && destination_offset + len <= destination.len(),
        "Block copy out of bounds"
    );

    destination[destination_offset..destination_offset + len]
        .copy_from_slice(&source[source_offset..source_offset + len]);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geometry(width: usize, height: usize, block: (usize, usize, usize)) -> MipGeometry {
        MipGeometry {
            width,
            height,
            block_width: block.0,
            block_height: block.1,
            block_data_size: block.2,
            gobs_per_block: 1,
        }
    }

    #[test]
    fn block_counts_round_up() {
        let mip = geometry(10, 7, (4, 4, 8));
        assert_eq!(3, mip.block_count_x());
        assert_eq!(2, mip.block_count_y());
        assert_eq!(Some(24), mip.pitch());
        assert_eq!(Some(48), mip.size());
    }

    #[test]
    fn zero_dimensions_have_no_blocks() {
        let mip = geometry(0, 16, (4, 4, 16));
        assert_eq!(Some(0), mip.size());
    }

    #[test]
    fn size_overflow() {
        let mip = geometry(usize::MAX / 2, usize::MAX / 2, (1, 1, 4));
        assert_eq!(None, mip.size());
    }

    #[test]
    fn ps4_geometry_is_unpadded() {
        let mip = geometry(100, 200, (1, 1, 4));
        assert_eq!(
            mip,
            Layout::Ps4.swizzled_geometry(mip, GobsHeight::Sixteen)
        );
    }

    #[test]
    fn identity_permute_copies() {
        let source = [1u8, 2, 3, 4];
        let mut destination = [0u8; 4];
        Layout::Identity.permute::<false>(&source, &mut destination, &geometry(1, 1, (1, 1, 4)));
        assert_eq!(source, destination);
    }

    #[test]
    fn copy_block_directions() {
        let source = [0u8, 1, 2, 3, 4, 5, 6, 7];
        let mut destination = [0u8; 8];
        copy_block::<false>(&source, &mut destination, 2, 4, 2);
        assert_eq!([0, 0, 0, 0, 2, 3, 0, 0], destination);

        let mut destination = [0u8; 8];
        copy_block::<true>(&source, &mut destination, 2, 4, 2);
        assert_eq!([0, 0, 4, 5, 0, 0, 0, 0], destination);
    }
}
