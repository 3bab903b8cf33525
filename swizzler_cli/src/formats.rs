/// The block dimensions in pixels and the size of a block in bytes for a DDS pixel format.
/// Uncompressed formats use 1x1 pixel blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockInfo {
    pub block_width: u32,
    pub block_height: u32,
    pub block_data_size: u32,
}

impl BlockInfo {
    pub const fn new(block_width: u32, block_height: u32, block_data_size: u32) -> Self {
        Self {
            block_width,
            block_height,
            block_data_size,
        }
    }

    const fn uncompressed(bytes_per_pixel: u32) -> Self {
        Self::new(1, 1, bytes_per_pixel)
    }

    /// Looks up the block info for a `DXGI_FORMAT` value from a DX10 header.
    pub fn from_dxgi(format: u32) -> Option<Self> {
        match format {
            // BC1 and BC4
            70..=72 | 79..=81 => Some(Self::new(4, 4, 8)),
            // BC2, BC3, BC5, BC6H, and BC7
            73..=78 | 82..=84 | 94..=99 => Some(Self::new(4, 4, 16)),
            // ASTC uses 16 byte blocks with 3 ids for each block size.
            133..=187 => astc_block_dimensions(format).map(|(w, h)| Self::new(w, h, 16)),
            // R32G32B32A32
            1..=4 => Some(Self::uncompressed(16)),
            // R32G32B32
            5..=8 => Some(Self::uncompressed(12)),
            // R16G16B16A16, R32G32, and R32G8X24
            9..=22 => Some(Self::uncompressed(8)),
            // R10G10B10A2, R11G11B10, R8G8B8A8, R16G16, R32, and R24G8
            23..=47 => Some(Self::uncompressed(4)),
            // R8G8 and R16
            48..=59 => Some(Self::uncompressed(2)),
            // R8 and A8
            60..=65 => Some(Self::uncompressed(1)),
            // B5G6R5 and B5G5R5A1
            85 | 86 | 115 => Some(Self::uncompressed(2)),
            // B8G8R8A8 and B8G8R8X8
            87 | 88 | 90..=93 => Some(Self::uncompressed(4)),
            _ => None,
        }
    }

    /// Looks up the block info for a legacy FourCC code.
    pub fn from_fourcc(code: u32) -> Option<Self> {
        const DXT1: u32 = fourcc(b"DXT1");
        const ATI1: u32 = fourcc(b"ATI1");
        const BC4U: u32 = fourcc(b"BC4U");
        const BC4S: u32 = fourcc(b"BC4S");
        const DXT2: u32 = fourcc(b"DXT2");
        const DXT3: u32 = fourcc(b"DXT3");
        const DXT4: u32 = fourcc(b"DXT4");
        const DXT5: u32 = fourcc(b"DXT5");
        const ATI2: u32 = fourcc(b"ATI2");
        const BC5U: u32 = fourcc(b"BC5U");
        const BC5S: u32 = fourcc(b"BC5S");
        const BC6H: u32 = fourcc(b"BC6H");
        const BC7L: u32 = fourcc(b"BC7L");
        const BC7: u32 = fourcc(b"BC7\0");

        // D3DFMT values stored in the FourCC field.
        const A16B16G16R16: u32 = 36;
        const A16B16G16R16F: u32 = 113;
        const A32B32G32R32F: u32 = 116;

        match code {
            DXT1 | ATI1 | BC4U | BC4S => Some(Self::new(4, 4, 8)),
            DXT2 | DXT3 | DXT4 | DXT5 | ATI2 | BC5U | BC5S | BC6H | BC7L | BC7 => {
                Some(Self::new(4, 4, 16))
            }
            A16B16G16R16 | A16B16G16R16F => Some(Self::uncompressed(8)),
            A32B32G32R32F => Some(Self::uncompressed(16)),
            _ => None,
        }
    }

    /// Calculates the block info for uncompressed formats described by bit masks.
    pub fn from_rgb_bit_count(bit_count: u32) -> Option<Self> {
        if bit_count > 0 && bit_count % 8 == 0 {
            Some(Self::uncompressed(bit_count / 8))
        } else {
            None
        }
    }

    /// Finds the block info from the DX10 header if present
    /// and then the FourCC code or bit count of the legacy header.
    pub fn from_dds(dds: &ddsfile::Dds) -> Option<Self> {
        if let Some(format) = dds.get_dxgi_format() {
            return Self::from_dxgi(format as u32);
        }

        match &dds.header.spf.fourcc {
            Some(fourcc) => Self::from_fourcc(fourcc.0),
            None => dds
                .header
                .spf
                .rgb_bit_count
                .and_then(Self::from_rgb_bit_count),
        }
    }
}

const fn fourcc(name: &[u8; 4]) -> u32 {
    u32::from_le_bytes(*name)
}

fn astc_block_dimensions(format: u32) -> Option<(u32, u32)> {
    // Each block size has TYPELESS, UNORM, and UNORM_SRGB variants starting at 133.
    const SIZES: [(u32, u32); 14] = [
        (4, 4),
        (5, 4),
        (5, 5),
        (6, 5),
        (6, 6),
        (8, 5),
        (8, 6),
        (8, 8),
        (10, 5),
        (10, 6),
        (10, 8),
        (10, 10),
        (12, 10),
        (12, 12),
    ];
    let offset = format.checked_sub(133)?;
    if offset % 4 == 3 {
        // Ids between block sizes are unused.
        return None;
    }
    SIZES.get((offset / 4) as usize).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fourcc_values() {
        assert_eq!(0x31545844, fourcc(b"DXT1"));
        assert_eq!(0x4c374342, fourcc(b"BC7L"));
        assert_eq!(0x374342, fourcc(b"BC7\0"));
    }

    #[test]
    fn bcn_fourcc() {
        assert_eq!(Some(BlockInfo::new(4, 4, 8)), BlockInfo::from_fourcc(0x31545844));
        assert_eq!(Some(BlockInfo::new(4, 4, 8)), BlockInfo::from_fourcc(0x31495441));
        assert_eq!(Some(BlockInfo::new(4, 4, 16)), BlockInfo::from_fourcc(0x35545844));
        assert_eq!(Some(BlockInfo::new(4, 4, 16)), BlockInfo::from_fourcc(0x53354342));
        assert_eq!(Some(BlockInfo::new(4, 4, 16)), BlockInfo::from_fourcc(0x374342));
        assert_eq!(None, BlockInfo::from_fourcc(fourcc(b"UNKN")));
    }

    #[test]
    fn float_fourcc() {
        assert_eq!(Some(BlockInfo::new(1, 1, 8)), BlockInfo::from_fourcc(113));
        assert_eq!(Some(BlockInfo::new(1, 1, 16)), BlockInfo::from_fourcc(116));
    }

    #[test]
    fn bcn_dxgi() {
        assert_eq!(Some(BlockInfo::new(4, 4, 8)), BlockInfo::from_dxgi(71));
        assert_eq!(Some(BlockInfo::new(4, 4, 8)), BlockInfo::from_dxgi(80));
        assert_eq!(Some(BlockInfo::new(4, 4, 16)), BlockInfo::from_dxgi(77));
        assert_eq!(Some(BlockInfo::new(4, 4, 16)), BlockInfo::from_dxgi(95));
        assert_eq!(Some(BlockInfo::new(4, 4, 16)), BlockInfo::from_dxgi(98));
    }

    #[test]
    fn uncompressed_dxgi() {
        assert_eq!(Some(BlockInfo::new(1, 1, 16)), BlockInfo::from_dxgi(2));
        assert_eq!(Some(BlockInfo::new(1, 1, 12)), BlockInfo::from_dxgi(6));
        assert_eq!(Some(BlockInfo::new(1, 1, 8)), BlockInfo::from_dxgi(10));
        assert_eq!(Some(BlockInfo::new(1, 1, 4)), BlockInfo::from_dxgi(28));
        assert_eq!(Some(BlockInfo::new(1, 1, 4)), BlockInfo::from_dxgi(87));
        assert_eq!(Some(BlockInfo::new(1, 1, 2)), BlockInfo::from_dxgi(49));
        assert_eq!(Some(BlockInfo::new(1, 1, 1)), BlockInfo::from_dxgi(61));
        assert_eq!(None, BlockInfo::from_dxgi(0));
        assert_eq!(None, BlockInfo::from_dxgi(66));
    }

    #[test]
    fn astc_dxgi() {
        assert_eq!(Some(BlockInfo::new(4, 4, 16)), BlockInfo::from_dxgi(134));
        assert_eq!(Some(BlockInfo::new(5, 4, 16)), BlockInfo::from_dxgi(138));
        assert_eq!(Some(BlockInfo::new(8, 8, 16)), BlockInfo::from_dxgi(162));
        assert_eq!(Some(BlockInfo::new(12, 12, 16)), BlockInfo::from_dxgi(187));
        assert_eq!(None, BlockInfo::from_dxgi(136));
        assert_eq!(None, BlockInfo::from_dxgi(188));
    }

    #[test]
    fn rgb_bit_counts() {
        assert_eq!(Some(BlockInfo::new(1, 1, 4)), BlockInfo::from_rgb_bit_count(32));
        assert_eq!(Some(BlockInfo::new(1, 1, 3)), BlockInfo::from_rgb_bit_count(24));
        assert_eq!(None, BlockInfo::from_rgb_bit_count(0));
        assert_eq!(None, BlockInfo::from_rgb_bit_count(4));
    }
}
