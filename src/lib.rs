//! # console_swizzler
//! console_swizzler converts texture surfaces between a linear row-major layout
//! and the tiled memory layouts used by console GPUs.
//!
//! # Getting Started
//! The following example swizzles a BC1 compressed 2D surface with mipmaps for the PS4.
//! BC1 has 4x4 pixel blocks that each take up 8 bytes.
/*!
```rust
use console_swizzler::{Platform, SwizzleContext};

# fn main() -> Result<(), console_swizzler::SwizzleError> {
let mut context = SwizzleContext::new();
context.set_platform(Platform::Ps4)?;
context.set_texture_size(256, 256)?;
context.set_block_info(4, 4, 8)?;
context.set_has_mips(true);

let linear = context.alloc_unswizzled_data()?;
let mut swizzled = context.alloc_swizzled_data()?;
context.swizzle(&linear, &mut swizzled)?;
# Ok(())
# }
```
*/
//! # Layouts
//! Surfaces are processed in units of blocks. A block is a single pixel for uncompressed formats
//! or a single compressed block like the 4x4 pixel blocks used by BC1 through BC7.
//! Bytes within a block are never reordered.
//!
//! The PS4 layout visits 8x8 tiles of blocks in row-major order.
//! Blocks within a tile are stored in Morton order.
//!
//! The Switch layout stores 16 byte cells in GOBs ("group of bytes") that are 4 cells wide and 8 cells tall.
//! GOBs stack vertically into GOB blocks, and the [GobsHeight] determines the maximum number of GOBs per block.
//! Swizzled Switch surfaces are padded to whole GOB blocks, so swizzled surfaces may be larger than the corresponding linear data.
//!
//! Array layers and mipmaps are ordered by layer and then mipmap.
//! A surface with `L` layers and `M` mipmaps has the following layout for both linear and swizzled data.
/*!
```no_compile
Layer 0 Mip 0
Layer 0 Mip 1
...
Layer 0 Mip M-1
Layer 1 Mip 0
...
Layer L-1 Mip M-1
```
*/
#![cfg_attr(not(feature = "std"), no_std)]
extern crate alloc;

mod context;
mod layout;
mod ps4;
mod surface;
mod switch;

// Avoid making this module public to prevent people importing it accidentally.
#[cfg(feature = "ffi")]
mod ffi;

pub use context::SwizzleContext;
pub use surface::mip_count;

/// The tiled memory layout to use for swizzling.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
pub enum Platform {
    /// No platform has been selected. Operations on a context with this platform fail.
    Unknown = 0,
    Ps4 = 1,
    Switch = 2,
}

impl Platform {
    /// Converts the integer platform identifiers used by the C API.
    /// Unrecognized values map to [Platform::Unknown].
    /// # Examples
    /**
    ```rust
    use console_swizzler::Platform;

    assert_eq!(Platform::Switch, Platform::from_raw(2));
    assert_eq!(Platform::Unknown, Platform::from_raw(3));
    ```
    */
    pub fn from_raw(value: u32) -> Self {
        match value {
            1 => Platform::Ps4,
            2 => Platform::Switch,
            _ => Platform::Unknown,
        }
    }
}

impl Default for Platform {
    fn default() -> Self {
        Platform::Unknown
    }
}

// The Tegra TRM only allows these values for the number of GOBs in a block.

/// An enumeration of supported maximum GOB block heights for the Switch layout.
///
/// Most textures use the default of [GobsHeight::Sixteen].
/// Unreal Engine games commonly use [GobsHeight::Eight].
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
pub enum GobsHeight {
    One = 1,
    Two = 2,
    Four = 4,
    Eight = 8,
    Sixteen = 16,
    ThirtyTwo = 32,
}

impl GobsHeight {
    /// Attempts to construct a GOB height from `value`.
    /// Returns [None] if `value` is not a supported GOB height.
    /// # Examples
    /**
    ```rust
    use console_swizzler::GobsHeight;

    assert_eq!(Some(GobsHeight::Eight), GobsHeight::new(8));
    assert_eq!(None, GobsHeight::new(5));
    ```
    */
    pub fn new(value: u32) -> Option<Self> {
        match value {
            1 => Some(GobsHeight::One),
            2 => Some(GobsHeight::Two),
            4 => Some(GobsHeight::Four),
            8 => Some(GobsHeight::Eight),
            16 => Some(GobsHeight::Sixteen),
            32 => Some(GobsHeight::ThirtyTwo),
            _ => None,
        }
    }
}

impl Default for GobsHeight {
    fn default() -> Self {
        GobsHeight::Sixteen
    }
}

/// Errors than can occur while configuring a [SwizzleContext] or swizzling.
///
/// Each error has a stable integer code returned by [SwizzleError::code].
/// The code `0` is reserved for success in the C API.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum SwizzleError {
    /// The platform was never set or is not supported.
    UnknownPlatform,
    /// The width or height is negative.
    InvalidTextureSize,
    /// The block width, block height, or block data size is not positive.
    InvalidBlockInfo,
    /// The array size is not positive.
    InvalidArraySize,
    /// The GOB height is not one of the values in [GobsHeight].
    InvalidGobsHeight,
    /// The buffer could not be allocated or its size does not fit in memory.
    MemoryAlloc,
    /// A null pointer was passed to the C API.
    NullPointer,
    /// The source or destination does not contain enough bytes.
    /// Sources should have at least [SwizzleContext::unswizzled_size] many bytes for swizzling
    /// and at least [SwizzleContext::swizzled_size] many bytes for unswizzling.
    /// Destinations need the opposite sizes.
    NotEnoughData {
        expected_size: usize,
        actual_size: usize,
    },
}

// Messages are null terminated for the C API.
const ERROR_MESSAGES: [&str; 9] = [
    "Success.\0",
    "Unsupported platform.\0",
    "Width and height should be non-negative integers.\0",
    "Block width, block height, and block data size should be positive integers.\0",
    "Array size should be a positive integer.\0",
    "GOBs height should be 1, 2, 4, 8, 16, or 32.\0",
    "Memory allocation error.\0",
    "Null pointer error.\0",
    "Not enough data.\0",
];

const UNEXPECTED_ERROR_MESSAGE: &str = "Unexpected error.\0";

pub(crate) fn error_message_with_nul(code: u32) -> &'static str {
    ERROR_MESSAGES
        .get(code as usize)
        .copied()
        .unwrap_or(UNEXPECTED_ERROR_MESSAGE)
}

/// Gets the message for an error code from [SwizzleError::code].
/// The code `0` indicates success.
/// # Examples
/**
```rust
use console_swizzler::{error_message, SwizzleError};

assert_eq!("Success.", error_message(0));
assert_eq!("Unsupported platform.", error_message(SwizzleError::UnknownPlatform.code()));
assert_eq!("Unexpected error.", error_message(100));
```
*/
pub fn error_message(code: u32) -> &'static str {
    let message = error_message_with_nul(code);
    &message[..message.len() - 1]
}

impl SwizzleError {
    /// The integer code for this error used by the C API.
    pub const fn code(&self) -> u32 {
        match self {
            SwizzleError::UnknownPlatform => 1,
            SwizzleError::InvalidTextureSize => 2,
            SwizzleError::InvalidBlockInfo => 3,
            SwizzleError::InvalidArraySize => 4,
            SwizzleError::InvalidGobsHeight => 5,
            SwizzleError::MemoryAlloc => 6,
            SwizzleError::NullPointer => 7,
            SwizzleError::NotEnoughData { .. } => 8,
        }
    }

    /// The fixed message for this error. See [error_message].
    pub fn message(&self) -> &'static str {
        error_message(self.code())
    }
}

impl core::fmt::Display for SwizzleError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            SwizzleError::NotEnoughData {
                expected_size,
                actual_size,
            } => write!(
                f,
                "Not enough data. Expected {} bytes but found {} bytes.",
                expected_size, actual_size
            ),
            _ => write!(f, "{}", self.message()),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for SwizzleError {}

const fn parse_version_part(part: &str) -> u32 {
    let bytes = part.as_bytes();
    let mut value = 0;
    let mut i = 0;
    while i < bytes.len() {
        value = value * 10 + (bytes[i] - b'0') as u32;
        i += 1;
    }
    value
}

const VERSION_AS_INT: u32 = parse_version_part(env!("CARGO_PKG_VERSION_MAJOR")) * 10000
    + parse_version_part(env!("CARGO_PKG_VERSION_MINOR")) * 100
    + parse_version_part(env!("CARGO_PKG_VERSION_PATCH"));

/// The version of this library in the form `major.minor.patch`.
pub const fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// The version of this library encoded as `major * 10000 + minor * 100 + patch`.
/// # Examples
/**
```rust
// Version 1.2.3 would be encoded as 10203.
let version = console_swizzler::version_as_int();
assert_eq!(console_swizzler::version(), format!("{}.{}.{}", version / 10000, version / 100 % 100, version % 100));
```
*/
pub const fn version_as_int() -> u32 {
    VERSION_AS_INT
}

/// Calculates the division of `x` by `d` but rounds up rather than truncating.
///
/// # Examples
/// Use this function when calculating dimensions in blocks for block compressed formats like BC7.
/**
```rust
# use console_swizzler::div_round_up;
assert_eq!(2, div_round_up(8, 4));
assert_eq!(3, div_round_up(10, 4));
```
 */
#[inline]
pub const fn div_round_up(x: usize, d: usize) -> usize {
    (x + d - 1) / d
}

#[inline]
pub(crate) const fn round_up(x: usize, n: usize) -> usize {
    div_round_up(x, n) * n
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_int_matches_string() {
        assert_eq!("0.1.0", version());
        assert_eq!(100, version_as_int());
    }

    #[test]
    fn error_messages() {
        assert_eq!("Success.", error_message(0));
        assert_eq!(
            "Memory allocation error.",
            SwizzleError::MemoryAlloc.message()
        );
        assert_eq!("Null pointer error.", SwizzleError::NullPointer.message());
        assert_eq!("Unexpected error.", error_message(9));
        assert_eq!("Unexpected error.", error_message(u32::MAX));
    }

    #[test]
    fn error_codes_are_unique() {
        let errors = [
            SwizzleError::UnknownPlatform,
            SwizzleError::InvalidTextureSize,
            SwizzleError::InvalidBlockInfo,
            SwizzleError::InvalidArraySize,
            SwizzleError::InvalidGobsHeight,
            SwizzleError::MemoryAlloc,
            SwizzleError::NullPointer,
            SwizzleError::NotEnoughData {
                expected_size: 1,
                actual_size: 0,
            },
        ];
        for (i, error) in errors.iter().enumerate() {
            assert_eq!(i as u32 + 1, error.code());
        }
    }

    #[test]
    fn not_enough_data_display() {
        let error = SwizzleError::NotEnoughData {
            expected_size: 512,
            actual_size: 4,
        };
        assert_eq!(
            "Not enough data. Expected 512 bytes but found 4 bytes.",
            alloc::format!("{}", error)
        );
    }

    #[test]
    fn platform_from_raw() {
        assert_eq!(Platform::Unknown, Platform::from_raw(0));
        assert_eq!(Platform::Ps4, Platform::from_raw(1));
        assert_eq!(Platform::Switch, Platform::from_raw(2));
        assert_eq!(Platform::Unknown, Platform::from_raw(3));
    }

    #[test]
    fn gobs_heights() {
        assert_eq!(Some(GobsHeight::One), GobsHeight::new(1));
        assert_eq!(Some(GobsHeight::ThirtyTwo), GobsHeight::new(32));
        assert_eq!(None, GobsHeight::new(0));
        assert_eq!(None, GobsHeight::new(64));
        assert_eq!(GobsHeight::Sixteen, GobsHeight::default());
    }

    #[test]
    fn round_up_values() {
        assert_eq!(0, round_up(0, 4));
        assert_eq!(8, round_up(5, 4));
        assert_eq!(8, round_up(8, 8));
    }
}
