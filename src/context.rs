use alloc::vec::Vec;
use core::convert::TryFrom;

use crate::{
    layout::Layout,
    surface::{mip_count, transform_surface, try_alloc_zeroed, TextureShape},
    GobsHeight, Platform, SwizzleError,
};

const DEFAULT_ARRAY_SIZE: i32 = 1;
const DEFAULT_GOBS_HEIGHT: i32 = 16;

/// The configuration for swizzling or unswizzling a surface.
///
/// Setters check their own values and reset invalid values to their defaults.
/// Sizes, allocations, and transforms validate the complete configuration.
/// The most recent error is remembered and available from [SwizzleContext::last_error].
/// Setting a valid value does not clear a previously recorded error.
/// Use [SwizzleContext::init] to reset the context.
/// # Examples
/// Unswizzle a Switch BC7 texture with 6 array layers like a cube map.
/**
```rust
use console_swizzler::{Platform, SwizzleContext};

# fn main() -> Result<(), console_swizzler::SwizzleError> {
let mut context = SwizzleContext::new();
context.set_platform(Platform::Switch)?;
context.set_texture_size(128, 128)?;
context.set_block_info(4, 4, 16)?;
context.set_array_size(6)?;

# let swizzled = vec![0u8; context.swizzled_size()];
let linear = context.unswizzle_to_vec(&swizzled)?;
assert_eq!(128 * 128 * 6, linear.len());
# Ok(())
# }
```
*/
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct SwizzleContext {
    platform: Platform,
    width: i32,
    height: i32,
    block_width: i32,
    block_height: i32,
    block_data_size: i32,
    has_mips: bool,
    array_size: i32,
    gobs_height: i32,
    layout: Layout,
    error: Option<SwizzleError>,
}

impl Default for SwizzleContext {
    fn default() -> Self {
        Self::new()
    }
}

fn positive(value: i32) -> Option<usize> {
    if value > 0 {
        usize::try_from(value).ok()
    } else {
        None
    }
}

impl SwizzleContext {
    /// Creates a context with no platform, an empty surface, and no recorded error.
    pub fn new() -> Self {
        Self {
            platform: Platform::Unknown,
            width: 0,
            height: 0,
            block_width: 0,
            block_height: 0,
            block_data_size: 0,
            has_mips: false,
            array_size: DEFAULT_ARRAY_SIZE,
            gobs_height: DEFAULT_GOBS_HEIGHT,
            layout: Layout::Identity,
            error: None,
        }
    }

    /// Resets all values to their defaults and clears the last error.
    pub fn init(&mut self) {
        *self = Self::new();
    }

    /// The most recently recorded error or [None] if no operation has failed since the last [SwizzleContext::init].
    pub fn last_error(&self) -> Option<SwizzleError> {
        self.error
    }

    /// The console platform.
    pub fn platform(&self) -> Platform {
        self.platform
    }

    /// The width and height in pixels.
    pub fn texture_size(&self) -> (i32, i32) {
        (self.width, self.height)
    }

    /// The block width and height in pixels and the size of a block in bytes.
    pub fn block_info(&self) -> (i32, i32, i32) {
        (self.block_width, self.block_height, self.block_data_size)
    }

    /// `true` if the texture has a full mipmap chain.
    pub fn has_mips(&self) -> bool {
        self.has_mips
    }

    /// The number of array layers.
    pub fn array_size(&self) -> i32 {
        self.array_size
    }

    /// The maximum number of GOBs in a GOB block for the Switch.
    pub fn gobs_height(&self) -> i32 {
        self.gobs_height
    }

    /// The number of mipmaps for the current texture size.
    /// Negative dimensions are treated as `0`.
    pub fn mip_count(&self) -> usize {
        mip_count(
            usize::try_from(self.width).unwrap_or(0),
            usize::try_from(self.height).unwrap_or(0),
            self.has_mips,
        )
    }

    pub(crate) fn record_error(&mut self, error: SwizzleError) {
        tracing::debug!(code = error.code(), "{}", error);
        self.error = Some(error);
    }

    fn status(&self) -> Result<(), SwizzleError> {
        match self.error {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    /// Selects the memory layout for swizzled data.
    /// [Platform::Unknown] records [SwizzleError::UnknownPlatform].
    pub fn set_platform(&mut self, platform: Platform) -> Result<(), SwizzleError> {
        self.platform = platform;
        self.layout = Layout::from_platform(platform);
        if let Err(error) = self.check_platform() {
            self.record_error(error);
        }
        self.status()
    }

    /// Sets the width and height in pixels.
    /// Negative values reset both dimensions to `0` and record [SwizzleError::InvalidTextureSize].
    pub fn set_texture_size(&mut self, width: i32, height: i32) -> Result<(), SwizzleError> {
        self.width = width;
        self.height = height;
        if let Err(error) = self.check_texture_size() {
            tracing::debug!(width, height, "rejected texture size");
            self.width = 0;
            self.height = 0;
            self.record_error(error);
        }
        self.status()
    }

    /// Sets the block width and height in pixels and the size of each block in bytes.
    /// Uncompressed formats use a block width and height of `1`.
    /// Non positive values reset all three to `0` and record [SwizzleError::InvalidBlockInfo].
    pub fn set_block_info(
        &mut self,
        block_width: i32,
        block_height: i32,
        block_data_size: i32,
    ) -> Result<(), SwizzleError> {
        self.block_width = block_width;
        self.block_height = block_height;
        self.block_data_size = block_data_size;
        if let Err(error) = self.check_block_info() {
            tracing::debug!(
                block_width,
                block_height,
                block_data_size,
                "rejected block info"
            );
            self.block_width = 0;
            self.block_height = 0;
            self.block_data_size = 0;
            self.record_error(error);
        }
        self.status()
    }

    /// Includes a full mipmap chain when `true`.
    pub fn set_has_mips(&mut self, has_mips: bool) {
        self.has_mips = has_mips;
    }

    /// Sets the number of array layers.
    /// Non positive values reset to `1` and record [SwizzleError::InvalidArraySize].
    pub fn set_array_size(&mut self, array_size: i32) -> Result<(), SwizzleError> {
        self.array_size = array_size;
        if let Err(error) = self.check_array_size() {
            tracing::debug!(array_size, "rejected array size");
            self.array_size = DEFAULT_ARRAY_SIZE;
            self.record_error(error);
        }
        self.status()
    }

    /// Sets the maximum number of GOBs in a GOB block for the Switch layout.
    /// Values other than those in [GobsHeight] reset to `16` and record [SwizzleError::InvalidGobsHeight].
    pub fn set_gobs_height(&mut self, gobs_height: i32) -> Result<(), SwizzleError> {
        self.gobs_height = gobs_height;
        if let Err(error) = self.check_gobs_height() {
            tracing::debug!(gobs_height, "rejected gobs height");
            self.gobs_height = DEFAULT_GOBS_HEIGHT;
            self.record_error(error);
        }
        self.status()
    }

    fn check_platform(&self) -> Result<Layout, SwizzleError> {
        match self.platform {
            Platform::Unknown => Err(SwizzleError::UnknownPlatform),
            Platform::Ps4 | Platform::Switch => Ok(self.layout),
        }
    }

    fn check_texture_size(&self) -> Result<(usize, usize), SwizzleError> {
        match (usize::try_from(self.width), usize::try_from(self.height)) {
            (Ok(width), Ok(height)) => Ok((width, height)),
            _ => Err(SwizzleError::InvalidTextureSize),
        }
    }

    fn check_block_info(&self) -> Result<(usize, usize, usize), SwizzleError> {
        match (
            positive(self.block_width),
            positive(self.block_height),
            positive(self.block_data_size),
        ) {
            (Some(width), Some(height), Some(data_size)) => Ok((width, height, data_size)),
            _ => Err(SwizzleError::InvalidBlockInfo),
        }
    }

    fn check_array_size(&self) -> Result<usize, SwizzleError> {
        positive(self.array_size).ok_or(SwizzleError::InvalidArraySize)
    }

    fn check_gobs_height(&self) -> Result<GobsHeight, SwizzleError> {
        u32::try_from(self.gobs_height)
            .ok()
            .and_then(GobsHeight::new)
            .ok_or(SwizzleError::InvalidGobsHeight)
    }

    /// Runs every check in order.
    /// Only the last failing check is recorded, so later checks take priority over earlier ones.
    fn validate(&mut self) -> Result<(Layout, TextureShape), SwizzleError> {
        let layout = self.check_platform();
        let texture_size = self.check_texture_size();
        let block_info = self.check_block_info();
        let array_size = self.check_array_size();
        let gobs_height = self.check_gobs_height();

        let last_failure = [
            layout.err(),
            texture_size.err(),
            block_info.err(),
            array_size.err(),
            gobs_height.err(),
        ]
        .iter()
        .rev()
        .find_map(|error| *error);

        if let Some(error) = last_failure {
            self.record_error(error);
        }
        self.status()?;

        let (width, height) = texture_size?;
        let (block_width, block_height, block_data_size) = block_info?;
        let shape = TextureShape {
            width,
            height,
            block_width,
            block_height,
            block_data_size,
            has_mips: self.has_mips,
            array_size: array_size?,
            gobs_height: gobs_height?,
        };
        Ok((layout?, shape))
    }

    fn surface_size(&mut self, swizzled: bool) -> Result<usize, SwizzleError> {
        let (layout, shape) = self.validate()?;
        let layout = if swizzled { layout } else { Layout::Identity };
        shape.surface_size(layout).map_err(|error| {
            self.record_error(error);
            error
        })
    }

    /// The size in bytes of the swizzled data for all array layers and mipmaps.
    /// Returns `0` and records the error if the configuration is invalid.
    /// # Examples
    /**
    ```rust
    use console_swizzler::{Platform, SwizzleContext};

    let mut context = SwizzleContext::new();
    context.set_platform(Platform::Switch).unwrap();
    context.set_texture_size(16, 32).unwrap();
    context.set_block_info(4, 4, 16).unwrap();
    assert_eq!(512, context.swizzled_size());
    ```
    */
    pub fn swizzled_size(&mut self) -> usize {
        self.surface_size(true).unwrap_or(0)
    }

    /// The size in bytes of the linear data for all array layers and mipmaps.
    /// Returns `0` and records the error if the configuration is invalid.
    pub fn unswizzled_size(&mut self) -> usize {
        self.surface_size(false).unwrap_or(0)
    }

    fn alloc_data(&mut self, swizzled: bool) -> Result<Vec<u8>, SwizzleError> {
        let size = self.surface_size(swizzled)?;
        try_alloc_zeroed(size).map_err(|error| {
            self.record_error(error);
            error
        })
    }

    /// Allocates a zeroed buffer with [SwizzleContext::swizzled_size] many bytes.
    pub fn alloc_swizzled_data(&mut self) -> Result<Vec<u8>, SwizzleError> {
        self.alloc_data(true)
    }

    /// Allocates a zeroed buffer with [SwizzleContext::unswizzled_size] many bytes.
    pub fn alloc_unswizzled_data(&mut self) -> Result<Vec<u8>, SwizzleError> {
        self.alloc_data(false)
    }

    fn transform<const DESWIZZLE: bool>(
        &mut self,
        source: &[u8],
        destination: &mut [u8],
    ) -> Result<(), SwizzleError> {
        let (layout, shape) = self.validate()?;
        transform_checked::<DESWIZZLE>(&shape, layout, source, destination).map_err(|error| {
            self.record_error(error);
            error
        })
    }

    /// Swizzles the linear data in `source` into `destination`.
    ///
    /// Only the first [SwizzleContext::unswizzled_size] bytes of `source`
    /// and the first [SwizzleContext::swizzled_size] bytes of `destination` are used.
    /// Returns [SwizzleError::NotEnoughData] without writing any bytes if either buffer is too small.
    pub fn swizzle(&mut self, source: &[u8], destination: &mut [u8]) -> Result<(), SwizzleError> {
        self.transform::<false>(source, destination)
    }

    /// Unswizzles the swizzled data in `source` into `destination`.
    ///
    /// Only the first [SwizzleContext::swizzled_size] bytes of `source`
    /// and the first [SwizzleContext::unswizzled_size] bytes of `destination` are used.
    /// Returns [SwizzleError::NotEnoughData] without writing any bytes if either buffer is too small.
    pub fn unswizzle(
        &mut self,
        source: &[u8],
        destination: &mut [u8],
    ) -> Result<(), SwizzleError> {
        self.transform::<true>(source, destination)
    }

    /// Swizzles `source` into a new buffer with [SwizzleContext::swizzled_size] many bytes.
    pub fn swizzle_to_vec(&mut self, source: &[u8]) -> Result<Vec<u8>, SwizzleError> {
        let mut destination = self.alloc_swizzled_data()?;
        self.swizzle(source, &mut destination)?;
        Ok(destination)
    }

    /// Unswizzles `source` into a new buffer with [SwizzleContext::unswizzled_size] many bytes.
    pub fn unswizzle_to_vec(&mut self, source: &[u8]) -> Result<Vec<u8>, SwizzleError> {
        let mut destination = self.alloc_unswizzled_data()?;
        self.unswizzle(source, &mut destination)?;
        Ok(destination)
    }
}

fn transform_checked<const DESWIZZLE: bool>(
    shape: &TextureShape,
    layout: Layout,
    source: &[u8],
    destination: &mut [u8],
) -> Result<(), SwizzleError> {
    let swizzled_size = shape.surface_size(layout)?;
    let unswizzled_size = shape.surface_size(Layout::Identity)?;
    let (source_size, destination_size) = if DESWIZZLE {
        (swizzled_size, unswizzled_size)
    } else {
        (unswizzled_size, swizzled_size)
    };

    if source.len() < source_size {
        return Err(SwizzleError::NotEnoughData {
            expected_size: source_size,
            actual_size: source.len(),
        });
    }
    if destination.len() < destination_size {
        return Err(SwizzleError::NotEnoughData {
            expected_size: destination_size,
            actual_size: destination.len(),
        });
    }

    transform_surface::<DESWIZZLE>(
        shape,
        layout,
        &source[..source_size],
        &mut destination[..destination_size],
    )
}
