use std::{
    convert::TryFrom,
    fs::File,
    io::{BufReader, BufWriter},
    path::Path,
    str::FromStr,
};

use console_swizzler::{Platform, SwizzleContext, SwizzleError};
use formats::BlockInfo;
use tracing::info;

pub mod formats;

/// The direction of the conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Swizzle,
    Unswizzle,
}

impl FromStr for Command {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "swizzle" => Ok(Command::Swizzle),
            "unswizzle" => Ok(Command::Unswizzle),
            _ => Err("Unknown command"),
        }
    }
}

/// Parses the platform names accepted on the command line.
pub fn parse_platform(name: &str) -> Option<Platform> {
    match name {
        "ps4" => Some(Platform::Ps4),
        "switch" => Some(Platform::Switch),
        _ => None,
    }
}

#[derive(Debug)]
pub enum CliError {
    Io(std::io::Error),
    Dds(ddsfile::Error),
    UnsupportedFormat,
    Swizzle(SwizzleError),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Io(e) => write!(f, "{}", e),
            CliError::Dds(e) => write!(f, "Failed to read or write dds. {}", e),
            CliError::UnsupportedFormat => write!(f, "Unsupported pixel format."),
            CliError::Swizzle(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for CliError {}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        CliError::Io(e)
    }
}

impl From<ddsfile::Error> for CliError {
    fn from(e: ddsfile::Error) -> Self {
        CliError::Dds(e)
    }
}

impl From<SwizzleError> for CliError {
    fn from(e: SwizzleError) -> Self {
        CliError::Swizzle(e)
    }
}

/// The dimensions and layout of the image data in a DDS file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceInfo {
    pub width: u32,
    pub height: u32,
    pub mipmap_count: u32,
    pub array_count: u32,
    pub block_info: BlockInfo,
}

impl SurfaceInfo {
    pub fn from_dds(dds: &ddsfile::Dds) -> Result<Self, CliError> {
        Ok(Self {
            width: dds.header.width,
            height: dds.header.height,
            mipmap_count: dds.get_num_mipmap_levels(),
            array_count: dds.get_num_array_layers().max(1),
            block_info: BlockInfo::from_dds(dds).ok_or(CliError::UnsupportedFormat)?,
        })
    }
}

fn to_i32(value: u32, error: SwizzleError) -> Result<i32, SwizzleError> {
    i32::try_from(value).map_err(|_| error)
}

/// Creates a context for the surface.
/// A mipmap count larger than 1 is assumed to be a full mipmap chain.
pub fn create_context(
    surface: &SurfaceInfo,
    platform: Platform,
    gobs_height: i32,
) -> Result<SwizzleContext, SwizzleError> {
    let mut context = SwizzleContext::new();
    context.set_platform(platform)?;
    context.set_texture_size(
        to_i32(surface.width, SwizzleError::InvalidTextureSize)?,
        to_i32(surface.height, SwizzleError::InvalidTextureSize)?,
    )?;
    context.set_gobs_height(gobs_height)?;
    context.set_has_mips(surface.mipmap_count > 1);
    context.set_array_size(to_i32(surface.array_count, SwizzleError::InvalidArraySize)?)?;
    context.set_block_info(
        to_i32(surface.block_info.block_width, SwizzleError::InvalidBlockInfo)?,
        to_i32(surface.block_info.block_height, SwizzleError::InvalidBlockInfo)?,
        to_i32(surface.block_info.block_data_size, SwizzleError::InvalidBlockInfo)?,
    )?;
    Ok(context)
}

/// Swizzles or unswizzles the image data for all array layers and mipmaps of `surface`.
pub fn convert_data(
    data: &[u8],
    surface: &SurfaceInfo,
    command: Command,
    platform: Platform,
    gobs_height: i32,
) -> Result<Vec<u8>, SwizzleError> {
    let mut context = create_context(surface, platform, gobs_height)?;
    match command {
        Command::Swizzle => context.swizzle_to_vec(data),
        Command::Unswizzle => context.unswizzle_to_vec(data),
    }
}

/// Converts the image data of the DDS file at `input` and saves the result to `output`.
/// The header of the input file is preserved.
pub fn convert_dds<P: AsRef<Path>>(
    input: P,
    output: P,
    command: Command,
    platform: Platform,
    gobs_height: i32,
) -> Result<(), CliError> {
    info!("Loading {}...", input.as_ref().display());
    let mut reader = BufReader::new(File::open(input)?);
    let mut dds = ddsfile::Dds::read(&mut reader)?;

    let surface = SurfaceInfo::from_dds(&dds)?;
    info!(
        width = surface.width,
        height = surface.height,
        mipmaps = surface.mipmap_count,
        layers = surface.array_count,
        "{:?}",
        surface.block_info
    );

    dds.data = convert_data(&dds.data, &surface, command, platform, gobs_height)?;

    info!("Saving {}...", output.as_ref().display());
    let mut writer = BufWriter::new(File::create(output)?);
    dds.write(&mut writer)?;
    Ok(())
}
