// Copyright 2020 Kevin Reid under the terms of the MIT License as detailed
// in the accompanying file README.md or <http://opensource.org/licenses/MIT>.

//! The PNG sink: `writeRGBA(path, width, height, bytes)`, the only image
//! format this driver needs to produce.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use crate::error::DriverError;

/// Encodes `pixels` (RGBA8, row-major, `width * height * 4` bytes) as a PNG
/// at `path`, creating its parent directory first if it doesn't exist.
pub fn write_rgba(path: &Path, width: u32, height: u32, pixels: &[u8]) -> Result<(), DriverError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|source| DriverError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        }
    }

    let file = File::create(path).map_err(|source| DriverError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let writer = BufWriter::new(file);

    let mut encoder = png::Encoder::new(writer, width, height);
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder.write_header().map_err(|source| DriverError::Png {
        path: path.to_path_buf(),
        source,
    })?;
    writer.write_image_data(pixels).map_err(|source| DriverError::Png {
        path: path.to_path_buf(),
        source,
    })?;

    log::debug!("wrote {} ({}x{} RGBA8)", path.display(), width, height);
    Ok(())
}
