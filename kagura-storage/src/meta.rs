//! # Store Metadata
//!
//! A small `META` file beside the segments pins the store's vector
//! dimensionality. The embedding provider determines vector length, and
//! mixing providers of different dimensions across reopens would silently
//! corrupt search — so the dimension chosen at creation is persisted and a
//! mismatched provider is rejected at open.
//!
//! ```text
//! ┌──────────────────┬─────────────┬───────────────┐
//! │ magic "KGRMETA\0" │ version u32 │ dimension u32 │
//! └──────────────────┴─────────────┴───────────────┘
//! ```

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

use kagura_core::error::{Error, Result};

const META_MAGIC: &[u8; 8] = b"KGRMETA\0";
const META_VERSION: u32 = 1;
const META_FILE: &str = "META";

/// Read the persisted dimensionality, if this directory holds a store.
pub fn read_dimension(dir: &Path) -> Result<Option<usize>> {
    let path = dir.join(META_FILE);
    if !path.exists() {
        return Ok(None);
    }

    let mut file = File::open(&path).map_err(|e| Error::Io {
        message: format!("could not open {}", path.display()),
        source: e,
    })?;

    let mut magic = [0u8; 8];
    file.read_exact(&mut magic)?;
    if &magic != META_MAGIC {
        return Err(Error::Configuration {
            message: format!("{} is not a kagura store metadata file", path.display()),
        });
    }

    let version = file.read_u32::<LittleEndian>()?;
    if version != META_VERSION {
        return Err(Error::Configuration {
            message: format!("unsupported store metadata version {}", version),
        });
    }

    let dimension = file.read_u32::<LittleEndian>()? as usize;
    Ok(Some(dimension))
}

/// Persist the dimensionality chosen at store creation.
pub fn write_dimension(dir: &Path, dimension: usize) -> Result<()> {
    let path = dir.join(META_FILE);
    let mut file = File::create(&path).map_err(|e| Error::Io {
        message: format!("could not create {}", path.display()),
        source: e,
    })?;

    file.write_all(META_MAGIC)?;
    file.write_u32::<LittleEndian>(META_VERSION)?;
    file.write_u32::<LittleEndian>(dimension as u32)?;
    file.sync_all()?;
    Ok(())
}
