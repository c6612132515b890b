//==============================================================================
// Memory-mapped buffer
//==============================================================================
//
// A region moves through Created -> Written -> Read -> Released. Views borrow
// the region, so it cannot be released while one is still open, and the
// backing name is removed on drop even if a step in between fails.

use crate::error::{Result, TourError};
use lazy_static::lazy_static;
use memmap2::{Mmap, MmapMut, MmapOptions};
use std::fs::{self, File, OpenOptions};
use std::io::ErrorKind;
use std::marker::PhantomData;
use std::mem;
use std::path::{Path, PathBuf};

pub const REGION_NAME: &str = "RaceResults";
pub const REGION_SIZE: usize = 1024;

lazy_static! {
    static ref SHARED_MEMORY_DIR: PathBuf = {
        let shm = Path::new("/dev/shm");
        if shm.is_dir() {
            shm.to_path_buf()
        } else {
            std::env::temp_dir()
        }
    };
}

fn checked_range(offset: usize, len: usize, size: usize) -> Result<std::ops::Range<usize>> {
    match offset.checked_add(len) {
        Some(end) if end <= size => Ok(offset..end),
        _ => Err(TourError::out_of_bounds(offset, len, size)),
    }
}

#[derive(Debug)]
pub struct MappedRegion {
    name: String,
    path: PathBuf,
    file: File,
    size: usize,
    released: bool,
}

impl MappedRegion {
    /// Creates `name` in the platform shared-memory directory.
    pub fn create(name: &str, size: usize) -> Result<Self> {
        Self::create_new(&SHARED_MEMORY_DIR, name, size)
    }

    /// Creates `name` under `dir`. The name must not exist yet.
    pub fn create_new(dir: &Path, name: &str, size: usize) -> Result<Self> {
        let path = dir.join(name);
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create_new(true)
            .open(&path)
            .map_err(|err| match err.kind() {
                ErrorKind::AlreadyExists => TourError::region_exists(name),
                _ => TourError::Io(err),
            })?;

        let region = MappedRegion {
            name: name.to_string(),
            path,
            file,
            size,
            released: false,
        };
        region.file.set_len(size as u64)?;

        Ok(region)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn write_view(&self) -> Result<WriteView<'_>> {
        let map = unsafe { MmapOptions::new().len(self.size).map_mut(&self.file)? };
        Ok(WriteView {
            map,
            _region: PhantomData,
        })
    }

    pub fn read_view(&self) -> Result<ReadView<'_>> {
        let map = unsafe { MmapOptions::new().len(self.size).map(&self.file)? };
        Ok(ReadView {
            map,
            _region: PhantomData,
        })
    }

    /// Disposes of the region and frees its name for reuse.
    pub fn release(mut self) -> Result<()> {
        fs::remove_file(&self.path)?;
        self.released = true;
        Ok(())
    }
}

impl Drop for MappedRegion {
    fn drop(&mut self) {
        if !self.released {
            let _ = fs::remove_file(&self.path);
        }
    }
}

pub struct WriteView<'a> {
    map: MmapMut,
    _region: PhantomData<&'a MappedRegion>,
}

impl WriteView<'_> {
    /// Stores `value` at `offset` in native byte order.
    pub fn write_i32(&mut self, offset: usize, value: i32) -> Result<()> {
        let range = checked_range(offset, mem::size_of::<i32>(), self.map.len())?;
        self.map[range].copy_from_slice(&value.to_ne_bytes());
        Ok(())
    }

    /// Flushes outstanding writes and unmaps the view.
    pub fn close(self) -> Result<()> {
        self.map.flush()?;
        Ok(())
    }
}

pub struct ReadView<'a> {
    map: Mmap,
    _region: PhantomData<&'a MappedRegion>,
}

impl ReadView<'_> {
    pub fn read_i32(&self, offset: usize) -> Result<i32> {
        let range = checked_range(offset, mem::size_of::<i32>(), self.map.len())?;
        let mut bytes = [0u8; mem::size_of::<i32>()];
        bytes.copy_from_slice(&self.map[range]);
        Ok(i32::from_ne_bytes(bytes))
    }

    /// Dropping the view unmaps it; this only marks the end of the view.
    pub fn close(self) {}
}

/// Writes `value` at offset 0 through one view, closes it, then reads it back
/// through a second view.
pub fn round_trip(region: &MappedRegion, value: i32) -> Result<i32> {
    let mut writer = region.write_view()?;
    writer.write_i32(0, value)?;
    writer.close()?;

    let reader = region.read_view()?;
    let read = reader.read_i32(0)?;
    reader.close();

    Ok(read)
}
