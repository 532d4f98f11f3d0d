use memmap2::{Mmap, MmapOptions};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Read-only bytes of a stored index
pub trait Buffer: Send + Sync {
    fn data(&'_ self) -> &'_ [u8];
}

/// Stores the data in memory
pub struct MemoryBuffer {
    data: Vec<u8>,
}

impl MemoryBuffer {
    pub fn new(path: &Path) -> std::io::Result<Self> {
        let mut file = File::options().read(true).open(path)?;

        let mut data = Vec::new();
        file.read_to_end(&mut data)?;

        Ok(Self { data })
    }
}

impl Buffer for MemoryBuffer {
    fn data(&'_ self) -> &'_ [u8] {
        &self.data
    }
}

/// Uses a memory map
pub struct MmapBuffer {
    mmap: Mmap,
}

impl MmapBuffer {
    pub fn new(path: &Path) -> std::io::Result<Self> {
        let file = File::options().read(true).open(path)?;
        // The file must not be truncated while mapped
        let mmap = unsafe { MmapOptions::new().map(&file)? };
        Ok(Self { mmap })
    }
}

impl Buffer for MmapBuffer {
    fn data(&'_ self) -> &'_ [u8] {
        &self.mmap
    }
}

/// Opens a file either fully read in memory or memory mapped
pub fn open_buffer(path: &Path, in_memory: bool) -> std::io::Result<Box<dyn Buffer>> {
    Ok(if in_memory {
        Box::new(MemoryBuffer::new(path)?)
    } else {
        Box::new(MmapBuffer::new(path)?)
    })
}
