//! Program Image Loader.
//!
//! This module places program images into simulated memory. It performs:
//! 1. **Format detection:** ELF images are recognized by their magic; anything else is raw.
//! 2. **ELF loading:** Copies every `PT_LOAD` segment of a 32-bit big-endian SPARC image
//!    to its physical address and zero-fills the BSS tail; the entry point comes from the header.
//! 3. **Raw loading:** Copies a flat binary to a load address, which is also the entry point.

use std::fs;
use std::path::Path;

use object::Object;
use object::elf::{EM_SPARC, EM_SPARC32PLUS, PT_LOAD};
use object::read::elf::{ElfFile32, FileHeader, ProgramHeader};

use crate::common::error::SimError;
use crate::soc::Memory;

/// ELF identification bytes.
const ELF_MAGIC: [u8; 4] = [0x7F, b'E', b'L', b'F'];

/// A segment copied into memory.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Segment {
    /// Load address.
    pub addr: u32,
    /// Bytes copied from the image.
    pub file_size: u32,
    /// Bytes occupied in memory, including the zero-filled tail.
    pub mem_size: u32,
}

/// Result of loading an image.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoadedImage {
    /// Address execution starts at.
    pub entry: u32,
    /// Segments written to memory, in image order.
    pub segments: Vec<Segment>,
}

impl LoadedImage {
    /// Total bytes occupied in memory.
    pub fn footprint(&self) -> u64 {
        self.segments.iter().map(|s| u64::from(s.mem_size)).sum()
    }
}

/// Returns `true` if `data` starts with the ELF magic.
pub fn is_elf(data: &[u8]) -> bool {
    data.starts_with(&ELF_MAGIC)
}

/// Reads an image from disk and loads it.
///
/// # Arguments
///
/// * `memory` - Destination memory.
/// * `path` - Path to the image.
/// * `load_addr` - Load address of a raw image; ignored for ELF images.
///
/// # Errors
///
/// `SimError::Io` if the file cannot be read, `SimError::Image` if it is not a
/// loadable SPARC image, `SimError::Memory` if a segment falls outside memory.
pub fn load_file(
    memory: &mut dyn Memory,
    path: impl AsRef<Path>,
    load_addr: u32,
) -> Result<LoadedImage, SimError> {
    let data = fs::read(path.as_ref())?;
    tracing::info!(
        path = %path.as_ref().display(),
        bytes = data.len(),
        "loading image"
    );
    if is_elf(&data) {
        load_elf(memory, &data)
    } else {
        load_raw(memory, &data, load_addr)
    }
}

/// Copies a flat binary to `addr`; execution starts at `addr`.
///
/// # Errors
///
/// `SimError::Memory` if the image does not fit.
pub fn load_raw(memory: &mut dyn Memory, data: &[u8], addr: u32) -> Result<LoadedImage, SimError> {
    let size = u32::try_from(data.len())
        .map_err(|_| SimError::Image(format!("raw image of {} bytes is too large", data.len())))?;
    memory.write_bytes(addr, data)?;
    Ok(LoadedImage {
        entry: addr,
        segments: vec![Segment {
            addr,
            file_size: size,
            mem_size: size,
        }],
    })
}

/// Loads the `PT_LOAD` segments of a 32-bit big-endian SPARC ELF image.
///
/// # Errors
///
/// `SimError::Image` for malformed, little-endian or non-SPARC images;
/// `SimError::Memory` if a segment does not fit.
pub fn load_elf(memory: &mut dyn Memory, data: &[u8]) -> Result<LoadedImage, SimError> {
    let file = ElfFile32::<object::Endianness>::parse(data)
        .map_err(|e| SimError::Image(format!("malformed ELF image: {e}")))?;
    if file.is_little_endian() {
        return Err(SimError::Image("ELF image is little-endian".into()));
    }
    let endian = file.endian();
    let machine = file.elf_header().e_machine(endian);
    if machine != EM_SPARC && machine != EM_SPARC32PLUS {
        return Err(SimError::Image(format!(
            "ELF machine {machine} is not SPARC"
        )));
    }

    let mut segments = Vec::new();
    for header in file.elf_program_headers() {
        if header.p_type(endian) != PT_LOAD {
            continue;
        }
        let addr = header.p_paddr(endian);
        let mem_size = header.p_memsz(endian);
        let bytes = header
            .data(endian, data)
            .map_err(|()| SimError::Image(format!("segment at {addr:#010x} exceeds the file")))?;
        let file_size = bytes.len() as u32;
        if file_size > mem_size {
            return Err(SimError::Image(format!(
                "segment at {addr:#010x} is larger on disk than in memory"
            )));
        }

        memory.write_bytes(addr, bytes)?;
        if mem_size > file_size {
            let bss = vec![0; (mem_size - file_size) as usize];
            memory.write_bytes(addr.wrapping_add(file_size), &bss)?;
        }
        tracing::debug!(
            addr = format_args!("{addr:#010x}"),
            file_size,
            mem_size,
            "segment loaded"
        );
        segments.push(Segment {
            addr,
            file_size,
            mem_size,
        });
    }

    if segments.is_empty() {
        return Err(SimError::Image("ELF image has no loadable segments".into()));
    }
    Ok(LoadedImage {
        entry: file.entry() as u32,
        segments,
    })
}
