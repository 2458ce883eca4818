//! A minimal RV32 ELF executable writer for loader tests.

/// ELF machine number for RISC-V.
const EM_RISCV: u16 = 243;
/// ELF machine number for x86-64, used to build a wrong-architecture file.
pub const EM_X86_64: u16 = 62;

/// One loadable segment description: target address, file bytes, and the
/// in-memory size (`mem_size > data.len()` produces BSS).
pub struct LoadSegment {
    pub address: u32,
    pub data: Vec<u8>,
    pub mem_size: u32,
}

impl LoadSegment {
    pub fn new(address: u32, data: Vec<u8>) -> Self {
        let mem_size = data.len() as u32;
        Self {
            address,
            data,
            mem_size,
        }
    }

    pub fn with_bss(address: u32, data: Vec<u8>, mem_size: u32) -> Self {
        Self {
            address,
            data,
            mem_size,
        }
    }
}

/// Builds a little-endian ELF32 executable with the given entry point and
/// PT_LOAD segments.
pub fn build_elf(entry: u32, segments: &[LoadSegment]) -> Vec<u8> {
    build_elf_for_machine(EM_RISCV, entry, segments)
}

pub fn build_elf_for_machine(machine: u16, entry: u32, segments: &[LoadSegment]) -> Vec<u8> {
    const EHSIZE: u32 = 52;
    const PHENTSIZE: u32 = 32;
    let phnum = segments.len() as u32;
    let mut data_offset = EHSIZE + phnum * PHENTSIZE;

    let mut out = Vec::new();
    // e_ident: magic, ELFCLASS32, ELFDATA2LSB, EV_CURRENT.
    out.extend_from_slice(&[0x7F, b'E', b'L', b'F', 1, 1, 1, 0]);
    out.extend_from_slice(&[0; 8]);
    out.extend_from_slice(&2u16.to_le_bytes()); // e_type = ET_EXEC
    out.extend_from_slice(&machine.to_le_bytes());
    out.extend_from_slice(&1u32.to_le_bytes()); // e_version
    out.extend_from_slice(&entry.to_le_bytes());
    out.extend_from_slice(&EHSIZE.to_le_bytes()); // e_phoff
    out.extend_from_slice(&0u32.to_le_bytes()); // e_shoff
    out.extend_from_slice(&0u32.to_le_bytes()); // e_flags
    out.extend_from_slice(&(EHSIZE as u16).to_le_bytes());
    out.extend_from_slice(&(PHENTSIZE as u16).to_le_bytes());
    out.extend_from_slice(&(phnum as u16).to_le_bytes());
    out.extend_from_slice(&0u16.to_le_bytes()); // e_shentsize
    out.extend_from_slice(&0u16.to_le_bytes()); // e_shnum
    out.extend_from_slice(&0u16.to_le_bytes()); // e_shstrndx

    for seg in segments {
        out.extend_from_slice(&1u32.to_le_bytes()); // p_type = PT_LOAD
        out.extend_from_slice(&data_offset.to_le_bytes());
        out.extend_from_slice(&seg.address.to_le_bytes()); // p_vaddr
        out.extend_from_slice(&seg.address.to_le_bytes()); // p_paddr
        out.extend_from_slice(&(seg.data.len() as u32).to_le_bytes());
        out.extend_from_slice(&seg.mem_size.to_le_bytes());
        out.extend_from_slice(&0x7u32.to_le_bytes()); // p_flags = rwx
        out.extend_from_slice(&4u32.to_le_bytes()); // p_align
        data_offset += seg.data.len() as u32;
    }

    for seg in segments {
        out.extend_from_slice(&seg.data);
    }
    out
}

/// Encodes instruction words as little-endian bytes.
pub fn words(instructions: &[u32]) -> Vec<u8> {
    instructions.iter().flat_map(|i| i.to_le_bytes()).collect()
}
