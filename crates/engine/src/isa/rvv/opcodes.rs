//! Vector opcodes and encoding fields.

/// Vector arithmetic and configuration opcode (0b1010111).
pub const OP_V: u32 = 0b1010111;

/// Vector load opcode (shared with LOAD-FP, 0b0000111).
pub const OP_V_LOAD: u32 = 0b0000111;

/// Vector store opcode (shared with STORE-FP, 0b0100111).
pub const OP_V_STORE: u32 = 0b0100111;

/// OPIVV: vector-vector integer operations (funct3).
pub const OPIVV: u32 = 0b000;
/// OPMVV: mask/permutation vector-vector operations (funct3).
pub const OPMVV: u32 = 0b010;
/// OPIVI: vector-immediate integer operations (funct3).
pub const OPIVI: u32 = 0b011;
/// OPIVX: vector-scalar integer operations (funct3).
pub const OPIVX: u32 = 0b100;
/// Vector configuration (vsetvli/vsetivli/vsetvl, funct3).
pub const OPCFG: u32 = 0b111;

/// Integer add (funct6).
pub const VADD: u32 = 0b000000;
/// Integer subtract (funct6, vv/vx forms only).
pub const VSUB: u32 = 0b000010;
/// Integer reverse subtract (funct6, vx/vi forms only).
pub const VRSUB: u32 = 0b000011;
/// Bitwise AND (funct6).
pub const VAND: u32 = 0b001001;
/// Bitwise OR (funct6).
pub const VOR: u32 = 0b001010;
/// Bitwise XOR (funct6).
pub const VXOR: u32 = 0b001011;
/// Move/splat (funct6; vmv.v.v, vmv.v.x, vmv.v.i with vs2 = v0 and vm = 1).
pub const VMV: u32 = 0b010111;
/// VMUNARY0 group (funct6; vid.v selected by the vs1 field).
pub const VMUNARY0: u32 = 0b010100;

/// vs1 field value selecting `vid.v` within the VMUNARY0 group.
pub const VID_VS1: usize = 0b10001;

/// Unit-stride 8-bit element width (the load/store width funct3 field).
pub const EEW8: u32 = 0b000;
/// Unit-stride 16-bit element width.
pub const EEW16: u32 = 0b101;
/// Unit-stride 32-bit element width.
pub const EEW32: u32 = 0b110;
