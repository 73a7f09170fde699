//! SPARC V8 opcode tables.
//!
//! The two-bit `op` field (bits 30-31) selects the instruction format; `op2`
//! (format 0) or `op3` (formats 2 and 3) selects the operation.

/// Instruction format (bits 31:30).
pub mod format {
    /// Branches, SETHI and UNIMP.
    pub const BRANCH_SETHI: u32 = 0b00;
    /// CALL.
    pub const CALL: u32 = 0b01;
    /// Arithmetic, logic, control and special-register instructions.
    pub const ARITHMETIC: u32 = 0b10;
    /// Loads and stores.
    pub const LOAD_STORE: u32 = 0b11;
}

/// `op2` field of format 0 instructions (bits 24:22).
pub mod op2 {
    /// Unimplemented instruction.
    pub const UNIMP: u32 = 0;
    /// Branch on integer condition codes.
    pub const BICC: u32 = 2;
    /// Set high 22 bits.
    pub const SETHI: u32 = 4;
    /// Branch on floating-point condition codes.
    pub const FBFCC: u32 = 6;
    /// Branch on coprocessor condition codes.
    pub const CBCCC: u32 = 7;
}

/// `op3` field of format 2 instructions (bits 24:19).
#[allow(missing_docs)]
pub mod op3_arith {
    pub const ADD: u32 = 0x00;
    pub const AND: u32 = 0x01;
    pub const OR: u32 = 0x02;
    pub const XOR: u32 = 0x03;
    pub const SUB: u32 = 0x04;
    pub const ANDN: u32 = 0x05;
    pub const ORN: u32 = 0x06;
    pub const XNOR: u32 = 0x07;
    pub const ADDX: u32 = 0x08;
    pub const UMUL: u32 = 0x0A;
    pub const SMUL: u32 = 0x0B;
    pub const SUBX: u32 = 0x0C;
    pub const UDIV: u32 = 0x0E;
    pub const SDIV: u32 = 0x0F;
    pub const ADDCC: u32 = 0x10;
    pub const ANDCC: u32 = 0x11;
    pub const ORCC: u32 = 0x12;
    pub const XORCC: u32 = 0x13;
    pub const SUBCC: u32 = 0x14;
    pub const ANDNCC: u32 = 0x15;
    pub const ORNCC: u32 = 0x16;
    pub const XNORCC: u32 = 0x17;
    pub const ADDXCC: u32 = 0x18;
    pub const UMULCC: u32 = 0x1A;
    pub const SMULCC: u32 = 0x1B;
    pub const SUBXCC: u32 = 0x1C;
    pub const UDIVCC: u32 = 0x1E;
    pub const SDIVCC: u32 = 0x1F;
    pub const TADDCC: u32 = 0x20;
    pub const TSUBCC: u32 = 0x21;
    pub const TADDCCTV: u32 = 0x22;
    pub const TSUBCCTV: u32 = 0x23;
    pub const MULSCC: u32 = 0x24;
    pub const SLL: u32 = 0x25;
    pub const SRL: u32 = 0x26;
    pub const SRA: u32 = 0x27;
    /// RDY when `rs1 == 0`, STBAR when `rs1 == 15 && rd == 0`, RDASR otherwise.
    pub const RDASR: u32 = 0x28;
    pub const RDPSR: u32 = 0x29;
    pub const RDWIM: u32 = 0x2A;
    pub const RDTBR: u32 = 0x2B;
    /// WRY when `rd == 0`, WRASR otherwise.
    pub const WRASR: u32 = 0x30;
    pub const WRPSR: u32 = 0x31;
    pub const WRWIM: u32 = 0x32;
    pub const WRTBR: u32 = 0x33;
    pub const FPOP1: u32 = 0x34;
    pub const FPOP2: u32 = 0x35;
    pub const CPOP1: u32 = 0x36;
    pub const CPOP2: u32 = 0x37;
    pub const JMPL: u32 = 0x38;
    pub const RETT: u32 = 0x39;
    pub const TICC: u32 = 0x3A;
    pub const FLUSH: u32 = 0x3B;
    pub const SAVE: u32 = 0x3C;
    pub const RESTORE: u32 = 0x3D;
    pub const UMAC: u32 = 0x3E;
    pub const SMAC: u32 = 0x3F;
}

/// `op3` field of format 3 instructions (bits 24:19).
#[allow(missing_docs)]
pub mod op3_mem {
    pub const LD: u32 = 0x00;
    pub const LDUB: u32 = 0x01;
    pub const LDUH: u32 = 0x02;
    pub const LDD: u32 = 0x03;
    pub const ST: u32 = 0x04;
    pub const STB: u32 = 0x05;
    pub const STH: u32 = 0x06;
    pub const STD: u32 = 0x07;
    pub const LDSB: u32 = 0x09;
    pub const LDSH: u32 = 0x0A;
    pub const LDSTUB: u32 = 0x0D;
    pub const SWAP: u32 = 0x0F;
    pub const LDA: u32 = 0x10;
    pub const LDUBA: u32 = 0x11;
    pub const LDUHA: u32 = 0x12;
    pub const LDDA: u32 = 0x13;
    pub const STA: u32 = 0x14;
    pub const STBA: u32 = 0x15;
    pub const STHA: u32 = 0x16;
    pub const STDA: u32 = 0x17;
    pub const LDSBA: u32 = 0x19;
    pub const LDSHA: u32 = 0x1A;
    pub const LDSTUBA: u32 = 0x1D;
    pub const SWAPA: u32 = 0x1F;
}

/// Integer condition field values of Bicc and Ticc (bits 28:25).
#[allow(missing_docs)]
pub mod cond {
    pub const NEVER: u32 = 0x0;
    pub const EQUAL: u32 = 0x1;
    pub const LE: u32 = 0x2;
    pub const LESS: u32 = 0x3;
    pub const LEU: u32 = 0x4;
    pub const CS: u32 = 0x5;
    pub const NEG: u32 = 0x6;
    pub const VS: u32 = 0x7;
    pub const ALWAYS: u32 = 0x8;
    pub const NE: u32 = 0x9;
    pub const GT: u32 = 0xA;
    pub const GE: u32 = 0xB;
    pub const GTU: u32 = 0xC;
    pub const CC: u32 = 0xD;
    pub const POS: u32 = 0xE;
    pub const VC: u32 = 0xF;
}

/// Common SPARC instruction encodings.
pub mod patterns {
    /// `nop` (`sethi 0, %g0`).
    pub const NOP: u32 = 0x0100_0000;
    /// `retl` (`jmpl %o7 + 8, %g0`).
    pub const RETL: u32 = 0x81C3_E008;
    /// `ret` (`jmpl %i7 + 8, %g0`).
    pub const RET: u32 = 0x81C7_E008;
    /// `restore %g0, %g0, %g0`.
    pub const RESTORE: u32 = 0x81E8_0000;
    /// `ta 0`.
    pub const TA_0: u32 = 0x91D0_2000;
    /// `unimp 0`.
    pub const UNIMP_0: u32 = 0x0000_0000;
}
