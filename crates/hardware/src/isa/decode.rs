//! SPARC V8 Instruction Decoder.
//!
//! This module decodes 32-bit SPARC instruction words into the `Instruction`
//! sum type. Every word is decoded exactly once; execution then dispatches on
//! the variant. It provides:
//! 1. **Operands:** Register or sign-extended 13-bit immediate second operands.
//! 2. **Conditions:** The 16 integer branch/trap conditions and their evaluation against ICC.
//! 3. **Classification:** Stable per-class names and ids for tracing and diagnostics.
//!
//! Words that do not name an implemented instruction (floating-point and
//! coprocessor operations, immediate forms of alternate-space accesses, and
//! unassigned opcodes) decode to `None`.

use crate::core::arch::psr::Icc;
use crate::core::units::alu::AluOp;
use crate::isa::instruction::{InstructionBits, SW_TRAP_MASK, sign_extend};
use crate::isa::opcodes::{format, op2, op3_arith as a, op3_mem as m};

/// ASR index that, together with `rd == 0`, encodes STBAR.
const STBAR_RS1: usize = 15;

/// Second operand of a format 2 or format 3 instruction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operand {
    /// Register `rs2`.
    Reg(usize),
    /// Sign-extended immediate.
    Imm(u32),
}

impl Operand {
    /// Returns `true` for the immediate form.
    #[inline]
    pub const fn is_imm(self) -> bool {
        matches!(self, Self::Imm(_))
    }
}

/// Integer condition of Bicc and Ticc.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Cond {
    /// Never.
    Never,
    /// Equal (`Z`).
    Equal,
    /// Less or equal (`Z | (N ^ V)`).
    LessOrEqual,
    /// Less (`N ^ V`).
    Less,
    /// Less or equal unsigned (`C | Z`).
    LessOrEqualUnsigned,
    /// Carry set (`C`).
    CarrySet,
    /// Negative (`N`).
    Negative,
    /// Overflow set (`V`).
    OverflowSet,
    /// Always.
    Always,
    /// Not equal (`!Z`).
    NotEqual,
    /// Greater (`!(Z | (N ^ V))`).
    Greater,
    /// Greater or equal (`!(N ^ V)`).
    GreaterOrEqual,
    /// Greater unsigned (`!C & !Z`).
    GreaterUnsigned,
    /// Carry clear (`!C`).
    CarryClear,
    /// Positive (`!N`).
    Positive,
    /// Overflow clear (`!V`).
    OverflowClear,
}

impl Cond {
    const TABLE: [Self; 16] = [
        Self::Never,
        Self::Equal,
        Self::LessOrEqual,
        Self::Less,
        Self::LessOrEqualUnsigned,
        Self::CarrySet,
        Self::Negative,
        Self::OverflowSet,
        Self::Always,
        Self::NotEqual,
        Self::Greater,
        Self::GreaterOrEqual,
        Self::GreaterUnsigned,
        Self::CarryClear,
        Self::Positive,
        Self::OverflowClear,
    ];

    /// Decodes a 4-bit condition field.
    #[inline]
    pub const fn from_bits(bits: u32) -> Self {
        Self::TABLE[(bits & 0xF) as usize]
    }

    /// Evaluates the condition against the integer condition codes.
    #[inline]
    pub const fn evaluate(self, icc: Icc) -> bool {
        let Icc { n, z, v, c } = icc;
        match self {
            Self::Never => false,
            Self::Equal => z,
            Self::LessOrEqual => z || (n ^ v),
            Self::Less => n ^ v,
            Self::LessOrEqualUnsigned => c || z,
            Self::CarrySet => c,
            Self::Negative => n,
            Self::OverflowSet => v,
            Self::Always => true,
            Self::NotEqual => !z,
            Self::Greater => !(z || (n ^ v)),
            Self::GreaterOrEqual => !(n ^ v),
            Self::GreaterUnsigned => !c && !z,
            Self::CarryClear => !c,
            Self::Positive => !n,
            Self::OverflowClear => !v,
        }
    }

    /// Returns the assembler suffix (`a`, `ne`, `gu`, ...).
    pub const fn suffix(self) -> &'static str {
        match self {
            Self::Never => "n",
            Self::Equal => "e",
            Self::LessOrEqual => "le",
            Self::Less => "l",
            Self::LessOrEqualUnsigned => "leu",
            Self::CarrySet => "cs",
            Self::Negative => "neg",
            Self::OverflowSet => "vs",
            Self::Always => "a",
            Self::NotEqual => "ne",
            Self::Greater => "g",
            Self::GreaterOrEqual => "ge",
            Self::GreaterUnsigned => "gu",
            Self::CarryClear => "cc",
            Self::Positive => "pos",
            Self::OverflowClear => "vc",
        }
    }
}

/// Load width and signedness.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LoadOp {
    /// Signed byte.
    Ldsb,
    /// Signed halfword.
    Ldsh,
    /// Unsigned byte.
    Ldub,
    /// Unsigned halfword.
    Lduh,
    /// Word.
    Ld,
    /// Doubleword into an even/odd register pair.
    Ldd,
}

impl LoadOp {
    /// Access width in bytes.
    pub const fn size(self) -> u32 {
        match self {
            Self::Ldsb | Self::Ldub => 1,
            Self::Ldsh | Self::Lduh => 2,
            Self::Ld => 4,
            Self::Ldd => 8,
        }
    }
}

/// Store width.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StoreOp {
    /// Byte.
    Stb,
    /// Halfword.
    Sth,
    /// Word.
    St,
    /// Doubleword from an even/odd register pair.
    Std,
}

impl StoreOp {
    /// Access width in bytes.
    pub const fn size(self) -> u32 {
        match self {
            Self::Stb => 1,
            Self::Sth => 2,
            Self::St => 4,
            Self::Std => 8,
        }
    }
}

/// Atomic load-store operations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AtomicOp {
    /// Load a byte and store `0xFF` to it.
    Ldstub,
    /// Exchange a register with a memory word.
    Swap,
}

/// Special registers reachable through the RD/WR instructions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SpecialReg {
    /// Multiply/divide register.
    Y,
    /// Processor State Register.
    Psr,
    /// Window Invalid Mask.
    Wim,
    /// Trap Base Register.
    Tbr,
    /// Ancillary state register 1-31.
    Asr(usize),
}

impl SpecialReg {
    /// Returns `true` if access requires supervisor mode.
    pub const fn is_privileged(self) -> bool {
        matches!(self, Self::Psr | Self::Wim | Self::Tbr)
    }
}

/// A decoded SPARC V8 instruction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Instruction {
    /// Integer operate: arithmetic, logic, shift, tagged, multiply, divide, MAC.
    Alu {
        /// Operation.
        op: AluOp,
        /// Writes the integer condition codes.
        cc: bool,
        /// Destination.
        rd: usize,
        /// First source.
        rs1: usize,
        /// Second operand.
        op2: Operand,
    },
    /// SETHI; `sethi 0, %g0` is the canonical NOP.
    Sethi {
        /// Destination.
        rd: usize,
        /// 22-bit immediate placed in bits 10-31.
        imm22: u32,
    },
    /// Branch on integer condition codes.
    Branch {
        /// Condition.
        cond: Cond,
        /// Annul bit.
        annul: bool,
        /// Signed word displacement.
        disp22: i32,
    },
    /// Call and link.
    Call {
        /// Word displacement (wraps modulo 2^32 after scaling).
        disp30: u32,
    },
    /// Jump and link.
    Jmpl {
        /// Link register receiving the address of the JMPL.
        rd: usize,
        /// Base register.
        rs1: usize,
        /// Offset.
        op2: Operand,
    },
    /// Return from trap.
    Rett {
        /// Base register.
        rs1: usize,
        /// Offset.
        op2: Operand,
    },
    /// Trap on integer condition codes.
    Ticc {
        /// Condition.
        cond: Cond,
        /// Base register.
        rs1: usize,
        /// Trap number operand.
        op2: Operand,
    },
    /// Allocate a new register window.
    Save {
        /// Destination, written in the new window.
        rd: usize,
        /// First source, read in the old window.
        rs1: usize,
        /// Second operand, read in the old window.
        op2: Operand,
    },
    /// Return to the previous register window.
    Restore {
        /// Destination, written in the new window.
        rd: usize,
        /// First source, read in the old window.
        rs1: usize,
        /// Second operand, read in the old window.
        op2: Operand,
    },
    /// Integer load.
    Load {
        /// Width and signedness.
        op: LoadOp,
        /// Destination (even register for LDD).
        rd: usize,
        /// Base register.
        rs1: usize,
        /// Offset.
        op2: Operand,
        /// Explicit address space of the alternate form.
        asi: Option<u8>,
    },
    /// Integer store.
    Store {
        /// Width.
        op: StoreOp,
        /// Source (even register for STD).
        rd: usize,
        /// Base register.
        rs1: usize,
        /// Offset.
        op2: Operand,
        /// Explicit address space of the alternate form.
        asi: Option<u8>,
    },
    /// Atomic load-store.
    Atomic {
        /// Operation.
        op: AtomicOp,
        /// Destination (and source for SWAP).
        rd: usize,
        /// Base register.
        rs1: usize,
        /// Offset.
        op2: Operand,
        /// Explicit address space of the alternate form.
        asi: Option<u8>,
    },
    /// Read a special register.
    ReadSpecial {
        /// Register read.
        reg: SpecialReg,
        /// Destination.
        rd: usize,
    },
    /// Write `rs1 ^ op2` to a special register.
    WriteSpecial {
        /// Register written.
        reg: SpecialReg,
        /// First source.
        rs1: usize,
        /// Second operand.
        op2: Operand,
    },
    /// Store barrier.
    Stbar,
    /// Flush instruction memory.
    Flush {
        /// Base register.
        rs1: usize,
        /// Offset.
        op2: Operand,
    },
    /// Unimplemented instruction; always traps.
    Unimp {
        /// Ignored 22-bit constant.
        const22: u32,
    },
    /// Interrupt injection of the given level; never produced by `decode`.
    Interrupt {
        /// Interrupt level 1-15.
        level: u8,
    },
}

/// Class names, indexed by instruction id.
pub const INSTRUCTION_NAMES: [&str; 145] = [
    "LDSB_imm", "LDSB_reg", "LDSH_imm", "LDSH_reg", "LDUB_imm", "LDUB_reg", "LDUH_imm",
    "LDUH_reg", "LD_imm", "LD_reg", "LDD_imm", "LDD_reg", "LDSBA_reg", "LDSHA_reg", "LDUBA_reg",
    "LDUHA_reg", "LDA_reg", "LDDA_reg", "STB_imm", "STB_reg", "STH_imm", "STH_reg", "ST_imm",
    "ST_reg", "STD_imm", "STD_reg", "STBA_reg", "STHA_reg", "STA_reg", "STDA_reg", "LDSTUB_imm",
    "LDSTUB_reg", "LDSTUBA_reg", "SWAP_imm", "SWAP_reg", "SWAPA_reg", "SETHI", "AND_imm",
    "AND_reg", "ANDcc_imm", "ANDcc_reg", "ANDN_imm", "ANDN_reg", "ANDNcc_imm", "ANDNcc_reg",
    "OR_imm", "OR_reg", "ORcc_imm", "ORcc_reg", "ORN_imm", "ORN_reg", "ORNcc_imm", "ORNcc_reg",
    "XOR_imm", "XOR_reg", "XORcc_imm", "XORcc_reg", "XNOR_imm", "XNOR_reg", "XNORcc_imm",
    "XNORcc_reg", "SLL_imm", "SLL_reg", "SRL_imm", "SRL_reg", "SRA_imm", "SRA_reg", "ADD_imm",
    "ADD_reg", "ADDcc_imm", "ADDcc_reg", "ADDX_imm", "ADDX_reg", "ADDXcc_imm", "ADDXcc_reg",
    "TADDcc_imm", "TADDcc_reg", "TADDccTV_imm", "TADDccTV_reg", "SUB_imm", "SUB_reg",
    "SUBcc_imm", "SUBcc_reg", "SUBX_imm", "SUBX_reg", "SUBXcc_imm", "SUBXcc_reg", "TSUBcc_imm",
    "TSUBcc_reg", "TSUBccTV_imm", "TSUBccTV_reg", "MULScc_imm", "MULScc_reg", "UMUL_imm",
    "UMUL_reg", "SMUL_imm", "SMUL_reg", "UMULcc_imm", "UMULcc_reg", "SMULcc_imm", "SMULcc_reg",
    "UMAC_imm", "UMAC_reg", "SMAC_imm", "SMAC_reg", "UDIV_imm", "UDIV_reg", "SDIV_imm",
    "SDIV_reg", "UDIVcc_imm", "UDIVcc_reg", "SDIVcc_imm", "SDIVcc_reg", "SAVE_imm", "SAVE_reg",
    "RESTORE_imm", "RESTORE_reg", "BRANCH", "CALL", "JUMP_imm", "JUMP_reg", "RETT_imm",
    "RETT_reg", "TRAP_imm", "TRAP_reg", "READy", "READasr", "READpsr", "READwim", "READtbr",
    "WRITEY_reg", "WRITEY_imm", "WRITEasr_reg", "WRITEasr_imm", "WRITEpsr_reg", "WRITEpsr_imm",
    "WRITEwim_reg", "WRITEwim_imm", "WRITEtbr_reg", "WRITEtbr_imm", "STBAR", "UNIMP",
    "FLUSH_reg", "FLUSH_imm", "IRQ_IRQ",
];

#[inline]
const fn pick(op2: Operand, imm: &'static str, reg: &'static str) -> &'static str {
    if op2.is_imm() { imm } else { reg }
}

impl Instruction {
    /// Returns the class name of the instruction, such as `ADDcc_imm` or `BRANCH`.
    pub const fn name(&self) -> &'static str {
        match *self {
            Self::Alu { op, cc, op2, .. } => {
                let (imm, reg) = match (op, cc) {
                    (AluOp::Add, false) => ("ADD_imm", "ADD_reg"),
                    (AluOp::Add, true) => ("ADDcc_imm", "ADDcc_reg"),
                    (AluOp::AddX, false) => ("ADDX_imm", "ADDX_reg"),
                    (AluOp::AddX, true) => ("ADDXcc_imm", "ADDXcc_reg"),
                    (AluOp::Sub, false) => ("SUB_imm", "SUB_reg"),
                    (AluOp::Sub, true) => ("SUBcc_imm", "SUBcc_reg"),
                    (AluOp::SubX, false) => ("SUBX_imm", "SUBX_reg"),
                    (AluOp::SubX, true) => ("SUBXcc_imm", "SUBXcc_reg"),
                    (AluOp::And, false) => ("AND_imm", "AND_reg"),
                    (AluOp::And, true) => ("ANDcc_imm", "ANDcc_reg"),
                    (AluOp::AndN, false) => ("ANDN_imm", "ANDN_reg"),
                    (AluOp::AndN, true) => ("ANDNcc_imm", "ANDNcc_reg"),
                    (AluOp::Or, false) => ("OR_imm", "OR_reg"),
                    (AluOp::Or, true) => ("ORcc_imm", "ORcc_reg"),
                    (AluOp::OrN, false) => ("ORN_imm", "ORN_reg"),
                    (AluOp::OrN, true) => ("ORNcc_imm", "ORNcc_reg"),
                    (AluOp::Xor, false) => ("XOR_imm", "XOR_reg"),
                    (AluOp::Xor, true) => ("XORcc_imm", "XORcc_reg"),
                    (AluOp::XNor, false) => ("XNOR_imm", "XNOR_reg"),
                    (AluOp::XNor, true) => ("XNORcc_imm", "XNORcc_reg"),
                    (AluOp::Sll, _) => ("SLL_imm", "SLL_reg"),
                    (AluOp::Srl, _) => ("SRL_imm", "SRL_reg"),
                    (AluOp::Sra, _) => ("SRA_imm", "SRA_reg"),
                    (AluOp::TAdd, _) => ("TADDcc_imm", "TADDcc_reg"),
                    (AluOp::TSub, _) => ("TSUBcc_imm", "TSUBcc_reg"),
                    (AluOp::TAddTv, _) => ("TADDccTV_imm", "TADDccTV_reg"),
                    (AluOp::TSubTv, _) => ("TSUBccTV_imm", "TSUBccTV_reg"),
                    (AluOp::MulScc, _) => ("MULScc_imm", "MULScc_reg"),
                    (AluOp::UMul, false) => ("UMUL_imm", "UMUL_reg"),
                    (AluOp::UMul, true) => ("UMULcc_imm", "UMULcc_reg"),
                    (AluOp::SMul, false) => ("SMUL_imm", "SMUL_reg"),
                    (AluOp::SMul, true) => ("SMULcc_imm", "SMULcc_reg"),
                    (AluOp::UDiv, false) => ("UDIV_imm", "UDIV_reg"),
                    (AluOp::UDiv, true) => ("UDIVcc_imm", "UDIVcc_reg"),
                    (AluOp::SDiv, false) => ("SDIV_imm", "SDIV_reg"),
                    (AluOp::SDiv, true) => ("SDIVcc_imm", "SDIVcc_reg"),
                    (AluOp::UMac, _) => ("UMAC_imm", "UMAC_reg"),
                    (AluOp::SMac, _) => ("SMAC_imm", "SMAC_reg"),
                };
                pick(op2, imm, reg)
            }
            Self::Sethi { .. } => "SETHI",
            Self::Branch { .. } => "BRANCH",
            Self::Call { .. } => "CALL",
            Self::Jmpl { op2, .. } => pick(op2, "JUMP_imm", "JUMP_reg"),
            Self::Rett { op2, .. } => pick(op2, "RETT_imm", "RETT_reg"),
            Self::Ticc { op2, .. } => pick(op2, "TRAP_imm", "TRAP_reg"),
            Self::Save { op2, .. } => pick(op2, "SAVE_imm", "SAVE_reg"),
            Self::Restore { op2, .. } => pick(op2, "RESTORE_imm", "RESTORE_reg"),
            Self::Load { op, op2, asi, .. } => match (op, asi.is_some()) {
                (LoadOp::Ldsb, false) => pick(op2, "LDSB_imm", "LDSB_reg"),
                (LoadOp::Ldsh, false) => pick(op2, "LDSH_imm", "LDSH_reg"),
                (LoadOp::Ldub, false) => pick(op2, "LDUB_imm", "LDUB_reg"),
                (LoadOp::Lduh, false) => pick(op2, "LDUH_imm", "LDUH_reg"),
                (LoadOp::Ld, false) => pick(op2, "LD_imm", "LD_reg"),
                (LoadOp::Ldd, false) => pick(op2, "LDD_imm", "LDD_reg"),
                (LoadOp::Ldsb, true) => "LDSBA_reg",
                (LoadOp::Ldsh, true) => "LDSHA_reg",
                (LoadOp::Ldub, true) => "LDUBA_reg",
                (LoadOp::Lduh, true) => "LDUHA_reg",
                (LoadOp::Ld, true) => "LDA_reg",
                (LoadOp::Ldd, true) => "LDDA_reg",
            },
            Self::Store { op, op2, asi, .. } => match (op, asi.is_some()) {
                (StoreOp::Stb, false) => pick(op2, "STB_imm", "STB_reg"),
                (StoreOp::Sth, false) => pick(op2, "STH_imm", "STH_reg"),
                (StoreOp::St, false) => pick(op2, "ST_imm", "ST_reg"),
                (StoreOp::Std, false) => pick(op2, "STD_imm", "STD_reg"),
                (StoreOp::Stb, true) => "STBA_reg",
                (StoreOp::Sth, true) => "STHA_reg",
                (StoreOp::St, true) => "STA_reg",
                (StoreOp::Std, true) => "STDA_reg",
            },
            Self::Atomic { op, op2, asi, .. } => match (op, asi.is_some()) {
                (AtomicOp::Ldstub, false) => pick(op2, "LDSTUB_imm", "LDSTUB_reg"),
                (AtomicOp::Swap, false) => pick(op2, "SWAP_imm", "SWAP_reg"),
                (AtomicOp::Ldstub, true) => "LDSTUBA_reg",
                (AtomicOp::Swap, true) => "SWAPA_reg",
            },
            Self::ReadSpecial { reg, .. } => match reg {
                SpecialReg::Y => "READy",
                SpecialReg::Asr(_) => "READasr",
                SpecialReg::Psr => "READpsr",
                SpecialReg::Wim => "READwim",
                SpecialReg::Tbr => "READtbr",
            },
            Self::WriteSpecial { reg, op2, .. } => match reg {
                SpecialReg::Y => pick(op2, "WRITEY_imm", "WRITEY_reg"),
                SpecialReg::Asr(_) => pick(op2, "WRITEasr_imm", "WRITEasr_reg"),
                SpecialReg::Psr => pick(op2, "WRITEpsr_imm", "WRITEpsr_reg"),
                SpecialReg::Wim => pick(op2, "WRITEwim_imm", "WRITEwim_reg"),
                SpecialReg::Tbr => pick(op2, "WRITEtbr_imm", "WRITEtbr_reg"),
            },
            Self::Stbar => "STBAR",
            Self::Flush { op2, .. } => pick(op2, "FLUSH_imm", "FLUSH_reg"),
            Self::Unimp { .. } => "UNIMP",
            Self::Interrupt { .. } => "IRQ_IRQ",
        }
    }

    /// Returns the class id of the instruction: its index in [`INSTRUCTION_NAMES`].
    pub fn id(&self) -> usize {
        let name = self.name();
        INSTRUCTION_NAMES
            .iter()
            .position(|n| *n == name)
            .unwrap_or(INSTRUCTION_NAMES.len())
    }

    /// Returns `true` for control-transfer instructions.
    pub const fn is_control_transfer(&self) -> bool {
        matches!(
            self,
            Self::Branch { .. } | Self::Call { .. } | Self::Jmpl { .. } | Self::Rett { .. }
        )
    }
}

#[inline]
fn operand(word: u32) -> Operand {
    if word.i() {
        Operand::Imm(word.simm13())
    } else {
        Operand::Reg(word.rs2())
    }
}

/// Decodes a 32-bit SPARC V8 instruction word.
///
/// # Arguments
///
/// * `word` - The big-endian instruction word as fetched.
///
/// # Returns
///
/// The decoded instruction, or `None` if the word does not encode an
/// implemented instruction.
pub fn decode(word: u32) -> Option<Instruction> {
    match word.op() {
        format::BRANCH_SETHI => decode_format0(word),
        format::CALL => Some(Instruction::Call {
            disp30: word.disp30(),
        }),
        format::ARITHMETIC => decode_arith(word),
        _ => decode_mem(word),
    }
}

fn decode_format0(word: u32) -> Option<Instruction> {
    match word.op2() {
        op2::UNIMP => Some(Instruction::Unimp {
            const22: word.imm22(),
        }),
        op2::BICC => Some(Instruction::Branch {
            cond: Cond::from_bits(word.cond()),
            annul: word.annul(),
            disp22: word.disp22(),
        }),
        op2::SETHI => Some(Instruction::Sethi {
            rd: word.rd(),
            imm22: word.imm22(),
        }),
        _ => None,
    }
}

fn alu_op(op3: u32) -> Option<(AluOp, bool)> {
    let decoded = match op3 {
        a::ADD => (AluOp::Add, false),
        a::ADDCC => (AluOp::Add, true),
        a::ADDX => (AluOp::AddX, false),
        a::ADDXCC => (AluOp::AddX, true),
        a::SUB => (AluOp::Sub, false),
        a::SUBCC => (AluOp::Sub, true),
        a::SUBX => (AluOp::SubX, false),
        a::SUBXCC => (AluOp::SubX, true),
        a::AND => (AluOp::And, false),
        a::ANDCC => (AluOp::And, true),
        a::ANDN => (AluOp::AndN, false),
        a::ANDNCC => (AluOp::AndN, true),
        a::OR => (AluOp::Or, false),
        a::ORCC => (AluOp::Or, true),
        a::ORN => (AluOp::OrN, false),
        a::ORNCC => (AluOp::OrN, true),
        a::XOR => (AluOp::Xor, false),
        a::XORCC => (AluOp::Xor, true),
        a::XNOR => (AluOp::XNor, false),
        a::XNORCC => (AluOp::XNor, true),
        a::SLL => (AluOp::Sll, false),
        a::SRL => (AluOp::Srl, false),
        a::SRA => (AluOp::Sra, false),
        a::TADDCC => (AluOp::TAdd, true),
        a::TSUBCC => (AluOp::TSub, true),
        a::TADDCCTV => (AluOp::TAddTv, true),
        a::TSUBCCTV => (AluOp::TSubTv, true),
        a::MULSCC => (AluOp::MulScc, true),
        a::UMUL => (AluOp::UMul, false),
        a::UMULCC => (AluOp::UMul, true),
        a::SMUL => (AluOp::SMul, false),
        a::SMULCC => (AluOp::SMul, true),
        a::UDIV => (AluOp::UDiv, false),
        a::UDIVCC => (AluOp::UDiv, true),
        a::SDIV => (AluOp::SDiv, false),
        a::SDIVCC => (AluOp::SDiv, true),
        a::UMAC => (AluOp::UMac, false),
        a::SMAC => (AluOp::SMac, false),
        _ => return None,
    };
    Some(decoded)
}

fn decode_arith(word: u32) -> Option<Instruction> {
    let op3 = word.op3();
    let rd = word.rd();
    let rs1 = word.rs1();
    let op2 = operand(word);

    if let Some((op, cc)) = alu_op(op3) {
        return Some(Instruction::Alu {
            op,
            cc,
            rd,
            rs1,
            op2,
        });
    }

    let inst = match op3 {
        a::RDASR => match rs1 {
            0 => Instruction::ReadSpecial {
                reg: SpecialReg::Y,
                rd,
            },
            STBAR_RS1 if rd == 0 => Instruction::Stbar,
            _ => Instruction::ReadSpecial {
                reg: SpecialReg::Asr(rs1),
                rd,
            },
        },
        a::RDPSR => Instruction::ReadSpecial {
            reg: SpecialReg::Psr,
            rd,
        },
        a::RDWIM => Instruction::ReadSpecial {
            reg: SpecialReg::Wim,
            rd,
        },
        a::RDTBR => Instruction::ReadSpecial {
            reg: SpecialReg::Tbr,
            rd,
        },
        a::WRASR => Instruction::WriteSpecial {
            reg: if rd == 0 {
                SpecialReg::Y
            } else {
                SpecialReg::Asr(rd)
            },
            rs1,
            op2,
        },
        a::WRPSR => Instruction::WriteSpecial {
            reg: SpecialReg::Psr,
            rs1,
            op2,
        },
        a::WRWIM => Instruction::WriteSpecial {
            reg: SpecialReg::Wim,
            rs1,
            op2,
        },
        a::WRTBR => Instruction::WriteSpecial {
            reg: SpecialReg::Tbr,
            rs1,
            op2,
        },
        a::JMPL => Instruction::Jmpl { rd, rs1, op2 },
        a::RETT => Instruction::Rett { rs1, op2 },
        a::TICC => Instruction::Ticc {
            cond: Cond::from_bits(word.cond()),
            rs1,
            op2: if word.i() {
                Operand::Imm(sign_extend(word & SW_TRAP_MASK, 7))
            } else {
                op2
            },
        },
        a::FLUSH => Instruction::Flush { rs1, op2 },
        a::SAVE => Instruction::Save { rd, rs1, op2 },
        a::RESTORE => Instruction::Restore { rd, rs1, op2 },
        _ => return None,
    };
    Some(inst)
}

fn decode_mem(word: u32) -> Option<Instruction> {
    let op3 = word.op3();
    let rd = word.rd();
    let rs1 = word.rs1();
    let op2 = operand(word);

    // Alternate-space forms exist only with a register offset.
    let alternate = op3 & 0x10 != 0;
    if alternate && word.i() {
        return None;
    }
    let asi = alternate.then_some(word.asi());

    let load = |op| Some(Instruction::Load {
        op,
        rd,
        rs1,
        op2,
        asi,
    });
    let store = |op| Some(Instruction::Store {
        op,
        rd,
        rs1,
        op2,
        asi,
    });
    let atomic = |op| Some(Instruction::Atomic {
        op,
        rd,
        rs1,
        op2,
        asi,
    });

    match op3 {
        m::LDSB | m::LDSBA => load(LoadOp::Ldsb),
        m::LDSH | m::LDSHA => load(LoadOp::Ldsh),
        m::LDUB | m::LDUBA => load(LoadOp::Ldub),
        m::LDUH | m::LDUHA => load(LoadOp::Lduh),
        m::LD | m::LDA => load(LoadOp::Ld),
        m::LDD | m::LDDA => load(LoadOp::Ldd),
        m::STB | m::STBA => store(StoreOp::Stb),
        m::STH | m::STHA => store(StoreOp::Sth),
        m::ST | m::STA => store(StoreOp::St),
        m::STD | m::STDA => store(StoreOp::Std),
        m::LDSTUB | m::LDSTUBA => atomic(AtomicOp::Ldstub),
        m::SWAP | m::SWAPA => atomic(AtomicOp::Swap),
        _ => None,
    }
}
