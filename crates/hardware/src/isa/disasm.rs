//! Instruction Disassembler for SPARC V8.
//!
//! Converts a 32-bit instruction encoding into a human-readable mnemonic
//! string for debug tracing, error diagnostics, and the debugger's
//! `status` command. The output follows the SPARC assembler syntax:
//! sources first, destination last.
//!
//! # Usage
//!
//! ```
//! use leon3_core::isa::disasm::disassemble;
//!
//! assert_eq!(disassemble(0x9002_2005, 0), "add %o0, 5, %o0");
//! assert_eq!(disassemble(0x0100_0000, 0), "nop");
//! ```

use crate::common::reg::RegisterFile;
use crate::core::units::alu::AluOp;
use crate::isa::decode::{
    AtomicOp, Instruction, LoadOp, Operand, SpecialReg, StoreOp, decode,
};

#[inline]
fn reg(idx: usize) -> &'static str {
    RegisterFile::name(idx)
}

fn operand(op2: Operand) -> String {
    match op2 {
        Operand::Reg(r) => reg(r).to_string(),
        Operand::Imm(v) => format!("{}", v as i32),
    }
}

fn address(rs1: usize, op2: Operand) -> String {
    match op2 {
        Operand::Reg(0) => format!("[{}]", reg(rs1)),
        Operand::Reg(r) => format!("[{} + {}]", reg(rs1), reg(r)),
        Operand::Imm(0) => format!("[{}]", reg(rs1)),
        Operand::Imm(v) if (v as i32) < 0 => format!("[{} - {}]", reg(rs1), -(v as i32)),
        Operand::Imm(v) => format!("[{} + {}]", reg(rs1), v),
    }
}

fn alternate(addr: String, asi: Option<u8>) -> String {
    match asi {
        Some(asi) => format!("{addr} {asi:#x}"),
        None => addr,
    }
}

fn special(reg: SpecialReg) -> String {
    match reg {
        SpecialReg::Y => "%y".to_string(),
        SpecialReg::Psr => "%psr".to_string(),
        SpecialReg::Wim => "%wim".to_string(),
        SpecialReg::Tbr => "%tbr".to_string(),
        SpecialReg::Asr(n) => format!("%asr{n}"),
    }
}

const fn alu_mnemonic(op: AluOp, cc: bool) -> &'static str {
    match (op, cc) {
        (AluOp::Add, false) => "add",
        (AluOp::Add, true) => "addcc",
        (AluOp::AddX, false) => "addx",
        (AluOp::AddX, true) => "addxcc",
        (AluOp::Sub, false) => "sub",
        (AluOp::Sub, true) => "subcc",
        (AluOp::SubX, false) => "subx",
        (AluOp::SubX, true) => "subxcc",
        (AluOp::And, false) => "and",
        (AluOp::And, true) => "andcc",
        (AluOp::AndN, false) => "andn",
        (AluOp::AndN, true) => "andncc",
        (AluOp::Or, false) => "or",
        (AluOp::Or, true) => "orcc",
        (AluOp::OrN, false) => "orn",
        (AluOp::OrN, true) => "orncc",
        (AluOp::Xor, false) => "xor",
        (AluOp::Xor, true) => "xorcc",
        (AluOp::XNor, false) => "xnor",
        (AluOp::XNor, true) => "xnorcc",
        (AluOp::Sll, _) => "sll",
        (AluOp::Srl, _) => "srl",
        (AluOp::Sra, _) => "sra",
        (AluOp::TAdd, _) => "taddcc",
        (AluOp::TSub, _) => "tsubcc",
        (AluOp::TAddTv, _) => "taddcctv",
        (AluOp::TSubTv, _) => "tsubcctv",
        (AluOp::MulScc, _) => "mulscc",
        (AluOp::UMul, false) => "umul",
        (AluOp::UMul, true) => "umulcc",
        (AluOp::SMul, false) => "smul",
        (AluOp::SMul, true) => "smulcc",
        (AluOp::UDiv, false) => "udiv",
        (AluOp::UDiv, true) => "udivcc",
        (AluOp::SDiv, false) => "sdiv",
        (AluOp::SDiv, true) => "sdivcc",
        (AluOp::UMac, _) => "umac",
        (AluOp::SMac, _) => "smac",
    }
}

const fn load_mnemonic(op: LoadOp, alt: bool) -> &'static str {
    match (op, alt) {
        (LoadOp::Ldsb, false) => "ldsb",
        (LoadOp::Ldsh, false) => "ldsh",
        (LoadOp::Ldub, false) => "ldub",
        (LoadOp::Lduh, false) => "lduh",
        (LoadOp::Ld, false) => "ld",
        (LoadOp::Ldd, false) => "ldd",
        (LoadOp::Ldsb, true) => "ldsba",
        (LoadOp::Ldsh, true) => "ldsha",
        (LoadOp::Ldub, true) => "lduba",
        (LoadOp::Lduh, true) => "lduha",
        (LoadOp::Ld, true) => "lda",
        (LoadOp::Ldd, true) => "ldda",
    }
}

const fn store_mnemonic(op: StoreOp, alt: bool) -> &'static str {
    match (op, alt) {
        (StoreOp::Stb, false) => "stb",
        (StoreOp::Sth, false) => "sth",
        (StoreOp::St, false) => "st",
        (StoreOp::Std, false) => "std",
        (StoreOp::Stb, true) => "stba",
        (StoreOp::Sth, true) => "stha",
        (StoreOp::St, true) => "sta",
        (StoreOp::Std, true) => "stda",
    }
}

/// Formats a decoded instruction located at `pc`.
///
/// Branch and call targets are printed as absolute addresses.
pub fn format_instruction(inst: &Instruction, pc: u32) -> String {
    match *inst {
        Instruction::Alu {
            op, cc, rd, rs1, op2,
        } => {
            let op2 = match (op, op2) {
                (AluOp::Sll | AluOp::Srl | AluOp::Sra, Operand::Imm(v)) => {
                    Operand::Imm(v & 0x1F)
                }
                _ => op2,
            };
            format!(
                "{} {}, {}, {}",
                alu_mnemonic(op, cc),
                reg(rs1),
                operand(op2),
                reg(rd)
            )
        }
        Instruction::Sethi { rd: 0, imm22: 0 } => "nop".to_string(),
        Instruction::Sethi { rd, imm22 } => {
            format!("sethi %hi({:#x}), {}", imm22 << 10, reg(rd))
        }
        Instruction::Branch {
            cond,
            annul,
            disp22,
        } => {
            let target = pc.wrapping_add((disp22 as u32).wrapping_shl(2));
            let a = if annul { ",a" } else { "" };
            format!("b{}{a} {target:#010x}", cond.suffix())
        }
        Instruction::Call { disp30 } => {
            format!("call {:#010x}", pc.wrapping_add(disp30 << 2))
        }
        Instruction::Jmpl { rd, rs1, op2 } => {
            let addr = address(rs1, op2);
            let addr = &addr[1..addr.len() - 1];
            match (rd, rs1, op2) {
                (0, 31, Operand::Imm(8)) => "ret".to_string(),
                (0, 15, Operand::Imm(8)) => "retl".to_string(),
                _ => format!("jmpl {addr}, {}", reg(rd)),
            }
        }
        Instruction::Rett { rs1, op2 } => {
            let addr = address(rs1, op2);
            format!("rett {}", &addr[1..addr.len() - 1])
        }
        Instruction::Ticc { cond, rs1, op2 } => match (rs1, op2) {
            (0, op2) => format!("t{} {}", cond.suffix(), operand(op2)),
            (rs1, op2) => format!("t{} {} + {}", cond.suffix(), reg(rs1), operand(op2)),
        },
        Instruction::Save { rd, rs1, op2 } => {
            format!("save {}, {}, {}", reg(rs1), operand(op2), reg(rd))
        }
        Instruction::Restore {
            rd: 0,
            rs1: 0,
            op2: Operand::Reg(0),
        } => "restore".to_string(),
        Instruction::Restore { rd, rs1, op2 } => {
            format!("restore {}, {}, {}", reg(rs1), operand(op2), reg(rd))
        }
        Instruction::Load {
            op,
            rd,
            rs1,
            op2,
            asi,
        } => format!(
            "{} {}, {}",
            load_mnemonic(op, asi.is_some()),
            alternate(address(rs1, op2), asi),
            reg(rd)
        ),
        Instruction::Store {
            op,
            rd,
            rs1,
            op2,
            asi,
        } => format!(
            "{} {}, {}",
            store_mnemonic(op, asi.is_some()),
            reg(rd),
            alternate(address(rs1, op2), asi)
        ),
        Instruction::Atomic {
            op,
            rd,
            rs1,
            op2,
            asi,
        } => {
            let mn = match (op, asi.is_some()) {
                (AtomicOp::Ldstub, false) => "ldstub",
                (AtomicOp::Ldstub, true) => "ldstuba",
                (AtomicOp::Swap, false) => "swap",
                (AtomicOp::Swap, true) => "swapa",
            };
            format!("{mn} {}, {}", alternate(address(rs1, op2), asi), reg(rd))
        }
        Instruction::ReadSpecial { reg: sr, rd } => {
            format!("rd {}, {}", special(sr), reg(rd))
        }
        Instruction::WriteSpecial { reg: sr, rs1, op2 } => {
            format!("wr {}, {}, {}", reg(rs1), operand(op2), special(sr))
        }
        Instruction::Stbar => "stbar".to_string(),
        Instruction::Flush { rs1, op2 } => {
            let addr = address(rs1, op2);
            format!("flush {}", &addr[1..addr.len() - 1])
        }
        Instruction::Unimp { const22 } => format!("unimp {const22:#x}"),
        Instruction::Interrupt { level } => format!("<irq {level}>"),
    }
}

/// Disassembles a 32-bit SPARC instruction located at `pc`.
///
/// Returns a mnemonic like `"add %o0, 5, %o1"`, or `".word 0x..."` for
/// encodings that do not decode.
pub fn disassemble(word: u32, pc: u32) -> String {
    decode(word).map_or_else(
        || format!(".word {word:#010x}"),
        |inst| format_instruction(&inst, pc),
    )
}

impl Instruction {
    /// Renders the instruction in assembler syntax, resolving PC-relative targets from `pc`.
    pub fn mnemonic(&self, pc: u32) -> String {
        format_instruction(self, pc)
    }
}
