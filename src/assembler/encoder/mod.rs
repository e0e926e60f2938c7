/*
Copyright 2025 Connor Nolan

Licensed under the Apache License, Version 2.0 (the "License");
you may not use this file except in compliance with the License.
You may obtain a copy of the License at

    http://www.apache.org/licenses/LICENSE-2.0

Unless required by applicable law or agreed to in writing, software
distributed under the License is distributed on an "AS IS" BASIS,
WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
See the License for the specific language governing permissions and
limitations under the License.
*/

//! Pure RV32I word composition. Each function validates its immediate,
//! masks every subfield to its bit width and ORs the pieces into place.
//! Registers are range-safe by construction, so only immediates can fail.

use crate::ast::{OpcodeFields, Register};
use crate::errors::AssemblyError;

fn mask(bits: u32) -> u32 {
    (1u32 << bits) - 1
}

// Range-check a signed immediate and return its two's-complement field.
fn signed_field(
    value: i64,
    bits: u32,
    field: &'static str,
    line: usize,
) -> Result<u32, AssemblyError> {
    let min = -(1i64 << (bits - 1));
    let max = (1i64 << (bits - 1)) - 1;
    if value < min || value > max {
        return Err(AssemblyError::ImmediateOutOfRange { line, field, value });
    }
    Ok((value as u32) & mask(bits))
}

fn unsigned_field(
    value: i64,
    bits: u32,
    field: &'static str,
    line: usize,
) -> Result<u32, AssemblyError> {
    if value < 0 || value > mask(bits) as i64 {
        return Err(AssemblyError::ImmediateOutOfRange { line, field, value });
    }
    Ok(value as u32)
}

// Branch and jump offsets address 2-byte boundaries; bit 0 is never encoded.
fn check_aligned(value: i64, line: usize) -> Result<(), AssemblyError> {
    if value % 2 != 0 {
        return Err(AssemblyError::MisalignedBranchTarget { line, value });
    }
    Ok(())
}

pub fn encode_r(codes: OpcodeFields, rd: Register, rs1: Register, rs2: Register) -> u32 {
    codes.funct7 << 25
        | rs2.index() << 20
        | rs1.index() << 15
        | codes.funct3 << 12
        | rd.index() << 7
        | codes.opcode
}

pub fn encode_i(
    codes: OpcodeFields,
    rd: Register,
    rs1: Register,
    imm: i64,
    line: usize,
) -> Result<u32, AssemblyError> {
    let imm = signed_field(imm, 12, "I-type immediate", line)?;
    Ok(imm << 20 | rs1.index() << 15 | codes.funct3 << 12 | rd.index() << 7 | codes.opcode)
}

pub fn encode_i_shamt(
    codes: OpcodeFields,
    rd: Register,
    rs1: Register,
    shamt: i64,
    line: usize,
) -> Result<u32, AssemblyError> {
    let shamt = unsigned_field(shamt, 5, "shift amount", line)?;
    Ok(codes.funct7 << 25
        | shamt << 20
        | rs1.index() << 15
        | codes.funct3 << 12
        | rd.index() << 7
        | codes.opcode)
}

// B-type scatters imm[12|10:5] into bits 31:25 and imm[4:1|11] into 11:7.
pub fn encode_b(
    codes: OpcodeFields,
    rs1: Register,
    rs2: Register,
    offset: i64,
    line: usize,
) -> Result<u32, AssemblyError> {
    let imm = signed_field(offset, 13, "branch offset", line)?;
    check_aligned(offset, line)?;
    Ok((imm >> 12 & 1) << 31
        | (imm >> 5 & 0x3f) << 25
        | rs2.index() << 20
        | rs1.index() << 15
        | codes.funct3 << 12
        | (imm >> 1 & 0xf) << 8
        | (imm >> 11 & 1) << 7
        | codes.opcode)
}

pub fn encode_u(
    codes: OpcodeFields,
    rd: Register,
    imm: i64,
    line: usize,
) -> Result<u32, AssemblyError> {
    let imm = unsigned_field(imm, 20, "upper immediate", line)?;
    Ok(imm << 12 | rd.index() << 7 | codes.opcode)
}

// J-type scatters imm[20|10:1|11|19:12] into bits 31:12.
pub fn encode_j(
    codes: OpcodeFields,
    rd: Register,
    offset: i64,
    line: usize,
) -> Result<u32, AssemblyError> {
    let imm = signed_field(offset, 21, "jump offset", line)?;
    check_aligned(offset, line)?;
    Ok((imm >> 20 & 1) << 31
        | (imm >> 1 & 0x3ff) << 21
        | (imm >> 11 & 1) << 20
        | (imm >> 12 & 0xff) << 12
        | rd.index() << 7
        | codes.opcode)
}

// S-type splits imm[11:5] into bits 31:25 and imm[4:0] into 11:7.
pub fn encode_s(
    codes: OpcodeFields,
    rs1: Register,
    rs2: Register,
    imm: i64,
    line: usize,
) -> Result<u32, AssemblyError> {
    let imm = signed_field(imm, 12, "store offset", line)?;
    Ok((imm >> 5 & 0x7f) << 25
        | rs2.index() << 20
        | rs1.index() << 15
        | codes.funct3 << 12
        | (imm & 0x1f) << 7
        | codes.opcode)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::AssemblyError;

    fn reg(index: u32) -> Register {
        Register::from_index(index).unwrap()
    }

    #[test]
    fn test_encode_addi() {
        let word = encode_i(OpcodeFields::ADDI, reg(1), reg(0), 1, 1).unwrap();
        assert_eq!(word, 0x00100093);
    }

    #[test]
    fn test_encode_add() {
        assert_eq!(encode_r(OpcodeFields::ADD, reg(5), reg(6), reg(7)), 0x007302B3);
    }

    #[test]
    fn test_encode_sub() {
        assert_eq!(encode_r(OpcodeFields::SUB, reg(1), reg(2), reg(3)), 0x403100B3);
    }

    #[test]
    fn test_encode_beq_offset_zero() {
        let word = encode_b(OpcodeFields::BEQ, reg(1), reg(2), 0, 1).unwrap();
        assert_eq!(word, 0x00208063);
    }

    #[test]
    fn test_encode_beq_negative_offset() {
        let word = encode_b(OpcodeFields::BEQ, reg(0), reg(0), -4, 1).unwrap();
        assert_eq!(word, 0xFE000EE3);
    }

    #[test]
    fn test_encode_jal_forward() {
        let word = encode_j(OpcodeFields::JAL, reg(0), 8, 1).unwrap();
        assert_eq!(word, 0x0080006F);
    }

    #[test]
    fn test_encode_lui() {
        let word = encode_u(OpcodeFields::LUI, reg(10), 0xABCDE, 1).unwrap();
        assert_eq!(word, 0xABCDE537);
    }

    #[test]
    fn test_encode_sw() {
        let word = encode_s(OpcodeFields::SW, reg(6), reg(5), 16, 1).unwrap();
        assert_eq!(word, 0x00532823);
    }

    #[test]
    fn test_encode_lw() {
        let word = encode_i(OpcodeFields::LW, reg(1), reg(2), 8, 1).unwrap();
        assert_eq!(word, 0x00812083);
    }

    #[test]
    fn test_encode_slli_srai() {
        let slli = encode_i_shamt(OpcodeFields::SLLI, reg(1), reg(2), 5, 1).unwrap();
        assert_eq!(slli, 0x00511093);
        let srai = encode_i_shamt(OpcodeFields::SRAI, reg(1), reg(2), 5, 1).unwrap();
        assert_eq!(srai, 0x40515093);
    }

    #[test]
    fn test_encoder_is_reproducible() {
        let first = encode_b(OpcodeFields::BNE, reg(3), reg(4), -256, 7).unwrap();
        let second = encode_b(OpcodeFields::BNE, reg(3), reg(4), -256, 7).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_register_round_trip_every_slot() {
        for r in 0..32 {
            let rd_word = encode_r(OpcodeFields::ADD, reg(r), reg(0), reg(0));
            assert_eq!(rd_word >> 7 & 0x1f, r);
            let rs1_word = encode_r(OpcodeFields::ADD, reg(0), reg(r), reg(0));
            assert_eq!(rs1_word >> 15 & 0x1f, r);
            let rs2_word = encode_r(OpcodeFields::ADD, reg(0), reg(0), reg(r));
            assert_eq!(rs2_word >> 20 & 0x1f, r);
        }
    }

    // sign-extend the low `bits` of a field back to i64
    fn sign_extend(value: u32, bits: u32) -> i64 {
        let shift = 64 - bits;
        ((value as i64) << shift) >> shift
    }

    #[test]
    fn test_i_immediate_round_trip() {
        for imm in [-2048i64, -1, 0, 1, 2047] {
            let word = encode_i(OpcodeFields::ADDI, reg(1), reg(2), imm, 1).unwrap();
            assert_eq!(sign_extend(word >> 20, 12), imm);
        }
    }

    #[test]
    fn test_s_immediate_round_trip() {
        for imm in [-2048i64, -1, 0, 1, 2047] {
            let word = encode_s(OpcodeFields::SW, reg(1), reg(2), imm, 1).unwrap();
            let field = (word >> 25 & 0x7f) << 5 | word >> 7 & 0x1f;
            assert_eq!(sign_extend(field, 12), imm);
        }
    }

    #[test]
    fn test_b_immediate_round_trip() {
        for offset in [-4096i64, -2, 0, 2, 1024, 4094] {
            let word = encode_b(OpcodeFields::BEQ, reg(1), reg(2), offset, 1).unwrap();
            let field = (word >> 31 & 1) << 12
                | (word >> 7 & 1) << 11
                | (word >> 25 & 0x3f) << 5
                | (word >> 8 & 0xf) << 1;
            assert_eq!(sign_extend(field, 13), offset);
        }
    }

    #[test]
    fn test_j_immediate_round_trip() {
        for offset in [-1048576i64, -2, 0, 2, 8, 1048574] {
            let word = encode_j(OpcodeFields::JAL, reg(1), offset, 1).unwrap();
            let field = (word >> 31 & 1) << 20
                | (word >> 12 & 0xff) << 12
                | (word >> 20 & 1) << 11
                | (word >> 21 & 0x3ff) << 1;
            assert_eq!(sign_extend(field, 21), offset);
        }
    }

    #[test]
    fn test_u_immediate_round_trip() {
        for imm in [0i64, 1, 0xABCDE, 0xFFFFF] {
            let word = encode_u(OpcodeFields::LUI, reg(1), imm, 1).unwrap();
            assert_eq!((word >> 12) as i64, imm);
        }
    }

    #[test]
    fn test_boundary_rejection() {
        assert!(matches!(
            encode_i(OpcodeFields::ADDI, reg(0), reg(0), 2048, 3),
            Err(AssemblyError::ImmediateOutOfRange { line: 3, value: 2048, .. })
        ));
        assert!(matches!(
            encode_i(OpcodeFields::ADDI, reg(0), reg(0), -2049, 3),
            Err(AssemblyError::ImmediateOutOfRange { value: -2049, .. })
        ));
        assert!(matches!(
            encode_s(OpcodeFields::SW, reg(0), reg(0), 2048, 3),
            Err(AssemblyError::ImmediateOutOfRange { .. })
        ));
        assert!(matches!(
            encode_i_shamt(OpcodeFields::SLLI, reg(0), reg(0), 32, 3),
            Err(AssemblyError::ImmediateOutOfRange { .. })
        ));
        assert!(matches!(
            encode_i_shamt(OpcodeFields::SLLI, reg(0), reg(0), -1, 3),
            Err(AssemblyError::ImmediateOutOfRange { .. })
        ));
        assert!(matches!(
            encode_u(OpcodeFields::LUI, reg(0), 0x100000, 3),
            Err(AssemblyError::ImmediateOutOfRange { .. })
        ));
        assert!(matches!(
            encode_u(OpcodeFields::LUI, reg(0), -1, 3),
            Err(AssemblyError::ImmediateOutOfRange { .. })
        ));
        assert!(matches!(
            encode_b(OpcodeFields::BEQ, reg(0), reg(0), 4096, 3),
            Err(AssemblyError::ImmediateOutOfRange { .. })
        ));
        assert!(matches!(
            encode_b(OpcodeFields::BEQ, reg(0), reg(0), -4098, 3),
            Err(AssemblyError::ImmediateOutOfRange { .. })
        ));
        assert!(matches!(
            encode_j(OpcodeFields::JAL, reg(0), 1048576, 3),
            Err(AssemblyError::ImmediateOutOfRange { .. })
        ));
        assert!(matches!(
            encode_j(OpcodeFields::JAL, reg(0), -1048578, 3),
            Err(AssemblyError::ImmediateOutOfRange { .. })
        ));
    }

    #[test]
    fn test_odd_branch_and_jump_offsets_rejected() {
        assert!(matches!(
            encode_b(OpcodeFields::BEQ, reg(0), reg(0), 3, 9),
            Err(AssemblyError::MisalignedBranchTarget { line: 9, value: 3 })
        ));
        assert!(matches!(
            encode_b(OpcodeFields::BEQ, reg(0), reg(0), -7, 9),
            Err(AssemblyError::MisalignedBranchTarget { value: -7, .. })
        ));
        assert!(matches!(
            encode_j(OpcodeFields::JAL, reg(0), 9, 9),
            Err(AssemblyError::MisalignedBranchTarget { value: 9, .. })
        ));
    }
}
