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

mod operand_builders;

use crate::ast::{Instruction, OpcodeFields, Register};
use crate::errors::AssemblyError;
use crate::parser::Rule;
use pest::iterators::{Pair, Pairs};

pub struct AstBuilder<'a> {
    line_number: usize,
    rule: Rule,
    pairs: Pairs<'a, Rule>,
}

impl<'a> AstBuilder<'a> {
    pub fn new(pair: Pair<'a, Rule>) -> Self {
        Self {
            line_number: pair.as_span().start_pos().line_col().0,
            rule: pair.as_rule(),
            pairs: pair.into_inner(),
        }
    }

    // Helper to build an Instruction from a pest Pair
    pub fn build_instruction(self) -> Result<Instruction, AssemblyError> {
        match self.rule {
            Rule::r_instr => self.build_r(),
            Rule::i_instr => self.build_i(),
            Rule::shift_instr => self.build_shift(),
            Rule::load_instr => self.build_load(),
            Rule::store_instr => self.build_store(),
            Rule::branch_instr => self.build_branch(),
            Rule::jalr_instr => self.build_jalr(),
            Rule::jal_instr => self.build_jal(),
            Rule::u_instr => self.build_u(),
            // nop is the one supported pseudo-instruction
            Rule::nop_instr => Ok(Instruction::I {
                codes: OpcodeFields::ADDI,
                rd: Register::ZERO,
                rs1: Register::ZERO,
                imm: 0,
            }),
            _ => unreachable!("unknown instruction rule: {:?}", self.rule),
        }
    }

    fn build_r(mut self) -> Result<Instruction, AssemblyError> {
        let codes = r_codes(self.next_mnemonic());
        let rd = self.next_register()?;
        let rs1 = self.next_register()?;
        let rs2 = self.next_register()?;
        Ok(Instruction::R { codes, rd, rs1, rs2 })
    }

    fn build_i(mut self) -> Result<Instruction, AssemblyError> {
        let codes = i_codes(self.next_mnemonic());
        let rd = self.next_register()?;
        let rs1 = self.next_register()?;
        let imm = self.next_immediate()?;
        Ok(Instruction::I { codes, rd, rs1, imm })
    }

    fn build_shift(mut self) -> Result<Instruction, AssemblyError> {
        let codes = shift_codes(self.next_mnemonic());
        let rd = self.next_register()?;
        let rs1 = self.next_register()?;
        let shamt = self.next_immediate()?;
        Ok(Instruction::IShamt {
            codes,
            rd,
            rs1,
            shamt,
        })
    }

    // loads read as `lw rd, imm(rs1)`
    fn build_load(mut self) -> Result<Instruction, AssemblyError> {
        let codes = load_codes(self.next_mnemonic());
        let rd = self.next_register()?;
        let imm = self.next_immediate()?;
        let rs1 = self.next_register()?;
        Ok(Instruction::I { codes, rd, rs1, imm })
    }

    // stores read as `sw rs2, imm(rs1)`
    fn build_store(mut self) -> Result<Instruction, AssemblyError> {
        let codes = store_codes(self.next_mnemonic());
        let rs2 = self.next_register()?;
        let imm = self.next_immediate()?;
        let rs1 = self.next_register()?;
        Ok(Instruction::S {
            codes,
            rs1,
            rs2,
            imm,
        })
    }

    fn build_branch(mut self) -> Result<Instruction, AssemblyError> {
        let codes = branch_codes(self.next_mnemonic());
        let rs1 = self.next_register()?;
        let rs2 = self.next_register()?;
        let target = self.next_target()?;
        Ok(Instruction::B {
            codes,
            rs1,
            rs2,
            target,
        })
    }

    fn build_jalr(mut self) -> Result<Instruction, AssemblyError> {
        self.next_mnemonic();
        let rd = self.next_register()?;
        let rs1 = self.next_register()?;
        let imm = self.next_immediate()?;
        Ok(Instruction::I {
            codes: OpcodeFields::JALR,
            rd,
            rs1,
            imm,
        })
    }

    fn build_jal(mut self) -> Result<Instruction, AssemblyError> {
        self.next_mnemonic();
        let rd = self.next_register()?;
        let target = self.next_target()?;
        Ok(Instruction::J {
            codes: OpcodeFields::JAL,
            rd,
            target,
        })
    }

    fn build_u(mut self) -> Result<Instruction, AssemblyError> {
        let codes = u_codes(self.next_mnemonic());
        let rd = self.next_register()?;
        let imm = self.next_immediate()?;
        Ok(Instruction::U { codes, rd, imm })
    }
}

// ------------- mnemonic tables -------------

fn r_codes(mnemonic: &str) -> OpcodeFields {
    match mnemonic.to_ascii_lowercase().as_str() {
        "add" => OpcodeFields::ADD,
        "sub" => OpcodeFields::SUB,
        "sll" => OpcodeFields::SLL,
        "slt" => OpcodeFields::SLT,
        "sltu" => OpcodeFields::SLTU,
        "xor" => OpcodeFields::XOR,
        "srl" => OpcodeFields::SRL,
        "sra" => OpcodeFields::SRA,
        "or" => OpcodeFields::OR,
        "and" => OpcodeFields::AND,
        other => unreachable!("unknown R-type mnemonic: {}", other),
    }
}

fn i_codes(mnemonic: &str) -> OpcodeFields {
    match mnemonic.to_ascii_lowercase().as_str() {
        "addi" => OpcodeFields::ADDI,
        "slti" => OpcodeFields::SLTI,
        "sltiu" => OpcodeFields::SLTIU,
        "xori" => OpcodeFields::XORI,
        "ori" => OpcodeFields::ORI,
        "andi" => OpcodeFields::ANDI,
        other => unreachable!("unknown I-type mnemonic: {}", other),
    }
}

fn shift_codes(mnemonic: &str) -> OpcodeFields {
    match mnemonic.to_ascii_lowercase().as_str() {
        "slli" => OpcodeFields::SLLI,
        "srli" => OpcodeFields::SRLI,
        "srai" => OpcodeFields::SRAI,
        other => unreachable!("unknown shift mnemonic: {}", other),
    }
}

fn load_codes(mnemonic: &str) -> OpcodeFields {
    match mnemonic.to_ascii_lowercase().as_str() {
        "lb" => OpcodeFields::LB,
        "lh" => OpcodeFields::LH,
        "lw" => OpcodeFields::LW,
        "lbu" => OpcodeFields::LBU,
        "lhu" => OpcodeFields::LHU,
        other => unreachable!("unknown load mnemonic: {}", other),
    }
}

fn store_codes(mnemonic: &str) -> OpcodeFields {
    match mnemonic.to_ascii_lowercase().as_str() {
        "sb" => OpcodeFields::SB,
        "sh" => OpcodeFields::SH,
        "sw" => OpcodeFields::SW,
        other => unreachable!("unknown store mnemonic: {}", other),
    }
}

fn branch_codes(mnemonic: &str) -> OpcodeFields {
    match mnemonic.to_ascii_lowercase().as_str() {
        "beq" => OpcodeFields::BEQ,
        "bne" => OpcodeFields::BNE,
        "blt" => OpcodeFields::BLT,
        "bge" => OpcodeFields::BGE,
        "bltu" => OpcodeFields::BLTU,
        "bgeu" => OpcodeFields::BGEU,
        other => unreachable!("unknown branch mnemonic: {}", other),
    }
}

fn u_codes(mnemonic: &str) -> OpcodeFields {
    match mnemonic.to_ascii_lowercase().as_str() {
        "lui" => OpcodeFields::LUI,
        "auipc" => OpcodeFields::AUIPC,
        other => unreachable!("unknown U-type mnemonic: {}", other),
    }
}
