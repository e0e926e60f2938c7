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

// --- Registers ---

// A register operand, always a valid index in 0..=31.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Register(u8);

impl Register {
    pub const ZERO: Register = Register(0);

    pub fn from_index(index: u32) -> Option<Self> {
        if index < 32 { Some(Register(index as u8)) } else { None }
    }

    // Accepts both the numeric (`x7`) and ABI (`t2`) spellings.
    pub fn from_name(name: &str) -> Option<Self> {
        let lower = name.to_ascii_lowercase();
        match lower.as_str() {
            "zero" => return Register::from_index(0),
            "ra" => return Register::from_index(1),
            "sp" => return Register::from_index(2),
            "gp" => return Register::from_index(3),
            "tp" => return Register::from_index(4),
            "fp" => return Register::from_index(8),
            _ => {}
        }
        if lower.len() < 2 {
            return None;
        }
        let (prefix, digits) = lower.split_at(1);
        let n: u32 = digits.parse().ok()?;
        match prefix {
            "x" => Register::from_index(n),
            "a" if n <= 7 => Register::from_index(10 + n),
            "s" if n <= 1 => Register::from_index(8 + n),
            "s" if n <= 11 => Register::from_index(16 + n),
            "t" if n <= 2 => Register::from_index(5 + n),
            "t" if n <= 6 => Register::from_index(25 + n),
            _ => None,
        }
    }

    pub fn index(self) -> u32 {
        self.0 as u32
    }
}

// --- Opcode subfields ---

// The fixed {opcode, funct3, funct7} triple a mnemonic selects. Families
// that have no funct3/funct7 subfield leave them zero.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct OpcodeFields {
    pub opcode: u32,
    pub funct3: u32,
    pub funct7: u32,
}

impl OpcodeFields {
    const fn new(opcode: u32, funct3: u32, funct7: u32) -> Self {
        Self {
            opcode,
            funct3,
            funct7,
        }
    }

    // register/register ALU group, opcode 0110011
    pub const ADD: Self = Self::new(0b011_0011, 0b000, 0b000_0000);
    pub const SUB: Self = Self::new(0b011_0011, 0b000, 0b010_0000);
    pub const SLL: Self = Self::new(0b011_0011, 0b001, 0b000_0000);
    pub const SLT: Self = Self::new(0b011_0011, 0b010, 0b000_0000);
    pub const SLTU: Self = Self::new(0b011_0011, 0b011, 0b000_0000);
    pub const XOR: Self = Self::new(0b011_0011, 0b100, 0b000_0000);
    pub const SRL: Self = Self::new(0b011_0011, 0b101, 0b000_0000);
    pub const SRA: Self = Self::new(0b011_0011, 0b101, 0b010_0000);
    pub const OR: Self = Self::new(0b011_0011, 0b110, 0b000_0000);
    pub const AND: Self = Self::new(0b011_0011, 0b111, 0b000_0000);

    // register/immediate ALU group, opcode 0010011
    pub const ADDI: Self = Self::new(0b001_0011, 0b000, 0);
    pub const SLTI: Self = Self::new(0b001_0011, 0b010, 0);
    pub const SLTIU: Self = Self::new(0b001_0011, 0b011, 0);
    pub const XORI: Self = Self::new(0b001_0011, 0b100, 0);
    pub const ORI: Self = Self::new(0b001_0011, 0b110, 0);
    pub const ANDI: Self = Self::new(0b001_0011, 0b111, 0);

    // shifts keep their funct7 even though the immediate shares its field
    pub const SLLI: Self = Self::new(0b001_0011, 0b001, 0b000_0000);
    pub const SRLI: Self = Self::new(0b001_0011, 0b101, 0b000_0000);
    pub const SRAI: Self = Self::new(0b001_0011, 0b101, 0b010_0000);

    // loads, opcode 0000011
    pub const LB: Self = Self::new(0b000_0011, 0b000, 0);
    pub const LH: Self = Self::new(0b000_0011, 0b001, 0);
    pub const LW: Self = Self::new(0b000_0011, 0b010, 0);
    pub const LBU: Self = Self::new(0b000_0011, 0b100, 0);
    pub const LHU: Self = Self::new(0b000_0011, 0b101, 0);

    pub const JALR: Self = Self::new(0b110_0111, 0b000, 0);

    // conditional branches, opcode 1100011
    pub const BEQ: Self = Self::new(0b110_0011, 0b000, 0);
    pub const BNE: Self = Self::new(0b110_0011, 0b001, 0);
    pub const BLT: Self = Self::new(0b110_0011, 0b100, 0);
    pub const BGE: Self = Self::new(0b110_0011, 0b101, 0);
    pub const BLTU: Self = Self::new(0b110_0011, 0b110, 0);
    pub const BGEU: Self = Self::new(0b110_0011, 0b111, 0);

    // upper-immediate and jump
    pub const LUI: Self = Self::new(0b011_0111, 0, 0);
    pub const AUIPC: Self = Self::new(0b001_0111, 0, 0);
    pub const JAL: Self = Self::new(0b110_1111, 0, 0);

    // stores, opcode 0100011
    pub const SB: Self = Self::new(0b010_0011, 0b000, 0);
    pub const SH: Self = Self::new(0b010_0011, 0b001, 0);
    pub const SW: Self = Self::new(0b010_0011, 0b010, 0);
}

// --- Format families ---

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum InstrFormat {
    R,
    I,
    IShamt,
    B,
    U,
    J,
    S,
}

// --- Operands ---

// A branch or jump destination as written in the source. Symbolic targets
// are resolved to pc-relative offsets by the driver on pass 2.
#[derive(Debug, Clone, PartialEq)]
pub enum Target {
    Immediate(i64),
    Global(String),
    LocalForward(u32),
    LocalBackward(u32),
}

// --- Instructions ---

// One variant per format family; the family fixes the operand tuple, the
// OpcodeFields value selects the concrete mnemonic within it.
#[derive(Debug, Clone, PartialEq)]
pub enum Instruction {
    R {
        codes: OpcodeFields,
        rd: Register,
        rs1: Register,
        rs2: Register,
    },
    I {
        codes: OpcodeFields,
        rd: Register,
        rs1: Register,
        imm: i64,
    },
    IShamt {
        codes: OpcodeFields,
        rd: Register,
        rs1: Register,
        shamt: i64,
    },
    B {
        codes: OpcodeFields,
        rs1: Register,
        rs2: Register,
        target: Target,
    },
    U {
        codes: OpcodeFields,
        rd: Register,
        imm: i64,
    },
    J {
        codes: OpcodeFields,
        rd: Register,
        target: Target,
    },
    S {
        codes: OpcodeFields,
        rs1: Register,
        rs2: Register,
        imm: i64,
    },
}

// --- Assembly Line Structure ---

#[derive(Debug, Clone, PartialEq)]
pub enum Label {
    Global(String),
    Local(u32),
}

// Represents a single line of code, which can have a label, an instruction,
// or both.
#[derive(Debug, Clone, Default)]
pub struct SourceLine {
    pub line_number: usize,
    pub label: Option<Label>,
    pub instruction: Option<Instruction>,
}
