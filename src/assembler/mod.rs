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

pub mod encoder;
pub mod global_labels;
pub mod local_labels;
pub mod program_counter;

use std::io::Write;

use crate::ast::{Instruction, Label, SourceLine, Target};
use crate::dmp::DmpWriter;
use crate::errors::AssemblyError;
use global_labels::GlobalLabelTable;
use local_labels::LocalLabelTable;
use program_counter::ProgramCounter;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum State {
    Idle,
    Pass1,
    Pass2,
    Done,
    Failed,
}

/// Two-pass driver. Owns the program counter, both label tables and the
/// output sink for the duration of one compilation; independent
/// compilations each construct their own Assembler.
pub struct Assembler<W: Write> {
    pc: ProgramCounter,
    globals: GlobalLabelTable,
    locals: LocalLabelTable,
    out: DmpWriter<W>,
    state: State,
    // pc observed at each pass-1 instruction event, checked on pass 2
    pass1_pcs: Vec<u32>,
    instr_index: usize,
    warnings: Vec<String>,
}

impl<W: Write> Assembler<W> {
    pub fn new(out: DmpWriter<W>) -> Self {
        Self {
            pc: ProgramCounter::new(),
            globals: GlobalLabelTable::new(),
            locals: LocalLabelTable::new(),
            out,
            state: State::Idle,
            pass1_pcs: Vec::new(),
            instr_index: 0,
            warnings: Vec::new(),
        }
    }

    pub fn state(&self) -> State {
        self.state
    }

    /// Soft diagnostics collected during pass 1.
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Pass 1 defines symbols and sizes the program; pass 2 replays the
    /// same lines, resolves every reference and emits the DMP stream.
    pub fn assemble(&mut self, lines: &[SourceLine]) -> Result<(), AssemblyError> {
        let result = self.run(lines);
        if result.is_err() {
            self.state = State::Failed;
        }
        result
    }

    fn run(&mut self, lines: &[SourceLine]) -> Result<(), AssemblyError> {
        self.globals.clear();
        self.locals.clear();
        self.pass1_pcs.clear();

        self.begin_pass(State::Pass1)?;
        self.replay(lines)?;
        self.begin_pass(State::Pass2)?;
        self.replay(lines)?;
        self.finish()
    }

    fn begin_pass(&mut self, pass: State) -> Result<(), AssemblyError> {
        self.pc.reset();
        self.instr_index = 0;
        self.state = pass;
        let number = if pass == State::Pass1 { 1 } else { 2 };
        self.out.pass_banner(number)?;
        Ok(())
    }

    // One traversal of the parsed source. Label events for a line always
    // precede its instruction event, so a same-line local definition is
    // visible to a backward reference at the same pc.
    fn replay(&mut self, lines: &[SourceLine]) -> Result<(), AssemblyError> {
        for line in lines {
            match &line.label {
                Some(Label::Global(name)) => self.define_global_label(name, line.line_number)?,
                Some(Label::Local(name)) => self.define_local_label(*name, line.line_number)?,
                None => {}
            }
            if let Some(instruction) = &line.instruction {
                self.emit_instr(instruction, line.line_number)?;
            }
        }
        Ok(())
    }

    fn finish(&mut self) -> Result<(), AssemblyError> {
        self.globals.clear();
        self.locals.clear();
        self.out.flush()?;
        self.state = State::Done;
        Ok(())
    }

    // ------------- parser-facing event surface -------------

    /// Definition of `name:` at the current pc. Duplicates are a soft
    /// diagnostic; the later definition wins.
    pub fn define_global_label(&mut self, name: &str, line: usize) -> Result<(), AssemblyError> {
        let pc = self.pc.current();
        match self.state {
            State::Pass1 => {
                if let Some(previous) = self.globals.add(name, pc) {
                    self.warnings.push(format!(
                        "warning: duplicate label \"{}\" on line {} (previous definition at 0x{:08x})",
                        name, line, previous
                    ));
                }
            }
            State::Pass2 => self.out.global_label(name, pc, line)?,
            _ => {}
        }
        Ok(())
    }

    /// Definition of `name:` (numeric) at the current pc.
    pub fn define_local_label(&mut self, name: u32, line: usize) -> Result<(), AssemblyError> {
        let pc = self.pc.current();
        match self.state {
            State::Pass1 => self.locals.add(name, pc),
            State::Pass2 => self.out.local_label(name, pc, line)?,
            _ => {}
        }
        Ok(())
    }

    /// Address of a named target. Pass 1 answers 0 for names not yet
    /// defined; pass 2 fails on them.
    pub fn resolve_global(&self, name: &str, line: usize) -> Result<u32, AssemblyError> {
        match self.globals.lookup(name) {
            Some(addr) => Ok(addr),
            None if self.state == State::Pass1 => Ok(0),
            None => Err(AssemblyError::UnknownGlobalLabel {
                line,
                name: name.to_string(),
            }),
        }
    }

    /// Address of a numeric target; positive `n` selects the next
    /// definition after `pc`, negative `n` the last one at or before it.
    pub fn resolve_local(&self, n: i64, pc: u32, line: usize) -> Result<u32, AssemblyError> {
        match self.lookup_local(n, pc) {
            Some(addr) => Ok(addr),
            None if self.state == State::Pass1 => Ok(0),
            None => Err(AssemblyError::UnknownLocalLabel {
                line,
                name: n.unsigned_abs() as u32,
                direction: if n < 0 { 'b' } else { 'f' },
            }),
        }
    }

    /// Encode one instruction at the current pc. Pass 1 discards the word;
    /// pass 2 checks the pc against the pass-1 trace and writes the DMP
    /// line. The pc only advances after a successful encode.
    pub fn emit_instr(
        &mut self,
        instruction: &Instruction,
        line: usize,
    ) -> Result<(), AssemblyError> {
        let word = match instruction {
            Instruction::R { codes, rd, rs1, rs2 } => encoder::encode_r(*codes, *rd, *rs1, *rs2),
            Instruction::I { codes, rd, rs1, imm } => {
                encoder::encode_i(*codes, *rd, *rs1, *imm, line)?
            }
            Instruction::IShamt {
                codes,
                rd,
                rs1,
                shamt,
            } => encoder::encode_i_shamt(*codes, *rd, *rs1, *shamt, line)?,
            Instruction::B {
                codes,
                rs1,
                rs2,
                target,
            } => {
                let offset = self.target_offset(target, line)?;
                encoder::encode_b(*codes, *rs1, *rs2, offset, line)?
            }
            Instruction::U { codes, rd, imm } => encoder::encode_u(*codes, *rd, *imm, line)?,
            Instruction::J { codes, rd, target } => {
                let offset = self.target_offset(target, line)?;
                encoder::encode_j(*codes, *rd, offset, line)?
            }
            Instruction::S {
                codes,
                rs1,
                rs2,
                imm,
            } => encoder::encode_s(*codes, *rs1, *rs2, *imm, line)?,
        };

        let pc = self.pc.current();
        match self.state {
            State::Pass1 => self.pass1_pcs.push(pc),
            State::Pass2 => {
                let expected = self.pass1_pcs.get(self.instr_index).copied();
                if expected != Some(pc) {
                    return Err(AssemblyError::PassDivergence {
                        index: self.instr_index,
                        pass1_pc: expected.unwrap_or(0),
                        pass2_pc: pc,
                    });
                }
                self.out.instruction(word, pc, line)?;
            }
            _ => {}
        }
        self.instr_index += 1;
        self.pc.advance_word();
        Ok(())
    }

    // ------------- target resolution -------------

    fn lookup_local(&self, n: i64, pc: u32) -> Option<u32> {
        if n < 0 {
            self.locals.lookup_back(n.unsigned_abs() as u32, pc)
        } else {
            self.locals.lookup_forward(n as u32, pc)
        }
    }

    // pc-relative operand value for a branch or jump target. Unresolved
    // forward references size with a zero offset on pass 1 so the dry
    // encode cannot fail on a reference pass 2 will resolve.
    fn target_offset(&mut self, target: &Target, line: usize) -> Result<i64, AssemblyError> {
        let pc = self.pc.current();
        match target {
            Target::Immediate(value) => Ok(*value),
            Target::Global(name) => {
                if self.state == State::Pass1 && !self.globals.exists(name) {
                    return Ok(0);
                }
                let addr = self.resolve_global(name, line)?;
                let offset = addr as i64 - pc as i64;
                if self.state == State::Pass2 {
                    self.out.global_identifier(name, pc, offset, addr, line)?;
                }
                Ok(offset)
            }
            Target::LocalForward(name) | Target::LocalBackward(name) => {
                let signed = match target {
                    Target::LocalBackward(_) => -(*name as i64),
                    _ => *name as i64,
                };
                if self.state == State::Pass1 && self.lookup_local(signed, pc).is_none() {
                    return Ok(0);
                }
                let addr = self.resolve_local(signed, pc, line)?;
                let offset = addr as i64 - pc as i64;
                if self.state == State::Pass2 {
                    self.out.local_identifier(signed, pc, offset, addr, line)?;
                }
                Ok(offset)
            }
        }
    }
}
