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

pub mod diagram;

use std::io::{self, Write};

/// Renders the DMP stream: one `bb bb bb bb # pc line` row per emitted
/// instruction plus `#` comment annotations. Everything that is not an
/// instruction row starts with `#`, so a post-processor can rebuild the
/// binary image from the first four tokens of the remaining lines.
pub struct DmpWriter<W: Write> {
    out: W,
    verbose: bool,
}

impl<W: Write> DmpWriter<W> {
    pub fn new(out: W, verbose: bool) -> Self {
        Self { out, verbose }
    }

    pub fn get_ref(&self) -> &W {
        &self.out
    }

    pub fn pass_banner(&mut self, pass: u32) -> io::Result<()> {
        writeln!(self.out, "# *** RASM: pass_number = {}", pass)
    }

    /// Instruction bytes in little-endian order, then the pc it was placed
    /// at and the 1-based source line.
    pub fn instruction(&mut self, word: u32, pc: u32, line: usize) -> io::Result<()> {
        let [b0, b1, b2, b3] = word.to_le_bytes();
        writeln!(
            self.out,
            "{:02x} {:02x} {:02x} {:02x} #\t {:08x}\tline {}",
            b0, b1, b2, b3, pc, line
        )?;
        if self.verbose {
            if let Some(table) = diagram::render(word) {
                for diagram_line in table.lines() {
                    writeln!(self.out, "# {}", diagram_line)?;
                }
            }
        }
        Ok(())
    }

    pub fn global_label(&mut self, name: &str, pc: u32, line: usize) -> io::Result<()> {
        writeln!(
            self.out,
            "# label_global \"{}\"\tpc = 0x{:08x}\tline {}",
            name, pc, line
        )
    }

    pub fn local_label(&mut self, name: u32, pc: u32, line: usize) -> io::Result<()> {
        writeln!(
            self.out,
            "# label_local \"{}\"\tpc = 0x{:08x}\tline {}",
            name, pc, line
        )
    }

    pub fn global_identifier(
        &mut self,
        name: &str,
        pc: u32,
        offset: i64,
        addr: u32,
        line: usize,
    ) -> io::Result<()> {
        writeln!(
            self.out,
            "# identifier \"{}\" at 0x{:08x} offs {} absaddr 0x{:08x}\tline {}",
            name, pc, offset, addr, line
        )
    }

    pub fn local_identifier(
        &mut self,
        name: i64,
        pc: u32,
        offset: i64,
        addr: u32,
        line: usize,
    ) -> io::Result<()> {
        writeln!(
            self.out,
            "# local identifier \"{}\" at 0x{:08x} offs {} absaddr 0x{:08x}\tline {}",
            name, pc, offset, addr, line
        )
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}
