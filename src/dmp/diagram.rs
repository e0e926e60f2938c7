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

//! Bit-field box diagrams for encoded words, one table shape per format
//! family. Debug aid behind the verbose flag; never part of the binary
//! image.

use crate::ast::InstrFormat;

fn bits(word: u32, hi: u32, lo: u32) -> u32 {
    (word >> lo) & ((1u32 << (hi - lo + 1)) - 1)
}

fn bin(value: u32, width: u32) -> String {
    (0..width)
        .rev()
        .map(|b| if value >> b & 1 == 1 { '1' } else { '0' })
        .collect()
}

fn xreg(word: u32, hi: u32, lo: u32) -> String {
    format!("x{:02}", bits(word, hi, lo))
}

/// Classify a word by its major opcode (and funct3 for the shared
/// immediate-ALU opcode). Unknown opcodes have no diagram.
pub fn format_of(word: u32) -> Option<InstrFormat> {
    let opcode = bits(word, 6, 0);
    let funct3 = bits(word, 14, 12);
    match opcode {
        0b011_0011 => Some(InstrFormat::R),
        0b001_0011 => match funct3 {
            0b001 | 0b101 => Some(InstrFormat::IShamt),
            _ => Some(InstrFormat::I),
        },
        0b110_0111 | 0b000_0011 => Some(InstrFormat::I),
        0b110_0011 => Some(InstrFormat::B),
        0b011_0111 | 0b001_0111 => Some(InstrFormat::U),
        0b110_1111 => Some(InstrFormat::J),
        0b010_0011 => Some(InstrFormat::S),
        _ => None,
    }
}

pub fn render(word: u32) -> Option<String> {
    let diagram = match format_of(word)? {
        InstrFormat::R => table(
            &["funct7", "rs2", "rs1", "funct3", "rd", "opcode"],
            &[
                bin(bits(word, 31, 25), 7),
                xreg(word, 24, 20),
                xreg(word, 19, 15),
                bin(bits(word, 14, 12), 3),
                xreg(word, 11, 7),
                bin(bits(word, 6, 0), 7),
            ],
        ),
        InstrFormat::I => table(
            &["immi[11:0]", "rs1", "funct3", "rd", "opcode"],
            &[
                format!("0x{:03x}", bits(word, 31, 20)),
                xreg(word, 19, 15),
                bin(bits(word, 14, 12), 3),
                xreg(word, 11, 7),
                bin(bits(word, 6, 0), 7),
            ],
        ),
        InstrFormat::IShamt => table(
            &["funct7", "shamt", "rs1", "funct3", "rd", "opcode"],
            &[
                bin(bits(word, 31, 25), 7),
                format!("0x{:02x}", bits(word, 24, 20)),
                xreg(word, 19, 15),
                bin(bits(word, 14, 12), 3),
                xreg(word, 11, 7),
                bin(bits(word, 6, 0), 7),
            ],
        ),
        InstrFormat::B => table(
            &["offs[12|10:5]", "rs2", "rs1", "funct3", "offs[4:1|11]", "opcode"],
            &[
                format!("{} {}", bin(bits(word, 31, 31), 1), bin(bits(word, 30, 25), 6)),
                xreg(word, 24, 20),
                xreg(word, 19, 15),
                bin(bits(word, 14, 12), 3),
                format!("{} {}", bin(bits(word, 11, 8), 4), bin(bits(word, 7, 7), 1)),
                bin(bits(word, 6, 0), 7),
            ],
        ),
        InstrFormat::U => table(
            &["immi[31:12]", "rd", "opcode"],
            &[
                bin(bits(word, 31, 12), 20),
                xreg(word, 11, 7),
                bin(bits(word, 6, 0), 7),
            ],
        ),
        InstrFormat::J => table(
            &["immi[20|10:1|11|19:12]", "rd", "opcode"],
            &[
                format!(
                    "{} {} {} {}",
                    bin(bits(word, 31, 31), 1),
                    bin(bits(word, 30, 21), 10),
                    bin(bits(word, 20, 20), 1),
                    bin(bits(word, 19, 12), 8)
                ),
                xreg(word, 11, 7),
                bin(bits(word, 6, 0), 7),
            ],
        ),
        InstrFormat::S => table(
            &["immi[11:5]", "rs2", "rs1", "funct3", "immi[4:0]", "opcode"],
            &[
                bin(bits(word, 31, 25), 7),
                xreg(word, 24, 20),
                xreg(word, 19, 15),
                bin(bits(word, 14, 12), 3),
                bin(bits(word, 11, 7), 5),
                bin(bits(word, 6, 0), 7),
            ],
        ),
    };
    Some(diagram)
}

// Three-row box table: rule, headers, rule, values, rule.
fn table(headers: &[&str], values: &[String]) -> String {
    let widths: Vec<usize> = headers
        .iter()
        .zip(values)
        .map(|(header, value)| header.len().max(value.len()))
        .collect();

    let mut rule = String::from("+");
    for width in &widths {
        rule.push_str(&"-".repeat(width + 2));
        rule.push('+');
    }
    rule.push('\n');

    let row = |cells: Vec<&str>| {
        let mut row = String::from("|");
        for (cell, width) in cells.iter().zip(widths.iter().copied()) {
            row.push_str(&format!(" {:>width$} |", cell, width = width));
        }
        row.push('\n');
        row
    };

    let mut out = String::new();
    out.push_str(&rule);
    out.push_str(&row(headers.to_vec()));
    out.push_str(&rule);
    out.push_str(&row(values.iter().map(String::as_str).collect()));
    out.push_str(&rule);
    out
}
