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

pub mod assembler;
pub mod ast;
pub mod dmp;
pub mod errors;
pub mod parser;

use std::io::Write;

use assembler::Assembler;
use dmp::DmpWriter;
use errors::AssemblyError;

extern crate pest;
extern crate pest_derive;

/// Assemble RV32I source text into the annotated DMP stream on `out`.
/// With `verbose` set, every instruction row is followed by its bit-field
/// diagram. Soft diagnostics go to stderr; the first hard error aborts.
pub fn assemble<W: Write>(source: &str, out: W, verbose: bool) -> Result<(), AssemblyError> {
    let lines = parser::parse_source(source)?;

    let mut assembler = Assembler::new(DmpWriter::new(out, verbose));
    let result = assembler.assemble(&lines);

    // warnings collected before a later hard error still reach stderr
    for warning in assembler.warnings() {
        eprintln!("{}", warning);
    }

    result
}
