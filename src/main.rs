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

use anyhow::{Context, Result};
use clap::Parser as clap_parser;
use rasm::assemble;
use std::fs::{self, File};
use std::io::{self, BufWriter, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(clap_parser)]
#[clap(version, about = "Two-pass RV32I assembler emitting annotated DMP output")]
struct Opts {
    /// Source file, or "-" to read from standard input
    source: Option<PathBuf>,
    /// Output file (defaults to standard output)
    #[clap(short, long)]
    output: Option<PathBuf>,
    /// Append a bit-field diagram after each encoded instruction
    #[clap(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let opts = Opts::parse();
    match run(&opts) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{:#}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(opts: &Opts) -> Result<()> {
    let source = read_source(opts)?;

    let mut out: Box<dyn Write> = match &opts.output {
        Some(path) => Box::new(BufWriter::new(File::create(path).with_context(|| {
            format!("Failed to create output file: {}", path.display())
        })?)),
        None => Box::new(io::stdout().lock()),
    };

    writeln!(out, "# *** RASM: RV32I assembler v{}", env!("CARGO_PKG_VERSION"))?;
    assemble(&source, &mut out, opts.verbose)?;
    out.flush()?;

    Ok(())
}

fn read_source(opts: &Opts) -> Result<String> {
    match &opts.source {
        Some(path) if path.as_os_str() != "-" => fs::read_to_string(path)
            .with_context(|| format!("Failed to read input file: {}", path.display())),
        _ => {
            let mut source = String::new();
            io::stdin()
                .read_to_string(&mut source)
                .context("Failed to read from standard input")?;
            Ok(source)
        }
    }
}
