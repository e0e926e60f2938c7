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

mod ast_builder;

use crate::ast::{Label, SourceLine};
use crate::errors::AssemblyError;
use ast_builder::AstBuilder;
use pest::Parser;
use pest::error::LineColLocation;
use pest::iterators::Pair;
use pest_derive::Parser;

// Derive the parser from our grammar file.
#[derive(Parser)]
#[grammar = "./grammar.pest"]
pub struct RasmParser;

// Main parsing function that takes the entire source code string.
pub fn parse_source(source: &str) -> Result<Vec<SourceLine>, AssemblyError> {
    let pairs = RasmParser::parse(Rule::program, source).map_err(|err| {
        let line = match err.line_col {
            LineColLocation::Pos((line, _)) => line,
            LineColLocation::Span((line, _), _) => line,
        };
        AssemblyError::SyntaxError { line }
    })?;

    let mut lines = Vec::new();

    for line_pair in pairs
        .flatten()
        .filter(|p| p.as_rule() == Rule::line_content)
    {
        let mut source_line = SourceLine::default();

        for pair in line_pair.into_inner() {
            source_line.line_number = pair.as_span().start_pos().line_col().0;
            match pair.as_rule() {
                Rule::label => {
                    source_line.label = Some(build_label(pair)?);
                }
                Rule::instruction => {
                    let builder = AstBuilder::new(pair.into_inner().next().unwrap());
                    source_line.instruction = Some(builder.build_instruction()?);
                }
                _ => {}
            }
        }

        // Only keep non-empty lines
        if source_line.label.is_some() || source_line.instruction.is_some() {
            lines.push(source_line);
        }
    }

    Ok(lines)
}

fn build_label(pair: Pair<Rule>) -> Result<Label, AssemblyError> {
    let line = pair.as_span().start_pos().line_col().0;
    let inner = pair.into_inner().next().unwrap();
    match inner.as_rule() {
        Rule::global_label => {
            let name = inner.into_inner().next().unwrap().as_str().to_string();
            Ok(Label::Global(name))
        }
        Rule::local_label => {
            let digits = inner.into_inner().next().unwrap().as_str();
            // local label names start at 1
            match digits.parse::<u32>() {
                Ok(name) if name >= 1 => Ok(Label::Local(name)),
                _ => Err(AssemblyError::SyntaxError { line }),
            }
        }
        _ => unreachable!("unknown label rule: {:?}", inner.as_rule()),
    }
}

// ------------- unit tests -------------
