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

use super::AstBuilder;
use crate::ast::{Register, Target};
use crate::errors::AssemblyError;
use crate::parser::Rule;

impl<'a> AstBuilder<'a> {
    pub(super) fn next_mnemonic(&mut self) -> &'a str {
        self.pairs.next().unwrap().as_str()
    }

    pub(super) fn next_register(&mut self) -> Result<Register, AssemblyError> {
        let text = self.pairs.next().unwrap().as_str();
        Register::from_name(text).ok_or_else(|| AssemblyError::RegisterOutOfRange {
            line: self.line_number,
            name: text.to_string(),
        })
    }

    pub(super) fn next_immediate(&mut self) -> Result<i64, AssemblyError> {
        let text = self.pairs.next().unwrap().as_str();
        parse_immediate(text).ok_or(AssemblyError::SyntaxError {
            line: self.line_number,
        })
    }

    pub(super) fn next_target(&mut self) -> Result<Target, AssemblyError> {
        let pair = self.pairs.next().unwrap().into_inner().next().unwrap();
        match pair.as_rule() {
            Rule::local_ref => {
                let text = pair.as_str();
                let (digits, direction) = text.split_at(text.len() - 1);
                let name: u32 = digits
                    .parse()
                    .ok()
                    .filter(|&n| n >= 1)
                    .ok_or(AssemblyError::SyntaxError {
                        line: self.line_number,
                    })?;
                if direction.eq_ignore_ascii_case("f") {
                    Ok(Target::LocalForward(name))
                } else {
                    Ok(Target::LocalBackward(name))
                }
            }
            Rule::immediate => {
                let value =
                    parse_immediate(pair.as_str()).ok_or(AssemblyError::SyntaxError {
                        line: self.line_number,
                    })?;
                Ok(Target::Immediate(value))
            }
            Rule::identifier => Ok(Target::Global(pair.as_str().to_string())),
            _ => unreachable!("unknown target rule: {:?}", pair.as_rule()),
        }
    }
}

// Decimal or 0x-prefixed hex literal with an optional leading minus.
fn parse_immediate(text: &str) -> Option<i64> {
    let (negative, body) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text),
    };
    let magnitude = if let Some(hex) = body
        .strip_prefix("0x")
        .or_else(|| body.strip_prefix("0X"))
    {
        i64::from_str_radix(hex, 16).ok()?
    } else {
        body.parse::<i64>().ok()?
    };
    Some(if negative { -magnitude } else { magnitude })
}
