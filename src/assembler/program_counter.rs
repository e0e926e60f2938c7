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

/// Byte offset of the next instruction to be emitted. Reset to zero at the
/// start of every pass so both passes observe the same address sequence.
#[derive(Debug, Default)]
pub struct ProgramCounter {
    value: u32,
}

impl ProgramCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> u32 {
        self.value
    }

    /// Advance past one full RV32I instruction (4 bytes).
    pub fn advance_word(&mut self) -> u32 {
        self.value += 4;
        self.value
    }

    /// Advance past one half word (2 bytes). Reserved for compressed
    /// instruction support; no current instruction uses it.
    pub fn advance_half(&mut self) -> u32 {
        self.value += 2;
        self.value
    }

    pub fn reset(&mut self) {
        self.value = 0;
    }
}
