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

use std::collections::HashMap;

/// Named labels with program-wide scope, populated on pass 1 and read-only
/// on pass 2.
#[derive(Debug, Default)]
pub struct GlobalLabelTable {
    map: HashMap<String, u32>,
}

impl GlobalLabelTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `name` at `addr`. Returns the displaced address when the
    /// name was already defined; the new definition wins.
    pub fn add(&mut self, name: &str, addr: u32) -> Option<u32> {
        self.map.insert(name.to_string(), addr)
    }

    pub fn exists(&self, name: &str) -> bool {
        self.map.contains_key(name)
    }

    pub fn lookup(&self, name: &str) -> Option<u32> {
        self.map.get(name).copied()
    }

    pub fn clear(&mut self) {
        self.map.clear();
    }
}
