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

use std::collections::{BTreeSet, HashMap};
use std::ops::Bound;

/// Numeric local labels. The same name may be defined at many addresses;
/// references select the nearest definition before or after the querying
/// program counter.
#[derive(Debug, Default)]
pub struct LocalLabelTable {
    map: HashMap<u32, BTreeSet<u32>>,
}

impl LocalLabelTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Idempotent on duplicate (name, addr) pairs.
    pub fn add(&mut self, name: u32, addr: u32) {
        self.map.entry(name).or_default().insert(addr);
    }

    /// Largest recorded address `a` with `a <= pc`. Inclusive, so a label
    /// defined on the same line as the referencing instruction resolves to
    /// itself.
    pub fn lookup_back(&self, name: u32, pc: u32) -> Option<u32> {
        self.map.get(&name)?.range(..=pc).next_back().copied()
    }

    /// Smallest recorded address `a` with `a > pc`.
    pub fn lookup_forward(&self, name: u32, pc: u32) -> Option<u32> {
        self.map
            .get(&name)?
            .range((Bound::Excluded(pc), Bound::Unbounded))
            .next()
            .copied()
    }

    pub fn clear(&mut self) {
        self.map.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_unknown_name() {
        let table = LocalLabelTable::new();
        assert_eq!(table.lookup_back(1, 100), None);
        assert_eq!(table.lookup_forward(1, 0), None);
    }

    #[test]
    fn test_nearest_match_selection() {
        let mut table = LocalLabelTable::new();
        for addr in [0, 8, 24] {
            table.add(1, addr);
        }
        table.add(2, 16);

        assert_eq!(table.lookup_back(1, 12), Some(8));
        assert_eq!(table.lookup_back(1, 100), Some(24));
        assert_eq!(table.lookup_forward(1, 0), Some(8));
        assert_eq!(table.lookup_forward(1, 24), None);
        assert_eq!(table.lookup_back(2, 12), None);
        assert_eq!(table.lookup_forward(2, 12), Some(16));
    }

    #[test]
    fn test_backward_is_inclusive_forward_is_strict() {
        let mut table = LocalLabelTable::new();
        table.add(3, 8);
        assert_eq!(table.lookup_back(3, 8), Some(8));
        assert_eq!(table.lookup_forward(3, 8), None);
    }

    #[test]
    fn test_duplicate_pairs_are_idempotent() {
        let mut table = LocalLabelTable::new();
        table.add(1, 4);
        table.add(1, 4);
        assert_eq!(table.lookup_back(1, 4), Some(4));
        assert_eq!(table.lookup_forward(1, 0), Some(4));
        assert_eq!(table.lookup_forward(1, 4), None);
    }

    #[test]
    fn test_monotonicity_over_every_query_point() {
        let mut table = LocalLabelTable::new();
        let defined = [4u32, 12, 20, 36];
        for addr in defined {
            table.add(7, addr);
        }
        for q in 0..48 {
            let expected_back = defined.iter().copied().filter(|&a| a <= q).max();
            let expected_fwd = defined.iter().copied().filter(|&a| a > q).min();
            assert_eq!(table.lookup_back(7, q), expected_back);
            assert_eq!(table.lookup_forward(7, q), expected_fwd);
        }
    }
}
