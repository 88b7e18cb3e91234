// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Names claimed in the current epoch.

use std::collections::HashSet;

use crate::models::RawFile;

/// Epoch-scoped set of claimed attachment names.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NameRegistry {
    names: HashSet<String>,
}

impl NameRegistry {
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Files whose names are not yet claimed, in selection order.
    ///
    /// A name repeated inside `selection` is kept only the first time. The
    /// registry itself is not modified; see [`NameRegistry::claim`].
    pub fn fresh(&self, selection: &[RawFile]) -> Vec<RawFile> {
        let mut seen = HashSet::new();
        let mut fresh = Vec::new();
        for file in selection {
            if !self.contains(&file.name) && seen.insert(file.name.as_str()) {
                fresh.push(file.clone());
            }
        }
        fresh
    }

    /// Claim names; claiming is idempotent.
    pub fn claim<'a>(&mut self, names: impl IntoIterator<Item = &'a str>) {
        self.names.extend(names.into_iter().map(str::to_owned));
    }

    /// Free a name so it can be selected again in this epoch.
    pub fn release(&mut self, name: &str) -> bool {
        self.names.remove(name)
    }

    pub fn clear(&mut self) {
        self.names.clear();
    }
}
