//! The token map and short-name generation.
//!
//! Keys keep their selector sigil (`.classA`, `#header`) so one map serves
//! both the stylesheet and the markup rewriters. Insertion order is the
//! extraction order, which makes generated names stable across runs on the
//! same stylesheet.

use std::collections::HashSet;

/// An ordered mapping from sigil-prefixed selector names to replacement
/// tokens.
#[derive(Debug, Clone, Default)]
pub struct TokenMap {
    entries: Vec<(String, String)>,
}

impl TokenMap {
    pub fn new() -> Self {
        TokenMap {
            entries: Vec::new(),
        }
    }

    /// Inserts or overwrites the token for a key, keeping first-insert order.
    pub fn insert(&mut self, key: String, token: String) {
        match self.entries.iter_mut().find(|(k, _)| k == &key) {
            Some(slot) => slot.1 = token,
            None => self.entries.push((key, token)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, token)| token.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(key, token)| (key.as_str(), token.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for TokenMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = TokenMap::new();
        for (key, token) in iter {
            map.insert(key.into(), token.into());
        }
        map
    }
}

/// Produces short alphabetic names (`a` .. `z`, `aa`, `ab`, ..) while
/// skipping anything reserved.
///
/// Reserving the original class and id names keeps a generated token from
/// colliding with a name that is still waiting to be rewritten.
pub struct TokenGenerator {
    next: usize,
    reserved: HashSet<String>,
}

impl TokenGenerator {
    pub fn new() -> Self {
        TokenGenerator {
            next: 0,
            reserved: HashSet::new(),
        }
    }

    pub fn reserving<I>(names: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        TokenGenerator {
            next: 0,
            reserved: names.into_iter().collect(),
        }
    }

    pub fn next_token(&mut self) -> String {
        loop {
            let candidate = short_name(self.next);
            self.next += 1;
            if !self.reserved.contains(&candidate) {
                return candidate;
            }
        }
    }
}

/// Bijective base-26 rendering of an index: 0 is "a", 25 is "z", 26 is "aa".
fn short_name(mut index: usize) -> String {
    let mut name = String::new();
    loop {
        name.push((b'a' + (index % 26) as u8) as char);
        index /= 26;
        if index == 0 {
            break;
        }
        index -= 1;
    }
    name.chars().rev().collect()
}

/// Builds the token map for extracted names, classes before ids, in
/// extraction order.
pub fn assign_tokens(classes: &[String], ids: &[String]) -> TokenMap {
    let mut generator = TokenGenerator::reserving(classes.iter().chain(ids.iter()).cloned());
    let mut map = TokenMap::new();
    for name in classes {
        map.insert(format!(".{}", name), generator.next_token());
    }
    for name in ids {
        map.insert(format!("#{}", name), generator.next_token());
    }
    map
}
