use std::collections::HashMap;
use std::hash::Hash;

/// Frequency counts that remember the order in which keys were first seen.
///
/// Two mode rules are offered: [`Tally::first_mode`] breaks ties by first
/// appearance, [`Tally::smallest_mode`] by the smallest key.
#[derive(Debug, Clone)]
pub struct Tally<K> {
    entries: Vec<(K, u64)>,
    index: HashMap<K, usize>,
    total: u64,
}

impl<K: Eq + Hash + Clone> Tally<K> {
    pub fn new() -> Self {
        Tally {
            entries: Vec::new(),
            index: HashMap::new(),
            total: 0,
        }
    }

    pub fn add(&mut self, key: K) {
        self.total += 1;
        if let Some(&i) = self.index.get(&key) {
            self.entries[i].1 += 1;
        } else {
            self.index.insert(key.clone(), self.entries.len());
            self.entries.push((key, 1));
        }
    }

    /// Number of values added.
    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.entries.iter().map(|(k, _)| k)
    }

    /// Most frequent key; on a tie the one seen first wins.
    pub fn first_mode(&self) -> Option<(&K, u64)> {
        let mut best: Option<(&K, u64)> = None;
        for (key, count) in &self.entries {
            if best.is_none_or(|(_, c)| *count > c) {
                best = Some((key, *count));
            }
        }
        best
    }

    /// All keys by descending count. Equal counts keep first-seen order.
    pub fn ranked(&self) -> Vec<(K, u64)> {
        let mut ranked = self.entries.clone();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked
    }
}

impl<K: Eq + Hash + Clone + Ord> Tally<K> {
    /// Most frequent key; on a tie the smallest key wins.
    pub fn smallest_mode(&self) -> Option<(&K, u64)> {
        let mut best: Option<(&K, u64)> = None;
        for (key, count) in &self.entries {
            let better = match best {
                None => true,
                Some((k, c)) => *count > c || (*count == c && key < k),
            };
            if better {
                best = Some((key, *count));
            }
        }
        best
    }
}

impl<K: Eq + Hash + Clone> Default for Tally<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Eq + Hash + Clone> FromIterator<K> for Tally<K> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut tally = Tally::new();
        for key in iter {
            tally.add(key);
        }
        tally
    }
}
