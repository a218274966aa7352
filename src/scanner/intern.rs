use crate::vm::Real;

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

/// A value that can be stored in an [`Interner`] and deduplicated by content.
pub trait Internable: Clone + Debug {
    type Key: Hash + Eq + Clone + Debug;

    fn key(&self) -> Self::Key;
}

impl Internable for String {
    type Key = String;

    fn key(&self) -> String {
        self.clone()
    }
}

impl Internable for Real {
    type Key = u64;

    fn key(&self) -> u64 {
        self.to_bits()
    }
}

/// Side table handing out a stable index per distinct value.
#[derive(Debug, Clone)]
pub struct Interner<T: Internable> {
    values: Vec<T>,
    lookup: HashMap<T::Key, usize>,
}

impl<T: Internable> Interner<T> {
    pub fn new() -> Interner<T> {
        Interner {
            values: vec![],
            lookup: HashMap::new(),
        }
    }

    pub fn insert(&mut self, value: T) -> usize {
        let values = &mut self.values;

        *self.lookup.entry(value.key()).or_insert_with(|| {
            values.push(value);
            values.len() - 1
        })
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.values.get(index)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn clear(&mut self) {
        self.values.clear();
        self.lookup.clear();
    }
}

impl<T: Internable> Default for Interner<T> {
    fn default() -> Self {
        Interner::new()
    }
}

pub type StringTable = Interner<String>;
pub type RealTable = Interner<Real>;
