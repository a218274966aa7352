use std::collections::HashMap;
use std::fmt;

use itertools::Itertools;

pub type Real = f64;
pub type Handle = u32;

/// Handle issued to the first grouping literal an evaluator materializes.
pub const INITIAL_HANDLE: Handle = 0x3E5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flag {
    Value,
    Id,
    List,
}

impl fmt::Display for Flag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Flag::Value => write!(f, "value"),
            Flag::Id => write!(f, "id"),
            Flag::List => write!(f, "list"),
        }
    }
}

/// One operand stack slot. `index` addresses the variable table for `Id`
/// slots and the grouping cache for `List` slots.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StackValue {
    pub value: Real,
    pub index: Option<usize>,
    pub flag: Flag,
}

impl StackValue {
    pub fn value(value: Real) -> StackValue {
        StackValue {
            value,
            index: None,
            flag: Flag::Value,
        }
    }

    pub fn id(value: Real, index: usize) -> StackValue {
        StackValue {
            value,
            index: Some(index),
            flag: Flag::Id,
        }
    }

    pub fn list(handle: Handle) -> StackValue {
        StackValue {
            value: Real::from(handle),
            index: Some(handle as usize),
            flag: Flag::List,
        }
    }

    pub fn is_value(&self) -> bool {
        self.flag == Flag::Value
    }

    pub fn is_id(&self) -> bool {
        self.flag == Flag::Id && self.index.is_some()
    }

    pub fn is_list(&self) -> bool {
        self.flag == Flag::List
    }

    pub fn integer(&self) -> i32 {
        self.value as i32
    }
}

impl fmt::Display for StackValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.index {
            Some(index) => write!(f, "{{ c:{:#x}, f:{}, v:{} }}", index, self.flag, self.value),
            None => write!(f, "{{ c:none, f:{}, v:{} }}", self.flag, self.value),
        }
    }
}

/// Variables by name. A name receives a stable index the first time it is
/// referenced; identifier slots carry that index so assignment can write
/// through without a second lookup.
#[derive(Debug, Clone, Default)]
pub struct VariableTable {
    store: HashMap<String, usize>,
    slots: Vec<StackValue>,
}

impl VariableTable {
    pub fn new() -> VariableTable {
        VariableTable::default()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Looks `name` up, inserting a zero-valued slot when it is missing.
    pub fn define(&mut self, name: &str) -> usize {
        if let Some(index) = self.store.get(name) {
            return *index;
        }

        let index = self.slots.len();
        self.slots.push(StackValue::value(0.0));
        self.store.insert(name.to_string(), index);
        index
    }

    pub fn resolve(&self, name: &str) -> Option<usize> {
        self.store.get(name).copied()
    }

    pub fn get(&self, index: usize) -> Option<&StackValue> {
        self.slots.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut StackValue> {
        self.slots.get_mut(index)
    }
}

impl fmt::Display for VariableTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{{}}}",
            self.store
                .iter()
                .sorted_by_key(|(_, index)| **index)
                .map(|(name, index)| format!("{} -> {}", name, self.slots[*index].value))
                .join(", ")
        )
    }
}

/// Materialized grouping literals by handle.
///
/// Elements are stored in the order they were popped off the operand stack,
/// which is the reverse of their source order.
#[derive(Debug, Clone)]
pub struct Groups {
    store: HashMap<Handle, Vec<StackValue>>,
    next: Handle,
}

impl Groups {
    pub fn new() -> Groups {
        Groups {
            store: HashMap::new(),
            next: INITIAL_HANDLE,
        }
    }

    pub fn insert(&mut self, elements: Vec<StackValue>) -> Handle {
        let handle = self.next;
        self.store.insert(handle, elements);
        self.next = self.next.wrapping_add(1);
        handle
    }

    pub fn get(&self, handle: Handle) -> Option<&[StackValue]> {
        self.store.get(&handle).map(Vec::as_slice)
    }

    /// Element values in source order.
    pub fn values(&self, handle: Handle) -> Vec<Real> {
        self.get(handle)
            .map(|elements| elements.iter().rev().map(|slot| slot.value).collect())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }
}

impl Default for Groups {
    fn default() -> Self {
        Groups::new()
    }
}
