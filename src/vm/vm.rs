use crate::builtin::{Apply, MathFn};
use crate::symbol::Symbol;
use crate::vm::error::{Result, RuntimeError};
use crate::vm::value::{Groups, Handle, Real, StackValue, VariableTable};

use std::f64::consts::{E, PI};

use tracing::{debug, trace};

/// Stack machine executing postfix programs.
///
/// Variables and materialized groupings live as long as the evaluator does,
/// so the same program can be executed repeatedly with different bindings.
#[derive(Debug, Default)]
pub struct Evaluator {
    stack: Vec<StackValue>,
    table: VariableTable,
    groups: Groups,
}

impl Evaluator {
    pub fn new() -> Evaluator {
        Evaluator::default()
    }

    /// Executes `program` and returns the value left on top of the stack.
    ///
    /// Never fails: any fault resets the operand stack and yields `0`.
    pub fn execute(&mut self, program: &[Symbol]) -> Real {
        self.try_execute(program).unwrap_or(0.0)
    }

    /// Like [`Evaluator::execute`] but reports the fault. The operand stack
    /// is reset either way.
    pub fn try_execute(&mut self, program: &[Symbol]) -> Result<Real> {
        self.stack.clear();

        if let Err(err) = program.iter().try_for_each(|symbol| self.eval(symbol)) {
            debug!(error = %err, "evaluation fault, operand stack reset");
            self.stack.clear();
            return Err(err);
        }

        Ok(self.stack.last().map_or(0.0, |top| top.value))
    }

    fn eval(&mut self, symbol: &Symbol) -> Result<()> {
        trace!(symbol = %symbol, depth = self.stack.len(), "eval");

        match symbol {
            Symbol::Numerical(value) => self.push(*value),
            Symbol::Identifier(name) => self.store(name),
            Symbol::Pi => self.push(PI),
            Symbol::E => self.push(E),
            Symbol::Add => self.bin_op("add", |a, b| a + b)?,
            Symbol::Sub => self.bin_op("sub", |a, b| a - b)?,
            Symbol::Mul => self.bin_op("mul", |a, b| a * b)?,
            Symbol::Div => self.bin_op("div", div)?,
            Symbol::Mod => self.bin_op("mod", |a, b| a % b)?,
            Symbol::Pow => self.bin_op("pow", Real::powf)?,
            Symbol::Neg => self.neg()?,
            Symbol::Assignment => self.assign()?,
            Symbol::Grouping => self.group()?,
            Symbol::Math(function) => self.math(*function)?,
            // reserved
            Symbol::UserFunction(_) | Symbol::Not | Symbol::BitwiseNot => {}
        }

        Ok(())
    }

    fn push(&mut self, value: Real) {
        self.stack.push(StackValue::value(value));
    }

    fn pop(&mut self, op: &str) -> Result<StackValue> {
        self.stack
            .pop()
            .ok_or_else(|| RuntimeError::not_enough_arguments(op))
    }

    fn require(&self, op: &str, n: usize) -> Result<()> {
        if self.stack.len() < n {
            Err(RuntimeError::not_enough_arguments(op))
        } else {
            Ok(())
        }
    }

    fn store(&mut self, name: &str) {
        let index = self.table.define(name);
        let value = self.table.get(index).map_or(0.0, |slot| slot.value);
        self.stack.push(StackValue::id(value, index));
    }

    fn bin_op<F>(&mut self, op: &str, f: F) -> Result<()>
    where
        F: Fn(Real, Real) -> Real,
    {
        self.require(op, 2)?;

        let b = self.pop(op)?.value;
        let a = self.pop(op)?.value;
        self.push(f(a, b));

        Ok(())
    }

    fn neg(&mut self) -> Result<()> {
        let a = self.pop("neg")?.value;
        self.push(-a);
        Ok(())
    }

    // <lhs> <rhs> EQ
    fn assign(&mut self) -> Result<()> {
        self.require("assign", 2)?;

        let b = self.pop("assign")?;
        let a = self.pop("assign")?;

        let c = if b.is_id() {
            b.index
                .and_then(|index| self.table.get(index).map(|slot| StackValue::id(slot.value, index)))
                .unwrap_or_else(|| StackValue::value(Real::NAN))
        } else if b.is_list() {
            b.index
                .map(|handle| StackValue::list(handle as Handle))
                .unwrap_or_else(|| StackValue::value(Real::NAN))
        } else {
            StackValue::value(b.value)
        };

        if a.is_id() {
            if let Some(slot) = a.index.and_then(|index| self.table.get_mut(index)) {
                *slot = c;
            }
        }

        self.stack.push(c);

        Ok(())
    }

    // <e1> .. <en> <n> GR
    fn group(&mut self) -> Result<()> {
        self.require("group", 2)?;

        let count = self.pop("group")?.integer();
        if count <= 0 || count as usize > self.stack.len() {
            return Err(RuntimeError::invalid_grouping(count, self.stack.len()));
        }

        let split = self.stack.len() - count as usize;
        let elements: Vec<StackValue> = self.stack.drain(split..).rev().collect();

        let handle = self.groups.insert(elements);
        self.stack.push(StackValue::list(handle));

        Ok(())
    }

    // <a1> .. <an> <n> fn
    fn math(&mut self, function: MathFn) -> Result<()> {
        let apply = function.function();
        let arity = apply.arity();

        let count = self.pop(function.name())?.integer();
        if count != arity as i32 {
            return Err(RuntimeError::wrong_number_of_args(function.name(), arity, count));
        }

        let value = match apply {
            Apply::Unary(f) => {
                let a = self.pop(function.name())?.value;
                f(a)
            }
            Apply::Binary(f) => {
                let b = self.pop(function.name())?.value;
                let a = self.pop(function.name())?.value;
                f(a, b)
            }
        };
        self.push(value);

        Ok(())
    }

    pub fn set(&mut self, name: &str, value: Real) {
        let index = self.table.define(name);
        self.set_at(index, value);
    }

    pub fn set_at(&mut self, index: usize, value: Real) {
        if let Some(slot) = self.table.get_mut(index) {
            *slot = StackValue::value(value);
        }
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.table.resolve(name)
    }

    pub fn get(&self, name: &str, default: Real) -> Real {
        self.table
            .resolve(name)
            .and_then(|index| self.table.get(index))
            .map_or(default, |slot| slot.value)
    }

    /// Resolves the variable's value as a grouping handle and returns the
    /// grouping's elements in source order. Empty when there is none.
    pub fn get_list(&self, name: &str) -> Vec<Real> {
        let handle = self.get(name, -1.0);
        if handle < 0.0 || handle > Real::from(Handle::MAX) {
            return vec![];
        }

        self.groups.values(handle as Handle)
    }

    /// Operand `offset` positions below the top of the stack, `0` if absent.
    pub fn peek(&self, offset: usize) -> Real {
        self.stack
            .len()
            .checked_sub(offset + 1)
            .and_then(|index| self.stack.get(index))
            .map_or(0.0, |slot| slot.value)
    }

    /// Operand stack from top to bottom.
    pub fn trace(&self) -> impl Iterator<Item = &StackValue> {
        self.stack.iter().rev()
    }

    pub fn variables(&self) -> &VariableTable {
        &self.table
    }

    pub fn groups(&self) -> &Groups {
        &self.groups
    }
}

/// Division by reciprocal; a divisor within machine epsilon of zero gives NaN.
fn div(a: Real, b: Real) -> Real {
    let b = if b.abs() > Real::EPSILON {
        1.0 / b
    } else {
        Real::NAN
    };

    a * b
}
