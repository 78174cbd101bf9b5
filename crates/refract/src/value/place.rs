// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Storage places.
//!
//! A [`Place`] names a slot inside a shared cell: the root cell plus a path of
//! field and element steps. Every access goes through `try_borrow` so an
//! aliasing conflict surfaces as [`Error::BorrowConflict`] instead of a panic.

use super::DynamicValue;
use crate::error::{Error, Result};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Shared storage cell.
pub(crate) type Cell = Rc<RefCell<DynamicValue>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Step {
    /// Struct field by declaration index.
    Field(usize),
    /// Array element by position.
    Elem(usize),
}

/// Location of a value: a root cell and a path into it.
#[derive(Clone)]
pub struct Place {
    root: Cell,
    path: Vec<Step>,
}

impl Place {
    pub(crate) fn new(root: Cell) -> Self {
        Self {
            root,
            path: Vec::new(),
        }
    }

    /// A place over a fresh cell holding `value`.
    pub(crate) fn detached(value: DynamicValue) -> Self {
        Self::new(Rc::new(RefCell::new(value)))
    }

    pub(crate) fn child(&self, step: Step) -> Self {
        let mut path = self.path.clone();
        path.push(step);
        Self {
            root: Rc::clone(&self.root),
            path,
        }
    }

    /// Run `f` against the slot. No borrow is held once this returns.
    pub(crate) fn read<R>(
        &self,
        op: &'static str,
        f: impl FnOnce(&DynamicValue) -> Result<R>,
    ) -> Result<R> {
        let guard = self
            .root
            .try_borrow()
            .map_err(|_| Error::BorrowConflict { op })?;
        let mut cur: &DynamicValue = &guard;
        for step in &self.path {
            cur = match (step, cur) {
                (Step::Field(i), DynamicValue::Struct(fields)) => fields.get(*i),
                (Step::Elem(i), DynamicValue::Array(items)) => items.get(*i),
                _ => None,
            }
            .ok_or(Error::InvalidValue { op })?;
        }
        f(cur)
    }

    pub(crate) fn write<R>(
        &self,
        op: &'static str,
        f: impl FnOnce(&mut DynamicValue) -> Result<R>,
    ) -> Result<R> {
        let mut guard = self
            .root
            .try_borrow_mut()
            .map_err(|_| Error::BorrowConflict { op })?;
        let mut cur: &mut DynamicValue = &mut guard;
        for step in &self.path {
            cur = match (step, cur) {
                (Step::Field(i), DynamicValue::Struct(fields)) => fields.get_mut(*i),
                (Step::Elem(i), DynamicValue::Array(items)) => items.get_mut(*i),
                _ => None,
            }
            .ok_or(Error::InvalidValue { op })?;
        }
        f(cur)
    }

    /// Copy of the stored value.
    pub(crate) fn load(&self, op: &'static str) -> Result<DynamicValue> {
        self.read(op, |v| Ok(v.clone()))
    }

    pub(crate) fn store(&self, op: &'static str, value: DynamicValue) -> Result<()> {
        self.write(op, |slot| {
            *slot = value;
            Ok(())
        })
    }
}

impl PartialEq for Place {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.root, &other.root) && self.path == other.path
    }
}

impl fmt::Debug for Place {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Place({:p}", Rc::as_ptr(&self.root))?;
        for step in &self.path {
            match step {
                Step::Field(i) => write!(f, ".{}", i)?,
                Step::Elem(i) => write!(f, "[{}]", i)?,
            }
        }
        f.write_str(")")
    }
}
