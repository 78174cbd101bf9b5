// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Function values and method binding.

use super::{DynamicValue, SliceRef, Value};
use crate::error::{Error, Result};
use crate::kind::Kind;
use crate::types::{Method, Type, TypeKind};
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

/// Implementation of a function value.
pub type NativeFn = Rc<dyn Fn(&[Value]) -> Result<Vec<Value>>>;

/// Implementation of a method; receives the receiver first.
pub type MethodFn = Arc<dyn Fn(&Value, &[Value]) -> Result<Vec<Value>> + Send + Sync>;

/// Callable stored in a func value.
#[derive(Clone)]
pub enum Callable {
    Native(NativeFn),
    /// A method bound to its receiver.
    Bound { receiver: Value, method: MethodFn },
}

impl Callable {
    fn invoke(&self, args: &[Value]) -> Result<Vec<Value>> {
        match self {
            Callable::Native(f) => f(args),
            Callable::Bound { receiver, method } => method(receiver, args),
        }
    }
}

impl PartialEq for Callable {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Callable::Native(a), Callable::Native(b)) => Rc::ptr_eq(a, b),
            (
                Callable::Bound {
                    receiver: ra,
                    method: ma,
                },
                Callable::Bound {
                    receiver: rb,
                    method: mb,
                },
            ) => {
                Arc::ptr_eq(ma, mb)
                    && match (&ra.0, &rb.0) {
                        (Some(a), Some(b)) => a.place == b.place,
                        (None, None) => true,
                        _ => false,
                    }
            }
            _ => false,
        }
    }
}

impl fmt::Debug for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Callable::Native(_) => f.write_str("Callable::Native"),
            Callable::Bound { receiver, .. } => {
                write!(f, "Callable::Bound({})", receiver.kind())
            }
        }
    }
}

/// Func value of type `ty` backed by `f`. Arguments and results are checked
/// against the signature on every call.
pub fn make_func(
    ty: &Type,
    f: impl Fn(&[Value]) -> Result<Vec<Value>> + 'static,
) -> Result<Value> {
    if ty.kind() != Kind::Func {
        return Err(Error::kind_mismatch("make_func", "func type", ty.kind()));
    }
    let callable = Callable::Native(Rc::new(f));
    Ok(Value::detached(DynamicValue::Func(Some(callable)), ty.clone()))
}

impl Value {
    /// Call with `args`; trailing arguments of a variadic function are packed
    /// into its final slice parameter.
    pub fn call(&self, args: &[Value]) -> Result<Vec<Value>> {
        self.invoke("Value::call", args, false)
    }

    /// Call a variadic function passing the final slice parameter as-is.
    pub fn call_slice(&self, args: &[Value]) -> Result<Vec<Value>> {
        self.invoke("Value::call_slice", args, true)
    }

    fn invoke(&self, op: &'static str, args: &[Value], spread: bool) -> Result<Vec<Value>> {
        let inner = self.inner(op)?;
        let TypeKind::Func(sig) = &inner.ty.descriptor().kind else {
            return Err(Error::kind_mismatch(op, "func", inner.ty.kind()));
        };
        if spread && !sig.variadic {
            return Err(Error::Call(format!("{}: {} is not variadic", op, inner.ty)));
        }
        let callable = inner.place.read(op, |v| match v {
            DynamicValue::Func(Some(c)) => Ok(c.clone()),
            DynamicValue::Func(None) => Err(Error::NilDereference { op }),
            _ => Err(Error::InvalidValue { op }),
        })?;

        let packs_tail = sig.variadic && !spread;
        let fixed = if packs_tail {
            sig.ins.len() - 1
        } else {
            sig.ins.len()
        };
        let arity_ok = if packs_tail {
            args.len() >= fixed
        } else {
            args.len() == fixed
        };
        if !arity_ok {
            return Err(Error::Call(format!(
                "{}: {} takes {}{} arguments, got {}",
                op,
                inner.ty,
                if packs_tail { "at least " } else { "" },
                fixed,
                args.len()
            )));
        }

        let mut packed = Vec::with_capacity(sig.ins.len());
        for (arg, ty) in args[..fixed].iter().zip(&sig.ins) {
            packed.push(Value::detached(arg.coerce_to(ty, op)?, ty.clone()));
        }
        if packs_tail {
            let slice_ty = &sig.ins[fixed];
            let elem = slice_ty.elem()?;
            let rest = args[fixed..]
                .iter()
                .map(|a| a.coerce_to(&elem, op))
                .collect::<Result<Vec<_>>>()?;
            packed.push(Value::detached(
                DynamicValue::Slice(Some(SliceRef::from_vec(rest))),
                slice_ty.clone(),
            ));
        }

        let outs = callable.invoke(&packed)?;
        if outs.len() != sig.outs.len() {
            return Err(Error::Call(format!(
                "{}: {} returned {} values",
                op,
                inner.ty,
                outs.len()
            )));
        }
        outs.iter()
            .zip(&sig.outs)
            .map(|(v, ty)| Ok(Value::detached(v.coerce_to(ty, op)?, ty.clone())))
            .collect()
    }

    /// Size of the method set (for interface values, of the interface type).
    pub fn num_method(&self) -> Result<usize> {
        Ok(self.inner("Value::num_method")?.ty.num_method())
    }

    /// Method `i` bound to this value.
    pub fn method(&self, i: usize) -> Result<Value> {
        const OP: &str = "Value::method";
        let inner = self.inner(OP)?;
        let method = inner.ty.method(i)?;
        if inner.ty.kind() == Kind::Interface {
            let name = method.name.clone();
            return self.elem()?.method_by_name(&name)?.ok_or_else(|| {
                Error::NoSuchField {
                    name,
                    ty: inner.ty.to_string(),
                }
            });
        }
        self.bind(OP, method)
    }

    pub fn method_by_name(&self, name: &str) -> Result<Option<Value>> {
        const OP: &str = "Value::method_by_name";
        let inner = self.inner(OP)?;
        let Some(method) = inner.ty.method_by_name(name) else {
            return Ok(None);
        };
        if inner.ty.kind() == Kind::Interface {
            return self.elem()?.method_by_name(name);
        }
        self.bind(OP, method).map(Some)
    }

    fn bind(&self, op: &'static str, method: Method) -> Result<Value> {
        let inner = self.inner(op)?;
        let func = method.func.ok_or(Error::Unsupported {
            op,
            kind: inner.ty.kind(),
        })?;
        let callable = Callable::Bound {
            receiver: self.clone(),
            method: func,
        };
        Ok(
            Value::detached(DynamicValue::Func(Some(callable)), method.ty)
                .with_read_only(inner.flags.read_only),
        )
    }
}
