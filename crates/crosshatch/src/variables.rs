//! The per-request variable environment flag templates expand against.
//!
//! Variables are built fresh for every resolution call from caller-supplied data and
//! discarded with it; nothing here refers back into the toolchain configuration. Values
//! come in three shapes - scalars, lists, and structures - and templates reach into
//! structures with dotted paths (`%{lib.path}`). Only `iterate_over` may consume a list;
//! a template placeholder must always land on a scalar.

use std::fmt;

use derive_more::From;
use indexmap::IndexMap;

use crate::errors::{ResolutionError, ResolutionResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Scalar,
    List,
    Structure,
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shape::Scalar => write!(f, "a scalar"),
            Shape::List => write!(f, "a list"),
            Shape::Structure => write!(f, "a structure"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, From)]
pub enum VariableValue {
    #[from]
    Scalar(String),
    #[from]
    List(Vec<VariableValue>),
    #[from]
    Structure(IndexMap<String, VariableValue>),
}

impl From<&str> for VariableValue {
    fn from(value: &str) -> Self {
        VariableValue::Scalar(value.to_owned())
    }
}

impl VariableValue {
    pub fn list<I, V>(values: I) -> VariableValue
    where
        I: IntoIterator<Item = V>,
        V: Into<VariableValue>,
    {
        VariableValue::List(values.into_iter().map(Into::into).collect())
    }

    pub fn structure<I, K, V>(fields: I) -> VariableValue
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<VariableValue>,
    {
        VariableValue::Structure(
            fields
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }

    pub fn shape(&self) -> Shape {
        match self {
            VariableValue::Scalar(_) => Shape::Scalar,
            VariableValue::List(_) => Shape::List,
            VariableValue::Structure(_) => Shape::Structure,
        }
    }
}

/// A scalar is falsy iff it is empty, `"0"`, or (ASCII case-insensitively) `"false"`.
/// Everything else, including `"no"` and whitespace, is truthy.
pub(crate) fn truthy(value: &str) -> bool {
    !(value.is_empty() || value == "0" || value.eq_ignore_ascii_case("false"))
}

/// Top-level variable bindings for one resolution call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Variables {
    vars: IndexMap<String, VariableValue>,
}

impl Variables {
    pub fn new() -> Variables {
        Variables::default()
    }

    pub fn set<N: Into<String>, V: Into<VariableValue>>(&mut self, name: N, value: V) -> &mut Self {
        self.vars.insert(name.into(), value.into());
        self
    }

    pub fn with<N: Into<String>, V: Into<VariableValue>>(mut self, name: N, value: V) -> Self {
        self.set(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&VariableValue> {
        self.vars.get(name)
    }
}

/// A lookup scope: the base [`Variables`] plus a chain of iteration bindings, innermost
/// first. Binding frames live on the expansion call stack; nothing is copied.
#[derive(Debug, Clone, Copy)]
pub(crate) struct View<'p, 'v> {
    vars: &'v Variables,
    binding: Option<(&'v str, &'v VariableValue)>,
    parent: Option<&'p View<'p, 'v>>,
}

impl<'p, 'v> View<'p, 'v> {
    pub(crate) fn root(vars: &'v Variables) -> View<'p, 'v> {
        View {
            vars,
            binding: None,
            parent: None,
        }
    }

    /// A child scope shadowing `name` for one iteration element.
    pub(crate) fn bind<'s>(&'s self, name: &'v str, value: &'v VariableValue) -> View<'s, 'v> {
        View {
            vars: self.vars,
            binding: Some((name, value)),
            parent: Some(self),
        }
    }

    fn exact(&self, name: &str) -> Option<&'v VariableValue> {
        let mut scope = Some(self);
        while let Some(view) = scope {
            if let Some((bound, value)) = view.binding {
                if bound == name {
                    return Some(value);
                }
            }
            scope = view.parent;
        }
        self.vars.get(name)
    }

    /// Exact-name lookup first (so an `iterate_over` binding of a dotted name shadows
    /// correctly), then dotted descent through structure fields. A missing name or field
    /// is `None`; descending through a non-structure is a hard error.
    pub(crate) fn lookup(&self, name: &str) -> ResolutionResult<Option<&'v VariableValue>> {
        if let Some(value) = self.exact(name) {
            return Ok(Some(value));
        }
        if !name.contains('.') {
            return Ok(None);
        }

        let mut segments = name.split('.');
        let head = segments.next().expect("split yields at least one segment");
        let Some(mut current) = self.exact(head) else {
            return Ok(None);
        };

        let mut path = head.to_owned();
        for segment in segments {
            let VariableValue::Structure(fields) = current else {
                return Err(ResolutionError::WrongShape {
                    name: path,
                    expected: Shape::Structure,
                    actual: current.shape(),
                });
            };
            match fields.get(segment) {
                Some(value) => current = value,
                None => return Ok(None),
            }
            path.push('.');
            path.push_str(segment);
        }
        Ok(Some(current))
    }

    pub(crate) fn available(&self, name: &str) -> ResolutionResult<bool> {
        Ok(self.lookup(name)?.is_some())
    }

    pub(crate) fn scalar(&self, name: &str) -> ResolutionResult<&'v str> {
        match self.lookup(name)? {
            None => Err(ResolutionError::UnboundVariable(name.to_owned())),
            Some(VariableValue::Scalar(value)) => Ok(value),
            Some(other) => Err(ResolutionError::WrongShape {
                name: name.to_owned(),
                expected: Shape::Scalar,
                actual: other.shape(),
            }),
        }
    }

    pub(crate) fn list(&self, name: &str) -> ResolutionResult<&'v [VariableValue]> {
        match self.lookup(name)? {
            None => Err(ResolutionError::UnboundVariable(name.to_owned())),
            Some(VariableValue::List(values)) => Ok(values),
            Some(other) => Err(ResolutionError::WrongShape {
                name: name.to_owned(),
                expected: Shape::List,
                actual: other.shape(),
            }),
        }
    }
}
