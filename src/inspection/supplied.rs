//! Parameter names a call site passes to its template.

use serde::Serialize;
use std::collections::BTreeSet;
use tracing::trace;

use crate::constants::AGGREGATION_BUILTIN;
use crate::syntax::{Expr, Span};

/// One supplied name and the element supplying it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SuppliedParameter {
    /// Parameter name
    pub name: String,
    /// Array entry or `compact` argument the name comes from
    pub anchor: Span,
}

/// The names a call site supplies, deduplicated by name in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SuppliedParameters {
    entries: Vec<SuppliedParameter>,
}

impl SuppliedParameters {
    /// Add `name`, unless it is already supplied by an earlier element.
    pub fn push(&mut self, name: impl Into<String>, anchor: Span) {
        let name = name.into();
        if !self.contains(&name) {
            self.entries.push(SuppliedParameter {
                name,
                anchor,
            });
        }
    }

    /// Whether `name` is supplied.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|entry| entry.name == name)
    }

    /// The supplied names.
    pub fn names(&self) -> BTreeSet<&str> {
        self.entries.iter().map(|entry| entry.name.as_str()).collect()
    }

    /// Supplied parameters in source order.
    pub fn iter(&self) -> impl Iterator<Item = &SuppliedParameter> {
        self.entries.iter()
    }

    /// Number of distinct names.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is supplied.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Whether a function name refers to the variable-aggregation builtin.
///
/// Function names are case-insensitive; a leading namespace separator is ignored.
pub fn is_aggregation_call(name: &str) -> bool {
    name.strip_prefix('\\').unwrap_or(name).eq_ignore_ascii_case(AGGREGATION_BUILTIN)
}

/// Extract the supplied parameters from a call's parameter argument.
///
/// Understands an array literal with string keys and a `compact(...)` call
/// with string arguments. Elements with a non-literal key or argument are
/// skipped individually. Returns `None` when the supplied set cannot be
/// known: any other expression, or an array with a spread entry.
///
/// ```
/// use view_params::inspection::supplied::extract;
/// use view_params::syntax::{Expr, FunctionCall, Span, StringLiteral};
///
/// let compact = Expr::Call(FunctionCall {
///     name: "compact".to_string(),
///     args: vec![
///         Expr::String(StringLiteral::plain("model", Span::new(8, 15))),
///         Expr::String(StringLiteral::plain("form", Span::new(17, 23))),
///     ],
///     span: Span::new(0, 24),
/// });
/// let supplied = extract(&compact).unwrap();
/// assert_eq!(supplied.names().into_iter().collect::<Vec<_>>(), vec!["form", "model"]);
/// ```
pub fn extract(argument: &Expr) -> Option<SuppliedParameters> {
    let mut supplied = SuppliedParameters::default();
    match argument {
        Expr::Array(array) => {
            if array.entries.iter().any(|entry| entry.spread) {
                trace!("Parameter array contains a spread entry, supplied set unknown");
                return None;
            }
            for entry in &array.entries {
                if let Some(name) = entry.key.as_ref().and_then(Expr::as_static_string) {
                    supplied.push(name, entry.span);
                }
            }
        }
        Expr::Call(call) if is_aggregation_call(&call.name) => {
            for arg in &call.args {
                if let Some(name) = arg.as_static_string() {
                    supplied.push(name, arg.span());
                }
            }
        }
        _ => {
            trace!("Parameter argument is not a literal, supplied set unknown");
            return None;
        }
    }
    Some(supplied)
}
