//! Parse-layer boundary types.
//!
//! The host parser owns the syntax tree. For every method call that may be a
//! render call it hands over a [`RenderCall`]: the method name, the argument
//! expressions reduced to the few shapes the analysis understands, their byte
//! spans in the source file, and the context the call appears in. Everything
//! the analysis cannot interpret is [`Expr::Other`].

use serde::{Deserialize, Serialize};

/// Byte range in a source file, end exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Span {
    /// Offset of the first byte
    pub start: usize,
    /// Offset one past the last byte
    pub end: usize,
}

impl Span {
    /// Create a span covering `start..end`.
    pub const fn new(start: usize, end: usize) -> Self {
        Self {
            start,
            end,
        }
    }

    /// Length of the span in bytes.
    pub const fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Whether the span covers no bytes.
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A string literal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringLiteral {
    /// Contents without quotes and with escapes resolved
    pub contents: String,
    /// Source text including quotes, as written
    pub text: String,
    /// Whether the literal interpolates variables or expressions
    pub interpolated: bool,
    /// Location of the literal
    pub span: Span,
}

impl StringLiteral {
    /// Create a plain single-quoted literal spanning `span`.
    pub fn plain(contents: impl Into<String>, span: Span) -> Self {
        let contents = contents.into();
        Self {
            text: format!("'{contents}'"),
            contents,
            interpolated: false,
            span,
        }
    }

    /// The literal's value when it is statically known.
    pub fn static_value(&self) -> Option<&str> {
        (!self.interpolated).then_some(self.contents.as_str())
    }
}

/// One element of an array literal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArrayEntry {
    /// Key expression, `None` for list-style entries
    pub key: Option<Expr>,
    /// Value expression
    pub value: Expr,
    /// Whether the entry is a spread (`...$values`)
    pub spread: bool,
    /// Location of the whole entry
    pub span: Span,
}

/// An array literal (`[...]` or `array(...)`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArrayLiteral {
    /// Entries in source order
    pub entries: Vec<ArrayEntry>,
    /// Location including the brackets
    pub span: Span,
}

/// A plain function call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionCall {
    /// Function name as written, possibly namespace-qualified
    pub name: String,
    /// Argument expressions
    pub args: Vec<Expr>,
    /// Location including the parentheses
    pub span: Span,
}

/// Expression shapes the analysis distinguishes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    /// A string literal
    String(StringLiteral),
    /// An array literal
    Array(ArrayLiteral),
    /// A function call
    Call(FunctionCall),
    /// A variable reference
    Variable {
        /// Name without the sigil
        name: String,
        /// Location
        span: Span,
    },
    /// Any other expression
    Other {
        /// Location
        span: Span,
    },
}

impl Expr {
    /// Location of the expression.
    pub fn span(&self) -> Span {
        match self {
            Expr::String(literal) => literal.span,
            Expr::Array(array) => array.span,
            Expr::Call(call) => call.span,
            Expr::Variable {
                span,
                ..
            }
            | Expr::Other {
                span,
            } => *span,
        }
    }

    /// The value of a non-interpolated string literal.
    pub fn as_static_string(&self) -> Option<&str> {
        match self {
            Expr::String(literal) => literal.static_value(),
            _ => None,
        }
    }
}

/// Where a call appears. The default is a call outside any class.
///
/// The file holding the call is passed to the checker alongside the call.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CallerContext {
    /// Name of the enclosing class, possibly namespace-qualified
    pub class_name: Option<String>,
}

impl CallerContext {
    /// A call inside `class_name`.
    pub fn in_class(class_name: &str) -> Self {
        Self {
            class_name: Some(class_name.to_string()),
        }
    }

    /// The enclosing class name without its namespace.
    pub fn class_short_name(&self) -> Option<&str> {
        self.class_name.as_deref().map(|name| name.rsplit('\\').next().unwrap_or(name))
    }
}

/// A method call that may render a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderCall {
    /// Called method name
    pub method: String,
    /// Argument expressions in order
    pub args: Vec<Expr>,
    /// Location of the whole call
    pub span: Span,
    /// Where the call appears
    pub caller: CallerContext,
}

impl RenderCall {
    /// The template path argument.
    pub fn template_arg(&self) -> Option<&Expr> {
        self.args.first()
    }

    /// The parameter argument.
    pub fn params_arg(&self) -> Option<&Expr> {
        self.args.get(1)
    }
}
