//! Render calls built together with their source text.

use crate::core::ViewParamsError;
use crate::inspection::{FixAction, apply_edits};
use crate::syntax::{
    ArrayEntry, ArrayLiteral, CallerContext, Expr, FunctionCall, RenderCall, Span, StringLiteral,
};

enum Params<'a> {
    None,
    Array(&'a [&'a str]),
    Compact(&'a [&'a str]),
    Variable(&'a str),
}

/// A render call and the source text its spans refer to.
///
/// ```rust,no_run
/// use view_params::test_utils::SourceCall;
///
/// let call = SourceCall::with_array("render", "index", &["model"]);
/// assert_eq!(call.source, "$this->render('index', ['model' => $model])");
/// ```
#[derive(Debug, Clone)]
pub struct SourceCall {
    /// Source text of the call
    pub source: String,
    /// The call as the parse layer would hand it over
    pub call: RenderCall,
}

impl SourceCall {
    /// `$this->method('template')`
    pub fn new(method: &str, template: &str) -> Self {
        Self::build(method, template, Params::None)
    }

    /// `$this->method('template', ['a' => $a, ...])`
    pub fn with_array(method: &str, template: &str, keys: &[&str]) -> Self {
        Self::build(method, template, Params::Array(keys))
    }

    /// `$this->method('template', compact('a', ...))`
    pub fn with_compact(method: &str, template: &str, names: &[&str]) -> Self {
        Self::build(method, template, Params::Compact(names))
    }

    /// `$this->method('template', $variable)`
    pub fn with_variable(method: &str, template: &str, variable: &str) -> Self {
        Self::build(method, template, Params::Variable(variable))
    }

    /// Place the call inside `class`.
    pub fn in_class(mut self, class: &str) -> Self {
        self.call.caller = CallerContext::in_class(class);
        self
    }

    /// Apply a fix action to the source text.
    pub fn apply(&self, action: &FixAction) -> Result<String, ViewParamsError> {
        apply_edits(&self.source, &action.edits(&self.call))
    }

    fn build(method: &str, template: &str, params: Params<'_>) -> Self {
        let mut source = format!("$this->{method}(");
        let start = source.len();
        source.push_str(&format!("'{template}'"));
        let mut args =
            vec![Expr::String(StringLiteral::plain(template, Span::new(start, source.len())))];

        match params {
            Params::None => {}
            Params::Array(keys) => {
                source.push_str(", ");
                let open = source.len();
                source.push('[');
                let mut entries = Vec::with_capacity(keys.len());
                for (i, key) in keys.iter().enumerate() {
                    if i > 0 {
                        source.push_str(", ");
                    }
                    let entry_start = source.len();
                    source.push_str(&format!("'{key}'"));
                    let key_span = Span::new(entry_start, source.len());
                    source.push_str(" => ");
                    let value_start = source.len();
                    source.push_str(&format!("${key}"));
                    entries.push(ArrayEntry {
                        key: Some(Expr::String(StringLiteral::plain(*key, key_span))),
                        value: Expr::Variable {
                            name: (*key).to_string(),
                            span: Span::new(value_start, source.len()),
                        },
                        spread: false,
                        span: Span::new(entry_start, source.len()),
                    });
                }
                source.push(']');
                args.push(Expr::Array(ArrayLiteral {
                    entries,
                    span: Span::new(open, source.len()),
                }));
            }
            Params::Compact(names) => {
                source.push_str(", ");
                let call_start = source.len();
                source.push_str("compact(");
                let mut compact_args = Vec::with_capacity(names.len());
                for (i, name) in names.iter().enumerate() {
                    if i > 0 {
                        source.push_str(", ");
                    }
                    let arg_start = source.len();
                    source.push_str(&format!("'{name}'"));
                    compact_args.push(Expr::String(StringLiteral::plain(
                        *name,
                        Span::new(arg_start, source.len()),
                    )));
                }
                source.push(')');
                args.push(Expr::Call(FunctionCall {
                    name: "compact".to_string(),
                    args: compact_args,
                    span: Span::new(call_start, source.len()),
                }));
            }
            Params::Variable(name) => {
                source.push_str(", ");
                let var_start = source.len();
                source.push_str(&format!("${name}"));
                args.push(Expr::Variable {
                    name: name.to_string(),
                    span: Span::new(var_start, source.len()),
                });
            }
        }
        source.push(')');

        let call = RenderCall {
            method: method.to_string(),
            args,
            span: Span::new(0, source.len()),
            caller: CallerContext::default(),
        };
        Self {
            source,
            call,
        }
    }
}
