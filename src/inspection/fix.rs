//! Concrete text edits for [`FixAction`]s.
//!
//! Edits are computed against the spans of the render call the finding was
//! reported for. Inserted parameters forward a local variable of the same
//! name: `'model' => $model` in an array, `'model'` in a `compact` call.

use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;
use tracing::debug;

use super::FixAction;
use super::supplied::is_aggregation_call;
use crate::core::ViewParamsError;
use crate::syntax::{Expr, RenderCall, Span};

static IDENTIFIER: OnceLock<Option<Regex>> = OnceLock::new();

fn is_identifier(name: &str) -> bool {
    IDENTIFIER
        .get_or_init(|| {
            Regex::new(r"^[A-Za-z_\x{80}-\x{10FFFF}][A-Za-z0-9_\x{80}-\x{10FFFF}]*$").ok()
        })
        .as_ref()
        .is_some_and(|re| re.is_match(name))
}

/// Replacement of a byte range in a source text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextEdit {
    /// Range to replace
    pub range: Span,
    /// Replacement text
    pub new_text: String,
}

impl TextEdit {
    /// Create a new text edit.
    pub fn new(range: Span, new_text: impl Into<String>) -> Self {
        Self {
            range,
            new_text: new_text.into(),
        }
    }

    /// Insert `text` at `offset`.
    pub fn insert(offset: usize, text: impl Into<String>) -> Self {
        Self::new(Span::new(offset, offset), text)
    }

    /// Delete `range`.
    pub fn delete(range: Span) -> Self {
        Self::new(range, String::new())
    }
}

impl FixAction {
    /// The edits realizing this action on `call`.
    ///
    /// Empty when the action does not apply to the call's shape, e.g. a
    /// parameter argument that is neither an array nor a `compact` call, or a
    /// name that is not a valid variable name.
    pub fn edits(&self, call: &RenderCall) -> Vec<TextEdit> {
        match self {
            FixAction::InsertKey(name) => insert_names(call, std::slice::from_ref(name)),
            FixAction::InsertKeys(names) => insert_names(call, names),
            FixAction::RemoveKey(name) => remove_names(call, std::slice::from_ref(name)),
            FixAction::RemoveKeys(names) => remove_names(call, names),
            FixAction::RemoveArgument => remove_argument(call),
        }
    }
}

fn insert_names(call: &RenderCall, names: &[String]) -> Vec<TextEdit> {
    if names.is_empty() || !names.iter().all(|name| is_identifier(name)) {
        debug!("Not inserting parameters {:?}: not valid variable names", names);
        return Vec::new();
    }

    let pairs = || {
        names.iter().map(|name| format!("'{name}' => ${name}")).collect::<Vec<_>>().join(", ")
    };
    match call.params_arg() {
        None => match call.template_arg() {
            Some(template) => {
                vec![TextEdit::insert(template.span().end, format!(", [{}]", pairs()))]
            }
            None => Vec::new(),
        },
        Some(Expr::Array(array)) => match array.entries.last() {
            Some(last) => vec![TextEdit::insert(last.span.end, format!(", {}", pairs()))],
            None => vec![TextEdit::insert(array.span.end.saturating_sub(1), pairs())],
        },
        Some(Expr::Call(function)) if is_aggregation_call(&function.name) => {
            let quoted =
                names.iter().map(|name| format!("'{name}'")).collect::<Vec<_>>().join(", ");
            match function.args.last() {
                Some(last) => vec![TextEdit::insert(last.span().end, format!(", {quoted}"))],
                None => vec![TextEdit::insert(function.span.end.saturating_sub(1), quoted)],
            }
        }
        Some(_) => Vec::new(),
    }
}

fn remove_names(call: &RenderCall, names: &[String]) -> Vec<TextEdit> {
    let is_named = |expr: Option<&Expr>| {
        expr.and_then(Expr::as_static_string).is_some_and(|key| names.iter().any(|n| n == key))
    };

    let items: Vec<(Span, bool)> = match call.params_arg() {
        Some(Expr::Array(array)) => {
            array.entries.iter().map(|entry| (entry.span, is_named(entry.key.as_ref()))).collect()
        }
        Some(Expr::Call(function)) if is_aggregation_call(&function.name) => {
            function.args.iter().map(|arg| (arg.span(), is_named(Some(arg)))).collect()
        }
        _ => return Vec::new(),
    };

    if !items.iter().any(|(_, remove)| *remove) {
        return Vec::new();
    }
    if items.iter().all(|(_, remove)| *remove) {
        return remove_argument(call);
    }

    let mut edits = Vec::new();
    let mut i = 0;
    while i < items.len() {
        if !items[i].1 {
            i += 1;
            continue;
        }
        let first = i;
        while i < items.len() && items[i].1 {
            i += 1;
        }
        let last = i - 1;
        let range = if i < items.len() {
            // Delete up to the next kept item, taking the separator with the run
            Span::new(items[first].0.start, items[i].0.start)
        } else {
            Span::new(items[first - 1].0.end, items[last].0.end)
        };
        edits.push(TextEdit::delete(range));
    }
    edits
}

fn remove_argument(call: &RenderCall) -> Vec<TextEdit> {
    match (call.template_arg(), call.params_arg()) {
        (Some(template), Some(params)) => {
            vec![TextEdit::delete(Span::new(template.span().end, params.span().end))]
        }
        _ => Vec::new(),
    }
}

/// Apply `edits` to `source`.
///
/// # Errors
///
/// Returns [`ViewParamsError::InvalidEdit`] when an edit falls outside the
/// source, splits a UTF-8 character or overlaps another edit.
///
/// ```
/// use view_params::inspection::{TextEdit, apply_edits};
/// use view_params::syntax::Span;
///
/// let edited = apply_edits("['a' => $a]", &[TextEdit::insert(10, ", 'b' => $b")]).unwrap();
/// assert_eq!(edited, "['a' => $a, 'b' => $b]");
/// ```
pub fn apply_edits(source: &str, edits: &[TextEdit]) -> Result<String, ViewParamsError> {
    let mut ordered: Vec<&TextEdit> = edits.iter().collect();
    ordered.sort_by_key(|edit| (edit.range.start, edit.range.end));

    let invalid = |edit: &TextEdit, reason: &str| ViewParamsError::InvalidEdit {
        start: edit.range.start,
        end: edit.range.end,
        reason: reason.to_string(),
    };

    let mut result = String::with_capacity(source.len());
    let mut cursor = 0;
    for edit in ordered {
        let Span {
            start,
            end,
        } = edit.range;
        if start > end || end > source.len() {
            return Err(invalid(edit, "range outside the source"));
        }
        if !source.is_char_boundary(start) || !source.is_char_boundary(end) {
            return Err(invalid(edit, "range splits a character"));
        }
        if start < cursor {
            return Err(invalid(edit, "overlaps a previous edit"));
        }
        result.push_str(&source[cursor..start]);
        result.push_str(&edit.new_text);
        cursor = end;
    }
    result.push_str(&source[cursor..]);
    Ok(result)
}
