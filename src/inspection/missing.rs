//! Parameters a template reads that the call does not pass.

use super::checker::CallSite;
use super::{Finding, FindingKind, FixAction, Severity};

/// Report `required - supplied` for one call site.
pub(crate) fn report(site: &CallSite<'_>) -> Vec<Finding> {
    let missing: Vec<String> =
        site.required.iter().filter(|name| !site.supplied.contains(name)).cloned().collect();
    if missing.is_empty() {
        return Vec::new();
    }

    let finding = |message: String, parameters: Vec<String>, fixes: Vec<FixAction>| Finding {
        kind: FindingKind::MissingRequired,
        severity: Severity::Warning,
        file: site.file.to_path_buf(),
        anchor: site.call.span,
        message,
        parameters,
        fixes,
    };

    if !site.options.is_interactive() {
        return missing
            .into_iter()
            .map(|name| {
                finding(
                    format!("View {} requires \"{name}\" parameter.", site.template_text),
                    vec![name.clone()],
                    vec![FixAction::InsertKey(name)],
                )
            })
            .collect();
    }

    let mut fixes = Vec::with_capacity(missing.len() + 1);
    if missing.len() > 1 {
        fixes.push(FixAction::InsertKeys(missing.clone()));
    }
    fixes.extend(missing.iter().cloned().map(FixAction::InsertKey));

    let message = format!("View {} requires {}", site.template_text, describe_names(&missing));
    vec![finding(message, missing, fixes)]
}

/// `"a" parameter.` or `"a", "b" and "c" parameters.`
fn describe_names(names: &[String]) -> String {
    match names {
        [] => String::new(),
        [only] => format!("\"{only}\" parameter."),
        [init @ .., last] => {
            let listed =
                init.iter().map(|name| format!("\"{name}\"")).collect::<Vec<_>>().join(", ");
            format!("{listed} and \"{last}\" parameters.")
        }
    }
}
