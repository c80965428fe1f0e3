//! Parameters the call passes that the template never reads.

use super::checker::CallSite;
use super::{Finding, FindingKind, FixAction, Severity};
use crate::syntax::Span;

const NO_PARAMETERS: &str = "This view does not use parameters";
const SOME_UNUSED: &str = "This view has unused parameters";

/// Report `supplied - required` for one call site.
pub(crate) fn report(site: &CallSite<'_>) -> Vec<Finding> {
    if site.supplied.is_empty() {
        return Vec::new();
    }
    let Some(argument) = site.call.params_arg() else {
        return Vec::new();
    };

    let finding = |severity: Severity,
                   anchor: Span,
                   message: String,
                   parameters: Vec<String>,
                   fix: FixAction| Finding {
        kind: FindingKind::UnusedSupplied,
        severity,
        file: site.file.to_path_buf(),
        anchor,
        message,
        parameters,
        fixes: vec![fix],
    };
    let mut supplied_names: Vec<String> = site.supplied.iter().map(|p| p.name.clone()).collect();
    supplied_names.sort();
    let no_parameters = |findings: &mut Vec<Finding>| {
        findings.push(finding(
            Severity::Unused,
            argument.span(),
            NO_PARAMETERS.to_string(),
            supplied_names.clone(),
            FixAction::RemoveArgument,
        ));
        if site.options.is_interactive() {
            findings.push(finding(
                Severity::Information,
                site.call.span,
                NO_PARAMETERS.to_string(),
                supplied_names.clone(),
                FixAction::RemoveArgument,
            ));
        }
    };

    let mut findings = Vec::new();
    if site.required.is_empty() {
        no_parameters(&mut findings);
        return findings;
    }

    let mut unused = Vec::new();
    for parameter in site.supplied.iter().filter(|p| !site.required.contains(&p.name)) {
        findings.push(finding(
            Severity::Unused,
            parameter.anchor,
            format!("View {} does not use \"{}\" parameter", site.template_text, parameter.name),
            vec![parameter.name.clone()],
            FixAction::RemoveKey(parameter.name.clone()),
        ));
        unused.push(parameter.name.clone());
    }

    if site.options.is_interactive() && !unused.is_empty() {
        if unused.len() == site.supplied.len() {
            no_parameters(&mut findings);
        } else {
            unused.sort();
            findings.push(finding(
                Severity::Information,
                site.call.span,
                SOME_UNUSED.to_string(),
                unused.clone(),
                FixAction::RemoveKeys(unused),
            ));
        }
    }
    findings
}
