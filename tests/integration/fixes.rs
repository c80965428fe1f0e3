//! Applying the fixes offered with findings and checking the result again.

use anyhow::Result;
use view_params::inspection::{
    Finding, FindingKind, FixAction, InspectionOptions, Severity, TextEdit, apply_edits,
};
use view_params::test_utils::{ProjectFixture, SourceCall};

use super::Analysis;

const CONTROLLER: &str = "frontend/controllers/SiteController.php";
const CLASS: &str = "frontend\\controllers\\SiteController";

fn project() -> Result<ProjectFixture> {
    let fixture = ProjectFixture::multi_app(&["frontend"])?;
    fixture.write("frontend/views/site/index.php", "<?= $title ?> <?= $subtitle ?>")?;
    fixture.write("frontend/views/site/card.php", "<?= $a ?><?= $b ?><?= $c ?>")?;
    fixture.write("frontend/views/site/plain.php", "<hr>")?;
    fixture.write("frontend/views/site/single.php", "<?= $a ?>")?;
    Ok(fixture)
}

fn check(analysis: &Analysis, fixture: &ProjectFixture, call: &SourceCall) -> Vec<Finding> {
    let file = fixture.join(CONTROLLER);
    analysis.checker.check_call(&file, &call.call)
}

fn placed(call: SourceCall) -> SourceCall {
    call.in_class(CLASS)
}

#[test]
fn test_batch_fixes_converge() -> Result<()> {
    let fixture = project()?;
    let analysis = Analysis::new(&fixture, InspectionOptions::default())?;
    let call = placed(SourceCall::with_array("render", "index", &["title", "legacy"]));

    let findings = check(&analysis, &fixture, &call);
    assert_eq!(findings.len(), 2);
    let missing = &findings[0];
    assert_eq!(missing.kind, FindingKind::MissingRequired);
    assert_eq!(missing.fixes, vec![FixAction::InsertKey("subtitle".to_string())]);
    let unused = &findings[1];
    assert_eq!(unused.kind, FindingKind::UnusedSupplied);
    assert_eq!(unused.severity, Severity::Unused);
    assert_eq!(unused.message, "View 'index' does not use \"legacy\" parameter");

    assert_eq!(
        call.apply(&missing.fixes[0])?,
        SourceCall::with_array("render", "index", &["title", "legacy", "subtitle"]).source
    );
    assert_eq!(
        call.apply(&unused.fixes[0])?,
        SourceCall::with_array("render", "index", &["title"]).source
    );

    let all_edits: Vec<TextEdit> = findings
        .iter()
        .flat_map(|finding| finding.fixes.iter().flat_map(|fix| fix.edits(&call.call)))
        .collect();
    let fixed = placed(SourceCall::with_array("render", "index", &["title", "subtitle"]));
    assert_eq!(apply_edits(&call.source, &all_edits)?, fixed.source);
    assert!(check(&analysis, &fixture, &fixed).is_empty());
    Ok(())
}

#[test]
fn test_removing_argument_for_template_without_parameters() -> Result<()> {
    let fixture = project()?;
    let analysis = Analysis::new(&fixture, InspectionOptions::default())?;
    let call = placed(SourceCall::with_compact("render", "plain", &["model"]));

    let findings = check(&analysis, &fixture, &call);
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].fixes, vec![FixAction::RemoveArgument]);

    let fixed = placed(SourceCall::new("render", "plain"));
    assert_eq!(call.apply(&FixAction::RemoveArgument)?, fixed.source);
    assert!(check(&analysis, &fixture, &fixed).is_empty());
    Ok(())
}

#[test]
fn test_interactive_insert_all() -> Result<()> {
    let fixture = project()?;
    let analysis = Analysis::new(&fixture, InspectionOptions::interactive())?;
    let call = placed(SourceCall::new("render", "card"));

    let findings = check(&analysis, &fixture, &call);
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].message, "View 'card' requires \"a\", \"b\" and \"c\" parameters.");
    let insert_all = &findings[0].fixes[0];
    assert_eq!(insert_all.label(), "Add all missing parameters");

    let fixed = placed(SourceCall::with_array("render", "card", &["a", "b", "c"]));
    assert_eq!(call.apply(insert_all)?, fixed.source);
    assert!(check(&analysis, &fixture, &fixed).is_empty());
    Ok(())
}

#[test]
fn test_interactive_remove_unused_summary() -> Result<()> {
    let fixture = project()?;
    let analysis = Analysis::new(&fixture, InspectionOptions::interactive())?;
    let call = placed(SourceCall::with_compact("render", "single", &["a", "b", "c"]));

    let findings = check(&analysis, &fixture, &call);
    let summary = findings
        .iter()
        .find(|finding| finding.severity == Severity::Information)
        .ok_or_else(|| anyhow::anyhow!("no summary finding"))?;
    assert_eq!(summary.message, "This view has unused parameters");
    assert_eq!(summary.anchor, call.call.span);
    assert_eq!(
        summary.fixes,
        vec![FixAction::RemoveKeys(vec!["b".to_string(), "c".to_string()])]
    );

    let fixed = placed(SourceCall::with_compact("render", "single", &["a"]));
    assert_eq!(call.apply(&summary.fixes[0])?, fixed.source);
    assert!(check(&analysis, &fixture, &fixed).is_empty());
    Ok(())
}

#[test]
fn test_unknown_argument_offers_nothing() -> Result<()> {
    let fixture = project()?;
    let analysis = Analysis::new(&fixture, InspectionOptions::default())?;
    let call = placed(SourceCall::with_variable("render", "index", "params"));
    assert!(check(&analysis, &fixture, &call).is_empty());
    assert!(FixAction::InsertKey("title".to_string()).edits(&call.call).is_empty());
    Ok(())
}
