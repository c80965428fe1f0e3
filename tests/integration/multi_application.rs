//! Templates sharing one key in several applications.

use anyhow::Result;
use view_params::inspection::{FindingKind, InspectionOptions};
use view_params::test_utils::{ProjectFixture, SourceCall, init_test_logging};

use super::{Analysis, reported};

fn shop() -> Result<ProjectFixture> {
    let fixture = ProjectFixture::multi_app(&["frontend", "backend"])?;
    fixture.write("frontend/views/site/index.php", "<h1><?= $title ?></h1>\n")?;
    fixture.write(
        "backend/views/site/index.php",
        "<table>\n<?php foreach ($stats as $row): ?>\n<tr><td><?= $row ?></td></tr>\n\
         <?php endforeach; ?>\n</table>\n<p><?= $period ?></p>\n",
    )?;
    Ok(fixture)
}

#[test]
fn test_each_application_sees_its_own_template() -> Result<()> {
    init_test_logging(None);
    let fixture = shop()?;
    let analysis = Analysis::new(&fixture, InspectionOptions::default())?;

    let frontend = fixture.join("frontend/controllers/SiteController.php");
    let call = SourceCall::with_array("render", "index", &["title"])
        .in_class("frontend\\controllers\\SiteController");
    assert!(analysis.checker.check_call(&frontend, &call.call).is_empty());

    let backend = fixture.join("backend/controllers/SiteController.php");
    let call = SourceCall::with_array("render", "index", &["title"])
        .in_class("backend\\controllers\\SiteController");
    let findings = analysis.checker.check_call(&backend, &call.call);

    let missing: Vec<_> =
        findings.iter().filter(|f| f.kind == FindingKind::MissingRequired).cloned().collect();
    let unused: Vec<_> =
        findings.iter().filter(|f| f.kind == FindingKind::UnusedSupplied).cloned().collect();
    assert_eq!(reported(&missing), vec!["period", "stats"]);
    assert_eq!(reported(&unused), vec!["title"]);
    assert!(missing.iter().all(|f| f.anchor == call.call.span));
    Ok(())
}

#[test]
fn test_template_in_other_application_only_is_silent() -> Result<()> {
    let fixture = shop()?;
    fixture.write("backend/views/report/summary.php", "<?= $total ?>")?;
    let analysis = Analysis::new(&fixture, InspectionOptions::default())?;

    let frontend = fixture.join("frontend/controllers/ReportController.php");
    let call = SourceCall::new("render", "summary")
        .in_class("frontend\\controllers\\ReportController");
    assert!(analysis.checker.check_call(&frontend, &call.call).is_empty());

    let backend = fixture.join("backend/controllers/ReportController.php");
    let call = SourceCall::new("render", "summary")
        .in_class("backend\\controllers\\ReportController");
    let findings = analysis.checker.check_call(&backend, &call.call);
    assert_eq!(reported(&findings), vec!["total"]);
    Ok(())
}

#[test]
fn test_file_outside_any_application_is_silent() -> Result<()> {
    let fixture = shop()?;
    let analysis = Analysis::new(&fixture, InspectionOptions::default())?;

    let loose = fixture.write("bootstrap.php", "<?php\n")?;
    let call = SourceCall::new("render", "//site/index");
    assert!(analysis.checker.check_call(&loose, &call.call).is_empty());
    Ok(())
}

#[test]
fn test_single_application_project() -> Result<()> {
    let fixture = ProjectFixture::single_app()?;
    fixture.write("views/site/about.php", "<p><?= $company ?>, <?= $year ?></p>")?;
    let analysis = Analysis::new(&fixture, InspectionOptions::default())?;
    assert_eq!(analysis.index.len(), 1);

    let controller = fixture.join("controllers/SiteController.php");
    let call = SourceCall::with_compact("render", "about", &["company"])
        .in_class("app\\controllers\\SiteController");
    let findings = analysis.checker.check_call(&controller, &call.call);
    assert_eq!(reported(&findings), vec!["year"]);
    assert_eq!(findings[0].message, "View 'about' requires \"year\" parameter.");
    Ok(())
}
