//! Checking many files and aborting a batch.

use anyhow::Result;
use std::path::PathBuf;
use view_params::core::CancellationToken;
use view_params::inspection::InspectionOptions;
use view_params::syntax::RenderCall;
use view_params::test_utils::{ProjectFixture, SourceCall};

use super::{Analysis, reported};

fn batch(fixture: &ProjectFixture, files: usize) -> Vec<(PathBuf, Vec<RenderCall>)> {
    (0..files)
        .map(|n| {
            let file = fixture.join(&format!("frontend/controllers/Page{n}Controller.php"));
            let class = format!("frontend\\controllers\\Page{n}Controller");
            let calls = vec![
                SourceCall::new("render", "//site/index").in_class(&class).call,
                SourceCall::with_array("render", "//site/index", &["title"])
                    .in_class(&class)
                    .call,
            ];
            (file, calls)
        })
        .collect()
}

#[test]
fn test_batch_over_many_files() -> Result<()> {
    let fixture = ProjectFixture::multi_app(&["frontend"])?;
    fixture.write("frontend/views/site/index.php", "<?= $title ?>")?;
    let analysis = Analysis::new(&fixture, InspectionOptions::default())?;

    let files = batch(&fixture, 24);
    let findings = analysis.checker.check_files(&files, &CancellationToken::new())?;
    assert_eq!(findings.len(), 24);
    assert_eq!(reported(&findings), vec!["title"; 24]);
    Ok(())
}

#[test]
fn test_cancelled_batch_returns_error() -> Result<()> {
    let fixture = ProjectFixture::multi_app(&["frontend"])?;
    fixture.write("frontend/views/site/index.php", "<?= $title ?>")?;
    let analysis = Analysis::new(&fixture, InspectionOptions::default())?;

    let cancel = CancellationToken::new();
    cancel.cancel();
    let error = analysis
        .checker
        .check_files(&batch(&fixture, 4), &cancel)
        .expect_err("cancelled batch must fail");
    assert!(error.is_cancelled());

    let file = fixture.join("frontend/controllers/Page0Controller.php");
    assert!(analysis.checker.check_file(&file, &[], &cancel).is_ok());
    Ok(())
}
