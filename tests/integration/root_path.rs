//! Projects whose applications live below a configured root directory.

use anyhow::Result;
use view_params::application::ApplicationId;
use view_params::test_utils::{ProjectFixture, SourceCall};

use super::{Analysis, reported};

#[test]
fn test_configured_root() -> Result<()> {
    let fixture = ProjectFixture::new()?;
    fixture.write_config("root_path = \"apps\"\n")?;
    fixture.mkdir("apps/frontend/controllers")?;
    fixture.mkdir("apps/backend/controllers")?;
    fixture.write("apps/backend/views/site/index.php", "<?= $stats ?>")?;
    let analysis = Analysis::configured(&fixture)?;

    let file = fixture.join("apps/backend/controllers/SiteController.php");
    assert_eq!(analysis.scopes.resolve(&file, &analysis.project), ApplicationId::new("backend"));
    let call = SourceCall::new("render", "index")
        .in_class("backend\\controllers\\SiteController");
    assert_eq!(reported(&analysis.checker.check_call(&file, &call.call)), vec!["stats"]);
    Ok(())
}

#[test]
fn test_partially_missing_root_falls_back_to_deepest_existing_directory() -> Result<()> {
    let fixture = ProjectFixture::new()?;
    fixture.write_config("root_path = \"src/apps/legacy\"\n")?;
    fixture.mkdir("src/frontend/controllers")?;
    fixture.write("src/frontend/views/site/index.php", "<?= $title ?>")?;
    let analysis = Analysis::configured(&fixture)?;

    assert_eq!(analysis.scopes.root(&analysis.project), fixture.join("src"));
    assert_eq!(analysis.index.len(), 1);

    let file = fixture.join("src/frontend/controllers/SiteController.php");
    let call = SourceCall::new("render", "index")
        .in_class("frontend\\controllers\\SiteController");
    assert_eq!(reported(&analysis.checker.check_call(&file, &call.call)), vec!["title"]);
    Ok(())
}

#[test]
fn test_single_application_below_root() -> Result<()> {
    let fixture = ProjectFixture::new()?;
    fixture.write_config("root_path = \"app\"\n")?;
    fixture.mkdir("app/controllers")?;
    fixture.write("app/views/site/index.php", "<?= $title ?>")?;
    let analysis = Analysis::configured(&fixture)?;

    let file = fixture.join("app/controllers/SiteController.php");
    assert_eq!(analysis.scopes.resolve(&file, &analysis.project), ApplicationId::single());
    let call = SourceCall::with_array("render", "index", &["title"])
        .in_class("app\\controllers\\SiteController");
    assert!(analysis.checker.check_call(&file, &call.call).is_empty());
    Ok(())
}
