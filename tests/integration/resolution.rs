//! Template paths written relative to modules, views, widgets and aliases.

use anyhow::Result;
use view_params::inspection::InspectionOptions;
use view_params::test_utils::{ProjectFixture, SourceCall};

use super::{Analysis, reported};

fn project() -> Result<ProjectFixture> {
    let fixture = ProjectFixture::multi_app(&["frontend", "backend"])?;
    fixture.write("frontend/views/site/index.php", "<?= $title ?>")?;
    fixture.write("frontend/views/site/_form.php", "<?= $model ?>")?;
    fixture.write("frontend/views/layouts/main.php", "<?= $content ?>")?;
    fixture.write("frontend/views/post-comment/view.php", "<?= $comment ?>")?;
    fixture.write("frontend/widgets/views/menu.php", "<?php foreach ($items as $item) {} ?>")?;
    fixture.write("backend/modules/admin/views/user/index.php", "<?= $users ?>")?;
    fixture.write("backend/modules/admin/views/dashboard.php", "<?= $stats ?>")?;
    Ok(fixture)
}

#[test]
fn test_controller_relative_paths() -> Result<()> {
    let fixture = project()?;
    let analysis = Analysis::new(&fixture, InspectionOptions::default())?;

    let file = fixture.join("frontend/controllers/PostCommentController.php");
    let call = SourceCall::new("render", "view")
        .in_class("frontend\\controllers\\PostCommentController");
    assert_eq!(reported(&analysis.checker.check_call(&file, &call.call)), vec!["comment"]);

    let call = SourceCall::new("render", "../site/index")
        .in_class("frontend\\controllers\\PostCommentController");
    assert_eq!(reported(&analysis.checker.check_call(&file, &call.call)), vec!["title"]);
    Ok(())
}

#[test]
fn test_application_absolute_and_alias_paths() -> Result<()> {
    let fixture = project()?;
    let analysis = Analysis::new(&fixture, InspectionOptions::default())?;
    let file = fixture.join("frontend/controllers/OrderController.php");

    for template in ["//layouts/main", "@app/views/layouts/main", "@frontend/views/layouts/main"] {
        let call = SourceCall::new("renderPartial", template)
            .in_class("frontend\\controllers\\OrderController");
        let findings = analysis.checker.check_call(&file, &call.call);
        assert_eq!(reported(&findings), vec!["content"], "template {template}");
    }

    let call = SourceCall::new("render", "@backend/views/layouts/main")
        .in_class("frontend\\controllers\\OrderController");
    assert!(analysis.checker.check_call(&file, &call.call).is_empty());
    Ok(())
}

#[test]
fn test_module_paths() -> Result<()> {
    let fixture = project()?;
    let analysis = Analysis::new(&fixture, InspectionOptions::default())?;
    let file = fixture.join("backend/modules/admin/controllers/UserController.php");

    let call = SourceCall::with_array("render", "index", &["users"])
        .in_class("backend\\modules\\admin\\controllers\\UserController");
    assert!(analysis.checker.check_call(&file, &call.call).is_empty());

    let call = SourceCall::new("render", "/dashboard")
        .in_class("backend\\modules\\admin\\controllers\\UserController");
    assert_eq!(reported(&analysis.checker.check_call(&file, &call.call)), vec!["stats"]);
    Ok(())
}

#[test]
fn test_view_and_widget_relative_paths() -> Result<()> {
    let fixture = project()?;
    let analysis = Analysis::new(&fixture, InspectionOptions::default())?;

    let view = fixture.join("frontend/views/site/index.php");
    let call = SourceCall::new("render", "_form");
    assert_eq!(reported(&analysis.checker.check_call(&view, &call.call)), vec!["model"]);

    let widget = fixture.join("frontend/widgets/Menu.php");
    let call = SourceCall::with_compact("render", "menu", &["items", "active"])
        .in_class("frontend\\widgets\\Menu");
    assert_eq!(reported(&analysis.checker.check_call(&widget, &call.call)), vec!["active"]);

    let script = fixture.join("frontend/web/index.php");
    let call = SourceCall::new("render", "menu");
    assert!(analysis.checker.check_call(&script, &call.call).is_empty());
    Ok(())
}

#[test]
fn test_configured_render_methods_and_extension() -> Result<()> {
    let fixture = ProjectFixture::multi_app(&["frontend"])?;
    fixture.write_config(
        "default_view_extension = \"tpl\"\nrender_methods = [\"render\", \"renderView\"]\n",
    )?;
    fixture.write("frontend/views/site/index.tpl", "<?= $title ?>")?;
    fixture.write("frontend/views/site/index.php", "<?= $ignored ?>")?;
    let analysis = Analysis::configured(&fixture)?;
    assert_eq!(analysis.index.len(), 1);

    let file = fixture.join("frontend/controllers/SiteController.php");
    let call = SourceCall::new("renderView", "index")
        .in_class("frontend\\controllers\\SiteController");
    assert_eq!(reported(&analysis.checker.check_call(&file, &call.call)), vec!["title"]);

    let call = SourceCall::new("renderAjax", "index")
        .in_class("frontend\\controllers\\SiteController");
    assert!(analysis.checker.check_call(&file, &call.call).is_empty());

    let call = SourceCall::new("render", "index.php")
        .in_class("frontend\\controllers\\SiteController");
    assert!(analysis.checker.check_call(&file, &call.call).is_empty());
    Ok(())
}
