//! Building the template index from disk and keeping it current.

use anyhow::Result;
use std::collections::BTreeSet;
use view_params::application::ApplicationId;
use view_params::inspection::InspectionOptions;
use view_params::test_utils::{ProjectFixture, SourceCall};
use view_params::view::{TemplateIndex, TemplateKey};

use super::{Analysis, reported};

const PROFILE_TEMPLATE: &str = r#"<?php
/* @var $this yii\web\View */
use yii\helpers\Html;

$this->title = $user->name;
$fullName = $user->first . ' ' . $user->last;
?>
<h1><?= Html::encode($fullName) ?></h1>
<?php foreach ($posts as $i => $post): ?>
    <article data-index="<?= $i ?>"><?= $post->title ?></article>
<?php endforeach; ?>
<?php if (isset($footer)): ?>
    <footer><?= $footer ?></footer>
<?php endif; ?>
<script>
    var greeting = "Hello $visitor";
</script>
"#;

#[test]
fn test_build_extracts_parameters_from_disk() -> Result<()> {
    let fixture = ProjectFixture::multi_app(&["frontend"])?;
    let path = fixture.write("frontend/views/user/profile.php", PROFILE_TEMPLATE)?;
    fixture.write("frontend/controllers/UserController.php", "<?php\n")?;
    fixture.write("frontend/models/User.php", "<?php echo $notATemplate;")?;
    let analysis = Analysis::new(&fixture, InspectionOptions::default())?;

    assert_eq!(analysis.index.len(), 1);
    let key = TemplateKey::from_canonical("@app/views/user/profile.php");
    let records = analysis.index.lookup(&key);
    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert_eq!(record.application, ApplicationId::new("frontend"));
    assert_eq!(record.path, path);
    let expected: BTreeSet<String> =
        ["footer", "posts", "user"].iter().map(|s| (*s).to_string()).collect();
    assert_eq!(record.parameters, expected);
    Ok(())
}

#[test]
fn test_edits_to_a_template_change_findings() -> Result<()> {
    let fixture = ProjectFixture::multi_app(&["frontend"])?;
    let template = fixture.write("frontend/views/site/index.php", "<?= $title ?>")?;
    let analysis = Analysis::new(&fixture, InspectionOptions::default())?;

    let controller = fixture.join("frontend/controllers/SiteController.php");
    let call = SourceCall::with_array("render", "index", &["title"])
        .in_class("frontend\\controllers\\SiteController");
    assert!(analysis.checker.check_call(&controller, &call.call).is_empty());

    let key = analysis.index.upsert_file(&template, "<?= $title ?> <?= $subtitle ?>");
    assert_eq!(key, Some(TemplateKey::from_canonical("@app/views/site/index.php")));
    let findings = analysis.checker.check_call(&controller, &call.call);
    assert_eq!(reported(&findings), vec!["subtitle"]);

    assert!(analysis.index.remove_file(&template));
    assert!(analysis.checker.check_call(&controller, &call.call).is_empty());
    assert!(!analysis.index.remove_file(&template));
    Ok(())
}

#[test]
fn test_rescan_picks_up_new_and_deleted_files() -> Result<()> {
    let fixture = ProjectFixture::multi_app(&["frontend", "backend"])?;
    let first = fixture.write("frontend/views/site/index.php", "<?= $a ?>")?;
    let analysis = Analysis::new(&fixture, InspectionOptions::default())?;
    assert_eq!(analysis.index.len(), 1);

    fixture.write("backend/views/site/index.php", "<?= $b ?>")?;
    fixture.write("backend/modules/admin/views/user/list.php", "<?= $users ?>")?;
    std::fs::remove_file(&first)?;
    assert_eq!(analysis.index.rescan()?, 2);

    let key = TemplateKey::from_canonical("@app/views/site/index.php");
    let records = analysis.index.lookup(&key);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].application, ApplicationId::new("backend"));

    let module_key = TemplateKey::from_canonical("@app/modules/admin/views/user/list.php");
    assert_eq!(analysis.index.lookup(&module_key).len(), 1);
    Ok(())
}

#[test]
fn test_legacy_encoded_template_is_indexed() -> Result<()> {
    let fixture = ProjectFixture::multi_app(&["frontend"])?;
    fixture.write("frontend/views/site/index.php", "<?= $title ?>")?;
    let latin1 = fixture.join("frontend/views/site/menu.php");
    std::fs::write(&latin1, b"<p>Caf\xE9 <?= $dish ?></p>")?;
    let analysis = Analysis::new(&fixture, InspectionOptions::default())?;

    assert_eq!(analysis.index.len(), 2);
    let controller = fixture.join("frontend/controllers/SiteController.php");
    let call = SourceCall::new("render", "menu")
        .in_class("frontend\\controllers\\SiteController");
    let findings = analysis.checker.check_call(&controller, &call.call);
    assert_eq!(reported(&findings), vec!["dish"]);
    Ok(())
}

#[test]
fn test_template_using_nothing_flags_the_argument() -> Result<()> {
    let fixture = ProjectFixture::multi_app(&["frontend"])?;
    fixture.write("frontend/views/site/static.php", "<p>Nothing dynamic here.</p>\n")?;
    let analysis = Analysis::new(&fixture, InspectionOptions::default())?;

    let controller = fixture.join("frontend/controllers/SiteController.php");
    let call = SourceCall::with_array("render", "static", &["model", "extra"])
        .in_class("frontend\\controllers\\SiteController");
    let findings = analysis.checker.check_call(&controller, &call.call);
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].message, "This view does not use parameters");
    assert_eq!(Some(findings[0].anchor), call.call.params_arg().map(|arg| arg.span()));

    let bare = SourceCall::new("render", "static")
        .in_class("frontend\\controllers\\SiteController");
    assert!(analysis.checker.check_call(&controller, &bare.call).is_empty());
    Ok(())
}
