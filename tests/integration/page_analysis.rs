//! Integration tests for page analysis.

use anyhow::Result;
use dtk_build::analysis::{LocalPage, ModuleFormat, PageAnalyzer, ParsePhase, ScriptContext};
use dtk_build::core::DtkError;
use dtk_build::test_utils::{SiteFixture, init_test_logging};

fn lists(analyzer: &PageAnalyzer) -> Vec<(String, Vec<String>)> {
    analyzer.modules().map(|modules| modules.to_lists()).unwrap_or_default()
}

fn owned(package: &str, modules: &[&str]) -> (String, Vec<String>) {
    (package.to_string(), modules.iter().map(|m| m.to_string()).collect())
}

/// Configuration, loader, then an AMD script: only the last contributes.
#[test]
fn test_amd_page_after_loader() -> Result<()> {
    init_test_logging(None);
    let page = LocalPage::new()
        .script(ScriptContext::inline("var dojoConfig = { async: true, baseUrl: 'js/' };"))
        .script(ScriptContext::external("js/dojo/dojo.js"))
        .script(ScriptContext::inline(
            r#"require(["app/main", "app/widgets/Grid"], function (main, Grid) { main.start(Grid); });"#,
        ));

    let analyzer = PageAnalyzer::analyze(&page);
    assert_eq!(analyzer.phase(), ParsePhase::PostLoader);
    assert_eq!(analyzer.module_format(), ModuleFormat::Amd);
    assert_eq!(lists(&analyzer), vec![owned("app", &["app/main", "app/widgets/Grid"])]);

    let json = serde_json::to_string(analyzer.modules()?)?;
    assert_eq!(json, r#"{"app":["app/main","app/widgets/Grid"]}"#);
    Ok(())
}

#[test]
fn test_scripts_before_loader_are_never_scanned() -> Result<()> {
    let page = LocalPage::new()
        .with_module_format(ModuleFormat::Amd)
        .script(ScriptContext::inline(r#"require(["early/config"]);"#))
        .script(ScriptContext::external("dojo/dojo.js"))
        .script(ScriptContext::inline(r#"define(["late/widget"], function () {});"#));

    let analyzer = PageAnalyzer::analyze(&page);
    let modules = analyzer.modules()?;
    assert!(!modules.contains("early", "early/config"));
    assert!(modules.contains("late", "late/widget"));
    assert_eq!(analyzer.scanned_scripts(), 1);
    Ok(())
}

#[test]
fn test_page_without_loader_discovers_nothing() -> Result<()> {
    let page = LocalPage::new()
        .with_module_format(ModuleFormat::Amd)
        .script(ScriptContext::inline(r#"require(["app/main"]);"#));

    let analyzer = PageAnalyzer::analyze(&page);
    assert_eq!(analyzer.phase(), ParsePhase::PreLoader);
    assert!(!analyzer.found_loader());
    assert!(analyzer.modules()?.is_empty());
    Ok(())
}

#[test]
fn test_legacy_page_with_external_scripts() -> Result<()> {
    let site = SiteFixture::new()?;
    site.write_script(
        "js/app/boot.js",
        "dojo.require(\"dijit.Dialog\");\ndojo.require('dijit.form.Button');\n// dojo.require('dijit.Tree');\n",
    )?;
    site.write_script("js/app/more.js", "dojo.require(\"dijit.Dialog\");\ndojo[\"require\"](\"dojox.grid.DataGrid\");")?;

    let page = site
        .page()
        .script(ScriptContext::external("js/dojo/dojo.js"))
        .script(ScriptContext::external("js/app/boot.js"))
        .script(ScriptContext::external("js/app/missing.js"))
        .script(ScriptContext::external("https://cdn.example.com/analytics.js"))
        .script(ScriptContext::external("js/app/more.js"));

    let analyzer = PageAnalyzer::analyze(&page);
    assert_eq!(analyzer.module_format(), ModuleFormat::NonAmd);
    assert_eq!(
        lists(&analyzer),
        vec![
            owned("dijit", &["dijit.Dialog", "dijit.form.Button"]),
            owned("dojox", &["dojox.grid.DataGrid"]),
        ]
    );
    assert_eq!(analyzer.scanned_scripts(), 2);
    assert_eq!(analyzer.skipped_scripts(), 2);
    Ok(())
}

#[test]
fn test_relative_identifiers_resolve_against_script_location() -> Result<()> {
    let site = SiteFixture::new()?;
    site.write_script("app/views/main.js", "define(['./Toolbar', '../store/Memory', 'dojo/on'], function () {});")?;

    let page = site
        .page()
        .script(ScriptContext::external("dojo/dojo.js").with_attribute("data-dojo-config", "async: true"))
        .script(ScriptContext::external("app/views/main.js"));

    let analyzer = PageAnalyzer::analyze(&page);
    assert_eq!(
        lists(&analyzer),
        vec![owned("app", &["app/views/Toolbar", "app/store/Memory"]), owned("dojo", &["dojo/on"])]
    );
    Ok(())
}

#[test]
fn test_duplicates_across_scripts_keep_first_position() -> Result<()> {
    let page = LocalPage::new()
        .with_module_format(ModuleFormat::Amd)
        .script(ScriptContext::external("dojo.js"))
        .script(ScriptContext::inline(r#"require(["app/a", "app/b"]);"#))
        .script(ScriptContext::inline(r#"require(["app/c", "app/a", "app/b"]);"#));

    let analyzer = PageAnalyzer::analyze(&page);
    assert_eq!(lists(&analyzer), vec![owned("app", &["app/a", "app/b", "app/c"])]);
    Ok(())
}

#[test]
fn test_analyzer_results_shared_across_threads() -> Result<()> {
    let page = LocalPage::new()
        .with_module_format(ModuleFormat::Amd)
        .script(ScriptContext::external("dojo.js"))
        .script(ScriptContext::inline(r#"require(["app/main"]);"#));
    let analyzer = std::sync::Arc::new(PageAnalyzer::analyze(&page));

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let analyzer = std::sync::Arc::clone(&analyzer);
            std::thread::spawn(move || analyzer.modules().map(|m| m.total_modules()).unwrap_or(0))
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.join().map_err(|_| anyhow::anyhow!("thread panicked"))?, 1);
    }
    Ok(())
}

#[test]
fn test_fatal_analysis_exposes_no_modules() {
    struct Unreadable;

    impl dtk_build::analysis::PageFlavor for Unreadable {
        fn scripts(&self) -> Result<Vec<ScriptContext>> {
            anyhow::bail!("page body could not be parsed")
        }

        fn script_text(&self, _script: &ScriptContext) -> Option<String> {
            None
        }

        fn is_loader_script(&self, _script: &ScriptContext) -> bool {
            false
        }
    }

    let analyzer = PageAnalyzer::analyze(&Unreadable);
    assert_eq!(analyzer.phase(), ParsePhase::Error);
    let err = analyzer.modules().unwrap_err();
    assert!(matches!(err, DtkError::FatalAnalysis { .. }));
    assert!(err.to_string().contains("page body could not be parsed"));
}
