//! Wiring collaborators from the service configuration.

use anyhow::Result;
use dtk_build::analysis::{LocalPage, ModuleFormat, PageAnalyzer, ScriptContext};
use dtk_build::build::BuildRequest;
use dtk_build::config::ServiceConfig;
use dtk_build::repository::{BuildStatus, CacheDirectory, FsPackageRepository};
use dtk_build::test_utils::{PackagesFixture, TOOLKIT_REQUEST_JSON};

#[test]
fn test_configured_collaborators() -> Result<()> {
    let fixture = PackagesFixture::new()?;
    fixture.install("dojo", "1.9")?;

    let config_path = fixture.cache_dir().join("config.toml");
    let config = ServiceConfig {
        cache_dir: fixture.cache_dir().to_string_lossy().into_owned(),
        packages_dir: fixture.packages_dir().to_string_lossy().into_owned(),
        ..ServiceConfig::default()
    };
    config.save_to(&config_path)?;

    let loaded = ServiceConfig::load_with_optional(Some(config_path))?;
    let repository = FsPackageRepository::from_config(&loaded)?;
    let cache = CacheDirectory::from_config(&loaded)?;

    let request = BuildRequest::from_json(TOOLKIT_REQUEST_JSON)?;
    assert!(request.profile_text(&repository)?.contains("dojo.parser"));
    assert!(request.result_dir(&cache).starts_with(cache.cache_root()));
    Ok(())
}

#[test]
fn test_configured_loader_and_format() -> Result<()> {
    let config: ServiceConfig = toml::from_str(
        r#"
loader_patterns = ["(^|/)loader\\.js$"]
default_module_format = "amd"
"#,
    )?;

    let page = LocalPage::from_config(&config)?
        .script(ScriptContext::external("dojo/dojo.js"))
        .script(ScriptContext::inline(r#"require(["too/early"]);"#))
        .script(ScriptContext::external("lib/loader.js"))
        .script(ScriptContext::inline(r#"require(["app/main"]);"#));

    let analyzer = PageAnalyzer::analyze(&page);
    assert_eq!(analyzer.module_format(), ModuleFormat::Amd);
    let modules = analyzer.modules()?;
    assert!(modules.contains("app", "app/main"));
    assert!(!modules.contains("too", "too/early"));
    Ok(())
}
