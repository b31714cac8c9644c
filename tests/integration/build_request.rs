//! Integration tests for build requests against an on-disk package repository.

use anyhow::Result;
use dtk_build::build::{BuildRequest, ModulePrefix};
use dtk_build::core::{DtkError, ErrorClass, user_friendly_error};
use dtk_build::repository::BuildStatus;
use dtk_build::test_utils::{PackagesFixture, TOOLKIT_REQUEST_JSON, init_test_logging};

#[test]
fn test_toolkit_request_profile() -> Result<()> {
    init_test_logging(None);
    let fixture = PackagesFixture::new()?;
    let dojo = fixture.install("dojo", "1.9")?;

    let request = BuildRequest::from_json(TOOLKIT_REQUEST_JSON)?;
    let profile = request.profile_text(&fixture.repository())?;

    let expected_prefix = serde_json::to_string(&ModulePrefix::new("dojo", std::path::absolute(&dojo)?.join("dojo")))?;
    assert!(profile.starts_with("dependencies = {"));
    assert!(profile.ends_with("};"));
    assert!(profile.contains(r#"{"dependencies":["dojo.parser"],"name":"dojo.js"}"#));
    assert!(profile.contains(r#""layerOptimize":"closure""#));
    assert!(profile.contains(r#""cssOptimize":"comments""#));
    assert!(profile.contains(&format!(r#""prefixes":[{expected_prefix}]"#)), "{profile}");
    Ok(())
}

#[test]
fn test_multi_package_request() -> Result<()> {
    let fixture = PackagesFixture::new()?;
    fixture.install("dojo", "1.9")?;
    fixture.install("dijit", "1.9")?;
    fixture.install("app", "3.1")?;

    let request = BuildRequest::from_json(
        r#"{
            "packages": [
                {"name": "dojo", "version": "1.9"},
                {"name": "dijit", "version": "1.9"},
                {"name": "app", "version": "3.1"}
            ],
            "optimise": "shrinksafe",
            "layers": [
                {"name": "dojo.js", "modules": [
                    {"name": "dojo/parser", "package": "dojo"},
                    {"name": "dijit/form/Button", "package": "dijit"}
                ]},
                {"name": "app.js", "modules": [
                    {"name": "app/main", "package": "app"},
                    {"name": "dijit/Dialog", "package": "dijit"},
                    {"name": "dojox/grid/DataGrid", "package": "dojo"}
                ]}
            ]
        }"#,
    )?;

    let prefixes = request.module_prefixes(&fixture.repository())?;
    let names: Vec<&str> = prefixes.iter().map(ModulePrefix::prefix).collect();
    assert_eq!(names, vec!["dojo", "dijit", "app", "dojox"]);
    assert!(prefixes[3].location().ends_with("dojo/1.9/dojox"));
    assert!(prefixes.iter().all(|p| p.location().is_absolute()));
    Ok(())
}

#[test]
fn test_missing_installation_is_internal() -> Result<()> {
    let fixture = PackagesFixture::new()?;
    fixture.install("dojo", "1.6")?;

    let request = BuildRequest::from_json(TOOLKIT_REQUEST_JSON)?;
    let err = request.profile_text(&fixture.repository()).unwrap_err();
    assert!(matches!(&err, DtkError::PackageNotFound { version, .. } if version == "1.9"));
    assert_eq!(err.class(), ErrorClass::Internal);
    Ok(())
}

#[test]
fn test_undeclared_package_is_client_error() -> Result<()> {
    let fixture = PackagesFixture::new()?;
    fixture.install("dojo", "1.9")?;

    let request = BuildRequest::from_json(
        r#"{"packages": [{"name": "dojo", "version": "1.9"}],
            "layers": [{"name": "app.js", "modules": [{"name": "app/main", "package": "app"}]}]}"#,
    )?;
    let err = request.profile_text(&fixture.repository()).unwrap_err();
    assert_eq!(err.class(), ErrorClass::Client);

    let context = user_friendly_error(anyhow::Error::from(err));
    assert!(context.suggestion.as_deref().is_some_and(|s| s.contains("'app'")));
    Ok(())
}

#[test]
fn test_result_paths_under_cache() -> Result<()> {
    let fixture = PackagesFixture::new()?;
    let cache = fixture.cache();
    let request = BuildRequest::from_json(TOOLKIT_REQUEST_JSON)?;

    let dir = cache.cache_root().join(request.reference().as_str());
    assert_eq!(request.result_dir(&cache), dir);
    assert_eq!(request.result_archive_path(&cache), dir.join("dojo.zip"));
    assert_eq!(request.layer_output_paths(&cache), vec![dir.join("dojo").join("dojo").join("dojo.js")]);
    // Deriving paths creates nothing.
    assert!(!dir.exists());
    Ok(())
}

#[test]
fn test_toolkit_location() -> Result<()> {
    let fixture = PackagesFixture::new()?;
    let dojo = fixture.install("dojo", "1.9")?;

    let request = BuildRequest::from_json(TOOLKIT_REQUEST_JSON)?;
    assert_eq!(request.toolkit_version(), Some("1.9"));
    assert_eq!(request.toolkit_location(&fixture.repository())?, Some(std::path::absolute(dojo)?));
    Ok(())
}

#[test]
fn test_malformed_requests_rejected() {
    for json in ["", "[]", r#"{"packages": {}, "layers": []}"#, r#"{"packages": [], "layers": [{"name": "x"}]}"#] {
        let err = BuildRequest::from_json(json).unwrap_err();
        assert!(err.is_client_error(), "{json}: {err}");
    }
}

#[test]
fn test_unsafe_layer_names_rejected() {
    for name in ["/etc/cron.d/evil", "../../../../tmp/x.js", "dojo/../../x.js"] {
        let json = format!(
            r#"{{"packages": [{{"name": "dojo", "version": "1.9"}}],
                "layers": [{{"name": {name:?}, "modules": [{{"name": "dojo.parser", "package": "dojo"}}]}}]}}"#
        );
        let err = BuildRequest::from_json(&json).unwrap_err();
        assert!(matches!(err, DtkError::InvalidRequest { .. }), "{name}: {err}");
        assert_eq!(err.class(), ErrorClass::Client);
    }
}

#[test]
fn test_module_without_namespace_rejected() {
    for name in [".parser", "/abs"] {
        let json = format!(
            r#"{{"packages": [{{"name": "dojo", "version": "1.9"}}],
                "layers": [{{"name": "dojo.js", "modules": [{{"name": {name:?}, "package": "dojo"}}]}}]}}"#
        );
        let err = BuildRequest::from_json(&json).unwrap_err();
        assert!(err.to_string().contains("namespace prefix"), "{name}: {err}");
    }
}
