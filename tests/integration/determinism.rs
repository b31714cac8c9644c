//! Build reference determinism and ordering policy.

use anyhow::Result;
use dtk_build::build::{BuildParameters, BuildRequest, Layer, LayerModule, PackageRef};
use dtk_build::test_utils::TOOLKIT_REQUEST_JSON;
use std::collections::HashSet;

fn layer(name: &str, modules: &[&str]) -> Layer {
    Layer::new(name, modules.iter().map(|m| LayerModule::new(*m, "dojo")).collect())
}

fn params(layers: Vec<Layer>) -> BuildParameters {
    BuildParameters {
        packages: vec![PackageRef::new("dojo", "1.9"), PackageRef::new("dijit", "1.9")],
        optimise: "closure".to_string(),
        layers,
        ..BuildParameters::default()
    }
}

#[test]
fn test_equal_requests_share_reference() -> Result<()> {
    let first = BuildRequest::from_json(TOOLKIT_REQUEST_JSON)?;
    let second = BuildRequest::from_json(TOOLKIT_REQUEST_JSON)?;
    assert_eq!(first.reference(), second.reference());

    // Formatting of the submitted JSON does not matter.
    let compact: serde_json::Value = serde_json::from_str(TOOLKIT_REQUEST_JSON)?;
    let third = BuildRequest::from_json(&compact.to_string())?;
    assert_eq!(first.reference(), third.reference());
    Ok(())
}

#[test]
fn test_module_order_is_significant() -> Result<()> {
    let forward = BuildRequest::new(params(vec![layer("dojo.js", &["dojo.parser", "dojo.on"])]))?;
    let reversed = BuildRequest::new(params(vec![layer("dojo.js", &["dojo.on", "dojo.parser"])]))?;
    assert_ne!(forward.reference(), reversed.reference());
    Ok(())
}

#[test]
fn test_layer_and_package_order_are_significant() -> Result<()> {
    let base = params(vec![layer("a.js", &["dojo.a"]), layer("b.js", &["dojo.b"])]);

    let mut layers_swapped = base.clone();
    layers_swapped.layers.reverse();

    let mut packages_swapped = base.clone();
    packages_swapped.packages.reverse();

    let references: HashSet<String> = [base, layers_swapped, packages_swapped]
        .into_iter()
        .map(|p| BuildRequest::new(p).map(|r| r.reference().to_string()))
        .collect::<Result<_, _>>()?;
    assert_eq!(references.len(), 3);
    Ok(())
}

#[test]
fn test_every_field_feeds_the_reference() -> Result<()> {
    let base = params(vec![layer("dojo.js", &["dojo.parser"])]);
    let mut variants = vec![base.clone()];

    let mut p = base.clone();
    p.cdn = "google".to_string();
    variants.push(p);
    let mut p = base.clone();
    p.optimise = "shrinksafe".to_string();
    variants.push(p);
    let mut p = base.clone();
    p.css_optimise = "comments.keepLines".to_string();
    variants.push(p);
    let mut p = base.clone();
    p.platforms = "ie6".to_string();
    variants.push(p);
    let mut p = base.clone();
    p.themes = "tundra".to_string();
    variants.push(p);
    let mut p = base.clone();
    p.packages[1].version = "1.8".to_string();
    variants.push(p);
    let mut p = base.clone();
    p.layers[0].name = "main.js".to_string();
    variants.push(p);
    let mut p = base;
    p.layers[0].modules[0].package = "dijit".to_string();
    variants.push(p);

    let count = variants.len();
    let references: HashSet<String> = variants
        .into_iter()
        .map(|p| BuildRequest::new(p).map(|r| r.reference().to_string()))
        .collect::<Result<_, _>>()?;
    assert_eq!(references.len(), count);
    Ok(())
}

#[test]
fn test_reference_stable_across_threads() -> Result<()> {
    let expected = BuildRequest::from_json(TOOLKIT_REQUEST_JSON)?.reference().to_string();
    let handles: Vec<_> = (0..8)
        .map(|_| std::thread::spawn(|| BuildRequest::from_json(TOOLKIT_REQUEST_JSON).map(|r| r.reference().to_string())))
        .collect();
    for handle in handles {
        let reference = handle.join().map_err(|_| anyhow::anyhow!("thread panicked"))??;
        assert_eq!(reference, expected);
    }
    Ok(())
}
