//! Hook overrides from code and from configuration files.

use binresolve::binary::Binary;
use binresolve::config::Config;
use binresolve::core::BinError;
use binresolve::overrides::{Handler, HandlerRegistry, Hook, HookOverrides};
use binresolve::test_utils::{FakeBinDir, dir_provider};
use binresolve::version::SemVer;
use std::path::PathBuf;
use std::sync::Arc;

#[test]
fn external_handler_is_resolved_when_the_hook_fires() {
    let dir = FakeBinDir::new();
    dir.add_script("tool", "exit 1\n");
    let registry = Arc::new(HandlerRegistry::new());
    let provider = dir_provider("fake", &dir).with_registry(Arc::clone(&registry));

    let binary = Binary::new("tool", vec![Arc::new(provider)])
        .with_override("fake", HookOverrides::new().external(Hook::Version, "host.tool_version"));

    // declared before the host registered anything
    match binary.load().unwrap_err() {
        BinError::OverrideResolution {
            hook,
            reference,
            ..
        } => {
            assert_eq!(hook, "version");
            assert_eq!(reference, "host.tool_version");
        }
        other => panic!("unexpected error: {other:?}"),
    }

    registry.register("host.tool_version", |_ctx| Ok(Some(SemVer::new(4, 5, 6))));
    let loaded = binary.load().unwrap();
    assert!(loaded.is_valid());
    assert_eq!(loaded.version(), Some(SemVer::new(4, 5, 6)));
}

#[test]
fn computed_handler_sees_the_resolved_path() {
    let dir = FakeBinDir::new();
    let tool = dir.add_script("tool", "exit 1\n");
    let seen = Arc::new(std::sync::Mutex::new(None::<PathBuf>));
    let record = Arc::clone(&seen);

    let version: Handler<Option<SemVer>> = Handler::computed(move |ctx| {
        *record.lock().unwrap() = ctx.abspath.map(PathBuf::from);
        Ok(Some(SemVer::new(1, 0, 0)))
    });
    let binary = Binary::new("tool", vec![Arc::new(dir_provider("fake", &dir))])
        .with_override("fake", HookOverrides::new().version(version));

    assert!(binary.load().unwrap().is_valid());
    assert_eq!(seen.lock().unwrap().as_deref(), Some(tool.as_path()));
}

#[test]
fn abspath_override_beats_search() {
    let searched = FakeBinDir::new();
    let pinned = FakeBinDir::new();
    searched.add("tool", "tool 1.0.0");
    let pinned_tool = pinned.add("tool", "tool 2.0.0");

    let binary = Binary::new("tool", vec![Arc::new(dir_provider("fake", &searched))])
        .with_override("fake", HookOverrides::new().abspath(Some(pinned_tool.clone())));
    let loaded = binary.load().unwrap();
    assert_eq!(loaded.abspath(), Some(pinned_tool.as_path()));
    assert_eq!(loaded.version(), Some(SemVer::new(2, 0, 0)));
}

#[test]
fn config_overrides_reach_the_env_provider() {
    let bins = FakeBinDir::new();
    let pinned = FakeBinDir::new();
    bins.add("jq", "jq-1.6");
    let pinned_jq = pinned.add("jq", "jq-1.7.1");

    let temp = tempfile::tempdir().unwrap();
    let path = temp.path().join("config.toml");
    std::fs::write(
        &path,
        format!(
            r#"
providers = ["env"]

[env]
path = ["{bins}"]

[binaries.jq]
description = "json processor"
min_version = ">=1.7"

[binaries.jq.overrides.env]
abspath = "{pinned}"
"#,
            bins = bins.path().display(),
            pinned = pinned_jq.display(),
        ),
    )
    .unwrap();

    let config = Config::load_from(&path).unwrap();
    let jq = config.binary("jq", &[]).unwrap().load().unwrap();
    assert!(jq.is_valid());
    assert_eq!(jq.abspath(), Some(pinned_jq.as_path()));
    assert_eq!(jq.version(), Some(SemVer::new(1, 7, 1)));
    assert_eq!(jq.description(), "json processor");
}
