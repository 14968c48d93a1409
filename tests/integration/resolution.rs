//! Ordered provider fallback through the public API.

use binresolve::binary::{AttemptAction, AttemptOutcome, Binary};
use binresolve::core::BinError;
use binresolve::test_utils::{FakeBinDir, dir_provider, init_test_logging};
use std::sync::Arc;

#[test]
fn missing_binary_loads_as_invalid() {
    init_test_logging(None);
    let dir = FakeBinDir::new();
    let binary = Binary::new("missingtool", vec![Arc::new(dir_provider("fake", &dir))]);

    let loaded = binary.load().unwrap();
    assert!(!loaded.is_valid());
    assert!(loaded.abspath().is_none());
    assert!(loaded.version().is_none());
    assert!(loaded.sha256().is_none());
    assert!(loaded.provider().is_none());
    assert!(matches!(loaded.exec(["--help"]), Err(BinError::NotLoaded { .. })));
}

#[test]
fn exhausted_install_lists_every_provider() {
    init_test_logging(None);
    let dir = FakeBinDir::new();
    let binary = Binary::new(
        "missingtool",
        vec![Arc::new(dir_provider("aa", &dir)), Arc::new(dir_provider("bb", &dir))],
    );

    let err = binary.install().unwrap_err();
    assert_eq!(err.to_string(), "None of the providers (aa, bb) could find or install 'missingtool'");
    let BinError::ResolutionFailed {
        attempts,
        ..
    } = err
    else {
        panic!("expected ResolutionFailed");
    };
    assert!(attempts.iter().all(|a| a.action == AttemptAction::Install));
    assert!(attempts.iter().all(|a| matches!(a.outcome, AttemptOutcome::Unavailable { .. })));
}

#[cfg(unix)]
mod unix {
    use super::*;
    use binresolve::provider::InstallerSpec;
    use binresolve::test_utils::counting_provider;
    use binresolve::version::SemVer;
    use std::sync::atomic::Ordering;

    #[test]
    fn first_declared_provider_wins() {
        let first = FakeBinDir::new();
        let second = FakeBinDir::new();
        let old = first.add("tool", "tool version 1.0.0");
        second.add("tool", "tool version 9.9.9");

        let binary = Binary::new(
            "tool",
            vec![Arc::new(dir_provider("first", &first)), Arc::new(dir_provider("second", &second))],
        );
        let loaded = binary.load().unwrap();
        assert_eq!(loaded.provider(), Some("first"));
        assert_eq!(loaded.abspath(), Some(old.as_path()));
        assert_eq!(loaded.version(), Some(SemVer::new(1, 0, 0)));
        assert_eq!(loaded.attempts().len(), 1);
    }

    #[test]
    fn load_is_idempotent() {
        let dir = FakeBinDir::new();
        dir.add("tool", "tool 2.4.1");
        let binary = Binary::new("tool", vec![Arc::new(dir_provider("fake", &dir))]);

        let a = binary.load().unwrap();
        let b = binary.load().unwrap();
        let c = a.load().unwrap();
        assert_eq!(a.snapshot(), b.snapshot());
        assert_eq!(a.loaded(), c.loaded());
    }

    #[test]
    fn load_or_install_skips_install_when_present() {
        let dir = FakeBinDir::new();
        dir.add("tool", "tool 1.2.3");
        let (provider, count) = counting_provider("counting", &dir, "5.0.0");
        let binary = Binary::new("tool", vec![Arc::new(provider)]);

        let loaded = binary.load_or_install().unwrap();
        assert_eq!(loaded.version(), Some(SemVer::new(1, 2, 3)));
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn load_or_install_installs_through_later_provider() {
        let empty = FakeBinDir::new();
        let target = FakeBinDir::new();
        let (installer, count) = counting_provider("counting", &target, "3.1.4");
        let binary =
            Binary::new("newtool", vec![Arc::new(dir_provider("readonly", &empty)), Arc::new(installer)]);

        let installed = binary.load_or_install().unwrap();
        assert!(installed.is_valid());
        assert_eq!(installed.provider(), Some("counting"));
        assert_eq!(installed.version(), Some(SemVer::new(3, 1, 4)));
        assert_eq!(count.load(Ordering::SeqCst), 1);

        let trail: Vec<String> = installed.attempts().iter().map(ToString::to_string).collect();
        assert_eq!(trail[0], "readonly (load): not found");
        assert_eq!(trail[1], "counting (load): not found");
        assert!(trail[2].starts_with("readonly (install): unavailable"));
        assert!(trail[3].starts_with("counting (install): resolved"));

        // a second resolution finds the installed copy without installing again
        let again = binary.load_or_install().unwrap();
        assert_eq!(again.provider(), Some("counting"));
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn min_version_mismatch_falls_through() {
        let old = FakeBinDir::new();
        let new = FakeBinDir::new();
        old.add("ytdlp", "2023.03.04");
        new.add("ytdlp", "2024.08.06");

        let binary = Binary::new(
            "ytdlp",
            vec![Arc::new(dir_provider("old", &old)), Arc::new(dir_provider("new", &new))],
        )
        .with_min_version(">=2024.1");
        let loaded = binary.load().unwrap();
        assert_eq!(loaded.provider(), Some("new"));
        assert_eq!(loaded.version(), Some(SemVer::new(2024, 8, 6)));
        assert!(matches!(loaded.attempts()[0].outcome, AttemptOutcome::VersionMismatch { .. }));

        let strict = binary.with_min_version(">=2025");
        assert!(!strict.load().unwrap().is_valid());
    }

    #[test]
    fn failing_installer_is_recorded_and_next_provider_used() {
        let broken = FakeBinDir::new();
        let good = FakeBinDir::new();
        broken.add_script("pm", "echo 'E: Unable to locate package newtool' >&2\nexit 100\n");
        // the installer is found on the provider's own search path
        let failing = dir_provider("broken", &broken).with_installer(InstallerSpec::new("pm").args(["install"]));
        let (fallback, _count) = counting_provider("fallback", &good, "1.0.0");

        let installed = Binary::new("newtool", vec![Arc::new(failing), Arc::new(fallback)]).install().unwrap();
        assert_eq!(installed.provider(), Some("fallback"));
        assert_eq!(
            installed.attempts()[0].outcome,
            AttemptOutcome::Failed {
                reason: "installer exited with code 100: E: Unable to locate package newtool".to_string()
            }
        );
    }

    #[test]
    fn exec_returns_output_unmodified() {
        let dir = FakeBinDir::new();
        dir.add_script(
            "greet",
            "case \"$1\" in --version) echo 'greet 0.1.0';; *) printf 'hello %s' \"$1\"; echo oops >&2; exit 3;; esac\n",
        );
        let greet = Binary::new("greet", vec![Arc::new(dir_provider("fake", &dir))]).load().unwrap();
        let output = greet.exec(["world"]).unwrap();
        assert_eq!(output.stdout, b"hello world");
        assert_eq!(output.stderr, b"oops\n");
        assert_eq!(output.code, Some(3));
        assert!(!output.success());
    }

    #[test]
    fn only_resolves_through_the_named_provider() {
        let first = FakeBinDir::new();
        let second = FakeBinDir::new();
        first.add("tool", "tool 1.0.0");
        second.add("tool", "tool 2.0.0");
        let binary = Binary::new(
            "tool",
            vec![Arc::new(dir_provider("first", &first)), Arc::new(dir_provider("second", &second))],
        );

        let pinned = binary.only("second").unwrap().load_or_install().unwrap();
        assert_eq!(pinned.provider(), Some("second"));
        assert_eq!(pinned.version(), Some(SemVer::new(2, 0, 0)));
        assert!(matches!(binary.only("third"), Err(BinError::UnknownProvider { .. })));
    }
}
