use crosshatch_crosstool::errors::ConfigError;
use crosshatch_crosstool::feature::{ActionConfigBuilder, FeatureBuilder, FeatureSetBuilder};
use pretty_assertions::assert_eq;

use crate::errors::ResolutionError;
use crate::features::FeatureResolver;
use crate::tests::{NO_FEATURES, flag_feature, resolve, toolchain};

#[test_log::test]
fn implies_chain() {
    let mut a = flag_feature("a", &["c-compile"], &["-a"]);
    a.implies = vec!["b".into()];
    let mut b = flag_feature("b", &["c-compile"], &["-b"]);
    b.implies = vec!["c".into()];
    let c = flag_feature("c", &["c-compile"], &["-c"]);

    let config = resolve(&toolchain(vec![a, b, c], vec![]), &["a"]);
    assert!(config.is_enabled("a"));
    assert!(config.is_enabled("b"));
    assert!(config.is_enabled("c"));
}

#[test_log::test]
fn unmet_requires_is_silent() {
    let lto = FeatureBuilder::default()
        .name("lto")
        .require(FeatureSetBuilder::default().feature("opt").build().unwrap())
        .build()
        .unwrap();
    let opt = FeatureBuilder::default().name("opt").build().unwrap();
    let t = toolchain(vec![lto, opt], vec![]);

    let config = resolve(&t, &["lto"]);
    assert!(!config.is_enabled("lto"));

    let config = resolve(&t, &["lto", "opt"]);
    assert!(config.is_enabled("lto"));
}

#[test_log::test]
fn requires_is_order_independent() {
    // "lto" is dequeued before its requirement activates; parking must retry it.
    let lto = FeatureBuilder::default()
        .name("lto")
        .require(FeatureSetBuilder::default().feature("opt").build().unwrap())
        .build()
        .unwrap();
    let opt = FeatureBuilder::default().name("opt").build().unwrap();
    let t = toolchain(vec![lto, opt], vec![]);

    let forward = resolve(&t, &["lto", "opt"]);
    let backward = resolve(&t, &["opt", "lto"]);
    assert_eq!(
        forward.enabled_features().collect::<Vec<_>>(),
        backward.enabled_features().collect::<Vec<_>>()
    );
    assert!(forward.is_enabled("lto"));
}

#[test_log::test]
fn requires_disjunction() {
    let either = FeatureBuilder::default()
        .name("either")
        .require(FeatureSetBuilder::default().feature("a").build().unwrap())
        .require(FeatureSetBuilder::default().feature("b").build().unwrap())
        .build()
        .unwrap();
    let a = FeatureBuilder::default().name("a").build().unwrap();
    let b = FeatureBuilder::default().name("b").build().unwrap();
    let t = toolchain(vec![either, a, b], vec![]);

    assert!(resolve(&t, &["either", "b"]).is_enabled("either"));
    assert!(!resolve(&t, &["either"]).is_enabled("either"));
}

#[test_log::test]
fn default_enabled_features_activate_and_imply() {
    let base = FeatureBuilder::default()
        .name("base")
        .enabled(true)
        .imply("warnings")
        .build()
        .unwrap();
    let warnings = FeatureBuilder::default().name("warnings").build().unwrap();

    let config = resolve(&toolchain(vec![base, warnings], vec![]), NO_FEATURES);
    assert!(config.is_enabled("base"));
    assert!(config.is_enabled("warnings"));
}

#[test_log::test]
fn default_enabled_cannot_be_disabled() {
    let base = FeatureBuilder::default()
        .name("base")
        .enabled(true)
        .build()
        .unwrap();
    let t = toolchain(vec![base], vec![]);

    let err = FeatureResolver::new(&t)
        .unwrap()
        .resolve_features(NO_FEATURES, ["base"])
        .unwrap_err();
    assert!(matches!(err, ResolutionError::CannotDisable(name) if name == "base"));
}

#[test_log::test]
fn disabling_blocks_implied_activation() {
    let mut a = flag_feature("a", &["c-compile"], &["-a"]);
    a.implies = vec!["b".into()];
    let b = flag_feature("b", &["c-compile"], &["-b"]);
    let t = toolchain(vec![a, b], vec![]);

    let config = FeatureResolver::new(&t)
        .unwrap()
        .resolve_features(["a"], ["b"])
        .unwrap();
    assert!(config.is_enabled("a"));
    assert!(!config.is_enabled("b"));
}

#[test_log::test]
fn requested_and_disabled_stays_disabled() {
    let a = flag_feature("a", &["c-compile"], &["-a"]);
    let t = toolchain(vec![a], vec![]);

    let config = FeatureResolver::new(&t)
        .unwrap()
        .resolve_features(["a"], ["a"])
        .unwrap();
    assert!(!config.is_enabled("a"));
}

#[test_log::test]
fn cyclic_implies_terminates() {
    let mut a = flag_feature("a", &["c-compile"], &["-a"]);
    a.implies = vec!["b".into()];
    let mut b = flag_feature("b", &["c-compile"], &["-b"]);
    b.implies = vec!["a".into()];

    let config = resolve(&toolchain(vec![a, b], vec![]), &["a"]);
    assert!(config.is_enabled("a"));
    assert!(config.is_enabled("b"));
}

#[test_log::test]
fn provides_conflict_fails() {
    let gold = FeatureBuilder::default()
        .name("gold_linker")
        .provide("linker")
        .build()
        .unwrap();
    let lld = FeatureBuilder::default()
        .name("lld_linker")
        .provide("linker")
        .build()
        .unwrap();
    let t = toolchain(vec![gold, lld], vec![]);
    let resolver = FeatureResolver::new(&t).unwrap();

    // Either alone is fine; both active is a contradiction, never a silent pick.
    resolver.resolve_features(["gold_linker"], NO_FEATURES).unwrap();
    let err = resolver
        .resolve_features(["gold_linker", "lld_linker"], NO_FEATURES)
        .unwrap_err();
    assert!(matches!(
        err,
        ResolutionError::ProvidesConflict { first, second, label }
            if first == "gold_linker" && second == "lld_linker" && label == "linker"
    ));
}

#[test_log::test]
fn provides_colliding_with_active_name_fails() {
    let opt = FeatureBuilder::default().name("opt").build().unwrap();
    let shadow = FeatureBuilder::default()
        .name("custom_opt")
        .provide("opt")
        .build()
        .unwrap();
    let t = toolchain(vec![opt, shadow], vec![]);
    let resolver = FeatureResolver::new(&t).unwrap();

    resolver.resolve_features(["custom_opt"], NO_FEATURES).unwrap();
    let err = resolver
        .resolve_features(["custom_opt", "opt"], NO_FEATURES)
        .unwrap_err();
    assert!(matches!(err, ResolutionError::ProvidesConflict { .. }));
}

#[test_log::test]
fn provides_of_skipped_features_do_not_conflict() {
    // Both provide "linker", but one never passes its requires check.
    let gold = FeatureBuilder::default()
        .name("gold_linker")
        .provide("linker")
        .build()
        .unwrap();
    let lld = FeatureBuilder::default()
        .name("lld_linker")
        .provide("linker")
        .require(FeatureSetBuilder::default().feature("llvm").build().unwrap())
        .build()
        .unwrap();
    let llvm = FeatureBuilder::default().name("llvm").build().unwrap();
    let t = toolchain(vec![gold, lld, llvm], vec![]);

    let config = resolve(&t, &["gold_linker", "lld_linker"]);
    assert!(config.is_enabled("gold_linker"));
    assert!(!config.is_enabled("lld_linker"));
}

#[test_log::test]
fn unknown_request_name_is_config_error() {
    let t = toolchain(vec![], vec![]);
    let resolver = FeatureResolver::new(&t).unwrap();

    let err = resolver.resolve_features(["ghost"], NO_FEATURES).unwrap_err();
    assert!(matches!(
        err,
        ResolutionError::Config(ConfigError::UnknownFeature(name)) if name == "ghost"
    ));

    let err = resolver.resolve_features(NO_FEATURES, ["ghost"]).unwrap_err();
    assert!(matches!(err, ResolutionError::Config(ConfigError::UnknownFeature(_))));
}

#[test_log::test]
fn features_can_imply_action_configs() {
    let archive = ActionConfigBuilder::default()
        .config_name("archive")
        .action_name("c++-link-static-library")
        .build()
        .unwrap();
    let static_libs = FeatureBuilder::default()
        .name("static_libs")
        .imply("archive")
        .build()
        .unwrap();

    let config = resolve(&toolchain(vec![static_libs], vec![archive]), &["static_libs"]);
    assert!(config.is_enabled("archive"));
}

#[test_log::test]
fn action_config_requires_is_checked() {
    let compile = ActionConfigBuilder::default()
        .config_name("compile")
        .action_name("c-compile")
        .require(FeatureSetBuilder::default().feature("host").build().unwrap())
        .build()
        .unwrap();
    let host = FeatureBuilder::default().name("host").build().unwrap();
    let t = toolchain(vec![host], vec![compile]);

    assert!(!resolve(&t, &["compile"]).is_enabled("compile"));
    assert!(resolve(&t, &["host", "compile"]).is_enabled("compile"));
}
