mod closure;

use crosshatch_crosstool::feature::{
    ActionConfig, Feature, FeatureBuilder, FlagGroup, FlagGroupBuilder, FlagSet, FlagSetBuilder,
};
use crosshatch_crosstool::toolchain::{Toolchain, ToolchainBuilder};

use crate::features::{FeatureConfiguration, FeatureResolver};
use crate::macros::command_line;
use crate::variables::Variables;

pub(crate) const NO_FEATURES: &[&str] = &[];

pub(crate) fn toolchain(features: Vec<Feature>, action_configs: Vec<ActionConfig>) -> Toolchain {
    ToolchainBuilder::default()
        .toolchain_identifier("test-toolchain")
        .features(features)
        .action_configs(action_configs)
        .build()
        .unwrap()
}

pub(crate) fn resolve<'t>(toolchain: &'t Toolchain, requested: &[&str]) -> FeatureConfiguration<'t> {
    FeatureResolver::new(toolchain)
        .unwrap()
        .resolve_features(requested, NO_FEATURES)
        .unwrap()
}

pub(crate) fn flags_for(
    toolchain: &Toolchain,
    requested: &[&str],
    action: &str,
    vars: &Variables,
) -> Vec<String> {
    let config = resolve(toolchain, requested);
    command_line!(&config, action, vars).unwrap()
}

pub(crate) fn leaf(flags: &[&str]) -> FlagGroup {
    let mut builder = FlagGroupBuilder::default();
    for flag in flags {
        builder.flag(*flag);
    }
    builder.build().unwrap()
}

pub(crate) fn flag_set(actions: &[&str], group: FlagGroup) -> FlagSet {
    let mut builder = FlagSetBuilder::default();
    for action in actions {
        builder.action(*action);
    }
    builder.flag_group(group);
    builder.build().unwrap()
}

/// One feature emitting literal flags for the given actions.
pub(crate) fn flag_feature(name: &str, actions: &[&str], flags: &[&str]) -> Feature {
    FeatureBuilder::default()
        .name(name)
        .flag_set(flag_set(actions, leaf(flags)))
        .build()
        .unwrap()
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use crate::tests::{flag_feature, resolve, toolchain};
    use crate::variables::Variables;

    #[test]
    fn determinism() {
        let t = toolchain(
            vec![
                flag_feature("a", &["c-compile"], &["-a"]),
                flag_feature("b", &["c-compile"], &["-b"]),
                flag_feature("c", &["c-compile"], &["-c"]),
            ],
            vec![],
        );
        let vars = Variables::new();

        let first = super::flags_for(&t, &["c", "a", "b"], "c-compile", &vars);
        for _ in 0..16 {
            assert_eq!(super::flags_for(&t, &["c", "a", "b"], "c-compile", &vars), first);
        }
        // Request order never shows in the output; declaration order does.
        assert_eq!(first, vec!["-a", "-b", "-c"]);
    }

    #[test]
    fn closure_is_idempotent() {
        let mut lto = flag_feature("lto", &["c-compile"], &["-flto"]);
        lto.implies = vec!["thin".into()];
        let t = toolchain(
            vec![lto, flag_feature("thin", &["c-compile"], &["-fthin"])],
            vec![],
        );

        let first = resolve(&t, &["lto"]);
        let enabled: Vec<&str> = first.enabled_features().collect();
        let second = resolve(&t, &enabled);

        assert_eq!(
            first.enabled_features().collect::<Vec<_>>(),
            second.enabled_features().collect::<Vec<_>>()
        );
    }
}
