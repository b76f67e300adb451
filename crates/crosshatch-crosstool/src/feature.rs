//! Features, action configs, and the flag/env structures hanging off them.

use derive_builder::Builder;
use derive_more::{Display, From};

/// A named unit of conditional toolchain configuration.
#[derive(Builder, Debug, Clone, Default, PartialEq, Eq)]
#[builder(default, setter(into))]
pub struct Feature {
    pub name: String,

    /// Always-on features activate without being requested and cannot be disabled.
    pub enabled: bool,

    #[builder(setter(into, each(name = "flag_set")))]
    pub flag_sets: Vec<FlagSet>,

    #[builder(setter(into, each(name = "env_set")))]
    pub env_sets: Vec<EnvSet>,

    /// Disjunction of conjunctions: at least one listed set must be fully active,
    /// otherwise this feature is silently not enabled.
    #[builder(setter(into, each(name = "require")))]
    pub requires: Vec<FeatureSet>,

    #[builder(setter(into, each(name = "imply", into)))]
    pub implies: Vec<String>,

    /// Capability labels for mutual exclusion; not name references.
    #[builder(setter(into, each(name = "provide", into)))]
    pub provides: Vec<String>,
}

/// Binds a logical action name to its tools, flags, and environment.
///
/// The `config_name` is what `implies`/`requires` and request inputs refer to; the
/// `action_name` is what the build system asks command lines for. They are often equal.
#[derive(Builder, Debug, Clone, Default, PartialEq, Eq)]
#[builder(default, setter(into))]
pub struct ActionConfig {
    pub config_name: String,
    pub action_name: String,

    pub enabled: bool,

    /// Candidate tools in preference order; the first whose `with_feature` matches wins.
    #[builder(setter(into, each(name = "tool")))]
    pub tools: Vec<Tool>,

    /// Apply to `action_name` implicitly and must not list actions of their own.
    #[builder(setter(into, each(name = "flag_set")))]
    pub flag_sets: Vec<FlagSet>,

    #[builder(setter(into, each(name = "env_set")))]
    pub env_sets: Vec<EnvSet>,

    #[builder(setter(into, each(name = "require")))]
    pub requires: Vec<FeatureSet>,

    #[builder(setter(into, each(name = "imply", into)))]
    pub implies: Vec<String>,

    #[builder(setter(into, each(name = "provide", into)))]
    pub provides: Vec<String>,
}

/// A conjunction of feature names: satisfied when every one is active.
#[derive(Builder, Debug, Clone, Default, PartialEq, Eq, From)]
#[builder(default, setter(into))]
pub struct FeatureSet {
    #[builder(setter(into, each(name = "feature", into)))]
    pub features: Vec<String>,
}

/// A conjunction of required and forbidden features. Lists of these are disjunctions.
#[derive(Builder, Debug, Clone, Default, PartialEq, Eq)]
#[builder(default, setter(into))]
pub struct WithFeatureSet {
    #[builder(setter(into, each(name = "feature", into)))]
    pub features: Vec<String>,

    #[builder(setter(into, each(name = "not_feature", into)))]
    pub not_features: Vec<String>,
}

#[derive(Builder, Debug, Clone, Default, PartialEq, Eq)]
#[builder(default, setter(into))]
pub struct FlagSet {
    #[builder(setter(into, each(name = "action", into)))]
    pub actions: Vec<String>,

    /// Disjunction; empty means unconditional.
    #[builder(setter(into, each(name = "with_feature")))]
    pub with_feature: Vec<WithFeatureSet>,

    #[builder(setter(into, each(name = "flag_group")))]
    pub flag_groups: Vec<FlagGroup>,
}

/// One node of the flag tree: either literal flag templates or nested groups, plus
/// optional iteration and expansion guards.
///
/// Both vectors exist because the wire shape carries both; [`crate::validate`] rejects a
/// group where both (or neither) are populated, and [`FlagGroup::contents`] is the
/// unambiguous view to expand through.
#[derive(Builder, Debug, Clone, Default, PartialEq, Eq)]
#[builder(default, setter(into))]
pub struct FlagGroup {
    #[builder(setter(into, each(name = "flag", into)))]
    pub flags: Vec<String>,

    #[builder(setter(into, each(name = "group")))]
    pub flag_groups: Vec<FlagGroup>,

    /// Name of a list variable; the group expands once per element, with the element
    /// bound under this name for the duration of that expansion.
    #[builder(setter(into, strip_option))]
    pub iterate_over: Option<String>,

    #[builder(setter(into, each(name = "expand_if_available", into)))]
    pub expand_if_all_available: Vec<String>,

    #[builder(setter(into, each(name = "expand_if_unavailable", into)))]
    pub expand_if_none_available: Vec<String>,

    #[builder(setter(into, strip_option))]
    pub expand_if_true: Option<String>,

    #[builder(setter(into, strip_option))]
    pub expand_if_false: Option<String>,

    #[builder(setter(into, strip_option))]
    pub expand_if_equal: Option<VariableWithValue>,
}

/// The leaf-or-nested view of a validated [`FlagGroup`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupContents<'a> {
    Flags(&'a [String]),
    Groups(&'a [FlagGroup]),
}

impl FlagGroup {
    /// Validated groups hold flags or nested groups, never both.
    pub fn contents(&self) -> GroupContents<'_> {
        if self.flags.is_empty() {
            GroupContents::Groups(&self.flag_groups)
        } else {
            GroupContents::Flags(&self.flags)
        }
    }
}

#[derive(Builder, Debug, Clone, Default, PartialEq, Eq)]
#[builder(default, setter(into))]
pub struct EnvSet {
    #[builder(setter(into, each(name = "action", into)))]
    pub actions: Vec<String>,

    #[builder(setter(into, each(name = "with_feature")))]
    pub with_feature: Vec<WithFeatureSet>,

    #[builder(setter(into, each(name = "env_entry")))]
    pub env_entries: Vec<EnvEntry>,
}

/// An environment variable to set: the key is literal, the value is a template.
#[derive(Builder, Debug, Clone, Default, PartialEq, Eq)]
#[builder(default, setter(into))]
pub struct EnvEntry {
    pub key: String,
    pub value: String,

    #[builder(setter(into, each(name = "expand_if_available", into)))]
    pub expand_if_all_available: Vec<String>,
}

/// The `(variable, literal)` pair behind `expand_if_equal`.
#[derive(Debug, Clone, Default, PartialEq, Eq, From)]
pub struct VariableWithValue {
    pub variable: String,
    pub value: String,
}

impl VariableWithValue {
    pub fn new<V: Into<String>, S: Into<String>>(variable: V, value: S) -> Self {
        VariableWithValue {
            variable: variable.into(),
            value: value.into(),
        }
    }
}

#[derive(Builder, Debug, Clone, Default, PartialEq, Eq)]
#[builder(default, setter(into))]
pub struct Tool {
    pub tool_path: String,

    pub tool_path_origin: ToolPathOrigin,

    /// Disjunction gating applicability; empty means this tool always matches.
    #[builder(setter(into, each(name = "with_feature")))]
    pub with_feature: Vec<WithFeatureSet>,

    /// Opaque strings handed through to the execution layer uninterpreted.
    #[builder(setter(into, each(name = "execution_requirement", into)))]
    pub execution_requirements: Vec<String>,
}

/// How a [`Tool::tool_path`] is anchored. Absent on the wire means crosstool-package-relative.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display)]
pub enum ToolPathOrigin {
    /// Relative to the directory the crosstool configuration lives in.
    #[default]
    #[display("crosstool_package")]
    CrosstoolPackage,

    #[display("absolute")]
    Absolute,

    /// Relative to the execution root the action runs under.
    #[display("exec_root")]
    ExecRoot,
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use crate::feature::{FeatureBuilder, FlagGroupBuilder, GroupContents};

    #[test]
    fn builder_roundtrip() {
        let feature = FeatureBuilder::default()
            .name("opt")
            .imply("opt_flags")
            .provide("compilation_mode")
            .build()
            .unwrap();

        assert_eq!(feature.name, "opt");
        assert!(!feature.enabled);
        assert_eq!(feature.implies, vec!["opt_flags".to_string()]);
    }

    #[test]
    fn group_contents() {
        let leaf = FlagGroupBuilder::default().flag("-O2").build().unwrap();
        assert_eq!(leaf.contents(), GroupContents::Flags(&leaf.flags));

        let nested = FlagGroupBuilder::default()
            .group(leaf.clone())
            .build()
            .unwrap();
        assert_eq!(nested.contents(), GroupContents::Groups(&nested.flag_groups));
    }
}
