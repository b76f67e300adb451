//! The top-level toolchain configuration for one target/host/cpu combination.

use derive_builder::Builder;
use derive_more::Display;

use crate::artifact::ArtifactNamePattern;
use crate::feature::{ActionConfig, Feature};

/// One complete crosstool configuration. Built once, validated once, then shared
/// read-only across any number of concurrent resolution calls.
///
/// The legacy flag lists (`compiler_flag` and friends) predate the feature mechanism;
/// resolution appends them after all feature-derived flags, so they behave as trailing
/// overrides for configurations still carrying them.
#[derive(Builder, Debug, Clone, Default, PartialEq, Eq)]
#[builder(default, setter(into))]
pub struct Toolchain {
    pub toolchain_identifier: String,

    pub host_system_name: String,
    pub target_system_name: String,
    pub target_cpu: String,
    pub target_libc: String,
    pub compiler: String,
    pub abi_version: String,
    pub abi_libc_version: String,

    #[builder(setter(into, strip_option))]
    pub cc_target_os: Option<String>,

    #[builder(setter(into, strip_option))]
    pub builtin_sysroot: Option<String>,

    #[builder(setter(into, each(name = "feature")))]
    pub features: Vec<Feature>,

    #[builder(setter(into, each(name = "action_config")))]
    pub action_configs: Vec<ActionConfig>,

    #[builder(setter(into, each(name = "artifact_name_pattern")))]
    pub artifact_name_patterns: Vec<ArtifactNamePattern>,

    /// Applied to every compile action.
    pub compiler_flag: Vec<String>,

    /// Applied to C++ compile actions, after `compiler_flag`.
    pub cxx_flag: Vec<String>,

    /// Applied to compile actions last of all, beyond the reach of per-mode overlays.
    pub unfiltered_cxx_flag: Vec<String>,

    /// Applied to link actions.
    pub linker_flag: Vec<String>,

    #[builder(setter(into, each(name = "compilation_mode_flag")))]
    pub compilation_mode_flags: Vec<CompilationModeFlags>,

    #[builder(setter(into, each(name = "linking_mode_flag")))]
    pub linking_mode_flags: Vec<LinkingModeFlags>,

    #[builder(setter(into, each(name = "tool_path")))]
    pub tool_paths: Vec<ToolPath>,

    #[builder(setter(into, each(name = "make_variable")))]
    pub make_variables: Vec<MakeVariable>,
}

impl Toolchain {
    /// Legacy tool location by name (`gcc`, `ld`, `ar`, ...).
    pub fn tool_path(&self, name: &str) -> Option<&str> {
        self.tool_paths
            .iter()
            .find(|tool| tool.name == name)
            .map(|tool| tool.path.as_str())
    }

    pub fn make_variable(&self, name: &str) -> Option<&str> {
        self.make_variables
            .iter()
            .find(|var| var.name == name)
            .map(|var| var.value.as_str())
    }

    pub fn artifact_name_pattern(&self, category_name: &str) -> Option<&ArtifactNamePattern> {
        self.artifact_name_patterns
            .iter()
            .find(|pattern| pattern.category_name == category_name)
    }
}

/// Legacy `(name, path)` tool location pair.
#[derive(Builder, Debug, Clone, Default, PartialEq, Eq)]
#[builder(default, setter(into))]
pub struct ToolPath {
    pub name: String,
    pub path: String,
}

/// Legacy make variable exposed to the surrounding build system.
#[derive(Builder, Debug, Clone, Default, PartialEq, Eq)]
#[builder(default, setter(into))]
pub struct MakeVariable {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum CompilationMode {
    #[display("fastbuild")]
    Fastbuild,
    #[display("dbg")]
    Dbg,
    #[display("opt")]
    Opt,
    /// Historical; kept for wire compatibility with old configurations.
    #[display("coverage")]
    Coverage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum LinkingMode {
    #[display("fully_static")]
    FullyStatic,
    #[display("mostly_static")]
    MostlyStatic,
    #[display("dynamic")]
    Dynamic,
    #[display("mostly_static_libraries")]
    MostlyStaticLibraries,
}

/// Per-compilation-mode flag overlay, applied after the global legacy lists.
#[derive(Builder, Debug, Clone, PartialEq, Eq)]
#[builder(setter(into))]
pub struct CompilationModeFlags {
    pub mode: CompilationMode,
    #[builder(default)]
    pub compiler_flag: Vec<String>,
    #[builder(default)]
    pub cxx_flag: Vec<String>,
    #[builder(default)]
    pub linker_flag: Vec<String>,
}

/// Per-linking-mode flag overlay.
#[derive(Builder, Debug, Clone, PartialEq, Eq)]
#[builder(setter(into))]
pub struct LinkingModeFlags {
    pub mode: LinkingMode,
    #[builder(default)]
    pub linker_flag: Vec<String>,
}
