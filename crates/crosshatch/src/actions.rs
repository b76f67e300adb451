//! Per-action assembly: flags, environment, and tool selection for one action name.

use crosshatch_crosstool::feature::Tool;
use crosshatch_crosstool::toolchain::{CompilationMode, CompilationModeFlags, LinkingMode};
use tracing::debug;

use crate::errors::{ResolutionError, ResolutionResult};
use crate::expand::{expand_env_entry, expand_flag_group};
use crate::features::FeatureConfiguration;
use crate::variables::{Variables, View};

/// The well-known action names toolchains configure. Nothing restricts a configuration
/// to these, but the legacy flag lists only apply to actions classified below.
pub mod action_names {
    pub const C_COMPILE: &str = "c-compile";
    pub const CPP_COMPILE: &str = "c++-compile";
    pub const CPP_MODULE_COMPILE: &str = "c++-module-compile";
    pub const CPP_HEADER_PARSING: &str = "c++-header-parsing";
    pub const ASSEMBLE: &str = "assemble";
    pub const PREPROCESS_ASSEMBLE: &str = "preprocess-assemble";
    pub const CPP_LINK_EXECUTABLE: &str = "c++-link-executable";
    pub const CPP_LINK_DYNAMIC_LIBRARY: &str = "c++-link-dynamic-library";
    pub const CPP_LINK_NODEPS_DYNAMIC_LIBRARY: &str = "c++-link-nodeps-dynamic-library";
    pub const CPP_LINK_STATIC_LIBRARY: &str = "c++-link-static-library";
    pub const STRIP: &str = "strip";
}

pub fn is_compile_action(action: &str) -> bool {
    matches!(
        action,
        action_names::C_COMPILE
            | action_names::CPP_COMPILE
            | action_names::CPP_MODULE_COMPILE
            | action_names::CPP_HEADER_PARSING
            | action_names::ASSEMBLE
            | action_names::PREPROCESS_ASSEMBLE
    )
}

pub fn is_cpp_compile_action(action: &str) -> bool {
    matches!(
        action,
        action_names::CPP_COMPILE
            | action_names::CPP_MODULE_COMPILE
            | action_names::CPP_HEADER_PARSING
    )
}

/// Archiving (`c++-link-static-library`) is deliberately not a link action here: the
/// legacy linker flags are for actual linker invocations.
pub fn is_link_action(action: &str) -> bool {
    matches!(
        action,
        action_names::CPP_LINK_EXECUTABLE
            | action_names::CPP_LINK_DYNAMIC_LIBRARY
            | action_names::CPP_LINK_NODEPS_DYNAMIC_LIBRARY
    )
}

/// Which per-mode legacy overlays apply to this request. Absent modes contribute none.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildModes {
    pub compilation: Option<CompilationMode>,
    pub linking: Option<LinkingMode>,
}

impl BuildModes {
    pub fn compilation(mode: CompilationMode) -> BuildModes {
        BuildModes {
            compilation: Some(mode),
            linking: None,
        }
    }

    pub fn linking(mode: LinkingMode) -> BuildModes {
        BuildModes {
            compilation: None,
            linking: Some(mode),
        }
    }
}

impl<'t> FeatureConfiguration<'t> {
    /// The ordered command line for `action`: flag sets of enabled features in
    /// declaration order, then the enabled action config's own, then the legacy tail.
    pub fn command_line(
        &self,
        action: &str,
        vars: &Variables,
        modes: &BuildModes,
    ) -> ResolutionResult<Vec<String>> {
        let view = View::root(vars);
        let mut flags = Vec::new();

        for feature in &self.toolchain.features {
            if !self.is_enabled(&feature.name) {
                continue;
            }
            for flag_set in &feature.flag_sets {
                if !flag_set.actions.iter().any(|a| a == action) {
                    continue;
                }
                if !self.with_feature_matches(&flag_set.with_feature) {
                    continue;
                }
                for group in &flag_set.flag_groups {
                    expand_flag_group(group, &view, &mut flags)?;
                }
            }
        }

        if let Some(config) = self.action_config(action) {
            for flag_set in &config.flag_sets {
                if !self.with_feature_matches(&flag_set.with_feature) {
                    continue;
                }
                for group in &flag_set.flag_groups {
                    expand_flag_group(group, &view, &mut flags)?;
                }
            }
        }

        self.append_legacy_flags(action, modes, &mut flags);

        debug!(action, flags = flags.len(), "assembled command line");
        Ok(flags)
    }

    /// The ordered environment for `action`. Duplicate keys are preserved in order;
    /// merge policy belongs to the consumer.
    pub fn environment(
        &self,
        action: &str,
        vars: &Variables,
    ) -> ResolutionResult<Vec<(String, String)>> {
        let view = View::root(vars);
        let mut env = Vec::new();

        for feature in &self.toolchain.features {
            if !self.is_enabled(&feature.name) {
                continue;
            }
            for env_set in &feature.env_sets {
                if !env_set.actions.iter().any(|a| a == action) {
                    continue;
                }
                if !self.with_feature_matches(&env_set.with_feature) {
                    continue;
                }
                for entry in &env_set.env_entries {
                    expand_env_entry(entry, &view, &mut env)?;
                }
            }
        }

        if let Some(config) = self.action_config(action) {
            for env_set in &config.env_sets {
                if !self.with_feature_matches(&env_set.with_feature) {
                    continue;
                }
                for entry in &env_set.env_entries {
                    expand_env_entry(entry, &view, &mut env)?;
                }
            }
        }

        Ok(env)
    }

    /// First declared tool whose `with_feature` matches the enabled set. No implicit
    /// fallback: an action with no matching tool fails the request.
    pub fn tool(&self, action: &str) -> ResolutionResult<&'t Tool> {
        let Some(config) = self.action_config(action) else {
            return Err(ResolutionError::ActionNotConfigured(action.to_owned()));
        };
        config
            .tools
            .iter()
            .find(|tool| self.with_feature_matches(&tool.with_feature))
            .ok_or_else(|| ResolutionError::NoMatchingTool(action.to_owned()))
    }

    /// Legacy lists trail all feature-derived flags, preserving the historical
    /// precedence for configurations still carrying them. Order within the tail:
    /// global list, compilation-mode overlay, (C++ only) cxx list and its overlay,
    /// unfiltered flags dead last; linker overlays analogously.
    fn append_legacy_flags(&self, action: &str, modes: &BuildModes, out: &mut Vec<String>) {
        let toolchain = self.toolchain;

        if is_compile_action(action) {
            out.extend(toolchain.compiler_flag.iter().cloned());
            if let Some(mode) = modes.compilation {
                for overlay in mode_overlays(&toolchain.compilation_mode_flags, mode) {
                    out.extend(overlay.compiler_flag.iter().cloned());
                }
            }
            if is_cpp_compile_action(action) {
                out.extend(toolchain.cxx_flag.iter().cloned());
                if let Some(mode) = modes.compilation {
                    for overlay in mode_overlays(&toolchain.compilation_mode_flags, mode) {
                        out.extend(overlay.cxx_flag.iter().cloned());
                    }
                }
            }
            out.extend(toolchain.unfiltered_cxx_flag.iter().cloned());
        } else if is_link_action(action) {
            out.extend(toolchain.linker_flag.iter().cloned());
            if let Some(mode) = modes.compilation {
                for overlay in mode_overlays(&toolchain.compilation_mode_flags, mode) {
                    out.extend(overlay.linker_flag.iter().cloned());
                }
            }
            if let Some(mode) = modes.linking {
                for overlay in toolchain
                    .linking_mode_flags
                    .iter()
                    .filter(move |overlay| overlay.mode == mode)
                {
                    out.extend(overlay.linker_flag.iter().cloned());
                }
            }
        }
    }
}

fn mode_overlays(
    overlays: &[CompilationModeFlags],
    mode: CompilationMode,
) -> impl Iterator<Item = &CompilationModeFlags> {
    overlays.iter().filter(move |overlay| overlay.mode == mode)
}
