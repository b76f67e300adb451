//! One-time structural validation of a [`Toolchain`].
//!
//! Everything here is checkable without a request: name uniqueness, reference resolution,
//! flag group shape, template syntax, artifact categories. Per-request problems (provides
//! conflicts, missing variables, tool selection) are the resolution engine's department.

use fxhash::FxHashSet;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::artifact::ArtifactCategory;
use crate::errors::{ConfigError, ConfigResult};
use crate::feature::{EnvSet, FeatureSet, FlagGroup, FlagSet, WithFeatureSet};
use crate::template;
use crate::toolchain::Toolchain;

static IDENTIFIER_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_.-]*$").unwrap());

pub fn validate(toolchain: &Toolchain) -> ConfigResult<()> {
    if !IDENTIFIER_REGEX.is_match(&toolchain.toolchain_identifier) {
        return Err(ConfigError::InvalidIdentifier(
            toolchain.toolchain_identifier.clone(),
        ));
    }

    // Features and action configs share one namespace.
    let mut names: FxHashSet<&str> = FxHashSet::default();
    for feature in &toolchain.features {
        if !names.insert(&feature.name) {
            return Err(ConfigError::DuplicateName(feature.name.clone()));
        }
    }
    for config in &toolchain.action_configs {
        if !names.insert(&config.config_name) {
            return Err(ConfigError::DuplicateName(config.config_name.clone()));
        }
    }

    let mut actions: FxHashSet<&str> = FxHashSet::default();
    for config in &toolchain.action_configs {
        if !actions.insert(&config.action_name) {
            return Err(ConfigError::DuplicateActionConfig(config.action_name.clone()));
        }
    }

    for feature in &toolchain.features {
        check_selectable_references(&feature.name, &feature.requires, &feature.implies, &names)?;

        for flag_set in &feature.flag_sets {
            if flag_set.actions.is_empty() {
                return Err(ConfigError::SetWithoutActions(feature.name.clone()));
            }
            check_flag_set(&feature.name, flag_set, &names)?;
        }
        for env_set in &feature.env_sets {
            if env_set.actions.is_empty() {
                return Err(ConfigError::SetWithoutActions(feature.name.clone()));
            }
            check_env_set(&feature.name, env_set, &names)?;
        }
    }

    for config in &toolchain.action_configs {
        check_selectable_references(&config.config_name, &config.requires, &config.implies, &names)?;

        for flag_set in &config.flag_sets {
            if !flag_set.actions.is_empty() {
                return Err(ConfigError::ActionConfigSetWithActions(
                    config.config_name.clone(),
                ));
            }
            check_flag_set(&config.config_name, flag_set, &names)?;
        }
        for env_set in &config.env_sets {
            if !env_set.actions.is_empty() {
                return Err(ConfigError::ActionConfigSetWithActions(
                    config.config_name.clone(),
                ));
            }
            check_env_set(&config.config_name, env_set, &names)?;
        }
        for tool in &config.tools {
            check_with_feature(&config.config_name, &tool.with_feature, &names)?;
        }
    }

    for pattern in &toolchain.artifact_name_patterns {
        if ArtifactCategory::from_name(&pattern.category_name).is_none() {
            return Err(ConfigError::UnknownArtifactCategory(
                pattern.category_name.clone(),
            ));
        }
    }

    Ok(())
}

fn check_selectable_references(
    owner: &str,
    requires: &[FeatureSet],
    implies: &[String],
    names: &FxHashSet<&str>,
) -> ConfigResult<()> {
    for set in requires {
        for name in &set.features {
            check_reference(owner, name, names)?;
        }
    }
    for name in implies {
        check_reference(owner, name, names)?;
    }
    Ok(())
}

fn check_flag_set(owner: &str, flag_set: &FlagSet, names: &FxHashSet<&str>) -> ConfigResult<()> {
    check_with_feature(owner, &flag_set.with_feature, names)?;
    for group in &flag_set.flag_groups {
        check_flag_group(owner, group)?;
    }
    Ok(())
}

fn check_flag_group(owner: &str, group: &FlagGroup) -> ConfigResult<()> {
    match (group.flags.is_empty(), group.flag_groups.is_empty()) {
        // Expanding flags and nested groups from one node has no defensible order.
        (false, false) => return Err(ConfigError::AmbiguousFlagGroup(owner.to_owned())),
        (true, true) => return Err(ConfigError::EmptyFlagGroup(owner.to_owned())),
        _ => {}
    }

    for flag in &group.flags {
        check_template(owner, flag)?;
    }
    for nested in &group.flag_groups {
        check_flag_group(owner, nested)?;
    }
    Ok(())
}

fn check_env_set(owner: &str, env_set: &EnvSet, names: &FxHashSet<&str>) -> ConfigResult<()> {
    check_with_feature(owner, &env_set.with_feature, names)?;
    for entry in &env_set.env_entries {
        check_template(owner, &entry.value)?;
    }
    Ok(())
}

fn check_with_feature(
    owner: &str,
    sets: &[WithFeatureSet],
    names: &FxHashSet<&str>,
) -> ConfigResult<()> {
    for set in sets {
        for name in set.features.iter().chain(&set.not_features) {
            check_reference(owner, name, names)?;
        }
    }
    Ok(())
}

fn check_reference(owner: &str, name: &str, names: &FxHashSet<&str>) -> ConfigResult<()> {
    if names.contains(name) {
        Ok(())
    } else {
        Err(ConfigError::UnknownReference {
            referrer: owner.to_owned(),
            name: name.to_owned(),
        })
    }
}

fn check_template(owner: &str, template: &str) -> ConfigResult<()> {
    template::parse(template)
        .map(|_| ())
        .map_err(|source| ConfigError::InvalidTemplate {
            owner: owner.to_owned(),
            template: template.to_owned(),
            source,
        })
}
