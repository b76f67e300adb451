//! Feature closure: from a request to the maximal consistent set of enabled selectables.

use std::collections::VecDeque;

use crosshatch_crosstool::artifact::ArtifactCategory;
use crosshatch_crosstool::errors::ConfigError;
use crosshatch_crosstool::feature::{ActionConfig, Feature, FeatureSet, WithFeatureSet};
use crosshatch_crosstool::toolchain::Toolchain;
use crosshatch_crosstool::validate::validate;
use fxhash::{FxHashMap, FxHashSet};
use indexmap::IndexSet;
use itertools::Itertools;
use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};
use tracing::debug;

use crate::errors::{ResolutionError, ResolutionResult};

/// A feature or an action config; the two share a namespace and an activation mechanism.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Selectable<'t> {
    Feature(&'t Feature),
    ActionConfig(&'t ActionConfig),
}

impl<'t> Selectable<'t> {
    pub(crate) fn name(&self) -> &'t str {
        match self {
            Selectable::Feature(feature) => &feature.name,
            Selectable::ActionConfig(config) => &config.config_name,
        }
    }

    fn enabled_by_default(&self) -> bool {
        match self {
            Selectable::Feature(feature) => feature.enabled,
            Selectable::ActionConfig(config) => config.enabled,
        }
    }

    fn requires(&self) -> &'t [FeatureSet] {
        match self {
            Selectable::Feature(feature) => &feature.requires,
            Selectable::ActionConfig(config) => &config.requires,
        }
    }

    fn implies(&self) -> &'t [String] {
        match self {
            Selectable::Feature(feature) => &feature.implies,
            Selectable::ActionConfig(config) => &config.implies,
        }
    }

    fn provides(&self) -> &'t [String] {
        match self {
            Selectable::Feature(feature) => &feature.provides,
            Selectable::ActionConfig(config) => &config.provides,
        }
    }
}

/// A validated, indexed toolchain ready to resolve requests against. Construction runs
/// the one-time configuration validation; everything afterwards is per-request and pure,
/// so one resolver may serve arbitrarily many concurrent calls.
#[derive(Debug)]
pub struct FeatureResolver<'t> {
    toolchain: &'t Toolchain,
    /// Selectables in declaration order (features, then action configs), with `implies`
    /// edges.
    graph: DiGraph<Selectable<'t>, ()>,
    by_name: FxHashMap<&'t str, NodeIndex>,
}

impl<'t> FeatureResolver<'t> {
    pub fn new(toolchain: &'t Toolchain) -> Result<FeatureResolver<'t>, ConfigError> {
        validate(toolchain)?;

        let mut graph = DiGraph::new();
        let mut by_name = FxHashMap::default();
        for feature in &toolchain.features {
            let idx = graph.add_node(Selectable::Feature(feature));
            by_name.insert(feature.name.as_str(), idx);
        }
        for config in &toolchain.action_configs {
            let idx = graph.add_node(Selectable::ActionConfig(config));
            by_name.insert(config.config_name.as_str(), idx);
        }

        // Implies targets were resolved by validation above.
        let indices = graph.node_indices().collect_vec();
        for idx in indices {
            let node = graph[idx];
            for implied in node.implies() {
                graph.add_edge(idx, by_name[implied.as_str()], ());
            }
        }

        Ok(FeatureResolver {
            toolchain,
            graph,
            by_name,
        })
    }

    pub fn toolchain(&self) -> &'t Toolchain {
        self.toolchain
    }

    /// File name for an artifact category: the declared pattern if the toolchain has
    /// one, the category's built-in default otherwise.
    pub fn artifact_name(&self, category: ArtifactCategory, basename: &str) -> String {
        match self.toolchain.artifact_name_pattern(category.name()) {
            Some(pattern) => format!("{}{}{}", pattern.prefix, basename, pattern.extension),
            None => format!(
                "{}{}{}",
                category.default_prefix(),
                basename,
                category.default_extension()
            ),
        }
    }

    /// Compute the maximal consistent set of enabled selectables for one request.
    ///
    /// Always-enabled selectables start active. The work queue is seeded with their
    /// implications plus the explicitly requested names; a candidate activates once some
    /// alternative in its `requires` is fully active (unmet `requires` parks the
    /// candidate for retry after the next activation, making the closure independent of
    /// queue order), and activation enqueues the candidate's own implications.
    /// Re-visiting an active name is a no-op, so cyclic `implies` chains terminate.
    ///
    /// After the fixed point, a `provides` pass over the active set rejects the request
    /// if any capability label is claimed twice, or collides with an active name.
    pub fn resolve_features<R, D>(
        &self,
        requested: R,
        disabled: D,
    ) -> ResolutionResult<FeatureConfiguration<'t>>
    where
        R: IntoIterator,
        R::Item: AsRef<str>,
        D: IntoIterator,
        D::Item: AsRef<str>,
    {
        let mut blocked: FxHashSet<NodeIndex> = FxHashSet::default();
        for name in disabled {
            let name = name.as_ref();
            let idx = self.node(name)?;
            if self.graph[idx].enabled_by_default() {
                return Err(ResolutionError::CannotDisable(name.to_owned()));
            }
            blocked.insert(idx);
        }

        let mut active: IndexSet<NodeIndex> = IndexSet::new();
        let mut queue: VecDeque<NodeIndex> = VecDeque::new();
        for idx in self.graph.node_indices() {
            if self.graph[idx].enabled_by_default() {
                active.insert(idx);
                queue.extend(self.graph.neighbors_directed(idx, Direction::Outgoing));
            }
        }
        // A name both requested and disabled stays disabled; the block below skips it.
        for name in requested {
            queue.push_back(self.node(name.as_ref())?);
        }

        let mut parked: Vec<NodeIndex> = Vec::new();
        while let Some(idx) = queue.pop_front() {
            if active.contains(&idx) || blocked.contains(&idx) {
                continue;
            }
            let node = self.graph[idx];
            if !self.requires_met(node, &active) {
                debug!(name = node.name(), "requirements unmet; parking");
                parked.push(idx);
                continue;
            }

            debug!(name = node.name(), "activating");
            active.insert(idx);
            queue.extend(self.graph.neighbors_directed(idx, Direction::Outgoing));
            // This activation may satisfy a parked candidate.
            queue.extend(parked.drain(..));
        }

        let mut enabled: IndexSet<&'t str> = IndexSet::new();
        let mut action_configs: FxHashMap<&'t str, &'t ActionConfig> = FxHashMap::default();
        for idx in self.graph.node_indices() {
            if !active.contains(&idx) {
                continue;
            }
            let node = self.graph[idx];
            enabled.insert(node.name());
            if let Selectable::ActionConfig(config) = node {
                action_configs.insert(config.action_name.as_str(), config);
            }
        }

        self.check_provides(&active, &enabled)?;

        Ok(FeatureConfiguration {
            toolchain: self.toolchain,
            enabled,
            action_configs,
        })
    }

    fn node(&self, name: &str) -> ResolutionResult<NodeIndex> {
        self.by_name
            .get(name)
            .copied()
            .ok_or_else(|| ConfigError::UnknownFeature(name.to_owned()).into())
    }

    fn requires_met(&self, node: Selectable<'t>, active: &IndexSet<NodeIndex>) -> bool {
        let requires = node.requires();
        requires.is_empty()
            || requires.iter().any(|set| {
                set.features
                    .iter()
                    .all(|name| active.contains(&self.by_name[name.as_str()]))
            })
    }

    fn check_provides(
        &self,
        active: &IndexSet<NodeIndex>,
        enabled: &IndexSet<&'t str>,
    ) -> ResolutionResult<()> {
        let mut claimed: FxHashMap<&'t str, &'t str> = FxHashMap::default();
        for idx in self.graph.node_indices() {
            if !active.contains(&idx) {
                continue;
            }
            let node = self.graph[idx];
            for label in node.provides() {
                if let Some(first) = claimed.insert(label.as_str(), node.name()) {
                    return Err(ResolutionError::ProvidesConflict {
                        first: first.to_owned(),
                        second: node.name().to_owned(),
                        label: label.clone(),
                    });
                }
                if label != node.name() && enabled.contains(label.as_str()) {
                    return Err(ResolutionError::ProvidesConflict {
                        first: label.clone(),
                        second: node.name().to_owned(),
                        label: label.clone(),
                    });
                }
            }
        }
        Ok(())
    }
}

/// The outcome of feature closure: which selectables are enabled, in declaration order.
/// All per-action queries hang off this.
#[derive(Debug, Clone)]
pub struct FeatureConfiguration<'t> {
    pub(crate) toolchain: &'t Toolchain,
    enabled: IndexSet<&'t str>,
    action_configs: FxHashMap<&'t str, &'t ActionConfig>,
}

impl<'t> FeatureConfiguration<'t> {
    pub fn is_enabled(&self, name: &str) -> bool {
        self.enabled.contains(name)
    }

    /// Enabled selectable names in toolchain declaration order.
    pub fn enabled_features(&self) -> impl Iterator<Item = &'t str> + '_ {
        self.enabled.iter().copied()
    }

    /// The enabled action config governing `action`, if any.
    pub(crate) fn action_config(&self, action: &str) -> Option<&'t ActionConfig> {
        self.action_configs.get(action).copied()
    }

    /// Disjunction semantics: empty means unconditional, otherwise any one set must
    /// match (all `features` enabled, no `not_features` enabled).
    pub(crate) fn with_feature_matches(&self, sets: &[WithFeatureSet]) -> bool {
        sets.is_empty()
            || sets.iter().any(|set| {
                set.features.iter().all(|name| self.is_enabled(name))
                    && set.not_features.iter().all(|name| !self.is_enabled(name))
            })
    }
}
