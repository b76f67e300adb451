//!
//! ## Introduction
//! This crate holds the in-memory model of a crosstool-style toolchain configuration, the
//! data contract behind `cc_toolchain`-flavored build setups: <https://bazel.build/docs/cc-toolchain-config-reference>.
//! It deliberately contains no resolution logic - the `crosshatch` crate consumes this model
//! and computes command lines from it. What lives here:
//!
//! - the configuration types themselves ([`toolchain`], [`feature`], [`artifact`]), shaped
//!   like the wire schema: repeated fields stay ordered `Vec`s, optional scalars default the
//!   way the schema defaults them (e.g. a tool path is crosstool-package-relative unless it
//!   says otherwise, booleans are off unless set)
//! - builders for assembling a configuration in code, since decoding the configuration text
//!   is someone else's job
//! - one-time validation ([`validate`]) of everything that can be checked without a request:
//!   name uniqueness, reference resolution, flag group shape, template syntax
//! - the `%{...}` template scanner ([`template`]) shared between validation and expansion
//!
//! ## Terminology
//!
//! ### Selectables
//! A **feature** is a named unit of conditional configuration. An **action config** binds a
//! logical action name (say `c-compile`) to the tools that can run it, plus its own flags.
//! Features and action configs share one namespace and one activation mechanism, so when the
//! distinction does not matter we call both **selectables**.
//!
//! ### Flag groups
//! Flags hang off features in a small tree: a `flag_set` applies to a set of actions and
//! holds `flag_group`s; each group either carries literal flag templates or nested groups,
//! never both. A group carrying both would have no defensible expansion order, so
//! [`validate`] rejects it outright. After validation, [`feature::FlagGroup::contents`]
//! exposes the tagged leaf-or-nested view the expansion engine works with.
//!
//! ### Requires, implies, provides
//! `requires` lists alternatives of feature sets that must already be active ("any of these
//! conjunctions"); a selectable whose `requires` is unmet is silently not enabled. `implies`
//! pulls further selectables in whenever this one activates. `provides` declares a capability
//! label for mutual exclusion - two active selectables providing the same label is a request
//! bug, and the resolver reports it as such. Only `requires`/`implies`/`with_feature` entries
//! are name references; `provides` values are free-form labels.

pub mod artifact;
pub mod errors;
pub mod feature;
pub mod template;
pub mod toolchain;
pub mod validate;
