//!
//! ## Introduction
//! This crate is the resolution engine for crosstool-style toolchain configurations, the
//! conditional-configuration model described here: <https://bazel.build/docs/cc-toolchain-config-reference>.
//! The `crosshatch-crosstool` crate holds the configuration data itself; given one of
//! those plus a request, this crate answers the only question that matters to a build
//! system: *exactly which flags, environment variables, and tool does this action get?*
//!
//! A resolution call runs in three stages:
//!
//! 1. **Feature closure** ([`features`]): from the requested/disabled feature names to
//!    the maximal consistent set of enabled selectables, via a work-queue fixed point
//!    over `implies` with `requires` checks, then a `provides` mutual-exclusion pass.
//! 2. **Per-action gathering** ([`actions`]): every flag/env set of an enabled
//!    selectable that applies to the action and passes its `with_feature` condition, in
//!    toolchain declaration order, plus tool selection and the legacy flag tail.
//! 3. **Expansion** ([`expand`]): each flag group runs its guards, iterates lists, and
//!    substitutes `%{...}` templates against the caller's [`variables::Variables`].
//!
//! ## Terminology
//!
//! ### Activation, silently-unmet requires, provides conflicts
//! Consider:
//!
//! ```text
//! feature { name: "lto"  requires { feature: "opt" }  implies: "thin_archives" }
//! ```
//!
//! Requesting `lto` without `opt` active does *not* fail - `lto` is silently not
//! enabled, by contract. Requesting it with `opt` active enables it and drags
//! `thin_archives` in. Contrast `provides`: two *active* selectables providing the same
//! label abort the whole request, because that is a contradiction in the request rather
//! than an optional piece of configuration that didn't apply.
//!
//! ### Declaration order
//! Output order never depends on activation order, hashing, or request order. Flags come
//! out in the order their owners appear in the toolchain (features first, then action
//! configs), then set order within an owner, then group order within a set. Two requests
//! enabling the same set always produce byte-identical command lines.
//!
//! ### Variables and views
//! The caller supplies per-request [`variables::Variables`] (scalars, lists,
//! structures). During `iterate_over`, the element shadows the iterated name in a child
//! scope for exactly one element's expansion; dotted paths (`%{lib.path}`) descend
//! structure fields. "Not bound" and "bound to the wrong shape" are deliberately
//! distinct failures.
//!
//! ## Sharing
//! A [`features::FeatureResolver`] borrows the toolchain immutably and holds no interior
//! mutability, so it is `Send + Sync` and one instance may serve any number of
//! concurrent resolution calls; results are pure functions of the inputs and are safe to
//! memoize on `(action, requested features, variables)`.

pub mod actions;
pub mod errors;
pub mod expand;
pub mod features;
pub mod macros;
pub mod variables;

#[cfg(test)]
mod tests;
