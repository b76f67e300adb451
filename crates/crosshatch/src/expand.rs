//! Recursive expansion of flag groups and env entries against a variable view.
//!
//! Guards are evaluated against the pre-iteration view; a failed guard means the node
//! contributes nothing, silently. A guard naming an unbound variable fails that guard; a
//! guard reaching a bound variable of the wrong shape is a hard error. Output order is
//! declared order, always - no reordering, deduplication, or sorting.

use crosshatch_crosstool::feature::{EnvEntry, FlagGroup, GroupContents};
use crosshatch_crosstool::template::{self, Piece};
use tracing::trace;

use crate::errors::{ResolutionError, ResolutionResult};
use crate::variables::{Shape, VariableValue, View, truthy};

fn can_expand(group: &FlagGroup, view: &View<'_, '_>) -> ResolutionResult<bool> {
    for name in &group.expand_if_all_available {
        if !view.available(name)? {
            return Ok(false);
        }
    }
    for name in &group.expand_if_none_available {
        if view.available(name)? {
            return Ok(false);
        }
    }
    if let Some(name) = &group.expand_if_true {
        match scalar_guard(view, name)? {
            Some(value) if truthy(value) => {}
            _ => return Ok(false),
        }
    }
    if let Some(name) = &group.expand_if_false {
        match scalar_guard(view, name)? {
            Some(value) if !truthy(value) => {}
            _ => return Ok(false),
        }
    }
    if let Some(condition) = &group.expand_if_equal {
        match scalar_guard(view, &condition.variable)? {
            Some(value) if value == condition.value => {}
            _ => return Ok(false),
        }
    }
    Ok(true)
}

/// Unbound is `None` (the guard just fails); bound-but-not-scalar is an error.
fn scalar_guard<'v>(view: &View<'_, 'v>, name: &str) -> ResolutionResult<Option<&'v str>> {
    match view.lookup(name)? {
        None => Ok(None),
        Some(VariableValue::Scalar(value)) => Ok(Some(value)),
        Some(other) => Err(ResolutionError::WrongShape {
            name: name.to_owned(),
            expected: Shape::Scalar,
            actual: other.shape(),
        }),
    }
}

pub(crate) fn expand_flag_group<'v>(
    group: &'v FlagGroup,
    view: &View<'_, 'v>,
    out: &mut Vec<String>,
) -> ResolutionResult<()> {
    if !can_expand(group, view)? {
        trace!("guard failed; skipping group");
        return Ok(());
    }

    if let Some(iterated) = &group.iterate_over {
        // Iteration preserves list order; each element shadows `iterated` for the
        // duration of its own expansion only.
        for element in view.list(iterated)? {
            let scope = view.bind(iterated, element);
            expand_group_body(group, &scope, out)?;
        }
        Ok(())
    } else {
        expand_group_body(group, view, out)
    }
}

fn expand_group_body<'v>(
    group: &'v FlagGroup,
    view: &View<'_, 'v>,
    out: &mut Vec<String>,
) -> ResolutionResult<()> {
    match group.contents() {
        GroupContents::Flags(flags) => {
            for flag in flags {
                out.push(expand_template(flag, view)?);
            }
        }
        GroupContents::Groups(groups) => {
            for nested in groups {
                expand_flag_group(nested, view, out)?;
            }
        }
    }
    Ok(())
}

pub(crate) fn expand_env_entry<'v>(
    entry: &'v EnvEntry,
    view: &View<'_, 'v>,
    out: &mut Vec<(String, String)>,
) -> ResolutionResult<()> {
    for name in &entry.expand_if_all_available {
        if !view.available(name)? {
            trace!(key = entry.key.as_str(), "guard failed; skipping env entry");
            return Ok(());
        }
    }
    out.push((entry.key.clone(), expand_template(&entry.value, view)?));
    Ok(())
}

/// Substitute every `%{name}` with the scalar the view resolves it to. Placeholders
/// landing on a list or structure are errors; only `iterate_over` consumes those.
fn expand_template(template: &str, view: &View<'_, '_>) -> ResolutionResult<String> {
    let pieces =
        template::parse(template).map_err(|source| ResolutionError::InvalidTemplate {
            template: template.to_owned(),
            source,
        })?;

    let mut expanded = String::new();
    for piece in pieces {
        match piece {
            Piece::Literal(text) => expanded.push_str(text),
            Piece::Percent => expanded.push('%'),
            Piece::Variable(name) => expanded.push_str(view.scalar(name)?),
        }
    }
    Ok(expanded)
}
