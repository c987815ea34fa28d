//! Resolution of parsed expressions against the object and ref stores.

use tracing::debug;

use gitm_refs::{Head, RefStore};
use gitm_store::{CommitStoreExt, ObjectKind, ObjectStore};
use gitm_types::{ObjectId, Timestamp};

use crate::error::{ResolveError, ResolveResult};
use crate::expr::{Anchor, RevSpec, Step};

/// How an expression named its commit.
///
/// Range selection treats branch tips and explicit commits differently,
/// so the resolver reports which one it saw. Tags pin a fixed commit and
/// therefore count as explicit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RefForm {
    /// A bare branch name (or `HEAD` attached to a branch), no modifiers.
    BranchTip { name: String },
    /// Anything else: hash, tag, or any expression with modifiers.
    Explicit,
}

/// The result of resolving a reference expression.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Resolved {
    /// The commit the expression names.
    pub id: ObjectId,
    /// Whether the expression denoted a branch tip or an explicit commit.
    pub form: RefForm,
    /// The original expression, kept for labels and error context.
    pub expr: String,
}

impl Resolved {
    /// The branch name, if the expression denoted a branch tip.
    pub fn branch_name(&self) -> Option<&str> {
        match &self.form {
            RefForm::BranchTip { name } => Some(name),
            RefForm::Explicit => None,
        }
    }
}

/// Resolve a reference expression to a commit.
///
/// Anchor precedence: `HEAD`, exact branch, exact tag, full hash,
/// unambiguous hash prefix (at least 4 hex characters). Fails with a
/// [`ResolveError`] if nothing matches, the match is not a commit, or a
/// modifier walks out of the graph.
pub fn resolve(
    store: &dyn ObjectStore,
    refs: &dyn RefStore,
    expr: &str,
) -> ResolveResult<Resolved> {
    let spec = RevSpec::parse(expr)?;

    let (mut id, tip_name) = resolve_anchor(store, refs, expr, &spec.anchor)?;
    ensure_commit(store, expr, id)?;

    for step in &spec.steps {
        id = match step {
            Step::Parent => first_parent(store, expr, id)?,
            Step::Ancestor(n) => {
                let mut current = id;
                for _ in 0..*n {
                    current = first_parent(store, expr, current)?;
                }
                current
            }
            Step::AtDate(date) => at_date(store, expr, id, date)?,
        };
    }

    let form = match tip_name {
        Some(name) if spec.is_plain() => RefForm::BranchTip { name },
        _ => RefForm::Explicit,
    };
    debug!(expr, id = %id.short_hex(), ?form, "resolved reference");

    Ok(Resolved {
        id,
        form,
        expr: expr.trim().to_string(),
    })
}

/// Resolve the anchor to a commit id, plus the branch name when the anchor
/// was a branch.
fn resolve_anchor(
    store: &dyn ObjectStore,
    refs: &dyn RefStore,
    expr: &str,
    anchor: &Anchor,
) -> ResolveResult<(ObjectId, Option<String>)> {
    let unknown = || ResolveError::UnknownName {
        expr: expr.to_string(),
    };

    let name = match anchor {
        Anchor::Head => {
            return match refs.head()? {
                Some(Head::Symbolic(branch)) => {
                    let reference = refs
                        .read_ref(&format!("refs/heads/{branch}"))?
                        .ok_or_else(unknown)?;
                    Ok((reference.target(), Some(branch)))
                }
                Some(Head::Detached(id)) => Ok((id, None)),
                None => Err(unknown()),
            };
        }
        Anchor::Name(name) => name,
    };

    if let Some(reference) = refs.read_ref(&format!("refs/heads/{name}"))? {
        return Ok((reference.target(), Some(name.clone())));
    }
    if let Some(reference) = refs.read_ref(&format!("refs/tags/{name}"))? {
        return Ok((reference.target(), None));
    }

    let is_hex = !name.is_empty() && name.chars().all(|c| c.is_ascii_hexdigit());
    if is_hex && name.len() == 64 {
        let id = ObjectId::from_hex(name).map_err(|_| unknown())?;
        if store.exists(&id)? {
            return Ok((id, None));
        }
        return Err(unknown());
    }
    if is_hex && name.len() >= 4 {
        let matches: Vec<ObjectId> = store
            .all_ids()?
            .into_iter()
            .filter(|id| id.matches_prefix(name))
            .collect();
        return match matches.len() {
            0 => Err(unknown()),
            1 => Ok((matches[0], None)),
            n => Err(ResolveError::AmbiguousPrefix {
                prefix: name.clone(),
                matches: n,
            }),
        };
    }

    Err(unknown())
}

fn ensure_commit(store: &dyn ObjectStore, expr: &str, id: ObjectId) -> ResolveResult<()> {
    match store.kind_of(&id)? {
        Some(ObjectKind::Commit) => Ok(()),
        Some(kind) => Err(ResolveError::NotACommit {
            expr: expr.to_string(),
            id,
            kind,
        }),
        None => Err(ResolveError::UnknownName {
            expr: expr.to_string(),
        }),
    }
}

fn first_parent(store: &dyn ObjectStore, expr: &str, id: ObjectId) -> ResolveResult<ObjectId> {
    let commit = store.read_commit(&id)?;
    commit
        .parents
        .first()
        .copied()
        .ok_or_else(|| ResolveError::PastRoot {
            expr: expr.to_string(),
        })
}

/// Walk the first-parent chain until a commit at or before `date`.
///
/// This is the reflog-free reading of `@{...}`: the answer is derived from
/// committer timestamps, not from local ref history.
fn at_date(
    store: &dyn ObjectStore,
    expr: &str,
    start: ObjectId,
    date: &Timestamp,
) -> ResolveResult<ObjectId> {
    let mut current = start;
    loop {
        let commit = store.read_commit(&current)?;
        if commit.committer.when.seconds <= date.seconds {
            return Ok(current);
        }
        match commit.parents.first() {
            Some(parent) => current = *parent,
            None => {
                return Err(ResolveError::NoCommitBefore {
                    expr: expr.to_string(),
                })
            }
        }
    }
}
