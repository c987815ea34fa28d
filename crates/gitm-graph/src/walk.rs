//! Ancestry walks over the stored commit graph.

use std::collections::{HashMap, HashSet, VecDeque};

use gitm_store::{CommitStoreExt, ObjectStore};
use gitm_types::ObjectId;

use crate::error::GraphResult;

/// Parent links and commit time for one graph node, as needed by the
/// ordering algorithms.
struct NodeMeta {
    parents: Vec<ObjectId>,
    seconds: i64,
}

/// All commits reachable from `tip` by following parent edges, including
/// `tip` itself.
pub fn reachable_set(store: &dyn ObjectStore, tip: ObjectId) -> GraphResult<HashSet<ObjectId>> {
    let mut visited = HashSet::new();
    let mut queue = VecDeque::new();
    visited.insert(tip);
    queue.push_back(tip);

    while let Some(current) = queue.pop_front() {
        let commit = store.read_commit(&current)?;
        for parent in &commit.parents {
            if visited.insert(*parent) {
                queue.push_back(*parent);
            }
        }
    }

    Ok(visited)
}

/// Returns `true` if `ancestor` is an ancestor-or-self of `descendant`.
pub fn is_ancestor(
    store: &dyn ObjectStore,
    ancestor: ObjectId,
    descendant: ObjectId,
) -> GraphResult<bool> {
    if ancestor == descendant {
        return Ok(true);
    }
    let mut visited = HashSet::new();
    let mut queue = VecDeque::new();
    visited.insert(descendant);
    queue.push_back(descendant);

    while let Some(current) = queue.pop_front() {
        let commit = store.read_commit(&current)?;
        for parent in &commit.parents {
            if *parent == ancestor {
                return Ok(true);
            }
            if visited.insert(*parent) {
                queue.push_back(*parent);
            }
        }
    }

    Ok(false)
}

/// Order a set of commits topologically: parents before children, ties
/// among same-depth commits broken by commit timestamp ascending, then by
/// id for full determinism.
///
/// Kahn's algorithm over the subgraph induced by `set`; parent edges that
/// leave the set are ignored, so partial selections (everything since a
/// base) order correctly.
pub fn topo_order(store: &dyn ObjectStore, set: &HashSet<ObjectId>) -> GraphResult<Vec<ObjectId>> {
    // Load parent lists and timestamps once.
    let mut meta: HashMap<ObjectId, NodeMeta> = HashMap::with_capacity(set.len());
    for id in set {
        let commit = store.read_commit(id)?;
        meta.insert(
            *id,
            NodeMeta {
                parents: commit
                    .parents
                    .iter()
                    .copied()
                    .filter(|p| set.contains(p))
                    .collect(),
                seconds: commit.committer.when.seconds,
            },
        );
    }

    // Forward edges and in-degrees within the set.
    let mut children: HashMap<ObjectId, Vec<ObjectId>> = HashMap::new();
    let mut in_degree: HashMap<ObjectId, usize> = HashMap::new();
    for (id, node) in &meta {
        in_degree.insert(*id, node.parents.len());
        for parent in &node.parents {
            children.entry(*parent).or_default().push(*id);
        }
    }

    let sort_key = |id: &ObjectId| {
        let seconds = meta.get(id).map(|n| n.seconds).unwrap_or(0);
        (seconds, *id)
    };

    // Ready queue, kept sorted for deterministic output.
    let mut ready: Vec<ObjectId> = in_degree
        .iter()
        .filter(|(_, &deg)| deg == 0)
        .map(|(id, _)| *id)
        .collect();
    ready.sort_by_key(sort_key);

    let mut result = Vec::with_capacity(set.len());
    while let Some(current) = ready.first().copied() {
        ready.remove(0);
        result.push(current);

        if let Some(child_ids) = children.get(&current) {
            let mut unlocked = Vec::new();
            for child in child_ids {
                let deg = in_degree.get_mut(child).expect("child is in set");
                *deg -= 1;
                if *deg == 0 {
                    unlocked.push(*child);
                }
            }
            for child in unlocked {
                let key = sort_key(&child);
                let pos = ready
                    .binary_search_by_key(&key, sort_key)
                    .unwrap_or_else(|pos| pos);
                ready.insert(pos, child);
            }
        }
    }

    Ok(result)
}
