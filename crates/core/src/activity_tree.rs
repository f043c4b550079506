//! Activity tree construction, reconciliation, and visibility pruning.
//!
//! Activities form a tree under a project: each row stores an optional
//! parent-activity id, so the nested shape is rebuilt here from flat rows
//! instead of being modelled as a pointer graph. Everything in this module is
//! pure -- the repository layer decides how the resulting trees are persisted.

use serde::{Deserialize, Serialize};

use crate::types::DbId;

/// A node of a persisted (or to-be-persisted) activity tree.
///
/// `id` is `None` for nodes that have not been inserted yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActivityNode {
    pub id: Option<DbId>,
    pub name: String,
    pub is_deleted: bool,
    pub children: Vec<ActivityNode>,
}

/// A client-submitted activity descriptor.
///
/// `Some(id)` refers to an existing node for reconciliation; `None`, or an id
/// that matches nothing in its sibling scope, means "create".
#[derive(Debug, Clone, Deserialize)]
pub struct ActivityInput {
    #[serde(default)]
    pub id: Option<DbId>,
    pub name: String,
    #[serde(default)]
    pub children: Vec<ActivityInput>,
}

/// A flat activity row as loaded from the store.
#[derive(Debug, Clone)]
pub struct ActivityRecord {
    pub id: DbId,
    pub parent_id: Option<DbId>,
    pub name: String,
    pub is_deleted: bool,
}

/// Allocate a fresh node forest from a descriptor forest.
///
/// Submitted ids are ignored: every node comes out with `id: None` and
/// `is_deleted: false`. Timestamps and project/parent wiring are applied by
/// the repository when the forest is inserted.
pub fn build_tree(inputs: &[ActivityInput]) -> Vec<ActivityNode> {
    inputs.iter().map(build_node).collect()
}

fn build_node(input: &ActivityInput) -> ActivityNode {
    ActivityNode {
        id: None,
        name: input.name.clone(),
        is_deleted: false,
        children: build_tree(&input.children),
    }
}

/// Merge a desired descriptor forest into a persisted sibling set.
///
/// A desired node carrying the id of a persisted sibling updates that node in
/// place: the name is copied and the children are reconciled recursively. A
/// desired node with no id, or with an id not present in this scope, is
/// appended as a fresh subtree. Persisted nodes absent from the desired set
/// are left untouched; deletion only happens through the explicit delete
/// operations.
///
/// Matching is a linear scan per sibling scope. Activity trees in this domain
/// are shallow and small, so no id index is warranted.
pub fn reconcile(persisted: &mut Vec<ActivityNode>, desired: &[ActivityInput]) {
    for input in desired {
        let matched = input
            .id
            .and_then(|id| persisted.iter().position(|node| node.id == Some(id)));
        match matched {
            Some(pos) => {
                let node = &mut persisted[pos];
                node.name = input.name.clone();
                reconcile(&mut node.children, &input.children);
            }
            None => persisted.push(build_node(input)),
        }
    }
}

/// Drop soft-deleted nodes at every level, preserving the relative order and
/// structure of the survivors.
///
/// A deleted parent hides its whole subtree, since nothing below it is
/// reachable from a visible root. Pure and idempotent.
pub fn prune_deleted(nodes: Vec<ActivityNode>) -> Vec<ActivityNode> {
    nodes
        .into_iter()
        .filter(|node| !node.is_deleted)
        .map(|mut node| {
            node.children = prune_deleted(std::mem::take(&mut node.children));
            node
        })
        .collect()
}

/// Rebuild the nested forest from flat rows.
///
/// Children are grouped by parent id and ordered by id at every level. Rows
/// whose parent is not part of the input are dropped rather than promoted to
/// roots. The persisted identity graph is a tree, so every reachable group is
/// visited exactly once.
pub fn assemble(mut records: Vec<ActivityRecord>) -> Vec<ActivityNode> {
    records.sort_by_key(|record| record.id);

    let mut children_of: std::collections::HashMap<Option<DbId>, Vec<ActivityRecord>> =
        std::collections::HashMap::new();
    for record in records {
        children_of.entry(record.parent_id).or_default().push(record);
    }

    attach(None, &mut children_of)
}

fn attach(
    parent: Option<DbId>,
    children_of: &mut std::collections::HashMap<Option<DbId>, Vec<ActivityRecord>>,
) -> Vec<ActivityNode> {
    let Some(records) = children_of.remove(&parent) else {
        return Vec::new();
    };
    records
        .into_iter()
        .map(|record| ActivityNode {
            children: attach(Some(record.id), children_of),
            id: Some(record.id),
            name: record.name,
            is_deleted: record.is_deleted,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(id: Option<DbId>, name: &str, children: Vec<ActivityInput>) -> ActivityInput {
        ActivityInput {
            id,
            name: name.to_string(),
            children,
        }
    }

    fn node(id: DbId, name: &str, children: Vec<ActivityNode>) -> ActivityNode {
        ActivityNode {
            id: Some(id),
            name: name.to_string(),
            is_deleted: false,
            children,
        }
    }

    #[test]
    fn build_tree_allocates_fresh_nodes() {
        let desired = vec![
            input(None, "Act1", vec![input(None, "Act1.1", vec![])]),
            input(None, "Act2", vec![]),
        ];

        let roots = build_tree(&desired);

        assert_eq!(roots.len(), 2);
        assert_eq!(roots[0].name, "Act1");
        assert_eq!(roots[0].children.len(), 1);
        assert_eq!(roots[0].children[0].name, "Act1.1");
        assert_eq!(roots[1].name, "Act2");
        assert!(roots[1].children.is_empty());

        // No node may claim an identity or start out deleted.
        fn check(nodes: &[ActivityNode]) {
            for n in nodes {
                assert_eq!(n.id, None);
                assert!(!n.is_deleted);
                check(&n.children);
            }
        }
        check(&roots);
    }

    #[test]
    fn build_tree_ignores_submitted_ids() {
        let desired = vec![input(Some(99), "Imposter", vec![])];
        let roots = build_tree(&desired);
        assert_eq!(roots[0].id, None);
    }

    #[test]
    fn reconcile_renames_matched_and_appends_new() {
        let mut persisted = vec![node(1, "Act1", vec![node(2, "Act1.1", vec![])])];
        let desired = vec![input(
            Some(1),
            "Act1-Renamed",
            vec![
                input(Some(2), "Act1.1", vec![]),
                input(None, "Act1.2", vec![]),
            ],
        )];

        reconcile(&mut persisted, &desired);

        assert_eq!(persisted.len(), 1);
        assert_eq!(persisted[0].id, Some(1));
        assert_eq!(persisted[0].name, "Act1-Renamed");
        assert_eq!(persisted[0].children.len(), 2);
        assert_eq!(persisted[0].children[0].id, Some(2));
        assert_eq!(persisted[0].children[0].name, "Act1.1");
        assert_eq!(persisted[0].children[1].id, None);
        assert_eq!(persisted[0].children[1].name, "Act1.2");
    }

    #[test]
    fn reconcile_treats_unknown_id_as_create() {
        let mut persisted = vec![node(1, "Act1", vec![])];
        let desired = vec![input(Some(42), "Phantom", vec![])];

        reconcile(&mut persisted, &desired);

        assert_eq!(persisted.len(), 2);
        assert_eq!(persisted[1].id, None);
        assert_eq!(persisted[1].name, "Phantom");
    }

    #[test]
    fn reconcile_leaves_unsubmitted_nodes_untouched() {
        let mut persisted = vec![node(1, "Keep", vec![]), node(2, "AlsoKeep", vec![])];
        let desired = vec![input(Some(1), "Keep-Renamed", vec![])];

        reconcile(&mut persisted, &desired);

        assert_eq!(persisted.len(), 2);
        assert_eq!(persisted[1].id, Some(2));
        assert_eq!(persisted[1].name, "AlsoKeep");
        assert!(!persisted[1].is_deleted);
    }

    #[test]
    fn reconcile_is_idempotent_when_trees_agree() {
        let mut persisted = vec![node(1, "Act1", vec![node(2, "Act1.1", vec![])])];
        let desired = vec![input(
            Some(1),
            "Act1",
            vec![input(Some(2), "Act1.1", vec![])],
        )];

        reconcile(&mut persisted, &desired);
        let once = persisted.clone();
        reconcile(&mut persisted, &desired);

        assert_eq!(persisted, once);
    }

    #[test]
    fn prune_deleted_filters_every_level() {
        let tree = vec![ActivityNode {
            id: Some(1),
            name: "Root".to_string(),
            is_deleted: false,
            children: vec![
                node(2, "Visible", vec![]),
                ActivityNode {
                    id: Some(3),
                    name: "Gone".to_string(),
                    is_deleted: true,
                    // Children of a deleted node disappear with it.
                    children: vec![node(4, "Orphan", vec![])],
                },
                node(5, "AlsoVisible", vec![]),
            ],
        }];

        let pruned = prune_deleted(tree);

        assert_eq!(pruned.len(), 1);
        let children: Vec<&str> = pruned[0]
            .children
            .iter()
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(children, vec!["Visible", "AlsoVisible"]);
    }

    #[test]
    fn prune_deleted_is_idempotent() {
        let tree = vec![
            node(1, "A", vec![]),
            ActivityNode {
                id: Some(2),
                name: "B".to_string(),
                is_deleted: true,
                children: vec![],
            },
        ];

        let once = prune_deleted(tree);
        let twice = prune_deleted(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn assemble_builds_nested_forest_ordered_by_id() {
        let records = vec![
            ActivityRecord {
                id: 3,
                parent_id: Some(1),
                name: "Act1.2".to_string(),
                is_deleted: false,
            },
            ActivityRecord {
                id: 1,
                parent_id: None,
                name: "Act1".to_string(),
                is_deleted: false,
            },
            ActivityRecord {
                id: 2,
                parent_id: Some(1),
                name: "Act1.1".to_string(),
                is_deleted: false,
            },
            ActivityRecord {
                id: 4,
                parent_id: None,
                name: "Act2".to_string(),
                is_deleted: false,
            },
        ];

        let forest = assemble(records);

        assert_eq!(forest.len(), 2);
        assert_eq!(forest[0].id, Some(1));
        let children: Vec<DbId> = forest[0].children.iter().filter_map(|c| c.id).collect();
        assert_eq!(children, vec![2, 3]);
        assert_eq!(forest[1].id, Some(4));
    }

    #[test]
    fn assemble_drops_rows_with_missing_parent() {
        let records = vec![
            ActivityRecord {
                id: 1,
                parent_id: None,
                name: "Root".to_string(),
                is_deleted: false,
            },
            ActivityRecord {
                id: 7,
                parent_id: Some(99),
                name: "Stray".to_string(),
                is_deleted: false,
            },
        ];

        let forest = assemble(records);

        assert_eq!(forest.len(), 1);
        assert_eq!(forest[0].id, Some(1));
    }
}
