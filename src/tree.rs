//! The usage tree and its reduction passes.
//!
//! This module holds the core of the tool: an explicit forest built from
//! the path-prefix relationships of the normalized entries, and the two
//! in-place passes that reduce it.
//!
//! 1. **Exclusivization** converts cumulative sizes (self + all
//!    descendants, as du reports them) into exclusive sizes, so no unit
//!    of space is counted in both a directory and a present descendant.
//! 2. **Pruning** collapses below-threshold nodes upward into their
//!    nearest surviving ancestor, so the final forest only contains
//!    directories worth looking at. Forest roots are never pruned: they
//!    are the backstop that keeps every unit of space attributed to
//!    *something* in the report.
//!
//! Both passes are genuine post-order walks: a node is only finalized
//! once all of its children have been. Entries whose parent directory is
//! absent from the input attach to their nearest *present* ancestor
//! instead, so gaps in the measurement (du's own threshold already drops
//! small directories) do not break the containment structure.

use std::collections::HashMap;
use std::mem;
use std::path::{Path, PathBuf};

use crate::normalize::UsageMap;

/// One surviving directory after reduction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReducedEntry {
    /// Canonical absolute path of the directory.
    pub path: PathBuf,

    /// Exclusive size, in the measurement unit (KiB blocks for du).
    pub size: i64,

    /// Whether this entry is a forest root (no present ancestor).
    ///
    /// Roots are exempt from pruning and are reported even when their
    /// size is below the threshold.
    pub is_root: bool,
}

/// A node of the usage forest: a directory, its size, and the present
/// directories nested below it (with no other present directory in
/// between).
#[derive(Debug)]
struct Node {
    path: PathBuf,
    size: i64,
    children: Vec<Node>,
}

/// The usage forest built from normalized entries.
///
/// Usually this is a single tree rooted at the measured directory, but
/// nothing requires that: concatenated du output over unrelated
/// directories simply produces multiple roots, each protected from
/// pruning like the filesystem root would be.
#[derive(Debug)]
pub struct UsageTree {
    roots: Vec<Node>,
}

impl UsageTree {
    /// Build the forest from a normalized usage mapping.
    ///
    /// Each entry becomes a node attached to its nearest present
    /// ancestor (walking up derived parents until a path that exists in
    /// the mapping is found). Entries with no present ancestor — the
    /// filesystem root included, since its derived parent is itself —
    /// become forest roots. Children are ordered lexicographically by
    /// path, which makes every later traversal deterministic.
    #[must_use]
    pub fn from_entries(entries: &UsageMap) -> Self {
        // BTreeMap iteration is lexicographic, so an ancestor always
        // precedes its descendants and child lists come out sorted.
        let paths: Vec<&Path> = entries.keys().map(PathBuf::as_path).collect();
        let index: HashMap<&Path, usize> = paths
            .iter()
            .enumerate()
            .map(|(position, path)| (*path, position))
            .collect();

        let mut children: Vec<Vec<usize>> = vec![Vec::new(); paths.len()];
        let mut root_positions = Vec::new();

        for (position, path) in paths.iter().enumerate() {
            match nearest_present_ancestor(path, &index) {
                Some(ancestor) => children[ancestor].push(position),
                None => root_positions.push(position),
            }
        }

        let roots = root_positions
            .into_iter()
            .map(|position| build_node(position, &paths, entries, &children))
            .collect();

        Self { roots }
    }

    /// Convert cumulative sizes into exclusive sizes, in place.
    ///
    /// For every node, the cumulative sizes of its direct children are
    /// subtracted from it. Since a node's children are exactly its
    /// nearest present descendants, this leaves each node holding only
    /// the space not already attributed to a finer-grained entry.
    pub fn exclusivize(&mut self) {
        for root in &mut self.roots {
            exclusivize_node(root);
        }
    }

    /// Merge every below-threshold node upward, in place.
    ///
    /// Post-order: a node's children are fully pruned before the node
    /// decides which of them to absorb. A merged child transfers its
    /// entire size to this node and its surviving children are
    /// re-parented here — this node *is* their nearest surviving
    /// ancestor. Forest roots are never merge candidates, whatever their
    /// size: a node is only ever evaluated by its parent.
    pub fn prune(&mut self, threshold: i64) {
        for root in &mut self.roots {
            prune_node(root, threshold);
        }
    }

    /// Flatten the forest back into a list of entries, pre-order,
    /// children in lexicographic path order.
    #[must_use]
    pub fn entries(&self) -> Vec<ReducedEntry> {
        let mut collected = Vec::new();
        for root in &self.roots {
            flatten_node(root, true, &mut collected);
        }
        collected
    }

    /// Flatten the forest back into a path-to-size mapping.
    #[must_use]
    pub fn to_map(&self) -> UsageMap {
        self.entries()
            .into_iter()
            .map(|entry| (entry.path, entry.size))
            .collect()
    }

    /// Sum of all node sizes currently in the forest.
    ///
    /// Invariant under pruning: a merge moves size between nodes but
    /// never creates or destroys it.
    #[must_use]
    pub fn total_size(&self) -> i64 {
        self.entries().iter().map(|entry| entry.size).sum()
    }

    /// Number of nodes currently in the forest.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries().len()
    }

    /// Whether the forest contains no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }
}

/// Walk up derived parents of `path` until one is present in the index.
///
/// `Path::parent` returns `None` at the filesystem root, which is what
/// makes the root its own backstop: it can never have an ancestor.
fn nearest_present_ancestor(path: &Path, index: &HashMap<&Path, usize>) -> Option<usize> {
    let mut current = path;
    while let Some(parent) = current.parent() {
        if let Some(&position) = index.get(parent) {
            return Some(position);
        }
        current = parent;
    }
    None
}

/// Recursively materialize the owned node for an arena position.
fn build_node(
    position: usize,
    paths: &[&Path],
    entries: &UsageMap,
    children: &[Vec<usize>],
) -> Node {
    Node {
        path: paths[position].to_path_buf(),
        size: entries[paths[position]],
        children: children[position]
            .iter()
            .map(|&child| build_node(child, paths, entries, children))
            .collect(),
    }
}

fn exclusivize_node(node: &mut Node) {
    for child in &mut node.children {
        // The child's size is still cumulative at this point; subtract
        // before recursing into it.
        node.size -= child.size;
        exclusivize_node(child);
    }
}

fn prune_node(node: &mut Node, threshold: i64) {
    let children = mem::take(&mut node.children);
    for mut child in children {
        prune_node(&mut child, threshold);
        if child.size < threshold {
            node.size += child.size;
            node.children.append(&mut child.children);
        } else {
            node.children.push(child);
        }
    }
}

fn flatten_node(node: &Node, is_root: bool, collected: &mut Vec<ReducedEntry>) {
    collected.push(ReducedEntry {
        path: node.path.clone(),
        size: node.size,
        is_root,
    });
    for child in &node.children {
        flatten_node(child, false, collected);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(pairs: &[(&str, i64)]) -> UsageMap {
        pairs
            .iter()
            .map(|(path, size)| (PathBuf::from(path), *size))
            .collect()
    }

    fn size_of(tree: &UsageTree, path: &str) -> Option<i64> {
        tree.to_map().get(Path::new(path)).copied()
    }

    #[test]
    fn test_from_entries_builds_single_tree() {
        let tree = UsageTree::from_entries(&entries(&[
            ("/a", 100),
            ("/a/b", 40),
            ("/a/c", 30),
            ("/a/c/d", 5),
        ]));

        assert_eq!(tree.len(), 4);
        let roots: Vec<_> = tree.entries().into_iter().filter(|e| e.is_root).collect();
        assert_eq!(roots.len(), 1);
        assert_eq!(roots[0].path, PathBuf::from("/a"));
    }

    #[test]
    fn test_from_entries_bridges_missing_intermediates() {
        // /a/b is absent: /a/b/c attaches to /a, its nearest present ancestor.
        let tree = UsageTree::from_entries(&entries(&[("/a", 100), ("/a/b/c", 20)]));

        let flat = tree.entries();
        assert_eq!(flat.len(), 2);
        assert!(flat.iter().all(|e| e.is_root == (e.path == Path::new("/a"))));
    }

    #[test]
    fn test_from_entries_multiple_roots() {
        let tree = UsageTree::from_entries(&entries(&[("/a", 10), ("/b", 20)]));

        assert!(tree.entries().iter().all(|e| e.is_root));
        assert_eq!(tree.len(), 2);
    }

    #[test]
    fn test_filesystem_root_is_a_root() {
        let tree = UsageTree::from_entries(&entries(&[("/", 100), ("/a", 40)]));

        let flat = tree.entries();
        let root = flat.iter().find(|e| e.path == Path::new("/")).unwrap();
        assert!(root.is_root);
        let child = flat.iter().find(|e| e.path == Path::new("/a")).unwrap();
        assert!(!child.is_root);
    }

    #[test]
    fn test_exclusivize_spec_scenario() {
        let mut tree = UsageTree::from_entries(&entries(&[
            ("/a", 100),
            ("/a/b", 40),
            ("/a/c", 30),
            ("/a/c/d", 5),
        ]));
        tree.exclusivize();

        assert_eq!(size_of(&tree, "/a"), Some(30));
        assert_eq!(size_of(&tree, "/a/b"), Some(40));
        assert_eq!(size_of(&tree, "/a/c"), Some(25));
        assert_eq!(size_of(&tree, "/a/c/d"), Some(5));
    }

    #[test]
    fn test_exclusivize_conserves_rootmost_total() {
        let input = entries(&[
            ("/a", 100),
            ("/a/b", 40),
            ("/a/c", 30),
            ("/a/c/d", 5),
            ("/z", 50),
        ]);
        let mut tree = UsageTree::from_entries(&input);
        tree.exclusivize();

        // Sum of exclusive sizes == sum of root-most cumulative sizes.
        assert_eq!(tree.total_size(), 100 + 50);
    }

    #[test]
    fn test_exclusivize_subtracts_only_at_nearest_present_ancestor() {
        // /a/b/c's cumulative is subtracted from /a (nearest present),
        // not double-subtracted anywhere else.
        let mut tree = UsageTree::from_entries(&entries(&[("/a", 100), ("/a/b/c", 20)]));
        tree.exclusivize();

        assert_eq!(size_of(&tree, "/a"), Some(80));
        assert_eq!(size_of(&tree, "/a/b/c"), Some(20));
    }

    #[test]
    fn test_exclusivize_no_present_ancestor_leaves_entry_untouched() {
        let mut tree = UsageTree::from_entries(&entries(&[("/x/y", 70)]));
        tree.exclusivize();

        assert_eq!(size_of(&tree, "/x/y"), Some(70));
    }

    #[test]
    fn test_exclusivize_can_go_negative_on_inconsistent_input() {
        // Children report more than the parent; the signed size absorbs it.
        let mut tree = UsageTree::from_entries(&entries(&[("/a", 10), ("/a/b", 40)]));
        tree.exclusivize();

        assert_eq!(size_of(&tree, "/a"), Some(-30));
    }

    #[test]
    fn test_prune_spec_scenario() {
        let mut tree = UsageTree::from_entries(&entries(&[
            ("/a", 100),
            ("/a/b", 40),
            ("/a/c", 30),
            ("/a/c/d", 5),
        ]));
        tree.exclusivize();
        tree.prune(20);

        let map = tree.to_map();
        assert_eq!(map.len(), 3);
        assert_eq!(map[Path::new("/a")], 30);
        assert_eq!(map[Path::new("/a/b")], 40);
        assert_eq!(map[Path::new("/a/c")], 30);
    }

    #[test]
    fn test_prune_conserves_total_size() {
        let mut tree = UsageTree::from_entries(&entries(&[
            ("/a", 100),
            ("/a/b", 40),
            ("/a/c", 30),
            ("/a/c/d", 5),
        ]));
        tree.exclusivize();
        let before = tree.total_size();
        tree.prune(20);

        assert_eq!(tree.total_size(), before);
    }

    #[test]
    fn test_prune_transitive_across_levels() {
        // Two small sibling leaves merge into their parent, which then
        // becomes small enough to merge into the root in the same pass.
        let mut tree = UsageTree::from_entries(&entries(&[
            ("/r", 200),
            ("/r/p", 30),
            ("/r/p/x", 12),
            ("/r/p/y", 13),
        ]));
        tree.exclusivize();
        // /r = 170, /r/p = 5, /r/p/x = 12, /r/p/y = 13
        tree.prune(50);

        let map = tree.to_map();
        assert_eq!(map.len(), 1);
        assert_eq!(map[Path::new("/r")], 200);
    }

    #[test]
    fn test_prune_reparents_surviving_grandchildren() {
        // /a/b is merged away but its large child /a/b/c survives and is
        // re-parented under /a.
        let mut tree = UsageTree::from_entries(&entries(&[
            ("/a", 200),
            ("/a/b", 105),
            ("/a/b/c", 100),
        ]));
        tree.exclusivize();
        // /a = 95, /a/b = 5, /a/b/c = 100
        tree.prune(50);

        let map = tree.to_map();
        assert_eq!(map.len(), 2);
        assert_eq!(map[Path::new("/a")], 100);
        assert_eq!(map[Path::new("/a/b/c")], 100);
    }

    #[test]
    fn test_prune_never_removes_root() {
        let mut tree = UsageTree::from_entries(&entries(&[("/a", 3)]));
        tree.exclusivize();
        tree.prune(1000);

        assert_eq!(size_of(&tree, "/a"), Some(3));
    }

    #[test]
    fn test_prune_never_removes_any_forest_root() {
        let mut tree = UsageTree::from_entries(&entries(&[("/a", 3), ("/b", 4)]));
        tree.exclusivize();
        tree.prune(1000);

        assert_eq!(tree.len(), 2);
    }

    #[test]
    fn test_prune_threshold_closure() {
        let mut tree = UsageTree::from_entries(&entries(&[
            ("/a", 500),
            ("/a/b", 120),
            ("/a/b/c", 60),
            ("/a/d", 90),
            ("/a/e", 10),
        ]));
        tree.exclusivize();
        tree.prune(50);

        for entry in tree.entries() {
            assert!(
                entry.size >= 50 || entry.is_root,
                "{} = {} below threshold",
                entry.path.display(),
                entry.size
            );
        }
    }

    #[test]
    fn test_prune_exact_threshold_is_kept() {
        let mut tree = UsageTree::from_entries(&entries(&[("/a", 100), ("/a/b", 50)]));
        tree.exclusivize();
        tree.prune(50);

        assert_eq!(size_of(&tree, "/a/b"), Some(50));
    }

    #[test]
    fn test_entries_order_is_deterministic() {
        let map = entries(&[("/a", 10), ("/a/c", 1), ("/a/b", 2), ("/b", 3)]);
        let first: Vec<_> = UsageTree::from_entries(&map)
            .entries()
            .into_iter()
            .map(|e| e.path)
            .collect();
        let second: Vec<_> = UsageTree::from_entries(&map)
            .entries()
            .into_iter()
            .map(|e| e.path)
            .collect();

        assert_eq!(first, second);
        assert_eq!(first[0], PathBuf::from("/a"));
        assert_eq!(first[1], PathBuf::from("/a/b"));
    }

    #[test]
    fn test_empty_map_yields_empty_forest() {
        let tree = UsageTree::from_entries(&UsageMap::new());

        assert!(tree.is_empty());
        assert_eq!(tree.len(), 0);
    }
}
