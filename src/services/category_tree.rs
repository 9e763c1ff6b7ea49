//! In-memory view over the category forest.
//!
//! Categories are stored flat with a `parent_id` back-reference. Every query
//! builds a fresh [`TreeIndex`] from the rows it needs and throws it away
//! afterwards, so nothing here can go stale. All traversals are iterative
//! and keep a visited set, which keeps them finite even on a corrupted,
//! cyclic parent chain.

use std::collections::{BTreeSet, HashMap, HashSet};

use crate::models::{Category, CategoryWithPath};

/// Parent to children adjacency plus an id lookup.
#[derive(Debug, Default, Clone)]
pub struct TreeIndex {
    categories: HashMap<i64, Category>,
    children: HashMap<i64, Vec<i64>>,
}

impl TreeIndex {
    /// Builds the index in one pass. Child lists are sorted by id so the
    /// result does not depend on input order.
    pub fn build(categories: impl IntoIterator<Item = Category>) -> Self {
        let mut index = TreeIndex::default();
        for category in categories {
            if let Some(parent_id) = category.parent_id {
                index.children.entry(parent_id).or_default().push(category.id);
            }
            index.categories.insert(category.id, category);
        }
        for ids in index.children.values_mut() {
            ids.sort_unstable();
        }
        index
    }

    pub fn children_of(&self, id: i64) -> &[i64] {
        self.children.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Every id reachable from `id` through child links, excluding `id`.
    pub fn descendants_of(&self, id: i64) -> BTreeSet<i64> {
        let mut found = BTreeSet::new();
        let mut stack: Vec<i64> = self.children_of(id).to_vec();

        while let Some(current) = stack.pop() {
            if current == id || !found.insert(current) {
                continue;
            }
            stack.extend_from_slice(self.children_of(current));
        }

        found
    }

    /// Whether `proposed_parent_id` may become the parent of `category_id`
    /// without closing a loop.
    pub fn can_reparent(&self, category_id: i64, proposed_parent_id: i64) -> bool {
        proposed_parent_id != category_id
            && !self.descendants_of(category_id).contains(&proposed_parent_id)
    }

    /// The selection widened by the descendants of every selected id.
    pub fn expand(&self, selected: &[i64]) -> BTreeSet<i64> {
        let mut expanded: BTreeSet<i64> = selected.iter().copied().collect();
        for &id in selected {
            expanded.extend(self.descendants_of(id));
        }
        expanded
    }

    /// Nearest icon on the way from `id` up to its root. Stops after as many
    /// steps as there are categories.
    pub fn resolve_icon(&self, id: i64) -> Option<&str> {
        let mut current = self.categories.get(&id);
        let mut steps = 0;

        while let Some(category) = current {
            if let Some(icon) = category.icon_file.as_deref() {
                return Some(icon);
            }
            steps += 1;
            if steps > self.categories.len() {
                tracing::warn!(category_id = id, "Parent chain exceeds category count");
                return None;
            }
            current = category
                .parent_id
                .and_then(|parent_id| self.categories.get(&parent_id));
        }

        None
    }

    /// Categories usable in filters and assignment pick-lists.
    pub fn selectable(&self, type_id: Option<i64>) -> Vec<&Category> {
        let mut options: Vec<&Category> = self
            .categories
            .values()
            .filter(|c| !c.is_unclassified())
            .filter(|c| type_id.map_or(true, |t| c.type_id == t))
            .collect();
        options.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        options
    }

    /// Categories that `category_id` may be moved under: same type, neither
    /// itself nor one of its descendants.
    pub fn parent_options(&self, category_id: i64) -> Vec<&Category> {
        let Some(category) = self.categories.get(&category_id) else {
            return Vec::new();
        };
        let excluded = self.descendants_of(category_id);

        self.selectable(Some(category.type_id))
            .into_iter()
            .filter(|c| c.id != category_id && !excluded.contains(&c.id))
            .collect()
    }

    /// Depth-first pre-order listing with depth and a `"A > B > C"` path,
    /// siblings ordered by name. A category whose parent is missing from the
    /// index is listed as a root.
    pub fn flatten(&self, type_id: Option<i64>) -> Vec<CategoryWithPath> {
        let in_scope = |c: &Category| type_id.map_or(true, |t| c.type_id == t);

        let mut roots: Vec<&Category> = self
            .categories
            .values()
            .filter(|c| in_scope(*c))
            .filter(|c| c.parent_id.map_or(true, |p| !self.categories.contains_key(&p)))
            .collect();
        sort_by_name(&mut roots);

        let mut out = Vec::with_capacity(self.categories.len());
        let mut visited = HashSet::new();
        let mut stack: Vec<(&Category, i64, String)> = roots
            .into_iter()
            .rev()
            .map(|c| (c, 0, c.name.clone()))
            .collect();

        while let Some((category, depth, path)) = stack.pop() {
            if !visited.insert(category.id) {
                continue;
            }

            let mut children: Vec<&Category> = self
                .children_of(category.id)
                .iter()
                .filter_map(|id| self.categories.get(id))
                .filter(|c| in_scope(*c))
                .collect();
            sort_by_name(&mut children);
            for child in children.into_iter().rev() {
                stack.push((child, depth + 1, format!("{} > {}", path, child.name)));
            }

            out.push(CategoryWithPath {
                category: category.clone(),
                path,
                depth,
            });
        }

        out
    }
}

fn sort_by_name(categories: &mut [&Category]) {
    categories.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
}

/// Category restriction applied to a payment item query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryFilter {
    /// Nothing selected: every item matches, including untagged ones.
    Any,
    /// Item matches when one of its categories is in the set.
    Ids(BTreeSet<i64>),
}

impl CategoryFilter {
    pub fn from_selection(selected: &[i64], index: &TreeIndex) -> Self {
        if selected.is_empty() {
            CategoryFilter::Any
        } else {
            CategoryFilter::Ids(index.expand(selected))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cat(id: i64, name: &str, parent_id: Option<i64>, icon: Option<&str>) -> Category {
        Category {
            id,
            name: name.into(),
            type_id: 1,
            parent_id,
            icon_file: icon.map(String::from),
        }
    }

    fn food_tree() -> TreeIndex {
        TreeIndex::build(vec![
            cat(1, "Food", None, Some("food.png")),
            cat(2, "Restaurants", Some(1), None),
            cat(3, "FastFood", Some(2), None),
            cat(4, "Groceries", Some(1), None),
            cat(5, "Rent", None, None),
        ])
    }

    fn set(ids: &[i64]) -> BTreeSet<i64> {
        ids.iter().copied().collect()
    }

    #[test]
    fn test_descendants() {
        let index = food_tree();
        assert_eq!(index.descendants_of(1), set(&[2, 3, 4]));
        assert_eq!(index.descendants_of(2), set(&[3]));
    }

    #[test]
    fn test_leaves_have_no_descendants() {
        let index = food_tree();
        for id in [3, 4, 5] {
            assert!(index.descendants_of(id).is_empty());
        }
        assert!(index.descendants_of(99).is_empty());
    }

    #[test]
    fn test_descendants_terminate_on_cyclic_index() {
        // 1 -> 2 -> 3 -> 1, which the store never writes
        let index = TreeIndex::build(vec![
            cat(1, "A", Some(3), None),
            cat(2, "B", Some(1), None),
            cat(3, "C", Some(2), None),
        ]);
        assert_eq!(index.descendants_of(1), set(&[2, 3]));
        assert_eq!(index.resolve_icon(1), None);
        assert_eq!(index.flatten(None).len(), 0);
    }

    #[test]
    fn test_can_reparent() {
        let index = food_tree();
        assert!(!index.can_reparent(1, 1));
        assert!(!index.can_reparent(1, 3));
        assert!(!index.can_reparent(1, 2));
        assert!(index.can_reparent(3, 1));
        assert!(index.can_reparent(3, 4));
        assert!(index.can_reparent(1, 5));
    }

    #[test]
    fn test_expand() {
        let index = food_tree();
        assert_eq!(index.expand(&[1]), set(&[1, 2, 3, 4]));
        assert_eq!(index.expand(&[2, 5]), set(&[2, 3, 5]));
        assert_eq!(index.expand(&[3]), set(&[3]));
        assert!(index.expand(&[]).is_empty());
    }

    #[test]
    fn test_expand_only_adds_descendants() {
        let index = food_tree();
        for id in 1..=5 {
            let expanded = index.expand(&[id]);
            assert!(expanded.contains(&id));
            let descendants = index.descendants_of(id);
            assert!(expanded.iter().all(|e| *e == id || descendants.contains(e)));
        }
    }

    #[test]
    fn test_empty_selection_is_unfiltered() {
        let index = food_tree();
        assert_eq!(CategoryFilter::from_selection(&[], &index), CategoryFilter::Any);
        assert_ne!(
            CategoryFilter::from_selection(&[], &index),
            CategoryFilter::Ids(BTreeSet::new())
        );
    }

    #[test]
    fn test_filter_includes_descendant_tags() {
        let index = food_tree();
        assert_eq!(
            CategoryFilter::from_selection(&[1], &index),
            CategoryFilter::Ids(set(&[1, 2, 3, 4]))
        );
        assert_eq!(
            CategoryFilter::from_selection(&[3, 5], &index),
            CategoryFilter::Ids(set(&[3, 5]))
        );
    }

    #[test]
    fn test_resolve_icon() {
        let index = food_tree();
        assert_eq!(index.resolve_icon(3), Some("food.png"));
        assert_eq!(index.resolve_icon(1), Some("food.png"));
        assert_eq!(index.resolve_icon(5), None);
        assert_eq!(index.resolve_icon(42), None);
    }

    #[test]
    fn test_resolve_icon_prefers_nearest() {
        let index = TreeIndex::build(vec![
            cat(1, "Food", None, Some("food.png")),
            cat(2, "Restaurants", Some(1), Some("restaurant.png")),
            cat(3, "FastFood", Some(2), None),
        ]);
        assert_eq!(index.resolve_icon(3), Some("restaurant.png"));
    }

    #[test]
    fn test_flatten_paths() {
        let index = food_tree();
        let flat = index.flatten(Some(1));
        let paths: Vec<&str> = flat.iter().map(|c| c.path.as_str()).collect();
        assert_eq!(
            paths,
            vec![
                "Food",
                "Food > Groceries",
                "Food > Restaurants",
                "Food > Restaurants > FastFood",
                "Rent",
            ]
        );
        assert_eq!(flat[3].depth, 2);
        assert_eq!(flat[0].depth, 0);
    }

    #[test]
    fn test_parent_options_exclude_self_descendants_and_unclassified() {
        let mut categories = vec![
            cat(1, "Food", None, None),
            cat(2, "Restaurants", Some(1), None),
            cat(3, "FastFood", Some(2), None),
            cat(5, "Rent", None, None),
            cat(6, "UNCLASSIFIED", None, None),
        ];
        categories.push(Category {
            id: 7,
            name: "Card".into(),
            type_id: 2,
            parent_id: None,
            icon_file: None,
        });
        let index = TreeIndex::build(categories);

        let ids: Vec<i64> = index.parent_options(2).iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![1, 5]);

        let selectable: Vec<i64> = index.selectable(None).iter().map(|c| c.id).collect();
        assert!(!selectable.contains(&6));
        assert!(selectable.contains(&7));
    }
}
