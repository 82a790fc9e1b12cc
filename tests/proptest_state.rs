//! Property-based tests for selection, filtering and sorting.
//!
//! Exercises the invariants the views rely on across random trees and lists.

use modshelf::domain::sorting::{parse_size, sort_children, sort_entry_indices, ListSortKey, SortSpec, TreeSortKey};
use modshelf::domain::visibility::{compute_filter, strategy_for, TextFilterStrategy};
use modshelf::model::{CategoryRecord, LoadOrderEntry, ModId, ModItem, ModTree, TreeNode, DEFAULT_CATEGORY};
use modshelf::state::{SelectModifiers, SelectionState, TreeViewState};
use proptest::prelude::*;

fn mod_ids(n: usize) -> Vec<ModId> {
    (0..n).map(|i| format!("data/mod_{i:03}.pack").parse().unwrap()).collect()
}

fn tree_from(names: &[String]) -> ModTree {
    let children = names
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let mut item = ModItem::new(format!("data/{name}_{i}.pack").parse().unwrap(), name.clone());
            item.creator = if i % 2 == 0 { "even".into() } else { "odd".into() };
            item
        })
        .collect();
    ModTree::from_records(vec![
        CategoryRecord {
            id: "Graphics".parse().unwrap(),
            children: Vec::new(),
        },
        CategoryRecord {
            id: DEFAULT_CATEGORY.parse().unwrap(),
            children,
        },
    ])
    .unwrap()
}

fn entries(types: &[u8]) -> Vec<LoadOrderEntry> {
    types
        .iter()
        .enumerate()
        .map(|(i, t)| LoadOrderEntry {
            id: format!("data/e{i}.pack").parse().unwrap(),
            pack: format!("Pack {i}"),
            entry_type: format!("type{t}"),
            order: i as i32,
            location: String::new(),
            steam_id: String::new(),
        })
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn range_selection_covers_exactly_the_span(n in 1usize..40, a in 0usize..40, b in 0usize..40) {
        let (a, b) = (a % n, b % n);
        let ids = mod_ids(n);
        let visible: Vec<TreeNode> = ids.iter().cloned().map(TreeNode::Mod).collect();

        let mut selection = SelectionState::new();
        selection.select(visible[a].clone(), SelectModifiers::PLAIN, &visible);
        selection.select(visible[b].clone(), SelectModifiers::RANGE, &visible);

        let (lo, hi) = (a.min(b), a.max(b));
        prop_assert_eq!(selection.len(), hi - lo + 1);
        for (i, id) in ids.iter().enumerate() {
            prop_assert_eq!(selection.is_mod_selected(id.as_str()), (lo..=hi).contains(&i));
        }
    }

    #[test]
    fn selection_never_mixes_kinds(n in 1usize..20, clicks in prop::collection::vec((0usize..20, any::<bool>(), any::<bool>()), 1..30)) {
        let ids = mod_ids(n);
        let mut visible: Vec<TreeNode> = vec![TreeNode::Category("Graphics".parse().unwrap())];
        visible.extend(ids.iter().cloned().map(TreeNode::Mod));

        let mut selection = SelectionState::new();
        for (index, extend, range) in clicks {
            let node = visible[index % visible.len()].clone();
            selection.select(node, SelectModifiers { extend, range }, &visible);
            prop_assert!(selection.selected_mods().is_empty() || selection.selected_categories().is_empty());
        }
    }

    #[test]
    fn filter_text_is_idempotent(text in "[a-z ]{0,12}") {
        let mut view = TreeViewState::new();
        let first = view.set_filter_text(&text);
        prop_assert_eq!(first, !text.is_empty());
        prop_assert!(!view.set_filter_text(&text));
    }

    #[test]
    fn filter_shows_only_matching_mods(names in prop::collection::vec("[a-z]{1,8}", 1..20), needle in "[a-z]{1,3}") {
        let tree = tree_from(&names);
        let outcome = compute_filter(&tree, &TextFilterStrategy::new(&needle));
        let again = compute_filter(&tree, &TextFilterStrategy::new(&needle));
        prop_assert_eq!(&outcome, &again);

        for item in tree.mods_in_order() {
            let matches = item.id.as_str().contains(needle.as_str());
            prop_assert_eq!(outcome.mod_visible(item.id.as_str()), matches);
        }
        // Every forced-open category is visible
        for id in outcome.forced_open() {
            prop_assert!(outcome.category_visible(id.as_str()));
        }

        let cleared = compute_filter(&tree, strategy_for("").as_ref());
        prop_assert!(!cleared.is_active());
        for item in tree.mods_in_order() {
            prop_assert!(cleared.mod_visible(item.id.as_str()));
        }
    }

    #[test]
    fn tree_sort_is_stable_on_ties(names in prop::collection::vec("[a-z]{1,6}", 1..25)) {
        let tree = tree_from(&names);
        let children = tree.category(DEFAULT_CATEGORY).unwrap().children().to_vec();
        let sorted = sort_children(&children, &tree, SortSpec::ascending(TreeSortKey::Creator));

        prop_assert_eq!(sorted.len(), children.len());
        let position = |id: &ModId| children.iter().position(|c| c == id).unwrap();
        for pair in sorted.windows(2) {
            let a = tree.mod_item(pair[0].as_str()).unwrap();
            let b = tree.mod_item(pair[1].as_str()).unwrap();
            prop_assert!(a.creator <= b.creator);
            if a.creator == b.creator {
                prop_assert!(position(&pair[0]) < position(&pair[1]));
            }
        }
    }

    #[test]
    fn list_sort_is_stable_and_never_renumbers(types in prop::collection::vec(0u8..4, 0..30)) {
        let list = entries(&types);
        let indices = sort_entry_indices(&list, SortSpec::ascending(ListSortKey::Type));

        prop_assert_eq!(indices.len(), list.len());
        for pair in indices.windows(2) {
            let (a, b) = (&list[pair[0]], &list[pair[1]]);
            prop_assert!(a.entry_type <= b.entry_type);
            if a.entry_type == b.entry_type {
                prop_assert!(pair[0] < pair[1]);
            }
        }
        for (i, entry) in list.iter().enumerate() {
            prop_assert_eq!(entry.order, i as i32);
        }

        // Flipping direction twice lands on the same order, ties included
        let spec = SortSpec::ascending(ListSortKey::Type);
        let twice = spec.toggled(ListSortKey::Type).toggled(ListSortKey::Type);
        prop_assert_eq!(twice, spec);
        prop_assert_eq!(sort_entry_indices(&list, twice), indices);
    }

    #[test]
    fn parse_size_scales_by_unit(n in 0u32..1_000_000) {
        let n = u64::from(n);
        prop_assert_eq!(parse_size(&format!("{n}")), n);
        prop_assert_eq!(parse_size(&format!("{n} KB")), n * 1024);
        prop_assert_eq!(parse_size(&format!("{n} mb")), n * 1024 * 1024);
    }

    #[test]
    fn parse_size_never_panics(s in "\\PC{0,40}") {
        let _ = parse_size(&s);
    }
}
