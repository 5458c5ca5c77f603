use super::{bushy, tree};
use crate::*;
use serde_json::json;

fn names_where<T: Copy + Default + PartialEq>(t: &Tree, tags: &TagMap<T>, tag: T) -> Vec<String> {
    t.iter()
        .filter(|(id, _)| tags.get(*id) == tag)
        .map(|(_, n)| n.name.clone())
        .collect()
}

#[test]
fn simple_marker_follows_matching_path_from_root() {
    let reference = tree(json!({
        "name": "A",
        "children": [
            { "name": "B", "children": [{ "name": "D" }] },
            { "name": "C" }
        ]
    }));
    let secondary = tree(json!({ "name": "X", "children": [{ "name": "B", "children": [{ "name": "D" }] }] }));
    let tags = mark_simple(&reference, &LevelIndex::build(&secondary));
    assert_eq!(names_where(&reference, &tags, true), vec!["A", "B", "D"]);
}

#[test]
fn simple_marker_does_not_jump_over_unmatched_parents() {
    let reference = tree(json!({
        "name": "A",
        "children": [
            { "name": "B", "children": [{ "name": "D" }] },
            { "name": "C" }
        ]
    }));
    // Depth-1 node named D only: B is not matched, so D (depth 2) never is either.
    let secondary = tree(json!({ "name": "X", "children": [{ "name": "D" }] }));
    let tags = mark_simple(&reference, &LevelIndex::build(&secondary));
    assert_eq!(names_where(&reference, &tags, true), vec!["A"]);
}

#[test]
fn matching_is_depth_bounded() {
    let reference = tree(json!({
        "name": "A",
        "children": [{ "name": "B", "children": [{ "name": "C" }] }]
    }));
    // "C" exists in the secondary tree, but at depth 1 instead of 2.
    let secondary = tree(json!({ "name": "A", "children": [{ "name": "B" }, { "name": "C" }] }));
    let tags = mark_simple(&reference, &LevelIndex::build(&secondary));
    let c = reference.find_by_name("C").unwrap();
    assert!(!tags.get(c));

    let mut tagged: TagMap<PathTag> = TagMap::new(&reference);
    mark_tagged(&reference, &LevelIndex::build(&secondary), &mut tagged, PathTag::SonTree);
    assert_eq!(tagged.get(c), PathTag::None);
}

#[test]
fn root_name_is_irrelevant_and_root_is_always_tagged() {
    let reference = tree(json!({ "name": "A", "children": [{ "name": "B" }] }));
    let secondary = tree(json!({ "name": "unrelated" }));
    let index = LevelIndex::build(&secondary);

    assert!(mark_simple(&reference, &index).get(NodeId::ROOT));

    let mut tags: TagMap<u8> = TagMap::new(&reference);
    tags.set(NodeId::ROOT, 9);
    mark_tagged(&reference, &index, &mut tags, 4);
    assert_eq!(tags.get(NodeId::ROOT), 4);

    let mut alt: TagMap<u8> = TagMap::new(&reference);
    mark_alternating(
        &reference,
        &index,
        &mut alt,
        AlternatingTags {
            value: 2,
            neg_value: 3,
            superior_value: 1,
        },
    );
    assert_eq!(alt.get(NodeId::ROOT), 3);
    assert_eq!(alt.get(NodeId::from_index(1)), 0);
}

#[test]
fn tagged_nodes_form_a_connected_subtree() {
    let reference = tree(bushy(4, 3));
    let secondaries = [
        tree(bushy(2, 2)),
        tree(bushy(4, 1)),
        tree(json!({ "name": "x", "children": [{ "name": "n1", "children": [{ "name": "n2" }] }] })),
    ];

    for secondary in &secondaries {
        let index = LevelIndex::build(secondary);

        let simple = mark_simple(&reference, &index);
        for id in simple.tagged() {
            if let Some(parent) = reference.parent(id) {
                assert!(simple.get(parent), "gap above {}", reference.name(id));
            }
        }

        let mut tagged: TagMap<u8> = TagMap::new(&reference);
        mark_tagged(&reference, &index, &mut tagged, 7);
        for id in tagged.tagged() {
            if let Some(parent) = reference.parent(id) {
                assert_eq!(tagged.get(parent), 7, "gap above {}", reference.name(id));
            }
        }
    }
}

#[test]
fn simple_and_tagged_markers_are_idempotent() {
    let reference = tree(bushy(3, 3));
    let secondary = tree(bushy(3, 2));
    let index = LevelIndex::build(&secondary);

    let first = mark_simple(&reference, &index);
    let second = mark_simple(&reference, &index);
    assert_eq!(first, second);

    let mut tags: TagMap<u8> = TagMap::new(&reference);
    mark_tagged(&reference, &index, &mut tags, 1);
    let once = tags.clone();
    mark_tagged(&reference, &index, &mut tags, 1);
    assert_eq!(tags, once);
}

#[test]
fn tagged_passes_overwrite_in_call_order() {
    let reference = tree(json!({
        "name": "r",
        "children": [{ "name": "a", "children": [{ "name": "b" }] }, { "name": "c" }]
    }));
    let son = tree(json!({ "name": "r", "children": [{ "name": "a", "children": [{ "name": "b" }] }] }));
    let path = tree(json!({ "name": "r", "children": [{ "name": "a" }, { "name": "c" }] }));

    let mut tags: TagMap<u8> = TagMap::new(&reference);
    mark_tagged(&reference, &LevelIndex::build(&son), &mut tags, 1);
    mark_tagged(&reference, &LevelIndex::build(&path), &mut tags, 2);

    // r, a and c carry the later tag; b keeps the earlier one.
    assert_eq!(tags.as_slice(), &[2, 2, 2, 1]);
}

#[test]
fn alternating_marker_flips_on_superior_pivot() {
    // P is the depth-1 pivot pre-tagged 1; Q below it matches too.
    let reference = tree(json!({
        "name": "R",
        "children": [
            { "name": "P", "children": [{ "name": "Q" }, { "name": "Z" }] },
            { "name": "S" }
        ]
    }));
    let secondary = tree(json!({
        "name": "R",
        "children": [{ "name": "P", "children": [{ "name": "Q" }] }]
    }));
    let p = reference.find_by_name("P").unwrap();
    let q = reference.find_by_name("Q").unwrap();
    let z = reference.find_by_name("Z").unwrap();
    let s = reference.find_by_name("S").unwrap();

    let mut tags: TagMap<u8> = TagMap::new(&reference);
    tags.set(p, 1);
    mark_alternating(
        &reference,
        &LevelIndex::build(&secondary),
        &mut tags,
        AlternatingTags {
            value: 2,
            neg_value: 3,
            superior_value: 1,
        },
    );

    assert_eq!(tags.get(NodeId::ROOT), 3);
    assert_eq!(tags.get(p), 3);
    assert_eq!(tags.get(q), 2);
    assert_eq!(tags.get(z), 0);
    assert_eq!(tags.get(s), 0);
}

#[test]
fn alternating_marker_is_not_idempotent_after_a_flip() {
    let reference = tree(json!({ "name": "R", "children": [{ "name": "P" }] }));
    let secondary = tree(json!({ "name": "R", "children": [{ "name": "P" }] }));
    let p = reference.find_by_name("P").unwrap();
    let alt = AlternatingTags {
        value: 2u8,
        neg_value: 3,
        superior_value: 1,
    };

    let mut tags: TagMap<u8> = TagMap::new(&reference);
    tags.set(p, 1);
    mark_alternating(&reference, &LevelIndex::build(&secondary), &mut tags, alt);
    assert_eq!(tags.get(p), 3);

    // The flipped pivot no longer holds the superior value.
    mark_alternating(&reference, &LevelIndex::build(&secondary), &mut tags, alt);
    assert_eq!(tags.get(p), 2);
}

#[test]
fn alternating_marker_does_not_propagate_through_foreign_tags() {
    let reference = tree(json!({
        "name": "R",
        "children": [{ "name": "A", "children": [{ "name": "B" }] }]
    }));
    let a = reference.find_by_name("A").unwrap();
    let b = reference.find_by_name("B").unwrap();
    // Secondary matches B but not A; A keeps an unrelated tag 5.
    let secondary = tree(json!({ "name": "R", "children": [{ "name": "x", "children": [{ "name": "B" }] }] }));

    let mut tags: TagMap<u8> = TagMap::new(&reference);
    tags.set(a, 5);
    mark_alternating(
        &reference,
        &LevelIndex::build(&secondary),
        &mut tags,
        AlternatingTags {
            value: 2,
            neg_value: 3,
            superior_value: 1,
        },
    );
    assert_eq!(tags.get(a), 5);
    assert_eq!(tags.get(b), 0);
}

#[test]
fn alternating_marker_accepts_colliding_values() {
    let reference = tree(json!({ "name": "R", "children": [{ "name": "A" }] }));
    let secondary = tree(json!({ "name": "R", "children": [{ "name": "A" }] }));
    let mut tags: TagMap<u8> = TagMap::new(&reference);
    mark_alternating(
        &reference,
        &LevelIndex::build(&secondary),
        &mut tags,
        AlternatingTags {
            value: 2,
            neg_value: 2,
            superior_value: 2,
        },
    );
    assert_eq!(tags.as_slice(), &[2, 2]);
}

#[test]
fn duplicate_names_at_a_depth_all_match() {
    let reference = tree(json!({
        "name": "R",
        "children": [{ "name": "dup" }, { "name": "dup" }, { "name": "other" }]
    }));
    let secondary = tree(json!({ "name": "R", "children": [{ "name": "dup" }] }));
    let tags = mark_simple(&reference, &LevelIndex::build(&secondary));
    assert_eq!(tags.as_slice(), &[true, true, true, false]);
}

#[test]
fn empty_reference_is_left_alone() {
    let reference = Tree::default();
    let secondary = tree(json!({ "name": "R" }));
    let index = LevelIndex::build(&secondary);
    assert!(mark_simple(&reference, &index).is_empty());
    let mut tags: TagMap<u8> = TagMap::new(&reference);
    mark_tagged(&reference, &index, &mut tags, 1);
    assert!(tags.is_empty());
}

#[test]
fn link_tags_follow_child_and_uniform_links_need_agreement() {
    let reference = tree(json!({ "name": "r", "children": [{ "name": "a" }, { "name": "b" }] }));
    let mut tags: TagMap<u8> = TagMap::new(&reference);
    tags.set(NodeId::ROOT, 1);
    tags.set(NodeId::from_index(1), 1);
    tags.set(NodeId::from_index(2), 2);

    let by_child: Vec<u8> = link_tags(&reference, &tags).into_iter().map(|(_, _, t)| t).collect();
    assert_eq!(by_child, vec![1, 2]);

    let uniform: Vec<u8> = uniform_link_tags(&reference, &tags)
        .into_iter()
        .map(|(_, _, t)| t)
        .collect();
    assert_eq!(uniform, vec![1, 0]);
}
