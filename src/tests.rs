extern crate std;

use std::{ops::Range, prelude::v1::*};

use proptest::prelude::*;

use crate::model;

use super::*;

// The AVL height bound, with heights counted in edges.
fn max_avl_height(len: usize) -> i32 {
    (1.45 * ((len + 2) as f64).log2()).ceil() as i32
}

#[test]
fn basic_edits() {
    let mut tree = EditTree::new();
    tree.push('a');
    tree.push('b');
    tree.push('c');
    tree.assert_invariants();
    assert_eq!(tree.to_string(), "abc");
    assert_eq!(tree.len(), 3);

    tree.insert(1, 'X').unwrap();
    tree.assert_invariants();
    assert_eq!(tree.to_string(), "aXbc");

    assert_eq!(tree.remove(0), Ok('a'));
    tree.assert_invariants();
    assert_eq!(tree.to_string(), "Xbc");

    assert_eq!(tree.substring(1, 2).unwrap(), "bc");
}

#[test]
fn concatenate_scenario() {
    let mut tree1 = EditTree::from("hello");
    let mut tree2 = EditTree::from("world");

    tree1.concatenate(&mut tree2).unwrap();

    tree1.assert_invariants();
    tree2.assert_invariants();
    assert_eq!(tree1.to_string(), "helloworld");
    assert_eq!(tree1.len(), 10);
    assert_eq!(tree2.len(), 0);
    assert!(tree2.is_empty());
}

#[test]
fn empty_tree() {
    let tree = EditTree::new();
    tree.assert_invariants();

    assert_eq!(tree.len(), 0);
    assert_eq!(tree.height(), -1);
    assert_eq!(tree.rotation_count(), 0);
    assert_eq!(tree.to_string(), "");
    assert_eq!(tree.get(0), Err(Error::OutOfRange { pos: 0, len: 0 }));
    assert_eq!(tree.substring(0, 0).unwrap(), "");
    assert_eq!(EditTree::from("").len(), 0);
    assert_eq!(EditTree::default(), tree);
}

#[test]
fn single_char_tree() {
    let mut tree = EditTree::from('q');
    tree.assert_invariants();

    assert_eq!(tree.len(), 1);
    assert_eq!(tree.height(), 0);
    assert_eq!(tree.get(0), Ok('q'));

    assert_eq!(tree.remove(0), Ok('q'));
    assert!(tree.is_empty());
    assert_eq!(tree.height(), -1);
}

#[test]
fn out_of_range_leaves_tree_unchanged() {
    let mut tree = EditTree::from("abc");

    assert_eq!(tree.get(3), Err(Error::OutOfRange { pos: 3, len: 3 }));
    assert_eq!(tree.insert(4, 'z'), Err(Error::OutOfRange { pos: 4, len: 3 }));
    assert_eq!(tree.remove(3), Err(Error::OutOfRange { pos: 3, len: 3 }));
    assert_eq!(tree.substring(2, 2), Err(Error::OutOfRange { pos: 4, len: 3 }));
    assert_eq!(
        tree.substring(1, usize::MAX),
        Err(Error::OutOfRange {
            pos: usize::MAX,
            len: 3
        })
    );

    tree.assert_invariants();
    assert_eq!(tree.to_string(), "abc");
    assert_eq!(tree.rotation_count(), 0);
}

#[test]
fn insert_at_end_appends() {
    let mut tree = EditTree::from("ab");
    tree.insert(2, 'c').unwrap();
    assert_eq!(tree.to_string(), "abc");
}

#[test]
fn round_trip() {
    for s in ["", "a", "ab", "abc", "hello, world", "ünïcödé ✓"] {
        let tree = EditTree::from(s);
        tree.assert_invariants();
        assert_eq!(tree.to_string(), s);
        assert_eq!(tree.len(), s.chars().count());
    }
}

#[test]
fn positional_consistency() {
    let text: String = (0..200u32)
        .map(|i| char::from(b'a' + (i % 26) as u8))
        .collect();
    let tree = EditTree::from(text.as_str());

    for (pos, ch) in text.chars().enumerate() {
        assert_eq!(tree.get(pos), Ok(ch));
    }
}

#[test]
fn insert_remove_inverse() {
    let original = EditTree::from("the quick brown fox");

    for pos in 0..=original.len() {
        let mut tree = original.clone();
        tree.insert(pos, '#').unwrap();
        tree.assert_invariants();

        assert_eq!(tree.remove(pos), Ok('#'));
        tree.assert_invariants();
        assert_eq!(tree, original);
    }
}

#[test]
fn bulk_build_height() {
    for len in [0, 1, 2, 3, 7, 8, 100, 1000, 4095, 4096] {
        let tree: EditTree = std::iter::repeat('x').take(len).collect();
        tree.assert_invariants();

        assert_eq!(tree.len(), len);
        assert_eq!(tree.rotation_count(), 0);
        assert!(tree.height() <= max_avl_height(len));
    }
}

#[test]
fn front_insertion_stays_balanced() {
    const N: usize = 2000;

    let mut tree = EditTree::new();
    for i in 0..N {
        tree.insert(0, char::from(b'a' + (i % 26) as u8)).unwrap();
    }
    tree.assert_invariants();

    assert_eq!(tree.len(), N);
    assert!(tree.height() <= max_avl_height(N));
    // At most one rotation event, itself at most a double rotation, per insertion.
    assert!(tree.rotation_count() <= 2 * N);
    assert!(tree.rotation_count() > 0);
}

#[test]
fn rotation_counting() {
    // Ascending appends force one single rotation.
    let mut tree = EditTree::new();
    tree.push('a');
    tree.push('b');
    assert_eq!(tree.rotation_count(), 0);
    tree.push('c');
    assert_eq!(tree.rotation_count(), 1);

    // A zig-zag insertion forces a double rotation, which counts as two.
    let mut tree = EditTree::new();
    tree.push('a');
    tree.push('c');
    tree.insert(1, 'b').unwrap();
    tree.assert_invariants();
    assert_eq!(tree.to_string(), "abc");
    assert_eq!(tree.rotation_count(), 2);
    assert_eq!(tree.height(), 1);
}

#[test]
fn balanced_insertion_does_not_rotate() {
    let mut tree = EditTree::from("abcdefg");
    assert_eq!(tree.height(), 2);

    tree.insert(3, 'X').unwrap();
    tree.assert_invariants();

    assert_eq!(tree.to_string(), "abcXdefg");
    assert_eq!(tree.rotation_count(), 0);
}

#[test]
fn clone_is_deep() {
    let mut original = EditTree::new();
    for ch in "zyxwvutsrqponm".chars() {
        original.insert(0, ch).unwrap();
    }
    assert!(original.rotation_count() > 0);

    let mut copy = original.clone();
    copy.assert_invariants();
    assert_eq!(copy, original);
    assert_eq!(copy.height(), original.height());
    assert_eq!(copy.rotation_count(), 0);

    let mut original_shape = String::new();
    let mut copy_shape = String::new();
    original.dotgraph("shape", &mut original_shape).unwrap();
    copy.dotgraph("shape", &mut copy_shape).unwrap();
    assert_eq!(original_shape, copy_shape);

    copy.remove(0).unwrap();
    copy.push('!');
    assert_eq!(original.to_string(), "mnopqrstuvwxyz");
    assert_eq!(copy.to_string(), "nopqrstuvwxyz!");
}

#[test]
fn concatenate_degenerate() {
    // Both empty.
    let mut left = EditTree::new();
    let mut right = EditTree::new();
    left.concatenate(&mut right).unwrap();
    assert!(left.is_empty() && right.is_empty());

    // Empty onto non-empty.
    let mut left = EditTree::from("abc");
    let mut right = EditTree::new();
    left.concatenate(&mut right).unwrap();
    assert_eq!(left.to_string(), "abc");

    // Non-empty onto empty.
    let mut left = EditTree::new();
    let mut right = EditTree::from("abc");
    left.concatenate(&mut right).unwrap();
    left.assert_invariants();
    assert_eq!(left.to_string(), "abc");
    assert!(right.is_empty());

    // Single onto single.
    let mut left = EditTree::from('a');
    let mut right = EditTree::from('b');
    left.concatenate(&mut right).unwrap();
    left.assert_invariants();
    assert_eq!(left.to_string(), "ab");
    assert_eq!(left.height(), 1);
    assert!(right.is_empty());
}

#[test]
fn concatenate_lopsided() {
    let long: String = std::iter::repeat("abcdefgh").take(125).collect();

    let mut left = EditTree::from(long.as_str());
    let mut right = EditTree::from("xyz");
    left.concatenate(&mut right).unwrap();
    left.assert_invariants();
    assert_eq!(left.to_string(), format!("{long}xyz"));

    let mut left = EditTree::from("xyz");
    let mut right = EditTree::from(long.as_str());
    left.concatenate(&mut right).unwrap();
    left.assert_invariants();
    assert_eq!(left.to_string(), format!("xyz{long}"));
    assert!(left.height() <= max_avl_height(left.len()));
}

#[test]
fn concatenated_trees_are_independent() {
    let mut left = EditTree::from("abc");
    let mut right = EditTree::from("def");
    left.concatenate(&mut right).unwrap();

    right.push('z');
    right.assert_invariants();
    left.assert_invariants();
    assert_eq!(left.to_string(), "abcdef");
    assert_eq!(right.to_string(), "z");
}

#[test]
fn find() {
    let tree = EditTree::from("abracadabra");

    assert_eq!(tree.find("abra"), Some(0));
    assert_eq!(tree.find("cad"), Some(4));
    assert_eq!(tree.find("zzz"), None);
    assert_eq!(tree.find(""), Some(0));

    assert_eq!(tree.find_from("abra", 1), Some(7));
    assert_eq!(tree.find_from("a", 11), None);
    assert_eq!(tree.find_from("", 11), Some(11));
    assert_eq!(tree.find_from("a", 12), None);
}

#[test]
fn find_counts_chars_not_bytes() {
    let tree = EditTree::from("äöü-äöü");

    assert_eq!(tree.find("-"), Some(3));
    assert_eq!(tree.find_from("ü", 3), Some(6));
}

#[test]
fn chars_from_position() {
    let tree = EditTree::from("abcdef");

    assert_eq!(tree.chars_from(2).collect::<String>(), "cdef");
    assert_eq!(tree.chars_from(6).count(), 0);
    assert_eq!(tree.chars_from(60).count(), 0);
    assert_eq!(tree.chars().len(), 6);
}

#[test]
fn debug_and_display() {
    let tree = EditTree::from("a\"b");
    assert_eq!(format!("{tree}"), "a\"b");
    assert_eq!(format!("{tree:?}"), "\"a\\\"b\"");
}

#[test]
fn dotgraph() {
    let mut out = String::new();
    EditTree::new().dotgraph("empty", &mut out).unwrap();
    assert_eq!(out, "digraph \"graph-empty\" {}");

    let mut out = String::new();
    EditTree::from("abc").dotgraph("abc", &mut out).unwrap();
    assert!(out.contains("[label=\"b:3:1\"]"));
    assert!(out.contains("[label=\"a:1:0\"]"));
    assert!(out.contains("[label=\"c:1:0\"]"));
    assert!(out.ends_with(" }\n}"));
}

#[test]
fn error_messages() {
    assert_eq!(
        Error::OutOfRange { pos: 5, len: 3 }.to_string(),
        "position 5 is out of range for a sequence of length 3"
    );
    assert_eq!(
        Error::SelfConcatenation.to_string(),
        "cannot concatenate a tree with itself"
    );
}

#[cfg(miri)]
const FUZZ_RANGE: Range<usize> = 0..10;

#[cfg(not(miri))]
const FUZZ_RANGE: Range<usize> = 0..1000;

proptest::proptest! {
    #![proptest_config(ProptestConfig {
        max_shrink_iters: 65536,
        .. ProptestConfig::default()
    })]

    #[test]
    fn vec_equivalence(ops in proptest::collection::vec(model::op_strategy(), FUZZ_RANGE)) {
        model::run_vec_equivalence(ops);
    }

    #[test]
    fn concat_equivalence(input in model::concat_input_strategy()) {
        model::run_concat_equivalence(input);
    }
}
