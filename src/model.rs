//! Reference-model equivalence checks.
//!
//! Random operation sequences are applied both to an [`EditTree`] and to a `Vec<char>`; results
//! and contents must agree after every step, and tree invariants must hold.

extern crate std;

use std::prelude::v1::*;

use arbitrary::Arbitrary;
use proptest::strategy::{Just, Strategy};

use crate::{EditTree, Error};

/// A position argument, either chosen relative to the current length or taken verbatim.
#[derive(Copy, Clone, Debug, Arbitrary)]
pub enum Position {
    Index(usize),
    Raw(usize),
}

impl Position {
    // `Index` positions wrap to the valid range, which is `0..=len` when `inclusive` is set.
    fn resolve(self, len: usize, inclusive: bool) -> usize {
        match self {
            Position::Index(idx) => {
                let bound = len + inclusive as usize;
                if bound == 0 {
                    idx
                } else {
                    idx % bound
                }
            }
            Position::Raw(pos) => pos,
        }
    }
}

proptest::prop_compose! {
    fn index_strategy()(
        index in 0usize..1000,
    ) -> Position {
        Position::Index(index)
    }
}

proptest::prop_compose! {
    fn raw_strategy()(
        raw in 0usize..64,
    ) -> Position {
        Position::Raw(raw)
    }
}

fn position_strategy() -> impl Strategy<Value = Position> {
    proptest::prop_oneof![4 => index_strategy(), 1 => raw_strategy()]
}

// A small alphabet so that searches actually find things.
fn char_strategy() -> impl Strategy<Value = char> {
    proptest::char::range('a', 'd')
}

fn text_strategy(max_len: usize) -> impl Strategy<Value = String> {
    proptest::collection::vec(char_strategy(), 0..max_len)
        .prop_map(|chars| chars.into_iter().collect::<String>())
}

#[derive(Clone, Debug, Arbitrary)]
pub enum Op {
    Push(char),
    Insert(Position, char),
    Get(Position),
    Remove(Position),
    Substring(Position, u8),
    Append(String),
    Prepend(String),
    Find(String, Position),
    Clone,
}

pub fn op_strategy() -> impl Strategy<Value = Op> {
    proptest::prop_oneof![
        char_strategy().prop_map(Op::Push),
        (position_strategy(), char_strategy()).prop_map(|(pos, ch)| Op::Insert(pos, ch)),
        position_strategy().prop_map(Op::Get),
        position_strategy().prop_map(Op::Remove),
        (position_strategy(), 0u8..16).prop_map(|(pos, len)| Op::Substring(pos, len)),
        text_strategy(40).prop_map(Op::Append),
        text_strategy(40).prop_map(Op::Prepend),
        (text_strategy(4), position_strategy()).prop_map(|(s, pos)| Op::Find(s, pos)),
        Just(Op::Clone),
    ]
}

fn find_in(haystack: &[char], needle: &[char], from: usize) -> Option<usize> {
    if from > haystack.len() {
        return None;
    }

    if needle.is_empty() {
        return Some(from);
    }

    haystack[from..]
        .windows(needle.len())
        .position(|window| window == needle)
        .map(|idx| idx + from)
}

pub fn run_vec_equivalence(ops: Vec<Op>) {
    let mut vec: Vec<char> = Vec::with_capacity(ops.len());
    let mut tree = EditTree::new();

    for (op_id, op) in ops.into_iter().enumerate() {
        let len = vec.len();

        match &op {
            Op::Push(ch) => {
                vec.push(*ch);
                tree.push(*ch);
            }

            Op::Insert(pos, ch) => {
                let pos = pos.resolve(len, true);

                let from_vec = if pos <= len {
                    vec.insert(pos, *ch);
                    Ok(())
                } else {
                    Err(Error::OutOfRange { pos, len })
                };
                let from_tree = tree.insert(pos, *ch);

                assert_eq!(from_vec, from_tree, "Op #{op_id}: {op:?}");
            }

            Op::Get(pos) => {
                let pos = pos.resolve(len, false);

                let from_vec = vec
                    .get(pos)
                    .copied()
                    .ok_or(Error::OutOfRange { pos, len });
                let from_tree = tree.get(pos);

                assert_eq!(from_vec, from_tree, "Op #{op_id}: {op:?}");
            }

            Op::Remove(pos) => {
                let pos = pos.resolve(len, false);

                let from_vec = if pos < len {
                    Ok(vec.remove(pos))
                } else {
                    Err(Error::OutOfRange { pos, len })
                };
                let from_tree = tree.remove(pos);

                assert_eq!(from_vec, from_tree, "Op #{op_id}: {op:?}");
            }

            Op::Substring(pos, length) => {
                let pos = pos.resolve(len, true);
                let length = usize::from(*length);
                let end = pos.saturating_add(length);

                let from_vec = vec
                    .get(pos..end)
                    .map(|chars| chars.iter().collect::<String>())
                    .ok_or(Error::OutOfRange { pos: end, len });
                let from_tree = tree.substring(pos, length);

                assert_eq!(from_vec, from_tree, "Op #{op_id}: {op:?}");
            }

            Op::Append(s) => {
                vec.extend(s.chars());

                let mut other = EditTree::from(s.as_str());
                tree.concatenate(&mut other).unwrap();

                other.assert_invariants();
                assert!(other.is_empty(), "Op #{op_id}: {op:?}");
            }

            Op::Prepend(s) => {
                vec.splice(0..0, s.chars());

                let mut other = EditTree::from(s.as_str());
                other.concatenate(&mut tree).unwrap();

                tree.assert_invariants();
                assert!(tree.is_empty(), "Op #{op_id}: {op:?}");
                tree = other;
            }

            Op::Find(needle, pos) => {
                let pos = pos.resolve(len, true);
                let needle_chars: Vec<char> = needle.chars().collect();

                let from_vec = find_in(&vec, &needle_chars, pos);
                let from_tree = tree.find_from(needle, pos);

                assert_eq!(from_vec, from_tree, "Op #{op_id}: {op:?}");
            }

            Op::Clone => {
                let copy = tree.clone();

                assert_eq!(copy, tree, "Op #{op_id}: {op:?}");
                assert_eq!(copy.height(), tree.height(), "Op #{op_id}: {op:?}");
                assert_eq!(copy.rotation_count(), 0);

                tree = copy;
            }
        }

        tree.assert_invariants();
        assert_eq!(vec.len(), tree.len());
        assert!(vec.iter().copied().eq(tree.chars()), "Op #{op_id}: {op:?}");
    }
}

/// How a tree under test is constructed.
#[derive(Copy, Clone, Debug, Arbitrary)]
pub enum Shape {
    /// Built in one pass from the whole sequence.
    Bulk,
    /// Built by appending one character at a time.
    Pushed,
    /// Built by inserting one character at a time at the front, in reverse.
    Prepended,
}

impl Shape {
    fn build(self, chars: &[char]) -> EditTree {
        match self {
            Shape::Bulk => chars.iter().copied().collect(),

            Shape::Pushed => {
                let mut tree = EditTree::new();
                for &ch in chars {
                    tree.push(ch);
                }
                tree
            }

            Shape::Prepended => {
                let mut tree = EditTree::new();
                for &ch in chars.iter().rev() {
                    tree.insert(0, ch).unwrap();
                }
                tree
            }
        }
    }
}

fn shape_strategy() -> impl Strategy<Value = Shape> {
    proptest::prop_oneof![Just(Shape::Bulk), Just(Shape::Pushed), Just(Shape::Prepended)]
}

#[derive(Clone, Debug, Arbitrary)]
pub struct ConcatEquivalenceInput {
    pub left: Vec<char>,
    pub left_shape: Shape,
    pub right: Vec<char>,
    pub right_shape: Shape,
}

proptest::prop_compose! {
    pub fn concat_input_strategy()(
        left in proptest::collection::vec(char_strategy(), 0..300),
        left_shape in shape_strategy(),
        right in proptest::collection::vec(char_strategy(), 0..300),
        right_shape in shape_strategy(),
    ) -> ConcatEquivalenceInput {
        ConcatEquivalenceInput { left, left_shape, right, right_shape }
    }
}

pub fn run_concat_equivalence(input: ConcatEquivalenceInput) {
    let ConcatEquivalenceInput {
        left,
        left_shape,
        right,
        right_shape,
    } = input;

    let mut left_tree = left_shape.build(&left);
    let mut right_tree = right_shape.build(&right);
    left_tree.assert_invariants();
    right_tree.assert_invariants();

    let rotations_before = left_tree.rotation_count();
    left_tree.concatenate(&mut right_tree).unwrap();

    left_tree.assert_invariants();
    right_tree.assert_invariants();
    assert!(right_tree.is_empty());
    assert_eq!(right_tree.height(), -1);
    assert!(left_tree.rotation_count() >= rotations_before);

    let expected: Vec<char> = left.iter().chain(right.iter()).copied().collect();
    assert_eq!(left_tree.len(), expected.len());
    assert!(expected.iter().copied().eq(left_tree.chars()));

    for (pos, &ch) in expected.iter().enumerate() {
        assert_eq!(left_tree.get(pos), Ok(ch));
    }
}
