use core::iter::FusedIterator;

use crate::{Link, Links, RankTree, TreeNode};

/// An in-order iterator over the elements of a [`RankTree`].
pub struct Iter<'tree, T: TreeNode<Links<T>> + ?Sized> {
    tree: &'tree RankTree<T>,

    front_cur: Link<T>,

    len: usize,
}

impl<'tree, T: TreeNode<Links<T>> + ?Sized> Iter<'tree, T> {
    pub(crate) fn new(tree: &'tree RankTree<T>, pos: usize) -> Self {
        Iter {
            tree,

            // Locating the first node costs one descent; every later step walks successor links.
            front_cur: tree.locate(pos),
            len: tree.len().saturating_sub(pos),
        }
    }
}

impl<'tree, T: TreeNode<Links<T>> + ?Sized> Iterator for Iter<'tree, T> {
    type Item = &'tree T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.len == 0 {
            return None;
        }

        let cur = self.front_cur?;

        self.front_cur = unsafe { self.tree.successor(cur) };
        self.len -= 1;

        Some(unsafe { cur.as_ref() })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len, Some(self.len))
    }
}

impl<T: TreeNode<Links<T>> + ?Sized> ExactSizeIterator for Iter<'_, T> {}

impl<T: TreeNode<Links<T>> + ?Sized> FusedIterator for Iter<'_, T> {}
