//! An intrusive rank-augmented AVL tree for positional sequences.
//!
//! Elements are ordered by their in-order position rather than by a key. Each node caches the size
//! of its subtree and the size of its left subtree, so the node at any position is found with one
//! root-to-leaf descent, and insertion, removal and concatenation all run in _O(log(n))_ time.
//!
//! [`EditTree`] is a character sequence built on top of [`RankTree`], suitable as the buffer of a
//! text editor.

// Conventions used in comments:
// - The height of a node `x` is denoted `h(x)`. A missing child has height -1.
// - The size of a node `x`, `s(x)`, is the number of nodes in the subtree rooted at `x`.
// - The rank of a node `x`, `r(x)`, is `s(left(x))`: the position of `x` within its own subtree.
// - The balance factor of `x` is `h(left(x)) - h(right(x))`.
//
// Between public operations, every node `x` satisfies:
// 1. `s(x) = s(left(x)) + s(right(x)) + 1`.
// 2. `r(x) = s(left(x))`.
// 3. `h(x) = max(h(left(x)), h(right(x))) + 1`.
// 4. The balance factor of `x` is -1, 0 or 1.
// 5. The parent link of each child of `x` points at `x`.

use core::{
    cell::UnsafeCell, cmp::Ordering, fmt, marker::PhantomPinned, mem, ops::Not, pin::Pin,
    ptr::NonNull,
};

use cordyceps::Linked;

mod debug;
mod edit;
mod error;
mod iter;

#[cfg(any(test, feature = "model"))]
pub mod model;

#[cfg(test)]
mod tests;

pub use edit::{Chars, EditTree};
pub use error::Error;
pub use iter::Iter;

pub trait TreeNode<L>: Linked<L> {
    type Elem;

    fn elem(&self) -> &Self::Elem;
}

/// An intrusive AVL tree ordered by position.
///
/// The tree owns its nodes through [`Linked::Handle`]s. Each node embeds a [`Links`] block which
/// holds its parent and child pointers along with the cached rank, size and height.
pub struct RankTree<T>
where
    T: TreeNode<Links<T>> + ?Sized,
{
    root: Link<T>,
    rotations: usize,
}

pub struct Links<T: ?Sized> {
    inner: UnsafeCell<LinksInner<T>>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Dir {
    Left = 0,
    Right = 1,
}

impl Not for Dir {
    type Output = Dir;

    fn not(self) -> Self::Output {
        match self {
            Dir::Left => Dir::Right,
            Dir::Right => Dir::Left,
        }
    }
}

// The four ways a node can be out of balance, named by the path from the node to its tallest
// grandchild.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Imbalance {
    LeftLeft,
    LeftRight,
    RightRight,
    RightLeft,
}

#[repr(C)]
struct LinksInner<T: ?Sized> {
    parent: Link<T>,
    children: [Link<T>; 2],
    rank: usize,
    size: usize,
    height: i8,
    _unpin: PhantomPinned,
}

type Link<T> = Option<NonNull<T>>;

impl<T> RankTree<T>
where
    T: TreeNode<Links<T>> + ?Sized,
{
    /// Returns a new empty tree.
    pub const fn new() -> RankTree<T> {
        RankTree {
            root: None,
            rotations: 0,
        }
    }

    /// Builds a perfectly balanced tree whose in-order sequence is `items`.
    ///
    /// This operation completes in _O(n)_ time and performs no rotations.
    pub fn from_handles<I>(items: I) -> RankTree<T>
    where
        I: IntoIterator<Item = T::Handle>,
    {
        let nodes: Vec<NonNull<T>> = items.into_iter().map(T::into_ptr).collect();
        let root = unsafe { Self::build_subtree(&nodes, None) };

        let tree = RankTree { root, rotations: 0 };
        log::trace!("built {} nodes with height {}", tree.len(), tree.height());
        tree
    }

    // Splits `nodes` at its midpoint, recursively links both halves beneath the middle node and
    // returns it. Sibling halves differ in length by at most one, so the result is balanced.
    unsafe fn build_subtree(nodes: &[NonNull<T>], parent: Link<T>) -> Link<T> {
        if nodes.is_empty() {
            return None;
        }

        let mid = nodes.len() / 2;
        let node = nodes[mid];

        unsafe {
            let left = Self::build_subtree(&nodes[..mid], Some(node));
            let right = Self::build_subtree(&nodes[mid + 1..], Some(node));

            let links = T::links(node).as_mut();
            links.set_parent(parent);
            links.set_left(left);
            links.set_right(right);
            links.set_rank(mid);
            links.set_size(nodes.len());
            links.set_height(Self::height_of(left).max(Self::height_of(right)) + 1);
        }

        Some(node)
    }

    /// Returns a deep copy of the tree with the same shape, using `clone_node` to copy each node.
    ///
    /// The rotation count of the copy starts at zero.
    pub fn clone_with<F>(&self, mut clone_node: F) -> RankTree<T>
    where
        F: FnMut(&T) -> T::Handle,
    {
        let root = self
            .root
            .map(|root| unsafe { Self::clone_subtree(root, None, &mut clone_node) });

        RankTree { root, rotations: 0 }
    }

    unsafe fn clone_subtree<F>(source: NonNull<T>, parent: Link<T>, clone_node: &mut F) -> NonNull<T>
    where
        F: FnMut(&T) -> T::Handle,
    {
        unsafe {
            let copy = T::into_ptr(clone_node(source.as_ref()));
            let source_links = T::links(source).as_ref();

            let left = source_links
                .left()
                .map(|left| Self::clone_subtree(left, Some(copy), clone_node));
            let right = source_links
                .right()
                .map(|right| Self::clone_subtree(right, Some(copy), clone_node));

            let links = T::links(copy).as_mut();
            links.set_parent(parent);
            links.set_left(left);
            links.set_right(right);
            links.set_rank(source_links.rank());
            links.set_size(source_links.size());
            links.set_height(source_links.height());

            copy
        }
    }

    /// Returns `true` if the tree contains no elements.
    pub const fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Returns the number of elements in the tree.
    pub fn len(&self) -> usize {
        unsafe { Self::size_of(self.root) }
    }

    /// Returns the height of the tree: -1 if it is empty, 0 if it holds a single element.
    pub fn height(&self) -> i32 {
        unsafe { Self::height_of(self.root).into() }
    }

    /// Returns the number of single rotations performed since the tree was created.
    ///
    /// A double rotation counts as two.
    pub const fn rotation_count(&self) -> usize {
        self.rotations
    }

    #[doc(hidden)]
    pub fn assert_invariants(&self) {
        if let Some(root) = self.root {
            unsafe {
                assert_eq!(T::links(root).as_ref().parent(), None, "root has a parent");
                self.assert_invariants_at(root);
            }
        }
    }

    #[allow(clippy::only_used_in_recursion)]
    unsafe fn assert_invariants_at(&self, node: NonNull<T>) {
        unsafe {
            let links = T::links(node).as_ref();

            for child in [Dir::Left, Dir::Right] {
                if let Some(child) = links.child(child) {
                    // Ensure child's parent link points to this node.
                    let parent = T::links(child)
                        .as_ref()
                        .parent()
                        .expect("child parent pointer not set");
                    assert_eq!(node, parent);

                    self.assert_invariants_at(child);
                }
            }

            let left = links.left();
            let right = links.right();
            let (left_size, right_size) = (Self::size_of(left), Self::size_of(right));
            let (left_height, right_height) = (Self::height_of(left), Self::height_of(right));

            assert_eq!(links.rank(), left_size, "rank must equal the left subtree size");
            assert_eq!(links.size(), left_size + right_size + 1);
            assert_eq!(links.height(), left_height.max(right_height) + 1);
            assert!(
                (left_height - right_height).abs() <= 1,
                "unbalanced node: left height {left_height}, right height {right_height}"
            );
        }
    }

    /// Returns a reference to the element at position `pos`.
    ///
    /// This operation completes in _O(log(n))_ time.
    pub fn get(&self, pos: usize) -> Option<Pin<&T>> {
        let ptr = self.locate(pos)?;
        unsafe { Some(Pin::new_unchecked(ptr.as_ref())) }
    }

    // Descends from the root, steering by rank, to the node at in-order position `pos`.
    fn locate(&self, mut pos: usize) -> Link<T> {
        let mut opt_cur = self.root;

        loop {
            let cur = opt_cur?;

            unsafe {
                let links = T::links(cur).as_ref();
                let rank = links.rank();

                match pos.cmp(&rank) {
                    Ordering::Less => opt_cur = links.left(),
                    Ordering::Equal => return Some(cur),
                    Ordering::Greater => {
                        pos -= rank + 1;
                        opt_cur = links.right();
                    }
                }
            }
        }
    }

    /// Returns an iterator over the elements of the tree in order.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(self, 0)
    }

    /// Returns an iterator over the elements of the tree in order, starting at position `pos`.
    ///
    /// The iterator is empty if `pos` is not less than the length of the tree.
    pub fn iter_from(&self, pos: usize) -> Iter<'_, T> {
        Iter::new(self, pos)
    }

    /// Inserts an item so that it occupies position `pos`.
    ///
    /// Items previously at `pos` and beyond shift one position to the right. Fails if `pos` is
    /// greater than the length of the tree, in which case `item` is dropped and the tree is left
    /// unchanged.
    ///
    /// This operation completes in _O(log(n))_ time.
    pub fn insert_at(&mut self, pos: usize, item: T::Handle) -> Result<(), crate::Error> {
        let len = self.len();
        if pos > len {
            return Err(crate::Error::OutOfRange { pos, len });
        }

        let ptr = T::into_ptr(item);
        unsafe { T::links(ptr).as_mut().reset() };

        let root = match self.root {
            Some(root) => root,
            None => {
                // Tree is empty. Set `item` as the root and return.
                self.root = Some(ptr);
                return Ok(());
            }
        };

        let mut pos = pos;
        let mut parent = root;

        // Descend the tree, looking for the empty slot at `pos`.
        loop {
            unsafe {
                let parent_links = T::links(parent).as_mut();
                let rank = parent_links.rank();

                let dir = if pos <= rank {
                    Dir::Left
                } else {
                    pos -= rank + 1;
                    Dir::Right
                };

                match parent_links.child(dir) {
                    // Descend.
                    Some(child) => parent = child,

                    // Set `item` as child.
                    None => {
                        parent_links.set_child(dir, Some(ptr));
                        T::links(ptr).as_mut().set_parent(Some(parent));
                        break;
                    }
                }
            }
        }

        unsafe { self.rebalance_from(Some(parent)) };

        Ok(())
    }

    /// Appends an item to the end of the tree.
    pub fn push_back(&mut self, item: T::Handle) {
        let len = self.len();
        let inserted = self.insert_at(len, item);
        debug_assert!(inserted.is_ok());
    }

    /// Removes and returns the item at position `pos`.
    ///
    /// This operation completes in _O(log(n))_ time.
    pub fn remove_at(&mut self, pos: usize) -> Result<T::Handle, crate::Error> {
        let node = self.locate(pos).ok_or(crate::Error::OutOfRange {
            pos,
            len: self.len(),
        })?;

        unsafe { Ok(self.remove(node)) }
    }

    /// Removes an arbitrary node from the tree.
    ///
    /// # Safety
    ///
    /// It is the caller's responsibility to ensure that `node` is an element of `self`, and not any
    /// other tree.
    pub unsafe fn remove(&mut self, node: NonNull<T>) -> T::Handle {
        unsafe {
            self.unlink(node);
            T::from_ptr(node)
        }
    }

    // Detaches `node` from the tree and rebalances, leaving `node` as a lone leaf.
    //
    // There are two cases:
    //
    // 1. `node` has two children.
    //
    //    `node`'s successor (the least node in its right subtree) has no left child. It is
    //    detached from its parent, its right child elevated to replace it, and it then takes
    //    `node`'s place. The path from the successor's old parent upwards is rebalanced.
    //
    // 2. `node` has at most one child.
    //
    //    The child (if any) is elevated to replace `node`, and the path from `node`'s parent upwards
    //    is rebalanced.
    unsafe fn unlink(&mut self, node: NonNull<T>) {
        unsafe {
            let parent = T::links(node).as_ref().parent();
            let left = T::links(node).as_ref().left();
            let right = T::links(node).as_ref().right();

            let rebalance_start = match (left, right) {
                (Some(left), Some(right)) => {
                    let (successor, successor_parent) = self.min_in_subtree(right);

                    if let Some(successor_parent) = successor_parent {
                        // Elevate the successor's right child to replace it.
                        let successor_right = T::links(successor).as_ref().right();
                        T::links(successor_parent)
                            .as_mut()
                            .set_left(successor_right);
                        self.maybe_set_parent(successor_right, Some(successor_parent));

                        T::links(successor).as_mut().set_right(Some(right));
                        T::links(right).as_mut().set_parent(Some(successor));
                    }

                    self.replace_child_or_set_root(parent, node, Some(successor));
                    T::links(successor).as_mut().set_parent(parent);
                    T::links(successor).as_mut().set_left(Some(left));
                    T::links(left).as_mut().set_parent(Some(successor));

                    // Right link is updated above iff succ != right.
                    Some(successor_parent.unwrap_or(successor))
                }

                (Some(child), None) | (None, Some(child)) => {
                    self.replace_child_or_set_root(parent, node, Some(child));
                    T::links(child).as_mut().set_parent(parent);
                    parent
                }

                (None, None) => {
                    self.replace_child_or_set_root(parent, node, None);
                    parent
                }
            };

            self.rebalance_from(rebalance_start);
            T::links(node).as_mut().reset();
        }
    }

    /// Moves every element of `other` onto the end of `self`, leaving `other` empty.
    ///
    /// This operation completes in _O(log(n))_ time, where `n` is the size of the larger tree.
    pub fn append(&mut self, other: &mut RankTree<T>) -> Result<(), crate::Error> {
        if self.root.is_some() && self.root == other.root {
            return Err(crate::Error::SelfConcatenation);
        }

        let Some(other_root) = other.root else {
            return Ok(());
        };

        if self.root.is_none() {
            mem::swap(&mut self.root, &mut other.root);
            return Ok(());
        }

        unsafe {
            // The leftmost node of `other` becomes the joint between the two trees. Rotations
            // needed to detach it are charged to `self`.
            let rotations_before = other.rotations;
            let (joint, _) = other.min_in_subtree(other_root);
            other.unlink(joint);
            self.rotations += other.rotations - rotations_before;
            other.rotations = rotations_before;

            let right = other.root.take();
            self.join(joint, right);
        }

        Ok(())
    }

    // Joins `self`, the lone node `joint` and the tree rooted at `right`, in that order.
    //
    // The spine of the taller tree facing the shorter one is descended to the first subtree `v`
    // with `h(v) <= h(shorter) + 1`. `joint` takes `v`'s place with `v` and the shorter tree as its
    // children, so `joint` is balanced and its new parent is off by at most two, which a single
    // rebalancing pass repairs.
    unsafe fn join(&mut self, joint: NonNull<T>, right: Link<T>) {
        unsafe {
            let left = self.root;
            let left_height = Self::height_of(left);
            let right_height = Self::height_of(right);

            log::trace!("joining trees of height {left_height} and {right_height}");

            let (dir, shorter, taller, shorter_height) = if left_height >= right_height {
                (Dir::Right, right, left, right_height)
            } else {
                (Dir::Left, left, right, left_height)
            };

            let mut opt_parent = None;
            let mut opt_cur = taller;

            while Self::height_of(opt_cur) > shorter_height + 1 {
                opt_parent = opt_cur;
                opt_cur = opt_cur.and_then(|cur| T::links(cur).as_ref().child(dir));
            }

            let joint_links = T::links(joint).as_mut();
            joint_links.set_child(!dir, opt_cur);
            joint_links.set_child(dir, shorter);
            joint_links.set_parent(opt_parent);
            self.maybe_set_parent(opt_cur, Some(joint));
            self.maybe_set_parent(shorter, Some(joint));

            match opt_parent {
                Some(parent) => {
                    T::links(parent).as_mut().set_child(dir, Some(joint));
                    self.root = taller;
                }
                None => self.root = Some(joint),
            }

            self.rebalance_from(Some(joint));
        }
    }

    /// Clears the tree, removing all elements.
    pub fn clear(&mut self) {
        let mut opt_cur = self.root;

        while let Some(cur) = opt_cur {
            unsafe {
                // Descend to the minimum node.
                let (cur, parent) = self.min_in_subtree(cur);
                let parent = parent.or_else(|| T::links(cur).as_ref().parent());

                let right = T::links(cur).as_ref().right();

                // Elevate the node's right child (which may be None).
                self.replace_child_or_set_root(parent, cur, right);
                self.maybe_set_parent(right, parent);

                // Drop the node.
                drop(T::from_ptr(cur));

                // If the node had no right child, climb to the parent. If the node had no parent,
                // the tree is empty.
                opt_cur = right.or(parent);
            }
        }

        debug_assert!(self.root.is_none());
    }

    // Support methods ========================================================

    // Recomputes cached fields and restores balance on every node from `start` up to the root.
    unsafe fn rebalance_from(&mut self, start: Link<T>) {
        let mut opt_cur = start;

        while let Some(cur) = opt_cur {
            unsafe {
                self.update(cur);
                let top = self.rebalance_at(cur);
                opt_cur = T::links(top).as_ref().parent();
            }
        }
    }

    // Restores balance at `node` with a single or double rotation, returning the root of the
    // resulting subtree. `node`'s children must already be balanced.
    unsafe fn rebalance_at(&mut self, node: NonNull<T>) -> NonNull<T> {
        let Some(imbalance) = (unsafe { self.imbalance(node) }) else {
            return node;
        };

        log::trace!("rebalancing {imbalance:?} imbalance");

        let (heavy, double) = match imbalance {
            Imbalance::LeftLeft => (Dir::Left, false),
            Imbalance::LeftRight => (Dir::Left, true),
            Imbalance::RightRight => (Dir::Right, false),
            Imbalance::RightLeft => (Dir::Right, true),
        };

        unsafe {
            let child = T::links(node)
                .as_ref()
                .child(heavy)
                .expect("heavy side must not be empty");

            if double {
                let grandchild = T::links(child)
                    .as_ref()
                    .child(!heavy)
                    .expect("inner grandchild must not be empty");
                self.rotate_twice_at(node, child, grandchild);
                grandchild
            } else {
                self.rotate_at(node, child);
                child
            }
        }
    }

    unsafe fn imbalance(&self, node: NonNull<T>) -> Option<Imbalance> {
        unsafe {
            let heavy = match self.balance_factor(node) {
                2.. => Dir::Left,
                ..=-2 => Dir::Right,
                _ => return None,
            };

            let child = T::links(node).as_ref().child(heavy)?;

            Some(match (heavy, self.balance_factor(child)) {
                (Dir::Left, 0..) => Imbalance::LeftLeft,
                (Dir::Left, _) => Imbalance::LeftRight,
                (Dir::Right, ..=0) => Imbalance::RightRight,
                (Dir::Right, _) => Imbalance::RightLeft,
            })
        }
    }

    // Performs a rotation, moving `up` up and its parent `down` down.
    //
    // The cached fields of `down` and `up` are recomputed; those of their ancestors are not.
    unsafe fn rotate_at(&mut self, down: NonNull<T>, up: NonNull<T>) {
        unsafe {
            // - `down` becomes the `dir` child of `up`.
            // - `across` goes from the `dir` child of `up` to the `!dir` child of `down`.
            let dir = if T::links(down).as_ref().right() == Some(up) {
                Dir::Left
            } else {
                Dir::Right
            };

            let across = T::links(up).as_ref().child(dir);
            T::links(down).as_mut().set_child(!dir, across);
            self.maybe_set_parent(across, Some(down));

            T::links(up).as_mut().set_child(dir, Some(down));
            let parent = T::links(down).as_mut().set_parent(Some(up));
            T::links(up).as_mut().set_parent(parent);

            self.replace_child_or_set_root(parent, down, Some(up));

            self.update(down);
            self.update(up);
        }

        self.rotations += 1;
    }

    // Performs a double rotation, moving the grandchild `up` above both `down_first` and
    // `down_second`.
    unsafe fn rotate_twice_at(
        &mut self,
        down_second: NonNull<T>,
        down_first: NonNull<T>,
        up: NonNull<T>,
    ) {
        unsafe {
            self.rotate_at(down_first, up);
            self.rotate_at(down_second, up);
        }
    }

    // Recomputes the rank, size and height of `node` from its children.
    #[inline]
    unsafe fn update(&mut self, node: NonNull<T>) {
        unsafe {
            let left = T::links(node).as_ref().left();
            let right = T::links(node).as_ref().right();

            let left_size = Self::size_of(left);
            let size = left_size + Self::size_of(right) + 1;
            let height = Self::height_of(left).max(Self::height_of(right)) + 1;

            let links = T::links(node).as_mut();
            links.set_rank(left_size);
            links.set_size(size);
            links.set_height(height);
        }
    }

    unsafe fn maybe_set_parent(&mut self, opt_node: Link<T>, parent: Link<T>) {
        let Some(node) = opt_node else {
            return;
        };

        unsafe { T::links(node).as_mut().set_parent(parent) };
    }

    #[inline]
    unsafe fn replace_child_or_set_root(
        &mut self,
        parent: Link<T>,
        old_child: NonNull<T>,
        new_child: Link<T>,
    ) {
        match parent {
            Some(parent) => unsafe { self.replace_child(parent, old_child, new_child) },
            None => self.root = new_child,
        }
    }

    // Replaces the child pointer of `parent` pointing at `old_child` with `new_child`.
    //
    // `new_child`'s parent pointer is not updated.
    //
    // # Safety
    //
    // The caller must ensure that `old_child` is a child node of `parent`.
    unsafe fn replace_child(
        &mut self,
        parent: NonNull<T>,
        old_child: NonNull<T>,
        new_child: Link<T>,
    ) {
        unsafe {
            let dir = self.which_child(parent, old_child);
            debug_assert_eq!(
                T::links(parent).as_ref().child(dir),
                Some(old_child),
                "`old_child` must be a child of `parent`"
            );

            T::links(parent).as_mut().set_child(dir, new_child);
        }
    }

    // Returns the minimum node in the subtree.
    //
    // If the subtree root is not the minimum, also returns the minimum node's parent.
    #[inline]
    unsafe fn min_in_subtree(&self, root: NonNull<T>) -> (NonNull<T>, Option<NonNull<T>>) {
        let mut parent = None;
        let mut cur = root;

        while let Some(left) = unsafe { T::links(cur).as_ref().left() } {
            parent = Some(cur);
            cur = left;
        }

        (cur, parent)
    }

    // Returns the node following `node` in order.
    unsafe fn successor(&self, node: NonNull<T>) -> Link<T> {
        unsafe {
            if let Some(right) = T::links(node).as_ref().right() {
                return Some(self.min_in_subtree(right).0);
            }

            // Ascend until we arrive from a left child.
            let mut cur = node;
            while let Some(parent) = T::links(cur).as_ref().parent() {
                if self.which_child(parent, cur) == Dir::Left {
                    return Some(parent);
                }

                cur = parent;
            }

            None
        }
    }

    unsafe fn which_child(&self, parent: NonNull<T>, child: NonNull<T>) -> Dir {
        if unsafe { T::links(parent).as_ref().left() } == Some(child) {
            Dir::Left
        } else {
            Dir::Right
        }
    }

    unsafe fn balance_factor(&self, node: NonNull<T>) -> i8 {
        unsafe {
            let links = T::links(node).as_ref();
            Self::height_of(links.left()) - Self::height_of(links.right())
        }
    }

    /// Returns the height of the pointed-to node.
    unsafe fn height_of(node: Link<T>) -> i8 {
        node.map(|n| unsafe { T::links(n).as_ref().height() })
            .unwrap_or(-1)
    }

    /// Returns the size of the pointed-to node.
    unsafe fn size_of(node: Link<T>) -> usize {
        node.map(|n| unsafe { T::links(n).as_ref().size() })
            .unwrap_or(0)
    }
}

impl<T> Default for RankTree<T>
where
    T: TreeNode<Links<T>> + ?Sized,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Drop for RankTree<T>
where
    T: TreeNode<Links<T>> + ?Sized,
{
    fn drop(&mut self) {
        self.clear();
    }
}

impl<T: ?Sized> Links<T> {
    /// Returns links for a detached leaf node.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            inner: UnsafeCell::new(LinksInner {
                parent: None,
                children: [None; 2],
                rank: 0,
                size: 1,
                height: 0,
                _unpin: PhantomPinned,
            }),
        }
    }

    fn reset(&mut self) {
        let inner = self.inner.get_mut();
        inner.parent = None;
        inner.children = [None; 2];
        inner.rank = 0;
        inner.size = 1;
        inner.height = 0;
    }

    #[inline]
    fn rank(&self) -> usize {
        unsafe { (*self.inner.get()).rank }
    }

    #[inline]
    fn size(&self) -> usize {
        unsafe { (*self.inner.get()).size }
    }

    #[inline]
    fn height(&self) -> i8 {
        unsafe { (*self.inner.get()).height }
    }

    #[inline]
    fn parent(&self) -> Link<T> {
        unsafe { (*self.inner.get()).parent }
    }

    #[inline]
    fn child(&self, dir: Dir) -> Link<T> {
        unsafe { (*self.inner.get()).children[dir as usize] }
    }

    #[inline]
    fn left(&self) -> Link<T> {
        self.child(Dir::Left)
    }

    #[inline]
    fn right(&self) -> Link<T> {
        self.child(Dir::Right)
    }

    #[inline]
    fn set_parent(&mut self, parent: Link<T>) -> Link<T> {
        mem::replace(&mut self.inner.get_mut().parent, parent)
    }

    #[inline]
    fn set_child(&mut self, dir: Dir, child: Link<T>) -> Link<T> {
        mem::replace(&mut self.inner.get_mut().children[dir as usize], child)
    }

    #[inline]
    fn set_left(&mut self, left: Link<T>) -> Link<T> {
        self.set_child(Dir::Left, left)
    }

    #[inline]
    fn set_right(&mut self, right: Link<T>) -> Link<T> {
        self.set_child(Dir::Right, right)
    }

    #[inline]
    fn set_rank(&mut self, rank: usize) {
        self.inner.get_mut().rank = rank;
    }

    #[inline]
    fn set_size(&mut self, size: usize) {
        self.inner.get_mut().size = size;
    }

    #[inline]
    fn set_height(&mut self, height: i8) {
        self.inner.get_mut().height = height;
    }
}

impl<T: ?Sized> Default for Links<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ?Sized> fmt::Debug for Links<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Links")
            .field("parent", &self.parent())
            .field("left", &self.left())
            .field("right", &self.right())
            .field("rank", &self.rank())
            .field("size", &self.size())
            .field("height", &self.height())
            .finish()
    }
}
