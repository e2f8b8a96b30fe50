use core::{fmt, iter::FusedIterator, marker::PhantomPinned, ptr::NonNull};

use cordyceps::Linked;

use crate::{Error, Iter, Links, RankTree, TreeNode};

/// A character sequence supporting the edits of a text editor in logarithmic time.
///
/// Positions are 0-based character indices. Lookup, insertion and removal at any position, and
/// concatenation of two sequences, complete in _O(log(n))_ time. Extracting a substring of
/// length `k` costs _O(k + log(n))_.
///
/// ```
/// use cordyceps_edit_tree::EditTree;
///
/// let mut text = EditTree::from("hello");
/// text.insert(5, '!').unwrap();
/// assert_eq!(text.to_string(), "hello!");
/// assert_eq!(text.remove(0), Ok('h'));
/// assert_eq!(text.substring(0, 4).unwrap(), "ello");
/// ```
pub struct EditTree {
    tree: RankTree<CharNode>,
}

struct CharNode {
    links: Links<CharNode>,
    ch: char,
    _unpin: PhantomPinned,
}

impl CharNode {
    fn new(ch: char) -> Box<CharNode> {
        Box::new(CharNode {
            links: Links::new(),
            ch,
            _unpin: PhantomPinned,
        })
    }
}

unsafe impl Linked<Links<CharNode>> for CharNode {
    type Handle = Box<Self>;

    fn into_ptr(r: Self::Handle) -> NonNull<Self> {
        Box::leak(r).into()
    }

    unsafe fn from_ptr(ptr: NonNull<Self>) -> Self::Handle {
        unsafe { Box::from_raw(ptr.as_ptr()) }
    }

    unsafe fn links(ptr: NonNull<Self>) -> NonNull<Links<CharNode>> {
        let ptr = ptr.as_ptr();
        unsafe { NonNull::new_unchecked(core::ptr::addr_of_mut!((*ptr).links)) }
    }
}

impl TreeNode<Links<CharNode>> for CharNode {
    type Elem = char;

    fn elem(&self) -> &Self::Elem {
        &self.ch
    }
}

impl EditTree {
    /// Creates a new, empty `EditTree`.
    pub const fn new() -> Self {
        Self {
            tree: RankTree::new(),
        }
    }

    /// Returns `true` if the sequence contains no characters.
    pub const fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Returns the number of characters in the sequence.
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    /// Returns the height of the underlying tree: -1 when empty, 0 for a single character.
    pub fn height(&self) -> i32 {
        self.tree.height()
    }

    /// Returns the number of rotations performed since this tree was created.
    ///
    /// A double rotation counts as two.
    pub const fn rotation_count(&self) -> usize {
        self.tree.rotation_count()
    }

    #[doc(hidden)]
    pub fn assert_invariants(&self) {
        self.tree.assert_invariants();
    }

    /// Returns the character at `pos`.
    pub fn get(&self, pos: usize) -> Result<char, Error> {
        self.tree
            .get(pos)
            .map(|node| node.ch)
            .ok_or(Error::OutOfRange {
                pos,
                len: self.len(),
            })
    }

    /// Appends a character to the end of the sequence.
    pub fn push(&mut self, ch: char) {
        self.tree.push_back(CharNode::new(ch));
    }

    /// Inserts a character so that it occupies position `pos`.
    ///
    /// `pos` may equal the length of the sequence, in which case the character is appended.
    pub fn insert(&mut self, pos: usize, ch: char) -> Result<(), Error> {
        let len = self.len();
        if pos > len {
            return Err(Error::OutOfRange { pos, len });
        }

        self.tree.insert_at(pos, CharNode::new(ch))
    }

    /// Removes and returns the character at `pos`.
    pub fn remove(&mut self, pos: usize) -> Result<char, Error> {
        self.tree.remove_at(pos).map(|node| node.ch)
    }

    /// Returns the `length` characters starting at `pos`.
    pub fn substring(&self, pos: usize, length: usize) -> Result<String, Error> {
        let len = self.len();
        let end = pos.saturating_add(length);
        if end > len {
            return Err(Error::OutOfRange { pos: end, len });
        }

        Ok(self.chars_from(pos).take(length).collect())
    }

    /// Moves every character of `other` onto the end of this sequence, leaving `other` empty.
    ///
    /// A tree cannot be concatenated onto itself; the borrow checker already forbids it:
    ///
    /// ```compile_fail
    /// use cordyceps_edit_tree::EditTree;
    ///
    /// let mut text = EditTree::from("abc");
    /// text.concatenate(&mut text).unwrap();
    /// ```
    pub fn concatenate(&mut self, other: &mut EditTree) -> Result<(), Error> {
        self.tree.append(&mut other.tree)
    }

    /// Returns the position of the first occurrence of `needle`, if any.
    ///
    /// This materializes the whole sequence and runs in linear time.
    pub fn find(&self, needle: &str) -> Option<usize> {
        self.find_from(needle, 0)
    }

    /// Returns the position of the first occurrence of `needle` starting at or after `pos`.
    ///
    /// An empty `needle` is found at `pos`. Nothing is found if `pos` is past the end.
    pub fn find_from(&self, needle: &str, pos: usize) -> Option<usize> {
        if pos > self.len() {
            return None;
        }

        let haystack: String = self.chars_from(pos).collect();
        let byte_offset = haystack.find(needle)?;

        Some(pos + haystack[..byte_offset].chars().count())
    }

    /// Returns an iterator over the characters of the sequence.
    pub fn chars(&self) -> Chars<'_> {
        self.chars_from(0)
    }

    /// Returns an iterator over the characters of the sequence, starting at `pos`.
    pub fn chars_from(&self, pos: usize) -> Chars<'_> {
        Chars {
            inner: self.tree.iter_from(pos),
        }
    }

    /// Writes the shape of the underlying tree as a Graphviz `dot` graph.
    pub fn dotgraph<W: fmt::Write>(&self, name: &str, w: W) -> fmt::Result {
        self.tree.dotgraph(name, w)
    }
}

impl Default for EditTree {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for EditTree {
    /// Deep-copies every node, preserving the shape of the tree. The copy's rotation count starts
    /// at zero.
    fn clone(&self) -> Self {
        Self {
            tree: self.tree.clone_with(|node| CharNode::new(node.ch)),
        }
    }
}

impl From<char> for EditTree {
    fn from(ch: char) -> Self {
        let mut tree = Self::new();
        tree.push(ch);
        tree
    }
}

impl From<&str> for EditTree {
    /// Builds a balanced tree in _O(n)_ time.
    fn from(s: &str) -> Self {
        s.chars().collect()
    }
}

impl FromIterator<char> for EditTree {
    fn from_iter<I: IntoIterator<Item = char>>(iter: I) -> Self {
        Self {
            tree: RankTree::from_handles(iter.into_iter().map(CharNode::new)),
        }
    }
}

impl PartialEq for EditTree {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.chars().eq(other.chars())
    }
}

impl Eq for EditTree {}

impl fmt::Display for EditTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use fmt::Write;

        for ch in self.chars() {
            f.write_char(ch)?;
        }

        Ok(())
    }
}

impl fmt::Debug for EditTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.to_string(), f)
    }
}

/// An iterator over the characters of an [`EditTree`].
pub struct Chars<'tree> {
    inner: Iter<'tree, CharNode>,
}

impl Iterator for Chars<'_> {
    type Item = char;

    fn next(&mut self) -> Option<char> {
        self.inner.next().map(|node| node.ch)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for Chars<'_> {}

impl FusedIterator for Chars<'_> {}
