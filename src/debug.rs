use core::ptr::NonNull;
use std::{collections::VecDeque, fmt};

use crate::{Links, RankTree, TreeNode};

impl<T> RankTree<T>
where
    T: TreeNode<Links<T>> + ?Sized,
    T::Elem: fmt::Display,
{
    /// Writes the shape of the tree as a Graphviz `dot` graph.
    ///
    /// Each node is labelled `element:size:height`. Missing children are drawn as points.
    pub fn dotgraph<W>(&self, name: &str, mut w: W) -> fmt::Result
    where
        W: fmt::Write,
    {
        let root = match self.root {
            Some(r) => r,
            None => return write!(w, "digraph \"graph-{name}\" {{}}"),
        };

        enum Item<T: ?Sized> {
            Node(NonNull<T>),
            Missing,
        }

        // Elements need not be unique, so nodes are identified by breadth-first order.
        let mut queue = VecDeque::new();
        queue.push_back((0_usize, Item::Node(root)));
        let mut next_id = 1_usize;

        write!(
            w,
            "digraph \"graph-{name}\" {{\n subgraph \"subgraph-{name}\" {{"
        )?;

        let mut links = String::new();

        loop {
            use fmt::Write;
            let remaining = queue.len();
            if remaining == 0 {
                break;
            }

            write!(w, "{{rank=same; ")?;

            for _ in 0..remaining {
                let Some((id, item)) = queue.pop_front() else {
                    break;
                };

                let node = match item {
                    Item::Node(node) => node,
                    Item::Missing => {
                        write!(w, "\"graph{name}-{id}\" [shape=point]; ")?;
                        continue;
                    }
                };

                let node_links = unsafe { T::links(node).as_ref() };
                let elem = unsafe { node.as_ref().elem() };
                write!(
                    w,
                    "\"graph{name}-{id}\" [label=\"{elem}:{}:{}\"]; ",
                    node_links.size(),
                    node_links.height()
                )?;

                for child in [node_links.left(), node_links.right()] {
                    let child_id = next_id;
                    next_id += 1;

                    queue.push_back((child_id, child.map_or(Item::Missing, Item::Node)));
                    writeln!(links, "\"graph{name}-{id}\" -> \"graph{name}-{child_id}\";")?;
                }
            }

            writeln!(w, "}}")?;
        }

        w.write_str(&links)?;

        w.write_str(" }\n}")
    }
}
