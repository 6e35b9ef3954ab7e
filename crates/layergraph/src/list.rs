//! Sorted adjacency-list backend.
//!
//! Every vertex owns a singly-linked list of `(neighbour, weights)` entries
//! kept in ascending neighbour order. Undirected pairs are filed only under
//! the larger index. Nothing indexes incoming edges, so incoming and
//! undirected queries walk the other vertices' lists looking for a
//! back-reference.

use std::fmt;

use tracing::{debug, trace};

use crate::base::{EdgeFilter, GraphBase, NO_CONNECTION};
use crate::contract::storage::Storage;
use crate::contract::MultiGraph;
use crate::error::GraphResult;

type Link = Option<Box<Entry>>;

struct Entry {
    vertex: usize,
    weights: Box<[f32]>,
    next: Link,
}

impl Entry {
    fn new(vertex: usize, edge_type_count: usize, next: Link) -> Box<Self> {
        let weights = vec![NO_CONNECTION; edge_type_count].into_boxed_slice();
        Box::new(Self {
            vertex,
            weights,
            next,
        })
    }
}

impl fmt::Debug for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entry")
            .field("vertex", &self.vertex)
            .field("weights", &self.weights)
            .finish_non_exhaustive()
    }
}

/// Iterator over one vertex's list.
#[derive(Clone)]
struct Entries<'a> {
    cursor: Option<&'a Entry>,
}

impl<'a> Iterator for Entries<'a> {
    type Item = &'a Entry;

    fn next(&mut self) -> Option<Self::Item> {
        let entry = self.cursor?;
        self.cursor = entry.next.as_deref();
        Some(entry)
    }
}

/// Advance to the link where `key` is or would be filed.
fn seek(mut link: &mut Link, key: usize) -> &mut Link {
    while link.as_ref().is_some_and(|entry| entry.vertex < key) {
        if let Some(entry) = link {
            link = &mut entry.next;
        }
    }
    link
}

/// Formats one list entry by entry.
struct Listing<'a>(Entries<'a>);

impl fmt::Debug for Listing<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.0.clone()).finish()
    }
}

/// Typed multigraph stored as sorted per-vertex linked lists.
pub struct ListGraph {
    base: GraphBase,
    heads: Vec<Link>,
}

impl ListGraph {
    /// Create an empty graph.
    pub fn new(vertex_count: usize, edge_type_count: usize, directed: bool) -> GraphResult<Self> {
        let base = GraphBase::new(vertex_count, edge_type_count, directed)?;
        debug!(
            vertex_count,
            edge_type_count = base.edge_type_count(),
            directed,
            representation = "list",
            "Created graph"
        );
        let heads = (0..vertex_count).map(|_| None).collect();
        Ok(Self { base, heads })
    }

    fn entries(&self, vertex: usize) -> Entries<'_> {
        let cursor = self.heads[vertex].as_deref();
        Entries { cursor }
    }

    /// A fresh copy of one vertex's list, built front to back.
    fn copy_list(&self, vertex: usize) -> Link {
        let mut head: Link = None;
        let mut tail = &mut head;
        for entry in self.entries(vertex) {
            let copy = Box::new(Entry {
                vertex: entry.vertex,
                weights: entry.weights.clone(),
                next: None,
            });
            tail = &mut tail.insert(copy).next;
        }
        head
    }

    /// The entry `owner` files under `key`, if any.
    fn lookup(&self, owner: usize, key: usize) -> Option<&Entry> {
        self.entries(owner)
            .take_while(|entry| entry.vertex <= key)
            .find(|entry| entry.vertex == key)
    }

    /// Whether `source` holds an entry for `target` that passes the filter.
    fn points_to(&self, source: usize, target: usize, filter: EdgeFilter) -> bool {
        self.lookup(source, target)
            .is_some_and(|entry| filter.accepts(&entry.weights))
    }
}

impl Storage for ListGraph {
    fn base(&self) -> &GraphBase {
        &self.base
    }

    fn find_edge(&self, v1: usize, v2: usize) -> Option<&[f32]> {
        let (owner, key) = self.base.owner_and_key(v1, v2);
        self.lookup(owner, key).map(|entry| &entry.weights[..])
    }

    fn find_edge_mut(&mut self, v1: usize, v2: usize) -> Option<&mut [f32]> {
        let (owner, key) = self.base.owner_and_key(v1, v2);
        match seek(&mut self.heads[owner], key) {
            Some(entry) if entry.vertex == key => Some(&mut entry.weights[..]),
            _ => None,
        }
    }

    fn find_or_create_edge(&mut self, v1: usize, v2: usize) -> &mut [f32] {
        let (owner, key) = self.base.owner_and_key(v1, v2);
        let edge_type_count = self.base.edge_type_count();
        let link = seek(&mut self.heads[owner], key);

        let entry = match link.take() {
            Some(entry) if entry.vertex == key => link.insert(entry),
            next => {
                self.base.record_addition();
                let version = self.base.versions().current;
                trace!(v1, v2, version, "Created edge");
                link.insert(Entry::new(key, edge_type_count, next))
            }
        };
        &mut entry.weights[..]
    }

    fn delete_edge(&mut self, v1: usize, v2: usize) -> bool {
        let (owner, key) = self.base.owner_and_key(v1, v2);
        let link = seek(&mut self.heads[owner], key);

        match link.take() {
            Some(entry) if entry.vertex == key => {
                *link = entry.next;
                self.base.record_removal();
                let version = self.base.versions().current;
                trace!(v1, v2, version, "Removed edge");
                true
            }
            other => {
                *link = other;
                false
            }
        }
    }

    fn scan_owned(&self, vertex: usize, filter: EdgeFilter, out: &mut Vec<usize>) {
        out.extend(
            self.entries(vertex)
                .filter(|entry| filter.accepts(&entry.weights))
                .map(|entry| entry.vertex),
        );
    }

    fn scan_incoming(&self, vertex: usize, filter: EdgeFilter, out: &mut Vec<usize>) {
        let n = self.base.vertex_count();
        let incoming = |&source: &usize| self.points_to(source, vertex, filter);
        out.extend((0..n).filter(incoming));
    }

    fn scan_merged(&self, vertex: usize, filter: EdgeFilter, out: &mut Vec<usize>) {
        // Walk the outgoing list and check the gaps between its entries for
        // incoming edges, so the output comes out sorted.
        let incoming = |&source: &usize| self.points_to(source, vertex, filter);
        let mut gap_start = 0;
        for entry in self.entries(vertex) {
            out.extend((gap_start..entry.vertex).filter(incoming));
            if filter.accepts(&entry.weights) || incoming(&entry.vertex) {
                out.push(entry.vertex);
            }
            gap_start = entry.vertex + 1;
        }
        let n = self.base.vertex_count();
        out.extend((gap_start..n).filter(incoming));
    }

    fn scan_undirected(&self, vertex: usize, filter: EdgeFilter, out: &mut Vec<usize>) {
        // Smaller neighbours are in this vertex's own list; larger ones file
        // the pair under themselves.
        self.scan_owned(vertex, filter, out);
        let n = self.base.vertex_count();
        let files_pair = |&larger: &usize| self.points_to(larger, vertex, filter);
        out.extend((vertex + 1..n).filter(files_pair));
    }
}

impl MultiGraph for ListGraph {}

// Derived impls would recurse once per entry, so these walk each list.
impl Clone for ListGraph {
    fn clone(&self) -> Self {
        let heads = (0..self.heads.len())
            .map(|vertex| self.copy_list(vertex))
            .collect();
        Self {
            base: self.base.clone(),
            heads,
        }
    }
}

impl fmt::Debug for ListGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lists: Vec<_> = (0..self.heads.len())
            .map(|vertex| Listing(self.entries(vertex)))
            .collect();
        f.debug_struct("ListGraph")
            .field("base", &self.base)
            .field("lists", &lists)
            .finish()
    }
}

impl Drop for ListGraph {
    fn drop(&mut self) {
        for head in &mut self.heads {
            let mut link = head.take();
            while let Some(mut entry) = link {
                link = entry.next.take();
            }
        }
    }
}
