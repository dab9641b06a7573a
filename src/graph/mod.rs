use std::collections::{HashMap, HashSet, VecDeque};
use std::hash::Hash;

use thiserror::Error;

pub mod keyword;

/// Error types for graph construction
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GraphError {
    #[error("Vertex already present in graph")]
    DuplicateVertex,
    #[error("Vertex not present in graph")]
    MissingVertex,
    #[error("Self-loops are not allowed")]
    SelfLoop,
}

/// A vertex and the indices of its neighbors
#[derive(Debug, Clone)]
struct Vertex<T> {
    item: T,
    neighbors: HashSet<usize>,
}

/// Undirected graph over arbitrary hashable items
///
/// Vertices live in an arena indexed by insertion order; a side table maps
/// items to their indices so traversal works on `usize` rather than cloned
/// items. Mutation is limited to adding vertices and edges; queries on items
/// that were never added degrade to "not related" rather than failing, so
/// batch scoring never aborts on an unknown item.
#[derive(Debug, Clone)]
pub struct RelationGraph<T> {
    vertices: Vec<Vertex<T>>,
    index: HashMap<T, usize>,
    edge_count: usize,
}

impl<T> Default for RelationGraph<T>
where
    T: Eq + Hash + Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> RelationGraph<T>
where
    T: Eq + Hash + Clone,
{
    /// Creates an empty graph
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            index: HashMap::new(),
            edge_count: 0,
        }
    }

    /// Adds a vertex, failing if the item is already present
    pub fn add_vertex(&mut self, item: T) -> Result<(), GraphError> {
        if self.index.contains_key(&item) {
            return Err(GraphError::DuplicateVertex);
        }
        self.insert_vertex(item);
        Ok(())
    }

    /// Adds an undirected edge between two existing vertices
    pub fn add_edge(&mut self, item1: &T, item2: &T) -> Result<(), GraphError> {
        if item1 == item2 {
            return Err(GraphError::SelfLoop);
        }
        let a = self.index_of(item1).ok_or(GraphError::MissingVertex)?;
        let b = self.index_of(item2).ok_or(GraphError::MissingVertex)?;
        self.link(a, b);
        Ok(())
    }

    /// Adds every edge in the iterator, creating missing vertices on the fly
    ///
    /// Re-adding an existing edge is harmless; self-loops still fail.
    pub fn add_all_edges<I>(&mut self, edges: I) -> Result<(), GraphError>
    where
        I: IntoIterator<Item = (T, T)>,
    {
        for (item1, item2) in edges {
            if item1 == item2 {
                return Err(GraphError::SelfLoop);
            }
            let a = match self.index_of(&item1) {
                Some(i) => i,
                None => self.insert_vertex(item1),
            };
            let b = match self.index_of(&item2) {
                Some(i) => i,
                None => self.insert_vertex(item2),
            };
            self.link(a, b);
        }
        Ok(())
    }

    /// Returns true when the item has a vertex in the graph
    pub fn contains(&self, item: &T) -> bool {
        self.index.contains_key(item)
    }

    /// Returns true when the two items share an edge
    ///
    /// Absent items are simply not adjacent.
    pub fn adjacent(&self, item1: &T, item2: &T) -> bool {
        match (self.index_of(item1), self.index_of(item2)) {
            (Some(a), Some(b)) => self.vertices[a].neighbors.contains(&b),
            _ => false,
        }
    }

    /// Returns true when a path of any length joins the two items
    pub fn connected(&self, item1: &T, item2: &T) -> bool {
        match (self.index_of(item1), self.index_of(item2)) {
            (Some(a), Some(b)) => self.connected_indices(a, b),
            _ => false,
        }
    }

    /// Returns true when every vertex is reachable from every other
    ///
    /// Edge-count bounds decide most graphs without a traversal: enough edges
    /// force connectivity, too few make it impossible. Only the middle band
    /// is actually traversed.
    pub fn is_connected_graph(&self) -> bool {
        let n = self.vertices.len();
        if n <= 1 {
            return true;
        }
        if self.edge_count >= (n - 1) * (n - 2) / 2 + 1 {
            return true;
        }
        if self.edge_count < n - 1 {
            return false;
        }
        self.reachable_from(0) == n
    }

    /// Finds a shortest path between two items by breadth-first search
    ///
    /// Returns the number of vertices on the path together with the path
    /// itself; a path from an item to itself has length 1. Returns `None`
    /// when either item is absent or no path exists. Among equal-length
    /// paths the choice is unspecified.
    pub fn shortest_path(&self, start: &T, end: &T) -> Option<(usize, Vec<T>)> {
        let (from, to) = match (self.index_of(start), self.index_of(end)) {
            (Some(a), Some(b)) => (a, b),
            _ => return None,
        };
        if !self.connected_indices(from, to) {
            return None;
        }

        // BFS over whole paths: the first dequeued path ending at the target
        // is a shortest one.
        let mut queue: VecDeque<Vec<usize>> = VecDeque::new();
        queue.push_back(vec![from]);
        let mut expanded = vec![false; self.vertices.len()];

        while let Some(path) = queue.pop_front() {
            let vertex = path[path.len() - 1];
            if vertex == to {
                let items = path
                    .iter()
                    .map(|&i| self.vertices[i].item.clone())
                    .collect();
                return Some((path.len(), items));
            }
            if expanded[vertex] {
                continue;
            }
            expanded[vertex] = true;
            for &neighbor in &self.vertices[vertex].neighbors {
                let mut next = path.clone();
                next.push(neighbor);
                queue.push_back(next);
            }
        }

        // Unreachable given the connectivity check above
        None
    }

    /// Items adjacent to the given item; empty when the item is absent
    pub fn neighbors(&self, item: &T) -> Vec<&T> {
        match self.index_of(item) {
            Some(i) => self.vertices[i]
                .neighbors
                .iter()
                .map(|&n| &self.vertices[n].item)
                .collect(),
            None => Vec::new(),
        }
    }

    /// Number of vertices
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of undirected edges
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Returns true when the graph has no vertices
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    fn index_of(&self, item: &T) -> Option<usize> {
        self.index.get(item).copied()
    }

    fn insert_vertex(&mut self, item: T) -> usize {
        let idx = self.vertices.len();
        self.vertices.push(Vertex {
            item: item.clone(),
            neighbors: HashSet::new(),
        });
        self.index.insert(item, idx);
        idx
    }

    fn link(&mut self, a: usize, b: usize) {
        let inserted = self.vertices[a].neighbors.insert(b);
        self.vertices[b].neighbors.insert(a);
        if inserted {
            self.edge_count += 1;
        }
    }

    /// Iterative depth-first reachability between two vertex indices
    fn connected_indices(&self, start: usize, end: usize) -> bool {
        let mut visited = vec![false; self.vertices.len()];
        let mut stack = vec![start];
        while let Some(vertex) = stack.pop() {
            if vertex == end {
                return true;
            }
            if visited[vertex] {
                continue;
            }
            visited[vertex] = true;
            stack.extend(
                self.vertices[vertex]
                    .neighbors
                    .iter()
                    .copied()
                    .filter(|&n| !visited[n]),
            );
        }
        false
    }

    /// Number of vertices reachable from the given index, itself included
    fn reachable_from(&self, start: usize) -> usize {
        let mut visited = vec![false; self.vertices.len()];
        let mut stack = vec![start];
        let mut count = 0;
        while let Some(vertex) = stack.pop() {
            if visited[vertex] {
                continue;
            }
            visited[vertex] = true;
            count += 1;
            stack.extend(
                self.vertices[vertex]
                    .neighbors
                    .iter()
                    .copied()
                    .filter(|&n| !visited[n]),
            );
        }
        count
    }
}
