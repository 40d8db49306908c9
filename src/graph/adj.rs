use super::{Arc, Digraph, GraphError, GraphFilter, UNASSIGNED};

/// An editable digraph over intrusive adjacency lists.
///
/// Nodes and arcs live in slotted arenas; ids are handed out densely and are
/// stable until [`trim_to_size`](AdjDigraph::trim_to_size) compacts the id
/// space. Removing a node leaves a hole: `node_bound` does not shrink and
/// attribute arrays stay indexable. Removed arcs keep their slot so they can
/// be [relinked](AdjDigraph::relink_arc) later.
///
/// Structural mutations bump two monotonic modification counters (one for
/// nodes, one for arcs). Borrow-based iteration cannot observe a mutation,
/// but the detached [`NodeCursor`]/[`ArcCursor`] snapshot the counters and
/// fail fast with [`GraphError::ConcurrentModification`].
pub struct AdjDigraph {
    nodes: Vec<Option<NodeSlot>>,
    arcs: Vec<ArcSlot>,
    num_nodes: usize,
    num_arcs: usize,
    node_mods: u64,
    arc_mods: u64,
    filter: Option<Box<dyn GraphFilter>>,
}

#[derive(Clone, Copy)]
struct NodeSlot {
    first_out: Option<usize>,
}

#[derive(Clone, Copy)]
struct ArcSlot {
    source: usize,
    target: usize,
    next_out: Option<usize>,
    live: bool,
}

impl AdjDigraph {
    /// Creates an empty digraph.
    pub fn new() -> Self {
        AdjDigraph {
            nodes: Vec::new(),
            arcs: Vec::new(),
            num_nodes: 0,
            num_arcs: 0,
            node_mods: 0,
            arc_mods: 0,
            filter: None,
        }
    }

    /// Creates an empty digraph with room for `nodes` nodes and `arcs` arcs.
    pub fn with_capacity(nodes: usize, arcs: usize) -> Self {
        AdjDigraph {
            nodes: Vec::with_capacity(nodes),
            arcs: Vec::with_capacity(arcs),
            num_nodes: 0,
            num_arcs: 0,
            node_mods: 0,
            arc_mods: 0,
            filter: None,
        }
    }

    /// Builds a digraph with nodes `0..n` from a list of arcs.
    pub fn from_arcs(n: usize, arcs: impl IntoIterator<Item = (usize, usize)>) -> Self {
        let mut graph = AdjDigraph::with_capacity(n, 0);
        graph.add_nodes(n);
        for (u, v) in arcs {
            graph
                .add_arc(u, v)
                .expect("arc endpoints must lie in 0..n");
        }
        graph
    }

    /// Adds a new node and returns its id.
    pub fn add_node(&mut self) -> usize {
        let id = self.nodes.len();
        self.nodes.push(Some(NodeSlot { first_out: None }));
        self.num_nodes += 1;
        self.node_mods += 1;
        id
    }

    /// Adds `n` new nodes and returns the range of their ids.
    pub fn add_nodes(&mut self, n: usize) -> std::ops::Range<usize> {
        let first = self.nodes.len();
        for _ in 0..n {
            self.add_node();
        }
        first..first + n
    }

    /// Adds an arc from `source` to `target` and returns its id.
    ///
    /// Self-loops and parallel arcs are allowed. Fails with
    /// [`GraphError::InvalidArgument`] if either endpoint is not a live node.
    pub fn add_arc(&mut self, source: usize, target: usize) -> Result<usize, GraphError> {
        if !self.has_node(source) || !self.has_node(target) {
            return Err(GraphError::InvalidArgument(
                "arc endpoints must be live nodes",
            ));
        }
        let id = self.arcs.len();
        let first_out = &mut self.nodes[source].as_mut().unwrap().first_out;
        self.arcs.push(ArcSlot {
            source,
            target,
            next_out: *first_out,
            live: true,
        });
        *first_out = Some(id);
        self.num_arcs += 1;
        self.arc_mods += 1;
        Ok(id)
    }

    /// Returns the arc with the given id, if it is live.
    pub fn arc(&self, id: usize) -> Option<Arc> {
        match self.arcs.get(id) {
            Some(slot) if slot.live => Some(Arc {
                id,
                source: slot.source,
                target: slot.target,
            }),
            _ => None,
        }
    }

    /// Removes a live arc.
    ///
    /// The arc keeps its slot and may be put back with
    /// [`relink_arc`](AdjDigraph::relink_arc).
    pub fn remove_arc(&mut self, id: usize) -> Result<(), GraphError> {
        match self.arcs.get(id) {
            Some(slot) if slot.live => {}
            _ => return Err(GraphError::InvalidArgument("arc id is not live")),
        }
        self.unlink(id);
        self.arcs[id].live = false;
        self.num_arcs -= 1;
        self.arc_mods += 1;
        Ok(())
    }

    /// Puts a previously removed arc back into the graph under its old id.
    ///
    /// Fails with [`GraphError::InvalidArgument`] if the arc is unknown,
    /// still live, or if either endpoint has been removed in the meantime.
    pub fn relink_arc(&mut self, id: usize) -> Result<(), GraphError> {
        let (source, target) = match self.arcs.get(id) {
            Some(slot) if !slot.live => (slot.source, slot.target),
            _ => {
                return Err(GraphError::InvalidArgument(
                    "only a previously removed arc can be relinked",
                ))
            }
        };
        if !self.has_node(source) || !self.has_node(target) {
            return Err(GraphError::InvalidArgument(
                "relinked arc endpoints must be live nodes",
            ));
        }
        let first_out = &mut self.nodes[source].as_mut().unwrap().first_out;
        self.arcs[id].next_out = *first_out;
        *first_out = Some(id);
        self.arcs[id].live = true;
        self.num_arcs += 1;
        self.arc_mods += 1;
        Ok(())
    }

    /// Removes a live node together with all incident arcs.
    pub fn remove_node(&mut self, node: usize) -> Result<(), GraphError> {
        if !self.has_node(node) {
            return Err(GraphError::InvalidArgument("node id is not live"));
        }
        // Self-loops appear once among the slots, so this collects each
        // incident arc exactly once.
        let incident: Vec<usize> = (0..self.arcs.len())
            .filter(|&id| {
                let slot = &self.arcs[id];
                slot.live && (slot.source == node || slot.target == node)
            })
            .collect();
        for id in incident {
            self.unlink(id);
            self.arcs[id].live = false;
            self.num_arcs -= 1;
            self.arc_mods += 1;
        }
        self.nodes[node] = None;
        self.num_nodes -= 1;
        self.node_mods += 1;
        Ok(())
    }

    // Detach a live arc from its source list.
    fn unlink(&mut self, id: usize) {
        let source = self.arcs[id].source;
        let slot = self.nodes[source].as_mut().unwrap();
        if slot.first_out == Some(id) {
            slot.first_out = self.arcs[id].next_out;
            return;
        }
        let mut prev = slot.first_out.unwrap();
        while self.arcs[prev].next_out != Some(id) {
            prev = self.arcs[prev].next_out.unwrap();
        }
        self.arcs[prev].next_out = self.arcs[id].next_out;
    }

    /// Compacts node and arc ids, dropping all holes and dead arc slots.
    ///
    /// Returns the node remap: entry `old` holds the new id of node `old`,
    /// or [`UNASSIGNED`] if that id was a hole. Arc ids are renumbered as
    /// well; any previously removed arc becomes unknown.
    pub fn trim_to_size(&mut self) -> Box<[usize]> {
        let mut node_map = vec![UNASSIGNED; self.nodes.len()];
        let mut new_nodes = Vec::with_capacity(self.num_nodes);
        for (old, slot) in self.nodes.iter().enumerate() {
            if slot.is_some() {
                node_map[old] = new_nodes.len();
                new_nodes.push(Some(NodeSlot { first_out: None }));
            }
        }
        let old_arcs = std::mem::take(&mut self.arcs);
        self.nodes = new_nodes;
        for slot in old_arcs.into_iter().filter(|slot| slot.live) {
            let id = self.arcs.len();
            let source = node_map[slot.source];
            let first_out = &mut self.nodes[source].as_mut().unwrap().first_out;
            self.arcs.push(ArcSlot {
                source,
                target: node_map[slot.target],
                next_out: *first_out,
                live: true,
            });
            *first_out = Some(id);
        }
        self.node_mods += 1;
        self.arc_mods += 1;
        node_map.into_boxed_slice()
    }

    /// Removes all nodes and arcs.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.arcs.clear();
        self.num_nodes = 0;
        self.num_arcs = 0;
        self.node_mods += 1;
        self.arc_mods += 1;
    }

    /// Masks the graph with a filter; algorithms will skip whatever the
    /// filter rejects.
    pub fn set_filter(&mut self, filter: Box<dyn GraphFilter>) {
        self.filter = Some(filter);
    }

    /// Drops the filter, if any.
    pub fn clear_filter(&mut self) {
        self.filter = None;
    }

    /// The number of live out-arcs of `node`.
    pub fn out_degree(&self, node: usize) -> usize {
        self.successors(node).count()
    }

    /// A detached fail-fast cursor over the live node ids.
    pub fn node_cursor(&self) -> NodeCursor {
        NodeCursor {
            next: 0,
            snapshot: self.node_mods,
        }
    }

    /// A detached fail-fast cursor over the out-arcs of `node`.
    pub fn out_cursor(&self, node: usize) -> Result<ArcCursor, GraphError> {
        if !self.has_node(node) {
            return Err(GraphError::InvalidArgument("node id is not live"));
        }
        Ok(ArcCursor {
            next: self.nodes[node].as_ref().unwrap().first_out,
            snapshot: self.arc_mods,
        })
    }
}

impl Default for AdjDigraph {
    fn default() -> Self {
        AdjDigraph::new()
    }
}

impl Digraph for AdjDigraph {
    type Successors<'a>
        = Successors<'a>
    where
        Self: 'a;

    fn num_nodes(&self) -> usize {
        self.num_nodes
    }

    fn node_bound(&self) -> usize {
        self.nodes.len()
    }

    fn num_arcs(&self) -> usize {
        self.num_arcs
    }

    fn has_node(&self, node: usize) -> bool {
        matches!(self.nodes.get(node), Some(Some(_)))
    }

    fn successors(&self, node: usize) -> Successors<'_> {
        Successors {
            graph: self,
            next: self.nodes.get(node).and_then(|slot| slot.as_ref()).and_then(|slot| slot.first_out),
        }
    }

    fn filter(&self) -> Option<&dyn GraphFilter> {
        self.filter.as_deref()
    }
}

/// Borrow-based iterator over the out-arcs of a node.
pub struct Successors<'a> {
    graph: &'a AdjDigraph,
    next: Option<usize>,
}

impl Iterator for Successors<'_> {
    type Item = Arc;

    fn next(&mut self) -> Option<Arc> {
        let id = self.next?;
        let slot = &self.graph.arcs[id];
        self.next = slot.next_out;
        Some(Arc {
            id,
            source: slot.source,
            target: slot.target,
        })
    }
}

/// A detached cursor over live node ids.
///
/// Unlike the borrow-based [`nodes`](Digraph::nodes) iterator, a cursor does
/// not borrow the graph between steps, so the graph may be mutated while the
/// cursor is alive; the next [`step`](NodeCursor::step) then reports
/// [`GraphError::ConcurrentModification`].
pub struct NodeCursor {
    next: usize,
    snapshot: u64,
}

impl NodeCursor {
    /// Advances to the next live node id, or `None` when exhausted.
    pub fn step(&mut self, graph: &AdjDigraph) -> Result<Option<usize>, GraphError> {
        if self.snapshot != graph.node_mods {
            return Err(GraphError::ConcurrentModification);
        }
        while self.next < graph.nodes.len() {
            let node = self.next;
            self.next += 1;
            if graph.nodes[node].is_some() {
                return Ok(Some(node));
            }
        }
        Ok(None)
    }
}

/// A detached cursor over the out-arcs of one node; see [`NodeCursor`].
pub struct ArcCursor {
    next: Option<usize>,
    snapshot: u64,
}

impl ArcCursor {
    /// Advances to the next out-arc, or `None` when exhausted.
    pub fn step(&mut self, graph: &AdjDigraph) -> Result<Option<Arc>, GraphError> {
        if self.snapshot != graph.arc_mods {
            return Err(GraphError::ConcurrentModification);
        }
        let Some(id) = self.next else {
            return Ok(None);
        };
        let slot = &graph.arcs[id];
        self.next = slot.next_out;
        Ok(Some(Arc {
            id,
            source: slot.source,
            target: slot.target,
        }))
    }
}
