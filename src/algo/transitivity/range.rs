use crate::algo::top_sort::TopSort;
use crate::graph::Digraph;
use dsi_progress_logger::ProgressLog;
use nonmax::NonMaxUsize;
use std::collections::BinaryHeap;

/// A half-open interval `[lo, hi)` of topological numbers.
///
/// An interval with `lo == hi` is empty. Two non-empty intervals are
/// [mergeable](IRange::mergeable) when their closures touch or overlap; an
/// empty interval is mergeable with anything.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IRange {
    /// Inclusive lower bound.
    pub lo: usize,
    /// Exclusive upper bound.
    pub hi: usize,
}

impl IRange {
    /// The empty interval `[0, 0)`.
    pub const EMPTY: IRange = IRange { lo: 0, hi: 0 };

    /// Creates `[lo, hi)`; `lo` must not exceed `hi`.
    pub fn new(lo: usize, hi: usize) -> IRange {
        debug_assert!(lo <= hi);
        IRange { lo, hi }
    }

    /// Whether the interval contains no number.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.lo == self.hi
    }

    /// Whether the interval contains `i`.
    #[inline(always)]
    pub fn contains(&self, i: usize) -> bool {
        self.lo <= i && i < self.hi
    }

    /// Whether the union of `a` and `b` is a single interval.
    pub fn mergeable(a: IRange, b: IRange) -> bool {
        if a.is_empty() || b.is_empty() {
            return true;
        }
        let (min, max) = if a.lo <= b.lo { (a, b) } else { (b, a) };
        min.hi >= max.lo
    }

    /// Replaces `self` with the union of `self` and `other`, which must be
    /// [mergeable](IRange::mergeable).
    pub fn merge(&mut self, other: IRange) {
        if self.is_empty() {
            *self = other;
            return;
        }
        if other.is_empty() {
            return;
        }
        self.lo = self.lo.min(other.lo);
        self.hi = self.hi.max(other.hi);
    }
}

/// An interval in the construction arena, chained to the rest of its owner's
/// list. Chains are consumed front to back by the k-way merge of the owner's
/// predecessors.
struct Chain {
    range: IRange,
    next: Option<NonMaxUsize>,
}

/// Priority-queue entry: an arena chain keyed by the lower bound of its head
/// interval. The ordering (and equality) looks at `lo` only, and is reversed
/// so that [`BinaryHeap`] pops the least `lo` first.
#[derive(Clone, Copy, Debug)]
struct HeapEntry {
    lo: usize,
    chain: usize,
}

impl PartialEq for HeapEntry {
    fn eq(&self, other: &Self) -> bool {
        self.lo == other.lo
    }
}

impl Eq for HeapEntry {}

impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HeapEntry {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        other.lo.cmp(&self.lo)
    }
}

/// The frozen interval pool of a closure: a flat array of sorted, pairwise
/// non-mergeable intervals, sliced per node by `start`/`end` (inclusive).
///
/// The union of the slice of node `q` is the set of topological numbers of
/// the nodes reachable from `q`, `q` itself included.
pub(crate) struct RangePool {
    ranges: Box<[IRange]>,
    start: Box<[usize]>,
    end: Box<[usize]>,
}

impl RangePool {
    /// Builds the pool bottom-up over `dag`, which must be acyclic and
    /// numbered by `ts`.
    ///
    /// Nodes are processed by ascending number, so every successor's list
    /// exists before its predecessors need it. Per node, the head interval
    /// of each successor's chain is pushed into a priority queue keyed by
    /// `lo`; popping streams the chains lazily, which makes the union a
    /// k-way merge linear in the sizes of the successors' lists. A popped
    /// interval either extends the interval under construction or, when a
    /// gap separates them, finalizes it into the pool and seeds its
    /// replacement. The node's own number is appended last: it exceeds every
    /// number the node can reach.
    pub fn build(dag: impl Digraph, ts: &TopSort, pl: &mut impl ProgressLog) -> RangePool {
        let bound = dag.node_bound();
        let mut arena: Vec<Chain> = Vec::with_capacity(bound);
        let mut heads: Vec<Option<NonMaxUsize>> = vec![None; bound];
        let mut pool: Vec<usize> = Vec::with_capacity(bound);
        let mut start = vec![0; bound];
        let mut end = vec![0; bound];
        let mut heap: BinaryHeap<HeapEntry> = BinaryHeap::new();
        let filter = dag.filter();

        pl.item_name("node");
        pl.expected_updates(Some(ts.len()));
        pl.start("Building closure intervals");

        for &node in ts.postorder() {
            start[node] = pool.len();
            heap.clear();
            for arc in dag.successors(node) {
                if arc.target == node
                    || filter.is_some_and(|f| f.skip_arc(arc) || f.skip_node(arc.target))
                {
                    continue;
                }
                if let Some(head) = heads[arc.target] {
                    heap.push(HeapEntry {
                        lo: arena[head.get()].range.lo,
                        chain: head.get(),
                    });
                }
            }

            let mut curr = arena.len();
            arena.push(Chain {
                range: IRange::EMPTY,
                next: None,
            });
            heads[node] = NonMaxUsize::new(curr);

            while let Some(entry) = heap.pop() {
                let min = arena[entry.chain].range;
                let next = arena[entry.chain].next;
                if IRange::mergeable(arena[curr].range, min) {
                    arena[curr].range.merge(min);
                } else {
                    pool.push(curr);
                    let fresh = arena.len();
                    arena.push(Chain {
                        range: min,
                        next: None,
                    });
                    arena[curr].next = NonMaxUsize::new(fresh);
                    curr = fresh;
                }
                if let Some(next) = next {
                    heap.push(HeapEntry {
                        lo: arena[next.get()].range.lo,
                        chain: next.get(),
                    });
                }
            }
            pool.push(curr);

            let num = ts.num(node);
            let me = IRange::new(num, num + 1);
            if IRange::mergeable(arena[curr].range, me) {
                arena[curr].range.merge(me);
            } else {
                let tail = arena.len();
                arena.push(Chain {
                    range: me,
                    next: None,
                });
                arena[curr].next = NonMaxUsize::new(tail);
                pool.push(tail);
            }
            end[node] = pool.len() - 1;
            pl.light_update();
        }

        pl.done();
        RangePool {
            ranges: pool.iter().map(|&i| arena[i].range).collect(),
            start: start.into_boxed_slice(),
            end: end.into_boxed_slice(),
        }
    }

    /// Whether the topological number `target` belongs to the reachable set
    /// of `node`, which must have been processed by
    /// [`build`](RangePool::build).
    ///
    /// Binary search over the node's slice: the window shrinks while it has
    /// more than one candidate, then both endpoints are tested, which also
    /// settles the degenerate single-interval window.
    pub fn reaches_num(&self, node: usize, target: usize) -> bool {
        let mut low = self.start[node];
        let mut high = self.end[node];
        while high - low > 1 {
            let mid = low + (high - low) / 2;
            if self.ranges[mid].lo <= target {
                low = mid;
            } else {
                high = mid;
            }
        }
        self.ranges[low].contains(target) || self.ranges[high].contains(target)
    }

    /// The total number of intervals in the pool.
    pub fn num_ranges(&self) -> usize {
        self.ranges.len()
    }

    /// The interval slice of `node`.
    pub fn slice(&self, node: usize) -> &[IRange] {
        &self.ranges[self.start[node]..=self.end[node]]
    }
}
