use fxhash::FxBuildHasher;
/// Breadth-first search in the style of
/// [pathfinding's bfs function](https://docs.rs/pathfinding/latest/pathfinding/directed/bfs/index.html).
/// The parent map doubles as the frontier: an [IndexMap] keeps insertion order, so walking it by
/// index visits nodes layer by layer without a separate queue.
use indexmap::map::Entry::Vacant;
use indexmap::IndexMap;
use std::hash::Hash;

pub(crate) type FxIndexMap<K, V> = IndexMap<K, V, FxBuildHasher>;

fn reverse_path<N>(parents: &FxIndexMap<N, usize>, start: usize) -> Vec<N>
where
    N: Eq + Hash + Clone,
{
    let mut i = start;
    let mut path: Vec<N> = std::iter::from_fn(|| {
        parents.get_index(i).map(|(node, &parent)| {
            i = parent;
            node.clone()
        })
    })
    .collect();
    path.reverse();
    path
}

/// Expands from `start` until `success` holds or the reachable set is exhausted. Returns the
/// parent map and the index of the successful node, if any.
fn explore<N, FN, IN, FS>(
    start: &N,
    mut successors: FN,
    mut success: FS,
) -> (FxIndexMap<N, usize>, Option<usize>)
where
    N: Eq + Hash + Clone,
    FN: FnMut(&N) -> IN,
    IN: IntoIterator<Item = N>,
    FS: FnMut(&N) -> bool,
{
    let mut parents: FxIndexMap<N, usize> = FxIndexMap::default();
    parents.insert(start.clone(), usize::MAX);
    let mut index = 0;
    while let Some((node, _)) = parents.get_index(index) {
        if success(node) {
            return (parents, Some(index));
        }
        for successor in successors(node) {
            if let Vacant(e) = parents.entry(successor) {
                e.insert(index);
            }
        }
        index += 1;
    }
    (parents, None)
}

/// Shortest path in number of steps from `start` to the first node satisfying `success`,
/// inclusive of both ends. Ties are broken by the order in which `successors` yields nodes.
pub(crate) fn bfs<N, FN, IN, FS>(start: &N, successors: FN, success: FS) -> Option<Vec<N>>
where
    N: Eq + Hash + Clone,
    FN: FnMut(&N) -> IN,
    IN: IntoIterator<Item = N>,
    FS: FnMut(&N) -> bool,
{
    let (parents, found) = explore(start, successors, success);
    found.map(|index| reverse_path(&parents, index))
}

/// Every node reachable from `start`, in visiting order.
pub(crate) fn flood<N, FN, IN>(start: &N, successors: FN) -> FxIndexMap<N, usize>
where
    N: Eq + Hash + Clone,
    FN: FnMut(&N) -> IN,
    IN: IntoIterator<Item = N>,
{
    explore(start, successors, |_| false).0
}
