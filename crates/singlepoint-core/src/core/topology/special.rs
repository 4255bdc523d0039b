use crate::core::models::ids::AtomId;
use crate::core::models::system::MolecularSystem;
use std::collections::{HashMap, HashSet};

/// Deepest bonded relation that receives special treatment (1-4 neighbors).
pub const MAX_SPECIAL_DEPTH: usize = 3;

/// Graph distance between two atoms in the bond network, when it is at most three bonds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BondSeparation {
    /// Directly bonded.
    OneTwo,
    /// Share a common bonded neighbor.
    OneThree,
    /// Connected through a path of three bonds.
    OneFour,
}

impl BondSeparation {
    pub fn from_depth(depth: usize) -> Option<Self> {
        match depth {
            1 => Some(Self::OneTwo),
            2 => Some(Self::OneThree),
            3 => Some(Self::OneFour),
            _ => None,
        }
    }

    pub fn depth(self) -> usize {
        match self {
            Self::OneTwo => 1,
            Self::OneThree => 2,
            Self::OneFour => 3,
        }
    }

    /// Zero-based index into a special-bonds factor triple.
    #[inline]
    pub fn index(self) -> usize {
        self.depth() - 1
    }
}

/// Collects every atom reachable from `start` within [`MAX_SPECIAL_DEPTH`] bonds,
/// together with the depth at which it was first reached.
fn reachable_within(
    system: &MolecularSystem,
    start: AtomId,
) -> Vec<(AtomId, BondSeparation)> {
    let mut visited = HashSet::from([start]);
    let mut frontier = vec![start];
    let mut found = Vec::new();

    for depth in 1..=MAX_SPECIAL_DEPTH {
        let Some(separation) = BondSeparation::from_depth(depth) else {
            break;
        };
        let mut next = Vec::new();
        for &atom in &frontier {
            for &neighbor in system.get_bonded_neighbors(atom).unwrap_or(&[]) {
                if visited.insert(neighbor) {
                    next.push(neighbor);
                    found.push((neighbor, separation));
                }
            }
        }
        if next.is_empty() {
            break;
        }
        frontier = next;
    }
    found
}

/// Classifies the bonded separation of two atoms with a bounded breadth-first search.
///
/// Returns `None` when `a == b` or when `b` is not reachable within three bonds.
pub fn bond_separation(
    system: &MolecularSystem,
    a: AtomId,
    b: AtomId,
) -> Option<BondSeparation> {
    if a == b {
        return None;
    }
    reachable_within(system, a)
        .into_iter()
        .find(|&(atom, _)| atom == b)
        .map(|(_, separation)| separation)
}

#[inline]
fn pair_key(a: AtomId, b: AtomId) -> (AtomId, AtomId) {
    if a <= b { (a, b) } else { (b, a) }
}

/// Precomputed bonded-separation lookup keyed by unordered atom pair.
///
/// Built once per topology; the nonbonded evaluator queries it for every candidate
/// pair inside the cutoff instead of searching the bond graph again.
#[derive(Debug, Clone, Default)]
pub struct SpecialTable {
    pairs: HashMap<(AtomId, AtomId), BondSeparation>,
}

impl SpecialTable {
    pub fn build(system: &MolecularSystem) -> Self {
        let mut pairs = HashMap::new();
        for atom_id in system.atom_ids_by_serial() {
            for (other, separation) in reachable_within(system, atom_id) {
                pairs.entry(pair_key(atom_id, other)).or_insert(separation);
            }
        }
        Self { pairs }
    }

    #[inline]
    pub fn separation(&self, a: AtomId, b: AtomId) -> Option<BondSeparation> {
        if a == b {
            return None;
        }
        self.pairs.get(&pair_key(a, b)).copied()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Number of 1-2, 1-3 and 1-4 pairs, in that order.
    pub fn counts(&self) -> [usize; 3] {
        let mut counts = [0; 3];
        for separation in self.pairs.values() {
            counts[separation.index()] += 1;
        }
        counts
    }
}
