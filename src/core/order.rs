//! Dependency-aware ordering of units.
//!
//! Each unit pairs a representative file with the dependency tree of its
//! entry. When one unit's tree reaches another unit's representative file,
//! the reached unit is scheduled first. Every one-way relation is recorded in
//! a derived order graph over unit labels, and the final sequence comes from
//! a comparator over that graph with size-based tie-breaks.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, trace};

use crate::core::builder::DependencyTree;
use crate::core::error::DepError;

// ---------- Public types ----------

/// A labelled pair of representative file and dependency tree
#[derive(Debug, Clone)]
pub struct Unit {
    /// Absolute path of the file this unit is defined by
    pub representative_path: String,
    pub tree: DependencyTree,
}

/// The derived order graph among unit labels, plus everything the comparator needs.
///
/// Built once from the units; the comparator only reads it.
#[derive(Debug, Clone)]
pub struct DerivedOrder {
    entries: Vec<Entry>,
    index: BTreeMap<String, usize>,
}

#[derive(Debug, Clone)]
struct Entry {
    label: String,
    /// Labels this unit's tree reaches one-way
    direct: BTreeSet<usize>,
    /// Transitive closure of `direct`, without the entry itself
    reach: BTreeSet<usize>,
    tree_size: usize,
}

// ---------- Implementation ----------

impl Unit {
    pub fn new(representative_path: impl Into<String>, tree: DependencyTree) -> Self {
        Self {
            representative_path: representative_path.into(),
            tree,
        }
    }
}

/// Order unit labels so that units reached by other units' trees come first.
pub fn order(units: &BTreeMap<String, Unit>) -> Result<Vec<String>, DepError> {
    Ok(DerivedOrder::build(units)?.sorted())
}

impl DerivedOrder {
    pub fn build(units: &BTreeMap<String, Unit>) -> Result<Self, DepError> {
        if units.is_empty() {
            return Err(DepError::invalid_unit("<none>", "no units to order"));
        }

        let mut entries = Vec::with_capacity(units.len());
        let mut index = BTreeMap::new();

        for (label, unit) in units {
            if label.trim().is_empty() {
                return Err(DepError::invalid_unit(label, "label must not be empty"));
            }
            if unit.representative_path.trim().is_empty() {
                return Err(DepError::invalid_unit(label, "representative path must not be empty"));
            }
            index.insert(label.clone(), entries.len());
            entries.push(Entry {
                label: label.clone(),
                direct: BTreeSet::new(),
                reach: BTreeSet::new(),
                tree_size: unit.tree.num_nodes(),
            });
        }

        let labelled: Vec<(&String, &Unit)> = units.iter().collect();
        for (i, (first, first_unit)) in labelled.iter().enumerate() {
            for (second, second_unit) in &labelled[i + 1..] {
                let forward = first_unit.tree.is_ancestor_of(&second_unit.representative_path);
                let backward = second_unit.tree.is_ancestor_of(&first_unit.representative_path);

                match (forward, backward) {
                    // Mutual reachability is left to the size fallback
                    (true, true) => trace!(%first, %second, "mutual reachability, no edge"),
                    (true, false) => {
                        debug!(parent = %first, child = %second, "derived order edge");
                        entries[index[*first]].direct.insert(index[*second]);
                    }
                    (false, true) => {
                        debug!(parent = %second, child = %first, "derived order edge");
                        entries[index[*second]].direct.insert(index[*first]);
                    }
                    (false, false) => {}
                }
            }
        }

        for start in 0..entries.len() {
            let reach = reachable(&entries, start);
            entries[start].reach = reach;
        }

        Ok(Self { entries, index })
    }

    /// Compare two labels. `None` if either label is unknown.
    pub fn compare(&self, a: &str, b: &str) -> Option<Ordering> {
        let a = *self.index.get(a)?;
        let b = *self.index.get(b)?;
        Some(self.compare_entries(a, b))
    }

    /// Labels in run order.
    ///
    /// The sort is stable and units start in label order, so units that
    /// compare equal keep label order and the output is reproducible.
    pub fn sorted(&self) -> Vec<String> {
        let mut placed: Vec<usize> = (0..self.entries.len()).collect();
        placed.sort_by(|&a, &b| self.compare_entries(a, b));

        placed
            .into_iter()
            .map(|i| self.entries[i].label.clone())
            .collect()
    }

    /// Render each label with the units its tree reaches one-way, in label order.
    pub fn render(&self) -> String {
        self.entries
            .iter()
            .map(|e| {
                if e.direct.is_empty() {
                    format!("{} -", e.label)
                } else {
                    let reached: Vec<&str> = e
                        .direct
                        .iter()
                        .map(|&i| self.entries[i].label.as_str())
                        .collect();
                    format!("{}: {}", e.label, reached.join(", "))
                }
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    // ---------- Internal ----------

    fn compare_entries(&self, a_idx: usize, b_idx: usize) -> Ordering {
        let (a, b) = (&self.entries[a_idx], &self.entries[b_idx]);
        let a_in_b = b.reach.contains(&a_idx);
        let b_in_a = a.reach.contains(&b_idx);

        match (a_in_b, b_in_a) {
            (true, false) => return Ordering::Less,
            (false, true) => return Ordering::Greater,
            _ => {}
        }

        a.reach
            .len()
            .cmp(&b.reach.len())
            .then_with(|| a.tree_size.cmp(&b.tree_size))
    }
}

/// Every entry reachable from `start` over direct edges, `start` excluded.
fn reachable(entries: &[Entry], start: usize) -> BTreeSet<usize> {
    let mut seen = BTreeSet::new();
    let mut stack: Vec<usize> = entries[start].direct.iter().copied().collect();

    while let Some(current) = stack.pop() {
        if current == start || !seen.insert(current) {
            continue;
        }
        stack.extend(entries[current].direct.iter().copied());
    }

    seen
}

// ---------- Tests ----------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::builder::TreeBuilder;
    use crate::core::fs::MemoryFs;
    use crate::core::scanner::{DEFAULT_CALL, DEFAULT_EXTENSION, ReferenceScanner};

    fn builder(fs: MemoryFs) -> TreeBuilder<MemoryFs> {
        TreeBuilder::new(fs, ReferenceScanner::new(DEFAULT_CALL, DEFAULT_EXTENSION).unwrap())
    }

    /// Build units from (label, entry, representative) triples.
    async fn units(fs: MemoryFs, specs: &[(&str, &str, &str)]) -> BTreeMap<String, Unit> {
        let b = builder(fs);
        let mut out = BTreeMap::new();
        for (label, entry, rep) in specs {
            let tree = b.build_tree(entry).await.unwrap();
            out.insert(label.to_string(), Unit::new(*rep, tree));
        }
        out
    }

    /// src/a.js → b.js → c.js, one test per source file
    fn chain_fs() -> MemoryFs {
        MemoryFs::new("/p")
            .with_file("src/a.js", "require('./b.js');")
            .with_file("src/b.js", "require('./c.js');")
            .with_file("src/c.js", "")
            .with_file("test/a.test.js", "require('../src/a.js');")
            .with_file("test/b.test.js", "require('../src/b.js');")
            .with_file("test/c.test.js", "require('../src/c.js');")
    }

    #[tokio::test]
    async fn test_two_units() {
        let fs = MemoryFs::new("/p")
            .with_file("src/0.js", "require('./1.js');")
            .with_file("src/1.js", "")
            .with_file("test/t0.js", "require('../src/0.js');")
            .with_file("test/t1.js", "require('../src/1.js');");

        let u = units(
            fs.clone(),
            &[
                ("t0", "test/t0.js", "/p/src/0.js"),
                ("t1", "test/t1.js", "/p/src/1.js"),
            ],
        )
        .await;
        assert_eq!(order(&u).unwrap(), vec!["t1", "t0"]);

        // Label order does not drive the result
        let u = units(
            fs,
            &[
                ("z_uses_one", "test/t1.js", "/p/src/1.js"),
                ("a_uses_zero", "test/t0.js", "/p/src/0.js"),
            ],
        )
        .await;
        assert_eq!(order(&u).unwrap(), vec!["z_uses_one", "a_uses_zero"]);
    }

    #[tokio::test]
    async fn test_three_unit_chain() {
        let u = units(
            chain_fs(),
            &[
                ("t0", "test/a.test.js", "/p/src/a.js"),
                ("t1", "test/b.test.js", "/p/src/b.js"),
                ("t2", "test/c.test.js", "/p/src/c.js"),
            ],
        )
        .await;
        assert_eq!(order(&u).unwrap(), vec!["t2", "t1", "t0"]);

        let derived = DerivedOrder::build(&u).unwrap();
        assert_eq!(derived.compare("t1", "t0"), Some(Ordering::Less));
        assert_eq!(derived.compare("t2", "t0"), Some(Ordering::Less));
        assert_eq!(derived.compare("t0", "t2"), Some(Ordering::Greater));
        assert_eq!(derived.compare("t0", "missing"), None);
    }

    #[tokio::test]
    async fn test_three_unit_chain_any_labels() {
        let permutations = [
            ["c", "b", "a"],
            ["a", "c", "b"],
            ["b", "a", "c"],
        ];
        for labels in permutations {
            let u = units(
                chain_fs(),
                &[
                    (labels[0], "test/a.test.js", "/p/src/a.js"),
                    (labels[1], "test/b.test.js", "/p/src/b.js"),
                    (labels[2], "test/c.test.js", "/p/src/c.js"),
                ],
            )
            .await;
            assert_eq!(
                order(&u).unwrap(),
                vec![labels[2], labels[1], labels[0]],
                "labels {:?}",
                labels
            );
        }
    }

    #[tokio::test]
    async fn test_mutual_pair_falls_back_to_tree_size() {
        let fs = MemoryFs::new("/p")
            .with_file("src/m.js", "")
            .with_file("src/n.js", "")
            .with_file("src/extra.js", "")
            .with_file("test/m.test.js", "require('../src/n.js');")
            .with_file("test/n.test.js", "require('../src/m.js'); require('../src/extra.js');");

        let u = units(
            fs,
            &[
                ("n", "test/n.test.js", "/p/src/n.js"),
                ("m", "test/m.test.js", "/p/src/m.js"),
            ],
        )
        .await;

        let derived = DerivedOrder::build(&u).unwrap();
        assert_eq!(derived.render(), "m -\nn -");
        assert_eq!(derived.compare("m", "n"), Some(Ordering::Less));
        assert_eq!(order(&u).unwrap(), vec!["m", "n"]);
    }

    #[tokio::test]
    async fn test_cyclic_units_still_ordered() {
        // p's test reaches q, q's reaches r, r's reaches p
        let fs = MemoryFs::new("/p")
            .with_file("src/p.js", "")
            .with_file("src/q.js", "")
            .with_file("src/r.js", "")
            .with_file("test/p.test.js", "require('../src/q.js');")
            .with_file("test/q.test.js", "require('../src/r.js');")
            .with_file("test/r.test.js", "require('../src/p.js');");

        let u = units(
            fs,
            &[
                ("p", "test/p.test.js", "/p/src/p.js"),
                ("q", "test/q.test.js", "/p/src/q.js"),
                ("r", "test/r.test.js", "/p/src/r.js"),
            ],
        )
        .await;

        let first = order(&u).unwrap();
        let second = order(&u).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.len(), 3);
        let mut sorted = first.clone();
        sorted.sort();
        assert_eq!(sorted, vec!["p", "q", "r"]);
    }

    #[tokio::test]
    async fn test_independent_units_by_size() {
        let fs = MemoryFs::new("/p")
            .with_file("small.js", "")
            .with_file("big.js", "require('./dep.js');")
            .with_file("dep.js", "");

        let u = units(
            fs,
            &[
                ("a_big", "big.js", "/p/big.js"),
                ("b_small", "small.js", "/p/small.js"),
            ],
        )
        .await;
        assert_eq!(order(&u).unwrap(), vec!["b_small", "a_big"]);
    }

    #[tokio::test]
    async fn test_single_unit() {
        let u = units(chain_fs(), &[("only", "test/c.test.js", "/p/src/c.js")]).await;
        assert_eq!(order(&u).unwrap(), vec!["only"]);
    }

    #[tokio::test]
    async fn test_render_derived_tree() {
        let u = units(
            chain_fs(),
            &[
                ("t0", "test/a.test.js", "/p/src/a.js"),
                ("t1", "test/b.test.js", "/p/src/b.js"),
            ],
        )
        .await;
        let derived = DerivedOrder::build(&u).unwrap();
        assert_eq!(derived.render(), "t0: t1\nt1 -");
    }

    #[tokio::test]
    async fn test_shared_dependency_runs_first() {
        // x and y both reach z's source; z's own tree is the largest
        let fs = MemoryFs::new("/p")
            .with_file("src/x.js", "require('./z.js');")
            .with_file("src/y.js", "require('./z.js');")
            .with_file("src/z.js", "")
            .with_file("test/h1.js", "")
            .with_file("test/h2.js", "")
            .with_file("test/h3.js", "")
            .with_file("test/x.test.js", "require('../src/x.js');")
            .with_file("test/y.test.js", "require('../src/y.js');")
            .with_file(
                "test/z.test.js",
                "require('../src/z.js'); require('./h1.js'); require('./h2.js'); require('./h3.js');",
            );

        let u = units(
            fs,
            &[
                ("x", "test/x.test.js", "/p/src/x.js"),
                ("y", "test/y.test.js", "/p/src/y.js"),
                ("z", "test/z.test.js", "/p/src/z.js"),
            ],
        )
        .await;

        let derived = DerivedOrder::build(&u).unwrap();
        assert_eq!(derived.render(), "x: z\ny: z\nz -");
        assert_eq!(derived.compare("z", "x"), Some(Ordering::Less));
        assert_eq!(derived.compare("z", "y"), Some(Ordering::Less));
        assert_eq!(order(&u).unwrap(), vec!["z", "x", "y"]);
    }

    #[tokio::test]
    async fn test_transitive_reach_through_shared_unit() {
        // a reaches b and c; b reaches c through its own source
        let fs = MemoryFs::new("/p")
            .with_file("src/a.js", "require('./b.js'); require('./c.js');")
            .with_file("src/b.js", "require('./c.js');")
            .with_file("src/c.js", "")
            .with_file("src/pad1.js", "")
            .with_file("src/pad2.js", "")
            .with_file("test/a.test.js", "require('../src/a.js');")
            .with_file("test/b.test.js", "require('../src/b.js');")
            .with_file(
                "test/c.test.js",
                "require('../src/c.js'); require('../src/pad1.js'); require('../src/pad2.js');",
            );

        let u = units(
            fs,
            &[
                ("a", "test/a.test.js", "/p/src/a.js"),
                ("b", "test/b.test.js", "/p/src/b.js"),
                ("c", "test/c.test.js", "/p/src/c.js"),
            ],
        )
        .await;
        assert_eq!(order(&u).unwrap(), vec!["c", "b", "a"]);
    }

    #[test]
    fn test_empty_input_is_invalid() {
        let err = order(&BTreeMap::new()).unwrap_err();
        assert!(matches!(err, DepError::InvalidUnit { .. }));
    }

    #[tokio::test]
    async fn test_empty_representative_is_invalid() {
        let mut u = units(chain_fs(), &[("t", "test/c.test.js", "/p/src/c.js")]).await;
        u.get_mut("t").unwrap().representative_path = String::new();

        let err = order(&u).unwrap_err();
        assert!(
            err.to_string().contains("representative path"),
            "Expected invalid unit error, got: {}",
            err
        );
    }
}
