//! Dependency-aware remediation roadmap.
//!
//! Orders every domain so that prerequisites come first, picking the earliest
//! eligible domain in catalog order at each step. When no domain is eligible
//! (a cycle or a dependency on an unknown domain) the earliest remaining domain
//! is placed anyway, so the builder always terminates. Orders produced through
//! that escape hatch are reported in `Roadmap::forced` and do not honor the
//! prerequisite invariant.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap, HashSet};

use serde::Serialize;

use super::classification::Priority;
use super::dependency_graph::DependencyGraph;
use super::scorer::DomainResult;

/// Number of leading domains placed into phases and the critical path.
pub const PHASE_COUNT: usize = 3;

/// Number of leading domains checked for blocking prerequisites.
pub const BLOCKING_WINDOW: usize = 2;

/// Length of one roadmap phase, in days.
pub const PHASE_DAYS: usize = 30;

/// First three roadmap domains, one per 30-day phase.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RoadmapPhases {
    pub phase_1: Vec<String>,
    pub phase_2: Vec<String>,
    pub phase_3: Vec<String>,
}

impl RoadmapPhases {
    fn from_order(order: &[String]) -> Self {
        let slot = |i: usize| order.get(i).cloned().into_iter().collect();
        Self {
            phase_1: slot(0),
            phase_2: slot(1),
            phase_3: slot(2),
        }
    }

    /// Number of phases holding a domain.
    pub fn populated(&self) -> usize {
        [&self.phase_1, &self.phase_2, &self.phase_3]
            .iter()
            .filter(|p| !p.is_empty())
            .count()
    }
}

/// Implementation plan derived from domain results and their prerequisites.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Roadmap {
    pub order: Vec<String>,
    pub phases: RoadmapPhases,
    pub critical_path: Vec<String>,
    #[serde(rename = "tiempoEstimado")]
    pub estimated_time: String,
    pub expected_improvement_pct: f64,
    pub blocking_domains: Vec<String>,
    /// Domains placed by the stall fallback, in placement order.
    #[serde(skip)]
    pub forced: Vec<String>,
}

/// Stateless roadmap builder.
pub struct RoadmapBuilder;

impl RoadmapBuilder {
    /// Builds the roadmap for `results` (in catalog enumeration order).
    pub fn build(results: &[DomainResult], dependencies: &DependencyGraph) -> Roadmap {
        let keys: Vec<&str> = results.iter().map(|r| r.domain.as_str()).collect();
        let (order, forced) = Self::implementation_order(&keys, dependencies);

        let phases = RoadmapPhases::from_order(&order);
        let critical_path: Vec<String> = order.iter().take(PHASE_COUNT).cloned().collect();
        let blocking_domains: Vec<String> = order
            .iter()
            .take(BLOCKING_WINDOW)
            .filter(|key| dependencies.has_dependencies(key))
            .cloned()
            .collect();
        let estimated_time = format!("{} días", phases.populated() * PHASE_DAYS);

        Roadmap {
            order,
            phases,
            critical_path,
            estimated_time,
            expected_improvement_pct: Self::expected_improvement_pct(results),
            blocking_domains,
            forced,
        }
    }

    /// Prerequisite-respecting order of `keys`, plus the keys placed by the fallback.
    ///
    /// Kahn's algorithm with a min-heap over enumeration positions, which picks
    /// exactly the first eligible remaining key at every step.
    pub fn implementation_order(
        keys: &[&str],
        dependencies: &DependencyGraph,
    ) -> (Vec<String>, Vec<String>) {
        let n = keys.len();
        let mut pending = vec![0usize; n];
        let mut dependents: HashMap<&str, Vec<usize>> = HashMap::new();
        for (i, key) in keys.iter().enumerate() {
            for dep in dependencies.dependencies_of(key) {
                pending[i] += 1;
                dependents.entry(dep).or_default().push(i);
            }
        }

        let mut ready: BinaryHeap<Reverse<usize>> = (0..n)
            .filter(|&i| pending[i] == 0)
            .map(Reverse)
            .collect();
        let mut placed = vec![false; n];
        let mut processed: HashSet<&str> = HashSet::new();
        let mut first_unplaced = 0;
        let mut order = Vec::with_capacity(n);
        let mut forced = Vec::new();

        while order.len() < n {
            let mut next = None;
            while let Some(Reverse(i)) = ready.pop() {
                if !placed[i] {
                    next = Some(i);
                    break;
                }
            }
            let i = match next {
                Some(i) => i,
                None => {
                    while placed[first_unplaced] {
                        first_unplaced += 1;
                    }
                    forced.push(keys[first_unplaced].to_string());
                    first_unplaced
                }
            };

            placed[i] = true;
            order.push(keys[i].to_string());

            if processed.insert(keys[i]) {
                if let Some(waiting) = dependents.get(keys[i]) {
                    for &j in waiting {
                        pending[j] -= 1;
                        if pending[j] == 0 && !placed[j] {
                            ready.push(Reverse(j));
                        }
                    }
                }
            }
        }

        (order, forced)
    }

    /// Share of the theoretical maximum not covered by P1 domain scores, in percent.
    pub fn expected_improvement_pct(results: &[DomainResult]) -> f64 {
        if results.is_empty() {
            return 0.0;
        }
        let p1_sum: f64 = results
            .iter()
            .filter(|r| r.priority == Priority::P1)
            .map(|r| r.score)
            .sum();
        let max_possible = results.len() as f64 * 5.0;
        let pct = (max_possible - p1_sum) / max_possible * 100.0;
        ((pct * 10.0).round() / 10.0).min(100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::diagnostic::classification::Severity;
    use crate::domain::diagnostic::DiagnosticCatalog;
    use proptest::prelude::*;

    fn result(key: &str, score: f64) -> DomainResult {
        let severity = Severity::from_score(score);
        DomainResult {
            domain: key.to_string(),
            label: key.to_uppercase(),
            score,
            severity,
            priority: severity.priority(),
            evidence: vec![],
            likert_count: 0,
        }
    }

    fn results(keys: &[&str]) -> Vec<DomainResult> {
        keys.iter().map(|k| result(k, 3.0)).collect()
    }

    #[test]
    fn chain_orders_prerequisites_first() {
        let deps = DependencyGraph::new()
            .with_dependencies("a", Vec::<&str>::new())
            .with_dependencies("b", ["a"])
            .with_dependencies("c", ["a", "b"]);

        let roadmap = RoadmapBuilder::build(&results(&["a", "b", "c"]), &deps);
        assert_eq!(roadmap.order, vec!["a", "b", "c"]);
        assert!(roadmap.forced.is_empty());
    }

    #[test]
    fn enumeration_order_breaks_ties() {
        let deps = DependencyGraph::new().with_dependencies("a", ["c"]);
        let roadmap = RoadmapBuilder::build(&results(&["a", "b", "c"]), &deps);
        // b and c are eligible first; a waits for c
        assert_eq!(roadmap.order, vec!["b", "c", "a"]);
    }

    #[test]
    fn rescans_from_the_start_after_each_placement() {
        let deps = DependencyGraph::new()
            .with_dependencies("a", ["d"])
            .with_dependencies("b", ["d"]);
        let roadmap = RoadmapBuilder::build(&results(&["a", "b", "c", "d"]), &deps);
        // c is first eligible, then d; once d is placed, a comes before b
        assert_eq!(roadmap.order, vec!["c", "d", "a", "b"]);
    }

    #[test]
    fn reference_catalog_roadmap() {
        let catalog = DiagnosticCatalog::reference();
        let keys: Vec<&str> = catalog.keys().collect();
        let roadmap = RoadmapBuilder::build(&results(&keys), catalog.dependencies());

        assert_eq!(
            roadmap.order,
            vec![
                "direccion",
                "finanzas",
                "rrhh",
                "operaciones",
                "marketing_ventas",
                "logistica",
                "innovacion"
            ]
        );
        assert_eq!(roadmap.critical_path, vec!["direccion", "finanzas", "rrhh"]);
        assert_eq!(roadmap.phases.phase_1, vec!["direccion"]);
        assert_eq!(roadmap.phases.phase_2, vec!["finanzas"]);
        assert_eq!(roadmap.phases.phase_3, vec!["rrhh"]);
        assert_eq!(roadmap.blocking_domains, vec!["finanzas"]);
        assert_eq!(roadmap.estimated_time, "90 días");
    }

    #[test]
    fn cycle_falls_back_to_first_remaining() {
        let deps = DependencyGraph::new()
            .with_dependencies("a", ["b"])
            .with_dependencies("b", ["a"]);
        let roadmap = RoadmapBuilder::build(&results(&["a", "b", "c"]), &deps);

        // c is eligible; then a and b stall, so a is forced and frees b
        assert_eq!(roadmap.order, vec!["c", "a", "b"]);
        assert_eq!(roadmap.forced, vec!["a"]);
    }

    #[test]
    fn unknown_dependency_is_forced() {
        let deps = DependencyGraph::new().with_dependencies("a", ["ghost"]);
        let roadmap = RoadmapBuilder::build(&results(&["a", "b"]), &deps);
        assert_eq!(roadmap.order, vec!["b", "a"]);
        assert_eq!(roadmap.forced, vec!["a"]);
    }

    #[test]
    fn self_dependency_is_forced() {
        let deps = DependencyGraph::new().with_dependencies("a", ["a"]);
        let roadmap = RoadmapBuilder::build(&results(&["a"]), &deps);
        assert_eq!(roadmap.order, vec!["a"]);
        assert_eq!(roadmap.forced, vec!["a"]);
    }

    #[test]
    fn short_rosters_fill_fewer_phases() {
        let roadmap = RoadmapBuilder::build(&results(&["a", "b"]), &DependencyGraph::new());
        assert_eq!(roadmap.phases.phase_3, Vec::<String>::new());
        assert_eq!(roadmap.phases.populated(), 2);
        assert_eq!(roadmap.critical_path, vec!["a", "b"]);
        assert_eq!(roadmap.estimated_time, "60 días");

        let empty = RoadmapBuilder::build(&[], &DependencyGraph::new());
        assert!(empty.order.is_empty());
        assert_eq!(empty.expected_improvement_pct, 0.0);
        assert_eq!(empty.estimated_time, "0 días");
    }

    #[test]
    fn blocking_domains_only_look_at_first_two() {
        let deps = DependencyGraph::new()
            .with_dependencies("b", ["a"])
            .with_dependencies("c", ["a"]);
        let roadmap = RoadmapBuilder::build(&results(&["a", "b", "c"]), &deps);
        assert_eq!(roadmap.blocking_domains, vec!["b"]);
    }

    #[test]
    fn improvement_counts_only_p1_scores() {
        // 4 domains -> max 20; P1 scores 2.0 + 2.5 = 4.5; (20 - 4.5) / 20 = 77.5%
        let rs = vec![
            result("a", 2.0),
            result("b", 2.5),
            result("c", 3.0),
            result("d", 4.5),
        ];
        assert_eq!(RoadmapBuilder::expected_improvement_pct(&rs), 77.5);
    }

    #[test]
    fn improvement_rounds_to_one_decimal() {
        // 3 domains -> max 15; P1 1.0; 14 / 15 = 93.333...
        let rs = vec![result("a", 1.0), result("b", 4.0), result("c", 4.0)];
        assert_eq!(RoadmapBuilder::expected_improvement_pct(&rs), 93.3);
    }

    #[test]
    fn improvement_is_full_without_p1_domains() {
        let rs = vec![result("a", 4.0), result("b", 3.0)];
        assert_eq!(RoadmapBuilder::expected_improvement_pct(&rs), 100.0);
    }

    #[test]
    fn serializes_with_wire_names() {
        let roadmap = RoadmapBuilder::build(&results(&["a"]), &DependencyGraph::new());
        let json = serde_json::to_value(&roadmap).unwrap();
        for key in [
            "order",
            "phases",
            "criticalPath",
            "tiempoEstimado",
            "expectedImprovementPct",
            "blockingDomains",
        ] {
            assert!(json.get(key).is_some(), "missing {key}");
        }
        assert!(json.get("forced").is_none());
        assert_eq!(json["phases"]["phase_1"], serde_json::json!(["a"]));
    }

    fn key(i: usize) -> String {
        format!("d{i}")
    }

    proptest! {
        #[test]
        fn acyclic_graphs_yield_valid_orders(
            n in 1usize..12,
            edges in proptest::collection::vec((0usize..12, 0usize..12), 0..40)
        ) {
            // Edges only point to lower indices, so the graph is acyclic.
            let mut deps = DependencyGraph::new();
            for (a, b) in edges {
                let (a, b) = (a % n, b % n);
                if a > b {
                    deps = deps.with_dependencies(key(a), [key(b)]);
                }
            }
            let owned: Vec<String> = (0..n).rev().map(key).collect();
            let keys: Vec<&str> = owned.iter().map(String::as_str).collect();

            let (order, forced) = RoadmapBuilder::implementation_order(&keys, &deps);
            prop_assert!(forced.is_empty());
            prop_assert_eq!(order.len(), n);
            for (pos, k) in order.iter().enumerate() {
                for dep in deps.dependencies_of(k) {
                    let dep_pos = order.iter().position(|o| o == dep).unwrap();
                    prop_assert!(dep_pos < pos);
                }
            }
        }

        #[test]
        fn arbitrary_graphs_terminate_with_a_permutation(
            n in 0usize..10,
            edges in proptest::collection::vec((0usize..10, 0usize..12), 0..40)
        ) {
            let mut deps = DependencyGraph::new();
            for (a, b) in edges {
                // b may point past the roster (unknown domain) or form cycles
                deps = deps.with_dependencies(key(a), [key(b)]);
            }
            let owned: Vec<String> = (0..n).map(key).collect();
            let keys: Vec<&str> = owned.iter().map(String::as_str).collect();

            let (order, _) = RoadmapBuilder::implementation_order(&keys, &deps);
            let mut sorted = order.clone();
            sorted.sort();
            let mut expected = owned.clone();
            expected.sort();
            prop_assert_eq!(sorted, expected);
        }
    }
}
