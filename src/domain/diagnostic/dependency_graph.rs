//! Prerequisite relations between diagnostic domains.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// Mapping from a domain key to the domain keys it depends on.
///
/// Domains missing from the map have no prerequisites.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DependencyGraph(BTreeMap<String, BTreeSet<String>>);

impl DependencyGraph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares the prerequisites of `domain`, merging with earlier declarations.
    pub fn with_dependencies<I, S>(mut self, domain: impl Into<String>, dependencies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.0
            .entry(domain.into())
            .or_default()
            .extend(dependencies.into_iter().map(Into::into));
        self
    }

    /// Prerequisites of `domain` (empty when unlisted).
    pub fn dependencies_of(&self, domain: &str) -> impl Iterator<Item = &str> {
        self.0
            .get(domain)
            .into_iter()
            .flat_map(|deps| deps.iter().map(String::as_str))
    }

    /// True if `domain` has at least one prerequisite.
    pub fn has_dependencies(&self, domain: &str) -> bool {
        self.0.get(domain).is_some_and(|deps| !deps.is_empty())
    }

    /// Domains that declare prerequisites, with their prerequisite sets.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &BTreeSet<String>)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Finds one dependency cycle, returned as a closed path (`a -> b -> a`).
    pub fn find_cycle(&self) -> Option<Vec<String>> {
        #[derive(Clone, Copy, PartialEq)]
        enum Mark {
            Visiting,
            Done,
        }

        fn visit<'a>(
            graph: &'a DependencyGraph,
            node: &'a str,
            marks: &mut BTreeMap<&'a str, Mark>,
            stack: &mut Vec<&'a str>,
        ) -> Option<Vec<String>> {
            match marks.get(node) {
                Some(Mark::Done) => return None,
                Some(Mark::Visiting) => {
                    let start = stack.iter().position(|n| *n == node).unwrap_or(0);
                    let mut cycle: Vec<String> =
                        stack[start..].iter().map(|s| s.to_string()).collect();
                    cycle.push(node.to_string());
                    return Some(cycle);
                }
                None => {}
            }

            marks.insert(node, Mark::Visiting);
            stack.push(node);
            for dep in graph.dependencies_of(node) {
                if let Some(cycle) = visit(graph, dep, marks, stack) {
                    return Some(cycle);
                }
            }
            stack.pop();
            marks.insert(node, Mark::Done);
            None
        }

        let mut marks = BTreeMap::new();
        let mut stack = Vec::new();
        for node in self.0.keys() {
            if let Some(cycle) = visit(self, node, &mut marks, &mut stack) {
                return Some(cycle);
            }
        }
        None
    }
}
