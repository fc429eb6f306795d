//! Include graph over a header set

use std::collections::{BTreeMap, BTreeSet, HashSet, VecDeque};

use crate::directive::try_scan_includes;
use crate::resolver::HeaderResolver;

/// Node in the include graph
#[derive(Debug, Clone, Default)]
pub struct FileNode {
    /// Local headers this file includes
    pub includes: BTreeSet<String>,
    /// False when the file couldn't be read from the source directory
    pub present: bool,
}

/// "File includes header" graph, used to explain why a header was pulled in.
pub struct IncludeGraph {
    files: BTreeMap<String, FileNode>,
}

impl IncludeGraph {
    /// Create a new empty include graph
    pub fn new() -> Self {
        Self {
            files: BTreeMap::new(),
        }
    }

    /// Scan every file in `names` and record its direct includes
    pub fn build<I, S>(resolver: &HeaderResolver, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut graph = Self::new();
        for name in names {
            let name = name.into();
            match try_scan_includes(&resolver.resolve(&name)) {
                Ok(includes) => graph.add_file(name, includes),
                Err(_) => graph.add_missing(name),
            }
        }
        graph
    }

    /// Add a readable file and its direct includes
    pub fn add_file(&mut self, name: impl Into<String>, includes: BTreeSet<String>) {
        self.files.insert(
            name.into(),
            FileNode {
                includes,
                present: true,
            },
        );
    }

    /// Add a file that was named but couldn't be read
    pub fn add_missing(&mut self, name: impl Into<String>) {
        self.files.insert(name.into(), FileNode::default());
    }

    pub fn get(&self, name: &str) -> Option<&FileNode> {
        self.files.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.files.contains_key(name)
    }

    /// All files in the graph, sorted by name
    pub fn files(&self) -> impl Iterator<Item = (&str, &FileNode)> {
        self.files.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Files that were named but not found
    pub fn missing(&self) -> Vec<&str> {
        self.files
            .iter()
            .filter(|(_, node)| !node.present)
            .map(|(name, _)| name.as_str())
            .collect()
    }

    /// Files that directly include `header`
    pub fn includers(&self, header: &str) -> Vec<&str> {
        self.files
            .iter()
            .filter(|(_, node)| node.includes.contains(header))
            .map(|(name, _)| name.as_str())
            .collect()
    }

    /// Everything reachable from `roots` through recorded includes,
    /// including the roots themselves
    pub fn reachable_from<I, S>(&self, roots: I) -> BTreeSet<String>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut seen: BTreeSet<String> = BTreeSet::new();
        let mut queue: VecDeque<String> = roots.into_iter().map(Into::into).collect();

        while let Some(current) = queue.pop_front() {
            if !seen.insert(current.clone()) {
                continue;
            }
            if let Some(node) = self.files.get(&current) {
                for header in &node.includes {
                    if !seen.contains(header) {
                        queue.push_back(header.clone());
                    }
                }
            }
        }

        seen
    }

    /// Find an include cycle, if any.
    ///
    /// Guarded headers can legally include each other, so a cycle is
    /// informational. The returned path starts and ends on the same file.
    pub fn detect_cycle(&self) -> Option<Vec<String>> {
        let mut visited = HashSet::new();
        let mut stack = Vec::new();

        for name in self.files.keys() {
            if !visited.contains(name.as_str()) {
                if let Some(cycle) = self.detect_cycle_util(name, &mut visited, &mut stack) {
                    return Some(cycle);
                }
            }
        }

        None
    }

    /// Depth-first helper for cycle detection; `stack` is the current path
    fn detect_cycle_util<'g>(
        &'g self,
        current: &'g str,
        visited: &mut HashSet<&'g str>,
        stack: &mut Vec<&'g str>,
    ) -> Option<Vec<String>> {
        visited.insert(current);
        stack.push(current);

        if let Some(node) = self.files.get(current) {
            for header in &node.includes {
                if let Some(pos) = stack.iter().position(|n| *n == header.as_str()) {
                    let mut cycle: Vec<String> =
                        stack[pos..].iter().map(|n| n.to_string()).collect();
                    cycle.push(header.clone());
                    return Some(cycle);
                }
                if !visited.contains(header.as_str()) {
                    if let Some(cycle) = self.detect_cycle_util(header, visited, stack) {
                        return Some(cycle);
                    }
                }
            }
        }

        stack.pop();
        None
    }
}

impl Default for IncludeGraph {
    fn default() -> Self {
        Self::new()
    }
}
