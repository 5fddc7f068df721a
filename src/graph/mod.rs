use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use petgraph::graph::{DiGraph, NodeIndex};
use tracing::debug;

use crate::filter::FilterPolicy;
use crate::provider::MetadataProvider;

/// A resolved package. Immutable once built.
#[derive(Debug, Clone)]
pub struct Package {
    /// Canonical import path, the package's identity everywhere.
    pub import_path: String,
    /// Part of the language's standard distribution.
    pub is_platform: bool,
    /// Contains sources that need a foreign toolchain.
    pub has_foreign_source: bool,
    /// Direct imports, in declaration order.
    pub imports: Vec<String>,
}

/// The transitive import closure of one root package.
///
/// The node arena doubles as the visited set during the build: a path is
/// visited iff it is in `path_index`. Node order is insertion order, which
/// makes render output deterministic for a stable underlying import order.
#[derive(Debug)]
pub struct PackageGraph {
    pub graph: DiGraph<Package, ()>,
    pub path_index: HashMap<String, NodeIndex>,
}

impl PackageGraph {
    pub fn new() -> Self {
        Self {
            graph: DiGraph::new(),
            path_index: HashMap::new(),
        }
    }

    pub fn insert(&mut self, pkg: Package) -> NodeIndex {
        let path = pkg.import_path.clone();
        let idx = self.graph.add_node(pkg);
        self.path_index.insert(path, idx);
        idx
    }

    pub fn contains(&self, import_path: &str) -> bool {
        self.path_index.contains_key(import_path)
    }

    pub fn get(&self, import_path: &str) -> Option<&Package> {
        self.path_index
            .get(import_path)
            .map(|&idx| &self.graph[idx])
    }

    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Packages in insertion (resolution) order.
    pub fn packages(&self) -> impl Iterator<Item = &Package> + '_ {
        self.graph.node_indices().map(|idx| &self.graph[idx])
    }

    /// Connect each package to the imports that made it into the graph.
    /// Imports of packages that were never resolved have no edge.
    fn stitch_edges(&mut self) {
        let mut edges = Vec::new();
        for idx in self.graph.node_indices() {
            for imp in &self.graph[idx].imports {
                if let Some(&target) = self.path_index.get(imp) {
                    edges.push((idx, target));
                }
            }
        }
        for (from, to) in edges {
            self.graph.add_edge(from, to, ());
        }
    }
}

impl Default for PackageGraph {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolves a root package's transitive import closure through a
/// [`MetadataProvider`], relative to a fixed resolution root.
pub struct GraphBuilder<'a, P> {
    provider: &'a P,
    root_dir: &'a Path,
}

impl<'a, P: MetadataProvider> GraphBuilder<'a, P> {
    pub fn new(provider: &'a P, root_dir: &'a Path) -> Self {
        Self { provider, root_dir }
    }

    /// Resolve everything reachable from `root`. Any resolution failure
    /// aborts the whole run; there is no partial graph.
    pub fn resolve(&self, root: &str, policy: &mut FilterPolicy) -> Result<PackageGraph> {
        let mut graph = PackageGraph::new();
        self.visit(root, policy, &mut graph)?;
        graph.stitch_edges();
        debug!(
            packages = graph.len(),
            edges = graph.graph.edge_count(),
            "resolved import closure"
        );
        Ok(graph)
    }

    fn visit(
        &self,
        import_path: &str,
        policy: &mut FilterPolicy,
        graph: &mut PackageGraph,
    ) -> Result<()> {
        if policy.skip_resolution(import_path) {
            return Ok(());
        }

        let pkg = self
            .provider
            .resolve(import_path, self.root_dir)
            .with_context(|| format!("failed to resolve {import_path}"))?;

        if policy.is_ignored(&pkg) {
            return Ok(());
        }

        // Resolution may canonicalize the requested spelling; dedupe on the
        // canonical path so an alias does not insert a second node.
        if graph.contains(&pkg.import_path) {
            return Ok(());
        }

        // The first package we keep fixes the base path, when inference is on.
        policy.observe_root(&pkg.import_path);

        let is_platform = pkg.is_platform;
        let imports = pkg.imports.clone();
        graph.insert(pkg);

        // Platform packages' own dependencies are never walked
        if is_platform {
            return Ok(());
        }

        for imp in &imports {
            if !graph.contains(imp) {
                self.visit(imp, policy, graph)?;
            }
        }
        Ok(())
    }
}
