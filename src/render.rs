use std::collections::HashMap;
use std::fmt;
use std::io::{self, Write};

use crate::filter::FilterPolicy;
use crate::graph::{Package, PackageGraph};

const COLOR_PLATFORM: &str = "palegreen";
const COLOR_FOREIGN: &str = "darkgoldenrod1";
const COLOR_INCLUDED: &str = "violet";
const COLOR_DEFAULT: &str = "paleturquoise";

/// How rendering identifiers are assigned.
pub enum IdStrategy {
    /// Monotonic integers assigned on first sight. Stable within a run,
    /// not across runs if the underlying import order moves.
    Counter,
    /// The import path itself, optionally namespaced so that several
    /// runs' outputs can be concatenated without id collisions.
    Path { namespace: Option<String> },
}

#[derive(Debug, Clone)]
pub enum NodeId {
    Num(u32),
    Text(String),
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeId::Num(n) => write!(f, "{n}"),
            NodeId::Text(s) => write!(f, "\"{s}\""),
        }
    }
}

/// Assigns node identifiers; idempotent, the same path always yields the
/// same id within a run.
pub struct NodeIds {
    strategy: IdStrategy,
    assigned: HashMap<String, u32>,
    next: u32,
}

impl NodeIds {
    pub fn new(strategy: IdStrategy) -> Self {
        Self {
            strategy,
            assigned: HashMap::new(),
            next: 0,
        }
    }

    pub fn id_for(&mut self, path: &str) -> NodeId {
        match &self.strategy {
            IdStrategy::Counter => {
                let next = &mut self.next;
                let id = *self.assigned.entry(path.to_string()).or_insert_with(|| {
                    let id = *next;
                    *next += 1;
                    id
                });
                NodeId::Num(id)
            }
            IdStrategy::Path { namespace } => match namespace {
                Some(ns) => NodeId::Text(format!("{ns}:{path}")),
                None => NodeId::Text(path.to_string()),
            },
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RenderOptions {
    /// Wrap base-path packages in a cluster box.
    pub subgraph: bool,
    /// Emit a standalone cluster per always-included external package.
    pub network_subgraphs: bool,
}

/// Emits the dot document: header, optional base-path cluster, one styled
/// node per retained package with its retained outgoing edges, then the
/// network-subgraph second pass, then the footer.
pub struct Renderer<'a> {
    policy: &'a FilterPolicy,
    ids: NodeIds,
    options: RenderOptions,
}

impl<'a> Renderer<'a> {
    pub fn new(policy: &'a FilterPolicy, ids: NodeIds, options: RenderOptions) -> Self {
        Self {
            policy,
            ids,
            options,
        }
    }

    pub fn render<W: Write>(&mut self, graph: &PackageGraph, out: &mut W) -> io::Result<()> {
        writeln!(out, "digraph godep {{")?;

        let base_wrapped = self.options.subgraph && self.policy.base_path().is_some();
        if base_wrapped {
            let base = self.policy.base_path().unwrap_or_default().to_string();
            write_subgraph_head(out, &base)?;
        }

        // Packages that get a standalone network cluster after the main loop
        let mut network_packages: Vec<(String, NodeId)> = Vec::new();

        for pkg in graph.packages() {
            if self.policy.is_ignored(pkg) {
                continue;
            }

            let id = self.ids.id_for(&pkg.import_path);
            write_node(out, &id, &pkg.import_path, self.color_for(pkg))?;

            for imp in &pkg.imports {
                // Imports that never made it into the graph are dropped here
                let Some(target) = graph.get(imp) else { continue };
                if self.policy.is_ignored(target) {
                    continue;
                }
                let target_id = self.ids.id_for(&target.import_path);
                writeln!(out, "{id} -> {target_id};")?;
            }

            if self.options.network_subgraphs
                && self.policy.always_included(&pkg.import_path)
                && !self.policy.in_base_path(&pkg.import_path)
            {
                network_packages.push((pkg.import_path.clone(), id));
            }
        }

        if base_wrapped {
            writeln!(out, "}}")?;
        }

        for (path, id) in network_packages {
            let name = path.rsplit('/').next().unwrap_or(&path).to_string();
            write_subgraph_head(out, &name)?;
            let synth_id = self.ids.id_for(&name);
            write_node(out, &synth_id, &name, COLOR_DEFAULT)?;
            writeln!(out, "}}")?;
            writeln!(out, "{id} -> {synth_id};")?;
        }

        writeln!(out, "}}")
    }

    /// First match wins: a platform package always styles as platform even
    /// when it also matches an always-include prefix.
    fn color_for(&self, pkg: &Package) -> &'static str {
        if pkg.is_platform {
            COLOR_PLATFORM
        } else if pkg.has_foreign_source {
            COLOR_FOREIGN
        } else if self.policy.always_included(&pkg.import_path) {
            COLOR_INCLUDED
        } else {
            COLOR_DEFAULT
        }
    }
}

fn write_subgraph_head<W: Write>(out: &mut W, name: &str) -> io::Result<()> {
    writeln!(out, "subgraph \"cluster{name}\" {{")?;
    writeln!(out, "style=filled;")?;
    writeln!(out, "color=lightgrey;")?;
    writeln!(out, "label=\"{name}\"")
}

fn write_node<W: Write>(out: &mut W, id: &NodeId, label: &str, color: &str) -> io::Result<()> {
    writeln!(out, "{id} [label=\"{label}\" style=\"filled\" color=\"{color}\"];")
}
