use std::env;
use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use crate::filter::FilterPolicy;
use crate::graph::GraphBuilder;
use crate::provider::FsProvider;
use crate::render::{IdStrategy, NodeIds, RenderOptions, Renderer};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[arg(help = "Import path of the root package to graph")]
    pub package: String,

    #[arg(
        short = 's',
        long = "ignore-platform",
        help = "Ignore platform-provided packages"
    )]
    pub ignore_platform: bool,

    #[arg(
        short = 'p',
        long = "ignore-prefixes",
        value_delimiter = ',',
        help = "Comma-separated list of prefixes to ignore"
    )]
    pub ignore_prefixes: Vec<String>,

    #[arg(
        short = 'i',
        long = "ignore-packages",
        value_delimiter = ',',
        help = "Comma-separated list of packages to ignore"
    )]
    pub ignore_packages: Vec<String>,

    #[arg(
        short = 'n',
        long = "include-packages",
        value_delimiter = ',',
        help = "Comma-separated list of prefixes to always include, overriding other rules"
    )]
    pub include_packages: Vec<String>,

    #[arg(
        short = 'b',
        long = "base-path",
        help = "Restrict the graph to the base path inferred from the root package"
    )]
    pub filter_by_base_path: bool,

    #[arg(long = "subgraph", help = "Wrap base-path packages in a subgraph box")]
    pub subgraph: bool,

    #[arg(
        long = "network-subgraphs",
        help = "Emit a standalone subgraph per always-included external package; meant to be combined with --subgraph"
    )]
    pub network_subgraphs: bool,

    #[arg(
        long = "path-ids",
        help = "Use import paths instead of integers as node ids"
    )]
    pub path_ids: bool,

    #[arg(
        long = "platform-root",
        help = "Directory holding platform-provided packages"
    )]
    pub platform_root: Option<PathBuf>,
}

pub fn run_cli() -> Result<()> {
    let cli = Cli::parse();

    let mut policy = FilterPolicy::new()
        .ignore_platform(cli.ignore_platform)
        .ignore_prefixes(&cli.ignore_prefixes)
        .ignore_exact(&cli.ignore_packages)
        .include_prefixes(&cli.include_packages)
        .filter_by_base_path(cli.filter_by_base_path);

    let mut provider = FsProvider::new();
    if let Some(dir) = &cli.platform_root {
        provider = provider.with_platform_root(dir.clone());
    }

    let cwd = env::current_dir().context("failed to get cwd")?;
    let builder = GraphBuilder::new(&provider, &cwd);
    let graph = builder.resolve(&cli.package, &mut policy)?;

    info!(packages = graph.len(), "resolved {}", cli.package);

    let strategy = if cli.path_ids {
        IdStrategy::Path {
            namespace: policy.base_path().map(str::to_string),
        }
    } else {
        IdStrategy::Counter
    };
    let options = RenderOptions {
        subgraph: cli.subgraph,
        network_subgraphs: cli.network_subgraphs,
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut renderer = Renderer::new(&policy, NodeIds::new(strategy), options);
    renderer.render(&graph, &mut out)?;
    out.flush()?;

    Ok(())
}
