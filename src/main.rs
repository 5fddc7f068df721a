use anyhow::Result;

fn main() -> Result<()> {
    // Diagnostics go to stderr so the graph text on stdout stays clean
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();
    depgraph::cli::run_cli()
}
