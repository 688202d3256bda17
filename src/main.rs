use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use pram_tree::{
    build_tree, compute_discovery_order, RankConfig, RankEngine, RoundPolicy, TreeModel,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "pram-tree", about = "PRAM-style Euler tour compaction and pointer-jumping ranks")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the Euler tour of a tree (children in ascending id order).
    Tour {
        /// Parent of each node, comma separated; the root points at itself.
        #[arg(long, value_delimiter = ',', required = true)]
        parents: Vec<usize>,
    },
    /// Compact an Euler tour into preorder discovery order.
    Discover {
        /// Parent of each node, comma separated; the root points at itself.
        #[arg(long, value_delimiter = ',', required = true)]
        parents: Vec<usize>,
        /// Euler tour, comma separated (default: built from the tree).
        #[arg(long, value_delimiter = ',')]
        tour: Option<Vec<usize>>,
    },
    /// Compute node depths by pointer jumping.
    Rank {
        /// Parent of each node, comma separated; the root points at itself.
        #[arg(long, value_delimiter = ',', required = true)]
        parents: Vec<usize>,
        /// Round policy: fixed-point, depth-bound or fixed:<k>.
        #[arg(long, default_value_t = RoundPolicy::FixedPoint)]
        policy: RoundPolicy,
        /// Print the ranks after every round.
        #[arg(long)]
        history: bool,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Tour { parents } => run_tour(&parents)?,
        Commands::Discover { parents, tour } => run_discover(&parents, tour)?,
        Commands::Rank {
            parents,
            policy,
            history,
        } => run_rank(&parents, policy, history)?,
    }

    Ok(())
}

fn load_tree(parents: &[usize]) -> Result<TreeModel> {
    build_tree(parents.len(), parents).context("failed to build tree from parent list")
}

fn run_tour(parents: &[usize]) -> Result<()> {
    let tree = load_tree(parents)?;
    println!("{}", join(tree.euler_tour().as_slice()));
    Ok(())
}

fn run_discover(parents: &[usize], tour: Option<Vec<usize>>) -> Result<()> {
    let tree = load_tree(parents)?;
    let tour = tour.unwrap_or_else(|| tree.euler_tour().as_slice().to_vec());
    let order = compute_discovery_order(&tree, &tour).context("discovery order failed")?;

    let ids: Vec<usize> = order.iter().map(usize::from).collect();
    println!("order\t{}", join(&ids));
    println!("index\t{}", join(order.positions()));
    Ok(())
}

fn run_rank(parents: &[usize], policy: RoundPolicy, history: bool) -> Result<()> {
    let tree = load_tree(parents)?;
    let config = RankConfig::new()
        .with_round_policy(policy)
        .with_history(history);
    let outcome = RankEngine::new(&tree, config)
        .run()
        .with_context(|| format!("pointer jumping failed under policy {}", policy))?;

    for (round, ranks) in outcome.profile.rank_history.iter().enumerate() {
        println!("round {}\t{}", round + 1, join(ranks));
    }
    for (node, depth) in outcome.ranks.iter() {
        println!("{}\t{}", node.index(), depth);
    }
    eprint!("{}", outcome.profile.report());
    Ok(())
}

fn join(values: &[usize]) -> String {
    values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(",")
}
