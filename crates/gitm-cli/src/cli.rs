use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "gitm",
    about = "Magitulator — mirror and rewrite commit history onto derived branches",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Repository directory (the one containing .gitm)
    #[arg(long, global = true, default_value = ".")]
    pub repo: PathBuf,

    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Initialize a new repository
    Init(InitArgs),
    /// Record a commit on a branch
    Commit(CommitArgs),
    /// Show first-parent history of a reference
    Log(LogArgs),
    /// List branches
    Branch(BranchArgs),
    /// Resolve a reference expression to a commit id
    Resolve(ResolveArgs),
    /// Copy the commits between base and target onto a derived branch
    Mirror(MirrorArgs),
    /// Rewrite the commits between base and target onto a derived branch
    Rewrite(RewriteArgs),
}

#[derive(Args)]
pub struct InitArgs {}

#[derive(Args)]
pub struct CommitArgs {
    #[arg(short, long)]
    pub message: String,

    /// Branch to commit on
    #[arg(short, long, default_value = "main")]
    pub branch: String,

    /// File to include, as NAME=CONTENTS (repeatable)
    #[arg(long = "file", value_name = "NAME=CONTENTS")]
    pub files: Vec<String>,

    /// Author (and committer) name
    #[arg(long, default_value = "Magitulator")]
    pub author: String,

    /// Author (and committer) email
    #[arg(long, default_value = "gitm@localhost")]
    pub email: String,
}

#[derive(Args)]
pub struct LogArgs {
    /// Reference to start from
    #[arg(default_value = "HEAD")]
    pub rev: String,

    #[arg(short = 'n', long, default_value = "20")]
    pub limit: usize,

    #[arg(long)]
    pub oneline: bool,
}

#[derive(Args)]
pub struct BranchArgs {}

#[derive(Args)]
pub struct ResolveArgs {
    /// The reference expression to resolve
    pub expr: String,
}

#[derive(Args)]
pub struct MirrorArgs {
    /// Starting reference; same as target selects the full history
    pub base: String,

    /// Reference whose commits are copied
    pub target: String,

    /// List the range without writing anything
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Args)]
pub struct RewriteArgs {
    /// Starting reference; same as target selects the full history
    pub base: String,

    /// Reference whose commits are rewritten
    pub target: String,

    /// List the range without writing anything
    #[arg(long)]
    pub dry_run: bool,

    /// Replacement author/committer name for the rewrite
    #[arg(long, value_name = "NAME")]
    pub author_name: Option<String>,
}
