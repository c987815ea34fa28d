use anyhow::{bail, Context};
use colored::Colorize;

use gitm_refs::{Head, RefStore};
use gitm_repo::{DriveOutcome, DrivePlan, FsRepository, RenameSignatures};
use gitm_types::{Signature, Timestamp};

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Init(_) => cmd_init(&cli.repo),
        Command::Commit(args) => cmd_commit(&cli.repo, args),
        Command::Log(args) => cmd_log(&cli.repo, args),
        Command::Branch(_) => cmd_branch(&cli.repo),
        Command::Resolve(args) => cmd_resolve(&cli.repo, args),
        Command::Mirror(args) => cmd_mirror(&cli.repo, args),
        Command::Rewrite(args) => cmd_rewrite(&cli.repo, args),
    }
}

fn cmd_init(dir: &std::path::Path) -> anyhow::Result<()> {
    FsRepository::init(dir)?;
    println!(
        "{} Initialized gitm repository in {}",
        "✓".green().bold(),
        dir.join(gitm_repo::GITM_DIR).display().to_string().bold()
    );
    Ok(())
}

fn cmd_commit(dir: &std::path::Path, args: CommitArgs) -> anyhow::Result<()> {
    let repo = FsRepository::open(dir)?;

    let mut files = Vec::with_capacity(args.files.len());
    for spec in &args.files {
        let Some((name, contents)) = spec.split_once('=') else {
            bail!("malformed --file argument {spec:?}; expected NAME=CONTENTS");
        };
        files.push((name.to_string(), contents.as_bytes().to_vec()));
    }

    let author = Signature::new(args.author, args.email, Timestamp::now());
    let id = repo.commit(&args.branch, &args.message, &files, author)?;
    println!(
        "{} [{}] {} {}",
        "✓".green(),
        args.branch.yellow(),
        id.short_hex().dimmed(),
        args.message
    );
    Ok(())
}

fn cmd_log(dir: &std::path::Path, args: LogArgs) -> anyhow::Result<()> {
    let repo = FsRepository::open(dir)?;
    let history = repo.log(&args.rev)?;

    for (id, commit) in history.iter().take(args.limit) {
        if args.oneline {
            println!(
                "{} ({}) {} {}",
                id.short_hex().dimmed(),
                commit.author.when.format_date().blue(),
                commit.author.email.green(),
                commit.subject()
            );
        } else {
            println!("{} {}", "commit".yellow(), id);
            println!("Author: {} ({})", commit.author, commit.author.when.format_date());
            println!();
            for line in commit.message.lines() {
                println!("    {line}");
            }
            println!();
        }
    }
    Ok(())
}

fn cmd_branch(dir: &std::path::Path) -> anyhow::Result<()> {
    let repo = FsRepository::open(dir)?;
    let current = match repo.refs().head()? {
        Some(Head::Symbolic(name)) => Some(name),
        _ => None,
    };
    for (name, tip) in repo.branches()? {
        let marker = if Some(&name) == current.as_ref() { "*" } else { " " };
        println!("{marker} {} {}", name.yellow(), tip.short_hex().dimmed());
    }
    Ok(())
}

fn cmd_resolve(dir: &std::path::Path, args: ResolveArgs) -> anyhow::Result<()> {
    let repo = FsRepository::open(dir)?;
    let resolved = repo.resolve(&args.expr)?;
    let form = match resolved.branch_name() {
        Some(name) => format!("branch tip of {name}"),
        None => "explicit commit".to_string(),
    };
    println!("{} ({})", resolved.id, form.dimmed());
    Ok(())
}

fn cmd_mirror(dir: &std::path::Path, args: MirrorArgs) -> anyhow::Result<()> {
    let repo = FsRepository::open(dir)?;
    if args.dry_run {
        return print_plan(repo.plan(&args.base, &args.target)?);
    }
    let result = repo
        .mirror(&args.base, &args.target)
        .context("mirror failed")?;
    print_outcome("mirror", &result);
    Ok(())
}

fn cmd_rewrite(dir: &std::path::Path, args: RewriteArgs) -> anyhow::Result<()> {
    let repo = FsRepository::open(dir)?;
    if args.dry_run {
        return print_plan(repo.plan(&args.base, &args.target)?);
    }
    let transform = match args.author_name {
        Some(name) => RenameSignatures::new(name),
        None => RenameSignatures::default(),
    };
    let result = repo
        .rewrite(&args.base, &args.target, &transform)
        .context("rewrite failed")?;
    print_outcome("rewrite", &result);
    Ok(())
}

fn print_plan(plan: DrivePlan) -> anyhow::Result<()> {
    println!(
        "--- {} commits would land on {} (dry run) ---",
        plan.entries.len(),
        plan.branch.yellow()
    );
    for entry in &plan.entries {
        let subject: String = entry.subject.chars().take(48).collect();
        println!(
            "{} ({}) {} {}",
            entry.id.short_hex().dimmed(),
            entry.when.format_date().blue(),
            entry.email.green(),
            subject
        );
    }
    Ok(())
}

fn print_outcome(mode: &str, result: &DriveOutcome) {
    let outcome = &result.outcome;
    if outcome.already_complete {
        println!(
            "{} {} already processed ({} commits); nothing to do",
            "✓".green(),
            outcome.branch.yellow(),
            outcome.reused
        );
        return;
    }
    match outcome.tip {
        Some(tip) => println!(
            "{} {} {} -> {} at {} ({} new, {} reused)",
            "✓".green().bold(),
            mode,
            result.target.expr.bold(),
            outcome.branch.yellow(),
            tip.short_hex().dimmed(),
            outcome.fresh,
            outcome.reused
        ),
        None => println!("{} nothing to {mode}: empty range", "✓".green()),
    }
}
