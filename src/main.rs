use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use release_branch::cli::ReleaseOrchestrator;
use release_branch::config::{self, GitOptions, Invocation, ReleaseOptions};
use release_branch::git::SystemGitRunner;
use release_branch::notice::SkipNotice;
use release_branch::ui;

#[derive(clap::Parser)]
#[command(
    name = "release-branch",
    about = "Create a release branch and update semantic version numbers"
)]
struct Args {
    #[arg(help = "Increment kind (major, minor, patch, static) or a configured target")]
    target: Option<String>,

    #[arg(short, long, help = "Custom configuration file path")]
    config: Option<PathBuf>,

    #[arg(long, help = "String prepended to the major version number")]
    prefix: Option<String>,

    #[arg(long, help = "String appended to the patch version number")]
    postfix: Option<String>,

    #[arg(long, help = "Branch the release branch is created from")]
    source_branch: Option<String>,

    #[arg(long, help = "Remote the release branch is pushed to")]
    remote: Option<String>,

    #[arg(long, help = "Only update files, run no git commands")]
    no_git: bool,

    #[arg(long, help = "Do not stage and commit the updated files")]
    no_commit: bool,

    #[arg(long, help = "Do not push the release branch")]
    no_push: bool,

    #[arg(long, help = "Preview what would happen without making changes")]
    dry_run: bool,

    #[arg(short, long, help = "Echo git commands and their output")]
    verbose: bool,

    #[arg(long, help = "Show configured targets and exit")]
    list: bool,

    #[arg(short = 'V', long, help = "Print version information")]
    version: bool,
}

impl Args {
    fn overrides(&self) -> ReleaseOptions {
        ReleaseOptions {
            version_prefix: self.prefix.clone(),
            version_postfix: self.postfix.clone(),
            disable_git: self.no_git.then_some(true),
            git: GitOptions {
                source_branch: self.source_branch.clone(),
                remote: self.remote.clone(),
                auto_commit: self.no_commit.then_some(false),
                auto_push: self.no_push.then_some(false),
                ..Default::default()
            },
            ..Default::default()
        }
    }
}

fn main() {
    let args = Args::parse();

    if let Err(e) = run(args) {
        ui::display_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    if args.version {
        println!("release-branch {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let config_file =
        config::load_config(args.config.as_deref()).context("Error loading config")?;

    if args.list {
        ui::display_targets(&config_file.target_names());
        return Ok(());
    }

    if let Some(target) = args.target.as_deref() {
        if !config_file.knows_target(target) {
            ui::display_notice(&SkipNotice::UnknownTarget {
                target: target.to_string(),
            });
        }
    }

    let invocation = Invocation {
        target: args.target.clone(),
        overrides: args.overrides(),
        dry_run: args.dry_run,
        silent: !args.verbose,
    };
    let config = config_file.resolve(&invocation)?;

    let root = std::env::current_dir().context("Cannot determine working directory")?;
    let runner = if config.disable_git {
        SystemGitRunner::new(&root, config.silent)
    } else {
        SystemGitRunner::discover(&root, config.silent)?
    };

    let mut orchestrator = ReleaseOrchestrator::new(config, runner, root);
    let outcome = orchestrator.run()?;
    ui::display_outcome(&outcome);

    Ok(())
}
