use clap::{Parser, Subcommand};
use draftpress::imaging::RustBackend;
use draftpress::publish::{PublishOptions, publish};
use draftpress::{config, output};
use std::path::PathBuf;

/// Shared flags for commands that plan a publish.
#[derive(clap::Args, Clone)]
struct PublishArgs {
    /// Draft Markdown file to publish
    draft: PathBuf,

    /// Override the maximum image width in pixels
    #[arg(long)]
    max_width: Option<u32>,

    /// Emit the plan as JSON instead of a text report
    #[arg(long)]
    json: bool,

    /// Also list skipped image references
    #[arg(short, long)]
    verbose: bool,
}

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once at startup — trivial, called exactly once
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "draftpress")]
#[command(about = "Publish Markdown drafts to a Hugo blog")]
#[command(long_about = "\
Publish Markdown drafts to a Hugo blog

A draft is a single Markdown file with YAML front matter, kept anywhere in
the site tree alongside its images. Publishing validates the front matter,
derives a date-prefixed filename from the title, resizes and ships the
referenced images into the static tree, rewrites the image refs to
site-absolute URLs, writes the content file, and archives the draft.

Draft layout:

  drafts/
  ├── my-post.md                   # Draft with front matter
  ├── assets/                      # Images referenced by the draft
  │   └── screenshot.png
  └── published/                   # Archive (created on first publish)

Publishing my-post.md (title \"Hello World\", dated 2024-03-15) produces:

  content/blog/20240315_hello_world.md
  static/images/blog/20240315_hello_world/screenshot.png

Required front matter fields: title, categories, tags. Missing date, type,
and draft fields are filled in with defaults.

Run 'draftpress gen-config' to generate a documented draftpress.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Hugo site root; detected from the working directory when omitted
    #[arg(long, global = true)]
    site_root: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Publish a draft: process images, write content, archive the draft
    Publish {
        #[command(flatten)]
        args: PublishArgs,

        /// Show the plan without writing anything
        #[arg(long)]
        dry_run: bool,
    },
    /// Validate a draft and show its plan without writing anything
    Check(PublishArgs),
    /// Print a stock draftpress.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Command::Publish { args, dry_run } => run(&cli.site_root, &args, dry_run)?,
        Command::Check(args) => run(&cli.site_root, &args, true)?,
        Command::GenConfig => print!("{}", config::stock_config_toml()),
    }

    Ok(())
}

fn run(
    site_root: &Option<PathBuf>,
    args: &PublishArgs,
    dry_run: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let site_root = match site_root {
        Some(root) => root.clone(),
        None => config::find_site_root(&std::env::current_dir()?)?,
    };
    let site_config = config::load_config(&site_root)?;

    let backend = RustBackend::new();
    let outcome = publish(
        &backend,
        &args.draft,
        &site_root,
        &site_config,
        PublishOptions {
            dry_run,
            max_width: args.max_width,
        },
    )?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&outcome.plan)?);
    } else if outcome.executed {
        output::print_done(&outcome.plan, &site_root);
    } else {
        output::print_plan(&outcome.plan, &site_root, args.verbose);
    }

    Ok(())
}
