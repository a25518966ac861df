use clap::{Parser, Subcommand};
use get_llms_txt::{config, output, pipeline};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "get-llms-txt")]
#[command(about = "Generate llms.txt and plain Markdown copies of an MDX/Markdown site")]
#[command(long_about = "\
Generate llms.txt and plain Markdown copies of an MDX/Markdown site

Every .md and .mdx file under the content directory is stripped of imports,
exports and JSX components and written to <output>/md/ with a .md
extension. An llms.txt index groups all files by category with links
and descriptions.

Content structure:

  content/
  ├── about.md                     # Root file → default category (\"general\")
  ├── blog/                        # Top-level directory → category \"blog\"
  │   ├── hello-world.mdx          # export const metadata = { title, description, ... }
  │   └── 2024/recap.md            # --- YAML frontmatter --- also works
  └── apps/
      └── timer.mdx

Metadata resolution (first available wins):
  Title:       metadata title → first # heading → file name (my-post.mdx → \"My Post\")
  Description: metadata description → first paragraph over 50 characters
  Category:    metadata category → top-level directory → default category

Settings are read from llms.toml when present; flags override it.
Run 'get-llms-txt gen-config' to generate a documented llms.toml.")]
#[command(version)]
struct Cli {
    /// Content directory
    #[arg(short, long, global = true)]
    content_dir: Option<PathBuf>,

    /// Output directory [default: out if it exists, else public]
    #[arg(short, long, global = true)]
    output_dir: Option<PathBuf>,

    /// Base URL prefixed to every link in llms.txt
    #[arg(short = 'u', long, global = true)]
    base_url: Option<String>,

    /// Project name used as the llms.txt title
    #[arg(short = 'n', long, global = true)]
    project_name: Option<String>,

    /// Project description shown under the title
    #[arg(short = 'd', long, global = true)]
    project_description: Option<String>,

    /// Config file
    #[arg(long, default_value = config::CONFIG_FILE_NAME, global = true)]
    config: PathBuf,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the full pipeline: scan → process → write (default)
    Build,
    /// Scan and process content without writing anything
    Check {
        /// Print processed records as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print a stock llms.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command.as_ref().unwrap_or(&Command::Build) {
        Command::Build => {
            let config = load_config(&cli)?;
            init_thread_pool(&config.processing);
            let cwd = std::env::current_dir()?;

            let (tx, rx) = std::sync::mpsc::channel();
            let printer = std::thread::spawn(move || {
                for event in rx {
                    output::print_build_event(&event);
                }
            });
            let result = pipeline::build(&config, &cwd, Some(tx));
            printer.join().ok();
            let report = result?;

            output::print_generate_output(&report.files, &report.generated, &report.output_dir);
            println!("{}", output::format_build_summary(&report.generated));
        }
        Command::Check { json } => {
            let config = load_config(&cli)?;
            init_thread_pool(&config.processing);
            let cwd = std::env::current_dir()?;
            let files = pipeline::check(&config, &cwd, None)?;
            if *json {
                println!("{}", serde_json::to_string_pretty(&files)?);
            } else {
                println!("==> Checking {}", config.content_dir.display());
                output::print_check_output(&files, &config.categories);
                println!("==> Content is valid");
            }
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Layer the command-line flags over `llms.toml` and the stock defaults.
fn load_config(cli: &Cli) -> Result<config::Config, config::ConfigError> {
    let overrides = config::Overrides {
        content_dir: cli.content_dir.clone(),
        output_dir: cli.output_dir.clone(),
        base_url: cli.base_url.clone(),
        project_name: cli.project_name.clone(),
        project_description: cli.project_description.clone(),
    };
    config::load_config(&cli.config, overrides)
}

/// Install a stderr subscriber.
///
/// `RUST_LOG` wins when set; otherwise `-v` flags pick the crate's level.
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("get_llms_txt={level}")));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Initialize the rayon thread pool based on processing config.
///
/// Caps at the number of available CPU cores; user can constrain down, not up.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
