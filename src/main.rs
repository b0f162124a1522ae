use clap::{Parser, Subcommand};
use folio::{config, generate, metadata, output, resolve, scan, slug};
use std::path::{Path, PathBuf};

/// Shared flags for commands that render pages.
#[derive(clap::Args, Clone)]
struct DraftArgs {
    /// Render draft projects too (disables production filtering)
    #[arg(long)]
    drafts: bool,
}

#[derive(Parser)]
#[command(name = "folio")]
#[command(about = "Static site generator for project portfolios")]
#[command(long_about = "\
Static site generator for project portfolios

Each project is a markdown file with TOML front matter. Projects are listed
newest first, and every page links to its older and newer neighbor.

Content structure:

  content/
  ├── config.toml                  # Site config (optional)
  ├── static/                      # Copied to dist/static/
  └── projects/
      ├── 010-folio.md             # Slug \"folio\" (number prefix stripped)
      └── web/
          └── tiny-http.md         # Slug \"web/tiny-http\"

Front matter:

  +++
  title = \"Folio\"
  date = 2023-03-01
  summary = \"A static site generator\"
  images = [\"/static/images/folio.png\"]
  layout = \"ProjectSimple\"        # or ProjectBanner (default)
  draft = false
  tags = [\"rust\"]
  +++

Run 'folio gen-config' to generate a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Content directory
    #[arg(long, default_value = "content", global = true)]
    source: PathBuf,

    /// Output directory
    #[arg(long, default_value = "dist", global = true)]
    output: PathBuf,

    /// Directory for intermediate files (manifest)
    #[arg(long, default_value = ".folio-temp", global = true)]
    temp_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Scan content directory into a manifest
    Scan,
    /// Produce the HTML site from the scan manifest
    Generate(DraftArgs),
    /// Run the full pipeline: scan → generate
    Build(DraftArgs),
    /// Validate content directory without building
    Check,
    /// Print the route segments of every project page
    Paths,
    /// Print the page metadata of one or more projects as JSON
    Meta {
        /// Project slugs, e.g. `folio` or `web/tiny-http`; percent-escapes are decoded
        /// the same way page routes are
        #[arg(required = true)]
        slugs: Vec<String>,
    },
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Command::Scan => {
            let manifest = scan::scan(&cli.source)?;
            write_manifest(&manifest, &cli.temp_dir)?;
            output::print_scan_output(&manifest);
        }
        Command::Generate(draft_args) => {
            let manifest_path = cli.temp_dir.join("manifest.json");
            let manifest_content = std::fs::read_to_string(&manifest_path)?;
            let input_manifest: serde_json::Value = serde_json::from_str(&manifest_content)?;
            let site_config: config::SiteConfig =
                serde_json::from_value(input_manifest.get("config").cloned().unwrap_or_default())?;
            init_thread_pool(&site_config.render);
            let report = generate::generate(
                &manifest_path,
                &cli.source,
                &cli.output,
                !draft_args.drafts,
            )?;
            output::print_generate_output(&report);
        }
        Command::Build(draft_args) => {
            println!("==> Stage 1: Scanning {}", cli.source.display());
            let manifest = scan::scan(&cli.source)?;
            write_manifest(&manifest, &cli.temp_dir)?;
            output::print_scan_output(&manifest);

            println!("==> Stage 2: Generating HTML → {}", cli.output.display());
            init_thread_pool(&manifest.config.render);
            let report = generate::generate_site(
                &manifest,
                &cli.source,
                &cli.output,
                !draft_args.drafts,
            )?;
            output::print_generate_output(&report);

            println!("==> Build complete: {}", cli.output.display());
        }
        Command::Check => {
            println!("==> Checking {}", cli.source.display());
            let manifest = scan::scan(&cli.source)?;
            output::print_scan_output(&manifest);
            println!("==> Content is valid");
        }
        Command::Paths => {
            let manifest = scan::scan(&cli.source)?;
            for line in output::format_paths(&resolve::static_paths(&manifest.projects)) {
                println!("{}", line);
            }
        }
        Command::Meta { slugs } => {
            let manifest = scan::scan(&cli.source)?;
            for route in &slugs {
                let slug = slug::decode_slug(&[route]);
                let meta =
                    metadata::page_metadata(&manifest.projects, &slug, &manifest.config.site)
                        .ok_or_else(|| format!("no project with slug '{slug}'"))?;
                println!("{}", serde_json::to_string_pretty(&meta)?);
            }
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

fn write_manifest(manifest: &scan::Manifest, temp_dir: &Path) -> std::io::Result<()> {
    std::fs::create_dir_all(temp_dir)?;
    let json = serde_json::to_string_pretty(manifest)?;
    std::fs::write(temp_dir.join("manifest.json"), json)
}

/// Initialize the rayon thread pool from the `[render]` config.
///
/// Caps at the number of available CPU cores: config can constrain down, not up.
fn init_thread_pool(render: &config::RenderConfig) {
    let threads = config::effective_threads(render);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
