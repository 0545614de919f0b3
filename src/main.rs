use clap::{Parser, Subcommand};
use media_links::config::{self, EngineConfig};
use media_links::links::LinkSet;
use media_links::template::{TemplateContext, has_unresolved_tokens, resolve};
use media_links::types::{ImageTag, ManualLink};
use media_links::validation::{GalleryValidator, HttpSource, PlaceholderRules, ValidationResult};
use media_links::{output, sequence};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Context fields shared by commands that resolve templates.
#[derive(clap::Args, Clone)]
struct ContextArgs {
    /// Record code, substituted for `*`
    #[arg(long)]
    code: Option<String>,
    /// Studio name, substituted (lowercased) for `@studio`
    #[arg(long)]
    studio: Option<String>,
    /// Performer field, source of `@firstname` / `@lastname`
    #[arg(long)]
    performer: Option<String>,
}

impl From<ContextArgs> for TemplateContext {
    fn from(args: ContextArgs) -> Self {
        TemplateContext {
            code: args.code,
            studio: args.studio,
            performer: args.performer,
        }
    }
}

#[derive(Parser)]
#[command(name = "media-links")]
#[command(about = "Expand media-link templates and check generated galleries")]
#[command(long_about = "\
Expand media-link templates and check generated galleries

Template tokens:
  *            record code (verbatim)
  @studio      studio name (lowercased)
  @firstname   first name of the first performer (lowercased)
  @lastname    last name of the first performer (lowercased)
  #, ##, ###   image index; one '#' is unpadded, more are zero-padded

Combined link field:
  https://cdn/@studio/*-##.jpg,https://other/a.jpg,https://other/b.jpg
  The entry with '#' is the template; the rest are manual links.
  URLs containing commas cannot be stored.

Run 'media-links gen-config' to print a documented media-links.toml.")]
#[command(version)]
struct Cli {
    /// Directory containing media-links.toml
    #[arg(long, default_value = ".", global = true)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Substitute context tokens into a template
    Resolve {
        template: String,
        #[command(flatten)]
        context: ContextArgs,
    },
    /// Generate the URL sequence for a template
    Expand {
        template: String,
        #[command(flatten)]
        context: ContextArgs,
        /// Maximum number of URLs to generate
        #[arg(long, default_value_t = 20)]
        max: usize,
    },
    /// Classify URLs as valid, placeholder or unknown
    Classify {
        /// URLs (or local paths) to check
        #[arg(required = true)]
        urls: Vec<String>,
        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },
    /// Split a combined link field into template and manual links
    Parse {
        serialized: String,
        /// JSON file holding the ImageTag list stored alongside the field
        #[arg(long)]
        tags: Option<PathBuf>,
        /// Print the parsed link set as JSON
        #[arg(long)]
        json: bool,
    },
    /// Join a template and manual URLs into a combined link field
    Build {
        /// Sequence template (may be empty)
        #[arg(long, default_value = "")]
        template: String,
        /// Manual link URLs, in order
        urls: Vec<String>,
    },
    /// Print a stock media-links.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("media_links=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Resolve { template, context } => {
            let ctx = TemplateContext::from(context);
            let resolved = resolve(&template, &ctx);
            println!("{}", resolved);
            if has_unresolved_tokens(&resolved) {
                eprintln!("warning: template still contains unresolved tokens");
            }
        }
        Command::Expand {
            template,
            context,
            max,
        } => {
            let engine = config::load_config(&cli.config)?;
            let rules = PlaceholderRules::new(&engine.validator.placeholder_patterns);
            if rules.template_is_entirely_placeholder(&template) {
                eprintln!("warning: template points at a placeholder, gallery suppressed");
                return Ok(());
            }
            let ctx = TemplateContext::from(context);
            let urls = sequence::expand(&template, &ctx, max);
            output::print_expansion(&urls);
            if urls.first().is_some_and(|u| has_unresolved_tokens(u)) {
                eprintln!("warning: preview unavailable, context is missing fields");
            }
        }
        Command::Classify { urls, json } => {
            let engine = config::load_config(&cli.config)?;
            let results = classify(&engine, &urls)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&results)?);
            } else {
                output::print_classification(&urls, &results);
            }
        }
        Command::Parse {
            serialized,
            tags,
            json,
        } => {
            let engine = config::load_config(&cli.config)?;
            let tags: Vec<ImageTag> = match tags {
                Some(path) => serde_json::from_str(&std::fs::read_to_string(path)?)?,
                None => Vec::new(),
            };
            let set = LinkSet::parse(&serialized, &tags);
            if json {
                println!("{}", serde_json::to_string_pretty(&set)?);
            } else {
                output::print_link_set(&set, engine.links.reserved_template_slots);
            }
        }
        Command::Build { template, urls } => {
            let links: Vec<ManualLink> = urls.into_iter().map(ManualLink::new).collect();
            println!("{}", LinkSet::new(template, links).build());
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

fn classify(
    engine: &EngineConfig,
    urls: &[String],
) -> Result<Vec<ValidationResult>, Box<dyn std::error::Error>> {
    let source = HttpSource::new(&engine.http, engine.validator.reencode_quality);
    let validator = GalleryValidator::from_config(source, &engine.validator);
    Ok(validator.classify_all_blocking(urls)?)
}
