//! pagestruct CLI - structure PDF layout dumps into page records

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use pagestruct::model::Category;
use pagestruct::pipeline::{self, ClusterPolicy, DistributionPolicy, FontCorpus, FontFeatureExtractor};
use pagestruct::{
    render, DocumentInfo, FontAliasTable, InMemoryLayout, JsonFormat, LayoutSource, PolicyKind,
    StructureOptions,
};

#[derive(Parser)]
#[command(name = "pagestruct")]
#[command(version)]
#[command(about = "Structure PDF layout dumps into heading/content/table page records", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Structure a layout dump into page records
    Structure {
        /// Layout dump (JSON)
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "json")]
        format: OutputMode,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,

        /// Classification policy
        #[arg(long, value_enum, default_value = "distribution")]
        policy: PolicyArg,

        /// Font alias FROM=TO (repeatable)
        #[arg(long = "alias", value_name = "FROM=TO")]
        aliases: Vec<String>,

        /// Font alias rule PATTERN=REPLACEMENT (repeatable)
        #[arg(long = "alias-rule", value_name = "PATTERN=REPLACEMENT")]
        alias_rules: Vec<String>,

        /// Document identifier
        #[arg(long, env = "PAGESTRUCT_DOCUMENT_ID", default_value = "")]
        id: String,

        /// Document title
        #[arg(long, default_value = "")]
        title: String,

        /// Document URL
        #[arg(long, default_value = "")]
        url: String,

        /// Traceability source label
        #[arg(long, env = "PAGESTRUCT_SOURCE", default_value = "")]
        source: String,

        /// Traceability manual reference
        #[arg(long, default_value = "")]
        manual_reference: String,

        /// Disable parallel processing
        #[arg(long)]
        sequential: bool,
    },

    /// Show document font statistics and cluster assignment
    Fonts {
        /// Layout dump (JSON)
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Font alias FROM=TO (repeatable)
        #[arg(long = "alias", value_name = "FROM=TO")]
        aliases: Vec<String>,

        /// Print statistics as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show version information
    Version,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum OutputMode {
    /// JSON array of page records
    Json,
    /// Plain text dump in reading order
    Text,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum PolicyArg {
    /// k-means over font name and size
    Cluster,
    /// Median and IQR thresholds on font size
    Distribution,
}

impl From<PolicyArg> for PolicyKind {
    fn from(policy: PolicyArg) -> Self {
        match policy {
            PolicyArg::Cluster => PolicyKind::Cluster,
            PolicyArg::Distribution => PolicyKind::Distribution,
        }
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Structure {
            input,
            output,
            format,
            compact,
            policy,
            aliases,
            alias_rules,
            id,
            title,
            url,
            source,
            manual_reference,
            sequential,
        }) => build_aliases(&aliases, &alias_rules).and_then(|table| {
            let options = StructureOptions::new()
                .with_policy(policy.into())
                .with_aliases(table)
                .with_parallel(!sequential)
                .with_document(DocumentInfo::new(id, title, url))
                .with_source_label(source)
                .with_manual_reference(manual_reference);
            cmd_structure(&input, output.as_deref(), format, compact, &options)
        }),
        Some(Commands::Fonts {
            input,
            aliases,
            json,
        }) => build_aliases(&aliases, &[]).and_then(|table| cmd_fonts(&input, table, json)),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            println!("{}", "Usage: pagestruct structure <FILE>".yellow());
            println!("       pagestruct --help for more information");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

/// Split a `KEY=VALUE` argument.
fn split_pair(arg: &str) -> Result<(&str, &str), Box<dyn std::error::Error>> {
    arg.split_once('=')
        .filter(|(key, _)| !key.is_empty())
        .ok_or_else(|| format!("Expected KEY=VALUE, got {:?}", arg).into())
}

fn build_aliases(
    aliases: &[String],
    rules: &[String],
) -> Result<FontAliasTable, Box<dyn std::error::Error>> {
    let mut table = FontAliasTable::default();
    for alias in aliases {
        let (from, to) = split_pair(alias)?;
        table.insert(from, to);
    }
    for rule in rules {
        let (pattern, replacement) = split_pair(rule)?;
        table = table.with_rule(pattern, replacement)?;
    }
    Ok(table)
}

fn read_layout(input: &Path) -> Result<InMemoryLayout, Box<dyn std::error::Error>> {
    log::debug!("Reading layout dump {}", input.display());
    let json = fs::read_to_string(input)?;
    let source = InMemoryLayout::from_json(&json)?;
    log::info!("Loaded {} pages from {}", source.page_count(), input.display());
    Ok(source)
}

fn cmd_structure(
    input: &Path,
    output: Option<&Path>,
    format: OutputMode,
    compact: bool,
    options: &StructureOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let pb = ProgressBar::new(3);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {msg}")?
            .progress_chars("#>-"),
    );
    if output.is_none() {
        pb.set_draw_target(indicatif::ProgressDrawTarget::hidden());
    }

    pb.set_message("Reading layout...");
    let source = read_layout(input)?;
    pb.inc(1);

    pb.set_message("Structuring pages...");
    log::info!("Structuring with the {:?} policy", options.policy);
    let report = pagestruct::structure_report(&source, options)?;
    pb.inc(1);

    pb.set_message("Rendering...");
    let rendered = match format {
        OutputMode::Json => {
            let json_format = if compact {
                JsonFormat::Compact
            } else {
                JsonFormat::Pretty
            };
            render::to_json(&report.records, json_format)?
        }
        OutputMode::Text => render::to_text(&report.pages),
    };
    pb.inc(1);
    pb.finish_and_clear();

    if let Some(path) = output {
        fs::write(path, &rendered)?;
        log::info!("Wrote {} bytes to {}", rendered.len(), path.display());
        println!("{} {}", "Saved to".green(), path.display());
        println!(
            "  {} {} headings, {} subheadings, {} content lines",
            "├─".dimmed(),
            report.counts.heading,
            report.counts.subheading,
            report.counts.content
        );
        println!("  {} {} pages", "└─".dimmed(), report.records.len());
    } else {
        println!("{}", rendered);
    }

    if report.has_warnings() {
        log::debug!("{} warnings recorded", report.warnings.len());
        for warning in &report.warnings {
            eprintln!("{}: {}", "Warning".yellow().bold(), warning);
        }
    }

    Ok(())
}

fn cmd_fonts(
    input: &Path,
    aliases: FontAliasTable,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let source = read_layout(input)?;
    let pages = pipeline::load_pages(&source)?;
    let extractor = FontFeatureExtractor::new(aliases);
    let corpus = FontCorpus::from_pages(&pages, &extractor);

    let mut distribution = DistributionPolicy::new(1.0, 0.25);
    distribution.fit(corpus.details());
    let mut cluster = ClusterPolicy::new(300, true);
    cluster.fit(corpus.details());

    if json {
        let clusters: Vec<serde_json::Value> = cluster
            .model()
            .map(|model| {
                model
                    .centroids
                    .iter()
                    .zip(&model.categories)
                    .zip(&model.populations)
                    .map(|((centroid, category), population)| {
                        serde_json::json!({
                            "font": centroid[0],
                            "size": centroid[1],
                            "points": population,
                            "category": category.as_str(),
                        })
                    })
                    .collect()
            })
            .unwrap_or_default();
        let value = serde_json::json!({
            "pages": pages.len(),
            "font_details": corpus.len(),
            "sizes": distribution.stats(),
            "clusters": clusters,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    println!("{}", "Font Statistics".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    println!("{}: {}", "File".bold(), input.display());
    println!("{}: {}", "Pages".bold(), pages.len());
    println!("{}: {}", "Font details".bold(), corpus.len());

    if let Some(stats) = distribution.stats() {
        println!("{}: {:.2}", "Median size".bold(), stats.median);
        println!("{}: {:.2} ({:.2}..{:.2})", "IQR".bold(), stats.iqr, stats.q1, stats.q3);
        println!(
            "{}: > {:.2}",
            "Heading".bold(),
            stats.median + stats.iqr
        );
        println!(
            "{}: > {:.2}",
            "Subheading".bold(),
            stats.median + 0.25 * stats.iqr
        );
    }

    if let Some(model) = cluster.model() {
        println!();
        println!("{}", "Font Clusters".cyan().bold());
        println!("{}", "─".repeat(40).dimmed());
        for ((centroid, category), population) in model
            .centroids
            .iter()
            .zip(&model.categories)
            .zip(&model.populations)
        {
            let label = match category {
                Category::Heading => category.as_str().red(),
                Category::Subheading => category.as_str().yellow(),
                Category::Content => category.as_str().normal(),
            };
            println!(
                "  font {:>6.2}  size {:>6.2}  {:>6} points  {}",
                centroid[0], centroid[1], population, label
            );
        }
    }

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "pagestruct".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Reading-order structuring of PDF page layouts");
}
