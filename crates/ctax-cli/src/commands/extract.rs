//! Extract command - find a tax in a single OCR document.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use tracing::{debug, info};

use ctax_core::{CtaxConfig, MatchPolicy, OcrDocument, TaxExtractor, TaxRecord};

/// Arguments for the extract command.
#[derive(Args)]
pub struct ExtractArgs {
    /// OCR document (JSON)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    #[command(flatten)]
    options: ExtractionOptions,
}

/// Extraction settings that override the configuration file.
#[derive(Args, Clone)]
pub struct ExtractionOptions {
    /// Tax name to look for (repeatable)
    #[arg(short = 'n', long = "name")]
    names: Vec<String>,

    /// Lowest plausible rate, in percent
    #[arg(long)]
    min_rate: Option<f64>,

    /// Highest plausible rate, in percent
    #[arg(long)]
    max_rate: Option<f64>,

    /// Which name wins when several match on one line
    #[arg(long, value_enum)]
    policy: Option<PolicyArg>,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum PolicyArg {
    /// The leftmost match
    Earliest,
    /// The rightmost match
    Latest,
}

impl From<PolicyArg> for MatchPolicy {
    fn from(policy: PolicyArg) -> Self {
        match policy {
            PolicyArg::Earliest => MatchPolicy::Earliest,
            PolicyArg::Latest => MatchPolicy::Latest,
        }
    }
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Text => "txt",
        }
    }
}

impl ExtractionOptions {
    /// Merge the command line over `config` into an extractor and the names
    /// to search for.
    pub fn resolve(&self, config: &CtaxConfig) -> anyhow::Result<(TaxExtractor, Vec<String>)> {
        let mut extraction = config.extraction.clone();

        if !self.names.is_empty() {
            extraction.tax_names = self.names.clone();
        }
        if let Some(min) = self.min_rate {
            extraction.min_rate_percentage = min;
        }
        if let Some(max) = self.max_rate {
            extraction.max_rate_percentage = max;
        }
        if let Some(policy) = self.policy {
            extraction.match_policy = policy.into();
        }

        extraction.validate()?;

        if extraction.tax_names.iter().all(|n| n.trim().is_empty()) {
            anyhow::bail!(
                "No tax names given. Pass --name or set extraction.tax_names in the config file."
            );
        }

        Ok((TaxExtractor::from_config(&extraction), extraction.tax_names))
    }
}

pub async fn run(args: ExtractArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let config = super::load_config(config_path)?;
    let (extractor, names) = args.options.resolve(&config)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    info!("Processing file: {}", args.input.display());

    let document = OcrDocument::from_file(&args.input)?;
    let record = extractor.extract(&document, &names);

    if record.is_none() {
        eprintln!(
            "{} No tax matching {} found in {}",
            style("ℹ").blue(),
            names.join(", "),
            args.input.display()
        );
    }

    let output = format_record(record.as_ref(), args.format, config.output.pretty)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

pub fn format_record(
    record: Option<&TaxRecord>,
    format: OutputFormat,
    pretty: bool,
) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json if pretty => Ok(serde_json::to_string_pretty(&record)?),
        OutputFormat::Json => Ok(serde_json::to_string(&record)?),
        OutputFormat::Csv => format_csv(record),
        OutputFormat::Text => Ok(format_text(record)),
    }
}

fn optional<T: ToString>(field: Option<T>) -> String {
    field.map(|v| v.to_string()).unwrap_or_default()
}

fn format_csv(record: Option<&TaxRecord>) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record(["code", "page_id", "rate", "base", "value"])?;

    if let Some(record) = record {
        wtr.write_record([
            record.code.clone().unwrap_or_default(),
            optional(record.page_id),
            optional(record.rate),
            optional(record.base),
            optional(record.value),
        ])?;
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(record: Option<&TaxRecord>) -> String {
    let Some(record) = record else {
        return "No tax found".to_string();
    };

    let mut output = String::new();

    output.push_str(&format!(
        "Tax:   {}\n",
        record.code.as_deref().unwrap_or("-")
    ));
    if let Some(page_id) = record.page_id {
        output.push_str(&format!("Page:  {}\n", page_id + 1));
    }
    if let Some(rate) = record.rate {
        output.push_str(&format!("Rate:  {}%\n", rate));
    }
    if let Some(base) = record.base {
        output.push_str(&format!("Base:  {}\n", base));
    }
    if let Some(value) = record.value {
        output.push_str(&format!("Value: {}\n", value));
    }

    output
}
