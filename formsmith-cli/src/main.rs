use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use clap::{ArgAction, Args, Parser, Subcommand};
use color_eyre::eyre::{Report, Result, WrapErr, eyre};
use serde_json::json;
use tracing::{debug, info};
use tracing_subscriber::prelude::*;

use formsmith::domain::{FormTheme, RuleKind, RuleValue};
use formsmith::io::{
    DocumentFormat, OutputDestination, OutputOptions, document_schema, emit, parse_form_document,
    parse_form_values,
};
use formsmith::prelude::*;

#[derive(Debug, Parser)]
#[command(
    name = "formsmith",
    version,
    about = "Author form documents and check submissions against them"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create an empty form document
    New(NewArgs),
    /// Append a field to an existing form document
    Add(AddArgs),
    /// Validate submitted values against a form document
    Validate(ValidateArgs),
    /// Print the JSON Schema of the form document format
    Schema(OutputArgs),
    /// List the built-in themes
    Themes,
}

#[derive(Debug, Args)]
struct OutputArgs {
    /// Output destinations ("-" writes to stdout). Accepts multiple values per flag use.
    #[arg(short = 'o', long = "output", value_name = "DEST", num_args = 1.., action = ArgAction::Append)]
    outputs: Vec<String>,

    /// Emit compact JSON/TOML rather than pretty formatting
    #[arg(long = "no-pretty")]
    no_pretty: bool,
}

#[derive(Debug, Args)]
struct NewArgs {
    /// Form title
    #[arg(long = "title", value_name = "TEXT")]
    title: Option<String>,

    /// Form description
    #[arg(long = "description", value_name = "TEXT")]
    description: Option<String>,

    /// Built-in theme id
    #[arg(long = "theme", value_name = "ID")]
    theme: Option<String>,

    #[command(flatten)]
    output: OutputArgs,
}

#[derive(Debug, Args)]
struct AddArgs {
    /// Form document: file path or "-" for stdin
    #[arg(value_name = "FORM")]
    form: String,

    /// Field type (text, email, number, phone, textarea, select, radio, checkbox, date, file, url)
    #[arg(short = 't', long = "type", value_name = "TYPE")]
    kind: FieldType,

    #[arg(long = "label", value_name = "TEXT")]
    label: Option<String>,

    #[arg(long = "placeholder", value_name = "TEXT")]
    placeholder: Option<String>,

    #[arg(long = "required")]
    required: bool,

    /// Choice for select, radio and checkbox fields. Replaces the defaults.
    #[arg(long = "option", value_name = "TEXT", action = ArgAction::Append)]
    options: Vec<String>,

    /// Validation rule as KIND or KIND=VALUE, e.g. minLength=3 or pattern=^\d+$
    #[arg(long = "rule", value_name = "RULE", action = ArgAction::Append)]
    rules: Vec<String>,

    #[command(flatten)]
    output: OutputArgs,
}

#[derive(Debug, Args)]
struct ValidateArgs {
    /// Form document: file path or "-" for stdin
    #[arg(value_name = "FORM")]
    form: String,

    /// Submitted values keyed by field id: file path or "-" for stdin
    #[arg(long = "values", value_name = "VALUES")]
    values: String,
}

#[derive(Debug)]
enum InputSource {
    File(PathBuf),
    Stdin,
}

impl InputSource {
    fn parse(raw: &str) -> Self {
        if raw == "-" {
            InputSource::Stdin
        } else {
            InputSource::File(PathBuf::from(raw))
        }
    }

    fn format(&self) -> Result<DocumentFormat> {
        match self {
            InputSource::Stdin => Ok(DocumentFormat::Json),
            InputSource::File(path) => DocumentFormat::from_path(path).map_err(library_error),
        }
    }

    fn read(&self) -> Result<String> {
        match self {
            InputSource::Stdin => {
                let mut buffer = String::new();
                io::stdin()
                    .read_to_string(&mut buffer)
                    .wrap_err("failed to read from stdin")?;
                Ok(buffer)
            }
            InputSource::File(path) => fs::read_to_string(path)
                .wrap_err_with(|| format!("failed to read file {}", path.display())),
        }
    }
}

fn main() -> Result<()> {
    color_eyre::install()?;
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Command::New(args) => run_new(args),
        Command::Add(args) => run_add(args),
        Command::Validate(args) => run_validate(args),
        Command::Schema(args) => {
            let options = output_options(&args, None)?;
            emit(&document_schema(), &options).map_err(library_error)
        }
        Command::Themes => {
            for theme in FormTheme::catalogue() {
                println!("{}\t{}", theme.id, theme.name);
            }
            Ok(())
        }
    }
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

fn run_new(args: NewArgs) -> Result<()> {
    let mut document = FormDocument::new();
    if let Some(title) = args.title {
        document = document.with_title(title);
    }
    if let Some(description) = args.description {
        document = document.with_description(description);
    }
    if let Some(id) = args.theme.as_deref() {
        document.theme = FormTheme::builtin(id).ok_or_else(|| {
            eyre!("unknown theme '{id}'; run `formsmith themes` to list the built-in themes")
        })?;
    }
    info!(document = %document.id, "created form document");
    let options = output_options(&args.output, None)?;
    emit(&document, &options).map_err(library_error)
}

fn run_add(args: AddArgs) -> Result<()> {
    let source = InputSource::parse(&args.form);
    let document = load_document(&source)?;
    let fallback = match &source {
        InputSource::File(path) => Some(path.as_path()),
        InputSource::Stdin => None,
    };
    let options = output_options(&args.output, fallback)?;
    let rules = args
        .rules
        .iter()
        .map(|raw| parse_rule(raw))
        .collect::<Result<Vec<_>>>()?;

    let sink = move |document: &FormDocument| emit(document, &options);
    let builder_options = BuilderOptions::default().with_autosave(false);
    let mut builder = FormBuilder::with_document(document, builder_options, sink)?;

    let id = builder
        .add_field(args.kind)
        .ok_or_else(|| eyre!("could not add a {} field", args.kind))?;
    let mut patch = FieldPatch::default().with_required(args.required);
    if let Some(label) = args.label {
        patch = patch.with_label(label);
    }
    if let Some(placeholder) = args.placeholder {
        patch = patch.with_placeholder(placeholder);
    }
    if !args.options.is_empty() {
        patch = patch.with_options(args.options);
    }
    builder.update_field(&id, patch)?;
    for rule in rules {
        builder.add_field_rule(&id, rule)?;
    }
    debug!(field = %id, status = builder.status().message(), "field added");

    builder.save().map_err(library_error)?;
    eprintln!("added field {id}");
    Ok(())
}

fn run_validate(args: ValidateArgs) -> Result<()> {
    let form_source = InputSource::parse(&args.form);
    let values_source = InputSource::parse(&args.values);
    if matches!(
        (&form_source, &values_source),
        (InputSource::Stdin, InputSource::Stdin)
    ) {
        return Err(eyre!(
            "cannot read the form and its values from stdin simultaneously"
        ));
    }

    let document = load_document(&form_source)?;
    let contents = values_source.read()?;
    let values =
        parse_form_values(&contents, values_source.format()?).map_err(library_error)?;

    let mut preview = FormPreview::new(&document);
    for (id, value) in values {
        preview.set_value(&id, value);
    }
    let progress = preview.progress();
    let outcome = preview.submit();
    let errors = match &outcome {
        SubmitOutcome::Blocked(errors) => errors.clone(),
        _ => Vec::new(),
    };
    let report = json!({
        "valid": errors.is_empty(),
        "completed": progress.completed,
        "total": progress.total,
        "errors": errors,
    });
    emit(&report, &OutputOptions::default()).map_err(library_error)?;

    match outcome {
        SubmitOutcome::Blocked(errors) => Err(eyre!(
            "{} field(s) failed validation",
            errors.len()
        )),
        SubmitOutcome::Submitted(_) | SubmitOutcome::Closed => Ok(()),
    }
}

fn load_document(source: &InputSource) -> Result<FormDocument> {
    let contents = source.read()?;
    parse_form_document(&contents, source.format()?)
        .map_err(library_error)
        .wrap_err_with(|| match source {
            InputSource::Stdin => "failed to load form from stdin".to_string(),
            InputSource::File(path) => format!("failed to load form from {}", path.display()),
        })
}

fn parse_rule(raw: &str) -> Result<ValidationRule> {
    let (kind, value) = match raw.split_once('=') {
        Some((kind, value)) => (kind, Some(value)),
        None => (raw, None),
    };
    let kind: RuleKind = kind.parse()?;
    let value = match (kind, value) {
        (_, None) => None,
        (RuleKind::Pattern, Some(pattern)) => Some(RuleValue::Text(pattern.to_string())),
        (_, Some(bound)) => {
            let number = bound
                .trim()
                .parse::<f64>()
                .wrap_err_with(|| format!("rule '{raw}' needs a numeric value"))?;
            Some(RuleValue::Number(number))
        }
    };
    Ok(ValidationRule {
        kind,
        value,
        message: None,
    })
}

fn output_options(args: &OutputArgs, fallback: Option<&Path>) -> Result<OutputOptions> {
    let mut destinations = args
        .outputs
        .iter()
        .map(|dest| {
            if dest == "-" {
                OutputDestination::Stdout
            } else {
                OutputDestination::file(dest)
            }
        })
        .collect::<Vec<_>>();
    if destinations.is_empty() {
        destinations.push(match fallback {
            Some(path) => OutputDestination::file(path),
            None => OutputDestination::Stdout,
        });
    }
    let format = destinations
        .iter()
        .find_map(|dest| match dest {
            OutputDestination::File(path) => Some(DocumentFormat::from_path(path)),
            OutputDestination::Stdout => None,
        })
        .transpose()
        .map_err(library_error)?
        .unwrap_or(DocumentFormat::Json);
    Ok(OutputOptions::new(format)
        .with_pretty(!args.no_pretty)
        .with_destinations(destinations))
}

fn library_error(err: anyhow::Error) -> Report {
    eyre!("{err:#}")
}
