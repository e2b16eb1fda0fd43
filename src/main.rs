//! bamgen CLI entrypoint
//! Parses command-line arguments and dispatches to the export and generate use cases.
#![deny(unsafe_code)]

// Internal imports (std, crate)
use bamgen::application::{
    DefinitionInput, ExportRequest, GenerateRequest, export_definition, export_template,
    generate_api,
};
use bamgen::core::Config;
use bamgen::extraction::{DriverKind, ExtractionMode, ExtractionOptions, Locale};
use bamgen::generation::parameters::TOOL_VERSION_VALUE;
use std::path::PathBuf;

// External imports (alphabetized)
use anyhow::Context;
use clap::Parser;
use tracing::{Level, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "bamgen")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Configuration file (default: $BAMGEN_CONFIG, then <config dir>/bamgen/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Increase log verbosity (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Export the BAM definition XML from an Excel BAM definition workbook
    Export {
        /// Excel workbook (.xls, .xlsx, .xlsb)
        excel_file: PathBuf,
        /// Output XML file, written as UTF-16
        xml_file: PathBuf,
        /// Walk the cells through a spreadsheet application instead of a tabular query
        #[arg(long)]
        legacy: bool,
        /// Spreadsheet application used by --legacy
        #[arg(long, value_enum)]
        driver: Option<DriverArg>,
        /// Locale the spreadsheet application runs under in --legacy mode
        #[arg(long)]
        locale: Option<String>,
    },
    /// Generate a typed C# BAM API from an Excel BAM definition workbook
    Generate {
        /// Excel workbook, or exported definition XML with --from-xml
        source: PathBuf,
        /// Output source file
        code_file: PathBuf,
        /// Event stream: Direct, Buffered or Orchestration
        event_stream: String,
        /// Namespace for the generated code
        namespace: String,
        /// Custom template used instead of the built-in one
        template: Option<PathBuf>,
        /// Treat SOURCE as an exported definition XML file
        #[arg(long)]
        from_xml: bool,
    },
    /// Work with the built-in template
    Template {
        #[command(subcommand)]
        action: TemplateCommands,
    },
}

#[derive(clap::Subcommand, Debug)]
enum TemplateCommands {
    /// Write the built-in template to a file as a starting point for a custom one
    Export {
        /// Destination file
        path: PathBuf,
    },
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum DriverArg {
    /// Read the workbook in-process
    Embedded,
    /// Convert through a headless office suite (soffice)
    Headless,
}

impl From<DriverArg> for DriverKind {
    fn from(arg: DriverArg) -> Self {
        match arg {
            DriverArg::Embedded => DriverKind::Embedded,
            DriverArg::Headless => DriverKind::Headless,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        _ => Level::DEBUG,
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(level.into())
                .from_env_lossy(),
        )
        .init();

    let config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;
    info!(version = TOOL_VERSION_VALUE, "Starting bamgen");

    match cli.command {
        Commands::Export {
            excel_file,
            xml_file,
            legacy,
            driver,
            locale,
        } => run_export(config, excel_file, xml_file, legacy, driver, locale),
        Commands::Generate {
            source,
            code_file,
            event_stream,
            namespace,
            template,
            from_xml,
        } => run_generate(
            config,
            source,
            code_file,
            event_stream,
            namespace,
            template,
            from_xml,
        ),
        Commands::Template {
            action: TemplateCommands::Export { path },
        } => {
            export_template(&path).context("Failed to export the built-in template")?;
            println!("✅ Wrote built-in template to '{}'", path.display());
            Ok(())
        }
    }
}

fn extraction_options(
    config: &Config,
    driver: Option<DriverArg>,
    locale: Option<String>,
) -> ExtractionOptions {
    let mut options = config.extraction.clone();
    if let Some(driver) = driver {
        options.driver = driver.into();
    }
    if let Some(locale) = locale {
        options.locale = Locale::new(locale);
    }
    options
}

fn run_export(
    config: Config,
    excel_file: PathBuf,
    xml_file: PathBuf,
    legacy: bool,
    driver: Option<DriverArg>,
    locale: Option<String>,
) -> anyhow::Result<()> {
    println!("BAM Definition XML Exporter {TOOL_VERSION_VALUE}");
    println!();
    if legacy {
        println!("Exporting in legacy mode.");
    }

    let request = ExportRequest {
        workbook: excel_file,
        output: xml_file,
        mode: if legacy {
            ExtractionMode::Legacy
        } else {
            ExtractionMode::Direct
        },
        options: extraction_options(&config, driver, locale),
    };

    let response = export_definition(&request)
        .context("Failed to export BAM XML definition from the Excel workbook")?;

    println!(
        "✅ Wrote BAM XML to '{}' ({} characters)",
        response.output.display(),
        response.characters
    );
    Ok(())
}

fn run_generate(
    config: Config,
    source: PathBuf,
    code_file: PathBuf,
    event_stream: String,
    namespace: String,
    template: Option<PathBuf>,
    from_xml: bool,
) -> anyhow::Result<()> {
    println!("BAM API Generator {TOOL_VERSION_VALUE}");
    println!();

    let template = template.or_else(|| config.generation.template.clone());
    if let Some(path) = &template {
        println!("Using custom template {}", path.display());
    }

    let request = GenerateRequest {
        input: if from_xml {
            DefinitionInput::Xml(source)
        } else {
            DefinitionInput::Workbook(source)
        },
        output: code_file,
        mode: event_stream,
        namespace,
        template,
        options: extraction_options(&config, None, None),
    };

    let response = generate_api(&request).context("Failed to generate typed BAM API")?;

    println!(
        "✅ Wrote typed BAM API to '{}'",
        response.output.display()
    );
    Ok(())
}
