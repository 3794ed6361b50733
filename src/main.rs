use clap::{ArgAction, Parser, Subcommand};
use log::LevelFilter;
use serde_json::json;
use std::path::PathBuf;
use std::process::ExitCode;
use vsmedit::codec::FieldKind;
use vsmedit::editor::{EditOptions, FieldReading, PluginEditor};
use vsmedit::registry::FieldRegistry;
use vsmedit::{Error, WriteOutcome, MAGIC};

const EXIT_OK:            u8 = 0;
const EXIT_INVALID:       u8 = 1;
const EXIT_IO:            u8 = 2;
const EXIT_NOT_FOUND:     u8 = 3;
const EXIT_AMBIGUOUS:     u8 = 4;
const EXIT_READ_ONLY:     u8 = 5;
const EXIT_TRUNCATED:     u8 = 6;
const EXIT_INVALID_VALUE: u8 = 7;
const EXIT_BAD_ARGS:      u8 = 102;

#[derive(Parser)]
#[command(
    name = "vsmedit",
    version,
    about = "Change attributes of Vectorworks script plug-ins (.vsm, .vst, .vso)",
    after_help = "Example: vsmedit get MyToolCW.vsm UniversalName"
)]
struct Cli {
    /// Text encoding of string attributes (WHATWG label, e.g. utf-8, windows-1252, macintosh)
    #[arg(short, long, global = true, default_value = "utf-8")]
    encoding: String,
    /// Print machine-readable JSON instead of text
    #[arg(long, global = true)]
    json: bool,
    /// Increase log verbosity (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the value of an attribute
    #[command(alias = "read")]
    Get {
        file:      PathBuf,
        /// Attribute name or a unique part of it
        attribute: String,
    },
    /// Change the value of an attribute
    #[command(alias = "write")]
    Set {
        file:      PathBuf,
        attribute: String,
        value:     String,
    },
    /// List the supported attributes
    #[command(alias = "attributes")]
    List,
    /// Show the header of a plug-in file
    Info {
        file: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let Some(options) = EditOptions::with_encoding_label(&cli.encoding) else {
        eprintln!("Unknown encoding '{}'. Try '--help' for more information.", cli.encoding);
        return ExitCode::from(EXIT_BAD_ARGS);
    };

    match run(cli.command, options, cli.json) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            report(&e);
            ExitCode::from(exit_code(&e))
        }
    }
}

fn run(command: Commands, options: EditOptions, json: bool) -> Result<u8, Error> {
    match command {

        // ── Get ──────────────────────────────────────────────────────────────
        Commands::Get { file, attribute } => {
            let editor = PluginEditor::open(&file, options)?;
            let reading = editor.get(&attribute)?;
            if json {
                println!("{}", json!(reading));
            } else {
                println!("{reading}");
            }
            Ok(EXIT_OK)
        }

        // ── Set ──────────────────────────────────────────────────────────────
        Commands::Set { file, attribute, value } => {
            let editor = PluginEditor::open(&file, options)?;
            let outcome = editor.set(&attribute, &value)?;
            let reading = editor.get(outcome.field)?;
            println!("{}", set_output(&outcome, &reading, json));
            Ok(if outcome.truncated { EXIT_TRUNCATED } else { EXIT_OK })
        }

        // ── List ─────────────────────────────────────────────────────────────
        Commands::List => {
            let registry = FieldRegistry::builtin();
            if json {
                println!("{}", json!(registry.summaries()));
                return Ok(EXIT_OK);
            }
            let fields = registry.list();
            let width = fields.iter().map(|f| f.name().len()).max().unwrap_or(0);
            println!("Supported attributes: ({})", fields.len());
            for f in fields {
                let mut notes = Vec::new();
                if let FieldKind::Text { max_chars } = f.kind() {
                    notes.push(format!("Text: max {max_chars} characters"));
                }
                if f.is_read_only() {
                    notes.push("Read Only".to_owned());
                }
                println!("   {:<width$}   ({})", f.name(), notes.join("; "));
            }
            Ok(EXIT_OK)
        }

        // ── Info ─────────────────────────────────────────────────────────────
        Commands::Info { file } => {
            let editor  = PluginEditor::open(&file, options)?;
            let version = editor.version();
            let fields  = editor.read_all()?;

            if json {
                println!("{}", json!({
                    "path":           file.display().to_string(),
                    "extension_kind": editor.extension_kind(),
                    "version":        version,
                    "encoding":       options.encoding.name(),
                    "fields":         fields,
                }));
                return Ok(EXIT_OK);
            }

            println!("── Plug-in ──────────────────────────────────────────────");
            println!("  Path           {}", file.display());
            println!("  Signature      {} ({})", String::from_utf8_lossy(MAGIC), hex::encode(MAGIC));
            println!("  Extension      {:?}", editor.extension_kind());
            println!("  Format version {version}");
            println!("  Compatibility  {:?}", version.compatibility);
            println!("  Encoding       {}", options.encoding.name());
            println!("  Attributes:");
            for (desc, reading) in editor.registry().list().iter().zip(&fields) {
                println!("    {:<14} @{:<4} {}", reading.name, desc.offset(), reading.value);
                log::debug!("{} raw bytes: {}", reading.name, hex::encode(&reading.raw));
            }
            Ok(EXIT_OK)
        }
    }
}

// ── helpers ──────────────────────────────────────────────────────────────────

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .init();
}

/// Truncation is reported by the editor's log line and the exit code, not
/// repeated here.
fn set_output(outcome: &WriteOutcome, reading: &FieldReading, json: bool) -> String {
    if json {
        json!({ "write": outcome, "value": reading }).to_string()
    } else {
        reading.to_string()
    }
}

fn report(err: &Error) {
    match err {
        Error::FieldAmbiguous { query, candidates } => {
            eprintln!("Too many possibilities for '{query}':");
            for c in candidates {
                eprintln!("   {c}");
            }
        }
        Error::UnsupportedVersion(_) => {
            eprintln!("Error: {err}");
            eprintln!("Only plug-ins with format version {} or later are supported.", vsmedit::version::MIN);
        }
        _ => eprintln!("Error: {err}"),
    }
}

fn exit_code(err: &Error) -> u8 {
    match err {
        Error::InvalidFile(_) | Error::UnsupportedVersion(_) => EXIT_INVALID,
        Error::Io(_)                  => EXIT_IO,
        Error::FieldNotFound(_)       => EXIT_NOT_FOUND,
        Error::FieldAmbiguous { .. }  => EXIT_AMBIGUOUS,
        Error::ReadOnlyField(_)       => EXIT_READ_ONLY,
        Error::InvalidValue { .. }    => EXIT_INVALID_VALUE,
    }
}
