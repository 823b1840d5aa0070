//! chatmark - chat transcript to Markdown exporter

use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;

use chrono::Utc;
use clap::Parser;

use chatmark::{DirSink, ExportMeta, ExportOptions, Exporter, Role, SnapshotDocument};

#[derive(Parser)]
#[command(name = "chatmark")]
#[command(version, about = "Export chat transcript snapshots to Markdown", long_about = None)]
#[command(after_help = "EXAMPLES:
    chatmark chat.json              Export a snapshot to the current directory
    chatmark chat.json -o exports   Export into ./exports
    chatmark - < chat.json          Read the snapshot from stdin")]
struct Cli {
    /// Snapshot JSON file ('-' for stdin)
    #[arg(value_name = "SNAPSHOT")]
    input: String,

    /// Output directory for the Markdown file
    #[arg(short, long, value_name = "DIR", default_value = ".")]
    output: PathBuf,

    /// Override the document title from the snapshot
    #[arg(long)]
    title: Option<String>,

    /// Treat unmarked turns as user turns instead of assistant turns
    #[arg(long)]
    default_user: bool,

    /// Suppress output messages
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(&cli) {
        Ok(path) => {
            if !cli.quiet {
                println!("saved {}", path.display());
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> chatmark::Result<PathBuf> {
    let json = read_input(&cli.input)?;
    let snapshot = SnapshotDocument::from_json(&json)?;

    let meta = ExportMeta {
        title: cli.title.clone().unwrap_or_else(|| snapshot.title.clone()),
        source_id: snapshot.source_id.clone(),
        source_url: snapshot.source_url.clone(),
        exported_at: Utc::now(),
    };
    let transcript = snapshot.into_transcript()?;

    let options = ExportOptions {
        default_role: if cli.default_user {
            Role::User
        } else {
            Role::Assistant
        },
    };

    let mut sink = DirSink::new(&cli.output);
    let doc = Exporter::with_options(options).export(&transcript, &meta, &mut sink)?;
    Ok(sink.path_for(&doc.filename))
}

fn read_input(input: &str) -> std::io::Result<String> {
    if input == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        Ok(buf)
    } else {
        std::fs::read_to_string(input)
    }
}
