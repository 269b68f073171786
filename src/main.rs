//! markwell - convert and sanitize editor markup

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use markwell::dom::block_text;
use markwell::{
    AllowList, EditorConfig, NodeId, Tree, desemantify, parse_fragment_bytes, sanitize, semantify,
    strip_annotations, to_html,
};

#[derive(Parser)]
#[command(name = "markwell")]
#[command(version, about = "Convert and sanitize rich-text editor markup", long_about = None)]
#[command(after_help = "EXAMPLES:
    markwell semantify draft.html         Print the semantic form
    markwell sanitize --ambient paste.html Clean pasted HTML
    markwell --json text draft.html       Print plain text as JSON")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Print the tree as JSON instead of HTML
    #[arg(long, global = true)]
    json: bool,

    /// Editor configuration (JSON)
    #[arg(long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Presentational HTML to semantic HTML
    Semantify {
        #[arg(value_name = "INPUT")]
        input: PathBuf,
    },
    /// Semantic HTML to presentational HTML
    Desemantify {
        #[arg(value_name = "INPUT")]
        input: PathBuf,
    },
    /// Restrict pasted HTML to the allow-list
    Sanitize {
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Allow-list (JSON object of tag -> attribute names)
        #[arg(long, value_name = "FILE")]
        allow_list: Option<PathBuf>,

        /// Strip top-level formatting, as when pasting into formatted text
        #[arg(long)]
        ambient: bool,
    },
    /// Plain text of the semantic form
    Text {
        #[arg(value_name = "INPUT")]
        input: PathBuf,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> markwell::Result<String> {
    let config = match &cli.config {
        Some(path) => EditorConfig::from_json_file(path)?,
        None => EditorConfig::default(),
    };

    match &cli.command {
        Commands::Semantify { input } => render(&semantify(&read_tree(input)?), cli.json),
        Commands::Desemantify { input } => {
            let tree = desemantify(&read_tree(input)?, &config.code_font_family);
            render(&tree, cli.json)
        }
        Commands::Sanitize {
            input,
            allow_list,
            ambient,
        } => {
            let allow_list = match allow_list {
                Some(path) => AllowList::from_json_str(&std::fs::read_to_string(path)?)?,
                None => config.allow_list.clone(),
            };
            let mut tree = sanitize(&read_tree(input)?, &allow_list);
            if *ambient {
                strip_annotations(&mut tree);
            }
            render(&tree, cli.json)
        }
        Commands::Text { input } => {
            let text = block_text(&semantify(&read_tree(input)?), NodeId::ROOT);
            if cli.json {
                Ok(serde_json::to_string(&text)?)
            } else {
                Ok(text)
            }
        }
    }
}

fn read_tree(path: &Path) -> markwell::Result<Tree> {
    let bytes = std::fs::read(path)?;
    tracing::debug!(path = %path.display(), bytes = bytes.len(), "read input");
    Ok(parse_fragment_bytes(&bytes))
}

fn render(tree: &Tree, json: bool) -> markwell::Result<String> {
    if json {
        Ok(serde_json::to_string_pretty(&tree.to_nodes(NodeId::ROOT))?)
    } else {
        Ok(to_html(tree, NodeId::ROOT))
    }
}
