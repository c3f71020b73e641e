//! huffpack command-line front end.
//!
//! ```bash
//! # Compress a text file to notes.bin
//! huffpack compress notes.txt --mode text --trim
//!
//! # Restore it to notes_decompressed.txt
//! huffpack decompress notes.bin --mode text
//!
//! # Show the stored code table
//! huffpack inspect notes.bin --mode text
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use huffpack::{container, encode, CodeTable, Error, Result, Symbol};

#[derive(Parser, Debug)]
#[command(name = "huffpack")]
#[command(version)]
#[command(about = "Static Huffman compression", long_about = None)]
struct Args {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", global = true)]
    log_level: Level,

    #[command(subcommand)]
    command: Command,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum, Debug)]
enum Mode {
    /// One symbol per byte; works for any file.
    Bytes,
    /// One symbol per Unicode character; input must be UTF-8.
    Text,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compress a file
    Compress {
        input: PathBuf,
        /// Output path (default: <stem>.bin next to the input)
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[arg(long, value_enum, default_value_t = Mode::Bytes)]
        mode: Mode,
        /// Strip leading and trailing whitespace from text input
        #[arg(long)]
        trim: bool,
        /// Write only the padded payload and print the code table instead
        #[arg(long)]
        raw: bool,
    },
    /// Decompress a file written by `compress`
    Decompress {
        input: PathBuf,
        /// Output path (default: <stem>_decompressed.txt next to the input)
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[arg(long, value_enum, default_value_t = Mode::Bytes)]
        mode: Mode,
    },
    /// Print the header and code table of a compressed file
    Inspect {
        input: PathBuf,
        #[arg(long, value_enum, default_value_t = Mode::Bytes)]
        mode: Mode,
    },
}

fn main() {
    let args = Args::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(args.log_level)
        .with_writer(std::io::stderr)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("failed to install logger: {e}");
    }

    if let Err(e) = run(args.command) {
        tracing::error!(error = %e, "huffpack failed");
        std::process::exit(1);
    }
}

fn run(command: Command) -> Result<()> {
    match command {
        Command::Compress {
            input,
            output,
            mode,
            trim,
            raw,
        } => {
            let output = output.unwrap_or_else(|| sibling(&input, ".bin"));
            let data = fs::read(&input)?;
            match mode {
                Mode::Bytes => {
                    let data = if trim { data.trim_ascii().to_vec() } else { data };
                    compress_file(&data, &output, raw)
                }
                Mode::Text => {
                    let text = read_text(data)?;
                    let text = if trim { text.trim() } else { text.as_str() };
                    let symbols: Vec<char> = text.chars().collect();
                    compress_file(&symbols, &output, raw)
                }
            }
        }
        Command::Decompress {
            input,
            output,
            mode,
        } => {
            let output = output.unwrap_or_else(|| sibling(&input, "_decompressed.txt"));
            let data = fs::read(&input)?;
            let restored = match mode {
                Mode::Bytes => huffpack::decompress::<u8>(&data)?,
                Mode::Text => huffpack::decompress_str(&data)?.into_bytes(),
            };
            fs::write(&output, &restored)?;
            info!(path = %output.display(), content_length = restored.len(), "decompressed");
            Ok(())
        }
        Command::Inspect { input, mode } => {
            let data = fs::read(&input)?;
            match mode {
                Mode::Bytes => inspect::<u8>(&data),
                Mode::Text => inspect::<char>(&data),
            }
        }
    }
}

fn compress_file<S: Symbol>(symbols: &[S], output: &Path, raw: bool) -> Result<()> {
    let encoded = encode(symbols)?;
    let bytes = if raw {
        print_table(&encoded.table);
        encoded.payload.into_bytes()
    } else {
        container::write(&encoded.table, &encoded.payload)?
    };
    fs::write(output, &bytes)?;
    info!(
        path = %output.display(),
        symbols = symbols.len(),
        content_length = bytes.len(),
        "compressed"
    );
    Ok(())
}

fn inspect<S: Symbol>(data: &[u8]) -> Result<()> {
    let parsed = container::read::<S>(data)?;
    let pad = parsed.payload.first().copied().unwrap_or(0);
    println!("symbol kind : {}", S::KIND.name());
    println!("symbols     : {}", parsed.table.len());
    println!("max code    : {} bits", parsed.table.max_len());
    println!("payload     : {} bytes, pad {}", parsed.payload.len(), pad);
    print_table(&parsed.table);
    Ok(())
}

fn print_table<S: Symbol>(table: &CodeTable<S>) {
    for (symbol, code) in table.iter() {
        println!("{symbol:?}\t{code}");
    }
}

fn read_text(data: Vec<u8>) -> Result<String> {
    String::from_utf8(data).map_err(|e| {
        Error::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            e.utf8_error(),
        ))
    })
}

// `dir/name.txt` -> `dir/name<suffix>`
fn sibling(input: &Path, suffix: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    input.with_file_name(format!("{stem}{suffix}"))
}
