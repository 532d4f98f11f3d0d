use std::io::{self, BufWriter, Read, Write};
use std::path::PathBuf;
use std::time::Instant;

use clap::{Args, Parser, Subcommand, ValueEnum};
use log::info;

use bitindex::base::{BoxResult, Len};
use bitindex::codec::{dump_index_with, load_domain_file, load_index_file, save_index_file};
use bitindex::utils::input::open_input;
use bitindex::{CodecOptions, CsvIndexer, CsvOptions, FieldEncoding, Index, Indexer, Query};

#[derive(Parser)]
#[command(name = "bitindex", version, about = "Inverted bitmap index")]
struct Cli {
    /// Memory-map index files instead of reading them in memory
    #[arg(long, global = true)]
    mmap: bool,

    /// Encoding of the integer fields of index files
    #[arg(long, global = true, value_enum, default_value_t = Encoding::Varint)]
    encoding: Encoding,

    /// gzip compression level (0-9) of written index files
    #[arg(long, global = true, default_value_t = 6, value_parser = clap::value_parser!(u32).range(0..=9))]
    compression_level: u32,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, ValueEnum)]
enum Encoding {
    Varint,
    Fixed,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Csv,
}

#[derive(Subcommand)]
enum Command {
    /// Build an index
    Build(BuildArgs),
    /// Query an index
    Query(QueryArgs),
    /// Output the statistics of an index
    Stats {
        index: PathBuf,
        /// Output the statistics as JSON
        #[arg(long)]
        json: bool,
    },
    /// Output information about the keys
    Keys {
        index: PathBuf,
        /// Output the keys
        #[arg(long)]
        keys: bool,
    },
    /// Output information about the domain
    Domain {
        index: PathBuf,
        /// Output the members
        #[arg(long)]
        members: bool,
    },
}

#[derive(Args)]
struct BuildArgs {
    /// Input file (standard input if absent); .gz/.gzip and .bz2/.bzip2 files are decompressed
    path: Option<PathBuf>,

    /// Format of the input stream
    #[arg(long, value_enum)]
    format: Format,

    /// Output file (standard output if absent)
    #[arg(long)]
    output: Option<PathBuf>,

    /// The CSV input has a header
    #[arg(long)]
    csv_header: bool,

    /// Index of the column containing the keys
    #[arg(long, default_value_t = 0)]
    csv_key: usize,

    /// Index of the column containing the domain members
    #[arg(long, default_value_t = 1)]
    csv_domain: usize,
}

#[derive(Args)]
struct QueryArgs {
    index: PathBuf,

    /// Keys having any of these members
    #[arg(long, value_delimiter = ',')]
    any: Vec<u32>,

    /// Keys having all of these members
    #[arg(long, value_delimiter = ',')]
    all: Vec<u32>,

    /// Keys having none of these members
    #[arg(long, value_delimiter = ',')]
    nany: Vec<u32>,

    /// Keys lacking at least one of these members
    #[arg(long, value_delimiter = ',')]
    nall: Vec<u32>,
}

impl Cli {
    fn codec_options(&self) -> CodecOptions {
        CodecOptions {
            encoding: match self.encoding {
                Encoding::Varint => FieldEncoding::Varint,
                Encoding::Fixed => FieldEncoding::Fixed,
            },
            compression_level: self.compression_level,
        }
    }
}

fn print_statistics(index: &Index) {
    let statistics = index.statistics();
    println!("Statistics:");
    println!("* Domain size: {}", statistics.domain_size);
    println!("* Table size: {}", statistics.table_size);
    match statistics.sparsity {
        Some(sparsity) => println!("* Sparsity: {}", sparsity * 100.),
        None => println!("* Sparsity: n/a (empty table)"),
    }
}

fn build(args: &BuildArgs, options: &CodecOptions) -> BoxResult<()> {
    let input: Box<dyn Read> = match &args.path {
        Some(path) => open_input(path)?,
        None => Box::new(io::stdin()),
    };

    let mut indexer = match args.format {
        Format::Csv => CsvIndexer::new(
            input,
            &CsvOptions {
                header: args.csv_header,
                key_column: args.csv_key,
                member_column: args.csv_domain,
                ..Default::default()
            },
        ),
    };

    let start = Instant::now();
    let index = indexer.to_index()?;
    info!("Build time: {:?}", start.elapsed());

    // Statistics go to stderr when the index is written to stdout
    match &args.output {
        Some(output) => {
            print_statistics(&index);
            save_index_file(output, &index, options)?;
        }
        None => {
            let statistics = index.statistics();
            eprintln!(
                "Domain size: {}, table size: {}, sparsity: {:?}",
                statistics.domain_size, statistics.table_size, statistics.sparsity
            );
            let mut stdout = BufWriter::new(io::stdout().lock());
            dump_index_with(&mut stdout, &index, options)?;
            stdout.flush()?;
        }
    }

    Ok(())
}

fn query(args: &QueryArgs, in_memory: bool, options: &CodecOptions) -> BoxResult<()> {
    let query = Query {
        any: args.any.clone(),
        all: args.all.clone(),
        not_any: args.nany.clone(),
        not_all: args.nall.clone(),
    };
    if query.is_empty() {
        return Err("at least one operation must be specified".into());
    }

    let index = load_index_file(&args.index, in_memory, options)?;

    let start = Instant::now();
    let result = index.query(&query)?;
    eprintln!("Time: {:?}", start.elapsed());

    let mut stdout = BufWriter::new(io::stdout().lock());
    for key in result.items() {
        writeln!(stdout, "{}", key)?;
    }
    stdout.flush()?;
    Ok(())
}

fn run(cli: &Cli) -> BoxResult<()> {
    let options = cli.codec_options();
    let in_memory = !cli.mmap;

    match &cli.command {
        Command::Build(args) => build(args, &options),
        Command::Query(args) => query(args, in_memory, &options),
        Command::Stats { index, json } => {
            let index = load_index_file(index, in_memory, &options)?;
            if *json {
                println!("{}", serde_json::to_string(&index.statistics())?);
            } else {
                print_statistics(&index);
            }
            Ok(())
        }
        Command::Keys { index, keys } => {
            let index = load_index_file(index, in_memory, &options)?;
            println!("Statistics:");
            println!("* Length: {}", index.table().len());
            println!("* Bytes: {}", index.table().allocated_bytes());
            if *keys {
                for key in index.table().keys() {
                    println!("{}", key);
                }
            }
            Ok(())
        }
        Command::Domain { index, members } => {
            let domain = load_domain_file(index, in_memory, &options)?;
            println!("Statistics:");
            println!("* Length: {}", domain.len());
            println!("* Bytes: {}", domain.byte_width());
            if *members {
                for member in domain.members() {
                    println!("{}", member);
                }
            }
            Ok(())
        }
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    if let Err(e) = run(&cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
