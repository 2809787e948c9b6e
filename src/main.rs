//! bfc CLI
//!
//! Compiles a Brainfuck source file into a flat x86-64 code blob.

use anyhow::Context;
use bfc::{
    compile_file, CompilerOptions, HumanFormatter, JsonFormatter, Level, OpFormatter,
    OverflowBehavior, Reporter,
};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::process::ExitCode;

/// Ahead-of-time Brainfuck compiler.
///
/// Emits freestanding x86-64 machine code for Linux with the process
/// stack as the cell tape. The output is a raw code blob whose entry
/// point is byte 0.
#[derive(Parser, Debug)]
#[command(name = "bfc")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Brainfuck source file
    source: PathBuf,

    /// Output path for the code blob
    #[arg(short, long, default_value = "bfcbin")]
    output: PathBuf,

    /// Number of tape cells reserved on the stack
    #[arg(long, default_value_t = 30000)]
    tape_cells: u32,

    /// Overflow policy for cell arithmetic
    #[arg(long, value_enum, default_value = "undefined")]
    overflow: OverflowArg,

    /// Cell width in bytes (affects overflow analysis only; code
    /// generation always uses single-byte cells)
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..=4))]
    cell_bytes: u32,

    /// Most detailed diagnostic level to print
    #[arg(long, value_enum, default_value = "warning")]
    log_level: LevelArg,

    /// Dump the optimized op list to stdout after compilation
    #[arg(long, value_enum)]
    dump_ops: Option<DumpFormat>,

    /// Verbose tracing of compiler internals
    #[arg(short, long)]
    verbose: bool,
}

/// Overflow policy options.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum OverflowArg {
    /// Let the architecture decide (wraps on x86-64)
    Undefined,
    /// Clamp at the cell bounds
    Cap,
    /// Abort the generated program on overflow
    Abort,
}

impl From<OverflowArg> for OverflowBehavior {
    fn from(arg: OverflowArg) -> Self {
        match arg {
            OverflowArg::Undefined => OverflowBehavior::Undefined,
            OverflowArg::Cap => OverflowBehavior::Cap,
            OverflowArg::Abort => OverflowBehavior::Abort,
        }
    }
}

/// Diagnostic threshold options.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum LevelArg {
    Fatal,
    Error,
    Warning,
    Info,
    Debug,
}

impl From<LevelArg> for Level {
    fn from(arg: LevelArg) -> Self {
        match arg {
            LevelArg::Fatal => Level::Fatal,
            LevelArg::Error => Level::Error,
            LevelArg::Warning => Level::Warning,
            LevelArg::Info => Level::Info,
            LevelArg::Debug => Level::Debug,
        }
    }
}

/// Op-list dump formats.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum DumpFormat {
    /// Fixed-width listing
    Human,
    /// JSON records
    Json,
}

fn main() -> ExitCode {
    let args = Args::parse();

    if args.verbose {
        tracing_subscriber::fmt()
            .with_env_filter("bfc=debug")
            .init();
    }

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> anyhow::Result<()> {
    let options = CompilerOptions {
        overflow: args.overflow.into(),
        cell_bytes: args.cell_bytes,
        tape_cells: args.tape_cells,
    };
    let reporter = Reporter::new(args.log_level.into());

    let compilation = compile_file(&args.source, &options, &reporter)
        .with_context(|| format!("compiling {}", args.source.display()))?;

    tracing::debug!(
        ops = compilation.ops.len(),
        bytes = compilation.assembly.code.len(),
        "assembled"
    );

    if let Some(format) = args.dump_ops {
        let rendered = match format {
            DumpFormat::Human => HumanFormatter.render(&compilation.ops),
            DumpFormat::Json => JsonFormatter.render(&compilation.ops),
        };
        print!("{rendered}");
        if matches!(format, DumpFormat::Json) {
            println!();
        }
    }

    std::fs::write(&args.output, &compilation.assembly.code)
        .with_context(|| format!("writing {}", args.output.display()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_require_a_source() {
        assert!(Args::try_parse_from(["bfc"]).is_err());
        let args = Args::try_parse_from(["bfc", "hello.bf"]).unwrap();
        assert_eq!(args.source, PathBuf::from("hello.bf"));
        assert_eq!(args.output, PathBuf::from("bfcbin"));
        assert_eq!(args.tape_cells, 30000);
    }

    #[test]
    fn test_output_override() {
        let args = Args::try_parse_from(["bfc", "-o", "out.bin", "hello.bf"]).unwrap();
        assert_eq!(args.output, PathBuf::from("out.bin"));
    }

    #[test]
    fn test_cell_bytes_is_bounded() {
        assert!(Args::try_parse_from(["bfc", "--cell-bytes", "0", "a.bf"]).is_err());
        assert!(Args::try_parse_from(["bfc", "--cell-bytes", "8", "a.bf"]).is_err());
        let args = Args::try_parse_from(["bfc", "--cell-bytes", "2", "a.bf"]).unwrap();
        assert_eq!(args.cell_bytes, 2);
    }

    #[test]
    fn test_dump_format_options() {
        let args = Args::try_parse_from(["bfc", "--dump-ops", "json", "a.bf"]).unwrap();
        assert!(matches!(args.dump_ops, Some(DumpFormat::Json)));
    }
}
