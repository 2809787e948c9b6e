use bfc::{compile_file, CompilerOptions, Level, Reporter};
use std::env;
use std::path::Path;

fn main() {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("usage: branch_forms <source.bf>");
        return;
    }
    let compilation = compile_file(
        Path::new(&args[1]),
        &CompilerOptions::default(),
        &Reporter::new(Level::Error),
    )
    .unwrap();

    for (i, op) in compilation.ops.iter().enumerate() {
        if op.kind.is_branch() {
            let form = if op.code.len() == 7 { "short" } else { "near" };
            println!("{i:>4}. {} - {form} ({} bytes)", op.kind, op.code.len());
        }
    }
}
