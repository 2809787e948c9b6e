use bfc::{compile_file, CompilerOptions, HumanFormatter, Level, OpFormatter, Reporter};
use std::env;
use std::path::Path;

fn main() {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("usage: dump_ops <source.bf>");
        return;
    }
    let options = CompilerOptions::default();
    let reporter = Reporter::new(Level::Warning);
    let compilation = compile_file(Path::new(&args[1]), &options, &reporter).unwrap();

    print!("{}", HumanFormatter.render(&compilation.ops));
    println!("{} ops, {} bytes of code", compilation.ops.len(), compilation.assembly.code.len());
}
