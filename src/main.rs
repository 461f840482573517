use clap::Parser;
use class_variants::{init_tracing, run, Cli};

fn main() -> anyhow::Result<()> {
    // Parse command line arguments
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(output) => {
            if !output.is_empty() {
                println!("{}", output);
            }
            Ok(())
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
