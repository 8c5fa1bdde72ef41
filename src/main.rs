use deskhand::agent;
use deskhand::config::{CONFIG_FILE, Config};
use deskhand::sandbox;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(author, version, about = "Deskhand - sandboxed file-system assistant", long_about = None)]
struct Cli {
    /// Natural-language instruction, e.g. "List files in the folder"
    instruction: Option<String>,

    /// Echo the working directory, prompt, chosen tool, and raw model output
    #[arg(long)]
    verbose: bool,
}

fn print_usage() {
    println!("Usage: deskhand <instruction> [--verbose]");
    println!("\nExamples:");
    println!("  deskhand 'List files in calculator folder'");
    println!("  deskhand 'Read greeting.txt' --verbose");
    println!("  deskhand 'Write test.txt Hello World'");
    println!("  deskhand 'Run script.py'");
    println!("  deskhand 'What files start with lorem?'");
    println!("  deskhand 'Show me all .py files'");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    let Some(instruction) = args.instruction else {
        print_usage();
        std::process::exit(1);
    };

    let cwd = std::env::current_dir()?;
    let workspace = sandbox::ensure_workspace(&cwd)?;
    let config = Config::load(cwd.join(CONFIG_FILE))?;

    if args.verbose {
        println!("Working directory: {}", workspace.display());
        println!("Instruction: {}", instruction);
        println!("{}", "-".repeat(50));
    }

    let result = agent::handle_instruction(&instruction, &workspace, &config, args.verbose).await;

    println!("\n{}", "=".repeat(50));
    println!("RESULT:");
    println!("{}", "=".repeat(50));
    println!("{}", result);

    // Tool failures are reported in the result text, not via the exit code.
    Ok(())
}
