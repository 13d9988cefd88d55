use clap::Parser;
use hl7_indexer::cli::{args::Args, commands};
use std::process;
use tokio_util::sync::CancellationToken;

fn main() {
    dotenv::dotenv().ok();

    let args = Args::parse();

    // If no subcommand was provided, show help and available commands
    if args.command.is_none() {
        show_help_and_commands();
        process::exit(0);
    }

    let runtime = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
        eprintln!("Failed to create async runtime: {}", e);
        process::exit(1);
    });

    let result = runtime.block_on(async {
        let cancellation_token = CancellationToken::new();

        // Ctrl+C only cancels; the indexer drains and reports what it finished
        let signal_token = cancellation_token.clone();
        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    eprintln!("\nReceived CTRL+C, shutting down gracefully...");
                    signal_token.cancel();
                }
                Err(e) => eprintln!("Failed to install CTRL+C handler: {}", e),
            }
        });

        commands::run(args, cancellation_token).await
    });

    match result {
        Ok(()) => process::exit(0),
        Err(error) => {
            eprintln!("Error: {:#}", error);
            if !commands::is_critical_error(&error) {
                eprintln!("Re-run with -vv for per-file diagnostics");
            }
            process::exit(1);
        }
    }
}

/// Show help information and available commands when no subcommand is provided
fn show_help_and_commands() {
    println!("HL7 Indexer - Clinical Message Parsing and Indexing");
    println!("===================================================");
    println!();
    println!("Parse pipe-delimited HL7 v2 messages, extract a normalized document per");
    println!("message type and store it in a searchable JSON-lines collection.");
    println!();
    println!("USAGE:");
    println!("    hl7-indexer <COMMAND> [OPTIONS]");
    println!();
    println!("COMMANDS:");
    println!("    index       Index every message file in a directory (main command)");
    println!("    inspect     Parse and extract one message file and print it as JSON");
    println!("    help        Show this help message or help for specific commands");
    println!();
    println!("OPTIONS:");
    println!("    -h, --help       Show help information");
    println!("    -V, --version    Show version information");
    println!();
    println!("EXAMPLES:");
    println!("    # Index a directory of messages:");
    println!("    hl7-indexer index --input /data/hl7/inbox --output /data/hl7/store");
    println!();
    println!("    # Check what would be indexed without writing anything:");
    println!("    hl7-indexer index --input /data/hl7/inbox --recursive --dry-run");
    println!();
    println!("    # Look at the document extracted from one file:");
    println!("    hl7-indexer inspect /data/hl7/inbox/result.hl7");
    println!();
    println!("For detailed help on any command, use:");
    println!("    hl7-indexer <COMMAND> --help");
}
