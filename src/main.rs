//! Instafilter CLI
//!
//! Lists the available filters and applies one to an image file.

use anyhow::{bail, Result};
use instafilter::cli::{filters_json, run_process, ProcessOptions};
use instafilter::prelude::*;
use instafilter::session::scaling::describe_rule;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage(&args[0]);
        return;
    }

    let result = match args[1].as_str() {
        "list" => list_filters(args[2..].iter().any(|a| a == "--json")),
        "info" => match args.get(2) {
            Some(id) => filter_info(id),
            None => Err(anyhow::anyhow!("Please specify a filter ID")),
        },
        "process" => process_image(&args[2..]),
        "help" | "--help" | "-h" => {
            print_usage(&args[0]);
            Ok(())
        }
        _ => {
            eprintln!("Unknown command: {}", args[1]);
            print_usage(&args[0]);
            std::process::exit(2);
        }
    };

    if let Err(e) = result {
        eprintln!("❌ {:#}", e);
        std::process::exit(1);
    }
}

fn print_usage(program: &str) {
    println!("🎨 Instafilter v{}", instafilter::VERSION);
    println!();
    println!("Usage: {} <command> [options]", program);
    println!();
    println!("Commands:");
    println!("  list [--json]                 List all available filters");
    println!("  info <filter>                 Show which parameters a filter uses");
    println!("  process <in> <out> [options] Apply a filter to an image");
    println!("  help                          Show this help message");
    println!();
    println!("Process options (slider values in 0..1):");
    println!("  --filter <id>       Filter to apply (default: config or sepia-tone)");
    println!("  --intensity <v>     Intensity");
    println!("  --radius <v>        Radius");
    println!("  --scale <v>         Scale");
    println!("  --config <path>     TOML config file");
}

fn list_filters(json: bool) -> Result<()> {
    let registry = FilterRegistry::with_builtins();

    if json {
        println!("{}", filters_json(&registry)?);
        return Ok(());
    }

    println!("Available filters ({} total):", registry.len());
    println!();

    for (category, filters) in registry.grouped_by_category() {
        println!("  📁 {}", category.display_name());
        for descriptor in filters {
            println!("      • {} - {}", descriptor.id, descriptor.description);
        }
        println!();
    }
    Ok(())
}

fn filter_info(filter_id: &str) -> Result<()> {
    let registry = FilterRegistry::with_builtins();
    let Some(descriptor) = registry.lookup(filter_id) else {
        bail!("Filter not found: {}. Use 'list' to see available filters.", filter_id);
    };

    println!("Filter: {}", descriptor.name);
    println!("ID: {}", descriptor.id);
    println!("Category: {}", descriptor.category.display_name());
    println!();
    println!("Description:");
    println!("  {}", descriptor.description);
    println!();
    println!("Parameters:");
    for kind in descriptor.accepted.iter() {
        println!("  • {}: {}", kind, describe_rule(kind));
    }
    Ok(())
}

fn process_image(args: &[String]) -> Result<()> {
    let options = ProcessOptions::parse(args)?;
    println!("⚙️  Processing {} -> {}", options.input.display(), options.output.display());

    let report = run_process(&options, BuiltinKernel::new())?;
    println!(
        "✅ {} applied ({}x{}), saved to {}",
        report.filter.name,
        report.width,
        report.height,
        report
            .receipt
            .location
            .as_deref()
            .unwrap_or(options.output.as_path())
            .display()
    );
    Ok(())
}
