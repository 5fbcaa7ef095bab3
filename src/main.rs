use anyhow::Result;
use clap::Parser;
use serde::Serialize;

use revise::cli::CliArgs;
use revise::history::{HistoryListItem, HistoryStats};
use revise::script::{Script, StepOutcome};

#[derive(Serialize)]
struct Report {
    text: String,
    steps: Vec<StepOutcome>,
    history: Vec<HistoryListItem>,
    stats: HistoryStats,
}

fn main() -> Result<()> {
    revise::tracing::init();

    let args = CliArgs::parse();
    let config = args.engine_config()?;
    let script = Script::load(&args.script)?;

    let mut session = script.session(config);
    let steps = script.run(&mut session);

    let report = Report {
        text: session.text().to_string(),
        steps,
        history: session.history_list(),
        stats: session.history_stats(),
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    Ok(())
}

fn print_report(report: &Report) {
    for (i, outcome) in report.steps.iter().enumerate() {
        let mark = if outcome.ok { "ok" } else { "--" };
        println!("{:>3} [{}] {}", i + 1, mark, outcome.step);
    }

    println!();
    println!("History ({}/{}):", report.stats.current_position, report.stats.total_commands);
    for item in &report.history {
        let marker = if item.executed { "*" } else { " " };
        println!("  {} {:>3}  {}", marker, item.index, item.description);
    }

    println!();
    println!(
        "undo: {}  redo: {}  memory: {} bytes",
        report.stats.can_undo, report.stats.can_redo, report.stats.memory_usage
    );
    println!();
    println!("{}", report.text);
}
