// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use anyhow::Context;
use std::env;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use dagflow::config::{load_config, RuntimeBuilder};
use dagflow::engine::{ExecutionReport, Executor, RunContext};
use dagflow::graph::Graph;
use dagflow::observability::init_tracing;
use dagflow::work::SleepingWork;

/// Per-node delay for the placeholder workload
const DEMO_DELAY: Duration = Duration::from_millis(100);

/// Graph used when no workflow file is given (edge direction is depends-on)
const SAMPLE_EDGES: [(&str, &str); 9] = [
    ("2", "0"),
    ("3", "1"),
    ("4", "2"),
    ("5", "2"),
    ("8", "3"),
    ("9", "3"),
    ("55", "5"),
    ("99", "9"),
    ("88", "8"),
];

struct Args {
    workflow: Option<String>,
    failing: Vec<String>,
    json: bool,
}

fn usage(program: &str) -> String {
    format!(
        "Usage: {program} [workflow.yaml|workflow.toml] [--fail <node>]... [--json]\n\
         Runs the built-in 11-node sample graph when no workflow file is given."
    )
}

fn parse_args() -> anyhow::Result<Args> {
    let mut raw = env::args();
    let program = raw.next().unwrap_or_else(|| "dagflow".to_string());

    let mut args = Args {
        workflow: None,
        failing: Vec::new(),
        json: false,
    };

    while let Some(arg) = raw.next() {
        match arg.as_str() {
            "--json" => args.json = true,
            "--fail" => {
                let node = raw
                    .next()
                    .with_context(|| format!("--fail needs a node id\n{}", usage(&program)))?;
                args.failing.push(node);
            }
            "-h" | "--help" => {
                println!("{}", usage(&program));
                std::process::exit(0);
            }
            other if other.starts_with('-') => {
                anyhow::bail!("unknown option '{other}'\n{}", usage(&program));
            }
            path => args.workflow = Some(path.to_string()),
        }
    }

    Ok(args)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing("info");
    let args = parse_args()?;

    let (graph, executor, ctx) = match &args.workflow {
        Some(path) => {
            let config =
                load_config(path).with_context(|| format!("failed to load workflow '{path}'"))?;
            RuntimeBuilder::from_config(&config)?
        }
        None => (Graph::from_edges(SAMPLE_EDGES)?, Executor::default(), RunContext::new()),
    };

    // Ctrl-C cancels the run; nodes in flight observe it through their context
    let token = CancellationToken::new();
    let ctx = ctx.with_cancellation_token(token.clone());
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            token.cancel();
        }
    });

    let work = SleepingWork::new(DEMO_DELAY).failing_on(args.failing.iter().map(String::as_str));
    let report = executor.run(&ctx, &graph, work).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_summary(&report);
    }

    if let Some(error) = report.first_error() {
        anyhow::bail!("run finished with errors: {error}");
    }
    Ok(())
}

fn print_summary(report: &ExecutionReport) {
    println!("\n📊 Execution Results:");
    println!("{}", "─".repeat(60));
    for (node, status) in report.statuses() {
        match status.error() {
            None => println!("  ✅ {:<12} {}", node.as_str(), status.label()),
            Some(error) => println!("  ❌ {:<12} {}: {}", node.as_str(), status.label(), error),
        }
    }
    println!("{}", "─".repeat(60));
    println!(
        "  {} succeeded, {} failed, {} skipped in {:.2?}",
        report.succeeded().len(),
        report.failed().len(),
        report.skipped().len(),
        report.duration()
    );
    let order: Vec<&str> = report.completion_order().iter().map(|n| n.as_str()).collect();
    println!("  Completion order: {}", order.join(" → "));
}
