//! `ifile`: build and query an inverted-index over a directory of XML
//! documents.

use clap::Parser;
use ifile::query::QueryResponse;
use ifile::{build_index, BuildConfig, QueryEngine};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

mod cli;
use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();
    match cli.command {
        Commands::Index { dir, output, threads } => {
            let config = BuildConfig {
                output_basename: PathBuf::from(output),
                threads: threads.unwrap_or_else(|| {
                    std::thread::available_parallelism().map(|n| n.get()).unwrap_or(4)
                }),
                show_progress: true,
            };
            if let Err(err) = build_index(&PathBuf::from(dir), &config) {
                eprintln!("❌ {err}");
                std::process::exit(1);
            }
        }
        Commands::Query { index, limit } => {
            let engine = match QueryEngine::open(&PathBuf::from(index), limit) {
                Ok(engine) => engine,
                Err(err) => {
                    eprintln!("❌ {err}");
                    std::process::exit(1);
                }
            };
            run_query_loop(&engine);
        }
    }
}

fn run_query_loop(engine: &QueryEngine) {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    for line in stdin.lock().lines() {
        let Ok(line) = line else { break };
        let query = line.trim();
        if query.is_empty() {
            continue;
        }
        print_response(&mut stdout, engine.execute(query));
    }
}

fn print_response(out: &mut impl Write, response: QueryResponse) {
    match response {
        QueryResponse::Results(results) if results.is_empty() => {
            let _ = writeln!(out, "(no matches)");
        }
        QueryResponse::Results(results) => {
            for hit in results {
                let snippet = hit.snippet_start.map_or_else(String::new, |p| format!(" snippet@{p}"));
                let _ = writeln!(out, "{}\t{:.4}{}", hit.document_id, hit.score, snippet);
            }
        }
        QueryResponse::Count(n) => {
            let _ = writeln!(out, "{n}");
        }
        QueryResponse::Text(text) => {
            let _ = writeln!(out, "{text}");
        }
        QueryResponse::NoMatch => {
            let _ = writeln!(out, "(no such document, or `similar` is unavailable)");
        }
    }
}
