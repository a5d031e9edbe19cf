#![allow(missing_docs)]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod cmd;

#[derive(Parser)]
#[command(name = "plogdoc", about = "plog vehicle-telemetry log inspection tools")]
struct Cli {
	#[command(subcommand)]
	command: Commands,
}

#[derive(Subcommand)]
enum Commands {
	Info {
		path: PathBuf,
	},
	Catalog {
		#[arg(long = "describe")]
		describe: Vec<PathBuf>,
		#[arg(long = "type")]
		type_name: Option<String>,
	},
	Detectors {
		#[arg(long = "describe")]
		describe: Vec<PathBuf>,
	},
	Dump {
		path: PathBuf,
		#[arg(long = "describe")]
		describe: Vec<PathBuf>,
		#[arg(long)]
		limit: Option<usize>,
		#[arg(long)]
		json: bool,
	},
}

fn main() {
	tracing_subscriber::fmt()
		.with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
		.with_writer(std::io::stderr)
		.init();

	if let Err(err) = run() {
		eprintln!("error: {err}");
		std::process::exit(err.status().exit_code());
	}
}

fn run() -> plogdoc_core::plog::Result<()> {
	let cli = Cli::parse();

	match cli.command {
		Commands::Info { path } => cmd::info::run(path),
		Commands::Catalog { describe, type_name } => cmd::catalog::run(describe, type_name),
		Commands::Detectors { describe } => cmd::detectors::run(describe),
		Commands::Dump {
			path,
			describe,
			limit,
			json,
		} => cmd::dump::run(path, describe, limit, json),
	}
}
