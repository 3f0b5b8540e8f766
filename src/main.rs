#![allow(missing_docs)]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod cmd;

#[derive(Parser)]
#[command(name = "cxxsnap", about = "libc++ container inspection over memory snapshots")]
struct Cli {
	#[command(subcommand)]
	command: Commands,
}

#[derive(Subcommand)]
enum Commands {
	Info {
		path: PathBuf,
		#[arg(long)]
		json: bool,
	},
	Types {
		path: PathBuf,
		#[arg(long = "type")]
		type_name: Option<String>,
		#[arg(long)]
		json: bool,
	},
	Values {
		path: PathBuf,
		#[arg(long)]
		json: bool,
	},
	Print {
		path: PathBuf,
		root: String,
		#[arg(long, default_value_t = 3)]
		depth: u32,
		#[arg(long = "max-elements", default_value_t = 64)]
		max_elements: usize,
		#[arg(long)]
		json: bool,
	},
}

fn main() {
	if let Err(err) = run() {
		eprintln!("error: {err}");
		std::process::exit(1);
	}
}

fn run() -> cxxsnap::libcxx::Result<()> {
	let cli = Cli::parse();

	match cli.command {
		Commands::Info { path, json } => cmd::info::run(path, json),
		Commands::Types { path, type_name, json } => cmd::types::run(path, type_name, json),
		Commands::Values { path, json } => cmd::values::run(path, json),
		Commands::Print {
			path,
			root,
			depth,
			max_elements,
			json,
		} => cmd::print::run(path, root, depth, max_elements, json),
	}
}
