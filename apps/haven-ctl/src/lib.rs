use std::{
	fmt::{Display, Formatter},
	path::PathBuf,
	process::ExitCode,
};

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use haven_service::{Error, HavenService, LoadRequest, SearchMode, SearchRequest};

const EXIT_CONFIG: u8 = 2;
const EXIT_INDEX_UNAVAILABLE: u8 = 3;
const EXIT_MODEL_UNAVAILABLE: u8 = 4;
const EXIT_EMPTY_CORPUS: u8 = 5;

#[derive(Debug, Parser)]
#[command(
	version = haven_cli::VERSION,
	rename_all = "kebab",
	styles = haven_cli::styles(),
)]
pub struct Args {
	#[arg(long, short = 'c', value_name = "FILE")]
	pub config: PathBuf,
	#[command(subcommand)]
	pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
	/// Ingest housing records from a JSON source file.
	Load {
		source: PathBuf,
		#[arg(long)]
		batch_size: Option<u32>,
		/// Empty the collection before ingesting.
		#[arg(long)]
		clear: bool,
	},
	/// Search listings with a natural-language query.
	Search {
		query: String,
		#[arg(long, value_enum, default_value_t = ModeArg::Hybrid)]
		mode: ModeArg,
		#[arg(long)]
		district: Option<String>,
		#[arg(long)]
		dong: Option<String>,
		#[arg(long)]
		theme: Option<String>,
		#[arg(long)]
		min_similarity: Option<f32>,
		#[arg(long)]
		limit: Option<u32>,
	},
	/// Report total and per-category record counts.
	Stats,
	/// Empty the collection.
	Clear,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
	Plain,
	Hybrid,
}
impl Display for ModeArg {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Plain => write!(f, "plain"),
			Self::Hybrid => write!(f, "hybrid"),
		}
	}
}
impl From<ModeArg> for SearchMode {
	fn from(mode: ModeArg) -> Self {
		match mode {
			ModeArg::Plain => Self::Plain,
			ModeArg::Hybrid => Self::Hybrid,
		}
	}
}

pub async fn run(args: Args) -> ExitCode {
	let config = match haven_config::load(&args.config) {
		Ok(config) => config,
		Err(err) => {
			eprintln!("{err}");

			return ExitCode::from(EXIT_CONFIG);
		},
	};

	init_tracing(&config);

	let service = HavenService::new(config);

	match execute(&service, args.command).await {
		Ok(code) => code,
		Err(err) => {
			eprintln!("{err}");

			exit_code_for(&err)
		},
	}
}

async fn execute(service: &HavenService, command: Command) -> haven_service::Result<ExitCode> {
	match command {
		Command::Load { source, batch_size, clear } => {
			let report = service.load(LoadRequest { source, batch_size, clear }).await?;

			print_json(&report)?;

			Ok(ExitCode::SUCCESS)
		},
		Command::Search { query, mode, district, dong, theme, min_similarity, limit } => {
			let response = service
				.search(SearchRequest {
					query,
					mode: mode.into(),
					district,
					dong,
					theme,
					min_similarity,
					limit,
				})
				.await?;
			let corpus_empty = response.corpus_empty;

			print_json(&response)?;

			if corpus_empty {
				return Ok(ExitCode::from(EXIT_EMPTY_CORPUS));
			}

			Ok(ExitCode::SUCCESS)
		},
		Command::Stats => {
			let report = service.stats().await?;

			print_json(&report)?;

			Ok(ExitCode::SUCCESS)
		},
		Command::Clear => {
			service.clear().await?;

			Ok(ExitCode::SUCCESS)
		},
	}
}

fn print_json<T>(value: &T) -> haven_service::Result<()>
where
	T: serde::Serialize,
{
	let rendered = serde_json::to_string_pretty(value).map_err(|err| Error::InvalidRequest {
		message: format!("Failed to render output: {err}."),
	})?;

	println!("{rendered}");

	Ok(())
}

fn exit_code_for(err: &Error) -> ExitCode {
	match err {
		Error::InvalidQuery { .. } | Error::InvalidRequest { .. } => ExitCode::from(EXIT_CONFIG),
		Error::IndexUnavailable { .. } => ExitCode::from(EXIT_INDEX_UNAVAILABLE),
		Error::ModelUnavailable { .. } => ExitCode::from(EXIT_MODEL_UNAVAILABLE),
	}
}

fn init_tracing(config: &haven_config::Config) {
	let filter =
		EnvFilter::try_new(&config.service.log_level).unwrap_or_else(|_| EnvFilter::new("info"));

	tracing_subscriber::fmt().with_env_filter(filter).init();
}
