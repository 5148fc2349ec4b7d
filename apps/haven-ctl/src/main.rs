use std::process::ExitCode;

use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<ExitCode> {
	color_eyre::install()?;
	let args = haven_ctl::Args::parse();
	Ok(haven_ctl::run(args).await)
}
