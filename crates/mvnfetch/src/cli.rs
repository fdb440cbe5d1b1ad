//! Command line arguments.

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Default)]
#[command(name = "mvnfetch")]
#[command(
    author,
    version,
    about = "Resolve and download Maven artifacts with their transitive dependencies"
)]
pub struct Cli {
    /// Coordinates to resolve (group:artifact:version[:type[:classifier]])
    #[arg(value_name = "COORDINATES")]
    pub coordinates: Vec<String>,

    /// JSON configuration file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Cache directory downloads are stored in
    #[arg(long, value_name = "DIR")]
    pub cache: Option<PathBuf>,

    /// Additional remote repository, tried after the configured ones
    #[arg(short = 'r', long = "repository", value_name = "NAME=URL", value_parser = parse_repository)]
    pub repositories: Vec<(String, String)>,

    /// Look in ~/.m2/repository before any remote repository
    #[arg(long)]
    pub maven_local: bool,

    /// Do not fall back to Maven Central
    #[arg(long)]
    pub no_central: bool,

    /// Never download this artifact as a transitive dependency
    #[arg(short = 'x', long = "exclude", value_name = "GROUP:ARTIFACT")]
    pub excludes: Vec<String>,

    /// Maximum number of parallel downloads
    #[arg(short = 'j', long, value_name = "N")]
    pub concurrency: Option<usize>,
}

fn parse_repository(value: &str) -> Result<(String, String), String> {
    match value.split_once('=') {
        Some((name, url)) if !name.is_empty() && !url.is_empty() => {
            Ok((name.to_string(), url.to_string()))
        }
        _ => Err(format!("expected NAME=URL, got '{value}'")),
    }
}
