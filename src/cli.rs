// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// We use the "derive" API: the Cli struct below IS the list of flags, and
// clap generates the parsing, --help and --version for us.
// =============================================================================

use clap::{ArgAction, Parser};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "site-mirror",
    version,
    about = "Mirror a website to a local directory",
    long_about = "site-mirror downloads a page and everything it links to on the same host, \
                  up to a maximum depth, keeping the site's path layout on disk."
)]
pub struct Cli {
    /// URL to start from; only pages on this host are downloaded
    #[arg(long)]
    pub url: String,

    /// Maximum link depth (0 = only the starting page)
    #[arg(long, default_value_t = 1)]
    pub depth: usize,

    /// Directory to write the mirror into
    #[arg(long, default_value = "downloaded")]
    pub output: PathBuf,

    /// Number of downloads allowed at the same time
    #[arg(long, default_value_t = 5, value_parser = clap::value_parser!(u16).range(1..))]
    pub concurrency: u16,

    /// Also download images, scripts and stylesheets (--assets false to disable)
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    pub assets: bool,

    /// Skip TLS certificate verification
    #[arg(long)]
    pub skip_tls_verify: bool,

    /// Print the crawl report as JSON instead of a summary
    #[arg(long)]
    pub json: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["site-mirror", "--url", "http://site.test/"]).unwrap();
        assert_eq!(cli.depth, 1);
        assert_eq!(cli.output, PathBuf::from("downloaded"));
        assert_eq!(cli.concurrency, 5);
        assert!(cli.assets);
        assert!(!cli.skip_tls_verify);
        assert!(!cli.json);
    }

    #[test]
    fn test_assets_can_be_disabled() {
        let cli = Cli::try_parse_from([
            "site-mirror",
            "--url",
            "http://site.test/",
            "--assets",
            "false",
        ])
        .unwrap();
        assert!(!cli.assets);
    }

    #[test]
    fn test_zero_concurrency_is_rejected() {
        let result = Cli::try_parse_from([
            "site-mirror",
            "--url",
            "http://site.test/",
            "--concurrency",
            "0",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_url_is_required() {
        assert!(Cli::try_parse_from(["site-mirror"]).is_err());
    }
}
