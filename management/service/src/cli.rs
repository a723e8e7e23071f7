//! Command-line arguments.

use std::path::PathBuf;

use clap::Parser;

use crate::config::RegistryMode;

/// Serves the management API of a folder of serverless workflow definitions.
///
/// Command-line arguments take precedence over the configuration file.
#[derive(Parser, Debug)]
#[command(name = "swf-management")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// TOML configuration file
    #[arg(short, long, env = "SWF_MANAGEMENT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Host name or address to listen on
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Folder of `*.sw.json` workflow definitions
    #[arg(short, long)]
    pub resources: Option<PathBuf>,

    /// Read the definitions on every request, or once at startup
    #[arg(long, value_enum)]
    pub registry: Option<RegistryMode>,

    /// Sort the process metadata by id
    #[arg(long)]
    pub sorted: bool,

    /// Don't log anything
    #[arg(short, long)]
    pub quiet: bool,
}

#[cfg(test)]
mod tests {
    use clap::Parser as _;

    use super::Cli;
    use crate::config::RegistryMode;

    #[test]
    fn parse() {
        let cli = Cli::try_parse_from([
            "swf-management",
            "--port",
            "9090",
            "--resources",
            "workflows",
            "--registry",
            "preloaded",
            "--sorted",
        ])
        .unwrap();
        assert_eq!(Some(9090), cli.port);
        assert_eq!(Some("workflows".into()), cli.resources);
        assert_eq!(Some(RegistryMode::Preloaded), cli.registry);
        assert!(cli.sorted);
        assert!(!cli.quiet);
        assert_eq!(None, cli.host);
    }

    #[test]
    fn invalid_port() {
        assert!(Cli::try_parse_from(["swf-management", "--port", "http"]).is_err());
    }
}
