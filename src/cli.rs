use clap::Parser;

/// Dependency vulnerability scanning service
#[derive(Parser, Debug)]
#[command(name = "depscan")]
#[command(version)]
#[command(about = "Scan dependency manifests against NVD, Snyk, and OSS Index", long_about = None)]
pub struct Args {
    /// Address to bind the HTTP server to (overrides HOST)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on (overrides PORT)
    #[arg(short, long)]
    pub port: Option<u16>,
}

impl Args {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_flags_leaves_overrides_unset() {
        let args = Args::parse_from(["depscan"]);
        assert!(args.host.is_none());
        assert!(args.port.is_none());
    }

    #[test]
    fn test_host_and_port_flags() {
        let args = Args::parse_from(["depscan", "--host", "127.0.0.1", "--port", "9000"]);
        assert_eq!(args.host.as_deref(), Some("127.0.0.1"));
        assert_eq!(args.port, Some(9000));
    }

    #[test]
    fn test_invalid_port_rejected() {
        assert!(Args::try_parse_from(["depscan", "--port", "banana"]).is_err());
    }
}
