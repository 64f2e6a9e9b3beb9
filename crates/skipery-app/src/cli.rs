use std::path::PathBuf;

use clap::Parser;

/// skipery: a terminal chat agent that calls tools on your behalf.
#[derive(Parser, Debug)]
#[command(name = "skipery", version, about)]
pub struct Args {
    /// Config file path override.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log level override (trace, debug, info, warn, error).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Resume an existing session instead of starting a new one.
    #[arg(short = 's', long)]
    pub session: Option<String>,

    /// SQLite database path override.
    #[arg(long, conflicts_with = "memory")]
    pub db: Option<PathBuf>,

    /// Keep history in memory only.
    #[arg(long)]
    pub memory: bool,

    /// List saved sessions and exit.
    #[arg(long)]
    pub list: bool,
}

pub fn parse() -> Args {
    Args::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let args = Args::try_parse_from(["skipery"]).unwrap();
        assert!(args.session.is_none());
        assert!(!args.memory);
        assert!(!args.list);
    }

    #[test]
    fn resume_with_db() {
        let args = Args::try_parse_from([
            "skipery",
            "-s",
            "abc",
            "--db",
            "/tmp/x.db",
            "--log-level",
            "debug",
        ])
        .unwrap();
        assert_eq!(args.session.as_deref(), Some("abc"));
        assert_eq!(args.db, Some(PathBuf::from("/tmp/x.db")));
        assert_eq!(args.log_level.as_deref(), Some("debug"));
    }

    #[test]
    fn memory_conflicts_with_db() {
        assert!(Args::try_parse_from(["skipery", "--memory", "--db", "x.db"]).is_err());
    }
}
