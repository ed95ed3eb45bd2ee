use clap::Parser;
use std::path::PathBuf;

/// padscribe: type text and drive the keyboard from a gamepad
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Controller slot to read. Repeat for more pads; the first one is primary.
    #[arg(short, long = "controller", value_name = "INDEX")]
    pub controllers: Vec<u32>,
    /// Milliseconds between two polls
    #[arg(long, value_name = "MS")]
    pub poll_interval_ms: Option<u64>,
    /// Settings file to use instead of the default location
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
    /// Log actions instead of sending key events
    #[arg(long, default_value_t = false)]
    pub dry_run: bool,
    /// List controller slots and exit
    #[arg(long, default_value_t = false)]
    pub list: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn repeated_controllers_keep_their_order() {
        let cli = Cli::try_parse_from(["padscribe", "-c", "2", "--controller", "0", "--dry-run"])
            .unwrap();
        assert_eq!(cli.controllers, vec![2, 0]);
        assert!(cli.dry_run);
        assert!(!cli.list);
        assert_eq!(cli.poll_interval_ms, None);
    }
}
