use std::path::PathBuf;
use clap::{Parser, ValueEnum};

use crate::models::post::TimelineVariant;

#[derive(Copy, Clone, PartialEq, Eq, Debug, ValueEnum)]
pub enum Command {
    Post,
    Fetch,
    Profile,
}

#[derive(Parser, Debug, Default)]
#[command(about = concat!(env!("CARGO_CRATE_NAME"), " - terminal client for the murmur feed service"))]
pub struct Flags {
    /// post: compose in $EDITOR, fetch: print the timeline, profile: print an author
    #[arg(default_value = None)]
    pub command: Option<Command>,

    /// Config file (defaults to ~/.config/murmur/config.json)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Timeline to load: foryou or following. Saved to the config.
    #[arg(long)]
    pub timeline: Option<TimelineVariant>,

    /// Author handle for the profile command
    #[arg(long)]
    pub handle: Option<String>,
}

impl Flags {
    /// Parse from `std::env::args_os()`, exit on error.
    pub fn from_args() -> Self {
        Self::parse()
    }

    pub fn post(&self) -> bool {
        matches!(self.command, Some(Command::Post))
    }

    pub fn fetch(&self) -> bool {
        matches!(self.command, Some(Command::Fetch))
    }

    pub fn profile(&self) -> bool {
        matches!(self.command, Some(Command::Profile))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_command_and_timeline() {
        let flags = Flags::try_parse_from(["murmur", "fetch", "--timeline", "following"]).unwrap();
        assert!(flags.fetch());
        assert_eq!(flags.timeline, Some(TimelineVariant::Following));
    }

    #[test]
    fn no_command_runs_the_ui() {
        let flags = Flags::try_parse_from(["murmur"]).unwrap();
        assert!(!flags.post() && !flags.fetch() && !flags.profile());
    }
}
