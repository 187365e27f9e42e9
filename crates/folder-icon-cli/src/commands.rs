use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "folder-icon")]
#[command(about = "Turn images into custom folder icons", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Convert the images in a directory and give each its own icon folder
    Process(ProcessArgs),
    /// Print configuration values
    PrintConfig,
}

#[derive(Debug, Args)]
pub struct ProcessArgs {
    /// Directory containing the images (prompted for when omitted)
    pub directory: Option<PathBuf>,

    /// Leave converted source images in place
    #[arg(long)]
    pub keep_originals: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_process_with_directory() {
        let cli = Cli::try_parse_from(["folder-icon", "process", "C:/Pictures", "--keep-originals"])
            .unwrap();
        match cli.command {
            Some(Commands::Process(args)) => {
                assert_eq!(args.directory, Some(PathBuf::from("C:/Pictures")));
                assert!(args.keep_originals);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_no_subcommand_is_interactive() {
        let cli = Cli::try_parse_from(["folder-icon"]).unwrap();
        assert!(cli.command.is_none());
    }
}
