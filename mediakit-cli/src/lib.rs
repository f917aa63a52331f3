// ============================================================================
// mediakit-cli/src/lib.rs
// ============================================================================
//
// Library portion of the MediaKit CLI application.
// Contains argument definitions and command logic so both the binary and the
// integration tests can reach them.

pub mod cli;
pub mod commands;
pub mod error;
pub mod logging;

// Re-export items needed by the binary or integration tests
pub use cli::{Cli, Commands, GlobalArgs};
pub use error::CliResult;

/// Dispatches a parsed command line to its command implementation.
pub fn run(cli: Cli) -> CliResult<()> {
    let global = cli.global;
    match cli.command {
        Commands::Qc(args) => commands::qc::run_qc(args, &global),
        Commands::Rename(args) => commands::rename::run_rename(args, &global),
        Commands::Folders(args) => commands::folders::run_folders(args, &global),
        Commands::ConvertImages(args) => commands::images::run_convert_images(args, &global),
        Commands::Remux(args) => commands::remux::run_remux(args, &global),
        Commands::Encode(args) => commands::encode::run_encode(args, &global),
        Commands::ReplaceAudio(args) => commands::audio::run_replace_audio(args, &global),
        Commands::ExtractAudio(args) => commands::audio::run_extract_audio(args, &global),
        Commands::Notify { action } => commands::notify::run_notify(action, &global),
    }
}
