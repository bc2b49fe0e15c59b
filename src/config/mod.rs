#[cfg(feature = "cli")]
pub mod cli;
pub mod rules_file;

#[cfg(feature = "cli")]
pub use cli::CliConfig;
pub use rules_file::RulesConfig;
