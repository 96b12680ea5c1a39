use clap::{ArgGroup, Parser};
use std::ffi::OsString;
use std::path::{is_separator, PathBuf};

/// Yet Another Photo Catalog: copy photos into YYYY/MM/DD directories

#[derive(Parser, Debug)]
#[command(name = "yapc")]
#[command(version, about, long_about = None)]
#[command(group(ArgGroup::new("action").args(["create", "add", "import"])))]
pub struct Cli {
    /// Create new catalog
    #[arg(short, long)]
    create: bool,

    /// Add new file to catalog (a directory is imported)
    #[arg(short, long, value_name = "PATH", value_parser = expand_path)]
    add: Option<PathBuf>,

    /// Import photos from a folder to catalog
    #[arg(short, long, value_name = "PATH", value_parser = expand_path)]
    import: Option<PathBuf>,

    /// Delete files after add or import (currently has no effect)
    #[arg(short, long)]
    del: bool,

    /// Answer yes to all actions (currently has no effect)
    #[arg(short, long)]
    yes: bool,

    /// Catalog root directory
    #[arg(value_name = "/path/to/photo_catalog", value_parser = expand_path)]
    catalog: PathBuf,
}

/// The one thing an invocation does
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    None,
    Create,
    Add(PathBuf),
    Import(PathBuf),
}

/// Immutable configuration produced once from the command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub action: Action,
    pub catalog: PathBuf,
    pub delete_source: bool,
    pub assume_yes: bool,
}

impl Config {
    /// Fails on unknown flags, missing values, a missing catalog path or
    /// more than one action. `--help` and `--version` also come back as
    /// errors, of kind `DisplayHelp` / `DisplayVersion`.
    pub fn try_parse_from<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        Cli::try_parse_from(args).map(Config::from)
    }
}

impl From<Cli> for Config {
    fn from(cli: Cli) -> Self {
        let action = if cli.create {
            Action::Create
        } else if let Some(path) = cli.add {
            Action::Add(path)
        } else if let Some(path) = cli.import {
            Action::Import(path)
        } else {
            Action::None
        };

        Config {
            action,
            catalog: cli.catalog,
            delete_source: cli.del,
            assume_yes: cli.yes,
        }
    }
}

/// Trims surrounding whitespace and expands a leading `~` to the home directory.
pub fn expand_path(value: &str) -> Result<PathBuf, String> {
    let value = value.trim();
    if value.is_empty() {
        return Err("path must not be empty".to_string());
    }

    if let Some(rest) = value.strip_prefix('~') {
        if rest.is_empty() || rest.starts_with(is_separator) {
            let home = dirs::home_dir().ok_or("cannot determine home directory")?;
            return Ok(home.join(rest.trim_start_matches(is_separator)));
        }
    }

    Ok(PathBuf::from(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;
    use rstest::rstest;

    fn parse(args: &[&str]) -> Result<Config, clap::Error> {
        Config::try_parse_from(std::iter::once("yapc").chain(args.iter().copied()))
    }

    #[rstest]
    #[case(&["/cat"], Action::None)]
    #[case(&["-c", "/cat"], Action::Create)]
    #[case(&["--create", "/cat"], Action::Create)]
    #[case(&["-a", "/photos/a.jpg", "/cat"], Action::Add(PathBuf::from("/photos/a.jpg")))]
    #[case(&["--add=/photos/a.jpg", "/cat"], Action::Add(PathBuf::from("/photos/a.jpg")))]
    #[case(&["-i", "/photos", "/cat"], Action::Import(PathBuf::from("/photos")))]
    #[case(&["--import=/photos", "/cat"], Action::Import(PathBuf::from("/photos")))]
    fn test_parse_action(#[case] args: &[&str], #[case] expected: Action) {
        // Act
        let config = parse(args).unwrap();

        // Assert
        assert_eq!(config.action, expected);
        assert_eq!(config.catalog, PathBuf::from("/cat"));
        assert!(!config.delete_source);
        assert!(!config.assume_yes);
    }

    #[rstest]
    #[case(&["--create", "--add=/x", "/cat"])]
    #[case(&["-a", "/x", "-c", "/cat"])]
    #[case(&["-i", "/x", "-a", "/y", "/cat"])]
    #[case(&["-c", "-c", "/cat"])]
    fn test_second_action_is_rejected(#[case] args: &[&str]) {
        assert!(parse(args).is_err());
    }

    #[rstest]
    #[case(&[])]
    #[case(&["-c"])]
    #[case(&["--add=/x"])]
    fn test_missing_catalog_path_is_rejected(#[case] args: &[&str]) {
        let err = parse(args).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
    }

    #[rstest]
    #[case(&["-x", "/cat"])]
    #[case(&["--bogus", "/cat"])]
    #[case(&["/cat", "/other"])]
    fn test_unknown_arguments_are_rejected(#[case] args: &[&str]) {
        assert!(parse(args).is_err());
    }

    #[test]
    fn test_add_without_value_is_rejected() {
        assert!(parse(&["/cat", "-a"]).is_err());
    }

    #[test]
    fn test_help_is_reported_even_with_action() {
        let err = parse(&["-c", "-h", "/cat"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_modifiers_are_recorded() {
        // Act
        let config = parse(&["-d", "--yes", "-i", "/photos", "/cat"]).unwrap();

        // Assert
        assert!(config.delete_source);
        assert!(config.assume_yes);
        assert_eq!(config.action, Action::Import(PathBuf::from("/photos")));
    }

    #[test]
    fn test_paths_are_trimmed() {
        let config = parse(&["--add=  /photos/a.jpg ", " /cat\t"]).unwrap();

        assert_eq!(config.action, Action::Add(PathBuf::from("/photos/a.jpg")));
        assert_eq!(config.catalog, PathBuf::from("/cat"));
    }

    #[test]
    fn test_tilde_expands_to_home() {
        // Arrange
        let home = dirs::home_dir().expect("home directory");

        // Act
        let config = parse(&["-i", "~/Pictures", "~"]).unwrap();

        // Assert
        assert_eq!(config.action, Action::Import(home.join("Pictures")));
        assert_eq!(config.catalog, home);
    }

    #[rstest]
    #[case("~user/photos", "~user/photos")]
    #[case("/abs/~/x", "/abs/~/x")]
    #[case("relative/dir", "relative/dir")]
    fn test_expand_path_leaves_other_paths(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(expand_path(input).unwrap(), PathBuf::from(expected));
    }

    #[test]
    fn test_expand_path_rejects_blank() {
        assert!(expand_path("   ").is_err());
    }
}
