use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use nupkg_install::{InstallOptions, InstallOutcome, InstallRequest, InstallStatus, Installer, LockMode};

#[derive(Clone, Debug, Parser)]
#[command(name = "nupkg-extract", version = env!("CARGO_PKG_VERSION"), about, long_about = None)]
pub struct App {
    /// ARCHIVE INSTALL_ROOT ID VERSION
    #[arg(value_name = "ARGS")]
    pub args: Vec<String>,

    /// Provenance blob stored verbatim as .signature.p7s
    #[arg(long, value_name = "FILE")]
    pub signature: Option<PathBuf>,

    /// Do not keep a copy of the archive in the install folder
    #[arg(long)]
    pub no_save_archive: bool,

    /// Fail instead of waiting when another install of the same version is running
    #[arg(long)]
    pub no_wait: bool,

    #[arg(long, short)]
    pub verbose: bool,
}

impl App {
    pub fn run(&self) -> anyhow::Result<String> {
        let mut request = InstallRequest::validate(self.args.as_slice())?;
        if let Some(path) = &self.signature {
            let blob = fs::read(path).with_context(|| format!("failed to read signature {}", path.display()))?;
            request = request.with_signature(blob);
        }

        let options = InstallOptions::default()
            .save_archive(!self.no_save_archive)
            .lock(if self.no_wait { LockMode::Try } else { LockMode::Wait });
        let outcome = Installer::with_options(options).install(&request)?;

        Ok(summary(&request, &outcome))
    }
}

/// A command-line parse failure as a single line, without clap's usage block.
pub fn usage_error(e: &clap::Error) -> String {
    let rendered = e.to_string();
    let line = rendered.lines().next().unwrap_or_default();
    line.strip_prefix("error: ").unwrap_or(line).to_string()
}

fn summary(request: &InstallRequest, outcome: &InstallOutcome) -> String {
    match outcome.state {
        InstallStatus::Completed => format!(
            "Installed {} {} to {} ({} files)",
            request.id(),
            request.version(),
            outcome.path.display(),
            outcome.files_extracted
        ),
        InstallStatus::AlreadyInstalled => format!(
            "{} {} is already installed at {}",
            request.id(),
            request.version(),
            outcome.path.display()
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collects_positionals_without_arity_check() {
        let app = App::try_parse_from(["nupkg-extract", "a.nupkg", "root"]).unwrap();
        assert_eq!(app.args, vec!["a.nupkg", "root"]);

        let app = App::try_parse_from(["nupkg-extract"]).unwrap();
        assert!(app.args.is_empty());
    }

    #[test]
    fn flags() {
        let app = App::try_parse_from([
            "nupkg-extract",
            "--no-wait",
            "--signature",
            "sig.p7s",
            "-v",
            "a.nupkg",
            "root",
            "test",
            "1.0",
        ])
        .unwrap();
        assert!(app.no_wait);
        assert!(app.verbose);
        assert!(!app.no_save_archive);
        assert_eq!(app.signature, Some(PathBuf::from("sig.p7s")));
        assert_eq!(app.args.len(), 4);
    }

    #[test]
    fn parse_failures_render_as_one_line() {
        let err = App::try_parse_from(["nupkg-extract", "--bogus", "a.nupkg"]).unwrap_err();
        assert!(err.use_stderr());
        let line = usage_error(&err);
        assert!(line.contains("--bogus"), "{line}");
        assert!(!line.contains('\n'));
        assert!(!line.starts_with("error:"));

        let help = App::try_parse_from(["nupkg-extract", "--help"]).unwrap_err();
        assert!(!help.use_stderr());
    }

    #[test]
    fn wrong_arity_is_configuration_error() {
        let app = App::try_parse_from(["nupkg-extract", "/does/not/exist.nupkg"]).unwrap();
        let err = app.run().unwrap_err();
        assert_eq!(err.to_string(), "Exactly 4 arguments required.");
        assert!(err.downcast_ref::<nupkg_install::ConfigurationError>().is_some());
    }
}
