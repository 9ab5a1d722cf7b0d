//! `skillpack` CLI entrypoint.
//!
//! Validates skill manifests and packages valid skill directories into zip
//! archives. Reports go to stdout; fatal errors go to stderr.

use clap::Parser;
use skillpack::SharedConfig;
use skillpack_packager::cli::{Cli, Command};
use skillpack_packager::error::{PackagerError, Result};
use skillpack_packager::pipeline::{PackageOutcome, Packager};
use skillpack_packager::report::{package_report, validation_report};
use std::io::Write;

fn main() {
    let cli = Cli::parse();
    init_logging(&cli);

    let mut stdout = std::io::stdout();
    let mut stderr = std::io::stderr();
    let run_result = run(&cli, &mut stdout);
    let exit_code = exit_code_for_run_result(run_result, &mut stderr);
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
}

fn init_logging(cli: &Cli) {
    env_logger::Builder::new()
        .filter_level(cli.log_level())
        .parse_default_env()
        .format_timestamp(None)
        .init();
}

/// Run the selected subcommand and return whether it succeeded.
fn run(cli: &Cli, stdout: &mut dyn Write) -> Result<bool> {
    let config = load_config(cli)?;
    let packager = Packager::from_config(&config);

    match &cli.command {
        Command::Validate(args) => {
            let outcome = packager.validate_skill(&args.skill_path)?;
            write_report(stdout, &validation_report(&outcome))?;
            Ok(outcome.is_valid())
        }
        Command::Package(args) => {
            let output_dir = args.output_dir_or(&config);
            let outcome = packager.package_skill(&args.skill_path, output_dir)?;
            write_report(stdout, &package_report(&outcome))?;
            Ok(matches!(outcome, PackageOutcome::Packaged(_)))
        }
    }
}

fn load_config(cli: &Cli) -> Result<SharedConfig> {
    let config = match &cli.config {
        Some(path) => SharedConfig::load_from(path)?,
        None => SharedConfig::discover()?,
    };
    Ok(config)
}

fn write_report(stdout: &mut dyn Write, report: &str) -> Result<()> {
    stdout
        .write_all(report.as_bytes())
        .and_then(|()| stdout.flush())
        .map_err(|source| PackagerError::WriteFailed { source })
}

fn exit_code_for_run_result(result: Result<bool>, stderr: &mut dyn Write) -> i32 {
    match result {
        Ok(true) => 0,
        Ok(false) => 1,
        Err(err) => {
            write_stderr_line(stderr, format!("error: {err}"));
            1
        }
    }
}

fn write_stderr_line(stderr: &mut dyn Write, message: impl std::fmt::Display) {
    if writeln!(stderr, "{message}").is_err() {
        // Best-effort logging; ignore write failures.
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::{Utf8Path, Utf8PathBuf};
    use rstest::{fixture, rstest};
    use tempfile::TempDir;

    const VALID_MANIFEST: &str = concat!(
        "---\n",
        "name: pdf-tools\n",
        "description: Use when filling PDF forms.\n",
        "---\n",
    );

    #[fixture]
    fn temp_dir() -> TempDir {
        TempDir::new().expect("temp dir creation succeeds")
    }

    fn skill(temp_dir: &TempDir, manifest: &str) -> Utf8PathBuf {
        let dir = Utf8Path::from_path(temp_dir.path())
            .expect("utf-8 temp dir")
            .join("pdf-tools");
        std::fs::create_dir_all(&dir).expect("mkdir skill");
        std::fs::write(dir.join("SKILL.md"), manifest).expect("write manifest");
        dir
    }

    fn cli_for(args: &[&str], config: &Utf8Path) -> Cli {
        let mut cli = Cli::parse_from(args);
        cli.config = Some(config.to_owned());
        cli
    }

    fn empty_config(temp_dir: &TempDir) -> Utf8PathBuf {
        let path = Utf8Path::from_path(temp_dir.path())
            .expect("utf-8 temp dir")
            .join("skillpack.toml");
        std::fs::write(&path, "").expect("write config");
        path
    }

    #[test]
    fn exit_code_for_run_result_returns_zero_on_success() {
        let mut stderr = Vec::new();
        let exit_code = exit_code_for_run_result(Ok(true), &mut stderr);
        assert_eq!(exit_code, 0);
        assert!(stderr.is_empty());
    }

    #[test]
    fn exit_code_for_run_result_returns_one_on_failed_validation() {
        let mut stderr = Vec::new();
        let exit_code = exit_code_for_run_result(Ok(false), &mut stderr);
        assert_eq!(exit_code, 1);
        assert!(stderr.is_empty());
    }

    #[test]
    fn exit_code_for_run_result_prints_error_and_returns_one() {
        let err = PackagerError::ManifestRead {
            path: Utf8PathBuf::from("missing/SKILL.md"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        };

        let mut stderr = Vec::new();
        let exit_code = exit_code_for_run_result(Err(err), &mut stderr);
        assert_eq!(exit_code, 1);

        let stderr_text = String::from_utf8(stderr).expect("stderr was not UTF-8");
        assert!(stderr_text.starts_with("error: failed to read manifest missing/SKILL.md"));
    }

    #[rstest]
    fn validate_reports_success(temp_dir: TempDir) {
        let dir = skill(&temp_dir, VALID_MANIFEST);
        let config = empty_config(&temp_dir);
        let cli = cli_for(&["skillpack", "validate", dir.as_str()], &config);

        let mut stdout = Vec::new();
        let passed = run(&cli, &mut stdout).expect("run succeeds");

        assert!(passed);
        assert_eq!(
            String::from_utf8(stdout).expect("utf-8"),
            "Validation passed\n"
        );
    }

    #[rstest]
    fn package_uses_the_configured_output_dir(temp_dir: TempDir) {
        let dir = skill(&temp_dir, VALID_MANIFEST);
        let base = Utf8Path::from_path(temp_dir.path()).expect("utf-8 temp dir");
        let out = base.join("configured-out");
        let config = base.join("skillpack.toml");
        std::fs::write(&config, format!("output_dir = \"{out}\"\n")).expect("write config");
        let cli = cli_for(&["skillpack", "package", dir.as_str()], &config);

        let mut stdout = Vec::new();
        let packaged = run(&cli, &mut stdout).expect("run succeeds");

        assert!(packaged);
        let archive = out.join("pdf-tools.zip");
        assert!(archive.is_file());
        assert_eq!(
            String::from_utf8(stdout).expect("utf-8"),
            format!("Packaged skill: {archive}\n")
        );
    }

    #[rstest]
    fn invalid_config_is_fatal(temp_dir: TempDir) {
        let dir = skill(&temp_dir, VALID_MANIFEST);
        let config = Utf8Path::from_path(temp_dir.path())
            .expect("utf-8 temp dir")
            .join("broken.toml");
        std::fs::write(&config, "unknown = 1\n").expect("write config");
        let cli = cli_for(&["skillpack", "validate", dir.as_str()], &config);

        let mut stdout = Vec::new();
        let result = run(&cli, &mut stdout);

        assert!(matches!(result, Err(PackagerError::Config(_))));
        assert!(stdout.is_empty());
    }
}
