use std::{
    env, fs,
    path::{Path, PathBuf},
    str::FromStr,
};

use anyhow::{bail, Context, Error, Result};
use xshell::{cmd, pushd};

enum Task {
    /// Format the tree and re-stage whatever the formatter touched.
    PreCommit,
    /// Install this binary as the git pre-commit hook.
    InstallPreCommit,
    /// Formatting check, lints and tests, in that order.
    Ci,
}

impl FromStr for Task {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pre-commit" => Ok(Task::PreCommit),
            "install-pre-commit" => Ok(Task::InstallPreCommit),
            "ci" => Ok(Task::Ci),
            _ => bail!("Unknown task: {} (expected pre-commit, install-pre-commit or ci)", s),
        }
    }
}

fn main() -> Result<()> {
    // Invoked as .git/hooks/pre-commit.
    if env::args().next().map(|it| it.contains("pre-commit")) == Some(true) {
        return run_precommit().context("failed to run pre-commit hook");
    }

    let task = match env::args().nth(1) {
        Some(task) => Task::from_str(&task)?,
        None => bail!("usage: cargo xtask <pre-commit|install-pre-commit|ci>"),
    };
    match task {
        Task::PreCommit => run_precommit().context("failed to run pre-commit hook"),
        Task::InstallPreCommit => {
            run_install_precommit().context("failed to install pre-commit hook")
        }
        Task::Ci => run_ci().context("ci failed"),
    }
}

fn run_precommit() -> Result<()> {
    let _dir = pushd(project_root())?;
    cmd!("cargo fmt").run()?;

    let staged = cmd!("git diff --diff-filter=MAR --name-only --cached").read()?;
    for file in staged.lines() {
        cmd!("git update-index --add {file}").run()?;
    }
    Ok(())
}

fn run_install_precommit() -> Result<()> {
    let hook_path = project_root()
        .join(".git/hooks")
        .join(format!("pre-commit{}", env::consts::EXE_SUFFIX));
    fs::copy(env::current_exe()?, &hook_path)
        .with_context(|| format!("copying hook to {}", hook_path.display()))?;
    Ok(())
}

fn run_ci() -> Result<()> {
    let _dir = pushd(project_root())?;
    cmd!("cargo fmt --all -- --check").run()?;
    cmd!("cargo clippy --workspace --all-targets -- -D warnings").run()?;
    cmd!("cargo test --workspace").run()?;
    Ok(())
}

fn project_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .ancestors()
        .nth(1)
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."))
}
