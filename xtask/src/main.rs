use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::fs;
use std::process::Command;

#[derive(Parser)]
#[command(author, version, about = "Project automation commands", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run cargo nextest with default configuration
    Nextest {
        #[arg(long)]
        profile: Option<String>,
        #[arg(long)]
        release: bool,
    },
    /// Write shell completion scripts for shellhere into target/completions
    Completions,
}

const COMPLETION_SHELLS: [(&str, &str); 4] = [
    ("bash", "shellhere.bash"),
    ("zsh", "_shellhere"),
    ("fish", "shellhere.fish"),
    ("powershell", "_shellhere.ps1"),
];

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Nextest { profile, release } => run_nextest(profile, release)?,
        Commands::Completions => write_completions()?,
    }
    Ok(())
}

fn run_nextest(profile: Option<String>, release: bool) -> Result<()> {
    let mut cmd = Command::new("cargo");
    cmd.arg("nextest").arg("run").arg("--workspace");
    if let Some(profile) = profile {
        cmd.arg("--profile").arg(profile);
    }
    if release {
        cmd.arg("--release");
    }
    let status = cmd.status()?;
    if !status.success() {
        anyhow::bail!("cargo nextest run failed");
    }
    Ok(())
}

fn write_completions() -> Result<()> {
    let metadata = cargo_metadata::MetadataCommand::new()
        .no_deps()
        .exec()
        .context("failed to read cargo metadata")?;
    let out_dir = metadata.target_directory.join("completions");
    fs::create_dir_all(&out_dir)
        .with_context(|| format!("failed to create {out_dir}"))?;

    for (shell, file_name) in COMPLETION_SHELLS {
        let output = Command::new("cargo")
            .args(["run", "--quiet", "-p", "shellhere", "--", "completions", shell])
            .output()?;
        if !output.status.success() {
            anyhow::bail!("generating {shell} completions failed");
        }
        let path = out_dir.join(file_name);
        fs::write(&path, output.stdout).with_context(|| format!("failed to write {path}"))?;
        println!("wrote {path}");
    }
    Ok(())
}
