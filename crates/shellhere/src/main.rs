use clap::Parser;

fn main() -> anyhow::Result<()> {
    let cli = shellhere::cli::Cli::parse();
    shellhere::init(cli.verbose);

    shellhere::cli::run(cli)
}
