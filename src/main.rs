use clap::{Parser, Subcommand};

mod cmd;
mod config;
mod income;
mod tax;

#[derive(Debug, Parser)]
#[command(name = "itaxc")]
#[command(about = "Indian Income Tax Calculator: new vs old regime")]
#[command(version)]
struct Opts {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Calculate tax for an annual income under each regime and compare
    Calc(cmd::calc::CalcCommand),
    /// Enter incomes one per line and compare regimes for each
    Interactive(cmd::interactive::InteractiveCommand),
    /// Show the slab tables of each regime
    Slabs(cmd::slabs::SlabsCommand),
    /// Print the regime file format
    Schema(cmd::schema::SchemaCommand),
}

fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();

    let opts = Opts::parse();
    match opts.cmd {
        Command::Calc(calc) => calc.exec(),
        Command::Interactive(interactive) => interactive.exec(),
        Command::Slabs(slabs) => slabs.exec(),
        Command::Schema(schema) => schema.exec(),
    }
}
