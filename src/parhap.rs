extern crate clap;
use clap::*;

mod cmd_parhap;

fn main() -> anyhow::Result<()> {
    let app = Command::new("parhap")
        .version(crate_version!())
        .author(crate_authors!())
        .about("`parhap` - Parallel branch-and-bound haplotype phasing")
        .propagate_version(true)
        .arg_required_else_help(true)
        .color(ColorChoice::Auto)
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Log search progress to stderr"),
        )
        .subcommand(cmd_parhap::phase::make_subcommand())
        .subcommand(cmd_parhap::stat::make_subcommand())
        .after_help(
            r###"Subcommands:

* phase - Resolve a haplotype from a link list
* stat  - Summarize the variant graph of a link list

Log verbosity follows RUST_LOG; --verbose raises it to debug.

"###,
        );

    let matches = app.get_matches();
    init_logging(matches.get_flag("verbose"));

    // Check which subcommand the user ran...
    match matches.subcommand() {
        Some(("phase", sub_matches)) => cmd_parhap::phase::execute(sub_matches),
        Some(("stat", sub_matches)) => cmd_parhap::stat::execute(sub_matches),
        _ => unreachable!(),
    }?;

    Ok(())
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
