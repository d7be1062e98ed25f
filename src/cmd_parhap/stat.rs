use clap::*;
use itertools::Itertools;
use parhap::libs::search::PositionSelector;
use std::io::Write;

// Create clap subcommand arguments
pub fn make_subcommand() -> Command {
    Command::new("stat")
        .about("Summarize the variant graph of a link list")
        .after_help(
            r###"
Prints key-value pairs describing the graph built from a link list.

Output format:
  positions	4
  links	3
  worst_case	9
  start	0
  start_worst_case	5
  order	0,1,2,3

* worst_case is the sum over links of max(same, different), the bound the
  search starts from
* order is the branching order used by `parhap phase`

Examples:
1. Graph summary:
   parhap stat links.tsv

2. Branching order from another start:
   parhap stat links.tsv --start 2
"###,
        )
        .arg(super::arg_infile())
        .arg(super::arg_positions())
        .arg(super::arg_start())
        .arg(
            Arg::new("outfile")
                .short('o')
                .long("outfile")
                .num_args(1)
                .default_value("stdout")
                .help("Output filename. [stdout] for screen"),
        )
}

// command implementation
pub fn execute(args: &ArgMatches) -> anyhow::Result<()> {
    let opt_start = *args.get_one::<usize>("start").unwrap();
    let graph = super::load_graph(args)?;
    let selector = PositionSelector::new(&graph, opt_start)?;

    let mut writer = parhap::writer(args.get_one::<String>("outfile").unwrap())?;
    writer.write_fmt(format_args!("positions\t{}\n", graph.len()))?;
    writer.write_fmt(format_args!("links\t{}\n", graph.num_links()))?;
    writer.write_fmt(format_args!("worst_case\t{}\n", graph.total_worst_case()))?;
    if !graph.is_empty() {
        writer.write_fmt(format_args!("start\t{}\n", opt_start))?;
        writer.write_fmt(format_args!(
            "start_worst_case\t{}\n",
            graph.position_worst_case(opt_start)
        ))?;
    }
    writer.write_fmt(format_args!(
        "order\t{}\n",
        selector.order().iter().join(",")
    ))?;
    writer.flush()?;

    Ok(())
}
