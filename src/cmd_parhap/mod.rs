pub mod phase;
pub mod stat;

use clap::{value_parser, Arg, ArgMatches};
use parhap::libs::variant::VariantGraph;

pub fn arg_infile() -> Arg {
    Arg::new("infile")
        .required(true)
        .num_args(1)
        .index(1)
        .help("Link list: <pos_a> <pos_b> <same> <different> per line. [stdin] for standard input")
}

pub fn arg_positions() -> Arg {
    Arg::new("positions")
        .long("positions")
        .num_args(1)
        .value_parser(value_parser!(usize))
        .help("Number of positions. Default: largest index in the list + 1")
}

pub fn arg_start() -> Arg {
    Arg::new("start")
        .long("start")
        .short('s')
        .num_args(1)
        .default_value("0")
        .value_parser(value_parser!(usize))
        .help("Start position, fixed to 0 at the root of the search")
}

/// Reads the link list named by `infile`.
pub fn load_graph(args: &ArgMatches) -> anyhow::Result<VariantGraph> {
    let infile = args.get_one::<String>("infile").unwrap();
    let positions = args.get_one::<usize>("positions").copied();

    let reader = parhap::reader(infile)?;
    let graph = parhap::libs::io::read_links(reader, positions)?;
    Ok(graph)
}
