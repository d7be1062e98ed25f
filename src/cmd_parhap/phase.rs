use clap::*;
use parhap::libs::io::format_haplotype;
use parhap::libs::search::{EngineConfig, SearchEngine};
use std::io::Write;

// Create clap subcommand arguments
pub fn make_subcommand() -> Command {
    Command::new("phase")
        .about("Resolve a haplotype from a link list")
        .after_help(
            r###"
Searches for the 0/1 assignment of every position that pays the least link
weight, using a parallel branch-and-bound tree search.

Input format:
* One link per line: <pos_a> <pos_b> <same> <different>
  * same      - evidence that the two positions carry the same value
  * different - evidence that they carry different values
* Columns split on tabs or spaces; '#' lines are comments
* Repeated pairs add up

Output format:
* hap (default): one line of 0/1, ordered by position
* tsv: position, haplotype index and value per line

Notes:
* The start position is fixed to 0; flipping every value gives an equally good answer
* --branch caps how many frontier nodes are evaluated at once
* --parallel is the total thread budget, shared with the bound computation
* Use --verbose to log each search level to stderr
* Both values of a position without links cost the same, so neither is pruned;
  every isolated position doubles the search tree. A --positions far above the
  largest linked index makes the search exponentially slow
* Weights that overflow when summed are rejected

Examples:
1. Phase a link list:
   parhap phase links.tsv

2. Start from position 3 with 8 threads:
   parhap phase links.tsv --start 3 --parallel 8

3. Tabular output:
   parhap phase links.tsv --style tsv -o phased.tsv
"###,
        )
        .arg(super::arg_infile())
        .arg(super::arg_positions())
        .arg(super::arg_start())
        .arg(
            Arg::new("branch")
                .long("branch")
                .short('b')
                .num_args(1)
                .default_value("1")
                .value_parser(value_parser!(usize))
                .help("Frontier nodes evaluated in parallel"),
        )
        .arg(
            Arg::new("parallel")
                .long("parallel")
                .short('p')
                .num_args(1)
                .default_value("1")
                .value_parser(value_parser!(usize))
                .help("Number of threads for parallel processing"),
        )
        .arg(
            Arg::new("style")
                .long("style")
                .value_parser(["hap", "tsv"])
                .default_value("hap")
                .help("Output style. [hap] for a 0/1 line, [tsv] for a table"),
        )
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
    //----------------------------
    // Args
    //----------------------------
    let opt_start = *args.get_one::<usize>("start").unwrap();
    let opt_branch = *args.get_one::<usize>("branch").unwrap();
    let opt_parallel = *args.get_one::<usize>("parallel").unwrap();
    let opt_style = args.get_one::<String>("style").unwrap();

    let config = EngineConfig::new(opt_branch, opt_parallel)?;
    let graph = super::load_graph(args)?;

    //----------------------------
    // Search
    //----------------------------
    let mut engine = SearchEngine::new(graph, config);
    if !engine.graph().is_empty() {
        engine.set_start(opt_start)?;
    }
    engine.explore()?;

    //----------------------------
    // Output
    //----------------------------
    let mut writer = parhap::writer(args.get_one::<String>("outfile").unwrap())?;
    let graph = engine.graph();

    match opt_style.as_str() {
        "tsv" => {
            for idx in 0..graph.len() {
                let value = format_haplotype(&[graph.resolved(idx)]);
                writer.write_fmt(format_args!(
                    "{}\t{}\t{}\n",
                    idx,
                    graph.position_haplo_index(idx),
                    value
                ))?;
            }
        }
        _ => {
            writer.write_fmt(format_args!("{}\n", format_haplotype(&graph.haplotype())))?;
        }
    }
    writer.flush()?;

    Ok(())
}
