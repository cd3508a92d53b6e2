use clap::*;
use std::io::Write;

use gact::libs::io;
use gact::libs::model;
use gact::libs::onehot;

// Create clap subcommand arguments
pub fn make_subcommand() -> Command {
    Command::new("encode")
        .about("One-hot encodes guide-target pairs")
        .after_help(
            r###"
This command runs only the sequence encoder and writes the numeric input
layout the activity models consume, one pair per line.

Each position of the target becomes 8 channels: 4 for the target base
(A, C, G, T) and 4 for the guide base, zero outside the guide window.
IUPAC ambiguity codes encode fractionally (e.g. N -> 0.25 per channel).
The line is the row-major flattening of the (2*context_nt + guide_len, 8)
matrix, tab-separated -- exactly what a --runner process of `gact predict`
receives on stdin.

Examples:
1. Encode pairs with 20 nt of context on each side:
   gact encode pairs.tsv --context-nt 20

2. Encode bare guide-length targets:
   gact encode pairs.tsv --context-nt 0 -o encoded.tsv
"###,
        )
        .arg(
            Arg::new("infile")
                .required(true)
                .index(1)
                .help("Input TSV of guide-target pairs. [stdin] for screen"),
        )
        .arg(
            Arg::new("context-nt")
                .long("context-nt")
                .value_parser(value_parser!(usize))
                .default_value("20")
                .help("Bases of target context on each side of the guide window"),
        )
        .arg(
            Arg::new("outfile")
                .long("outfile")
                .short('o')
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
    let infile = args.get_one::<String>("infile").unwrap();
    let context_nt = *args.get_one::<usize>("context-nt").unwrap();
    let mut writer = gact::writer(args.get_one::<String>("outfile").unwrap());

    //----------------------------
    // Process
    //----------------------------
    let pairs = io::read_pairs(gact::reader(infile))?;

    for pair in &pairs {
        let encoded = onehot::encode(pair, context_nt)?;
        writer.write_fmt(format_args!("{}\n", model::flatten(&encoded)))?;
    }

    Ok(())
}
