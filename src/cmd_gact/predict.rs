use clap::*;
use tracing::info;

use gact::libs::io;
use gact::libs::model::{CommandModel, ModelMeta};
use gact::libs::predictor::Predictor;

// Create clap subcommand arguments
pub fn make_subcommand() -> Command {
    Command::new("predict")
        .about("Scores guide-target pairs for activity")
        .after_help(
            r###"
This command evaluates each guide-target pair with a two-stage decision:
the classification model decides whether a pair is active at all, and the
regression model scores the active ones. Inactive pairs get activity 0.

Input is a TSV file; col 1 is the target with context (context_nt extra
bases on each side of the guide window), col 2 is the guide. Output is
the input plus an appended activity column.

Each model directory must carry assets.extra/context_nt.arg and
assets.extra/default_threshold.arg next to the serialized model. The
network itself is run by an external program given with --runner; it is
invoked as `<runner> <model_dir>`, reads one flattened one-hot encoding
per stdin line (tab-separated floats) and prints one score per line.

Examples:
1. Score pairs with default thresholds:
   gact predict cls_model/ reg_model/ pairs.tsv --runner "python3 run_model.py"

2. Override the classification threshold:
   gact predict cls_model/ reg_model/ pairs.tsv --runner run_model --class-threshold 0.7
"###,
        )
        .arg(
            Arg::new("cls_model")
                .required(true)
                .index(1)
                .help("Directory holding the classification model"),
        )
        .arg(
            Arg::new("reg_model")
                .required(true)
                .index(2)
                .help("Directory holding the regression model"),
        )
        .arg(
            Arg::new("infile")
                .required(true)
                .index(3)
                .help("Input TSV of guide-target pairs. [stdin] for screen"),
        )
        .arg(
            Arg::new("runner")
                .long("runner")
                .required(true)
                .num_args(1)
                .help("External command hosting the serialized models"),
        )
        .arg(
            Arg::new("class-threshold")
                .long("class-threshold")
                .value_parser(value_parser!(f64))
                .help("Call a pair active when classifier output >= this, in [0,1]"),
        )
        .arg(
            Arg::new("regress-threshold")
                .long("regress-threshold")
                .value_parser(value_parser!(f64))
                .help("Call a pair highly active when shifted regression output >= this, >= 0"),
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
    let cls_dir = args.get_one::<String>("cls_model").unwrap();
    let reg_dir = args.get_one::<String>("reg_model").unwrap();
    let infile = args.get_one::<String>("infile").unwrap();
    let runner = args.get_one::<String>("runner").unwrap();
    let class_threshold = args.get_one::<f64>("class-threshold").copied();
    let regress_threshold = args.get_one::<f64>("regress-threshold").copied();
    let mut writer = gact::writer(args.get_one::<String>("outfile").unwrap());

    //----------------------------
    // Init
    //----------------------------
    let cls_meta = ModelMeta::from_dir(cls_dir)?;
    let reg_meta = ModelMeta::from_dir(reg_dir)?;

    let mut predictor = Predictor::new(
        Box::new(CommandModel::new(runner, cls_dir)?),
        cls_meta,
        Box::new(CommandModel::new(runner, reg_dir)?),
        reg_meta,
        class_threshold,
        regress_threshold,
    )?;

    //----------------------------
    // Process
    //----------------------------
    let pairs = io::read_pairs(gact::reader(infile))?;
    info!("read {} pairs from {}", pairs.len(), infile);

    // Check that each target carries the amount of context the models
    // were trained with
    for pair in &pairs {
        pair.check_context(predictor.context_nt())?;
    }

    // Start position is irrelevant for a one-shot batch; memoization
    // still deduplicates repeated pairs within it
    let preds = predictor.compute_activity(-1, &pairs)?;

    //----------------------------
    // Output
    //----------------------------
    io::write_predictions(&mut writer, &pairs, &preds)?;

    Ok(())
}
