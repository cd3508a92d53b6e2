extern crate clap;
use clap::*;
use tracing_subscriber::EnvFilter;

mod cmd_gact;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let app = Command::new("gact")
        .version(crate_version!())
        .author(crate_authors!())
        .about("`gact` - Guide ACTivity prediction for CRISPR guide-target pairs")
        .propagate_version(true)
        .arg_required_else_help(true)
        .color(ColorChoice::Auto)
        .subcommand(cmd_gact::predict::make_subcommand())
        .subcommand(cmd_gact::encode::make_subcommand())
        .after_help(
            r###"Subcommands:

* predict - Score guide-target pairs with a classification/regression model pair
* encode  - One-hot encode pairs into the numeric layout the models consume

"###,
        );

    // Check which subcomamnd the user ran...
    match app.get_matches().subcommand() {
        Some(("predict", sub_matches)) => cmd_gact::predict::execute(sub_matches),
        Some(("encode", sub_matches)) => cmd_gact::encode::execute(sub_matches),
        _ => unreachable!(),
    }?;

    Ok(())
}
