use std::io::{BufRead, BufReader, BufWriter, Write};

use crate::libs::error::GactError;
use crate::libs::pair::Pair;

/// ```
/// use std::io::BufRead;
/// let reader = gact::reader("tests/data/pairs.tsv");
/// assert_eq!(reader.lines().collect::<Vec<_>>().len(), 3);
/// ```
pub fn reader(input: &str) -> Box<dyn BufRead> {
    let reader: Box<dyn BufRead> = if input == "stdin" {
        Box::new(BufReader::new(std::io::stdin()))
    } else {
        let path = std::path::Path::new(input);
        let file = match std::fs::File::open(path) {
            Err(why) => panic!("could not open {}: {}", path.display(), why),
            Ok(file) => file,
        };

        if path.extension() == Some(std::ffi::OsStr::new("gz")) {
            Box::new(BufReader::new(flate2::read::MultiGzDecoder::new(file)))
        } else {
            Box::new(BufReader::new(file))
        }
    };

    reader
}

pub fn writer(output: &str) -> Box<dyn Write> {
    let writer: Box<dyn Write> = if output == "stdout" {
        Box::new(BufWriter::new(std::io::stdout()))
    } else {
        Box::new(BufWriter::new(std::fs::File::create(output).unwrap()))
    };

    writer
}

/// Reads guide-target pairs from TSV.
///
/// Col 1 is the target with context, col 2 is the guide. The guide must
/// match the center of the target, so a target shorter than its guide is
/// malformed.
pub fn read_pairs<R: BufRead>(reader: R) -> Result<Vec<Pair>, GactError> {
    let mut pairs = vec![];

    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        if line.is_empty() {
            continue;
        }

        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() != 2 {
            return Err(GactError::InputFormat(format!(
                "line {}: expected 2 tab-separated columns, got {}",
                i + 1,
                fields.len()
            )));
        }

        let (target, guide) = (fields[0], fields[1]);
        if target.len() < guide.len() {
            return Err(GactError::InputFormat(format!(
                "line {}: target with context is shorter than guide",
                i + 1
            )));
        }

        pairs.push(Pair::new(target, guide));
    }

    Ok(pairs)
}

/// Writes the input columns plus one appended prediction column,
/// order-preserving.
pub fn write_predictions<W: Write>(
    mut writer: W,
    pairs: &[Pair],
    preds: &[f64],
) -> Result<(), GactError> {
    for (pair, pred) in pairs.iter().zip(preds.iter()) {
        writer.write_fmt(format_args!("{}\t{}\t{}\n", pair.target, pair.guide, pred))?;
    }
    Ok(())
}
