use crate::libs::error::GactError;
use crate::libs::pair::Pair;

/// One encoded position: 4 target channels then 4 guide channels,
/// channel order A, C, G, T.
pub type Row = [f32; 8];

/// Full numeric encoding of a pair, one row per target position
pub type Encoded = Vec<Row>;

/// Real bases represented by an IUPAC single-letter code.
///
/// Channel indices: A=0, C=1, G=2, T=3.
fn iupac_channels(base: char) -> Option<&'static [usize]> {
    let channels: &[usize] = match base.to_ascii_uppercase() {
        'A' => &[0],
        'C' => &[1],
        'G' => &[2],
        'T' => &[3],
        'M' => &[0, 1],
        'R' => &[0, 2],
        'W' => &[0, 3],
        'S' => &[1, 2],
        'Y' => &[1, 3],
        'K' => &[2, 3],
        'V' => &[0, 1, 2],
        'H' => &[0, 1, 3],
        'D' => &[0, 2, 3],
        'B' => &[1, 2, 3],
        'N' => &[0, 1, 2, 3],
        _ => return None,
    };
    Some(channels)
}

/// One-hot (or fractional, for ambiguity codes) encoding of a single base.
///
/// Each represented real base gets weight `1/|real_bases|`, so the vector
/// always sums to 1. Returns `None` for characters outside the alphabet.
pub fn onehot(base: char) -> Option<[f32; 4]> {
    let channels = iupac_channels(base)?;
    let weight = 1.0 / channels.len() as f32;
    let mut v = [0.0f32; 4];
    for &ch in channels {
        v[ch] = weight;
    }
    Some(v)
}

fn onehot_checked(base: char, seq: &str) -> Result<[f32; 4], GactError> {
    onehot(base).ok_or_else(|| GactError::BadBase {
        base,
        seq: seq.to_string(),
    })
}

/// Encodes a pair into the model input layout.
///
/// Rows run 5'->3': `context_nt` context-only rows (guide half zero),
/// `guide_len` paired rows, `context_nt` trailing context-only rows.
/// The models were trained on exactly this layout, so row order is part
/// of the contract.
pub fn encode(pair: &Pair, context_nt: usize) -> Result<Encoded, GactError> {
    pair.check_context(context_nt)?;

    let target: Vec<char> = pair.target.chars().collect();
    let guide: Vec<char> = pair.guide.chars().collect();

    let mut rows: Encoded = Vec::with_capacity(target.len());

    for pos in 0..context_nt {
        let v_target = onehot_checked(target[pos], &pair.target)?;
        rows.push(paired_row(v_target, [0.0; 4]));
    }
    for pos in 0..guide.len() {
        let v_target = onehot_checked(target[context_nt + pos], &pair.target)?;
        let v_guide = onehot_checked(guide[pos], &pair.guide)?;
        rows.push(paired_row(v_target, v_guide));
    }
    for pos in 0..context_nt {
        let v_target = onehot_checked(target[context_nt + guide.len() + pos], &pair.target)?;
        rows.push(paired_row(v_target, [0.0; 4]));
    }

    Ok(rows)
}

fn paired_row(target: [f32; 4], guide: [f32; 4]) -> Row {
    [
        target[0], target[1], target[2], target[3], guide[0], guide[1], guide[2], guide[3],
    ]
}
