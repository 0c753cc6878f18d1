//! Movetext utilities: SAN extraction and normalization.

use std::sync::LazyLock;

use regex::Regex;
use shakmaty::{san::San, Chess, Position};

static COMMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{[^}]*\}").expect("comment pattern"));

static VARIATION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\([^)]*\)").expect("variation pattern"));

static SAN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[KQRBN]?[a-h]?[1-8]?x?[a-h][1-8](?:=[QRBN])?[+#]?|O-O-O[+#]?|O-O[+#]?")
        .expect("san pattern")
});

/// Why a SAN sequence could not be replayed from the initial position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplayFailure {
    Unparseable { ply: usize, san: String },
    Illegal { ply: usize, san: String },
}

/// Pull SAN tokens out of movetext, skipping move numbers, comments and variations.
pub fn extract_sans(movetext: &str) -> Vec<String> {
    let no_comments = COMMENT_RE.replace_all(movetext, "");
    let no_variations = VARIATION_RE.replace_all(&no_comments, "");

    SAN_RE
        .find_iter(&no_variations)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Drop check, mate and annotation glyphs so "Bb5+" and "Bb5!?" compare as "Bb5".
pub fn strip_suffix(san: &str) -> &str {
    san.trim_end_matches(['+', '#', '!', '?'])
}

/// Replay `sans` from the standard start and return each move in canonical,
/// suffix-free SAN. Stops at the first move that fails to parse or is illegal.
pub fn canonical_line<S: AsRef<str>>(sans: &[S]) -> Result<Vec<String>, ReplayFailure> {
    let mut pos = Chess::default();
    let mut line = Vec::with_capacity(sans.len());

    for (i, raw) in sans.iter().enumerate() {
        let raw = raw.as_ref();
        let ply = i + 1;

        let san: San = strip_suffix(raw).parse().map_err(|_| ReplayFailure::Unparseable {
            ply,
            san: raw.to_string(),
        })?;

        let mv = san.to_move(&pos).map_err(|_| ReplayFailure::Illegal {
            ply,
            san: raw.to_string(),
        })?;

        line.push(San::from_move(&pos, mv.clone()).to_string());
        pos.play_unchecked(mv);
    }

    Ok(line)
}
