//! Content-Type and Content-Encoding guessing from file names.

/// Result of guessing headers for a file name. Either part may be unknown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ContentType {
    pub mime: Option<&'static str>,
    pub encoding: Option<&'static str>,
}

const ENCODINGS: &[(&str, &str)] = &[
    (".gz", "gzip"),
    (".bz2", "bzip2"),
    (".xz", "xz"),
    (".br", "br"),
    (".Z", "compress"),
];

// mime_guess answers text/javascript and friends; keep the historical values.
const OVERRIDES: &[(&str, &str)] = &[
    ("js", "application/javascript"),
    ("css", "text/css"),
];

/// Guess the content type of `name` (a file name or path).
pub fn guess(name: &str) -> ContentType {
    let file_name = name.rsplit(['/', '\\']).next().unwrap_or(name);

    let (stem, encoding) = ENCODINGS
        .iter()
        .find_map(|(suffix, enc)| file_name.strip_suffix(suffix).map(|s| (s, Some(*enc))))
        .unwrap_or((file_name, None));

    let mime = match stem.rsplit_once('.') {
        Some((base, ext)) if !base.is_empty() => OVERRIDES
            .iter()
            .find(|(e, _)| e.eq_ignore_ascii_case(ext))
            .map(|(_, mime)| *mime)
            .or_else(|| mime_guess::from_ext(ext).first_raw()),
        _ => None,
    };

    ContentType { mime, encoding }
}
