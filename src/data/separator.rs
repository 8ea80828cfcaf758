//! Separator Detector Module
//! Guesses the field delimiter of a delimited text file from a raw prefix.

/// Delimiters the detector is allowed to propose.
pub const CANDIDATE_SEPARATORS: [char; 4] = [',', ';', '\t', '|'];

/// Guess the field delimiter from a raw byte sample.
///
/// The sample is decoded permissively (invalid bytes replaced) and each
/// candidate is scored by how consistently it splits the sample lines: the
/// winner is the candidate whose most common per-line occurrence count is
/// shared by the largest number of lines. Returns `None` when no candidate
/// appears at all; the caller decides the default.
pub fn detect_separator(sample: &[u8]) -> Option<char> {
    let text = String::from_utf8_lossy(sample);

    let mut lines: Vec<&str> = text.lines().filter(|l| !l.trim().is_empty()).collect();
    // The sample may end mid-line; ignore the truncated tail when there is
    // anything else to look at.
    if lines.len() > 1 && !text.ends_with('\n') {
        lines.pop();
    }
    if lines.is_empty() {
        return None;
    }

    let mut best: Option<(char, usize, usize)> = None;
    for cand in CANDIDATE_SEPARATORS {
        let counts: Vec<usize> = lines
            .iter()
            .map(|l| l.chars().filter(|c| *c == cand).count())
            .collect();

        // Modal non-zero occurrence count and how many lines share it.
        let mut modal: Option<(usize, usize)> = None;
        for &count in &counts {
            if count == 0 {
                continue;
            }
            let support = counts.iter().filter(|c| **c == count).count();
            match modal {
                Some((s, m)) if (support, count) <= (s, m) => {}
                _ => modal = Some((support, count)),
            }
        }

        if let Some((support, count)) = modal {
            match best {
                Some((_, s, c)) if (support, count) <= (s, c) => {}
                _ => best = Some((cand, support, count)),
            }
        }
    }

    best.map(|(cand, _, _)| cand)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_each_candidate() {
        for sep in CANDIDATE_SEPARATORS {
            let sample = format!(
                "name{sep}city{sep}score\nalice{sep}rome{sep}10\nbob{sep}milan{sep}20\ncarol{sep}turin{sep}30\n"
            );
            assert_eq!(detect_separator(sample.as_bytes()), Some(sep), "sep {sep:?}");
        }
    }

    #[test]
    fn consistency_beats_raw_frequency() {
        // Commas are frequent but inconsistent; semicolons split every line
        // the same way.
        let sample = b"a,,,,b;c\nd;e\nf;g\nh;i\n";
        assert_eq!(detect_separator(sample), Some(';'));
    }

    #[test]
    fn no_candidate_present() {
        assert_eq!(detect_separator(b"one two three\nfour five six\n"), None);
        assert_eq!(detect_separator(b""), None);
    }

    #[test]
    fn invalid_utf8_does_not_panic() {
        let sample = b"a;b;c\n\xff\xfe;x;y\n1;2;3\n";
        assert_eq!(detect_separator(sample), Some(';'));
    }
}
