//! Ordered download candidates.

use super::asset::ImageFormat;
use super::sticker::StickerId;

/// Size parameter requested for sticker copies.
pub const STICKER_COPY_SIZE: u32 = 160;

/// Extensions tried when copying a sticker, in order.
const STICKER_COPY_FORMATS: [ImageFormat; 4] = [
    ImageFormat::Png,
    ImageFormat::Gif,
    ImageFormat::WebP,
    ImageFormat::Jpeg,
];

/// One remote location that may hold the asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Absolute HTTP(S) URL.
    pub url: String,
    /// Format the remote host is expected to serve at this URL.
    pub expected: ImageFormat,
}

impl Candidate {
    /// Creates a new candidate.
    #[must_use]
    pub fn new(url: impl Into<String>, expected: ImageFormat) -> Self {
        Self {
            url: url.into(),
            expected,
        }
    }
}

/// Candidates tried strictly in insertion order; the first success wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CandidateSource {
    candidates: Vec<Candidate>,
}

impl CandidateSource {
    /// Creates an empty source.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            candidates: Vec::new(),
        }
    }

    /// Builds the copy candidates for an existing sticker on `cdn_base`.
    #[must_use]
    pub fn for_sticker(id: &StickerId, cdn_base: &str) -> Self {
        let base = cdn_base.trim_end_matches('/');
        STICKER_COPY_FORMATS
            .into_iter()
            .map(|format| {
                let url = format!(
                    "{base}/stickers/{id}.{}?size={STICKER_COPY_SIZE}",
                    format.extension()
                );
                Candidate::new(url, format)
            })
            .collect()
    }

    /// Appends a candidate.
    #[must_use]
    pub fn push(mut self, candidate: Candidate) -> Self {
        self.candidates.push(candidate);
        self
    }

    /// Returns the candidates in order.
    #[must_use]
    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    /// Iterates over the candidates in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Candidate> {
        self.candidates.iter()
    }

    /// Number of candidates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    /// Returns true if there is nothing to try.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

impl FromIterator<Candidate> for CandidateSource {
    fn from_iter<I: IntoIterator<Item = Candidate>>(iter: I) -> Self {
        Self {
            candidates: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a CandidateSource {
    type Item = &'a Candidate;
    type IntoIter = std::slice::Iter<'a, Candidate>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preserves_insertion_order() {
        let source = CandidateSource::new()
            .push(Candidate::new("https://a/1.png", ImageFormat::Png))
            .push(Candidate::new("https://a/1.gif", ImageFormat::Gif));

        let urls: Vec<_> = source.iter().map(|c| c.url.as_str()).collect();
        assert_eq!(urls, vec!["https://a/1.png", "https://a/1.gif"]);
        assert_eq!(source.len(), 2);
    }

    #[test]
    fn test_sticker_candidates_order_and_urls() {
        let id = StickerId::new("749054660769218631").unwrap();
        let source = CandidateSource::for_sticker(&id, "https://media.example/");

        let urls: Vec<_> = source.iter().map(|c| c.url.as_str()).collect();
        assert_eq!(
            urls,
            vec![
                "https://media.example/stickers/749054660769218631.png?size=160",
                "https://media.example/stickers/749054660769218631.gif?size=160",
                "https://media.example/stickers/749054660769218631.webp?size=160",
                "https://media.example/stickers/749054660769218631.jpg?size=160",
            ]
        );
        assert_eq!(source.candidates()[3].expected, ImageFormat::Jpeg);
    }

    #[test]
    fn test_collect_from_iterator() {
        let source: CandidateSource = ["x", "y"]
            .into_iter()
            .map(|u| Candidate::new(u, ImageFormat::Unknown))
            .collect();
        assert_eq!(source.candidates()[1].url, "y");
        assert!(!source.is_empty());
    }
}
