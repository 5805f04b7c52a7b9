use std::collections::BTreeMap;

/// Two-digit NAICS sector code → readable industry title.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndustryReference {
    sectors: BTreeMap<String, String>,
}

impl IndustryReference {
    /// Build the sector mapping from raw `(Code, Title)` pairs of the
    /// classification table.
    ///
    /// Only codes of exactly two characters are kept; this drops the finer
    /// 3–6 digit subdivisions as well as ranged codes such as `31-33`.
    pub fn from_rows<I>(rows: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let sectors = rows
            .into_iter()
            .filter_map(|(code, title)| {
                let code = code.trim();
                (code.chars().count() == 2).then(|| (code.to_string(), clean_title(&title)))
            })
            .collect();
        IndustryReference { sectors }
    }

    pub fn title(&self, code: &str) -> Option<&str> {
        self.sectors.get(code).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.sectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sectors.is_empty()
    }
}

/// Drop the trailing "T" footnote marker and shorten "and" to "&".
fn clean_title(raw: &str) -> String {
    let trimmed = raw.trim();
    let trimmed = trimmed.strip_suffix('T').unwrap_or(trimmed).trim_end();
    trimmed
        .split(' ')
        .map(|word| if word == "and" { "&" } else { word })
        .collect::<Vec<_>>()
        .join(" ")
}
