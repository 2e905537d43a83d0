use once_cell::sync::Lazy;
use regex::Regex;

static CITATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"id=([a-f0-9-]+), city_name=(.*)\)").expect("citation pattern")
});

/// A destination the assistant used to build its answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Citation {
    pub id: String,
    pub label: String,
}

impl Citation {
    pub fn href(&self) -> String {
        format!("/destinations/{}", self.id)
    }
}

pub fn parse_line(line: &str) -> Option<Citation> {
    let captures = CITATION.captures(line)?;
    Some(Citation {
        id: captures[1].to_string(),
        label: captures[2].to_string(),
    })
}

/// One citation per matching line; everything else is ignored.
pub fn parse(sources: &str) -> Vec<Citation> {
    sources.split('\n').filter_map(parse_line).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matching_line_yields_one_link() {
        let citations =
            parse("Document(id=3f2a-9c01-bb, city_name=San Sebastián)");
        assert_eq!(
            citations,
            vec![Citation {
                id: "3f2a-9c01-bb".into(),
                label: "San Sebastián".into()
            }]
        );
        assert_eq!(citations[0].href(), "/destinations/3f2a-9c01-bb");
    }

    #[test]
    fn other_lines_are_dropped() {
        assert_eq!(parse_line("Retrieved 2 documents"), None);
        assert_eq!(parse_line("id=XYZ, city_name=Oslo)"), None);
        assert_eq!(parse_line("id=abc, city_name=Oslo"), None);
        let citations = parse("header\n(id=ab12, city_name=Oslo)\n\n(id=cd34, city_name=Rome)");
        let labels: Vec<_> = citations.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, vec!["Oslo", "Rome"]);
    }

    #[test]
    fn empty_sources() {
        assert!(parse("").is_empty());
    }
}
