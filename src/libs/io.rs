use crate::libs::error::PhaseError;
use crate::libs::variant::{LinkKind, VariantGraph};
use itertools::Itertools;
use std::collections::BTreeMap;
use std::io::{BufRead, BufReader, BufWriter, Write};

/// Opens `input` for line reading; `stdin` reads standard input and a `.gz`
/// extension is decompressed on the fly.
///
/// ```
/// use std::io::BufRead;
/// let reader = parhap::reader("tests/phase/chain.tsv").unwrap();
/// assert_eq!(reader.lines().count(), 5);
/// ```
pub fn reader(input: &str) -> std::io::Result<Box<dyn BufRead>> {
    let reader: Box<dyn BufRead> = if input == "stdin" {
        Box::new(BufReader::new(std::io::stdin()))
    } else {
        let path = std::path::Path::new(input);
        let file = std::fs::File::open(path)?;

        if path.extension() == Some(std::ffi::OsStr::new("gz")) {
            Box::new(BufReader::new(flate2::read::MultiGzDecoder::new(file)))
        } else {
            Box::new(BufReader::new(file))
        }
    };

    Ok(reader)
}

pub fn writer(output: &str) -> std::io::Result<Box<dyn Write>> {
    let writer: Box<dyn Write> = if output == "stdout" {
        Box::new(BufWriter::new(std::io::stdout()))
    } else {
        Box::new(BufWriter::new(std::fs::File::create(output)?))
    };

    Ok(writer)
}

/// One line of a link list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkRecord {
    pub lower: usize,
    pub upper: usize,
    pub same: usize,
    pub different: usize,
}

fn parse_field(field: &str, name: &str, line: usize) -> Result<usize, PhaseError> {
    field
        .parse::<usize>()
        .map_err(|e| PhaseError::parse(line, format!("invalid {} '{}': {}", name, field, e)))
}

/// Parses `<pos_a> <pos_b> <same> <different>`, separated by tabs or spaces.
/// Returns `None` for blank lines and `#` comments.
pub fn parse_link_line(text: &str, line: usize) -> Result<Option<LinkRecord>, PhaseError> {
    let text = text.trim();
    if text.is_empty() || text.starts_with('#') {
        return Ok(None);
    }

    let fields: Vec<&str> = text.split_whitespace().collect();
    if fields.len() != 4 {
        return Err(PhaseError::parse(
            line,
            format!("expected 4 fields, found {}", fields.len()),
        ));
    }

    let a = parse_field(fields[0], "position", line)?;
    let b = parse_field(fields[1], "position", line)?;
    if a == b {
        return Err(PhaseError::parse(line, format!("position {} linked to itself", a)));
    }

    Ok(Some(LinkRecord {
        lower: a.min(b),
        upper: a.max(b),
        same: parse_field(fields[2], "same-value weight", line)?,
        different: parse_field(fields[3], "different-value weight", line)?,
    }))
}

/// Builds a variant graph from a link list.
///
/// Repeated pairs accumulate their weights. Without `positions` the graph
/// holds `max index + 1` positions. Weights whose sums do not fit in `usize`,
/// per link or over the whole graph, are rejected.
pub fn read_links<R: BufRead>(reader: R, positions: Option<usize>) -> Result<VariantGraph, PhaseError> {
    let mut pairs: BTreeMap<(usize, usize), (usize, usize)> = BTreeMap::new();
    for (i, line) in reader.lines().enumerate() {
        let Some(record) = parse_link_line(&line?, i + 1)? else {
            continue;
        };
        let (lower, upper) = (record.lower, record.upper);
        let weights = pairs.entry((lower, upper)).or_default();
        *weights = weights
            .0
            .checked_add(record.same)
            .zip(weights.1.checked_add(record.different))
            .ok_or(PhaseError::LinkOverflow { lower, upper })?;
    }

    let needed = pairs.keys().map(|&(_, upper)| upper + 1).max().unwrap_or(0);
    let n = positions.unwrap_or(needed);
    if needed > n {
        return Err(PhaseError::PositionOutOfRange {
            index: needed - 1,
            len: n,
        });
    }

    let mut graph = VariantGraph::with_positions(n);
    for ((lower, upper), (same, different)) in pairs {
        let link = graph.create_link(lower, upper)?;
        link.set_weight(LinkKind::Same, same);
        link.set_weight(LinkKind::Different, different);
    }

    graph
        .checked_total_worst_case()
        .ok_or(PhaseError::WeightOverflow)?;
    Ok(graph)
}

/// Renders resolved values as a 0/1 string; unresolved positions print `-`.
pub fn format_haplotype(values: &[Option<u8>]) -> String {
    values
        .iter()
        .map(|v| match v {
            Some(value) => value.to_string(),
            None => "-".to_string(),
        })
        .join("")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_lines() {
        assert_eq!(parse_link_line("", 1).unwrap(), None);
        assert_eq!(parse_link_line("# comment", 1).unwrap(), None);
        assert_eq!(
            parse_link_line("3\t1\t5 2", 1).unwrap(),
            Some(LinkRecord {
                lower: 1,
                upper: 3,
                same: 5,
                different: 2
            })
        );

        let err = parse_link_line("1 2 x 0", 7).unwrap_err();
        assert_eq!(
            err.to_string(),
            "parse error at line 7: invalid same-value weight 'x': invalid digit found in string"
        );
        assert!(parse_link_line("1 2 3", 1).is_err());
        assert!(parse_link_line("2 2 3 0", 1).is_err());
    }

    #[test]
    fn read_accumulates_repeated_pairs() {
        let input = "0 1 2 0\n1\t0\t1\t4\n# done\n2 3 0 1\n";
        let graph = read_links(input.as_bytes(), None).unwrap();

        assert_eq!(graph.len(), 4);
        assert_eq!(graph.num_links(), 2);
        assert_eq!(graph.link_weight(LinkKind::Same, 0, 1).unwrap(), 3);
        assert_eq!(graph.link_weight(LinkKind::Different, 0, 1).unwrap(), 4);
    }

    #[test]
    fn read_with_declared_positions() {
        let graph = read_links("0 1 1 0\n".as_bytes(), Some(5)).unwrap();
        assert_eq!(graph.len(), 5);

        let err = read_links("0 6 1 0\n".as_bytes(), Some(5)).unwrap_err();
        assert!(matches!(err, PhaseError::PositionOutOfRange { index: 6, len: 5 }));
    }

    #[test]
    fn read_rejects_overflowing_repeats() {
        let input = format!("0 1 {} 0\n1 0 2 0\n", usize::MAX);
        let err = read_links(input.as_bytes(), None).unwrap_err();
        assert!(matches!(err, PhaseError::LinkOverflow { lower: 0, upper: 1 }));

        // Each weight fits on its own
        let input = format!("0 1 {} 0\n0 1 0 {}\n", usize::MAX, usize::MAX);
        let graph = read_links(input.as_bytes(), None).unwrap();
        assert_eq!(graph.link_max(0, 1), usize::MAX);
    }

    #[test]
    fn read_rejects_overflowing_total() {
        let input = format!("0 1 {} 0\n1 2 0 1\n", usize::MAX);
        let err = read_links(input.as_bytes(), None).unwrap_err();
        assert!(matches!(err, PhaseError::WeightOverflow));
        assert_eq!(err.to_string(), "total link weight overflows");
    }

    #[test]
    fn haplotype_string() {
        assert_eq!(format_haplotype(&[Some(0), Some(1), None, Some(1)]), "01-1");
        assert_eq!(format_haplotype(&[]), "");
    }
}
