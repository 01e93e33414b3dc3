use crate::error::ReportError;
use crate::types::RawEntry;
use std::path::Path;
use tracing::debug;

/// Reads the `server,key:value` data file.
pub fn read_input_file<P: AsRef<Path>>(path: P) -> Result<Vec<RawEntry>, ReportError> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path).map_err(|source| ReportError::Input {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(parse_rows(&contents))
}

/// Parses each non-blank line as a two-field comma-separated record.
///
/// Fields may be double-quoted, with `""` standing for a literal quote inside
/// them. Lines that do not hold exactly two fields, or that leave a quote
/// open, are skipped.
pub fn parse_rows(contents: &str) -> Vec<RawEntry> {
    contents
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .filter_map(|(idx, line)| match split_fields(line).as_deref() {
            Some([server, metric]) => Some(RawEntry::new(server.as_str(), metric.as_str())),
            _ => {
                debug!(line = idx + 1, "skipping row that is not server,metric");
                None
            }
        })
        .collect()
}

fn split_fields(line: &str) -> Option<Vec<String>> {
    let mut fields = Vec::new();
    let mut chars = line.chars().peekable();
    loop {
        while chars.next_if(|c| c.is_whitespace()).is_some() {}

        let mut field = String::new();
        if chars.next_if_eq(&'"').is_some() {
            loop {
                match chars.next() {
                    Some('"') if chars.next_if_eq(&'"').is_some() => field.push('"'),
                    Some('"') => break,
                    Some(c) => field.push(c),
                    None => return None,
                }
            }
        }

        let mut rest = String::new();
        while let Some(c) = chars.next_if(|c| *c != ',') {
            rest.push(c);
        }
        field.push_str(rest.trim());
        fields.push(field);

        if chars.next().is_none() {
            return Some(fields);
        }
    }
}
