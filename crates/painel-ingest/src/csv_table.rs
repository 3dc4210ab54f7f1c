use std::collections::BTreeMap;

use csv::ReaderBuilder;

use painel_model::SourceSpec;

use crate::error::{IngestError, Result};

/// Raw text table read from a CSV source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CsvTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl CsvTable {
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|header| header == name)
    }

    /// Values of one column, in row order.
    pub fn column(&self, idx: usize) -> Vec<String> {
        self.rows
            .iter()
            .map(|row| row.get(idx).cloned().unwrap_or_default())
            .collect()
    }
}

fn normalize_header(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('\u{feff}').trim();
    let mut parts = trimmed.split_whitespace();
    let mut normalized = String::new();
    if let Some(first) = parts.next() {
        normalized.push_str(first);
        for part in parts {
            normalized.push(' ');
            normalized.push_str(part);
        }
    }
    normalized
}

fn normalize_cell(raw: &str) -> String {
    raw.trim().trim_matches('\u{feff}').to_string()
}

/// Makes header names unique and non-empty.
///
/// Blank headers become `Coluna <n>` (1-based position); repeated names
/// get `.1`, `.2`, ... suffixes in order of appearance.
pub(crate) fn dedupe_headers(headers: Vec<String>) -> Vec<String> {
    let mut seen: BTreeMap<String, usize> = BTreeMap::new();
    let mut unique = Vec::with_capacity(headers.len());
    for (idx, header) in headers.into_iter().enumerate() {
        let base = if header.is_empty() {
            format!("Coluna {}", idx + 1)
        } else {
            header
        };
        let mut candidate = base.clone();
        while let Some(count) = seen.get_mut(&candidate) {
            *count += 1;
            candidate = format!("{base}.{count}");
        }
        seen.insert(candidate.clone(), 0);
        unique.push(candidate);
    }
    unique
}

/// Reads CSV bytes into a text table.
///
/// The first `skip_rows` records are discarded, the next non-blank record is
/// the header row and every following non-blank record becomes a data row,
/// padded or truncated to the header width. Invalid UTF-8 is replaced
/// rather than rejected.
pub fn read_csv_table(bytes: &[u8], spec: &SourceSpec) -> Result<CsvTable> {
    if !spec.delimiter.is_ascii() {
        return Err(IngestError::Delimiter {
            location: spec.location.clone(),
            delimiter: spec.delimiter,
        });
    }
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(spec.delimiter as u8)
        .from_reader(bytes);

    let mut headers: Option<Vec<String>> = None;
    let mut rows = Vec::new();
    for (idx, record) in reader.byte_records().enumerate() {
        let record = record.map_err(|source| IngestError::Csv {
            location: spec.location.clone(),
            source,
        })?;
        if idx < spec.skip_rows {
            continue;
        }
        let row: Vec<String> = record
            .iter()
            .map(|field| normalize_cell(&String::from_utf8_lossy(field)))
            .collect();
        if row.iter().all(String::is_empty) {
            continue;
        }
        match &headers {
            None => {
                headers = Some(row.iter().map(|value| normalize_header(value)).collect());
            }
            Some(names) => {
                let mut padded = row;
                padded.resize(names.len(), String::new());
                rows.push(padded);
            }
        }
    }

    let Some(headers) = headers else {
        return Ok(CsvTable::default());
    };
    Ok(CsvTable {
        headers: dedupe_headers(headers),
        rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headers_are_trimmed_and_collapsed() {
        assert_eq!(normalize_header("\u{feff}  Valor   Total "), "Valor Total");
        assert_eq!(normalize_header("   "), "");
    }

    #[test]
    fn duplicate_and_blank_headers_become_unique() {
        let headers = vec![
            "Valor".to_string(),
            String::new(),
            "Valor".to_string(),
            "Valor".to_string(),
        ];
        assert_eq!(
            dedupe_headers(headers),
            vec!["Valor", "Coluna 2", "Valor.1", "Valor.2"]
        );
    }

    #[test]
    fn skips_banner_rows_and_blank_lines() {
        let csv = "Relatório de Contratos,,\n,,\nSetor , Valor,Fim\n\n\
                   A,\"R$ 1,00\",01/01/2025\nB,2\n";
        let spec = SourceSpec {
            skip_rows: 1,
            ..SourceSpec::new("contratos.csv")
        };
        let table = read_csv_table(csv.as_bytes(), &spec).unwrap();
        assert_eq!(table.headers, vec!["Setor", "Valor", "Fim"]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0], vec!["A", "R$ 1,00", "01/01/2025"]);
        assert_eq!(table.rows[1], vec!["B", "2", ""]);
    }

    #[test]
    fn honors_semicolon_delimiter() {
        let spec = SourceSpec {
            delimiter: ';',
            ..SourceSpec::new("orcamento.csv")
        };
        let table = read_csv_table(b"A;B\n1,5;2\n", &spec).unwrap();
        assert_eq!(table.headers, vec!["A", "B"]);
        assert_eq!(table.rows[0], vec!["1,5", "2"]);
    }

    #[test]
    fn empty_input_yields_empty_table() {
        let table = read_csv_table(b"", &SourceSpec::new("vazio.csv")).unwrap();
        assert!(table.headers.is_empty());
        assert!(table.rows.is_empty());
    }

    #[test]
    fn rejects_non_ascii_delimiter() {
        let spec = SourceSpec {
            delimiter: '§',
            ..SourceSpec::new("x.csv")
        };
        assert!(matches!(
            read_csv_table(b"a", &spec),
            Err(IngestError::Delimiter { .. })
        ));
    }
}
