use crate::{PhylofetchError, Result};
use std::collections::HashMap;
use std::path::Path;

/// The master taxon table: one row per study taxon, with at least the
/// combination-name, family, and genus columns, plus one accession column
/// per finished gene appended by the joiner.
#[derive(Debug, Clone)]
pub struct MasterTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl MasterTable {
    pub fn load(path: &Path) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_path(path)
            .map_err(|e| PhylofetchError::Parse(format!("{}: {e}", path.display())))?;

        let headers = reader
            .headers()
            .map_err(|e| PhylofetchError::Parse(format!("{}: {e}", path.display())))?
            .iter()
            .map(String::from)
            .collect::<Vec<_>>();

        let mut rows = Vec::new();
        for result in reader.records() {
            let record =
                result.map_err(|e| PhylofetchError::Parse(format!("{}: {e}", path.display())))?;
            let mut row: Vec<String> = record.iter().map(String::from).collect();
            row.resize(headers.len(), String::new());
            rows.push(row);
        }
        Ok(MasterTable { headers, rows })
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let mut writer = csv::Writer::from_path(path)
            .map_err(|e| PhylofetchError::Parse(format!("{}: {e}", path.display())))?;
        writer
            .write_record(&self.headers)
            .and_then(|_| {
                for row in &self.rows {
                    writer.write_record(row)?;
                }
                writer.flush().map_err(csv::Error::from)
            })
            .map_err(|e| PhylofetchError::Parse(format!("{}: {e}", path.display())))?;
        Ok(())
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    pub fn require_column(&self, name: &str) -> Result<usize> {
        self.column_index(name).ok_or_else(|| {
            PhylofetchError::Config(format!("master table has no '{name}' column"))
        })
    }

    pub fn cell(&self, row: usize, column: usize) -> &str {
        self.rows[row][column].as_str()
    }

    /// Left-join `values` (keyed by the given key column's cell) as a new
    /// column. Rows without a match get an empty cell. Re-joining a gene
    /// overwrites its previous column, so repeat runs are idempotent.
    pub fn add_column(
        &mut self,
        name: &str,
        key_column: &str,
        values: &HashMap<String, String>,
    ) -> Result<usize> {
        let key_idx = self.require_column(key_column)?;

        let col_idx = match self.column_index(name) {
            Some(idx) => idx,
            None => {
                self.headers.push(name.to_string());
                for row in &mut self.rows {
                    row.push(String::new());
                }
                self.headers.len() - 1
            }
        };

        let mut joined = 0;
        for row in &mut self.rows {
            let key = row[key_idx].clone();
            row[col_idx] = match values.get(&key) {
                Some(value) => {
                    joined += 1;
                    value.clone()
                }
                None => String::new(),
            };
        }
        Ok(joined)
    }
}
