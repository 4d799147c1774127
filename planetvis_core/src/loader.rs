//! CSV loading of ephemeris tables.
//!
//! The header is validated before any row is read, and the first bad value
//! aborts the whole load. Skipping rows would silently shorten a body's
//! trajectory and desynchronize it from the shared timestamp axis.

use crate::error::{Result, VisError};
use crate::model::{Observation, Position, Timestamp, TimestampKind};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Names of the input columns that carry each field.
///
/// Any other column in the table (velocities, light time, ...) is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnMap {
    pub body: String,
    pub timestamp: String,
    pub x: String,
    pub y: String,
    pub z: String,
}

impl Default for ColumnMap {
    fn default() -> Self {
        Self {
            body: "name".to_string(),
            timestamp: "date".to_string(),
            x: "x_au".to_string(),
            y: "y_au".to_string(),
            z: "z_au".to_string(),
        }
    }
}

/// Resolved header positions for each required column.
#[derive(Debug, Clone, Copy)]
struct ColumnIndices {
    body: usize,
    timestamp: usize,
    x: usize,
    y: usize,
    z: usize,
}

impl ColumnMap {
    /// Finds every required column in the header, reporting all missing ones at once.
    fn resolve(&self, headers: &csv::StringRecord) -> Result<ColumnIndices> {
        let find = |name: &str| headers.iter().position(|h| h == name);
        
        let wanted = [&self.body, &self.timestamp, &self.x, &self.y, &self.z];
        let missing: Vec<String> = wanted
            .iter()
            .filter(|name| find(name.as_str()).is_none())
            .map(|name| name.to_string())
            .collect();
        
        if !missing.is_empty() {
            return Err(VisError::MissingColumn {
                columns: missing,
                available: headers.iter().collect::<Vec<_>>().join(", "),
            });
        }
        
        // All present, checked above
        let index = |name: &str| find(name).unwrap_or_default();
        Ok(ColumnIndices {
            body: index(self.body.as_str()),
            timestamp: index(self.timestamp.as_str()),
            x: index(self.x.as_str()),
            y: index(self.y.as_str()),
            z: index(self.z.as_str()),
        })
    }
}

/// Loads observations from a CSV file on disk.
pub fn load_observations(path: impl AsRef<Path>, columns: &ColumnMap) -> Result<Vec<Observation>> {
    let path = path.as_ref();
    tracing::info!("Reading ephemeris table from {:?}", path);
    
    let file = File::open(path)?;
    read_observations(file, columns)
}

/// Reads observations from any CSV source.
///
/// Every row must use the same timestamp representation as the first one.
pub fn read_observations<R: Read>(source: R, columns: &ColumnMap) -> Result<Vec<Observation>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(source);
    
    let headers = reader.headers()?.clone();
    let indices = columns.resolve(&headers)?;
    
    let mut observations = Vec::new();
    let mut table_kind: Option<TimestampKind> = None;
    
    for record in reader.records() {
        let record = record?;
        let line = record.position().map(|p| p.line()).unwrap_or_default();
        let field = |i: usize| record.get(i).unwrap_or_default();
        
        let body = field(indices.body);
        if body.is_empty() {
            return Err(VisError::unparseable(line, &columns.body, body, "empty body name"));
        }
        
        let raw_time = field(indices.timestamp);
        let timestamp: Timestamp = raw_time
            .parse()
            .map_err(|e| VisError::unparseable(line, &columns.timestamp, raw_time, e))?;
        
        match table_kind {
            None => table_kind = Some(timestamp.kind()),
            Some(kind) if kind != timestamp.kind() => {
                return Err(VisError::unparseable(
                    line,
                    &columns.timestamp,
                    raw_time,
                    format!("table uses {} timestamps, found {}", kind, timestamp.kind()),
                ));
            }
            Some(_) => {}
        }
        
        let position = Position::new(
            parse_coordinate(field(indices.x), line, &columns.x)?,
            parse_coordinate(field(indices.y), line, &columns.y)?,
            parse_coordinate(field(indices.z), line, &columns.z)?,
        );
        
        observations.push(Observation::new(body, timestamp, position));
    }
    
    if observations.is_empty() {
        return Err(VisError::EmptyTable);
    }
    
    tracing::info!("    Rows read: {}", observations.len());
    Ok(observations)
}

fn parse_coordinate(raw: &str, line: u64, column: &str) -> Result<f64> {
    let value: f64 = raw
        .parse()
        .map_err(|e| VisError::unparseable(line, column, raw, e))?;
    
    if !value.is_finite() {
        return Err(VisError::unparseable(line, column, raw, "non-finite coordinate"));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::io::Write;
    
    const TABLE: &str = "\
name,date,x_au,y_au,z_au,vx_au_per_day
SUN,2024-01-01,0.0,0.0,0.0,0.0
1 EARTH,2024-01-01,0.98,0.17,0.0,0.01
SUN,2024-01-02,0.001,0.0,0.0,0.0
";
    
    #[test]
    fn test_read_valid_table() {
        let observations = read_observations(TABLE.as_bytes(), &ColumnMap::default()).unwrap();
        
        assert_eq!(observations.len(), 3);
        assert_eq!(observations[1].body, "1 EARTH");
        assert_eq!(observations[1].timestamp.to_string(), "2024-01-01");
        assert_relative_eq!(observations[1].position.x, 0.98);
        assert_relative_eq!(observations[1].position.y, 0.17);
    }
    
    #[test]
    fn test_missing_columns_reported_together() {
        let table = "name,date,x_au\nSUN,2024-01-01,0.0\n";
        let err = read_observations(table.as_bytes(), &ColumnMap::default()).unwrap_err();
        
        match err {
            VisError::MissingColumn { columns, .. } => {
                assert_eq!(columns, vec!["y_au".to_string(), "z_au".to_string()]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }
    
    #[test]
    fn test_bad_coordinate_aborts_load() {
        let table = "name,date,x_au,y_au,z_au\nSUN,2024-01-01,0.0,0.0,0.0\nSUN,2024-01-02,abc,0.0,0.0\n";
        let err = read_observations(table.as_bytes(), &ColumnMap::default()).unwrap_err();
        
        match err {
            VisError::UnparseableValue { line, column, value, .. } => {
                assert_eq!(line, 3);
                assert_eq!(column, "x_au");
                assert_eq!(value, "abc");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
    
    #[test]
    fn test_bad_timestamp_aborts_load() {
        let table = "name,date,x_au,y_au,z_au\nSUN,yesterday,0.0,0.0,0.0\n";
        let err = read_observations(table.as_bytes(), &ColumnMap::default()).unwrap_err();
        assert!(matches!(err, VisError::UnparseableValue { ref column, .. } if column == "date"));
    }
    
    #[test]
    fn test_mixed_timestamp_kinds_rejected() {
        let table = "name,date,x_au,y_au,z_au\nSUN,2024-01-01,0,0,0\nSUN,17,0,0,0\n";
        let err = read_observations(table.as_bytes(), &ColumnMap::default()).unwrap_err();
        assert!(matches!(err, VisError::UnparseableValue { line: 3, .. }));
    }
    
    #[test]
    fn test_non_finite_coordinate_rejected() {
        let table = "name,date,x_au,y_au,z_au\nSUN,1,NaN,0,0\n";
        let err = read_observations(table.as_bytes(), &ColumnMap::default()).unwrap_err();
        assert!(matches!(err, VisError::UnparseableValue { .. }));
    }
    
    #[test]
    fn test_header_only_is_empty() {
        let table = "name,date,x_au,y_au,z_au\n";
        let err = read_observations(table.as_bytes(), &ColumnMap::default()).unwrap_err();
        assert!(matches!(err, VisError::EmptyTable));
    }
    
    #[test]
    fn test_custom_columns() {
        let table = "body,jd,x,y,z\nMARS,10,1.5,0.2,0.01\n";
        let columns = ColumnMap {
            body: "body".to_string(),
            timestamp: "jd".to_string(),
            x: "x".to_string(),
            y: "y".to_string(),
            z: "z".to_string(),
        };
        
        let observations = read_observations(table.as_bytes(), &columns).unwrap();
        assert_eq!(observations[0].timestamp, Timestamp::day(10.0));
    }
    
    #[test]
    fn test_common_timestamp_forms_accepted() {
        for raw in [
            "2024-01-01T00:00:00Z",
            "2024-01-01T00:00:00+00:00",
            "2460310.5",
            "2024-01-01 00:00",
        ] {
            let table = format!("name,date,x_au,y_au,z_au\nSUN,{raw},0,0,0\n");
            let observations = read_observations(table.as_bytes(), &ColumnMap::default())
                .unwrap_or_else(|e| panic!("{raw} rejected: {e}"));
            
            assert_eq!(observations[0].timestamp.label(), raw);
            assert_eq!(observations[0].timestamp.to_string(), raw);
        }
    }
    
    #[test]
    fn test_zoned_rows_normalize_to_utc() {
        let table = "name,date,x_au,y_au,z_au\n\
                     SUN,2024-01-01T01:00:00+01:00,0,0,0\n\
                     SUN,2024-01-01 00:00:00,0,0,0\n";
        let observations = read_observations(table.as_bytes(), &ColumnMap::default()).unwrap();
        
        assert_eq!(observations[0].timestamp, observations[1].timestamp);
        assert_eq!(observations[0].timestamp.label(), "2024-01-01T01:00:00+01:00");
    }
    
    #[test]
    fn test_fractional_days_keep_order() {
        let table = "name,date,x_au,y_au,z_au\nSUN,2460310.5,0,0,0\nSUN,2460310.25,0,0,0\n";
        let observations = read_observations(table.as_bytes(), &ColumnMap::default()).unwrap();
        
        assert_eq!(observations[0].timestamp.kind(), TimestampKind::Day);
        assert!(observations[1].timestamp < observations[0].timestamp);
    }
    
    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(TABLE.as_bytes()).unwrap();
        
        let observations = load_observations(file.path(), &ColumnMap::default()).unwrap();
        assert_eq!(observations.len(), 3);
    }
}
