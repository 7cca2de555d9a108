//! CSV ingest and normalization.
//!
//! This module turns the downloaded source text into clean `RegionRecord`s
//! that are safe to aggregate and fit.
//!
//! Source conventions (fixed column order, header row present):
//!
//! 1. region code
//! 2. date as `DD/MM/YYYY`
//! 3. cumulative cases
//! 4. currently hospitalized
//! 5. currently in ICU
//! 6. cumulative dead
//!
//! The last line of the file is a prose footer and is always dropped.
//! Missing/empty numeric cells mean zero; decimal commas are accepted.

use chrono::NaiveDate;
use csv::StringRecord;

use crate::domain::RegionRecord;
use crate::error::AppError;

/// Parse the decoded source text into per-region daily records.
pub fn parse_records(text: &str) -> Result<Vec<RegionRecord>, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let mut rows: Vec<(usize, StringRecord)> = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        // +2: records() starts after the header and CSV lines are 1-based.
        let line = idx + 2;
        let record = result
            .map_err(|e| AppError::new(3, format!("CSV parse error at line {line}: {e}")))?;
        if record.iter().all(|field| field.is_empty()) {
            continue;
        }
        rows.push((line, record));
    }

    // Known trailing footer row.
    rows.pop();

    if rows.is_empty() {
        return Err(AppError::new(3, "Source contains no data rows."));
    }

    let mut records = Vec::with_capacity(rows.len());
    for (line, record) in rows {
        records.push(parse_row(&record).map_err(|e| {
            AppError::new(3, format!("Bad source row at line {line}: {e}"))
        })?);
    }

    Ok(records)
}

fn parse_row(record: &StringRecord) -> Result<RegionRecord, String> {
    let region = record
        .get(0)
        .filter(|s| !s.is_empty())
        .ok_or("missing region code")?
        .to_string();

    let date = parse_date(record.get(1).unwrap_or_default())?;

    Ok(RegionRecord {
        region,
        date,
        cases: parse_count(record.get(2))?,
        hospitalized: parse_count(record.get(3))?,
        icu: parse_count(record.get(4))?,
        dead: parse_count(record.get(5))?,
    })
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%d/%m/%Y")
        .map_err(|_| format!("invalid date '{s}' (expected DD/MM/YYYY)"))
}

/// Empty cells count as zero; decimal commas are normalized first.
fn parse_count(s: Option<&str>) -> Result<f64, String> {
    let Some(s) = s.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(0.0);
    };
    let normalized = s.replace(',', ".");
    let v: f64 = normalized
        .parse()
        .map_err(|_| format!("invalid number '{s}'"))?;
    if v.is_finite() {
        Ok(v)
    } else {
        Err(format!("non-finite number '{s}'"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
CCAA,FECHA,CASOS,Hospitalizados,UCI,Fallecidos
AN,01/03/2020,12,5,1,0
CT,01/03/2020,24,,2,1
AN,02/03/2020,18,7,2,1
NOTA: los datos son provisionales,,,,,
";

    #[test]
    fn parses_rows_and_drops_footer() {
        let records = parse_records(SAMPLE).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].region, "AN");
        assert_eq!(
            records[0].date,
            NaiveDate::from_ymd_opt(2020, 3, 1).unwrap()
        );
        assert_eq!(records[0].cases, 12.0);
        assert_eq!(records[2].hospitalized, 7.0);
    }

    #[test]
    fn missing_values_become_zero() {
        let records = parse_records(SAMPLE).unwrap();
        assert_eq!(records[1].hospitalized, 0.0);
        assert_eq!(records[1].icu, 2.0);
    }

    #[test]
    fn decimal_commas_are_accepted() {
        let text = "\
CCAA,FECHA,CASOS,Hospitalizados,UCI,Fallecidos
AN,01/03/2020,\"12,5\",0,0,0
footer,,,,,
";
        let records = parse_records(text).unwrap();
        assert_eq!(records[0].cases, 12.5);
    }

    #[test]
    fn bad_dates_are_fatal() {
        let text = "\
CCAA,FECHA,CASOS,Hospitalizados,UCI,Fallecidos
AN,2020-03-01,12,0,0,0
AN,02/03/2020,13,0,0,0
footer,,,,,
";
        let err = parse_records(text).unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn footer_only_input_is_rejected() {
        let text = "CCAA,FECHA,CASOS,Hospitalizados,UCI,Fallecidos\nfooter,,,,,\n";
        assert!(parse_records(text).is_err());
    }
}
