//! Parsing of tabular severance exports into records.
//!
//! Headers are matched case-, accent- and separator-insensitively against a
//! fixed alias list so that exports from different payroll tools map onto
//! the same four required columns.

use cesantias_core::{AppError, AppResult};
use csv::{ReaderBuilder, StringRecord, Trim};

use crate::text::snake_key;
use crate::types::{Period, SeveranceRecord, SeveranceStatus};

/// Alias lists are in priority order. `id` comes last because exports often
/// carry a row-number `ID` column next to the real document column.
const DOCUMENT_ALIASES: &[&str] = &[
    "documento",
    "numero_documento",
    "numero_de_documento",
    "no_documento",
    "document_id",
    "documentid",
    "cedula",
    "identificacion",
    "id",
];

const AMOUNT_ALIASES: &[&str] = &[
    "monto",
    "valor",
    "cesantias",
    "valor_cesantias",
    "monto_cesantias",
    "amount",
];

const STATUS_ALIASES: &[&str] = &[
    "estado",
    "status",
    "causada",
    "causacion",
    "estado_cesantias",
];

const PERIOD_ALIASES: &[&str] = &["mes", "periodo", "period", "month", "fecha"];

const NAME_ALIASES: &[&str] = &["nombre", "empleado", "nombre_empleado", "name"];

/// Positions of the mapped columns within a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnMap {
    pub document_id: usize,
    pub amount: usize,
    pub status: usize,
    pub period: usize,
    pub name: Option<usize>,
}

impl ColumnMap {
    /// Map header cells to the record fields.
    pub fn from_headers<'a>(headers: impl IntoIterator<Item = &'a str>) -> AppResult<Self> {
        let keys: Vec<String> = headers.into_iter().map(snake_key).collect();

        let find = |aliases: &[&str]| {
            aliases
                .iter()
                .find_map(|alias| keys.iter().position(|k| k == alias))
        };
        let require = |aliases: &[&str], field: &str| {
            find(aliases).ok_or_else(|| {
                AppError::DataLoad(format!(
                    "Required column '{}' not found (accepted headers: {}; found: {})",
                    field,
                    aliases.join(", "),
                    keys.join(", ")
                ))
            })
        };

        Ok(Self {
            document_id: require(DOCUMENT_ALIASES, "documento")?,
            amount: require(AMOUNT_ALIASES, "monto")?,
            status: require(STATUS_ALIASES, "estado")?,
            period: require(PERIOD_ALIASES, "mes")?,
            name: find(NAME_ALIASES),
        })
    }
}

/// Parse CSV text into severance records.
///
/// `delimiter` is detected from the header line when `None`.
pub fn parse_csv(text: &str, delimiter: Option<u8>) -> AppResult<Vec<SeveranceRecord>> {
    let text = text.trim_start_matches('\u{feff}');
    let delimiter = delimiter.unwrap_or_else(|| detect_delimiter(text));

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .delimiter(delimiter)
        .trim(Trim::All)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers = reader.headers()?.clone();
    if headers.iter().all(|h| h.is_empty()) {
        return Err(AppError::DataLoad(
            "Severance data has no header row".to_string(),
        ));
    }

    let columns = ColumnMap::from_headers(headers.iter())?;
    tracing::debug!("Mapped severance columns: {:?}", columns);

    let mut records = Vec::new();
    for (index, row) in reader.records().enumerate() {
        let row = row?;
        // Header is line 1
        let line = index + 2;

        if row.iter().all(|cell| cell.is_empty()) {
            continue;
        }

        records.push(parse_row(&row, &columns, line)?);
    }

    Ok(records)
}

fn parse_row(row: &StringRecord, columns: &ColumnMap, line: usize) -> AppResult<SeveranceRecord> {
    let cell = |idx: usize| row.get(idx).unwrap_or("");

    let document_id = cell(columns.document_id);
    if document_key(document_id).is_none() {
        return Err(AppError::DataLoad(format!(
            "Line {}: missing document identifier",
            line
        )));
    }

    let raw_amount = cell(columns.amount);
    let amount = parse_amount(raw_amount).ok_or_else(|| {
        AppError::DataLoad(format!("Line {}: invalid amount '{}'", line, raw_amount))
    })?;

    let raw_status = cell(columns.status);
    let status = SeveranceStatus::parse(raw_status).ok_or_else(|| {
        AppError::DataLoad(format!("Line {}: unknown status '{}'", line, raw_status))
    })?;

    let raw_period = cell(columns.period);
    let period = Period::parse(raw_period).ok_or_else(|| {
        AppError::DataLoad(format!("Line {}: invalid period '{}'", line, raw_period))
    })?;

    let mut record = SeveranceRecord::new(document_id, amount, status, period);
    if let Some(name) = columns.name.map(cell).filter(|n| !n.is_empty()) {
        record = record.with_name(name);
    }

    Ok(record)
}

/// Pick `;` or `,` (or tab) by counting occurrences in the header line.
pub fn detect_delimiter(text: &str) -> u8 {
    let header = text.lines().next().unwrap_or("");
    [b';', b'\t', b',']
        .into_iter()
        .max_by_key(|d| header.bytes().filter(|b| b == d).count())
        .filter(|d| header.bytes().any(|b| b == *d))
        .unwrap_or(b',')
}

/// Parse a monetary cell.
///
/// Handles `$` prefixes, Colombian grouping (`1.234.567,89`) and
/// US grouping (`1,234,567.89`). A single dot followed by exactly three
/// digits is read as a thousands separator.
pub fn parse_amount(value: &str) -> Option<f64> {
    let cleaned: String = value
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '$')
        .collect();
    if cleaned.is_empty() {
        return None;
    }

    let last_dot = cleaned.rfind('.');
    let last_comma = cleaned.rfind(',');

    let normalized = match (last_dot, last_comma) {
        (Some(dot), Some(comma)) if comma > dot => cleaned.replace('.', "").replace(',', "."),
        (Some(_), Some(_)) => cleaned.replace(',', ""),
        (None, Some(comma)) => {
            let decimals = cleaned.len() - comma - 1;
            if cleaned.matches(',').count() == 1 && decimals <= 2 {
                cleaned.replace(',', ".")
            } else {
                cleaned.replace(',', "")
            }
        }
        (Some(dot), None) => {
            let decimals = cleaned.len() - dot - 1;
            if cleaned.matches('.').count() > 1 || decimals == 3 {
                cleaned.replace('.', "")
            } else {
                cleaned
            }
        }
        (None, None) => cleaned,
    };

    normalized.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Canonical lookup key for a document identifier.
///
/// Tolerates the representations a spreadsheet round-trip produces:
/// surrounding and inner whitespace, thousands separators, a `.0` float
/// suffix and leading zeros. Returns `None` when nothing identifying is left.
pub fn document_key(raw: &str) -> Option<String> {
    let trimmed = raw.trim();

    // 124473.0 / 124473.00 from numeric cells
    let without_fraction = match trimmed.split_once('.') {
        Some((whole, fraction))
            if !whole.contains('.')
                && !fraction.contains('.')
                && (1..=2).contains(&fraction.len())
                && fraction.chars().all(|c| c == '0') =>
        {
            whole
        }
        _ => trimmed,
    };

    let compact: String = without_fraction
        .chars()
        .filter(|c| !c.is_whitespace() && !matches!(c, '.' | ',' | '-' | '_'))
        .flat_map(char::to_uppercase)
        .collect();

    if compact.is_empty() {
        return None;
    }

    if compact.chars().all(|c| c.is_ascii_digit()) {
        let stripped = compact.trim_start_matches('0');
        return Some(if stripped.is_empty() {
            "0".to_string()
        } else {
            stripped.to_string()
        });
    }

    Some(compact)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_map_with_spanish_headers() {
        let headers = ["Número de Documento", "Nombre", "Valor Cesantías", "Estado", "Mes"];
        let map = ColumnMap::from_headers(headers).unwrap();
        assert_eq!(map.document_id, 0);
        assert_eq!(map.name, Some(1));
        assert_eq!(map.amount, 2);
        assert_eq!(map.status, 3);
        assert_eq!(map.period, 4);
    }

    #[test]
    fn test_column_map_missing_required() {
        let err = ColumnMap::from_headers(["documento", "monto", "estado"]).unwrap_err();
        assert!(matches!(err, AppError::DataLoad(_)));
        assert!(err.to_string().contains("'mes'"));
    }

    #[test]
    fn test_row_number_id_column_does_not_shadow_documento() {
        let map = ColumnMap::from_headers(["ID", "Documento", "Monto", "Estado", "Mes"]).unwrap();
        assert_eq!(map.document_id, 1);

        let csv = "ID;Documento;Monto;Estado;Mes\n\
                   1;124473;2.500.000;Causada;2024-01\n\
                   2;98765;1.500.000;No causada;2024-02\n";
        let ids: Vec<String> = parse_csv(csv, None)
            .unwrap()
            .into_iter()
            .map(|r| r.document_id)
            .collect();
        assert_eq!(ids, vec!["124473", "98765"]);
    }

    #[test]
    fn test_id_header_used_when_alone() {
        let map = ColumnMap::from_headers(["id", "monto", "estado", "mes"]).unwrap();
        assert_eq!(map.document_id, 0);
    }

    #[test]
    fn test_parse_amount_formats() {
        assert_eq!(parse_amount("1500000"), Some(1_500_000.0));
        assert_eq!(parse_amount("$ 1.500.000"), Some(1_500_000.0));
        assert_eq!(parse_amount("1.234.567,89"), Some(1_234_567.89));
        assert_eq!(parse_amount("1,234,567.89"), Some(1_234_567.89));
        assert_eq!(parse_amount("2500.5"), Some(2500.5));
        assert_eq!(parse_amount("2500,5"), Some(2500.5));
        assert_eq!(parse_amount("1.500"), Some(1500.0));
        assert_eq!(parse_amount("-100"), Some(-100.0));
        assert_eq!(parse_amount(""), None);
        assert_eq!(parse_amount("n/a"), None);
    }

    #[test]
    fn test_document_key_normalization() {
        assert_eq!(document_key("124473").as_deref(), Some("124473"));
        assert_eq!(document_key(" 00124473 ").as_deref(), Some("124473"));
        assert_eq!(document_key("124473.0").as_deref(), Some("124473"));
        assert_eq!(document_key("79.123.456").as_deref(), Some("79123456"));
        assert_eq!(document_key("79 123 456").as_deref(), Some("79123456"));
        assert_eq!(document_key("000000").as_deref(), Some("0"));
        assert_eq!(document_key("pe-123").as_deref(), Some("PE123"));
        assert_eq!(document_key("   "), None);
    }

    #[test]
    fn test_detect_delimiter() {
        assert_eq!(detect_delimiter("documento;monto;estado;mes\n1;2;3;4"), b';');
        assert_eq!(detect_delimiter("documento,monto,estado,mes"), b',');
        assert_eq!(detect_delimiter("documento\tmonto\testado\tmes"), b'\t');
        assert_eq!(detect_delimiter("documento"), b',');
    }

    #[test]
    fn test_parse_csv_semicolon_export() {
        let csv = "\u{feff}Documento;Nombre;Valor Cesantías;Estado;Mes\n\
                   124473;Ana Pérez;$ 2.345.678;Causada;2024-01\n\
                   ;;;;\n\
                   98765;;1.200.000,50;No causada;febrero 2024\n";

        let records = parse_csv(csv, None).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].document_id, "124473");
        assert_eq!(records[0].name.as_deref(), Some("Ana Pérez"));
        assert_eq!(records[0].amount, 2_345_678.0);
        assert!(records[0].status.is_accrued());
        assert_eq!(records[1].name, None);
        assert_eq!(records[1].amount, 1_200_000.5);
        assert_eq!(records[1].period, Period::new(2024, 2).unwrap());
    }

    #[test]
    fn test_parse_csv_reports_line_numbers() {
        let csv = "documento,monto,estado,mes\n1,100,causada,2024-01\n2,abc,causada,2024-01\n";
        let err = parse_csv(csv, None).unwrap_err();
        assert!(err.to_string().contains("Line 3"));
        assert!(err.to_string().contains("abc"));
    }

    #[test]
    fn test_parse_csv_unknown_status() {
        let csv = "documento,monto,estado,mes\n1,100,tal vez,2024-01\n";
        let err = parse_csv(csv, None).unwrap_err();
        assert!(matches!(err, AppError::DataLoad(_)));
    }

    #[test]
    fn test_parse_csv_empty_input() {
        assert!(matches!(parse_csv("", None), Err(AppError::DataLoad(_))));
    }
}
