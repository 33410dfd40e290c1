//! CSV and JSON import/export shared by the store's transfer endpoints.
//!
//! Export headers are the camelCase field names, which the importer also accepts,
//! so an exported creator sheet can be edited and imported back. The importer also
//! understands the Chinese column titles used by the agency's spreadsheet.

use csv::{ReaderBuilder, WriterBuilder};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::{Creator, ImportValidation, TagSet};
use crate::validation::{summarize, validate_creator};

/// One creator row as it appears in an import file. Every cell is text.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct CreatorCsvRow {
    #[serde(alias = "达人ID", alias = "ID")]
    id: String,
    #[serde(alias = "真实姓名", alias = "姓名")]
    real_name: String,
    #[serde(alias = "微信名")]
    wechat_name: String,
    #[serde(alias = "联系方式")]
    contact_method: String,
    #[serde(alias = "城市")]
    city: String,
    #[serde(alias = "是否进群")]
    in_group: String,
    #[serde(alias = "面试状态")]
    interview_status: String,
    #[serde(alias = "面试人")]
    interviewer: String,
    #[serde(alias = "面试日期")]
    interview_date: String,
    #[serde(alias = "签约状态")]
    contract_status: String,
    #[serde(alias = "合同开始日期")]
    contract_start_date: String,
    #[serde(alias = "合同结束日期")]
    contract_end_date: String,
    #[serde(alias = "分成比例")]
    commission: String,
    #[serde(alias = "类目", alias = "分类")]
    category: String,
    #[serde(alias = "备注")]
    notes: String,
    #[serde(alias = "转账账户")]
    transfer_account: String,
}

impl CreatorCsvRow {
    fn into_creator(self) -> Result<Creator, String> {
        let commission = parse_commission(&self.commission)?;
        Ok(Creator {
            id: self.id,
            real_name: self.real_name,
            wechat_name: self.wechat_name,
            contact_method: self.contact_method,
            city: self.city,
            in_group: self.in_group,
            interview_status: self.interview_status,
            interviewer: self.interviewer,
            interview_date: self.interview_date,
            contract_status: TagSet::parse(&self.contract_status),
            contract_start_date: self.contract_start_date,
            contract_end_date: self.contract_end_date,
            commission,
            category: TagSet::parse(&self.category),
            notes: self.notes,
            transfer_account: self.transfer_account,
        })
    }
}

/// Commission cells hold either a fraction (`0.7`) or a percentage (`70%`). Blank means 0.
fn parse_commission(cell: &str) -> Result<f64, String> {
    let cell = cell.trim();
    if cell.is_empty() {
        return Ok(0.0);
    }
    let (number, scale) = match cell.strip_suffix('%') {
        Some(number) => (number.trim(), 100.0),
        None => (cell, 1.0),
    };
    number
        .parse::<f64>()
        .map(|value| value / scale)
        .map_err(|_| format!("commission '{}' is not a number", cell))
}

/// A parsed import file: every readable row plus the validation summary.
#[derive(Debug, Clone, Default)]
pub struct ParsedImport {
    /// Rows that passed validation.
    pub creators: Vec<Creator>,
    pub validation: ImportValidation,
}

/// Parse and validate a creator CSV. Row numbers in errors are file lines (header is line 1).
pub fn parse_creators_csv(bytes: &[u8]) -> Result<ParsedImport, AppError> {
    // Spreadsheet tools like to prepend a UTF-8 BOM.
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(bytes);

    // Surface a malformed header as a whole-file error.
    reader.headers()?;

    let mut parsed = ParsedImport::default();

    for (row_idx, result) in reader.deserialize::<CreatorCsvRow>().enumerate() {
        let row_num = row_idx + 2;

        let outcome = result
            .map_err(|e| format!("CSV parse error: {}", e))
            .and_then(CreatorCsvRow::into_creator)
            .and_then(|creator| {
                validate_creator(&creator)
                    .map(|_| creator)
                    .map_err(|errors| summarize(&errors))
            });

        match outcome {
            Ok(creator) => parsed.creators.push(creator),
            Err(message) => {
                parsed
                    .validation
                    .errors
                    .push(format!("Row {}: {}", row_num, message));
            }
        }
    }

    parsed.validation.valid = parsed.creators.len();
    parsed.validation.invalid = parsed.validation.errors.len();
    Ok(parsed)
}

/// Serialize rows to CSV with a header row.
pub fn write_csv<T: Serialize>(rows: &[T]) -> Result<Vec<u8>, AppError> {
    let mut writer = WriterBuilder::new().from_writer(Vec::new());
    for row in rows {
        writer.serialize(row)?;
    }
    writer
        .into_inner()
        .map_err(|e| AppError::Internal(format!("Failed to flush CSV: {}", e)))
}

/// Serialize rows to pretty-printed JSON.
pub fn write_json<T: Serialize>(rows: &[T]) -> Result<Vec<u8>, AppError> {
    Ok(serde_json::to_vec_pretty(rows)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Deal;

    #[test]
    fn test_parse_reports_bad_rows_by_line() {
        let csv = "\u{feff}id,realName,commission,category\n\
                   2501001,张三,0.7,\"美妆护肤, 生活方式\"\n\
                   2501002,,0.5,美食\n\
                   2501003,李四,70%,旅行\n\
                   2501004,王五,abc,\n";
        let parsed = parse_creators_csv(csv.as_bytes()).unwrap();

        assert_eq!(parsed.validation.valid, 2);
        assert_eq!(parsed.validation.invalid, 2);
        assert!(parsed.validation.errors[0].starts_with("Row 3:"));
        assert!(parsed.validation.errors[1].starts_with("Row 5:"));
        assert_eq!(parsed.creators[0].category.len(), 2);
        assert!((parsed.creators[1].commission - 0.7).abs() < 1e-9);
    }

    #[test]
    fn test_parse_accepts_chinese_headers() {
        let csv = "达人ID,真实姓名,城市,分成比例\n2501009,赵六,杭州,0.6\n";
        let parsed = parse_creators_csv(csv.as_bytes()).unwrap();
        assert_eq!(parsed.creators.len(), 1);
        assert_eq!(parsed.creators[0].city, "杭州");
    }

    #[test]
    fn test_exported_creators_import_back() {
        let creators = vec![Creator {
            id: "2501001".to_string(),
            real_name: "张三".to_string(),
            commission: 0.7,
            category: TagSet::parse("美妆护肤,生活方式"),
            contract_status: TagSet::parse("已签约"),
            ..Default::default()
        }];
        let bytes = write_csv(&creators).unwrap();
        let parsed = parse_creators_csv(&bytes).unwrap();
        assert_eq!(parsed.creators, creators);
    }

    #[test]
    fn test_deal_csv_uses_wire_names() {
        let deals = vec![Deal {
            id: "D1".to_string(),
            deal_type: "广告".to_string(),
            ..Default::default()
        }];
        let text = String::from_utf8(write_csv(&deals).unwrap()).unwrap();
        let header = text.lines().next().unwrap();
        assert!(header.starts_with("id,creatorId,partner,type,date"));
    }
}
