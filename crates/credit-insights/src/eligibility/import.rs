//! CSV import of previously persisted offers (e.g. a database export).

use std::io::Read;
use std::path::Path;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::Deserialize;
use tracing::debug;

use super::offers::{CustomerId, Offer, OfferId, OfferStatus, OfferType, OFFER_VALIDITY_DAYS};

#[derive(Debug)]
pub enum OfferImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    InvalidRow { row: usize, reason: String },
}

impl std::fmt::Display for OfferImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OfferImportError::Io(err) => write!(f, "failed to read offer export: {}", err),
            OfferImportError::Csv(err) => write!(f, "invalid offer CSV data: {}", err),
            OfferImportError::InvalidRow { row, reason } => {
                write!(f, "offer export row {} rejected: {}", row, reason)
            }
        }
    }
}

impl std::error::Error for OfferImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            OfferImportError::Io(err) => Some(err),
            OfferImportError::Csv(err) => Some(err),
            OfferImportError::InvalidRow { .. } => None,
        }
    }
}

impl From<std::io::Error> for OfferImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for OfferImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

#[derive(Debug, Deserialize)]
struct OfferRow {
    #[serde(rename = "Offer ID")]
    offer_id: String,
    #[serde(rename = "Customer ID")]
    customer_id: String,
    #[serde(rename = "Offer Type")]
    offer_type: String,
    #[serde(rename = "Eligible Amount")]
    eligible_amount: u64,
    #[serde(rename = "Interest Rate")]
    interest_rate: f32,
    #[serde(rename = "Processing Fee", default)]
    processing_fee: Option<u64>,
    #[serde(rename = "Cashback", default)]
    cashback: Option<f32>,
    #[serde(rename = "Reward Points", default)]
    reward_points: Option<u32>,
    #[serde(rename = "Issued At")]
    issued_at: String,
    #[serde(rename = "Expires At", default, deserialize_with = "empty_string_as_none")]
    expires_at: Option<String>,
    #[serde(rename = "Status", default, deserialize_with = "empty_string_as_none")]
    status: Option<String>,
    #[serde(rename = "Hidden", default, deserialize_with = "empty_string_as_none")]
    hidden: Option<String>,
}

impl OfferRow {
    fn into_offer(self, row: usize) -> Result<Offer, OfferImportError> {
        let invalid = |reason: String| OfferImportError::InvalidRow { row, reason };

        if self.offer_id.trim().is_empty() {
            return Err(invalid("missing offer id".to_string()));
        }
        if self.customer_id.trim().is_empty() {
            return Err(invalid("missing customer id".to_string()));
        }

        let issued_at = parse_timestamp(&self.issued_at)
            .ok_or_else(|| invalid(format!("unparseable issue date '{}'", self.issued_at)))?;
        let expires_at = match self.expires_at.as_deref() {
            Some(raw) => parse_timestamp(raw)
                .ok_or_else(|| invalid(format!("unparseable expiry date '{raw}'")))?,
            None => issued_at + Duration::days(OFFER_VALIDITY_DAYS),
        };
        let status = match self.status.as_deref() {
            Some(raw) => {
                parse_status(raw).ok_or_else(|| invalid(format!("unknown status '{raw}'")))?
            }
            None => OfferStatus::Active,
        };
        let hidden_by_user = match self.hidden.as_deref() {
            Some(raw) => {
                parse_flag(raw).ok_or_else(|| invalid(format!("bad hidden flag '{raw}'")))?
            }
            None => false,
        };

        Ok(Offer {
            id: OfferId(self.offer_id.trim().to_string()),
            customer_id: CustomerId(self.customer_id.trim().to_string()),
            offer_type: OfferType::from_code(&self.offer_type),
            eligible_amount: self.eligible_amount,
            interest_rate: self.interest_rate,
            processing_fee: self.processing_fee.unwrap_or(0),
            cashback_percent: self.cashback,
            reward_points: self.reward_points,
            issued_at,
            expires_at,
            status,
            hidden_by_user,
        })
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

/// RFC 3339 timestamp or a plain `YYYY-MM-DD` date (midnight UTC).
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

fn parse_status(value: &str) -> Option<OfferStatus> {
    match value.trim().to_ascii_uppercase().as_str() {
        "ACTIVE" => Some(OfferStatus::Active),
        "ACCEPTED" => Some(OfferStatus::Accepted),
        "REJECTED" => Some(OfferStatus::Rejected),
        "EXPIRED" => Some(OfferStatus::Expired),
        _ => None,
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "1" => Some(true),
        "false" | "no" | "0" => Some(false),
        _ => None,
    }
}

pub struct OfferCsvImporter;

impl OfferCsvImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<Offer>, OfferImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<Offer>, OfferImportError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut offers = Vec::new();
        for (index, record) in csv_reader.deserialize::<OfferRow>().enumerate() {
            // header is line 1
            let offer = record?.into_offer(index + 2)?;
            offers.push(offer);
        }

        debug!(count = offers.len(), "imported persisted offers");
        Ok(offers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const HEADER: &str = "Offer ID,Customer ID,Offer Type,Eligible Amount,Interest Rate,Processing Fee,Cashback,Reward Points,Issued At,Expires At,Status,Hidden\n";

    fn import(rows: &str) -> Result<Vec<Offer>, OfferImportError> {
        OfferCsvImporter::from_reader(Cursor::new(format!("{HEADER}{rows}").into_bytes()))
    }

    #[test]
    fn imports_rows_with_optional_cells() {
        let offers = import(
            "OFR-1,cust-9,credit card,150000,36.0,499,1.5,5000,2026-09-01T10:00:00Z,,,\n\
             OFR-2,cust-9,PREMIUM,0,0,,,,2026-09-02,2026-10-02,Rejected,yes\n",
        )
        .expect("import succeeds");

        assert_eq!(offers.len(), 2);
        assert_eq!(offers[0].offer_type, OfferType::CreditCard);
        assert_eq!(offers[0].status, OfferStatus::Active);
        assert_eq!(
            offers[0].expires_at - offers[0].issued_at,
            Duration::days(OFFER_VALIDITY_DAYS)
        );
        assert_eq!(offers[0].reward_points, Some(5000));
        assert_eq!(offers[1].offer_type, OfferType::Premium);
        assert_eq!(offers[1].status, OfferStatus::Rejected);
        assert!(offers[1].hidden_by_user);
        assert_eq!(offers[1].processing_fee, 0);
    }

    #[test]
    fn unknown_types_import_as_other() {
        let offers = import("OFR-3,cust-9,GOLD_LOAN,100000,9.5,0,,,2026-09-01,,ACTIVE,false\n")
            .expect("import succeeds");
        assert_eq!(offers[0].offer_type, OfferType::Other);
    }

    #[test]
    fn rejects_bad_dates_with_row_number() {
        let err = import(
            "OFR-1,cust-9,CAR_LOAN,800000,8.75,2500,,,2026-09-01,,,\n\
             OFR-2,cust-9,CAR_LOAN,800000,8.75,2500,,,yesterday,,,\n",
        )
        .expect_err("bad date rejected");

        match err {
            OfferImportError::InvalidRow { row, reason } => {
                assert_eq!(row, 3);
                assert!(reason.contains("yesterday"));
            }
            other => panic!("expected invalid row, got {other:?}"),
        }
    }

    #[test]
    fn rejects_unknown_status() {
        let err = import("OFR-1,cust-9,CAR_LOAN,800000,8.75,2500,,,2026-09-01,,Pending,\n")
            .expect_err("unknown status rejected");
        assert!(err.to_string().contains("unknown status 'Pending'"));
    }
}
