use bigdecimal::{BigDecimal, RoundingMode};
use serde::{de::DeserializeOwned, Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::str::FromStr;

// ============ Inbound API Models ============

/// Body of `POST /api/check-client`.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct LookupRequest {
    #[serde(default)]
    pub id_number: Option<String>,
}

/// Envelope returned by `POST /api/check-client`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LookupResponse {
    Success { data: ClientRecord },
    NotFound { message: String },
    Error { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClientStatus {
    Active,
    Inactive,
}

/// Client details shaped for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientRecord {
    pub full_name: String,
    pub id_number: String,
    pub member_number: String,
    pub status: ClientStatus,
    pub email: String,
    pub contact_cell: String,
    pub subscriptions: Vec<SubscriptionRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubscriptionRecord {
    pub sub_status: String,
    pub sub_start_date: String,
    pub sub_end_date: String,
    pub products: Vec<ProductRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub product_name: String,
    pub product_amount_formatted: String,
}

// ============ SwitchTransact Models ============

/// Body of `POST /workflow/people/details`.
///
/// Bank account and transaction data are never requested.
#[derive(Debug, Clone, Serialize)]
pub struct PersonDetailsRequest<'a> {
    pub id_number: &'a str,
    pub record: bool,
    pub subscriptions: bool,
    pub bank_accounts: bool,
    pub transactions: bool,
}

impl<'a> PersonDetailsRequest<'a> {
    pub fn new(id_number: &'a str) -> Self {
        Self {
            id_number,
            record: true,
            subscriptions: true,
            bank_accounts: false,
            transactions: false,
        }
    }
}

/// Person record as returned by SwitchTransact.
///
/// Every field is optional; values of an unexpected JSON type are treated as absent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpstreamRecord {
    #[serde(default, deserialize_with = "lenient::string")]
    pub firstname: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub lastname: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub id_number: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub member_number: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub cell: Option<String>,
    #[serde(default, deserialize_with = "lenient::flag")]
    pub is_active: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpstreamSubscription {
    #[serde(default, deserialize_with = "lenient::string")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub start_date: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub end_date: Option<String>,
    #[serde(default, deserialize_with = "lenient::list")]
    pub products: Vec<UpstreamProduct>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpstreamProduct {
    #[serde(default, deserialize_with = "lenient::string")]
    pub name: Option<String>,
    /// Sent as either a JSON string or a number.
    #[serde(default)]
    pub amount: Value,
}

/// A found person: the record plus its subscriptions, in upstream order.
#[derive(Debug, Clone, Default)]
pub struct PersonDetails {
    pub record: UpstreamRecord,
    pub subscriptions: Vec<UpstreamSubscription>,
}

impl PersonDetails {
    /// Interprets a parsed 200 body.
    ///
    /// Returns `Ok(None)` when `record` is missing, null, empty or not an object.
    pub fn from_payload(payload: Value) -> Result<Option<Self>, serde_json::Error> {
        let Value::Object(mut fields) = payload else {
            return Ok(None);
        };

        let record = match fields.remove("record") {
            Some(Value::Object(record)) if !record.is_empty() => record,
            _ => return Ok(None),
        };
        let record: UpstreamRecord = serde_json::from_value(Value::Object(record))?;

        let subscriptions = match fields.remove("subscriptions") {
            Some(Value::Array(items)) => lenient::objects(items),
            _ => Vec::new(),
        };

        Ok(Some(Self {
            record,
            subscriptions,
        }))
    }
}

// ============ Normalization ============

impl From<PersonDetails> for ClientRecord {
    fn from(details: PersonDetails) -> Self {
        let PersonDetails {
            record,
            subscriptions,
        } = details;

        let full_name = format!(
            "{} {}",
            record.firstname.unwrap_or_default(),
            record.lastname.unwrap_or_default()
        )
        .trim()
        .to_string();

        Self {
            full_name,
            id_number: record.id_number.unwrap_or_default(),
            member_number: record.member_number.unwrap_or_default(),
            status: if record.is_active {
                ClientStatus::Active
            } else {
                ClientStatus::Inactive
            },
            email: record.email.unwrap_or_default(),
            contact_cell: record.cell.unwrap_or_default(),
            subscriptions: subscriptions.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<UpstreamSubscription> for SubscriptionRecord {
    fn from(sub: UpstreamSubscription) -> Self {
        Self {
            sub_status: sub.status.unwrap_or_else(|| "Unknown".to_string()),
            sub_start_date: sub.start_date.unwrap_or_default(),
            sub_end_date: sub
                .end_date
                .filter(|date| !date.trim().is_empty())
                .unwrap_or_else(|| "Ongoing".to_string()),
            products: sub.products.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<UpstreamProduct> for ProductRecord {
    fn from(product: UpstreamProduct) -> Self {
        Self {
            product_name: product
                .name
                .unwrap_or_else(|| "Unknown Product".to_string()),
            product_amount_formatted: format_rand_amount(&product.amount),
        }
    }
}

/// Magnitudes beyond 10^64 are not plausible amounts.
const MAX_AMOUNT_EXPONENT: i64 = 64;

/// Formats an upstream amount as Rand with two decimals, e.g. `"R 12.50"`.
///
/// Missing or unparseable amounts render as `"R 0.00"`. Rounding is half-even.
pub fn format_rand_amount(raw: &Value) -> String {
    let cents = parse_amount(raw)
        .unwrap_or_else(|| BigDecimal::from(0))
        .with_scale_round(2, RoundingMode::HalfEven);

    // Built from the unscaled integer: BigDecimal's Display drops the scale of zero
    let (unscaled, _) = cents.as_bigint_and_exponent();
    let text = unscaled.to_string();
    let (sign, magnitude) = match text.strip_prefix('-') {
        Some(magnitude) => ("-", magnitude),
        None => ("", text.as_str()),
    };
    let padded = format!("{:0>3}", magnitude);
    let (whole, fraction) = padded.split_at(padded.len() - 2);
    format!("R {}{}.{}", sign, whole, fraction)
}

fn parse_amount(raw: &Value) -> Option<BigDecimal> {
    let amount = match raw {
        Value::Number(n) => BigDecimal::from_str(&n.to_string()).ok()?,
        Value::String(s) => BigDecimal::from_str(s.trim()).ok()?,
        _ => return None,
    };

    let (_, scale) = amount.as_bigint_and_exponent();
    if scale < -MAX_AMOUNT_EXPONENT {
        tracing::warn!("Ignoring implausible SwitchTransact amount: {}", raw);
        return None;
    }
    // |amount| < 10^(digits - scale); anything below 0.001 rounds to zero, and
    // rescaling "1e-999999999" would allocate a billion digits
    if scale - amount.digits() as i64 > 2 {
        return Some(BigDecimal::from(0));
    }
    Some(amount)
}

/// Deserializers that substitute defaults instead of failing on odd upstream values.
mod lenient {
    use super::*;

    pub fn string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Value::deserialize(deserializer)? {
            Value::String(s) => Some(s),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        })
    }

    /// JSON truthiness: false, null, zero and empty strings, arrays or objects are false.
    pub fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Value::deserialize(deserializer)? {
            Value::Null => false,
            Value::Bool(b) => b,
            Value::Number(n) => n.as_f64().is_some_and(|v| v != 0.0),
            Value::String(s) => !s.is_empty(),
            Value::Array(items) => !items.is_empty(),
            Value::Object(fields) => !fields.is_empty(),
        })
    }

    pub fn list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned,
    {
        Ok(match Value::deserialize(deserializer)? {
            Value::Array(items) => objects(items),
            _ => Vec::new(),
        })
    }

    /// Keeps the entries that deserialize, preserving order.
    pub fn objects<T: DeserializeOwned>(items: Vec<Value>) -> Vec<T> {
        items
            .into_iter()
            .filter_map(|item| match serde_json::from_value(item) {
                Ok(parsed) => Some(parsed),
                Err(e) => {
                    tracing::warn!("Skipping malformed SwitchTransact list entry: {}", e);
                    None
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_body_suppresses_bank_and_transactions() {
        let body = serde_json::to_value(PersonDetailsRequest::new("8001015009087")).unwrap();
        assert_eq!(
            body,
            json!({
                "id_number": "8001015009087",
                "record": true,
                "subscriptions": true,
                "bank_accounts": false,
                "transactions": false
            })
        );
    }

    #[test]
    fn test_missing_or_empty_record_is_not_found() {
        for payload in [
            json!({}),
            json!({"record": null}),
            json!({"record": {}}),
            json!({"record": []}),
            json!({"record": "Jane"}),
            json!([1, 2, 3]),
        ] {
            assert!(PersonDetails::from_payload(payload).unwrap().is_none());
        }
    }

    #[test]
    fn test_lenient_fields_take_defaults() {
        let details = PersonDetails::from_payload(json!({
            "record": {"firstname": null, "member_number": 4417, "is_active": "no"},
            "subscriptions": "none"
        }))
        .unwrap()
        .unwrap();

        assert_eq!(details.record.firstname, None);
        assert_eq!(details.record.member_number.as_deref(), Some("4417"));
        assert!(details.record.is_active);
        assert!(details.subscriptions.is_empty());
    }

    #[test]
    fn test_envelope_shapes() {
        let not_found = LookupResponse::NotFound {
            message: "no client record found for 123".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&not_found).unwrap(),
            json!({"status": "not_found", "message": "no client record found for 123"})
        );

        let error = LookupResponse::Error {
            message: "rate limit reached".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&error).unwrap(),
            json!({"status": "error", "message": "rate limit reached"})
        );
    }

    #[test]
    fn test_format_rand_amount() {
        assert_eq!(format_rand_amount(&json!("12.5")), "R 12.50");
        assert_eq!(format_rand_amount(&json!(199)), "R 199.00");
        assert_eq!(format_rand_amount(&json!(0.129)), "R 0.13");
        assert_eq!(format_rand_amount(&json!(" 7 ")), "R 7.00");
        assert_eq!(format_rand_amount(&json!("-3.45")), "R -3.45");
        assert_eq!(format_rand_amount(&json!("n/a")), "R 0.00");
        assert_eq!(format_rand_amount(&Value::Null), "R 0.00");
        assert_eq!(format_rand_amount(&json!("1e999999999")), "R 0.00");
        assert_eq!(format_rand_amount(&json!("1e3")), "R 1000.00");
    }

    #[test]
    fn test_zero_amounts_keep_two_decimals() {
        for raw in [
            json!("0"),
            json!(0),
            json!("0.00"),
            json!(0.0),
            json!("0.001"),
            json!("-0.001"),
            json!("1e-999999999"),
        ] {
            assert_eq!(format_rand_amount(&raw), "R 0.00", "amount {}", raw);
        }
        assert_eq!(format_rand_amount(&json!("0.5")), "R 0.50");
        assert_eq!(format_rand_amount(&json!("-0.07")), "R -0.07");
    }

    #[test]
    fn test_long_precision_amount_is_rounded() {
        let raw = format!("12.5{}1", "0".repeat(63));
        assert_eq!(format_rand_amount(&json!(raw)), "R 12.50");
        assert_eq!(
            format_rand_amount(&json!("0.004999999999999999999999999999999999999999999999999999999999999999999")),
            "R 0.00"
        );
    }
}
