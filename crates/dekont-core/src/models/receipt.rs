//! Receipt data models: field kinds, issuing banks and extraction results.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A semantic transaction attribute recovered from a receipt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// Receiving party (alıcı).
    Recipient,
    /// Sending party (gönderen).
    Sender,
    /// Free-text transaction description (açıklama).
    Description,
    /// Transferred amount, kept as the printed numeric token.
    Amount,
    /// Transaction date as printed on the receipt.
    Date,
}

impl FieldKind {
    /// Every field kind, in declaration order.
    pub const ALL: [FieldKind; 5] = [
        FieldKind::Recipient,
        FieldKind::Sender,
        FieldKind::Description,
        FieldKind::Amount,
        FieldKind::Date,
    ];

    /// Presentation order of report lines.
    pub const REPORT_ORDER: [FieldKind; 5] = [
        FieldKind::Description,
        FieldKind::Recipient,
        FieldKind::Sender,
        FieldKind::Amount,
        FieldKind::Date,
    ];

    /// Position of this kind inside per-field arrays.
    pub fn index(self) -> usize {
        match self {
            FieldKind::Recipient => 0,
            FieldKind::Sender => 1,
            FieldKind::Description => 2,
            FieldKind::Amount => 3,
            FieldKind::Date => 4,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FieldKind::Recipient => "recipient",
            FieldKind::Sender => "sender",
            FieldKind::Description => "description",
            FieldKind::Amount => "amount",
            FieldKind::Date => "date",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Issuer of a receipt layout known to the pattern registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BankId {
    /// VakıfBank EFT receipts.
    VakifBank,
    /// Yapı Kredi outgoing EFT receipts.
    YapiKredi,
    /// Kuveyt Türk participation bank transfers.
    KuveytTurk,
    /// HalkBank EFT receipts.
    HalkBank,
    /// Issuer-agnostic fallback vocabulary.
    Generic,
}

impl BankId {
    /// Banks with a dedicated profile, excluding the generic fallback.
    pub const SPECIFIC: [BankId; 4] = [
        BankId::VakifBank,
        BankId::YapiKredi,
        BankId::KuveytTurk,
        BankId::HalkBank,
    ];

    /// Human-readable bank name.
    pub fn name(self) -> &'static str {
        match self {
            BankId::VakifBank => "VakıfBank",
            BankId::YapiKredi => "Yapı Kredi",
            BankId::KuveytTurk => "Kuveyt Türk",
            BankId::HalkBank => "HalkBank",
            BankId::Generic => "Generic",
        }
    }

    /// Identifier used in configuration files and CLI flags.
    pub fn code(self) -> &'static str {
        match self {
            BankId::VakifBank => "vakif_bank",
            BankId::YapiKredi => "yapi_kredi",
            BankId::KuveytTurk => "kuveyt_turk",
            BankId::HalkBank => "halk_bank",
            BankId::Generic => "generic",
        }
    }
}

impl fmt::Display for BankId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when a bank identifier is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown bank: {0}")]
pub struct UnknownBank(pub String);

impl FromStr for BankId {
    type Err = UnknownBank;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .trim()
            .to_lowercase()
            .chars()
            .filter(|c| c.is_alphanumeric())
            .map(|c| match c {
                'ı' => 'i',
                'ü' => 'u',
                _ => c,
            })
            .collect();

        match key.as_str() {
            "vakifbank" | "vakif" => Ok(BankId::VakifBank),
            "yapikredi" | "yapi" => Ok(BankId::YapiKredi),
            "kuveytturk" | "kuveyt" => Ok(BankId::KuveytTurk),
            "halkbank" | "halk" => Ok(BankId::HalkBank),
            "generic" => Ok(BankId::Generic),
            _ => Err(UnknownBank(s.to_string())),
        }
    }
}

/// Where a resolved field value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "bank")]
pub enum MatchSource {
    /// A bank-specific profile pattern.
    Profile(BankId),
    /// The generic fallback profile.
    Generic,
    /// The label-free number-before-currency scan (amounts only).
    AmountScan,
}

impl fmt::Display for MatchSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchSource::Profile(bank) => write!(f, "{} profile", bank),
            MatchSource::Generic => f.write_str("generic profile"),
            MatchSource::AmountScan => f.write_str("currency scan"),
        }
    }
}

/// Provenance of one resolved field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldOrigin {
    pub source: MatchSource,
    /// Confidence score (0.0 - 1.0).
    pub confidence: f32,
    /// Text of the whole match, label included.
    pub matched: String,
    /// Byte range of the raw value in the receipt text.
    pub span: (usize, usize),
}

/// The five resolved, normalized field values of one receipt.
///
/// An empty string means the field was not found.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub recipient: String,
    pub sender: String,
    pub description: String,
    pub amount: String,
    pub date: String,

    /// Provenance of every non-empty field.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub sources: BTreeMap<FieldKind, FieldOrigin>,
}

impl ExtractionResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Value of a field (empty when not found).
    pub fn get(&self, kind: FieldKind) -> &str {
        match kind {
            FieldKind::Recipient => &self.recipient,
            FieldKind::Sender => &self.sender,
            FieldKind::Description => &self.description,
            FieldKind::Amount => &self.amount,
            FieldKind::Date => &self.date,
        }
    }

    /// Store a resolved value together with its provenance.
    ///
    /// Empty values are ignored so `sources` only describes found fields.
    pub fn set(&mut self, kind: FieldKind, value: String, origin: FieldOrigin) {
        if value.is_empty() {
            return;
        }
        let slot = match kind {
            FieldKind::Recipient => &mut self.recipient,
            FieldKind::Sender => &mut self.sender,
            FieldKind::Description => &mut self.description,
            FieldKind::Amount => &mut self.amount,
            FieldKind::Date => &mut self.date,
        };
        *slot = value;
        self.sources.insert(kind, origin);
    }

    pub fn source(&self, kind: FieldKind) -> Option<MatchSource> {
        self.origin(kind).map(|origin| origin.source)
    }

    pub fn origin(&self, kind: FieldKind) -> Option<&FieldOrigin> {
        self.sources.get(&kind)
    }

    /// True when no field was recognized.
    pub fn is_empty(&self) -> bool {
        FieldKind::ALL.iter().all(|kind| self.get(*kind).is_empty())
    }

    /// Number of recognized fields.
    pub fn found_count(&self) -> usize {
        FieldKind::ALL
            .iter()
            .filter(|kind| !self.get(**kind).is_empty())
            .count()
    }

    /// Kinds that were not recognized, in declaration order.
    pub fn missing_fields(&self) -> Vec<FieldKind> {
        FieldKind::ALL
            .into_iter()
            .filter(|kind| self.get(*kind).is_empty())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn origin(source: MatchSource, confidence: f32) -> FieldOrigin {
        FieldOrigin {
            source,
            confidence,
            matched: String::new(),
            span: (0, 0),
        }
    }

    #[test]
    fn test_bank_id_parsing() {
        assert_eq!("vakif_bank".parse::<BankId>(), Ok(BankId::VakifBank));
        assert_eq!("VakıfBank".parse::<BankId>(), Ok(BankId::VakifBank));
        assert_eq!("Yapı Kredi".parse::<BankId>(), Ok(BankId::YapiKredi));
        assert_eq!("kuveyt-türk".parse::<BankId>(), Ok(BankId::KuveytTurk));
        assert_eq!("HALK".parse::<BankId>(), Ok(BankId::HalkBank));
        assert!("ziraat".parse::<BankId>().is_err());
    }

    #[test]
    fn test_result_set_ignores_empty() {
        let mut result = ExtractionResult::new();
        result.set(FieldKind::Sender, String::new(), origin(MatchSource::Generic, 0.8));

        assert!(result.is_empty());
        assert_eq!(result.source(FieldKind::Sender), None);
    }

    #[test]
    fn test_result_accessors() {
        let mut result = ExtractionResult::new();
        result.set(
            FieldKind::Amount,
            "1,500.00".to_string(),
            origin(MatchSource::Profile(BankId::KuveytTurk), 0.95),
        );

        assert!(!result.is_empty());
        assert_eq!(result.found_count(), 1);
        assert_eq!(result.get(FieldKind::Amount), "1,500.00");
        assert_eq!(
            result.source(FieldKind::Amount),
            Some(MatchSource::Profile(BankId::KuveytTurk))
        );
        assert_eq!(result.origin(FieldKind::Amount).unwrap().confidence, 0.95);
        assert!(result.origin(FieldKind::Date).is_none());
        assert_eq!(result.missing_fields().len(), 4);
    }

    #[test]
    fn test_result_serializes_sources() {
        let mut result = ExtractionResult::new();
        result.set(
            FieldKind::Amount,
            "250.75".to_string(),
            FieldOrigin {
                source: MatchSource::AmountScan,
                confidence: 0.5,
                matched: "250.75 TL".to_string(),
                span: (10, 16),
            },
        );
        result.set(
            FieldKind::Date,
            "15.07.2025".to_string(),
            origin(MatchSource::Profile(BankId::HalkBank), 0.95),
        );

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["date"], "15.07.2025");
        assert_eq!(json["sources"]["amount"]["source"]["kind"], "amount_scan");
        assert_eq!(json["sources"]["amount"]["confidence"], 0.5);
        assert_eq!(json["sources"]["amount"]["matched"], "250.75 TL");
        assert_eq!(json["sources"]["amount"]["span"], serde_json::json!([10, 16]));
        assert_eq!(json["sources"]["date"]["source"]["bank"], "halk_bank");
    }
}
