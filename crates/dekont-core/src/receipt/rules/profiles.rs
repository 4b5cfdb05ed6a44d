//! Bank profiles and the ordered pattern registry.
//!
//! Every supported receipt layout is one [`ProfileSpec`] row in
//! [`BANK_PROFILES`]. Adding a bank means appending a row; its position in
//! the table is its precedence.

use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

use crate::error::{PatternError, Result};
use crate::models::receipt::{BankId, FieldKind};

use super::amounts::CurrencyAmountScanner;
use super::patterns::field_pattern;
use super::{ExtractionMatch, FieldExtractor, GENERIC_CONFIDENCE, PROFILE_CONFIDENCE};

/// Static declaration of one issuer's label vocabulary.
///
/// Each field lists label alternatives; an empty list means the layout has
/// no such field.
#[derive(Debug, Clone, Copy)]
pub struct ProfileSpec {
    pub bank: BankId,
    pub recipient: &'static [&'static str],
    pub sender: &'static [&'static str],
    pub description: &'static [&'static str],
    pub amount: &'static [&'static str],
    pub date: &'static [&'static str],
}

impl ProfileSpec {
    /// Label alternatives declared for a field.
    pub fn labels(&self, kind: FieldKind) -> &'static [&'static str] {
        match kind {
            FieldKind::Recipient => self.recipient,
            FieldKind::Sender => self.sender,
            FieldKind::Description => self.description,
            FieldKind::Amount => self.amount,
            FieldKind::Date => self.date,
        }
    }
}

/// Bank-specific profiles in precedence order.
pub const BANK_PROFILES: [ProfileSpec; 4] = [
    ProfileSpec {
        bank: BankId::VakifBank,
        recipient: &["ALICI AD SOYAD/UNVAN"],
        sender: &["GÖNDEREN AD SOYAD/UNVAN"],
        description: &["İŞLEM AÇIKLAMASI"],
        amount: &["İŞLEM TUTARI"],
        date: &["İŞLEM TARİHİ"],
    },
    ProfileSpec {
        bank: BankId::YapiKredi,
        recipient: &["ALICI ADI"],
        sender: &["GÖNDEREN ADI SOYAD"],
        description: &["AÇIKLAMA"],
        amount: &["GİDEN EFT TUTARI"],
        date: &[],
    },
    ProfileSpec {
        bank: BankId::KuveytTurk,
        recipient: &["ALICI"],
        sender: &["GÖNDEREN KİŞİ"],
        description: &["AÇIKLAMA"],
        amount: &["TUTAR"],
        date: &[],
    },
    ProfileSpec {
        bank: BankId::HalkBank,
        recipient: &["ALICI"],
        sender: &["GÖNDEREN"],
        description: &["AÇIKLAMA"],
        amount: &["İŞLEM TUTARI (TL)"],
        date: &["İŞLEM TARİHİ"],
    },
];

/// Issuer-agnostic fallback, consulted after every bank profile.
pub const GENERIC_PROFILE: ProfileSpec = ProfileSpec {
    bank: BankId::Generic,
    recipient: &["ALICI AD SOYAD/UNVAN", "ALICI"],
    sender: &[],
    description: &["AÇIKLAMA"],
    amount: &[
        "İŞLEM TUTARI",
        "HAVALE TUTARI",
        "GİDEN EFT TUTARI",
        "EFT TUTARI",
        "TRANSFER TUTARI",
        "PARA TUTARI",
        "TUTARI",
        "TUTAR",
        "MİKTAR",
    ],
    date: &[],
};

/// A compiled pattern for one field of one profile.
#[derive(Debug, Clone)]
pub struct FieldPattern {
    regex: Regex,
    confidence: f32,
}

impl FieldPattern {
    /// Compile label alternatives into a single-capture pattern.
    pub fn compile(
        bank: BankId,
        kind: FieldKind,
        labels: &[&str],
        confidence: f32,
    ) -> std::result::Result<Self, PatternError> {
        let source = field_pattern(kind, labels);
        let regex = Regex::new(&source).map_err(|source| PatternError::Malformed {
            bank,
            field: kind,
            source,
        })?;

        Ok(Self { regex, confidence })
    }

    /// Occurrences in text order whose value survives normalization.
    fn matches<'a>(&'a self, text: &'a str) -> impl Iterator<Item = ExtractionMatch> + 'a {
        self.regex
            .captures_iter(text)
            .filter_map(|caps| ExtractionMatch::from_captures(&caps, self.confidence))
    }
}

impl FieldExtractor for FieldPattern {
    fn extract(&self, text: &str) -> Option<ExtractionMatch> {
        self.matches(text).next()
    }

    fn extract_all(&self, text: &str) -> Vec<ExtractionMatch> {
        self.matches(text).collect()
    }
}

/// One issuer's compiled field patterns.
#[derive(Debug, Clone)]
pub struct BankProfile {
    spec: ProfileSpec,
    patterns: [Option<FieldPattern>; 5],
}

impl BankProfile {
    /// Compile every declared field of a profile.
    pub fn compile(spec: &ProfileSpec) -> std::result::Result<Self, PatternError> {
        let confidence = if spec.bank == BankId::Generic {
            GENERIC_CONFIDENCE
        } else {
            PROFILE_CONFIDENCE
        };

        let mut patterns: [Option<FieldPattern>; 5] = Default::default();
        for kind in FieldKind::ALL {
            let labels = spec.labels(kind);
            if labels.is_empty() {
                continue;
            }
            let pattern = FieldPattern::compile(spec.bank, kind, labels, confidence)?;
            patterns[kind.index()] = Some(pattern);
        }

        Ok(Self {
            spec: *spec,
            patterns,
        })
    }

    pub fn bank(&self) -> BankId {
        self.spec.bank
    }

    /// Pattern for a field, if this layout has one.
    pub fn pattern(&self, kind: FieldKind) -> Option<&FieldPattern> {
        self.patterns[kind.index()].as_ref()
    }

    pub fn defines(&self, kind: FieldKind) -> bool {
        self.pattern(kind).is_some()
    }

    /// Declared labels for a field, as written in the profile table.
    pub fn labels(&self, kind: FieldKind) -> &'static [&'static str] {
        self.spec.labels(kind)
    }
}

/// Ordered collection of bank profiles plus the generic fallback.
///
/// Immutable once built; order is the only tie-break between profiles.
#[derive(Debug, Clone)]
pub struct PatternRegistry {
    profiles: Vec<BankProfile>,
    generic: BankProfile,
    amount_scan: CurrencyAmountScanner,
}

lazy_static! {
    static ref GLOBAL_REGISTRY: PatternRegistry = match PatternRegistry::build() {
        Ok(registry) => registry,
        Err(e) => panic!("built-in bank profiles failed to compile: {e}"),
    };
}

impl PatternRegistry {
    /// Compile the built-in profile table.
    pub fn build() -> Result<Self> {
        Ok(Self::from_specs(&BANK_PROFILES, &GENERIC_PROFILE)?)
    }

    /// Compile a registry from explicit declarations, keeping their order.
    pub fn from_specs(
        specs: &[ProfileSpec],
        generic: &ProfileSpec,
    ) -> std::result::Result<Self, PatternError> {
        let profiles = specs
            .iter()
            .map(BankProfile::compile)
            .collect::<std::result::Result<Vec<_>, _>>()?;
        let generic = BankProfile::compile(generic)?;

        debug!("Compiled pattern registry with {} bank profiles", profiles.len());

        Ok(Self {
            profiles,
            generic,
            amount_scan: CurrencyAmountScanner::new(),
        })
    }

    /// Process-wide registry, compiled on first use.
    pub fn global() -> &'static PatternRegistry {
        &GLOBAL_REGISTRY
    }

    /// Bank-specific profiles in precedence order.
    pub fn profiles(&self) -> &[BankProfile] {
        &self.profiles
    }

    pub fn generic(&self) -> &BankProfile {
        &self.generic
    }

    pub fn profile(&self, bank: BankId) -> Option<&BankProfile> {
        if bank == BankId::Generic {
            return Some(&self.generic);
        }
        self.profiles.iter().find(|p| p.bank() == bank)
    }

    pub fn amount_scan(&self) -> &CurrencyAmountScanner {
        &self.amount_scan
    }

    /// Bank profiles followed by the generic profile.
    pub fn iter(&self) -> impl Iterator<Item = &BankProfile> {
        self.profiles.iter().chain(std::iter::once(&self.generic))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_registry_compiles() {
        let registry = PatternRegistry::build().expect("built-in profiles must compile");

        let order: Vec<BankId> = registry.iter().map(|p| p.bank()).collect();
        assert_eq!(
            order,
            vec![
                BankId::VakifBank,
                BankId::YapiKredi,
                BankId::KuveytTurk,
                BankId::HalkBank,
                BankId::Generic,
            ]
        );
    }

    #[test]
    fn test_profiles_omit_fields() {
        let registry = PatternRegistry::global();

        let yapi = registry.profile(BankId::YapiKredi).unwrap();
        assert!(!yapi.defines(FieldKind::Date));
        assert!(yapi.defines(FieldKind::Amount));

        assert!(!registry.generic().defines(FieldKind::Sender));
        assert!(!registry.generic().defines(FieldKind::Date));
    }

    #[test]
    fn test_every_pattern_has_one_capture() {
        let registry = PatternRegistry::global();

        for profile in registry.iter() {
            for kind in FieldKind::ALL {
                if let Some(pattern) = profile.pattern(kind) {
                    assert_eq!(
                        pattern.regex.captures_len(),
                        2,
                        "{} {} pattern",
                        profile.bank(),
                        kind
                    );
                }
            }
        }
    }

    #[test]
    fn test_pattern_skips_empty_occurrences() {
        let registry = PatternRegistry::global();
        let halk = registry.profile(BankId::HalkBank).unwrap();
        let pattern = halk.pattern(FieldKind::Recipient).unwrap();

        let text = "ALICI : -\nALICI : Güven Sigorta";
        let found = pattern.extract(text).unwrap();
        assert_eq!(found.value, "Güven Sigorta");
        assert_eq!(found.confidence, PROFILE_CONFIDENCE);
        assert_eq!(found.matched, "ALICI : Güven Sigorta");
        assert_eq!(&text[found.span.0..found.span.1], "Güven Sigorta");
    }

    #[test]
    fn test_extract_all_occurrences() {
        let registry = PatternRegistry::global();
        let kuveyt = registry.profile(BankId::KuveytTurk).unwrap();
        let pattern = kuveyt.pattern(FieldKind::Amount).unwrap();

        let values: Vec<String> = pattern
            .extract_all("TUTAR: 100.00\nTUTAR: 200,50 TL")
            .into_iter()
            .map(|m| m.value)
            .collect();
        assert_eq!(values, vec!["100.00", "200,50"]);
    }

    #[test]
    fn test_custom_registry_order() {
        let reversed: Vec<ProfileSpec> = BANK_PROFILES.iter().rev().copied().collect();
        let registry = PatternRegistry::from_specs(&reversed, &GENERIC_PROFILE).unwrap();

        assert_eq!(registry.profiles()[0].bank(), BankId::HalkBank);
        assert_eq!(registry.profile(BankId::Generic).unwrap().bank(), BankId::Generic);
    }

    #[test]
    fn test_generic_patterns_carry_lower_confidence() {
        let registry = PatternRegistry::global();
        let pattern = registry.generic().pattern(FieldKind::Amount).unwrap();

        let found = pattern.extract("HAVALE TUTARI: 3,200.75 TL").unwrap();
        assert_eq!(found.value, "3,200.75");
        assert_eq!(found.confidence, GENERIC_CONFIDENCE);
    }

    #[test]
    fn test_oversized_label_is_malformed() {
        let label: &'static str = Box::leak("İ".repeat(300_000).into_boxed_str());
        let labels: &'static [&'static str] = Box::leak(vec![label].into_boxed_slice());
        let mut specs = BANK_PROFILES;
        specs[3].recipient = labels;

        let err = PatternRegistry::from_specs(&specs, &GENERIC_PROFILE).unwrap_err();

        assert!(matches!(
            err,
            PatternError::Malformed {
                bank: BankId::HalkBank,
                field: FieldKind::Recipient,
                ..
            }
        ));
        assert!(err.to_string().contains("HalkBank"));
    }
}
