use std::collections::HashSet;
use std::fmt;

use serde_json::Value;

use crate::error::{Result, SeedError};
use crate::model::SeedDocument;

const REQUIRED_ROOT_KEYS: &[&str] = &["site", "categories", "products"];
const SAMPLE_SIZE: usize = 5;

#[derive(Debug, Clone, Copy)]
pub struct Limits {
    pub min_categories: usize,
    pub min_products: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Violation {
    MissingRootKey(&'static str),
    TooFewCategories { found: usize, min: usize },
    TooFewProducts { found: usize, min: usize },
    UnknownCategory { total: usize, sample: Vec<String> },
    InvalidPrice { total: usize, sample: Vec<String> },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::MissingRootKey(key) => write!(f, "Missing root key: {}", key),
            Violation::TooFewCategories { found, min } => {
                write!(f, "Unexpected categories count: {} (expected at least {})", found, min)
            }
            Violation::TooFewProducts { found, min } => {
                write!(f, "Unexpected products count: {} (expected at least {})", found, min)
            }
            Violation::UnknownCategory { total, sample } => {
                write!(f, "{} products with unknown category: {:?}", total, sample)
            }
            Violation::InvalidPrice { total, sample } => {
                write!(f, "{} products with invalid price: {:?}", total, sample)
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationReport {
    pub violations: Vec<Violation>,
}

impl ValidationReport {
    pub fn is_ok(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn into_result(self) -> Result<()> {
        if self.is_ok() {
            Ok(())
        } else {
            Err(SeedError::Validation(self))
        }
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for v in &self.violations {
            writeln!(f, "  - {}", v)?;
        }
        Ok(())
    }
}

/// Validate a seed file's JSON. Root keys are checked before the schema so a
/// truncated file reports what is missing rather than a decode error.
pub fn validate_json(raw: &str, limits: Limits) -> Result<SeedDocument> {
    let value: Value = serde_json::from_str(raw)
        .map_err(|e| SeedError::MalformedData(format!("seed is not valid JSON: {}", e)))?;

    let missing: Vec<_> = REQUIRED_ROOT_KEYS
        .iter()
        .filter(|k| value.get(**k).is_none())
        .map(|k| Violation::MissingRootKey(*k))
        .collect();
    ValidationReport { violations: missing }.into_result()?;

    let doc: SeedDocument = serde_json::from_value(value)
        .map_err(|e| SeedError::MalformedData(format!("seed does not match the document schema: {}", e)))?;
    validate(&doc, limits).into_result()?;
    Ok(doc)
}

/// Cardinality, category references and prices. Every failing check is reported.
pub fn validate(doc: &SeedDocument, limits: Limits) -> ValidationReport {
    let mut violations = Vec::new();

    if doc.categories.len() < limits.min_categories {
        violations.push(Violation::TooFewCategories {
            found: doc.categories.len(),
            min: limits.min_categories,
        });
    }
    if doc.products.len() < limits.min_products {
        violations.push(Violation::TooFewProducts {
            found: doc.products.len(),
            min: limits.min_products,
        });
    }

    let category_codes: HashSet<&str> = doc.categories.iter().map(|c| c.code.as_str()).collect();
    let unknown: Vec<&str> = doc
        .products
        .iter()
        .filter(|p| !category_codes.contains(p.category_code.as_str()))
        .map(|p| p.code.as_str())
        .collect();
    if !unknown.is_empty() {
        violations.push(Violation::UnknownCategory {
            total: unknown.len(),
            sample: sample(&unknown),
        });
    }

    let bad_prices: Vec<&str> = doc
        .products
        .iter()
        .filter(|p| p.price <= 0)
        .map(|p| p.code.as_str())
        .collect();
    if !bad_prices.is_empty() {
        violations.push(Violation::InvalidPrice {
            total: bad_prices.len(),
            sample: sample(&bad_prices),
        });
    }

    ValidationReport { violations }
}

fn sample(codes: &[&str]) -> Vec<String> {
    codes.iter().take(SAMPLE_SIZE).map(|c| c.to_string()).collect()
}
