// Attribute filter (`where` clause) construction; unknown fields surface as a remote 4xx

use crate::domain::error::ParcelError;

/// Expression matching every row.
pub const MATCH_ALL: &str = "1=1";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Eq,
    ContainsIgnoreCase,
}

#[derive(Debug, Clone, Default)]
pub struct FilterBuilder {
    clauses: Vec<String>,
}

impl FilterBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// `FIELD = 'value'`
    pub fn eq(self, field: &str, value: &str) -> Result<Self, ParcelError> {
        self.clause(field, Operator::Eq, value)
    }

    /// `UPPER(FIELD) LIKE '%VALUE%'`
    pub fn contains_ci(self, field: &str, value: &str) -> Result<Self, ParcelError> {
        self.clause(field, Operator::ContainsIgnoreCase, value)
    }

    pub fn clause(mut self, field: &str, op: Operator, value: &str) -> Result<Self, ParcelError> {
        self.clauses.push(render_clause(field, op, value)?);
        Ok(self)
    }

    pub fn build(&self) -> String {
        if self.clauses.is_empty() {
            MATCH_ALL.to_string()
        } else {
            self.clauses.join(" AND ")
        }
    }
}

/// Renders one `(field, operator, value)` tuple.
pub fn render_clause(field: &str, op: Operator, value: &str) -> Result<String, ParcelError> {
    check_field(field)?;
    let literal = quote(value)?;
    Ok(match op {
        Operator::Eq => format!("{} = '{}'", field, literal),
        Operator::ContainsIgnoreCase => {
            format!("UPPER({}) LIKE '%{}%'", field, literal.to_uppercase())
        }
    })
}

/// Escapes a value for use inside a single-quoted literal.
pub fn quote(value: &str) -> Result<String, ParcelError> {
    if let Some(c) = value.chars().find(|c| c.is_control()) {
        return Err(ParcelError::invalid(format!(
            "filter value contains control character U+{:04X}",
            c as u32
        )));
    }
    Ok(value.replace('\'', "''"))
}

fn check_field(field: &str) -> Result<(), ParcelError> {
    let mut chars = field.chars();
    let valid = matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');
    if valid {
        Ok(())
    } else {
        Err(ParcelError::invalid(format!(
            "'{}' is not a valid field name",
            field
        )))
    }
}

/// Standard parcel filter: county always, owner/address substrings when given.
pub fn parcel_filter(county: &str, owner: &str, address: &str) -> Result<String, ParcelError> {
    let mut builder = FilterBuilder::new().eq("COUNTY_NAME", county.trim())?;
    let owner = owner.trim();
    if !owner.is_empty() {
        builder = builder.contains_ci("PRIMARY_OWNER", owner)?;
    }
    let address = address.trim();
    if !address.is_empty() {
        builder = builder.contains_ci("PARCEL_ADDR", address)?;
    }
    Ok(builder.build())
}

/// Sorted, de-duplicated union of the display fields and the always-needed ones.
pub fn output_fields<'a>(
    popup: impl IntoIterator<Item = &'a str>,
    required: impl IntoIterator<Item = &'a str>,
) -> std::collections::BTreeSet<String> {
    popup
        .into_iter()
        .chain(required)
        .map(str::trim)
        .filter(|f| !f.is_empty())
        .map(str::to_string)
        .collect()
}
