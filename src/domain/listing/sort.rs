//! Sort token resolution against a per-resource safelist.

use super::ListingError;

/// Direction of an `ORDER BY` clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

/// A sort column and direction taken from a server-defined safelist.
///
/// The only constructor is [`SortSpec::resolve`], and the column it stores is
/// borrowed from the safelist entry rather than from client input, so a value
/// of this type is always safe to splice into an `ORDER BY` clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    column: &'static str,
    direction: SortDirection,
}

impl SortSpec {
    /// Resolves a client sort token such as `name` or `-created_at`.
    ///
    /// The token must match a safelist entry byte for byte; a leading `-`
    /// selects descending order and is stripped from the column name.
    ///
    /// # Errors
    ///
    /// Returns [`ListingError::UnsafeSort`] if the token is not safelisted.
    ///
    /// # Examples
    ///
    /// ```
    /// use catalog_api::domain::listing::{SortDirection, SortSpec};
    ///
    /// const SAFELIST: &[&str] = &["id", "name", "-id", "-name"];
    ///
    /// let spec = SortSpec::resolve("-name", SAFELIST).unwrap();
    /// assert_eq!(spec.column(), "name");
    /// assert_eq!(spec.direction(), SortDirection::Desc);
    ///
    /// assert!(SortSpec::resolve("name; DROP TABLE users", SAFELIST).is_err());
    /// ```
    pub fn resolve(token: &str, safelist: &'static [&'static str]) -> Result<Self, ListingError> {
        let entry = safelist
            .iter()
            .copied()
            .find(|safe| *safe == token)
            .ok_or_else(|| ListingError::UnsafeSort(token.to_string()))?;

        let (column, direction) = match entry.strip_prefix('-') {
            Some(column) => (column, SortDirection::Desc),
            None => (entry, SortDirection::Asc),
        };

        Ok(Self { column, direction })
    }

    pub fn column(&self) -> &'static str {
        self.column
    }

    pub fn direction(&self) -> SortDirection {
        self.direction
    }

    /// `ORDER BY` body with `tiebreaker` appended so that pages are stable.
    pub fn order_by(&self, tiebreaker: &'static str) -> String {
        format!(
            "{} {}, {} ASC",
            self.column,
            self.direction.as_sql(),
            tiebreaker
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAFELIST: &[&str] = &["id", "name", "created_at", "-id", "-name", "-created_at"];

    #[test]
    fn test_ascending_token() {
        let spec = SortSpec::resolve("name", SAFELIST).unwrap();
        assert_eq!(spec.column(), "name");
        assert_eq!(spec.direction(), SortDirection::Asc);
    }

    #[test]
    fn test_descending_token_strips_prefix() {
        let spec = SortSpec::resolve("-created_at", SAFELIST).unwrap();
        assert_eq!(spec.column(), "created_at");
        assert_eq!(spec.direction(), SortDirection::Desc);
    }

    #[test]
    fn test_every_descending_entry_resolves_to_its_column() {
        for entry in SAFELIST.iter().filter(|e| e.starts_with('-')) {
            let spec = SortSpec::resolve(entry, SAFELIST).unwrap();
            assert_eq!(spec.direction(), SortDirection::Desc);
            assert_eq!(spec.column(), &entry[1..]);
        }
    }

    #[test]
    fn test_unknown_token_rejected() {
        let err = SortSpec::resolve("price", SAFELIST).unwrap_err();
        assert_eq!(err, ListingError::UnsafeSort("price".to_string()));
    }

    #[test]
    fn test_injection_attempt_rejected() {
        assert!(SortSpec::resolve("name; DROP TABLE products", SAFELIST).is_err());
        assert!(SortSpec::resolve("-name DESC, (SELECT 1)", SAFELIST).is_err());
    }

    #[test]
    fn test_match_is_exact() {
        assert!(SortSpec::resolve("Name", SAFELIST).is_err());
        assert!(SortSpec::resolve(" name", SAFELIST).is_err());
        assert!(SortSpec::resolve("--name", SAFELIST).is_err());
        assert!(SortSpec::resolve("", SAFELIST).is_err());
    }

    #[test]
    fn test_descending_form_must_be_safelisted() {
        const ASC_ONLY: &[&str] = &["id"];
        assert!(SortSpec::resolve("id", ASC_ONLY).is_ok());
        assert!(SortSpec::resolve("-id", ASC_ONLY).is_err());
    }

    #[test]
    fn test_order_by_appends_tiebreaker() {
        let spec = SortSpec::resolve("-name", SAFELIST).unwrap();
        assert_eq!(spec.order_by("id"), "name DESC, id ASC");
    }
}
