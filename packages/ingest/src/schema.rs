//! Header validation for incident exports.
//!
//! A [`ColumnLayout`] is resolved once from the header row. Rows are then
//! read by index, so column presence is never re-checked per record.

use csv::StringRecord;

use crate::IngestError;

/// Header holding the incident timestamp.
pub const DATE_COLUMN: &str = "Date";
/// Header holding the crime-type label.
pub const PRIMARY_TYPE_COLUMN: &str = "Primary Type";

/// Column positions for one export file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnLayout {
    /// Position of [`DATE_COLUMN`].
    pub date: usize,
    /// Position of [`PRIMARY_TYPE_COLUMN`].
    pub primary_type: usize,
    /// `ID`, used when `Case Number` is absent.
    pub id: Option<usize>,
    /// `Case Number`.
    pub case_number: Option<usize>,
    /// `Block`.
    pub block: Option<usize>,
    /// `Description`.
    pub description: Option<usize>,
    /// `Location Description`.
    pub location_description: Option<usize>,
    /// `Latitude`.
    pub latitude: Option<usize>,
    /// `Longitude`.
    pub longitude: Option<usize>,
}

impl ColumnLayout {
    /// Resolves column positions from a header row. Header names are
    /// matched case-insensitively after trimming.
    ///
    /// # Errors
    ///
    /// Returns [`IngestError::MissingColumn`] if the date or crime-type
    /// column is absent.
    pub fn from_headers(headers: &StringRecord) -> Result<Self, IngestError> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
        };
        let require = |name: &str| {
            find(name).ok_or_else(|| IngestError::MissingColumn {
                column: name.to_string(),
            })
        };

        Ok(Self {
            date: require(DATE_COLUMN)?,
            primary_type: require(PRIMARY_TYPE_COLUMN)?,
            id: find("ID"),
            case_number: find("Case Number"),
            block: find("Block"),
            description: find("Description"),
            location_description: find("Location Description"),
            latitude: find("Latitude"),
            longitude: find("Longitude"),
        })
    }

    /// Returns `true` if both coordinate columns are present.
    #[must_use]
    pub const fn has_coordinates(&self) -> bool {
        self.latitude.is_some() && self.longitude.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_chicago_headers() {
        let headers = StringRecord::from(vec![
            "ID",
            "Case Number",
            "Date",
            "Block",
            "IUCR",
            "Primary Type",
            "Description",
            "Location Description",
            "Latitude",
            "Longitude",
        ]);
        let layout = ColumnLayout::from_headers(&headers).unwrap();

        assert_eq!(layout.date, 2);
        assert_eq!(layout.primary_type, 5);
        assert_eq!(layout.case_number, Some(1));
        assert_eq!(layout.latitude, Some(8));
        assert!(layout.has_coordinates());
    }

    #[test]
    fn matches_headers_loosely() {
        let headers = StringRecord::from(vec![" date ", "PRIMARY TYPE"]);
        let layout = ColumnLayout::from_headers(&headers).unwrap();
        assert_eq!(layout.date, 0);
        assert_eq!(layout.primary_type, 1);
        assert!(!layout.has_coordinates());
    }

    #[test]
    fn missing_required_column_is_an_error() {
        let headers = StringRecord::from(vec!["Date", "Description"]);
        match ColumnLayout::from_headers(&headers) {
            Err(IngestError::MissingColumn { column }) => assert_eq!(column, PRIMARY_TYPE_COLUMN),
            other => panic!("expected MissingColumn, got {other:?}"),
        }
    }
}
