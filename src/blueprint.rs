use crate::error::Result;
use crate::legacy::{self, BlueprintRecord};
use base64::{engine::general_purpose, Engine as _};
use chrono::NaiveDate;

/// Validity window of a snapshot or blueprint. Bounds are day starts; `until` is
/// exclusive and a missing bound is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub from: Option<NaiveDate>,
    pub until: Option<NaiveDate>,
}

impl DateWindow {
    pub fn new(from: Option<NaiveDate>, until: Option<NaiveDate>) -> Self {
        Self { from, until }
    }

    pub fn parse(from: Option<&str>, until: Option<&str>) -> Result<Self> {
        Ok(Self::new(
            legacy::parse_optional_date(from)?,
            legacy::parse_optional_date(until)?,
        ))
    }

    pub fn overlaps(&self, other: &DateWindow) -> bool {
        starts_before_end(self.from, other.until) && starts_before_end(other.from, self.until)
    }
}

fn starts_before_end(start: Option<NaiveDate>, end: Option<NaiveDate>) -> bool {
    match (start, end) {
        (Some(s), Some(e)) => s < e,
        _ => true,
    }
}

/// Decoded bytes of the first blueprint whose window overlaps `window`.
pub fn select_blueprint(window: &DateWindow, blueprints: &[BlueprintRecord]) -> Result<Option<Vec<u8>>> {
    for bp in blueprints {
        let bp_window = DateWindow::parse(bp.valid_from.as_deref(), bp.valid_until.as_deref())?;
        if window.overlaps(&bp_window) {
            return Ok(Some(general_purpose::STANDARD.decode(bp.raw.trim())?));
        }
    }
    Ok(None)
}
