//! Translation of legacy object identifiers into the new space oid scheme.
//!
//! New oids carry the domain class id in their upper 32 bits. The legacy export
//! still uses the previous system's oids, so every reference read from it goes
//! through [`OidTranslator::new_space_id`] before it touches the store.
//!
//! The arithmetic is kept exactly as the cutover tooling has been computing it:
//!
//! * the internal object number is taken as the low **16** bits of the legacy oid,
//!   so internal numbers above `0xFFFF` collide with lower ones;
//! * the internal number is then shifted right by 32 as a 32-bit value. The shift
//!   distance of a 32-bit shift is taken modulo 32, so this is a no-op. Read
//!   literally on a 64-bit value it would discard the internal number entirely.
//!
//! Both points are open with the owners of the legacy and target oid formats. Until
//! they confirm the intended packing, the behaviour is pinned by tests rather than
//! changed.

use crate::db;
use crate::error::{MigrationError, Result};
use rusqlite::Connection;

/// Catalog name of the space entity in `ff_domain_class_info`.
pub const SPACE_DOMAIN_CLASS: &str = "org.fenixedu.spaces.domain.Space";

const INTERNAL_ID_MASK: i64 = 0x0000_FFFF;

/// Per-run translation context. Holds the space class id looked up once from the
/// catalog and passed explicitly to every importer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OidTranslator {
    space_cid: i64,
}

impl OidTranslator {
    pub fn new(space_cid: i64) -> Self {
        Self { space_cid }
    }

    pub fn from_catalog(conn: &Connection) -> Result<Self> {
        let cid = db::domain_class_id(conn, SPACE_DOMAIN_CLASS)?
            .ok_or_else(|| MigrationError::UnknownDomainClass(SPACE_DOMAIN_CLASS.to_string()))?;
        tracing::debug!(cid, class = SPACE_DOMAIN_CLASS, "resolved space class id");
        Ok(Self::new(cid))
    }

    pub fn space_cid(&self) -> i64 {
        self.space_cid
    }

    pub fn new_space_oid(&self, external_id: &str) -> Result<i64> {
        let oid = external_id
            .trim()
            .parse::<i64>()
            .map_err(|_| MigrationError::InvalidLegacyId(external_id.to_string()))?;
        let id_internal = (oid & INTERNAL_ID_MASK) as i32;
        let cid = self.space_cid.wrapping_shl(32);
        Ok(cid.wrapping_add(i64::from(id_internal.wrapping_shr(32))))
    }

    pub fn new_space_id(&self, external_id: &str) -> Result<String> {
        Ok(self.new_space_oid(external_id)?.to_string())
    }
}
