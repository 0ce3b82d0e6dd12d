//! Service layer for billtrack
//!
//! The service layer provides business logic on top of the storage layer,
//! handling validation, duplicate names and audit logging.

pub mod bill;
pub mod pay;

pub use bill::{BillService, BillStatusRow};
pub use pay::PayService;
