//! Client reference model

use serde::{Deserialize, Serialize};

/// A client as supplied by the external user directory.
///
/// Time tracking only references clients by id; this is the shape the
/// directory returns when a view resolves one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientEntity {
    pub id: String,
    pub name: String,
    pub email: String,
}
