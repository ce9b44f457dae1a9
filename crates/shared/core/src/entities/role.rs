use serde::{Deserialize, Serialize};

/// Market side a trader is assigned to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Buyer,
    Seller,
}

impl Role {
    /// Returns the opposite side
    pub fn opposite(&self) -> Self {
        match self {
            Role::Buyer => Role::Seller,
            Role::Seller => Role::Buyer,
        }
    }

    /// Role for a 1-based position in a group: odd positions buy, even positions sell
    pub fn for_position(id_in_group: u32) -> Self {
        if id_in_group % 2 > 0 {
            Role::Buyer
        } else {
            Role::Seller
        }
    }

    pub fn is_buyer(&self) -> bool {
        matches!(self, Role::Buyer)
    }
}
