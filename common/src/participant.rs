use core::fmt;

use crate::resource::{Quantities, RESOURCE_TYPES};

/// Fabric organisation a participant enrolls under.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Org {
    Org1,
    Org2,
}

impl fmt::Display for Org {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Org::Org1 => f.write_str("org1"),
            Org::Org2 => f.write_str("org2"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    Buyer,
    Seller,
}

impl Role {
    pub const fn org(self) -> Org {
        match self {
            Role::Buyer => Org::Org1,
            Role::Seller => Org::Org2,
        }
    }

    pub const fn prefix(self) -> &'static str {
        match self {
            Role::Buyer => "buyer",
            Role::Seller => "seller",
        }
    }
}

/// Wallet identity of a participant, e.g. `buyer7`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Address {
    pub role: Role,
    pub id: u32,
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.role.prefix(), self.id)
    }
}

/// Common view over buyers and sellers used when rendering scripts.
pub trait Participant {
    const ROLE: Role;

    fn id(&self) -> u32;

    /// Role specific fields of the bid command, after the auction id.
    fn bid_args(&self) -> String;

    #[inline(always)]
    fn address(&self) -> Address {
        Address {
            role: Self::ROLE,
            id: self.id(),
        }
    }

    #[inline(always)]
    fn org(&self) -> Org {
        Self::ROLE.org()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Buyer {
    pub id: u32,
    pub quantities: Quantities,
    /// Total price offered for the whole bundle
    pub price: f64,
    pub time: u32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Seller {
    pub id: u32,
    pub quantities: Quantities,
    /// Unit price per resource type
    pub prices: [f64; RESOURCE_TYPES],
    pub times: [u32; RESOURCE_TYPES],
}

impl Participant for Buyer {
    const ROLE: Role = Role::Buyer;

    fn id(&self) -> u32 {
        self.id
    }

    fn bid_args(&self) -> String {
        format!(
            "{:?} {} {}",
            self.price,
            self.time,
            join(&self.quantities)
        )
    }
}

impl Participant for Seller {
    const ROLE: Role = Role::Seller;

    fn id(&self) -> u32 {
        self.id
    }

    fn bid_args(&self) -> String {
        format!(
            "{} {} {}",
            join_prices(&self.prices),
            join(&self.times),
            join(&self.quantities)
        )
    }
}

/// Comma separated list, as the contract's `StrToIntArr` expects.
pub fn join<T: fmt::Display>(values: &[T]) -> String {
    values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

/// Like [`join`] but keeps a fractional digit on whole prices (`5.0`).
pub fn join_prices(prices: &[f64]) -> String {
    prices
        .iter()
        .map(|p| format!("{p:?}"))
        .collect::<Vec<_>>()
        .join(",")
}

#[test]
fn addresses() {
    let buyer = Buyer {
        id: 7,
        quantities: [1, 2, 3],
        price: 1.5,
        time: 4,
    };
    assert_eq!(buyer.address().to_string(), "buyer7");
    assert_eq!(buyer.org().to_string(), "org1");

    let seller = Seller {
        id: 12,
        quantities: [0, 0, 0],
        prices: [0.1, 0.2, 0.4],
        times: [1, 1, 1],
    };
    assert_eq!(seller.address().to_string(), "seller12");
    assert_eq!(seller.org().to_string(), "org2");
}

#[test]
fn bid_fields() {
    let buyer = Buyer {
        id: 1,
        quantities: [3, 0, 9],
        price: 25.0,
        time: 5,
    };
    assert_eq!(buyer.bid_args(), "25.0 5 3,0,9");

    let seller = Seller {
        id: 2,
        quantities: [4, 5, 6],
        prices: [0.15, 0.3, 0.62],
        times: [3, 4, 5],
    };
    assert_eq!(seller.bid_args(), "0.15,0.3,0.62 3,4,5 4,5,6");
}
