//! Newtype IDs for type-safe entity references.
//!
//! The store API numbers every record with an integer primary key. Use the
//! `define_id!` macro to wrap them so a client id can never be passed where a
//! garment id is expected.

/// Macro to define a type-safe ID wrapper.
///
/// Creates a newtype wrapper around `i64` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `Copy`, `PartialEq`, `Eq`, `Hash`, `PartialOrd`, `Ord`
/// - Conversion methods: `new()`, `as_i64()`
/// - `From<i64>` and `Into<i64>` implementations
///
/// # Example
///
/// ```rust
/// # use joyeria_core::define_id;
/// define_id!(ClientId);
/// define_id!(SaleId);
///
/// let client_id = ClientId::new(1);
/// let sale_id = SaleId::new(1);
///
/// // These are different types, so this won't compile:
/// // let _: ClientId = sale_id;
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Create a new ID from an i64 value.
            #[must_use]
            pub const fn new(id: i64) -> Self {
                Self(id)
            }

            /// Get the underlying i64 value.
            #[must_use]
            pub const fn as_i64(&self) -> i64 {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id)
            }
        }

        impl From<$name> for i64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

// Parties
define_id!(ClientId);
define_id!(SupplierId);

// Inventory
define_id!(GarmentId);
define_id!(GoldTypeId);
define_id!(GarmentTypeId);

// Trade
define_id!(SaleId);
define_id!(PurchaseId);

// Financing
define_id!(CreditId);
define_id!(LayawayId);
define_id!(InstallmentId);

// Cash register
define_id!(AccountId);
define_id!(MovementId);
define_id!(ClosureId);
define_id!(EntryId);

// Shared lookups
define_id!(PaymentMethodId);
define_id!(StatusId);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_id_roundtrip_through_i64() {
        let id = GarmentId::new(42);
        assert_eq!(id.as_i64(), 42);
        assert_eq!(i64::from(id), 42);
        assert_eq!(GarmentId::from(42), id);
    }

    #[test]
    fn test_id_serializes_transparently() {
        let id: ClientId = serde_json::from_str("17").unwrap();
        assert_eq!(id, ClientId::new(17));
        assert_eq!(serde_json::to_string(&id).unwrap(), "17");
    }

    #[test]
    fn test_id_display() {
        assert_eq!(SaleId::new(128).to_string(), "128");
    }
}
