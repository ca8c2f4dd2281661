//! Domain entities persisted by the catalog.
//!
//! Products, reviews and users are versioned records: the store assigns the
//! id, `created_at` and `version = 1` on insert and bumps `version` by one on
//! every successful update. Tokens are never updated; they are inserted and
//! deleted.

pub mod product;
pub mod review;
pub mod token;
pub mod user;

pub use product::{NewProduct, Product, ProductFilter, ProductPatch};
pub use review::{NewReview, Review, ReviewFilter, ReviewPatch};
pub use token::{IssuedToken, TokenRecord, TokenScope};
pub use user::{NewUser, User, UserFilter};

/// A record carrying a store-assigned id and an optimistic-concurrency version.
pub trait Versioned {
    fn id(&self) -> i64;

    /// Version the caller last read.
    fn version(&self) -> i32;

    /// Records the version reported by the store after a successful update.
    fn set_version(&mut self, version: i32);
}

macro_rules! impl_versioned {
    ($($ty:ty),+) => {
        $(
            impl Versioned for $ty {
                fn id(&self) -> i64 {
                    self.id
                }

                fn version(&self) -> i32 {
                    self.version
                }

                fn set_version(&mut self, version: i32) {
                    self.version = version;
                }
            }
        )+
    };
}

impl_versioned!(Product, Review, User);
