// Service exports
pub mod cache;
pub mod dating;
pub mod memory;
pub mod payment;
pub mod postgres;
pub mod store;

pub use cache::PromptCatalog;
pub use dating::DatingService;
pub use memory::MemoryStore;
pub use payment::{
    HttpPaymentVerifier, PaymentError, PaymentGate, PaymentVerifier, Receipt, Verification,
    VerificationStatus, PAYMENT_HEADER,
};
pub use postgres::PostgresStore;
pub use store::{DatingStore, StoreError};
