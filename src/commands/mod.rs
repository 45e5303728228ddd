pub mod agents;
pub mod clients;
pub mod parcels;
pub mod payment;
pub mod sale;

pub use agents::{create_agent, delete_agent, update_agent};
pub use clients::{create_client, delete_client, update_client};
pub use parcels::{create_parcel, delete_parcel, update_parcel};
pub use payment::{register_payment, PaymentReceipt};
pub use sale::{register_sale, suggested_installment};
