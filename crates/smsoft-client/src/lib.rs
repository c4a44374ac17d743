//! smsoft-client: Meraki Dashboard API client
//!
//! Lists Systems Manager devices and their installed software, and plugs into
//! the inventory collector as a [`DeviceSoftwareSource`](smsoft_core::DeviceSoftwareSource).
//!
//! # Example
//!
//! ```no_run
//! use smsoft_client::MerakiClient;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = MerakiClient::new("my-api-key")?;
//!
//! for device in client.sm_devices("N_24329156").await? {
//!     let software = client.sm_device_softwares("N_24329156", &device.id).await?;
//!     println!("{}: {} apps", device.id, software.len());
//! }
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod http;
pub mod models;

pub use error::{ClientError, Result};
pub use http::{DEFAULT_BASE_URL, MerakiClient};
pub use models::{SmDevice, SmSoftware};
