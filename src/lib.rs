/* src/lib.rs */
//! # iplocate
//!
//! Resolve the real client address of an HTTP request, decide whether it can
//! be geolocated, and look it up. Also provides the segmented-octet model
//! behind a four-cell IPv4 entry form.
//!
//! ## Features
//!
//! - Header precedence table: `x-vercel-forwarded-for`, `cf-connecting-ip`,
//!   `x-real-ip`, `x-forwarded-for`, then the remote socket address
//! - Local/public classification of the resolved address
//! - Dotted-quad validation shared by the API and the entry form
//! - Octet cell normalization with auto-advance and auto-backspace
//! - With the `server` feature (default): an axum layer and extractor, an
//!   ip-api.com provider, and the `/api/ip-location` router
//!
//! ## Examples
//!
//! ### Resolving a client
//!
//! ```rust
//! use iplocate::{classify, resolve_client_address, AddressClass, HeaderMap};
//!
//! let mut headers = HeaderMap::new();
//! headers.insert("x-forwarded-for".to_string(), "8.8.8.8, 10.0.0.5".to_string());
//!
//! let ip = resolve_client_address(&headers, Some("192.168.1.10"));
//! assert_eq!(ip, "8.8.8.8");
//! assert_eq!(classify(&ip), AddressClass::Public);
//! ```
//!
//! ### Entering an address
//!
//! ```rust
//! use iplocate::{EntryForm, Key};
//!
//! let mut form = EntryForm::new();
//! form.input(0, "192");
//! form.input(1, "168");
//! form.input(2, "1");
//! form.key(2, Key::Dot);
//! form.input(3, "10");
//! assert_eq!(form.submit().unwrap(), "192.168.1.10");
//! ```

pub mod classify;
pub mod error;
pub mod extractor;
pub mod form;
pub mod format;
pub mod octet;

#[cfg(feature = "server")]
pub mod config;
#[cfg(feature = "server")]
pub mod logging;
#[cfg(feature = "server")]
pub mod middleware;
#[cfg(feature = "server")]
pub mod provider;
#[cfg(feature = "server")]
pub mod routes;

pub use classify::{AddressClass, classify};
pub use error::{GeoIpError, Result};
pub use extractor::{
    AddressResolver, HeaderMap, HeaderRule, HeaderValueKind, lookup_target, resolve_client_address,
};
pub use form::EntryForm;
pub use format::{is_well_formed_ipv4, normalize_ipv4};
pub use octet::{Key, NavigationIntent, OctetArray, apply_input, handle_key};

#[cfg(feature = "server")]
pub use middleware::{ClientAddress, ClientAddressLayer, ClientAddressService};
#[cfg(feature = "server")]
pub use provider::{IpApiProvider, LocationProvider, LocationRecord};
#[cfg(feature = "server")]
pub use routes::{AppState, build_router};
